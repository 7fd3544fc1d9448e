//! Executable resource actions

use tracing::info;

/// Capability bound to an executable resource
///
/// `invoke` receives the opaque argument buffer sent with the execute request
/// and returns a status code: 0 for success, anything else is reported to the
/// protocol engine as an execution failure.
pub trait ResourceAction {
    fn invoke(&self, args: &[u8]) -> i32;
}

impl<F> ResourceAction for F
where
    F: Fn(&[u8]) -> i32,
{
    fn invoke(&self, args: &[u8]) -> i32 {
        self(args)
    }
}

/// Factory reset handler
///
/// Placeholder: no reset is performed yet and the request always succeeds.
#[derive(Debug, Clone, Copy, Default)]
pub struct FactoryReset;

impl ResourceAction for FactoryReset {
    fn invoke(&self, _args: &[u8]) -> i32 {
        info!("DEVICE: factory default requested (not implemented)");
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_reset_succeeds() {
        assert_eq!(FactoryReset.invoke(&[]), 0);
        assert_eq!(FactoryReset.invoke(b"ignored"), 0);
    }

    #[test]
    fn test_closure_action() {
        let action = |args: &[u8]| if args.is_empty() { 0 } else { -22 };
        assert_eq!(action.invoke(&[]), 0);
        assert_eq!(action.invoke(&[1]), -22);
    }
}
