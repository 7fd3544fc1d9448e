//! Per-resource access flags

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Access restrictions applied when a value is registered
    ///
    /// The empty set means read-write. The flags are honoured on the
    /// engine-facing write path; registration itself is never restricted.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct AccessFlags: u8 {
        const READ_ONLY = 1 << 0;
    }
}

impl AccessFlags {
    pub fn is_read_only(self) -> bool {
        self.contains(Self::READ_ONLY)
    }
}
