//! Resource addressing: object / instance / resource / resource-instance

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RegistryError;

/// Path to a resource, or to one instance of a multi-instance resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ResourcePath {
    pub object_id: u16,
    pub instance_id: u16,
    pub resource_id: u16,
    /// Present only for instances of multi-instance resources
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_instance_id: Option<u16>,
}

impl ResourcePath {
    /// Path to a singular resource
    pub const fn new(object_id: u16, instance_id: u16, resource_id: u16) -> Self {
        Self {
            object_id,
            instance_id,
            resource_id,
            resource_instance_id: None,
        }
    }

    /// Path to one instance of a multi-instance resource
    pub const fn instance(
        object_id: u16,
        instance_id: u16,
        resource_id: u16,
        resource_instance_id: u16,
    ) -> Self {
        Self {
            object_id,
            instance_id,
            resource_id,
            resource_instance_id: Some(resource_instance_id),
        }
    }

    /// Same resource, addressed at the given resource instance
    pub const fn with_resource_instance(self, resource_instance_id: u16) -> Self {
        Self {
            resource_instance_id: Some(resource_instance_id),
            ..self
        }
    }

    /// The resource this path belongs to, ignoring any resource instance
    pub const fn resource(self) -> Self {
        Self {
            resource_instance_id: None,
            ..self
        }
    }

    pub fn is_resource_instance(&self) -> bool {
        self.resource_instance_id.is_some()
    }
}

impl fmt::Display for ResourcePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "/{}/{}/{}",
            self.object_id, self.instance_id, self.resource_id
        )?;
        if let Some(riid) = self.resource_instance_id {
            write!(f, "/{}", riid)?;
        }
        Ok(())
    }
}

impl FromStr for ResourcePath {
    type Err = RegistryError;

    /// Parse the textual form `/3/0/7` or `/3/0/7/1` (leading slash optional)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || RegistryError::InvalidPathSyntax(s.to_string());

        let ids = s
            .trim_start_matches('/')
            .split('/')
            .map(|part| part.parse::<u16>().map_err(|_| malformed()))
            .collect::<Result<Vec<_>, _>>()?;

        match ids.as_slice() {
            [obj, inst, res] => Ok(Self::new(*obj, *inst, *res)),
            [obj, inst, res, riid] => Ok(Self::instance(*obj, *inst, *res, *riid)),
            _ => Err(malformed()),
        }
    }
}
