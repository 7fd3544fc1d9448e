//! Resource registry
//!
//! Maps resource paths to value bindings or executable actions. The registry
//! is populated once during bring-up and afterwards only read by the protocol
//! engine, which resolves a path to a slot, reads or writes through the slot's
//! backing reference and invokes bound actions for execute requests.

use serde::Serialize;
use std::collections::{btree_map, BTreeMap, BTreeSet};
use std::fmt;
use tracing::debug;

use crate::access::AccessFlags;
use crate::action::ResourceAction;
use crate::error::RegistryError;
use crate::path::ResourcePath;
use crate::schema::{self, ResourceDef};
use crate::value::{ResourceValue, ValueSnapshot};

/// A registered binding at one resource path
pub enum ResourceSlot<'a> {
    /// Reference to externally owned value storage
    Value {
        value: ResourceValue<'a>,
        flags: AccessFlags,
    },
    /// Executable resource
    Action(Box<dyn ResourceAction + 'a>),
}

impl ResourceSlot<'_> {
    pub fn flags(&self) -> AccessFlags {
        match self {
            Self::Value { flags, .. } => *flags,
            Self::Action(_) => AccessFlags::empty(),
        }
    }

    pub fn is_action(&self) -> bool {
        matches!(self, Self::Action(_))
    }
}

impl fmt::Debug for ResourceSlot<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value { value, flags } => f
                .debug_struct("Value")
                .field("value", value)
                .field("flags", flags)
                .finish(),
            Self::Action(_) => f.write_str("Action"),
        }
    }
}

/// Registry of Device object resources
#[derive(Debug, Default)]
pub struct ResourceRegistry<'a> {
    slots: BTreeMap<ResourcePath, ResourceSlot<'a>>,
    /// Resource instances created for multi-instance resources
    instances: BTreeSet<ResourcePath>,
}

impl<'a> ResourceRegistry<'a> {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            slots: BTreeMap::new(),
            instances: BTreeSet::new(),
        }
    }

    /// Resolve `path` against the schema, checking that a resource instance
    /// id is given exactly when the resource is multi-instance
    fn resolve(path: &ResourcePath) -> Result<&'static ResourceDef, RegistryError> {
        let def = schema::lookup(path).ok_or(RegistryError::InvalidPath(*path))?;
        if def.is_multi_instance() != path.is_resource_instance() {
            return Err(RegistryError::InvalidPath(*path));
        }
        Ok(def)
    }

    /// Bind `path` to externally owned value storage
    ///
    /// For a multi-instance resource the resource instance must have been
    /// created with [`create_instance`](Self::create_instance) first. Any slot
    /// already registered at `path` is replaced.
    pub fn register_value(
        &mut self,
        path: ResourcePath,
        value: ResourceValue<'a>,
        flags: AccessFlags,
    ) -> Result<(), RegistryError> {
        let def = Self::resolve(&path)?;

        let fits = match value {
            ResourceValue::Text(_) | ResourceValue::Bytes(_) => def.kind.accepts_bytes(),
            ResourceValue::Integer(_) => def.kind.accepts_integer(),
        };
        if def.is_executable() || !fits {
            return Err(RegistryError::KindMismatch {
                path,
                requested: value.kind_name(),
            });
        }

        if path.is_resource_instance() && !self.instances.contains(&path) {
            return Err(RegistryError::InstanceNotCreated(path));
        }

        let previous = self
            .slots
            .insert(path, ResourceSlot::Value { value, flags });
        debug!(
            path = %path,
            resource = def.name,
            len = value.len(),
            read_only = flags.is_read_only(),
            replaced = previous.is_some(),
            "Registered value"
        );
        Ok(())
    }

    /// Create a resource instance of a multi-instance resource
    ///
    /// Creating an instance that already exists is a successful no-op.
    pub fn create_instance(&mut self, path: ResourcePath) -> Result<(), RegistryError> {
        let riid = path
            .resource_instance_id
            .ok_or(RegistryError::InvalidPath(path))?;
        let def = Self::resolve(&path)?;

        let max = def.max_instances.unwrap_or(0);
        if riid >= max {
            return Err(RegistryError::InstanceLimitExceeded { path, max });
        }

        if self.instances.insert(path) {
            debug!(path = %path, resource = def.name, "Created resource instance");
        } else {
            debug!(path = %path, "Resource instance already exists");
        }
        Ok(())
    }

    /// Bind an executable resource to `action`, replacing any earlier binding
    pub fn register_action(
        &mut self,
        path: ResourcePath,
        action: impl ResourceAction + 'a,
    ) -> Result<(), RegistryError> {
        let def = Self::resolve(&path)?;
        if !def.is_executable() {
            return Err(RegistryError::KindMismatch {
                path,
                requested: "action",
            });
        }

        let previous = self.slots.insert(path, ResourceSlot::Action(Box::new(action)));
        debug!(
            path = %path,
            resource = def.name,
            replaced = previous.is_some(),
            "Registered action"
        );
        Ok(())
    }

    /// Look up the slot registered at `path`
    pub fn slot(&self, path: &ResourcePath) -> Option<&ResourceSlot<'a>> {
        self.slots.get(path)
    }

    /// Whether the resource instance at `path` has been created
    pub fn is_instance_created(&self, path: &ResourcePath) -> bool {
        self.instances.contains(path)
    }

    /// Resource instance ids created for the resource at `path`
    pub fn instances_of(&self, path: &ResourcePath) -> Vec<u16> {
        let resource = path.resource();
        self.instances
            .iter()
            .filter(|p| p.resource() == resource)
            .filter_map(|p| p.resource_instance_id)
            .collect()
    }

    /// All registered paths, in path order
    pub fn paths(&self) -> btree_map::Keys<'_, ResourcePath, ResourceSlot<'a>> {
        self.slots.keys()
    }

    /// Number of registered slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn registered(&self, path: &ResourcePath) -> Result<&ResourceSlot<'a>, RegistryError> {
        self.slots
            .get(path)
            .ok_or(RegistryError::NotRegistered(*path))
    }

    /// Engine read: copy the current value through the slot's reference
    pub fn read(&self, path: &ResourcePath) -> Result<ValueSnapshot, RegistryError> {
        match self.registered(path)? {
            ResourceSlot::Value { value, .. } => Ok(value.snapshot()),
            ResourceSlot::Action(_) => Err(RegistryError::KindMismatch {
                path: *path,
                requested: "read",
            }),
        }
    }

    /// Engine write: store an integer through the slot's reference
    ///
    /// Read-only slots reject the write. Text and bytes slots borrow their
    /// backing memory immutably and cannot be written.
    pub fn write(&self, path: &ResourcePath, new_value: i64) -> Result<(), RegistryError> {
        let (value, flags) = match self.registered(path)? {
            ResourceSlot::Value { value, flags } => (value, *flags),
            ResourceSlot::Action(_) => {
                return Err(RegistryError::KindMismatch {
                    path: *path,
                    requested: "write",
                })
            }
        };

        if flags.is_read_only() {
            return Err(RegistryError::ReadOnly(*path));
        }

        let ResourceValue::Integer(cell) = value else {
            return Err(RegistryError::KindMismatch {
                path: *path,
                requested: "integer write",
            });
        };

        if !cell.store(new_value) {
            return Err(RegistryError::ValueOutOfRange {
                path: *path,
                value: new_value,
                width: cell.width(),
            });
        }
        debug!(path = %path, value = new_value, "Wrote value");
        Ok(())
    }

    /// Engine execute: invoke the action bound at `path`
    ///
    /// A nonzero status from the action is surfaced as
    /// [`RegistryError::ActionFailure`].
    pub fn execute(&self, path: &ResourcePath, args: &[u8]) -> Result<(), RegistryError> {
        let ResourceSlot::Action(action) = self.registered(path)? else {
            return Err(RegistryError::KindMismatch {
                path: *path,
                requested: "execute",
            });
        };

        match action.invoke(args) {
            0 => Ok(()),
            status => Err(RegistryError::ActionFailure {
                path: *path,
                status,
            }),
        }
    }

    /// Owned, serializable view of every registered slot
    pub fn snapshot(&self) -> RegistrySnapshot {
        let slots = self
            .slots
            .iter()
            .map(|(path, slot)| SlotSnapshot {
                path: path.to_string(),
                name: schema::lookup(path).map_or("unknown", |def| def.name),
                read_only: slot.flags().is_read_only(),
                executable: slot.is_action(),
                value: match slot {
                    ResourceSlot::Value { value, .. } => Some(value.snapshot()),
                    ResourceSlot::Action(_) => None,
                },
            })
            .collect();

        RegistrySnapshot { slots }
    }
}

/// Serializable view of a single slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotSnapshot {
    pub path: String,
    pub name: &'static str,
    pub read_only: bool,
    pub executable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<ValueSnapshot>,
}

/// Serializable view of the whole registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistrySnapshot {
    pub slots: Vec<SlotSnapshot>,
}
