//! Non-owning value bindings
//!
//! A registered value never owns its data. Text and bytes borrow the caller's
//! buffer; integers borrow an atomic cell so the owning collaborator can keep
//! updating a live reading (e.g. battery voltage) after registration.

use serde::Serialize;
use std::sync::atomic::{AtomicI32, AtomicU8, Ordering};

/// Borrowed integer storage of a fixed width
#[derive(Debug, Clone, Copy)]
pub enum IntegerCell<'a> {
    U8(&'a AtomicU8),
    I32(&'a AtomicI32),
}

impl IntegerCell<'_> {
    /// Current value of the referenced cell
    pub fn load(&self) -> i64 {
        match self {
            Self::U8(cell) => i64::from(cell.load(Ordering::Relaxed)),
            Self::I32(cell) => i64::from(cell.load(Ordering::Relaxed)),
        }
    }

    /// Store into the referenced cell, returning false if `value` does not fit
    pub fn store(&self, value: i64) -> bool {
        match self {
            Self::U8(cell) => match u8::try_from(value) {
                Ok(v) => {
                    cell.store(v, Ordering::Relaxed);
                    true
                }
                Err(_) => false,
            },
            Self::I32(cell) => match i32::try_from(value) {
                Ok(v) => {
                    cell.store(v, Ordering::Relaxed);
                    true
                }
                Err(_) => false,
            },
        }
    }

    /// Width of the cell in bytes
    pub fn width(&self) -> usize {
        match self {
            Self::U8(_) => std::mem::size_of::<u8>(),
            Self::I32(_) => std::mem::size_of::<i32>(),
        }
    }
}

impl<'a> From<&'a AtomicU8> for IntegerCell<'a> {
    fn from(cell: &'a AtomicU8) -> Self {
        Self::U8(cell)
    }
}

impl<'a> From<&'a AtomicI32> for IntegerCell<'a> {
    fn from(cell: &'a AtomicI32) -> Self {
        Self::I32(cell)
    }
}

/// Backing reference for a value slot
#[derive(Debug, Clone, Copy)]
pub enum ResourceValue<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
    Integer(IntegerCell<'a>),
}

impl<'a> ResourceValue<'a> {
    pub fn text(s: &'a str) -> Self {
        Self::Text(s)
    }

    pub fn bytes(b: &'a [u8]) -> Self {
        Self::Bytes(b)
    }

    pub fn integer(cell: impl Into<IntegerCell<'a>>) -> Self {
        Self::Integer(cell.into())
    }

    /// Length of the backing memory in bytes
    ///
    /// Text length excludes any terminator; the registry trusts this length
    /// for as long as the slot exists.
    pub fn len(&self) -> usize {
        match self {
            Self::Text(s) => s.len(),
            Self::Bytes(b) => b.len(),
            Self::Integer(cell) => cell.width(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Bytes(_) => "bytes",
            Self::Integer(_) => "integer",
        }
    }

    /// Read the current contents through the reference
    pub fn snapshot(&self) -> ValueSnapshot {
        match self {
            Self::Text(s) => ValueSnapshot::Text(s.to_string()),
            Self::Bytes(b) => ValueSnapshot::Bytes(b.to_vec()),
            Self::Integer(cell) => ValueSnapshot::Integer(cell.load()),
        }
    }
}

/// Owned copy of a value, as handed to the protocol engine on read
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ValueSnapshot {
    Text(String),
    Bytes(Vec<u8>),
    Integer(i64),
}
