use crate::{AttributeType, ValueKind};

/// Direction of a failed attribute access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Access {
    Read,
    Write,
}

/// Errors related to [AttributeBuffers](crate::AttributeBuffer).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AttributeError {
    #[error("{access:?} as {requested:?} is unsupported by attributes of type {stored:?}")]
    UnsupportedTypeCombination {
        stored: AttributeType,
        requested: ValueKind,
        access: Access,
    },
    #[error("attribute component out of bounds: {offset} + {size} > {len}")]
    OutOfBounds {
        offset: usize,
        size: usize,
        len: usize,
    },
    #[error("unrecognized attribute type name: {0:?}")]
    UnknownTypeName(String),
}

impl AttributeError {
    #[inline]
    pub(crate) fn unsupported(stored: AttributeType, requested: ValueKind, access: Access) -> Self {
        Self::UnsupportedTypeCombination {
            stored,
            requested,
            access,
        }
    }
}
