use std::{fmt, str::FromStr};

use crate::error::AttributeError;

mod value;
pub use value::*;

/// The component type stored in an [AttributeBuffer](crate::AttributeBuffer).
///
/// Components are stored in native byte order.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    /// Uninitialized; every access to an attribute of this type fails.
    #[default]
    Unknown,
    /// `u8`
    UByte,
    /// `i32`
    Int,
    /// `f32`
    Float,
}

impl AttributeType {
    /// Size in bytes of a single component. Zero for [AttributeType::Unknown].
    pub const fn size(self) -> usize {
        use std::mem::size_of;
        match self {
            AttributeType::Unknown => 0,
            AttributeType::UByte => size_of::<u8>(),
            AttributeType::Int => size_of::<i32>(),
            AttributeType::Float => size_of::<f32>(),
        }
    }

    pub const fn alignment(self) -> usize {
        use std::mem::align_of;
        match self {
            AttributeType::Unknown => 1,
            AttributeType::UByte => align_of::<u8>(),
            AttributeType::Int => align_of::<i32>(),
            AttributeType::Float => align_of::<f32>(),
        }
    }

    #[inline]
    pub const fn is_known(self) -> bool {
        !matches!(self, AttributeType::Unknown)
    }

    pub const fn name(self) -> &'static str {
        match self {
            AttributeType::Unknown => "unknown",
            AttributeType::UByte => "ubyte",
            AttributeType::Int => "int",
            AttributeType::Float => "float",
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AttributeType {
    type Err = AttributeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unknown" => Ok(Self::Unknown),
            "ubyte" => Ok(Self::UByte),
            "int" => Ok(Self::Int),
            "float" => Ok(Self::Float),
            _ => Err(AttributeError::UnknownTypeName(s.to_owned())),
        }
    }
}

/// The numeric kind a caller reads or writes through an [AttributeValue].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Float,
}

/// Trait for types which can be stored as attribute components. Only the three component types
/// of [AttributeType] implement it.
///
/// # Safety
///
/// Implementing types *must* have the size and alignment of the component described by `TYPE`,
/// and every bit pattern of that size must be a valid value of the implementing type.
#[allow(unsafe_code)]
pub(crate) unsafe trait AttributeComponent: Copy + 'static {
    const TYPE: AttributeType;
}

mod _impl_comp {
    use super::{AttributeComponent, AttributeType};

    macro_rules! impl_attr_comp {
        ($Target:ty: $ty:ident) => {
            const _: () = {
                // "size of type $Target == size of component $ty"
                static_assertions::const_assert_eq!(
                    std::mem::size_of::<$Target>(),
                    AttributeType::$ty.size()
                );
                static_assertions::const_assert_eq!(
                    std::mem::align_of::<$Target>(),
                    AttributeType::$ty.alignment()
                );
                #[allow(unsafe_code)]
                unsafe impl AttributeComponent for $Target {
                    const TYPE: AttributeType = AttributeType::$ty;
                }
            };
        };
    }

    impl_attr_comp!(u8: UByte);
    impl_attr_comp!(i32: Int);
    impl_attr_comp!(f32: Float);
}
