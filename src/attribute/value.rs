use nalgebra::Scalar;
use num_traits::AsPrimitive;

use crate::{
    buffer::raw,
    error::{Access, AttributeError},
    AttributeType, ValueKind,
};

mod private {
    pub trait Sealed {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
}

/// Values which can be read from and written to attribute components of a runtime
/// [AttributeType].
///
/// | stored type | read `i32` | read `f32` | write `i32` | write `f32` |
/// |---|---|---|---|---|
/// | `UByte` | widen | widen | truncate | fails |
/// | `Int` | direct | convert | direct | fails |
/// | `Float` | fails | direct | convert | direct |
/// | `Unknown` | fails | fails | fails | fails |
pub trait AttributeValue: Scalar + Copy + Default + private::Sealed {
    const KIND: ValueKind;

    /// Whether a component of type `ty` can be read as `Self`.
    ///
    /// Must agree with the `Ok` arms of [AttributeValue::load]; likewise
    /// [AttributeValue::writable_to] with [AttributeValue::store].
    fn readable_from(ty: AttributeType) -> bool;

    /// Whether `Self` can be written into a component of type `ty`.
    fn writable_to(ty: AttributeType) -> bool;

    #[inline]
    fn check_read(ty: AttributeType) -> Result<(), AttributeError> {
        if Self::readable_from(ty) {
            Ok(())
        } else {
            Err(AttributeError::unsupported(ty, Self::KIND, Access::Read))
        }
    }

    #[inline]
    fn check_write(ty: AttributeType) -> Result<(), AttributeError> {
        if Self::writable_to(ty) {
            Ok(())
        } else {
            Err(AttributeError::unsupported(ty, Self::KIND, Access::Write))
        }
    }

    /// Read the component of type `ty` at `ptr` as `Self`. Unsupported combinations fail without
    /// touching memory.
    ///
    /// # Safety
    ///
    /// * `ptr` must be valid for reads of `ty.size()` bytes
    #[allow(unsafe_code)]
    unsafe fn load(ty: AttributeType, ptr: *const u8) -> Result<Self, AttributeError>;

    /// Write `self` into the component of type `ty` at `ptr`. Unsupported combinations fail
    /// without touching memory.
    ///
    /// # Safety
    ///
    /// * `ptr` must be valid for writes of `ty.size()` bytes
    #[allow(unsafe_code)]
    unsafe fn store(self, ty: AttributeType, ptr: *mut u8) -> Result<(), AttributeError>;
}

impl AttributeValue for i32 {
    const KIND: ValueKind = ValueKind::Int;

    #[inline]
    fn readable_from(ty: AttributeType) -> bool {
        matches!(ty, AttributeType::UByte | AttributeType::Int)
    }

    #[inline]
    fn writable_to(ty: AttributeType) -> bool {
        ty.is_known()
    }

    #[allow(unsafe_code)]
    unsafe fn load(ty: AttributeType, ptr: *const u8) -> Result<Self, AttributeError> {
        match ty {
            AttributeType::UByte => Ok(unsafe { raw::read::<u8>(ptr) }.as_()),
            AttributeType::Int => Ok(unsafe { raw::read::<i32>(ptr) }),
            AttributeType::Float | AttributeType::Unknown => {
                Err(AttributeError::unsupported(ty, Self::KIND, Access::Read))
            }
        }
    }

    #[allow(unsafe_code)]
    unsafe fn store(self, ty: AttributeType, ptr: *mut u8) -> Result<(), AttributeError> {
        match ty {
            AttributeType::UByte => unsafe { raw::write::<u8>(ptr, self.as_()) },
            AttributeType::Int => unsafe { raw::write::<i32>(ptr, self) },
            // stored as the nearest f32, same as an implicit int -> float assignment
            AttributeType::Float => unsafe { raw::write::<f32>(ptr, self.as_()) },
            AttributeType::Unknown => {
                return Err(AttributeError::unsupported(ty, Self::KIND, Access::Write))
            }
        }
        Ok(())
    }
}

impl AttributeValue for f32 {
    const KIND: ValueKind = ValueKind::Float;

    #[inline]
    fn readable_from(ty: AttributeType) -> bool {
        ty.is_known()
    }

    #[inline]
    fn writable_to(ty: AttributeType) -> bool {
        matches!(ty, AttributeType::Float)
    }

    #[allow(unsafe_code)]
    unsafe fn load(ty: AttributeType, ptr: *const u8) -> Result<Self, AttributeError> {
        match ty {
            AttributeType::UByte => Ok(unsafe { raw::read::<u8>(ptr) }.as_()),
            AttributeType::Int => Ok(unsafe { raw::read::<i32>(ptr) }.as_()),
            AttributeType::Float => Ok(unsafe { raw::read::<f32>(ptr) }),
            AttributeType::Unknown => {
                Err(AttributeError::unsupported(ty, Self::KIND, Access::Read))
            }
        }
    }

    #[allow(unsafe_code)]
    unsafe fn store(self, ty: AttributeType, ptr: *mut u8) -> Result<(), AttributeError> {
        match ty {
            AttributeType::Float => {
                unsafe { raw::write::<f32>(ptr, self) };
                Ok(())
            }
            // a float is never narrowed into an integer slot
            AttributeType::UByte | AttributeType::Int | AttributeType::Unknown => {
                Err(AttributeError::unsupported(ty, Self::KIND, Access::Write))
            }
        }
    }
}
