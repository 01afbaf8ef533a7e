//! Get/set dispatch over the runtime attribute type.

use mfx_attribute::{
    Access, AttributeBuffer, AttributeError, AttributeLayout, AttributeType, OwnedAttribute,
    ValueKind,
};

fn attr(ty: AttributeType, stride: usize, elements: usize) -> OwnedAttribute {
    AttributeBuffer::new(vec![0; stride * elements], AttributeLayout::new(ty, stride, 1))
}

/// A default-constructed attribute rejects everything
#[test]
fn default_is_inert() {
    let mut attr = OwnedAttribute::default();
    assert_eq!(attr.attr_type(), AttributeType::Unknown);
    assert_eq!(attr.stride(), 0);
    assert_eq!(attr.component_count(), 0);
    assert!(attr.as_bytes().is_empty());
    assert!(attr.is_empty());

    assert_eq!(
        attr.get::<i32>(0, 0),
        Err(AttributeError::UnsupportedTypeCombination {
            stored: AttributeType::Unknown,
            requested: ValueKind::Int,
            access: Access::Read,
        })
    );
    assert!(attr.get::<f32>(0, 0).is_err());
    assert!(attr.set(0, 0, 1).is_err());
    assert!(attr.set(0, 0, 1.0f32).is_err());
}

/// Unknown attributes fail even when the storage is large enough, and leave it untouched
#[test]
fn unknown_leaves_storage_untouched() {
    let mut attr = AttributeBuffer::new(
        vec![7u8; 16],
        AttributeLayout::new(AttributeType::Unknown, 4, 1),
    );
    for i in 0..4 {
        assert!(attr.get::<i32>(i, 0).is_err());
        assert!(attr.get::<f32>(i, 0).is_err());
        assert!(attr.set(i, 0, 0).is_err());
        assert!(attr.set(i, 0, 0.0f32).is_err());
    }
    assert_eq!(attr.as_bytes(), &[7u8; 16]);
}

#[test]
fn ubyte_roundtrip() {
    let mut attr = attr(AttributeType::UByte, 1, 4);
    attr.set(2, 0, 200).unwrap();
    assert_eq!(attr.get::<i32>(2, 0), Ok(200));
    assert_eq!(attr.get::<f32>(2, 0), Ok(200.0));
    assert_eq!(attr.as_bytes(), &[0, 0, 200, 0]);
}

/// Integer writes into unsigned bytes truncate
#[test]
fn ubyte_truncates() {
    let mut attr = attr(AttributeType::UByte, 1, 2);
    attr.set(0, 0, 300).unwrap();
    attr.set(1, 0, -1).unwrap();
    assert_eq!(attr.get::<i32>(0, 0), Ok(44));
    assert_eq!(attr.get::<i32>(1, 0), Ok(255));
}

#[test]
fn int_widens_to_float() {
    let mut attr = attr(AttributeType::Int, 4, 1);
    attr.set_value(0, -5).unwrap();
    assert_eq!(attr.get_value::<i32>(0), Ok(-5));
    assert_eq!(attr.get_value::<f32>(0), Ok(-5.0));
}

#[test]
fn float_never_reads_as_int() {
    let mut bytes = Vec::new();
    for v in [1.5f32, -0.25, f32::MAX] {
        bytes.extend_from_slice(&v.to_ne_bytes());
    }
    let attr = AttributeBuffer::new(bytes, AttributeLayout::packed(AttributeType::Float, 1));
    for (i, v) in [1.5f32, -0.25, f32::MAX].into_iter().enumerate() {
        assert_eq!(
            attr.get::<i32>(i, 0),
            Err(AttributeError::UnsupportedTypeCombination {
                stored: AttributeType::Float,
                requested: ValueKind::Int,
                access: Access::Read,
            })
        );
        assert_eq!(attr.get::<f32>(i, 0).map(f32::to_bits), Ok(v.to_bits()));
    }
}

/// Integers written into float components are stored as the nearest float
#[test]
fn float_from_int() {
    let mut attr = attr(AttributeType::Float, 4, 2);
    attr.set(1, 0, 7).unwrap();
    assert_eq!(attr.get::<f32>(1, 0), Ok(7.0));
    assert_eq!(&attr.as_bytes()[4..], &7.0f32.to_ne_bytes());
}

/// Floats are never narrowed into integer components
#[test]
fn float_into_integer_fails() {
    for ty in [AttributeType::UByte, AttributeType::Int] {
        let mut attr = attr(ty, 4, 2);
        attr.set(0, 0, 3).unwrap();
        let before = attr.as_bytes().to_vec();
        assert_eq!(
            attr.set(0, 0, 1.0f32),
            Err(AttributeError::UnsupportedTypeCombination {
                stored: ty,
                requested: ValueKind::Float,
                access: Access::Write,
            })
        );
        assert_eq!(attr.as_bytes(), before.as_slice());
    }
}

#[test]
fn components_within_stride() {
    let mut attr =
        AttributeBuffer::new(vec![0u8; 24], AttributeLayout::packed(AttributeType::Int, 3));
    for i in 0..2 {
        for c in 0..3 {
            attr.set(i, c, (i * 10 + c) as i32).unwrap();
        }
    }
    assert_eq!(attr.get::<i32>(1, 2), Ok(12));
    assert_eq!(attr.get::<i32>(0, 1), Ok(1));
    assert_eq!(&attr.as_bytes()[12..16], &10i32.to_ne_bytes());
}

/// Two attributes interleaved in one vertex record: a float position and an int id
#[test]
fn interleaved() {
    let mut bytes = [0u8; 32];
    {
        let mut pos = AttributeBuffer::new(
            &mut bytes[..],
            AttributeLayout::new(AttributeType::Float, 16, 3),
        );
        pos.set_element(0, &[1.0f32, 2.0, 3.0]).unwrap();
        pos.set_element(1, &[4.0f32, 5.0, 6.0]).unwrap();
    }
    {
        let mut id = AttributeBuffer::new(
            &mut bytes[12..],
            AttributeLayout::new(AttributeType::Int, 16, 1),
        );
        assert_eq!(id.len(), 2);
        id.set_value(0, 100).unwrap();
        id.set_value(1, 101).unwrap();
    }
    let pos = AttributeBuffer::new(&bytes[..], AttributeLayout::new(AttributeType::Float, 16, 3));
    let id = AttributeBuffer::new(&bytes[12..], AttributeLayout::new(AttributeType::Int, 16, 1));
    assert_eq!(pos.get::<f32>(1, 2), Ok(6.0));
    assert_eq!(pos.get::<f32>(0, 0), Ok(1.0));
    assert_eq!(id.get_value::<i32>(0), Ok(100));
    assert_eq!(id.get_value::<i32>(1), Ok(101));
}

/// Components need not be aligned to their type
#[test]
fn unaligned() {
    let mut bytes = [0u8; 9];
    let mut attr =
        AttributeBuffer::new(&mut bytes[1..], AttributeLayout::packed(AttributeType::Int, 1));
    attr.set_value(1, i32::MIN).unwrap();
    assert_eq!(attr.get_value::<i32>(1), Ok(i32::MIN));
    assert_eq!(&bytes[5..9], &i32::MIN.to_ne_bytes());
}

#[test]
fn out_of_bounds() {
    let mut attr = attr(AttributeType::UByte, 1, 4);
    assert_eq!(
        attr.get::<i32>(4, 0),
        Err(AttributeError::OutOfBounds {
            offset: 4,
            size: 1,
            len: 4
        })
    );
    assert!(attr.set(4, 0, 1).is_err());
    assert_eq!(attr.as_bytes(), &[0, 0, 0, 0]);

    // a component straddling the end of the storage
    let attr = AttributeBuffer::new(vec![0u8; 6], AttributeLayout::packed(AttributeType::Int, 1));
    assert!(attr.get::<i32>(0, 0).is_ok());
    assert!(matches!(
        attr.get::<i32>(1, 0),
        Err(AttributeError::OutOfBounds { offset: 4, .. })
    ));

    assert!(matches!(
        attr.get::<i32>(usize::MAX, 0),
        Err(AttributeError::OutOfBounds { offset: usize::MAX, .. })
    ));
}

/// Type mismatches take precedence over bounds, and never touch memory
#[test]
fn type_checked_before_bounds() {
    let attr = attr(AttributeType::Float, 4, 1);
    assert!(matches!(
        attr.get::<i32>(100, 0),
        Err(AttributeError::UnsupportedTypeCombination { .. })
    ));
}

/// Component indices are not checked against the component count; only the storage bounds
/// matter. What such a read returns is whatever the neighbouring bytes hold.
#[test]
fn component_count_not_enforced() {
    let attr = AttributeBuffer::new(vec![0u8; 8], AttributeLayout::new(AttributeType::Int, 4, 1));
    assert!(attr.get::<i32>(0, 1).is_ok());
}

#[test]
fn unchecked() {
    let mut attr = attr(AttributeType::Int, 8, 2);
    unsafe {
        attr.set_unchecked(1, 1, 42).unwrap();
        assert_eq!(attr.get_unchecked::<i32>(1, 1), Ok(42));
        assert_eq!(attr.get_unchecked::<f32>(1, 1), Ok(42.0));
        // type mismatches still fail
        assert!(attr.set_unchecked(0, 0, 1.0f32).is_err());
    }
    assert_eq!(&attr.as_bytes()[12..16], &42i32.to_ne_bytes());

    let mut attr = AttributeBuffer::new(
        vec![7u8; 4],
        AttributeLayout::new(AttributeType::Unknown, 4, 1),
    );
    // an unknown attribute never dereferences, so even a dangling index is fine
    assert!(unsafe { attr.get_unchecked::<f32>(1000, 7) }.is_err());
    assert_eq!(
        unsafe { attr.set_unchecked(1000, 7, 1) },
        Err(AttributeError::UnsupportedTypeCombination {
            stored: AttributeType::Unknown,
            requested: ValueKind::Int,
            access: Access::Write,
        })
    );
    assert!(unsafe { attr.set_unchecked(0, 0, 1.0f32) }.is_err());
    assert_eq!(attr.as_bytes(), &[7u8; 4]);
}

/// The readability and writability tables agree with what get/set actually do
#[test]
fn checks_agree_with_access() {
    use mfx_attribute::AttributeValue;

    for ty in [
        AttributeType::Unknown,
        AttributeType::UByte,
        AttributeType::Int,
        AttributeType::Float,
    ] {
        let mut attr = attr(ty, 4, 1);
        assert_eq!(i32::readable_from(ty), attr.get::<i32>(0, 0).is_ok(), "{ty}");
        assert_eq!(f32::readable_from(ty), attr.get::<f32>(0, 0).is_ok(), "{ty}");
        assert_eq!(i32::writable_to(ty), attr.set(0, 0, 1).is_ok(), "{ty}");
        assert_eq!(f32::writable_to(ty), attr.set(0, 0, 1.0f32).is_ok(), "{ty}");
        unsafe {
            assert_eq!(i32::readable_from(ty), attr.get_unchecked::<i32>(0, 0).is_ok(), "{ty}");
            assert_eq!(f32::writable_to(ty), attr.set_unchecked(0, 0, 2.0f32).is_ok(), "{ty}");
        }
    }
}
