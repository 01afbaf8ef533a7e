//! Byte storage backing an [AttributeBuffer](crate::AttributeBuffer).
//!
//! Whether an attribute owns its data is a property of the storage type: owning storage is
//! released when the attribute is dropped, borrowed storage is left to whoever lent it.

/// Readable attribute storage.
pub trait AttributeStorage {
    /// Whether dropping this storage releases the underlying bytes.
    const OWNING: bool;

    fn bytes(&self) -> &[u8];
}

/// Writable attribute storage.
pub trait AttributeStorageMut: AttributeStorage {
    fn bytes_mut(&mut self) -> &mut [u8];
}

impl AttributeStorage for Vec<u8> {
    const OWNING: bool = true;

    #[inline(always)]
    fn bytes(&self) -> &[u8] {
        self.as_slice()
    }
}

impl AttributeStorageMut for Vec<u8> {
    #[inline(always)]
    fn bytes_mut(&mut self) -> &mut [u8] {
        self.as_mut_slice()
    }
}

impl AttributeStorage for Box<[u8]> {
    const OWNING: bool = true;

    #[inline(always)]
    fn bytes(&self) -> &[u8] {
        self
    }
}

impl AttributeStorageMut for Box<[u8]> {
    #[inline(always)]
    fn bytes_mut(&mut self) -> &mut [u8] {
        self
    }
}

impl AttributeStorage for &[u8] {
    const OWNING: bool = false;

    #[inline(always)]
    fn bytes(&self) -> &[u8] {
        self
    }
}

impl AttributeStorage for &mut [u8] {
    const OWNING: bool = false;

    #[inline(always)]
    fn bytes(&self) -> &[u8] {
        self
    }
}

impl AttributeStorageMut for &mut [u8] {
    #[inline(always)]
    fn bytes_mut(&mut self) -> &mut [u8] {
        self
    }
}
