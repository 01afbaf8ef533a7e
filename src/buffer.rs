use nalgebra::SVector;

use crate::{error::AttributeError, AttributeType, AttributeValue};

pub(crate) mod raw;
pub mod storage;
pub use storage::*;

/// Metadata describing how an attribute's components are laid out in its storage.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttributeLayout {
    pub ty: AttributeType,
    /// Distance in bytes between the starts of consecutive elements
    pub stride: usize,
    /// Number of components per element. Informational; component indices are not checked
    /// against it.
    pub component_count: usize,
}

impl AttributeLayout {
    #[inline]
    pub const fn new(ty: AttributeType, stride: usize, component_count: usize) -> Self {
        Self {
            ty,
            stride,
            component_count,
        }
    }

    /// A layout with no padding between elements. The stride saturates at `usize::MAX`.
    #[inline]
    pub const fn packed(ty: AttributeType, component_count: usize) -> Self {
        Self::new(ty, ty.size().saturating_mul(component_count), component_count)
    }

    /// Size in bytes of the components of a single element, saturating at `usize::MAX`.
    #[inline]
    pub const fn element_size(&self) -> usize {
        self.ty.size().saturating_mul(self.component_count)
    }
}

/// Typed, strided access to the components of a mesh attribute, with the component type decided
/// at runtime.
///
/// An attribute either borrows its bytes ([AttributeView], [AttributeViewMut]) or owns them
/// ([OwnedAttribute]); see [AttributeBuffer::is_owner].
#[derive(Debug, Default, Clone)]
pub struct AttributeBuffer<S> {
    storage: S,
    layout: AttributeLayout,
}

/// A read-only attribute over borrowed bytes.
pub type AttributeView<'data> = AttributeBuffer<&'data [u8]>;
/// A writable attribute over borrowed bytes.
pub type AttributeViewMut<'data> = AttributeBuffer<&'data mut [u8]>;
/// An attribute which owns its bytes.
pub type OwnedAttribute = AttributeBuffer<Vec<u8>>;

impl<S: AttributeStorage> AttributeBuffer<S> {
    pub fn new(storage: S, layout: AttributeLayout) -> Self {
        tracing::trace!(
            ty = %layout.ty,
            stride = layout.stride,
            component_count = layout.component_count,
            len_bytes = storage.bytes().len(),
            owning = S::OWNING,
            "constructing attribute buffer"
        );
        Self { storage, layout }
    }

    #[inline(always)]
    pub fn layout(&self) -> AttributeLayout {
        self.layout
    }

    #[inline(always)]
    pub fn attr_type(&self) -> AttributeType {
        self.layout.ty
    }

    #[inline(always)]
    pub fn stride(&self) -> usize {
        self.layout.stride
    }

    #[inline(always)]
    pub fn component_count(&self) -> usize {
        self.layout.component_count
    }

    /// Whether this attribute is responsible for releasing its storage.
    #[inline(always)]
    pub fn is_owner(&self) -> bool {
        S::OWNING
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.storage.bytes()
    }

    #[inline]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Give up the attribute, returning its storage to the caller.
    #[inline]
    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Point the attribute at new storage, returning the old one. The layout is kept.
    pub fn replace_storage(&mut self, storage: S) -> S {
        tracing::trace!(
            len_bytes = storage.bytes().len(),
            owning = S::OWNING,
            "replacing attribute storage"
        );
        std::mem::replace(&mut self.storage, storage)
    }

    pub fn set_layout(&mut self, layout: AttributeLayout) {
        tracing::trace!(
            from = ?self.layout,
            to = ?layout,
            "relayout attribute buffer"
        );
        self.layout = layout;
    }

    #[inline]
    pub fn set_type(&mut self, ty: AttributeType) {
        self.set_layout(AttributeLayout { ty, ..self.layout });
    }

    #[inline]
    pub fn set_stride(&mut self, stride: usize) {
        self.set_layout(AttributeLayout {
            stride,
            ..self.layout
        });
    }

    #[inline]
    pub fn set_component_count(&mut self, component_count: usize) {
        self.set_layout(AttributeLayout {
            component_count,
            ..self.layout
        });
    }

    /// Number of whole elements held by the storage.
    pub fn len(&self) -> usize {
        let AttributeLayout { ty, stride, .. } = self.layout;
        if !ty.is_known() || stride == 0 {
            return 0;
        }
        let footprint = self.layout.element_size().max(ty.size());
        match self.as_bytes().len().checked_sub(footprint) {
            Some(rest) => rest / stride + 1,
            None => 0,
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Byte offset of a component within the storage, if the whole component fits.
    pub fn component_offset(
        &self,
        index: usize,
        component: usize,
    ) -> Result<usize, AttributeError> {
        let size = self.layout.ty.size();
        let len = self.as_bytes().len();
        let out_of_bounds = |offset| AttributeError::OutOfBounds { offset, size, len };
        let offset = index
            .checked_mul(self.layout.stride)
            .and_then(|base| base.checked_add(component.checked_mul(size)?))
            .ok_or_else(|| out_of_bounds(usize::MAX))?;
        match offset.checked_add(size) {
            Some(end) if end <= len => Ok(offset),
            _ => Err(out_of_bounds(offset)),
        }
    }

    /// Unchecked byte offset of a component; wraps on overflow.
    #[inline(always)]
    fn raw_offset(&self, index: usize, component: usize) -> usize {
        index
            .wrapping_mul(self.layout.stride)
            .wrapping_add(component.wrapping_mul(self.layout.ty.size()))
    }

    /// Read a component as `V`.
    ///
    /// Fails if the attribute's type cannot be read as `V`, or if the component lies outside the
    /// storage. `component` is not checked against [Self::component_count].
    #[allow(unsafe_code)]
    pub fn get<V: AttributeValue>(
        &self,
        index: usize,
        component: usize,
    ) -> Result<V, AttributeError> {
        let ty = self.layout.ty;
        V::check_read(ty)?;
        let offset = self.component_offset(index, component)?;
        // safety: component_offset guarantees offset + ty.size() <= len
        unsafe { V::load(ty, self.as_bytes().as_ptr().add(offset)) }
    }

    /// Read the first component of an element as `V`.
    #[inline]
    pub fn get_value<V: AttributeValue>(&self, index: usize) -> Result<V, AttributeError> {
        self.get(index, 0)
    }

    /// Read a component as `V` without bounds checks.
    ///
    /// Type mismatches still fail, without touching memory.
    ///
    /// # Safety
    ///
    /// * `index * stride + (component + 1) * size` must not exceed the storage length
    #[allow(unsafe_code)]
    pub unsafe fn get_unchecked<V: AttributeValue>(
        &self,
        index: usize,
        component: usize,
    ) -> Result<V, AttributeError> {
        let ptr = self
            .as_bytes()
            .as_ptr()
            .wrapping_add(self.raw_offset(index, component));
        unsafe { V::load(self.layout.ty, ptr) }
    }

    /// Read all [Self::component_count] components of an element.
    pub fn get_element<V: AttributeValue>(&self, index: usize) -> Result<Vec<V>, AttributeError> {
        V::check_read(self.layout.ty)?;
        (0..self.layout.component_count)
            .map(|c| self.get(index, c))
            .collect()
    }

    /// Read the first `N` components of an element as a vector.
    pub fn get_vector<V: AttributeValue, const N: usize>(
        &self,
        index: usize,
    ) -> Result<SVector<V, N>, AttributeError> {
        let mut res = [V::default(); N];
        for (c, slot) in res.iter_mut().enumerate() {
            *slot = self.get(index, c)?;
        }
        Ok(SVector::from(res))
    }

    /// Borrow this attribute as a read-only view.
    #[inline]
    pub fn view(&self) -> AttributeView<'_> {
        AttributeBuffer {
            storage: self.storage.bytes(),
            layout: self.layout,
        }
    }
}

impl<S: AttributeStorageMut> AttributeBuffer<S> {
    #[inline]
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.storage.bytes_mut()
    }

    /// Write `value` into a component.
    ///
    /// Fails if `V` cannot be written into the attribute's type, or if the component lies outside
    /// the storage; the storage is left untouched in either case. `component` is not checked
    /// against [Self::component_count].
    #[allow(unsafe_code)]
    pub fn set<V: AttributeValue>(
        &mut self,
        index: usize,
        component: usize,
        value: V,
    ) -> Result<(), AttributeError> {
        let ty = self.layout.ty;
        V::check_write(ty)?;
        let offset = self.component_offset(index, component)?;
        // safety: component_offset guarantees offset + ty.size() <= len
        unsafe { value.store(ty, self.as_bytes_mut().as_mut_ptr().add(offset)) }
    }

    /// Write `value` into the first component of an element.
    #[inline]
    pub fn set_value<V: AttributeValue>(
        &mut self,
        index: usize,
        value: V,
    ) -> Result<(), AttributeError> {
        self.set(index, 0, value)
    }

    /// Write `value` into a component without bounds checks.
    ///
    /// Type mismatches still fail, without touching memory.
    ///
    /// # Safety
    ///
    /// * `index * stride + (component + 1) * size` must not exceed the storage length
    #[allow(unsafe_code)]
    pub unsafe fn set_unchecked<V: AttributeValue>(
        &mut self,
        index: usize,
        component: usize,
        value: V,
    ) -> Result<(), AttributeError> {
        let ty = self.layout.ty;
        let offset = self.raw_offset(index, component);
        let ptr = self.as_bytes_mut().as_mut_ptr().wrapping_add(offset);
        unsafe { value.store(ty, ptr) }
    }

    /// Write `values` into components `0..values.len()` of an element.
    ///
    /// Nothing is written unless every value fits.
    pub fn set_element<V: AttributeValue>(
        &mut self,
        index: usize,
        values: &[V],
    ) -> Result<(), AttributeError> {
        V::check_write(self.layout.ty)?;
        let Some(last) = values.len().checked_sub(1) else {
            return Ok(());
        };
        self.component_offset(index, last)?;
        for (c, value) in values.iter().enumerate() {
            self.set(index, c, *value)?;
        }
        Ok(())
    }

    /// Borrow this attribute as a writable view.
    #[inline]
    pub fn view_mut(&mut self) -> AttributeViewMut<'_> {
        AttributeBuffer {
            layout: self.layout,
            storage: self.storage.bytes_mut(),
        }
    }

    /// Copy elements `start..start + count` of `src` into the same elements of `self`.
    ///
    /// Components `0..min(self.component_count(), src.component_count())` are copied. Values
    /// travel as `f32` when `self` is [AttributeType::Float] and as `i32` otherwise, so e.g.
    /// copying a float attribute into an integer one fails. Nothing is written unless the whole
    /// range can be copied.
    pub fn copy_from<T: AttributeStorage>(
        &mut self,
        src: &AttributeBuffer<T>,
        start: usize,
        count: usize,
    ) -> Result<(), AttributeError> {
        match self.layout.ty {
            AttributeType::Float => self.copy_as::<f32, T>(src, start, count),
            _ => self.copy_as::<i32, T>(src, start, count),
        }
    }

    #[tracing::instrument(
        level = "trace",
        skip(self, src),
        fields(from = %src.attr_type(), to = %self.attr_type())
    )]
    fn copy_as<V: AttributeValue, T: AttributeStorage>(
        &mut self,
        src: &AttributeBuffer<T>,
        start: usize,
        count: usize,
    ) -> Result<(), AttributeError> {
        V::check_write(self.layout.ty)?;
        V::check_read(src.layout.ty)?;
        let components = self.layout.component_count.min(src.layout.component_count);
        if count == 0 || components == 0 {
            return Ok(());
        }
        // offsets grow with both index and component, so the last component bounds the range
        let last = start
            .checked_add(count - 1)
            .ok_or(AttributeError::OutOfBounds {
                offset: usize::MAX,
                size: self.layout.ty.size(),
                len: self.as_bytes().len(),
            })?;
        src.component_offset(last, components - 1)?;
        self.component_offset(last, components - 1)?;

        for index in start..=last {
            for c in 0..components {
                let value: V = src.get(index, c)?;
                self.set(index, c, value)?;
            }
        }
        tracing::trace!(count, components, "copied attribute elements");
        Ok(())
    }
}
