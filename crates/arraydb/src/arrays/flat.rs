use crate::{ByteOrder, DType, Element, Error, ListValue, Result, unlikely};

/// Rectangular buffer of fixed-size elements.
///
/// The payload always holds exactly `product(shape) * dtype.itemsize()` bytes.
/// Zero-sized dimensions are allowed and yield an empty payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlatArray {
    dtype: DType,
    shape: Vec<usize>,
    data: Vec<u8>,
}

impl FlatArray {
    pub fn new(dtype: DType, shape: impl Into<Vec<usize>>, data: Vec<u8>) -> Result<Self> {
        let shape = shape.into();
        let expected = Self::byte_len(dtype, &shape)?;
        if unlikely(data.len() != expected) {
            return Err(Error::PayloadSizeMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self { dtype, shape, data })
    }

    /// Encodes `values` in `order` and lays them out with `shape`.
    pub fn from_values<T: Element>(
        values: &[T],
        shape: impl Into<Vec<usize>>,
        order: ByteOrder,
    ) -> Result<Self> {
        let mut data = Vec::with_capacity(values.len() * T::SIZE);
        values
            .iter()
            .for_each(|value| value.write_bytes(order, &mut data));
        Self::new(DType::of::<T>(order), shape, data)
    }

    /// One-dimensional array in native byte order.
    pub fn from_vec<T: Element>(values: Vec<T>) -> Self {
        let mut data = Vec::with_capacity(values.len() * T::SIZE);
        values
            .iter()
            .for_each(|value| value.write_bytes(ByteOrder::NATIVE, &mut data));
        Self {
            dtype: DType::of::<T>(ByteOrder::NATIVE),
            shape: vec![values.len()],
            data,
        }
    }

    /// Number of payload bytes a `dtype` array of `shape` occupies.
    ///
    /// Zero-sized dimensions empty the payload but not the nesting of the
    /// axes before them, which [`to_list`](Self::to_list) still builds. The
    /// shape is therefore also bounded with every zero counted as one: that
    /// extent must stay addressable (`isize::MAX` bytes).
    pub fn byte_len(dtype: DType, shape: &[usize]) -> Result<usize> {
        let extent = shape
            .iter()
            .try_fold(dtype.itemsize(), |acc, &dim| acc.checked_mul(dim.max(1)))
            .filter(|&extent| extent <= isize::MAX as usize)
            .ok_or_else(|| Error::InvariantViolation(format!("shape {shape:?} overflows")))?;
        Ok(if shape.contains(&0) { 0 } else { extent })
    }

    #[inline]
    pub fn dtype(&self) -> DType {
        self.dtype
    }

    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Total number of elements.
    #[inline]
    pub fn size(&self) -> usize {
        self.shape.iter().product()
    }

    /// Length of the first axis, `None` for a zero-dimensional array.
    #[inline]
    pub fn len(&self) -> Option<usize> {
        self.shape.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    /// Same values laid out with a different shape of equal size.
    pub fn reshape(self, shape: impl Into<Vec<usize>>) -> Result<Self> {
        Self::new(self.dtype, shape, self.data)
    }

    /// Same values re-encoded in `order`.
    pub fn to_byte_order(&self, order: ByteOrder) -> Self {
        let itemsize = self.dtype.itemsize();
        if itemsize == 1 || self.dtype.byte_order() == order {
            return self.clone();
        }
        let mut data = self.data.clone();
        data.chunks_exact_mut(itemsize).for_each(<[u8]>::reverse);
        Self {
            dtype: self.dtype.with_byte_order(order),
            shape: self.shape.clone(),
            data,
        }
    }

    /// Decodes every element as `T`, converting from the stored byte order.
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        if unlikely(!self.dtype.holds::<T>()) {
            return Err(Error::DTypeMismatch {
                expected: DType::of::<T>(self.dtype.byte_order()).to_string(),
                found: self.dtype.to_string(),
            });
        }
        let order = self.dtype.byte_order();
        self.data
            .chunks_exact(T::SIZE)
            .map(|chunk| T::read_bytes(chunk, order))
            .collect()
    }

    /// Element at flat (row-major) position `index`.
    pub fn scalar(&self, index: usize) -> Result<ListValue> {
        let itemsize = self.dtype.itemsize();
        let start = index * itemsize;
        let bytes = self.data.get(start..start + itemsize).ok_or_else(|| {
            Error::InvariantViolation(format!(
                "element {index} out of bounds for {} elements",
                self.size()
            ))
        })?;
        self.dtype.read_value(bytes)
    }

    /// Element `index` along the first axis: a scalar for 1-D arrays, a
    /// nested list for higher dimensions.
    pub fn get(&self, index: usize) -> Result<Option<ListValue>> {
        let Some((&len, inner)) = self.shape.split_first() else {
            return Ok(None);
        };
        if index >= len {
            return Ok(None);
        }
        let stride: usize = inner.iter().product();
        self.nest(inner, index * stride).map(Some)
    }

    /// Nested-list rendering following the shape.
    pub fn to_list(&self) -> Result<ListValue> {
        self.nest(&self.shape, 0)
    }

    fn nest(&self, dims: &[usize], start: usize) -> Result<ListValue> {
        let Some((&len, inner)) = dims.split_first() else {
            return self.scalar(start);
        };
        let stride: usize = inner.iter().product();
        (0..len)
            .map(|i| self.nest(inner, start + i * stride))
            .collect::<Result<Vec<_>>>()
            .map(ListValue::List)
    }

    /// Logical equality: same shape and element values, regardless of byte order.
    pub fn values_eq(&self, other: &Self) -> bool {
        self.shape == other.shape
            && self.dtype.kind() == other.dtype.kind()
            && self.dtype.itemsize() == other.dtype.itemsize()
            && other.to_byte_order(self.dtype.byte_order()).data == self.data
    }

    /// Elements of an integer array widened to `i128`.
    pub(crate) fn integer_values(&self) -> Result<Vec<i128>> {
        if unlikely(!self.dtype.is_integer()) {
            return Err(Error::InvariantViolation(format!(
                "expected an integer array, found {}",
                self.dtype
            )));
        }
        let itemsize = self.dtype.itemsize();
        self.data
            .chunks_exact(itemsize)
            .map(|chunk| {
                self.dtype.read_value(chunk).and_then(|value| {
                    value.as_integer().ok_or_else(|| {
                        Error::InvariantViolation(format!("{value:?} is not an integer"))
                    })
                })
            })
            .collect()
    }
}
