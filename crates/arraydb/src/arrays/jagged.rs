use crate::{Array, ByteOrder, Element, Error, FlatArray, ListValue, Result, unlikely};

/// Variable-length sequence of variable-length sequences.
///
/// Row `i` is `content[offsets[i]..offsets[i + 1]]`. `offsets` is a 1-D
/// integer array starting at 0, non-decreasing, whose last value does not
/// exceed the length of `content`. `content` may itself be jagged.
#[derive(Debug, Clone, PartialEq)]
pub struct JaggedArray {
    offsets: FlatArray,
    content: Box<Array>,
    bounds: Vec<usize>,
}

impl JaggedArray {
    pub fn new(offsets: FlatArray, content: impl Into<Array>) -> Result<Self> {
        let content = content.into();
        let bounds = Self::validate(&offsets, &content)?;
        Ok(Self {
            offsets,
            content: Box::new(content),
            bounds,
        })
    }

    /// Builds a jagged array from rows of elements.
    ///
    /// Offsets are `i64` and content is one-dimensional, both in native byte
    /// order.
    pub fn from_rows<I, R, T>(rows: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = T>,
        T: Element,
    {
        let mut values = Vec::new();
        let mut bounds = vec![0];
        for row in rows {
            values.extend(row);
            bounds.push(values.len());
        }
        let offsets = FlatArray::from_vec(bounds.iter().map(|&b| b as i64).collect());
        Self {
            offsets,
            content: Box::new(FlatArray::from_vec(values).into()),
            bounds,
        }
    }

    fn validate(offsets: &FlatArray, content: &Array) -> Result<Vec<usize>> {
        if unlikely(offsets.ndim() != 1) {
            return Err(Error::InvariantViolation(format!(
                "offsets must be one-dimensional, got shape {:?}",
                offsets.shape()
            )));
        }
        let values = offsets.integer_values()?;
        let Some(&first) = values.first() else {
            return Err(Error::InvariantViolation(
                "offsets must hold at least one value".to_string(),
            ));
        };
        if unlikely(first != 0) {
            return Err(Error::InvariantViolation(format!(
                "offsets must start at 0, got {first}"
            )));
        }
        if let Some(i) = values.windows(2).position(|w| w[1] < w[0]) {
            return Err(Error::InvariantViolation(format!(
                "offsets decrease at index {}: {} > {}",
                i + 1,
                values[i],
                values[i + 1]
            )));
        }
        let Some(content_len) = content.len() else {
            return Err(Error::InvariantViolation(
                "content must have at least one dimension".to_string(),
            ));
        };
        // Non-decreasing from 0, so the last value is the maximum.
        let last = values[values.len() - 1];
        if unlikely(last > content_len as i128) {
            return Err(Error::InvariantViolation(format!(
                "final offset {last} exceeds content length {content_len}"
            )));
        }
        Ok(values.into_iter().map(|v| v as usize).collect())
    }

    #[inline]
    pub fn offsets(&self) -> &FlatArray {
        &self.offsets
    }

    #[inline]
    pub fn content(&self) -> &Array {
        &self.content
    }

    /// Number of rows.
    #[inline]
    pub fn len(&self) -> usize {
        self.bounds.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of elements in each row.
    pub fn counts(&self) -> Vec<usize> {
        self.bounds.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Row `index` as a list, `None` past the end.
    pub fn get(&self, index: usize) -> Result<Option<ListValue>> {
        if index >= self.len() {
            return Ok(None);
        }
        let (start, stop) = (self.bounds[index], self.bounds[index + 1]);
        (start..stop)
            .map(|i| {
                self.content.get(i)?.ok_or_else(|| {
                    Error::InvariantViolation(format!("content has no element {i}"))
                })
            })
            .collect::<Result<Vec<_>>>()
            .map(|row| Some(ListValue::List(row)))
    }

    pub fn to_list(&self) -> Result<ListValue> {
        (0..self.len())
            .filter_map(|i| self.get(i).transpose())
            .collect::<Result<Vec<_>>>()
            .map(ListValue::List)
    }

    /// Same rows with offsets and content re-encoded in `order`.
    pub fn to_byte_order(&self, order: ByteOrder) -> Self {
        let content = match &*self.content {
            Array::Flat(flat) => Array::Flat(flat.to_byte_order(order)),
            Array::Jagged(jagged) => Array::Jagged(jagged.to_byte_order(order)),
        };
        Self {
            offsets: self.offsets.to_byte_order(order),
            content: Box::new(content),
            bounds: self.bounds.clone(),
        }
    }
}
