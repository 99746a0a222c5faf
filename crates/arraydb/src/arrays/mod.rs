mod flat;
mod jagged;
mod list;

pub use flat::*;
pub use jagged::*;
pub use list::*;

use crate::Result;

/// An array value the serializer knows how to persist.
///
/// One variant per structural kind. Codecs are chosen by inspecting the
/// variant, see [`CodecRegistry`](crate::CodecRegistry).
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Array {
    Flat(FlatArray),
    Jagged(JaggedArray),
}

impl Array {
    /// Short name of the structural kind, used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Flat(_) => "flat",
            Self::Jagged(_) => "jagged",
        }
    }

    /// Length along the outermost axis, `None` for zero-dimensional arrays.
    pub fn len(&self) -> Option<usize> {
        match self {
            Self::Flat(flat) => flat.len(),
            Self::Jagged(jagged) => Some(jagged.len()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    /// Element `index` along the outermost axis.
    pub fn get(&self, index: usize) -> Result<Option<ListValue>> {
        match self {
            Self::Flat(flat) => flat.get(index),
            Self::Jagged(jagged) => jagged.get(index),
        }
    }

    /// Nested-list rendering of the whole array.
    pub fn to_list(&self) -> Result<ListValue> {
        match self {
            Self::Flat(flat) => flat.to_list(),
            Self::Jagged(jagged) => jagged.to_list(),
        }
    }

    pub fn as_flat(&self) -> Option<&FlatArray> {
        match self {
            Self::Flat(flat) => Some(flat),
            _ => None,
        }
    }

    pub fn as_jagged(&self) -> Option<&JaggedArray> {
        match self {
            Self::Jagged(jagged) => Some(jagged),
            _ => None,
        }
    }
}

impl From<FlatArray> for Array {
    fn from(value: FlatArray) -> Self {
        Self::Flat(value)
    }
}

impl From<JaggedArray> for Array {
    fn from(value: JaggedArray) -> Self {
        Self::Jagged(value)
    }
}
