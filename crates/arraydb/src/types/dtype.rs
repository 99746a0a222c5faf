use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};

use crate::{ByteOrder, Element, Error, ListValue, Result};

/// Numeric family of an element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Signed integer, `i` in dtype strings.
    Int,
    /// Unsigned integer, `u` in dtype strings.
    UInt,
    /// IEEE 754 float, `f` in dtype strings.
    Float,
}

impl Kind {
    #[inline]
    pub fn code(self) -> char {
        match self {
            Self::Int => 'i',
            Self::UInt => 'u',
            Self::Float => 'f',
        }
    }

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'i' => Some(Self::Int),
            'u' => Some(Self::UInt),
            'f' => Some(Self::Float),
            _ => None,
        }
    }

    /// Item sizes in bytes this kind supports.
    pub fn item_sizes(self) -> &'static [usize] {
        match self {
            Self::Int | Self::UInt => &[1, 2, 4, 8],
            Self::Float => &[4, 8],
        }
    }
}

/// Element type of a flat array: kind, item size and byte order.
///
/// The wire form is the numpy-style string `"<order><kind><itemsize>"`, for
/// instance `">u2"` or `"<f8"`. Single-byte types have no meaningful byte
/// order; they are rendered with `|` and always compare equal regardless of
/// the order they were built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DType {
    kind: Kind,
    itemsize: usize,
    order: ByteOrder,
}

impl DType {
    pub fn new(kind: Kind, itemsize: usize, order: ByteOrder) -> Result<Self> {
        if !kind.item_sizes().contains(&itemsize) {
            return Err(Error::InvalidDType(format!(
                "{}{}{itemsize}",
                order.code(),
                kind.code()
            )));
        }
        let order = if itemsize == 1 {
            ByteOrder::NATIVE
        } else {
            order
        };
        Ok(Self {
            kind,
            itemsize,
            order,
        })
    }

    /// The dtype matching element type `T` in the given byte order.
    pub fn of<T: Element>(order: ByteOrder) -> Self {
        Self {
            kind: T::KIND,
            itemsize: T::SIZE,
            order: if T::SIZE == 1 { ByteOrder::NATIVE } else { order },
        }
    }

    #[inline]
    pub fn kind(&self) -> Kind {
        self.kind
    }

    #[inline]
    pub fn itemsize(&self) -> usize {
        self.itemsize
    }

    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.order
    }

    /// Same kind and size in another byte order.
    pub fn with_byte_order(self, order: ByteOrder) -> Self {
        Self {
            order: if self.itemsize == 1 {
                ByteOrder::NATIVE
            } else {
                order
            },
            ..self
        }
    }

    #[inline]
    pub fn is_integer(&self) -> bool {
        matches!(self.kind, Kind::Int | Kind::UInt)
    }

    /// Whether values of type `T` can be read from or written to this dtype.
    #[inline]
    pub fn holds<T: Element>(&self) -> bool {
        self.kind == T::KIND && self.itemsize == T::SIZE
    }

    /// Decodes the single element stored in `bytes`.
    pub fn read_value(&self, bytes: &[u8]) -> Result<ListValue> {
        let order = self.order;
        Ok(match (self.kind, self.itemsize) {
            (Kind::UInt, 1) => u8::read_bytes(bytes, order)?.into(),
            (Kind::UInt, 2) => u16::read_bytes(bytes, order)?.into(),
            (Kind::UInt, 4) => u32::read_bytes(bytes, order)?.into(),
            (Kind::UInt, 8) => u64::read_bytes(bytes, order)?.into(),
            (Kind::Int, 1) => i8::read_bytes(bytes, order)?.into(),
            (Kind::Int, 2) => i16::read_bytes(bytes, order)?.into(),
            (Kind::Int, 4) => i32::read_bytes(bytes, order)?.into(),
            (Kind::Int, 8) => i64::read_bytes(bytes, order)?.into(),
            (Kind::Float, 4) => f32::read_bytes(bytes, order)?.into(),
            (Kind::Float, 8) => f64::read_bytes(bytes, order)?.into(),
            _ => return Err(Error::InvalidDType(self.to_string())),
        })
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = if self.itemsize == 1 {
            '|'
        } else {
            self.order.code()
        };
        write!(f, "{order}{}{}", self.kind.code(), self.itemsize)
    }
}

impl FromStr for DType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidDType(s.to_owned());

        let mut chars = s.chars();
        let order = chars
            .next()
            .and_then(ByteOrder::from_code)
            .ok_or_else(invalid)?;
        let kind = chars.next().and_then(Kind::from_code).ok_or_else(invalid)?;
        let digits = chars.as_str();
        if !digits.bytes().all(|b| b.is_ascii_digit()) || digits.starts_with('0') {
            return Err(invalid());
        }
        let itemsize = digits.parse::<usize>().map_err(|_| invalid())?;

        Self::new(kind, itemsize, order).map_err(|_| invalid())
    }
}

impl Serialize for DType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
