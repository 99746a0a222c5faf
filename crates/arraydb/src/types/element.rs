use std::fmt::Debug;

use crate::{ByteOrder, Error, Kind, ListValue, Result};

/// Fixed-size numeric element that can live in a [`FlatArray`](crate::FlatArray).
pub trait Element: Sized + Copy + Debug + PartialEq + Send + Sync + Into<ListValue> + 'static {
    const KIND: Kind;
    /// Size in bytes of one serialized element.
    const SIZE: usize;

    /// Appends the element to `buf` in the given byte order.
    fn write_bytes(self, order: ByteOrder, buf: &mut Vec<u8>);

    /// Reads one element from exactly `SIZE` bytes.
    fn read_bytes(bytes: &[u8], order: ByteOrder) -> Result<Self>;
}

macro_rules! impl_element_for_numeric {
    ($($t:ty => $kind:expr),*) => {
        $(
            impl Element for $t {
                const KIND: Kind = $kind;
                const SIZE: usize = std::mem::size_of::<$t>();

                #[inline]
                fn write_bytes(self, order: ByteOrder, buf: &mut Vec<u8>) {
                    match order {
                        ByteOrder::Little => buf.extend_from_slice(&self.to_le_bytes()),
                        ByteOrder::Big => buf.extend_from_slice(&self.to_be_bytes()),
                    }
                }

                #[inline]
                fn read_bytes(bytes: &[u8], order: ByteOrder) -> Result<Self> {
                    let arr: [u8; std::mem::size_of::<$t>()] =
                        bytes.try_into().map_err(|_| Error::PayloadSizeMismatch {
                            expected: Self::SIZE,
                            actual: bytes.len(),
                        })?;
                    Ok(match order {
                        ByteOrder::Little => <$t>::from_le_bytes(arr),
                        ByteOrder::Big => <$t>::from_be_bytes(arr),
                    })
                }
            }
        )*
    };
}

impl_element_for_numeric!(
    u8 => Kind::UInt,
    u16 => Kind::UInt,
    u32 => Kind::UInt,
    u64 => Kind::UInt,
    i8 => Kind::Int,
    i16 => Kind::Int,
    i32 => Kind::Int,
    i64 => Kind::Int,
    f32 => Kind::Float,
    f64 => Kind::Float
);
