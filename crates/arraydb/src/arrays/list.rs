/// Nested-list view of an array, the structural equality used by round trips.
///
/// Integers keep their signedness; floats are widened to `f64`.
#[derive(Debug, Clone, PartialEq)]
pub enum ListValue {
    Int(i64),
    UInt(u64),
    Float(f64),
    List(Vec<ListValue>),
}

impl ListValue {
    pub fn as_list(&self) -> Option<&[ListValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Integer value widened to `i128`, `None` for floats and lists.
    pub fn as_integer(&self) -> Option<i128> {
        match *self {
            Self::Int(v) => Some(v as i128),
            Self::UInt(v) => Some(v as i128),
            _ => None,
        }
    }
}

macro_rules! impl_from_for_list_value {
    ($variant:ident as $wide:ty: $($t:ty),*) => {
        $(
            impl From<$t> for ListValue {
                #[inline]
                fn from(value: $t) -> Self {
                    Self::$variant(value as $wide)
                }
            }
        )*
    };
}

impl_from_for_list_value!(UInt as u64: u8, u16, u32, u64);
impl_from_for_list_value!(Int as i64: i8, i16, i32, i64);
impl_from_for_list_value!(Float as f64: f32, f64);

impl<T> From<Vec<T>> for ListValue
where
    T: Into<ListValue>,
{
    fn from(values: Vec<T>) -> Self {
        Self::List(values.into_iter().map(Into::into).collect())
    }
}
