use std::fmt;

/// Byte order of the elements in a raw payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// `<` in dtype strings.
    Little,
    /// `>` in dtype strings.
    Big,
}

impl ByteOrder {
    #[cfg(target_endian = "little")]
    pub const NATIVE: Self = Self::Little;
    #[cfg(target_endian = "big")]
    pub const NATIVE: Self = Self::Big;

    #[inline]
    pub fn code(self) -> char {
        match self {
            Self::Little => '<',
            Self::Big => '>',
        }
    }

    /// Parses a dtype byte-order prefix. `=` resolves to [`ByteOrder::NATIVE`].
    ///
    /// `|` is accepted too and also yields the native order; it only appears on
    /// single-byte dtypes, where the order carries no information.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            '<' => Some(Self::Little),
            '>' => Some(Self::Big),
            '=' | '|' => Some(Self::NATIVE),
            _ => None,
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
