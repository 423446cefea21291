//! Four-state logic values
//!
//! Simulated signals can be unknown (`X`) or floating (`Z`) as well as
//! `0` or `1`. Every consumer in this workspace normalizes indeterminate
//! values to `0` before interpreting them; this is a policy, not an error.

/// Maximum width of a logic vector that [`parse_word`] accepts
pub const MAX_WORD_BITS: usize = 32;

/// A single sampled logic value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Logic {
    /// Driven low
    Low,
    /// Driven high
    #[default]
    High,
    /// Unknown (`X`)
    Unknown,
    /// High impedance (`Z`)
    HighZ,
}

/// Errors from parsing logic vectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LogicError {
    /// Character is not one of `0 1 x X z Z`
    InvalidChar(char),
    /// Vector is empty
    Empty,
    /// Vector is wider than the word it is parsed into
    TooWide,
}

impl core::fmt::Display for LogicError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            LogicError::InvalidChar(c) => write!(f, "invalid logic character {c:?}"),
            LogicError::Empty => f.write_str("empty logic vector"),
            LogicError::TooWide => f.write_str("logic vector too wide"),
        }
    }
}

impl Logic {
    /// Resolve to a digital level, reading `X` and `Z` as low
    pub const fn is_high(self) -> bool {
        matches!(self, Logic::High)
    }

    /// Returns true for `X` and `Z`
    pub const fn is_indeterminate(self) -> bool {
        matches!(self, Logic::Unknown | Logic::HighZ)
    }

    /// Parse a single character (`0`, `1`, `x`/`X`, `z`/`Z`)
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '0' => Some(Logic::Low),
            '1' => Some(Logic::High),
            'x' | 'X' => Some(Logic::Unknown),
            'z' | 'Z' => Some(Logic::HighZ),
            _ => None,
        }
    }

    /// Character representation
    pub const fn to_char(self) -> char {
        match self {
            Logic::Low => '0',
            Logic::High => '1',
            Logic::Unknown => 'x',
            Logic::HighZ => 'z',
        }
    }
}

impl From<bool> for Logic {
    fn from(high: bool) -> Self {
        if high {
            Logic::High
        } else {
            Logic::Low
        }
    }
}

/// Convert a binary logic vector (MSB first) into an integer
///
/// Indeterminate bits read as `0`. Underscores are accepted as visual
/// separators, as in `"1010_xz01"`.
pub fn parse_word(s: &str) -> Result<u32, LogicError> {
    let mut value = 0u32;
    let mut width = 0usize;

    for c in s.chars().filter(|&c| c != '_') {
        let bit = Logic::from_char(c).ok_or(LogicError::InvalidChar(c))?;
        width += 1;
        if width > MAX_WORD_BITS {
            return Err(LogicError::TooWide);
        }
        value = (value << 1) | bit.is_high() as u32;
    }

    if width == 0 {
        return Err(LogicError::Empty);
    }
    Ok(value)
}

/// Normalize a slice of samples (MSB first) into an integer
///
/// Only the last [`MAX_WORD_BITS`] samples contribute.
pub fn normalize_bits(bits: &[Logic]) -> u32 {
    bits.iter()
        .fold(0u32, |acc, bit| (acc << 1) | bit.is_high() as u32)
}
