use crate::error::{HarnessError, Result};
use std::fmt;

pub const SYMBOL_LEN: usize = 8;

/// Fixed-width ticker: ASCII bytes followed by zero padding.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Symbol([u8; SYMBOL_LEN]);

impl Symbol {
    pub fn new(ticker: &str) -> Result<Self> {
        if ticker.is_empty() || ticker.len() > SYMBOL_LEN || !ticker.is_ascii() {
            return Err(HarnessError::InvalidSymbol(ticker.to_string()));
        }

        let mut bytes = [0u8; SYMBOL_LEN];
        bytes[..ticker.len()].copy_from_slice(ticker.as_bytes());
        Ok(Self(bytes))
    }

    #[inline]
    pub fn from_bytes(bytes: [u8; SYMBOL_LEN]) -> Self {
        Self(bytes)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8; SYMBOL_LEN] {
        &self.0
    }

    pub fn ticker(&self) -> &str {
        let end = self.0.iter().position(|&b| b == 0).unwrap_or(SYMBOL_LEN);
        std::str::from_utf8(&self.0[..end]).unwrap_or("")
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({})", self.ticker())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ticker())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbol_is_zero_padded() {
        let symbol = Symbol::new("AAPL").unwrap();
        assert_eq!(symbol.as_bytes(), b"AAPL\0\0\0\0");
        assert_eq!(symbol.ticker(), "AAPL");
    }

    #[test]
    fn test_symbol_full_width() {
        let symbol = Symbol::new("ABCDEFGH").unwrap();
        assert_eq!(symbol.as_bytes(), b"ABCDEFGH");
        assert_eq!(symbol.to_string(), "ABCDEFGH");
    }

    #[test]
    fn test_symbol_rejects_long_or_empty_ticker() {
        assert!(matches!(
            Symbol::new("TOOLONGSYM"),
            Err(HarnessError::InvalidSymbol(_))
        ));
        assert!(Symbol::new("").is_err());
        assert!(Symbol::new("ÄPFEL").is_err());
    }
}
