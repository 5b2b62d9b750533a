//! Chunk-size policy (C1): maps a symbolic `<unit><power>` token to the
//! `(avg, min, max)` triple the CDC engine is parameterised with.

use crate::cdc::AVERAGE_MIN;
use crate::error::ChunkSizeError;

/// An immutable, validated `(avg, min, max)` chunk-size triple, in bytes.
///
/// `min = avg / 4` and `max = avg * 4`; both derive from `avg` and are
/// never supplied directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSize {
    pub avg: u32,
    pub min: u32,
    pub max: u32,
}

impl ChunkSize {
    /// Construct a [`ChunkSize`] from an average chunk size in bytes.
    ///
    /// Fails with [`ChunkSizeError::SizeTooSmall`] when `avg` is below
    /// [`AVERAGE_MIN`], and with [`ChunkSizeError::SizeUnaligned`] when
    /// `avg` is not a multiple of 4.
    pub fn new(avg: u32) -> Result<Self, ChunkSizeError> {
        if avg < AVERAGE_MIN {
            return Err(ChunkSizeError::SizeTooSmall(avg));
        }
        if avg % 4 != 0 {
            return Err(ChunkSizeError::SizeUnaligned(avg, avg % 4));
        }
        Ok(ChunkSize {
            avg,
            min: avg / 4,
            max: avg * 4,
        })
    }

    /// Parse a two-character `<unit><power>` token, e.g. `"k4"` or `"M2"`,
    /// into a [`ChunkSize`].
    ///
    /// `unit` is one of `k`, `m`, `g` (case-insensitive), denoting a base
    /// of 1024, 1024² or 1024³ bytes respectively; `power` is a single
    /// decimal digit denoting a further factor of `2^power`.
    pub fn parse(token: &str) -> Result<Self, ChunkSizeError> {
        let bytes = token.as_bytes();
        if bytes.len() != 2 {
            return Err(ChunkSizeError::BadSizeToken(token.to_string()));
        }
        let base: u64 = match bytes[0].to_ascii_lowercase() {
            b'k' => 1024,
            b'm' => 1024 * 1024,
            b'g' => 1024 * 1024 * 1024,
            _ => return Err(ChunkSizeError::BadSizeToken(token.to_string())),
        };
        let power = match bytes[1] {
            d @ b'0'..=b'9' => (d - b'0') as u32,
            _ => return Err(ChunkSizeError::BadSizeToken(token.to_string())),
        };
        let avg = base
            .checked_mul(1u64 << power)
            .and_then(|v| u32::try_from(v).ok())
            .ok_or_else(|| ChunkSizeError::BadSizeToken(token.to_string()))?;
        Self::new(avg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_units() {
        let cs = ChunkSize::parse("k0").unwrap();
        assert_eq!(cs.avg, 1024);
        assert_eq!(cs.min, 256);
        assert_eq!(cs.max, 4096);

        let cs = ChunkSize::parse("K9").unwrap();
        assert_eq!(cs.avg, 524288);

        let cs = ChunkSize::parse("m2").unwrap();
        assert_eq!(cs.avg, 4 * 1024 * 1024);

        let cs = ChunkSize::parse("k4").unwrap();
        assert_eq!(cs.avg, 16384);
        assert_eq!(cs.min, 4096);
        assert_eq!(cs.max, 65536);
    }

    #[test]
    fn test_parse_bad_token() {
        assert!(matches!(
            ChunkSize::parse("x1"),
            Err(ChunkSizeError::BadSizeToken(_))
        ));
        assert!(matches!(
            ChunkSize::parse("ka"),
            Err(ChunkSizeError::BadSizeToken(_))
        ));
    }

    #[test]
    fn test_size_too_small() {
        assert!(matches!(
            ChunkSize::new(1),
            Err(ChunkSizeError::SizeTooSmall(1))
        ));
    }

    #[test]
    fn test_size_unaligned() {
        assert!(matches!(
            ChunkSize::new(1025),
            Err(ChunkSizeError::SizeUnaligned(1025, 1))
        ));
    }
}
