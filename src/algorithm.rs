//! Algorithm id: the `fc<unit><power><hash>[<digest_size>]` token that
//! jointly names the chunker parameters (C1) and the per-chunk hash (C3).

use crate::chunksize::ChunkSize;
use crate::error::ParseError;
use crate::hash::Hasher;

/// The fixed two-character prefix every algorithm id begins with.
const PREFIX: &str = "fc";

/// A fully resolved algorithm id: its chunk-size policy, its hasher, and
/// the original textual token it was parsed from.
#[derive(Debug, Clone)]
pub struct AlgorithmId {
    pub token: String,
    pub chunk_size: ChunkSize,
    pub hasher: Hasher,
}

impl AlgorithmId {
    /// Parse an algorithm id such as `fck4sha2` or `fcm0blake2b32`.
    ///
    /// Positional slicing is guaranteed by the grammar: characters `0..2`
    /// are the literal `fc`, `2..4` are the chunk-size token consumed by
    /// [`ChunkSize::parse`], and `4..` is the hash spec consumed by
    /// [`Hasher::parse`].
    pub fn parse(token: &str) -> Result<Self, ParseError> {
        if token.len() < 4 || !token.starts_with(PREFIX) {
            return Err(ParseError::MalformedChunksumsLine(token.to_string()));
        }
        let size_token = &token[2..4];
        let hash_token = &token[4..];
        let chunk_size = ChunkSize::parse(size_token)?;
        let hasher = Hasher::parse(hash_token)?;
        Ok(AlgorithmId {
            token: token.to_string(),
            chunk_size,
            hasher,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_alg() {
        let alg = AlgorithmId::parse("fck4sha2").unwrap();
        assert_eq!(alg.chunk_size.avg, 16384);
        assert_eq!(alg.hasher, Hasher::Sha2);
    }

    #[test]
    fn test_blake2_with_size() {
        let alg = AlgorithmId::parse("fcm0blake2b32").unwrap();
        assert_eq!(alg.chunk_size.avg, 1024 * 1024);
        assert_eq!(alg.hasher, Hasher::Blake2b(32));
    }

    #[test]
    fn test_slicing_matches_every_valid_alg() {
        for token in ["fck0sha2", "fcm4blake2s", "fcg1blake2b16"] {
            let alg = AlgorithmId::parse(token).unwrap();
            assert_eq!(&alg.token[0..2], "fc");
        }
    }

    #[test]
    fn test_malformed_alg_fails() {
        assert!(AlgorithmId::parse("fcx1sha2").is_err());
        assert!(AlgorithmId::parse("fck0sha256").is_err());
    }
}
