//! Hash dispatcher (C3): resolves an algorithm token to a one-shot
//! `digest(bytes) -> (bytes, length)` function.

use blake2::Blake2bVar;
use blake2::Blake2sVar;
use digest::{Digest, Update, VariableOutput};
use sha2::Sha256;

use crate::error::HashError;

/// Default digest size, in bytes, used by blake2b/blake2s when no explicit
/// size suffix is given, matching each algorithm's native output width.
const BLAKE2B_DEFAULT_SIZE: usize = 64;
const BLAKE2S_DEFAULT_SIZE: usize = 32;

/// A resolved hash algorithm: a name plus (for the blake2 family) an
/// explicit output size in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hasher {
    Sha2,
    Blake2b(usize),
    Blake2s(usize),
}

impl Hasher {
    /// Resolve a hash name such as `sha2`, `blake2b`, `blake2b32`, or
    /// `blake2s16` into a [`Hasher`].
    ///
    /// `name` is matched case-insensitively against
    /// `(sha2|blake2b|blake2s)(\d+)?`. `sha2` rejects a digest-size suffix;
    /// any other spelling (`sha256`, `blake2`, `blake2x`, …) fails with
    /// [`HashError::UnsupportedHash`]. A blake2 digest size outside the
    /// algorithm's real output-size bounds (1..=64 for blake2b, 1..=32 for
    /// blake2s) is rejected here too, by attempting the actual
    /// construction eagerly, so a bad size is a configuration error caught
    /// at parse time rather than a panic deep inside [`Hasher::digest`].
    pub fn parse(name: &str) -> Result<Self, HashError> {
        let lower = name.to_ascii_lowercase();
        let (base, digits) = split_name_and_digits(&lower)
            .ok_or_else(|| HashError::UnsupportedHash(name.to_string()))?;
        match base {
            "sha2" => {
                if digits.is_empty() {
                    Ok(Hasher::Sha2)
                } else {
                    Err(HashError::UnsupportedHash(name.to_string()))
                }
            }
            "blake2b" => {
                let size = if digits.is_empty() {
                    BLAKE2B_DEFAULT_SIZE
                } else {
                    digits
                        .parse()
                        .map_err(|_| HashError::UnsupportedHash(name.to_string()))?
                };
                Blake2bVar::new(size).map_err(|_| HashError::UnsupportedHash(name.to_string()))?;
                Ok(Hasher::Blake2b(size))
            }
            "blake2s" => {
                let size = if digits.is_empty() {
                    BLAKE2S_DEFAULT_SIZE
                } else {
                    digits
                        .parse()
                        .map_err(|_| HashError::UnsupportedHash(name.to_string()))?
                };
                Blake2sVar::new(size).map_err(|_| HashError::UnsupportedHash(name.to_string()))?;
                Ok(Hasher::Blake2s(size))
            }
            _ => Err(HashError::UnsupportedHash(name.to_string())),
        }
    }

    /// Compute the digest of `data`, returning `(digest_bytes, data.len())`.
    pub fn digest(&self, data: &[u8]) -> (Vec<u8>, usize) {
        let digest = match self {
            Hasher::Sha2 => Sha256::digest(data).to_vec(),
            Hasher::Blake2b(size) => {
                let mut hasher = Blake2bVar::new(*size).expect("valid blake2b digest size");
                hasher.update(data);
                let mut out = vec![0u8; *size];
                hasher
                    .finalize_variable(&mut out)
                    .expect("blake2b output buffer sized correctly");
                out
            }
            Hasher::Blake2s(size) => {
                let mut hasher = Blake2sVar::new(*size).expect("valid blake2s digest size");
                hasher.update(data);
                let mut out = vec![0u8; *size];
                hasher
                    .finalize_variable(&mut out)
                    .expect("blake2s output buffer sized correctly");
                out
            }
        };
        (digest, data.len())
    }
}

/// Split a lowercase hash name into its base (`sha2`/`blake2b`/`blake2s`)
/// and an optional trailing run of decimal digits, matching against the
/// longest known base first so `blake2b32` doesn't get mistaken for an
/// unknown `blake2` + digits split.
fn split_name_and_digits(name: &str) -> Option<(&'static str, &str)> {
    for base in ["blake2b", "blake2s", "sha2"] {
        if let Some(rest) = name.strip_prefix(base) {
            if rest.is_empty() || rest.bytes().all(|b| b.is_ascii_digit()) {
                return Some((base, rest));
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha2() {
        let h = Hasher::parse("sha2").unwrap();
        let (digest, len) = h.digest(b"");
        assert_eq!(len, 0);
        assert_eq!(digest.len(), 32);
        // SHA-256 is deterministic: hashing the same bytes twice agrees.
        assert_eq!(h.digest(b"").0, digest);
    }

    #[test]
    fn test_blake2_default_sizes() {
        let h = Hasher::parse("blake2b").unwrap();
        assert_eq!(h.digest(b"abc").0.len(), 64);
        let h = Hasher::parse("blake2s").unwrap();
        assert_eq!(h.digest(b"abc").0.len(), 32);
    }

    #[test]
    fn test_blake2_with_suffix() {
        let h = Hasher::parse("blake2b32").unwrap();
        assert_eq!(h.digest(b"abc").0.len(), 32);
        let h = Hasher::parse("blake2s16").unwrap();
        assert_eq!(h.digest(b"abc").0.len(), 16);
    }

    #[test]
    fn test_unsupported_names() {
        assert!(Hasher::parse("sha256").is_err());
        assert!(Hasher::parse("blake2").is_err());
        assert!(Hasher::parse("blake2x").is_err());
        assert!(Hasher::parse("badname").is_err());
    }

    #[test]
    fn test_sha2_rejects_suffix() {
        assert!(Hasher::parse("sha232").is_err());
    }

    #[test]
    fn test_blake2_digest_size_out_of_range_is_rejected_at_parse_time() {
        assert!(Hasher::parse("blake2b0").is_err());
        assert!(Hasher::parse("blake2b100").is_err());
        assert!(Hasher::parse("blake2s0").is_err());
        assert!(Hasher::parse("blake2s255").is_err());
    }
}
