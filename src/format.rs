//! Result formatter / parser (C5): serialises `(file_digest, path, alg,
//! chunks)` to one canonical line, and parses the inverse.

use crate::error::ParseError;
use crate::file_hasher::ChunkDigest;

/// A single parsed or to-be-formatted chunksums line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResult {
    pub file_digest: String,
    pub path: String,
    pub alg: String,
    pub chunks: Vec<(String, usize)>,
}

/// Format `(file_digest, path, alg, chunks)` as the canonical chunksums
/// line: `<file_digest_hex>  <path>  <alg>!<chunk0_hex>:<len0>,...`.
///
/// The separator between the three top-level fields is exactly two
/// spaces; the chunk list is comma-separated and empty for a zero-chunk
/// file (the field is then simply `<alg>!`).
pub fn format_line(file_digest: &[u8], path: &str, alg: &str, chunks: &[ChunkDigest]) -> String {
    let chunk_field = chunks
        .iter()
        .map(|c| format!("{}:{}", hex::encode(&c.digest), c.length))
        .collect::<Vec<_>>()
        .join(",");
    format!("{}  {}  {}!{}", hex::encode(file_digest), path, alg, chunk_field)
}

/// Parse a single chunksums line into a [`FileResult`].
///
/// The line is split on the two-space separator: the first token is the
/// file digest, the last token is `alg!chunks`, and anything in between
/// — which may itself contain double-space sequences — is rejoined to
/// form the path. This preserves round-trip for paths with double
/// spaces, at the cost of misparsing a path that itself ends in a
/// literal space right before the alg separator (see design notes).
pub fn parse_line(line: &str) -> Result<FileResult, ParseError> {
    let items: Vec<&str> = line.split("  ").collect();
    if items.len() < 3 {
        return Err(ParseError::MalformedChunksumsLine(line.to_string()));
    }
    let file_digest = items[0].to_string();
    let tail = items[items.len() - 1];
    let path = items[1..items.len() - 1].join("  ");
    let (alg, chunks) = parse_chunks(tail, line)?;
    Ok(FileResult {
        file_digest,
        path,
        alg,
        chunks,
    })
}

/// Split `alg!chunks` into the algorithm id and the parsed chunk list.
fn parse_chunks(field: &str, whole_line: &str) -> Result<(String, Vec<(String, usize)>), ParseError> {
    let (alg, chunks_str) = field
        .split_once('!')
        .ok_or_else(|| ParseError::MalformedChunksumsLine(whole_line.to_string()))?;
    if chunks_str.is_empty() {
        return Ok((alg.to_string(), Vec::new()));
    }
    let mut chunks = Vec::new();
    for part in chunks_str.split(',') {
        if part.is_empty() {
            continue;
        }
        let (digest, len) = part
            .split_once(':')
            .ok_or_else(|| ParseError::MalformedChunksumsLine(whole_line.to_string()))?;
        let len: usize = len
            .parse()
            .map_err(|_| ParseError::MalformedChunksumsLine(whole_line.to_string()))?;
        chunks.push((digest.to_string(), len));
    }
    Ok((alg.to_string(), chunks))
}

/// Parse every non-empty line in a chunksums file, skipping malformed
/// lines rather than aborting the whole read (C5 is a permissive reader:
/// a `MalformedChunksumsLine` is logged and the line is dropped).
pub fn parse_chunksums(text: &str) -> Vec<FileResult> {
    let mut results = Vec::new();
    for line in text.lines() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        match parse_line(line) {
            Ok(result) => results.push(result),
            Err(err) => log::warn!("skipping malformed chunksums line: {err}"),
        }
    }
    results
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_literal_line() {
        let result = parse_line("sum2  ./file1  fck0sha2!abcd:10").unwrap();
        assert_eq!(result.file_digest, "sum2");
        assert_eq!(result.path, "./file1");
        assert_eq!(result.alg, "fck0sha2");
        assert_eq!(result.chunks, vec![("abcd".to_string(), 10)]);
    }

    #[test]
    fn test_parse_empty_chunks() {
        let result = parse_line("sum1  ./a  fck0sha2!").unwrap();
        assert!(result.chunks.is_empty());
    }

    #[test]
    fn test_parse_multiple_chunks() {
        let result = parse_line("sum3  ./file2  fck0sha2!bad:20,beef:30").unwrap();
        assert_eq!(
            result.chunks,
            vec![("bad".to_string(), 20), ("beef".to_string(), 30)]
        );
    }

    #[test]
    fn test_round_trip() {
        let chunks = vec![
            ChunkDigest {
                digest: vec![0xab, 0xcd],
                length: 10,
            },
            ChunkDigest {
                digest: vec![0xbe, 0xef],
                length: 30,
            },
        ];
        let line = format_line(&[0x12, 0x34], "/tmp/x", "fck4sha2", &chunks);
        let parsed = parse_line(&line).unwrap();
        assert_eq!(parsed.path, "/tmp/x");
        assert_eq!(parsed.alg, "fck4sha2");
        assert_eq!(parsed.file_digest, "1234");
        assert_eq!(
            parsed.chunks,
            vec![("abcd".to_string(), 10), ("beef".to_string(), 30)]
        );
    }

    #[test]
    fn test_double_space_path_round_trips() {
        let line = format_line(&[0x12], "a  b", "fck4sha2", &[]);
        let parsed = parse_line(&line).unwrap();
        assert_eq!(parsed.path, "a  b");
    }

    #[test]
    fn test_empty_file_line_ends_with_bang() {
        let line = format_line(&[0xaa], "/tmp/empty", "fck4sha2", &[]);
        assert!(line.ends_with("fck4sha2!"));
    }

    #[test]
    fn test_parse_chunksums_skips_blank_and_malformed_lines() {
        let text = "\nsum1  ./a  fck0sha2!\n\nnotaline\nsum2  ./b  fck0sha2!abcd:5\n";
        let results = parse_chunksums(text);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].path, "./a");
        assert_eq!(results[1].path, "./b");
    }
}
