//! File hasher (C4): pulls a file as 4 MiB buffers, feeds the incremental
//! chunker, hashes each emitted chunk, and returns the ordered chunk list
//! plus the aggregate file digest.

use std::io::{self, Read};

use crate::algorithm::AlgorithmId;
use crate::chunker::Chunker;

/// Size of the buffers the file is read in, chosen to amortise syscall
/// overhead without holding an entire large file in memory at once.
const READ_BUFFER_SIZE: usize = 4 * 1024 * 1024;

/// A single chunk's digest and length, as it appears in the output line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkDigest {
    pub digest: Vec<u8>,
    pub length: usize,
}

/// Read `stream` to EOF, splitting it per `alg`'s chunk-size policy and
/// hashing each chunk with `alg`'s hasher.
///
/// The concatenation of chunk bytes equals the stream bytes, so
/// `sum(chunk.length) == file_size` always holds.
pub fn compute_file<R: Read>(stream: &mut R, alg: &AlgorithmId) -> io::Result<Vec<ChunkDigest>> {
    let mut chunker = Chunker::new(alg.chunk_size);
    let mut result = Vec::new();
    let mut buffer = vec![0u8; READ_BUFFER_SIZE];
    loop {
        let n = read_fill(stream, &mut buffer)?;
        if n == 0 {
            break;
        }
        for chunk in chunker.update(&buffer[..n]).chunks() {
            let (digest, length) = alg.hasher.digest(&chunk);
            result.push(ChunkDigest { digest, length });
        }
    }
    let tail = chunker.tail();
    if !tail.is_empty() {
        let (digest, length) = alg.hasher.digest(tail);
        result.push(ChunkDigest { digest, length });
    }
    Ok(result)
}

/// Compute the aggregate file digest: the hash of the concatenation of
/// every chunk digest, using the same algorithm as the chunks themselves.
pub fn file_digest(chunks: &[ChunkDigest], alg: &AlgorithmId) -> Vec<u8> {
    let mut concat = Vec::with_capacity(chunks.iter().map(|c| c.digest.len()).sum());
    for chunk in chunks {
        concat.extend_from_slice(&chunk.digest);
    }
    alg.hasher.digest(&concat).0
}

/// Read from `stream` until `buffer` is full or EOF is reached, returning
/// the number of bytes read. Unlike a bare `Read::read`, this does not
/// stop short on a partial read that isn't EOF.
fn read_fill<R: Read>(stream: &mut R, buffer: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buffer.len() {
        match stream.read(&mut buffer[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn alg() -> AlgorithmId {
        AlgorithmId::parse("fck4sha2").unwrap()
    }

    #[test]
    fn test_empty_file_has_no_chunks() {
        let mut stream = Cursor::new(Vec::new());
        let chunks = compute_file(&mut stream, &alg()).unwrap();
        assert!(chunks.is_empty());
        let digest = file_digest(&chunks, &alg());
        // H_alg(b"") regardless of input emptiness.
        assert_eq!(digest, alg().hasher.digest(b"").0);
    }

    #[test]
    fn test_small_file_is_one_chunk() {
        let mut stream = Cursor::new(b"hello".to_vec());
        let chunks = compute_file(&mut stream, &alg()).unwrap();
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].length, 5);
    }

    #[test]
    fn test_sum_of_lengths_equals_file_size() {
        let data: Vec<u8> = (0..200_000u32).map(|i| (i % 211) as u8).collect();
        let mut stream = Cursor::new(data.clone());
        let chunks = compute_file(&mut stream, &alg()).unwrap();
        let total: usize = chunks.iter().map(|c| c.length).sum();
        assert_eq!(total, data.len());
    }

    #[test]
    fn test_periodic_input_scenario() {
        // b"abcdefgh" * 20000 (spec scenario 1): exactly 3 chunks of
        // lengths [65536, 65536, 28928]; the first two chunks are
        // identical in content, hence identical digests.
        let mut data = Vec::with_capacity(160_000);
        for _ in 0..20000 {
            data.extend_from_slice(b"abcdefgh");
        }
        let mut stream = Cursor::new(data.clone());
        let chunks = compute_file(&mut stream, &alg()).unwrap();
        let total: usize = chunks.iter().map(|c| c.length).sum();
        assert_eq!(total, data.len());
        assert_eq!(total, 160_000);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].length, 65536);
        assert_eq!(chunks[1].length, 65536);
        assert_eq!(chunks[2].length, 28928);
        assert_eq!(chunks[0].digest, chunks[1].digest);
    }
}
