//! The incremental content-defined chunker (C2): a stateful, restartable
//! splitter that consumes byte buffers and emits a lazy sequence of
//! variable-length chunks while retaining an unsplit tail.
//!
//! This is the primary entry point used by [`crate::file_hasher`]; it
//! drives the pure cut-point algorithm in [`crate::cdc`] over a growing
//! `tail || update_bytes` buffer and withholds whatever the algorithm
//! deems the final chunk, since a chunk ending at the edge of the current
//! buffer might simply be unfinished.

use crate::cdc::{cut_all, Masks};
use crate::chunksize::ChunkSize;

/// Live state of the CDC engine, as described in the data model: the
/// chunk-size parameters, the retained tail, and whether a `chunks`
/// sequence is pending consumption.
pub struct Chunker {
    min_size: usize,
    avg_size: usize,
    max_size: usize,
    masks: Masks,
    tail: Vec<u8>,
    pending: Option<Vec<u8>>,
}

impl Chunker {
    /// Construct a chunker from a resolved [`ChunkSize`].
    pub fn new(size: ChunkSize) -> Self {
        Chunker {
            min_size: size.min as usize,
            avg_size: size.avg as usize,
            max_size: size.max as usize,
            masks: Masks::for_average(size.avg),
            tail: Vec::new(),
            pending: None,
        }
    }

    /// Append `data` to the chunker's input. Does not immediately split;
    /// it prepares a lazy producer over `tail || data` for the next call
    /// to [`Chunker::chunks`].
    pub fn update(&mut self, data: &[u8]) -> &mut Self {
        let mut buf = Vec::with_capacity(self.tail.len() + data.len());
        buf.extend_from_slice(&self.tail);
        buf.extend_from_slice(data);
        self.pending = Some(buf);
        self
    }

    /// Consume the pending producer, returning every chunk the splitter
    /// emitted *except the last*, which becomes the new [`Chunker::tail`].
    ///
    /// Calling this again without an intervening [`Chunker::update`]
    /// yields an empty sequence and leaves the tail untouched.
    pub fn chunks(&mut self) -> Vec<Vec<u8>> {
        let Some(buf) = self.pending.take() else {
            return Vec::new();
        };
        if buf.is_empty() {
            return Vec::new();
        }
        let ranges = cut_all(&buf, self.min_size, self.avg_size, self.max_size, self.masks);
        if ranges.is_empty() {
            self.tail = buf;
            return Vec::new();
        }
        let last = ranges.len() - 1;
        let mut result = Vec::with_capacity(last);
        for &(start, end) in &ranges[..last] {
            result.push(buf[start..end].to_vec());
        }
        let (tail_start, tail_end) = ranges[last];
        self.tail = buf[tail_start..tail_end].to_vec();
        result
    }

    /// The bytes currently retained as the unfinished trailing chunk.
    pub fn tail(&self) -> &[u8] {
        &self.tail
    }

    /// Return and clear the tail, readying the chunker for a fresh
    /// logical stream.
    pub fn reset(&mut self) -> Vec<u8> {
        self.pending = None;
        std::mem::take(&mut self.tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunker() -> Chunker {
        Chunker::new(ChunkSize::new(256).unwrap())
    }

    #[test]
    fn test_update_without_overflow_yields_no_chunks() {
        let mut c = chunker();
        let chunks = c.update(b"12345").chunks();
        assert!(chunks.is_empty());
        assert_eq!(c.tail(), b"12345");
    }

    #[test]
    fn test_chunks_without_update_is_empty() {
        let mut c = chunker();
        assert!(c.update(b"12345").chunks().is_empty());
        assert!(c.chunks().is_empty());
        // tail from the first (and only) real update is untouched.
        assert_eq!(c.tail(), b"12345");
    }

    #[test]
    fn test_reset_returns_and_clears_tail() {
        let mut c = chunker();
        c.update(b"hello").chunks();
        let tail = c.reset();
        assert_eq!(tail, b"hello");
        assert!(c.tail().is_empty());
    }

    #[test]
    fn test_concatenation_invariant() {
        let content: Vec<u8> = (0..2000u32).map(|i| (i % 97) as u8).collect();
        let mut c = chunker();
        let mut emitted = c.update(&content).chunks();
        emitted.push(c.tail().to_vec());
        let whole: Vec<u8> = emitted.concat();
        assert_eq!(whole, content);
    }

    #[test]
    fn test_buffer_independence() {
        let content: Vec<u8> = (0..20000u32).map(|i| (i % 251) as u8).collect();

        let mut one_shot = chunker();
        let mut all_at_once = one_shot.update(&content).chunks();
        all_at_once.push(one_shot.tail().to_vec());

        let mut incremental = chunker();
        let mut pieces = Vec::new();
        for chunk in content.chunks(777) {
            pieces.extend(incremental.update(chunk).chunks());
        }
        pieces.push(incremental.tail().to_vec());

        assert_eq!(all_at_once, pieces);
    }

    #[test]
    fn test_incremental_update_matches_single_update() {
        let content: Vec<u8> = (0..300u32).map(|i| (i % 53) as u8).collect();
        let (part1, part2) = content.split_at(150);

        let mut single = chunker();
        let mut single_chunks = single.update(&content).chunks();
        single_chunks.push(single.tail().to_vec());

        let mut split = chunker();
        let mut split_chunks = split.update(part1).chunks();
        split_chunks.extend(split.update(part2).chunks());
        split_chunks.push(split.tail().to_vec());

        assert_eq!(single_chunks, split_chunks);
    }
}
