//! Partitioning of the line sequence
//!
//! Chunked strategies cut the stream into contiguous runs of lines; the
//! fork-join strategy halves index ranges. Both partitions cover every line
//! exactly once and preserve order.

use std::io;
use std::ops::Range;

/// A contiguous run of lines submitted as one unit of work
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    /// Position of this chunk in submission order
    pub index: usize,
    /// The lines, never empty
    pub lines: Vec<String>,
}

impl Chunk {
    /// Number of lines in the chunk
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always false for chunks produced by `LineChunker`
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Buffers a line stream into chunks of at most `chunk_size` lines
///
/// The last chunk may be shorter. A read error is yielded in place of the
/// chunk being filled, and the chunker stops after it.
pub struct LineChunker<I> {
    lines: I,
    chunk_size: usize,
    next_index: usize,
    done: bool,
}

impl<I> LineChunker<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    /// Create a chunker; `chunk_size` must be positive
    pub fn new(lines: I, chunk_size: usize) -> Self {
        debug_assert!(chunk_size > 0, "chunk size must be positive");
        Self {
            lines,
            chunk_size: chunk_size.max(1),
            next_index: 0,
            done: false,
        }
    }
}

impl<I> Iterator for LineChunker<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    type Item = io::Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let mut buffer = Vec::with_capacity(self.chunk_size);
        while buffer.len() < self.chunk_size {
            match self.lines.next() {
                Some(Ok(line)) => buffer.push(line),
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(e));
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }

        // An empty trailing chunk is never emitted
        if buffer.is_empty() {
            return None;
        }

        let chunk = Chunk {
            index: self.next_index,
            lines: buffer,
        };
        self.next_index += 1;
        Some(Ok(chunk))
    }
}

/// Split `[start, end)` at the floor midpoint
///
/// The left half is never longer than the right half.
pub fn split_range(range: Range<usize>) -> (Range<usize>, Range<usize>) {
    let mid = range.start + (range.end - range.start) / 2;
    (range.start..mid, mid..range.end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn numbered(n: usize) -> Vec<io::Result<String>> {
        (0..n).map(|i| Ok(i.to_string())).collect()
    }

    #[test]
    fn test_exact_multiple() {
        let chunks: Vec<Chunk> = LineChunker::new(numbered(6).into_iter(), 3)
            .collect::<io::Result<_>>()
            .unwrap();
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].lines, vec!["0", "1", "2"]);
        assert_eq!(chunks[1].lines, vec!["3", "4", "5"]);
        assert_eq!(chunks[1].index, 1);
    }

    #[test]
    fn test_short_last_chunk() {
        let chunks: Vec<Chunk> = LineChunker::new(numbered(7).into_iter(), 3)
            .collect::<io::Result<_>>()
            .unwrap();
        let sizes: Vec<usize> = chunks.iter().map(Chunk::len).collect();
        assert_eq!(sizes, vec![3, 3, 1]);
    }

    #[test]
    fn test_empty_input_has_no_chunks() {
        let mut chunker = LineChunker::new(numbered(0).into_iter(), 5);
        assert!(chunker.next().is_none());
    }

    #[test]
    fn test_read_error_stops_chunking() {
        let lines = vec![
            Ok("a".to_string()),
            Err(io::Error::new(io::ErrorKind::Other, "disk gone")),
            Ok("b".to_string()),
        ];
        let mut chunker = LineChunker::new(lines.into_iter(), 10);
        let err = chunker.next().unwrap().unwrap_err();
        assert_eq!(err.to_string(), "disk gone");
        assert!(chunker.next().is_none());
    }

    #[test]
    fn test_split_range_floor_midpoint() {
        assert_eq!(split_range(0..5), (0..2, 2..5));
        assert_eq!(split_range(0..4), (0..2, 2..4));
        assert_eq!(split_range(3..4), (3..3, 3..4));
        assert_eq!(split_range(10..13), (10..11, 11..13));
    }

    proptest! {
        #[test]
        fn prop_chunks_cover_input_exactly_once(n in 0usize..500, chunk_size in 1usize..64) {
            let chunks: Vec<Chunk> = LineChunker::new(numbered(n).into_iter(), chunk_size)
                .collect::<io::Result<_>>()
                .unwrap();

            prop_assert_eq!(chunks.iter().map(Chunk::len).sum::<usize>(), n);
            prop_assert!(chunks.iter().all(|c| !c.is_empty() && c.len() <= chunk_size));

            for (i, chunk) in chunks.iter().enumerate() {
                prop_assert_eq!(chunk.index, i);
            }

            let rejoined: Vec<String> = chunks.into_iter().flat_map(|c| c.lines).collect();
            let expected: Vec<String> = (0..n).map(|i| i.to_string()).collect();
            prop_assert_eq!(rejoined, expected);
        }

        #[test]
        fn prop_split_range_is_a_partition(start in 0usize..1000, len in 2usize..1000) {
            let (left, right) = split_range(start..start + len);
            prop_assert_eq!(left.start, start);
            prop_assert_eq!(left.end, right.start);
            prop_assert_eq!(right.end, start + len);
            prop_assert!(left.len() <= right.len());
            prop_assert!(right.len() - left.len() <= 1);
            prop_assert!(!left.is_empty());
        }
    }
}
