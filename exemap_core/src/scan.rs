//! Masked byte-pattern search over a byte view.
//!
//! The mask permits "don't care" positions: a mask byte of `0xFF` requires an
//! exact match at that position, `0x00` accepts any value. Partial masks work
//! bitwise. New signatures are added by table entry, not by new code.

/// Scan direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// First match, lowest offset.
    Forward,
    /// Last match, highest offset.
    Backward,
}

/// Finds an occurrence of `pattern` in `haystack` under `mask` and returns
/// its offset.
///
/// `pattern` and `mask` must have equal lengths.
pub fn find(haystack: &[u8], pattern: &[u8], mask: &[u8], direction: Direction) -> Option<usize> {
    debug_assert_eq!(pattern.len(), mask.len());
    if pattern.is_empty() || haystack.len() < pattern.len() {
        return None;
    }

    let matches = |at: usize| {
        pattern
            .iter()
            .zip(mask)
            .enumerate()
            .all(|(i, (p, m))| haystack[at + i] & m == p & m)
    };

    let mut candidates = 0..=haystack.len() - pattern.len();
    match direction {
        Direction::Forward => candidates.find(|&at| matches(at)),
        Direction::Backward => candidates.rev().find(|&at| matches(at)),
    }
}
