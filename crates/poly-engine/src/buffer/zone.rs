use std::fmt;

/// Half-open range `[start, end)` of element indices within a linear buffer.
///
/// A zero-length zone is used as the "nothing available" sentinel by
/// [`FreeList::acquire`](super::FreeList::acquire).
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct Zone {
    pub start: u32,
    pub end: u32,
}

impl Zone {
    /// Zero-length sentinel.
    pub const EMPTY: Zone = Zone { start: 0, end: 0 };

    #[inline]
    pub const fn new(start: u32, end: u32) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Zone of `len` elements beginning at `start`.
    #[inline]
    pub const fn with_len(start: u32, len: u32) -> Self {
        Self::new(start, start + len)
    }

    #[inline]
    pub const fn len(self) -> u32 {
        self.end - self.start
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.end <= self.start
    }

    /// True when the zones overlap or share an edge.
    #[inline]
    pub const fn touches(self, other: Zone) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// Smallest zone covering both.
    #[inline]
    pub fn union(self, other: Zone) -> Zone {
        Zone::new(self.start.min(other.start), self.end.max(other.end))
    }

    #[inline]
    pub fn contains(self, index: u32) -> bool {
        index >= self.start && index < self.end
    }

    /// Element indices covered by the zone, as `usize` for slicing.
    #[inline]
    pub fn range(self) -> std::ops::Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_zones_touch() {
        assert!(Zone::new(0, 10).touches(Zone::new(10, 20)));
        assert!(Zone::new(10, 20).touches(Zone::new(0, 10)));
    }

    #[test]
    fn separated_zones_do_not_touch() {
        assert!(!Zone::new(0, 10).touches(Zone::new(11, 20)));
    }

    #[test]
    fn union_spans_both() {
        assert_eq!(Zone::new(5, 8).union(Zone::new(0, 6)), Zone::new(0, 8));
    }

    #[test]
    fn empty_sentinel_has_no_length() {
        assert_eq!(Zone::EMPTY.len(), 0);
        assert!(Zone::EMPTY.is_empty());
        assert_eq!(Zone::EMPTY.to_string(), "[0, 0)");
    }
}
