use super::Zone;

/// Sorted, coalesced set of free zones in one buffer.
///
/// Invariants (hold after every call):
/// - zones are non-empty and sorted by `start`
/// - no two zones overlap or share an edge
///
/// Allocation is first-fit in ascending address order. Cost of both
/// [`release`](Self::release) and [`acquire`](Self::acquire) is linear in the
/// number of free holes, which stays small for typical batches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FreeList {
    zones: Vec<Zone>,
}

impl FreeList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Free list covering `[0, capacity)`.
    pub fn with_capacity(capacity: u32) -> Self {
        let mut list = Self::new();
        list.release(Zone::new(0, capacity));
        list
    }

    /// Free zones in address order.
    #[inline]
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    /// Total number of free elements.
    pub fn free_len(&self) -> u32 {
        self.zones.iter().map(|z| z.len()).sum()
    }

    /// Length of the largest free zone (0 when full).
    pub fn largest(&self) -> u32 {
        self.zones.iter().map(|z| z.len()).max().unwrap_or(0)
    }

    /// Last free zone, if any.
    #[inline]
    pub fn last(&self) -> Option<Zone> {
        self.zones.last().copied()
    }

    /// Forgets every free zone.
    #[inline]
    pub fn clear(&mut self) {
        self.zones.clear();
    }

    /// Returns `zone` to the free list, merging it with an overlapping or
    /// adjacent predecessor and any successors it now touches.
    ///
    /// Releasing a zero-length zone is a no-op.
    pub fn release(&mut self, zone: Zone) {
        if zone.is_empty() {
            return;
        }

        let mut at = self.zones.partition_point(|z| z.start < zone.start);
        let mut merged = zone;

        // Left merge: absorb the predecessor and take its slot.
        if at > 0 && self.zones[at - 1].touches(merged) {
            at -= 1;
            merged = self.zones[at].union(merged);
            self.zones[at] = merged;
        } else {
            self.zones.insert(at, merged);
        }

        // Right merge: swallow successors while they touch the merged zone.
        let mut next = at + 1;
        while next < self.zones.len() && self.zones[next].touches(merged) {
            merged = merged.union(self.zones[next]);
            next += 1;
        }
        self.zones[at] = merged;
        self.zones.drain(at + 1..next);
    }

    /// Carves `size` elements off the start of the first zone large enough.
    ///
    /// Returns [`Zone::EMPTY`] when `size` is zero or no zone fits; callers must
    /// check the length and grow the buffer or reject the request.
    pub fn acquire(&mut self, size: u32) -> Zone {
        if size == 0 {
            return Zone::EMPTY;
        }

        let Some(i) = self.zones.iter().position(|z| z.len() >= size) else {
            return Zone::EMPTY;
        };

        let free = &mut self.zones[i];
        let taken = Zone::with_len(free.start, size);
        free.start = taken.end;
        if free.is_empty() {
            self.zones.remove(i);
        }
        taken
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn z(start: u32, end: u32) -> Zone {
        Zone::new(start, end)
    }

    fn list(zones: &[(u32, u32)]) -> FreeList {
        let mut l = FreeList::new();
        for &(s, e) in zones {
            l.release(z(s, e));
        }
        l
    }

    fn assert_invariants(l: &FreeList) {
        for w in l.zones().windows(2) {
            assert!(w[0].end < w[1].start, "zones {} and {} not coalesced", w[0], w[1]);
        }
        assert!(l.zones().iter().all(|z| !z.is_empty()));
    }

    // ── release ───────────────────────────────────────────────────────────

    #[test]
    fn release_into_empty_list() {
        let l = list(&[(3, 7)]);
        assert_eq!(l.zones(), &[z(3, 7)]);
    }

    #[test]
    fn release_keeps_sorted_order() {
        let l = list(&[(20, 30), (0, 5), (10, 15)]);
        assert_eq!(l.zones(), &[z(0, 5), z(10, 15), z(20, 30)]);
        assert_invariants(&l);
    }

    #[test]
    fn release_adjacent_merges_right_of_existing() {
        let l = list(&[(0, 10), (10, 20)]);
        assert_eq!(l.zones(), &[z(0, 20)]);
    }

    #[test]
    fn release_adjacent_merges_left_of_existing() {
        let l = list(&[(10, 20), (0, 10)]);
        assert_eq!(l.zones(), &[z(0, 20)]);
    }

    #[test]
    fn release_overlapping_merges() {
        let l = list(&[(0, 12), (8, 20)]);
        assert_eq!(l.zones(), &[z(0, 20)]);
    }

    #[test]
    fn release_fills_gap_three_way() {
        let l = list(&[(0, 5), (10, 15), (5, 10)]);
        assert_eq!(l.zones(), &[z(0, 15)]);
    }

    #[test]
    fn release_spanning_many_zones_swallows_them() {
        let l = list(&[(2, 3), (5, 6), (8, 9), (12, 14), (1, 10)]);
        assert_eq!(l.zones(), &[z(1, 10), z(12, 14)]);
        assert_invariants(&l);
    }

    #[test]
    fn release_zero_length_is_noop() {
        let mut l = list(&[(0, 4)]);
        l.release(z(9, 9));
        assert_eq!(l.zones(), &[z(0, 4)]);
    }

    #[test]
    fn any_touching_pair_coalesces_to_span() {
        let pairs = [
            ((0, 10), (10, 20)),
            ((10, 20), (0, 10)),
            ((0, 15), (5, 20)),
            ((5, 20), (0, 15)),
            ((0, 20), (5, 10)),
            ((5, 10), (0, 20)),
            ((4, 8), (4, 8)),
        ];
        for ((a0, a1), (b0, b1)) in pairs {
            let l = list(&[(a0, a1), (b0, b1)]);
            assert_eq!(l.zones(), &[z(a0.min(b0), a1.max(b1))], "pair {a0}..{a1} + {b0}..{b1}");
        }
    }

    // ── acquire ───────────────────────────────────────────────────────────

    #[test]
    fn release_then_acquire_example() {
        let mut l = list(&[(0, 10)]);
        l.release(z(10, 20));
        assert_eq!(l.zones(), &[z(0, 20)]);

        assert_eq!(l.acquire(5), z(0, 5));
        assert_eq!(l.zones(), &[z(5, 20)]);
    }

    #[test]
    fn acquire_is_first_fit() {
        let mut l = list(&[(0, 2), (10, 20), (30, 100)]);
        assert_eq!(l.acquire(5), z(10, 15));
        assert_eq!(l.zones(), &[z(0, 2), z(15, 20), z(30, 100)]);
    }

    #[test]
    fn acquire_exact_fit_removes_zone() {
        let mut l = list(&[(0, 4), (10, 20)]);
        assert_eq!(l.acquire(10), z(10, 20));
        assert_eq!(l.zones(), &[z(0, 4)]);

        assert_eq!(l.acquire(4), z(0, 4));
        assert!(l.is_empty());
    }

    #[test]
    fn acquire_exhausted_returns_sentinel() {
        let mut l = list(&[(0, 4), (10, 13)]);
        let zone = l.acquire(5);
        assert_eq!(zone.len(), 0);
        assert_eq!(l.zones(), &[z(0, 4), z(10, 13)]);
    }

    #[test]
    fn acquire_zero_returns_sentinel() {
        let mut l = list(&[(0, 4)]);
        assert!(l.acquire(0).is_empty());
        assert_eq!(l.zones(), &[z(0, 4)]);
    }

    #[test]
    fn sequential_acquires_never_overlap() {
        let mut l = FreeList::with_capacity(100);
        let mut taken: Vec<Zone> = Vec::new();
        for size in [3, 7, 1, 20, 9, 13, 30, 5, 11] {
            let zone = l.acquire(size);
            if zone.is_empty() {
                continue;
            }
            assert_eq!(zone.len(), size);
            for prev in &taken {
                assert!(zone.end <= prev.start || prev.end <= zone.start, "{zone} overlaps {prev}");
            }
            taken.push(zone);
        }
        assert_eq!(taken.iter().map(|z| z.len()).sum::<u32>() + l.free_len(), 100);
    }

    #[test]
    fn churn_returns_to_single_zone() {
        let mut l = FreeList::with_capacity(64);
        let zones: Vec<Zone> = (0..8).map(|_| l.acquire(8)).collect();
        assert!(l.is_empty());

        // Release in an interleaved order to exercise every merge direction.
        for i in [1, 5, 3, 0, 7, 2, 6, 4] {
            l.release(zones[i]);
            assert_invariants(&l);
        }
        assert_eq!(l.zones(), &[z(0, 64)]);
        assert_eq!(l.largest(), 64);
    }
}
