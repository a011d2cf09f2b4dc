// 🏆 Wealth Heap - Array-backed max-heap of user handles
//
// Ordering ("heap-greater"):
//   higher net worth wins; equal net worth -> lexicographically earlier name
//
// The heap stores handles only. Net worth and name are looked up through
// a RankLookup on every comparison, so a handle's position goes stale the
// moment its owner's net worth changes until `reposition` is called.

use serde::Serialize;
use std::cmp::Ordering;

// ============================================================================
// RANKING
// ============================================================================

/// What the heap compares for one handle
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Standing<'a> {
    pub net_worth: f64,
    pub name: &'a str,
}

/// Resolves handles to their current standing
pub trait RankLookup<H> {
    fn standing(&self, handle: &H) -> Option<Standing<'_>>;
}

/// `Greater` when `a` belongs above `b`. Unresolvable handles sink.
pub fn heap_order(a: Option<Standing<'_>>, b: Option<Standing<'_>>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a
            .net_worth
            .partial_cmp(&b.net_worth)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.name.cmp(a.name)),
    }
}

/// Repair direction after a net worth change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Shift {
    Up,
    Down,
    Stay,
}

impl Shift {
    pub fn between(previous: f64, current: f64) -> Self {
        if current > previous {
            Shift::Up
        } else if current < previous {
            Shift::Down
        } else {
            Shift::Stay
        }
    }
}

// ============================================================================
// WEALTH HEAP
// ============================================================================

#[derive(Debug, Clone)]
pub struct WealthHeap<H> {
    slots: Vec<H>,

    /// Logical capacity; grows x2 (or to 10 from zero) when full
    capacity: usize,
}

impl<H: PartialEq> WealthHeap<H> {
    /// Capacity below 1 is clamped to 1
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        WealthHeap {
            slots: Vec::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Handles in array order (not sorted)
    pub fn as_slice(&self) -> &[H] {
        &self.slots
    }

    /// Current maximum; `None` on an empty heap
    pub fn peek(&self) -> Option<&H> {
        self.slots.first()
    }

    /// Append and sift up; returns the handle's final index
    pub fn insert<R: RankLookup<H>>(&mut self, handle: H, ranks: &R) -> usize {
        if self.slots.len() >= self.capacity {
            let grown = if self.capacity == 0 { 10 } else { self.capacity * 2 };
            self.slots.reserve_exact(grown - self.slots.len());
            self.capacity = grown;
        }
        self.slots.push(handle);
        self.sift_up(self.slots.len() - 1, ranks)
    }

    /// Linear scan by identity
    pub fn index_of(&self, handle: &H) -> Option<usize> {
        self.slots.iter().position(|slot| slot == handle)
    }

    /// Move the handle at `index` toward the root while it beats its parent
    pub fn sift_up<R: RankLookup<H>>(&mut self, mut index: usize, ranks: &R) -> usize {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.compare(index, parent, ranks) == Ordering::Greater {
                self.slots.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
        index
    }

    /// Move the handle at `index` toward the leaves while a child beats it
    pub fn sift_down<R: RankLookup<H>>(&mut self, mut index: usize, ranks: &R) -> usize {
        let size = self.slots.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut largest = index;

            if left < size && self.compare(left, largest, ranks) == Ordering::Greater {
                largest = left;
            }
            if right < size && self.compare(right, largest, ranks) == Ordering::Greater {
                largest = right;
            }

            if largest == index {
                return index;
            }
            self.slots.swap(index, largest);
            index = largest;
        }
    }

    /// Restore order for a handle whose net worth moved in direction `shift`.
    ///
    /// Returns the handle's final index, or `None` if the heap does not
    /// track it.
    pub fn reposition<R: RankLookup<H>>(
        &mut self,
        handle: &H,
        shift: Shift,
        ranks: &R,
    ) -> Option<usize> {
        let index = self.index_of(handle)?;
        Some(match shift {
            Shift::Up => self.sift_up(index, ranks),
            Shift::Down => self.sift_down(index, ranks),
            Shift::Stay => index,
        })
    }

    /// Every non-root slot is not heap-greater than its parent
    pub fn is_valid<R: RankLookup<H>>(&self, ranks: &R) -> bool {
        (1..self.slots.len()).all(|i| self.compare(i, (i - 1) / 2, ranks) != Ordering::Greater)
    }

    /// Remove every handle, keeping the capacity
    pub fn drain(&mut self) -> std::vec::Drain<'_, H> {
        self.slots.drain(..)
    }

    fn compare<R: RankLookup<H>>(&self, a: usize, b: usize, ranks: &R) -> Ordering {
        heap_order(ranks.standing(&self.slots[a]), ranks.standing(&self.slots[b]))
    }
}

/// Empty heap with zero capacity; the first insert grows it to 10
impl<H> Default for WealthHeap<H> {
    fn default() -> Self {
        WealthHeap {
            slots: Vec::new(),
            capacity: 0,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
