// MIT License
//
// Copyright (c) 2025 Takatoshi Kondo
//
// Permission is hereby granted, free of charge, to any person obtaining a copy
// of this software and associated documentation files (the "Software"), to deal
// in the Software without restriction, including without limitation the rights
// to use, copy, modify, merge, publish, distribute, sublicense, and/or sell
// copies of the Software, and to permit persons to whom the Software is
// furnished to do so, subject to the following conditions:
//
// The above copyright notice and this permission notice shall be included in all
// copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND, EXPRESS OR
// IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF MERCHANTABILITY,
// FITNESS FOR A PARTICULAR PURPOSE AND NONINFRINGEMENT. IN NO EVENT SHALL THE
// AUTHORS OR COPYRIGHT HOLDERS BE LIABLE FOR ANY CLAIM, DAMAGES OR OTHER
// LIABILITY, WHETHER IN AN ACTION OF CONTRACT, TORT OR OTHERWISE, ARISING FROM,
// OUT OF OR IN CONNECTION WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE
// SOFTWARE.

//! The packet-identifier allocator: an interval-based free pool over
//! `1..=65535` that wraps and never reuses an id still in flight.

use std::collections::BTreeSet;

#[derive(Debug, Clone, Eq, PartialEq)]
struct ValueInterval {
    low: u16,
    high: u16,
}

impl ValueInterval {
    fn new_single(value: u16) -> Self {
        Self {
            low: value,
            high: value,
        }
    }

    fn new_range(low: u16, high: u16) -> Self {
        Self { low, high }
    }

    fn contains(&self, value: u16) -> bool {
        self.low <= value && value <= self.high
    }
}

impl PartialOrd for ValueInterval {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ValueInterval {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        if self.high < other.low {
            std::cmp::Ordering::Less
        } else if other.high < self.low {
            std::cmp::Ordering::Greater
        } else {
            std::cmp::Ordering::Equal
        }
    }
}

/// A pool of free packet identifiers in `lowest..=highest`, represented as a
/// set of disjoint intervals so allocate/deallocate stay close to O(log n)
/// in the number of in-flight gaps rather than O(65535).
#[derive(Clone)]
pub struct ValueAllocator {
    pool: BTreeSet<ValueInterval>,
    lowest: u16,
    highest: u16,
}

impl ValueAllocator {
    pub fn new(lowest: u16, highest: u16) -> Self {
        assert!(lowest <= highest);
        let mut pool = BTreeSet::new();
        pool.insert(ValueInterval::new_range(lowest, highest));
        Self {
            pool,
            lowest,
            highest,
        }
    }

    /// A packet-identifier allocator over the full MQTT range `1..=65535`.
    pub fn packet_ids() -> Self {
        Self::new(1, u16::MAX)
    }

    /// Allocate the lowest free id, or `None` if the pool is exhausted.
    pub fn allocate(&mut self) -> Option<u16> {
        let iv = self.pool.iter().next()?.clone();
        let value = iv.low;

        self.pool.remove(&iv);
        if value < iv.high {
            self.pool.insert(ValueInterval::new_range(value + 1, iv.high));
        }

        Some(value)
    }

    /// Return a value to the pool, merging with adjacent free intervals.
    pub fn deallocate(&mut self, value: u16) {
        assert!(self.lowest <= value && value <= self.highest);

        let right = self
            .pool
            .range(ValueInterval::new_single(value)..)
            .next()
            .cloned();
        let left = self
            .pool
            .range(..ValueInterval::new_single(value))
            .next_back()
            .cloned();

        match (left, right) {
            (Some(l), Some(r)) if l.high + 1 == value && value + 1 == r.low => {
                self.pool.remove(&l);
                self.pool.remove(&r);
                self.pool.insert(ValueInterval::new_range(l.low, r.high));
            }
            (Some(l), _) if l.high + 1 == value => {
                self.pool.remove(&l);
                self.pool.insert(ValueInterval::new_range(l.low, value));
            }
            (_, Some(r)) if value + 1 == r.low => {
                self.pool.remove(&r);
                self.pool.insert(ValueInterval::new_range(value, r.high));
            }
            _ => {
                self.pool.insert(ValueInterval::new_single(value));
            }
        }
    }

    /// Whether `value` is currently allocated (not in the free pool).
    pub fn is_used(&self, value: u16) -> bool {
        !self.pool.iter().any(|iv| iv.contains(value))
    }

    pub fn clear(&mut self) {
        self.pool.clear();
        self.pool
            .insert(ValueInterval::new_range(self.lowest, self.highest));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocates_in_ascending_order() {
        let mut a = ValueAllocator::packet_ids();
        assert_eq!(a.allocate(), Some(1));
        assert_eq!(a.allocate(), Some(2));
    }

    #[test]
    fn deallocated_id_is_reallocated_and_skips_in_flight() {
        let mut a = ValueAllocator::packet_ids();
        let first = a.allocate().unwrap();
        let second = a.allocate().unwrap();
        assert_ne!(first, second);
        a.deallocate(first);
        // first is free again but second stays in flight
        assert!(!a.is_used(first));
        assert!(a.is_used(second));
    }

    #[test]
    fn wraps_and_exhausts_at_top_of_range() {
        let mut a = ValueAllocator::new(1, 2);
        assert_eq!(a.allocate(), Some(1));
        assert_eq!(a.allocate(), Some(2));
        assert_eq!(a.allocate(), None);
        a.deallocate(1);
        assert_eq!(a.allocate(), Some(1));
    }
}
