//! Order grouping: split a sequence of orders into vehicle-sized batches.

use serde::{Deserialize, Serialize};

use crate::error::{check_capacity, check_weight, Result};
use crate::traits::OrderGrouper;

/// A weighted demand with an opaque payload carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandEntry<P> {
    pub weight: f64,
    pub payload: P,
}

impl<P> DemandEntry<P> {
    pub fn new(weight: f64, payload: P) -> Self {
        Self { weight, payload }
    }
}

/// A contiguous run of entries from the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderGroup<P> {
    pub entries: Vec<DemandEntry<P>>,
    pub total_weight: f64,
}

impl<P> OrderGroup<P> {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            total_weight: 0.0,
        }
    }

    fn push(&mut self, entry: DemandEntry<P>) {
        self.total_weight += entry.weight;
        self.entries.push(entry);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// True when the group exceeds `capacity`, which only happens for a
    /// single entry that is too heavy on its own.
    pub fn is_oversized(&self, capacity: f64) -> bool {
        self.total_weight > capacity
    }
}

/// Next-fit bin packing.
///
/// Only the most recent group is open. An entry that doesn't fit closes it
/// and starts the next one, so input order is preserved and concatenating
/// the groups gives back the input. An entry heavier than the capacity is
/// never split or dropped; it becomes a group of its own.
#[derive(Debug, Clone, Copy, Default)]
pub struct NextFitGrouper;

impl OrderGrouper for NextFitGrouper {
    fn group<P>(&self, entries: Vec<DemandEntry<P>>, capacity: f64) -> Result<Vec<OrderGroup<P>>> {
        check_capacity(capacity)?;
        for (index, entry) in entries.iter().enumerate() {
            check_weight(index, entry.weight)?;
        }

        let entry_count = entries.len();
        let mut groups = Vec::new();
        let mut current = OrderGroup::new();

        for entry in entries {
            if !current.is_empty() && current.total_weight + entry.weight > capacity {
                groups.push(std::mem::replace(&mut current, OrderGroup::new()));
            }
            current.push(entry);
        }
        if !current.is_empty() {
            groups.push(current);
        }

        tracing::debug!(
            entries = entry_count,
            groups = groups.len(),
            capacity,
            "grouped orders by capacity"
        );
        Ok(groups)
    }
}
