//! Capacity packing: choose which items to load onto a vehicle.

use serde::{Deserialize, Serialize};

use crate::error::{check_capacity, check_weight, PlannerError, Result};
use crate::traits::LoadPacker;

/// Largest input the exhaustive packer enumerates by default.
pub const DEFAULT_EXHAUSTIVE_LIMIT: usize = 16;

/// Hard ceiling on enumerated inputs, whatever `max_items` says.
pub const MAX_EXHAUSTIVE_ITEMS: usize = 24;

/// A loadable item. Identified only by its position in the input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapacityItem {
    pub weight: f64,
    pub value: f64,
}

impl CapacityItem {
    pub fn new(weight: f64, value: f64) -> Self {
        Self { weight, value }
    }

    /// Value per unit of weight. Zero-weight items rank above everything.
    pub fn density(&self) -> f64 {
        if self.weight == 0.0 {
            f64::INFINITY
        } else {
            self.value / self.weight
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackedSelection {
    /// Selected items, in density order.
    pub items: Vec<CapacityItem>,
    /// Input position of each selected item, parallel to `items`.
    pub indices: Vec<usize>,
    pub total_weight: f64,
    pub total_value: f64,
}

impl PackedSelection {
    fn from_indices(items: &[CapacityItem], indices: Vec<usize>) -> Self {
        let selected: Vec<CapacityItem> = indices.iter().map(|&i| items[i]).collect();
        let total_weight = selected.iter().map(|item| item.weight).sum();
        let total_value = selected.iter().map(|item| item.value).sum();
        Self {
            items: selected,
            indices,
            total_weight,
            total_value,
        }
    }
}

fn validate(items: &[CapacityItem], capacity: f64) -> Result<()> {
    check_capacity(capacity)?;
    for (index, item) in items.iter().enumerate() {
        check_weight(index, item.weight)?;
        if !(item.value.is_finite() && item.value >= 0.0) {
            return Err(PlannerError::NegativeValue {
                index,
                value: item.value,
            });
        }
    }
    Ok(())
}

/// Input positions sorted by descending density. Ties keep input order.
fn density_order(items: &[CapacityItem]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| items[b].density().total_cmp(&items[a].density()));
    order
}

/// Greedy 0/1 knapsack approximation by value density.
///
/// Walks items from densest to sparsest and takes each one that still fits.
/// A skipped item is never reconsidered. Fast, but not optimal in general:
/// the weight bound always holds, the value is only a best effort.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreedyDensityPacker;

impl LoadPacker for GreedyDensityPacker {
    fn pack(&self, items: &[CapacityItem], capacity: f64) -> Result<PackedSelection> {
        validate(items, capacity)?;

        let mut total_weight = 0.0;
        let mut chosen = Vec::new();
        for index in density_order(items) {
            let weight = items[index].weight;
            if total_weight + weight <= capacity {
                total_weight += weight;
                chosen.push(index);
            }
        }

        let selection = PackedSelection::from_indices(items, chosen);
        tracing::debug!(
            items = items.len(),
            selected = selection.indices.len(),
            capacity,
            total_weight = selection.total_weight,
            "packed load by value density"
        );
        Ok(selection)
    }
}

/// Exact packer for small inputs: tries every subset.
///
/// Cost grows as 2^n. Above `max_items` (never more than
/// [`MAX_EXHAUSTIVE_ITEMS`]) it falls back to [`GreedyDensityPacker`].
/// Selected items are reported in density order, like the greedy packer.
#[derive(Debug, Clone, Copy)]
pub struct ExhaustivePacker {
    pub max_items: usize,
}

impl Default for ExhaustivePacker {
    fn default() -> Self {
        Self {
            max_items: DEFAULT_EXHAUSTIVE_LIMIT,
        }
    }
}

impl LoadPacker for ExhaustivePacker {
    fn pack(&self, items: &[CapacityItem], capacity: f64) -> Result<PackedSelection> {
        let limit = self.max_items.min(MAX_EXHAUSTIVE_ITEMS);
        if items.len() > limit {
            tracing::debug!(
                items = items.len(),
                limit,
                "too many items to enumerate, packing greedily"
            );
            return GreedyDensityPacker.pack(items, capacity);
        }
        validate(items, capacity)?;

        // Bit k of a mask selects sorted[k]; sums run in density order so
        // the feasibility check matches the reported totals.
        let sorted = density_order(items);
        let mut best_mask = 0u64;
        let mut best_value = 0.0;
        let mut best_weight = 0.0;

        for mask in 0..(1u64 << sorted.len()) {
            let mut weight = 0.0;
            let mut value = 0.0;
            for (bit, &index) in sorted.iter().enumerate() {
                if mask & (1 << bit) != 0 {
                    weight += items[index].weight;
                    value += items[index].value;
                }
            }
            if weight > capacity {
                continue;
            }
            let better = value > best_value || (value == best_value && weight < best_weight);
            if better {
                best_mask = mask;
                best_value = value;
                best_weight = weight;
            }
        }

        let chosen = sorted
            .iter()
            .enumerate()
            .filter(|(bit, _)| best_mask & (1 << bit) != 0)
            .map(|(_, &index)| index)
            .collect();

        Ok(PackedSelection::from_indices(items, chosen))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(pairs: &[(f64, f64)]) -> Vec<CapacityItem> {
        pairs.iter().map(|&(w, v)| CapacityItem::new(w, v)).collect()
    }

    #[test]
    fn test_greedy_takes_densest_first() {
        let input = items(&[(2.0, 10.0), (3.0, 9.0), (4.0, 8.0)]);
        let selection = GreedyDensityPacker.pack(&input, 5.0).unwrap();

        assert_eq!(selection.items, items(&[(2.0, 10.0), (3.0, 9.0)]));
        assert_eq!(selection.indices, vec![0, 1]);
        assert_eq!(selection.total_weight, 5.0);
        assert_eq!(selection.total_value, 19.0);
    }

    #[test]
    fn test_greedy_output_is_density_order() {
        let input = items(&[(4.0, 4.0), (1.0, 3.0), (2.0, 4.0)]);
        let selection = GreedyDensityPacker.pack(&input, 10.0).unwrap();
        assert_eq!(selection.indices, vec![1, 2, 0]);
    }

    #[test]
    fn test_greedy_skips_and_continues() {
        // The 4-weight item doesn't fit after the first, but the 1-weight one does.
        let input = items(&[(3.0, 30.0), (4.0, 20.0), (1.0, 1.0)]);
        let selection = GreedyDensityPacker.pack(&input, 5.0).unwrap();
        assert_eq!(selection.indices, vec![0, 2]);
        assert_eq!(selection.total_weight, 4.0);
    }

    #[test]
    fn test_greedy_is_not_optimal() {
        let input = items(&[(6.0, 7.0), (5.0, 5.0), (5.0, 5.0)]);
        let greedy = GreedyDensityPacker.pack(&input, 10.0).unwrap();
        assert_eq!(greedy.indices, vec![0]);
        assert_eq!(greedy.total_value, 7.0);

        let exact = ExhaustivePacker::default().pack(&input, 10.0).unwrap();
        assert_eq!(exact.indices, vec![1, 2]);
        assert_eq!(exact.total_value, 10.0);
    }

    #[test]
    fn test_zero_capacity() {
        let input = items(&[(1.0, 5.0), (0.5, 1.0)]);
        let selection = GreedyDensityPacker.pack(&input, 0.0).unwrap();
        assert!(selection.items.is_empty());
        assert_eq!(selection.total_weight, 0.0);
    }

    #[test]
    fn test_zero_weight_always_accepted() {
        let input = items(&[(1.0, 5.0), (0.0, 0.0), (0.0, 2.0)]);
        let selection = GreedyDensityPacker.pack(&input, 0.0).unwrap();
        assert_eq!(selection.indices, vec![1, 2]);
        assert_eq!(selection.items[0].density(), f64::INFINITY);
    }

    #[test]
    fn test_empty_items() {
        let selection = GreedyDensityPacker.pack(&[], 10.0).unwrap();
        assert!(selection.items.is_empty());
        assert!(selection.indices.is_empty());
    }

    #[test]
    fn test_rejects_bad_input() {
        let input = items(&[(1.0, 1.0), (-2.0, 1.0)]);
        assert!(matches!(
            GreedyDensityPacker.pack(&input, 5.0),
            Err(PlannerError::NegativeWeight { index: 1, .. })
        ));

        let input = items(&[(1.0, -1.0)]);
        assert!(matches!(
            GreedyDensityPacker.pack(&input, 5.0),
            Err(PlannerError::NegativeValue { index: 0, .. })
        ));

        assert!(matches!(
            GreedyDensityPacker.pack(&[], -1.0),
            Err(PlannerError::NegativeCapacity(_))
        ));
        assert!(ExhaustivePacker::default().pack(&[], f64::NAN).is_err());
    }

    #[test]
    fn test_exhaustive_falls_back_above_limit() {
        let input = items(&[(6.0, 7.0), (5.0, 5.0), (5.0, 5.0)]);
        let packer = ExhaustivePacker { max_items: 2 };
        let selection = packer.pack(&input, 10.0).unwrap();
        assert_eq!(selection, GreedyDensityPacker.pack(&input, 10.0).unwrap());
    }

    #[test]
    fn test_exhaustive_limit_is_capped() {
        let input: Vec<CapacityItem> = (0..40)
            .map(|i| CapacityItem::new(1.0 + (i % 7) as f64, 2.0 + (i % 5) as f64))
            .collect();
        let packer = ExhaustivePacker { max_items: 60 };
        let selection = packer.pack(&input, 30.0).unwrap();
        assert_eq!(selection, GreedyDensityPacker.pack(&input, 30.0).unwrap());
    }
}
