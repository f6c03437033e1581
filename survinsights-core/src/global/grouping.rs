//! Keyed running-mean accumulator used by the PDP and ALE engines.

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Accumulator {
    sum: f64,
    count: usize,
}

/// Groups values by a composite key and reduces each group to its mean.
///
/// Keys are ordered, so the finished groups come out sorted regardless of
/// insertion order. Only keys that received at least one value appear.
#[derive(Debug, Clone)]
pub struct GroupedMean<K> {
    groups: BTreeMap<K, Accumulator>,
}

impl<K: Ord> Default for GroupedMean<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord> GroupedMean<K> {
    pub fn new() -> Self {
        Self {
            groups: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, key: K, value: f64) {
        let acc = self.groups.entry(key).or_default();
        acc.sum += value;
        acc.count += 1;
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// `(key, mean, count)` for every non-empty group, in key order.
    pub fn finish(self) -> Vec<(K, f64, usize)> {
        self.groups
            .into_iter()
            .map(|(key, acc)| (key, acc.sum / acc.count as f64, acc.count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_means_in_key_order() {
        let mut g = GroupedMean::new();
        g.add((1, 0), 4.0);
        g.add((0, 1), 1.0);
        g.add((1, 0), 2.0);
        g.add((0, 1), 3.0);
        g.add((0, 0), 5.0);
        assert_eq!(
            g.finish(),
            vec![((0, 0), 5.0, 1), ((0, 1), 2.0, 2), ((1, 0), 3.0, 2)]
        );
    }

    #[test]
    fn test_insertion_order_independent() {
        let values = [((2usize, 0usize), 1.5), ((0, 0), -1.0), ((2, 0), 0.5)];
        let mut forward = GroupedMean::new();
        let mut backward = GroupedMean::new();
        for (k, v) in values {
            forward.add(k, v);
        }
        for (k, v) in values.into_iter().rev() {
            backward.add(k, v);
        }
        assert_eq!(forward.finish(), backward.finish());
    }

    #[test]
    fn test_empty() {
        let g: GroupedMean<usize> = GroupedMean::default();
        assert!(g.is_empty());
        assert!(g.finish().is_empty());
    }
}
