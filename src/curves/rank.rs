//! Empirical ranks with tie handling
//!
//! Ranks are 1-based and returned in the input order.

use std::cmp::Ordering;

pub(crate) fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.partial_cmp(&b).unwrap_or(Ordering::Equal)
}

/// Rank with the largest value first; tied values all get the smallest rank
/// of their group.
pub fn rank_descending_min(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| cmp_f64(values[b], values[a]));

    let mut ranks = vec![0; values.len()];
    for (start, end) in tie_groups(values, &order) {
        for &i in &order[start..end] {
            ranks[i] = start + 1;
        }
    }
    ranks
}

/// Rank with the smallest value first; tied values all get the largest rank
/// of their group.
pub fn rank_ascending_max(values: &[f64]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..values.len()).collect();
    order.sort_by(|&a, &b| cmp_f64(values[a], values[b]));

    let mut ranks = vec![0; values.len()];
    for (start, end) in tie_groups(values, &order) {
        for &i in &order[start..end] {
            ranks[i] = end;
        }
    }
    ranks
}

/// Half-open position ranges of equal values along a sorted order
fn tie_groups(values: &[f64], order: &[usize]) -> Vec<(usize, usize)> {
    let mut groups = Vec::new();
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && values[order[end]] == values[order[start]] {
            end += 1;
        }
        groups.push((start, end));
        start = end;
    }
    groups
}
