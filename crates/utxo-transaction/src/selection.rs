//! Coin selection over a snapshot of available outputs.
//!
//! A selection is acceptable when it covers the target and leaves change
//! that is either zero or at least the dust threshold, so the builder can
//! always emit a change output. When no acceptable subset exists the
//! smallest covering prefix is returned and the builder's dust policy
//! decides what happens to the remainder.

use crate::config::SelectionStrategy;

/// Above this many candidates the branch-and-bound search is skipped.
const MAX_SEARCH_INPUTS: usize = 1_000;

/// Upper bound on search states visited before settling for the best so far.
const MAX_TRIES: usize = 100_000;

/// Value a selection must reach and the change floor it must respect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SelectionTarget {
    pub target: u64,
    pub dust: u64,
}

impl SelectionTarget {
    /// Whether `total` covers the target with change that can be emitted.
    fn accepts(&self, total: u64) -> bool {
        match total.checked_sub(self.target) {
            Some(0) => true,
            Some(change) => change >= self.dust,
            None => false,
        }
    }
}

/// Pick candidates for `goal`. `candidates` holds `(slot, value)` pairs in
/// insertion order; the returned slots are in selection order.
pub(crate) fn select(
    candidates: &[(usize, u64)],
    goal: SelectionTarget,
    strategy: SelectionStrategy,
) -> Option<Vec<usize>> {
    match strategy {
        SelectionStrategy::InsertionOrder => greedy(candidates.iter().copied(), goal),
        SelectionStrategy::LargestFirst => greedy(largest_first(candidates), goal),
        SelectionStrategy::BranchAndBound => {
            let sorted: Vec<(usize, u64)> = largest_first(candidates).collect();
            if sorted.len() > MAX_SEARCH_INPUTS {
                tracing::debug!(candidates = sorted.len(), "too many candidates for search, selecting greedily");
                return greedy(sorted.into_iter(), goal);
            }
            branch_and_bound(&sorted, goal).or_else(|| greedy(sorted.into_iter(), goal))
        }
    }
}

/// Stable descending sort, so equal values keep insertion order.
fn largest_first(candidates: &[(usize, u64)]) -> impl Iterator<Item = (usize, u64)> {
    let mut sorted = candidates.to_vec();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted.into_iter()
}

/// Take candidates in order until the total is acceptable.
///
/// Falls back to the first prefix that covers the target when no prefix
/// leaves emittable change.
fn greedy(candidates: impl Iterator<Item = (usize, u64)>, goal: SelectionTarget) -> Option<Vec<usize>> {
    let mut picked = Vec::new();
    let mut total = 0u64;
    let mut first_cover = None;

    for (slot, value) in candidates {
        picked.push(slot);
        total = total.saturating_add(value);
        if goal.accepts(total) {
            return Some(picked);
        }
        if total >= goal.target && first_cover.is_none() {
            first_cover = Some(picked.len());
        }
    }

    let covered = first_cover?;
    tracing::debug!(
        target = goal.target,
        dust = goal.dust,
        inputs = covered,
        "no selection leaves emittable change"
    );
    picked.truncate(covered);
    Some(picked)
}

#[derive(Debug, Clone)]
struct SearchState {
    /// Positions into the sorted candidate list.
    picked: Vec<usize>,
    index: usize,
    value: u64,
    /// Value of the candidates from `index` on.
    remaining: u64,
}

/// Depth-first search over include/exclude decisions.
///
/// Fewer inputs wins, then less change. A branch stops growing once it is
/// acceptable, and is cut when it can no longer reach the target or can only
/// end up with more inputs than the best selection so far.
fn branch_and_bound(sorted: &[(usize, u64)], goal: SelectionTarget) -> Option<Vec<usize>> {
    let total = sorted.iter().map(|(_, v)| *v).fold(0u64, u64::saturating_add);
    let mut best: Option<(Vec<usize>, u64)> = None;
    let mut stack = vec![SearchState {
        picked: Vec::new(),
        index: 0,
        value: 0,
        remaining: total,
    }];
    let mut tries = 0usize;

    while let Some(state) = stack.pop() {
        tries += 1;
        if tries > MAX_TRIES {
            tracing::debug!(tries = MAX_TRIES, "selection search stopped at the try limit");
            break;
        }

        if !state.picked.is_empty() && goal.accepts(state.value) {
            let change = state.value - goal.target;
            let better = match &best {
                None => true,
                Some((picked, best_change)) => {
                    (state.picked.len(), change) < (picked.len(), *best_change)
                }
            };
            if better {
                best = Some((state.picked, change));
            }
            continue;
        }

        if state.index >= sorted.len() || state.value.saturating_add(state.remaining) < goal.target {
            continue;
        }
        if let Some((picked, _)) = &best {
            if state.picked.len() + 1 > picked.len() {
                continue;
            }
        }

        let value = sorted[state.index].1;
        let remaining = state.remaining.saturating_sub(value);

        // exclude is pushed first so the include branch is explored first
        stack.push(SearchState {
            picked: state.picked.clone(),
            index: state.index + 1,
            value: state.value,
            remaining,
        });
        let mut picked = state.picked;
        picked.push(state.index);
        stack.push(SearchState {
            picked,
            index: state.index + 1,
            value: state.value.saturating_add(value),
            remaining,
        });
    }

    let (picked, change) = best?;
    tracing::debug!(inputs = picked.len(), change, tries, "selection search finished");
    Some(picked.into_iter().map(|i| sorted[i].0).collect())
}
