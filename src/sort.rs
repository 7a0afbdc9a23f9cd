//! Iterative, non-recursive quicksort.
//!
//! Explicit-stack formulation: the larger of the two partitions is
//! always pushed first so that the smaller one is processed next,
//! bounding stack growth at `O(log N)` in the worst case instead of
//! `O(N)`. This crate keeps its own implementation rather than reaching
//! for the standard library's sort so the stack bound in
//! [`crate::config::WORST_CASE_SORT_STACK`] is an explicit, checked
//! fact about the code rather than an assumption about `core`'s sort
//! internals.

use std::cmp::Ordering;

use crate::config::WORST_CASE_SORT_STACK;
use crate::error::{Result, SigV4Error};

/// Sorts `items` in place using `compare`, via an iterative quicksort
/// with an explicit, fixed-size range stack.
///
/// Returns [`SigV4Error::InsufficientMemory`] only in the pathological
/// case where the input is large enough that the partition stack would
/// need to grow past [`WORST_CASE_SORT_STACK`] entries (this cannot
/// happen for any `items.len()` this crate ever sorts — header and
/// query pair counts are bounded by [`crate::Limits`] long before this
/// point — but the bound is still enforced rather than assumed).
pub fn quicksort<T, F>(items: &mut [T], mut compare: F) -> Result<()>
where
    F: FnMut(&T, &T) -> Ordering,
{
    if items.len() < 2 {
        return Ok(());
    }

    let mut stack = [(0usize, 0usize); WORST_CASE_SORT_STACK];
    let mut top = 0usize;

    macro_rules! push {
        ($lo:expr, $hi:expr) => {{
            if top >= stack.len() {
                tracing::debug!(capacity = stack.len(), "sort stack exhausted");
                return Err(SigV4Error::InsufficientMemory);
            }
            stack[top] = ($lo, $hi);
            top += 1;
        }};
    }

    push!(0, items.len() - 1);

    while top > 0 {
        top -= 1;
        let (lo, hi) = stack[top];

        let pivot = partition(items, lo, hi, &mut compare);

        let left_len = if pivot > 0 && pivot - 1 > lo { pivot - 1 - lo } else { 0 };
        let right_len = if pivot + 1 < hi { hi - pivot - 1 } else { 0 };

        // Push the larger partition first so the smaller is processed
        // next off the stack, capping worst-case depth at O(log N).
        if left_len > right_len {
            if right_len > 0 {
                push!(pivot + 1, hi);
            }
            push!(lo, pivot.saturating_sub(1));
        } else {
            if left_len > 0 {
                push!(lo, pivot.saturating_sub(1));
            }
            if right_len > 0 {
                push!(pivot + 1, hi);
            }
        }
    }

    Ok(())
}

fn partition<T, F>(items: &mut [T], low: usize, high: usize, compare: &mut F) -> usize
where
    F: FnMut(&T, &T) -> Ordering,
{
    // Lomuto partition using the last element (`high`) as pivot. `i`
    // starts at `low` rather than `low - 1` to avoid unsigned underflow;
    // the first swap, if it happens at `j == i`, is a no-op.
    let mut i = low;
    for j in low..high {
        if compare(&items[j], &items[high]) == Ordering::Less {
            items.swap(i, j);
            i += 1;
        }
    }
    items.swap(i, high);
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sorts_integers() {
        let mut v = [5, 3, 8, 1, 9, 2, 7, 4, 6, 0];
        quicksort(&mut v, |a, b| a.cmp(b)).unwrap();
        assert_eq!(v, [0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn handles_duplicates_and_short_inputs() {
        let mut v = [1];
        quicksort(&mut v, |a, b| a.cmp(b)).unwrap();
        assert_eq!(v, [1]);

        let mut v: [i32; 0] = [];
        quicksort(&mut v, |a, b| a.cmp(b)).unwrap();

        let mut v = [3, 3, 3, 1, 1, 2];
        quicksort(&mut v, |a, b| a.cmp(b)).unwrap();
        assert_eq!(v, [1, 1, 2, 3, 3, 3]);
    }

    #[test]
    fn sorts_already_sorted_and_reverse_sorted() {
        let mut v: Vec<i32> = (0..50).collect();
        quicksort(&mut v, |a, b| a.cmp(b)).unwrap();
        assert_eq!(v, (0..50).collect::<Vec<_>>());

        let mut v: Vec<i32> = (0..50).rev().collect();
        quicksort(&mut v, |a, b| a.cmp(b)).unwrap();
        assert_eq!(v, (0..50).collect::<Vec<_>>());
    }
}
