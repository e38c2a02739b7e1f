//! Deterministic work partitioning
//!
//! Workers never coordinate: each `(worker, iteration)` pair maps to its own
//! slot in the shared input array.

use crate::error::{ExchangeError, ExchangeResult};
use std::fmt;

/// Global zero-based slot for a 1-based worker and a 0-based iteration.
///
/// For `W` workers of `iterations_per_worker` iterations each this is a
/// bijection onto `0..W * iterations_per_worker`.
pub fn wallet_index(worker_id: u32, iteration_id: u32, iterations_per_worker: u32) -> usize {
    debug_assert!(worker_id >= 1, "worker ids start at 1");
    (worker_id.saturating_sub(1) as usize) * iterations_per_worker as usize + iteration_id as usize
}

/// Who is running: passed explicitly to everything that needs it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionContext {
    /// 1-based
    pub worker_id: u32,
    /// 0-based
    pub iteration_id: u32,
    pub iterations_per_worker: u32,
}

impl ExecutionContext {
    pub fn new(worker_id: u32, iteration_id: u32, iterations_per_worker: u32) -> Self {
        Self {
            worker_id,
            iteration_id,
            iterations_per_worker,
        }
    }

    pub fn wallet_index(&self) -> usize {
        wallet_index(self.worker_id, self.iteration_id, self.iterations_per_worker)
    }

    /// Round-robin issuer assignment, offset by worker so that concurrent
    /// workers start on different issuers
    pub fn issuer_index(&self, num_issuers: usize) -> usize {
        if num_issuers == 0 {
            return 0;
        }
        (self.worker_id as usize + self.iteration_id as usize).saturating_sub(1) % num_issuers
    }

    /// This iteration's record from a phase input
    pub fn record<'a, T>(&self, records: &'a [T]) -> ExchangeResult<&'a T> {
        let index = self.wallet_index();
        records.get(index).ok_or(ExchangeError::MissingRecord {
            index,
            available: records.len(),
        })
    }
}

impl fmt::Display for ExecutionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "worker {} iteration {}", self.worker_id, self.iteration_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    #[test]
    fn test_first_slots() {
        assert_eq!(wallet_index(1, 0, 3), 0);
        assert_eq!(wallet_index(1, 2, 3), 2);
        assert_eq!(wallet_index(2, 0, 3), 3);
        assert_eq!(wallet_index(4, 1, 10), 31);
    }

    #[test]
    fn test_issuer_rotation() {
        let picks: Vec<_> = (0..4)
            .map(|i| ExecutionContext::new(1, i, 4).issuer_index(3))
            .collect();
        assert_eq!(picks, vec![0, 1, 2, 0]);

        assert_eq!(ExecutionContext::new(2, 0, 4).issuer_index(3), 1);
        assert_eq!(ExecutionContext::new(5, 7, 8).issuer_index(1), 0);
        assert_eq!(ExecutionContext::new(1, 0, 1).issuer_index(0), 0);
    }

    #[test]
    fn test_record_lookup() {
        let records = vec!["a", "b", "c", "d"];
        assert_eq!(*ExecutionContext::new(2, 1, 2).record(&records).unwrap(), "d");

        let err = ExecutionContext::new(3, 0, 2).record(&records).unwrap_err();
        assert!(matches!(
            err,
            ExchangeError::MissingRecord {
                index: 4,
                available: 4
            }
        ));
    }

    proptest! {
        #[test]
        fn test_partition_is_bijection(workers in 1u32..=50, iterations in 1u32..=50) {
            let mut seen = HashSet::new();
            for w in 1..=workers {
                for i in 0..iterations {
                    let index = wallet_index(w, i, iterations);
                    prop_assert!(index < (workers * iterations) as usize);
                    prop_assert!(seen.insert(index), "duplicate slot {}", index);
                }
            }
            prop_assert_eq!(seen.len(), (workers * iterations) as usize);
        }
    }
}
