//! Parallel evaluation policy.

/// Decides when a batch is evaluated on the rayon pool.
///
/// Batches with fewer than `min_parallel_samples` samples run on the calling
/// thread. Results do not depend on the policy.
///
/// # Examples
///
/// ```rust
/// use sphericart_core::calculator::ParallelPolicy;
///
/// let policy = ParallelPolicy::default();
/// assert!(!policy.should_split(10));
/// assert!(policy.should_split(10_000));
/// assert!(!ParallelPolicy::sequential().should_split(1_000_000_000));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParallelPolicy {
    /// Smallest batch that is split across threads (default: 256).
    pub min_parallel_samples: usize,
}

impl Default for ParallelPolicy {
    fn default() -> Self {
        Self {
            min_parallel_samples: 256,
        }
    }
}

impl ParallelPolicy {
    /// Policy that never leaves the calling thread.
    pub const fn sequential() -> Self {
        Self {
            min_parallel_samples: usize::MAX,
        }
    }

    /// Policy splitting batches of at least `min_parallel_samples` samples.
    pub const fn threshold(min_parallel_samples: usize) -> Self {
        Self {
            min_parallel_samples,
        }
    }

    /// Returns true if a batch of `n_samples` should be split.
    #[inline]
    pub fn should_split(&self, n_samples: usize) -> bool {
        n_samples >= self.min_parallel_samples && n_samples > 1
    }
}
