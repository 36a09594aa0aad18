//! Street-name pool issuing unique names without replacement.

use std::collections::HashSet;

use rand::Rng;

use crate::error::NamePoolError;

/// Finite pool of candidate street names.
///
/// Names are drawn uniformly from the ones not yet issued and are never
/// handed out twice during the pool's lifetime.
///
/// # Examples
/// ```
/// use citygrid_core::NamePool;
/// use rand::{SeedableRng, rngs::SmallRng};
///
/// let mut rng = SmallRng::seed_from_u64(7);
/// let mut pool = NamePool::new(["Rua A", "Rua B"]);
/// let first = pool.next_unique_name(&mut rng)?;
/// let second = pool.next_unique_name(&mut rng)?;
/// assert_ne!(first, second);
/// assert!(pool.next_unique_name(&mut rng).is_err());
/// # Ok::<(), citygrid_core::NamePoolError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct NamePool {
    available: Vec<String>,
    issued: HashSet<String>,
}

impl NamePool {
    /// Builds a pool from candidate names, dropping duplicates.
    ///
    /// The first occurrence of each name is kept so the candidate order, and
    /// therefore seeded draws, only depend on the input sequence.
    #[must_use]
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut seen = HashSet::new();
        let available = names
            .into_iter()
            .map(Into::into)
            .filter(|name| seen.insert(name.clone()))
            .collect();
        Self {
            available,
            issued: HashSet::new(),
        }
    }

    /// Issues a name that has not been issued before.
    ///
    /// # Errors
    /// Returns [`NamePoolError::Exhausted`] when every candidate has already
    /// been issued.
    pub fn next_unique_name<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<String, NamePoolError> {
        if self.available.is_empty() {
            return Err(NamePoolError::Exhausted {
                issued: self.issued.len(),
            });
        }
        let index = rng.gen_range(0..self.available.len());
        let name = self.available.swap_remove(index);
        self.issued.insert(name.clone());
        Ok(name)
    }

    /// Total number of distinct candidate names.
    #[must_use]
    pub fn len(&self) -> usize {
        self.available.len() + self.issued.len()
    }

    /// Returns whether the pool holds no candidates at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of names that can still be issued.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.available.len()
    }

    /// Number of names issued so far.
    #[must_use]
    pub fn issued_count(&self) -> usize {
        self.issued.len()
    }

    /// Returns whether `name` has already been issued.
    #[must_use]
    pub fn is_issued(&self, name: &str) -> bool {
        self.issued.contains(name)
    }
}
