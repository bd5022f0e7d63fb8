use bitvec::vec::BitVec;
use std::hash::BuildHasherDefault;

use wyhash::WyHash;

pub type BuildHasher = BuildHasherDefault<WyHash>;

// std's HashMap and HashSet, hashed with WyHash instead of SipHash.
pub type MutMap<K, V> = std::collections::HashMap<K, V, BuildHasher>;

pub type MutSet<K> = std::collections::HashSet<K, BuildHasher>;

/// A dense set of indices, for visited-sets keyed by a node's index.
///
/// Grows on demand, so the caller does not need to know the final arena size up front.
#[derive(Clone, Debug, Default)]
pub struct VisitedSet {
    bits: BitVec,
}

impl VisitedSet {
    /// Marks `index` as visited. Returns true iff it was not visited before.
    pub fn insert(&mut self, index: usize) -> bool {
        if index >= self.bits.len() {
            self.bits.resize(index + 1, false);
        }

        let was_set = self.bits[index];
        self.bits.set(index, true);

        !was_set
    }

    /// Unmarks `index`. Returns true iff it was visited.
    pub fn remove(&mut self, index: usize) -> bool {
        match self.bits.get_mut(index) {
            Some(mut bit) => {
                let was_set = *bit;
                *bit = false;
                was_set
            }
            None => false,
        }
    }

    pub fn contains(&self, index: usize) -> bool {
        self.bits.get(index).map(|bit| *bit).unwrap_or(false)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.iter_ones()
    }
}
