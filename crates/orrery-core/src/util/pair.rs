// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! An unordered pair of values of the same type.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// A pair of two values of the same type whose equality and hash ignore
/// element order: `Pair::new(a, b) == Pair::new(b, a)`.
///
/// Used for tracking currently-overlapping objects and for collision event
/// payloads, where "a touches b" and "b touches a" are the same fact.
#[derive(Debug, Copy, Clone)]
pub struct Pair<T> {
    first: T,
    second: T,
}

impl<T> Pair<T> {
    /// Creates a new pair.
    pub fn new(first: T, second: T) -> Self {
        Self { first, second }
    }

    /// Gets the first element of this pair.
    pub fn first(&self) -> &T {
        &self.first
    }

    /// Gets the second element of this pair.
    pub fn second(&self) -> &T {
        &self.second
    }
}

impl<T: PartialEq> Pair<T> {
    /// Checks whether the given value is a member of this pair.
    pub fn contains(&self, value: &T) -> bool {
        self.first == *value || self.second == *value
    }

    /// Given one member of the pair, gets the other. Returns `None` when the
    /// given value is not a member of this pair.
    pub fn other(&self, value: &T) -> Option<&T> {
        if self.first == *value {
            Some(&self.second)
        } else if self.second == *value {
            Some(&self.first)
        } else {
            None
        }
    }
}

impl<T: PartialEq> PartialEq for Pair<T> {
    fn eq(&self, other: &Self) -> bool {
        (self.first == other.first && self.second == other.second)
            || (self.first == other.second && self.second == other.first)
    }
}

impl<T: Eq> Eq for Pair<T> {}

impl<T: Hash> Hash for Pair<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Hash each element independently, then feed the two sub-hashes in a
        // fixed (sorted) order so both orderings produce the same hash.
        fn sub_hash<T: Hash>(value: &T) -> u64 {
            let mut hasher = DefaultHasher::new();
            value.hash(&mut hasher);
            hasher.finish()
        }

        let a = sub_hash(&self.first);
        let b = sub_hash(&self.second);
        a.min(b).hash(state);
        a.max(b).hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn equality_ignores_order() {
        assert_eq!(Pair::new(1, 2), Pair::new(2, 1));
        assert_ne!(Pair::new(1, 2), Pair::new(1, 3));
    }

    #[test]
    fn hash_ignores_order_in_sets() {
        let mut set = HashSet::new();
        assert!(set.insert(Pair::new("a", "b")));
        assert!(!set.insert(Pair::new("b", "a")));
        assert!(set.contains(&Pair::new("b", "a")));
        assert!(set.remove(&Pair::new("b", "a")));
        assert!(set.is_empty());
    }

    #[test]
    fn contains_and_other() {
        let pair = Pair::new(10, 20);
        assert!(pair.contains(&10));
        assert!(pair.contains(&20));
        assert!(!pair.contains(&30));
        assert_eq!(pair.other(&10), Some(&20));
        assert_eq!(pair.other(&20), Some(&10));
        assert_eq!(pair.other(&30), None);
    }

    #[test]
    fn degenerate_pair_of_equal_elements() {
        let pair = Pair::new(5, 5);
        assert_eq!(pair.other(&5), Some(&5));
        assert_eq!(pair, Pair::new(5, 5));
    }
}
