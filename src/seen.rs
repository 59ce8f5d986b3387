// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use std::collections::{HashSet, VecDeque};

/// Default number of identifiers remembered
pub const DEFAULT_SEEN_CAPACITY: usize = 1000;

/// Bounded record of post identifiers that were already shown.
///
/// Identifiers are kept in the order they were first recorded. Once more than
/// `capacity` are held, the oldest ones are forgotten first.
#[derive(Debug, Clone)]
pub struct SeenSet {
    order: VecDeque<String>,
    index: HashSet<String>,
    capacity: usize,
}

impl SeenSet {
    /// Create an empty set remembering at most `capacity` identifiers
    pub fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity.min(DEFAULT_SEEN_CAPACITY)),
            index: HashSet::new(),
            capacity,
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(id)
    }

    /// Append identifiers in order, then forget the oldest beyond capacity.
    ///
    /// Identifiers already present keep their original position.
    pub fn record_all<I, S>(&mut self, ids: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for id in ids {
            let id = id.into();
            if self.index.insert(id.clone()) {
                self.order.push_back(id);
            }
        }
        self.trim_to_capacity();
    }

    /// Drop the oldest `len - capacity` identifiers, if any
    pub fn trim_to_capacity(&mut self) {
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.index.remove(&oldest);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Identifiers from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}

impl Default for SeenSet {
    fn default() -> Self {
        Self::new(DEFAULT_SEEN_CAPACITY)
    }
}
