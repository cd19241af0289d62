use crate::query::RayQuery;
use crate::world::SegmentTest;
use std::collections::VecDeque;

/// Keeps snapshots of the last executed rays so they can be inspected or
/// drawn after the queries themselves have been reused.
pub struct RayRecorder<W: SegmentTest> {
    capacity: usize,
    snapshots: VecDeque<Box<dyn RayQuery<W>>>,
}

impl<W: SegmentTest> RayRecorder<W> {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            snapshots: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Stores a copy of `query`, evicting the oldest snapshot when full.
    pub fn record(&mut self, query: &dyn RayQuery<W>) {
        if self.capacity == 0 {
            return;
        }

        if self.snapshots.len() == self.capacity {
            self.snapshots.pop_front();
        }

        if let Some(endpoints) = query.endpoints() {
            log::debug!(
                "recorded {} ray {} from {} to {}: {} impacts",
                query.policy(),
                query.id(),
                endpoints.start,
                endpoints.end,
                query.impacts().len()
            );
        }

        self.snapshots.push_back(query.boxed_clone());
    }

    /// Snapshots from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &dyn RayQuery<W>> + '_ {
        self.snapshots.iter().map(|query| query.as_ref())
    }

    pub fn latest(&self) -> Option<&dyn RayQuery<W>> {
        self.snapshots.back().map(|query| query.as_ref())
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }
}
