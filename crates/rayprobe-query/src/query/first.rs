use super::{Continuation, QueryFilterOf, QueryState, RayQuery, ReductionPolicy};
use crate::endpoints::RayEndpoints;
use crate::impact::{ImpactSet, QueryId};
use crate::world::SegmentTest;
use std::fmt;

/// A ray stopping at the first admitted impact the world reports.
///
/// Cheaper than a [`ClosestHitQuery`](super::ClosestHitQuery) when any
/// obstruction will do, e.g. for line of sight checks. The kept impact is not
/// necessarily the nearest one.
#[derive(Clone)]
pub struct FirstHitQuery<W: SegmentTest> {
    state: QueryState<W>,
}

impl<W: SegmentTest> FirstHitQuery<W> {
    pub fn new() -> Self {
        Self::with_filter(QueryFilterOf::<W>::new())
    }

    pub fn with_filter(filter: QueryFilterOf<W>) -> Self {
        Self {
            state: QueryState::new(filter),
        }
    }

    pub fn filter_mut(&mut self) -> &mut QueryFilterOf<W> {
        &mut self.state.filter
    }
}

impl<W: SegmentTest> Default for FirstHitQuery<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: SegmentTest> RayQuery<W> for FirstHitQuery<W> {
    fn execute_segment(&mut self, endpoints: RayEndpoints, world: &W) -> bool {
        self.state.scan(endpoints, world, Continuation::Stop);
        // Worlds are allowed to ignore the stop request.
        self.state.impacts.truncate(1);

        !self.state.impacts.is_empty()
    }

    fn boxed_clone(&self) -> Box<dyn RayQuery<W>> {
        Box::new(self.clone())
    }

    fn id(&self) -> QueryId {
        self.state.id
    }

    fn policy(&self) -> ReductionPolicy {
        ReductionPolicy::First
    }

    fn impacts(&self) -> &ImpactSet<W::Body> {
        &self.state.impacts
    }

    fn endpoints(&self) -> Option<&RayEndpoints> {
        self.state.endpoints.as_ref()
    }

    fn world(&self) -> Option<&W> {
        self.state.world.as_ref()
    }

    fn filter(&self) -> &QueryFilterOf<W> {
        &self.state.filter
    }
}

impl<W: SegmentTest> fmt::Debug for FirstHitQuery<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FirstHitQuery")
            .field("state", &self.state)
            .finish()
    }
}
