use super::{Continuation, QueryFilterOf, QueryState, RayQuery, ReductionPolicy};
use crate::endpoints::RayEndpoints;
use crate::impact::{ImpactSet, QueryId};
use crate::world::SegmentTest;
use std::fmt;

/// A ray keeping every admitted impact, nearest first.
#[derive(Clone)]
pub struct AllHitsQuery<W: SegmentTest> {
    state: QueryState<W>,
}

impl<W: SegmentTest> AllHitsQuery<W> {
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

impl<W: SegmentTest> Default for AllHitsQuery<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: SegmentTest> RayQuery<W> for AllHitsQuery<W> {
    fn execute_segment(&mut self, endpoints: RayEndpoints, world: &W) -> bool {
        self.state.scan(endpoints, world, Continuation::Full);
        self.state.impacts.sort_closest_first();

        log::debug!(
            "query {} kept {} impacts",
            self.state.id,
            self.state.impacts.len()
        );
        !self.state.impacts.is_empty()
    }

    fn boxed_clone(&self) -> Box<dyn RayQuery<W>> {
        Box::new(self.clone())
    }

    fn id(&self) -> QueryId {
        self.state.id
    }

    fn policy(&self) -> ReductionPolicy {
        ReductionPolicy::All
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

impl<W: SegmentTest> fmt::Debug for AllHitsQuery<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllHitsQuery")
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::AllHitsQuery;
    use crate::query::{QueryFilter, RayQuery};
    use crate::scripted::ScriptedWorld;

    #[test]
    fn keeps_every_admitted_impact_sorted() {
        let world = ScriptedWorld::new(&[(1, 0.8), (2, 0.2), (3, 0.5), (4, 0.2)]);
        let mut query = AllHitsQuery::<ScriptedWorld>::with_filter(QueryFilter::new().exclude_body(3));

        assert!(query.execute(0.0, 0.0, 0.0, 10.0, 0.0, 0.0, &world));
        let kept: Vec<_> = query
            .impacts()
            .iter()
            .map(|r| (r.body, r.intersection_param))
            .collect();
        assert_eq!(kept, [(2, 0.2), (4, 0.2), (1, 0.8)]);
        assert_eq!(world.reported(), [1, 2, 4]);
    }

    #[test]
    fn miss_leaves_no_impacts() {
        let mut query = AllHitsQuery::new();

        assert!(query.execute(0.0, 0.0, 0.0, 1.0, 0.0, 0.0, &ScriptedWorld::new(&[(1, 0.5)])));
        assert!(!query.execute(0.0, 0.0, 0.0, 1.0, 0.0, 0.0, &ScriptedWorld::new(&[])));
        assert!(query.impacts().is_empty());
    }
}
