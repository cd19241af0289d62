//! Ray queries and their reduction policies.
//!
//! Every query runs the same collection step: it hands a callback bound to
//! itself to the world, keeps each admitted impact, and reduces the collected
//! set once the world returns. Queries only differ in that reduction.

mod all;
mod closest;
mod filter;
mod first;

pub use all::AllHitsQuery;
pub use closest::{ClosestHitQuery, ClosestHitState, ScanMode};
pub use filter::QueryFilter;
pub use first::FirstHitQuery;

use crate::endpoints::RayEndpoints;
use crate::impact::{ImpactRecord, ImpactSet, QueryId, RayHit};
use crate::world::{Admission, RayCallback, SegmentTest, FULL_SEGMENT, STOP_SCAN};
use crate::Real;
use std::fmt;

/// How the raw impacts of a query are reduced.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum ReductionPolicy {
    /// Keep the impact nearest to the segment start.
    #[default]
    Closest,
    /// Keep every impact, nearest first.
    All,
    /// Keep the first impact reported by the world and stop scanning.
    First,
}

pub type QueryFilterOf<W> = QueryFilter<<W as SegmentTest>::Body, <W as SegmentTest>::Shape>;

/// A segment test against a world `W`, with a policy to reduce its impacts.
pub trait RayQuery<W: SegmentTest> {
    /// Tests the segment `(x0, y0, z0) -> (x1, y1, z1)` against `world`.
    #[allow(clippy::too_many_arguments)]
    fn execute(
        &mut self,
        x0: Real,
        y0: Real,
        z0: Real,
        x1: Real,
        y1: Real,
        z1: Real,
        world: &W,
    ) -> bool {
        self.execute_segment(RayEndpoints::from_coords(x0, y0, z0, x1, y1, z1), world)
    }

    /// Tests `endpoints` against `world`, discarding the results of any
    /// previous execution first.
    ///
    /// Returns `true` if at least one impact is left after reduction.
    fn execute_segment(&mut self, endpoints: RayEndpoints, world: &W) -> bool;

    /// Returns an independent copy of this query and its current results.
    fn boxed_clone(&self) -> Box<dyn RayQuery<W>>;

    fn id(&self) -> QueryId;

    fn policy(&self) -> ReductionPolicy;

    fn impacts(&self) -> &ImpactSet<W::Body>;

    /// The segment of the last execution, if any.
    fn endpoints(&self) -> Option<&RayEndpoints>;

    /// The world of the last execution, if any.
    fn world(&self) -> Option<&W>;

    fn filter(&self) -> &QueryFilterOf<W>;

    fn closest(&self) -> Option<&ImpactRecord<W::Body>> {
        self.impacts().first()
    }
}

/// Builds a boxed query for `policy`. `mode` only applies to [`ReductionPolicy::Closest`].
pub fn boxed<W: SegmentTest>(
    policy: ReductionPolicy,
    mode: ScanMode,
    filter: QueryFilterOf<W>,
) -> Box<dyn RayQuery<W>> {
    match policy {
        ReductionPolicy::Closest => Box::new(ClosestHitQuery::with_filter(filter).with_mode(mode)),
        ReductionPolicy::All => Box::new(AllHitsQuery::with_filter(filter)),
        ReductionPolicy::First => Box::new(FirstHitQuery::with_filter(filter)),
    }
}

/// What an impact callback answers the world.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Continuation {
    /// Keep scanning the whole segment.
    Full,
    /// Only scan up to the nearest impact found so far.
    Shrink,
    /// Stop after the first impact.
    Stop,
}

/// State shared by all query variants.
#[derive(Clone)]
pub(crate) struct QueryState<W: SegmentTest> {
    pub id: QueryId,
    pub endpoints: Option<RayEndpoints>,
    pub world: Option<W>,
    pub impacts: ImpactSet<W::Body>,
    pub filter: QueryFilterOf<W>,
}

impl<W: SegmentTest> QueryState<W> {
    pub fn new(filter: QueryFilterOf<W>) -> Self {
        Self {
            id: QueryId::new(),
            endpoints: None,
            world: None,
            impacts: ImpactSet::new(),
            filter,
        }
    }

    /// Resets the state and collects the admitted impacts of one segment test.
    pub fn scan(&mut self, endpoints: RayEndpoints, world: &W, continuation: Continuation) {
        self.impacts.clear();
        self.endpoints = Some(endpoints);
        self.world = Some(world.clone());

        let mut collector: ImpactCollector<'_, W> = ImpactCollector {
            query: self.id,
            filter: &self.filter,
            impacts: &mut self.impacts,
            continuation,
            bound: FULL_SEGMENT,
        };
        world.segment_test(&endpoints.start, &endpoints.end, &mut collector);

        log::trace!(
            "query {} collected {} impacts from {} to {}",
            self.id,
            self.impacts.len(),
            endpoints.start,
            endpoints.end
        );
    }

    /// Drops the results and the world handle of the last execution.
    pub fn reset(&mut self) {
        self.impacts.clear();
        self.endpoints = None;
        self.world = None;
    }

    /// Gives the copy its own identity. Records keep the id of the query that collected them.
    pub fn fork(&self) -> Self {
        Self {
            id: QueryId::new(),
            ..self.clone()
        }
    }
}

impl<W: SegmentTest> fmt::Debug for QueryState<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryState")
            .field("id", &self.id)
            .field("endpoints", &self.endpoints)
            .field("impacts", &self.impacts)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

/// The callback handed to the world during a scan.
struct ImpactCollector<'a, W: SegmentTest> {
    query: QueryId,
    filter: &'a QueryFilterOf<W>,
    impacts: &'a mut ImpactSet<W::Body>,
    continuation: Continuation,
    bound: Real,
}

impl<'a, W: SegmentTest> RayCallback<W::Body, W::Shape> for ImpactCollector<'a, W> {
    fn admit(&mut self, body: W::Body, shape: &W::Shape) -> Admission {
        let admission = self.filter.test(body, shape);
        if !admission.is_admitted() {
            log::trace!("query {} rejected {:?}", self.query, body);
        }
        admission
    }

    fn report_impact(&mut self, hit: RayHit<W::Body>) -> Real {
        let t = hit.intersection_param;
        self.impacts.push(ImpactRecord::from_hit(hit, self.query));

        match self.continuation {
            Continuation::Full => FULL_SEGMENT,
            Continuation::Shrink => {
                self.bound = self.bound.min(t);
                self.bound
            }
            Continuation::Stop => STOP_SCAN,
        }
    }
}
