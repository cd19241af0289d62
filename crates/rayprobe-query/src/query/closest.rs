use super::{Continuation, QueryFilterOf, QueryState, RayQuery, ReductionPolicy};
use crate::endpoints::RayEndpoints;
use crate::impact::{ImpactSet, QueryId};
use crate::world::SegmentTest;
use std::fmt;

/// How much of the segment a [`ClosestHitQuery`] asks the world to scan.
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
pub enum ScanMode {
    /// Collect every impact along the segment, then keep the nearest.
    #[default]
    Exhaustive,
    /// Shrink the scanned range to the nearest impact found so far.
    Pruned,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum ClosestHitState {
    /// Never executed, or reset since the last execution.
    #[default]
    Idle,
    Scanning,
    /// The last execution kept exactly one impact.
    Hit,
    /// The last execution found no admitted impact.
    Miss,
}

/// A ray keeping only the impact nearest to its start.
///
/// Impacts sharing the smallest intersection parameter are resolved in
/// favor of the one reported first.
#[derive(Clone)]
pub struct ClosestHitQuery<W: SegmentTest> {
    state: QueryState<W>,
    mode: ScanMode,
    phase: ClosestHitState,
}

impl<W: SegmentTest> ClosestHitQuery<W> {
    pub fn new() -> Self {
        Self::with_filter(QueryFilterOf::<W>::new())
    }

    pub fn with_filter(filter: QueryFilterOf<W>) -> Self {
        Self {
            state: QueryState::new(filter),
            mode: ScanMode::default(),
            phase: ClosestHitState::Idle,
        }
    }

    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ScanMode) {
        self.mode = mode;
    }

    pub fn state(&self) -> ClosestHitState {
        self.phase
    }

    pub fn filter_mut(&mut self) -> &mut QueryFilterOf<W> {
        &mut self.state.filter
    }

    /// Discards the last results and releases the world handle, returning to
    /// [`ClosestHitState::Idle`]. The filter and scan mode are kept.
    pub fn reset(&mut self) {
        self.state.reset();
        self.phase = ClosestHitState::Idle;
    }

    /// A copy with its own [`QueryId`], sharing this query's current results.
    pub fn fork(&self) -> Self {
        Self {
            state: self.state.fork(),
            ..self.clone()
        }
    }
}

impl<W: SegmentTest> Default for ClosestHitQuery<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: SegmentTest> RayQuery<W> for ClosestHitQuery<W> {
    fn execute_segment(&mut self, endpoints: RayEndpoints, world: &W) -> bool {
        self.phase = ClosestHitState::Scanning;

        let continuation = match self.mode {
            ScanMode::Exhaustive => Continuation::Full,
            ScanMode::Pruned => Continuation::Shrink,
        };
        self.state.scan(endpoints, world, continuation);

        if self.state.impacts.is_empty() {
            log::debug!("query {} missed", self.state.id);
            self.phase = ClosestHitState::Miss;
            return false;
        }

        let reported = self.state.impacts.len();
        self.state.impacts.sort_closest_first();
        self.state.impacts.truncate(1);
        self.phase = ClosestHitState::Hit;

        if let Some(closest) = self.state.impacts.first() {
            log::debug!(
                "query {} hit {:?} at t = {} (closest of {})",
                self.state.id,
                closest.body,
                closest.intersection_param,
                reported
            );
        }

        true
    }

    fn boxed_clone(&self) -> Box<dyn RayQuery<W>> {
        Box::new(self.clone())
    }

    fn id(&self) -> QueryId {
        self.state.id
    }

    fn policy(&self) -> ReductionPolicy {
        ReductionPolicy::Closest
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

impl<W: SegmentTest> fmt::Debug for ClosestHitQuery<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosestHitQuery")
            .field("state", &self.state)
            .field("mode", &self.mode)
            .field("phase", &self.phase)
            .finish()
    }
}
