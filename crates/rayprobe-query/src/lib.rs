pub extern crate nalgebra as na;

pub mod debug;
pub mod endpoints;
pub mod impact;
pub mod query;
pub mod world;

#[cfg(test)]
pub(crate) mod scripted;

pub type Real = f32;

pub use endpoints::RayEndpoints;
pub use impact::{CollisionId, ImpactRecord, ImpactSet, QueryId, RayHit};
pub use query::{
    AllHitsQuery, ClosestHitQuery, ClosestHitState, FirstHitQuery, QueryFilter, RayQuery,
    ReductionPolicy, ScanMode,
};
pub use world::{Admission, RayCallback, SegmentTest};
