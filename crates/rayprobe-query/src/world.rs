//! The protocol between a ray query and the world it scans.
//!
//! The world owns the bodies and drives the scan. For every candidate body
//! crossing the segment it asks the callback whether the body is admitted,
//! then reports the impact of admitted bodies. The value returned by
//! [`RayCallback::report_impact`] bounds the rest of the scan.

use crate::impact::RayHit;
use crate::Real;
use na::Point3;
use std::fmt::Debug;

/// Returned by an impact callback to let the world scan the whole segment.
pub const FULL_SEGMENT: Real = 1.0;
/// Returned by an impact callback to end the scan. Any value at or below it does the same.
pub const STOP_SCAN: Real = 0.0;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Admission {
    Admit,
    Reject,
}

impl Admission {
    pub fn is_admitted(self) -> bool {
        self == Admission::Admit
    }
}

impl From<bool> for Admission {
    fn from(admit: bool) -> Self {
        if admit {
            Admission::Admit
        } else {
            Admission::Reject
        }
    }
}

/// Receives the candidates and impacts found by a [`SegmentTest`].
pub trait RayCallback<B, S: ?Sized> {
    /// Called before [`Self::report_impact`] for each candidate body.
    ///
    /// A rejected body never has its impact reported.
    fn admit(&mut self, body: B, shape: &S) -> Admission;

    /// Called once per admitted impact, in no particular order along the segment.
    ///
    /// Returns the largest fraction of the segment the world still needs to
    /// scan. Worlds may skip impacts beyond it and must stop at [`STOP_SCAN`].
    fn report_impact(&mut self, hit: RayHit<B>) -> Real;
}

/// A handle to a world able to intersect segments with its bodies.
///
/// Queries keep a clone of the handle they last executed against, so
/// handles should be cheap to clone and must not own the bodies exclusively.
pub trait SegmentTest: Clone + 'static {
    type Body: Copy + Debug + PartialEq + 'static;
    type Shape: ?Sized + 'static;

    /// Scans the segment `start -> end`, calling back synchronously for every
    /// candidate before returning.
    fn segment_test(
        &self,
        start: &Point3<Real>,
        end: &Point3<Real>,
        callback: &mut dyn RayCallback<Self::Body, Self::Shape>,
    );
}
