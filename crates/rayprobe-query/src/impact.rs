use crate::endpoints::RayEndpoints;
use crate::Real;
use na::{Point3, Vector3};
use std::fmt;
use uuid::Uuid;

/// Identifier of the user-assigned sub-shape or material struck by a ray.
pub type CollisionId = u64;

/// Identifies the query instance that collected an impact.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
pub struct QueryId(Uuid);

impl QueryId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for QueryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for QueryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An impact as reported by the world to a [`RayCallback`](crate::world::RayCallback).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit<B> {
    pub body: B,
    pub normal: Vector3<Real>,
    pub collision_id: CollisionId,
    /// Fraction of the segment, in `[0, 1]`, at which the impact occurred.
    pub intersection_param: Real,
}

/// An admitted impact, owned by the query that collected it.
#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImpactRecord<B> {
    /// Handle of the struck body. The world keeps ownership of the body.
    pub body: B,
    pub normal: Vector3<Real>,
    pub collision_id: CollisionId,
    pub intersection_param: Real,
    pub query: QueryId,
}

impl<B> ImpactRecord<B> {
    pub fn from_hit(hit: RayHit<B>, query: QueryId) -> Self {
        Self {
            body: hit.body,
            normal: hit.normal,
            collision_id: hit.collision_id,
            intersection_param: hit.intersection_param,
            query,
        }
    }

    /// World-space location of this impact on the given segment.
    pub fn point(&self, endpoints: &RayEndpoints) -> Point3<Real> {
        endpoints.point_at(self.intersection_param)
    }

    /// Distance from the segment start to this impact.
    pub fn distance(&self, endpoints: &RayEndpoints) -> Real {
        endpoints.length() * self.intersection_param
    }
}

/// The impacts collected by one query, in callback order until reduced.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ImpactSet<B> {
    records: Vec<ImpactRecord<B>>,
}

impl<B> Default for ImpactSet<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B> ImpactSet<B> {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn first(&self) -> Option<&ImpactRecord<B>> {
        self.records.first()
    }

    pub fn get(&self, i: usize) -> Option<&ImpactRecord<B>> {
        self.records.get(i)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImpactRecord<B>> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[ImpactRecord<B>] {
        &self.records
    }

    pub(crate) fn clear(&mut self) {
        self.records.clear();
    }

    pub(crate) fn push(&mut self, record: ImpactRecord<B>) {
        self.records.push(record);
    }

    /// Stable sort by intersection parameter: equal parameters keep their callback order.
    pub(crate) fn sort_closest_first(&mut self) {
        self.records
            .sort_by(|a, b| a.intersection_param.total_cmp(&b.intersection_param));
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        self.records.truncate(len);
    }
}

impl<'a, B> IntoIterator for &'a ImpactSet<B> {
    type Item = &'a ImpactRecord<B>;
    type IntoIter = std::slice::Iter<'a, ImpactRecord<B>>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
