use crate::world::{PhysicsWorld, SharedPhysicsWorld};
use rapier::math::{Point, Real};
use rayprobe_query::{RayEndpoints, RayQuery};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct ImpactReport {
    pub body: String,
    pub collision_id: u64,
    pub t: Real,
    pub distance: Real,
    pub point: [Real; 3],
    pub normal: [Real; 3],
}

/// The outcome of one recorded cast, with body handles resolved to names.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct QueryReport {
    pub query: String,
    pub policy: String,
    pub step: u64,
    pub start: [Real; 3],
    pub end: [Real; 3],
    pub hit: bool,
    pub impacts: Vec<ImpactReport>,
}

impl QueryReport {
    pub fn new(query: &dyn RayQuery<SharedPhysicsWorld>, step: u64, world: &PhysicsWorld) -> Self {
        let endpoints = query
            .endpoints()
            .copied()
            .unwrap_or_else(|| RayEndpoints::new(Point::origin(), Point::origin()));

        let impacts = query
            .impacts()
            .iter()
            .map(|record| ImpactReport {
                body: world
                    .name(record.body)
                    .map(str::to_owned)
                    .unwrap_or_else(|| format!("{:?}", record.body)),
                collision_id: record.collision_id,
                t: record.intersection_param,
                distance: record.distance(&endpoints),
                point: record.point(&endpoints).coords.into(),
                normal: record.normal.into(),
            })
            .collect::<Vec<_>>();

        Self {
            query: query.id().to_string(),
            policy: query.policy().to_string(),
            step,
            start: endpoints.start.coords.into(),
            end: endpoints.end.coords.into(),
            hit: !impacts.is_empty(),
            impacts,
        }
    }

    pub fn render_text(&self) -> String {
        let mut out = format!(
            "[step {}] {} ray {:?} -> {:?}: {}\n",
            self.step,
            self.policy,
            self.start,
            self.end,
            if self.hit { "hit" } else { "miss" }
        );

        for impact in &self.impacts {
            out.push_str(&format!(
                "  {} (collision id {}) at t = {:.4}, distance {:.3}, point {:?}, normal {:?}\n",
                impact.body,
                impact.collision_id,
                impact.t,
                impact.distance,
                impact.point,
                impact.normal
            ));
        }

        out
    }
}
