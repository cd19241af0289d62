use rapier::geometry::BroadPhaseMultiSap;
use rapier::prelude::*;
use rayprobe_query::world::{RayCallback, SegmentTest, FULL_SEGMENT, STOP_SCAN};
use rayprobe_query::RayHit;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

pub struct PhysicsWorld {
    pub gravity: Vector<Real>,
    pub params: IntegrationParameters,
    pub bodies: RigidBodySet,
    pub colliders: ColliderSet,
    pub query_pipeline: QueryPipeline,
    islands: IslandManager,
    broad_phase: BroadPhaseMultiSap,
    narrow_phase: NarrowPhase,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    physics_pipeline: PhysicsPipeline,
    names: HashMap<ColliderHandle, String>,
    steps: u64,
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            gravity: Vector::y() * (-9.81),
            params: IntegrationParameters::default(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
            islands: IslandManager::new(),
            broad_phase: BroadPhaseMultiSap::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            physics_pipeline: PhysicsPipeline::new(),
            names: HashMap::new(),
            steps: 0,
        }
    }

    /// Inserts a named body with a single collider.
    ///
    /// The body only becomes visible to ray casts after the next
    /// [`Self::update_queries`] or [`Self::step`].
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        body: impl Into<RigidBody>,
        collider: impl Into<Collider>,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let body_handle = self.bodies.insert(body);
        let collider_handle =
            self.colliders
                .insert_with_parent(collider, body_handle, &mut self.bodies);
        self.names.insert(collider_handle, name.into());
        (body_handle, collider_handle)
    }

    pub fn name(&self, handle: ColliderHandle) -> Option<&str> {
        self.names.get(&handle).map(String::as_str)
    }

    pub fn find(&self, name: &str) -> Option<ColliderHandle> {
        self.names
            .iter()
            .find(|(_, n)| n.as_str() == name)
            .map(|(handle, _)| *handle)
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn update_queries(&mut self) {
        self.query_pipeline.update(&self.colliders);
    }

    /// Advances the simulation by one timestep and refreshes the query pipeline.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.params,
            &mut self.islands,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
        self.steps += 1;
    }

    /// Reports every collider crossed by `start -> end` to `callback`.
    ///
    /// Impacts are reported in the query pipeline's traversal order. Impacts
    /// beyond the bound returned by the callback are skipped.
    pub fn cast_segment(
        &self,
        start: &Point<Real>,
        end: &Point<Real>,
        callback: &mut dyn RayCallback<ColliderHandle, Collider>,
    ) {
        let dir = end - start;
        if dir.norm_squared() == 0.0 {
            log::debug!("skipping zero-length segment at {}", start);
            return;
        }

        // With an unnormalized direction the time of impact is the segment fraction.
        let ray = Ray::new(*start, dir);
        let mut bound = FULL_SEGMENT;

        self.query_pipeline.intersections_with_ray(
            &self.bodies,
            &self.colliders,
            &ray,
            FULL_SEGMENT,
            true,
            QueryFilter::default(),
            |handle, intersection| {
                if intersection.time_of_impact > bound {
                    return true;
                }

                let Some(collider) = self.colliders.get(handle) else {
                    return true;
                };

                if !callback.admit(handle, collider).is_admitted() {
                    return true;
                }

                let next = callback.report_impact(RayHit {
                    body: handle,
                    normal: intersection.normal,
                    collision_id: collider.user_data as u64,
                    intersection_param: intersection.time_of_impact,
                });

                if next <= STOP_SCAN {
                    return false;
                }

                bound = bound.min(next);
                true
            },
        );
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// A world shared between the simulation and the ray queries executed against it.
#[derive(Clone)]
pub struct SharedPhysicsWorld(pub Arc<RwLock<PhysicsWorld>>);

impl SharedPhysicsWorld {
    pub fn read(&self) -> RwLockReadGuard<'_, PhysicsWorld> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, PhysicsWorld> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<PhysicsWorld> for SharedPhysicsWorld {
    fn from(world: PhysicsWorld) -> Self {
        Self(Arc::new(RwLock::new(world)))
    }
}

impl SegmentTest for SharedPhysicsWorld {
    type Body = ColliderHandle;
    type Shape = Collider;

    fn segment_test(
        &self,
        start: &Point<Real>,
        end: &Point<Real>,
        callback: &mut dyn RayCallback<ColliderHandle, Collider>,
    ) {
        self.read().cast_segment(start, end, callback);
    }
}

#[cfg(test)]
mod tests {
    use super::{PhysicsWorld, SharedPhysicsWorld};
    use rapier::prelude::*;
    use rayprobe_query::world::{Admission, RayCallback, FULL_SEGMENT, STOP_SCAN};
    use rayprobe_query::RayHit;
    use rayprobe_query::query::{AllHitsQuery, FirstHitQuery};
    use rayprobe_query::{ClosestHitQuery, QueryFilter, RayQuery, ScanMode};

    fn ball_row(positions: &[(&str, Real)]) -> SharedPhysicsWorld {
        let mut world = PhysicsWorld::new();
        for (i, (name, x)) in positions.iter().enumerate() {
            world.insert(
                *name,
                RigidBodyBuilder::fixed().translation(vector![*x, 0.0, 0.0]),
                ColliderBuilder::ball(1.0).user_data(i as u128 + 1),
            );
        }
        world.update_queries();
        world.into()
    }

    #[test]
    fn hits_ball_at_expected_fraction() {
        let world = ball_row(&[("ball", 5.0)]);
        let mut query = ClosestHitQuery::new();

        assert!(query.execute(0.0, 0.0, 0.0, 10.0, 0.0, 0.0, &world));
        let hit = query.closest().unwrap();
        assert!((hit.intersection_param - 0.4).abs() < 1.0e-5);
        assert!((hit.normal - vector![-1.0, 0.0, 0.0]).norm() < 1.0e-5);
        assert_eq!(hit.collision_id, 1);
        assert_eq!(world.read().name(hit.body), Some("ball"));
    }

    #[test]
    fn misses_when_segment_stops_short() {
        let world = ball_row(&[("ball", 5.0)]);
        let mut query = ClosestHitQuery::new();

        assert!(!query.execute(0.0, 0.0, 0.0, 3.5, 0.0, 0.0, &world));
        assert!(query.impacts().is_empty());
        assert!(!query.execute(0.0, 3.0, 0.0, 10.0, 3.0, 0.0, &world));
    }

    #[test]
    fn closest_of_several_balls() {
        let world = ball_row(&[("far", 8.0), ("near", 3.0), ("middle", 5.0)]);

        for mode in [ScanMode::Exhaustive, ScanMode::Pruned] {
            let mut query = ClosestHitQuery::new().with_mode(mode);
            assert!(query.execute(0.0, 0.0, 0.0, 10.0, 0.0, 0.0, &world));

            let hit = query.closest().unwrap();
            assert_eq!(world.read().name(hit.body), Some("near"));
            assert!((hit.intersection_param - 0.2).abs() < 1.0e-5);
        }
    }

    #[test]
    fn excluded_body_is_skipped() {
        let world = ball_row(&[("source", 0.0), ("target", 5.0)]);
        let source = world.read().find("source").unwrap();
        let mut query = ClosestHitQuery::<SharedPhysicsWorld>::with_filter(
            QueryFilter::new().exclude_body(source),
        );

        assert!(query.execute(0.0, 0.0, 0.0, 10.0, 0.0, 0.0, &world));
        let hit = query.closest().unwrap();
        assert_eq!(world.read().name(hit.body), Some("target"));
    }

    #[test]
    fn predicate_sees_the_collider() {
        let world = ball_row(&[("first", 3.0), ("second", 6.0)]);
        let mut query = ClosestHitQuery::<SharedPhysicsWorld>::with_filter(
            QueryFilter::new().predicate(|_, collider: &Collider| collider.user_data != 1),
        );

        assert!(query.execute(0.0, 0.0, 0.0, 10.0, 0.0, 0.0, &world));
        assert_eq!(query.closest().unwrap().collision_id, 2);
    }

    #[test]
    fn all_hits_are_sorted() {
        let world = ball_row(&[("c", 8.0), ("a", 2.0), ("b", 5.0)]);
        let mut query = AllHitsQuery::new();

        assert!(query.execute(0.0, 0.0, 0.0, 10.0, 0.0, 0.0, &world));
        let names: Vec<_> = {
            let world = world.read();
            query
                .impacts()
                .iter()
                .map(|r| world.name(r.body).unwrap().to_owned())
                .collect()
        };
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn first_hit_keeps_one_impact() {
        let world = ball_row(&[("a", 2.0), ("b", 5.0)]);
        let mut query = FirstHitQuery::new();

        assert!(query.execute(0.0, 0.0, 0.0, 10.0, 0.0, 0.0, &world));
        assert_eq!(query.impacts().len(), 1);
    }

    /// Admits everything and answers every impact with a fixed continuation.
    struct Recording {
        next: Real,
        reports: Vec<Real>,
    }

    impl RayCallback<ColliderHandle, Collider> for Recording {
        fn admit(&mut self, _: ColliderHandle, _: &Collider) -> Admission {
            Admission::Admit
        }

        fn report_impact(&mut self, hit: RayHit<ColliderHandle>) -> Real {
            self.reports.push(hit.intersection_param);
            self.next
        }
    }

    fn cast(world: &SharedPhysicsWorld, next: Real) -> Vec<Real> {
        let mut callback = Recording {
            next,
            reports: Vec::new(),
        };
        world.read().cast_segment(
            &point![0.0, 0.0, 0.0],
            &point![10.0, 0.0, 0.0],
            &mut callback,
        );
        let mut reports = callback.reports;
        reports.sort_by(|a, b| a.total_cmp(b));
        reports
    }

    #[test]
    fn full_segment_reports_every_ball() {
        let world = ball_row(&[("a", 2.0), ("b", 5.0), ("c", 8.0)]);
        let reports = cast(&world, FULL_SEGMENT);

        assert_eq!(reports.len(), 3);
        for (t, expected) in reports.iter().zip([0.1, 0.4, 0.7]) {
            assert!((t - expected).abs() < 1.0e-5);
        }
    }

    #[test]
    fn stop_scan_ends_after_one_report() {
        let world = ball_row(&[("a", 2.0), ("b", 5.0), ("c", 8.0)]);

        assert_eq!(cast(&world, STOP_SCAN).len(), 1);
        assert_eq!(cast(&world, -1.0).len(), 1);
    }

    #[test]
    fn impacts_beyond_the_bound_are_skipped() {
        let world = ball_row(&[("a", 2.0), ("b", 5.0), ("c", 8.0)]);

        // Every ball enters past 0.05, so only the first reported one gets through.
        assert_eq!(cast(&world, 0.05).len(), 1);
    }

    #[test]
    fn zero_length_segment_hits_nothing() {
        let world = ball_row(&[("ball", 0.0)]);
        let mut query = ClosestHitQuery::new();

        assert!(!query.execute(0.0, 0.0, 0.0, 0.0, 0.0, 0.0, &world));
    }

    #[test]
    fn stepping_moves_dynamic_bodies() {
        let mut world = PhysicsWorld::new();
        world.insert(
            "falling",
            RigidBodyBuilder::dynamic().translation(vector![0.0, 5.0, 0.0]),
            ColliderBuilder::ball(0.5),
        );
        world.update_queries();
        let world = SharedPhysicsWorld::from(world);

        let mut query = ClosestHitQuery::new();
        assert!(query.execute(-2.0, 5.0, 0.0, 2.0, 5.0, 0.0, &world));

        for _ in 0..60 {
            world.write().step();
        }
        assert_eq!(world.read().steps(), 60);
        assert!(!query.execute(-2.0, 5.0, 0.0, 2.0, 5.0, 0.0, &world));
    }
}
