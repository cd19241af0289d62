use crate::world::PhysicsWorld;
use anyhow::{bail, ensure, Context};
use rapier::prelude::*;
use std::collections::HashSet;
use std::path::Path;

/// A scene file: the bodies to insert into a fresh [`PhysicsWorld`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SceneDesc {
    #[serde(default)]
    pub gravity: Option<[Real; 3]>,
    pub bodies: Vec<BodyDesc>,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct BodyDesc {
    pub name: String,
    #[serde(default)]
    pub kind: BodyKind,
    #[serde(default)]
    pub translation: [Real; 3],
    #[serde(default)]
    pub linvel: [Real; 3],
    pub shape: ShapeDesc,
    /// Reported as the collision id of every impact on this body.
    #[serde(default)]
    pub collision_id: u64,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BodyKind {
    #[default]
    Fixed,
    Dynamic,
    Kinematic,
}

#[derive(Copy, Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeDesc {
    Ball { radius: Real },
    Cuboid { half_extents: [Real; 3] },
    Capsule { half_height: Real, radius: Real },
}

impl SceneDesc {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scene file {}", path.display()))?;
        Self::from_json(&data).with_context(|| format!("invalid scene file {}", path.display()))
    }

    pub fn from_json(data: &str) -> anyhow::Result<Self> {
        let scene: Self = serde_json::from_str(data)?;
        scene.validate()?;
        Ok(scene)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let mut names = HashSet::new();

        for body in &self.bodies {
            ensure!(
                names.insert(body.name.as_str()),
                "duplicate body name `{}`",
                body.name
            );
            body.shape
                .validate()
                .with_context(|| format!("invalid shape for body `{}`", body.name))?;
        }

        Ok(())
    }

    pub fn build(&self) -> anyhow::Result<PhysicsWorld> {
        self.validate()?;

        let mut world = PhysicsWorld::new();
        if let Some(gravity) = self.gravity {
            world.gravity = Vector::from(gravity);
        }

        for body in &self.bodies {
            let rigid_body = body
                .kind
                .builder()
                .translation(Vector::from(body.translation))
                .linvel(Vector::from(body.linvel));
            let collider = body
                .shape
                .collider()
                .user_data(body.collision_id as u128);
            world.insert(body.name.clone(), rigid_body, collider);
        }

        world.update_queries();
        if world.is_empty() {
            log::warn!("Loaded an empty scene, every ray will miss.");
        } else {
            log::info!("Loaded scene with {} bodies.", world.len());
        }
        Ok(world)
    }
}

impl BodyKind {
    fn builder(self) -> RigidBodyBuilder {
        match self {
            BodyKind::Fixed => RigidBodyBuilder::fixed(),
            BodyKind::Dynamic => RigidBodyBuilder::dynamic(),
            BodyKind::Kinematic => RigidBodyBuilder::kinematic_velocity_based(),
        }
    }
}

impl ShapeDesc {
    fn validate(&self) -> anyhow::Result<()> {
        match *self {
            ShapeDesc::Ball { radius } => {
                ensure!(radius > 0.0, "ball radius must be positive");
            }
            ShapeDesc::Cuboid { half_extents } => {
                ensure!(
                    half_extents.iter().all(|e| *e > 0.0),
                    "cuboid half extents must be positive"
                );
            }
            ShapeDesc::Capsule {
                half_height,
                radius,
            } => {
                if radius <= 0.0 {
                    bail!("capsule radius must be positive");
                }
                ensure!(half_height >= 0.0, "capsule half height can't be negative");
            }
        }

        Ok(())
    }

    fn collider(&self) -> ColliderBuilder {
        match *self {
            ShapeDesc::Ball { radius } => ColliderBuilder::ball(radius),
            ShapeDesc::Cuboid { half_extents } => {
                ColliderBuilder::cuboid(half_extents[0], half_extents[1], half_extents[2])
            }
            ShapeDesc::Capsule {
                half_height,
                radius,
            } => ColliderBuilder::capsule_y(half_height, radius),
        }
    }
}
