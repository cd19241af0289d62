use crate::scene::{BodyDesc, BodyKind, SceneDesc, ShapeDesc};

pub fn init_scene() -> SceneDesc {
    let mut bodies = Vec::new();

    /*
     * Ground
     */
    let ground_size = 50.0;
    let ground_height = 0.1;

    bodies.push(BodyDesc {
        name: "ground".to_owned(),
        kind: BodyKind::Fixed,
        translation: [0.0, -ground_height, 0.0],
        linvel: [0.0; 3],
        shape: ShapeDesc::Cuboid {
            half_extents: [ground_size, ground_height, ground_size],
        },
        collision_id: 0,
    });

    /*
     * Create the stacks.
     */
    let num_stacks = 5;
    let stack_height = 3;
    let half_extent = 0.5;
    let spacing = 4.0;

    for i in 0..num_stacks {
        for j in 0..stack_height {
            let x = (i as f32 + 1.0) * spacing;
            let y = half_extent + j as f32 * half_extent * 2.0;

            bodies.push(BodyDesc {
                name: format!("box_{i}_{j}"),
                kind: BodyKind::Dynamic,
                translation: [x, y, 0.0],
                linvel: [0.0; 3],
                shape: ShapeDesc::Cuboid {
                    half_extents: [half_extent; 3],
                },
                collision_id: (i * stack_height + j + 1) as u64,
            });
        }
    }

    SceneDesc {
        gravity: None,
        bodies,
    }
}
