use crate::scene::{BodyDesc, BodyKind, SceneDesc, ShapeDesc};
use oorandom::Rand32;

const NUM_BALLS: u64 = 64;
const EXTENT: f32 = 20.0;

pub fn init_scene(seed: u64) -> SceneDesc {
    let mut rng = Rand32::new(seed);

    let bodies = (0..NUM_BALLS)
        .map(|i| {
            let translation = [coord(&mut rng), coord(&mut rng), coord(&mut rng)];
            let radius = 0.25 + rng.rand_float() * 1.75;

            BodyDesc {
                name: format!("ball_{i}"),
                kind: BodyKind::Fixed,
                translation,
                linvel: [0.0; 3],
                shape: ShapeDesc::Ball { radius },
                collision_id: i,
            }
        })
        .collect();

    SceneDesc {
        gravity: Some([0.0; 3]),
        bodies,
    }
}

fn coord(rng: &mut Rand32) -> f32 {
    (rng.rand_float() * 2.0 - 1.0) * EXTENT
}
