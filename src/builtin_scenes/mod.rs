use crate::scene::SceneDesc;

mod scatter;
mod wall;

/// Scenes available without a scene file.
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum BuiltinScene {
    /// A ground plane with a row of stacked boxes along the x axis.
    #[default]
    Wall,
    /// Balls of random sizes scattered around the origin.
    Scatter,
}

impl BuiltinScene {
    pub fn build(self, seed: u64) -> SceneDesc {
        match self {
            BuiltinScene::Wall => wall::init_scene(),
            BuiltinScene::Scatter => scatter::init_scene(seed),
        }
    }
}
