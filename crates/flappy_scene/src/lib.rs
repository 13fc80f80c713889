pub mod actor;
pub mod clock;
pub mod obstacle;
pub mod scene;
pub mod stream;

#[cfg(test)]
mod mock;

use std::path::{Path, PathBuf};

use typed_builder::TypedBuilder;

pub use actor::Actor;
pub use clock::FixedStep;
pub use obstacle::Obstacle;
pub use scene::{Outcome, Scene, State};
pub use stream::ObstacleStream;

/// Window size in pixels.
pub const SCREEN_WIDTH: u32 = 800;
pub const SCREEN_HEIGHT: u32 = 600;
/// Logical simulation rate. Rendering is paced to the same rate.
pub const TICK_RATE_HZ: u32 = 60;

/// Downward acceleration in px/s².
pub const GRAVITY: f32 = 1200.0;
/// Vertical velocity set by a flap, in px/s (negative is up).
pub const JUMP_VELOCITY: f32 = -420.0;
pub const ACTOR_X: f32 = 100.0;
pub const ACTOR_START_Y: f32 = 300.0;
pub const ACTOR_WIDTH: f32 = 50.0;
pub const ACTOR_HEIGHT: f32 = 43.0;
/// Ticks each animation frame stays on screen.
pub const TICKS_PER_ANIMATION_FRAME: u32 = 6;

pub const OBSTACLE_COUNT: usize = 4;
pub const OBSTACLE_WIDTH: f32 = 50.0;
/// Horizontal distance between the left edges of consecutive obstacles.
pub const OBSTACLE_SPACING: f32 = 280.0;
pub const OBSTACLE_GAP: f32 = 180.0;
/// Minimum distance between a gap and the top or bottom of the playfield.
pub const OBSTACLE_MARGIN: f32 = 40.0;
/// Where the first obstacle starts, giving the player a moment after take-off.
pub const FIRST_OBSTACLE_X: f32 = SCREEN_WIDTH as f32 + 200.0;
/// Scroll speed in px/s.
pub const SCROLL_SPEED: f32 = 200.0;

pub const SCORE_FONT_SIZE: u16 = 20;

/// Paths of every file a scene loads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assets {
    pub background: PathBuf,
    pub pipe: PathBuf,
    pub bird_frames: Vec<PathBuf>,
    pub font: PathBuf,
}

impl Assets {
    /// Standard layout below a resource directory.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let imgs = dir.join("imgs");
        Self {
            background: imgs.join("background.bmp"),
            pipe: imgs.join("pipe.bmp"),
            bird_frames: (1..=4)
                .map(|i| imgs.join(format!("bird_frame_{}.bmp", i)))
                .collect(),
            font: dir.join("fonts").join("Flappy.ttf"),
        }
    }
}

impl Default for Assets {
    fn default() -> Self {
        Self::from_dir("res")
    }
}

/// Tunables of a single scene. Every field defaults to the constant of the
/// same name in this crate.
#[derive(Clone, Debug, TypedBuilder)]
pub struct SceneConfig {
    #[builder(default)]
    pub assets: Assets,
    #[builder(default = SCREEN_WIDTH as f32)]
    pub width: f32,
    #[builder(default = SCREEN_HEIGHT as f32)]
    pub height: f32,
    #[builder(default = TICK_RATE_HZ)]
    pub tick_rate: u32,

    #[builder(default = GRAVITY)]
    pub gravity: f32,
    #[builder(default = JUMP_VELOCITY)]
    pub jump_velocity: f32,
    #[builder(default = ACTOR_X)]
    pub actor_x: f32,
    #[builder(default = ACTOR_START_Y)]
    pub actor_start_y: f32,
    #[builder(default = ACTOR_WIDTH)]
    pub actor_width: f32,
    #[builder(default = ACTOR_HEIGHT)]
    pub actor_height: f32,

    #[builder(default = OBSTACLE_COUNT)]
    pub obstacle_count: usize,
    #[builder(default = OBSTACLE_WIDTH)]
    pub obstacle_width: f32,
    #[builder(default = OBSTACLE_SPACING)]
    pub obstacle_spacing: f32,
    #[builder(default = OBSTACLE_GAP)]
    pub obstacle_gap: f32,
    #[builder(default = OBSTACLE_MARGIN)]
    pub obstacle_margin: f32,
    #[builder(default = FIRST_OBSTACLE_X)]
    pub first_obstacle_x: f32,
    #[builder(default = SCROLL_SPEED)]
    pub scroll_speed: f32,

    #[builder(default = SCORE_FONT_SIZE)]
    pub font_size: u16,
    /// Fixes the gap sequence; `None` seeds from OS entropy.
    #[builder(default, setter(strip_option))]
    pub seed: Option<u64>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assets_follow_resource_layout() {
        let assets = Assets::from_dir("data");
        assert_eq!(assets.background, Path::new("data/imgs/background.bmp"));
        assert_eq!(assets.pipe, Path::new("data/imgs/pipe.bmp"));
        assert_eq!(assets.font, Path::new("data/fonts/Flappy.ttf"));
        assert_eq!(assets.bird_frames.len(), 4);
        assert_eq!(
            assets.bird_frames[3],
            Path::new("data/imgs/bird_frame_4.bmp")
        );
    }

    #[test]
    fn config_defaults_match_constants() {
        let config = SceneConfig::default();
        assert_eq!(config.width, SCREEN_WIDTH as f32);
        assert_eq!(config.height, SCREEN_HEIGHT as f32);
        assert_eq!(config.obstacle_count, OBSTACLE_COUNT);
        assert_eq!(config.seed, None);
        assert_eq!(config.assets, Assets::default());
    }

    #[test]
    fn default_stream_spans_the_screen() {
        // Recycled obstacles must re-enter from beyond the right edge.
        let span = OBSTACLE_COUNT as f32 * OBSTACLE_SPACING;
        assert!(span > SCREEN_WIDTH as f32 + OBSTACLE_WIDTH);
    }
}
