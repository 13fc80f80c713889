use std::path::Path;

use flappy_common::{Driver, Rect, Result, TextureId};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::obstacle::Obstacle;
use crate::SceneConfig;

/// Fixed pool of obstacles laid out at a constant interval.
///
/// Obstacles that scroll off the left edge are moved behind the rightmost one
/// instead of being dropped, so the pool never grows or shrinks.
pub struct ObstacleStream {
    obstacles: Vec<Obstacle>,
    spacing: f32,
    rng: StdRng,
    texture: Option<TextureId>,
}

impl ObstacleStream {
    pub fn new(config: &SceneConfig) -> Self {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let obstacles = (0..config.obstacle_count)
            .map(|i| {
                let x = config.first_obstacle_x + i as f32 * config.obstacle_spacing;
                Obstacle::new(config, x, &mut rng)
            })
            .collect();
        Self {
            obstacles,
            spacing: config.obstacle_spacing,
            rng,
            texture: None,
        }
    }

    pub fn load(&mut self, driver: &mut dyn Driver, pipe: &Path) -> Result<()> {
        self.texture = Some(driver.load_texture(pipe)?);
        Ok(())
    }

    /// Scroll every obstacle and recycle the ones that left the screen.
    /// Returns how many went past `actor_x` during this step.
    ///
    /// Passes are counted before recycling. An obstacle leaving the screen
    /// always counts if it has not yet, which covers a pass that happens
    /// within the same step and an `actor_x` at or left of the screen edge.
    pub fn update(&mut self, dt: f32, speed: f32, actor_x: f32) -> u32 {
        let mut passed = 0;
        for obstacle in &mut self.obstacles {
            obstacle.update(dt, speed);
            let mark = if obstacle.is_gone() {
                actor_x.max(0.0)
            } else {
                actor_x
            };
            if obstacle.passed(mark) {
                passed += 1;
            }
        }
        for i in 0..self.obstacles.len() {
            if self.obstacles[i].is_gone() {
                let tail = self.tail();
                self.obstacles[i].restart(tail + self.spacing, &mut self.rng);
                log::debug!(
                    "Obstacle {} recycled to x = {:.1}, gap at {:.1}",
                    i,
                    self.obstacles[i].x(),
                    self.obstacles[i].gap_center()
                );
            }
        }
        passed
    }

    /// Left edge of the rightmost obstacle.
    fn tail(&self) -> f32 {
        self.obstacles
            .iter()
            .map(Obstacle::x)
            .fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn touches(&self, bounds: &Rect) -> bool {
        self.obstacles.iter().any(|o| o.touches(bounds))
    }

    pub fn len(&self) -> usize {
        self.obstacles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.obstacles.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.obstacles.iter()
    }

    pub fn draw(&self, driver: &mut dyn Driver) -> Result<()> {
        let Some(texture) = self.texture else {
            return Ok(());
        };
        for obstacle in &self.obstacles {
            obstacle.draw(driver, texture)?;
        }
        Ok(())
    }

    pub fn destroy(&mut self, driver: &mut dyn Driver) {
        if let Some(texture) = self.texture.take() {
            driver.destroy_texture(texture);
        }
    }
}
