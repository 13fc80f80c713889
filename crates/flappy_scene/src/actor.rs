use std::path::PathBuf;

use flappy_common::{Driver, Flip, Rect, Result, TextureId};

use crate::{SceneConfig, TICKS_PER_ANIMATION_FRAME};

/// The bird: a body at a fixed column that falls under gravity and flaps
/// upward on demand.
pub struct Actor {
    x: f32,
    y: f32,
    velocity: f32,
    width: f32,
    height: f32,
    gravity: f32,
    jump_velocity: f32,
    /// Lowest `y` the top edge may take.
    ceiling: f32,
    /// The top of the ground; the bottom edge never goes below it.
    floor: f32,
    ticks: u32,
    frames: Vec<TextureId>,
}

impl Actor {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            x: config.actor_x,
            y: config.actor_start_y,
            velocity: 0.0,
            width: config.actor_width,
            height: config.actor_height,
            gravity: config.gravity,
            jump_velocity: config.jump_velocity,
            ceiling: 0.0,
            floor: config.height,
            ticks: 0,
            frames: Vec::new(),
        }
    }

    /// Load the animation frames in order. Frames loaded before a failure stay
    /// owned by the actor and are released by [`Actor::destroy`].
    pub fn load(&mut self, driver: &mut dyn Driver, paths: &[PathBuf]) -> Result<()> {
        for path in paths {
            let frame = driver.load_texture(path)?;
            self.frames.push(frame);
        }
        log::debug!("Bird loaded with {} animation frames", self.frames.len());
        Ok(())
    }

    /// Advance one step of `dt` seconds: gravity feeds velocity, velocity
    /// feeds position, then the body is clamped to the playfield.
    pub fn update(&mut self, dt: f32) {
        self.ticks = self.ticks.wrapping_add(1);
        self.velocity += self.gravity * dt;
        self.y += self.velocity * dt;

        let lowest = self.floor - self.height;
        if self.y >= lowest {
            self.y = lowest;
            self.velocity = 0.0;
        } else if self.y <= self.ceiling {
            self.y = self.ceiling;
            self.velocity = 0.0;
        }
    }

    pub fn jump(&mut self) {
        log::trace!("Flap at y = {:.1}", self.y);
        self.velocity = self.jump_velocity;
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn touches(&self, rect: &Rect) -> bool {
        self.bounds().intersects(rect)
    }

    /// Whether the body sits on the ground or against the ceiling.
    pub fn out_of_bounds(&self) -> bool {
        self.y >= self.floor - self.height || self.y <= self.ceiling
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Animation frame for the current tick, if any frames are loaded.
    pub fn frame(&self) -> Option<TextureId> {
        if self.frames.is_empty() {
            return None;
        }
        let index = (self.ticks / TICKS_PER_ANIMATION_FRAME) as usize % self.frames.len();
        Some(self.frames[index])
    }

    pub fn draw(&self, driver: &mut dyn Driver) -> Result<()> {
        match self.frame() {
            Some(frame) => driver.draw_texture(frame, None, Some(self.bounds()), Flip::None),
            None => Ok(()),
        }
    }

    pub fn destroy(&mut self, driver: &mut dyn Driver) {
        for frame in self.frames.drain(..) {
            driver.destroy_texture(frame);
        }
    }
}
