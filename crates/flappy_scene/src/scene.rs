use flappy_common::{Color, Driver, Event, Flip, FontId, Key, Rect, Result, TextureId};

use crate::actor::Actor;
use crate::clock::FixedStep;
use crate::stream::ObstacleStream;
use crate::SceneConfig;


/// Score glyph size on screen, per character.
const SCORE_CHAR_WIDTH: f32 = 24.0;
const SCORE_HEIGHT: f32 = 48.0;
const SCORE_TOP: f32 = 16.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Waiting for the first flap.
    Start,
    Playing,
    Paused,
    /// Terminal: the bird crashed or the player quit.
    Over,
}

/// How a finished scene ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Quit { score: u32 },
    GameOver { score: u32 },
}

struct ScoreTexture {
    score: u32,
    texture: TextureId,
    chars: usize,
}

/// One round of the game: the bird, the pipes, the score and the loop that
/// drives them.
pub struct Scene {
    state: State,
    score: u32,
    quit: bool,
    actor: Actor,
    stream: ObstacleStream,
    clock: FixedStep,
    scroll_speed: f32,
    width: f32,
    /// Whether the game was running when the previous frame finished.
    was_playing: bool,
    background: Option<TextureId>,
    font: Option<FontId>,
    score_texture: Option<ScoreTexture>,
}

impl Scene {
    /// Build a scene and load its sprites and font. On failure everything
    /// loaded so far is released before the error is returned.
    pub fn new(driver: &mut dyn Driver, config: SceneConfig) -> Result<Scene> {
        let mut scene = Scene {
            state: State::Start,
            score: 0,
            quit: false,
            actor: Actor::new(&config),
            stream: ObstacleStream::new(&config),
            clock: FixedStep::new(config.tick_rate),
            scroll_speed: config.scroll_speed,
            width: config.width,
            was_playing: false,
            background: None,
            font: None,
            score_texture: None,
        };
        if let Err(err) = scene.load(driver, &config) {
            scene.destroy(driver);
            return Err(err);
        }
        log::info!("Scene created");
        Ok(scene)
    }

    fn load(&mut self, driver: &mut dyn Driver, config: &SceneConfig) -> Result<()> {
        let assets = &config.assets;
        self.background = Some(driver.load_texture(&assets.background)?);
        self.font = Some(driver.load_font(&assets.font, config.font_size)?);
        self.actor.load(driver, &assets.bird_frames)?;
        self.stream.load(driver, &assets.pipe)?;
        Ok(())
    }

    /// Run the game loop until the round is over or the player quits.
    ///
    /// Blocks the calling thread. Driver failures end the loop immediately;
    /// the caller still owns the scene and must [`destroy`](Scene::destroy) it.
    pub fn run(&mut self, driver: &mut dyn Driver) -> Result<Outcome> {
        let mut last = driver.elapsed();
        loop {
            let now = driver.elapsed();
            let elapsed = now.saturating_sub(last);
            last = now;

            if let Some(outcome) = self.frame(driver, elapsed)? {
                log::info!("Scene finished: {:?}", outcome);
                return Ok(outcome);
            }

            let spent = driver.elapsed().saturating_sub(now);
            if spent < self.clock.step() {
                driver.delay(self.clock.step() - spent);
            }
        }
    }

    /// One real frame: the ticks that `elapsed` makes due, then a render.
    pub(crate) fn frame(
        &mut self,
        driver: &mut dyn Driver,
        elapsed: std::time::Duration,
    ) -> Result<Option<Outcome>> {
        let ticks = if self.was_playing {
            self.clock.advance(elapsed)
        } else {
            self.clock.reset();
            0
        };

        if ticks == 0 {
            self.pump_events(driver);
        }
        for _ in 0..ticks {
            self.tick(driver);
            if self.state != State::Playing {
                break;
            }
        }

        self.render(driver)?;
        self.was_playing = self.state == State::Playing;
        Ok(self.outcome())
    }

    /// One fixed tick: input first, then simulation.
    pub(crate) fn tick(&mut self, driver: &mut dyn Driver) {
        self.pump_events(driver);
        if self.state == State::Playing {
            self.simulate(self.clock.step_secs());
        }
    }

    fn pump_events(&mut self, driver: &mut dyn Driver) {
        while let Some(event) = driver.poll_event() {
            self.handle_event(event);
        }
    }

    pub(crate) fn handle_event(&mut self, event: Event) {
        match event {
            Event::Quit
            | Event::KeyDown {
                key: Key::Escape, ..
            } => {
                self.quit = true;
                self.set_state(State::Over);
            }
            Event::KeyDown { repeat: true, .. } => {}
            Event::KeyDown { key: Key::P, .. } => match self.state {
                State::Playing => self.set_state(State::Paused),
                State::Paused => self.set_state(State::Playing),
                _ => {}
            },
            Event::KeyDown { key, .. } if key.is_jump() => self.jump(),
            Event::MouseDown => self.jump(),
            Event::FocusLost if self.state == State::Playing => self.set_state(State::Paused),
            _ => {}
        }
    }

    fn jump(&mut self) {
        match self.state {
            State::Start => {
                self.set_state(State::Playing);
                self.actor.jump();
            }
            State::Playing => self.actor.jump(),
            State::Paused => self.set_state(State::Playing),
            State::Over => {}
        }
    }

    fn simulate(&mut self, dt: f32) {
        self.actor.update(dt);
        let passed = self.stream.update(dt, self.scroll_speed, self.actor.x());

        let crashed = if self.actor.out_of_bounds() {
            log::debug!("Bird left the playfield at y = {:.1}", self.actor.y());
            true
        } else if self.stream.touches(&self.actor.bounds()) {
            log::debug!("Bird hit a pipe at y = {:.1}", self.actor.y());
            true
        } else {
            false
        };

        if passed > 0 {
            self.score += passed;
            log::debug!("Score: {}", self.score);
        }

        if crashed {
            self.set_state(State::Over);
        }
    }

    fn set_state(&mut self, state: State) {
        if self.state != state {
            log::debug!("Scene state {:?} -> {:?}", self.state, state);
            self.state = state;
        }
    }

    fn render(&mut self, driver: &mut dyn Driver) -> Result<()> {
        driver.clear_frame(Color::SKY)?;
        if let Some(background) = self.background {
            driver.draw_texture(background, None, None, Flip::None)?;
        }
        self.stream.draw(driver)?;
        self.actor.draw(driver)?;
        self.draw_score(driver)?;
        driver.present_frame()
    }

    fn draw_score(&mut self, driver: &mut dyn Driver) -> Result<()> {
        let Some(font) = self.font else {
            return Ok(());
        };
        let stale = self
            .score_texture
            .as_ref()
            .map_or(true, |cached| cached.score != self.score);
        if stale {
            if let Some(old) = self.score_texture.take() {
                driver.destroy_texture(old.texture);
            }
            let text = self.score.to_string();
            let texture = driver.text_texture(font, &text, Color::WHITE)?;
            self.score_texture = Some(ScoreTexture {
                score: self.score,
                texture,
                chars: text.len(),
            });
        }

        if let Some(cached) = &self.score_texture {
            let w = SCORE_CHAR_WIDTH * cached.chars as f32;
            let dst = Rect::new((self.width - w) / 2.0, SCORE_TOP, w, SCORE_HEIGHT);
            driver.draw_texture(cached.texture, None, Some(dst), Flip::None)?;
        }
        Ok(())
    }

    fn outcome(&self) -> Option<Outcome> {
        if self.state != State::Over {
            return None;
        }
        let score = self.score;
        Some(if self.quit {
            Outcome::Quit { score }
        } else {
            Outcome::GameOver { score }
        })
    }

    /// Release every resource this scene loaded. Calling it again is a no-op.
    pub fn destroy(&mut self, driver: &mut dyn Driver) {
        if let Some(cached) = self.score_texture.take() {
            driver.destroy_texture(cached.texture);
        }
        if let Some(font) = self.font.take() {
            driver.close_font(font);
        }
        if let Some(background) = self.background.take() {
            driver.destroy_texture(background);
        }
        self.actor.destroy(driver);
        self.stream.destroy(driver);
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn stream(&self) -> &ObstacleStream {
        &self.stream
    }
}
