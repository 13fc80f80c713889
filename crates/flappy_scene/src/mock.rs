use std::collections::{HashMap, HashSet, VecDeque};
use std::path::{Path, PathBuf};
use std::time::Duration;

use flappy_common::{
    Color, Driver, Error, Event, Flip, FontId, Rect, Result, SurfaceId, TextureId,
};

/// In-memory driver for tests: tracks live resources, replays scripted events
/// on a virtual clock that only moves when the caller delays.
#[derive(Default)]
pub struct MockDriver {
    next_id: usize,
    textures: HashMap<usize, String>,
    fonts: HashSet<usize>,
    surfaces: HashMap<usize, String>,
    failing: HashSet<PathBuf>,
    fail_present: bool,
    events: VecDeque<(Duration, Event)>,
    now: Duration,
    pub presented: u32,
    pub draws: Vec<(TextureId, Option<Rect>, Flip)>,
}

impl MockDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every load of `path` fail.
    pub fn fail_on(&mut self, path: &Path) {
        self.failing.insert(path.to_path_buf());
    }

    pub fn fail_present(&mut self) {
        self.fail_present = true;
    }

    /// Deliver `event` once the virtual clock reaches `at`.
    pub fn push_event(&mut self, at: Duration, event: Event) {
        self.events.push_back((at, event));
    }

    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    pub fn live_resources(&self) -> usize {
        self.textures.len() + self.fonts.len() + self.surfaces.len()
    }

    /// Name a texture was created from (path or rendered text).
    pub fn texture_name(&self, texture: TextureId) -> Option<&str> {
        self.textures.get(&texture.0).map(String::as_str)
    }

    fn issue(&mut self) -> usize {
        self.next_id += 1;
        self.next_id
    }

    fn check(&self, path: &Path) -> Result<()> {
        if self.failing.contains(path) {
            return Err(Error::resource_load(path, "mock failure"));
        }
        Ok(())
    }
}

impl Driver for MockDriver {
    fn clear_frame(&mut self, _color: Color) -> Result<()> {
        self.draws.clear();
        Ok(())
    }

    fn present_frame(&mut self) -> Result<()> {
        if self.fail_present {
            return Err(Error::driver("present frame", "mock failure"));
        }
        self.presented += 1;
        Ok(())
    }

    fn draw_texture(
        &mut self,
        texture: TextureId,
        _src: Option<Rect>,
        dst: Option<Rect>,
        flip: Flip,
    ) -> Result<()> {
        if !self.textures.contains_key(&texture.0) {
            return Err(Error::driver("copy texture", "unknown texture"));
        }
        self.draws.push((texture, dst, flip));
        Ok(())
    }

    fn poll_event(&mut self) -> Option<Event> {
        match self.events.front() {
            Some((at, _)) if *at <= self.now => self.events.pop_front().map(|(_, e)| e),
            _ => None,
        }
    }

    fn load_texture(&mut self, path: &Path) -> Result<TextureId> {
        self.check(path)?;
        let id = self.issue();
        self.textures.insert(id, path.display().to_string());
        Ok(TextureId(id))
    }

    fn load_font(&mut self, path: &Path, _size: u16) -> Result<FontId> {
        self.check(path)?;
        let id = self.issue();
        self.fonts.insert(id);
        Ok(FontId(id))
    }

    fn render_text(&mut self, font: FontId, text: &str, _color: Color) -> Result<SurfaceId> {
        if !self.fonts.contains(&font.0) {
            return Err(Error::driver("render text", "unknown font"));
        }
        let id = self.issue();
        self.surfaces.insert(id, text.to_string());
        Ok(SurfaceId(id))
    }

    fn create_texture_from_surface(&mut self, surface: SurfaceId) -> Result<TextureId> {
        let Some(text) = self.surfaces.get(&surface.0).cloned() else {
            return Err(Error::driver("create texture", "unknown surface"));
        };
        let id = self.issue();
        self.textures.insert(id, text);
        Ok(TextureId(id))
    }

    fn destroy_texture(&mut self, texture: TextureId) {
        self.textures.remove(&texture.0);
    }

    fn free_surface(&mut self, surface: SurfaceId) {
        self.surfaces.remove(&surface.0);
    }

    fn close_font(&mut self, font: FontId) {
        self.fonts.remove(&font.0);
    }

    fn elapsed(&self) -> Duration {
        self.now
    }

    fn delay(&mut self, duration: Duration) {
        self.now += duration;
    }
}
