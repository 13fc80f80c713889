use std::path::Path;
use std::time::Duration;

use crate::error::Result;
use crate::event::Event;
use crate::{Color, Rect};

/// Handle to a texture owned by the driver.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct TextureId(pub usize);

/// Handle to a loaded font owned by the driver.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct FontId(pub usize);

/// Handle to a CPU-side surface owned by the driver.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct SurfaceId(pub usize);

#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub enum Flip {
    #[default]
    None,
    Vertical,
}

/// Rendering, input, asset and timing capabilities a game needs from the
/// platform layer.
///
/// Resources are referred to by handle. Whoever loads a resource is
/// responsible for releasing it; releasing an unknown or already released
/// handle is a no-op. Implementations are single-threaded: every call must be
/// made from the thread that created the driver.
pub trait Driver {
    fn clear_frame(&mut self, color: Color) -> Result<()>;
    fn present_frame(&mut self) -> Result<()>;
    /// Copy `texture` (or the `src` part of it) to `dst`, or to the whole
    /// frame when `dst` is `None`.
    fn draw_texture(
        &mut self,
        texture: TextureId,
        src: Option<Rect>,
        dst: Option<Rect>,
        flip: Flip,
    ) -> Result<()>;
    fn poll_event(&mut self) -> Option<Event>;

    fn load_texture(&mut self, path: &Path) -> Result<TextureId>;
    fn load_font(&mut self, path: &Path, size: u16) -> Result<FontId>;
    fn render_text(&mut self, font: FontId, text: &str, color: Color) -> Result<SurfaceId>;
    fn create_texture_from_surface(&mut self, surface: SurfaceId) -> Result<TextureId>;

    fn destroy_texture(&mut self, texture: TextureId);
    fn free_surface(&mut self, surface: SurfaceId);
    fn close_font(&mut self, font: FontId);

    /// Monotonic time since the driver was created.
    fn elapsed(&self) -> Duration;
    /// Yield the calling thread for `duration`.
    fn delay(&mut self, duration: Duration);

    /// Render `text` straight to a texture. The intermediate surface is freed
    /// whether or not the texture could be created.
    fn text_texture(&mut self, font: FontId, text: &str, color: Color) -> Result<TextureId> {
        let surface = self.render_text(font, text, color)?;
        let texture = self.create_texture_from_surface(surface);
        self.free_surface(surface);
        texture
    }
}
