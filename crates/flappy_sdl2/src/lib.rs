use std::collections::HashMap;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::Result;
use sdl2::event::{Event as SdlEvent, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::render::{Texture, TextureCreator, WindowCanvas};
use sdl2::surface::Surface;
use sdl2::ttf::{Font, Sdl2TtfContext};
use sdl2::video::WindowContext;
use sdl2::EventPump;
use typed_builder::TypedBuilder;

use flappy_common::{Color, Driver, Error, Event, Flip, FontId, Key, Rect, SurfaceId, TextureId};
pub use sdl2;

#[derive(TypedBuilder)]
pub struct SdlInitInfo {
    pub width: u32,
    pub height: u32,
    pub title: String,
    #[builder(default = true)]
    pub vsync: bool,
}

pub struct SdlContext;

impl SdlContext {
    /// Bring up SDL2, SDL_ttf and a window, then hand a driver for them to
    /// `f`. Everything is torn down in reverse order when `f` returns, on
    /// success and on error alike.
    pub fn run<F>(sdl_init_info: SdlInitInfo, f: F) -> Result<()>
    where
        F: FnOnce(&mut SdlDriver<'_>) -> Result<()>,
    {
        let SdlInitInfo {
            width,
            height,
            title,
            vsync,
        } = sdl_init_info;

        let sdl_context = sdl2::init().map_err(|e| Error::initialization("SDL", e))?;
        let video_subsystem = sdl_context
            .video()
            .map_err(|e| Error::initialization("video", e))?;
        let ttf_context = sdl2::ttf::init().map_err(|e| Error::initialization("TTF", e))?;

        let window = video_subsystem
            .window(&title, width, height)
            .position_centered()
            .build()
            .map_err(|e| Error::initialization("window", e))?;
        let mut canvas_builder = window.into_canvas().accelerated();
        if vsync {
            canvas_builder = canvas_builder.present_vsync();
        }
        let canvas = canvas_builder
            .build()
            .map_err(|e| Error::initialization("renderer", e))?;
        let texture_creator = canvas.texture_creator();
        let event_pump = sdl_context
            .event_pump()
            .map_err(|e| Error::initialization("event pump", e))?;
        log::info!("SDL initialized: {}x{} '{}'", width, height, title);

        let mut driver = SdlDriver::new(canvas, event_pump, &texture_creator, &ttf_context);
        let result = f(&mut driver);
        log::info!(
            "SDL shutting down, {} resources still held by the driver",
            driver.live_resources()
        );
        result
    }
}

/// [`Driver`] backed by an SDL2 canvas.
///
/// Textures, fonts and surfaces live in the driver and are handed out as ids.
/// Whatever is still held when the driver is dropped is freed with it.
pub struct SdlDriver<'a> {
    canvas: WindowCanvas,
    event_pump: EventPump,
    texture_creator: &'a TextureCreator<WindowContext>,
    ttf_context: &'a Sdl2TtfContext,
    next_id: usize,
    textures: HashMap<usize, Texture<'a>>,
    fonts: HashMap<usize, Font<'a, 'static>>,
    surfaces: HashMap<usize, Surface<'static>>,
    started: Instant,
}

impl<'a> SdlDriver<'a> {
    pub fn new(
        canvas: WindowCanvas,
        event_pump: EventPump,
        texture_creator: &'a TextureCreator<WindowContext>,
        ttf_context: &'a Sdl2TtfContext,
    ) -> Self {
        Self {
            canvas,
            event_pump,
            texture_creator,
            ttf_context,
            next_id: 0,
            textures: HashMap::new(),
            fonts: HashMap::new(),
            surfaces: HashMap::new(),
            started: Instant::now(),
        }
    }

    pub fn live_resources(&self) -> usize {
        self.textures.len() + self.fonts.len() + self.surfaces.len()
    }

    fn issue(&mut self) -> usize {
        self.next_id += 1;
        self.next_id
    }
}

impl Driver for SdlDriver<'_> {
    fn clear_frame(&mut self, color: Color) -> flappy_common::Result<()> {
        self.canvas.set_draw_color(map_color(color));
        self.canvas.clear();
        Ok(())
    }

    fn present_frame(&mut self) -> flappy_common::Result<()> {
        self.canvas.present();
        Ok(())
    }

    fn draw_texture(
        &mut self,
        texture: TextureId,
        src: Option<Rect>,
        dst: Option<Rect>,
        flip: Flip,
    ) -> flappy_common::Result<()> {
        let Some(sdl_texture) = self.textures.get(&texture.0) else {
            return Err(Error::driver("copy texture", format!("unknown {:?}", texture)));
        };
        let (src, dst) = match (src.map(map_rect), dst.map(map_rect)) {
            // An empty rectangle draws nothing.
            (Some(None), _) | (_, Some(None)) => return Ok(()),
            (src, dst) => (src.flatten(), dst.flatten()),
        };
        self.canvas
            .copy_ex(
                sdl_texture,
                src,
                dst,
                0.0,
                None,
                false,
                flip == Flip::Vertical,
            )
            .map_err(|e| Error::driver("copy texture", e))
    }

    fn poll_event(&mut self) -> Option<Event> {
        // Skip events the game has no use for.
        while let Some(event) = self.event_pump.poll_event() {
            if let Some(event) = map_event(event) {
                return Some(event);
            }
        }
        None
    }

    fn load_texture(&mut self, path: &Path) -> flappy_common::Result<TextureId> {
        let surface = Surface::load_bmp(path).map_err(|e| Error::resource_load(path, e))?;
        let texture = self
            .texture_creator
            .create_texture_from_surface(&surface)
            .map_err(|e| Error::resource_load(path, e))?;
        let id = self.issue();
        self.textures.insert(id, texture);
        log::debug!("Loaded texture {} from {}", id, path.display());
        Ok(TextureId(id))
    }

    fn load_font(&mut self, path: &Path, size: u16) -> flappy_common::Result<FontId> {
        let font = self
            .ttf_context
            .load_font(path, size)
            .map_err(|e| Error::resource_load(path, e))?;
        let id = self.issue();
        self.fonts.insert(id, font);
        log::debug!("Loaded font {} from {}", id, path.display());
        Ok(FontId(id))
    }

    fn render_text(
        &mut self,
        font: FontId,
        text: &str,
        color: Color,
    ) -> flappy_common::Result<SurfaceId> {
        let Some(sdl_font) = self.fonts.get(&font.0) else {
            return Err(Error::driver("render text", format!("unknown {:?}", font)));
        };
        let surface = sdl_font
            .render(text)
            .blended(map_color(color))
            .map_err(|e| Error::driver("render text", e))?;
        let id = self.issue();
        self.surfaces.insert(id, surface);
        Ok(SurfaceId(id))
    }

    fn create_texture_from_surface(
        &mut self,
        surface: SurfaceId,
    ) -> flappy_common::Result<TextureId> {
        let Some(sdl_surface) = self.surfaces.get(&surface.0) else {
            return Err(Error::driver(
                "create texture",
                format!("unknown {:?}", surface),
            ));
        };
        let texture = self
            .texture_creator
            .create_texture_from_surface(sdl_surface)
            .map_err(|e| Error::driver("create texture", e))?;
        let id = self.issue();
        self.textures.insert(id, texture);
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
        self.started.elapsed()
    }

    fn delay(&mut self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

pub fn map_color(color: Color) -> sdl2::pixels::Color {
    let (r, g, b, a) = color.rgba();
    sdl2::pixels::Color::RGBA(r, g, b, a)
}

/// `None` for rectangles with no area, which SDL would otherwise grow to 1px.
pub fn map_rect(rect: Rect) -> Option<sdl2::rect::Rect> {
    let w = rect.w.round();
    let h = rect.h.round();
    if w < 1.0 || h < 1.0 {
        return None;
    }
    Some(sdl2::rect::Rect::new(
        rect.x.round() as i32,
        rect.y.round() as i32,
        w as u32,
        h as u32,
    ))
}

pub fn map_event(event: SdlEvent) -> Option<Event> {
    match event {
        SdlEvent::Quit { .. } => Some(Event::Quit),
        SdlEvent::KeyDown {
            keycode: Some(keycode),
            repeat,
            ..
        } => Some(Event::KeyDown {
            key: map_keycode(keycode),
            repeat,
        }),
        SdlEvent::KeyUp {
            keycode: Some(keycode),
            ..
        } => Some(Event::KeyUp {
            key: map_keycode(keycode),
        }),
        SdlEvent::MouseButtonDown { .. } => Some(Event::MouseDown),
        SdlEvent::Window {
            win_event: WindowEvent::FocusLost,
            ..
        } => Some(Event::FocusLost),
        SdlEvent::Window {
            win_event: WindowEvent::FocusGained,
            ..
        } => Some(Event::FocusGained),
        _ => None,
    }
}

pub fn map_keycode(keycode: Keycode) -> Key {
    match keycode {
        Keycode::Space => Key::Space,
        Keycode::Up => Key::Up,
        Keycode::P => Key::P,
        Keycode::Escape => Key::Escape,
        _ => Key::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdl2::keyboard::Mod;

    #[test]
    fn keycodes_map_to_game_keys() {
        assert_eq!(map_keycode(Keycode::Space), Key::Space);
        assert_eq!(map_keycode(Keycode::Up), Key::Up);
        assert_eq!(map_keycode(Keycode::P), Key::P);
        assert_eq!(map_keycode(Keycode::Escape), Key::Escape);
        assert_eq!(map_keycode(Keycode::Z), Key::None);
    }

    #[test]
    fn key_repeat_is_preserved() {
        let event = SdlEvent::KeyDown {
            timestamp: 0,
            window_id: 0,
            keycode: Some(Keycode::Space),
            scancode: None,
            keymod: Mod::NOMOD,
            repeat: true,
        };
        assert_eq!(
            map_event(event),
            Some(Event::KeyDown {
                key: Key::Space,
                repeat: true
            })
        );
    }

    #[test]
    fn focus_and_quit_events_map() {
        let lost = SdlEvent::Window {
            timestamp: 0,
            window_id: 0,
            win_event: WindowEvent::FocusLost,
        };
        assert_eq!(map_event(lost), Some(Event::FocusLost));
        assert_eq!(map_event(SdlEvent::Quit { timestamp: 0 }), Some(Event::Quit));
        let moved = SdlEvent::Window {
            timestamp: 0,
            window_id: 0,
            win_event: WindowEvent::Moved(1, 1),
        };
        assert_eq!(map_event(moved), None);
    }

    #[test]
    fn rects_round_and_drop_empty() {
        let rect = map_rect(Rect::new(10.4, 20.6, 50.0, 43.0)).unwrap();
        assert_eq!(
            (rect.x(), rect.y(), rect.width(), rect.height()),
            (10, 21, 50, 43)
        );
        assert!(map_rect(Rect::new(0.0, 0.0, 50.0, 0.0)).is_none());
        assert!(map_rect(Rect::new(0.0, 0.0, 0.2, 10.0)).is_none());
    }

    #[test]
    fn colors_keep_alpha() {
        let color = map_color(Color::new_rgba(1, 2, 3, 4));
        assert_eq!((color.r, color.g, color.b, color.a), (1, 2, 3, 4));
    }
}
