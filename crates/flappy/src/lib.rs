use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use flappy_common::{Color, Driver, Event, Flip, Key};
use flappy_scene::{Assets, Outcome, Scene, SceneConfig, SCREEN_HEIGHT, SCREEN_WIDTH};
use flappy_sdl2::{SdlContext, SdlInitInfo};

pub const TITLE: &str = "Flappy Gopher";
const TITLE_FONT_SIZE: u16 = 20;
/// How long a title card stays up before play continues.
const TITLE_DELAY: Duration = Duration::from_secs(1);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    pub res_dir: PathBuf,
    pub seed: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            res_dir: PathBuf::from("res"),
            seed: None,
        }
    }
}

impl Options {
    /// Parse `[RES_DIR] [SEED]` from the arguments after the program name.
    pub fn from_args(mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut options = Options::default();
        if let Some(dir) = args.next() {
            options.res_dir = PathBuf::from(dir);
        }
        if let Some(seed) = args.next() {
            let seed = seed
                .parse::<u64>()
                .with_context(|| format!("invalid seed '{}'", seed))?;
            options.seed = Some(seed);
        }
        if let Some(extra) = args.next() {
            return Err(anyhow!("unexpected argument '{}'", extra));
        }
        Ok(options)
    }
}

pub fn run(options: Options) -> Result<()> {
    let init_info = SdlInitInfo::builder()
        .width(SCREEN_WIDTH)
        .height(SCREEN_HEIGHT)
        .title(TITLE.to_string())
        .build();
    SdlContext::run(init_info, |driver| play(driver, &options))
}

/// Show the title card, then play rounds until the player quits. Each round
/// gets a fresh scene.
pub fn play(driver: &mut dyn Driver, options: &Options) -> Result<()> {
    let assets = Assets::from_dir(&options.res_dir);
    draw_title(driver, &assets.font, TITLE).context("could not draw title")?;
    driver.delay(TITLE_DELAY);
    if discard_events(driver) {
        log::info!("Quit during title");
        return Ok(());
    }

    let mut round: u64 = 0;
    loop {
        round += 1;
        let mut config = SceneConfig::builder().assets(assets.clone()).build();
        config.seed = options.seed.map(|seed| seed.wrapping_add(round));

        let mut scene = Scene::new(driver, config).context("could not create scene")?;
        let outcome = scene.run(driver);
        scene.destroy(driver);

        match outcome.context("error while running")? {
            Outcome::Quit { score } => {
                log::info!("Quit in round {} with score {}", round, score);
                return Ok(());
            }
            Outcome::GameOver { score } => {
                log::info!("Round {} over with score {}", round, score);
                draw_title(driver, &assets.font, "Game Over").context("could not draw title")?;
                driver.delay(TITLE_DELAY);
                if discard_events(driver) {
                    log::info!("Quit after round {}", round);
                    return Ok(());
                }
            }
        }
    }
}

/// Drop input that queued up while a title card was shown, so it does not
/// leak into the next round. Returns whether a quit request was among it.
pub fn discard_events(driver: &mut dyn Driver) -> bool {
    let mut quit = false;
    while let Some(event) = driver.poll_event() {
        match event {
            Event::Quit
            | Event::KeyDown {
                key: Key::Escape, ..
            } => quit = true,
            _ => {}
        }
    }
    quit
}

/// Fill the window with `text` and present it.
pub fn draw_title(driver: &mut dyn Driver, font_path: &Path, text: &str) -> Result<()> {
    driver.clear_frame(Color::BLACK)?;

    let font = driver
        .load_font(font_path, TITLE_FONT_SIZE)
        .context("could not load font")?;
    let texture = driver.text_texture(font, text, Color::TITLE);
    driver.close_font(font);
    let texture = texture.context("could not render title")?;

    let drawn = driver
        .draw_texture(texture, None, None, Flip::None)
        .and_then(|_| driver.present_frame());
    driver.destroy_texture(texture);
    drawn.context("could not copy texture")?;
    Ok(())
}
