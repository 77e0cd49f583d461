//! Demo runner.
//!
//! Opens a window, builds the effect picked on the command line and runs it until the window is
//! closed or <escape> is pressed. <space> pauses the effect clock.
//!
//! The windowing backend is chosen at build time: GLFW by default, SDL2 with
//! `--no-default-features --features sdl2`.

mod effects;

use demosys::effect::{Effect, EffectError};
use demosys_windowing::{GlVersion, Key, KeyEvent, Window, WindowError, WindowOpt};
use effects::{Bootstrap, Settings};
use std::{cell::RefCell, error, fmt, path::PathBuf, process, rc::Rc, time::Instant};
use structopt::StructOpt;

#[cfg(feature = "glfw")]
type Platform = demosys_glfw::GlfwPlatform;
#[cfg(all(feature = "sdl2", not(feature = "glfw")))]
type Platform = demosys_sdl2::Sdl2Platform;
#[cfg(not(any(feature = "glfw", feature = "sdl2")))]
compile_error!("enable the glfw or the sdl2 feature");

type Ctx = Window<Platform>;

#[derive(Debug, StructOpt)]
pub struct CLIOpts {
  #[structopt(long, default_value = "demosys")]
  /// Window title.
  title: String,

  #[structopt(long, default_value = "1280")]
  /// Window width, in screen coordinates.
  width: u32,

  #[structopt(long, default_value = "720")]
  /// Window height, in screen coordinates.
  height: u32,

  #[structopt(long, default_value = "3.3")]
  /// OpenGL version to request, as MAJOR.MINOR.
  gl_version: GlVersion,

  #[structopt(short, long)]
  /// Image displayed by the blit effect.
  texture: Option<PathBuf>,

  #[structopt(long)]
  /// Text file scrolled by the textwriter effect.
  text: Option<PathBuf>,

  #[structopt(long)]
  /// Seed of the random generators.
  seed: Option<u64>,

  #[structopt(long, default_value = "50000")]
  /// Number of points of the point cloud.
  count: usize,

  #[structopt(short, long)]
  /// List available effects.
  list_effects: bool,

  /// Effect to run.
  effect: Option<String>,
}

#[derive(Debug)]
enum AppError {
  UnknownEffect(String),
  Window(WindowError),
  Effect(EffectError),
}

impl fmt::Display for AppError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      AppError::UnknownEffect(ref name) => write!(f, "no effect named {}", name),
      AppError::Window(ref e) => write!(f, "cannot open window: {}", e),
      AppError::Effect(ref e) => write!(f, "effect failed: {}", e),
    }
  }
}

impl error::Error for AppError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      AppError::UnknownEffect(_) => None,
      AppError::Window(e) => Some(e),
      AppError::Effect(e) => Some(e),
    }
  }
}

impl From<WindowError> for AppError {
  fn from(e: WindowError) -> Self {
    AppError::Window(e)
  }
}

impl From<EffectError> for AppError {
  fn from(e: EffectError) -> Self {
    AppError::Effect(e)
  }
}

/// Macro to declaratively add effects.
macro_rules! effects {
  ($($name:literal => $effect:ty),* $(,)?) => {
    const EFFECT_NAMES: &[&str] = &[$($name),*];

    fn show_available_effects() {
      println!("available effects:");
      $( println!("  - {}", $name); )*
    }

    // build an effect from its name
    fn load_effect(
      name: &str,
      ctx: &mut Ctx,
      settings: &Settings,
    ) -> Result<Box<dyn Effect<Ctx>>, AppError> {
      match name {
        $(
          $name => {
            let effect = <$effect as Bootstrap<Ctx>>::bootstrap(ctx, settings)?;
            Ok(Box::new(effect))
          }
        ),*

        _ => Err(AppError::UnknownEffect(name.to_owned())),
      }
    }
  }
}

effects! {
  "points" => effects::points::Points,
  "blit" => effects::blit::Blit,
  "depth" => effects::depth::Depth,
  "textwriter" => effects::textwriter::TextWriter,
}

fn main() {
  env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

  if let Err(e) = run(CLIOpts::from_args()) {
    log::error!("{}", e);
    process::exit(1);
  }
}

fn run(cli_opts: CLIOpts) -> Result<(), AppError> {
  if cli_opts.list_effects {
    show_available_effects();
    return Ok(());
  }

  let name = cli_opts.effect.as_deref().unwrap_or(EFFECT_NAMES[0]);

  // fail before opening any window
  if !EFFECT_NAMES.contains(&name) {
    show_available_effects();
    return Err(AppError::UnknownEffect(name.to_owned()));
  }

  let opt = WindowOpt::default()
    .set_title(cli_opts.title.as_str())
    .set_size([cli_opts.width, cli_opts.height])
    .set_gl_version(cli_opts.gl_version);
  let mut window = Ctx::open(opt)?;

  let settings = Settings {
    texture: cli_opts.texture.clone(),
    text: cli_opts.text.clone(),
    seed: cli_opts.seed,
    count: cli_opts.count,
    aspect_ratio: window.aspect_ratio(),
  };

  let result = load_effect(name, &mut window, &settings)
    .and_then(|mut effect| run_effect(&mut window, effect.as_mut()));

  window.terminate();
  result
}

// Run an effect until the window closes. The effect is dropped before the window is terminated.
fn run_effect(window: &mut Ctx, effect: &mut dyn Effect<Ctx>) -> Result<(), AppError> {
  log::info!("running effect {}", effect.name());

  let key_events = Rc::new(RefCell::new(Vec::<KeyEvent>::new()));
  let sink = key_events.clone();
  window.set_key_callback(move |event| sink.borrow_mut().push(event));

  let start = Instant::now();
  let mut last_frame = start;
  let mut time = 0.;
  let mut paused = false;

  while !window.should_close() {
    let now = Instant::now();
    let frametime = now.duration_since(last_frame).as_secs_f32();
    last_frame = now;

    for event in key_events.borrow_mut().drain(..) {
      if window.is_press(&event, Key::Escape) {
        window.close();
      } else if window.is_press(&event, Key::Space) {
        paused = !paused;
        log::info!("{}", if paused { "paused" } else { "resumed" });
      }
    }

    if !paused {
      time += frametime;
    }

    window.use_framebuffer();
    window.clear([0., 0., 0., 1.]);
    effect.draw(window, time, frametime)?;
    window.swap_buffers();
  }

  log::info!(
    "{} frames in {:.2}s",
    window.frames(),
    start.elapsed().as_secs_f32()
  );

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cli_defaults() {
    let opts = CLIOpts::from_iter(&["demosys-examples"]);

    assert_eq!(opts.title, "demosys");
    assert_eq!((opts.width, opts.height), (1280, 720));
    assert_eq!(opts.gl_version, GlVersion::GL33);
    assert_eq!(opts.count, 50000);
    assert_eq!(opts.text, None);
    assert_eq!(opts.effect, None);
  }

  #[test]
  fn cli_options() {
    let opts = CLIOpts::from_iter(&[
      "demosys-examples",
      "--gl-version",
      "4.1",
      "--seed",
      "42",
      "-t",
      "lena.png",
      "--text",
      "credits.txt",
      "blit",
    ]);

    assert_eq!(opts.gl_version, GlVersion::new(4, 1));
    assert_eq!(opts.seed, Some(42));
    assert_eq!(opts.texture, Some(PathBuf::from("lena.png")));
    assert_eq!(opts.text, Some(PathBuf::from("credits.txt")));
    assert_eq!(opts.effect.as_deref(), Some("blit"));
  }

  #[test]
  fn registry_names() {
    assert_eq!(EFFECT_NAMES, &["points", "blit", "depth", "textwriter"]);
  }
}
