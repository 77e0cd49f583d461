//! Demo effects.
//!
//! Every effect is built once from the [`Settings`] gathered on the command line, then asked to
//! draw a frame into the window framebuffer.

pub mod blit;
pub mod depth;
pub mod points;
pub mod textwriter;

use demosys::effect::{Effect, EffectError};
use std::path::PathBuf;

/// What effects are built with.
#[derive(Clone, Debug)]
pub struct Settings {
  /// Image to display, if any.
  pub texture: Option<PathBuf>,
  /// Text file to scroll, if any.
  pub text: Option<PathBuf>,
  /// Seed of the random generators; `None` seeds from the operating system.
  pub seed: Option<u64>,
  /// Number of points of point clouds.
  pub count: usize,
  /// Aspect ratio of the window when the effect is built.
  pub aspect_ratio: f32,
}

/// Effects that can be built from [`Settings`].
pub trait Bootstrap<C>: Effect<C> + Sized
where
  C: demosys::context::GraphicsContext,
{
  /// Create the GPU resources of the effect.
  fn bootstrap(ctx: &mut C, settings: &Settings) -> Result<Self, EffectError>;
}
