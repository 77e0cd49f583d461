//! Effects.
//!
//! An effect is a unit of drawing: it owns its GPU resources and renders one frame each time it’s
//! asked to. Effects are generic over the graphics context they draw with so that they can be
//! stored as trait objects (`Box<dyn Effect<C>>`) by whatever drives the render loop.

use crate::context::GraphicsContext;
use crate::helper::HelperError;
use crate::shader::ProgramError;
use crate::texture::TextureError;
use crate::vertex_array::VertexArrayError;
use std::error;
use std::fmt;
use std::io;

/// Errors an effect might run into.
#[non_exhaustive]
#[derive(Debug)]
pub enum EffectError {
  /// Texture creation or upload failed.
  Texture(TextureError),
  /// A program failed to build.
  Program(ProgramError),
  /// Geometry upload failed.
  VertexArray(VertexArrayError),
  /// The texture helper couldn’t be initialized.
  Helper(HelperError),
  /// A data file of the effect couldn’t be read.
  Io(io::Error),
}

impl fmt::Display for EffectError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      EffectError::Texture(ref e) => write!(f, "effect texture error: {}", e),
      EffectError::Program(ref e) => write!(f, "effect program error: {}", e),
      EffectError::VertexArray(ref e) => write!(f, "effect geometry error: {}", e),
      EffectError::Helper(ref e) => write!(f, "effect helper error: {}", e),
      EffectError::Io(ref e) => write!(f, "effect data error: {}", e),
    }
  }
}

impl error::Error for EffectError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      EffectError::Texture(e) => Some(e),
      EffectError::Program(e) => Some(e),
      EffectError::VertexArray(e) => Some(e),
      EffectError::Helper(e) => Some(e),
      EffectError::Io(e) => Some(e),
    }
  }
}

impl From<TextureError> for EffectError {
  fn from(e: TextureError) -> Self {
    EffectError::Texture(e)
  }
}

impl From<ProgramError> for EffectError {
  fn from(e: ProgramError) -> Self {
    EffectError::Program(e)
  }
}

impl From<VertexArrayError> for EffectError {
  fn from(e: VertexArrayError) -> Self {
    EffectError::VertexArray(e)
  }
}

impl From<HelperError> for EffectError {
  fn from(e: HelperError) -> Self {
    EffectError::Helper(e)
  }
}

impl From<io::Error> for EffectError {
  fn from(e: io::Error) -> Self {
    EffectError::Io(e)
  }
}

/// A drawable effect.
pub trait Effect<C>
where
  C: GraphicsContext,
{
  /// Name of the effect, for logs and registries.
  fn name(&self) -> &str;

  /// Draw a frame.
  ///
  /// `time` is the number of seconds since the effect started and `frametime` the duration of the
  /// previous frame, in seconds.
  fn draw(&mut self, ctx: &mut C, time: f32, frametime: f32) -> Result<(), EffectError>;
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::helper::TextureHelper;
  use crate::testing::{Call, MockBackend, MockContext};
  use crate::texture::{PixelFormat, Texture};

  struct Blit {
    texture: Texture<MockBackend>,
    helper: TextureHelper<MockBackend>,
    frames: u32,
  }

  impl Effect<MockContext> for Blit {
    fn name(&self) -> &str {
      "blit"
    }

    fn draw(&mut self, ctx: &mut MockContext, _: f32, _: f32) -> Result<(), EffectError> {
      self.frames += 1;
      self.helper.draw(ctx, &self.texture, [0., 0.], [1., 1.])?;
      Ok(())
    }
  }

  #[test]
  fn effects_as_trait_objects() {
    let mut ctx = MockContext::new();
    let texture = Texture::create_2d(&mut ctx, 2, 2, PixelFormat::RGBA8).unwrap();
    let mut effect: Box<dyn Effect<MockContext>> = Box::new(Blit {
      texture,
      helper: TextureHelper::new(),
      frames: 0,
    });

    for i in 0..4 {
      effect.draw(&mut ctx, i as f32 / 60., 1. / 60.).unwrap();
    }

    assert_eq!(effect.name(), "blit");
    assert_eq!(ctx.count(|c| matches!(c, Call::Render(_))), 4);
  }

  #[test]
  fn helper_errors_surface() {
    let mut ctx = MockContext::failing_programs();
    let texture = Texture::create_2d(&mut ctx, 2, 2, PixelFormat::RGBA8).unwrap();
    let mut effect = Blit {
      texture,
      helper: TextureHelper::new(),
      frames: 0,
    };

    assert!(matches!(
      effect.draw(&mut ctx, 0., 0.),
      Err(EffectError::Helper(_))
    ));
    assert_eq!(effect.frames, 1);
  }

  #[test]
  fn io_errors_keep_their_source() {
    let missing = std::fs::read_to_string("does/not/exist.txt").map_err(EffectError::from);

    match missing {
      Err(ref e @ EffectError::Io(_)) => {
        assert!(error::Error::source(e).is_some());
        assert!(e.to_string().starts_with("effect data error"));
      }
      _ => panic!("expected an I/O error"),
    }
  }
}
