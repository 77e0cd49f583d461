//! Sampler objects.
//!
//! A sampler attached to a texture unit overrides the filtering and wrapping of the texture bound
//! to that unit, without touching the texture itself.

use crate::backend::sampler::Sampler as SamplerBackend;
use crate::context::GraphicsContext;
use crate::texture::{Filter, Wrap};
use std::error;
use std::fmt;

/// Sampling state.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct SamplerDesc {
  /// Minification filter.
  pub min_filter: Filter,
  /// Magnification filter.
  pub mag_filter: Filter,
  /// Wrapping on the S and T axes.
  pub wrap: Wrap,
}

impl Default for SamplerDesc {
  /// Defaults:
  ///
  /// - Linear min and mag filters.
  /// - [`Wrap::Repeat`].
  fn default() -> Self {
    SamplerDesc {
      min_filter: Filter::Linear,
      mag_filter: Filter::Linear,
      wrap: Wrap::Repeat,
    }
  }
}

/// Sampler errors.
#[non_exhaustive]
#[derive(Debug, Eq, PartialEq)]
pub enum SamplerError {
  /// The backend could not create the sampler object.
  CannotCreate(String),
}

impl fmt::Display for SamplerError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      SamplerError::CannotCreate(ref e) => write!(f, "cannot create sampler: {}", e),
    }
  }
}

impl error::Error for SamplerError {}

/// A GPU sampler.
pub struct Sampler<B>
where
  B: SamplerBackend,
{
  repr: B::SamplerRepr,
  desc: SamplerDesc,
}

impl<B> Sampler<B>
where
  B: SamplerBackend,
{
  /// Create a sampler.
  pub fn new<C>(ctx: &mut C, desc: SamplerDesc) -> Result<Self, SamplerError>
  where
    C: GraphicsContext<Backend = B>,
  {
    let repr = unsafe { ctx.backend().new_sampler(&desc)? };
    Ok(Sampler { repr, desc })
  }

  /// Attach to a texture unit.
  pub fn use_unit(&self, unit: u32) {
    unsafe { B::use_sampler(&self.repr, unit) }
  }

  /// Detach whatever sampler is attached to a texture unit.
  pub fn clear_unit(&self, unit: u32) {
    unsafe { B::clear_sampler(&self.repr, unit) }
  }

  /// Sampling state this sampler was created with.
  pub fn desc(&self) -> &SamplerDesc {
    &self.desc
  }
}
