//! Sampler backend interface.
//!
//! Samplers override the sampling state of whatever texture is bound to the same unit.

use crate::sampler::{SamplerDesc, SamplerError};

/// Sampler interface.
pub unsafe trait Sampler {
  /// Backend representation of a sampler. Dropping it releases the GPU object.
  type SamplerRepr;

  /// Create a sampler object.
  unsafe fn new_sampler(&mut self, desc: &SamplerDesc) -> Result<Self::SamplerRepr, SamplerError>;

  /// Attach a sampler to a texture unit.
  unsafe fn use_sampler(sampler: &Self::SamplerRepr, unit: u32);

  /// Detach whatever sampler is attached to a texture unit.
  unsafe fn clear_sampler(sampler: &Self::SamplerRepr, unit: u32);
}
