//! Texture backend interface.
//!
//! In order to add support for textures, you have to implement two traits:
//!
//! - [`TextureBase`], which is a _type family_ providing the backend representation of a texture.
//! - [`Texture`], the operations themselves.
//!
//! Binding follows the low-level convention of the GPU APIs: a texture is always bound to the
//! _currently active_ texture unit. Selecting the unit is a separate call
//! ([`Texture::set_texture_unit`]).

use crate::texture::{Filter, PixelFormat, Target, TextureError, Wrap};

/// Type family giving the backend representation type.
pub unsafe trait TextureBase {
  /// Backend representation of a texture.
  ///
  /// Dropping the representation must release the GPU handle.
  type TextureRepr;
}

/// Texture interface.
pub unsafe trait Texture: TextureBase {
  /// Allocate a texture handle, without any storage.
  unsafe fn new_texture(&mut self) -> Result<Self::TextureRepr, TextureError>;

  /// Select the active texture unit.
  unsafe fn set_texture_unit(&mut self, unit: u32);

  /// (Re)build the storage of a texture.
  ///
  /// The texture is bound to the active unit, gets linear min / mag filters and repeat wrapping on
  /// both axes, then storage of `format` is allocated. `size` is `[length, 1]` for
  /// [`Target::Dim1`]. When `texels` is `None`, storage is allocated but left uninitialized.
  unsafe fn build(
    texture: &mut Self::TextureRepr,
    target: Target,
    lod: u32,
    size: [u32; 2],
    format: PixelFormat,
    texels: Option<&[u8]>,
  ) -> Result<(), TextureError>;

  /// Bind the texture to the currently active texture unit.
  unsafe fn bind(texture: &Self::TextureRepr, target: Target);

  /// Bind then set the wrap mode on the S and T axes.
  unsafe fn set_wrap(texture: &Self::TextureRepr, target: Target, wrap: Wrap);

  /// Bind then set the minification and magnification filters.
  unsafe fn set_filter(texture: &Self::TextureRepr, target: Target, min: Filter, mag: Filter);

  /// Native handle, for interop and tracing.
  unsafe fn handle(texture: &Self::TextureRepr) -> u32;
}
