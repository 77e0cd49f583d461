//! GPU textures.
//!
//! A [`Texture`] is a CPU-side descriptor wrapping exactly one GPU texture. The GPU handle is
//! allocated when the descriptor is created, even before any storage exists, and released when
//! the descriptor is dropped.
//!
//! Textures are either one-dimensional or two-dimensional. When built from an image, the target is
//! inferred: an image with a side of length 1 becomes a 1D texture, anything else a 2D texture.
//!
//! Images are flipped vertically before upload: image files store their top row first, while
//! texture coordinates have _y_ pointing up.

use crate::backend::texture::Texture as TextureBackend;
use crate::context::GraphicsContext;
use image::{DynamicImage, ImageError};
use std::error;
use std::fmt;
use std::path::{Path, PathBuf};

/// How to wrap texture coordinates while sampling textures.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Wrap {
  /// Clamp the coordinate to the edge of the texture.
  ClampToEdge,
  /// Repeat the texture: only the fractional part of the coordinate is used.
  Repeat,
  /// Same as [`Wrap::Repeat`], but mirrored on every odd repetition.
  MirroredRepeat,
}

/// Interpolation used when a texel covers more or less than one pixel.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Filter {
  /// Nearest texel.
  Nearest,
  /// Linear interpolation of the neighboring texels.
  Linear,
}

/// Dimensionality of a texture.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Target {
  /// 1D texture.
  Dim1,
  /// 2D texture.
  Dim2,
}

impl Target {
  /// Infer the target of a `width` × `height` image.
  ///
  /// An image with any side equal to 1 is a 1D texture.
  pub fn infer(width: u32, height: u32) -> Self {
    if width == 1 || height == 1 {
      Target::Dim1
    } else {
      Target::Dim2
    }
  }
}

/// Internal (GPU-side) storage format.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum InternalFormat {
  R8,
  RGB8,
  RGBA8,
  R32F,
  RGBA16F,
  RGBA32F,
  Depth24,
  Depth32F,
}

/// Layout of the texels handed to the GPU.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Format {
  Red,
  RGB,
  RGBA,
  DepthComponent,
}

impl Format {
  /// Number of channels.
  pub fn channels_len(self) -> usize {
    match self {
      Format::Red | Format::DepthComponent => 1,
      Format::RGB => 3,
      Format::RGBA => 4,
    }
  }
}

/// Type of every channel of the texels handed to the GPU.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Type {
  UnsignedByte,
  UnsignedInt,
  Float,
}

impl Type {
  /// Size in bytes of one channel.
  pub fn bytes_len(self) -> usize {
    match self {
      Type::UnsignedByte => 1,
      Type::UnsignedInt | Type::Float => 4,
    }
  }
}

/// Full pixel format: internal format, format and type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct PixelFormat {
  /// GPU-side storage.
  pub internal_format: InternalFormat,
  /// Texel layout.
  pub format: Format,
  /// Channel type.
  pub ty: Type,
}

impl PixelFormat {
  /// 8-bit normalized RGBA, the format images are uploaded with.
  pub const RGBA8: Self = PixelFormat::new(InternalFormat::RGBA8, Format::RGBA, Type::UnsignedByte);
  /// 8-bit normalized RGB.
  pub const RGB8: Self = PixelFormat::new(InternalFormat::RGB8, Format::RGB, Type::UnsignedByte);
  /// Single 32-bit floating channel.
  pub const R32F: Self = PixelFormat::new(InternalFormat::R32F, Format::Red, Type::Float);
  /// Half-float RGBA, handy for HDR render targets.
  pub const RGBA16F: Self = PixelFormat::new(InternalFormat::RGBA16F, Format::RGBA, Type::Float);
  /// 24-bit depth.
  pub const DEPTH24: Self = PixelFormat::new(
    InternalFormat::Depth24,
    Format::DepthComponent,
    Type::UnsignedInt,
  );
  /// 32-bit floating depth.
  pub const DEPTH32F: Self =
    PixelFormat::new(InternalFormat::Depth32F, Format::DepthComponent, Type::Float);

  /// Build a pixel format.
  pub const fn new(internal_format: InternalFormat, format: Format, ty: Type) -> Self {
    PixelFormat {
      internal_format,
      format,
      ty,
    }
  }

  /// Size in bytes of one texel.
  pub fn bytes_len(&self) -> usize {
    self.format.channels_len() * self.ty.bytes_len()
  }
}

/// Errors that might happen when working with textures.
#[non_exhaustive]
#[derive(Debug)]
pub enum TextureError {
  /// A texture’s storage failed to be created.
  ///
  /// The carried [`String`] gives the reason of the failure.
  TextureStorageCreationFailed(String),
  /// Not enough texel data provided for the texture size.
  NotEnoughTexels {
    /// Expected number of bytes.
    expected: usize,
    /// Provided number of bytes.
    provided: usize,
  },
  /// Unsupported pixel format.
  UnsupportedPixelFormat(PixelFormat),
  /// The image could not be opened or decoded.
  ImageError(ImageError),
}

impl fmt::Display for TextureError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      TextureError::TextureStorageCreationFailed(ref e) => {
        write!(f, "texture storage creation failed: {}", e)
      }

      TextureError::NotEnoughTexels { expected, provided } => write!(
        f,
        "not enough texels provided: expected {} bytes, provided {} bytes",
        expected, provided
      ),

      TextureError::UnsupportedPixelFormat(ref fmt) => {
        write!(f, "unsupported pixel format: {:?}", fmt)
      }

      TextureError::ImageError(ref e) => write!(f, "cannot load image: {}", e),
    }
  }
}

impl error::Error for TextureError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      TextureError::ImageError(e) => Some(e),
      _ => None,
    }
  }
}

impl From<ImageError> for TextureError {
  fn from(e: ImageError) -> Self {
    TextureError::ImageError(e)
  }
}

/// A GPU texture and its tracked state.
pub struct Texture<B>
where
  B: TextureBackend,
{
  pub(crate) repr: B::TextureRepr,
  width: u32,
  height: u32,
  depth: u32,
  target: Target,
  lod: u32,
  format: PixelFormat,
  min_filter: Filter,
  mag_filter: Filter,
  wrap: Wrap,
  name: Option<String>,
  path: Option<PathBuf>,
}

impl<B> Texture<B>
where
  B: TextureBackend,
{
  /// Allocate a texture handle with default state and no storage.
  ///
  /// Defaults: 0×0, [`Target::Dim2`], [`PixelFormat::RGBA8`], linear filtering, repeat wrapping.
  pub fn new<C>(ctx: &mut C) -> Result<Self, TextureError>
  where
    C: GraphicsContext<Backend = B>,
  {
    let repr = unsafe { ctx.backend().new_texture()? };

    Ok(Texture {
      repr,
      width: 0,
      height: 0,
      depth: 0,
      target: Target::Dim2,
      lod: 0,
      format: PixelFormat::RGBA8,
      min_filter: Filter::Linear,
      mag_filter: Filter::Linear,
      wrap: Wrap::Repeat,
      name: None,
      path: None,
    })
  }

  /// Create an empty 2D texture, typically used as a render target.
  ///
  /// Storage is allocated but not initialized.
  pub fn create_2d<C>(
    ctx: &mut C,
    width: u32,
    height: u32,
    format: PixelFormat,
  ) -> Result<Self, TextureError>
  where
    C: GraphicsContext<Backend = B>,
  {
    let mut texture = Self::new(ctx)?;
    texture.build(width, height, 0, Target::Dim2, format, None)?;
    Ok(texture)
  }

  /// Create a texture from an image.
  pub fn from_image<C>(ctx: &mut C, image: &DynamicImage) -> Result<Self, TextureError>
  where
    C: GraphicsContext<Backend = B>,
  {
    let mut texture = Self::new(ctx)?;
    texture.set_image(image)?;
    Ok(texture)
  }

  /// Open an image file and create a texture from it.
  ///
  /// The path and the file name are kept on the texture for tracing.
  pub fn open<C, P>(ctx: &mut C, path: P) -> Result<Self, TextureError>
  where
    C: GraphicsContext<Backend = B>,
    P: AsRef<Path>,
  {
    let path = path.as_ref();
    let image = image::open(path)?;

    let mut texture = Self::from_image(ctx, &image)?;
    texture.name = path.file_name().map(|n| n.to_string_lossy().into_owned());
    texture.path = Some(path.to_owned());

    log::debug!(
      "loaded texture {} ({}×{}, {:?})",
      path.display(),
      texture.width,
      texture.height,
      texture.target
    );

    Ok(texture)
  }

  /// Replace the content (and possibly the size and target) of the texture with an image.
  ///
  /// The image is flipped vertically and converted to RGBA8.
  pub fn set_image(&mut self, image: &DynamicImage) -> Result<(), TextureError> {
    let texels = image.flipv().to_rgba8();
    let (width, height) = texels.dimensions();
    let target = Target::infer(width, height);

    self.build(
      width,
      height,
      0,
      target,
      PixelFormat::RGBA8,
      Some(texels.as_raw().as_slice()),
    )
  }

  /// (Re)build the texture storage.
  ///
  /// On success, every tracked state is updated, filters are reset to linear and wrapping to
  /// repeat. On failure, the tracked state is left as it was. 1D textures take the longest of
  /// `width` and `height` as length.
  pub fn build(
    &mut self,
    width: u32,
    height: u32,
    depth: u32,
    target: Target,
    format: PixelFormat,
    texels: Option<&[u8]>,
  ) -> Result<(), TextureError> {
    let size = match target {
      Target::Dim1 => [width.max(height), 1],
      Target::Dim2 => [width, height],
    };

    if let Some(texels) = texels {
      let expected = size[0] as usize * size[1] as usize * format.bytes_len();

      if texels.len() < expected {
        return Err(TextureError::NotEnoughTexels {
          expected,
          provided: texels.len(),
        });
      }
    }

    unsafe { B::build(&mut self.repr, target, self.lod, size, format, texels)? };

    self.width = width;
    self.height = height;
    self.depth = depth;
    self.target = target;
    self.format = format;
    self.min_filter = Filter::Linear;
    self.mag_filter = Filter::Linear;
    self.wrap = Wrap::Repeat;

    Ok(())
  }

  /// Bind the texture to the currently active texture unit.
  ///
  /// Selecting the unit is the caller’s business.
  pub fn bind(&self) {
    unsafe { B::bind(&self.repr, self.target) }
  }

  /// Set the wrap mode on both axes.
  pub fn set_repeat_mode(&mut self, wrap: Wrap) {
    self.wrap = wrap;
    unsafe { B::set_wrap(&self.repr, self.target, wrap) }
  }

  /// Set both the minification and magnification filters.
  pub fn set_interpolation(&mut self, filter: Filter) {
    self.min_filter = filter;
    self.mag_filter = filter;
    unsafe { B::set_filter(&self.repr, self.target, filter, filter) }
  }

  /// Native handle.
  pub fn handle(&self) -> u32 {
    unsafe { B::handle(&self.repr) }
  }

  /// Dimensions as `(width, height)`.
  pub fn size(&self) -> (u32, u32) {
    (self.width, self.height)
  }

  /// Width.
  pub fn width(&self) -> u32 {
    self.width
  }

  /// Height.
  pub fn height(&self) -> u32 {
    self.height
  }

  /// Depth. Always 0 for 1D and 2D textures.
  pub fn depth(&self) -> u32 {
    self.depth
  }

  /// Dimensionality.
  pub fn target(&self) -> Target {
    self.target
  }

  /// Mipmap level storage is built for.
  pub fn lod(&self) -> u32 {
    self.lod
  }

  /// Pixel format.
  pub fn format(&self) -> PixelFormat {
    self.format
  }

  /// Minification filter.
  pub fn min_filter(&self) -> Filter {
    self.min_filter
  }

  /// Magnification filter.
  pub fn mag_filter(&self) -> Filter {
    self.mag_filter
  }

  /// Wrap mode.
  pub fn wrap(&self) -> Wrap {
    self.wrap
  }

  /// File name of the image the texture was loaded from, if any.
  pub fn name(&self) -> Option<&str> {
    self.name.as_deref()
  }

  /// Path of the image the texture was loaded from, if any.
  pub fn path(&self) -> Option<&Path> {
    self.path.as_deref()
  }
}

impl<B> fmt::Debug for Texture<B>
where
  B: TextureBackend,
{
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("Texture")
      .field("handle", &self.handle())
      .field("size", &self.size())
      .field("target", &self.target)
      .field("format", &self.format)
      .field("name", &self.name)
      .finish()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::{Call, MockContext};
  use image::{ImageBuffer, Rgba};

  fn image(width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgba8(ImageBuffer::from_fn(width, height, |_, y| {
      Rgba([y as u8, 0, 0, 255])
    }))
  }

  fn built_target(ctx: &MockContext) -> Option<(Target, [u32; 2])> {
    ctx.calls().into_iter().rev().find_map(|call| match call {
      Call::BuildTexture { target, size, .. } => Some((target, size)),
      _ => None,
    })
  }

  #[test]
  fn infer_target() {
    assert_eq!(Target::infer(1, 64), Target::Dim1);
    assert_eq!(Target::infer(64, 1), Target::Dim1);
    assert_eq!(Target::infer(1, 1), Target::Dim1);
    assert_eq!(Target::infer(2, 64), Target::Dim2);
    assert_eq!(Target::infer(64, 64), Target::Dim2);
  }

  #[test]
  fn column_image_is_1d() {
    let mut ctx = MockContext::new();
    let texture = Texture::from_image(&mut ctx, &image(1, 16)).unwrap();

    assert_eq!(texture.target(), Target::Dim1);
    assert_eq!(texture.size(), (1, 16));
    assert_eq!(built_target(&ctx), Some((Target::Dim1, [16, 1])));
  }

  #[test]
  fn row_image_is_1d() {
    let mut ctx = MockContext::new();
    let texture = Texture::from_image(&mut ctx, &image(32, 1)).unwrap();

    assert_eq!(texture.target(), Target::Dim1);
    assert_eq!(built_target(&ctx), Some((Target::Dim1, [32, 1])));
  }

  #[test]
  fn regular_image_is_2d() {
    let mut ctx = MockContext::new();
    let texture = Texture::from_image(&mut ctx, &image(4, 3)).unwrap();

    assert_eq!(texture.target(), Target::Dim2);
    assert_eq!(texture.format(), PixelFormat::RGBA8);
    assert_eq!(built_target(&ctx), Some((Target::Dim2, [4, 3])));
  }

  #[test]
  fn image_is_flipped_before_upload() {
    let mut ctx = MockContext::new();
    let _texture = Texture::from_image(&mut ctx, &image(2, 3)).unwrap();

    let texels = ctx
      .calls()
      .into_iter()
      .find_map(|call| match call {
        Call::BuildTexture { texels, .. } => texels,
        _ => None,
      })
      .unwrap();

    // first uploaded row is the last row of the image (red = 2)
    assert_eq!(texels.len(), 2 * 3 * 4);
    assert_eq!(texels[0], 2);
    assert_eq!(texels[2 * 2 * 4], 0);
  }

  #[test]
  fn create_2d_allocates_without_data() {
    let mut ctx = MockContext::new();
    let texture = Texture::create_2d(&mut ctx, 640, 360, PixelFormat::DEPTH32F).unwrap();

    assert_eq!(texture.size(), (640, 360));
    assert_eq!(texture.target(), Target::Dim2);
    assert_eq!(texture.min_filter(), Filter::Linear);
    assert_eq!(texture.wrap(), Wrap::Repeat);

    let uploaded = ctx.calls().into_iter().any(|call| {
      matches!(call, Call::BuildTexture { texels: Some(_), .. })
    });
    assert!(!uploaded);
  }

  #[test]
  fn handle_allocated_before_storage() {
    let mut ctx = MockContext::new();
    let texture = Texture::new(&mut ctx).unwrap();

    assert_eq!(ctx.calls(), vec![Call::NewTexture(texture.handle())]);
    assert_eq!(texture.size(), (0, 0));
  }

  #[test]
  fn not_enough_texels() {
    let mut ctx = MockContext::new();
    let mut texture = Texture::new(&mut ctx).unwrap();
    let res = texture.build(4, 4, 0, Target::Dim2, PixelFormat::RGBA8, Some(&[0u8; 16][..]));

    match res {
      Err(TextureError::NotEnoughTexels { expected, provided }) => {
        assert_eq!(expected, 64);
        assert_eq!(provided, 16);
      }
      _ => panic!("expected NotEnoughTexels"),
    }
  }

  #[test]
  fn repeat_and_interpolation() {
    let mut ctx = MockContext::new();
    let mut texture = Texture::create_2d(&mut ctx, 8, 8, PixelFormat::RGBA8).unwrap();
    let handle = texture.handle();

    texture.set_repeat_mode(Wrap::ClampToEdge);
    texture.set_interpolation(Filter::Nearest);

    assert_eq!(texture.wrap(), Wrap::ClampToEdge);
    assert_eq!(texture.min_filter(), Filter::Nearest);
    assert_eq!(texture.mag_filter(), Filter::Nearest);

    let calls = ctx.calls();
    assert!(calls.contains(&Call::SetWrap(handle, Wrap::ClampToEdge)));
    assert!(calls.contains(&Call::SetFilter(handle, Filter::Nearest, Filter::Nearest)));
  }

  #[test]
  fn sampling_changes_before_a_1d_upload() {
    let mut ctx = MockContext::new();
    let mut texture = Texture::new(&mut ctx).unwrap();
    let handle = texture.handle();

    texture.set_repeat_mode(Wrap::ClampToEdge);
    texture.set_interpolation(Filter::Nearest);
    texture.set_image(&image(1, 16)).unwrap();

    assert_eq!(texture.target(), Target::Dim1);
    assert_eq!(texture.wrap(), Wrap::Repeat);
    assert_eq!(texture.min_filter(), Filter::Linear);
    assert_eq!(built_target(&ctx), Some((Target::Dim1, [16, 1])));

    let calls = ctx.calls();
    let wrap = calls.iter().position(|c| *c == Call::SetWrap(handle, Wrap::ClampToEdge));
    let build = calls
      .iter()
      .position(|c| matches!(c, Call::BuildTexture { .. }));
    assert!(wrap.is_some() && wrap < build);
  }

  #[test]
  fn failed_build_keeps_previous_state() {
    let mut ctx = MockContext::failing_textures();
    let mut texture = Texture::new(&mut ctx).unwrap();
    texture.set_repeat_mode(Wrap::MirroredRepeat);

    let res = texture.build(1, 64, 0, Target::Dim1, PixelFormat::DEPTH32F, None);

    assert!(matches!(
      res,
      Err(TextureError::TextureStorageCreationFailed(_))
    ));
    assert_eq!(texture.size(), (0, 0));
    assert_eq!(texture.target(), Target::Dim2);
    assert_eq!(texture.format(), PixelFormat::RGBA8);
    assert_eq!(texture.wrap(), Wrap::MirroredRepeat);
  }

  #[test]
  fn handle_released_on_drop() {
    let mut ctx = MockContext::new();
    let texture = Texture::create_2d(&mut ctx, 8, 8, PixelFormat::RGBA8).unwrap();
    let handle = texture.handle();

    drop(texture);

    assert_eq!(ctx.calls().last(), Some(&Call::DeleteTexture(handle)));
  }

  #[test]
  fn open_missing_file() {
    let mut ctx = MockContext::new();
    let res = Texture::open(&mut ctx, "does/not/exist.png");

    assert!(matches!(res, Err(TextureError::ImageError(_))));
  }
}
