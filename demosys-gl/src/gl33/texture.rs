use crate::gl33::{pixel::opengl_pixel_format, state::GLState, GL33};
use demosys::backend::texture::{Texture as TextureBackend, TextureBase};
use demosys::texture::{Filter, Format, InternalFormat, PixelFormat, Target, TextureError, Wrap};
use gl::{self, types::*};
use std::{
  cell::{Cell, RefCell},
  os::raw::c_void,
  ptr,
  rc::Rc,
};

pub struct Texture {
  pub(crate) handle: GLuint, // handle to the GPU texture object
  pub(crate) target: BoundTarget, // “type” of the texture, fixed by its first binding
  state: Rc<RefCell<GLState>>,
}

impl Texture {
  // GL textures cannot change target once bound; a new object is needed
  unsafe fn retarget(&mut self, state: &mut GLState, target: GLenum) {
    if self.target.conflicts(target) {
      log::debug!(
        "texture {} changes target; reallocating the GL object",
        self.handle
      );

      state.unbind_texture(self.handle);
      gl::DeleteTextures(1, &self.handle);
      gl::GenTextures(1, &mut self.handle);
      self.target.forget();
    }

    self.target.record(target);
  }

  // every binding fixes the target, whether or not storage exists yet
  unsafe fn bind_as(&self, target: GLenum) {
    self.target.record(target);
    self.state.borrow_mut().bind_texture(target, self.handle);
  }
}

/// Target a GL texture name got attached to; 0 while it has never been bound.
#[derive(Debug, Default)]
pub(crate) struct BoundTarget(Cell<GLenum>);

impl BoundTarget {
  fn record(&self, target: GLenum) {
    if self.0.get() == 0 {
      self.0.set(target);
    }
  }

  fn forget(&self) {
    self.0.set(0);
  }

  fn conflicts(&self, target: GLenum) -> bool {
    let bound = self.0.get();
    bound != 0 && bound != target
  }
}

impl Drop for Texture {
  fn drop(&mut self) {
    if let Ok(mut state) = self.state.try_borrow_mut() {
      state.unbind_texture(self.handle);
    }

    unsafe {
      gl::DeleteTextures(1, &self.handle);
    }
  }
}

unsafe impl TextureBase for GL33 {
  type TextureRepr = Texture;
}

unsafe impl TextureBackend for GL33 {
  unsafe fn new_texture(&mut self) -> Result<Self::TextureRepr, TextureError> {
    let mut handle: GLuint = 0;
    gl::GenTextures(1, &mut handle);

    if handle == 0 {
      return Err(TextureError::TextureStorageCreationFailed(
        "cannot generate texture name".to_owned(),
      ));
    }

    Ok(Texture {
      handle,
      target: BoundTarget::default(),
      state: self.state.clone(),
    })
  }

  unsafe fn set_texture_unit(&mut self, unit: u32) {
    self.state.borrow_mut().set_texture_unit(unit);
  }

  unsafe fn build(
    texture: &mut Self::TextureRepr,
    target: Target,
    lod: u32,
    size: [u32; 2],
    format: PixelFormat,
    texels: Option<&[u8]>,
  ) -> Result<(), TextureError> {
    if !is_coherent(format) {
      return Err(TextureError::UnsupportedPixelFormat(format));
    }

    let gl_target = opengl_target(target);
    let state = texture.state.clone();
    let mut state = state.borrow_mut();

    texture.retarget(&mut state, gl_target);
    state.bind_texture(gl_target, texture.handle);

    apply_filter(gl_target, Filter::Linear, Filter::Linear);
    apply_wrap(gl_target, Wrap::Repeat);

    let (gl_format, gl_iformat, gl_type) = opengl_pixel_format(format);
    let data = texels.map_or(ptr::null(), |t| t.as_ptr() as *const c_void);

    // only errors raised by the upload below are reported
    drain_errors();

    set_unpack_alignment((format.bytes_len() * size[0] as usize) % 8);

    match target {
      Target::Dim1 => gl::TexImage1D(
        gl::TEXTURE_1D,
        lod as GLint,
        gl_iformat as GLint,
        size[0] as GLsizei,
        0,
        gl_format,
        gl_type,
        data,
      ),

      Target::Dim2 => gl::TexImage2D(
        gl::TEXTURE_2D,
        lod as GLint,
        gl_iformat as GLint,
        size[0] as GLsizei,
        size[1] as GLsizei,
        0,
        gl_format,
        gl_type,
        data,
      ),
    }

    match gl::GetError() {
      gl::NO_ERROR => Ok(()),
      err => Err(TextureError::TextureStorageCreationFailed(format!(
        "glTexImage failed with 0x{:x} ({}×{}, {:?})",
        err, size[0], size[1], format
      ))),
    }
  }

  unsafe fn bind(texture: &Self::TextureRepr, target: Target) {
    texture.bind_as(opengl_target(target));
  }

  unsafe fn set_wrap(texture: &Self::TextureRepr, target: Target, wrap: Wrap) {
    let gl_target = opengl_target(target);
    texture.bind_as(gl_target);
    apply_wrap(gl_target, wrap);
  }

  unsafe fn set_filter(texture: &Self::TextureRepr, target: Target, min: Filter, mag: Filter) {
    let gl_target = opengl_target(target);
    texture.bind_as(gl_target);
    apply_filter(gl_target, min, mag);
  }

  unsafe fn handle(texture: &Self::TextureRepr) -> u32 {
    texture.handle
  }
}

pub(crate) fn opengl_target(target: Target) -> GLenum {
  match target {
    Target::Dim1 => gl::TEXTURE_1D,
    Target::Dim2 => gl::TEXTURE_2D,
  }
}

pub(crate) fn opengl_wrap(wrap: Wrap) -> GLenum {
  match wrap {
    Wrap::ClampToEdge => gl::CLAMP_TO_EDGE,
    Wrap::Repeat => gl::REPEAT,
    Wrap::MirroredRepeat => gl::MIRRORED_REPEAT,
  }
}

pub(crate) fn opengl_filter(filter: Filter) -> GLenum {
  match filter {
    Filter::Nearest => gl::NEAREST,
    Filter::Linear => gl::LINEAR,
  }
}

fn apply_wrap(target: GLenum, wrap: Wrap) {
  unsafe {
    gl::TexParameteri(target, gl::TEXTURE_WRAP_S, opengl_wrap(wrap) as GLint);
    gl::TexParameteri(target, gl::TEXTURE_WRAP_T, opengl_wrap(wrap) as GLint);
  }
}

fn apply_filter(target: GLenum, min: Filter, mag: Filter) {
  unsafe {
    gl::TexParameteri(target, gl::TEXTURE_MIN_FILTER, opengl_filter(min) as GLint);
    gl::TexParameteri(target, gl::TEXTURE_MAG_FILTER, opengl_filter(mag) as GLint);
  }
}

// depth internal formats go with depth texels, and only with them
fn is_coherent(pf: PixelFormat) -> bool {
  let depth_storage = matches!(
    pf.internal_format,
    InternalFormat::Depth24 | InternalFormat::Depth32F
  );

  depth_storage == (pf.format == Format::DepthComponent)
}

// clear the error flags left by earlier calls
unsafe fn drain_errors() {
  let mut stale = 0;

  while gl::GetError() != gl::NO_ERROR {
    stale += 1;

    // GetError keeps returning errors if the context is lost
    if stale == 16 {
      break;
    }
  }

  if stale > 0 {
    log::warn!("{} stale GL error(s) before texture upload", stale);
  }
}

// set the unpack alignment for uploading aligned texels
fn set_unpack_alignment(skip_bytes: usize) {
  let unpack_alignment = match skip_bytes {
    0 => 8,
    2 => 2,
    4 => 4,
    _ => 1,
  };

  unsafe { gl::PixelStorei(gl::UNPACK_ALIGNMENT, unpack_alignment) };
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn depth_formats_are_coherent() {
    assert!(is_coherent(PixelFormat::DEPTH32F));
    assert!(is_coherent(PixelFormat::DEPTH24));
    assert!(is_coherent(PixelFormat::RGBA8));
    assert!(!is_coherent(PixelFormat::new(
      InternalFormat::Depth32F,
      Format::Red,
      demosys::texture::Type::Float
    )));
  }

  #[test]
  fn first_binding_fixes_the_target() {
    let target = BoundTarget::default();
    assert!(!target.conflicts(gl::TEXTURE_1D));

    // a wrap or filter change before any storage exists binds as 2D
    target.record(gl::TEXTURE_2D);
    assert!(target.conflicts(gl::TEXTURE_1D));
    assert!(!target.conflicts(gl::TEXTURE_2D));

    // later bindings don’t override it
    target.record(gl::TEXTURE_1D);
    assert!(target.conflicts(gl::TEXTURE_1D));

    target.forget();
    target.record(gl::TEXTURE_1D);
    assert!(!target.conflicts(gl::TEXTURE_1D));
  }

  #[test]
  fn targets() {
    assert_eq!(opengl_target(Target::Dim1), gl::TEXTURE_1D);
    assert_eq!(opengl_target(Target::Dim2), gl::TEXTURE_2D);
  }
}
