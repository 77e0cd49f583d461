use demosys::texture::{Format, InternalFormat, PixelFormat, Type};
use gl::types::*;

// OpenGL format, internal format and type.
pub(crate) fn opengl_pixel_format(pf: PixelFormat) -> (GLenum, GLenum, GLenum) {
  (
    opengl_format(pf.format),
    opengl_internal_format(pf.internal_format),
    opengl_type(pf.ty),
  )
}

fn opengl_format(format: Format) -> GLenum {
  match format {
    Format::Red => gl::RED,
    Format::RGB => gl::RGB,
    Format::RGBA => gl::RGBA,
    Format::DepthComponent => gl::DEPTH_COMPONENT,
  }
}

fn opengl_internal_format(iformat: InternalFormat) -> GLenum {
  match iformat {
    InternalFormat::R8 => gl::R8,
    InternalFormat::RGB8 => gl::RGB8,
    InternalFormat::RGBA8 => gl::RGBA8,
    InternalFormat::R32F => gl::R32F,
    InternalFormat::RGBA16F => gl::RGBA16F,
    InternalFormat::RGBA32F => gl::RGBA32F,
    InternalFormat::Depth24 => gl::DEPTH_COMPONENT24,
    InternalFormat::Depth32F => gl::DEPTH_COMPONENT32F,
  }
}

fn opengl_type(ty: Type) -> GLenum {
  match ty {
    Type::UnsignedByte => gl::UNSIGNED_BYTE,
    Type::UnsignedInt => gl::UNSIGNED_INT,
    Type::Float => gl::FLOAT,
  }
}
