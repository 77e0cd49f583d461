//! Texture blitting helper.
//!
//! [`TextureHelper`] draws a texture onto the currently bound framebuffer with a full-screen quad,
//! translated and scaled in normalized device coordinates. Depth textures can be drawn too: their
//! non-linear depth values are linearized with the near and far planes they were rendered with.
//!
//! The GPU resources (one quad, two programs, two samplers) are created on first use, or
//! up-front with [`TextureHelper::init`], and live as long as the helper.

use crate::backend::sampler::Sampler as SamplerBackend;
use crate::backend::shader::Shader;
use crate::backend::texture::Texture as TextureBackend;
use crate::backend::vertex_array::VertexArray as VertexArrayBackend;
use crate::context::GraphicsContext;
use crate::geometry::quad_fs;
use crate::sampler::{Sampler, SamplerDesc, SamplerError};
use crate::shader::{Program, ProgramError};
use crate::texture::Texture;
use crate::vertex_array::{VertexArray, VertexArrayError};
use std::error;
use std::fmt;

const TEXTURE_UNIT: u32 = 0;

const TEXTURE2D_VS: &str = r#"#version 330

layout(location = 0) in vec3 in_position;
layout(location = 1) in vec2 in_uv;

uniform vec2 offset;
uniform vec2 scale;

out vec2 uv;

void main() {
  uv = in_uv;
  gl_Position = vec4((in_position.xy + vec2(1.0, 1.0)) * scale + offset, 0.0, 1.0);
}
"#;

const TEXTURE2D_FS: &str = r#"#version 330

out vec4 out_color;

in vec2 uv;

uniform sampler2D texture0;

void main() {
  out_color = texture(texture0, uv);
}
"#;

const DEPTH_FS: &str = r#"#version 330

out vec4 out_color;

in vec2 uv;

uniform sampler2D texture0;
uniform float near;
uniform float far;

void main() {
  float z = texture(texture0, uv).r;
  float d = (2.0 * near) / (far + near - z * (far - near));
  out_color = vec4(d);
}
"#;

/// Errors that might happen while creating the helper resources.
#[non_exhaustive]
#[derive(Debug, Eq, PartialEq)]
pub enum HelperError {
  /// One of the built-in programs failed.
  Program(ProgramError),
  /// A sampler could not be created.
  Sampler(SamplerError),
  /// The quad could not be uploaded.
  VertexArray(VertexArrayError),
}

impl fmt::Display for HelperError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      HelperError::Program(ref e) => write!(f, "texture helper program error: {}", e),
      HelperError::Sampler(ref e) => write!(f, "texture helper sampler error: {}", e),
      HelperError::VertexArray(ref e) => write!(f, "texture helper quad error: {}", e),
    }
  }
}

impl error::Error for HelperError {
  fn source(&self) -> Option<&(dyn error::Error + 'static)> {
    match self {
      HelperError::Program(e) => Some(e),
      HelperError::Sampler(e) => Some(e),
      HelperError::VertexArray(e) => Some(e),
    }
  }
}

impl From<ProgramError> for HelperError {
  fn from(e: ProgramError) -> Self {
    HelperError::Program(e)
  }
}

impl From<SamplerError> for HelperError {
  fn from(e: SamplerError) -> Self {
    HelperError::Sampler(e)
  }
}

impl From<VertexArrayError> for HelperError {
  fn from(e: VertexArrayError) -> Self {
    HelperError::VertexArray(e)
  }
}

struct Resources<B>
where
  B: Shader + SamplerBackend + VertexArrayBackend,
{
  quad: VertexArray<B>,
  texture2d_program: Program<B>,
  texture2d_sampler: Sampler<B>,
  depth_program: Program<B>,
  depth_sampler: Sampler<B>,
}

impl<B> Resources<B>
where
  B: Shader + SamplerBackend + VertexArrayBackend,
{
  fn new<C>(ctx: &mut C) -> Result<Self, HelperError>
  where
    C: GraphicsContext<Backend = B>,
  {
    let quad = quad_fs().upload(ctx)?;
    let texture2d_program = Program::from_strings(ctx, TEXTURE2D_VS, TEXTURE2D_FS)?;
    let depth_program = Program::from_strings(ctx, TEXTURE2D_VS, DEPTH_FS)?;

    // linear and repeating; depth values are sampled raw
    let texture2d_sampler = Sampler::new(ctx, SamplerDesc::default())?;
    let depth_sampler = Sampler::new(ctx, SamplerDesc::default())?;

    Ok(Resources {
      quad,
      texture2d_program,
      texture2d_sampler,
      depth_program,
      depth_sampler,
    })
  }
}

/// Draws textures with a full-screen quad.
pub struct TextureHelper<B>
where
  B: Shader + SamplerBackend + VertexArrayBackend,
{
  resources: Option<Resources<B>>,
}

impl<B> Default for TextureHelper<B>
where
  B: Shader + SamplerBackend + VertexArrayBackend,
{
  fn default() -> Self {
    TextureHelper { resources: None }
  }
}

impl<B> TextureHelper<B>
where
  B: TextureBackend + Shader + SamplerBackend + VertexArrayBackend,
{
  /// Create an uninitialized helper. No GPU resource is created until the first draw or
  /// [`TextureHelper::init`].
  pub fn new() -> Self {
    TextureHelper { resources: None }
  }

  /// Whether the GPU resources exist.
  pub fn is_initialized(&self) -> bool {
    self.resources.is_some()
  }

  /// Create the GPU resources if they don’t exist yet.
  pub fn init<C>(&mut self, ctx: &mut C) -> Result<(), HelperError>
  where
    C: GraphicsContext<Backend = B>,
  {
    self.resources(ctx).map(|_| ())
  }

  /// Draw a color texture.
  ///
  /// `pos` is the bottom-left corner in `[0, 2]²` (`[0, 0]` is the bottom-left corner of the
  /// framebuffer) and `scale` the size of the quad relative to the full framebuffer.
  pub fn draw<C>(
    &mut self,
    ctx: &mut C,
    texture: &Texture<B>,
    pos: [f32; 2],
    scale: [f32; 2],
  ) -> Result<(), HelperError>
  where
    C: GraphicsContext<Backend = B>,
  {
    let res = self.resources(ctx)?;
    let program = &res.texture2d_program;
    program.use_program();

    program.uniform_or_warn("offset", offset(pos));
    program.uniform_or_warn("scale", scale);
    program.uniform_or_warn("texture0", TEXTURE_UNIT as i32);

    unsafe { ctx.backend().set_texture_unit(TEXTURE_UNIT) };
    texture.bind();
    res.texture2d_sampler.use_unit(TEXTURE_UNIT);

    res.quad.render();

    res.texture2d_sampler.clear_unit(TEXTURE_UNIT);

    Ok(())
  }

  /// Draw a depth texture, linearized with the `near` and `far` planes it was rendered with.
  pub fn draw_depth<C>(
    &mut self,
    ctx: &mut C,
    texture: &Texture<B>,
    near: f32,
    far: f32,
    pos: [f32; 2],
    scale: [f32; 2],
  ) -> Result<(), HelperError>
  where
    C: GraphicsContext<Backend = B>,
  {
    let res = self.resources(ctx)?;
    let program = &res.depth_program;
    program.use_program();

    program.uniform_or_warn("offset", offset(pos));
    program.uniform_or_warn("scale", scale);
    program.uniform_or_warn("near", near);
    program.uniform_or_warn("far", far);
    program.uniform_or_warn("texture0", TEXTURE_UNIT as i32);

    unsafe { ctx.backend().set_texture_unit(TEXTURE_UNIT) };
    texture.bind();
    res.depth_sampler.use_unit(TEXTURE_UNIT);

    res.quad.render();

    res.depth_sampler.clear_unit(TEXTURE_UNIT);

    Ok(())
  }

  fn resources<C>(&mut self, ctx: &mut C) -> Result<&Resources<B>, HelperError>
  where
    C: GraphicsContext<Backend = B>,
  {
    let res = match self.resources.take() {
      Some(res) => res,
      None => {
        log::debug!("initializing texture helper");
        Resources::new(ctx)?
      }
    };

    Ok(self.resources.insert(res))
  }
}

fn offset(pos: [f32; 2]) -> [f32; 2] {
  [pos[0] - 1., pos[1] - 1.]
}
