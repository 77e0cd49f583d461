//! Recording backend used by the unit tests.
//!
//! Every backend call is appended to a shared log; GPU objects get increasing handles and log their
//! deletion when dropped.

use crate::backend::framebuffer::Framebuffer;
use crate::backend::sampler::Sampler;
use crate::backend::shader::Shader;
use crate::backend::texture::{Texture, TextureBase};
use crate::backend::vertex_array::VertexArray;
use crate::context::GraphicsContext;
use crate::framebuffer::RenderState;
use crate::geometry::Mesh;
use crate::sampler::{SamplerDesc, SamplerError};
use crate::shader::{ProgramError, UniformValue, UniformWarning};
use crate::texture::{Filter, PixelFormat, Target, TextureError, Wrap};
use crate::vertex_array::VertexArrayError;
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Call {
  NewTexture(u32),
  TextureUnit(u32),
  BuildTexture {
    handle: u32,
    target: Target,
    size: [u32; 2],
    format: PixelFormat,
    texels: Option<Vec<u8>>,
  },
  BindTexture(u32, Target),
  SetWrap(u32, Wrap),
  SetFilter(u32, Filter, Filter),
  DeleteTexture(u32),
  NewSampler(u32, SamplerDesc),
  UseSampler(u32, u32),
  ClearSampler(u32),
  DeleteSampler(u32),
  NewProgram(u32),
  UseProgram(u32),
  Uniform(u32, String, UniformValue),
  DeleteProgram(u32),
  NewVertexArray(u32, usize),
  Render(u32),
  DeleteVertexArray(u32),
  Viewport([i32; 4]),
  BindDefaultFramebuffer,
  Clear([f32; 4]),
  RenderState(RenderState),
}

#[derive(Debug, Default)]
pub(crate) struct Log {
  calls: Vec<Call>,
  next_handle: u32,
  fail_programs: bool,
  fail_textures: bool,
}

impl Log {
  fn push(&mut self, call: Call) {
    self.calls.push(call);
  }

  fn handle(&mut self) -> u32 {
    self.next_handle += 1;
    self.next_handle
  }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum Kind {
  Texture,
  Sampler,
  Program,
  VertexArray,
}

/// A fake GPU object.
#[derive(Debug)]
pub(crate) struct Object {
  pub(crate) handle: u32,
  kind: Kind,
  log: Rc<RefCell<Log>>,
}

impl Object {
  fn new(log: &Rc<RefCell<Log>>, kind: Kind) -> Self {
    let handle = log.borrow_mut().handle();
    Object {
      handle,
      kind,
      log: log.clone(),
    }
  }

  fn push(&self, call: Call) {
    self.log.borrow_mut().push(call);
  }
}

impl Drop for Object {
  fn drop(&mut self) {
    let call = match self.kind {
      Kind::Texture => Call::DeleteTexture(self.handle),
      Kind::Sampler => Call::DeleteSampler(self.handle),
      Kind::Program => Call::DeleteProgram(self.handle),
      Kind::VertexArray => Call::DeleteVertexArray(self.handle),
    };

    self.push(call);
  }
}

#[derive(Debug, Default)]
pub(crate) struct MockBackend {
  log: Rc<RefCell<Log>>,
}

#[derive(Debug, Default)]
pub(crate) struct MockContext {
  backend: MockBackend,
}

impl MockContext {
  pub(crate) fn new() -> Self {
    Self::default()
  }

  /// A context on which every program fails to link.
  pub(crate) fn failing_programs() -> Self {
    let ctx = Self::default();
    ctx.backend.log.borrow_mut().fail_programs = true;
    ctx
  }

  /// A context on which every texture storage allocation fails.
  pub(crate) fn failing_textures() -> Self {
    let ctx = Self::default();
    ctx.backend.log.borrow_mut().fail_textures = true;
    ctx
  }

  pub(crate) fn calls(&self) -> Vec<Call> {
    self.backend.log.borrow().calls.clone()
  }

  pub(crate) fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
    self.backend.log.borrow().calls.iter().filter(|c| pred(c)).count()
  }

  pub(crate) fn clear_calls(&self) {
    self.backend.log.borrow_mut().calls.clear();
  }
}

unsafe impl GraphicsContext for MockContext {
  type Backend = MockBackend;

  fn backend(&mut self) -> &mut Self::Backend {
    &mut self.backend
  }
}

unsafe impl TextureBase for MockBackend {
  type TextureRepr = Object;
}

unsafe impl Texture for MockBackend {
  unsafe fn new_texture(&mut self) -> Result<Self::TextureRepr, TextureError> {
    let texture = Object::new(&self.log, Kind::Texture);
    texture.push(Call::NewTexture(texture.handle));
    Ok(texture)
  }

  unsafe fn set_texture_unit(&mut self, unit: u32) {
    self.log.borrow_mut().push(Call::TextureUnit(unit));
  }

  unsafe fn build(
    texture: &mut Self::TextureRepr,
    target: Target,
    _: u32,
    size: [u32; 2],
    format: PixelFormat,
    texels: Option<&[u8]>,
  ) -> Result<(), TextureError> {
    texture.push(Call::BuildTexture {
      handle: texture.handle,
      target,
      size,
      format,
      texels: texels.map(|t| t.to_vec()),
    });

    if texture.log.borrow().fail_textures {
      return Err(TextureError::TextureStorageCreationFailed(
        "mock allocation failure".to_owned(),
      ));
    }

    Ok(())
  }

  unsafe fn bind(texture: &Self::TextureRepr, target: Target) {
    texture.push(Call::BindTexture(texture.handle, target));
  }

  unsafe fn set_wrap(texture: &Self::TextureRepr, _: Target, wrap: Wrap) {
    texture.push(Call::SetWrap(texture.handle, wrap));
  }

  unsafe fn set_filter(texture: &Self::TextureRepr, _: Target, min: Filter, mag: Filter) {
    texture.push(Call::SetFilter(texture.handle, min, mag));
  }

  unsafe fn handle(texture: &Self::TextureRepr) -> u32 {
    texture.handle
  }
}

unsafe impl Sampler for MockBackend {
  type SamplerRepr = Object;

  unsafe fn new_sampler(&mut self, desc: &SamplerDesc) -> Result<Self::SamplerRepr, SamplerError> {
    let sampler = Object::new(&self.log, Kind::Sampler);
    sampler.push(Call::NewSampler(sampler.handle, *desc));
    Ok(sampler)
  }

  unsafe fn use_sampler(sampler: &Self::SamplerRepr, unit: u32) {
    sampler.push(Call::UseSampler(sampler.handle, unit));
  }

  unsafe fn clear_sampler(sampler: &Self::SamplerRepr, unit: u32) {
    sampler.push(Call::ClearSampler(unit));
  }
}

unsafe impl Shader for MockBackend {
  type ProgramRepr = Object;

  unsafe fn new_program(
    &mut self,
    _: &str,
    _: &str,
  ) -> Result<Self::ProgramRepr, ProgramError> {
    if self.log.borrow().fail_programs {
      return Err(ProgramError::LinkFailed("mock link failure".to_owned()));
    }

    let program = Object::new(&self.log, Kind::Program);
    program.push(Call::NewProgram(program.handle));
    Ok(program)
  }

  unsafe fn use_program(program: &Self::ProgramRepr) {
    program.push(Call::UseProgram(program.handle));
  }

  unsafe fn set_uniform(
    program: &Self::ProgramRepr,
    name: &str,
    value: UniformValue,
  ) -> Result<(), UniformWarning> {
    if name.starts_with("inactive") {
      return Err(UniformWarning::Inactive(name.to_owned()));
    }

    program.push(Call::Uniform(program.handle, name.to_owned(), value));
    Ok(())
  }
}

unsafe impl VertexArray for MockBackend {
  type VertexArrayRepr = Object;

  unsafe fn new_vertex_array(
    &mut self,
    mesh: &Mesh,
  ) -> Result<Self::VertexArrayRepr, VertexArrayError> {
    let vao = Object::new(&self.log, Kind::VertexArray);
    vao.push(Call::NewVertexArray(vao.handle, mesh.vertex_count()));
    Ok(vao)
  }

  unsafe fn render(vertex_array: &Self::VertexArrayRepr) {
    vertex_array.push(Call::Render(vertex_array.handle));
  }
}

unsafe impl Framebuffer for MockBackend {
  unsafe fn set_viewport(&mut self, viewport: [i32; 4]) {
    self.log.borrow_mut().push(Call::Viewport(viewport));
  }

  unsafe fn bind_default_framebuffer(&mut self) {
    self.log.borrow_mut().push(Call::BindDefaultFramebuffer);
  }

  unsafe fn clear(&mut self, color: [f32; 4]) {
    self.log.borrow_mut().push(Call::Clear(color));
  }

  unsafe fn set_render_state(&mut self, state: &RenderState) {
    self.log.borrow_mut().push(Call::RenderState(*state));
  }
}
