//! Vertex arrays: uploaded meshes.

use crate::backend::vertex_array::VertexArray as VertexArrayBackend;
use crate::context::GraphicsContext;
use crate::geometry::{Mesh, Mode};
use std::error;
use std::fmt;

/// Errors that might happen when uploading a mesh.
#[non_exhaustive]
#[derive(Debug, Eq, PartialEq)]
pub enum VertexArrayError {
  /// The backend could not create the vertex array or its buffer.
  CannotCreate(String),
  /// The mesh has more attributes than the backend supports.
  TooManyAttributes(usize),
}

impl fmt::Display for VertexArrayError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      VertexArrayError::CannotCreate(ref e) => write!(f, "cannot create vertex array: {}", e),
      VertexArrayError::TooManyAttributes(n) => write!(f, "too many vertex attributes: {}", n),
    }
  }
}

impl error::Error for VertexArrayError {}

/// A mesh living on the GPU.
pub struct VertexArray<B>
where
  B: VertexArrayBackend,
{
  repr: B::VertexArrayRepr,
  mode: Mode,
  vertex_count: usize,
}

impl<B> VertexArray<B>
where
  B: VertexArrayBackend,
{
  /// Upload a mesh.
  pub fn new<C>(ctx: &mut C, mesh: &Mesh) -> Result<Self, VertexArrayError>
  where
    C: GraphicsContext<Backend = B>,
  {
    let repr = unsafe { ctx.backend().new_vertex_array(mesh)? };

    Ok(VertexArray {
      repr,
      mode: mesh.mode(),
      vertex_count: mesh.vertex_count(),
    })
  }

  /// Draw with the currently used program.
  pub fn render(&self) {
    unsafe { B::render(&self.repr) }
  }

  /// Primitive mode.
  pub fn mode(&self) -> Mode {
    self.mode
  }

  /// Number of vertices.
  pub fn vertex_count(&self) -> usize {
    self.vertex_count
  }
}
