//! Vertex array backend interface.

use crate::geometry::Mesh;
use crate::vertex_array::VertexArrayError;

/// Vertex array interface.
///
/// Attributes are bound to consecutive locations in the order of [`Mesh::attributes`], so shaders
/// declare them with `layout(location = N)`.
pub unsafe trait VertexArray {
  /// Backend representation of a vertex array and its vertex buffer.
  type VertexArrayRepr;

  /// Upload a mesh.
  unsafe fn new_vertex_array(&mut self, mesh: &Mesh)
    -> Result<Self::VertexArrayRepr, VertexArrayError>;

  /// Draw all the vertices with the currently used program.
  unsafe fn render(vertex_array: &Self::VertexArrayRepr);
}
