use gl;
use gl::types::*;
use std::cell::RefCell;
use std::os::raw::c_void;
use std::rc::Rc;

use crate::gl33::state::{Bind, GLState};
use crate::gl33::GL33;
use demosys::backend::vertex_array::VertexArray as VertexArrayBackend;
use demosys::geometry::{Mesh, Mode};
use demosys::vertex_array::VertexArrayError;

// OpenGL 3.3 guarantees at least 16 vertex attributes
const MAX_VERTEX_ATTRIBS: usize = 16;

pub struct VertexArray {
  vao: GLuint,
  vbo: GLuint,
  mode: GLenum,
  vert_nb: usize,
  state: Rc<RefCell<GLState>>,
}

impl Drop for VertexArray {
  fn drop(&mut self) {
    if let Ok(mut state) = self.state.try_borrow_mut() {
      state.invalidate_vertex_array();
      unsafe { state.unbind_buffer(self.vbo) };
    }

    unsafe {
      gl::DeleteBuffers(1, &self.vbo);
      gl::DeleteVertexArrays(1, &self.vao);
    }
  }
}

unsafe impl VertexArrayBackend for GL33 {
  type VertexArrayRepr = VertexArray;

  unsafe fn new_vertex_array(
    &mut self,
    mesh: &Mesh,
  ) -> Result<Self::VertexArrayRepr, VertexArrayError> {
    if mesh.attributes().len() > MAX_VERTEX_ATTRIBS {
      return Err(VertexArrayError::TooManyAttributes(mesh.attributes().len()));
    }

    let mut vao: GLuint = 0;
    let mut vbo: GLuint = 0;
    let mut gfx_st = self.state.borrow_mut();

    gl::GenVertexArrays(1, &mut vao);
    gl::GenBuffers(1, &mut vbo);

    if vao == 0 || vbo == 0 {
      gl::DeleteVertexArrays(1, &vao);
      gl::DeleteBuffers(1, &vbo);

      return Err(VertexArrayError::CannotCreate(format!(
        "cannot generate GL objects for {}",
        mesh.name()
      )));
    }

    // force binding the vertex array so that previously bound vertex arrays (possibly the same
    // handle) don’t prevent us from binding here
    gfx_st.bind_vertex_array(vao, Bind::Forced);

    // force binding as it’s meaningful when a vao is bound
    gfx_st.bind_array_buffer(vbo, Bind::Forced);

    let bytes = mesh.as_bytes();
    gl::BufferData(
      gl::ARRAY_BUFFER,
      bytes.len() as GLsizeiptr,
      bytes.as_ptr() as *const c_void,
      gl::STATIC_DRAW,
    );

    set_vertex_pointers(mesh);

    gfx_st.unbind_vertex_array();

    log::trace!(
      "uploaded {} ({} vertices, {} bytes)",
      mesh.name(),
      mesh.vertex_count(),
      bytes.len()
    );

    Ok(VertexArray {
      vao,
      vbo,
      mode: opengl_mode(mesh.mode()),
      vert_nb: mesh.vertex_count(),
      state: self.state.clone(),
    })
  }

  unsafe fn render(vertex_array: &Self::VertexArrayRepr) {
    if vertex_array.vert_nb == 0 {
      return;
    }

    vertex_array
      .state
      .borrow_mut()
      .bind_vertex_array(vertex_array.vao, Bind::Cached);

    gl::DrawArrays(vertex_array.mode, 0, vertex_array.vert_nb as GLsizei);
  }
}

// Attributes are interleaved and take consecutive locations.
unsafe fn set_vertex_pointers(mesh: &Mesh) {
  let stride = (mesh.stride() * std::mem::size_of::<f32>()) as GLsizei;
  let mut offset = 0;

  for (index, attrib) in mesh.attributes().iter().enumerate() {
    let index = index as GLuint;

    gl::VertexAttribPointer(
      index,
      attrib.components as GLint,
      gl::FLOAT,
      gl::FALSE,
      stride,
      (offset * std::mem::size_of::<f32>()) as *const c_void,
    );
    gl::EnableVertexAttribArray(index);

    offset += attrib.components;
  }
}

fn opengl_mode(mode: Mode) -> GLenum {
  match mode {
    Mode::Point => gl::POINTS,
    Mode::Triangle => gl::TRIANGLES,
  }
}
