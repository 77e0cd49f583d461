//! OpenGL 3.3 backend.
//!
//! This module implements an OpenGL 3.3 backend for demosys. The backend type is [`GL33`].

mod framebuffer;
mod pixel;
mod sampler;
mod shader;
mod state;
mod texture;
mod vertex_array;

pub use self::state::GLState;
pub use self::state::StateQueryError;
use std::cell::RefCell;
use std::rc::Rc;

/// An OpenGL 3.3 backend.
///
/// This type is to be used as a demosys backend type. It implements every backend trait.
#[derive(Debug)]
pub struct GL33 {
  pub(crate) state: Rc<RefCell<GLState>>,
}

impl GL33 {
  /// Create a new OpenGL 3.3 backend.
  ///
  /// The GL context must be current on the calling thread and its symbols loaded. Only one backend
  /// can exist per thread.
  pub fn new() -> Result<Self, StateQueryError> {
    GLState::new().map(|state| GL33 {
      state: Rc::new(RefCell::new(state)),
    })
  }
}
