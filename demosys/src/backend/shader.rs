//! Shader backend interface.

use crate::shader::{ProgramError, UniformValue, UniformWarning};

/// Shader program interface.
pub unsafe trait Shader {
  /// Backend representation of a linked program. Dropping it releases the GPU object.
  type ProgramRepr;

  /// Compile a vertex and a fragment stage and link them.
  unsafe fn new_program(
    &mut self,
    vertex: &str,
    fragment: &str,
  ) -> Result<Self::ProgramRepr, ProgramError>;

  /// Make the program current.
  unsafe fn use_program(program: &Self::ProgramRepr);

  /// Set a uniform by name. The program is made current first.
  unsafe fn set_uniform(
    program: &Self::ProgramRepr,
    name: &str,
    value: UniformValue,
  ) -> Result<(), UniformWarning>;
}
