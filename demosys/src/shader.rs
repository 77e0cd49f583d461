//! Shader programs.
//!
//! Programs are made of a vertex and a fragment stage written in GLSL. Uniforms are set by name;
//! setting a uniform the program doesn’t use yields a [`UniformWarning`], not an error. The GLSL
//! compiler is free to optimize unused uniforms away.

use crate::backend::shader::Shader;
use crate::context::GraphicsContext;
use std::error;
use std::fmt;

/// Shader stage type.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum StageType {
  /// Vertex shader.
  VertexShader,
  /// Fragment shader.
  FragmentShader,
}

impl fmt::Display for StageType {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      StageType::VertexShader => f.write_str("vertex shader"),
      StageType::FragmentShader => f.write_str("fragment shader"),
    }
  }
}

/// Errors that a program can generate.
#[non_exhaustive]
#[derive(Debug, Eq, PartialEq)]
pub enum ProgramError {
  /// A stage failed to compile.
  StageCompilationFailed {
    /// Which stage.
    stage: StageType,
    /// Compiler log.
    log: String,
  },
  /// The program failed to link.
  LinkFailed(String),
}

impl fmt::Display for ProgramError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      ProgramError::StageCompilationFailed { stage, ref log } => {
        write!(f, "{} compilation error: {}", stage, log)
      }

      ProgramError::LinkFailed(ref s) => write!(f, "shader program failed to link: {}", s),
    }
  }
}

impl error::Error for ProgramError {}

/// Uniform warnings.
#[non_exhaustive]
#[derive(Debug, Eq, PartialEq)]
pub enum UniformWarning {
  /// Inactive uniform (not in use / no participation to the final output in shaders).
  Inactive(String),
  /// Type mismatch between the value and the GLSL declaration.
  TypeMismatch(String, String),
}

impl fmt::Display for UniformWarning {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      UniformWarning::Inactive(ref s) => write!(f, "inactive {} uniform", s),

      UniformWarning::TypeMismatch(ref n, ref t) => {
        write!(f, "type mismatch for uniform {}: {}", n, t)
      }
    }
  }
}

impl error::Error for UniformWarning {}

/// Values uniforms can be set to.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UniformValue {
  Int(i32),
  Float(f32),
  Vec2([f32; 2]),
  Vec3([f32; 3]),
  Vec4([f32; 4]),
  /// Column-major 4×4 matrix.
  Mat4([[f32; 4]; 4]),
}

impl From<i32> for UniformValue {
  fn from(x: i32) -> Self {
    UniformValue::Int(x)
  }
}

impl From<f32> for UniformValue {
  fn from(x: f32) -> Self {
    UniformValue::Float(x)
  }
}

impl From<[f32; 2]> for UniformValue {
  fn from(v: [f32; 2]) -> Self {
    UniformValue::Vec2(v)
  }
}

impl From<[f32; 3]> for UniformValue {
  fn from(v: [f32; 3]) -> Self {
    UniformValue::Vec3(v)
  }
}

impl From<[f32; 4]> for UniformValue {
  fn from(v: [f32; 4]) -> Self {
    UniformValue::Vec4(v)
  }
}

impl From<[[f32; 4]; 4]> for UniformValue {
  fn from(m: [[f32; 4]; 4]) -> Self {
    UniformValue::Mat4(m)
  }
}

/// A linked shader program.
pub struct Program<B>
where
  B: Shader,
{
  repr: B::ProgramRepr,
}

impl<B> Program<B>
where
  B: Shader,
{
  /// Compile and link a program.
  pub fn from_strings<C>(ctx: &mut C, vertex: &str, fragment: &str) -> Result<Self, ProgramError>
  where
    C: GraphicsContext<Backend = B>,
  {
    let repr = unsafe { ctx.backend().new_program(vertex, fragment)? };
    Ok(Program { repr })
  }

  /// Make the program current.
  pub fn use_program(&self) {
    unsafe { B::use_program(&self.repr) }
  }

  /// Set a uniform.
  pub fn uniform(&self, name: &str, value: impl Into<UniformValue>) -> Result<(), UniformWarning> {
    unsafe { B::set_uniform(&self.repr, name, value.into()) }
  }

  /// Set a uniform, logging a warning instead of returning it.
  pub fn uniform_or_warn(&self, name: &str, value: impl Into<UniformValue>) {
    if let Err(warning) = self.uniform(name, value) {
      log::warn!("{}", warning);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::{Call, MockContext};

  #[test]
  fn uniforms_are_forwarded() {
    let mut ctx = MockContext::new();
    let program = Program::from_strings(&mut ctx, "", "").unwrap();

    program.uniform("scale", [1f32, 2.]).unwrap();
    program.uniform("near", 0.1f32).unwrap();

    let calls = ctx.calls();
    assert!(calls.contains(&Call::Uniform(
      1,
      "scale".to_owned(),
      UniformValue::Vec2([1., 2.])
    )));
    assert!(calls.contains(&Call::Uniform(
      1,
      "near".to_owned(),
      UniformValue::Float(0.1)
    )));
  }

  #[test]
  fn inactive_uniform_is_a_warning() {
    let mut ctx = MockContext::new();
    let program = Program::from_strings(&mut ctx, "", "").unwrap();

    assert_eq!(
      program.uniform("inactive_thing", 3i32),
      Err(UniformWarning::Inactive("inactive_thing".to_owned()))
    );

    // does not panic nor return anything
    program.uniform_or_warn("inactive_thing", 3i32);
  }

  #[test]
  fn link_failure() {
    let mut ctx = MockContext::failing_programs();

    assert!(matches!(
      Program::from_strings(&mut ctx, "", ""),
      Err(ProgramError::LinkFailed(_))
    ));
  }
}
