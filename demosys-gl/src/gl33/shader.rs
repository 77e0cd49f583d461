use crate::gl33::{state::GLState, GL33};
use demosys::backend::shader::Shader;
use demosys::shader::{ProgramError, StageType, UniformValue, UniformWarning};
use gl::{self, types::*};
use std::{
  cell::RefCell,
  ffi::CString,
  ptr::{null, null_mut},
  rc::Rc,
};

pub struct Program {
  pub(crate) handle: GLuint,
  state: Rc<RefCell<GLState>>,
}

impl Drop for Program {
  fn drop(&mut self) {
    if let Ok(mut state) = self.state.try_borrow_mut() {
      state.invalidate_shader_program();
    }

    unsafe {
      gl::DeleteProgram(self.handle);
    }
  }
}

impl Program {
  fn link(&self) -> Result<(), ProgramError> {
    let handle = self.handle;

    unsafe {
      gl::LinkProgram(handle);

      let mut linked: GLint = gl::FALSE.into();
      gl::GetProgramiv(handle, gl::LINK_STATUS, &mut linked);

      if linked == gl::TRUE.into() {
        Ok(())
      } else {
        let mut log_len: GLint = 0;
        gl::GetProgramiv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

        let mut log: Vec<u8> = Vec::with_capacity(log_len as usize);
        gl::GetProgramInfoLog(handle, log_len, null_mut(), log.as_mut_ptr() as *mut GLchar);

        log.set_len(log_len as usize);

        Err(ProgramError::LinkFailed(info_log(log)))
      }
    }
  }

  fn uniform_location(&self, name: &str) -> Result<GLint, UniformWarning> {
    let c_name = CString::new(name.as_bytes())
      .map_err(|_| UniformWarning::Inactive(name.to_owned()))?;
    let location =
      unsafe { gl::GetUniformLocation(self.handle, c_name.as_ptr() as *const GLchar) };

    // ensure the location smells good
    if location < 0 {
      return Err(UniformWarning::Inactive(name.to_owned()));
    }

    Ok(location)
  }
}

unsafe impl Shader for GL33 {
  type ProgramRepr = Program;

  unsafe fn new_program(
    &mut self,
    vertex: &str,
    fragment: &str,
  ) -> Result<Self::ProgramRepr, ProgramError> {
    let vs = compile_stage(StageType::VertexShader, vertex)?;
    let fs = match compile_stage(StageType::FragmentShader, fragment) {
      Ok(fs) => fs,
      Err(e) => {
        gl::DeleteShader(vs);
        return Err(e);
      }
    };

    let handle = gl::CreateProgram();

    gl::AttachShader(handle, vs);
    gl::AttachShader(handle, fs);

    let program = Program {
      handle,
      state: self.state.clone(),
    };
    let linked = program.link();

    // stages are owned by the program once linked
    gl::DetachShader(handle, vs);
    gl::DetachShader(handle, fs);
    gl::DeleteShader(vs);
    gl::DeleteShader(fs);

    linked.map(move |_| program)
  }

  unsafe fn use_program(program: &Self::ProgramRepr) {
    program.state.borrow_mut().use_program(program.handle);
  }

  unsafe fn set_uniform(
    program: &Self::ProgramRepr,
    name: &str,
    value: UniformValue,
  ) -> Result<(), UniformWarning> {
    let location = program.uniform_location(name)?;
    uniform_type_match(program.handle, name, &value)?;

    program.state.borrow_mut().use_program(program.handle);

    match value {
      UniformValue::Int(x) => gl::Uniform1i(location, x),
      UniformValue::Float(x) => gl::Uniform1f(location, x),
      UniformValue::Vec2(v) => gl::Uniform2fv(location, 1, v.as_ptr()),
      UniformValue::Vec3(v) => gl::Uniform3fv(location, 1, v.as_ptr()),
      UniformValue::Vec4(v) => gl::Uniform4fv(location, 1, v.as_ptr()),
      UniformValue::Mat4(m) => gl::UniformMatrix4fv(location, 1, gl::FALSE, m.as_ptr() as _),
    }

    Ok(())
  }
}

fn opengl_shader_type(t: StageType) -> GLenum {
  match t {
    StageType::VertexShader => gl::VERTEX_SHADER,
    StageType::FragmentShader => gl::FRAGMENT_SHADER,
  }
}

unsafe fn compile_stage(ty: StageType, src: &str) -> Result<GLuint, ProgramError> {
  let handle = gl::CreateShader(opengl_shader_type(ty));

  if handle == 0 {
    return Err(ProgramError::StageCompilationFailed {
      stage: ty,
      log: "unable to create shader stage".to_owned(),
    });
  }

  let c_src = match CString::new(src.as_bytes()) {
    Ok(c_src) => c_src,
    Err(_) => {
      gl::DeleteShader(handle);
      return Err(ProgramError::StageCompilationFailed {
        stage: ty,
        log: "source contains a nul byte".to_owned(),
      });
    }
  };

  gl::ShaderSource(handle, 1, [c_src.as_ptr()].as_ptr(), null());
  gl::CompileShader(handle);

  let mut compiled: GLint = gl::FALSE.into();
  gl::GetShaderiv(handle, gl::COMPILE_STATUS, &mut compiled);

  if compiled == gl::TRUE.into() {
    Ok(handle)
  } else {
    let mut log_len: GLint = 0;
    gl::GetShaderiv(handle, gl::INFO_LOG_LENGTH, &mut log_len);

    let mut log: Vec<u8> = Vec::with_capacity(log_len as usize);
    gl::GetShaderInfoLog(handle, log_len, null_mut(), log.as_mut_ptr() as *mut GLchar);

    gl::DeleteShader(handle);

    log.set_len(log_len as usize);

    Err(ProgramError::StageCompilationFailed {
      stage: ty,
      log: info_log(log),
    })
  }
}

// info logs are nul-terminated
fn info_log(mut log: Vec<u8>) -> String {
  while log.last() == Some(&0) {
    log.pop();
  }

  String::from_utf8_lossy(&log).into_owned()
}

fn uniform_type_match(
  program: GLuint,
  name: &str,
  value: &UniformValue,
) -> Result<(), UniformWarning> {
  let mut glty: GLint = 0;

  unsafe {
    let c_name = CString::new(name.as_bytes())
      .map_err(|_| UniformWarning::Inactive(name.to_owned()))?;
    let mut index: GLuint = gl::INVALID_INDEX;
    gl::GetUniformIndices(
      program,
      1,
      [c_name.as_ptr() as *const GLchar].as_ptr(),
      &mut index,
    );

    if index == gl::INVALID_INDEX {
      return Err(UniformWarning::Inactive(name.to_owned()));
    }

    gl::GetActiveUniformsiv(program, 1, &index, gl::UNIFORM_TYPE, &mut glty);
  }

  check_uniform_type_match(name, value, glty as GLenum)
}

fn check_uniform_type_match(
  name: &str,
  value: &UniformValue,
  glty: GLenum,
) -> Result<(), UniformWarning> {
  let matches = match value {
    // samplers are set through their texture unit
    UniformValue::Int(_) => matches!(
      glty,
      gl::INT | gl::SAMPLER_1D | gl::SAMPLER_2D | gl::SAMPLER_1D_SHADOW | gl::SAMPLER_2D_SHADOW
    ),
    UniformValue::Float(_) => glty == gl::FLOAT,
    UniformValue::Vec2(_) => glty == gl::FLOAT_VEC2,
    UniformValue::Vec3(_) => glty == gl::FLOAT_VEC3,
    UniformValue::Vec4(_) => glty == gl::FLOAT_VEC4,
    UniformValue::Mat4(_) => glty == gl::FLOAT_MAT4,
  };

  if matches {
    Ok(())
  } else {
    Err(UniformWarning::TypeMismatch(
      name.to_owned(),
      format!("{:?} doesn’t match GL type 0x{:x}", value, glty),
    ))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn info_log_strips_nul() {
    assert_eq!(info_log(b"0:1: error\0".to_vec()), "0:1: error");
    assert_eq!(info_log(Vec::new()), "");
  }

  #[test]
  fn sampler_uniforms_take_ints() {
    assert!(check_uniform_type_match("texture0", &UniformValue::Int(0), gl::SAMPLER_2D).is_ok());
    assert!(check_uniform_type_match("near", &UniformValue::Float(0.1), gl::FLOAT).is_ok());
    assert!(matches!(
      check_uniform_type_match("offset", &UniformValue::Float(0.), gl::FLOAT_VEC2),
      Err(UniformWarning::TypeMismatch(..))
    ));
  }
}
