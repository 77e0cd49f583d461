use crate::gl33::{
  state::GLState,
  texture::{opengl_filter, opengl_wrap},
  GL33,
};
use demosys::backend::sampler::Sampler as SamplerBackend;
use demosys::sampler::{SamplerDesc, SamplerError};
use gl::{self, types::*};
use std::{cell::RefCell, rc::Rc};

pub struct Sampler {
  handle: GLuint,
  state: Rc<RefCell<GLState>>,
}

impl Drop for Sampler {
  fn drop(&mut self) {
    if let Ok(mut state) = self.state.try_borrow_mut() {
      state.unbind_sampler(self.handle);
    }

    unsafe {
      gl::DeleteSamplers(1, &self.handle);
    }
  }
}

unsafe impl SamplerBackend for GL33 {
  type SamplerRepr = Sampler;

  unsafe fn new_sampler(&mut self, desc: &SamplerDesc) -> Result<Self::SamplerRepr, SamplerError> {
    let mut handle: GLuint = 0;
    gl::GenSamplers(1, &mut handle);

    if handle == 0 {
      return Err(SamplerError::CannotCreate(
        "cannot generate sampler name".to_owned(),
      ));
    }

    let wrap = opengl_wrap(desc.wrap) as GLint;
    gl::SamplerParameteri(handle, gl::TEXTURE_WRAP_S, wrap);
    gl::SamplerParameteri(handle, gl::TEXTURE_WRAP_T, wrap);
    gl::SamplerParameteri(
      handle,
      gl::TEXTURE_MIN_FILTER,
      opengl_filter(desc.min_filter) as GLint,
    );
    gl::SamplerParameteri(
      handle,
      gl::TEXTURE_MAG_FILTER,
      opengl_filter(desc.mag_filter) as GLint,
    );

    Ok(Sampler {
      handle,
      state: self.state.clone(),
    })
  }

  unsafe fn use_sampler(sampler: &Self::SamplerRepr, unit: u32) {
    sampler.state.borrow_mut().bind_sampler(unit, sampler.handle);
  }

  unsafe fn clear_sampler(sampler: &Self::SamplerRepr, unit: u32) {
    sampler.state.borrow_mut().bind_sampler(unit, 0);
  }
}
