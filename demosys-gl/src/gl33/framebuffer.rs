use gl;

use crate::gl33::state::{BlendingState, DepthTest};
use crate::gl33::GL33;
use demosys::backend::framebuffer::Framebuffer as FramebufferBackend;
use demosys::framebuffer::RenderState;

unsafe impl FramebufferBackend for GL33 {
  unsafe fn set_viewport(&mut self, viewport: [i32; 4]) {
    self.state.borrow_mut().set_viewport(viewport);
  }

  unsafe fn bind_default_framebuffer(&mut self) {
    self.state.borrow_mut().bind_draw_framebuffer(0);
  }

  unsafe fn clear(&mut self, color: [f32; 4]) {
    self.state.borrow_mut().set_clear_color(color);
    gl::Clear(gl::COLOR_BUFFER_BIT | gl::DEPTH_BUFFER_BIT);
  }

  unsafe fn set_render_state(&mut self, render_state: &RenderState) {
    let mut state = self.state.borrow_mut();

    state.set_depth_test(DepthTest::from(render_state.depth_test()));
    state.set_blending_state(BlendingState::from(render_state.blending()));
  }
}
