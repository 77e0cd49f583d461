//! Framebuffer backend interface.
//!
//! Only the default framebuffer (the one presented by the window) is exposed; render targets are
//! regular textures.

use crate::framebuffer::RenderState;

/// Default framebuffer operations.
pub unsafe trait Framebuffer {
  /// Set the viewport, given as `[x, y, width, height]`.
  unsafe fn set_viewport(&mut self, viewport: [i32; 4]);

  /// Make the default framebuffer the current render target.
  unsafe fn bind_default_framebuffer(&mut self);

  /// Clear the color and depth buffers of the current render target.
  unsafe fn clear(&mut self, color: [f32; 4]);

  /// Apply a render state.
  unsafe fn set_render_state(&mut self, state: &RenderState);
}
