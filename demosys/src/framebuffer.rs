//! Default framebuffer and render state.

use crate::backend::framebuffer::Framebuffer as FramebufferBackend;
use crate::context::GraphicsContext;

/// Viewport covering a whole surface of `size` pixels, as `[x, y, width, height]`.
pub fn full_viewport(size: [u32; 2]) -> [i32; 4] {
  [0, 0, size[0] as i32, size[1] as i32]
}

/// Capabilities toggled before drawing.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct RenderState {
  depth_test: bool,
  blending: bool,
}

impl Default for RenderState {
  /// Defaults:
  ///
  /// - `depth_test` disabled.
  /// - `blending` disabled.
  fn default() -> Self {
    RenderState {
      depth_test: false,
      blending: false,
    }
  }
}

impl RenderState {
  /// Enable or disable the depth test.
  pub fn set_depth_test(self, depth_test: bool) -> Self {
    RenderState { depth_test, ..self }
  }

  /// Is the depth test enabled?
  pub fn depth_test(&self) -> bool {
    self.depth_test
  }

  /// Enable or disable alpha blending (`src_alpha`, `1 - src_alpha`).
  pub fn set_blending(self, blending: bool) -> Self {
    RenderState { blending, ..self }
  }

  /// Is blending enabled?
  pub fn blending(&self) -> bool {
    self.blending
  }

  /// Apply this render state on a context.
  pub fn apply<C>(&self, ctx: &mut C)
  where
    C: GraphicsContext,
    C::Backend: FramebufferBackend,
  {
    unsafe { ctx.backend().set_render_state(self) }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn full_viewport_starts_at_origin() {
    assert_eq!(full_viewport([2560, 1440]), [0, 0, 2560, 1440]);
  }

  #[test]
  fn render_state_builder() {
    let state = RenderState::default().set_depth_test(true);

    assert!(state.depth_test());
    assert!(!state.blending());
    assert!(state.set_blending(true).blending());
  }
}
