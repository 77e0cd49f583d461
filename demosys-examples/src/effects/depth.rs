//! Depth linearization.
//!
//! A synthetic perspective depth buffer (a ramp going from the near to the far plane) is uploaded
//! as a floating depth texture, then shown with [`TextureHelper::draw_depth`]. The full-screen
//! copy uses the planes the ramp was built with and reads as a linear gradient; the small copy
//! sweeps its far plane to show what a mismatch looks like.

use crate::effects::{Bootstrap, Settings};
use demosys::context::GraphicsContext;
use demosys::effect::{Effect, EffectError};
use demosys::framebuffer::RenderState;
use demosys::helper::TextureHelper;
use demosys::texture::{PixelFormat, Target, Texture};
use demosys_gl::GL33;

const Z_NEAR: f32 = 1.;
const Z_FAR: f32 = 50.;
const RAMP_SIZE: [u32; 2] = [512, 64];

pub struct Depth {
  ramp: Texture<GL33>,
  helper: TextureHelper<GL33>,
}

impl<C> Bootstrap<C> for Depth
where
  C: GraphicsContext<Backend = GL33>,
{
  fn bootstrap(ctx: &mut C, _: &Settings) -> Result<Self, EffectError> {
    let [width, height] = RAMP_SIZE;
    let texels = depth_ramp(width, height, Z_NEAR, Z_FAR);

    let mut ramp = Texture::new(ctx)?;
    ramp.build(
      width,
      height,
      0,
      Target::Dim2,
      PixelFormat::DEPTH32F,
      Some(&texels),
    )?;

    Ok(Depth {
      ramp,
      helper: TextureHelper::new(),
    })
  }
}

impl<C> Effect<C> for Depth
where
  C: GraphicsContext<Backend = GL33>,
{
  fn name(&self) -> &str {
    "depth"
  }

  fn draw(&mut self, ctx: &mut C, time: f32, _: f32) -> Result<(), EffectError> {
    RenderState::default().apply(ctx);

    self
      .helper
      .draw_depth(ctx, &self.ramp, Z_NEAR, Z_FAR, [0., 0.], [1., 1.])?;

    let far = Z_FAR * (1. + 0.9 * time.sin());
    self
      .helper
      .draw_depth(ctx, &self.ramp, Z_NEAR, far, [1.45, 1.45], [0.25, 0.25])?;

    Ok(())
  }
}

// Window-space depth of a horizontal ramp of eye distances going linearly from near to far.
fn depth_ramp(width: u32, height: u32, near: f32, far: f32) -> Vec<u8> {
  let row = (0..width).map(|x| {
    let t = x as f32 / (width.max(2) - 1) as f32;
    let distance = near + t * (far - near);
    let ndc = (far + near - 2. * far * near / distance) / (far - near);

    ndc * 0.5 + 0.5
  });

  let row: Vec<f32> = row.collect();

  (0..height)
    .flat_map(|_| row.iter().flat_map(|z| z.to_ne_bytes()))
    .collect()
}
