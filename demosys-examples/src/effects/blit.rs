//! An image composited four times onto the framebuffer.
//!
//! Without `--texture`, a checkerboard is generated instead.

use crate::effects::{Bootstrap, Settings};
use demosys::context::GraphicsContext;
use demosys::effect::{Effect, EffectError};
use demosys::framebuffer::RenderState;
use demosys::helper::TextureHelper;
use demosys::texture::{Filter, Texture};
use demosys_gl::GL33;
use image::{DynamicImage, Rgba, RgbaImage};

// bottom-left corners of the four quadrants, in [0, 2]²
const QUADRANTS: [[f32; 2]; 4] = [[0., 0.], [1., 0.], [0., 1.], [1., 1.]];

pub struct Blit {
  texture: Texture<GL33>,
  helper: TextureHelper<GL33>,
}

impl<C> Bootstrap<C> for Blit
where
  C: GraphicsContext<Backend = GL33>,
{
  fn bootstrap(ctx: &mut C, settings: &Settings) -> Result<Self, EffectError> {
    let texture = match settings.texture {
      Some(ref path) => Texture::open(ctx, path)?,

      None => {
        log::info!("no texture given; using a checkerboard");

        let mut texture = Texture::from_image(ctx, &checkerboard(256, 32))?;
        texture.set_interpolation(Filter::Nearest);
        texture
      }
    };

    log::info!("blitting {:?}", texture);

    let mut helper = TextureHelper::new();
    helper.init(ctx)?;

    Ok(Blit { texture, helper })
  }
}

impl<C> Effect<C> for Blit
where
  C: GraphicsContext<Backend = GL33>,
{
  fn name(&self) -> &str {
    "blit"
  }

  fn draw(&mut self, ctx: &mut C, time: f32, _: f32) -> Result<(), EffectError> {
    RenderState::default().apply(ctx);

    // each copy breathes with its own phase
    for (i, &pos) in QUADRANTS.iter().enumerate() {
      let s = 0.45 + 0.05 * (time * 2. + i as f32).sin();
      let pos = [pos[0] + 0.5 - s, pos[1] + 0.5 - s];

      self.helper.draw(ctx, &self.texture, pos, [s, s])?;
    }

    Ok(())
  }
}

fn checkerboard(size: u32, cell: u32) -> DynamicImage {
  let image = RgbaImage::from_fn(size, size, |x, y| {
    if (x / cell + y / cell) % 2 == 0 {
      Rgba([230, 230, 230, 255])
    } else {
      Rgba([40, 40, 40, 255])
    }
  });

  DynamicImage::ImageRgba8(image)
}
