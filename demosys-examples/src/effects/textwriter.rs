//! Scrolling text.
//!
//! Every line of text is rasterized once, with a built-in 5×7 bitmap font, into its own texture.
//! Each frame the visible lines are composited with [`TextureHelper::draw`] while the whole text
//! scrolls up, starting over every 75 seconds.
//!
//! The text is read from `--text <path>`, or defaults to an embedded sample.

use crate::effects::{Bootstrap, Settings};
use demosys::context::GraphicsContext;
use demosys::effect::{Effect, EffectError};
use demosys::framebuffer::RenderState;
use demosys::helper::TextureHelper;
use demosys::texture::{Filter, Texture};
use demosys_gl::GL33;
use image::{DynamicImage, Rgba, RgbaImage};
use std::fs;

const SAMPLE: &str = include_str!("textwriter.txt");

// width of the text area, in characters
const COLUMNS: usize = 105;

// glyph cell, in texels
const CELL: [u32; 2] = [6, 8];
const GLYPH_HEIGHT: u32 = 7;

// height of a line, in [0, 2] framebuffer units
const LINE_HEIGHT: f32 = 0.05;

const LOOP_SECONDS: f32 = 75.;

pub struct TextWriter {
  lines: Vec<Option<Texture<GL33>>>,
  helper: TextureHelper<GL33>,
  aspect_ratio: f32,
}

impl<C> Bootstrap<C> for TextWriter
where
  C: GraphicsContext<Backend = GL33>,
{
  fn bootstrap(ctx: &mut C, settings: &Settings) -> Result<Self, EffectError> {
    let text = match settings.text {
      Some(ref path) => fs::read_to_string(path)?,
      None => SAMPLE.to_owned(),
    };

    let mut lines = Vec::new();
    for line in text.lines() {
      let texture = match rasterize(line, COLUMNS) {
        Some(image) => {
          let mut texture = Texture::from_image(ctx, &image)?;
          texture.set_interpolation(Filter::Nearest);
          Some(texture)
        }

        None => None,
      };

      lines.push(texture);
    }

    log::info!("text writer: {} lines", lines.len());

    let mut helper = TextureHelper::new();
    helper.init(ctx)?;

    Ok(TextWriter {
      lines,
      helper,
      aspect_ratio: settings.aspect_ratio,
    })
  }
}

impl<C> Effect<C> for TextWriter
where
  C: GraphicsContext<Backend = GL33>,
{
  fn name(&self) -> &str {
    "textwriter"
  }

  fn draw(&mut self, ctx: &mut C, time: f32, _: f32) -> Result<(), EffectError> {
    RenderState::default().set_blending(true).apply(ctx);

    let origin = scroll_origin(time);
    let scale = line_scale(COLUMNS, LINE_HEIGHT, self.aspect_ratio);

    for (i, line) in self.lines.iter().enumerate() {
      let texture = match line {
        Some(texture) => texture,
        None => continue,
      };

      let pos = line_position(origin, i, LINE_HEIGHT);

      if is_visible(pos[1], LINE_HEIGHT) {
        self.helper.draw(ctx, texture, pos, scale)?;
      }
    }

    Ok(())
  }
}

// Top-left corner of the text, measured rightwards and downwards from the top-left corner of the
// framebuffer. It moves up one unit every five seconds.
fn scroll_origin(time: f32) -> [f32; 2] {
  [0.05, 0.01 - (time % LOOP_SECONDS) / 5.]
}

// bottom-left corner of line `i`, in [0, 2]²
fn line_position(origin: [f32; 2], i: usize, height: f32) -> [f32; 2] {
  let top = 2. - origin[1] - i as f32 * height;
  [origin[0], top - height]
}

// Helper scale of a line: glyphs keep the proportions of their cell whatever the window shape.
// The helper maps [-1, 1]², so sizes are halved.
fn line_scale(columns: usize, height: f32, aspect_ratio: f32) -> [f32; 2] {
  let glyph_width = height * CELL[0] as f32 / CELL[1] as f32 / aspect_ratio;
  [columns as f32 * glyph_width * 0.5, height * 0.5]
}

fn is_visible(bottom: f32, height: f32) -> bool {
  bottom < 2. && bottom + height > 0.
}

/// White glyphs on a transparent background, `columns` cells wide. Longer lines are cut.
///
/// Blank lines yield `None`.
fn rasterize(line: &str, columns: usize) -> Option<DynamicImage> {
  if line.trim().is_empty() {
    return None;
  }

  let mut image = RgbaImage::new(columns as u32 * CELL[0], CELL[1]);

  for (cell, c) in line.chars().take(columns).enumerate() {
    let x0 = cell as u32 * CELL[0];

    for (x, &bits) in glyph(c).iter().enumerate() {
      for y in 0..GLYPH_HEIGHT {
        if (bits >> y) & 1 == 1 {
          image.put_pixel(x0 + x as u32, y, Rgba([255, 255, 255, 255]));
        }
      }
    }
  }

  Some(DynamicImage::ImageRgba8(image))
}

// One byte per column, least significant bit on top. Letters are upper case only; anything
// without a glyph shows as a question mark.
#[rustfmt::skip]
fn glyph(c: char) -> [u8; 5] {
  match c.to_ascii_uppercase() {
    'A' => [0x7C, 0x12, 0x11, 0x12, 0x7C],
    'B' => [0x7F, 0x49, 0x49, 0x49, 0x36],
    'C' => [0x3E, 0x41, 0x41, 0x41, 0x22],
    'D' => [0x7F, 0x41, 0x41, 0x22, 0x1C],
    'E' => [0x7F, 0x49, 0x49, 0x49, 0x41],
    'F' => [0x7F, 0x09, 0x09, 0x09, 0x01],
    'G' => [0x3E, 0x41, 0x49, 0x49, 0x7A],
    'H' => [0x7F, 0x08, 0x08, 0x08, 0x7F],
    'I' => [0x00, 0x41, 0x7F, 0x41, 0x00],
    'J' => [0x20, 0x40, 0x41, 0x3F, 0x01],
    'K' => [0x7F, 0x08, 0x14, 0x22, 0x41],
    'L' => [0x7F, 0x40, 0x40, 0x40, 0x40],
    'M' => [0x7F, 0x02, 0x0C, 0x02, 0x7F],
    'N' => [0x7F, 0x04, 0x08, 0x10, 0x7F],
    'O' => [0x3E, 0x41, 0x41, 0x41, 0x3E],
    'P' => [0x7F, 0x09, 0x09, 0x09, 0x06],
    'Q' => [0x3E, 0x41, 0x51, 0x21, 0x5E],
    'R' => [0x7F, 0x09, 0x19, 0x29, 0x46],
    'S' => [0x26, 0x49, 0x49, 0x49, 0x32],
    'T' => [0x01, 0x01, 0x7F, 0x01, 0x01],
    'U' => [0x3F, 0x40, 0x40, 0x40, 0x3F],
    'V' => [0x1F, 0x20, 0x40, 0x20, 0x1F],
    'W' => [0x3F, 0x40, 0x38, 0x40, 0x3F],
    'X' => [0x63, 0x14, 0x08, 0x14, 0x63],
    'Y' => [0x03, 0x04, 0x78, 0x04, 0x03],
    'Z' => [0x61, 0x51, 0x49, 0x45, 0x43],
    '0' => [0x3E, 0x51, 0x49, 0x45, 0x3E],
    '1' => [0x00, 0x42, 0x7F, 0x40, 0x00],
    '2' => [0x62, 0x51, 0x49, 0x49, 0x46],
    '3' => [0x21, 0x41, 0x49, 0x4D, 0x33],
    '4' => [0x18, 0x14, 0x12, 0x7F, 0x10],
    '5' => [0x27, 0x45, 0x45, 0x45, 0x39],
    '6' => [0x3C, 0x4A, 0x49, 0x49, 0x31],
    '7' => [0x41, 0x21, 0x11, 0x09, 0x07],
    '8' => [0x36, 0x49, 0x49, 0x49, 0x36],
    '9' => [0x46, 0x49, 0x49, 0x29, 0x1E],
    '!' => [0x00, 0x00, 0x5F, 0x00, 0x00],
    '"' => [0x00, 0x07, 0x00, 0x07, 0x00],
    '\'' => [0x00, 0x00, 0x07, 0x00, 0x00],
    '(' => [0x00, 0x1C, 0x22, 0x41, 0x00],
    ')' => [0x00, 0x41, 0x22, 0x1C, 0x00],
    '*' => [0x14, 0x08, 0x3E, 0x08, 0x14],
    '+' => [0x08, 0x08, 0x3E, 0x08, 0x08],
    ',' => [0x00, 0x50, 0x30, 0x00, 0x00],
    '-' => [0x08, 0x08, 0x08, 0x08, 0x08],
    '.' => [0x00, 0x60, 0x60, 0x00, 0x00],
    '/' => [0x20, 0x10, 0x08, 0x04, 0x02],
    ':' => [0x00, 0x36, 0x36, 0x00, 0x00],
    ';' => [0x00, 0x56, 0x36, 0x00, 0x00],
    '=' => [0x14, 0x14, 0x14, 0x14, 0x14],
    '_' => [0x40, 0x40, 0x40, 0x40, 0x40],
    c if c.is_whitespace() => [0x00; 5],
    _ => [0x02, 0x01, 0x51, 0x09, 0x06],
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn lit(image: &RgbaImage, x: u32, y: u32) -> bool {
    image.get_pixel(x, y)[3] == 255
  }

  #[test]
  fn glyph_lookup() {
    assert_eq!(glyph('a'), glyph('A'));
    assert_eq!(glyph(' '), [0; 5]);
    assert_eq!(glyph('\t'), [0; 5]);
    assert_eq!(glyph('é'), glyph('?'));
    assert_eq!(glyph('~'), glyph('?'));
  }

  #[test]
  fn lines_are_rasterized_cell_by_cell() {
    let image = rasterize("I.", 4).unwrap().to_rgba8();
    assert_eq!(image.dimensions(), (4 * CELL[0], CELL[1]));

    // the stem of the I is its middle column, top to bottom
    assert!((0..GLYPH_HEIGHT).all(|y| lit(&image, 2, y)));
    assert!(!lit(&image, 0, 3));
    assert!(!lit(&image, 2, GLYPH_HEIGHT));

    // the dot sits at the bottom of the second cell
    assert!(lit(&image, CELL[0] + 1, 6));
    assert!(!lit(&image, CELL[0] + 1, 0));

    // unused cells stay transparent
    assert!((2 * CELL[0]..4 * CELL[0]).all(|x| (0..CELL[1]).all(|y| !lit(&image, x, y))));
  }

  #[test]
  fn long_lines_are_cut_and_blank_lines_skipped() {
    let image = rasterize(&"W".repeat(200), COLUMNS).unwrap();
    assert_eq!(image.to_rgba8().width(), COLUMNS as u32 * CELL[0]);

    assert!(rasterize("", COLUMNS).is_none());
    assert!(rasterize(" \t ", COLUMNS).is_none());
  }

  #[test]
  fn text_scrolls_up_and_loops() {
    assert_eq!(scroll_origin(0.), [0.05, 0.01]);
    assert!((scroll_origin(10.)[1] - (0.01 - 2.)).abs() < 1e-5);
    assert_eq!(scroll_origin(LOOP_SECONDS), scroll_origin(0.));

    let before = line_position(scroll_origin(1.), 3, LINE_HEIGHT);
    let after = line_position(scroll_origin(2.), 3, LINE_HEIGHT);
    assert!(after[1] > before[1]);
    assert_eq!(after[0], before[0]);
  }

  #[test]
  fn lines_stack_downwards() {
    let first = line_position([0.05, 0.01], 0, LINE_HEIGHT);
    let second = line_position([0.05, 0.01], 1, LINE_HEIGHT);

    assert!((first[1] - 1.94).abs() < 1e-5);
    assert!((first[1] - second[1] - LINE_HEIGHT).abs() < 1e-5);
  }

  #[test]
  fn glyphs_keep_their_proportions() {
    let square = line_scale(COLUMNS, LINE_HEIGHT, 1.);
    let wide = line_scale(COLUMNS, LINE_HEIGHT, 2.);

    assert!((square[0] - COLUMNS as f32 * LINE_HEIGHT * 0.75 * 0.5).abs() < 1e-5);
    assert!((wide[0] * 2. - square[0]).abs() < 1e-5);
    assert_eq!(square[1], LINE_HEIGHT * 0.5);
  }

  #[test]
  fn visibility() {
    assert!(is_visible(1., LINE_HEIGHT));
    assert!(is_visible(-0.01, LINE_HEIGHT));
    assert!(!is_visible(-LINE_HEIGHT, LINE_HEIGHT));
    assert!(!is_visible(2., LINE_HEIGHT));
  }

  #[test]
  fn sample_text_renders() {
    let lines: Vec<_> = SAMPLE.lines().collect();
    assert!(lines.len() > 10);
    assert!(lines.iter().all(|line| line.chars().count() <= COLUMNS));
    assert!(lines.iter().filter_map(|line| rasterize(line, COLUMNS)).count() > 0);
  }
}
