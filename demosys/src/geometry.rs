//! Procedural geometry.
//!
//! Generators return a [`Mesh`]: CPU-side interleaved `f32` vertex data, ready to be uploaded with
//! [`Mesh::upload`] or handed to the GPU as raw bytes with [`Mesh::as_bytes`].

use crate::backend::vertex_array::VertexArray as VertexArrayBackend;
use crate::context::GraphicsContext;
use crate::vertex_array::{VertexArray, VertexArrayError};
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Primitive mode.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Mode {
  /// A single point per vertex.
  Point,
  /// A triangle every three vertices.
  Triangle,
}

/// A named vertex attribute of `components` floats.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct VertexAttrib {
  /// Name of the shader input.
  pub name: &'static str,
  /// Number of `f32` components.
  pub components: usize,
}

impl VertexAttrib {
  /// Declare an attribute.
  pub const fn new(name: &'static str, components: usize) -> Self {
    VertexAttrib { name, components }
  }
}

/// Interleaved vertex data.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
  name: String,
  mode: Mode,
  attributes: Vec<VertexAttrib>,
  vertices: Vec<f32>,
}

impl Mesh {
  /// Build a mesh.
  ///
  /// # Panics
  ///
  /// Panics if the number of floats is not a multiple of the vertex stride.
  pub fn new(
    name: impl Into<String>,
    mode: Mode,
    attributes: Vec<VertexAttrib>,
    vertices: Vec<f32>,
  ) -> Self {
    let stride: usize = attributes.iter().map(|a| a.components).sum();
    assert!(
      stride > 0 && vertices.len() % stride == 0,
      "vertex data doesn’t match the attribute layout"
    );

    Mesh {
      name: name.into(),
      mode,
      attributes,
      vertices,
    }
  }

  /// Name, for tracing.
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Primitive mode.
  pub fn mode(&self) -> Mode {
    self.mode
  }

  /// Attribute layout, in location order.
  pub fn attributes(&self) -> &[VertexAttrib] {
    &self.attributes
  }

  /// Number of floats per vertex.
  pub fn stride(&self) -> usize {
    self.attributes.iter().map(|a| a.components).sum()
  }

  /// Number of vertices.
  pub fn vertex_count(&self) -> usize {
    self.vertices.len() / self.stride()
  }

  /// Interleaved vertex data.
  pub fn vertices(&self) -> &[f32] {
    &self.vertices
  }

  /// Interleaved vertex data as raw bytes.
  pub fn as_bytes(&self) -> &[u8] {
    bytemuck::cast_slice(&self.vertices)
  }

  /// Upload to the GPU.
  pub fn upload<C>(&self, ctx: &mut C) -> Result<VertexArray<C::Backend>, VertexArrayError>
  where
    C: GraphicsContext,
    C::Backend: VertexArrayBackend,
  {
    VertexArray::new(ctx, self)
  }
}

/// Full-screen quad.
///
/// Two triangles covering `[-1, 1]²` in normalized device coordinates, with `in_position` (vec3) at
/// location 0 and `in_uv` (vec2) at location 1.
pub fn quad_fs() -> Mesh {
  #[rustfmt::skip]
  let vertices = vec![
    // position        uv
    -1., -1., 0.,      0., 0.,
     1., -1., 0.,      1., 0.,
     1.,  1., 0.,      1., 1.,
    -1., -1., 0.,      0., 0.,
     1.,  1., 0.,      1., 1.,
    -1.,  1., 0.,      0., 1.,
  ];

  Mesh::new(
    "geometry:quad_fs",
    Mode::Triangle,
    vec![
      VertexAttrib::new("in_position", 3),
      VertexAttrib::new("in_uv", 2),
    ],
    vertices,
  )
}

/// Random point cloud.
///
/// `count` points with each coordinate drawn independently and uniformly from its closed range.
/// Ranges given as `(max, min)` are accepted. The same `seed` always yields the same points; `None`
/// seeds from the operating system.
///
/// The mesh has [`Mode::Point`] and a single `in_position` (vec3) attribute.
pub fn points_random_3d(
  count: usize,
  range_x: (f32, f32),
  range_y: (f32, f32),
  range_z: (f32, f32),
  seed: Option<u64>,
) -> Mesh {
  let mut rng = match seed {
    Some(seed) => StdRng::seed_from_u64(seed),
    None => StdRng::from_entropy(),
  };

  let unit = Uniform::new_inclusive(0f64, 1.);
  let x = ClosedRange::new(range_x);
  let y = ClosedRange::new(range_y);
  let z = ClosedRange::new(range_z);

  let mut vertices = Vec::with_capacity(count * 3);
  for _ in 0..count {
    vertices.push(x.at(unit.sample(&mut rng)));
    vertices.push(y.at(unit.sample(&mut rng)));
    vertices.push(z.at(unit.sample(&mut rng)));
  }

  Mesh::new(
    "geometry:points_random_3d",
    Mode::Point,
    vec![VertexAttrib::new("in_position", 3)],
    vertices,
  )
}

/// Default range used by the point cloud generators.
pub const DEFAULT_RANGE: (f32, f32) = (-10., 10.);

// Interpolation happens in f64: the width of a finite f32 range may not fit an f32.
struct ClosedRange {
  lo: f64,
  hi: f64,
}

impl ClosedRange {
  fn new((a, b): (f32, f32)) -> Self {
    let (a, b) = (f64::from(a), f64::from(b));
    ClosedRange {
      lo: a.min(b),
      hi: a.max(b),
    }
  }

  fn at(&self, t: f64) -> f32 {
    (self.lo + (self.hi - self.lo) * t).clamp(self.lo, self.hi) as f32
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::testing::{Call, MockContext};

  #[test]
  fn same_seed_same_bytes() {
    let a = points_random_3d(1000, DEFAULT_RANGE, DEFAULT_RANGE, DEFAULT_RANGE, Some(42));
    let b = points_random_3d(1000, DEFAULT_RANGE, DEFAULT_RANGE, DEFAULT_RANGE, Some(42));

    assert_eq!(a.as_bytes(), b.as_bytes());
    assert_eq!(a.as_bytes().len(), 1000 * 3 * 4);
  }

  #[test]
  fn different_seeds_differ() {
    let a = points_random_3d(100, DEFAULT_RANGE, DEFAULT_RANGE, DEFAULT_RANGE, Some(1));
    let b = points_random_3d(100, DEFAULT_RANGE, DEFAULT_RANGE, DEFAULT_RANGE, Some(2));

    assert_ne!(a.vertices(), b.vertices());
  }

  #[test]
  fn points_stay_in_their_ranges() {
    let mesh = points_random_3d(5, (0., 1.), (10., 20.), (-3., -2.), None);

    assert_eq!(mesh.vertices().len(), 15);
    assert_eq!(mesh.vertex_count(), 5);
    assert_eq!(mesh.mode(), Mode::Point);

    for p in mesh.vertices().chunks(3) {
      assert!((0. ..=1.).contains(&p[0]));
      assert!((10. ..=20.).contains(&p[1]));
      assert!((-3. ..=-2.).contains(&p[2]));
    }
  }

  #[test]
  fn reversed_range() {
    let mesh = points_random_3d(64, (1., -1.), (1., -1.), (1., -1.), Some(7));
    assert!(mesh.vertices().iter().all(|c| (-1. ..=1.).contains(c)));
  }

  #[test]
  fn degenerate_range() {
    let mesh = points_random_3d(3, (2., 2.), (0., 1.), (0., 1.), Some(7));
    assert!(mesh.vertices().chunks(3).all(|p| p[0] == 2.));
  }

  #[test]
  fn widest_range() {
    let mesh = points_random_3d(64, (f32::MIN, f32::MAX), (0., 1.), (0., 1.), Some(1));

    assert_eq!(mesh.vertex_count(), 64);
    assert!(mesh.vertices().iter().all(|c| c.is_finite()));
    assert!(mesh.vertices().chunks(3).any(|p| p[0] != 0.));
  }

  #[test]
  fn empty_cloud() {
    let mesh = points_random_3d(0, DEFAULT_RANGE, DEFAULT_RANGE, DEFAULT_RANGE, Some(0));
    assert!(mesh.vertices().is_empty());
    assert_eq!(mesh.vertex_count(), 0);
  }

  #[test]
  fn quad_layout() {
    let quad = quad_fs();

    assert_eq!(quad.stride(), 5);
    assert_eq!(quad.vertex_count(), 6);
    assert_eq!(quad.attributes()[0].name, "in_position");
    assert_eq!(quad.attributes()[1].name, "in_uv");
  }

  #[test]
  fn upload() {
    let mut ctx = MockContext::new();
    let vao = quad_fs().upload(&mut ctx).unwrap();

    assert_eq!(vao.vertex_count(), 6);
    assert_eq!(ctx.calls(), vec![Call::NewVertexArray(1, 6)]);
  }
}
