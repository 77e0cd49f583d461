//! A rotating cloud of random points.
//!
//! The cloud is generated once on the CPU, uploaded as a single vertex array and rendered as
//! points with a perspective projection.

use crate::effects::{Bootstrap, Settings};
use cgmath::{perspective, Deg, Matrix4, Rad, Vector3};
use demosys::context::GraphicsContext;
use demosys::effect::{Effect, EffectError};
use demosys::framebuffer::RenderState;
use demosys::geometry::{points_random_3d, DEFAULT_RANGE};
use demosys::shader::Program;
use demosys::vertex_array::VertexArray;
use demosys_gl::GL33;

const VS: &str = r#"#version 330

layout(location = 0) in vec3 in_position;

uniform mat4 m_proj;
uniform mat4 m_mv;

out float depth;

void main() {
  vec4 p = m_mv * vec4(in_position, 1.0);
  depth = -p.z;
  gl_Position = m_proj * p;
}
"#;

const FS: &str = r#"#version 330

in float depth;

uniform vec4 color;

out vec4 out_color;

void main() {
  float fade = clamp(1.0 - (depth - 20.0) / 30.0, 0.2, 1.0);
  out_color = vec4(color.rgb * fade, color.a);
}
"#;

const Z_NEAR: f32 = 1.;
const Z_FAR: f32 = 100.;

pub struct Points {
  program: Program<GL33>,
  cloud: VertexArray<GL33>,
  projection: Matrix4<f32>,
}

impl<C> Bootstrap<C> for Points
where
  C: GraphicsContext<Backend = GL33>,
{
  fn bootstrap(ctx: &mut C, settings: &Settings) -> Result<Self, EffectError> {
    let program = Program::from_strings(ctx, VS, FS)?;
    let mesh = points_random_3d(
      settings.count,
      DEFAULT_RANGE,
      DEFAULT_RANGE,
      DEFAULT_RANGE,
      settings.seed,
    );
    let cloud = mesh.upload(ctx)?;
    let projection = perspective(Deg(60.), settings.aspect_ratio, Z_NEAR, Z_FAR);

    log::info!("point cloud of {} points uploaded", cloud.vertex_count());

    Ok(Points {
      program,
      cloud,
      projection,
    })
  }
}

impl<C> Effect<C> for Points
where
  C: GraphicsContext<Backend = GL33>,
{
  fn name(&self) -> &str {
    "points"
  }

  fn draw(&mut self, ctx: &mut C, time: f32, _: f32) -> Result<(), EffectError> {
    RenderState::default().set_depth_test(true).apply(ctx);

    let model_view = Matrix4::from_translation(Vector3::new(0., 0., -30.))
      * Matrix4::from_angle_x(Rad(time * 0.3))
      * Matrix4::from_angle_y(Rad(time * 0.5));
    let projection: [[f32; 4]; 4] = self.projection.into();
    let model_view: [[f32; 4]; 4] = model_view.into();

    self.program.use_program();
    self.program.uniform_or_warn("m_proj", projection);
    self.program.uniform_or_warn("m_mv", model_view);
    self.program.uniform_or_warn("color", [1., 0.8, 0.4, 1.]);

    self.cloud.render();

    Ok(())
  }
}
