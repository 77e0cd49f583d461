//! [GLFW](https://crates.io/crates/glfw) backend for [demosys](https://crates.io/crates/demosys)
//! and [demosys-windowing](https://crates.io/crates/demosys-windowing).
//!
//! ```ignore
//! use demosys_glfw::GlfwWindow;
//! use demosys_windowing::WindowOpt;
//!
//! let mut window = GlfwWindow::open(WindowOpt::default().set_title("intro"))?;
//!
//! while !window.should_close() {
//!   window.use_framebuffer();
//!   window.clear([0., 0., 0., 1.]);
//!   window.swap_buffers();
//! }
//!
//! window.terminate();
//! ```

#![deny(missing_docs)]

use demosys_gl::GL33;
use demosys_windowing::{
  CursorMode, Key, KeyTable, Platform, PlatformEvent, Window, WindowError, WindowOpt,
};
use glfw::{Context as _, Glfw, SwapInterval, WindowEvent, WindowHint, WindowMode};
use std::collections::VecDeque;
use std::os::raw::c_void;
use std::sync::mpsc::Receiver;

/// A window opened with GLFW.
pub type GlfwWindow = Window<GlfwPlatform>;

/// GLFW key codes.
#[derive(Clone, Copy, Debug)]
pub struct GlfwKeys;

impl KeyTable for GlfwKeys {
  const ACTION_PRESS: i32 = glfw::Action::Press as i32;
  const ACTION_RELEASE: i32 = glfw::Action::Release as i32;

  fn code(key: Key) -> i32 {
    let key = match key {
      Key::Escape => glfw::Key::Escape,
      Key::Space => glfw::Key::Space,
      Key::Enter => glfw::Key::Enter,
      Key::PageUp => glfw::Key::PageUp,
      Key::PageDown => glfw::Key::PageDown,
      Key::A => glfw::Key::A,
      Key::B => glfw::Key::B,
      Key::C => glfw::Key::C,
      Key::D => glfw::Key::D,
      Key::E => glfw::Key::E,
      Key::F => glfw::Key::F,
      Key::G => glfw::Key::G,
      Key::H => glfw::Key::H,
      Key::I => glfw::Key::I,
      Key::J => glfw::Key::J,
      Key::K => glfw::Key::K,
      Key::L => glfw::Key::L,
      Key::M => glfw::Key::M,
      Key::N => glfw::Key::N,
      Key::O => glfw::Key::O,
      Key::P => glfw::Key::P,
      Key::Q => glfw::Key::Q,
      Key::R => glfw::Key::R,
      Key::S => glfw::Key::S,
      Key::T => glfw::Key::T,
      Key::U => glfw::Key::U,
      Key::V => glfw::Key::V,
      Key::W => glfw::Key::W,
      Key::X => glfw::Key::X,
      Key::Y => glfw::Key::Y,
      Key::Z => glfw::Key::Z,
    };

    key as i32
  }
}

/// GLFW platform: the library handle, one window, its event queue and the OpenGL 3.3 backend.
///
/// Fields drop in declaration order, which releases the graphics state before the window and the
/// window before the library.
pub struct GlfwPlatform {
  gl: GL33,
  events_rx: Receiver<(f64, WindowEvent)>,
  window: glfw::Window,
  glfw: Glfw,
  queue: VecDeque<PlatformEvent>,
}

impl GlfwPlatform {
  /// The entry point to most of the GLFW API.
  pub fn glfw(&mut self) -> &mut Glfw {
    &mut self.glfw
  }

  /// Borrow the underlying GLFW window.
  pub fn window(&self) -> &glfw::Window {
    &self.window
  }

  /// Mutably borrow the underlying GLFW window.
  pub fn window_mut(&mut self) -> &mut glfw::Window {
    &mut self.window
  }
}

impl Platform for GlfwPlatform {
  type Backend = GL33;
  type Keys = GlfwKeys;

  fn open(opt: &WindowOpt) -> Result<Self, WindowError> {
    // errors are reported through the log crate
    let mut glfw = glfw::init(glfw::LOG_ERRORS).map_err(|e| WindowError::Init(e.to_string()))?;

    let version = opt.gl_version();

    // OpenGL hints
    glfw.window_hint(WindowHint::ContextVersion(
      version.major.into(),
      version.minor.into(),
    ));
    glfw.window_hint(WindowHint::OpenGlProfile(glfw::OpenGlProfileHint::Core));
    glfw.window_hint(WindowHint::OpenGlForwardCompat(true));
    glfw.window_hint(WindowHint::Resizable(opt.resizable()));
    glfw.window_hint(WindowHint::Samples(opt.num_samples()));

    let [width, height] = opt.size();
    let (mut window, events_rx) = glfw
      .create_window(width, height, opt.title(), WindowMode::Windowed)
      .ok_or_else(|| {
        WindowError::WindowCreate(format!(
          "GLFW could not create a {}×{} window with an OpenGL {} core context",
          width, height, version
        ))
      })?;

    window.make_current();

    if !window.is_current() {
      return Err(WindowError::ContextCreate(
        "cannot make the OpenGL context current".to_owned(),
      ));
    }

    glfw.set_swap_interval(if opt.vsync() {
      SwapInterval::Sync(1)
    } else {
      SwapInterval::None
    });

    window.set_cursor_mode(match opt.cursor_mode() {
      CursorMode::Visible => glfw::CursorMode::Normal,
      CursorMode::Invisible => glfw::CursorMode::Hidden,
      CursorMode::Disabled => glfw::CursorMode::Disabled,
    });

    window.set_key_polling(true);
    window.set_size_polling(true);
    window.set_close_polling(true);

    // init OpenGL
    gl::load_with(|s| window.get_proc_address(s) as *const c_void);

    let gl = GL33::new().map_err(|e| WindowError::GraphicsState(e.to_string()))?;

    Ok(GlfwPlatform {
      gl,
      events_rx,
      window,
      glfw,
      queue: VecDeque::new(),
    })
  }

  fn backend(&mut self) -> &mut Self::Backend {
    &mut self.gl
  }

  fn drawable_size(&self) -> [u32; 2] {
    let (w, h) = self.window.get_framebuffer_size();
    [w.max(0) as u32, h.max(0) as u32]
  }

  fn pump_events(&mut self) {
    self.glfw.poll_events();

    for (_, event) in glfw::flush_messages(&self.events_rx) {
      let event = match event {
        WindowEvent::Key(key, _, action, _) => PlatformEvent::Key {
          code: key as i32,
          action: action as i32,
        },

        WindowEvent::Size(w, h) => PlatformEvent::Resized {
          width: w.max(0) as u32,
          height: h.max(0) as u32,
        },

        WindowEvent::Close => PlatformEvent::Quit,

        _ => continue,
      };

      self.queue.push_back(event);
    }
  }

  fn next_event(&mut self) -> Option<PlatformEvent> {
    self.queue.pop_front()
  }

  fn present(&mut self) {
    self.window.swap_buffers();
  }

  fn terminate(self) {
    let GlfwPlatform {
      gl,
      events_rx,
      window,
      glfw,
      ..
    } = self;

    drop(gl);
    drop(events_rx);
    drop(window);
    log::debug!("GLFW window destroyed");
    drop(glfw);
  }
}
