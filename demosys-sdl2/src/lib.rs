//! [SDL2](https://crates.io/crates/sdl2) backend for [demosys](https://crates.io/crates/demosys)
//! and [demosys-windowing](https://crates.io/crates/demosys-windowing).

#![deny(missing_docs)]

use demosys_gl::GL33;
use demosys_windowing::{
  CursorMode, Key, KeyTable, Platform, PlatformEvent, Window, WindowError, WindowOpt,
};
pub use sdl2;
use sdl2::event::{Event, WindowEvent};
use sdl2::keyboard::Keycode;
use sdl2::sys::SDL_EventType;
use sdl2::video::{GLContext, GLProfile, SwapInterval};
use sdl2::{EventPump, Sdl, VideoSubsystem};
use std::collections::VecDeque;
use std::os::raw::c_void;

/// A window opened with SDL2.
pub type Sdl2Window = Window<Sdl2Platform>;

/// SDL2 key codes.
///
/// Codes are SDL keycodes (layout-dependent symbols), and actions are the key down / key up event
/// types.
#[derive(Clone, Copy, Debug)]
pub struct Sdl2Keys;

impl KeyTable for Sdl2Keys {
  const ACTION_PRESS: i32 = SDL_EventType::SDL_KEYDOWN as i32;
  const ACTION_RELEASE: i32 = SDL_EventType::SDL_KEYUP as i32;

  fn code(key: Key) -> i32 {
    let key = match key {
      Key::Escape => Keycode::Escape,
      Key::Space => Keycode::Space,
      Key::Enter => Keycode::Return,
      Key::PageUp => Keycode::PageUp,
      Key::PageDown => Keycode::PageDown,
      Key::A => Keycode::A,
      Key::B => Keycode::B,
      Key::C => Keycode::C,
      Key::D => Keycode::D,
      Key::E => Keycode::E,
      Key::F => Keycode::F,
      Key::G => Keycode::G,
      Key::H => Keycode::H,
      Key::I => Keycode::I,
      Key::J => Keycode::J,
      Key::K => Keycode::K,
      Key::L => Keycode::L,
      Key::M => Keycode::M,
      Key::N => Keycode::N,
      Key::O => Keycode::O,
      Key::P => Keycode::P,
      Key::Q => Keycode::Q,
      Key::R => Keycode::R,
      Key::S => Keycode::S,
      Key::T => Keycode::T,
      Key::U => Keycode::U,
      Key::V => Keycode::V,
      Key::W => Keycode::W,
      Key::X => Keycode::X,
      Key::Y => Keycode::Y,
      Key::Z => Keycode::Z,
    };

    key as i32
  }
}

/// SDL2 platform: the library, its video subsystem, one window with its OpenGL context and the
/// OpenGL 3.3 backend.
///
/// Fields drop in declaration order: graphics state, GL context, window, then the library.
pub struct Sdl2Platform {
  gl: GL33,
  gl_context: GLContext,
  window: sdl2::video::Window,
  event_pump: EventPump,
  video: VideoSubsystem,
  sdl: Sdl,
  queue: VecDeque<PlatformEvent>,
}

impl Sdl2Platform {
  /// The entry point to most of the SDL2 API.
  pub fn sdl(&self) -> &Sdl {
    &self.sdl
  }

  /// Borrow the underlying SDL2 window.
  pub fn window(&self) -> &sdl2::video::Window {
    &self.window
  }

  /// Mutably borrow the underlying SDL2 window.
  pub fn window_mut(&mut self) -> &mut sdl2::video::Window {
    &mut self.window
  }
}

impl Platform for Sdl2Platform {
  type Backend = GL33;
  type Keys = Sdl2Keys;

  fn open(opt: &WindowOpt) -> Result<Self, WindowError> {
    let sdl = sdl2::init().map_err(WindowError::Init)?;
    let video = sdl.video().map_err(WindowError::Init)?;
    let version = opt.gl_version();

    let gl_attr = video.gl_attr();
    gl_attr.set_context_profile(GLProfile::Core);
    gl_attr.set_context_flags().forward_compatible().set();
    gl_attr.set_context_major_version(version.major);
    gl_attr.set_context_minor_version(version.minor);

    if let Some(samples) = opt.num_samples() {
      gl_attr.set_multisample_buffers(1);
      gl_attr.set_multisample_samples(samples.min(u8::MAX.into()) as u8);
    }

    let [width, height] = opt.size();
    let mut builder = video.window(opt.title(), width, height);
    builder.opengl().position_centered();

    if opt.resizable() {
      builder.resizable();
    }

    let window = builder
      .build()
      .map_err(|e| WindowError::WindowCreate(e.to_string()))?;

    let gl_context = window
      .gl_create_context()
      .map_err(WindowError::ContextCreate)?;
    window
      .gl_make_current(&gl_context)
      .map_err(WindowError::ContextCreate)?;

    let interval = if opt.vsync() {
      SwapInterval::VSync
    } else {
      SwapInterval::Immediate
    };

    if let Err(e) = video.gl_set_swap_interval(interval) {
      log::warn!("cannot set swap interval: {}", e);
    }

    let mouse = sdl.mouse();
    match opt.cursor_mode() {
      CursorMode::Visible => mouse.show_cursor(true),
      CursorMode::Invisible => mouse.show_cursor(false),
      CursorMode::Disabled => {
        mouse.show_cursor(false);
        mouse.set_relative_mouse_mode(true);
      }
    }

    let event_pump = sdl.event_pump().map_err(WindowError::Init)?;

    // init OpenGL
    gl::load_with(|s| video.gl_get_proc_address(s) as *const c_void);

    let gl = GL33::new().map_err(|e| WindowError::GraphicsState(e.to_string()))?;

    Ok(Sdl2Platform {
      gl,
      gl_context,
      window,
      event_pump,
      video,
      sdl,
      queue: VecDeque::new(),
    })
  }

  fn backend(&mut self) -> &mut Self::Backend {
    &mut self.gl
  }

  fn drawable_size(&self) -> [u32; 2] {
    let (w, h) = self.window.drawable_size();
    [w, h]
  }

  fn pump_events(&mut self) {
    for event in self.event_pump.poll_iter() {
      let event = match event {
        Event::KeyDown {
          keycode: Some(keycode),
          ..
        } => PlatformEvent::Key {
          code: keycode as i32,
          action: Sdl2Keys::ACTION_PRESS,
        },

        Event::KeyUp {
          keycode: Some(keycode),
          ..
        } => PlatformEvent::Key {
          code: keycode as i32,
          action: Sdl2Keys::ACTION_RELEASE,
        },

        Event::Window {
          win_event: WindowEvent::Resized(w, h),
          ..
        } => PlatformEvent::Resized {
          width: w.max(0) as u32,
          height: h.max(0) as u32,
        },

        Event::Quit { .. } => PlatformEvent::Quit,

        _ => continue,
      };

      self.queue.push_back(event);
    }
  }

  fn next_event(&mut self) -> Option<PlatformEvent> {
    self.queue.pop_front()
  }

  fn present(&mut self) {
    self.window.gl_swap_window();
  }

  fn terminate(self) {
    let Sdl2Platform {
      gl,
      gl_context,
      window,
      event_pump,
      video,
      sdl,
      ..
    } = self;

    drop(gl);
    drop(gl_context);
    drop(window);
    log::debug!("SDL2 window destroyed");
    drop(event_pump);
    drop(video);
    drop(sdl);
  }
}
