//! The window state machine.
//!
//! A [`Window`] is open as soon as it exists. Closing is requested either by the user (a quit
//! event) or programmatically with [`Window::close`], and can’t be undone; the render loop is
//! expected to check [`Window::should_close`] and call [`Window::terminate`], which consumes the
//! window.

use crate::key::{Key, KeyEvent, KeyTable};
use crate::platform::{Platform, PlatformEvent, WindowError};
use crate::{GlVersion, WindowOpt};
use demosys::backend::framebuffer::Framebuffer;
use demosys::context::GraphicsContext;
use demosys::framebuffer::full_viewport;
use std::fmt;

type KeyCallback = Box<dyn FnMut(KeyEvent)>;

/// A native window and its graphics context.
pub struct Window<P> {
  platform: P,
  title: String,
  size: [u32; 2],
  buffer_size: [u32; 2],
  gl_version: GlVersion,
  closing: bool,
  frames: u64,
  viewport: [i32; 4],
  key_callback: Option<KeyCallback>,
}

impl<P> fmt::Debug for Window<P> {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    f.debug_struct("Window")
      .field("title", &self.title)
      .field("size", &self.size)
      .field("buffer_size", &self.buffer_size)
      .field("gl_version", &self.gl_version)
      .field("closing", &self.closing)
      .field("frames", &self.frames)
      .field("viewport", &self.viewport)
      .finish()
  }
}

impl<P> Window<P>
where
  P: Platform,
{
  /// Open a window.
  ///
  /// The viewport initially covers the whole drawable surface.
  pub fn open(opt: WindowOpt) -> Result<Self, WindowError> {
    let platform = P::open(&opt)?;
    let buffer_size = platform.drawable_size();

    let mut window = Window {
      platform,
      title: opt.title().to_owned(),
      size: opt.size(),
      buffer_size,
      gl_version: opt.gl_version(),
      closing: false,
      frames: 0,
      viewport: full_viewport(buffer_size),
      key_callback: None,
    };

    window.set_default_viewport();

    log::info!(
      "opened window “{}” ({}×{}, drawable {}×{}, OpenGL {} core)",
      window.title,
      window.size[0],
      window.size[1],
      buffer_size[0],
      buffer_size[1],
      window.gl_version
    );

    Ok(window)
  }

  /// Register the callback receiving key events.
  ///
  /// Codes are native; compare them with [`Window::key_code`]. Replaces any previous callback.
  pub fn set_key_callback<F>(&mut self, callback: F)
  where
    F: 'static + FnMut(KeyEvent),
  {
    self.key_callback = Some(Box::new(callback));
  }

  /// Drain pending events.
  ///
  /// Key events go to the key callback and resizes are applied at once. A quit event marks the
  /// window as closing and stops draining; events queued after it are kept for the next poll.
  pub fn poll(&mut self) {
    self.platform.pump_events();

    while let Some(event) = self.platform.next_event() {
      match event {
        PlatformEvent::Key { code, action } => {
          log::trace!("key event: code {}, action {}", code, action);

          if let Some(ref mut callback) = self.key_callback {
            callback(KeyEvent {
              code,
              action,
              modifiers: None,
            });
          }
        }

        PlatformEvent::Resized { width, height } => self.resize(width, height),

        PlatformEvent::Quit => {
          log::debug!("quit requested");
          self.closing = true;
          break;
        }
      }
    }
  }

  /// Apply a new logical size.
  ///
  /// The drawable size is queried again and the viewport reset to cover it.
  pub fn resize(&mut self, width: u32, height: u32) {
    self.size = [width, height];
    self.buffer_size = self.platform.drawable_size();
    self.set_default_viewport();

    log::debug!(
      "resized to {}×{} (drawable {}×{})",
      width,
      height,
      self.buffer_size[0],
      self.buffer_size[1]
    );
  }

  /// Present the frame, then poll events.
  pub fn swap_buffers(&mut self) {
    self.frames += 1;
    self.platform.present();
    self.poll();
  }

  /// Should the render loop stop?
  pub fn should_close(&self) -> bool {
    self.closing
  }

  /// Request closing the window.
  pub fn close(&mut self) {
    self.closing = true;
  }

  /// Destroy the graphics context, then the window, then shut the windowing library down.
  pub fn terminate(self) {
    log::info!(
      "terminating window “{}” after {} frames",
      self.title,
      self.frames
    );

    self.platform.terminate();
  }

  /// Make the default framebuffer current and restore its viewport.
  pub fn use_framebuffer(&mut self) {
    let viewport = self.viewport;
    let backend = self.platform.backend();

    unsafe {
      backend.bind_default_framebuffer();
      backend.set_viewport(viewport);
    }
  }

  /// Clear the color and depth buffers of the current framebuffer.
  pub fn clear(&mut self, color: [f32; 4]) {
    unsafe { self.platform.backend().clear(color) }
  }

  /// Reset the viewport to cover the whole drawable surface.
  pub fn set_default_viewport(&mut self) {
    self.viewport = full_viewport(self.buffer_size);
    let viewport = self.viewport;

    unsafe { self.platform.backend().set_viewport(viewport) }
  }

  /// Native code of a key on this platform.
  pub fn key_code(&self, key: Key) -> i32 {
    P::Keys::code(key)
  }

  /// Key symbol of a key event, if known.
  pub fn key_of(&self, event: &KeyEvent) -> Option<Key> {
    event.key::<P::Keys>()
  }

  /// Is this event the press of `key`?
  pub fn is_press(&self, event: &KeyEvent, key: Key) -> bool {
    event.is_press::<P::Keys>(key)
  }
}

impl<P> Window<P> {
  /// Window title.
  pub fn title(&self) -> &str {
    &self.title
  }

  /// Logical size, in screen coordinates.
  pub fn size(&self) -> [u32; 2] {
    self.size
  }

  /// Drawable size, in pixels.
  pub fn buffer_size(&self) -> [u32; 2] {
    self.buffer_size
  }

  /// Current viewport, as `[x, y, width, height]`.
  pub fn viewport(&self) -> [i32; 4] {
    self.viewport
  }

  /// Number of presented frames.
  pub fn frames(&self) -> u64 {
    self.frames
  }

  /// Width over height of the drawable surface.
  pub fn aspect_ratio(&self) -> f32 {
    self.buffer_size[0] as f32 / self.buffer_size[1].max(1) as f32
  }

  /// Requested OpenGL version.
  pub fn gl_version(&self) -> GlVersion {
    self.gl_version
  }

  /// Underlying platform.
  pub fn platform(&self) -> &P {
    &self.platform
  }

  /// Underlying platform, mutably.
  pub fn platform_mut(&mut self) -> &mut P {
    &mut self.platform
  }
}

unsafe impl<P> GraphicsContext for Window<P>
where
  P: Platform,
{
  type Backend = P::Backend;

  fn backend(&mut self) -> &mut Self::Backend {
    self.platform.backend()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use demosys::framebuffer::RenderState;
  use std::cell::{Cell, RefCell};
  use std::collections::VecDeque;
  use std::rc::Rc;

  #[derive(Clone, Debug, PartialEq)]
  enum Call {
    Viewport([i32; 4]),
    BindDefault,
    Clear([f32; 4]),
  }

  #[derive(Default)]
  struct Recorder {
    calls: Vec<Call>,
  }

  unsafe impl Framebuffer for Recorder {
    unsafe fn set_viewport(&mut self, viewport: [i32; 4]) {
      self.calls.push(Call::Viewport(viewport));
    }

    unsafe fn bind_default_framebuffer(&mut self) {
      self.calls.push(Call::BindDefault);
    }

    unsafe fn clear(&mut self, color: [f32; 4]) {
      self.calls.push(Call::Clear(color));
    }

    unsafe fn set_render_state(&mut self, _: &RenderState) {}
  }

  struct Keys;

  impl KeyTable for Keys {
    const ACTION_PRESS: i32 = 1;
    const ACTION_RELEASE: i32 = 0;

    fn code(key: Key) -> i32 {
      key as i32 + 256
    }
  }

  // HiDPI platform: two pixels per screen coordinate
  struct Mock {
    backend: Recorder,
    logical: [u32; 2],
    incoming: Vec<PlatformEvent>,
    queue: VecDeque<PlatformEvent>,
    presents: usize,
    terminated: Rc<Cell<bool>>,
  }

  impl Mock {
    fn push(&mut self, event: PlatformEvent) {
      if let PlatformEvent::Resized { width, height } = event {
        self.logical = [width, height];
      }

      self.incoming.push(event);
    }
  }

  impl Platform for Mock {
    type Backend = Recorder;
    type Keys = Keys;

    fn open(opt: &WindowOpt) -> Result<Self, WindowError> {
      if opt.title().is_empty() {
        return Err(WindowError::WindowCreate("empty title".to_owned()));
      }

      Ok(Mock {
        backend: Recorder::default(),
        logical: opt.size(),
        incoming: Vec::new(),
        queue: VecDeque::new(),
        presents: 0,
        terminated: Rc::new(Cell::new(false)),
      })
    }

    fn backend(&mut self) -> &mut Self::Backend {
      &mut self.backend
    }

    fn drawable_size(&self) -> [u32; 2] {
      [self.logical[0] * 2, self.logical[1] * 2]
    }

    fn pump_events(&mut self) {
      self.queue.extend(self.incoming.drain(..));
    }

    fn next_event(&mut self) -> Option<PlatformEvent> {
      self.queue.pop_front()
    }

    fn present(&mut self) {
      self.presents += 1;
    }

    fn terminate(self) {
      self.terminated.set(true);
    }
  }

  fn open() -> Window<Mock> {
    Window::open(WindowOpt::default().set_size([640, 360])).unwrap()
  }

  #[test]
  fn open_sets_full_drawable_viewport() {
    let window = open();

    assert_eq!(window.size(), [640, 360]);
    assert_eq!(window.buffer_size(), [1280, 720]);
    assert_eq!(window.viewport(), [0, 0, 1280, 720]);
    assert_eq!(
      window.platform().backend.calls,
      vec![Call::Viewport([0, 0, 1280, 720])]
    );
    assert!(!window.should_close());
    assert_eq!(window.frames(), 0);
  }

  #[test]
  fn open_failure_propagates() {
    let err = Window::<Mock>::open(WindowOpt::default().set_title("")).unwrap_err();
    assert_eq!(err, WindowError::WindowCreate("empty title".to_owned()));
  }

  #[test]
  fn resize_event_resets_viewport_on_drawable() {
    let mut window = open();
    window.platform_mut().push(PlatformEvent::Resized {
      width: 800,
      height: 600,
    });
    window.poll();

    assert_eq!(window.size(), [800, 600]);
    assert_eq!(window.buffer_size(), [1600, 1200]);
    assert_eq!(window.viewport(), [0, 0, 1600, 1200]);
    assert_eq!(
      window.platform().backend.calls.last(),
      Some(&Call::Viewport([0, 0, 1600, 1200]))
    );
    assert!((window.aspect_ratio() - 4. / 3.).abs() < 1e-6);
  }

  #[test]
  fn swaps_count_frames() {
    let mut window = open();

    for _ in 0..5 {
      window.swap_buffers();
    }

    assert_eq!(window.frames(), 5);
    assert_eq!(window.platform().presents, 5);
  }

  #[test]
  fn key_callback_receives_native_codes() {
    let mut window = open();
    let received = Rc::new(RefCell::new(Vec::new()));
    let sink = received.clone();

    window.set_key_callback(move |event| sink.borrow_mut().push(event));
    window.platform_mut().push(PlatformEvent::Key {
      code: Keys::code(Key::Space),
      action: Keys::ACTION_PRESS,
    });
    window.poll();

    let received = received.borrow();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].code, window.key_code(Key::Space));
    assert_eq!(received[0].modifiers, None);
    assert_eq!(window.key_of(&received[0]), Some(Key::Space));
    assert!(window.is_press(&received[0], Key::Space));
  }

  #[test]
  fn quit_stops_draining() {
    let mut window = open();
    let received = Rc::new(Cell::new(0));
    let count = received.clone();

    window.set_key_callback(move |_| count.set(count.get() + 1));
    window.platform_mut().push(PlatformEvent::Key {
      code: Keys::code(Key::A),
      action: Keys::ACTION_PRESS,
    });
    window.platform_mut().push(PlatformEvent::Quit);
    window.platform_mut().push(PlatformEvent::Key {
      code: Keys::code(Key::B),
      action: Keys::ACTION_PRESS,
    });
    window.poll();

    assert!(window.should_close());
    assert_eq!(received.get(), 1);
    assert_eq!(window.platform().queue.len(), 1);

    // closing is not undone by later events
    window.poll();
    assert!(window.should_close());
    assert_eq!(received.get(), 2);
  }

  #[test]
  fn close_is_sticky() {
    let mut window = open();
    window.close();
    window.swap_buffers();

    assert!(window.should_close());
  }

  #[test]
  fn framebuffer_helpers() {
    let mut window = open();
    window.use_framebuffer();
    window.clear([0., 0., 0., 1.]);

    assert_eq!(
      window.platform().backend.calls[1..],
      [
        Call::BindDefault,
        Call::Viewport([0, 0, 1280, 720]),
        Call::Clear([0., 0., 0., 1.]),
      ]
    );
  }

  #[test]
  fn terminate_releases_platform() {
    let window = open();
    let terminated = window.platform().terminated.clone();

    window.terminate();
    assert!(terminated.get());
  }
}
