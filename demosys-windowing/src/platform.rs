//! Windowing platforms.
//!
//! A platform is the native half of a [`Window`](crate::Window): a windowing library, one native
//! window and the OpenGL context bound to it. Backend crates implement [`Platform`]; everything
//! above it (sizes, viewport, frame counting, event dispatch) is shared.

use crate::key::KeyTable;
use crate::WindowOpt;
use demosys::backend::framebuffer::Framebuffer;
use std::error;
use std::fmt;

/// Error that can be risen while opening a window.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum WindowError {
  /// The windowing library failed to start.
  Init(String),
  /// The native window couldn’t be created. Carries the backend diagnostic.
  WindowCreate(String),
  /// The OpenGL context couldn’t be created or made current.
  ContextCreate(String),
  /// The graphics state is not available.
  ///
  /// This error is generated when a window is opened on a thread on which the graphics state has
  /// already been acquired.
  GraphicsState(String),
}

impl fmt::Display for WindowError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    match *self {
      WindowError::Init(ref e) => write!(f, "initialization error: {}", e),
      WindowError::WindowCreate(ref e) => write!(f, "failed to create window: {}", e),
      WindowError::ContextCreate(ref e) => write!(f, "failed to create OpenGL context: {}", e),
      WindowError::GraphicsState(ref e) => write!(f, "failed to get graphics state: {}", e),
    }
  }
}

impl error::Error for WindowError {}

/// Events a platform reports, already stripped of backend types.
///
/// Key codes and actions stay native; see [`KeyTable`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PlatformEvent {
  /// A key was pressed or released.
  Key {
    /// Native key code.
    code: i32,
    /// Native action code.
    action: i32,
  },
  /// The window was resized, in screen coordinates.
  Resized {
    /// New logical width.
    width: u32,
    /// New logical height.
    height: u32,
  },
  /// The user asked to close the window.
  Quit,
}

/// A windowing backend.
///
/// Implementors own their library handle, the native window and the GL context, and must release
/// them in [`Platform::terminate`] in this order: graphics context, window, library.
pub trait Platform: Sized {
  /// Graphics backend bound to the platform context.
  type Backend: Framebuffer;

  /// Native key codes of this platform.
  type Keys: KeyTable;

  /// Start the library, create the window and its context, and acquire the graphics state.
  fn open(opt: &WindowOpt) -> Result<Self, WindowError>;

  /// Graphics backend.
  fn backend(&mut self) -> &mut Self::Backend;

  /// Size of the drawable surface, in pixels.
  ///
  /// May be larger than the logical size on HiDPI displays.
  fn drawable_size(&self) -> [u32; 2];

  /// Fetch pending events from the library into the platform queue.
  fn pump_events(&mut self);

  /// Pop the next queued event.
  fn next_event(&mut self) -> Option<PlatformEvent>;

  /// Present the back buffer.
  fn present(&mut self);

  /// Release the context, the window and the library.
  fn terminate(self);
}
