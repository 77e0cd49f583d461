//! # demosys windowing
//!
//! This is the base, abstract crate for windowing types and functions in demosys. The `demosys`
//! crate abstracts over the GPU, but it doesn’t give you a way to create an OpenGL context nor a
//! window. Creating and managing those is tightly related to the windowing library you pick;
//! several crates (`demosys-*`) exist to solve that problem, each implementing [`Platform`].
//!
//! # What’s included
//!
//! - [`WindowOpt`]: window configuration (title, size, requested OpenGL version, hints).
//! - [`Key`], [`Action`] and [`KeyTable`]: backend-neutral key symbols and their translation to
//!   native codes.
//! - [`Platform`]: what a windowing backend must provide.
//! - [`Window`]: the window state machine shared by every backend. It owns the platform, tracks the
//!   logical and drawable sizes, counts frames and dispatches input events. It also is the
//!   [`GraphicsContext`](demosys::context::GraphicsContext) every GPU object is created with.

#![deny(missing_docs)]

pub mod key;
pub mod platform;
pub mod window;

pub use key::{Action, Key, KeyEvent, KeyTable, Modifiers};
pub use platform::{Platform, PlatformEvent, WindowError};
pub use window::Window;

use std::error;
use std::fmt;
use std::str::FromStr;

/// Cursor mode.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CursorMode {
  /// The cursor is always visible.
  Visible,
  /// The cursor exists yet has been disabled.
  Invisible,
  /// The cursor is disabled.
  Disabled,
}

/// Requested OpenGL version.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct GlVersion {
  /// Major version.
  pub major: u8,
  /// Minor version.
  pub minor: u8,
}

impl GlVersion {
  /// OpenGL 3.3, the version every demosys backend targets.
  pub const GL33: Self = GlVersion::new(3, 3);

  /// Build a version.
  pub const fn new(major: u8, minor: u8) -> Self {
    GlVersion { major, minor }
  }

  /// Version as an integer code, `330` for OpenGL 3.3.
  pub fn code(&self) -> u32 {
    self.major as u32 * 100 + self.minor as u32 * 10
  }
}

impl fmt::Display for GlVersion {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    write!(f, "{}.{}", self.major, self.minor)
  }
}

/// Error returned when parsing a malformed OpenGL version.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ParseGlVersionError(String);

impl fmt::Display for ParseGlVersionError {
  fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
    write!(f, "malformed OpenGL version {:?}; expected MAJOR.MINOR", self.0)
  }
}

impl error::Error for ParseGlVersionError {}

impl FromStr for GlVersion {
  type Err = ParseGlVersionError;

  /// Parse `MAJOR.MINOR`, such as `3.3`.
  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let err = || ParseGlVersionError(s.to_owned());
    let mut parts = s.trim().splitn(2, '.');

    let major = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;
    let minor = parts.next().and_then(|p| p.parse().ok()).ok_or_else(err)?;

    Ok(GlVersion::new(major, minor))
  }
}

/// Different window options.
///
/// Feel free to look at the different methods available to tweak the options. You may want to
/// start with `default()` though.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WindowOpt {
  title: String,
  size: [u32; 2],
  gl_version: GlVersion,
  resizable: bool,
  vsync: bool,
  cursor_mode: CursorMode,
  num_samples: Option<u32>,
}

impl Default for WindowOpt {
  /// Defaults:
  ///
  /// - `title` set to `"demosys"`.
  /// - `size` set to `[1280, 720]`.
  /// - `gl_version` set to `3.3`.
  /// - `resizable` and `vsync` enabled.
  /// - `cursor_mode` set to `CursorMode::Visible`.
  /// - `num_samples` set to `None`.
  fn default() -> Self {
    WindowOpt {
      title: "demosys".to_owned(),
      size: [1280, 720],
      gl_version: GlVersion::GL33,
      resizable: true,
      vsync: true,
      cursor_mode: CursorMode::Visible,
      num_samples: None,
    }
  }
}

impl WindowOpt {
  /// Set the window title.
  #[inline]
  pub fn set_title(self, title: impl Into<String>) -> Self {
    WindowOpt {
      title: title.into(),
      ..self
    }
  }

  /// Get the window title.
  #[inline]
  pub fn title(&self) -> &str {
    &self.title
  }

  /// Set the logical size of the window, in screen coordinates.
  #[inline]
  pub fn set_size(self, size: [u32; 2]) -> Self {
    WindowOpt { size, ..self }
  }

  /// Get the logical size of the window.
  #[inline]
  pub fn size(&self) -> [u32; 2] {
    self.size
  }

  /// Set the requested OpenGL version. A core profile is always requested.
  #[inline]
  pub fn set_gl_version(self, gl_version: GlVersion) -> Self {
    WindowOpt { gl_version, ..self }
  }

  /// Get the requested OpenGL version.
  #[inline]
  pub fn gl_version(&self) -> GlVersion {
    self.gl_version
  }

  /// Allow or forbid resizing the window.
  #[inline]
  pub fn set_resizable(self, resizable: bool) -> Self {
    WindowOpt { resizable, ..self }
  }

  /// Is the window resizable?
  #[inline]
  pub fn resizable(&self) -> bool {
    self.resizable
  }

  /// Synchronize buffer swaps with the display refresh rate.
  #[inline]
  pub fn set_vsync(self, vsync: bool) -> Self {
    WindowOpt { vsync, ..self }
  }

  /// Is vertical synchronization enabled?
  #[inline]
  pub fn vsync(&self) -> bool {
    self.vsync
  }

  /// Hide, unhide or disable the cursor. Default to `CursorMode::Visible`.
  #[inline]
  pub fn set_cursor_mode(self, mode: CursorMode) -> Self {
    WindowOpt {
      cursor_mode: mode,
      ..self
    }
  }

  /// Get the cursor mode.
  #[inline]
  pub fn cursor_mode(&self) -> CursorMode {
    self.cursor_mode
  }

  /// Set the number of samples to use for multisampling.
  ///
  /// Pass `None` to disable multisampling.
  #[inline]
  pub fn set_num_samples<S>(self, samples: S) -> Self
  where
    S: Into<Option<u32>>,
  {
    WindowOpt {
      num_samples: samples.into(),
      ..self
    }
  }

  /// Get the number of samples to use in multisampling, if any.
  #[inline]
  pub fn num_samples(&self) -> Option<u32> {
    self.num_samples
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn default_opt() {
    let opt = WindowOpt::default();

    assert_eq!(opt.title(), "demosys");
    assert_eq!(opt.size(), [1280, 720]);
    assert_eq!(opt.gl_version(), GlVersion::new(3, 3));
    assert!(opt.resizable());
    assert!(opt.vsync());
    assert_eq!(opt.num_samples(), None);
  }

  #[test]
  fn builder() {
    let opt = WindowOpt::default()
      .set_title("intro")
      .set_size([640, 360])
      .set_vsync(false)
      .set_num_samples(4);

    assert_eq!(opt.title(), "intro");
    assert_eq!(opt.size(), [640, 360]);
    assert!(!opt.vsync());
    assert_eq!(opt.num_samples(), Some(4));
  }

  #[test]
  fn parse_gl_version() {
    assert_eq!("3.3".parse(), Ok(GlVersion::GL33));
    assert_eq!(" 4.1 ".parse(), Ok(GlVersion::new(4, 1)));
    assert!("3".parse::<GlVersion>().is_err());
    assert!("three.three".parse::<GlVersion>().is_err());
    assert_eq!(GlVersion::new(4, 1).to_string(), "4.1");
    assert_eq!(GlVersion::GL33.code(), 330);
  }
}
