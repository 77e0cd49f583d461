//! Graphics context.
//!
//! A graphics context is an object that abstracts all the low-level operations that happen on a
//! graphics device. This crate doesn’t provide you with creating such contexts: the windowing
//! crates do it, and the window itself is the context.
//!
//! # On context and threads
//!
//! - An object which type implements `GraphicsContext` must be `!Send` and `!Sync`. The backend
//!   state of [demosys-gl] already is, so wrapping it is enough.
//! - You can only create a single context per thread. The OpenGL backend refuses to hand out a
//!   second state on the same thread.
//! - Collaborators (textures, programs, the texture helper, effects) never look a context up on
//!   their own. They receive it explicitly, as `&mut`.
//!
//! [demosys-gl]: https://crates.io/crates/demosys-gl

/// Class of graphics context.
///
/// Such a context must not be Send nor Sync, which means that you cannot share it between
/// threads in any way (move / borrow).
pub unsafe trait GraphicsContext {
  /// Backend implementing the [`crate::backend`] traits.
  type Backend;

  /// Access the backend.
  fn backend(&mut self) -> &mut Self::Backend;
}
