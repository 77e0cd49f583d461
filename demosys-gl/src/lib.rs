//! OpenGL backends.
//!
//! This crate exports an [OpenGL](https://www.khronos.org/opengl/) 3.3 backend for
//! [demosys](https://crates.io/crates/demosys). The backend type is [`GL33`]; windowing crates
//! create it once the GL context is current and the symbols are loaded.

pub mod gl33;

pub use gl33::GL33;
