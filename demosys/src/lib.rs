//! # demosys
//!
//! A small demo scene and creative coding framework. This crate is the backend-agnostic core: it
//! knows about textures, shader programs, vertex arrays, samplers and effects, but it doesn’t know
//! how to talk to a GPU nor how to open a window. Those concerns live in separate crates:
//!
//! - [demosys-gl], an OpenGL 3.3 implementation of every trait found in [`backend`].
//! - [demosys-windowing], the backend-neutral window state machine and key tables.
//! - [demosys-glfw] and [demosys-sdl2], the native windowing platforms.
//!
//! # Graphics context
//!
//! Every GPU object is created from a [`GraphicsContext`]. There is no process-wide “current
//! context”: the window owns the context and hands it to collaborators as `&mut`. See the
//! [`context`] module for the threading rules.
//!
//! # What’s included
//!
//! - [`texture::Texture`]: a texture descriptor owning one GPU texture, created from an image or as
//!   an empty render target.
//! - [`helper::TextureHelper`]: full-screen-quad blitting of color and depth textures.
//! - [`geometry`]: procedural meshes, such as the full-screen quad and random point clouds.
//! - [`effect::Effect`]: the interface demos implement to draw a frame.
//!
//! [demosys-gl]: https://crates.io/crates/demosys-gl
//! [demosys-windowing]: https://crates.io/crates/demosys-windowing
//! [demosys-glfw]: https://crates.io/crates/demosys-glfw
//! [demosys-sdl2]: https://crates.io/crates/demosys-sdl2

#![deny(missing_docs)]

pub mod backend;
pub mod context;
pub mod effect;
pub mod framebuffer;
pub mod geometry;
pub mod helper;
pub mod sampler;
pub mod shader;
pub mod texture;
pub mod vertex_array;

#[cfg(test)]
pub(crate) mod testing;
