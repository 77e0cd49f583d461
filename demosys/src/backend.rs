//! Backend interfacing.
//!
//! Everything a GPU implementation must provide. Front types ([`crate::texture::Texture`],
//! [`crate::shader::Program`], …) only ever talk to the GPU through these traits.
//!
//! The traits are `unsafe` to implement: front types rely on the backend keeping the handles it
//! gives back alive until the associated representation is dropped.

pub mod framebuffer;
pub mod sampler;
pub mod shader;
pub mod texture;
pub mod vertex_array;
