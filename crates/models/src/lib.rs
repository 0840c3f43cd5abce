//! Lakeflex models.
//!
//! Models are the kernels a solver calls. Each one implements
//! [`lakeflex_core::Model`] as a thin adapter over an internal `core`
//! submodule where the physics lives; the `core` module is an implementation
//! detail and is not part of the public API.
//!
//! # Modules
//!
//! - [`flexure`]: deflection of the lithosphere under a surface load

pub mod flexure;
