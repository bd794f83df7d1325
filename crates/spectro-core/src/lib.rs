//! # spectro-core
//!
//! Core types for spectral image processing.
//!
//! This crate provides the foundational types used by the spectro-rs
//! operator crates:
//!
//! - [`Image`] - Row-major pixel buffer with color-model metadata
//! - [`Pixel`] - Five-component sample (red, green, blue, opacity, index)
//! - [`ChannelSelector`] - Tag naming one component of a pixel
//! - [`quantum`] - Component value conventions and clamping
//!
//! ## Quantum convention
//!
//! Every pixel component is a *quantum*: an `f32` in `[0, QUANTUM_MAX]`.
//! Operators normalize quanta into `[0, 1]` for arithmetic and write
//! results back through [`quantum::clamp_to_quantum`], which rounds and
//! clamps in fixed-point builds and passes values through untouched when
//! the `hdri` feature is enabled.
//!
//! ## Opacity convention
//!
//! The opacity component is inverted alpha: `0` is fully opaque and
//! `QUANTUM_MAX` is fully transparent. The named constants
//! [`quantum::OPAQUE_OPACITY`] and [`quantum::TRANSPARENT_OPACITY`] keep
//! call sites readable.
//!
//! ## Crate structure
//!
//! This crate is the foundation of spectro-rs and has no internal
//! dependencies; the operator crate `spectro-ops` builds on it.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod channel;
pub mod error;
pub mod image;
pub mod pixel;
pub mod quantum;

pub use channel::ChannelSelector;
pub use error::{Error, Result};
pub use image::{ColorModel, Image, StorageClass};
pub use pixel::Pixel;
pub use quantum::{
    clamp_to_quantum, Quantum, EPSILON, OPAQUE_OPACITY, QUANTUM_MAX, QUANTUM_SCALE,
    TRANSPARENT_OPACITY,
};

/// Prelude module for convenient imports.
///
/// # Usage
///
/// ```
/// use spectro_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::channel::ChannelSelector;
    pub use crate::error::{Error, Result};
    pub use crate::image::{ColorModel, Image, StorageClass};
    pub use crate::pixel::Pixel;
    pub use crate::quantum::{
        clamp_to_quantum, Quantum, EPSILON, OPAQUE_OPACITY, QUANTUM_MAX, QUANTUM_SCALE,
        TRANSPARENT_OPACITY,
    };
}
