//! Component value conventions.
//!
//! A *quantum* is the scalar used to represent one color-component
//! sample. This build uses a 16-bit quantum depth stored as `f32`:
//! representable values run from `0` to [`QUANTUM_MAX`], and operators
//! scale by [`QUANTUM_SCALE`] to work in `[0, 1]`.
//!
//! # Fixed-point vs. HDR
//!
//! In the default fixed-point configuration, [`clamp_to_quantum`] clamps
//! to the representable range and rounds to the nearest integer quantum.
//! With the `hdri` feature the value is stored as-is, which lets
//! spectral planes with negative or out-of-range components survive a
//! round trip.

/// The scalar type of one pixel component.
pub type Quantum = f32;

/// Largest representable quantum (16-bit depth).
pub const QUANTUM_MAX: Quantum = 65535.0;

/// Multiplier taking a quantum into `[0, 1]`.
pub const QUANTUM_SCALE: f64 = 1.0 / QUANTUM_MAX as f64;

/// Divide-by-zero guard used by weight renormalization.
pub const EPSILON: f64 = 1.0e-12;

/// Opacity of a fully opaque pixel.
pub const OPAQUE_OPACITY: Quantum = 0.0;

/// Opacity of a fully transparent pixel.
pub const TRANSPARENT_OPACITY: Quantum = QUANTUM_MAX;

/// Converts an arbitrary real value to a storable quantum.
///
/// Fixed-point builds clamp negative values to `0`, values above
/// [`QUANTUM_MAX`] to `QUANTUM_MAX`, and round everything else to the
/// nearest integer quantum by adding `0.5` before truncation. Under the
/// `hdri` feature the value is returned unrounded and unclamped.
///
/// # Example
///
/// ```
/// use spectro_core::quantum::{clamp_to_quantum, QUANTUM_MAX};
///
/// assert_eq!(clamp_to_quantum(-12.0), 0.0);
/// assert_eq!(clamp_to_quantum(1.0e9), QUANTUM_MAX);
/// ```
#[inline]
#[must_use]
pub fn clamp_to_quantum(value: f64) -> Quantum {
    #[cfg(not(feature = "hdri"))]
    {
        if value <= 0.0 {
            return 0.0;
        }
        if value >= f64::from(QUANTUM_MAX) {
            return QUANTUM_MAX;
        }
        (value + 0.5) as u32 as Quantum
    }
    #[cfg(feature = "hdri")]
    {
        value as Quantum
    }
}
