//! 2-D real-to-complex FFT backend.
//!
//! Builds the unnormalized two-dimensional transforms the Fourier
//! operators need from rustfft's 1-D planner: a row pass, a transpose,
//! and a column pass. Real input produces the conjugate-symmetric
//! half-spectrum of `height x (width/2 + 1)` complex columns; the
//! inverse expands the half-spectrum by symmetry and returns the real
//! plane.
//!
//! Neither direction scales, so `inverse_c2r(forward_r2c(x))` equals
//! `width * height * x`. Callers own the normalization.
//!
//! # Planner lock
//!
//! Plans come from one process-wide planner behind a mutex, initialized
//! on first use, so repeated transforms of the same extent reuse cached
//! plans. Only plan acquisition is serialized; execution is re-entrant
//! and runs outside the lock. A poisoned lock surfaces as
//! [`OpsError::DependencyFailure`].

use crate::error::{OpsError, OpsResult};
use rustfft::num_complex::Complex;
use rustfft::{Fft, FftPlanner};
use std::sync::{Arc, Mutex, OnceLock};

static PLANNER: OnceLock<Mutex<FftPlanner<f64>>> = OnceLock::new();

fn acquire_plans(
    width: usize,
    height: usize,
    forward: bool,
    context: &str,
) -> OpsResult<(Arc<dyn Fft<f64>>, Arc<dyn Fft<f64>>)> {
    let planner = PLANNER.get_or_init(|| Mutex::new(FftPlanner::new()));
    let mut planner = planner
        .lock()
        .map_err(|_| OpsError::dependency_failure(context, "FFT planner lock poisoned"))?;
    let (row, column) = if forward {
        (
            planner.plan_fft_forward(width),
            planner.plan_fft_forward(height),
        )
    } else {
        (
            planner.plan_fft_inverse(width),
            planner.plan_fft_inverse(height),
        )
    };
    Ok((row, column))
}

/// Transposes a `height x width` row-major buffer into `width x height`.
fn transpose(width: usize, height: usize, buffer: &[Complex<f64>]) -> Vec<Complex<f64>> {
    let mut transposed = vec![Complex::default(); buffer.len()];
    for y in 0..height {
        for x in 0..width {
            transposed[x * height + y] = buffer[y * width + x];
        }
    }
    transposed
}

/// Runs the row pass, column pass (via transpose), and returns the
/// full-plane result in row-major order.
fn transform_2d(
    width: usize,
    height: usize,
    mut data: Vec<Complex<f64>>,
    forward: bool,
    context: &str,
) -> OpsResult<Vec<Complex<f64>>> {
    let (row_fft, column_fft) = acquire_plans(width, height, forward, context)?;

    let mut scratch = vec![Complex::default(); row_fft.get_inplace_scratch_len()];
    for row in data.chunks_exact_mut(width) {
        row_fft.process_with_scratch(row, &mut scratch);
    }

    let mut transposed = transpose(width, height, &data);
    scratch.resize(column_fft.get_inplace_scratch_len(), Complex::default());
    for column in transposed.chunks_exact_mut(height) {
        column_fft.process_with_scratch(column, &mut scratch);
    }

    Ok(transpose(height, width, &transposed))
}

/// Forward 2-D real-to-complex transform.
///
/// `source` is a `height x width` row-major real plane; the result is
/// the `height x (width/2 + 1)` half-spectrum. Unnormalized.
///
/// # Errors
///
/// [`OpsError::DependencyFailure`] when the source length does not match
/// the extent or the planner lock is poisoned.
pub fn forward_r2c(
    width: usize,
    height: usize,
    source: &[f64],
) -> OpsResult<Vec<Complex<f64>>> {
    let context = "forward real-to-complex FFT";
    if source.len() != width * height {
        return Err(OpsError::dependency_failure(
            context,
            format!(
                "expected {} samples, got {}",
                width * height,
                source.len()
            ),
        ));
    }

    let data = source.iter().map(|&r| Complex::new(r, 0.0)).collect();
    let full = transform_2d(width, height, data, true, context)?;

    let center = width / 2 + 1;
    let mut half = vec![Complex::default(); height * center];
    for y in 0..height {
        for x in 0..center {
            half[y * center + x] = full[y * width + x];
        }
    }
    Ok(half)
}

/// Inverse 2-D complex-to-real transform.
///
/// `spectrum` is a `height x (width/2 + 1)` half-spectrum; the missing
/// columns are reconstructed by conjugate symmetry before the inverse
/// passes run. Returns the `height x width` real plane. Unnormalized.
///
/// # Errors
///
/// [`OpsError::DependencyFailure`] when the spectrum length does not
/// match the extent or the planner lock is poisoned.
pub fn inverse_c2r(
    width: usize,
    height: usize,
    spectrum: &[Complex<f64>],
) -> OpsResult<Vec<f64>> {
    let context = "inverse complex-to-real FFT";
    let center = width / 2 + 1;
    if spectrum.len() != height * center {
        return Err(OpsError::dependency_failure(
            context,
            format!(
                "expected {} samples, got {}",
                height * center,
                spectrum.len()
            ),
        ));
    }

    // F(width - u, height - v) = conj(F(u, v)), indices mod the extent.
    let mut full = vec![Complex::default(); height * width];
    for y in 0..height {
        for x in 0..center {
            full[y * width + x] = spectrum[y * center + x];
        }
        for x in center..width {
            let mirror_y = (height - y) % height;
            full[y * width + x] = spectrum[mirror_y * center + (width - x)].conj();
        }
    }

    let full = transform_2d(width, height, full, false, context)?;
    Ok(full.iter().map(|z| z.re).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_constant_plane_concentrates_at_dc() {
        let source = vec![0.5f64; 16];
        let half = forward_r2c(4, 4, &source).unwrap();
        assert_eq!(half.len(), 4 * 3);
        assert_abs_diff_eq!(half[0].re, 8.0, epsilon = 1e-9);
        assert_abs_diff_eq!(half[0].im, 0.0, epsilon = 1e-9);
        for z in &half[1..] {
            assert_abs_diff_eq!(z.norm(), 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_delta_plane_is_flat() {
        let mut source = vec![0.0f64; 16];
        source[0] = 1.0;
        let half = forward_r2c(4, 4, &source).unwrap();
        for z in &half {
            assert_abs_diff_eq!(z.re, 1.0, epsilon = 1e-9);
            assert_abs_diff_eq!(z.im, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_round_trip_scales_by_extent() {
        let width = 6;
        let height = 6;
        let source: Vec<f64> = (0..width * height).map(|i| (i % 7) as f64 * 0.1).collect();
        let half = forward_r2c(width, height, &source).unwrap();
        let restored = inverse_c2r(width, height, &half).unwrap();
        let scale = (width * height) as f64;
        for (orig, rec) in source.iter().zip(restored.iter()) {
            assert_abs_diff_eq!(orig * scale, *rec, epsilon = 1e-8);
        }
    }

    #[test]
    fn test_length_mismatch_rejected() {
        assert!(forward_r2c(4, 4, &[0.0; 15]).is_err());
        assert!(inverse_c2r(4, 4, &[Complex::default(); 11]).is_err());
    }
}
