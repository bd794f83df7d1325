//! Spectral display packaging.
//!
//! Pure buffer arithmetic shared by the forward and inverse Fourier
//! operators: the cyclic roll that centers the DC coefficient, the
//! quadrant swaps that unfold a half-spectrum into a full displayable
//! plane and fold it back, and the left-half-plane sign correction for
//! phase data.
//!
//! All buffers are row-major `f64` planes. Extents are even squares; the
//! half-spectrum holds `width/2 + 1` columns per row.

/// Cyclically rolls `buffer` (`height` rows by `width` columns) so the
/// sample at (x, y) lands at ((x + x_offset) mod width,
/// (y + y_offset) mod height). Negative offsets wrap by adding the
/// dimension. Rolls through a scratch copy, then writes back in place.
pub(crate) fn roll(
    buffer: &mut [f64],
    width: usize,
    height: usize,
    x_offset: isize,
    y_offset: isize,
) {
    debug_assert_eq!(buffer.len(), width * height);
    let mut rolled = vec![0.0f64; buffer.len()];
    for y in 0..height {
        let v = wrap(y as isize + y_offset, height);
        for x in 0..width {
            let u = wrap(x as isize + x_offset, width);
            rolled[v * width + u] = buffer[y * width + x];
        }
    }
    buffer.copy_from_slice(&rolled);
}

#[inline]
fn wrap(value: isize, extent: usize) -> usize {
    let extent = extent as isize;
    if value < 0 {
        (value + extent) as usize
    } else if value >= extent {
        (value - extent) as usize
    } else {
        value as usize
    }
}

/// Unfolds a half-spectrum into a full display plane with the DC
/// coefficient centered.
///
/// `half` holds `height` rows of `width/2 + 1` columns; `full` receives
/// `height x width`. Rows are first rolled down by `height/2`, the right
/// half-plane is copied directly, and the left half-plane mirrors the
/// right conjugate-symmetrically: row y mirrors row `height - y`, column
/// x takes half-spectrum column `width/2 - x`. The Nyquist column lands
/// on the display's left edge, so no spectral data is dropped.
pub(crate) fn forward_quadrant_swap(width: usize, height: usize, half: &[f64], full: &mut [f64]) {
    let center = width / 2 + 1;
    debug_assert_eq!(half.len(), height * center);
    debug_assert_eq!(full.len(), height * width);

    let mut rolled = half.to_vec();
    roll(&mut rolled, center, height, 0, (height / 2) as isize);

    for y in 0..height {
        let mirror_y = (height - y) % height;
        for x in 0..width / 2 {
            full[y * width + width / 2 + x] = rolled[y * center + x];
            full[y * width + x] = rolled[mirror_y * center + (width / 2 - x)];
        }
    }
}

/// Folds a full display plane back into its half-spectrum.
///
/// Exact left inverse of [`forward_quadrant_swap`] on half-spectrum
/// support: the right half-plane supplies columns `[0, width/2)`, the
/// mirrored left edge supplies the Nyquist column, and the rows are
/// rolled back up by `height/2`.
pub(crate) fn inverse_quadrant_swap(width: usize, height: usize, full: &[f64], half: &mut [f64]) {
    let center = width / 2 + 1;
    debug_assert_eq!(full.len(), height * width);
    debug_assert_eq!(half.len(), height * center);

    for y in 0..height {
        let mirror_y = (height - y) % height;
        for x in 0..width / 2 {
            half[y * center + x] = full[y * width + width / 2 + x];
        }
        half[y * center + width / 2] = full[mirror_y * width];
    }

    roll(half, center, height, 0, -((height / 2) as isize));
}

/// Negates every sample in the left half-plane (x < width/2).
///
/// Compensates for the checkerboard equivalence between corner and
/// centered DC origins as it applies to the phase plane.
pub(crate) fn correct_phase_lhs(width: usize, height: usize, buffer: &mut [f64]) {
    debug_assert_eq!(buffer.len(), width * height);
    for y in 0..height {
        for x in 0..width / 2 {
            buffer[y * width + x] *= -1.0;
        }
    }
}
