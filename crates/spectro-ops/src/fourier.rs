//! Forward and inverse discrete Fourier transforms of an image.
//!
//! The forward transform converts a raster image into a pair of images
//! holding its 2-D spectrum: magnitude/phase when `modulus` is set,
//! real/imaginary otherwise. The inverse transform folds such a pair
//! back into a raster image. Both run per color channel, concurrently,
//! over a square even-sided working extent.
//!
//! # Spectrum packaging
//!
//! The FFT backend emits a conjugate-symmetric half-spectrum; the
//! forward path normalizes it by `width²`, unfolds it to a full plane
//! with the DC coefficient centered, sign-corrects the left half of the
//! phase plane, and (in modulus mode) rescales phase from `(-π, π]` into
//! `[0, 1]`. The inverse path undoes each step in reverse order, so a
//! forward/inverse pair round-trips to the source image within
//! quantization error.
//!
//! # Example
//!
//! ```rust,ignore
//! use spectro_ops::fourier::{forward_fourier_transform, inverse_fourier_transform};
//!
//! let [magnitude, phase] = forward_fourier_transform(&image, true)?;
//! let restored = inverse_fourier_transform(&magnitude, &phase, true)?;
//! ```

use crate::error::{OpsError, OpsResult};
#[cfg(feature = "fft")]
use crate::{dft, spectral};
#[cfg(feature = "fft")]
use rustfft::num_complex::Complex;
use spectro_core::{ChannelSelector, ColorModel, Image};
#[cfg(feature = "fft")]
use spectro_core::{clamp_to_quantum, StorageClass, QUANTUM_MAX, QUANTUM_SCALE};
#[cfg(feature = "fft")]
use std::f64::consts::PI;
#[allow(unused_imports)]
use tracing::{debug, trace};

/// Describes a single-channel transform job.
///
/// Plans are created per channel and discarded when the channel
/// completes. After construction the working extent is a square with an
/// even side, and `center` is the number of complex columns in the
/// half-spectrum.
#[derive(Debug, Clone, Copy)]
pub struct SpectralPlan {
    width: u32,
    height: u32,
    center: u32,
    channel: ChannelSelector,
    modulus: bool,
}

impl SpectralPlan {
    /// Builds the plan for an image extent, applying the padding
    /// decision of [`padded_extent`].
    #[must_use]
    pub fn for_extent(columns: u32, rows: u32, channel: ChannelSelector, modulus: bool) -> Self {
        let width = padded_extent(columns, rows);
        Self {
            width,
            height: width,
            center: width / 2 + 1,
            channel,
            modulus,
        }
    }

    /// Working width (equals the height).
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Working height (equals the width).
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Complex columns stored by the half-spectrum: `width/2 + 1`.
    #[inline]
    pub fn center(&self) -> u32 {
        self.center
    }

    /// The channel this plan transforms.
    #[inline]
    pub fn channel(&self) -> ChannelSelector {
        self.channel
    }

    /// `true` for magnitude/phase encoding, `false` for real/imaginary.
    #[inline]
    pub fn modulus(&self) -> bool {
        self.modulus
    }
}

/// The square, even working extent for an image of the given dimensions.
///
/// An even square keeps its own side; anything else takes the larger
/// dimension rounded up to even.
#[must_use]
pub fn padded_extent(columns: u32, rows: u32) -> u32 {
    if columns == rows && columns % 2 == 0 {
        return columns;
    }
    let extent = columns.max(rows);
    if extent % 2 == 1 { extent + 1 } else { extent }
}

/// Channels to process for an image with the given properties.
#[cfg_attr(not(feature = "fft"), allow(dead_code))]
fn select_channels(is_gray: bool, matte: bool, color_model: ColorModel) -> Vec<ChannelSelector> {
    let mut channels = if is_gray {
        vec![ChannelSelector::Gray]
    } else {
        vec![
            ChannelSelector::Red,
            ChannelSelector::Green,
            ChannelSelector::Blue,
        ]
    };
    if matte {
        channels.push(ChannelSelector::Opacity);
    }
    if color_model == ColorModel::Cmyk {
        channels.push(ChannelSelector::Index);
    }
    channels
}

/// Runs one task per channel, in parallel when the `parallel` feature is
/// enabled. The first failure wins and the rest of the output is
/// dropped.
#[cfg(feature = "fft")]
fn run_channel_tasks<T, F>(channels: &[ChannelSelector], task: F) -> OpsResult<Vec<T>>
where
    T: Send,
    F: Fn(ChannelSelector) -> OpsResult<T> + Sync,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        channels.par_iter().map(|&channel| task(channel)).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        channels.iter().map(|&channel| task(channel)).collect()
    }
}

/// Allocates a zeroed plane, reporting failure instead of aborting.
#[cfg(feature = "fft")]
fn acquire_plane(len: usize, context: &str) -> OpsResult<Vec<f64>> {
    let mut plane = Vec::new();
    plane
        .try_reserve_exact(len)
        .map_err(|_| OpsError::resource_exhausted(context, len * std::mem::size_of::<f64>()))?;
    plane.resize(len, 0.0);
    Ok(plane)
}

/// Reads one channel of `image` into a working plane scaled to `[0, 1]`.
///
/// Cells beyond the image extent stay zero (implicit zero padding up to
/// the plan's square).
#[cfg(feature = "fft")]
fn read_channel_plane(image: &Image, plan: &SpectralPlan) -> OpsResult<Vec<f64>> {
    let width = plan.width() as usize;
    let height = plan.height() as usize;
    let mut plane = acquire_plane(width * height, "channel read")?;

    let read = plan.channel().reader();
    let rows = (image.height() as usize).min(height);
    let columns = (image.width() as usize).min(width);
    for y in 0..rows {
        let row = image.row(y as u32).ok_or_else(|| {
            OpsError::cache_failure(
                format!("{} channel read", plan.channel().name()),
                format!("row {y} unavailable"),
            )
        })?;
        for (x, pixel) in row.iter().enumerate().take(columns) {
            plane[y * width + x] = QUANTUM_SCALE * f64::from(read(pixel));
        }
    }
    Ok(plane)
}

/// Writes a `[0, 1]` plane into one channel of `image`, scaled to the
/// quantum range and clamped. Writes are clipped to the image extent.
#[cfg(feature = "fft")]
fn store_channel_plane(
    image: &mut Image,
    channel: ChannelSelector,
    plane: &[f64],
    plane_width: usize,
) -> OpsResult<()> {
    let write = channel.writer();
    let rows = (image.height() as usize).min(plane.len() / plane_width);
    let columns = (image.width() as usize).min(plane_width);
    for y in 0..rows {
        let row = image.row_mut(y as u32).ok_or_else(|| {
            OpsError::cache_failure(
                format!("{} channel write", channel.name()),
                format!("row {y} unavailable"),
            )
        })?;
        for (x, pixel) in row.iter_mut().enumerate().take(columns) {
            write(
                pixel,
                clamp_to_quantum(f64::from(QUANTUM_MAX) * plane[y * plane_width + x]),
            );
        }
    }
    Ok(())
}

/// Forward-transforms one channel into its packaged magnitude and phase
/// display planes (or real and imaginary planes).
#[cfg(feature = "fft")]
fn forward_channel(image: &Image, plan: &SpectralPlan) -> OpsResult<(Vec<f64>, Vec<f64>)> {
    let width = plan.width() as usize;
    let height = plan.height() as usize;
    let center = plan.center() as usize;

    let source = read_channel_plane(image, plan)?;
    let mut spectrum = dft::forward_r2c(width, height, &source)?;
    drop(source);

    // Chosen normalization: the inverse path applies no scale, so the
    // round trip is the identity.
    let normalization = (width * width) as f64;
    for z in &mut spectrum {
        *z /= normalization;
    }

    let mut magnitude_half = acquire_plane(height * center, "spectral decomposition")?;
    let mut phase_half = acquire_plane(height * center, "spectral decomposition")?;
    if plan.modulus() {
        for (i, z) in spectrum.iter().enumerate() {
            magnitude_half[i] = z.norm();
            phase_half[i] = z.arg();
        }
    } else {
        for (i, z) in spectrum.iter().enumerate() {
            magnitude_half[i] = z.re;
            phase_half[i] = z.im;
        }
    }
    drop(spectrum);

    let mut magnitude = acquire_plane(height * width, "spectral packaging")?;
    let mut phase = acquire_plane(height * width, "spectral packaging")?;
    spectral::forward_quadrant_swap(width, height, &magnitude_half, &mut magnitude);
    spectral::forward_quadrant_swap(width, height, &phase_half, &mut phase);
    spectral::correct_phase_lhs(width, height, &mut phase);
    if plan.modulus() {
        for p in &mut phase {
            *p = *p / (2.0 * PI) + 0.5;
        }
    }
    Ok((magnitude, phase))
}

/// Inverse-transforms one channel of a magnitude/phase pair back into a
/// spatial plane in `[0, 1]`.
#[cfg(feature = "fft")]
fn inverse_channel(
    magnitude_image: &Image,
    phase_image: &Image,
    plan: &SpectralPlan,
) -> OpsResult<Vec<f64>> {
    let width = plan.width() as usize;
    let height = plan.height() as usize;
    let center = plan.center() as usize;

    let magnitude = read_channel_plane(magnitude_image, plan)?;
    let mut phase = read_channel_plane(phase_image, plan)?;

    if plan.modulus() {
        for p in &mut phase {
            *p = (*p - 0.5) * (2.0 * PI);
        }
    }
    spectral::correct_phase_lhs(width, height, &mut phase);

    let mut magnitude_half = acquire_plane(height * center, "spectral extraction")?;
    let mut phase_half = acquire_plane(height * center, "spectral extraction")?;
    spectral::inverse_quadrant_swap(width, height, &magnitude, &mut magnitude_half);
    spectral::inverse_quadrant_swap(width, height, &phase, &mut phase_half);
    drop(magnitude);
    drop(phase);

    let mut spectrum = Vec::new();
    spectrum
        .try_reserve_exact(height * center)
        .map_err(|_| {
            OpsError::resource_exhausted(
                "spectral recomposition",
                height * center * std::mem::size_of::<Complex<f64>>(),
            )
        })?;
    if plan.modulus() {
        for i in 0..height * center {
            spectrum.push(Complex::from_polar(magnitude_half[i], phase_half[i]));
        }
    } else {
        for i in 0..height * center {
            spectrum.push(Complex::new(magnitude_half[i], phase_half[i]));
        }
    }

    dft::inverse_c2r(width, height, &spectrum)
}

/// Computes the forward discrete Fourier transform of an image.
///
/// Returns exactly two images, both `side x side` where `side` is the
/// [`padded_extent`] of the input: the magnitude image first and the
/// phase image second (real and imaginary when `modulus` is `false`).
/// Both are direct-class with the component depth promoted to 32 bits.
///
/// Grayscale input transforms a single gray channel; otherwise red,
/// green, and blue are transformed, plus opacity when the image has an
/// opacity channel and the fourth ink when it uses the four-ink model.
/// Channels run concurrently; the first failure discards all output.
///
/// # Errors
///
/// [`OpsError::DependencyMissing`] without the `fft` feature, otherwise
/// any of the per-channel failures (allocation, FFT backend, pixel
/// access).
pub fn forward_fourier_transform(image: &Image, modulus: bool) -> OpsResult<[Image; 2]> {
    #[cfg(not(feature = "fft"))]
    {
        let _ = (image, modulus);
        Err(OpsError::dependency_missing("forward Fourier transform"))
    }
    #[cfg(feature = "fft")]
    {
        let (columns, rows) = image.dimensions();
        let side = padded_extent(columns, rows);
        let channels = select_channels(image.is_gray(), image.matte(), image.color_model());
        debug!(
            columns,
            rows,
            side,
            modulus,
            channels = channels.len(),
            "forward Fourier transform"
        );

        let mut magnitude_image = image.clone_layout(side, side);
        magnitude_image.set_class(StorageClass::Direct);
        magnitude_image.set_depth(32);
        let mut phase_image = image.clone_layout(side, side);
        phase_image.set_class(StorageClass::Direct);
        phase_image.set_depth(32);

        let planes = run_channel_tasks(&channels, |channel| {
            let plan = SpectralPlan::for_extent(columns, rows, channel, modulus);
            forward_channel(image, &plan).map(|planes| (channel, planes))
        })?;

        let side = side as usize;
        for (channel, (magnitude, phase)) in planes {
            store_channel_plane(&mut magnitude_image, channel, &magnitude, side)?;
            store_channel_plane(&mut phase_image, channel, &phase, side)?;
            trace!(channel = channel.name(), "channel transform stored");
        }
        Ok([magnitude_image, phase_image])
    }
}

/// Computes the inverse discrete Fourier transform of a magnitude/phase
/// image pair (real/imaginary when `modulus` is `false`).
///
/// The destination takes the magnitude image's extent and metadata;
/// cells the padded working square adds beyond that extent are never
/// written back.
///
/// # Errors
///
/// [`OpsError::DependencyMissing`] without the `fft` feature,
/// [`OpsError::ShapeError`] when the two source images differ in size,
/// otherwise any of the per-channel failures.
pub fn inverse_fourier_transform(
    magnitude: &Image,
    phase: &Image,
    modulus: bool,
) -> OpsResult<Image> {
    #[cfg(not(feature = "fft"))]
    {
        let _ = (magnitude, phase, modulus);
        Err(OpsError::dependency_missing("inverse Fourier transform"))
    }
    #[cfg(feature = "fft")]
    {
        if magnitude.dimensions() != phase.dimensions() {
            return Err(OpsError::shape_error(
                "inverse Fourier transform",
                magnitude.dimensions(),
                phase.dimensions(),
            ));
        }
        let (columns, rows) = magnitude.dimensions();
        let side = padded_extent(columns, rows);
        let is_gray = magnitude.is_gray() && phase.is_gray();
        let channels = select_channels(is_gray, magnitude.matte(), magnitude.color_model());
        debug!(
            columns,
            rows,
            side,
            modulus,
            channels = channels.len(),
            "inverse Fourier transform"
        );

        let mut destination = magnitude.clone_layout(columns, rows);
        destination.set_class(StorageClass::Direct);

        let planes = run_channel_tasks(&channels, |channel| {
            let plan = SpectralPlan::for_extent(columns, rows, channel, modulus);
            inverse_channel(magnitude, phase, &plan).map(|plane| (channel, plane))
        })?;

        for (channel, plane) in planes {
            store_channel_plane(&mut destination, channel, &plane, side as usize)?;
            trace!(channel = channel.name(), "channel transform stored");
        }
        Ok(destination)
    }
}
