//! Spatial convolution.
//!
//! Applies an arbitrary odd-dimensioned real kernel to every pixel of an
//! image. Samples outside the image replicate the nearest edge pixel,
//! kernel weights are renormalized by their (optionally alpha-weighted)
//! sum, and color accumulation can be premultiplied by each sample's
//! alpha so transparent pixels contribute no color.
//!
//! # Example
//!
//! ```rust,ignore
//! use spectro_ops::filter::{convolve, Kernel};
//!
//! let kernel = Kernel::from_string("1 2 1; 2 4 2; 1 2 1")?;
//! let blurred = convolve(&image, &kernel, false)?;
//! ```

use crate::error::{OpsError, OpsResult};
use spectro_core::{clamp_to_quantum, Image, Pixel, StorageClass, EPSILON, QUANTUM_MAX, QUANTUM_SCALE};

/// Convolution kernel: a rectangular array of real weights with odd
/// dimensions and the anchor at the geometric center.
#[derive(Debug, Clone)]
pub struct Kernel {
    /// Kernel weights in row-major order.
    pub data: Vec<f64>,
    /// Kernel width (odd).
    pub width: usize,
    /// Kernel height (odd).
    pub height: usize,
}

impl Kernel {
    /// Creates a kernel from weights.
    ///
    /// # Errors
    ///
    /// [`OpsError::ImageModelError`] when a dimension is zero or even,
    /// or when `data` does not hold `width * height` weights.
    pub fn new(data: Vec<f64>, width: usize, height: usize) -> OpsResult<Self> {
        if width == 0 || height == 0 || width % 2 == 0 || height % 2 == 0 {
            return Err(OpsError::image_model(format!(
                "kernel dimensions must be odd, got {width}x{height}"
            )));
        }
        if data.len() != width * height {
            return Err(OpsError::image_model(format!(
                "kernel data size {} doesn't match {}x{}",
                data.len(),
                width,
                height
            )));
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Parses a kernel from text: rows separated by `;`, values
    /// separated by whitespace or commas.
    ///
    /// # Example
    ///
    /// ```
    /// use spectro_ops::filter::Kernel;
    ///
    /// let k = Kernel::from_string("0 -1 0; -1, 4, -1; 0 -1 0").unwrap();
    /// assert_eq!(k.width, 3);
    /// assert_eq!(k.height, 3);
    /// ```
    ///
    /// # Errors
    ///
    /// [`OpsError::ImageModelError`] when the text is empty, a value
    /// does not parse, the rows are ragged, or the dimensions are even.
    pub fn from_string(text: &str) -> OpsResult<Self> {
        let mut rows: Vec<Vec<f64>> = Vec::new();
        for row_text in text.split(';') {
            let values = row_text
                .split(|c: char| c.is_whitespace() || c == ',')
                .filter(|token| !token.is_empty())
                .map(|token| {
                    token.parse::<f64>().map_err(|_| {
                        OpsError::image_model(format!("invalid kernel value `{token}`"))
                    })
                })
                .collect::<OpsResult<Vec<f64>>>()?;
            if !values.is_empty() {
                rows.push(values);
            }
        }

        let height = rows.len();
        if height == 0 {
            return Err(OpsError::image_model("empty kernel"));
        }
        let width = rows[0].len();
        if rows.iter().any(|row| row.len() != width) {
            return Err(OpsError::image_model("ragged kernel rows"));
        }
        Self::new(rows.concat(), width, height)
    }

    /// The 1x1 identity kernel.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            data: vec![1.0],
            width: 1,
            height: 1,
        }
    }

    /// A uniform box kernel. Even sizes are bumped to the next odd size.
    #[must_use]
    pub fn box_blur(size: usize) -> Self {
        let size = if size % 2 == 0 { size + 1 } else { size };
        let count = size * size;
        Self {
            data: vec![1.0 / count as f64; count],
            width: size,
            height: size,
        }
    }

    /// A normalized Gaussian kernel. Even sizes are bumped to the next
    /// odd size.
    #[must_use]
    pub fn gaussian(size: usize, sigma: f64) -> Self {
        let size = if size % 2 == 0 { size + 1 } else { size };
        let half = (size / 2) as i64;
        let sigma2 = 2.0 * sigma * sigma;

        let mut data = Vec::with_capacity(size * size);
        let mut sum = 0.0f64;
        for y in -half..=half {
            for x in -half..=half {
                let d = (x * x + y * y) as f64;
                let w = (-d / sigma2).exp();
                data.push(w);
                sum += w;
            }
        }
        for w in &mut data {
            *w /= sum;
        }

        Self {
            data,
            width: size,
            height: size,
        }
    }

    /// Returns the kernel radius (half-width, half-height).
    #[inline]
    #[must_use]
    pub fn radius(&self) -> (usize, usize) {
        (self.width / 2, self.height / 2)
    }

    /// Sum of all kernel weights.
    #[inline]
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.data.iter().sum()
    }
}

/// Convolves one output scanline.
#[allow(clippy::too_many_arguments)]
fn convolve_row(
    src: &[Pixel],
    columns: usize,
    rows: usize,
    kernel: &Kernel,
    kernel_sum: f64,
    alpha: bool,
    y: usize,
    row: &mut [Pixel],
) {
    let (mid_x, mid_y) = kernel.radius();
    for (x, out) in row.iter_mut().enumerate() {
        let interior =
            x >= mid_x && x + mid_x < columns && y >= mid_y && y + mid_y < rows;

        let mut sum_red = 0.0f64;
        let mut sum_green = 0.0f64;
        let mut sum_blue = 0.0f64;
        let mut sum_opacity = 0.0f64;
        let mut gamma = if alpha { 0.0 } else { kernel_sum };

        let mut i = 0;
        for v in 0..kernel.height {
            for u in 0..kernel.width {
                let sample = if interior {
                    let sx = x + u - mid_x;
                    let sy = y + v - mid_y;
                    &src[sy * columns + sx]
                } else {
                    let sx = (x as isize + u as isize - mid_x as isize)
                        .clamp(0, columns as isize - 1) as usize;
                    let sy = (y as isize + v as isize - mid_y as isize)
                        .clamp(0, rows as isize - 1) as usize;
                    &src[sy * columns + sx]
                };
                let weight = kernel.data[i];
                if alpha {
                    let a = QUANTUM_SCALE * f64::from(QUANTUM_MAX - sample.opacity);
                    sum_red += a * weight * f64::from(sample.red);
                    sum_green += a * weight * f64::from(sample.green);
                    sum_blue += a * weight * f64::from(sample.blue);
                    sum_opacity += weight * f64::from(sample.opacity);
                    gamma += a * weight;
                } else {
                    sum_red += weight * f64::from(sample.red);
                    sum_green += weight * f64::from(sample.green);
                    sum_blue += weight * f64::from(sample.blue);
                }
                i += 1;
            }
        }

        let gamma = 1.0 / (if gamma.abs() <= EPSILON { 1.0 } else { gamma });
        let source = &src[y * columns + x];
        out.red = clamp_to_quantum(gamma * sum_red);
        out.green = clamp_to_quantum(gamma * sum_green);
        out.blue = clamp_to_quantum(gamma * sum_blue);
        out.opacity = if alpha {
            clamp_to_quantum(sum_opacity)
        } else {
            source.opacity
        };
        out.index = source.index;
    }
}

/// Convolves an image with a kernel.
///
/// For every output pixel the kernel window is applied with replicate
/// clamping at the edges (an interior fast path skips the clamping
/// arithmetic). The color sums are divided by the weight sum gamma,
/// guarded against near-zero by [`EPSILON`]; when `alpha` is set, each
/// sample's color is premultiplied by its alpha and gamma accumulates
/// the alpha-weighted kernel sum, so transparent samples neither darken
/// nor brighten the result.
///
/// The opacity output is the raw kernel-weighted opacity sum when
/// `alpha` is set, and the source pixel's opacity otherwise. The index
/// component passes through untouched. Output rows are processed in
/// parallel when the `parallel` feature is enabled.
///
/// # Errors
///
/// Kernel validity is enforced by [`Kernel`]'s constructors; convolution
/// itself only fails on a malformed kernel smuggled in through the
/// public fields ([`OpsError::ImageModelError`]).
pub fn convolve(image: &Image, kernel: &Kernel, alpha: bool) -> OpsResult<Image> {
    if kernel.width == 0
        || kernel.height == 0
        || kernel.width % 2 == 0
        || kernel.height % 2 == 0
        || kernel.data.len() != kernel.width * kernel.height
    {
        return Err(OpsError::image_model(format!(
            "kernel must be odd-dimensioned with matching data, got {}x{} with {} weights",
            kernel.width,
            kernel.height,
            kernel.data.len()
        )));
    }

    let columns = image.width() as usize;
    let rows = image.height() as usize;
    let mut destination = image.clone_layout(image.width(), image.height());
    destination.set_class(StorageClass::Direct);
    if columns == 0 || rows == 0 {
        return Ok(destination);
    }

    let src = image.pixels();
    let kernel_sum = kernel.sum();

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        destination
            .pixels_mut()
            .par_chunks_mut(columns)
            .enumerate()
            .for_each(|(y, row)| {
                convolve_row(src, columns, rows, kernel, kernel_sum, alpha, y, row);
            });
    }
    #[cfg(not(feature = "parallel"))]
    {
        destination
            .pixels_mut()
            .chunks_mut(columns)
            .enumerate()
            .for_each(|(y, row)| {
                convolve_row(src, columns, rows, kernel, kernel_sum, alpha, y, row);
            });
    }

    Ok(destination)
}
