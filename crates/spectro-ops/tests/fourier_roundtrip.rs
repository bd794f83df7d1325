//! Round-trip and dispatch scenarios for the Fourier operators.

#![cfg(feature = "fft")]

use approx::assert_abs_diff_eq;
use spectro_core::{ColorModel, Image, Pixel, QUANTUM_MAX};
use spectro_ops::{forward_fourier_transform, inverse_fourier_transform};

/// A 4x4 grayscale delta: one full-scale pixel at the origin.
fn delta_image() -> Image {
    let mut image = Image::new(4, 4);
    *image.pixel_mut(0, 0).unwrap() = Pixel::gray(QUANTUM_MAX);
    image
}

#[test]
fn delta_input_produces_uniform_magnitude() {
    let [magnitude, phase] = forward_fourier_transform(&delta_image(), true).unwrap();

    // The spectrum of a delta is flat: every display cell holds the
    // 1/width^2-normalized full-scale value.
    let expected = f64::from(QUANTUM_MAX) / 16.0;
    for p in magnitude.pixels() {
        assert_abs_diff_eq!(f64::from(p.red), expected, epsilon = 1.0);
        assert!(p.is_gray());
    }

    // A delta at the origin has zero phase everywhere, which the
    // modulus encoding maps to mid-scale.
    for p in phase.pixels() {
        assert_abs_diff_eq!(f64::from(p.red), 0.5 * f64::from(QUANTUM_MAX), epsilon = 1.0);
    }
}

#[test]
fn delta_input_round_trips() {
    let image = delta_image();
    let [magnitude, phase] = forward_fourier_transform(&image, true).unwrap();
    let restored = inverse_fourier_transform(&magnitude, &phase, true).unwrap();

    assert_eq!(restored.dimensions(), (4, 4));
    for y in 0..4 {
        for x in 0..4 {
            let original = image.pixel(x, y).unwrap().red;
            let recovered = restored.pixel(x, y).unwrap().red;
            assert_abs_diff_eq!(
                f64::from(original),
                f64::from(recovered),
                epsilon = 20.0
            );
        }
    }
}

#[test]
fn constant_input_concentrates_at_center() {
    let mut image = Image::new(4, 4);
    image.fill(Pixel::gray(32768.0));

    let [magnitude, phase] = forward_fourier_transform(&image, true).unwrap();

    // The DC coefficient lands at the geometric center; every other
    // magnitude is zero.
    for y in 0..4 {
        for x in 0..4 {
            let value = f64::from(magnitude.pixel(x, y).unwrap().red);
            if (x, y) == (2, 2) {
                assert_abs_diff_eq!(value, 32768.0, epsilon = 1.0);
            } else {
                assert_abs_diff_eq!(value, 0.0, epsilon = 1.0);
            }
        }
    }
    // Zero phase encodes as mid-scale.
    let center_phase = f64::from(phase.pixel(2, 2).unwrap().red);
    assert_abs_diff_eq!(center_phase, 0.5 * f64::from(QUANTUM_MAX), epsilon = 1.0);
}

#[test]
fn constant_input_round_trips() {
    let mut image = Image::new(4, 4);
    image.fill(Pixel::gray(32768.0));

    let [magnitude, phase] = forward_fourier_transform(&image, true).unwrap();
    let restored = inverse_fourier_transform(&magnitude, &phase, true).unwrap();
    for p in restored.pixels() {
        assert_abs_diff_eq!(f64::from(p.red), 32768.0, epsilon = 4.0);
    }
}

#[test]
fn real_imaginary_mode_round_trips() {
    let mut image = Image::new(4, 4);
    image.fill(Pixel::gray(32768.0));

    let [real, imaginary] = forward_fourier_transform(&image, false).unwrap();
    // Real part concentrates at the center, imaginary part vanishes.
    assert_abs_diff_eq!(f64::from(real.pixel(2, 2).unwrap().red), 32768.0, epsilon = 1.0);
    assert_abs_diff_eq!(f64::from(imaginary.pixel(2, 2).unwrap().red), 0.0, epsilon = 1.0);

    let restored = inverse_fourier_transform(&real, &imaginary, false).unwrap();
    for p in restored.pixels() {
        assert_abs_diff_eq!(f64::from(p.red), 32768.0, epsilon = 4.0);
    }
}

#[test]
fn channel_dispatch_transforms_all_four_channels() {
    let mut image = Image::new(8, 8);
    image.set_matte(true);
    image.fill(Pixel::rgba(16384.0, 32768.0, 49152.0, 24576.0));

    let [magnitude, phase] = forward_fourier_transform(&image, true).unwrap();
    assert_eq!(magnitude.dimensions(), (8, 8));
    assert!(magnitude.matte());

    // Each channel's DC sample is that channel's mean.
    let center = magnitude.pixel(4, 4).unwrap();
    assert_abs_diff_eq!(f64::from(center.red), 16384.0, epsilon = 1.0);
    assert_abs_diff_eq!(f64::from(center.green), 32768.0, epsilon = 1.0);
    assert_abs_diff_eq!(f64::from(center.blue), 49152.0, epsilon = 1.0);
    assert_abs_diff_eq!(f64::from(center.opacity), 24576.0, epsilon = 1.0);

    let off_center = magnitude.pixel(1, 6).unwrap();
    assert_abs_diff_eq!(f64::from(off_center.red), 0.0, epsilon = 1.0);
    assert_abs_diff_eq!(f64::from(off_center.opacity), 0.0, epsilon = 1.0);

    let restored = inverse_fourier_transform(&magnitude, &phase, true).unwrap();
    for p in restored.pixels() {
        assert_abs_diff_eq!(f64::from(p.red), 16384.0, epsilon = 4.0);
        assert_abs_diff_eq!(f64::from(p.green), 32768.0, epsilon = 4.0);
        assert_abs_diff_eq!(f64::from(p.blue), 49152.0, epsilon = 4.0);
        assert_abs_diff_eq!(f64::from(p.opacity), 24576.0, epsilon = 4.0);
    }
}

#[test]
fn four_ink_index_channel_is_transformed() {
    let mut image = Image::new(4, 4);
    image.set_color_model(ColorModel::Cmyk);
    for p in image.pixels_mut() {
        *p = Pixel::rgb(16384.0, 32768.0, 49152.0);
        p.index = 13107.0;
    }

    let [magnitude, _phase] = forward_fourier_transform(&image, true).unwrap();
    assert_eq!(magnitude.color_model(), ColorModel::Cmyk);
    assert_abs_diff_eq!(
        f64::from(magnitude.pixel(2, 2).unwrap().index),
        13107.0,
        epsilon = 1.0
    );
}

#[test]
fn odd_dimensions_pad_to_even_square_and_round_trip() {
    // 3x5 pads to a 6x6 working square (max dimension 5, rounded up to
    // even); the padded region never escapes back into the content.
    let mut image = Image::new(3, 5);
    for (i, p) in image.pixels_mut().iter_mut().enumerate() {
        *p = Pixel::gray((i as f32 + 1.0) * 4000.0);
    }

    let [magnitude, phase] = forward_fourier_transform(&image, true).unwrap();
    assert_eq!(magnitude.dimensions(), (6, 6));
    assert_eq!(phase.dimensions(), (6, 6));

    let restored = inverse_fourier_transform(&magnitude, &phase, true).unwrap();
    assert_eq!(restored.dimensions(), (6, 6));

    for y in 0..5 {
        for x in 0..3 {
            let original = image.pixel(x, y).unwrap().red;
            let recovered = restored.pixel(x, y).unwrap().red;
            assert_abs_diff_eq!(
                f64::from(original),
                f64::from(recovered),
                epsilon = 64.0
            );
        }
    }
    // Cells the padding added reconstruct the zero padding.
    assert_abs_diff_eq!(f64::from(restored.pixel(5, 5).unwrap().red), 0.0, epsilon = 64.0);
}

#[test]
fn modulus_phase_stays_in_display_range() {
    let mut image = Image::new(6, 6);
    for (i, p) in image.pixels_mut().iter_mut().enumerate() {
        *p = Pixel::gray(((i * 2711) % 65536) as f32);
    }

    let [_magnitude, phase] = forward_fourier_transform(&image, true).unwrap();
    for p in phase.pixels() {
        assert!(p.red >= 0.0 && p.red <= QUANTUM_MAX);
    }
}

#[test]
fn gray_input_yields_gray_spectrum() {
    let mut image = Image::new(4, 4);
    for (i, p) in image.pixels_mut().iter_mut().enumerate() {
        *p = Pixel::gray((i as f32) * 3000.0);
    }
    assert!(image.is_gray());

    let [magnitude, phase] = forward_fourier_transform(&image, true).unwrap();
    assert!(magnitude.is_gray());
    assert!(phase.is_gray());
}
