//! Channel selection.
//!
//! A [`ChannelSelector`] names one component of a [`Pixel`]. Operators
//! resolve a selector to a reader or writer function once, outside their
//! pixel loops, so the inner loops carry no per-pixel channel branching.
//!
//! # Example
//!
//! ```
//! use spectro_core::{ChannelSelector, Pixel};
//!
//! let read = ChannelSelector::Green.reader();
//! let p = Pixel::rgb(10.0, 20.0, 30.0);
//! assert_eq!(read(&p), 20.0);
//! ```

use crate::pixel::Pixel;
use crate::quantum::Quantum;

/// Identifies which component of a pixel to read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelSelector {
    /// The red color component.
    Red,
    /// The green color component.
    Green,
    /// The blue color component.
    Blue,
    /// The opacity component.
    Opacity,
    /// The fourth-ink component (four-ink color model).
    Index,
    /// All three color components carry the same value.
    Gray,
}

fn read_red(p: &Pixel) -> Quantum {
    p.red
}

fn read_green(p: &Pixel) -> Quantum {
    p.green
}

fn read_blue(p: &Pixel) -> Quantum {
    p.blue
}

fn read_opacity(p: &Pixel) -> Quantum {
    p.opacity
}

fn read_index(p: &Pixel) -> Quantum {
    p.index
}

fn write_red(p: &mut Pixel, q: Quantum) {
    p.red = q;
}

fn write_green(p: &mut Pixel, q: Quantum) {
    p.green = q;
}

fn write_blue(p: &mut Pixel, q: Quantum) {
    p.blue = q;
}

fn write_opacity(p: &mut Pixel, q: Quantum) {
    p.opacity = q;
}

fn write_index(p: &mut Pixel, q: Quantum) {
    p.index = q;
}

fn write_gray(p: &mut Pixel, q: Quantum) {
    p.red = q;
    p.green = q;
    p.blue = q;
}

impl ChannelSelector {
    /// Returns the accessor reading this channel from a pixel.
    ///
    /// `Gray` reads the red component; gray images keep all three color
    /// components equal.
    #[must_use]
    pub fn reader(self) -> fn(&Pixel) -> Quantum {
        match self {
            Self::Red | Self::Gray => read_red,
            Self::Green => read_green,
            Self::Blue => read_blue,
            Self::Opacity => read_opacity,
            Self::Index => read_index,
        }
    }

    /// Returns the accessor writing this channel into a pixel.
    ///
    /// `Gray` writes all three color components.
    #[must_use]
    pub fn writer(self) -> fn(&mut Pixel, Quantum) {
        match self {
            Self::Red => write_red,
            Self::Green => write_green,
            Self::Blue => write_blue,
            Self::Opacity => write_opacity,
            Self::Index => write_index,
            Self::Gray => write_gray,
        }
    }

    /// Human-readable channel name for diagnostics.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Green => "green",
            Self::Blue => "blue",
            Self::Opacity => "opacity",
            Self::Index => "index",
            Self::Gray => "gray",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_selects_component() {
        let p = Pixel {
            red: 1.0,
            green: 2.0,
            blue: 3.0,
            opacity: 4.0,
            index: 5.0,
        };
        assert_eq!(ChannelSelector::Red.reader()(&p), 1.0);
        assert_eq!(ChannelSelector::Green.reader()(&p), 2.0);
        assert_eq!(ChannelSelector::Blue.reader()(&p), 3.0);
        assert_eq!(ChannelSelector::Opacity.reader()(&p), 4.0);
        assert_eq!(ChannelSelector::Index.reader()(&p), 5.0);
        assert_eq!(ChannelSelector::Gray.reader()(&p), 1.0);
    }

    #[test]
    fn test_gray_writer_sets_all_color_components() {
        let mut p = Pixel::default();
        ChannelSelector::Gray.writer()(&mut p, 7.0);
        assert_eq!(p.red, 7.0);
        assert_eq!(p.green, 7.0);
        assert_eq!(p.blue, 7.0);
        assert_eq!(p.opacity, 0.0);
    }

    #[test]
    fn test_writer_leaves_other_components() {
        let mut p = Pixel::rgb(1.0, 2.0, 3.0);
        ChannelSelector::Opacity.writer()(&mut p, 9.0);
        assert_eq!(p.red, 1.0);
        assert_eq!(p.opacity, 9.0);
    }
}
