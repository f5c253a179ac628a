// THEORY (single-pixel heuristics):
// `Pixel` is the most fundamental unit of the engine: a "dumb" container for one
// RGBA sample plus the handful of metrics that can be computed from that sample
// alone. Anything that needs more than one pixel (means, variances, regional
// luma) belongs to `Region`, which pools pixels spatially.
//
// Alpha is carried so that RGBA sources round-trip untouched, but no heuristic
// reads it.

pub mod pixel {
    pub type Byte = u8;
    pub type Channel = Byte;
    pub type Luminance = f64;

    /// ITU-R BT.601 luma weights. Fixed, not tunable.
    pub const LUMA_RED: f64 = 0.299;
    pub const LUMA_GREEN: f64 = 0.587;
    pub const LUMA_BLUE: f64 = 0.114;

    /// A "dumb" data container representing a single RGBA pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
        /// The alpha (transparency) channel value (0-255). Never used in scoring.
        pub alpha: Channel,
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
            Pixel {
                red,
                green,
                blue,
                alpha,
            }
        }

        /// An opaque pixel.
        pub fn rgb(red: Channel, green: Channel, blue: Channel) -> Self {
            Pixel::new(red, green, blue, Channel::MAX)
        }

        /// Luminance estimate (Rec. 601 luma) on the 0..255 scale.
        pub fn luminance(&self) -> Luminance {
            luma(self.red as f64, self.green as f64, self.blue as f64)
        }
    }

    /// Rec. 601 luma of three channel values, shared by per-pixel and per-mean paths.
    #[inline]
    pub fn luma(red: f64, green: f64, blue: f64) -> Luminance {
        LUMA_RED * red + LUMA_GREEN * green + LUMA_BLUE * blue
    }

    impl From<[Byte; 4]> for Pixel {
        fn from(bytes: [Byte; 4]) -> Self {
            Pixel::new(bytes[0], bytes[1], bytes[2], bytes[3])
        }
    }

    impl From<[Byte; 3]> for Pixel {
        fn from(bytes: [Byte; 3]) -> Self {
            Pixel::rgb(bytes[0], bytes[1], bytes[2])
        }
    }

    impl From<Pixel> for [Byte; 4] {
        fn from(pixel: Pixel) -> Self {
            [pixel.red, pixel.green, pixel.blue, pixel.alpha]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::pixel::*;
    use approx::assert_relative_eq;

    #[test]
    fn pure_red_luma() {
        assert_relative_eq!(Pixel::rgb(255, 0, 0).luminance(), 76.245, epsilon = 1e-9);
    }

    #[test]
    fn white_luma_is_full_scale() {
        assert_relative_eq!(Pixel::rgb(255, 255, 255).luminance(), 255.0, epsilon = 1e-9);
    }

    #[test]
    fn alpha_does_not_change_luma() {
        let opaque = Pixel::new(10, 200, 30, 255);
        let clear = Pixel::new(10, 200, 30, 0);
        assert_eq!(opaque.luminance(), clear.luminance());
    }

    #[test]
    fn byte_conversions() {
        let pixel = Pixel::from([1u8, 2, 3, 4]);
        assert_eq!(<[u8; 4]>::from(pixel), [1, 2, 3, 4]);
        assert_eq!(Pixel::from([9u8, 8, 7]).alpha, 255);
    }
}
