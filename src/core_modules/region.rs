// THEORY:
// A `Region` is a rectangular window onto a `PixelBuffer`. It is the bridge
// between single-pixel heuristics and whole-image features: every statistic the
// feature extractor needs (channel means, channel variances, regional luma) is a
// pooled summary over some region.
//
// Key principles:
// 1.  **Spatial Pooling**: a region never copies pixels; it walks the buffer's
//     rows in place, left to right and top to bottom.
// 2.  **Fixed Order**: sums are accumulated in exactly that order every time, so
//     the same pixels always produce bit-identical floating point results.
// 3.  **Explicit Emptiness**: a region with zero area reports `None` instead of
//     dividing by zero. Callers decide how to recover.

pub mod region {
    use crate::core_modules::pixel::pixel::{Luminance, Pixel};
    use crate::core_modules::pixel_buffer::PixelBuffer;

    /// Per-channel mean and population variance over a region.
    #[derive(Debug, Clone, Copy, PartialEq)]
    pub struct ChannelStats {
        /// Number of pixels pooled.
        pub count: usize,
        pub mean: [f64; 3],
        /// Population variance (divided by `count`, not `count - 1`).
        pub variance: [f64; 3],
    }

    /// A rectangle `[x, x + width) x [y, y + height)` in pixel coordinates.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Region {
        pub x: u32,
        pub y: u32,
        pub width: u32,
        pub height: u32,
    }

    impl Region {
        pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
            Self {
                x,
                y,
                width,
                height,
            }
        }

        /// The top-left-aligned window of at most `max_width x max_height` pixels.
        pub fn top_left(buffer: &PixelBuffer, max_width: u32, max_height: u32) -> Self {
            Self::new(
                0,
                0,
                buffer.width().min(max_width),
                buffer.height().min(max_height),
            )
        }

        /// Shrinks the region by `margin_x` columns on the left and right and
        /// `margin_y` rows on the top and bottom. Saturates to an empty region.
        pub fn inset(&self, margin_x: u32, margin_y: u32) -> Self {
            Self::new(
                self.x + margin_x,
                self.y + margin_y,
                self.width.saturating_sub(margin_x.saturating_mul(2)),
                self.height.saturating_sub(margin_y.saturating_mul(2)),
            )
        }

        pub fn area(&self) -> usize {
            self.width as usize * self.height as usize
        }

        pub fn is_empty(&self) -> bool {
            self.area() == 0
        }

        fn rows<'a>(&self, buffer: &'a PixelBuffer) -> impl Iterator<Item = &'a [Pixel]> {
            let (x, width) = (self.x, self.width);
            (self.y..self.y + self.height).map(move |row| buffer.row_span(row, x, x + width))
        }

        /// Per-channel mean and population variance. Two passes: integer sums for
        /// the means, then squared deviations in `f64`.
        pub fn channel_stats(&self, buffer: &PixelBuffer) -> Option<ChannelStats> {
            if self.is_empty() {
                return None;
            }
            let count = self.area();

            let mut sums = [0u64; 3];
            for row in self.rows(buffer) {
                for pixel in row {
                    sums[0] += pixel.red as u64;
                    sums[1] += pixel.green as u64;
                    sums[2] += pixel.blue as u64;
                }
            }
            let mean = sums.map(|sum| sum as f64 / count as f64);

            let mut squared = [0f64; 3];
            for row in self.rows(buffer) {
                for pixel in row {
                    let deltas = [
                        pixel.red as f64 - mean[0],
                        pixel.green as f64 - mean[1],
                        pixel.blue as f64 - mean[2],
                    ];
                    for (acc, delta) in squared.iter_mut().zip(deltas) {
                        *acc += delta * delta;
                    }
                }
            }
            let variance = squared.map(|sum| sum / count as f64);

            Some(ChannelStats {
                count,
                mean,
                variance,
            })
        }

        /// Mean Rec. 601 luma over the region.
        pub fn mean_luminance(&self, buffer: &PixelBuffer) -> Option<Luminance> {
            if self.is_empty() {
                return None;
            }
            let total: f64 = self
                .rows(buffer)
                .flat_map(|row| row.iter())
                .fold(0.0, |acc, pixel| acc + pixel.luminance());
            Some(total / self.area() as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::region::*;
    use crate::core_modules::pixel::pixel::Pixel;
    use crate::core_modules::pixel_buffer::PixelBuffer;
    use approx::assert_relative_eq;

    fn checkerboard(width: u32, height: u32) -> PixelBuffer {
        let pixels = (0..width * height)
            .map(|i| {
                let (x, y) = (i % width, i / width);
                if (x + y) % 2 == 0 {
                    Pixel::rgb(0, 0, 0)
                } else {
                    Pixel::rgb(200, 100, 50)
                }
            })
            .collect();
        PixelBuffer::from_pixels(width, height, pixels).unwrap()
    }

    #[test]
    fn top_left_clamps_to_buffer() {
        let buffer = PixelBuffer::uniform(300, 10, Pixel::default()).unwrap();
        assert_eq!(Region::top_left(&buffer, 224, 224), Region::new(0, 0, 224, 10));
    }

    #[test]
    fn inset_removes_margins_on_both_sides() {
        assert_eq!(Region::new(0, 0, 8, 6).inset(2, 1), Region::new(2, 1, 4, 4));
        assert!(Region::new(0, 0, 3, 3).inset(2, 2).is_empty());
    }

    #[test]
    fn checkerboard_stats_are_population_stats() {
        let buffer = checkerboard(4, 4);
        let stats = Region::top_left(&buffer, 4, 4).channel_stats(&buffer).unwrap();
        assert_eq!(stats.count, 16);
        assert_relative_eq!(stats.mean[0], 100.0);
        assert_relative_eq!(stats.mean[1], 50.0);
        assert_relative_eq!(stats.mean[2], 25.0);
        // Half the samples sit at 0, half at 2*mean: variance is mean^2.
        assert_relative_eq!(stats.variance[0], 10_000.0);
        assert_relative_eq!(stats.variance[1], 2_500.0);
        assert_relative_eq!(stats.variance[2], 625.0);
    }

    #[test]
    fn stats_only_read_inside_the_region() {
        let mut pixels = vec![Pixel::rgb(255, 255, 255); 9];
        pixels[4] = Pixel::rgb(10, 20, 30);
        let buffer = PixelBuffer::from_pixels(3, 3, pixels).unwrap();
        let stats = Region::new(1, 1, 1, 1).channel_stats(&buffer).unwrap();
        assert_eq!(stats.mean, [10.0, 20.0, 30.0]);
        assert_eq!(stats.variance, [0.0; 3]);
    }

    #[test]
    fn empty_region_has_no_statistics() {
        let buffer = checkerboard(2, 2);
        let empty = Region::new(1, 1, 0, 0);
        assert!(empty.channel_stats(&buffer).is_none());
        assert!(empty.mean_luminance(&buffer).is_none());
    }
}
