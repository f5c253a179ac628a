// THEORY:
// The feature extractor turns a whole image into a fixed record of ten colour
// statistics. It is the only place where raw pixels are read; everything
// downstream works on the `FeatureVector` alone.
//
// Sampling: only the top-left window of at most 224x224 pixels is read. This is
// a cost bound, not a resize. Large images with off-corner content lose that
// content, and callers that need full coverage must downscale first.
//
// Center contrast: the "center" is the sampling window with a quarter of its
// width trimmed from the left and right and a quarter of its height trimmed from
// the top and bottom. When that leaves nothing, overall luminance stands in.

use crate::core_modules::pixel::pixel::luma;
use crate::core_modules::pixel_buffer::PixelBuffer;
use crate::core_modules::region::region::Region;
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Largest sampled width and height, in pixels.
pub const SAMPLE_WINDOW: u32 = 224;

/// Guards every ratio against a near-zero denominator.
pub const EPSILON: f64 = 1e-6;

/// Whole-image colour statistics used as scoring input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureVector {
    /// Rec. 601 luma of the channel means.
    pub luminance: f64,
    /// Square root of the summed channel variances.
    pub colorfulness: f64,
    /// Red mean over the sum of all channel means.
    pub red_ratio: f64,
    /// Center luma over overall luma.
    pub center_vs_edge: f64,
    pub r_var: f64,
    pub g_var: f64,
    pub b_var: f64,
    pub r_mean: f64,
    pub g_mean: f64,
    pub b_mean: f64,
}

/// Extracts the feature vector from the sampled window of `buffer`.
///
/// Fails only when the buffer has no area. `PixelBuffer` constructors already
/// reject that, so the check here guards buffers built any other way.
pub fn extract_features(buffer: &PixelBuffer) -> Result<FeatureVector, AnalysisError> {
    if buffer.width() == 0 || buffer.height() == 0 {
        return Err(AnalysisError::InvalidGeometry {
            width: buffer.width(),
            height: buffer.height(),
        });
    }

    let window = Region::top_left(buffer, SAMPLE_WINDOW, SAMPLE_WINDOW);
    let stats = window
        .channel_stats(buffer)
        .ok_or(AnalysisError::EmptyPixels)?;
    let [r_mean, g_mean, b_mean] = stats.mean;
    let [r_var, g_var, b_var] = stats.variance;

    let luminance = luma(r_mean, g_mean, b_mean);
    let colorfulness = (r_var + g_var + b_var).sqrt();
    let red_ratio = r_mean / (r_mean + g_mean + b_mean + EPSILON);

    let center_luminance = center_region(&window)
        .mean_luminance(buffer)
        .unwrap_or(luminance);
    let center_vs_edge = center_luminance / (luminance + EPSILON);

    Ok(FeatureVector {
        luminance,
        colorfulness,
        red_ratio,
        center_vs_edge,
        r_var,
        g_var,
        b_var,
        r_mean,
        g_mean,
        b_mean,
    })
}

/// The inner region left after trimming `floor(w/4)` columns and `floor(h/4)`
/// rows from each side of `window`.
pub fn center_region(window: &Region) -> Region {
    window.inset(window.width / 4, window.height / 4)
}
