use crate::foundation::core::{Canvas, PixelRaster};

/// Per-channel sum grid for one composite invocation.
///
/// `u32` per channel is wide enough for any realistic input count: channel
/// values are 0-255, so overflow would require more than 2^24 images. The
/// buffer exists only for the duration of one composite call.
pub struct AccumulatorBuffer {
    canvas: Canvas,
    sums: Vec<u32>,
    count: u32,
}

impl AccumulatorBuffer {
    /// Build a zeroed accumulator for `canvas`.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            sums: vec![0u32; canvas.byte_len()],
            count: 0,
        }
    }

    /// Number of rasters accumulated so far.
    pub fn count(&self) -> u32 {
        self.count
    }

    /// Add one raster's channel values into the running sums.
    ///
    /// Callers feed rasters in fixed source order; summation is commutative,
    /// but the fixed order keeps runs reproducible byte-for-byte.
    pub fn add(&mut self, raster: &PixelRaster) {
        assert_eq!(
            raster.canvas(),
            self.canvas,
            "accumulated raster canvas mismatch"
        );
        for (sum, &sample) in self.sums.iter_mut().zip(raster.data()) {
            *sum += u32::from(sample);
        }
        self.count += 1;
    }

    /// Divide the sums by the accumulated count, rounding half up and clamping
    /// to `[0, 255]`.
    ///
    /// Returns `None` when nothing was accumulated. The clamp is a safety net:
    /// a mean of valid 0-255 inputs cannot exceed the range, but alpha
    /// arithmetic still clamps to guard against non-standard source encodings.
    pub fn mean(&self) -> Option<PixelRaster> {
        if self.count == 0 {
            return None;
        }

        let count = u64::from(self.count);
        let mut data = Vec::with_capacity(self.sums.len());
        for &sum in &self.sums {
            data.push(mean_channel(u64::from(sum), count));
        }

        // Length invariant carried over from the sums buffer.
        PixelRaster::from_rgba8(self.canvas, data).ok()
    }
}

/// Round-half-up integer mean of one channel, clamped to `[0, 255]`.
fn mean_channel(sum: u64, count: u64) -> u8 {
    ((2 * sum + count) / (2 * count)).min(255) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/blend/accumulate.rs"]
mod tests;
