use crate::foundation::error::{BlendError, BlendResult};

/// Fixed flag canvas width in pixels.
pub const FLAG_WIDTH: u32 = 300;

/// Fixed flag canvas height in pixels (standard 3:2 flag proportion).
pub const FLAG_HEIGHT: u32 = 200;

/// Pixel dimensions of a raster surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// The fixed 300x200 canvas every flag is scaled onto.
    pub const fn flag() -> Self {
        Self {
            width: FLAG_WIDTH,
            height: FLAG_HEIGHT,
        }
    }

    /// Number of pixels on this canvas.
    pub fn pixel_count(self) -> usize {
        (self.width as usize) * (self.height as usize)
    }

    /// Number of bytes of a tightly packed RGBA8 raster of this canvas.
    pub fn byte_len(self) -> usize {
        self.pixel_count() * 4
    }
}

/// Straight (non-premultiplied) RGBA8 sample.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Build a sample from channel values.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully transparent black.
    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }
}

/// A fixed-size grid of straight RGBA8 samples, row-major.
///
/// Every raster produced or consumed by the compositor has exactly the
/// [`Canvas::flag`] dimension; the length invariant is checked at construction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelRaster {
    canvas: Canvas,
    data: Vec<u8>,
}

impl PixelRaster {
    /// A transparent raster of the given canvas size.
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            data: vec![0u8; canvas.byte_len()],
        }
    }

    /// Wrap tightly packed RGBA8 bytes, checking the length invariant.
    pub fn from_rgba8(canvas: Canvas, data: Vec<u8>) -> BlendResult<Self> {
        if data.len() != canvas.byte_len() {
            return Err(BlendError::Other(anyhow::anyhow!(
                "raster byte length {} does not match {}x{} canvas (expected {})",
                data.len(),
                canvas.width,
                canvas.height,
                canvas.byte_len()
            )));
        }
        Ok(Self { canvas, data })
    }

    /// A raster filled with one solid sample.
    pub fn solid(canvas: Canvas, px: Rgba8) -> Self {
        let mut data = Vec::with_capacity(canvas.byte_len());
        for _ in 0..canvas.pixel_count() {
            data.extend_from_slice(&[px.r, px.g, px.b, px.a]);
        }
        Self { canvas, data }
    }

    /// Canvas dimensions of this raster.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Raw RGBA8 bytes, tightly packed, row-major.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the raster and return its raw bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Sample at `(x, y)`, or `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba8> {
        if x >= self.canvas.width || y >= self.canvas.height {
            return None;
        }
        let i = ((y as usize) * (self.canvas.width as usize) + (x as usize)) * 4;
        Some(Rgba8::new(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
