use crate::foundation::core::{Canvas, PixelRaster};
use crate::foundation::error::{BlendError, BlendResult};

/// Off-screen scratch surface used to rasterize SVG flags onto the fixed canvas.
///
/// One surface is acquired per composite invocation and reused sequentially
/// across that invocation's sources (draw, extract, clear, next). It is never
/// shared between concurrent invocations; parallel decode paths give each
/// worker its own surface.
pub struct ScratchSurface {
    canvas: Canvas,
    pixmap: resvg::tiny_skia::Pixmap,
}

impl ScratchSurface {
    /// Allocate a surface of the fixed flag canvas size.
    pub fn new() -> BlendResult<Self> {
        Self::with_canvas(Canvas::flag())
    }

    /// Allocate a surface of an explicit canvas size.
    pub fn with_canvas(canvas: Canvas) -> BlendResult<Self> {
        let pixmap = resvg::tiny_skia::Pixmap::new(canvas.width, canvas.height).ok_or_else(|| {
            BlendError::surface(format!(
                "failed to allocate {}x{} scratch pixmap",
                canvas.width, canvas.height
            ))
        })?;
        Ok(Self { canvas, pixmap })
    }

    /// Canvas dimensions of this surface.
    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    /// Rasterize an SVG tree stretched onto the full canvas and read back
    /// straight RGBA samples.
    ///
    /// The scale is non-uniform: the SVG viewport is mapped exactly onto the
    /// canvas, matching the fixed flag-proportion semantics rather than an
    /// aspect-preserving fit. The surface is cleared again before returning.
    pub fn rasterize_svg(&mut self, tree: &usvg::Tree) -> BlendResult<PixelRaster> {
        let size = tree.size();
        let (sx, sy) = (
            scale_factor(self.canvas.width, size.width())?,
            scale_factor(self.canvas.height, size.height())?,
        );

        let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);
        resvg::render(tree, xform, &mut self.pixmap.as_mut());

        let raster = self.extract_raster();
        self.clear();
        raster
    }

    fn extract_raster(&self) -> BlendResult<PixelRaster> {
        let mut data = Vec::with_capacity(self.canvas.byte_len());
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        PixelRaster::from_rgba8(self.canvas, data)
    }

    fn clear(&mut self) {
        self.pixmap.fill(resvg::tiny_skia::Color::TRANSPARENT);
    }
}

fn scale_factor(target_px: u32, source_px: f32) -> BlendResult<f32> {
    if !source_px.is_finite() || source_px <= 0.0 {
        return Err(anyhow::anyhow!("svg has invalid width/height").into());
    }
    Ok((target_px as f32) / source_px)
}

#[cfg(test)]
#[path = "../../tests/unit/blend/surface.rs"]
mod tests;
