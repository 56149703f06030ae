use rayon::prelude::*;

use crate::{
    assets::decode::decode_flag,
    assets::source::{ImageSource, SourceResolver},
    blend::accumulate::AccumulatorBuffer,
    blend::surface::ScratchSurface,
    foundation::core::{Canvas, PixelRaster},
    foundation::error::{BlendError, BlendResult},
};

/// One source that could not be decoded, recorded and recovered locally.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DecodeFailure {
    /// Position of the source in the caller-supplied order.
    pub index: usize,
    /// The source that failed.
    pub source: ImageSource,
    /// Human-readable failure reason.
    pub reason: String,
}

/// Successful composite outcome.
#[derive(Clone, Debug)]
pub struct Composite {
    /// Per-channel mean of all successfully decoded sources.
    pub raster: PixelRaster,
    /// Number of sources that decoded successfully.
    pub decoded: usize,
    /// Sources that failed to decode and were excluded from the mean.
    pub failures: Vec<DecodeFailure>,
}

/// Threading controls for source decoding.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct BlendThreading {
    /// Decode sources on a rayon pool when `true`; sequentially otherwise.
    pub parallel: bool,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

/// Compositor configuration.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct CompositorOpts {
    /// Threading and worker controls.
    pub threading: BlendThreading,
}

/// Why one source failed to settle into a raster.
enum SourceFailure {
    /// The source's bytes could not be resolved or decoded.
    Decode(String),
    /// A worker could not acquire its scratch surface; fatal for the invocation.
    Surface(String),
}

type Settled = Result<PixelRaster, SourceFailure>;

/// Averages an ordered set of flag sources into one composite raster.
///
/// Each invocation is self-contained: scratch resources are acquired at entry
/// and released on every exit path, and no state persists between calls.
#[derive(Clone, Debug, Default)]
pub struct Compositor {
    opts: CompositorOpts,
}

impl Compositor {
    /// Build a compositor with explicit options.
    pub fn new(opts: CompositorOpts) -> Self {
        Self { opts }
    }

    /// Decode every source, wait for all of them to settle, and average the
    /// successes per channel.
    ///
    /// Behavior:
    /// - empty `sources` fails with [`BlendError::NoInput`] before any decode
    /// - each source settles independently; one failure never aborts the rest
    /// - accumulation runs only after the full set has settled, in fixed
    ///   source order, so results are bit-for-bit reproducible
    /// - failed sources are excluded from the mean entirely, not averaged as
    ///   zero; if every source fails the call fails with
    ///   [`BlendError::AllFailed`]
    #[tracing::instrument(skip(self, resolver, sources), fields(sources = sources.len()))]
    pub fn composite(
        &self,
        resolver: &dyn SourceResolver,
        sources: &[ImageSource],
    ) -> BlendResult<Composite> {
        if sources.is_empty() {
            return Err(BlendError::NoInput);
        }

        // Full join: every source has settled before any accumulation happens.
        let settled = if self.opts.threading.parallel {
            self.settle_parallel(resolver, sources)?
        } else {
            settle_sequential(resolver, sources)?
        };

        let mut acc = AccumulatorBuffer::new(Canvas::flag());
        let mut failures = Vec::new();
        for (index, outcome) in settled.into_iter().enumerate() {
            match outcome {
                Ok(raster) => acc.add(&raster),
                Err(SourceFailure::Surface(msg)) => return Err(BlendError::surface(msg)),
                Err(SourceFailure::Decode(reason)) => {
                    tracing::debug!(source = %sources[index], %reason, "excluding undecodable source");
                    failures.push(DecodeFailure {
                        index,
                        source: sources[index].clone(),
                        reason,
                    });
                }
            }
        }

        let decoded = acc.count() as usize;
        let raster = acc.mean().ok_or(BlendError::AllFailed {
            attempted: sources.len(),
        })?;
        tracing::debug!(decoded, failed = failures.len(), "composite complete");

        Ok(Composite {
            raster,
            decoded,
            failures,
        })
    }

    fn settle_parallel(
        &self,
        resolver: &dyn SourceResolver,
        sources: &[ImageSource],
    ) -> BlendResult<Vec<Settled>> {
        let pool = build_thread_pool(self.opts.threading.threads)?;
        // map_init gives each worker its own scratch surface; collect preserves
        // source order regardless of completion order.
        Ok(pool.install(|| {
            sources
                .par_iter()
                .map_init(ScratchSurface::new, |surface, source| match surface {
                    Ok(surface) => settle_one(surface, resolver, source),
                    Err(BlendError::SurfaceUnavailable(msg)) => {
                        Err(SourceFailure::Surface(msg.clone()))
                    }
                    Err(other) => Err(SourceFailure::Surface(other.to_string())),
                })
                .collect()
        }))
    }
}

fn settle_sequential(
    resolver: &dyn SourceResolver,
    sources: &[ImageSource],
) -> BlendResult<Vec<Settled>> {
    let mut surface = ScratchSurface::new()?;
    Ok(sources
        .iter()
        .map(|source| settle_one(&mut surface, resolver, source))
        .collect())
}

fn settle_one(
    surface: &mut ScratchSurface,
    resolver: &dyn SourceResolver,
    source: &ImageSource,
) -> Settled {
    let bytes = resolver
        .resolve(source)
        .map_err(|e| SourceFailure::Decode(format!("{e:#}")))?;
    decode_flag(surface, &bytes).map_err(|e| match e {
        BlendError::SurfaceUnavailable(msg) => SourceFailure::Surface(msg),
        other => SourceFailure::Decode(format!("{other:#}")),
    })
}

fn build_thread_pool(threads: Option<usize>) -> BlendResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(anyhow::anyhow!("blend threading 'threads' must be >= 1 when set").into());
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| anyhow::anyhow!("failed to build rayon thread pool: {e}").into())
}

#[cfg(test)]
#[path = "../../tests/unit/blend/compositor.rs"]
mod tests;
