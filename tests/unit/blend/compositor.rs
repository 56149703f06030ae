use std::io::Cursor;

use super::*;
use crate::assets::source::MemoryResolver;
use crate::foundation::core::Rgba8;

fn solid_png(r: u8, g: u8, b: u8, a: u8) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(300, 200, image::Rgba([r, g, b, a]));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

struct UnreachableResolver;

impl SourceResolver for UnreachableResolver {
    fn resolve(&self, source: &ImageSource) -> BlendResult<Vec<u8>> {
        panic!("resolver must not be invoked for '{source}'");
    }
}

#[test]
fn empty_input_fails_before_any_resolution() {
    let compositor = Compositor::default();
    let err = compositor
        .composite(&UnreachableResolver, &[])
        .unwrap_err();
    assert!(matches!(err, BlendError::NoInput));
}

#[test]
fn sequential_and_parallel_paths_agree_bit_for_bit() {
    let mut resolver = MemoryResolver::new();
    resolver.insert("red", solid_png(255, 0, 0, 255));
    resolver.insert("blue", solid_png(0, 0, 255, 255));
    resolver.insert("green", solid_png(0, 255, 0, 255));
    let sources: Vec<ImageSource> = ["red", "blue", "green"]
        .into_iter()
        .map(ImageSource::new)
        .collect();

    let sequential = Compositor::default()
        .composite(&resolver, &sources)
        .unwrap();
    let parallel = Compositor::new(CompositorOpts {
        threading: BlendThreading {
            parallel: true,
            threads: Some(2),
        },
    })
    .composite(&resolver, &sources)
    .unwrap();

    assert_eq!(sequential.raster, parallel.raster);
    assert_eq!(sequential.decoded, 3);
    assert_eq!(parallel.decoded, 3);
}

#[test]
fn failed_sources_are_recorded_and_excluded() {
    let mut resolver = MemoryResolver::new();
    resolver.insert("green", solid_png(0, 255, 0, 255));
    let sources = vec![ImageSource::new("missing"), ImageSource::new("green")];

    let out = Compositor::default().composite(&resolver, &sources).unwrap();
    assert_eq!(out.decoded, 1);
    assert_eq!(out.failures.len(), 1);
    assert_eq!(out.failures[0].index, 0);
    assert_eq!(out.failures[0].source, ImageSource::new("missing"));
    // The failure contributes nothing: the mean is exactly the green source.
    assert_eq!(out.raster.pixel(0, 0), Some(Rgba8::new(0, 255, 0, 255)));
}

#[test]
fn all_failed_reports_attempted_count() {
    let resolver = MemoryResolver::new();
    let sources = vec![ImageSource::new("a"), ImageSource::new("b")];

    let err = Compositor::default()
        .composite(&resolver, &sources)
        .unwrap_err();
    assert!(matches!(err, BlendError::AllFailed { attempted: 2 }));
}

#[test]
fn zero_thread_count_is_rejected() {
    let mut resolver = MemoryResolver::new();
    resolver.insert("red", solid_png(255, 0, 0, 255));

    let err = Compositor::new(CompositorOpts {
        threading: BlendThreading {
            parallel: true,
            threads: Some(0),
        },
    })
    .composite(&resolver, &[ImageSource::new("red")])
    .unwrap_err();
    assert!(err.to_string().contains("threads"));
}
