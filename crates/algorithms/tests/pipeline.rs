//! End-to-end tests through the registry, the way the serving pipeline
//! drives the kernels: look up by key, build from a JSON parameter
//! document, apply to a tile, check the returned metadata.

use ndarray::Array2;
use serde_json::json;

use tilemath_algorithms::registry::Registry;
use tilemath_core::{BoundingBox, Crs, Error, PixelType, TileImage};

fn flat(rows: usize, cols: usize, value: f64) -> Array2<f64> {
    Array2::from_elem((rows, cols), value)
}

fn request_tile(bands: Vec<Array2<f64>>) -> TileImage {
    TileImage::from_bands(bands)
        .unwrap()
        .with_crs(Crs::web_mercator())
        .with_bounds(BoundingBox::new(
            -20037508.34,
            -20037508.34,
            20037508.34,
            20037508.34,
        ))
        .with_assets(vec!["before.tif".into(), "after.tif".into()])
}

#[test]
fn rca_through_registry_passes_metadata_through() {
    let registry = Registry::with_defaults();
    let alg = registry.create("rca", json!({"threshold": 0.5})).unwrap();

    let img = request_tile(vec![flat(8, 8, 2.0), flat(8, 8, 8.0)]);
    let out = alg.apply(&img).unwrap();

    assert_eq!(out.nbands(), 1);
    assert_eq!(out.dtype(), PixelType::UInt8);
    assert_eq!(out.crs(), img.crs());
    assert_eq!(out.bounds().unwrap(), img.bounds().unwrap());
    assert_eq!(out.assets(), img.assets());
    assert!(out.band(0).unwrap().iter().all(|&v| v == 1.0));
}

#[test]
fn flood_detection_through_registry() {
    let registry = Registry::with_defaults();
    let alg = registry.create("flood_detection", json!({})).unwrap();

    let mut green = flat(8, 8, 0.1);
    let mut swir = flat(8, 8, 0.6);
    for row in 0..8 {
        for col in 0..4 {
            green[[row, col]] = 0.7;
            swir[[row, col]] = 0.1;
        }
    }

    let out = alg.apply(&request_tile(vec![green, swir])).unwrap();
    let band = out.band(0).unwrap();
    let water: usize = band.iter().filter(|&&v| v == 1.0).count();
    assert_eq!(water, 32);
}

#[test]
fn declared_input_nbands_matches_kernel_enforcement() {
    let registry = Registry::with_defaults();

    for key in registry.keys() {
        let required = registry.metadata(key).unwrap().input_nbands;
        let alg = registry.create(key, json!({})).unwrap();

        // One band fewer than declared must be rejected before any
        // pixel computation
        let starved = TileImage::from_bands(vec![flat(2, 2, 1.0); required - 1]).unwrap();
        match alg.apply(&starved) {
            Err(Error::BandCount {
                required: r,
                provided,
            }) => {
                assert_eq!(r, required, "descriptor disagrees with kernel for {key}");
                assert_eq!(provided, required - 1);
            }
            other => panic!("expected BandCount error for {key}, got {other:?}"),
        }

        // Exactly the declared count must compute
        let fed = TileImage::from_bands(vec![flat(2, 2, 1.0); required]).unwrap();
        assert!(alg.apply(&fed).is_ok(), "kernel {key} failed on conformant input");
    }
}

#[test]
fn unknown_algorithm_is_a_not_found_error() {
    let registry = Registry::with_defaults();
    match registry.create("hillshade", json!({})) {
        Err(Error::UnknownAlgorithm(key)) => assert_eq!(key, "hillshade"),
        other => panic!("expected UnknownAlgorithm, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn masked_pixels_never_enter_the_positive_class() {
    let registry = Registry::with_defaults();

    // Strong change everywhere, but half the tile is masked out upstream
    let mut mask = Array2::from_elem((4, 4), true);
    for col in 0..4 {
        mask[[0, col]] = false;
    }
    let img = TileImage::new(
        vec![flat(4, 4, 2.0), flat(4, 4, 8.0)],
        vec!["before".into(), "after".into()],
        mask,
    )
    .unwrap();

    let alg = registry.create("rca", json!({"threshold": 0.5})).unwrap();
    let out = alg.apply(&img).unwrap();
    let band = out.band(0).unwrap();

    for col in 0..4 {
        assert_eq!(band[[0, col]], 0.0);
        assert!(!out.mask()[[0, col]]);
        assert_eq!(band[[2, col]], 1.0);
    }
}
