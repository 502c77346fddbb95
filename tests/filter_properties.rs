//! Property tests over the whole filter catalog.

use filtrawy::prelude::*;
use image::{Rgb, RgbImage};
use proptest::prelude::*;

fn image_strategy() -> impl Strategy<Value = RgbImage> {
    (1u32..16, 1u32..16, any::<u64>()).prop_map(|(w, h, seed)| {
        RgbImage::from_fn(w, h, |x, y| {
            let v = seed
                .wrapping_mul(6364136223846793005)
                .wrapping_add(u64::from(x * 31 + y * 17));
            Rgb([(v >> 8) as u8, (v >> 24) as u8, (v >> 40) as u8])
        })
    })
}

/// Images one or two pixels wide, where window filters clamp at both borders.
fn narrow_image_strategy() -> impl Strategy<Value = RgbImage> {
    (1u32..3, 1u32..24, any::<u8>()).prop_map(|(w, h, base)| {
        RgbImage::from_fn(w, h, |x, y| Rgb([base.wrapping_add((y * 11) as u8), (x * 90) as u8, 255 - base]))
    })
}

/// Valid parameter sets, with the range ends drawn often.
fn params_strategy() -> impl Strategy<Value = ParameterSet> {
    (
        prop_oneof![Just(0.0), Just(2.0), 0.0f64..=2.0],
        0u8..=255,
        -100i32..=100,
        prop_oneof![Just(0.0), Just(2.0), 0.0f64..=2.0],
        prop_oneof![Just(0.0), Just(1.0), 0.0f64..=1.0],
        prop_oneof![Just(1u32), Just(21), 1u32..=21],
        prop_oneof![Just(0u32), Just(30), 0u32..=30],
    )
        .prop_map(|(intensity, threshold, temperature, saturation, vignette, radius, denoise)| {
            ParameterSet::default()
                .with(ParamName::Intensity, intensity)
                .and_then(|p| p.with(ParamName::Threshold, f64::from(threshold)))
                .and_then(|p| p.with(ParamName::Temperature, f64::from(temperature)))
                .and_then(|p| p.with(ParamName::Saturation, saturation))
                .and_then(|p| p.with(ParamName::Vignette, vignette))
                .and_then(|p| p.with(ParamName::BlurRadius, f64::from(radius)))
                .and_then(|p| p.with(ParamName::DenoiseStrength, f64::from(denoise)))
                .unwrap()
        })
}

fn kind_strategy() -> impl Strategy<Value = FilterKind> {
    (0..FilterKind::ALL.len()).prop_map(|i| FilterKind::ALL[i])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn every_filter_preserves_dimensions(image in image_strategy(), kind in kind_strategy()) {
        let out = kind.apply(&image, &ParameterSet::default()).unwrap();
        prop_assert_eq!(out.dimensions(), image.dimensions());
    }

    #[test]
    fn every_filter_accepts_any_valid_parameters(
        image in prop_oneof![image_strategy(), narrow_image_strategy()],
        params in params_strategy(),
        kind in kind_strategy(),
    ) {
        let out = kind.apply(&image, &params).unwrap();
        prop_assert_eq!(out.dimensions(), image.dimensions());
    }

    #[test]
    fn negative_is_an_involution(image in image_strategy()) {
        let params = ParameterSet::default();
        let twice = FilterKind::Negative
            .apply(&FilterKind::Negative.apply(&image, &params).unwrap(), &params)
            .unwrap();
        prop_assert_eq!(twice, image);
    }

    #[test]
    fn threshold_is_binary(image in image_strategy(), cut in 0u8..=255) {
        let params = ParameterSet::default()
            .with(ParamName::Threshold, f64::from(cut))
            .unwrap();
        let out = FilterKind::Threshold.apply(&image, &params).unwrap();
        prop_assert!(out.pixels().all(|p| p[0] == p[1] && p[1] == p[2] && (p[0] == 0 || p[0] == 255)));
    }

    #[test]
    fn temperature_is_monotonic(image in image_strategy(), a in -100i32..=100, b in -100i32..=100) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        let at = |t: i32| {
            let params = ParameterSet::default()
                .with(ParamName::Temperature, f64::from(t))
                .unwrap();
            FilterKind::Temperature.apply(&image, &params).unwrap()
        };
        let cool = at(low);
        let warm = at(high);
        for (c, w) in cool.pixels().zip(warm.pixels()) {
            prop_assert!(c[0] <= w[0]);
            prop_assert_eq!(c[1], w[1]);
            prop_assert!(c[2] >= w[2]);
        }
    }

    #[test]
    fn history_never_exceeds_capacity(capacity in 2usize..8, commits in 0usize..20) {
        let mut history = History::with_capacity(capacity);
        history.reset(RgbImage::new(1, 1));
        for i in 0..commits {
            history.commit(RgbImage::from_pixel(1, 1, Rgb([(i + 1) as u8, 0, 0])));
        }
        prop_assert!(history.len() <= capacity);
        prop_assert_eq!(history.position(), history.len() - 1);
    }

    #[test]
    fn out_of_range_values_are_rejected(value in 2.0001f64..1000.0) {
        let mut params = ParameterSet::default();
        prop_assert!(params.set(ParamName::Saturation, value).is_err());
        prop_assert_eq!(params.saturation(), 1.0);
    }
}

#[test]
fn catalog_names_round_trip_through_registry() {
    let registry = FilterRegistry::with_builtins();
    assert_eq!(registry.len(), FilterKind::ALL.len());
    for kind in FilterKind::ALL {
        assert_eq!(registry.lookup(kind.id()).unwrap(), kind);
        assert_eq!(kind.id().parse::<FilterKind>().unwrap(), kind);
    }
}

#[test]
fn extreme_parameters_on_single_column_images() {
    let params = ParameterSet::default()
        .with(ParamName::BlurRadius, 21.0)
        .and_then(|p| p.with(ParamName::Vignette, 1.0))
        .and_then(|p| p.with(ParamName::DenoiseStrength, 30.0))
        .unwrap();
    for height in [1, 2, 5, 50] {
        let image = RgbImage::from_fn(1, height, |_, y| Rgb([(y * 5) as u8, 128, 250]));
        for kind in FilterKind::ALL {
            let out = kind.apply(&image, &params).unwrap();
            assert_eq!(out.dimensions(), (1, height), "{kind}");
        }
    }
}

#[test]
fn empty_image_is_rejected_by_every_filter() {
    let empty = RgbImage::new(0, 0);
    for kind in FilterKind::ALL {
        assert!(kind.apply(&empty, &ParameterSet::default()).is_err(), "{kind}");
    }
}
