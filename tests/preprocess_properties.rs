use glyphmatch::lowlevel::{gaussian_blur_3x3, resize_bilinear};
use glyphmatch::{OwnedImage, PreprocessConfig, Preprocessor};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

mod common;

fn random_image(rng: &mut StdRng) -> OwnedImage {
    let width = rng.random_range(1..=120);
    let height = rng.random_range(1..=90);
    OwnedImage::from_fn(width, height, |_, _| rng.random()).unwrap()
}

#[test]
fn output_is_fixed_size_and_binary_for_random_inputs() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let pre = Preprocessor::default();
    for _ in 0..64 {
        let src = random_image(&mut rng);
        let glyph = pre.apply(src.view());
        assert_eq!(glyph.width(), 30);
        assert_eq!(glyph.height(), 50);
        assert!(glyph.data().iter().all(|&v| v == 0 || v == 255));
    }
}

#[test]
fn custom_target_size_is_honored() {
    let mut rng = StdRng::seed_from_u64(7);
    let pre = Preprocessor::new(PreprocessConfig {
        width: 16,
        height: 24,
    })
    .unwrap();
    for _ in 0..16 {
        let glyph = pre.apply(random_image(&mut rng).view());
        assert_eq!((glyph.width(), glyph.height()), (16, 24));
        assert!(glyph.data().iter().all(|&v| v == 0 || v == 255));
    }
}

#[test]
fn uniform_input_does_not_panic() {
    let pre = Preprocessor::default();
    for value in [0u8, 17, 255] {
        let src = OwnedImage::filled(13, 9, value).unwrap();
        let glyph = pre.apply(src.view());
        let expected = if value > 0 { 255 } else { 0 };
        assert!(glyph.data().iter().all(|&v| v == expected));
    }
}

#[test]
fn synthetic_shapes_survive_repeated_preprocessing() {
    let pre = Preprocessor::default();
    for rects in common::SHAPES {
        let cell = common::glyph_cell(rects);
        let once = pre.apply(cell.view());
        let twice = pre.apply(once.view());
        assert_eq!(once.data(), cell.data());
        assert_eq!(twice, once);
    }
}

#[test]
fn dark_on_light_input_is_binarized_with_same_polarity() {
    let pre = Preprocessor::default();
    let src = OwnedImage::from_fn(60, 100, |x, y| {
        if (20..40).contains(&x) && (20..80).contains(&y) {
            30
        } else {
            220
        }
    })
    .unwrap();
    let glyph = pre.apply(src.view());
    // Downscaled by 2: the dark block covers columns 10..20, rows 10..40.
    assert_eq!(*glyph.view().get(15, 25).unwrap(), 0);
    assert_eq!(*glyph.view().get(2, 2).unwrap(), 255);
}

#[test]
fn steps_compose_like_the_pipeline() {
    let src = OwnedImage::from_fn(45, 75, |x, y| ((x * 5) ^ (y * 3)) as u8).unwrap();
    let resized = resize_bilinear(src.view(), 30, 50);
    let blurred = gaussian_blur_3x3(resized.view());
    assert_eq!((blurred.width(), blurred.height()), (30, 50));
}
