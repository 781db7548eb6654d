//! Integration tests for stegdetect
//!
//! Extraction has three outcomes:
//! - the secret is found
//! - nothing is there (`Extraction::Absent`), which is not an error
//! - authentication failed (`ExtractError::Authentication`), which is an error

use hound::{SampleFormat, WavSpec};
use image::{DynamicImage, ImageBuffer, Rgb, RgbImage};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tempfile::tempdir;

use stegdetect::analysis::{chi_square_score, fuse};
use stegdetect::{
    analyze, AudioCarrier, AudioStego, AudioStegoError, EmbeddingConfig, ExtractError, Extraction,
    ImageCarrier, ImageStego, ImageStegoError, Verdict,
};

fn gradient_image(width: u32, height: u32) -> RgbImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([x as u8, y as u8, ((x * 3 + y * 7) % 256) as u8])
    })
}

/// Every channel value is even, so pair counts are maximally unbalanced.
fn even_valued_image(width: u32, height: u32) -> RgbImage {
    ImageBuffer::from_fn(width, height, |x, y| {
        Rgb([(x * 2) as u8, (y * 2) as u8, (((x + y) % 128) * 2) as u8])
    })
}

fn image_stego(image: RgbImage) -> ImageStego {
    ImageStego::from_image(DynamicImage::ImageRgb8(image))
}

fn mono_audio(sample_count: usize) -> AudioStego {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };
    let samples = (0..sample_count)
        .map(|i| ((i as f64 * 0.05).sin() * 12_000.0) as i16)
        .collect();
    AudioStego::from_carrier(AudioCarrier::new(spec, samples).unwrap())
}

fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    ChaCha20Rng::seed_from_u64(seed).fill_bytes(&mut bytes);
    bytes
}

fn config(bits: u8) -> EmbeddingConfig {
    EmbeddingConfig::new(bits).unwrap()
}

/// Test the basic hide/extract roundtrip
#[test]
fn test_hello_world_roundtrip() {
    let stego = image_stego(gradient_image(100, 100));
    let hidden = stego.hide(b"hello world", &config(1)).unwrap();

    // Fits without tiling, so the dimensions are unchanged
    assert_eq!(hidden.carrier().shape(), (100, 100, 3));

    let extracted = hidden.extract(&config(1)).unwrap();
    assert_eq!(
        extracted,
        Extraction::Found {
            data: b"hello world".to_vec(),
            raw_fallback: false,
        }
    );
}

/// Test that every bit depth round-trips on images and audio
#[test]
fn test_roundtrip_all_bit_depths() {
    let secret = b"The quick brown fox jumps over the lazy dog";

    for bits in 1..=8 {
        let image = image_stego(gradient_image(40, 30)).hide(secret, &config(bits)).unwrap();
        let extracted = image.extract(&config(bits)).unwrap();
        assert_eq!(extracted.data(), Some(&secret[..]), "image, bits={}", bits);

        let audio = mono_audio(4000).hide(secret, &config(bits)).unwrap();
        let extracted = audio.extract(&config(bits)).unwrap();
        assert_eq!(extracted.data(), Some(&secret[..]), "audio, bits={}", bits);
    }
}

/// Test that the password is required and checked
#[test]
fn test_password_protection() {
    let secret = b"attack at dawn";
    let with_password = config(2).with_password(Some("pw123"));

    let hidden = image_stego(gradient_image(64, 64))
        .hide(secret, &with_password)
        .unwrap();

    // Correct password recovers the secret exactly
    let extracted = hidden.extract(&with_password).unwrap();
    assert_eq!(extracted.data(), Some(&secret[..]));

    // Without the password the plaintext must not come out
    let without = hidden.extract(&config(2)).unwrap();
    assert_ne!(without.data(), Some(&secret[..]));

    // Wrong password is an authentication error, not an absence
    let wrong = config(2).with_password(Some("pw124"));
    match hidden.extract(&wrong) {
        Err(ImageStegoError::ExtractError(ExtractError::Authentication(_))) => {}
        other => panic!("expected authentication failure, got {:?}", other),
    }
}

/// Test the documented password example exactly
#[test]
fn test_password_hello_world_one_bit() {
    let stego = image_stego(gradient_image(100, 100));
    let protected = config(1).with_password(Some("pw123"));
    let hidden = stego.hide(b"hello world", &protected).unwrap();

    let without = hidden.extract(&config(1)).unwrap();
    assert!(without.is_absent() || without.data() != Some(&b"hello world"[..]));

    let extracted = hidden.extract(&protected).unwrap();
    assert_eq!(extracted.data(), Some(&b"hello world"[..]));
}

/// Test that an empty password means no encryption
#[test]
fn test_empty_password_is_no_password() {
    let empty = config(1).with_password(Some(""));
    let hidden = image_stego(gradient_image(32, 32)).hide(b"plain", &empty).unwrap();

    let extracted = hidden.extract(&config(1)).unwrap();
    assert_eq!(extracted.data(), Some(&b"plain"[..]));
}

/// Test that an undersized carrier is tiled to the smallest multiple
#[test]
fn test_capacity_expansion() {
    let stego = image_stego(gradient_image(100, 100));
    let secret = random_bytes(5000, 7);

    // 30,000 elements at 1 bit hold 3,742 payload bytes. About 5,000
    // incompressible bytes need a second copy of the image, not a third.
    let plan = stego.plan(secret.len(), config(1).bits);
    assert!(plan.needs_tiling());
    assert_eq!(plan.repeats, 2);

    let hidden = stego.hide(&secret, &config(1)).unwrap();
    assert_eq!(hidden.carrier().shape(), (200, 100, 3));

    let extracted = hidden.extract(&config(1)).unwrap();
    assert_eq!(extracted.into_data(), Some(secret));
}

/// Test that tiled audio grows by whole copies of the input
#[test]
fn test_audio_capacity_expansion() {
    let stego = mono_audio(100);
    let secret = random_bytes(200, 11);

    let hidden = stego.hide(&secret, &config(2)).unwrap();
    assert!(hidden.sample_count() > 100);
    assert_eq!(hidden.sample_count() % 100, 0);

    let extracted = hidden.extract(&config(2)).unwrap();
    assert_eq!(extracted.into_data(), Some(secret));
}

/// Test that carriers without a payload report absence
#[test]
fn test_absent_payload() {
    let natural = image_stego(gradient_image(50, 50));
    for bits in 1..=8 {
        assert!(natural.extract(&config(bits)).unwrap().is_absent());
    }

    // 3 elements cannot even hold the 64-bit header
    let tiny = ImageStego::from_carrier(ImageCarrier::from_raw(1, 1, vec![1, 2, 3]).unwrap());
    assert!(tiny.extract(&config(8)).unwrap().is_absent());

    assert!(mono_audio(1000).extract(&config(1)).unwrap().is_absent());
}

/// Test that extracting at the wrong depth does not return the secret
#[test]
fn test_wrong_bit_depth() {
    let hidden = image_stego(gradient_image(64, 64))
        .hide(b"depth matters", &config(3))
        .unwrap();

    let extracted = hidden.extract(&config(1)).unwrap();
    assert_ne!(extracted.data(), Some(&b"depth matters"[..]));
}

/// Test saving and reloading a stego PNG and BMP
#[test]
fn test_image_file_roundtrip() {
    let dir = tempdir().unwrap();
    let secret = b"survives the file system";
    let hidden = image_stego(gradient_image(60, 40)).hide(secret, &config(2)).unwrap();

    for name in ["stego.png", "stego.bmp"] {
        let path = dir.path().join(name);
        hidden.save(&path).unwrap();

        let reloaded = ImageStego::from_file(&path).unwrap();
        let extracted = reloaded.extract(&config(2)).unwrap();
        assert_eq!(extracted.data(), Some(&secret[..]), "{}", name);
    }
}

/// Test that lossy output formats are refused
#[test]
fn test_jpeg_output_refused() {
    let dir = tempdir().unwrap();
    let hidden = image_stego(gradient_image(16, 16)).hide(b"x", &config(4)).unwrap();

    let result = hidden.save(dir.path().join("stego.jpg"));
    assert!(matches!(result, Err(ImageStegoError::LossyOutputFormat(_))));
}

/// Test saving and reloading a stego WAV
#[test]
fn test_audio_file_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("stego.wav");
    let secret = b"hidden in the noise floor";

    let original = mono_audio(2000);
    let hidden = original.hide(secret, &config(1)).unwrap();
    hidden.save(&path).unwrap();

    let reloaded = AudioStego::from_file(&path).unwrap();
    assert_eq!(reloaded.spec(), original.spec());
    assert_eq!(reloaded.sample_count(), 2000);

    let extracted = reloaded.extract(&config(1)).unwrap();
    assert_eq!(extracted.data(), Some(&secret[..]));
}

/// Test that non-16-bit audio is rejected
#[test]
fn test_audio_rejects_float_samples() {
    let spec = WavSpec {
        channels: 1,
        sample_rate: 8000,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut bytes = Vec::new();
    {
        let mut writer = hound::WavWriter::new(std::io::Cursor::new(&mut bytes), spec).unwrap();
        writer.write_sample(0.5f32).unwrap();
        writer.finalize().unwrap();
    }

    assert!(matches!(
        AudioStego::from_bytes(&bytes),
        Err(AudioStegoError::CarrierError(_)) | Err(AudioStegoError::AudioLoadError(_))
    ));
}

/// Test the fusion clamp when RS reports clean
#[test]
fn test_fusion_clamp() {
    assert!((fuse(1.0, 0.0) - 0.3).abs() < 1e-12);
    assert!(fuse(1.0, 0.09) <= 0.4);
    assert!((fuse(1.0, 1.0) - 1.0).abs() < 1e-12);
    assert!((fuse(0.5, 0.5) - 0.5).abs() < 1e-12);
}

/// Test that degenerate images produce bounded scores
#[test]
fn test_degenerate_images() {
    for image in [
        RgbImage::new(1, 1),
        RgbImage::new(64, 64),
        ImageBuffer::from_pixel(1, 50, Rgb([200, 10, 99])),
    ] {
        let result = analyze(&image);
        for score in [
            result.chi_square_score,
            result.rs_analysis_score,
            result.suspicion_level,
        ] {
            assert!((0.0..=1.0).contains(&score));
        }
        assert_eq!(result.label, Verdict::Clean);
    }
}

/// Test that full-capacity embedding flattens the pair histogram
#[test]
fn test_chi_square_detects_full_embedding() {
    let cover = even_valued_image(100, 100);
    let clean_score = chi_square_score(&cover);
    assert!(clean_score < 0.01, "clean score {}", clean_score);

    // Incompressible data filling nearly every low bit
    let secret = random_bytes(3600, 42);
    let hidden = image_stego(cover).hide(&secret, &config(1)).unwrap();
    assert_eq!(hidden.carrier().shape(), (100, 100, 3));

    let stego_score = chi_square_score(&hidden.to_rgb().unwrap());
    assert!(stego_score > 0.5, "stego score {}", stego_score);

    let result = analyze(&hidden.to_rgb().unwrap());
    assert!(result.chi_square_score > clean_score);
    assert!((0.0..=1.0).contains(&result.suspicion_level));
}

/// Test the JSON shape of an analysis result
#[test]
fn test_analysis_json() {
    let result = analyze(&gradient_image(32, 32));
    let json = serde_json::to_value(&result).unwrap();

    for key in [
        "chi_square_score",
        "rs_analysis_score",
        "suspicion_level",
        "label",
        "analysis",
    ] {
        assert!(json.get(key).is_some(), "missing {}", key);
    }
    assert!(json["analysis"]
        .as_str()
        .unwrap()
        .starts_with(&result.label.to_string()));
}
