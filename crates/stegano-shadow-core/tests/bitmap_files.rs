use std::fs;
use std::path::Path;

use stegano_shadow_core::commands::{distribute, recover};
use stegano_shadow_core::{Bitmap, Persist, ShadowError};
use tempfile::TempDir;

const WIDTH: usize = 30;
const HEIGHT: usize = 20;

fn gradient(seed: u8) -> Vec<u8> {
    (0..WIDTH * HEIGHT)
        .map(|i| ((i % WIDTH) as u8).wrapping_mul(8).wrapping_add(seed))
        .collect()
}

fn write_bitmap(path: &Path, width: usize, height: usize, pixels: &[u8]) {
    Bitmap::grayscale(width, height, pixels)
        .expect("valid bitmap")
        .save_as(path)
        .expect("bitmap written");
}

/// A secret and `n` carriers in a fresh folder, returns (temp, secret, carriers dir)
fn prepare_shares(n: usize) -> (TempDir, std::path::PathBuf, std::path::PathBuf) {
    let temp = TempDir::new().expect("Failed to create temporary directory");
    let secret = temp.path().join("secret.bmp");
    let mut rng = fastrand::Rng::with_seed(1234);
    let pixels: Vec<u8> = (0..WIDTH * HEIGHT).map(|_| rng.u8(..)).collect();
    write_bitmap(&secret, WIDTH, HEIGHT, &pixels);

    let carriers = temp.path().join("carriers");
    fs::create_dir(&carriers).unwrap();
    for i in 0..n {
        write_bitmap(
            &carriers.join(format!("carrier-{i}.bmp")),
            WIDTH,
            HEIGHT,
            &gradient(i as u8 * 3),
        );
    }

    (temp, secret, carriers)
}

#[test]
fn should_distribute_and_recover_a_bitmap() -> stegano_shadow_core::Result<()> {
    let (temp, secret, carriers) = prepare_shares(6);
    let shadows = temp.path().join("shadows");
    fs::create_dir(&shadows)?;

    let written = distribute(&secret, 4, &carriers, Some(shadows.clone()))?;
    assert_eq!(written.len(), 6);

    // keep only 4 of the 6 shadows
    fs::remove_file(shadows.join("carrier-0.bmp"))?;
    fs::remove_file(shadows.join("carrier-3.bmp"))?;

    let recovered = temp.path().join("recovered.bmp");
    recover(&recovered, 4, &shadows)?;

    let expected = Bitmap::open(&secret)?;
    let given = Bitmap::open(&recovered)?;
    assert_eq!(given.carrier().pixels(), expected.carrier().pixels());
    assert_eq!((given.width(), given.height()), (WIDTH, HEIGHT));

    Ok(())
}

#[test]
fn shadows_keep_header_and_visual_bits() -> stegano_shadow_core::Result<()> {
    let (_temp, secret, carriers) = prepare_shares(4);
    let original = Bitmap::open(carriers.join("carrier-1.bmp"))?;

    distribute(&secret, 4, &carriers, None)?;

    let shadow = Bitmap::open(carriers.join("carrier-1.bmp"))?;
    let original_bytes = original.to_bytes();
    let shadow_bytes = shadow.to_bytes();
    assert_eq!(original_bytes.len(), shadow_bytes.len());
    assert_eq!(original_bytes[..1078], shadow_bytes[..1078]);

    let changed = original
        .carrier()
        .pixels()
        .iter()
        .zip(shadow.carrier().pixels())
        .filter(|(a, b)| (*a & 0xF8) != (*b & 0xF8))
        .count();
    // only bumped evaluation points may differ in their visual bits
    assert!(changed < original.carrier().pixels().len() / 4);

    Ok(())
}

#[test]
fn should_skip_carriers_of_other_sizes() -> stegano_shadow_core::Result<()> {
    let (temp, secret, carriers) = prepare_shares(4);
    write_bitmap(&carriers.join("odd-one.bmp"), 8, 8, &[0; 64]);

    let written = distribute(&secret, 4, &carriers, None)?;
    assert_eq!(written.len(), 4);
    assert!(!written.iter().any(|p| p.ends_with("odd-one.bmp")));

    fs::remove_file(carriers.join("odd-one.bmp"))?;
    let recovered = temp.path().join("recovered.bmp");
    recover(&recovered, 4, &carriers)?;
    assert_eq!(
        Bitmap::open(&recovered)?.carrier(),
        Bitmap::open(&secret)?.carrier()
    );

    Ok(())
}

#[test]
fn should_refuse_a_damaged_shadow() -> stegano_shadow_core::Result<()> {
    let (temp, secret, carriers) = prepare_shares(4);
    distribute(&secret, 4, &carriers, None)?;

    let damaged = carriers.join("carrier-2.bmp");
    let mut bitmap = Bitmap::open(&damaged)?;
    // W of the first block, see the planner layout
    let w = bitmap.stride() + 1;
    bitmap.carrier_mut().pixels_mut()[w] ^= 0b010;
    bitmap.save_as(&damaged)?;

    let result = recover(&temp.path().join("recovered.bmp"), 4, &carriers);
    assert!(matches!(
        result,
        Err(ShadowError::CorruptedShare {
            shadow: 2,
            block: 0
        })
    ));

    Ok(())
}

#[test]
fn should_recover_next_to_the_secret_and_earlier_results() -> stegano_shadow_core::Result<()> {
    let temp = TempDir::new().expect("Failed to create temporary directory");
    let dir = temp.path();

    let mut rng = fastrand::Rng::with_seed(99);
    let mut pixels: Vec<u8> = (0..WIDTH * HEIGHT).map(|_| rng.u8(..)).collect();
    // block 0 reads as value 32 without its parity bit
    pixels[0] = 0;
    pixels[1] = 0;
    pixels[WIDTH + 1] = 1;
    let secret = dir.join("a-secret.bmp");
    write_bitmap(&secret, WIDTH, HEIGHT, &pixels);
    for i in 0..4 {
        write_bitmap(
            &dir.join(format!("carrier-{i}.bmp")),
            WIDTH,
            HEIGHT,
            &gradient(i as u8 * 5),
        );
    }

    let written = distribute(&secret, 4, dir, None)?;
    assert_eq!(written.len(), 4);

    let recovered = dir.join("0-recovered.bmp");
    recover(&recovered, 4, dir)?;
    assert_eq!(
        Bitmap::open(&recovered)?.carrier(),
        Bitmap::open(&secret)?.carrier()
    );

    // the first result sorts in front of everything now
    let again = temp.path().join("0-again.bmp");
    recover(&again, 4, dir)?;
    assert_eq!(
        Bitmap::open(&again)?.carrier(),
        Bitmap::open(&secret)?.carrier()
    );

    Ok(())
}

#[test]
fn should_fail_when_too_few_shadows_pass_the_parity_check() -> stegano_shadow_core::Result<()> {
    let (temp, secret, carriers) = prepare_shares(4);
    distribute(&secret, 4, &carriers, None)?;

    let mut bitmap = Bitmap::open(carriers.join("carrier-3.bmp"))?;
    let w = bitmap.stride() + 1;
    bitmap.carrier_mut().pixels_mut()[w] ^= 0b100;
    bitmap.save_as(&carriers.join("carrier-3.bmp"))?;

    assert!(matches!(
        recover(&temp.path().join("recovered.bmp"), 4, &carriers),
        Err(ShadowError::CorruptedShare {
            shadow: 3,
            block: 0
        })
    ));

    Ok(())
}
