//! End-to-end tests of the ditherbooth binary.

mod common;

use common::{fixtures, TestApp};
use pretty_assertions::assert_eq;

#[test]
fn test_dither_writes_one_bit_png() {
    let app = TestApp::new();
    fixtures::write_file(app.dir(), "in.png", &fixtures::gradient_grey(64, 8));

    let output = app.run(&["dither", "-i", "in.png", "-o", "out.png"]);
    assert!(
        output.status.success(),
        "dither failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let png = common::assert_one_bit_png(&app.path("out.png"));
    assert_eq!((png.width, png.height), (64, 8));
    assert!(!png.white[0], "left edge of the ramp is black");
    assert!(png.white[63], "right edge of the ramp is white");
}

#[test]
fn test_dither_packed_output() {
    let app = TestApp::new();
    fixtures::write_file(app.dir(), "in.png", &fixtures::flat_rgb(10, 3, [0, 0, 0]));

    let output = app.run(&[
        "dither", "-i", "in.png", "-o", "out.png", "--packed", "out.bin", "-a", "ordered",
    ]);
    assert!(output.status.success());

    let packed = std::fs::read(app.path("out.bin")).unwrap();
    common::assert_packed_layout(&packed, 10, 3);
    // All black: every used bit set, padding clear
    for row in packed.chunks(2) {
        assert_eq!(row, &[0xFF, 0b1100_0000]);
    }
}

#[test]
fn test_config_file_and_flag_override() {
    let app = TestApp::new();
    fixtures::write_file(app.dir(), "in.png", &fixtures::gradient_grey(32, 32));
    fixtures::write_file(
        app.dir(),
        "booth.yaml",
        b"algorithm: riemersma\ncurve: peano\nuse_riemersma: false\n",
    );

    let output = app.run(&["dither", "-i", "in.png", "-o", "a.png", "-c", "booth.yaml"]);
    assert!(output.status.success());
    common::assert_one_bit_png(&app.path("a.png"));

    let output = app.run(&[
        "dither", "-i", "in.png", "-o", "b.png", "-c", "booth.yaml", "-a", "ordered", "-m",
        "bayer2x2",
    ]);
    assert!(output.status.success());
    let png = common::assert_one_bit_png(&app.path("b.png"));
    // Bayer 2x2 on a 32-wide ramp: the first 2x2 block is still black
    assert!(!png.white[0]);
}

#[test]
fn test_unknown_algorithm_fails() {
    let app = TestApp::new();
    fixtures::write_file(app.dir(), "in.png", &fixtures::gradient_grey(8, 8));

    let output = app.run(&["dither", "-i", "in.png", "-o", "out.png", "-a", "sepia"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown algorithm: sepia"), "stderr: {stderr}");
    assert!(!app.path("out.png").exists());
}

#[test]
fn test_missing_config_file_fails() {
    let app = TestApp::new();
    fixtures::write_file(app.dir(), "in.png", &fixtures::gradient_grey(8, 8));

    let output = app.run(&["dither", "-i", "in.png", "-o", "out.png", "-c", "nope.yaml"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to read config"));
}

#[test]
fn test_list_prints_registries() {
    let app = TestApp::new();
    let output = app.run(&["list"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for name in ["floyd_steinberg", "bayer8x8", "hilbert", "mini_knuth", "coefficients3", "5x2"] {
        assert!(stdout.contains(name), "list output is missing {name}");
    }
}
