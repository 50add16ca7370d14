#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn parse_hex_supports_short_and_long_forms() {
    assert_eq!(Rgb::parse_hex("#ABC"), Some(Rgb::new(170, 187, 204)));
    assert_eq!(Rgb::parse_hex("  #a1B2c3 "), Some(Rgb::new(161, 178, 195)));
}

#[test]
fn parse_hex_rejects_invalid_inputs() {
    assert_eq!(Rgb::parse_hex("AABBCC"), None);
    assert_eq!(Rgb::parse_hex("#12"), None);
    assert_eq!(Rgb::parse_hex("#abcd"), None);
    assert_eq!(Rgb::parse_hex("#12GG34"), None);
}

#[test]
fn to_hex_is_uppercase() {
    assert_eq!(Rgb::new(255, 10, 171).to_hex(), "#FF0AAB");
    assert_eq!(Rgb::WHITE.to_hex(), "#FFFFFF");
}

#[test]
fn parse_css_reads_default_background() {
    let c = Rgba::parse_css("rgba(0, 0, 0, 0.7)").unwrap();
    assert_eq!(c.rgb, Rgb::BLACK);
    assert_eq!(c.alpha, 0.7);
    assert_eq!(c.opacity_percent(), 70);
}

#[test]
fn parse_css_accepts_compact_rgba() {
    let c = Rgba::parse_css("rgba(12,34,56,0.25)").unwrap();
    assert_eq!(c.rgb, Rgb::new(12, 34, 56));
    assert_eq!(c.opacity_percent(), 25);
}

#[test]
fn parse_css_rgb_and_hex_are_opaque() {
    let c = Rgba::parse_css("rgb(1, 2, 3)").unwrap();
    assert_eq!(c.rgb, Rgb::new(1, 2, 3));
    assert_eq!(c.alpha, 1.0);

    let c = Rgba::parse_css("#f9fafb").unwrap();
    assert_eq!(c.rgb, Rgb::new(249, 250, 251));
    assert_eq!(c.alpha, 1.0);
}

#[test]
fn parse_css_rejects_garbage() {
    assert!(Rgba::parse_css("blue").is_none());
    assert!(Rgba::parse_css("rgba(0, 0, 0)").is_none());
    assert!(Rgba::parse_css("rgb(300, 0, 0)").is_none());
    assert!(Rgba::parse_css("rgba(0, 0, 0, x)").is_none());
    assert!(Rgba::parse_css("rgba(0, 0, 0, 0.5").is_none());
}

#[test]
fn alpha_is_clamped() {
    assert_eq!(Rgba::new(Rgb::BLACK, 4.0).alpha, 1.0);
    assert_eq!(Rgba::new(Rgb::BLACK, -1.0).alpha, 0.0);
    assert_eq!(Rgba::from_opacity_percent(Rgb::BLACK, 250).alpha, 1.0);
}

#[test]
fn to_css_matches_stored_default() {
    let c = Rgba::from_opacity_percent(Rgb::BLACK, 70);
    assert_eq!(c.to_css(), "rgba(0, 0, 0, 0.7)");
}

#[test]
fn to_css_drops_trailing_zeroes() {
    assert_eq!(Rgba::new(Rgb::new(1, 2, 3), 1.0).to_css(), "rgba(1, 2, 3, 1)");
    assert_eq!(Rgba::from_opacity_percent(Rgb::WHITE, 0).to_css(), "rgba(255, 255, 255, 0)");
    assert_eq!(Rgba::from_opacity_percent(Rgb::WHITE, 35).to_css(), "rgba(255, 255, 255, 0.35)");
}

#[test]
fn css_round_trip_preserves_components() {
    let original = Rgba::from_opacity_percent(Rgb::new(91, 6, 190), 45);
    let parsed = Rgba::parse_css(&original.to_css()).unwrap();
    assert_eq!(parsed, original);
}
