use proptest::prelude::*;
use voxbox_palette::{AIR, Palette, PaletteError};

#[test]
fn toml_overrides_leading_materials() {
    let p = Palette::from_toml_str(r##"colors = ["#ff0000", "00ff00"]"##).unwrap();
    assert_eq!(p.rgb(1), [255, 0, 0]);
    assert_eq!(p.rgb(2), [0, 255, 0]);
    assert_eq!(p.rgb(3), Palette::default().rgb(3));
    assert_eq!(p.rgb(AIR), [0, 0, 0]);
}

#[test]
fn bad_color_reports_material() {
    let err = Palette::from_toml_str(r##"colors = ["#ff0000", "nope"]"##).unwrap_err();
    match err {
        PaletteError::BadColor { material, value } => {
            assert_eq!(material, 2);
            assert_eq!(value, "nope");
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[test]
fn too_many_colors_rejected() {
    let list: Vec<String> = (0..256).map(|_| "\"#000000\"".to_string()).collect();
    let src = format!("colors = [{}]", list.join(","));
    assert!(matches!(
        Palette::from_toml_str(&src),
        Err(PaletteError::TooManyColors(256))
    ));
}

#[test]
fn air_cannot_be_recolored() {
    let mut p = Palette::default();
    p.set(AIR, [9, 9, 9]);
    assert_eq!(p.rgb(AIR), [0, 0, 0]);
    p.set(7, [9, 9, 9]);
    assert_eq!(p.rgb(7), [9, 9, 9]);
}

proptest! {
    #[test]
    fn float_colors_stay_in_unit_range(id in 0u8..=255) {
        let p = Palette::default();
        for c in p.rgb_f32(id) {
            prop_assert!((0.0..=1.0).contains(&c));
        }
    }
}
