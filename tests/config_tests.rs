//! Configuration file tests

use std::io::Write;

use blockfall::config::{Config, ConfigError, Randomizer};
use blockfall::core::ShapeSource;
use blockfall::term::Palette;
use blockfall::types::{Rgb, ShapeKind};

fn write_config(text: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("create temp file");
    file.write_all(text.as_bytes()).expect("write temp file");
    file
}

#[test]
fn test_empty_file_yields_defaults() {
    let file = write_config("");
    let config = Config::load(file.path()).expect("load");
    assert_eq!(config, Config::default());

    assert_eq!(config.game.randomizer, Randomizer::Uniform);
    assert_eq!(config.game.seed, None);
    assert_eq!(config.render.cell_width, 2);
    assert_eq!(config.render.cell_height, 1);
    assert!(config.render.show_ghost);
    assert!(config.audio.enabled);
    assert_eq!(config.log.filter, "info");
    assert_eq!(config.view_config().palette, Palette::default());
}

#[test]
fn test_sections_override_defaults() {
    let file = write_config(
        r#"
[game]
randomizer = "bag"
seed = 42

[render]
cell_width = 1
show_controls = false
frame_rate = 30

[render.palette]
accent = [255, 0, 128]

[audio]
enabled = false

[log]
filter = "blockfall_core=debug"
"#,
    );
    let config = Config::load(file.path()).expect("load");

    assert_eq!(config.game.randomizer, Randomizer::Bag);
    assert_eq!(config.game.seed, Some(42));
    assert_eq!(config.render.cell_width, 1);
    assert_eq!(config.render.cell_height, 1);
    assert!(!config.render.show_controls);
    assert!(config.render.show_ghost);
    assert_eq!(config.render.frame_rate, 30);
    assert!(!config.audio.enabled);
    assert_eq!(config.log.filter, "blockfall_core=debug");

    let view = config.view_config();
    assert_eq!(view.palette.accent, Rgb::new(255, 0, 128));
    assert_eq!(view.palette.border, Palette::default().border);
}

#[test]
fn test_randomizer_builds_matching_source() {
    let mut uniform = Randomizer::Uniform.source(5);
    let mut bag = Randomizer::Bag.source(5);

    let mut drawn: Vec<_> = (0..7).map(|_| bag.next_shape()).collect();
    drawn.sort();
    assert_eq!(drawn, ShapeKind::ALL.to_vec());

    // Uniform draws still come from the catalog.
    for _ in 0..50 {
        assert!(ShapeKind::ALL.contains(&uniform.next_shape()));
    }
}

#[test]
fn test_out_of_range_values_are_rejected() {
    let cases = [
        ("[render]\ncell_width = 0", "render.cell_width"),
        ("[render]\ncell_width = 5", "render.cell_width"),
        ("[render]\ncell_height = 3", "render.cell_height"),
        ("[render]\nframe_rate = 0", "render.frame_rate"),
        ("[audio]\nbell_threshold = 1.5", "audio.bell_threshold"),
        ("[log]\nfilter = \"\"", "log.filter"),
    ];
    for (text, expected) in cases {
        match Config::from_toml(text) {
            Err(ConfigError::Invalid { field, .. }) => assert_eq!(field, expected, "{text}"),
            other => panic!("{text}: expected invalid {expected}, got {other:?}"),
        }
    }
}

#[test]
fn test_unknown_keys_are_rejected() {
    assert!(matches!(
        Config::from_toml("[render]\ncell_size = 2"),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(Config::from_toml("[network]\nport = 1"), Err(ConfigError::Parse(_))));
    assert!(matches!(
        Config::from_toml("[game]\nrandomizer = \"tgm\""),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("absent.toml");

    let err = Config::load(&path).expect_err("file is missing");
    assert!(matches!(err, ConfigError::Read { .. }));
    assert!(err.to_string().contains("absent.toml"));
}
