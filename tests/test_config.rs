use std::fs;

use river_leap::config::GameConfig;
use river_leap::error::LoadError;

#[test]
fn defaults_are_the_stock_game() {
    let cfg = GameConfig::default();
    assert_eq!((cfg.field.width, cfg.field.height), (1024.0, 768.0));
    assert_eq!(cfg.tile_size, 48.0);
    assert_eq!(cfg.player_start, (512.0, 720.0));
    assert_eq!(cfg.starting_lives, 3);
    assert_eq!(cfg.holes.centres_x, [120.0, 312.0, 504.0, 696.0, 888.0]);
    assert_eq!(cfg.bonus.spawn_min_secs, 25);
    assert_eq!(cfg.bonus.spawn_max_secs, 35);
}

#[test]
fn partial_ron_keeps_the_rest() {
    let cfg = GameConfig::from_ron_str(
        "(starting_lives: 5, holes: (centres_x: [100.0, 900.0]), bonus: (time_to_live_ms: 5000))",
    )
    .unwrap();

    assert_eq!(cfg.starting_lives, 5);
    assert_eq!(cfg.holes.centres_x, [100.0, 900.0]);
    assert_eq!(cfg.holes.y, 48.0);
    assert_eq!(cfg.bonus.time_to_live_ms, 5_000);
    assert_eq!(cfg.bonus.move_interval_ms, 2_000);
    assert_eq!(cfg.field, GameConfig::default().field);
}

#[test]
fn empty_ron_is_the_default() {
    assert_eq!(GameConfig::from_ron_str("()").unwrap(), GameConfig::default());
}

#[test]
fn load_reports_bad_files() {
    let dir = tempfile::tempdir().unwrap();

    let missing = dir.path().join("missing.ron");
    assert!(matches!(GameConfig::load(&missing), Err(LoadError::Io { .. })));

    let broken = dir.path().join("broken.ron");
    fs::write(&broken, "(starting_lives: \"lots\")").unwrap();
    match GameConfig::load(&broken) {
        Err(LoadError::Config { path, .. }) => assert_eq!(path, broken),
        other => panic!("expected Config error, got {other:?}"),
    }

    let no_holes = dir.path().join("no_holes.ron");
    fs::write(&no_holes, "(holes: (centres_x: []))").unwrap();
    assert!(matches!(GameConfig::load(&no_holes), Err(LoadError::NoHoles)));

    let good = dir.path().join("good.ron");
    fs::write(&good, "(tile_size: 32.0)").unwrap();
    assert_eq!(GameConfig::load(&good).unwrap().tile_size, 32.0);
}
