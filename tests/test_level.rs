use std::fs;

use river_leap::config::GameConfig;
use river_leap::entities::*;
use river_leap::error::LoadError;
use river_leap::level::*;

const SAMPLE: &str = "\
grass,0,720
water,48,96
log,100,96,true
longLog,300,192,false
turtle, 50, 144, false

bike,200,576
bulldozer,0,528,TRUE
";

// ── Parsing ───────────────────────────────────────────────────────────────────

#[test]
fn parses_every_known_record() {
    let level = parse_level("sample", SAMPLE, LevelParse::Strict).unwrap();
    assert_eq!(level.name, "sample");
    assert_eq!(level.records.len(), 7);

    assert_eq!(
        level.records[0],
        LevelRecord {
            kind: EntityKind::Grass,
            x: 0.0,
            y: 720.0,
            direction: Direction::Right,
        }
    );
    assert_eq!(level.records[3].kind, EntityKind::LongLog);
    assert_eq!(level.records[3].direction, Direction::Left);
    // Whitespace around fields is ignored.
    assert_eq!(level.records[4].kind, EntityKind::Turtle);
    assert_eq!((level.records[4].x, level.records[4].y), (50.0, 144.0));
    assert_eq!(level.records[4].direction, Direction::Left);
    assert_eq!(level.records[6].direction, Direction::Right);
}

#[test]
fn direction_defaults_to_right() {
    let level = parse_level("d", "bike,200,576", LevelParse::Strict).unwrap();
    assert_eq!(level.records[0].direction, Direction::Right);
}

#[test]
fn unparseable_direction_means_left() {
    let level = parse_level("d", "bus,0,432,yes", LevelParse::Strict).unwrap();
    assert_eq!(level.records[0].direction, Direction::Left);
}

#[test]
fn unknown_type_is_skipped_when_permissive() {
    let text = "grass,0,720\nspaceship,10,10\ntree,48,48\n";
    let level = parse_level("u", text, LevelParse::Permissive).unwrap();
    let kinds: Vec<_> = level.records.iter().map(|r| r.kind).collect();
    assert_eq!(kinds, [EntityKind::Grass, EntityKind::Tree]);
}

#[test]
fn unknown_type_fails_when_strict() {
    let text = "grass,0,720\nspaceship,10,10\n";
    match parse_level("u", text, LevelParse::Strict) {
        Err(LoadError::UnknownKind { line, kind }) => {
            assert_eq!(line, 2);
            assert_eq!(kind, "spaceship");
        }
        other => panic!("expected UnknownKind, got {other:?}"),
    }
}

#[test]
fn missing_coordinate_is_an_error() {
    match parse_level("m", "bus,10", LevelParse::Permissive) {
        Err(LoadError::MissingField { line: 1, field: "y" }) => {}
        other => panic!("expected MissingField, got {other:?}"),
    }
}

#[test]
fn non_integer_coordinate_is_an_error() {
    match parse_level("n", "grass,0,720\nbus,ten,432", LevelParse::Permissive) {
        Err(LoadError::BadNumber { line, field, value }) => {
            assert_eq!((line, field, value.as_str()), (2, "x", "ten"));
        }
        other => panic!("expected BadNumber, got {other:?}"),
    }
}

// ── Building ──────────────────────────────────────────────────────────────────

#[test]
fn logs_are_built_apart_from_scenery() {
    let level = parse_level("sample", SAMPLE, LevelParse::Strict).unwrap();
    let built = build_level(&level, &GameConfig::default());

    assert_eq!(built.logs.len(), 2);
    assert!(built.logs.iter().all(|e| e.kind().is_log()));
    assert_eq!(built.scenery.len(), 5);
    // Turtles ride like logs but live with the scenery.
    assert!(built.scenery.iter().any(|e| e.kind() == EntityKind::Turtle));
}

#[test]
fn built_entities_get_their_behaviour() {
    let cfg = GameConfig::default();
    let record = |kind, direction| LevelRecord {
        kind,
        x: 100.0,
        y: 100.0,
        direction,
    };

    let grass = build_entity(&record(EntityKind::Grass, Direction::Right), &cfg);
    assert_eq!(grass.behavior, Behavior::Static);
    assert!(grass.motion.is_none());

    let bike = build_entity(&record(EntityKind::Bike, Direction::Left), &cfg);
    assert_eq!(bike.behavior, Behavior::Reversing { left: 24.0, right: 1000.0 });
    assert_eq!(bike.velocity(), -0.2);

    let turtle = build_entity(&record(EntityKind::Turtle, Direction::Right), &cfg);
    assert_eq!(
        turtle.behavior,
        Behavior::Submerging {
            timer_ms: 0,
            cycle_ms: 9_000,
            underwater_after_ms: 7_000,
        }
    );

    let log = build_entity(&record(EntityKind::LongLog, Direction::Right), &cfg);
    assert_eq!(log.behavior, Behavior::Constant);
    assert_eq!(log.velocity(), 0.07);
}

// ── Loading from disk ─────────────────────────────────────────────────────────

#[test]
fn loads_consecutive_level_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(level_path(dir.path(), 0), "grass,0,720\n").unwrap();
    fs::write(level_path(dir.path(), 1), "log,100,96\nlog,500,96\n").unwrap();
    // Gap at 2: level 3 is never reached.
    fs::write(level_path(dir.path(), 3), "tree,0,48\n").unwrap();

    let levels = load_levels(dir.path(), LevelParse::Strict).unwrap();
    assert_eq!(levels.len(), 2);
    assert_eq!(levels[0].name, "0");
    assert_eq!(levels[1].records.len(), 2);
}

#[test]
fn empty_level_dir_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    assert!(matches!(
        load_levels(dir.path(), LevelParse::Permissive),
        Err(LoadError::NoLevelFiles { .. })
    ));
}

#[test]
fn bad_level_file_aborts_loading() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(level_path(dir.path(), 0), "grass,0,720\n").unwrap();
    fs::write(level_path(dir.path(), 1), "grass,0\n").unwrap();
    assert!(matches!(
        load_levels(dir.path(), LevelParse::Permissive),
        Err(LoadError::MissingField { line: 1, .. })
    ));
}

#[test]
fn missing_file_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.lvl");
    match load_level(&path, LevelParse::Permissive) {
        Err(LoadError::Io { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected Io, got {other:?}"),
    }
}

#[test]
fn shipped_levels_load_strictly() {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/levels");
    let levels = load_levels(&dir, LevelParse::Strict).unwrap();
    assert_eq!(levels.len(), 2);
    for level in &levels {
        let built = build_level(level, &GameConfig::default());
        assert!(!built.logs.is_empty(), "level {} needs a log for the bonus", level.name);
    }
}
