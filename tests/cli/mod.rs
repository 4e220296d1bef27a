//! CLI argument parsing

use canopy::menu::Rect;
use canopy::tooling::cli::{Cli, Commands, SnapshotCommands};
use clap::Parser;
use std::path::PathBuf;

#[test]
fn parses_sections_with_defaults() {
    let cli = Cli::try_parse_from([
        "canopy",
        "sections",
        "--nodes",
        "nodes.json",
        "--user",
        "me@x.io",
    ])
    .unwrap();
    match cli.command {
        Commands::Sections {
            nodes,
            user,
            work_areas,
            format,
        } => {
            assert_eq!(nodes, PathBuf::from("nodes.json"));
            assert_eq!(user, "me@x.io");
            assert!(work_areas.is_none());
            assert_eq!(format, "text");
        }
        _ => panic!("expected sections command"),
    }
    assert!(cli.config.is_none());
}

#[test]
fn sections_requires_user() {
    assert!(Cli::try_parse_from(["canopy", "sections", "--nodes", "nodes.json"]).is_err());
}

#[test]
fn parses_global_flags_and_snapshot_order() {
    let cli = Cli::try_parse_from([
        "canopy",
        "--config",
        "canopy.toml",
        "--log-level",
        "debug",
        "snapshot",
        "order",
        "--parent",
        "p1",
    ])
    .unwrap();
    assert_eq!(cli.config, Some(PathBuf::from("canopy.toml")));
    assert_eq!(cli.log_level.as_deref(), Some("debug"));
    match cli.command {
        Commands::Snapshot {
            command: SnapshotCommands::Order { parent, store, .. },
        } => {
            assert_eq!(parent.as_deref(), Some("p1"));
            assert!(store.is_none());
        }
        _ => panic!("expected snapshot order command"),
    }
}

#[test]
fn parses_place_geometry() {
    let cli = Cli::try_parse_from([
        "canopy",
        "place",
        "--trigger",
        "900,700,24,24",
        "--viewport",
        "1000,800",
    ])
    .unwrap();
    match cli.command {
        Commands::Place {
            trigger,
            menu,
            viewport,
            ..
        } => {
            assert_eq!(trigger, Rect::new(900.0, 700.0, 24.0, 24.0));
            assert!(menu.is_none());
            assert_eq!(viewport, (1000.0, 800.0));
        }
        _ => panic!("expected place command"),
    }
}

#[test]
fn rejects_malformed_geometry() {
    assert!(Cli::try_parse_from(["canopy", "place", "--trigger", "1,2,3", "--viewport", "1000,800"]).is_err());
}
