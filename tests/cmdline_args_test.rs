//! Tests for command-line argument parsing
//!
//! Note: These tests verify the argument parser configuration by creating
//! a test parser with the same structure as the main application.

use clap::{Arg, ArgAction, Command as ClapCommand};
use fencing_pose::{
    filters::create_filter,
    technique::{Technique, Weapon},
};

/// Create a command with the same argument structure as the main binary
fn create_test_command() -> ClapCommand {
    ClapCommand::new("fencing-pose")
        .version("0.1.0")
        .about("Fencing pose analysis replay")
        .arg(
            Arg::new("recording")
                .short('r')
                .long("recording")
                .value_name("PATH")
                .required(true)
                .help("Recorded pose sequence to replay"),
        )
        .arg(
            Arg::new("technique")
                .short('t')
                .long("technique")
                .value_name("ID")
                .help("Technique to score against"),
        )
        .arg(
            Arg::new("weapon")
                .short('w')
                .long("weapon")
                .value_name("WEAPON")
                .help("Weapon"),
        )
        .arg(
            Arg::new("filter")
                .short('f')
                .long("filter")
                .value_name("TYPE")
                .help("Smoothing filter"),
        )
        .arg(
            Arg::new("config")
                .short('C')
                .long("config")
                .value_name("PATH")
                .help("Configuration file path"),
        )
        .arg(
            Arg::new("frame-interval-ms")
                .long("frame-interval-ms")
                .value_name("MS")
                .default_value("33")
                .value_parser(clap::value_parser!(u64).range(1..=60_000))
                .help("Spacing of the synthetic frame clock"),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .action(ArgAction::SetTrue)
                .help("Enable debug output"),
        )
}

#[test]
fn test_help_argument() {
    let cmd = create_test_command();
    let result = cmd.try_get_matches_from(vec!["fencing-pose", "--help"]);

    // Help should cause an error (but a specific help error)
    assert!(result.is_err());
    let err = result.unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
}

#[test]
fn test_recording_is_required() {
    let cmd = create_test_command();
    let result = cmd.try_get_matches_from(vec!["fencing-pose"]);

    let err = result.unwrap_err();
    assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
}

#[test]
fn test_minimal_arguments() {
    let cmd = create_test_command();
    let matches = cmd
        .try_get_matches_from(vec!["fencing-pose", "--recording", "bout.yaml"])
        .unwrap();

    assert_eq!(
        matches.get_one::<String>("recording").map(|s| s.as_str()),
        Some("bout.yaml")
    );
    assert_eq!(matches.get_one::<u64>("frame-interval-ms"), Some(&33));
    assert!(matches.get_one::<String>("technique").is_none());
    assert!(!matches.get_flag("debug"));
}

#[test]
fn test_short_flags() {
    let cmd = create_test_command();
    let matches = cmd
        .try_get_matches_from(vec![
            "fencing-pose",
            "-r",
            "bout.yaml",
            "-t",
            "PARRY_4",
            "-w",
            "sabre",
            "-f",
            "exponential:0.3",
            "-C",
            "config.yaml",
            "-d",
        ])
        .unwrap();

    assert_eq!(matches.get_one::<String>("technique").map(|s| s.as_str()), Some("PARRY_4"));
    assert_eq!(matches.get_one::<String>("weapon").map(|s| s.as_str()), Some("sabre"));
    assert_eq!(matches.get_one::<String>("config").map(|s| s.as_str()), Some("config.yaml"));
    assert!(matches.get_flag("debug"));
}

#[test]
fn test_technique_values_resolve() {
    let techniques = vec!["ENGARDE", "lunge", "parry-4", "Parry 6", "balestra", "FLEECHE", "counter-riposte"];

    for technique in techniques {
        let cmd = create_test_command();
        let matches = cmd
            .try_get_matches_from(vec!["fencing-pose", "-r", "bout.yaml", "--technique", technique])
            .unwrap();
        let value = matches.get_one::<String>("technique").unwrap();
        assert!(value.parse::<Technique>().is_ok(), "Should accept technique: {technique}");
    }
}

#[test]
fn test_weapon_values_resolve() {
    for (value, expected) in [
        ("foil", Weapon::Foil),
        ("epee", Weapon::Epee),
        ("épée", Weapon::Epee),
        ("sabre", Weapon::Sabre),
        ("saber", Weapon::Sabre),
    ] {
        assert_eq!(value.parse::<Weapon>().unwrap(), expected);
    }
}

#[test]
fn test_filter_arguments() {
    let filters = vec!["none", "recency", "recency:8:4", "exponential", "exponential:0.2"];

    for filter in filters {
        let cmd = create_test_command();
        let result = cmd.try_get_matches_from(vec!["fencing-pose", "-r", "bout.yaml", "--filter", filter]);

        assert!(result.is_ok(), "Should accept filter: {}", filter);
        let matches = result.unwrap();
        assert_eq!(matches.get_one::<String>("filter").map(|s| s.as_str()), Some(filter));
        assert!(create_filter(filter).is_ok(), "Should build filter: {}", filter);
    }
}

#[test]
fn test_invalid_frame_interval() {
    let cmd = create_test_command();
    let result = cmd.try_get_matches_from(vec!["fencing-pose", "-r", "bout.yaml", "--frame-interval-ms", "fast"]);

    assert!(result.is_err());
}

#[test]
fn test_frame_interval_is_bounded() {
    for value in ["0", "60001", "18446744073709551615"] {
        let cmd = create_test_command();
        let result = cmd.try_get_matches_from(vec!["fencing-pose", "-r", "bout.yaml", "--frame-interval-ms", value]);
        assert!(result.is_err(), "Should reject interval {value}");
    }

    let cmd = create_test_command();
    let matches = cmd
        .try_get_matches_from(vec!["fencing-pose", "-r", "bout.yaml", "--frame-interval-ms", "60000"])
        .unwrap();
    assert_eq!(matches.get_one::<u64>("frame-interval-ms"), Some(&60_000));
}
