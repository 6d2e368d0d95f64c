use std::path::PathBuf;

use prompt_writer::config::{ConfigFlags, ThemeMode, load_config_flags, parse_flag_tokens};

#[test]
fn test_config_file_parsing_ignores_comments_and_blank_lines() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".promptwriterrc");
    let content = r"
# comment
--direct-save

--theme light

--output-dir=exports
";
    std::fs::write(&path, content).unwrap();

    let flags = load_config_flags(&path).unwrap();
    assert!(flags.direct_save);
    assert_eq!(flags.theme, Some(ThemeMode::Light));
    assert_eq!(flags.output_dir, Some(PathBuf::from("exports")));
}

#[test]
fn test_cli_flags_override_file_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(".promptwriterrc");
    let content = "--direct-save\n--theme light\n--log-file file.log\n";
    std::fs::write(&path, content).unwrap();

    let file_flags = load_config_flags(&path).unwrap();
    let cli_args = vec![
        "prompt-writer".to_string(),
        "--theme".to_string(),
        "dark".to_string(),
        "--no-preview".to_string(),
    ];
    let cli_flags = parse_flag_tokens(&cli_args);

    let effective = file_flags.union(&cli_flags);
    assert!(effective.direct_save, "file flags should remain enabled");
    assert!(effective.no_preview, "cli flags should be applied");
    assert_eq!(effective.theme, Some(ThemeMode::Dark), "cli should override theme");
    assert_eq!(
        effective.log_file,
        Some(PathBuf::from("file.log")),
        "file config should be preserved when CLI does not override"
    );
}

#[test]
fn test_local_override_layers_over_global() {
    let dir = tempfile::tempdir().unwrap();
    let global = dir.path().join("config");
    let local = dir.path().join(".promptwriterrc");
    std::fs::write(&global, "--output-dir global-out\n--no-preview\n").unwrap();
    std::fs::write(&local, "--output-dir local-out\n").unwrap();

    let merged = load_config_flags(&global)
        .unwrap()
        .union(&load_config_flags(&local).unwrap());
    assert_eq!(merged.output_dir, Some(PathBuf::from("local-out")));
    assert!(merged.no_preview);
}

#[test]
fn test_config_union_merges_booleans() {
    let file = ConfigFlags {
        direct_save: true,
        ..ConfigFlags::default()
    };
    let cli = ConfigFlags {
        no_preview: true,
        ..ConfigFlags::default()
    };
    let merged = file.union(&cli);
    assert!(merged.direct_save);
    assert!(merged.no_preview);
}
