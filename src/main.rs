//! prompt-writer - A terminal editor for JSON prompt collections.
//!
//! # Usage
//!
//! ```bash
//! prompt-writer prompts.json
//! prompt-writer --direct-save --output-dir out/ prompts.json
//! prompt-writer --no-preview --theme light prompts.json
//! ```

use std::fs::File;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;

use prompt_writer::app::App;
use prompt_writer::config::{
    ConfigFlags, ThemeMode, clear_config_flags, global_config_path, load_config_flags,
    local_override_path, parse_flag_tokens, save_config_flags,
};
use prompt_writer::ui::style::set_light_background;

/// A terminal editor for JSON prompt collections
#[derive(Parser, Debug)]
#[command(name = "prompt-writer", version, about, long_about = None)]
struct Cli {
    /// Prompt file to open (a JSON object of string values)
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Directory for saved files (defaults to the loaded file's directory)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Save to the timestamped name without asking for a path
    #[arg(long)]
    direct_save: bool,

    /// Start with the preview pane hidden
    #[arg(long)]
    no_preview: bool,

    /// Color palette for a light or dark terminal background
    #[arg(long, value_enum)]
    theme: Option<ThemeMode>,

    /// Write debug logs to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults in the global config
    #[arg(long)]
    save: bool,

    /// Clear saved defaults in the global config
    #[arg(long)]
    clear: bool,
}

fn init_logging(log_file: Option<&PathBuf>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("debug")),
                )
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            // The TUI owns the terminal, so only warnings reach stderr.
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::from_default_env()
                        .add_directive(tracing::Level::WARN.into()),
                )
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let raw_args = std::env::args().collect::<Vec<_>>();
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = parse_flag_tokens(&raw_args);

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_ref())?;
    tracing::debug!(?effective, file = ?cli.file, "starting");

    set_light_background(effective.theme == Some(ThemeMode::Light));

    if let Some(file) = &cli.file
        && !file.exists()
    {
        anyhow::bail!("File not found: {}", file.display());
    }

    let mut app = App::new(cli.file)
        .with_output_dir(effective.output_dir)
        .with_direct_save(effective.direct_save)
        .with_preview_visible(!effective.no_preview)
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    app.run().context("Application error")
}
