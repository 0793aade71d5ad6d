//! touchless_gallery — interactive entry point.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use touchless_gallery::{run, AppConfig, ImageLibrary, SensorSource};

/// Touchless kiosk photo gallery.
#[derive(Debug, Parser)]
#[command(name = "touchless_gallery", version, about)]
struct Cli {
    /// Image directory, or a text file listing one image path per line
    path: PathBuf,

    /// TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Replay a recorded skeleton session (CSV) instead of simulating one
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,

    /// Window width in pixels
    #[arg(long)]
    width: Option<usize>,

    /// Window height in pixels
    #[arg(long)]
    height: Option<usize>,

    /// Start with the mouse driving the cursor instead of the hand
    #[arg(long)]
    mouse_cursor: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help / --version print and succeed; usage errors fail with 1.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("touchless_gallery=info,body_gesture=info")),
        )
        .init();

    if let Err(e) = try_main(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn try_main(cli: Cli) -> anyhow::Result<()> {
    let mut cfg = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    if let Some(w) = cli.width {
        cfg.window_width = w.max(1);
    }
    if let Some(h) = cli.height {
        cfg.window_height = h.max(1);
    }
    if cli.mouse_cursor {
        cfg.sensor_cursor = false;
    }

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║                 Touchless Gallery                            ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();
    match &cli.replay {
        Some(p) => println!("  Sensor: replay of {}", p.display()),
        None => println!("  Sensor: simulated  (Space = right grip, Z = left grip)"),
    }
    println!();

    let library = ImageLibrary::load(&cli.path, cfg.gallery.thumb_height)
        .with_context(|| format!("loading images from {}", cli.path.display()))?;

    let source = match cli.replay {
        Some(path) => SensorSource::Replay(path),
        None => SensorSource::Simulated,
    };
    run(cfg, library, source)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parses_all_flags() {
        let cli = Cli::try_parse_from([
            "touchless_gallery", "photos", "--config", "g.toml", "--replay", "s.csv",
            "--width", "800", "--height", "600", "--mouse-cursor",
        ]).unwrap();
        assert_eq!(cli.path, PathBuf::from("photos"));
        assert_eq!(cli.config, Some(PathBuf::from("g.toml")));
        assert_eq!(cli.replay, Some(PathBuf::from("s.csv")));
        assert_eq!((cli.width, cli.height), (Some(800), Some(600)));
        assert!(cli.mouse_cursor);
    }

    #[test]
    fn missing_path_is_a_usage_error() {
        let err = Cli::try_parse_from(["touchless_gallery"]).unwrap_err();
        assert!(err.use_stderr());
    }

    #[test]
    fn empty_image_dir_fails_before_opening_a_window() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from(["touchless_gallery", dir.path().to_str().unwrap()]).unwrap();
        let err = try_main(cli).unwrap_err();
        assert!(format!("{err:#}").contains("no loadable images"));
    }
}
