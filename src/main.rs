//! Headmouse command-line runner: replays recorded landmarks through a
//! session and drives the chosen controller.

use anyhow::{bail, Context, Result};
use clap::Parser;
use headmouse::{
    config::{Config, EXAMPLE_CONFIG},
    replay::ReplayProvider,
    session::{FrameOutcome, Session},
};
use log::{info, warn};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Recorded landmark file (YAML) to replay
    #[arg(short, long)]
    replay: Option<PathBuf>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Output controller (mouse, keyboard, log); overrides the config file
    #[arg(short = 'c', long)]
    controller: Option<String>,

    /// Pointer sensitivity; overrides the config file
    #[arg(short, long)]
    sensitivity: Option<f64>,

    /// Only dispatch gestures, never directions
    #[arg(long)]
    no_motion: bool,

    /// Print an example configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                info!("Loading configuration from: {}", path.display());
                Config::from_file(path).with_context(|| format!("Failed to load {}", path.display()))?
            }
            None => Config::default(),
        };
        if let Some(kind) = &self.controller {
            config.controller.kind.clone_from(kind);
        }
        if let Some(sensitivity) = self.sensitivity {
            config.controller.sensitivity = sensitivity;
        }
        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    if args.print_config {
        print!("{EXAMPLE_CONFIG}");
        return Ok(());
    }

    let config = args.resolve_config()?;
    let Some(replay) = &args.replay else {
        bail!("No landmark source given; pass --replay <FILE>");
    };

    let provider = ReplayProvider::from_file(replay)
        .with_context(|| format!("Failed to load recording {}", replay.display()))?;
    let frames = provider.remaining();

    let mut session = Session::from_config(Box::new(provider), &config)?;
    session.set_motion_enabled(!args.no_motion);

    let mut processed = 0_usize;
    for _ in 0..frames {
        match session.refresh()? {
            FrameOutcome::Processed(_) => processed += 1,
            FrameOutcome::Skipped(reason) => warn!("Frame skipped: {reason:?}"),
        }
    }
    session.quit();

    info!("Replayed {processed} of {frames} frames with {}", session.controller_name());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let args = Args::try_parse_from(["headmouse", "--controller", "log", "--sensitivity", "0.9"]).unwrap();
        let config = args.resolve_config().unwrap();
        assert_eq!(config.controller.kind, "log");
        assert_eq!(config.controller.sensitivity, 0.9);
        assert_eq!(config.motion, Config::default().motion);
    }

    #[test]
    fn test_negative_sensitivity_rejected() {
        let args = Args::try_parse_from(["headmouse", "--sensitivity=-1.0"]).unwrap();
        assert!(args.resolve_config().is_err());
    }

    #[test]
    fn test_flags() {
        let args = Args::try_parse_from(["headmouse", "-r", "rec.yaml", "--no-motion", "-d"]).unwrap();
        assert_eq!(args.replay, Some(PathBuf::from("rec.yaml")));
        assert!(args.no_motion);
        assert!(args.debug);
        assert!(!args.print_config);
        assert!(Args::try_parse_from(["headmouse", "--bogus"]).is_err());
    }
}
