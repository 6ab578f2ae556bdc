//! Loop Racer entry point
//!
//! Native builds run a headless autopilot session and log telemetry; the
//! browser build starts from `loop_racer::web`.

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::PathBuf;

    use clap::Parser;
    use loop_racer::autopilot::Autopilot;
    use loop_racer::consts::SIM_DT;
    use loop_racer::sim::Resolution;
    use loop_racer::{ConfigError, DriveConfig, Session, TrackConfig, TrackKind};
    use thiserror::Error;

    /// Drive a seeded autopilot around the track and log telemetry
    #[derive(Debug, Parser)]
    #[command(author, version, about)]
    pub struct Cli {
        /// Autopilot seed; same seed, same run
        #[arg(long, default_value_t = 12345)]
        pub seed: u64,

        /// Simulated seconds to run
        #[arg(long, default_value_t = 60)]
        pub seconds: u32,

        /// Track to build: street or layout
        #[arg(long, default_value = "street", value_parser = parse_track_kind)]
        pub track: TrackKind,

        /// JSON file overriding the default drive tuning
        #[arg(long)]
        pub config: Option<PathBuf>,
    }

    fn parse_track_kind(name: &str) -> Result<TrackKind, String> {
        TrackKind::from_str(name).ok_or_else(|| format!("unknown track kind: {name}"))
    }

    #[derive(Debug, Error)]
    pub enum RunError {
        #[error(transparent)]
        Config(#[from] ConfigError),
        #[error("cannot read {}: {source}", .path.display())]
        Io {
            path: PathBuf,
            source: std::io::Error,
        },
    }

    pub fn run(cli: &Cli) -> Result<(), RunError> {
        let drive = match &cli.config {
            Some(path) => {
                let json = std::fs::read_to_string(path).map_err(|source| RunError::Io {
                    path: path.clone(),
                    source,
                })?;
                DriveConfig::from_json(&json)?
            }
            None => DriveConfig::default(),
        };
        let track = TrackConfig::for_kind(cli.track);
        let mut session = Session::new(drive, &track)?;
        let mut pilot = Autopilot::new(cli.seed);

        let ticks_per_second = (1.0 / SIM_DT).round() as u32;
        let mut bumps = 0u32;
        let mut soft_bumps = 0u32;
        let mut top_speed = 0.0f32;

        for tick in 1..=cli.seconds * ticks_per_second {
            let report = pilot.drive(&mut session);
            match report.resolution {
                Resolution::Bumped | Resolution::Bounced => bumps += 1,
                Resolution::SoftBumped => soft_bumps += 1,
                Resolution::Accepted => {}
            }
            top_speed = top_speed.max(session.speed().abs());

            if tick % ticks_per_second == 0 {
                let pose = session.pose();
                log::info!(
                    "t={:>3}s pos=({:>7.2}, {:>7.2}) yaw={:>6.3} speed={:>6.3} moving={}",
                    tick / ticks_per_second,
                    pose.position.x,
                    pose.position.z,
                    pose.yaw,
                    session.speed(),
                    session.vehicle().is_moving()
                );
            }
        }

        log::info!(
            "Done: seed {}, {} bumps, {} infield bumps, top speed {:.3}",
            cli.seed,
            bumps,
            soft_bumps,
            top_speed
        );
        Ok(())
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use clap::CommandFactory;

        #[test]
        fn test_cli_is_well_formed() {
            Cli::command().debug_assert();
        }

        #[test]
        fn test_defaults() {
            let cli = Cli::try_parse_from(["loop-racer"]).unwrap();
            assert_eq!(cli.seed, 12345);
            assert_eq!(cli.seconds, 60);
            assert_eq!(cli.track, TrackKind::StreetLoop);
            assert!(cli.config.is_none());
        }

        #[test]
        fn test_parses_flags() {
            let cli = Cli::try_parse_from([
                "loop-racer",
                "--seed",
                "7",
                "--seconds",
                "5",
                "--track",
                "Layout",
                "--config",
                "drive.json",
            ])
            .unwrap();
            assert_eq!(cli.seed, 7);
            assert_eq!(cli.seconds, 5);
            assert_eq!(cli.track, TrackKind::Layout);
            assert_eq!(cli.config, Some(PathBuf::from("drive.json")));
        }

        #[test]
        fn test_rejects_unknown_track() {
            assert!(Cli::try_parse_from(["loop-racer", "--track", "oval"]).is_err());
            assert!(Cli::try_parse_from(["loop-racer", "--speed", "9"]).is_err());
        }

        #[test]
        fn test_short_run_succeeds() {
            let cli = Cli::try_parse_from(["loop-racer", "--seconds", "1"]).unwrap();
            assert!(run(&cli).is_ok());
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use clap::Parser;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = native::Cli::parse();
    log::info!("Loop Racer (native) starting...");

    if let Err(err) = native::run(&cli) {
        log::error!("{err}");
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is loop_racer::web::wasm_main, this is just to satisfy the compiler
}
