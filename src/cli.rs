use std::path::PathBuf;

use clap::Parser;

use dc_sim::logging::LogFormat;

/// Command-line options.
#[derive(Parser, Debug)]
#[command(
    name = "dc-sim",
    version,
    about = "Real-time metric simulation for a data center operations dashboard"
)]
pub struct Cli {
    /// TOML configuration file; built-in defaults when omitted.
    #[arg(long, env = "DC_SIM_CONFIG")]
    pub config: Option<PathBuf>,

    /// Scenario to run (normal, peak-load, cooling-failure, power-outage).
    #[arg(long)]
    pub scenario: Option<String>,

    /// Number of ticks to process.
    #[arg(long, default_value_t = 30)]
    pub ticks: usize,

    /// Perturbation seed, overriding `engine.seed`.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write the final history to this CSV file.
    #[arg(long)]
    pub history_out: Option<PathBuf>,

    /// Tick on the wall clock instead of back-to-back.
    #[arg(long)]
    pub realtime: bool,

    /// With --realtime, also run the live and legacy dashboard feeds.
    #[arg(long, requires = "realtime")]
    pub with_feeds: bool,

    /// Print the temperature-zone and rack summary after the run.
    #[arg(long)]
    pub floor_plan: bool,

    /// Print the final engine snapshot as JSON.
    #[arg(long)]
    pub snapshot_json: bool,

    /// Log output format, overriding `logging.format`.
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Cli, clap::Error> {
        Cli::try_parse_from(std::iter::once("dc-sim").chain(args.iter().copied()))
    }

    #[test]
    fn defaults() {
        let cli = parse(&[]).expect("no args should parse");
        assert_eq!(cli.ticks, 30);
        assert!(cli.scenario.is_none());
        assert!(!cli.realtime);
        assert!(cli.log_format.is_none());
    }

    #[test]
    fn full_options() {
        let cli = parse(&[
            "--scenario",
            "peak-load",
            "--ticks",
            "25",
            "--seed",
            "7",
            "--history-out",
            "out.csv",
            "--log-format",
            "json",
        ])
        .expect("options should parse");
        assert_eq!(cli.scenario.as_deref(), Some("peak-load"));
        assert_eq!(cli.ticks, 25);
        assert_eq!(cli.seed, Some(7));
        assert_eq!(
            cli.history_out.as_deref().and_then(|p| p.to_str()),
            Some("out.csv")
        );
        assert_eq!(cli.log_format, Some(LogFormat::Json));
    }

    #[test]
    fn feeds_require_realtime() {
        assert!(parse(&["--with-feeds"]).is_err());
        assert!(parse(&["--realtime", "--with-feeds"]).is_ok());
    }

    #[test]
    fn rejects_bad_tick_count() {
        assert!(parse(&["--ticks", "-3"]).is_err());
    }
}
