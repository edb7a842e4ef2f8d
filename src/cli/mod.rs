//! Command-line parsing.
//!
//! The goal of this module is to keep **argument parsing** separate from
//! command dispatch (`app`) and from the numeric code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::MockConfig;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "gridpost", version, about = "Grid-posterior inference for a running-coupling closure")]
pub struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: tracing::Level,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Grid posterior over (gamma, H0_local) from the local and early H0 constraints.
    Infer(InferArgs),
    /// Grid posterior combined with a tabulated dataset and its covariance.
    InferData(InferArgs),
    /// Asimov forecast for the rate coupling from a quadratic rate model.
    Asimov(ConfigArgs),
    /// Solve the closure exponent for a target early/local H0 ratio.
    Calibrate(ConfigArgs),
    /// Generate a synthetic dataset (table + covariance).
    Mock(MockArgs),
}

#[derive(Debug, Args, Clone)]
pub struct InferArgs {
    /// YAML config path.
    #[arg(short, long, value_name = "YAML")]
    pub config: PathBuf,

    /// Output JSON path.
    #[arg(short, long, default_value = "results/posterior.json")]
    pub out: PathBuf,
}

#[derive(Debug, Args, Clone)]
pub struct ConfigArgs {
    /// YAML config path.
    #[arg(short, long, value_name = "YAML")]
    pub config: PathBuf,

    /// Optional output JSON path.
    #[arg(short, long)]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args, Clone)]
pub struct MockArgs {
    /// Redshifts, comma separated.
    #[arg(long, value_delimiter = ',', default_values_t = [0.38, 0.51, 0.61, 1.48])]
    pub z: Vec<f64>,

    /// Coupling used to distort the fiducial.
    #[arg(long, default_value_t = 11.0 / 3.0)]
    pub gamma_true: f64,

    #[arg(long, default_value_t = 11.0 / 3.0)]
    pub gamma_ref: f64,

    #[arg(long, default_value_t = 1.0)]
    pub kappa_b: f64,

    /// Exponent applied to (1+z)^alpha.
    #[arg(long, default_value_t = 0.25)]
    pub p_sensitivity: f64,

    /// Fiducial H0 (km/s/Mpc).
    #[arg(long, default_value_t = 67.4)]
    pub h0: f64,

    #[arg(long, default_value_t = 0.315)]
    pub omega_m: f64,

    /// Fiducial sound horizon (Mpc).
    #[arg(long, default_value_t = 147.09)]
    pub rd_mpc: f64,

    /// Per-point sigma as a fraction of the value.
    #[arg(long, default_value_t = 0.01)]
    pub rel_sigma: f64,

    /// Correlation between neighbouring redshifts.
    #[arg(long, default_value_t = 0.2, allow_negative_numbers = true)]
    pub rho: f64,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Output table (CSV).
    #[arg(long, default_value = "data/mock/bao_mock.csv")]
    pub out_csv: PathBuf,

    /// Output covariance (whitespace matrix).
    #[arg(long, default_value = "data/mock/bao_mock.cov")]
    pub out_cov: PathBuf,
}

impl MockArgs {
    pub fn to_config(&self) -> MockConfig {
        MockConfig {
            z: self.z.clone(),
            h0: self.h0,
            omega_m: self.omega_m,
            rd_mpc: self.rd_mpc,
            gamma_true: self.gamma_true,
            gamma_ref: self.gamma_ref,
            kappa_b: self.kappa_b,
            p_sensitivity: self.p_sensitivity,
            rel_sigma: self.rel_sigma,
            rho: self.rho,
            seed: self.seed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_infer_with_global_log_level() {
        let cli = Cli::try_parse_from(["gridpost", "infer", "--config", "c.yaml", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, tracing::Level::DEBUG);
        match cli.command {
            Command::Infer(args) => {
                assert_eq!(args.config, PathBuf::from("c.yaml"));
                assert_eq!(args.out, PathBuf::from("results/posterior.json"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn mock_defaults_match_library_defaults() {
        let cli = Cli::try_parse_from(["gridpost", "mock"]).unwrap();
        let Command::Mock(args) = cli.command else {
            panic!("expected mock");
        };
        assert_eq!(args.to_config(), MockConfig::default());
    }

    #[test]
    fn mock_accepts_redshift_lists_and_negative_rho() {
        let cli = Cli::try_parse_from(["gridpost", "mock", "--z", "0.2,0.4,0.8", "--rho", "-0.3"]).unwrap();
        let Command::Mock(args) = cli.command else {
            panic!("expected mock");
        };
        assert_eq!(args.z, vec![0.2, 0.4, 0.8]);
        assert_eq!(args.rho, -0.3);
    }
}
