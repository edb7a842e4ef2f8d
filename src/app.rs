//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments and installs the log subscriber
//! - runs the command pipeline
//! - prints the terminal summary
//! - writes the JSON result

use std::path::Path;

use clap::Parser;

use crate::cli::{Cli, Command, ConfigArgs, InferArgs, MockArgs};
use crate::error::AppError;
use crate::io::write_json;

pub mod pipeline;

/// Entry point for the `gridpost` binary.
pub fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    match cli.command {
        Command::Infer(args) => handle_infer(args),
        Command::InferData(args) => handle_infer_data(args),
        Command::Asimov(args) => handle_asimov(args),
        Command::Calibrate(args) => handle_calibrate(args),
        Command::Mock(args) => handle_mock(args),
    }
}

fn handle_infer(args: InferArgs) -> Result<(), AppError> {
    let result = pipeline::run_infer(&args.config)?;
    println!("{}", crate::report::format_inference_summary(&args.config, &result));
    write_json(&args.out, &result)?;
    print_wrote(&args.out);
    Ok(())
}

fn handle_infer_data(args: InferArgs) -> Result<(), AppError> {
    let run = pipeline::run_infer_data(&args.config)?;
    println!("{}", crate::report::format_dataset_summary(&args.config, &run.result));
    if !run.row_errors.is_empty() {
        println!("skipped {} malformed dataset row(s)", run.row_errors.len());
    }
    write_json(&args.out, &run.result)?;
    print_wrote(&args.out);
    Ok(())
}

fn handle_asimov(args: ConfigArgs) -> Result<(), AppError> {
    let (config, result) = pipeline::run_asimov(&args.config)?;
    println!("{}", crate::report::format_asimov_summary(&args.config, &config, &result));
    if let Some(out) = &args.out {
        write_json(out, &result)?;
        print_wrote(out);
    }
    Ok(())
}

fn handle_calibrate(args: ConfigArgs) -> Result<(), AppError> {
    let (config, result) = pipeline::run_calibrate(&args.config)?;
    println!(
        "{}",
        crate::report::format_calibration_summary(&args.config, &config, &result)
    );
    if let Some(out) = &args.out {
        write_json(out, &result)?;
        print_wrote(out);
    }
    Ok(())
}

fn handle_mock(args: MockArgs) -> Result<(), AppError> {
    let config = args.to_config();
    let mock = pipeline::run_mock(&config, &args.out_csv, &args.out_cov)?;
    println!(
        "{}",
        crate::report::format_mock_summary(&config, &mock, &args.out_csv, &args.out_cov)
    );
    Ok(())
}

fn print_wrote(path: &Path) {
    println!("wrote: {}", path.display());
}
