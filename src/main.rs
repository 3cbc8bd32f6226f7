//! genext - CLI

use anyhow::{Context, Result};
use clap::Parser;
use genext::util::config::GenextConfig;
use genext::util::logger::{self, LogLevel};
use genext::{instantiate_file, specialize_file, FileSink, StaticArgs, WriterSink, NAME, VERSION};
use owo_colors::OwoColorize;
use std::path::PathBuf;
use std::process::ExitCode;

/// Emit generating extensions for the flagged functions of a JavaScript file
#[derive(Parser, Debug)]
#[command(name = "genext")]
#[command(version = VERSION)]
#[command(about = NAME, long_about = None)]
struct Args {
    /// Subject source file
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Output file (default from config: test.js)
    #[arg(short, long, value_name = "PATH", conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Write the generators to stdout instead of a file
    #[arg(long)]
    stdout: bool,

    /// Truncate the output file instead of appending
    #[arg(long)]
    truncate: bool,

    /// Config file (default: ./genext.toml if present)
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Also run the generators with NAME=JSON static values and print the results
    #[arg(long, value_name = "NAME=JSON")]
    bind: Vec<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Only report errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    logger::init_with_level(LogLevel::from_flags(args.verbose, args.quiet));

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {:#}", "error:".red().bold(), err);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let mut config = GenextConfig::discover(args.config.as_deref())?;
    if let Some(output) = args.output {
        config.output.path = output;
    }
    if args.truncate {
        config.output.append = false;
    }
    // parse bindings before anything is written
    let static_args = StaticArgs::parse_bindings(&args.bind)?;

    let report = if args.stdout {
        let mut sink = WriterSink::new(std::io::stdout().lock(), "stdout");
        specialize_file(&args.file, &config, &mut sink)?
    } else {
        let mut sink = FileSink::open(&config.output.path, config.output.append)
            .context("Failed to open output")?;
        let report = specialize_file(&args.file, &config, &mut sink)?;
        if !report.emitted.is_empty() {
            eprintln!(
                "{} {} generator(s) to {}",
                "wrote".green(),
                report.emitted.len(),
                config.output.path.display()
            );
        }
        report
    };

    for skipped in &report.skipped {
        eprintln!("{} {}: {}", "skipped".yellow(), skipped.name, skipped.reason);
    }

    if !args.bind.is_empty() {
        for (_, text) in instantiate_file(&args.file, &config, &static_args)? {
            print!("{}", text);
        }
    }
    Ok(())
}
