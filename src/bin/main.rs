use clap::{Parser, Subcommand};
use crossterm::style::Stylize;
use preeti_core::batch::convert_batch;
use preeti_core::file::{convert_file, OutputFormat};
use preeti_core::persistence::{save_overrides, save_table, OverrideFile};
use preeti_core::{Converter, ConverterConfig, Result};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "preeti-unicode", version, about = "Convert Preeti font text to Unicode (Nepali)")]
struct Cli {
    /// Keep Preeti digit glyphs as ASCII numerals
    #[arg(long, global = true)]
    no_convert_numbers: bool,

    /// JSON override table merged onto the built-in one
    #[arg(long, global = true)]
    overrides: Option<PathBuf>,

    /// Config file (defaults to the platform config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output; repeat for debug
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert text given on the command line
    Text { text: String },
    /// Convert a single file
    File {
        input: PathBuf,
        output: PathBuf,
        /// txt or html; taken from the output extension when omitted
        #[arg(long)]
        output_format: Option<OutputFormat>,
    },
    /// Convert many files into a directory
    Batch {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,
        #[arg(long)]
        output_dir: PathBuf,
        #[arg(long, default_value = "txt")]
        output_format: OutputFormat,
    },
    /// Write the active mapping table as JSON, or as a binary snapshot
    ExportTable {
        path: PathBuf,
        #[arg(long)]
        compiled: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn build_converter(cli: &Cli) -> Result<Converter> {
    let mut config = ConverterConfig::load(cli.config.as_deref())?;
    if cli.no_convert_numbers {
        config.convert_numbers = false;
    }
    if let Some(path) = &cli.overrides {
        config.overrides = Some(path.clone());
    }
    Converter::from_config(&config)
}

/// Ok(false) means the command ran but some work failed.
fn run(cli: Cli) -> Result<bool> {
    let converter = build_converter(&cli)?;

    match cli.command {
        Command::Text { text } => {
            println!("{}", converter.convert(&text));
            Ok(true)
        }
        Command::File {
            input,
            output,
            output_format,
        } => {
            let format = match output_format {
                Some(format) => format,
                None => OutputFormat::from_path(&output)?,
            };
            convert_file(&converter, &input, &output, format)?;
            println!(
                "{} {} -> {}",
                "Converted".green(),
                input.display(),
                output.display()
            );
            Ok(true)
        }
        Command::Batch {
            inputs,
            output_dir,
            output_format,
        } => {
            println!("Found {} files to convert", inputs.len());
            let summary = convert_batch(&converter, &inputs, &output_dir, output_format);
            let line = format!(
                "Conversion completed: {}/{} files successful",
                summary.successful(),
                summary.outcomes.len()
            );
            if summary.all_succeeded() {
                println!("{}", line.green());
            } else {
                println!("{}", line.yellow());
                println!("Failed files:");
                for outcome in summary.failed() {
                    println!(
                        "  - {}: {}",
                        outcome.input.display(),
                        outcome.error.as_deref().unwrap_or("unknown error")
                    );
                }
            }
            Ok(summary.all_succeeded())
        }
        Command::ExportTable { path, compiled } => {
            if compiled {
                save_table(&converter.table, &path)?;
            } else {
                save_overrides(&OverrideFile::from_table(&converter.table), &path)?;
            }
            println!("{} {}", "Wrote".green(), path.display());
            Ok(true)
        }
    }
}
