use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use rayon::prelude::*;
use sheetcsv_core::ConverterConfig;
use std::collections::HashSet;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "sheetcsv")]
#[command(about = "Convert the first sheet of Excel/ODS files to CSV", long_about = None)]
#[command(version)]
struct Cli {
    /// Paths to the Excel/ODS files (prompted for when omitted)
    #[arg(value_name = "FILE")]
    files: Vec<PathBuf>,

    /// Output CSV file (single input only)
    #[arg(short, long, value_name = "FILE", conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Path to configuration file (TOML)
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Write CSV to standard output instead of a file (single input only)
    #[arg(long)]
    stdout: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    // Load configuration
    let config = if let Some(config_path) = &cli.config {
        ConverterConfig::from_file(config_path)
            .with_context(|| format!("Failed to load config from {}", config_path.display()))?
    } else {
        // Try to load default config from current directory if it exists
        let default_config_path = PathBuf::from("sheetcsv.toml");
        if default_config_path.exists() {
            ConverterConfig::from_file(&default_config_path).with_context(|| {
                format!(
                    "Failed to load config from {}",
                    default_config_path.display()
                )
            })?
        } else {
            ConverterConfig::default()
        }
    };

    let files = if cli.files.is_empty() {
        match prompt_for_path()? {
            Some(path) => vec![path],
            None => {
                println!("No file path provided. Exiting...");
                return Ok(());
            }
        }
    } else {
        cli.files
    };

    check_single_input(&files, cli.output.is_some(), cli.stdout)?;

    if cli.stdout {
        let csv = read_and_convert(&files[0])?;
        io::stdout().lock().write_all(&csv)?;
        return Ok(());
    }

    let jobs = plan_targets(&files, cli.output.as_deref(), &config)?;

    // Each file owns its own workbook and target, so conversions run independently
    let results: Vec<(PathBuf, Result<PathBuf>)> = jobs
        .into_par_iter()
        .map(|(input, target)| {
            let result = convert_to_file(&input, &target, config.output.overwrite).map(|_| target);
            (input, result)
        })
        .collect();

    let mut failures = 0;
    for (input, result) in &results {
        match result {
            Ok(target) => println!("CSV file saved to: {}", target.display()),
            Err(e) => {
                failures += 1;
                eprintln!(
                    "{} {}: {:#}",
                    "Error:".red().bold(),
                    input.display(),
                    e
                );
            }
        }
    }

    if failures > 0 {
        anyhow::bail!("{} of {} file(s) failed to convert", failures, results.len());
    }

    Ok(())
}

fn prompt_for_path() -> Result<Option<PathBuf>> {
    print!("Enter path to Excel file: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let line = line.trim();
    Ok(if line.is_empty() {
        None
    } else {
        Some(PathBuf::from(line))
    })
}

fn check_single_input(files: &[PathBuf], has_output: bool, to_stdout: bool) -> Result<()> {
    if files.len() > 1 && (has_output || to_stdout) {
        anyhow::bail!("--output and --stdout accept a single input file");
    }
    Ok(())
}

/// Pair each input with its CSV target, rejecting inputs that share a target
fn plan_targets(
    files: &[PathBuf],
    output: Option<&Path>,
    config: &ConverterConfig,
) -> Result<Vec<(PathBuf, PathBuf)>> {
    let mut seen = HashSet::new();
    let mut jobs = Vec::with_capacity(files.len());

    for input in files {
        let target = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| config.output_path_for(input));
        if !seen.insert(target.clone()) {
            anyhow::bail!(
                "Several inputs would be written to {}",
                target.display()
            );
        }
        jobs.push((input.clone(), target));
    }

    Ok(jobs)
}

fn read_and_convert(input: &Path) -> Result<Vec<u8>> {
    let document =
        fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    log::info!("Converting {} ({} bytes)", input.display(), document.len());
    sheetcsv_core::convert_to_csv(&document)
        .with_context(|| format!("Failed to convert {}", input.display()))
}

fn convert_to_file(input: &Path, target: &Path, overwrite: bool) -> Result<()> {
    if !overwrite && target.exists() {
        anyhow::bail!(
            "Output file already exists: {} (set output.overwrite = true to replace it)",
            target.display()
        );
    }

    let csv = read_and_convert(input)?;
    write_csv(target, &csv)
}

fn write_csv(target: &Path, csv: &[u8]) -> Result<()> {
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }
    fs::write(target, csv).with_context(|| format!("Failed to write {}", target.display()))?;
    Ok(())
}
