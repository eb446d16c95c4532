//! athero-prep - training data preparation
//!
//! `clean`: raw patient-parameters export → typed table + summary statistics
//! `impute`: merged dataset → median/mode filled `processed_data.csv`

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};

use athero_core::constants::{APP_NAME, APP_VERSION, DEFAULT_PROCESSED_PATH};
use athero_core::logic::dataset::{
    raw::{self, NUMERIC_COLUMNS},
    stats::{correlation_matrix, describe_table},
    DatasetError, Table,
};

#[derive(Parser)]
#[command(
    name = "athero-prep",
    version,
    about = "Prepare atherosclerosis patient datasets for model training"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean the raw patient-parameters export and print summary statistics
    #[command(about = "Clean a raw export (No, Age, Gender, Height, Weight, Physical Activity)")]
    Clean {
        /// Path to the raw CSV export
        input: PathBuf,

        /// Write the cleaned table here
        #[arg(long)]
        output: Option<PathBuf>,

        /// Rows to show from the top of the table
        #[arg(long, default_value = "5")]
        head: usize,
    },

    /// Fill missing values of a merged dataset
    #[command(about = "Impute nulls (numeric: median, categorical: mode)")]
    Impute {
        /// Path to the merged CSV
        input: PathBuf,

        /// Processed output path
        #[arg(long, default_value = DEFAULT_PROCESSED_PATH)]
        output: PathBuf,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("{} dataset preparation v{}", APP_NAME, APP_VERSION);

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Clean {
            input,
            output,
            head,
        } => clean_command(&input, output.as_deref(), head),
        Commands::Impute { input, output } => impute_command(&input, &output),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn clean_command(input: &Path, output: Option<&Path>, head: usize) -> Result<(), DatasetError> {
    let rows = raw::read_raw(input)?;
    if rows.is_empty() {
        return Err(DatasetError::Empty);
    }

    println!("First {} rows:", head.min(rows.len()));
    println!("{}", raw::RAW_COLUMNS.join(" | "));
    for row in rows.iter().take(head) {
        println!(
            "{} | {} | {} | {} | {} | {}",
            row.no.as_deref().unwrap_or("NaN"),
            fmt_opt(row.age),
            row.gender.as_deref().unwrap_or("NaN"),
            fmt_opt(row.height),
            fmt_opt(row.weight),
            fmt_opt(row.physical_activity),
        );
    }

    println!("\nDataset info: {} rows x {} columns", rows.len(), raw::RAW_COLUMNS.len());

    println!("\nMissing values in each column:");
    for (column, count) in raw::null_counts(&rows) {
        println!("{:20} {}", column, count);
    }

    let series = raw::numeric_series(&rows);
    println!("\nStatistical description of numerical columns:");
    print!("{}", describe_table(&series));

    println!("\nCorrelation matrix ({}):", NUMERIC_COLUMNS.join(", "));
    print!("{}", correlation_matrix(&series));

    if let Some(path) = output {
        raw::write_cleaned(&rows, path)?;
        println!("\nCleaned data saved to '{}'", path.display());
    }

    Ok(())
}

fn impute_command(input: &Path, output: &Path) -> Result<(), DatasetError> {
    let mut table = Table::read(input)?;
    if table.rows.is_empty() {
        return Err(DatasetError::Empty);
    }

    println!("\nNull values in each column:");
    for (column, count) in table.null_counts() {
        println!("{:30} {}", column, count);
    }

    let report = table.impute();
    for fill in &report.fills {
        println!(
            "  {} ({:?}): {} cells <- {}",
            fill.column, fill.kind, fill.filled, fill.value
        );
    }

    table.write(output)?;
    println!(
        "\nData has been processed ({} cells filled) and saved to '{}'",
        report.total_filled(),
        output.display()
    );

    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "NaN".to_string(), |v| v.to_string())
}
