//! rondel-scan: run a radius scan over a serialized table of labeled
//! volumes.
//!
//! Reads a JSON table (one entry per row, each with a key and an
//! optional labeled-volume cell), runs the scan, and writes the
//! two-column output as CSV. Stands in for a host table engine.
//!
//! # Input format
//!
//! ```text
//! [
//!   {
//!     "key": "Row0",
//!     "volume": {
//!       "axes": ["X", "Y", "Z"],
//!       "shape": [3, 3, 2],
//!       "data": [ ...row-major labels... ],
//!       "background": 0
//!     }
//!   },
//!   { "key": "Row1", "volume": null }
//! ]
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use ndarray::ArrayD;
use rondel_pipeline::{
    AxisSelection, AxisTag, BorderKernel, InputRow, LabeledVolume, NullMonitor, OUTPUT_COLUMNS,
    OutputRow, ScanConfig, ScanDriver,
};
use serde::Deserialize;

/// Run a min/max region-radius scan over a JSON table of labeled volumes.
#[derive(Parser)]
#[command(name = "rondel-scan", version)]
struct Cli {
    /// Path to the input JSON table.
    input: PathBuf,

    /// Write CSV output to this file instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// First slicing axis (maps to slice x).
    #[arg(long, value_enum, default_value_t = AxisArg::X)]
    first_axis: AxisArg,

    /// Second slicing axis (maps to slice y).
    #[arg(long, value_enum, default_value_t = AxisArg::Y)]
    second_axis: AxisArg,

    /// Number of worker threads (0 = one per logical CPU).
    #[arg(long, default_value_t = 0)]
    workers: usize,
}

/// clap-side mirror of [`AxisTag`].
#[derive(Debug, Clone, Copy, ValueEnum)]
enum AxisArg {
    X,
    Y,
    Z,
    Time,
    Channel,
}

impl From<AxisArg> for AxisTag {
    fn from(arg: AxisArg) -> Self {
        match arg {
            AxisArg::X => Self::X,
            AxisArg::Y => Self::Y,
            AxisArg::Z => Self::Z,
            AxisArg::Time => Self::Time,
            AxisArg::Channel => Self::Channel,
        }
    }
}

/// One serialized table row.
#[derive(Deserialize)]
struct TableRow {
    key: String,
    volume: Option<VolumeSpec>,
}

/// Serialized labeled volume: row-major label data plus axis metadata.
#[derive(Deserialize)]
struct VolumeSpec {
    axes: Vec<AxisTag>,
    shape: Vec<usize>,
    data: Vec<u32>,
    background: u32,
}

impl VolumeSpec {
    fn into_volume(self) -> Result<LabeledVolume<u32>, String> {
        let data = ArrayD::from_shape_vec(self.shape, self.data)
            .map_err(|e| format!("volume shape does not match data length: {e}"))?;
        LabeledVolume::new(data, self.axes, self.background).map_err(|e| e.to_string())
    }
}

fn run(cli: &Cli) -> Result<(), String> {
    let text = fs::read_to_string(&cli.input)
        .map_err(|e| format!("failed to read {}: {e}", cli.input.display()))?;
    let table: Vec<TableRow> =
        serde_json::from_str(&text).map_err(|e| format!("failed to parse input table: {e}"))?;

    let rows = table
        .into_iter()
        .map(|row| {
            let cell = match row.volume {
                Some(spec) => Some(
                    spec.into_volume()
                        .map_err(|e| format!("row {}: {e}", row.key))?,
                ),
                None => None,
            };
            Ok(InputRow { key: row.key, cell })
        })
        .collect::<Result<Vec<_>, String>>()?;

    let config = ScanConfig {
        axis_selection: AxisSelection::new(cli.first_axis.into(), cli.second_axis.into()),
        worker_threads: cli.workers,
    };
    let driver = ScanDriver::new(config, BorderKernel).map_err(|e| e.to_string())?;

    let mut output: Vec<OutputRow> = Vec::new();
    driver
        .run(rows, &NullMonitor, &mut output)
        .map_err(|e| e.to_string())?;

    let csv = render_csv(&output);
    match &cli.output {
        Some(path) => {
            let mut file = fs::File::create(path)
                .map_err(|e| format!("failed to create {}: {e}", path.display()))?;
            file.write_all(csv.as_bytes())
                .map_err(|e| format!("failed to write {}: {e}", path.display()))?;
        }
        None => print!("{csv}"),
    }
    Ok(())
}

/// Render output rows as CSV with the fixed two-column schema.
/// Missing sentinel values render as empty fields.
fn render_csv(rows: &[OutputRow]) -> String {
    let mut csv = format!("Row Key,{},{}\n", OUTPUT_COLUMNS[0], OUTPUT_COLUMNS[1]);
    for row in rows {
        let min = row.min_radius.map(|v| v.to_string()).unwrap_or_default();
        let max = row.max_radius.map(|v| v.to_string()).unwrap_or_default();
        csv.push_str(&format!("{},{min},{max}\n", row.key));
    }
    csv
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {message}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_csv_header_and_missing_fields() {
        let rows = vec![
            OutputRow::values("Row0_Region1_Slice0".to_owned(), 1.0, 2.5),
            OutputRow::missing("Row1".to_owned()),
        ];
        let csv = render_csv(&rows);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Row Key,Min Radius,Max Radius");
        assert_eq!(lines[1], "Row0_Region1_Slice0,1,2.5");
        assert_eq!(lines[2], "Row1,,");
    }

    #[test]
    fn volume_spec_shape_mismatch_is_rejected() {
        let spec = VolumeSpec {
            axes: vec![AxisTag::X, AxisTag::Y],
            shape: vec![2, 2],
            data: vec![0, 1, 2],
            background: 0,
        };
        assert!(spec.into_volume().is_err());
    }
}
