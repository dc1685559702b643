//! mri_extract_label: extract a set of labeled voxels from a segmentation
//!
//! Usage: mri_extract_label [options] <input volume> <label 1> <label 2> ... <output name>

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::info;

use mri_tools::error::{MriError, Result};
use mri_tools::labels::{extract_label_files, parse_label, validate_sigma, ExtractConfig};
use mri_tools::logging::init_tracing;

#[derive(Parser, Debug)]
#[command(
    name = "mri_extract_label",
    version,
    disable_version_flag = true,
    about = "This program will extract a set of labeled voxels from an image",
    arg_required_else_help = true
)]
struct Cli {
    /// Apply a Gaussian smoothing kernel with this sigma (voxels)
    #[arg(short = 's', long, default_value_t = 0.0, allow_negative_numbers = true)]
    sigma: f64,

    /// Apply the transform in this LTA or 4x4 matrix file to the extracted volume
    #[arg(short = 't', long = "transform", value_name = "XFORM")]
    transform: Option<PathBuf>,

    /// Shape the output like this volume
    #[arg(long = "out-like", visible_alias = "ol", value_name = "VOLUME")]
    out_like: Option<PathBuf>,

    /// Log the value of one voxel after each step
    #[arg(long = "debug-voxel", num_args = 3, value_names = ["X", "Y", "Z"])]
    debug_voxel: Option<Vec<usize>>,

    /// Log the value at this flat voxel index of the output after each step
    #[arg(short = 'V', value_name = "INDEX")]
    diag_index: Option<usize>,

    /// Verbose logging
    #[arg(long)]
    debug: bool,

    /// Print version
    #[arg(long, action = clap::ArgAction::Version)]
    version: Option<bool>,

    /// <input volume> <label>... <output name>
    #[arg(num_args = 3.., required = true, allow_negative_numbers = true, value_name = "ARGS")]
    args: Vec<String>,
}

impl Cli {
    fn into_config(self) -> Result<ExtractConfig> {
        let sigma = validate_sigma(self.sigma)?;
        let (input, rest) = self.args.split_first().ok_or(MriError::MissingInput)?;
        let (output, labels) = rest.split_last().ok_or(MriError::MissingOutput)?;
        if labels.is_empty() {
            return Err(MriError::InvalidLabel("no labels specified".to_string()));
        }
        let labels = labels.iter().map(|l| parse_label(l)).collect::<Result<Vec<_>>>()?;

        let debug_voxel = match self.debug_voxel.as_deref() {
            Some([x, y, z]) => Some((*x, *y, *z)),
            _ => None,
        };

        Ok(ExtractConfig {
            input: PathBuf::from(input),
            labels,
            output: PathBuf::from(output),
            sigma,
            transform: self.transform,
            out_like: self.out_like,
            debug_voxel,
            diag_index: self.diag_index,
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if cli.sigma != 0.0 {
        info!("applying sigma={:.1} smoothing kernel after extraction...", cli.sigma);
    }
    if let Some(v) = &cli.debug_voxel {
        info!("debugging voxel ({}, {}, {})", v[0], v[1], v[2]);
    }
    if let Some(index) = cli.diag_index {
        info!("diagnostic voxel index {}", index);
    }

    let result = cli.into_config().and_then(|config| extract_label_files(&config));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            ExitCode::from(1)
        }
    }
}
