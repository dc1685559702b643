//! mri_concat: concatenate volumes and optionally reduce across frames
//!
//! Usage:
//!   mri_concat f1.nii.gz f2.nii.gz --o out.nii.gz
//!   mri_concat --i f1.nii --i f2.nii --o mean.nii --mean
//!   mri_concat f*.nii --o diff.nii --paired-diff

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser};
use tracing::debug;

use mri_tools::config::ConcatFlags;
use mri_tools::frames::pipeline::concat_files;
use mri_tools::logging::init_tracing;

const EXAMPLES: &str = "\
EXAMPLES:
  mri_concat --i f1.nii --i f2.nii --o cout.nii
  mri_concat f1.nii f2.nii --o cout.nii
  mri_concat f*.nii --o coutmn.nii --mean
  mri_concat f*.nii --o coutdiff.nii --paired-diff
  mri_concat f*.nii --o coutdiff.nii --paired-diff-norm
  mri_concat f*.nii --o coutdiff.nii --paired-diff-norm1";

#[derive(Parser, Debug)]
#[command(
    name = "mri_concat",
    version,
    about = "Concatenates input data sets",
    arg_required_else_help = true,
    after_help = EXAMPLES
)]
struct Cli {
    /// Input volumes (--i is optional)
    #[arg(value_name = "INVOL")]
    inputs: Vec<PathBuf>,

    /// Input volume, may be repeated
    #[arg(long = "i", value_name = "INVOL")]
    i: Vec<PathBuf>,

    /// Output volume (.nii or .nii.gz)
    #[arg(long = "o", value_name = "OUT")]
    out: Option<PathBuf>,

    /// Compute paired average (1+2, 3+4, etc)
    #[arg(long)]
    paired_avg: bool,

    /// Compute paired difference (1-2, 3-4, etc)
    #[arg(long)]
    paired_diff: bool,

    /// Same as paired-diff but scale by the average of the pair
    #[arg(long)]
    paired_diff_norm: bool,

    /// Same as paired-diff but scale by the first of the pair
    #[arg(long)]
    paired_diff_norm1: bool,

    /// Same as paired-diff but scale by the second of the pair
    #[arg(long)]
    paired_diff_norm2: bool,

    /// Compute mean of concatenated volumes
    #[arg(long)]
    mean: bool,

    /// Compute std of concatenated volumes
    #[arg(long)]
    std: bool,

    /// Compute max of concatenated volumes
    #[arg(long)]
    max: bool,

    /// Paired difference followed by the mean of the differences
    #[arg(long)]
    asl: bool,

    /// Verbose logging
    #[arg(long)]
    debug: bool,
}

/// Positional and --i inputs, in the order they appeared on the command line
fn ordered_inputs(matches: &ArgMatches) -> Vec<PathBuf> {
    let mut tagged: Vec<(usize, PathBuf)> = Vec::new();
    for id in ["inputs", "i"] {
        if let (Some(values), Some(indices)) =
            (matches.get_many::<PathBuf>(id), matches.indices_of(id))
        {
            tagged.extend(indices.zip(values.cloned()));
        }
    }
    tagged.sort_by_key(|(index, _)| *index);
    tagged.into_iter().map(|(_, path)| path).collect()
}

fn main() -> ExitCode {
    let matches = Cli::command().get_matches();
    let cli = match Cli::from_arg_matches(&matches) {
        Ok(cli) => cli,
        Err(err) => err.exit(),
    };
    init_tracing(cli.debug);
    debug!("{:?}", cli);

    let flags = ConcatFlags {
        inputs: ordered_inputs(&matches),
        output: cli.out,
        mean: cli.mean,
        std: cli.std,
        max: cli.max,
        asl: cli.asl,
        paired_avg: cli.paired_avg,
        paired_diff: cli.paired_diff,
        paired_diff_norm: cli.paired_diff_norm,
        paired_diff_norm1: cli.paired_diff_norm1,
        paired_diff_norm2: cli.paired_diff_norm2,
    };

    let result = flags.validate().and_then(|config| concat_files(&config));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            ExitCode::from(1)
        }
    }
}
