//! Label extraction from segmentation volumes
//!
//! - `extract`: binarise selected labels and accumulate them into one volume
//! - `transform`: LTA / matrix transforms and density mapping into another grid
//! - `lookup`: names of the standard segmentation labels

pub mod extract;
pub mod lookup;
pub mod transform;

pub use extract::{
    binarize_label, extract_label_files, extract_labels, parse_label, validate_sigma,
    ExtractConfig, ExtractOptions, UNIT_VOLUME,
};
pub use lookup::label_name;
pub use transform::{density_map, LinearTransform, TransformSpace};
