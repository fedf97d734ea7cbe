pub mod batch;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod fetch;
pub mod logger;
pub mod manifest;
pub mod processing;
pub mod utils;
pub mod validation;

pub use batch::{
    optimize_descriptor, plan_descriptor, print_header, print_summary, run_batch, ImageReport,
    OutputClaims, PlannedImage, RunStats,
};
pub use config::{resolve_base_url, RunConfig};
pub use error::{OptimizeError, Result};
pub use fetch::{HttpFetcher, ImageSource};
pub use manifest::{load_descriptors, ImageDescriptor};
pub use processing::{save_webp, WorkingImage};
pub use validation::{mirrored_output_path, validate_descriptor};
