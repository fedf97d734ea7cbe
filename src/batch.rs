use crate::config::RunConfig;
use crate::constants::{PROCESSING_PREFIX, SIZE_PREFIX, SUCCESS_PREFIX};
use crate::error::Result;
use crate::fetch::ImageSource;
use crate::manifest::ImageDescriptor;
use crate::processing::{save_webp, WorkingImage};
use crate::utils::{calculate_savings, create_progress_spinner, format_kib, section_rule};
use crate::validation::{mirrored_output_path, validate_descriptor};
use crate::{error, info, verbose, warn};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Outcome of one successfully optimized descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageReport {
    pub url: String,
    pub output_path: PathBuf,
    pub original_size: u64,
    pub optimized_size: u64,
    pub dimensions: (u32, u32),
}

impl ImageReport {
    pub fn savings(&self) -> f64 {
        calculate_savings(self.original_size, self.optimized_size)
    }
}

/// Counters for a whole run. Only the driver updates them, once per
/// descriptor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunStats {
    pub succeeded: usize,
    pub failed: usize,
    pub original_bytes: u64,
    pub optimized_bytes: u64,
    /// Descriptors whose output path was already claimed earlier in the run.
    pub duplicate_outputs: usize,
}

impl RunStats {
    pub fn record_success(&mut self, report: &ImageReport) {
        self.succeeded += 1;
        self.original_bytes += report.original_size;
        self.optimized_bytes += report.optimized_size;
    }

    pub fn record_failure(&mut self) {
        self.failed += 1;
    }

    pub fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    pub fn has_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn overall_savings(&self) -> f64 {
        calculate_savings(self.original_bytes, self.optimized_bytes)
    }
}

/// Where a descriptor will be fetched from and written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedImage {
    pub url: String,
    pub output_path: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Resolves URLs and output paths without touching the network.
pub fn plan_descriptor(descriptor: &ImageDescriptor, config: &RunConfig) -> Result<PlannedImage> {
    validate_descriptor(descriptor)?;
    Ok(PlannedImage {
        url: config.resolve_url(&descriptor.path),
        output_path: mirrored_output_path(&config.output_dir, &descriptor.path)?,
        width: descriptor.width,
        height: descriptor.height,
    })
}

/// Runs fetch -> decode -> shrink -> flatten -> encode/write for one
/// descriptor.
///
/// # Returns
/// * `Ok(report)` - Sizes and final dimensions of the written file
/// * `Err(OptimizeError)` - Check `is_fetch_failure()` to tell a skipped
///   descriptor from a failure that should end the run
pub fn optimize_descriptor<S: ImageSource + ?Sized>(
    descriptor: &ImageDescriptor,
    config: &RunConfig,
    source: &S,
) -> Result<ImageReport> {
    let planned = plan_descriptor(descriptor, config)?;

    info!("\n{} Processing: {}", PROCESSING_PREFIX, descriptor.file_name());
    info!("   URL: {}", planned.url);
    info!("   Target: {}x{}", planned.width, planned.height);

    let pb = create_progress_spinner("Downloading...");
    let started = Instant::now();
    let fetched = source.fetch(&planned.url);
    pb.finish_and_clear();
    let bytes = fetched?;
    verbose!("Downloaded {} bytes in {:?}", bytes.len(), started.elapsed());

    let original_size = bytes.len() as u64;
    info!("   Original size: {}", format_kib(original_size));

    let mut img = WorkingImage::decode(&bytes, &planned.url)?;
    drop(bytes);

    let (width, height) = img.dimensions();
    if img.shrink_to_fit(planned.width, planned.height) {
        let (new_width, new_height) = img.dimensions();
        verbose!(
            "Resized {}x{} -> {}x{}",
            width,
            height,
            new_width,
            new_height
        );
    }
    if img.has_alpha() {
        verbose!("Flattening transparency onto white");
    }
    let img = img.flatten();

    let optimized_size = save_webp(&img, &planned.output_path, config.quality)?;

    let report = ImageReport {
        url: planned.url,
        output_path: planned.output_path,
        original_size,
        optimized_size,
        dimensions: img.dimensions(),
    };

    info!(
        "   {} Saved: {}",
        SUCCESS_PREFIX,
        report.output_path.display()
    );
    info!("   New size: {}", format_kib(report.optimized_size));
    info!("   Savings: {:.1}%", report.savings());
    if report.savings() < 0.0 {
        warn!(
            "{} grew by {:.1}%; the original was already smaller",
            descriptor.file_name(),
            report.savings().abs()
        );
    }

    Ok(report)
}

/// Remembers the output paths claimed so far in one run.
#[derive(Debug, Default)]
pub struct OutputClaims {
    seen: HashSet<PathBuf>,
}

impl OutputClaims {
    /// Records `output_path` and warns when an earlier descriptor already
    /// maps to it. Returns `false` for a repeat.
    pub fn claim(&mut self, source_path: &str, output_path: &Path) -> bool {
        if self.seen.insert(output_path.to_path_buf()) {
            return true;
        }
        warn!(
            "{} writes to {}, overwriting an earlier image with the same output",
            source_path,
            output_path.display()
        );
        false
    }
}

/// Processes every descriptor in order, one at a time.
///
/// A descriptor that fails to download or decode is reported and counted
/// as failed, and the run moves on. Encoding and filesystem errors are
/// returned immediately.
pub fn run_batch<S: ImageSource + ?Sized>(
    descriptors: &[ImageDescriptor],
    config: &RunConfig,
    source: &S,
) -> Result<RunStats> {
    let mut stats = RunStats::default();
    let mut claims = OutputClaims::default();

    for descriptor in descriptors {
        if let Ok(output_path) = mirrored_output_path(&config.output_dir, &descriptor.path) {
            if !claims.claim(&descriptor.path, &output_path) {
                stats.duplicate_outputs += 1;
            }
        }
        match optimize_descriptor(descriptor, config, source) {
            Ok(report) => stats.record_success(&report),
            Err(e) if e.is_fetch_failure() => {
                error!("{}", e);
                stats.record_failure();
            }
            Err(e) => return Err(e),
        }
    }

    Ok(stats)
}

pub fn print_header(config: &RunConfig, image_count: usize) {
    info!("{}", section_rule());
    info!("IMAGE OPTIMIZATION");
    info!("{}", section_rule());
    info!("\nOutput folder: {}/", config.output_dir.display());
    info!("Number of images: {}", image_count);
    info!("Base URL: {}", config.base_url);
}

pub fn print_summary(stats: &RunStats, config: &RunConfig) {
    info!("\n{}", section_rule());
    info!("SUMMARY");
    info!("{}", section_rule());
    info!("{} Succeeded: {}", SUCCESS_PREFIX, stats.succeeded);
    info!("{} Failed: {}", crate::constants::ERROR_PREFIX, stats.failed);
    if stats.duplicate_outputs > 0 {
        info!(
            "⚠️  Overwritten by a later image: {}",
            stats.duplicate_outputs
        );
    }
    if stats.succeeded > 0 {
        info!(
            "{} Total size: {} -> {} ({:.1}% saved)",
            SIZE_PREFIX,
            format_kib(stats.original_bytes),
            format_kib(stats.optimized_bytes),
            stats.overall_savings()
        );
    }
    info!(
        "\nAll optimized files are in: {}/",
        config.output_dir.display()
    );
    info!("\nReplace the original files with the WebP versions and update your HTML/CSS references");
}
