use anyhow::Context;
use clap::Parser;
use img_mirror::cli::{Args, Commands, SourceArgs};
use img_mirror::logger::{set_quiet_mode, set_verbose_mode};
use img_mirror::{
    info, load_descriptors, plan_descriptor, print_header, print_summary, resolve_base_url,
    run_batch, HttpFetcher, ImageDescriptor, OutputClaims, RunConfig,
};
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let args = Args::parse();
    set_quiet_mode(args.quiet);
    set_verbose_mode(args.verbose);

    match args.command {
        Commands::Optimize {
            source,
            quality,
            timeout,
            strict,
        } => optimize(source, quality, timeout, strict),
        Commands::Plan { source } => plan(source),
    }
}

fn load(
    source: SourceArgs,
    quality: Option<u8>,
    timeout: Option<u64>,
) -> anyhow::Result<(RunConfig, Vec<ImageDescriptor>)> {
    let base_url = resolve_base_url(source.base_url)?;
    let config = RunConfig::new(base_url, source.output, quality, timeout)?;
    let descriptors = load_descriptors(&source.manifest)
        .with_context(|| format!("loading image list from {}", source.manifest.display()))?;
    Ok((config, descriptors))
}

fn optimize(
    source: SourceArgs,
    quality: Option<u8>,
    timeout: Option<u64>,
    strict: bool,
) -> anyhow::Result<ExitCode> {
    let (config, descriptors) = load(source, quality, timeout)?;
    print_header(&config, descriptors.len());

    std::fs::create_dir_all(&config.output_dir).with_context(|| {
        format!("creating output folder {}", config.output_dir.display())
    })?;

    let fetcher = HttpFetcher::new(config.timeout, config.max_download_size);
    let stats = run_batch(&descriptors, &config, &fetcher).context("optimization aborted")?;
    print_summary(&stats, &config);

    if strict && stats.has_failures() {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}

fn plan(source: SourceArgs) -> anyhow::Result<ExitCode> {
    let (config, descriptors) = load(source, None, None)?;
    info!("📋 {} images from {}", descriptors.len(), config.base_url);

    let mut invalid = 0;
    let mut claims = OutputClaims::default();
    for descriptor in &descriptors {
        match plan_descriptor(descriptor, &config) {
            Ok(planned) => {
                info!(
                    "{}  ->  {}  ({}x{})",
                    planned.url,
                    planned.output_path.display(),
                    planned.width,
                    planned.height
                );
                claims.claim(&descriptor.path, &planned.output_path);
            }
            Err(e) => {
                img_mirror::error!("{}", e);
                invalid += 1;
            }
        }
    }

    if invalid > 0 {
        return Ok(ExitCode::FAILURE);
    }
    Ok(ExitCode::SUCCESS)
}
