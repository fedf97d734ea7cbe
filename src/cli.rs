use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

use crate::constants::{DEFAULT_MANIFEST, DEFAULT_OUTPUT_FOLDER};

#[derive(Parser)]
#[command(
    name = "img-mirror",
    about = "Download remote images, shrink them to their display size and save them as WebP",
    long_about = "img-mirror reads a JSON list of image paths with their display sizes, downloads each \
                  original from a base URL, shrinks it to fit (never enlarging), flattens transparency \
                  onto white and writes a lossy WebP into a local folder that mirrors the remote paths.",
    version,
    after_help = "EXAMPLES:\n  \
    BASE_URL=https://example.com img-mirror optimize\n  \
    img-mirror optimize -m images.json -o ./optimized -b https://example.com --strict\n  \
    img-mirror plan -m images.json -b https://example.com"
)]
pub struct Args {
    #[arg(
        short = 'Q',
        long,
        global = true,
        help = "Only print errors"
    )]
    pub quiet: bool,

    #[arg(
        short = 'v',
        long,
        global = true,
        help = "Print extra detail (download timing, resize dimensions)"
    )]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every subcommand that reads a manifest.
#[derive(ClapArgs, Debug, Clone)]
pub struct SourceArgs {
    #[arg(
        short = 'm',
        long,
        default_value = DEFAULT_MANIFEST,
        help = "JSON manifest of images to optimize",
        long_help = "JSON array of objects with `path`, `width` and `height`, e.g. \
                     [{\"path\": \"/img/a.png\", \"width\": 800, \"height\": 600}]"
    )]
    pub manifest: PathBuf,

    #[arg(
        short = 'o',
        long,
        default_value = DEFAULT_OUTPUT_FOLDER,
        help = "Output folder for optimized images"
    )]
    pub output: PathBuf,

    #[arg(
        short = 'b',
        long,
        help = "Base URL the manifest paths are resolved against",
        long_help = "Base URL the manifest paths are appended to. \
                     Falls back to the BASE_URL environment variable, which may also come from a .env file."
    )]
    pub base_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(
        about = "Download, resize and convert every image in the manifest",
        long_about = "Process the manifest in order. Images that fail to download or decode are \
                      reported and skipped; the run continues with the next one."
    )]
    Optimize {
        #[command(flatten)]
        source: SourceArgs,

        #[arg(
            short = 'q',
            long,
            help = "WebP quality (1-100, default: 85)"
        )]
        quality: Option<u8>,

        #[arg(
            short = 't',
            long,
            help = "HTTP timeout per download in seconds (default: 30)"
        )]
        timeout: Option<u64>,

        #[arg(
            long,
            help = "Exit with status 1 if any image failed",
            long_help = "By default the run exits 0 even when some images failed. \
                         With --strict any failure makes the exit status 1."
        )]
        strict: bool,
    },

    #[command(
        about = "Show where each image would be fetched from and written to",
        long_about = "Dry run: resolve every manifest entry to its download URL and output path \
                      without any network access."
    )]
    Plan {
        #[command(flatten)]
        source: SourceArgs,
    },
}
