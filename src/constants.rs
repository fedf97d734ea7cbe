pub const DEFAULT_QUALITY: u8 = 85;
pub const MIN_QUALITY: u8 = 1;
pub const MAX_QUALITY: u8 = 100;

/// libwebp `method`: 0 is fastest, 6 compresses best.
pub const WEBP_METHOD: i32 = 6;
pub const OUTPUT_EXTENSION: &str = "webp";

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_OUTPUT_FOLDER: &str = "optimized_images";
pub const DEFAULT_MANIFEST: &str = "images_to_optimize.json";
pub const BASE_URL_ENV: &str = "BASE_URL";

pub const MAX_DOWNLOAD_SIZE: u64 = 100 * 1024 * 1024;
pub const MAX_IMAGE_DIMENSION: u32 = 20_000;

/// Opaque white, the backdrop for flattening transparent pixels.
pub const BACKGROUND_RGB: [u8; 3] = [255, 255, 255];

pub const PROGRESS_SPINNER_TEMPLATE: &str = "{spinner:.green} {msg}";
pub const SPINNER_TICK_MS: u64 = 100;
pub const SECTION_RULE_WIDTH: usize = 80;

pub const PROCESSING_PREFIX: &str = "📥";
pub const SUCCESS_PREFIX: &str = "✅";
pub const ERROR_PREFIX: &str = "❌";
pub const SIZE_PREFIX: &str = "📊";
