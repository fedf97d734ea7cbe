use crate::constants::OUTPUT_EXTENSION;
use crate::error::{OptimizeError, Result};
use crate::manifest::ImageDescriptor;
use std::path::{Component, Path, PathBuf};

/// Rejects descriptors that cannot be fetched or would write outside the
/// output root.
pub fn validate_descriptor(descriptor: &ImageDescriptor) -> Result<()> {
    if descriptor.width == 0 || descriptor.height == 0 {
        return Err(OptimizeError::InvalidDescriptor(format!(
            "{}: target size {}x{} must be non-zero",
            descriptor.path, descriptor.width, descriptor.height
        )));
    }

    let relative = relative_source_path(&descriptor.path);
    if relative.as_os_str().is_empty() {
        return Err(OptimizeError::InvalidDescriptor(
            "empty image path".to_string(),
        ));
    }

    for component in relative.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            _ => {
                return Err(OptimizeError::InvalidDescriptor(format!(
                    "{}: path escapes the output directory",
                    descriptor.path
                )))
            }
        }
    }

    Ok(())
}

/// The descriptor path without leading slashes, query or fragment.
fn relative_source_path(source_path: &str) -> &Path {
    let without_query = source_path
        .split(|c: char| c == '?' || c == '#')
        .next()
        .unwrap_or(source_path);
    Path::new(without_query.trim_start_matches('/'))
}

/// Maps `/img/photos/a.png` to `<output_root>/img/photos/a.webp`.
pub fn mirrored_output_path(output_root: &Path, source_path: &str) -> Result<PathBuf> {
    let relative = relative_source_path(source_path);
    let stem = relative.file_stem().ok_or_else(|| {
        OptimizeError::InvalidDescriptor(format!("{}: no file name", source_path))
    })?;

    let file_name = format!("{}.{}", stem.to_string_lossy(), OUTPUT_EXTENSION);
    let output_path = match relative.parent() {
        Some(dir) => output_root.join(dir).join(file_name),
        None => output_root.join(file_name),
    };
    Ok(output_path)
}
