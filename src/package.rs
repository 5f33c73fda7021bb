//! Distribution packaging.
//!
//! Bundles a compiled walkthrough into a zip archive that can be unpacked
//! anywhere and opened in a browser:
//!
//! ```text
//! lighthouse.zip
//! ├── lighthouse.html
//! └── images/
//!     ├── boat.png
//!     └── valves.png
//! ```
//!
//! Images are stored under the exact path the markup referenced, which is
//! also the `src` the page uses. Every referenced image must exist relative
//! to the walkthrough source before anything is written.

use crate::config::WalkthroughConfig;
use crate::diagnostic::ParseError;
use crate::generate;
use crate::parser::{Parsed, parse};
use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

#[derive(Error, Debug)]
pub enum PackageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("Referenced image {} does not exist", .0.display())]
    MissingImage(PathBuf),
    #[error("Image path {} must be relative and stay inside the walkthrough directory", .0.display())]
    InvalidImagePath(PathBuf),
}

/// Check that every referenced image is a plain relative path that exists
/// under `base_dir`. Returns the unique paths in reference order.
pub fn verify_images<'a>(
    images: &'a [PathBuf],
    base_dir: &Path,
) -> Result<Vec<&'a Path>, PackageError> {
    let mut seen = HashSet::new();
    let mut unique = Vec::new();
    for image in images {
        if !image
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(PackageError::InvalidImagePath(image.clone()));
        }
        if !base_dir.join(image).is_file() {
            return Err(PackageError::MissingImage(base_dir.join(image)));
        }
        if seen.insert(image.as_path()) {
            unique.push(image.as_path());
        }
    }
    Ok(unique)
}

/// Zip entry name for a relative path, always `/`-separated.
fn entry_name(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Parse `input`, verify its images, and write `output` as a zip holding
/// `{stem}.html` plus every referenced image.
pub fn build(
    input: &Path,
    output: &Path,
    config: &WalkthroughConfig,
) -> Result<Parsed, PackageError> {
    let text = fs::read_to_string(input)?;
    let parsed = parse(&text)?;
    let base_dir = input.parent().unwrap_or_else(|| Path::new("."));
    let images = verify_images(&parsed.document.referenced_images, base_dir)?;

    let stem = input
        .file_stem()
        .map_or_else(|| "walkthrough".into(), |s| s.to_string_lossy());
    let page = generate::render(&parsed.document, config).into_string();

    if let Some(parent) = output.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut zip = ZipWriter::new(File::create(output)?);
    let options = SimpleFileOptions::default();

    zip.start_file(format!("{stem}.html"), options)?;
    zip.write_all(page.as_bytes())?;

    for image in &images {
        zip.start_file(entry_name(image), options)?;
        zip.write_all(&fs::read(base_dir.join(image))?)?;
        tracing::debug!(image = %image.display(), "packaged image");
    }
    zip.finish()?;

    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        images = images.len(),
        "packaged walkthrough"
    );
    Ok(parsed)
}
