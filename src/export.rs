//! Crop the snapshot and write it to disk as PNG.

use std::path::{Path, PathBuf};

use image::{imageops, ImageFormat, RgbaImage};
use log::info;
use thiserror::Error;

use crate::capture::Snapshot;
use crate::selection::ExportRect;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Saving image '{}' failed.", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("region {rect:?} does not fit the {width}x{height} snapshot")]
    OutOfBounds {
        rect: ExportRect,
        width: u32,
        height: u32,
    },
}

/// Save `rect` of the snapshot to `path`. The written image is exactly
/// `rect.width x rect.height`.
pub fn export(snapshot: &Snapshot, rect: ExportRect, path: &Path) -> Result<(), ExportError> {
    let region = crop(snapshot.image(), rect)?;
    region
        .save_with_format(path, ImageFormat::Png)
        .map_err(|source| ExportError::WriteFailed {
            path: path.to_path_buf(),
            source,
        })?;
    info!(
        "saved {}x{} region at ({}, {}) to {}",
        rect.width,
        rect.height,
        rect.x,
        rect.y,
        path.display()
    );
    Ok(())
}

/// Copy `rect` out of `image` into a new buffer.
pub fn crop(image: &RgbaImage, rect: ExportRect) -> Result<RgbaImage, ExportError> {
    let fits = rect.width > 0
        && rect.height > 0
        && rect.x as u64 + rect.width as u64 <= image.width() as u64
        && rect.y as u64 + rect.height as u64 <= image.height() as u64;
    if !fits {
        return Err(ExportError::OutOfBounds {
            rect,
            width: image.width(),
            height: image.height(),
        });
    }
    Ok(imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image())
}
