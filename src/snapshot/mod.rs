// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Flowdeck-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Flowdeck and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Image export of the active diagram.
//!
//! Surface chrome (controls, minimap, tips panel) is hidden for the duration of the capture by a
//! [`ChromeGuard`], which restores it when dropped, so both the success and the failure path
//! leave the surface as it was.

use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use log::{error, info};
use thiserror::Error;

use crate::model::Diagram;
use crate::render::{render_diagram, RenderError, RenderOptions};
use crate::store::{write_document, GatewayError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ChromePart {
    Controls,
    Minimap,
    Panel,
}

impl ChromePart {
    pub const ALL: [ChromePart; 3] = [ChromePart::Controls, ChromePart::Minimap, ChromePart::Panel];
}

/// Non-diagram decorations of the editing surface.
pub trait SurfaceChrome {
    fn is_visible(&self, part: ChromePart) -> bool;
    fn set_visible(&mut self, part: ChromePart, visible: bool);
}

/// Hides every visible chrome part and shows them again on drop.
///
/// Parts that were already hidden stay hidden.
pub struct ChromeGuard<'a, C: SurfaceChrome + ?Sized> {
    chrome: &'a mut C,
    hidden: Vec<ChromePart>,
}

impl<'a, C: SurfaceChrome + ?Sized> ChromeGuard<'a, C> {
    pub fn hide(chrome: &'a mut C) -> Self {
        let mut hidden = Vec::new();
        for part in ChromePart::ALL {
            if chrome.is_visible(part) {
                chrome.set_visible(part, false);
                hidden.push(part);
            }
        }
        Self { chrome, hidden }
    }
}

impl<C: SurfaceChrome + ?Sized> Drop for ChromeGuard<'_, C> {
    fn drop(&mut self) {
        for part in self.hidden.drain(..) {
            self.chrome.set_visible(part, true);
        }
    }
}

#[derive(Debug, Error)]
pub enum EncodingError {
    #[error("failed to rasterize diagram: {0}")]
    Render(#[from] RenderError),
    #[error("image encoder failed: {message}")]
    Encoder { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub media_type: String,
    pub extension: &'static str,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, STANDARD.encode(&self.bytes))
    }
}

/// Turns a diagram into image bytes.
pub trait ImageEncoder {
    fn encode(&self, diagram: &Diagram) -> Result<EncodedImage, EncodingError>;
}

/// Rasterizes the diagram into a UTF-8 character grid.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRasterEncoder {
    options: RenderOptions,
}

impl TextRasterEncoder {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }
}

impl ImageEncoder for TextRasterEncoder {
    fn encode(&self, diagram: &Diagram) -> Result<EncodedImage, EncodingError> {
        let mut text = render_diagram(diagram, self.options)?;
        text.push('\n');
        Ok(EncodedImage {
            media_type: "text/plain;charset=utf-8".to_owned(),
            extension: "txt",
            bytes: text.into_bytes(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageExport {
    pub file_name: String,
    pub data_url: String,
    pub image: EncodedImage,
}

/// File name for the image of the question at zero-based `question_index`.
pub fn image_file_name(question_index: usize, extension: &str) -> String {
    format!("flowchart-question-{}.{extension}", question_index + 1)
}

/// Captures `diagram` with the surface chrome hidden.
pub fn export_image<C: SurfaceChrome + ?Sized>(
    diagram: &Diagram,
    question_index: usize,
    chrome: &mut C,
    encoder: &dyn ImageEncoder,
) -> Result<ImageExport, EncodingError> {
    let _guard = ChromeGuard::hide(chrome);
    let image = encoder.encode(diagram).map_err(|err| {
        error!(err:err, slot = question_index; "image export failed");
        err
    })?;

    let file_name = image_file_name(question_index, image.extension);
    info!(file_name, bytes = image.bytes.len(); "exported diagram image");
    Ok(ImageExport {
        file_name,
        data_url: image.data_url(),
        image,
    })
}

/// Writes the exported image into `dir` and returns its path.
pub fn save_image(dir: &Path, export: &ImageExport) -> Result<PathBuf, GatewayError> {
    let path = dir.join(&export.file_name);
    write_document(&path, &export.image.bytes)?;
    Ok(path)
}
