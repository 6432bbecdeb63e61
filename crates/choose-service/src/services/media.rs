//! Media intake
//!
//! Uploaded images are decoded, shrunk to the configured maximum width,
//! re-encoded in the configured default format and stored under a generated
//! name. Polls and options refer to stored media by that name.

use std::io::Cursor;

use chrono::Utc;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::dto::{MediaRef, MediaResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Random component plus the millisecond timestamp; the upload's own file name is ignored.
pub fn generate_name(extension: &str) -> String {
    format!(
        "{}_{}.{}",
        Uuid::new_v4().simple(),
        Utc::now().timestamp_millis(),
        extension
    )
}

/// Downsample to `max_width`, keeping the aspect ratio. Narrower images are returned as-is.
pub fn resize(image: DynamicImage, max_width: u32) -> DynamicImage {
    let (width, height) = (image.width(), image.height());
    if width <= max_width {
        return image;
    }
    let new_height = (f64::from(height) * f64::from(max_width) / f64::from(width)).round() as u32;
    image.resize_exact(max_width, new_height.max(1), FilterType::Lanczos3)
}

#[derive(Debug)]
enum ProcessError {
    Decode(image::ImageError),
    Encode(image::ImageError),
}

fn process(bytes: &[u8], max_width: u32, format: ImageFormat) -> Result<Vec<u8>, ProcessError> {
    let decoded = image::load_from_memory(bytes).map_err(ProcessError::Decode)?;
    let resized = resize(decoded, max_width);

    // JPEG has no alpha channel
    let output = if format == ImageFormat::Jpeg {
        DynamicImage::ImageRgb8(resized.to_rgb8())
    } else {
        resized
    };

    let mut encoded = Cursor::new(Vec::new());
    output
        .write_to(&mut encoded, format)
        .map_err(ProcessError::Encode)?;
    Ok(encoded.into_inner())
}

fn wrong_format(detail: impl std::fmt::Display) -> ServiceError {
    ServiceError::validation(format!("Wrong image format. {detail}"))
}

/// Media intake service
pub struct MediaService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MediaService<'a> {
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Store an uploaded image and return its name and URL.
    ///
    /// `declared_type` is the request's content type, when it sent one.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn accept_image(
        &self,
        bytes: Vec<u8>,
        declared_type: Option<&str>,
    ) -> ServiceResult<MediaResponse> {
        if let Some(declared) = declared_type {
            if !declared.starts_with("image/") {
                return Err(wrong_format(format!(
                    "Unsupported media type \"{declared}\"."
                )));
            }
        }

        let config = self.ctx.media();
        let extension = config.image_default_extension.to_ascii_lowercase();
        let format = ImageFormat::from_extension(&extension).ok_or_else(|| {
            ServiceError::internal(format!("no image encoder for extension {extension}"))
        })?;
        let max_width = config.image_max_width;

        let encoded = tokio::task::spawn_blocking(move || process(&bytes, max_width, format))
            .await
            .map_err(|e| ServiceError::internal(e.to_string()))?
            .map_err(|e| match e {
                ProcessError::Decode(e) => {
                    warn!(error = %e, "Rejected upload");
                    wrong_format(e)
                }
                ProcessError::Encode(e) => ServiceError::internal(format!("encode failed: {e}")),
            })?;

        let name = generate_name(&extension);
        let store = self.ctx.object_store();
        if let Err(e) = store.write(&name, &encoded).await {
            error!(name = %name, error = %e, "Failed to store image");
            if let Err(cleanup) = store.delete(&name).await {
                warn!(name = %name, error = %cleanup, "Failed to remove partial image");
            }
            return Err(e.into());
        }

        info!(name = %name, size = encoded.len(), "Image stored");
        Ok(MediaResponse::resolve(&name, store))
    }

    /// Read stored bytes for serving
    #[instrument(skip(self))]
    pub async fn open(&self, name: &str) -> ServiceResult<Vec<u8>> {
        Ok(self.ctx.object_store().open(name).await?)
    }

    /// A referenced media name must exist in the store
    pub async fn require(&self, field: &'static str, media: &MediaRef) -> ServiceResult<()> {
        if self.ctx.object_store().exists(&media.name).await? {
            Ok(())
        } else {
            Err(ServiceError::invalid_field(
                field,
                format!("Media \"{}\" does not exist.", media.name),
            ))
        }
    }
}

/// Remove stored media that no poll or option refers to any more.
///
/// Names are shared freely between polls, so each one is checked against the
/// remaining references first. Failures are only logged.
pub(crate) async fn discard(ctx: &ServiceContext, names: &[String]) {
    let mut names = names.to_vec();
    names.sort_unstable();
    names.dedup();

    let in_use = match ctx.poll_repo().media_in_use(&names).await {
        Ok(in_use) => in_use,
        Err(e) => {
            warn!(error = %e, "Could not check media references, keeping files");
            return;
        }
    };

    for name in names.iter().filter(|name| !in_use.contains(name)) {
        if let Err(e) = ctx.object_store().delete(name).await {
            warn!(name = %name, error = %e, "Failed to remove stored media");
        }
    }
}
