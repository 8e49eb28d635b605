use crate::config::Settings;
use crate::error::UploadError;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// A file picked in the upload widget
#[derive(Debug, Clone)]
pub struct ImageFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Reject non-images and anything over [`MAX_IMAGE_BYTES`] before uploading.
pub fn validate_image(file: &ImageFile) -> Result<(), UploadError> {
    if !file.mime_type.to_ascii_lowercase().starts_with("image/") {
        return Err(UploadError::InvalidType {
            file_name: file.file_name.clone(),
            mime_type: file.mime_type.clone(),
        });
    }
    if file.bytes.len() > MAX_IMAGE_BYTES {
        return Err(UploadError::TooLarge {
            file_name: file.file_name.clone(),
            size: file.bytes.len(),
            limit: MAX_IMAGE_BYTES,
        });
    }
    Ok(())
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Unsigned uploads to a Cloudinary preset
pub struct CloudinaryUploader {
    client: Client,
    cloud_name: String,
    preset: String,
    folder: Option<String>,
}

impl CloudinaryUploader {
    pub fn from_settings(settings: &Settings) -> Result<Self, UploadError> {
        let cloud_name = settings
            .cloudinary_cloud
            .clone()
            .ok_or(UploadError::ConfigMissing("CLOUDINARY_CLOUD_NAME"))?;
        let preset = settings
            .cloudinary_preset
            .clone()
            .ok_or(UploadError::ConfigMissing("CLOUDINARY_UPLOAD_PRESET"))?;
        let client = Client::builder().timeout(settings.http_timeout()).build()?;

        Ok(Self {
            client,
            cloud_name,
            preset,
            folder: None,
        })
    }

    pub fn with_folder(mut self, folder: &str) -> Self {
        self.folder = Some(folder.to_string());
        self
    }

    fn upload_url(&self) -> String {
        format!(
            "https://api.cloudinary.com/v1_1/{}/image/upload",
            self.cloud_name
        )
    }

    /// Upload one image and return its permanent HTTPS URL.
    pub async fn upload(&self, file: &ImageFile) -> Result<String, UploadError> {
        validate_image(file)?;
        debug!("Uploading {} ({} bytes)", file.file_name, file.bytes.len());

        let part = Part::bytes(file.bytes.clone())
            .file_name(file.file_name.clone())
            .mime_str(&file.mime_type)?;
        let mut form = Form::new()
            .part("file", part)
            .text("upload_preset", self.preset.clone());
        if let Some(folder) = &self.folder {
            form = form.text("folder", folder.clone());
        }

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            warn!("Image host returned status: {}", response.status());
            return Err(UploadError::Backend(format!("status {}", response.status())));
        }

        let body: UploadResponse = response.json().await?;
        info!("Uploaded {} to {}", file.file_name, body.secure_url);
        Ok(body.secure_url)
    }

    /// Upload in order; stops at the first failure.
    pub async fn upload_all(&self, files: &[ImageFile]) -> Result<Vec<String>, UploadError> {
        // validate everything first so a bad last file doesn't leave orphans
        for file in files {
            validate_image(file)?;
        }
        let mut urls = Vec::with_capacity(files.len());
        for file in files {
            urls.push(self.upload(file).await?);
        }
        Ok(urls)
    }
}
