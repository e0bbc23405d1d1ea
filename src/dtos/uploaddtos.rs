use serde::{Deserialize, Serialize};

use crate::service::cloudinary::UploadedImage;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponseDto {
    pub url: String,
    pub public_id: String,
}

impl From<UploadedImage> for UploadResponseDto {
    fn from(uploaded: UploadedImage) -> Self {
        UploadResponseDto {
            url: uploaded.secure_url,
            public_id: uploaded.public_id,
        }
    }
}
