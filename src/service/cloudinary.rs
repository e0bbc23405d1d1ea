use serde::{Deserialize, Serialize};
use sha1::{Digest, Sha1};
use thiserror::Error;

use crate::config::Config;

const UPLOAD_FOLDER: &str = "real_estate";

#[derive(Error, Debug)]
pub enum CloudinaryError {
    #[error("Cloudinary credentials are not configured")]
    NotConfigured,

    #[error("Image not found")]
    NotFound,

    #[error("Upload error: {0}")]
    Upload(String),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadedImage {
    pub secure_url: String,
    pub public_id: String,
}

#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Clone)]
pub struct CloudinaryClient {
    client: reqwest::Client,
    cloud_name: String,
    api_key: String,
    api_secret: String,
}

impl std::fmt::Debug for CloudinaryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CloudinaryClient")
            .field("cloud_name", &self.cloud_name)
            .field("api_key", &"****")
            .finish()
    }
}

impl CloudinaryClient {
    pub fn from_config(config: &Config) -> Self {
        CloudinaryClient {
            client: reqwest::Client::new(),
            cloud_name: config.cloudinary_cloud_name.clone(),
            api_key: config.cloudinary_api_key.clone(),
            api_secret: config.cloudinary_api_secret.clone(),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.cloud_name.is_empty() && !self.api_key.is_empty() && !self.api_secret.is_empty()
    }

    fn ensure_configured(&self) -> Result<(), CloudinaryError> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(CloudinaryError::NotConfigured)
        }
    }

    /// Parameters sorted alphabetically, joined as key=value pairs.
    fn string_to_sign(params: &[(&str, &str)]) -> String {
        let mut sorted: Vec<&(&str, &str)> = params.iter().collect();
        sorted.sort_by_key(|(key, _)| *key);
        sorted
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<String>>()
            .join("&")
    }

    fn sign(&self, params: &[(&str, &str)]) -> String {
        let mut hasher = Sha1::new();
        hasher.update(Self::string_to_sign(params).as_bytes());
        hasher.update(self.api_secret.as_bytes());
        hex::encode(hasher.finalize())
    }

    /// Uploads the file under the fixed folder, re-using the file name so a
    /// re-upload of the same name overwrites instead of duplicating.
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
    ) -> Result<UploadedImage, CloudinaryError> {
        self.ensure_configured()?;

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.sign(&[
            ("folder", UPLOAD_FOLDER),
            ("overwrite", "true"),
            ("timestamp", timestamp.as_str()),
            ("unique_filename", "false"),
            ("use_filename", "true"),
        ]);

        let form = reqwest::multipart::Form::new()
            .part(
                "file",
                reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string()),
            )
            .text("api_key", self.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", UPLOAD_FOLDER)
            .text("overwrite", "true")
            .text("unique_filename", "false")
            .text("use_filename", "true")
            .text("signature", signature);

        let response = self
            .client
            .post(format!(
                "https://api.cloudinary.com/v1_1/{}/image/upload",
                self.cloud_name
            ))
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CloudinaryError::Upload(Self::upstream_message(&body)));
        }

        Ok(response.json::<UploadedImage>().await?)
    }

    /// Deletes a hosted asset by its public id.
    pub async fn destroy(&self, public_id: &str) -> Result<(), CloudinaryError> {
        self.ensure_configured()?;

        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = self.sign(&[("public_id", public_id), ("timestamp", timestamp.as_str())]);

        let response = self
            .client
            .post(format!(
                "https://api.cloudinary.com/v1_1/{}/image/destroy",
                self.cloud_name
            ))
            .form(&[
                ("public_id", public_id),
                ("api_key", self.api_key.as_str()),
                ("timestamp", timestamp.as_str()),
                ("signature", signature.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CloudinaryError::Upload(Self::upstream_message(&body)));
        }

        let destroyed = response.json::<DestroyResponse>().await?;
        match destroyed.result.as_str() {
            "ok" => Ok(()),
            "not found" => Err(CloudinaryError::NotFound),
            other => Err(CloudinaryError::Upload(other.to_string())),
        }
    }

    /// Pulls the error message out of a Cloudinary error body, falling back
    /// to the raw body.
    fn upstream_message(body: &str) -> String {
        serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("error")
                    .and_then(|error| error.get("message"))
                    .and_then(|message| message.as_str())
                    .map(|message| message.to_string())
            })
            .unwrap_or_else(|| body.to_string())
    }
}

/// Derives the public id (folder included) from a hosted delivery URL.
/// Returns None for URLs that do not point at the media host.
pub fn public_id_from_url(url: &str) -> Option<String> {
    if !url.contains("res.cloudinary.com") {
        return None;
    }

    let path = url.split("/upload/").nth(1)?;
    let segments: Vec<&str> = path
        .split('/')
        .filter(|segment| {
            // Skip the version segment (v1712345) and transformation flags
            !(segment.starts_with('v')
                && segment.len() > 1
                && segment[1..].chars().all(|c| c.is_ascii_digit()))
        })
        .collect();

    if segments.is_empty() {
        return None;
    }

    let mut public_id = segments.join("/");
    if let Some(dot) = public_id.rfind('.') {
        public_id.truncate(dot);
    }

    if public_id.is_empty() {
        None
    } else {
        Some(public_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client(secret: &str) -> CloudinaryClient {
        CloudinaryClient {
            client: reqwest::Client::new(),
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: secret.to_string(),
        }
    }

    #[test]
    fn string_to_sign_sorts_params_alphabetically() {
        let joined = CloudinaryClient::string_to_sign(&[
            ("use_filename", "true"),
            ("folder", "real_estate"),
            ("timestamp", "1700000000"),
        ]);
        assert_eq!(joined, "folder=real_estate&timestamp=1700000000&use_filename=true");
    }

    #[test]
    fn sign_appends_the_api_secret() {
        // SHA-1 of "abc" is a well-known vector
        let signature = test_client("abc").sign(&[]);
        assert_eq!(signature, "a9993e364706816aba3e25717850c26c9cd0d89d");
    }

    #[test]
    fn sign_is_deterministic_and_secret_dependent() {
        let params = [("public_id", "real_estate/villa"), ("timestamp", "1700000000")];
        let first = test_client("secret").sign(&params);
        let second = test_client("secret").sign(&params);
        assert_eq!(first, second);
        assert_ne!(first, test_client("other").sign(&params));
    }

    #[tokio::test]
    async fn unconfigured_client_refuses_before_any_request() {
        let client = test_client("");
        let result = client.upload(vec![1, 2, 3], "villa.jpg").await;
        assert!(matches!(result, Err(CloudinaryError::NotConfigured)));

        let result = client.destroy("real_estate/villa").await;
        assert!(matches!(result, Err(CloudinaryError::NotConfigured)));
    }

    #[test]
    fn public_id_is_derived_from_hosted_urls() {
        assert_eq!(
            public_id_from_url(
                "https://res.cloudinary.com/demo/image/upload/v1712345/real_estate/villa.jpg"
            ),
            Some("real_estate/villa".to_string())
        );
        assert_eq!(
            public_id_from_url("https://res.cloudinary.com/demo/image/upload/real_estate/flat.png"),
            Some("real_estate/flat".to_string())
        );
    }

    #[test]
    fn foreign_urls_are_not_hosted_assets() {
        assert_eq!(public_id_from_url("http://x/a.jpg"), None);
        assert_eq!(public_id_from_url(""), None);
    }
}
