use anyhow::Context;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use sha2::{Digest, Sha256};
use std::time::Duration;

use crate::core::config::{S3Settings, Settings};

pub(crate) const PDF_CONTENT_TYPE: &str = "application/pdf";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PaperDocument {
    Paper,
    AnswerKey,
}

impl PaperDocument {
    pub(crate) const ALL: [Self; 2] = [Self::Paper, Self::AnswerKey];

    fn file_name(self) -> &'static str {
        match self {
            Self::Paper => "paper.pdf",
            Self::AnswerKey => "key.pdf",
        }
    }
}

pub(crate) fn paper_object_key(paper_id: &str, document: PaperDocument) -> String {
    format!("papers/{paper_id}/{}", document.file_name())
}

#[derive(Debug, Clone)]
pub(crate) struct StoredObject {
    pub(crate) key: String,
    pub(crate) url: String,
    pub(crate) size: i64,
    pub(crate) sha256: String,
}

#[derive(Debug, Clone)]
pub(crate) struct StorageService {
    client: Client,
    settings: S3Settings,
}

impl StorageService {
    pub(crate) async fn from_settings(settings: &Settings) -> anyhow::Result<Option<Self>> {
        if !settings.s3().is_configured() {
            return Ok(None);
        }

        let creds = Credentials::new(
            settings.s3().access_key.clone(),
            settings.s3().secret_key.clone(),
            None,
            None,
            "examly-static",
        );

        let config = aws_config::defaults(BehaviorVersion::latest())
            .endpoint_url(settings.s3().endpoint.clone())
            .region(aws_config::Region::new(settings.s3().region.clone()))
            .credentials_provider(creds)
            .load()
            .await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config).force_path_style(true).build();
        let client = Client::from_conf(s3_config);

        Ok(Some(Self { client, settings: settings.s3().clone() }))
    }

    pub(crate) async fn presign_get(
        &self,
        key: &str,
        expires_in: Duration,
    ) -> anyhow::Result<String> {
        let presigned = self
            .client
            .get_object()
            .bucket(&self.settings.bucket)
            .key(key)
            .presigned(PresigningConfig::expires_in(expires_in)?)
            .await?;

        Ok(presigned.uri().to_string())
    }

    pub(crate) async fn upload_pdf(
        &self,
        paper_id: &str,
        document: PaperDocument,
        bytes: Vec<u8>,
    ) -> anyhow::Result<StoredObject> {
        let key = paper_object_key(paper_id, document);
        let size = bytes.len() as i64;
        let sha256 = hex::encode(Sha256::digest(&bytes));

        self.client
            .put_object()
            .bucket(&self.settings.bucket)
            .key(&key)
            .content_type(PDF_CONTENT_TYPE)
            .body(ByteStream::from(bytes))
            .send()
            .await?;

        tracing::info!(key = %key, size, sha256 = %sha256, "Uploaded PDF to object storage");

        let url = self.settings.object_url(&key);
        Ok(StoredObject { key, url, size, sha256 })
    }

    /// Removes every generated PDF of a paper. Missing objects are not an error.
    pub(crate) async fn delete_paper_objects(&self, paper_id: &str) -> anyhow::Result<()> {
        for document in PaperDocument::ALL {
            let key = paper_object_key(paper_id, document);
            self.client
                .delete_object()
                .bucket(&self.settings.bucket)
                .key(&key)
                .send()
                .await
                .with_context(|| format!("failed to delete {key}"))?;
        }

        tracing::info!(paper_id, "Deleted paper PDFs from object storage");
        Ok(())
    }
}
