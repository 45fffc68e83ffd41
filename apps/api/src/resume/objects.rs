//! Object storage for résumé content bodies.

use anyhow::Context;
use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;

use crate::errors::AppError;

#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, body: String, content_type: &str) -> Result<(), AppError>;

    async fn get(&self, key: &str) -> Result<String, AppError>;

    async fn delete(&self, key: &str) -> Result<(), AppError>;
}

pub struct S3ObjectStore {
    s3: aws_sdk_s3::Client,
    bucket: String,
}

impl S3ObjectStore {
    pub fn new(s3: aws_sdk_s3::Client, bucket: String) -> Self {
        Self { s3, bucket }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put(&self, key: &str, body: String, content_type: &str) -> Result<(), AppError> {
        self.s3
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body.into_bytes()))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| AppError::S3(format!("upload of s3://{}/{key} failed: {e}", self.bucket)))?;
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<String, AppError> {
        let object = self
            .s3
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                AppError::S3(format!("download of s3://{}/{key} failed: {e}", self.bucket))
            })?;

        let bytes = object
            .body
            .collect()
            .await
            .map_err(|e| AppError::S3(format!("reading s3://{}/{key} failed: {e}", self.bucket)))?
            .into_bytes();

        String::from_utf8(bytes.to_vec())
            .with_context(|| format!("stored resume {key} is not valid UTF-8"))
            .map_err(AppError::Internal)
    }

    async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.s3
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| AppError::S3(format!("removal of s3://{}/{key} failed: {e}", self.bucket)))?;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    #[derive(Default)]
    pub struct MemoryObjectStore {
        objects: Mutex<HashMap<String, String>>,
    }

    impl MemoryObjectStore {
        pub fn keys(&self) -> Vec<String> {
            self.objects.lock().unwrap().keys().cloned().collect()
        }
    }

    #[async_trait]
    impl ObjectStore for MemoryObjectStore {
        async fn put(&self, key: &str, body: String, _content_type: &str) -> Result<(), AppError> {
            self.objects.lock().unwrap().insert(key.to_string(), body);
            Ok(())
        }

        async fn get(&self, key: &str) -> Result<String, AppError> {
            self.objects
                .lock()
                .unwrap()
                .get(key)
                .cloned()
                .ok_or_else(|| AppError::S3(format!("no object at {key}")))
        }

        async fn delete(&self, key: &str) -> Result<(), AppError> {
            self.objects.lock().unwrap().remove(key);
            Ok(())
        }
    }
}
