// touchline-core/src/ports/storage.rs

use async_trait::async_trait;
use std::fmt;

use crate::error::TouchlineError;

/// Address of one object: a bucket and a key inside it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectRef {
    pub bucket: String,
    pub key: String,
}

impl ObjectRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Same key, other bucket (raw -> cleaned keeps the layout).
    pub fn in_bucket(&self, bucket: &str) -> Self {
        Self::new(bucket, self.key.clone())
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Whole object body. A missing object is an error.
    async fn get(&self, object: &ObjectRef) -> Result<Vec<u8>, TouchlineError>;

    /// Writes the object in one shot: readers see the old body or the new one,
    /// never a partial write.
    async fn put(&self, object: &ObjectRef, body: &[u8]) -> Result<(), TouchlineError>;

    /// Keys under `prefix`, sorted.
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, TouchlineError>;

    async fn exists(&self, object: &ObjectRef) -> Result<bool, TouchlineError>;
}
