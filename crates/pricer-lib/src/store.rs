//! Remote model store
//!
//! The production model lives in an opaque key-value blob store. Only three
//! operations exist: does an object exist, fetch it, and put it. Blobs are
//! written with a SHA-256 sidecar that is verified on every fetch.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, info};

use crate::error::{PriceError, Result};
use crate::model::ModelBundle;

/// Key-value blob store holding the deployed model
pub trait ModelStore: Send + Sync {
    fn exists(&self, key: &str) -> Result<bool>;
    fn get(&self, key: &str) -> Result<Vec<u8>>;
    fn put(&self, key: &str, bytes: &[u8]) -> Result<()>;
}

/// Filesystem-backed store; the bucket is a directory, keys are paths in it
#[derive(Debug, Clone)]
pub struct FsModelStore {
    bucket: PathBuf,
}

impl FsModelStore {
    /// Open a bucket directory, creating it if absent
    pub fn open(bucket: impl Into<PathBuf>) -> Result<Self> {
        let bucket = bucket.into();
        fs::create_dir_all(&bucket)
            .map_err(|e| PriceError::RemoteStore(format!("cannot open bucket: {e}")))?;
        Ok(Self { bucket })
    }

    fn object_path(&self, key: &str) -> PathBuf {
        self.bucket.join(key)
    }

    fn checksum_path(&self, key: &str) -> PathBuf {
        self.bucket.join(format!("{key}.sha256"))
    }
}

impl ModelStore for FsModelStore {
    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.object_path(key).exists())
    }

    fn get(&self, key: &str) -> Result<Vec<u8>> {
        let path = self.object_path(key);
        let bytes = fs::read(&path)
            .map_err(|e| PriceError::RemoteStore(format!("fetch of `{key}` failed: {e}")))?;

        let recorded = fs::read_to_string(self.checksum_path(key)).map_err(|e| {
            PriceError::RemoteStore(format!("checksum sidecar for `{key}` unreadable: {e}"))
        })?;
        let computed = compute_checksum(&bytes);
        if recorded.trim() != computed {
            return Err(PriceError::RemoteStore(format!(
                "checksum mismatch for `{key}`: recorded {recorded}, computed {computed}"
            )));
        }

        debug!(key, bytes = bytes.len(), "Fetched object");
        Ok(bytes)
    }

    fn put(&self, key: &str, bytes: &[u8]) -> Result<()> {
        let path = self.object_path(key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| PriceError::RemoteStore(format!("put of `{key}` failed: {e}")))?;
        }

        write_atomic(&path, bytes)
            .map_err(|e| PriceError::RemoteStore(format!("put of `{key}` failed: {e}")))?;
        write_atomic(
            &self.checksum_path(key),
            compute_checksum(bytes).as_bytes(),
        )
        .map_err(|e| PriceError::RemoteStore(format!("put of `{key}` failed: {e}")))?;

        debug!(key, bytes = bytes.len(), "Stored object");
        Ok(())
    }
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let temp_path = path.with_extension("tmp");
    let mut file = File::create(&temp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;
    fs::rename(&temp_path, path)
}

/// SHA-256 checksum of a blob, hex-encoded
pub fn compute_checksum(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

/// Serialize and push an accepted bundle to the store
pub fn push_bundle(store: &dyn ModelStore, key: &str, bundle: &ModelBundle) -> Result<()> {
    let bytes = serde_json::to_vec(bundle)?;
    store.put(key, &bytes)?;
    info!(key, "Pushed model bundle to store");
    Ok(())
}

/// Fetch and deserialize the deployed bundle
pub fn fetch_bundle(store: &dyn ModelStore, key: &str) -> Result<ModelBundle> {
    let bytes = store.get(key)?;
    let bundle = serde_json::from_slice(&bytes)
        .map_err(|e| PriceError::RemoteStore(format!("bundle `{key}` is not decodable: {e}")))?;
    Ok(bundle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_is_stable() {
        let data = b"model bytes";
        assert_eq!(compute_checksum(data), compute_checksum(data));
        assert_eq!(compute_checksum(data).len(), 64);
    }

    #[test]
    fn test_put_get_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsModelStore::open(dir.path().join("bucket")).unwrap();

        assert!(!store.exists("laptop-price/model.json").unwrap());
        store.put("laptop-price/model.json", b"payload").unwrap();
        assert!(store.exists("laptop-price/model.json").unwrap());
        assert_eq!(store.get("laptop-price/model.json").unwrap(), b"payload");
    }

    #[test]
    fn test_corrupted_object_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsModelStore::open(dir.path()).unwrap();

        store.put("model.json", b"payload").unwrap();
        fs::write(dir.path().join("model.json"), b"tampered").unwrap();

        let err = store.get("model.json").unwrap_err();
        assert!(matches!(err, PriceError::RemoteStore(_)));
    }

    #[test]
    fn test_get_missing_object_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = FsModelStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.get("absent.json").unwrap_err(),
            PriceError::RemoteStore(_)
        ));
    }
}
