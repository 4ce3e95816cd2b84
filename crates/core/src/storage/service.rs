//! Storage service implementation using Apache OpenDAL.

use bytes::Bytes;
use opendal::{Operator, services};
use tracing::warn;
use uuid::Uuid;

use super::config::{StorageConfig, StorageProvider};
use super::error::StorageError;

/// An uploaded file that has been written to storage but is not yet
/// referenced by any media row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedFile {
    /// Filename as sent by the client.
    pub original_name: String,
    /// Generated storage key.
    pub stored_path: String,
    /// Declared MIME type.
    pub content_type: Option<String>,
    /// Size in bytes.
    pub size: u64,
}

/// Storage service for uploaded files.
#[derive(Debug)]
pub struct StorageService {
    operator: Operator,
    config: StorageConfig,
}

impl StorageService {
    /// Create a new storage service from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage provider cannot be initialized.
    pub fn from_config(config: StorageConfig) -> Result<Self, StorageError> {
        let operator = Self::create_operator(&config.provider)?;
        Ok(Self { operator, config })
    }

    /// Create OpenDAL operator from provider config.
    fn create_operator(provider: &StorageProvider) -> Result<Operator, StorageError> {
        match provider {
            StorageProvider::LocalFs { root } => {
                let builder = services::Fs::default().root(
                    root.to_str()
                        .ok_or_else(|| StorageError::configuration("invalid path"))?,
                );

                Ok(Operator::new(builder)
                    .map_err(|e| StorageError::configuration(e.to_string()))?
                    .finish())
            }
            StorageProvider::Memory => Ok(Operator::new(services::Memory::default())
                .map_err(|e| StorageError::configuration(e.to_string()))?
                .finish()),
        }
    }

    /// Validate an upload against config constraints.
    ///
    /// # Errors
    ///
    /// Returns an error if file size or MIME type is invalid.
    pub fn validate_upload(&self, content_type: &str, size: u64) -> Result<(), StorageError> {
        if size > self.config.max_file_size {
            return Err(StorageError::file_too_large(
                size,
                self.config.max_file_size,
            ));
        }

        if !self.config.is_mime_type_allowed(content_type) {
            return Err(StorageError::invalid_mime_type(content_type));
        }

        Ok(())
    }

    /// Generate a storage key for an uploaded file.
    ///
    /// Format: `{random hex}{.ext}` where the extension is taken from the
    /// original filename and sanitized.
    #[must_use]
    pub fn generate_stored_name(original_name: &str) -> String {
        let id = Uuid::new_v4().simple();
        match extension_of(original_name) {
            Some(ext) => format!("{id}.{ext}"),
            None => id.to_string(),
        }
    }

    /// Validate and write an uploaded file, returning its staged descriptor.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload is rejected or the write fails.
    pub async fn stage_upload(
        &self,
        original_name: &str,
        content_type: &str,
        data: Bytes,
    ) -> Result<StagedFile, StorageError> {
        let size = data.len() as u64;
        self.validate_upload(content_type, size)?;

        let key = Self::generate_stored_name(original_name);
        self.operator
            .write(&key, data)
            .await
            .map_err(StorageError::from)?;

        Ok(StagedFile {
            original_name: original_name.to_string(),
            stored_path: key,
            content_type: Some(content_type.to_string()),
            size,
        })
    }

    /// Read a stored file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file does not exist or cannot be read.
    pub async fn read(&self, key: &str) -> Result<Bytes, StorageError> {
        let key = checked_key(key)?;
        let buffer = self.operator.read(key).await.map_err(StorageError::from)?;
        Ok(buffer.to_bytes())
    }

    /// Delete a file from storage. Deleting a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if deletion fails.
    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        if !is_stored_name(key) {
            warn!(key, "Refusing to delete a key outside the upload namespace");
            return Ok(());
        }
        self.operator.delete(key).await.map_err(StorageError::from)
    }

    /// Check if a file exists in storage.
    pub async fn exists(&self, key: &str) -> bool {
        is_stored_name(key) && self.operator.stat(key).await.is_ok()
    }

    /// Get the storage provider name.
    #[must_use]
    pub fn provider_name(&self) -> &'static str {
        self.config.provider.name()
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &StorageConfig {
        &self.config
    }
}

/// Whether `key` has the shape [`StorageService::generate_stored_name`] produces:
/// 32 lowercase hex digits, optionally followed by `.` and a lowercase
/// alphanumeric extension. Anything else (separators, `..`) never names a
/// stored upload.
fn is_stored_name(key: &str) -> bool {
    let (id, ext) = match key.split_once('.') {
        Some((id, ext)) => (id, Some(ext)),
        None => (key, None),
    };
    let hex_id = id.len() == 32 && id.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'));
    hex_id
        && ext.is_none_or(|ext| {
            !ext.is_empty() && ext.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'z'))
        })
}

/// The key itself when it can name a stored upload, otherwise `NotFound`.
fn checked_key(key: &str) -> Result<&str, StorageError> {
    if is_stored_name(key) {
        Ok(key)
    } else {
        Err(StorageError::NotFound {
            key: key.to_string(),
        })
    }
}

/// Lowercased ASCII-alphanumeric extension of a filename, if any.
fn extension_of(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    let ext: String = ext
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .take(10)
        .collect::<String>()
        .to_ascii_lowercase();
    (!ext.is_empty()).then_some(ext)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn memory_service() -> StorageService {
        StorageService::from_config(StorageConfig::new(StorageProvider::Memory))
            .expect("should create service")
    }

    #[test]
    fn test_extension_of() {
        assert_eq!(extension_of("rex.png"), Some("png".to_string()));
        assert_eq!(extension_of("Photo.JPEG"), Some("jpeg".to_string()));
        assert_eq!(extension_of("archive.tar.gz"), Some("gz".to_string()));
        assert_eq!(extension_of("evil.png/../x"), Some("x".to_string()));
        assert_eq!(extension_of("noext"), None);
        assert_eq!(extension_of(".hidden"), None);
        assert_eq!(extension_of("trailing."), None);
    }

    #[rstest]
    #[case("0123456789abcdef0123456789abcdef", true)]
    #[case("0123456789abcdef0123456789abcdef.png", true)]
    #[case("0123456789abcdef0123456789abcdef.", false)]
    #[case("0123456789ABCDEF0123456789abcdef.png", false)]
    #[case("0123456789abcdef0123456789abcdef.PNG", false)]
    #[case("0123456789abcdef0123456789abcde.png", false)]
    #[case("../secret.txt", false)]
    #[case("..%2Fsecret.txt", false)]
    #[case("0123456789abcdef0123456789abcdef.png/../x", false)]
    #[case("sub\\0123456789abcdef0123456789abcdef", false)]
    #[case("", false)]
    fn test_is_stored_name(#[case] key: &str, #[case] expected: bool) {
        assert_eq!(is_stored_name(key), expected);
    }

    #[test]
    fn test_generated_names_are_stored_names() {
        for original in ["rex.png", "Photo.JPEG", "noext", "../../etc/passwd", "a.t-a-r"] {
            let name = StorageService::generate_stored_name(original);
            assert!(is_stored_name(&name), "{original} -> {name}");
        }
    }

    #[tokio::test]
    async fn test_read_rejects_keys_outside_root() {
        let dir = tempfile::tempdir().expect("should create temp dir");
        let root = dir.path().join("uploads");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(dir.path().join("secret.txt"), "TOP-SECRET").unwrap();

        let service =
            StorageService::from_config(StorageConfig::new(StorageProvider::local_fs(&root)))
                .expect("should create service");

        let err = service.read("../secret.txt").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound { .. }));
        assert!(!service.exists("../secret.txt").await);

        service.delete("../secret.txt").await.unwrap();
        assert!(dir.path().join("secret.txt").exists());
    }

    #[test]
    fn test_generate_stored_name_is_unique() {
        let a = StorageService::generate_stored_name("rex.png");
        let b = StorageService::generate_stored_name("rex.png");
        assert_ne!(a, b);
        assert!(a.ends_with(".png"));
        assert_eq!(a.len(), 32 + ".png".len());
    }

    #[test]
    fn test_validate_upload_size() {
        let config = StorageConfig::new(StorageProvider::Memory).with_max_file_size(1024);
        let service = StorageService::from_config(config).expect("should create service");

        assert!(service.validate_upload("image/png", 512).is_ok());

        let err = service.validate_upload("image/png", 2048).unwrap_err();
        assert!(matches!(err, StorageError::FileTooLarge { .. }));
    }

    #[test]
    fn test_validate_upload_mime_type() {
        let service = memory_service();

        assert!(service.validate_upload("image/jpeg", 1024).is_ok());

        let err = service
            .validate_upload("application/x-executable", 1024)
            .unwrap_err();
        assert!(matches!(err, StorageError::InvalidMimeType { .. }));
    }

    #[tokio::test]
    async fn test_stage_upload_writes_file() {
        let service = memory_service();

        let staged = service
            .stage_upload("rex.png", "image/png", Bytes::from_static(b"\x89PNG"))
            .await
            .expect("upload should stage");

        assert_eq!(staged.original_name, "rex.png");
        assert_eq!(staged.size, 4);
        assert!(service.exists(&staged.stored_path).await);
        assert_eq!(
            service.read(&staged.stored_path).await.unwrap(),
            Bytes::from_static(b"\x89PNG")
        );
    }

    #[tokio::test]
    async fn test_stage_upload_rejection_writes_nothing() {
        let service = memory_service();

        let result = service
            .stage_upload("notes.txt", "text/plain", Bytes::from_static(b"hello"))
            .await;

        assert!(matches!(result, Err(StorageError::InvalidMimeType { .. })));
    }

    #[tokio::test]
    async fn test_delete_removes_and_tolerates_missing() {
        let service = memory_service();
        let staged = service
            .stage_upload("a.gif", "image/gif", Bytes::from_static(b"GIF89a"))
            .await
            .unwrap();

        service.delete(&staged.stored_path).await.unwrap();
        assert!(!service.exists(&staged.stored_path).await);

        service
            .delete(&staged.stored_path)
            .await
            .expect("deleting a missing key succeeds");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn prop_stored_name_has_no_path_separators(filename in ".*") {
            let name = StorageService::generate_stored_name(&filename);
            prop_assert!(!name.contains('/'));
            prop_assert!(!name.contains('\\'));
            prop_assert!(!name.contains(".."));
        }

        #[test]
        fn prop_file_size_validation(
            max_size in 1024u64..10_000_000,
            file_size in 0u64..20_000_000,
        ) {
            let config = StorageConfig::new(StorageProvider::Memory).with_max_file_size(max_size);
            let service = StorageService::from_config(config).expect("should create service");

            let result = service.validate_upload("image/png", file_size);

            if file_size <= max_size {
                prop_assert!(result.is_ok());
            } else {
                let is_too_large = matches!(result, Err(StorageError::FileTooLarge { .. }));
                prop_assert!(is_too_large);
            }
        }
    }
}
