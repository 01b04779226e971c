//! Digest store: one content fingerprint per monitored document.
//!
//! Layout under the data directory:
//!
//! ```text
//! <root>/
//!   ├── <resource name>/
//!   │     └── <filename without resource prefix>_hash.txt
//!   └── xml_hash.txt        (single-document lookups)
//! ```

use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use crate::error::MonitorError;
use crate::model::Document;
use crate::ports::FileSystem;

/// Suffix appended to every digest file name.
pub const DIGEST_SUFFIX: &str = "_hash.txt";

/// Digest file used by single-document lookups.
pub const SINGLE_DIGEST_FILE: &str = "xml_hash.txt";

/// Lower-case hex SHA-256 of `content`.
#[must_use]
pub fn sha256_hex(content: &str) -> String {
    format!("{:x}", Sha256::digest(content.as_bytes()))
}

/// Persists and retrieves digests through the `FileSystem` port.
pub struct DigestStore<'a> {
    fs: &'a dyn FileSystem,
    root: PathBuf,
}

impl<'a> DigestStore<'a> {
    /// Creates a store rooted at the data directory.
    #[must_use]
    pub fn new(fs: &'a dyn FileSystem, root: &Path) -> Self {
        Self { fs, root: root.to_path_buf() }
    }

    /// Digest file of a discovered document.
    ///
    /// The path depends only on the resource name and filename, so it is
    /// the same on every run for the same logical document.
    #[must_use]
    pub fn path_for(&self, document: &Document) -> PathBuf {
        let stem = document
            .filename
            .strip_prefix(document.resource_name.as_str())
            .filter(|rest| !rest.is_empty())
            .unwrap_or(document.filename.as_str());
        self.root
            .join(path_safe(&document.resource_name))
            .join(format!("{}{DIGEST_SUFFIX}", path_safe(stem)))
    }

    /// Digest file of the single-document lookup mode.
    #[must_use]
    pub fn single_path(&self) -> PathBuf {
        self.root.join(SINGLE_DIGEST_FILE)
    }

    /// Loads the stored digest, trimmed. `None` when no digest was stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(&self, path: &Path) -> Result<Option<String>, MonitorError> {
        if !self.fs.exists(path) {
            return Ok(None);
        }
        let contents = self
            .fs
            .read_to_string(path)
            .map_err(|e| MonitorError::Storage { path: path.to_path_buf(), reason: e.to_string() })?;
        Ok(Some(contents.trim().to_string()))
    }

    /// Overwrites the stored digest, creating the resource directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path, digest: &str) -> Result<(), MonitorError> {
        self.fs
            .write(path, digest)
            .map_err(|e| MonitorError::Storage { path: path.to_path_buf(), reason: e.to_string() })
    }
}

/// Replaces path separators so a name stays a single path component.
fn path_safe(name: &str) -> String {
    name.replace(['/', '\\'], "_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemFs;

    fn document(filename: &str) -> Document {
        Document {
            identifier: "doc".into(),
            url: "https://example.com/xml/a.xml".into(),
            filename: filename.into(),
            legislature_identifier: "leg".into(),
            legislature_name: "Pasta XVII Legislatura".into(),
            legislature_url: "https://example.com/leg".into(),
            resource_identifier: "res".into(),
            resource_name: "Deputados".into(),
            resource_title: "Deputados".into(),
            resource_url: "https://example.com/DADeputados.aspx".into(),
        }
    }

    #[test]
    fn digest_is_deterministic_hex() {
        let a = sha256_hex("<xml>test content</xml>");
        assert_eq!(a, sha256_hex("<xml>test content</xml>"));
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, sha256_hex("<xml>test content</xml>\n"));
    }

    #[test]
    fn known_digest() {
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn path_strips_resource_prefix() {
        let fs = MemFs::default();
        let store = DigestStore::new(&fs, Path::new("/data"));
        assert_eq!(
            store.path_for(&document("DeputadosXVII.xml")),
            PathBuf::from("/data/Deputados/XVII.xml_hash.txt")
        );
    }

    #[test]
    fn path_keeps_filename_without_prefix() {
        let fs = MemFs::default();
        let store = DigestStore::new(&fs, Path::new("/data"));
        assert_eq!(
            store.path_for(&document("Outro.xml")),
            PathBuf::from("/data/Deputados/Outro.xml_hash.txt")
        );
        assert_eq!(
            store.path_for(&document("Deputados")),
            PathBuf::from("/data/Deputados/Deputados_hash.txt")
        );
    }

    #[test]
    fn path_never_escapes_resource_dir() {
        let fs = MemFs::default();
        let store = DigestStore::new(&fs, Path::new("/data"));
        assert_eq!(
            store.path_for(&document("../x.xml")),
            PathBuf::from("/data/Deputados/.._x.xml_hash.txt")
        );
    }

    #[test]
    fn load_trims_and_reports_absence() {
        let fs = MemFs::default();
        let store = DigestStore::new(&fs, Path::new("/data"));
        let path = store.single_path();
        assert_eq!(store.load(&path).unwrap(), None);

        store.save(&path, "abc\n").unwrap();
        assert_eq!(store.load(&path).unwrap().as_deref(), Some("abc"));
    }
}
