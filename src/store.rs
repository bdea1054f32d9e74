//! Generic JSON file persistence.
//!
//! [`JsonFileStore`] keeps one serializable document in one file:
//! create-if-absent with a chosen initial shape, load the whole file,
//! save the whole file. It knows nothing about tasks; any serde
//! document works. Every failure carries the operation that hit it and
//! the path involved, so a bare "permission denied" never loses whether
//! it happened while creating, reading, or writing.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::error::{Result, TrackerError};

// =============================================================================
// Initial shape
// =============================================================================

/// JSON written into a freshly created store file.
///
/// The set is closed at the type level; arbitrary seed strings are
/// rejected when parsed, not checked before every write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InitialShape {
    /// Seed the file with `[]`.
    EmptyArray,
    /// Seed the file with `{}`. The default, matching a map document.
    #[default]
    EmptyObject,
}

impl InitialShape {
    /// Get the literal JSON text for this shape.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmptyArray => "[]",
            Self::EmptyObject => "{}",
        }
    }
}

impl fmt::Display for InitialShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InitialShape {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "[]" => Ok(Self::EmptyArray),
            "{}" => Ok(Self::EmptyObject),
            other => Err(TrackerError::BadInitialShape {
                value: other.to_string(),
            }),
        }
    }
}

// =============================================================================
// Store seam
// =============================================================================

/// File-backed persistence for a document of type `D`.
///
/// The repository talks to storage through this trait so tests can wrap
/// a store and count calls without touching the real one.
pub trait DocumentStore<D> {
    /// Ensure the store file exists, creating it with the initial shape
    /// if absent, and return its full path.
    ///
    /// # Errors
    ///
    /// Returns a store error if the filename or directory is unusable,
    /// or if creating or seeding the file fails.
    fn init_file(&self) -> Result<PathBuf>;

    /// Read and deserialize the whole document from `path`.
    ///
    /// # Errors
    ///
    /// Returns a store error if the file cannot be opened or read, or
    /// if its content is not valid JSON for `D`.
    fn load(&self, path: &Path) -> Result<D>;

    /// Serialize the whole document and write it to `path`.
    ///
    /// # Errors
    ///
    /// Returns a store error if serialization fails or the file cannot
    /// be written.
    fn save(&self, document: &D, path: &Path) -> Result<()>;
}

// =============================================================================
// JSON file store
// =============================================================================

/// Stores a serde document as a single JSON file on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStore<D> {
    dest_dir: PathBuf,
    filename: String,
    initial_shape: InitialShape,
    _document: PhantomData<D>,
}

impl<D> JsonFileStore<D> {
    /// Create a store rooted at `dest_dir` writing to `filename`.
    ///
    /// Nothing touches the filesystem until
    /// [`init_file`](DocumentStore::init_file) is called.
    pub fn new(dest_dir: impl Into<PathBuf>, filename: impl Into<String>) -> Self {
        Self {
            dest_dir: dest_dir.into(),
            filename: filename.into(),
            initial_shape: InitialShape::default(),
            _document: PhantomData,
        }
    }

    /// Override the JSON shape seeded into a freshly created file.
    #[must_use]
    pub fn with_initial_shape(mut self, shape: InitialShape) -> Self {
        self.initial_shape = shape;
        self
    }

    /// Get the full path of the store file.
    #[must_use]
    pub fn file_path(&self) -> PathBuf {
        self.dest_dir.join(&self.filename)
    }
}

impl<D> DocumentStore<D> for JsonFileStore<D>
where
    D: Serialize + DeserializeOwned,
{
    fn init_file(&self) -> Result<PathBuf> {
        let extension = Path::new(&self.filename)
            .extension()
            .and_then(|ext| ext.to_str());
        if extension != Some("json") {
            return Err(TrackerError::BadExtension {
                filename: self.filename.clone(),
            });
        }

        fs::create_dir_all(&self.dest_dir).map_err(|err| {
            TrackerError::store("creating destination directory", &self.dest_dir, err)
        })?;

        let path = self.file_path();
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(mut file) => {
                file.write_all(self.initial_shape.as_str().as_bytes())
                    .map_err(|err| TrackerError::store("writing initial shape", &path, err))?;
                debug!(path = %path.display(), shape = %self.initial_shape, "created store file");
            }
            // An existing file keeps its content, whatever that is.
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                debug!(path = %path.display(), "store file already exists");
            }
            Err(err) => return Err(TrackerError::store("creating file", &path, err)),
        }

        Ok(path)
    }

    fn load(&self, path: &Path) -> Result<D> {
        let mut file = File::open(path)
            .map_err(|err| TrackerError::store("opening file in read-only mode", path, err))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|err| TrackerError::store("reading file content", path, err))?;

        let document = serde_json::from_str(&content)
            .map_err(|err| TrackerError::store("deserializing JSON data", path, err))?;

        debug!(path = %path.display(), bytes = content.len(), "loaded document");
        Ok(document)
    }

    fn save(&self, document: &D, path: &Path) -> Result<()> {
        // Serialize before opening so an encoding failure cannot truncate
        // a file that still holds good data.
        let json = serde_json::to_string_pretty(document)
            .map_err(|err| TrackerError::store("serializing JSON data", path, err))?;

        let mut file = File::create(path)
            .map_err(|err| TrackerError::store("opening file in write mode", path, err))?;
        file.write_all(json.as_bytes())
            .map_err(|err| TrackerError::store("writing to file", path, err))?;

        debug!(path = %path.display(), bytes = json.len(), "saved document");
        Ok(())
    }
}
