//! Model and estimator artifacts: layout, checksums, staging and publish.
//!
//! A model artifact at path `P` holds five components:
//!
//! ```text
//! P/metadata           JSON: className, uid, timestamp, formatVersion, checksums
//! P/replacementValues  JSON object of tagged values, in output column order
//! P/inputCols          JSON array of strings
//! P/outputCols         JSON array of strings
//! P/data               CSV with a `uid` header and exactly one row
//! ```
//!
//! Estimator artifacts hold only `metadata`, with the params in `paramMap`.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::error::{ImputerError, Result};
use crate::imputer::{Imputer, ImputerParams};
use crate::model::{ColumnMapping, ImputationModel, ReplacementValues};

use super::store::{BlobStore, FsBlobStore, join, normalize};

/// Class tag written for fitted models.
pub const MODEL_CLASS: &str = "imputer.ImputationModel";

/// Class tag written for unfitted estimators.
pub const ESTIMATOR_CLASS: &str = "imputer.Imputer";

/// Newest artifact layout this build reads and the one it writes.
pub const FORMAT_VERSION: u32 = 1;

const METADATA: &str = "metadata";
const REPLACEMENT_VALUES: &str = "replacementValues";
const INPUT_COLS: &str = "inputCols";
const OUTPUT_COLS: &str = "outputCols";
const DATA: &str = "data";

/// Contents of the `metadata` component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactMetadata {
    pub class_name: String,
    pub uid: String,
    /// Save time, milliseconds since the Unix epoch.
    pub timestamp: i64,
    pub format_version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub param_map: Option<ImputerParams>,
    /// `sha256:<hex>` digest per component name.
    #[serde(default)]
    pub checksums: BTreeMap<String, String>,
}

impl ArtifactMetadata {
    fn new(class_name: &str, uid: &str, components: &[(&str, Vec<u8>)]) -> Self {
        Self {
            class_name: class_name.to_string(),
            uid: uid.to_string(),
            timestamp: Utc::now().timestamp_millis(),
            format_version: FORMAT_VERSION,
            param_map: None,
            checksums: components
                .iter()
                .map(|(name, bytes)| (name.to_string(), checksum(bytes)))
                .collect(),
        }
    }

    fn expect_class(&self, path: &str, class_name: &str) -> Result<()> {
        if self.class_name != class_name {
            return Err(ImputerError::corrupt(
                join(path, METADATA),
                format!("expected class {}, found {}", class_name, self.class_name),
            ));
        }
        if self.format_version == 0 || self.format_version > FORMAT_VERSION {
            return Err(ImputerError::corrupt(
                join(path, METADATA),
                format!("unsupported format version {}", self.format_version),
            ));
        }
        Ok(())
    }

    /// Check `bytes` against the recorded digest for `name`.
    fn verify(&self, path: &str, name: &str, bytes: &[u8]) -> Result<()> {
        let component = join(path, name);
        let expected = self
            .checksums
            .get(name)
            .ok_or_else(|| ImputerError::corrupt(&component, "no checksum recorded"))?;
        if *expected != checksum(bytes) {
            return Err(ImputerError::corrupt(&component, "checksum mismatch"));
        }
        Ok(())
    }
}

fn checksum(bytes: &[u8]) -> String {
    format!("sha256:{:x}", Sha256::digest(bytes))
}

/// Read and decode the `metadata` component of the artifact at `path`.
pub fn read_metadata<S: BlobStore + ?Sized>(store: &S, path: &str) -> Result<ArtifactMetadata> {
    let path = normalize(path)?;
    let component = join(&path, METADATA);
    let bytes = store.read(&component)?;
    serde_json::from_slice(&bytes).map_err(|e| ImputerError::corrupt(component, e))
}

/// Read the `metadata` component of an artifact saved to a local directory.
pub fn read_metadata_from_dir(dir: impl AsRef<Path>) -> Result<ArtifactMetadata> {
    let (store, name) = dir_store(dir.as_ref())?;
    read_metadata(&store, &name)
}

fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(value)?)
}

fn decode_component<T: DeserializeOwned, S: BlobStore + ?Sized>(
    store: &S,
    path: &str,
    name: &str,
    metadata: &ArtifactMetadata,
) -> Result<T> {
    let component = join(path, name);
    let bytes = store.read(&component)?;
    metadata.verify(path, name, &bytes)?;
    serde_json::from_slice(&bytes).map_err(|e| ImputerError::corrupt(component, e))
}

fn encode_marker(uid: &str) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["uid"])?;
    writer.write_record([uid])?;
    writer.into_inner().map_err(|e| ImputerError::Io {
        path: PathBuf::from(DATA),
        source: e.into_error(),
    })
}

fn decode_marker(component: &str, bytes: &[u8]) -> Result<String> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| ImputerError::corrupt(component, e))?;
    if headers.len() != 1 || headers.get(0) != Some("uid") {
        return Err(ImputerError::corrupt(component, "expected a single 'uid' column"));
    }

    let mut records = reader.records();
    let record = match records.next() {
        Some(record) => record.map_err(|e| ImputerError::corrupt(component, e))?,
        None => return Err(ImputerError::corrupt(component, "marker record is missing")),
    };
    if records.next().is_some() {
        return Err(ImputerError::corrupt(component, "expected exactly one marker record"));
    }

    match record.get(0) {
        Some(uid) if !uid.is_empty() => Ok(uid.to_string()),
        _ => Err(ImputerError::corrupt(component, "marker uid is empty")),
    }
}

/// Write `components` under a staging prefix, then move it onto `path`.
///
/// Nothing is written when `path` exists and `overwrite` is false. A failed
/// save leaves any previous artifact at `path` in place.
fn publish<S: BlobStore + ?Sized>(
    store: &S,
    path: &str,
    overwrite: bool,
    components: &[(&str, Vec<u8>)],
) -> Result<()> {
    let exists = store.exists(path)?;
    if exists && !overwrite {
        return Err(ImputerError::AlreadyExists(path.to_string()));
    }

    let staging = format!("{}.staging-{:016x}", path, fastrand::u64(..));
    let staged = components
        .iter()
        .try_for_each(|(name, bytes)| store.write(&join(&staging, name), bytes));
    if let Err(e) = staged {
        discard(store, &staging);
        return Err(e);
    }
    debug!(staging = %staging, components = components.len(), "staged artifact");

    if !exists {
        return store.rename(&staging, path).inspect_err(|_| discard(store, &staging));
    }

    warn!(path = %path, "overwriting existing artifact");
    let backup = format!("{}.backup-{:016x}", path, fastrand::u64(..));
    if let Err(e) = store.rename(path, &backup) {
        discard(store, &staging);
        return Err(e);
    }
    if let Err(e) = store.rename(&staging, path) {
        if let Err(restore) = store.rename(&backup, path) {
            warn!(backup = %backup, error = %restore, "failed to restore previous artifact");
        }
        discard(store, &staging);
        return Err(e);
    }
    store.delete(&backup)
}

fn discard<S: BlobStore + ?Sized>(store: &S, staging: &str) {
    if let Err(e) = store.delete(staging) {
        warn!(staging = %staging, error = %e, "failed to remove staged components");
    }
}

/// Split a directory into a filesystem store over its parent and a name.
fn dir_store(dir: &Path) -> Result<(FsBlobStore, String)> {
    let name = dir
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            ImputerError::Config(format!("'{}' is not a valid artifact directory", dir.display()))
        })?
        .to_string();
    let parent = match dir.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((FsBlobStore::new(parent), name))
}

impl ImputationModel {
    /// Save the model under `path` in `store`.
    ///
    /// Fails with [`ImputerError::AlreadyExists`] and writes nothing if the
    /// path is taken and `overwrite` is false.
    pub fn save<S: BlobStore + ?Sized>(&self, store: &S, path: &str, overwrite: bool) -> Result<()> {
        let path = normalize(path)?;

        let components = vec![
            (REPLACEMENT_VALUES, encode_json(self.replacement_values())?),
            (INPUT_COLS, encode_json(self.input_cols())?),
            (OUTPUT_COLS, encode_json(self.output_cols())?),
            (DATA, encode_marker(self.uid())?),
        ];
        let metadata = ArtifactMetadata::new(MODEL_CLASS, self.uid(), &components);

        let mut all = components;
        all.push((METADATA, encode_json(&metadata)?));
        publish(store, &path, overwrite, &all)?;

        info!(uid = %self.uid(), path = %path, "saved imputation model");
        Ok(())
    }

    /// Load a model saved with [`save`](Self::save).
    ///
    /// Missing components are [`ImputerError::NotFound`]; anything that fails
    /// to decode or verify is [`ImputerError::Corrupt`].
    pub fn load<S: BlobStore + ?Sized>(store: &S, path: &str) -> Result<Self> {
        let path = normalize(path)?;

        let marker_path = join(&path, DATA);
        let marker = store.read(&marker_path)?;
        let uid = decode_marker(&marker_path, &marker)?;

        let metadata = read_metadata(store, &path)?;
        metadata.expect_class(&path, MODEL_CLASS)?;
        metadata.verify(&path, DATA, &marker)?;
        if metadata.uid != uid {
            return Err(ImputerError::corrupt(
                marker_path,
                format!("uid '{}' does not match metadata uid '{}'", uid, metadata.uid),
            ));
        }

        let replacement_values: ReplacementValues =
            decode_component(store, &path, REPLACEMENT_VALUES, &metadata)?;
        let input_cols: Vec<String> = decode_component(store, &path, INPUT_COLS, &metadata)?;
        let output_cols: Vec<String> = decode_component(store, &path, OUTPUT_COLS, &metadata)?;

        let mapping = ColumnMapping::new(input_cols, output_cols)
            .map_err(|e| ImputerError::corrupt(join(&path, INPUT_COLS), e))?;
        let model = ImputationModel::new(uid, replacement_values, mapping)
            .map_err(|e| ImputerError::corrupt(join(&path, REPLACEMENT_VALUES), e))?;

        info!(uid = %model.uid(), path = %path, "loaded imputation model");
        Ok(model)
    }

    /// Save into a local directory; the directory itself is the artifact.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use imputer::ImputationModel;
    /// # fn example(model: &ImputationModel) -> imputer::Result<()> {
    /// model.save_to_dir("models/age_mean", false)?;
    /// let restored = ImputationModel::load_from_dir("models/age_mean")?;
    /// assert_eq!(&restored, model);
    /// # Ok(())
    /// # }
    /// ```
    pub fn save_to_dir(&self, dir: impl AsRef<Path>, overwrite: bool) -> Result<()> {
        let (store, name) = dir_store(dir.as_ref())?;
        self.save(&store, &name, overwrite)
    }

    /// Load from a local directory written by [`save_to_dir`](Self::save_to_dir).
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let (store, name) = dir_store(dir.as_ref())?;
        Self::load(&store, &name)
    }
}

impl Imputer {
    /// Save the unfitted estimator: uid and params only.
    pub fn save<S: BlobStore + ?Sized>(&self, store: &S, path: &str, overwrite: bool) -> Result<()> {
        let path = normalize(path)?;

        let mut metadata = ArtifactMetadata::new(ESTIMATOR_CLASS, self.uid(), &[]);
        metadata.param_map = Some(self.params().clone());
        publish(store, &path, overwrite, &[(METADATA, encode_json(&metadata)?)])?;

        info!(uid = %self.uid(), path = %path, "saved imputer");
        Ok(())
    }

    /// Load an estimator saved with [`save`](Self::save).
    pub fn load<S: BlobStore + ?Sized>(store: &S, path: &str) -> Result<Self> {
        let path = normalize(path)?;
        let metadata = read_metadata(store, &path)?;
        metadata.expect_class(&path, ESTIMATOR_CLASS)?;

        let params = metadata
            .param_map
            .ok_or_else(|| ImputerError::corrupt(join(&path, METADATA), "paramMap is missing"))?;
        Ok(Imputer::new(params).with_uid(metadata.uid))
    }

    pub fn save_to_dir(&self, dir: impl AsRef<Path>, overwrite: bool) -> Result<()> {
        let (store, name) = dir_store(dir.as_ref())?;
        self.save(&store, &name, overwrite)
    }

    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let (store, name) = dir_store(dir.as_ref())?;
        Self::load(&store, &name)
    }
}
