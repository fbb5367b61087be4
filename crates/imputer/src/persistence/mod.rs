//! Saving and loading models and estimators through a blob store.

mod artifact;
mod store;

pub use artifact::{
    ArtifactMetadata, ESTIMATOR_CLASS, FORMAT_VERSION, MODEL_CLASS, read_metadata,
    read_metadata_from_dir,
};
pub use store::{BlobStore, FsBlobStore, MemoryBlobStore};
