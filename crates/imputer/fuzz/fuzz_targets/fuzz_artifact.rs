//! Fuzz target for model artifact loading.
//!
//! Arbitrary component contents must be rejected with an error, never a
//! panic or a partially built model.

#![no_main]

use arbitrary::Arbitrary;
use imputer::{BlobStore, ImputationModel, MemoryBlobStore};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Artifact {
    metadata: Vec<u8>,
    replacement_values: Vec<u8>,
    input_cols: Vec<u8>,
    output_cols: Vec<u8>,
    data: Vec<u8>,
}

fuzz_target!(|artifact: Artifact| {
    let store = MemoryBlobStore::new();
    let components = [
        ("m/metadata", &artifact.metadata),
        ("m/replacementValues", &artifact.replacement_values),
        ("m/inputCols", &artifact.input_cols),
        ("m/outputCols", &artifact.output_cols),
        ("m/data", &artifact.data),
    ];
    for (path, bytes) in components {
        if store.write(path, bytes).is_err() {
            return;
        }
    }

    if let Ok(model) = ImputationModel::load(&store, "m") {
        assert_eq!(model.input_cols().len(), model.output_cols().len());
        assert_eq!(model.replacement_values().len(), model.output_cols().len());
    }
});
