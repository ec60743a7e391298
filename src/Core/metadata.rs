// Conversions between call-site metadata and the engine's metadata arrays.

use bytes::Bytes;

use crate::Structs::{MetadataArray, MetadataMap};

/// Build a new low-level array from `metadata`.
///
/// The input is only borrowed; the returned array is a fresh allocation the
/// caller owns and usually hands straight to the engine.
pub fn fill_metadata_array(metadata: &MetadataMap) -> MetadataArray {
    let mut array = MetadataArray::with_capacity(metadata.len());
    for (key, value) in metadata.iter() {
        array.push(
            Bytes::copy_from_slice(key.as_bytes()),
            Bytes::copy_from_slice(value),
        );
    }
    array
}

/// Move an engine-filled array into a fresh map.
///
/// Values keep their exact bytes. Keys are header names and always ASCII on
/// the wire; anything else is decoded lossily.
pub fn fill_metadata_map(array: MetadataArray) -> MetadataMap {
    array
        .entries
        .into_iter()
        .map(|entry| {
            (
                String::from_utf8_lossy(&entry.key).into_owned(),
                entry.value,
            )
        })
        .collect()
}
