//! Key-union merge of model documents
//!
//! Documents are folded left to right in file order:
//! - mapping onto mapping merges key by key, recursively
//! - sequence onto sequence concatenates
//! - a null incoming value keeps what is already there
//! - anything else is replaced by the incoming value

use serde_yaml::Value;

use crate::document::RawDocument;

/// Merge documents in order into a single document
///
/// Zero documents produce an empty document.
pub fn merge_documents<I>(documents: I) -> RawDocument
where
    I: IntoIterator<Item = RawDocument>,
{
    documents
        .into_iter()
        .fold(RawDocument::new(), |mut merged, next| {
            merge_into(&mut merged, next);
            merged
        })
}

/// Merge `incoming` into `base` in place
pub fn merge_into(base: &mut RawDocument, incoming: RawDocument) {
    let root = base.root_mut();
    for (key, value) in incoming.into_mapping() {
        match root.get_mut(&key) {
            Some(existing) => merge_value(existing, value),
            None => {
                root.insert(key, value);
            }
        }
    }
}

/// Merge one value into another following the document merge rule
pub fn merge_value(base: &mut Value, incoming: Value) {
    match (base, incoming) {
        (_, Value::Null) => {}
        (Value::Mapping(base_map), Value::Mapping(incoming_map)) => {
            for (key, value) in incoming_map {
                match base_map.get_mut(&key) {
                    Some(existing) => merge_value(existing, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (Value::Sequence(base_seq), Value::Sequence(incoming_seq)) => {
            base_seq.extend(incoming_seq);
        }
        (slot, incoming) => *slot = incoming,
    }
}
