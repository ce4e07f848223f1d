//! Cross-channel identity of a repository document

use crate::model::RepoDoc;

/// Merge key for the fusion step: the decimal form of the repository's
/// source ID. Two documents with equal keys denote the same repository and
/// must collapse into one fused record.
pub fn identity_key(doc: &RepoDoc) -> String {
    doc.metadata.source_id.to_string()
}
