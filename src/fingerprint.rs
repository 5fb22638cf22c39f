use crate::node::Node;
use sha2::{Digest, Sha256};

/// Lowercase hex SHA-256 of a screen document. Keys the screen cache.
pub fn document_fingerprint(json: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Structural cache key for a node: `<type>_<digest prefix>`.
///
/// Two nodes with identical content share a key wherever they appear.
pub fn node_key(node: &Node) -> String {
    // Properties are ordered maps, so the serialized form is canonical.
    let canonical = serde_json::to_vec(node).unwrap_or_else(|_| format!("{:?}", node).into_bytes());
    let mut hasher = Sha256::new();
    hasher.update(&canonical);
    let digest = format!("{:x}", hasher.finalize());
    format!("{}_{}", node.node_type, &digest[..16])
}
