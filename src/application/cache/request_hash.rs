use serde::Serialize;
use sha2::{Digest, Sha256};

/// Hex SHA-256 of the request's JSON encoding.
///
/// Stable as long as the request serializes deterministically: structs and
/// vectors do, hash maps do not.
pub fn request_hash<T>(request: &T) -> Result<String, serde_json::Error>
where
    T: Serialize + ?Sized,
{
    let bytes = serde_json::to_vec(request)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}
