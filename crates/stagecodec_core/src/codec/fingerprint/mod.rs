//! Structural content fingerprints used for deduplication.
//!
//! Digests are Merkle-style: containers hash the digests of their children, so a
//! node's fingerprint depends only on its fully resolved content, no matter which
//! of its descendants were emitted as references.

use serde::Serialize;
use xxhash_rust::xxh3::xxh3_128;

use crate::codec::{Result, Value};

/// Opaque 128-bit content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint(pub u128);

#[derive(Serialize)]
enum Frame<'a> {
	Leaf(&'a Value),
	Array(Vec<[u8; 16]>),
	Object { tag: &'a str, fields: Vec<(&'a str, [u8; 16])> },
}

impl Fingerprint {
	/// Digest of a value whose content is self-contained (scalars and plain maps).
	pub fn of_leaf(value: &Value) -> Result<Self> {
		digest(&Frame::Leaf(value))
	}

	/// Digest of an array from its element digests.
	pub fn of_array(elements: &[Fingerprint]) -> Result<Self> {
		digest(&Frame::Array(elements.iter().map(|item| item.0.to_le_bytes()).collect()))
	}

	/// Digest of a tagged object from its tag and per-field digests.
	pub fn of_object<'a>(tag: &'a str, fields: impl IntoIterator<Item = (&'a str, Fingerprint)>) -> Result<Self> {
		digest(&Frame::Object {
			tag,
			fields: fields.into_iter().map(|(name, item)| (name, item.0.to_le_bytes())).collect(),
		})
	}
}

fn digest(frame: &Frame<'_>) -> Result<Fingerprint> {
	let bytes = rmp_serde::to_vec(frame)?;
	Ok(Fingerprint(xxh3_128(&bytes)))
}
