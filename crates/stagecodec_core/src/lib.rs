//! Class-aware object graph codec for persisted stage documents.
//!
//! Live instance graphs are flattened into a JSON-compatible [`codec::Value`] tree
//! with repeated complex subtrees collapsed into path references, and rebuilt from
//! that tree through a registry of constructors.

/// Registry, encoder, reference resolver, decoder, and wire format.
pub mod codec;
