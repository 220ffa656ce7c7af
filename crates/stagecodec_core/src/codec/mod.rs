mod args;
mod decode;
mod encode;
mod error;
mod fingerprint;
/// JSON wire format for serialized trees.
pub mod json;
mod live;
mod path;
mod registry;
mod resolve;
mod stats;
#[cfg(test)]
mod test_support;
mod value;

/// Constructor argument cursor and whole-object field map.
pub use args::{Arg, Args, Fields};
/// Tree-to-graph decoding entry points and options.
pub use decode::{DecodeOptions, deserialize, deserialize_with};
/// Graph-to-tree encoding entry points, options, and number normalization.
pub use encode::{DedupPolicy, EncodeOptions, normalize_number, serialize, serialize_with};
/// Error and result aliases.
pub use error::{CodecError, Result};
/// Structural content digests.
pub use fingerprint::Fingerprint;
/// Host-side value graph and typed extraction.
pub use live::{FromLive, Instance, Live};
/// Reference path parser types.
pub use path::{PathStep, RefPath};
/// Class metadata store and registration hooks.
pub use registry::{ClassBuilder, ClassEntry, Constructor, FieldSpec, MarshalFlag, MarshalFlags, Persist, Registry};
/// Reference expansion.
pub use resolve::resolve_references;
/// Serialized tree statistics.
pub use stats::TreeStats;
/// Serialized tree node types.
pub use value::{FieldValue, ObjectValue, Value};
