use thiserror::Error;

/// Crate-local result type.
pub type Result<T> = std::result::Result<T, CodecError>;

/// Errors produced while registering, encoding, resolving, and decoding object graphs.
#[derive(Debug, Error)]
pub enum CodecError {
	/// Filesystem or stream IO failure.
	#[error("io: {0}")]
	Io(#[from] std::io::Error),
	/// JSON document could not be read or written.
	#[error("json: {0}")]
	Json(#[from] serde_json::Error),
	/// Structural fingerprint encoding failed.
	#[error("fingerprint encoding failed: {0}")]
	Fingerprint(#[from] rmp_serde::encode::Error),
	/// Instance type has no registered stable name.
	#[error("cannot resolve stable type name for {rust_type} at {path:?}")]
	UnresolvableTypeName {
		/// Rust type name of the offending instance.
		rust_type: &'static str,
		/// Tree path of the instance being encoded.
		path: String,
	},
	/// Host value kind has no tree representation.
	#[error("unsupported value kind {kind} at {path:?}")]
	UnsupportedValueKind {
		/// Label reported by the opaque value.
		kind: &'static str,
		/// Tree path of the offending value.
		path: String,
	},
	/// Untagged map would read back as a tagged node or a reference.
	#[error("plain map at {path:?} uses reserved key {key:?}")]
	ReservedPlainKey {
		/// The reserved key found in the map.
		key: &'static str,
		/// Tree path of the offending map.
		path: String,
	},
	/// Encoder recursion depth exceeded configured limit.
	#[error("encode depth exceeded (max={max_depth}) at {path:?}")]
	EncodeDepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
		/// Tree path where the limit was hit.
		path: String,
	},
	/// Tree node carries a type tag with no registered constructor.
	#[error("unknown type tag {tag:?}")]
	UnknownTypeTag {
		/// Tag read from the tree.
		tag: String,
	},
	/// Reference path does not point at an existing node.
	#[error("malformed reference path {path:?}: {reason}")]
	MalformedReferencePath {
		/// Reference path text.
		path: String,
		/// What went wrong while parsing or walking the path.
		reason: &'static str,
	},
	/// Reference resolution re-entered a path it was already resolving.
	#[error("reference cycle through {path:?}")]
	ReferenceCycle {
		/// Reference path that closed the cycle.
		path: String,
	},
	/// Reference node reached the decoder without being resolved.
	#[error("unresolved reference {path:?} reached the decoder")]
	UnresolvedReference {
		/// Reference path text.
		path: String,
	},
	/// Decoder recursion depth exceeded configured limit.
	#[error("decode depth exceeded (max={max_depth})")]
	DecodeDepthExceeded {
		/// Configured depth ceiling.
		max_depth: u32,
	},
	/// Constructor asked for more positional arguments than were supplied.
	#[error("{type_name}: missing argument {position} (expected {expected})")]
	MissingArgument {
		/// Stable name of the class being constructed.
		type_name: &'static str,
		/// Zero-based argument position.
		position: usize,
		/// Expected logical kind.
		expected: &'static str,
	},
	/// Constructor argument has the wrong shape.
	#[error("{type_name}: argument {position} expected {expected}, got {got}")]
	ArgumentMismatch {
		/// Stable name of the class being constructed.
		type_name: &'static str,
		/// Zero-based argument position.
		position: usize,
		/// Expected logical kind.
		expected: &'static str,
		/// Actual logical kind.
		got: &'static str,
	},
	/// Constructor expected a context argument of a different type.
	#[error("{type_name}: argument {position} expected context {expected}")]
	ContextMismatch {
		/// Stable name of the class being constructed.
		type_name: &'static str,
		/// Zero-based argument position.
		position: usize,
		/// Rust type name of the requested context.
		expected: &'static str,
	},
	/// Whole-object constructor asked for a field the node does not carry.
	#[error("{type_name}: missing field {field}")]
	MissingField {
		/// Stable name of the class being constructed.
		type_name: &'static str,
		/// Requested field name.
		field: String,
	},
	/// Whole-object field has the wrong shape.
	#[error("{type_name}: field {field} expected {expected}, got {got}")]
	FieldTypeMismatch {
		/// Stable name of the class being constructed.
		type_name: &'static str,
		/// Field name.
		field: String,
		/// Expected logical kind.
		expected: &'static str,
		/// Actual logical kind.
		got: &'static str,
	},
	/// Declared field name cannot appear in a tree path or collides with a wire key.
	#[error("invalid field name {field:?} on {type_name}: {reason}")]
	InvalidFieldName {
		/// Stable name of the declaring class.
		type_name: &'static str,
		/// Rejected field name.
		field: String,
		/// What is wrong with the name.
		reason: &'static str,
	},
	/// A process-wide registry was already installed.
	#[error("global registry already installed")]
	RegistryAlreadyInstalled,
	/// No process-wide registry has been installed.
	#[error("global registry not installed")]
	RegistryNotInstalled,
}
