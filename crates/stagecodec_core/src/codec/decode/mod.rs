use std::any::Any;

use crate::codec::{Arg, Args, CodecError, Fields, Live, ObjectValue, Registry, Result, Value, resolve_references};

/// Runtime limits for tree decoding.
#[derive(Debug, Clone)]
pub struct DecodeOptions {
	/// Maximum nesting depth of arrays and tagged objects.
	pub max_depth: u32,
}

impl Default for DecodeOptions {
	fn default() -> Self {
		Self { max_depth: 256 }
	}
}

/// Rebuild a live graph with the process-wide registry and default options.
pub fn deserialize(value: &Value, context: Option<&dyn Any>) -> Result<Live> {
	deserialize_with(Registry::global()?, value, context, &DecodeOptions::default())
}

/// Rebuild a live graph from a serialized tree.
///
/// References are expanded first, then tagged objects are constructed bottom-up
/// through their registered constructors. `context` is forwarded to classes
/// flagged to receive it.
pub fn deserialize_with(registry: &Registry, value: &Value, context: Option<&dyn Any>, opt: &DecodeOptions) -> Result<Live> {
	let resolved = resolve_references(value)?;
	let decoder = Decoder { registry, context, opt };
	decoder.decode(&resolved, 0)
}

struct Decoder<'a> {
	registry: &'a Registry,
	context: Option<&'a dyn Any>,
	opt: &'a DecodeOptions,
}

impl Decoder<'_> {
	fn decode(&self, value: &Value, depth: u32) -> Result<Live> {
		if depth >= self.opt.max_depth {
			return Err(CodecError::DecodeDepthExceeded { max_depth: self.opt.max_depth });
		}

		match value {
			Value::Null => Ok(Live::Null),
			Value::Bool(v) => Ok(Live::Bool(*v)),
			Value::Int(v) => Ok(Live::Int(*v)),
			Value::Float(v) => Ok(Live::Float(*v)),
			Value::String(v) => Ok(Live::String(v.clone())),
			Value::Array(items) => {
				let mut out = Vec::with_capacity(items.len());
				for item in items {
					out.push(self.decode(item, depth + 1)?);
				}
				Ok(Live::Array(out))
			}
			Value::Object(item) if item.is_tagged() => self.construct(item, depth),
			Value::Object(item) => Ok(Live::Plain(item.clone())),
			Value::Ref(path) => Err(CodecError::UnresolvedReference { path: path.to_string() }),
		}
	}

	fn construct(&self, node: &ObjectValue, depth: u32) -> Result<Live> {
		let tag = node.type_name.as_deref().unwrap_or_default();
		let entry = self.registry.lookup_class(tag)?;

		let mut entries = Vec::with_capacity(node.fields.len());
		for field in &node.fields {
			entries.push((field.name.clone(), self.decode(&field.value, depth + 1)?));
		}

		let flags = entry.flags;
		let mut items = Vec::with_capacity(entries.len() + 2);
		if flags.context_first {
			items.push(Arg::Context(self.context));
		}
		if flags.whole_object {
			items.push(Arg::Object(Fields::new(entry.type_name, entries)));
		} else {
			items.extend(entries.into_iter().map(|(_, value)| Arg::Value(value)));
		}
		if flags.context_last {
			items.push(Arg::Context(self.context));
		}

		let instance = entry.construct(&mut Args::new(entry.type_name, items))?;
		log::trace!("constructed {} as {}", entry.type_name, entry.rust_type);
		Ok(Live::Instance(instance))
	}
}
