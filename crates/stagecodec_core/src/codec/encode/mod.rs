use std::collections::HashMap;

use crate::codec::json::{REF_KEY, TAG_KEY};
use crate::codec::{CodecError, FieldValue, Fingerprint, Instance, Live, ObjectValue, Registry, Result, TreeStats, Value};

/// Thresholds deciding which tagged nodes are worth deduplicating.
///
/// Small value objects (a two-field coordinate) cost fewer bytes inline than a
/// reference node, so only nodes past either threshold are recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupPolicy {
	/// A node is complex when it has more than this many fields.
	pub min_fields: usize,
	/// A node is complex when its string fields total at least this many characters.
	pub min_string_chars: usize,
}

impl Default for DedupPolicy {
	fn default() -> Self {
		Self {
			min_fields: 5,
			min_string_chars: 50,
		}
	}
}

impl DedupPolicy {
	/// Whether a freshly built tagged node should be recorded for later references.
	pub fn is_complex(&self, node: &ObjectValue) -> bool {
		node.fields.len() > self.min_fields || node.string_chars() >= self.min_string_chars
	}
}

/// Runtime limits and behavior switches for serialization.
#[derive(Debug, Clone)]
pub struct EncodeOptions {
	/// Decimal places kept for fractional numbers; `None` keeps full precision.
	pub float_decimals: Option<u32>,
	/// Deduplication thresholds; `None` disables references entirely.
	pub dedup: Option<DedupPolicy>,
	/// Maximum nesting depth before the graph is treated as cyclic.
	pub max_depth: u32,
}

impl Default for EncodeOptions {
	fn default() -> Self {
		Self {
			float_decimals: Some(2),
			dedup: Some(DedupPolicy::default()),
			max_depth: 256,
		}
	}
}

impl EncodeOptions {
	/// Preset keeping full float precision, for data that is not screen geometry.
	pub fn exact() -> Self {
		Self {
			float_decimals: None,
			..Self::default()
		}
	}
}

/// Serialize a live graph with the process-wide registry and default options.
pub fn serialize(value: &Live) -> Result<Value> {
	serialize_with(Registry::global()?, value, &EncodeOptions::default())
}

/// Serialize a live graph into a plain tree.
pub fn serialize_with(registry: &Registry, value: &Live, opt: &EncodeOptions) -> Result<Value> {
	let mut encoder = Encoder {
		registry,
		opt,
		seen: HashMap::new(),
		hits: 0,
	};
	let encoded = encoder.encode(value, "", 0)?;

	if log::log_enabled!(log::Level::Debug) {
		let stats = TreeStats::scan(&encoded.value);
		log::debug!(
			"serialized {} nodes ({} tagged, {} references, {} recorded shapes)",
			stats.nodes,
			stats.tagged,
			encoder.hits,
			encoder.seen.len()
		);
	}

	Ok(encoded.value)
}

/// Round a number per the configured precision; integral results become `Int`.
pub fn normalize_number(value: f64, decimals: Option<u32>) -> Value {
	if let Some(int) = as_integral(value) {
		return Value::Int(int);
	}
	let Some(decimals) = decimals.filter(|_| value.is_finite()) else {
		return Value::Float(value);
	};

	let rounded = round_fixed(value, decimals);
	match as_integral(rounded) {
		Some(int) => Value::Int(int),
		None => Value::Float(rounded),
	}
}

/// Round to `decimals` places on the exact binary value, with exact ties going away from zero.
fn round_fixed(value: f64, decimals: u32) -> f64 {
	if decimals <= MAX_EXACT_SCALE {
		let scale = 10_f64.powi(decimals as i32);
		let scaled = value.abs() * scale;
		if scaled.fract() == 0.5 && scaled < TIE_LIMIT && is_exact_tie(value, decimals) {
			return (scaled.floor() + 1.0).copysign(value) / scale;
		}
	}
	format!("{value:.prec$}", prec = decimals as usize).parse::<f64>().unwrap_or(value)
}

// Powers of ten up to 1e22 are exact in f64.
const MAX_EXACT_SCALE: u32 = 22;
const TIE_LIMIT: f64 = 4_503_599_627_370_496.0;

fn is_exact_tie(value: f64, decimals: u32) -> bool {
	// 1074 fractional digits hold the full expansion of any f64.
	let exact = format!("{:.1074}", value.abs());
	let Some((_, frac)) = exact.split_once('.') else {
		return false;
	};
	let Some(tail) = frac.get(decimals as usize..) else {
		return false;
	};
	tail.starts_with('5') && tail[1..].bytes().all(|byte| byte == b'0')
}

fn normalize_plain(value: &Value, decimals: Option<u32>, path: &str) -> Result<Value> {
	match value {
		Value::Float(v) => Ok(normalize_number(*v, decimals)),
		Value::Array(items) => {
			let mut out = Vec::with_capacity(items.len());
			for (idx, item) in items.iter().enumerate() {
				out.push(normalize_plain(item, decimals, &format!("{path}/{idx}"))?);
			}
			Ok(Value::Array(out))
		}
		Value::Object(item) => {
			if let Some(key) = reserved_plain_key(item) {
				return Err(CodecError::ReservedPlainKey { key, path: path.to_owned() });
			}
			let mut fields = Vec::with_capacity(item.fields.len());
			for field in &item.fields {
				fields.push(FieldValue {
					name: field.name.clone(),
					value: normalize_plain(&field.value, decimals, &format!("{path}/{}", field.name))?,
				});
			}
			Ok(Value::Object(ObjectValue {
				type_name: item.type_name.clone(),
				fields,
			}))
		}
		other => Ok(other.clone()),
	}
}

/// Key that would make an untagged map read back as something else.
fn reserved_plain_key(item: &ObjectValue) -> Option<&'static str> {
	if item.is_tagged() {
		return None;
	}
	if item.get(TAG_KEY).is_some() {
		return Some(TAG_KEY);
	}
	match item.fields.as_slice() {
		[only] if only.name.as_ref() == REF_KEY && matches!(only.value, Value::String(_)) => Some(REF_KEY),
		_ => None,
	}
}

fn as_integral(value: f64) -> Option<i64> {
	let fits = value >= i64::MIN as f64 && value < i64::MAX as f64;
	(value.is_finite() && value.fract() == 0.0 && fits).then_some(value as i64)
}

struct Encoded {
	value: Value,
	digest: Fingerprint,
}

struct Encoder<'a> {
	registry: &'a Registry,
	opt: &'a EncodeOptions,
	seen: HashMap<Fingerprint, Box<str>>,
	hits: usize,
}

impl Encoder<'_> {
	fn encode(&mut self, value: &Live, path: &str, depth: u32) -> Result<Encoded> {
		if depth >= self.opt.max_depth {
			return Err(CodecError::EncodeDepthExceeded {
				max_depth: self.opt.max_depth,
				path: path.to_owned(),
			});
		}

		let value = match value {
			Live::Null => Value::Null,
			Live::Bool(v) => Value::Bool(*v),
			Live::Int(v) => Value::Int(*v),
			Live::Float(v) => normalize_number(*v, self.opt.float_decimals),
			Live::String(v) => Value::String(v.clone()),
			Live::Plain(item) => normalize_plain(&Value::Object(item.clone()), self.opt.float_decimals, path)?,
			Live::Array(items) => return self.encode_array(items, path, depth),
			Live::Instance(item) => return self.encode_instance(item.as_ref(), path, depth),
			Live::Opaque(kind) => {
				return Err(CodecError::UnsupportedValueKind {
					kind: *kind,
					path: path.to_owned(),
				});
			}
		};
		let digest = Fingerprint::of_leaf(&value)?;
		Ok(Encoded { value, digest })
	}

	fn encode_array(&mut self, items: &[Live], path: &str, depth: u32) -> Result<Encoded> {
		let mut values = Vec::with_capacity(items.len());
		let mut digests = Vec::with_capacity(items.len());
		for (idx, item) in items.iter().enumerate() {
			let encoded = self.encode(item, &format!("{path}/{idx}"), depth + 1)?;
			values.push(encoded.value);
			digests.push(encoded.digest);
		}
		Ok(Encoded {
			value: Value::Array(values),
			digest: Fingerprint::of_array(&digests)?,
		})
	}

	fn encode_instance(&mut self, item: &dyn Instance, path: &str, depth: u32) -> Result<Encoded> {
		let registry = self.registry;
		let entry = registry.entry_for(item, path)?;

		let mut fields = Vec::with_capacity(entry.fields.len());
		let mut digests = Vec::with_capacity(entry.fields.len());
		for spec in &entry.fields {
			let Some(field) = item.field(&spec.name) else {
				continue;
			};
			let encoded = self.encode(&field, &format!("{path}/{}", spec.name), depth + 1)?;
			fields.push(FieldValue {
				name: spec.name.clone(),
				value: encoded.value,
			});
			digests.push(encoded.digest);
		}

		let digest = Fingerprint::of_object(entry.type_name, fields.iter().map(|field| field.name.as_ref()).zip(digests))?;
		let node = ObjectValue {
			type_name: Some(entry.type_name.into()),
			fields,
		};

		let Some(policy) = self.opt.dedup else {
			return Ok(Encoded {
				value: Value::Object(node),
				digest,
			});
		};

		if let Some(first) = self.seen.get(&digest) {
			log::trace!("{path}: {} duplicates {first}", entry.type_name);
			self.hits += 1;
			return Ok(Encoded {
				value: Value::Ref(first.clone()),
				digest,
			});
		}
		if policy.is_complex(&node) {
			self.seen.insert(digest, path.into());
		}

		Ok(Encoded {
			value: Value::Object(node),
			digest,
		})
	}
}
