use std::fmt;
use std::fs;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::codec::{FieldValue, ObjectValue, Result, Value};

/// Reserved key holding the stable type name of a tagged object.
///
/// Neither a declared field nor a plain map may use it.
pub const TAG_KEY: &str = "_";
/// Reserved key of a reference node: `{"$": "/path/to/node"}`.
///
/// Any untagged map whose only entry is `"$"` with a string value parses as a
/// reference. Other uses of the key stay plain fields.
pub const REF_KEY: &str = "$";

impl Serialize for Value {
	fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
		match self {
			Self::Null => serializer.serialize_unit(),
			Self::Bool(v) => serializer.serialize_bool(*v),
			Self::Int(v) => serializer.serialize_i64(*v),
			Self::Float(v) => serializer.serialize_f64(*v),
			Self::String(v) => serializer.serialize_str(v),
			Self::Array(items) => {
				let mut seq = serializer.serialize_seq(Some(items.len()))?;
				for item in items {
					seq.serialize_element(item)?;
				}
				seq.end()
			}
			Self::Object(item) => {
				let tag_len = usize::from(item.type_name.is_some());
				let mut map = serializer.serialize_map(Some(item.fields.len() + tag_len))?;
				if let Some(tag) = &item.type_name {
					map.serialize_entry(TAG_KEY, tag.as_ref())?;
				}
				for field in &item.fields {
					map.serialize_entry(field.name.as_ref(), &field.value)?;
				}
				map.end()
			}
			Self::Ref(path) => {
				let mut map = serializer.serialize_map(Some(1))?;
				map.serialize_entry(REF_KEY, path.as_ref())?;
				map.end()
			}
		}
	}
}

impl<'de> Deserialize<'de> for Value {
	fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
		deserializer.deserialize_any(ValueVisitor)
	}
}

struct ValueVisitor;

impl<'de> Visitor<'de> for ValueVisitor {
	type Value = Value;

	fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("a serialized object graph node")
	}

	fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
		Ok(Value::Null)
	}

	fn visit_none<E: de::Error>(self) -> std::result::Result<Value, E> {
		Ok(Value::Null)
	}

	fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> std::result::Result<Value, D::Error> {
		Value::deserialize(deserializer)
	}

	fn visit_bool<E: de::Error>(self, v: bool) -> std::result::Result<Value, E> {
		Ok(Value::Bool(v))
	}

	fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Value, E> {
		Ok(Value::Int(v))
	}

	fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Value, E> {
		Ok(i64::try_from(v).map_or(Value::Float(v as f64), Value::Int))
	}

	fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Value, E> {
		Ok(Value::Float(v))
	}

	fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Value, E> {
		Ok(Value::String(v.into()))
	}

	fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<Value, E> {
		Ok(Value::String(v.into_boxed_str()))
	}

	fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> std::result::Result<Value, A::Error> {
		let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
		while let Some(item) = seq.next_element::<Value>()? {
			items.push(item);
		}
		Ok(Value::Array(items))
	}

	fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> std::result::Result<Value, A::Error> {
		let mut type_name = None;
		let mut fields = Vec::with_capacity(map.size_hint().unwrap_or(0));
		while let Some(key) = map.next_key::<String>()? {
			if key == TAG_KEY {
				let tag = match map.next_value::<Value>()? {
					Value::String(tag) => tag,
					other => return Err(de::Error::invalid_type(de::Unexpected::Other(other.kind()), &"a type tag string")),
				};
				type_name = Some(tag);
				continue;
			}
			let value = map.next_value::<Value>()?;
			fields.push(FieldValue {
				name: key.into_boxed_str(),
				value,
			});
		}

		let is_ref = type_name.is_none() && fields.len() == 1 && fields[0].name.as_ref() == REF_KEY && matches!(fields[0].value, Value::String(_));
		if is_ref {
			if let Some(FieldValue {
				value: Value::String(path), ..
			}) = fields.pop()
			{
				return Ok(Value::Ref(path));
			}
		}

		Ok(Value::Object(ObjectValue { type_name, fields }))
	}
}

/// Render a tree as compact JSON text.
pub fn to_string(value: &Value) -> Result<String> {
	Ok(serde_json::to_string(value)?)
}

/// Render a tree as indented JSON text.
pub fn to_string_pretty(value: &Value) -> Result<String> {
	Ok(serde_json::to_string_pretty(value)?)
}

/// Parse a tree from JSON text.
pub fn from_str(text: &str) -> Result<Value> {
	Ok(serde_json::from_str(text)?)
}

/// Write a tree as compact JSON to a byte sink.
pub fn to_writer<W: Write>(writer: W, value: &Value) -> Result<()> {
	serde_json::to_writer(writer, value)?;
	Ok(())
}

/// Read a tree from a JSON byte source.
pub fn from_reader<R: Read>(reader: R) -> Result<Value> {
	Ok(serde_json::from_reader(reader)?)
}

/// Write a tree to a document file, replacing any previous content.
pub fn save_document(path: impl AsRef<Path>, value: &Value) -> Result<()> {
	let file = fs::File::create(path)?;
	let mut writer = BufWriter::new(file);
	to_writer(&mut writer, value)?;
	writer.flush()?;
	Ok(())
}

/// Read a tree from a document file.
pub fn load_document(path: impl AsRef<Path>) -> Result<Value> {
	let file = fs::File::open(path)?;
	from_reader(BufReader::new(file))
}
