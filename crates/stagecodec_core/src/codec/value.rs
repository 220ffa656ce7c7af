/// Plain, wire-safe tree node produced by serialization.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Explicit null marker.
	Null,
	/// Boolean scalar.
	Bool(bool),
	/// Integral number.
	Int(i64),
	/// Fractional number.
	Float(f64),
	/// UTF-8 string.
	String(Box<str>),
	/// Ordered sequence.
	Array(Vec<Value>),
	/// Tagged or plain ordered map.
	Object(ObjectValue),
	/// Path to an earlier node of the same tree.
	Ref(Box<str>),
}

/// Ordered field map, optionally tagged with a stable type name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectValue {
	/// Stable type name for class instances, `None` for plain maps.
	pub type_name: Option<Box<str>>,
	/// Field values in declaration (or document) order.
	pub fields: Vec<FieldValue>,
}

/// Named field value.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
	/// Field identifier.
	pub name: Box<str>,
	/// Field payload.
	pub value: Value,
}

impl Value {
	/// Build a tagged object node.
	pub fn tagged(type_name: &str, fields: impl IntoIterator<Item = (&'static str, Value)>) -> Self {
		Self::Object(ObjectValue {
			type_name: Some(type_name.into()),
			fields: fields.into_iter().map(|(name, value)| FieldValue::new(name, value)).collect(),
		})
	}

	/// Build an untagged object node.
	pub fn plain(fields: impl IntoIterator<Item = (&'static str, Value)>) -> Self {
		Self::Object(ObjectValue {
			type_name: None,
			fields: fields.into_iter().map(|(name, value)| FieldValue::new(name, value)).collect(),
		})
	}

	/// Build a string node.
	pub fn string(text: &str) -> Self {
		Self::String(text.into())
	}

	/// Stable lowercase label of the node kind.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "bool",
			Self::Int(_) => "int",
			Self::Float(_) => "float",
			Self::String(_) => "string",
			Self::Array(_) => "array",
			Self::Object(item) if item.type_name.is_some() => "tagged object",
			Self::Object(_) => "object",
			Self::Ref(_) => "reference",
		}
	}

	/// Borrow the object payload, if any.
	pub fn as_object(&self) -> Option<&ObjectValue> {
		match self {
			Self::Object(item) => Some(item),
			_ => None,
		}
	}

	/// Borrow the string payload, if any.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::String(text) => Some(&**text),
			_ => None,
		}
	}

	/// Borrow the array payload, if any.
	pub fn as_array(&self) -> Option<&[Value]> {
		match self {
			Self::Array(items) => Some(items.as_slice()),
			_ => None,
		}
	}

	/// Type tag of a tagged object node.
	pub fn type_name(&self) -> Option<&str> {
		self.as_object().and_then(|item| item.type_name.as_deref())
	}

	/// Look up a field of an object node.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.as_object().and_then(|item| item.get(name))
	}
}

impl ObjectValue {
	/// Look up one field by name.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.fields.iter().find(|field| field.name.as_ref() == name).map(|field| &field.value)
	}

	/// Whether this map carries a type tag.
	pub fn is_tagged(&self) -> bool {
		self.type_name.is_some()
	}

	/// Total character count of directly string-valued fields.
	pub fn string_chars(&self) -> usize {
		self.fields
			.iter()
			.filter_map(|field| field.value.as_str())
			.map(|text| text.chars().count())
			.sum()
	}
}

impl FieldValue {
	/// Build a named field.
	pub fn new(name: &str, value: Value) -> Self {
		Self { name: name.into(), value }
	}
}
