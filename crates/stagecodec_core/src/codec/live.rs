use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::codec::value::ObjectValue;

/// Class instance that can be flattened by the encoder.
///
/// Field order on the wire comes from the registry, not from this trait; the
/// instance only answers which of its registered fields it currently carries.
pub trait Instance: Any + Send + Sync + fmt::Debug {
	/// Current value of one registered field, or `None` when the instance does not carry it.
	fn field(&self, name: &str) -> Option<Live>;

	/// Rust type name, used in error reports.
	fn rust_type_name(&self) -> &'static str {
		std::any::type_name::<Self>()
	}
}

impl dyn Instance {
	/// Borrow the concrete instance type.
	pub fn downcast_ref<T: Instance>(&self) -> Option<&T> {
		let any: &dyn Any = self;
		any.downcast_ref::<T>()
	}
}

/// Host-side value graph consumed by the encoder and produced by the decoder.
#[derive(Debug, Clone)]
pub enum Live {
	/// Explicit null marker.
	Null,
	/// Boolean scalar.
	Bool(bool),
	/// Integral number.
	Int(i64),
	/// Number that may carry a fractional part.
	Float(f64),
	/// UTF-8 string.
	String(Box<str>),
	/// Ordered sequence.
	Array(Vec<Live>),
	/// Untagged map that is already wire-safe; only its fractional numbers are rounded.
	///
	/// It must not carry a `_` key, and must not be a lone `$` string field, or it
	/// would read back as a tagged node or a reference. The encoder rejects both
	/// with [`CodecError::ReservedPlainKey`](crate::codec::CodecError::ReservedPlainKey).
	Plain(ObjectValue),
	/// Registered class instance.
	Instance(Arc<dyn Instance>),
	/// Host value with no tree representation (callbacks, handles).
	Opaque(&'static str),
}

impl Live {
	/// Wrap a shared instance.
	pub fn instance<T: Instance>(item: Arc<T>) -> Self {
		Self::Instance(item)
	}

	/// Stable lowercase label of the value kind.
	pub fn kind(&self) -> &'static str {
		match self {
			Self::Null => "null",
			Self::Bool(_) => "bool",
			Self::Int(_) => "int",
			Self::Float(_) => "float",
			Self::String(_) => "string",
			Self::Array(_) => "array",
			Self::Plain(_) => "object",
			Self::Instance(_) => "instance",
			Self::Opaque(kind) => *kind,
		}
	}

	/// Borrow an instance of a concrete type.
	pub fn as_instance<T: Instance>(&self) -> Option<&T> {
		match self {
			Self::Instance(item) => item.downcast_ref::<T>(),
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

	/// Numeric payload widened to `f64`.
	pub fn as_f64(&self) -> Option<f64> {
		match self {
			Self::Int(v) => Some(*v as f64),
			Self::Float(v) => Some(*v),
			_ => None,
		}
	}

	/// Borrow the array payload, if any.
	pub fn as_array(&self) -> Option<&[Live]> {
		match self {
			Self::Array(items) => Some(items.as_slice()),
			_ => None,
		}
	}

	/// Convert into a typed value.
	pub fn into_typed<T: FromLive>(self) -> std::result::Result<T, Live> {
		T::from_live(self)
	}
}

/// Typed extraction from a [`Live`] value.
pub trait FromLive: Sized {
	/// Logical kind label used in mismatch errors.
	const EXPECTED: &'static str;

	/// Convert, handing the value back unchanged on mismatch.
	fn from_live(live: Live) -> std::result::Result<Self, Live>;
}

impl FromLive for Live {
	const EXPECTED: &'static str = "any";

	fn from_live(live: Live) -> std::result::Result<Self, Live> {
		Ok(live)
	}
}

impl FromLive for bool {
	const EXPECTED: &'static str = "bool";

	fn from_live(live: Live) -> std::result::Result<Self, Live> {
		match live {
			Live::Bool(v) => Ok(v),
			other => Err(other),
		}
	}
}

impl FromLive for i64 {
	const EXPECTED: &'static str = "int";

	fn from_live(live: Live) -> std::result::Result<Self, Live> {
		match live {
			Live::Int(v) => Ok(v),
			Live::Float(v) if v.fract() == 0.0 && v >= i64::MIN as f64 && v < i64::MAX as f64 => Ok(v as i64),
			other => Err(other),
		}
	}
}

impl FromLive for f64 {
	const EXPECTED: &'static str = "number";

	fn from_live(live: Live) -> std::result::Result<Self, Live> {
		match live {
			Live::Int(v) => Ok(v as f64),
			Live::Float(v) => Ok(v),
			other => Err(other),
		}
	}
}

impl FromLive for String {
	const EXPECTED: &'static str = "string";

	fn from_live(live: Live) -> std::result::Result<Self, Live> {
		match live {
			Live::String(text) => Ok(text.into_string()),
			other => Err(other),
		}
	}
}

impl FromLive for Box<str> {
	const EXPECTED: &'static str = "string";

	fn from_live(live: Live) -> std::result::Result<Self, Live> {
		match live {
			Live::String(text) => Ok(text),
			other => Err(other),
		}
	}
}

impl FromLive for ObjectValue {
	const EXPECTED: &'static str = "object";

	fn from_live(live: Live) -> std::result::Result<Self, Live> {
		match live {
			Live::Plain(item) => Ok(item),
			other => Err(other),
		}
	}
}

impl<T: Instance> FromLive for Arc<T> {
	const EXPECTED: &'static str = "instance";

	fn from_live(live: Live) -> std::result::Result<Self, Live> {
		match live {
			Live::Instance(item) => {
				let any: Arc<dyn Any + Send + Sync> = item.clone();
				any.downcast::<T>().map_err(|_| Live::Instance(item))
			}
			other => Err(other),
		}
	}
}

impl<T: FromLive> FromLive for Option<T> {
	const EXPECTED: &'static str = T::EXPECTED;

	fn from_live(live: Live) -> std::result::Result<Self, Live> {
		match live {
			Live::Null => Ok(None),
			other => T::from_live(other).map(Some),
		}
	}
}

impl<T: FromLive> FromLive for Vec<T> {
	const EXPECTED: &'static str = "array";

	fn from_live(live: Live) -> std::result::Result<Self, Live> {
		match live {
			Live::Array(items) => items.into_iter().map(T::from_live).collect(),
			other => Err(other),
		}
	}
}

impl From<bool> for Live {
	fn from(value: bool) -> Self {
		Self::Bool(value)
	}
}

impl From<i64> for Live {
	fn from(value: i64) -> Self {
		Self::Int(value)
	}
}

impl From<i32> for Live {
	fn from(value: i32) -> Self {
		Self::Int(i64::from(value))
	}
}

impl From<f64> for Live {
	fn from(value: f64) -> Self {
		Self::Float(value)
	}
}

impl From<&str> for Live {
	fn from(value: &str) -> Self {
		Self::String(value.into())
	}
}

impl From<String> for Live {
	fn from(value: String) -> Self {
		Self::String(value.into_boxed_str())
	}
}

impl From<Box<str>> for Live {
	fn from(value: Box<str>) -> Self {
		Self::String(value)
	}
}

impl From<ObjectValue> for Live {
	fn from(value: ObjectValue) -> Self {
		Self::Plain(value)
	}
}

impl<T: Instance> From<Arc<T>> for Live {
	fn from(value: Arc<T>) -> Self {
		Self::Instance(value)
	}
}

impl<T: Into<Live>> From<Vec<T>> for Live {
	fn from(value: Vec<T>) -> Self {
		Self::Array(value.into_iter().map(Into::into).collect())
	}
}

impl<T: Into<Live>> From<Option<T>> for Live {
	fn from(value: Option<T>) -> Self {
		value.map_or(Self::Null, Into::into)
	}
}

#[cfg(test)]
mod tests {
	use std::sync::Arc;

	use crate::codec::Live;
	use crate::codec::test_support::Vector;

	#[test]
	fn typed_conversion_hands_back_mismatches() {
		assert_eq!(Live::Int(4).into_typed::<i64>().expect("int converts"), 4);
		assert_eq!(Live::Float(6.0).into_typed::<i64>().expect("integral float converts"), 6);
		assert_eq!(Live::Null.into_typed::<Option<String>>().expect("null is absent"), None);

		let back = Live::from("left").into_typed::<f64>().expect_err("string is not a number");
		assert_eq!(back.as_str(), Some("left"));

		let point = Live::from(Vector::new(1.0, 2.0)).into_typed::<Arc<Vector>>().expect("vector downcasts");
		assert_eq!(point.as_ref(), &Vector { x: 1.0, y: 2.0 });
		let items = Live::from(vec![1_i64, 2]).into_typed::<Vec<i64>>().expect("ints convert");
		assert_eq!(items, [1, 2]);
	}
}
