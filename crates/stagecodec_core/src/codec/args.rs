use std::any::Any;
use std::collections::VecDeque;

use crate::codec::live::{FromLive, Live};
use crate::codec::{CodecError, Result};

/// One assembled constructor argument.
pub enum Arg<'c> {
	/// Caller-supplied context, possibly absent.
	Context(Option<&'c dyn Any>),
	/// One positional field value.
	Value(Live),
	/// Complete field map for whole-object classes.
	Object(Fields),
}

impl Arg<'_> {
	fn kind(&self) -> &'static str {
		match self {
			Self::Context(_) => "context",
			Self::Value(_) => "value",
			Self::Object(_) => "object",
		}
	}
}

/// Ordered cursor over the arguments handed to a registered constructor.
pub struct Args<'c> {
	type_name: &'static str,
	items: VecDeque<Arg<'c>>,
	position: usize,
}

impl<'c> Args<'c> {
	/// Wrap an assembled argument list for class `type_name`.
	pub fn new(type_name: &'static str, items: Vec<Arg<'c>>) -> Self {
		Self {
			type_name,
			items: items.into(),
			position: 0,
		}
	}

	/// Stable name of the class under construction.
	pub fn type_name(&self) -> &'static str {
		self.type_name
	}

	/// Number of arguments not yet consumed.
	pub fn remaining(&self) -> usize {
		self.items.len()
	}

	/// Take the next argument as a context of type `T`.
	pub fn context<T: Any>(&mut self) -> Result<&'c T> {
		let position = self.position;
		self.context_opt::<T>()?.ok_or(CodecError::ContextMismatch {
			type_name: self.type_name,
			position,
			expected: std::any::type_name::<T>(),
		})
	}

	/// Take the next argument as an optional context of type `T`.
	pub fn context_opt<T: Any>(&mut self) -> Result<Option<&'c T>> {
		let (type_name, position) = (self.type_name, self.position);
		let mismatch = move || CodecError::ContextMismatch {
			type_name,
			position,
			expected: std::any::type_name::<T>(),
		};
		let ctx = match self.items.front() {
			Some(Arg::Context(ctx)) => *ctx,
			_ => return Err(mismatch()),
		};
		let typed = match ctx {
			Some(ctx) => Some(ctx.downcast_ref::<T>().ok_or_else(mismatch)?),
			None => None,
		};
		self.advance();
		Ok(typed)
	}

	/// Take the next positional field value.
	pub fn next<T: FromLive>(&mut self) -> Result<T> {
		let position = self.position;
		self.next_opt::<T>()?.ok_or(CodecError::MissingArgument {
			type_name: self.type_name,
			position,
			expected: T::EXPECTED,
		})
	}

	/// Take the next positional field value, or `None` when no positional values remain.
	pub fn next_opt<T: FromLive>(&mut self) -> Result<Option<T>> {
		if !matches!(self.items.front(), Some(Arg::Value(_))) {
			return Ok(None);
		}
		let position = self.position;
		let Some(Arg::Value(live)) = self.advance() else {
			return Ok(None);
		};
		T::from_live(live).map(Some).map_err(|bad| CodecError::ArgumentMismatch {
			type_name: self.type_name,
			position,
			expected: T::EXPECTED,
			got: bad.kind(),
		})
	}

	/// Take the whole-object field map.
	pub fn object(&mut self) -> Result<Fields> {
		let position = self.position;
		match self.advance() {
			Some(Arg::Object(fields)) => Ok(fields),
			Some(other) => Err(CodecError::ArgumentMismatch {
				type_name: self.type_name,
				position,
				expected: "object",
				got: other.kind(),
			}),
			None => Err(CodecError::MissingArgument {
				type_name: self.type_name,
				position,
				expected: "object",
			}),
		}
	}

	fn advance(&mut self) -> Option<Arg<'c>> {
		let item = self.items.pop_front()?;
		self.position += 1;
		Some(item)
	}
}

/// Children-resolved field map passed to whole-object constructors.
#[derive(Debug, Clone)]
pub struct Fields {
	type_name: &'static str,
	entries: Vec<(Box<str>, Live)>,
}

impl Fields {
	/// Wrap decoded field entries of class `type_name`.
	pub fn new(type_name: &'static str, entries: Vec<(Box<str>, Live)>) -> Self {
		Self { type_name, entries }
	}

	/// Number of fields present.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Whether no fields are present.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Borrow one field by name.
	pub fn get(&self, name: &str) -> Option<&Live> {
		self.entries.iter().find(|(key, _)| key.as_ref() == name).map(|(_, value)| value)
	}

	/// Iterate fields in node order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Live)> {
		self.entries.iter().map(|(key, value)| (key.as_ref(), value))
	}

	/// Remove and convert a required field.
	pub fn take<T: FromLive>(&mut self, name: &str) -> Result<T> {
		self.take_opt::<T>(name)?.ok_or_else(|| CodecError::MissingField {
			type_name: self.type_name,
			field: name.to_owned(),
		})
	}

	/// Remove and convert a field that may be absent.
	pub fn take_opt<T: FromLive>(&mut self, name: &str) -> Result<Option<T>> {
		let Some(idx) = self.entries.iter().position(|(key, _)| key.as_ref() == name) else {
			return Ok(None);
		};
		let (_, live) = self.entries.remove(idx);
		T::from_live(live).map(Some).map_err(|bad| CodecError::FieldTypeMismatch {
			type_name: self.type_name,
			field: name.to_owned(),
			expected: T::EXPECTED,
			got: bad.kind(),
		})
	}
}
