use std::fmt;

use crate::codec::{CodecError, Result, Value};

/// One parsed step of a reference path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathStep {
	/// Select a named object field.
	Field(Box<str>),
	/// Select an array element by zero-based index.
	Index(usize),
}

/// Parsed `/`-delimited reference path from the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefPath {
	/// Ordered sequence of path steps; empty for the root.
	pub steps: Vec<PathStep>,
}

impl RefPath {
	/// Parse path syntax such as `/nodes/3/details`. The empty string is the root.
	pub fn parse(input: &str) -> Result<Self> {
		if input.is_empty() {
			return Ok(Self::default());
		}

		let Some(body) = input.strip_prefix('/') else {
			return Err(malformed(input, "path must start with '/'"));
		};

		let mut steps = Vec::new();
		for segment in body.split('/') {
			if segment.is_empty() {
				return Err(malformed(input, "empty path segment"));
			}
			steps.push(parse_step(segment));
		}

		Ok(Self { steps })
	}

	/// Walk `root` along this path.
	pub fn lookup<'v>(&self, root: &'v Value) -> Result<&'v Value> {
		let fail = |reason| malformed(&self.to_string(), reason);
		let mut current = root;
		for step in &self.steps {
			current = match (step, current) {
				(PathStep::Field(name), Value::Object(item)) => item.get(name).ok_or_else(|| fail("missing field"))?,
				(PathStep::Index(idx), Value::Object(item)) => item.get(&idx.to_string()).ok_or_else(|| fail("missing field"))?,
				(PathStep::Index(idx), Value::Array(items)) => items.get(*idx).ok_or_else(|| fail("index out of range"))?,
				(PathStep::Field(_), Value::Array(_)) => return Err(fail("field step into array")),
				(_, Value::Ref(_)) => return Err(fail("path runs through a reference")),
				(_, _) => return Err(fail("path runs through a scalar")),
			};
		}
		Ok(current)
	}
}

impl fmt::Display for RefPath {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		for step in &self.steps {
			match step {
				PathStep::Field(name) => write!(f, "/{name}")?,
				PathStep::Index(idx) => write!(f, "/{idx}")?,
			}
		}
		Ok(())
	}
}

fn parse_step(segment: &str) -> PathStep {
	let canonical = segment == "0" || (!segment.starts_with('0') && segment.bytes().all(|byte| byte.is_ascii_digit()));
	match segment.parse::<usize>() {
		Ok(idx) if canonical => PathStep::Index(idx),
		_ => PathStep::Field(segment.into()),
	}
}

fn malformed(path: &str, reason: &'static str) -> CodecError {
	CodecError::MalformedReferencePath {
		path: path.to_owned(),
		reason,
	}
}
