use std::collections::HashMap;

use crate::codec::{CodecError, FieldValue, ObjectValue, RefPath, Result, Value};

/// Expand every reference node into a copy of the subtree it points at.
///
/// Paths are evaluated against the unmodified input tree. A substituted subtree
/// is resolved again, since the first occurrence of a shape may itself hold
/// references to earlier nodes.
pub fn resolve_references(root: &Value) -> Result<Value> {
	let mut resolver = Resolver {
		root,
		active: Vec::new(),
		done: HashMap::new(),
		expanded: 0,
	};
	let resolved = resolver.resolve(root)?;
	if resolver.expanded > 0 {
		log::debug!("expanded {} references ({} distinct targets)", resolver.expanded, resolver.done.len());
	}
	Ok(resolved)
}

struct Resolver<'v> {
	root: &'v Value,
	active: Vec<String>,
	done: HashMap<String, Value>,
	expanded: usize,
}

impl Resolver<'_> {
	fn resolve(&mut self, node: &Value) -> Result<Value> {
		match node {
			Value::Array(items) => {
				let mut out = Vec::with_capacity(items.len());
				for item in items {
					out.push(self.resolve(item)?);
				}
				Ok(Value::Array(out))
			}
			Value::Object(item) => {
				let mut fields = Vec::with_capacity(item.fields.len());
				for field in &item.fields {
					fields.push(FieldValue {
						name: field.name.clone(),
						value: self.resolve(&field.value)?,
					});
				}
				Ok(Value::Object(ObjectValue {
					type_name: item.type_name.clone(),
					fields,
				}))
			}
			Value::Ref(path) => self.expand(path),
			other => Ok(other.clone()),
		}
	}

	fn expand(&mut self, text: &str) -> Result<Value> {
		let path = RefPath::parse(text)?;
		let key = path.to_string();
		self.expanded += 1;
		if let Some(hit) = self.done.get(&key) {
			return Ok(hit.clone());
		}
		if self.active.contains(&key) {
			return Err(CodecError::ReferenceCycle { path: key });
		}

		let root = self.root;
		let target = path.lookup(root)?;
		self.active.push(key);
		let resolved = self.resolve(target);
		let key = self.active.pop().unwrap_or_default();
		let resolved = resolved?;
		log::trace!("resolved reference {key}");
		self.done.insert(key, resolved.clone());
		Ok(resolved)
	}
}
