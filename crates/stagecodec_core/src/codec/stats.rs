use crate::codec::Value;

/// Node distribution of a serialized tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeStats {
	/// Total nodes visited, including the root.
	pub nodes: usize,
	/// Objects carrying a type tag.
	pub tagged: usize,
	/// Objects without a type tag.
	pub plain: usize,
	/// Array nodes.
	pub arrays: usize,
	/// Reference nodes.
	pub references: usize,
	/// Deepest nesting level; the root is level 1.
	pub max_depth: usize,
}

impl TreeStats {
	/// Scan a tree and tally its nodes.
	pub fn scan(root: &Value) -> Self {
		let mut stats = Self::default();
		let mut stack = vec![(root, 1_usize)];
		while let Some((node, depth)) = stack.pop() {
			stats.nodes += 1;
			stats.max_depth = stats.max_depth.max(depth);
			match node {
				Value::Object(item) => {
					if item.is_tagged() {
						stats.tagged += 1;
					} else {
						stats.plain += 1;
					}
					stack.extend(item.fields.iter().map(|field| (&field.value, depth + 1)));
				}
				Value::Array(items) => {
					stats.arrays += 1;
					stack.extend(items.iter().map(|item| (item, depth + 1)));
				}
				Value::Ref(_) => stats.references += 1,
				_ => {}
			}
		}
		stats
	}
}

#[cfg(test)]
mod tests {
	use crate::codec::{TreeStats, Value};

	#[test]
	fn counts_node_kinds_and_depth() {
		let tree = Value::tagged(
			"Stage",
			[
				("items", Value::Array(vec![Value::Ref("/x".into()), Value::plain([("k", Value::Int(1))])])),
				("title", Value::string("t")),
			],
		);
		let stats = TreeStats::scan(&tree);
		assert_eq!(
			stats,
			TreeStats {
				nodes: 6,
				tagged: 1,
				plain: 1,
				arrays: 1,
				references: 1,
				max_depth: 4,
			}
		);
	}
}
