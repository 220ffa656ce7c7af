//! Fixture classes shared by codec unit tests.

use std::sync::Arc;

use crate::codec::{Args, Instance, Live, ObjectValue, Persist, Registry, Result, Value};

/// Caller context handed to context-aware constructors.
#[derive(Debug)]
pub(crate) struct Project {
	pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Vector {
	pub x: f64,
	pub y: f64,
}

impl Vector {
	pub fn new(x: f64, y: f64) -> Arc<Self> {
		Arc::new(Self { x, y })
	}
}

impl Instance for Vector {
	fn field(&self, name: &str) -> Option<Live> {
		match name {
			"x" => Some(self.x.into()),
			"y" => Some(self.y.into()),
			_ => None,
		}
	}
}

impl Persist for Vector {
	const TYPE_NAME: &'static str = "Vector";

	fn construct(args: &mut Args<'_>) -> Result<Self> {
		Ok(Self {
			x: args.next()?,
			y: args.next()?,
		})
	}
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Color {
	pub r: i64,
	pub g: i64,
	pub b: i64,
	pub a: f64,
}

impl Color {
	pub fn new(r: i64, g: i64, b: i64, a: f64) -> Arc<Self> {
		Arc::new(Self { r, g, b, a })
	}
}

impl Instance for Color {
	fn field(&self, name: &str) -> Option<Live> {
		match name {
			"r" => Some(self.r.into()),
			"g" => Some(self.g.into()),
			"b" => Some(self.b.into()),
			"a" => Some(self.a.into()),
			_ => None,
		}
	}
}

impl Persist for Color {
	const TYPE_NAME: &'static str = "Color";

	fn construct(args: &mut Args<'_>) -> Result<Self> {
		Ok(Self {
			r: args.next()?,
			g: args.next()?,
			b: args.next()?,
			a: args.next()?,
		})
	}
}

/// General-purpose class exercising every field kind, tagged `A`.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Sample {
	pub prop_string: String,
	pub prop_number: f64,
	pub prop_boolean: bool,
	pub prop_array: Vec<String>,
	pub nested_object: ObjectValue,
	pub nested_instance: Option<Arc<Sample>>,
}

impl Instance for Sample {
	fn field(&self, name: &str) -> Option<Live> {
		match name {
			"propString" => Some(self.prop_string.as_str().into()),
			"propNumber" => Some(self.prop_number.into()),
			"propBoolean" => Some(self.prop_boolean.into()),
			"propArray" => Some(self.prop_array.clone().into()),
			"nestedObject" => Some(self.nested_object.clone().into()),
			"nestedInstance" => self.nested_instance.clone().map(Live::from),
			_ => None,
		}
	}
}

impl Persist for Sample {
	const TYPE_NAME: &'static str = "A";

	fn construct(args: &mut Args<'_>) -> Result<Self> {
		Ok(Self {
			prop_string: args.next()?,
			prop_number: args.next()?,
			prop_boolean: args.next()?,
			prop_array: args.next()?,
			nested_object: args.next()?,
			nested_instance: args.next_opt()?,
		})
	}
}

/// `A("nested", 123, true, ["nested"], {name: "X", age: 2000})` inside
/// `A("root", 1, false, [], {}, ..)`.
pub(crate) fn sample_pair() -> Arc<Sample> {
	let nested = Sample {
		prop_string: "nested".into(),
		prop_number: 123.0,
		prop_boolean: true,
		prop_array: vec!["nested".into()],
		nested_object: plain_object([("name", Value::string("X")), ("age", Value::Int(2000))]),
		nested_instance: None,
	};
	Arc::new(Sample {
		prop_string: "root".into(),
		prop_number: 1.0,
		prop_boolean: false,
		prop_array: Vec::new(),
		nested_object: ObjectValue::default(),
		nested_instance: Some(Arc::new(nested)),
	})
}

/// Six-field stage entity, rebuilt from the whole field map plus the project context.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextNode {
	pub uuid: String,
	pub text: String,
	pub location: Arc<Vector>,
	pub size: Arc<Vector>,
	pub color: Arc<Color>,
	pub details: String,
	pub project: Option<String>,
}

impl TextNode {
	pub fn new(uuid: &str, text: &str, x: f64, y: f64) -> Arc<Self> {
		Arc::new(Self {
			uuid: uuid.into(),
			text: text.into(),
			location: Vector::new(x, y),
			size: Vector::new(120.0, 40.0),
			color: Color::new(0, 0, 0, 0.0),
			details: String::new(),
			project: None,
		})
	}
}

impl Instance for TextNode {
	fn field(&self, name: &str) -> Option<Live> {
		match name {
			"uuid" => Some(self.uuid.as_str().into()),
			"text" => Some(self.text.as_str().into()),
			"location" => Some(self.location.clone().into()),
			"size" => Some(self.size.clone().into()),
			"color" => Some(self.color.clone().into()),
			"details" => Some(self.details.as_str().into()),
			_ => None,
		}
	}
}

impl Persist for TextNode {
	const TYPE_NAME: &'static str = "TextNode";

	fn construct(args: &mut Args<'_>) -> Result<Self> {
		let project = args.context_opt::<Project>()?;
		let mut fields = args.object()?;
		Ok(Self {
			uuid: fields.take("uuid")?,
			text: fields.take("text")?,
			location: fields.take("location")?,
			size: fields.take("size")?,
			color: fields.take("color")?,
			details: fields.take_opt("details")?.unwrap_or_default(),
			project: project.map(|item| item.name.clone()),
		})
	}
}

/// Association between two nodes, with the project context passed last.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Edge {
	pub source: Arc<TextNode>,
	pub target: Arc<TextNode>,
	pub label: String,
	pub project: Option<String>,
}

impl Edge {
	pub fn new(source: &Arc<TextNode>, target: &Arc<TextNode>, label: &str) -> Arc<Self> {
		Arc::new(Self {
			source: source.clone(),
			target: target.clone(),
			label: label.into(),
			project: None,
		})
	}
}

impl Instance for Edge {
	fn field(&self, name: &str) -> Option<Live> {
		match name {
			"source" => Some(self.source.clone().into()),
			"target" => Some(self.target.clone().into()),
			"label" => Some(self.label.as_str().into()),
			_ => None,
		}
	}
}

impl Persist for Edge {
	const TYPE_NAME: &'static str = "LineEdge";

	fn construct(args: &mut Args<'_>) -> Result<Self> {
		let source = args.next()?;
		let target = args.next()?;
		let label = args.next()?;
		let project = args.context_opt::<Project>()?;
		Ok(Self {
			source,
			target,
			label,
			project: project.map(|item| item.name.clone()),
		})
	}
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Stage {
	pub entities: Vec<Arc<TextNode>>,
	pub associations: Vec<Arc<Edge>>,
}

impl Instance for Stage {
	fn field(&self, name: &str) -> Option<Live> {
		match name {
			"entities" => Some(self.entities.clone().into()),
			"associations" => Some(self.associations.clone().into()),
			_ => None,
		}
	}
}

impl Persist for Stage {
	const TYPE_NAME: &'static str = "Stage";

	fn construct(args: &mut Args<'_>) -> Result<Self> {
		Ok(Self {
			entities: args.next()?,
			associations: args.next()?,
		})
	}
}

/// Carries a callback, which has no tree representation.
#[derive(Debug)]
pub(crate) struct Hook;

impl Instance for Hook {
	fn field(&self, name: &str) -> Option<Live> {
		(name == "onClick").then_some(Live::Opaque("function"))
	}
}

impl Persist for Hook {
	const TYPE_NAME: &'static str = "Hook";

	fn construct(_args: &mut Args<'_>) -> Result<Self> {
		Ok(Self)
	}
}

/// Fields answered in one order, declared in another.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Ordered {
	pub alpha: i64,
	pub beta: i64,
}

impl Instance for Ordered {
	fn field(&self, name: &str) -> Option<Live> {
		match name {
			"alpha" => Some(self.alpha.into()),
			"beta" => Some(self.beta.into()),
			_ => None,
		}
	}
}

impl Persist for Ordered {
	const TYPE_NAME: &'static str = "Ordered";

	fn construct(args: &mut Args<'_>) -> Result<Self> {
		let beta = args.next()?;
		let alpha = args.next()?;
		Ok(Self { alpha, beta })
	}
}

/// Never registered.
#[derive(Debug)]
pub(crate) struct Stray;

impl Instance for Stray {
	fn field(&self, _name: &str) -> Option<Live> {
		None
	}
}

pub(crate) fn plain_object(fields: impl IntoIterator<Item = (&'static str, Value)>) -> ObjectValue {
	match Value::plain(fields) {
		Value::Object(item) => item,
		_ => unreachable!("plain always builds an object"),
	}
}

/// Registry holding every fixture class except [`Stray`].
pub(crate) fn registry() -> Registry {
	build_registry().expect("fixture field names are valid")
}

fn build_registry() -> Result<Registry> {
	let mut registry = Registry::new();
	registry.class::<Vector>().fields(&["x", "y"])?;
	registry.class::<Color>().fields(&["r", "g", "b", "a"])?;
	registry
		.class::<Sample>()
		.fields(&["propString", "propNumber", "propBoolean", "propArray", "nestedObject", "nestedInstance"])?;
	registry
		.class::<TextNode>()
		.fields(&["uuid", "text", "location", "size", "color", "details"])?
		.context_first()
		.whole_object();
	registry.class::<Edge>().fields(&["source", "target", "label"])?.context_last();
	registry.class::<Stage>().fields(&["entities", "associations"])?;
	registry.class::<Hook>().field("onClick")?;
	registry.class::<Ordered>().fields(&["beta", "alpha"])?;
	Ok(registry)
}

/// Two nodes joined by one edge.
pub(crate) fn small_stage() -> Arc<Stage> {
	let first = TextNode::new("n-1", "first", 0.0, 0.0);
	let second = TextNode::new("n-2", "second", 200.0, 0.0);
	let edge = Edge::new(&first, &second, "");
	Arc::new(Stage {
		entities: vec![first, second],
		associations: vec![edge],
	})
}
