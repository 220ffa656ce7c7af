use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::{Arc, OnceLock};

use crate::codec::json::{REF_KEY, TAG_KEY};
use crate::codec::{Args, CodecError, Instance, Result};

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Type-erased constructor stored per registered class.
pub type Constructor = fn(&mut Args<'_>) -> Result<Arc<dyn Instance>>;

/// Class that can be registered for encoding and rebuilt from a tagged node.
pub trait Persist: Instance + Sized {
	/// Build-independent name written as the node type tag.
	const TYPE_NAME: &'static str;

	/// Rebuild an instance from arguments assembled per the class marshaling flags.
	fn construct(args: &mut Args<'_>) -> Result<Self>;
}

/// One declared serializable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
	/// Field identifier.
	pub name: Box<str>,
	/// Zero-based declaration index within the owning class.
	pub index: u32,
}

/// Constructor argument marshaling switches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MarshalFlags {
	/// Pass the caller context before field arguments.
	pub context_first: bool,
	/// Pass the caller context after field arguments.
	pub context_last: bool,
	/// Pass the complete field map instead of one argument per field.
	pub whole_object: bool,
}

/// Names one marshaling switch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarshalFlag {
	/// See [`MarshalFlags::context_first`].
	ContextFirst,
	/// See [`MarshalFlags::context_last`].
	ContextLast,
	/// See [`MarshalFlags::whole_object`].
	WholeObject,
}

impl MarshalFlags {
	/// Turn on one switch.
	pub fn set(&mut self, flag: MarshalFlag) {
		match flag {
			MarshalFlag::ContextFirst => self.context_first = true,
			MarshalFlag::ContextLast => self.context_last = true,
			MarshalFlag::WholeObject => self.whole_object = true,
		}
	}
}

/// Registered class metadata.
#[derive(Debug, Clone)]
pub struct ClassEntry {
	/// Stable type tag.
	pub type_name: &'static str,
	/// Rust type identity.
	pub type_id: TypeId,
	/// Rust type name, for diagnostics.
	pub rust_type: &'static str,
	/// Serializable fields in declaration order.
	pub fields: Vec<FieldSpec>,
	/// Constructor argument marshaling switches.
	pub flags: MarshalFlags,
	construct: Constructor,
	next_index: u32,
}

impl ClassEntry {
	/// Invoke the registered constructor.
	pub fn construct(&self, args: &mut Args<'_>) -> Result<Arc<dyn Instance>> {
		(self.construct)(args)
	}

	/// Look up a declared field by name.
	pub fn field(&self, name: &str) -> Option<&FieldSpec> {
		self.fields.iter().find(|spec| spec.name.as_ref() == name)
	}
}

/// Class metadata store: field declarations, marshaling flags, and tag lookup.
#[derive(Debug, Default)]
pub struct Registry {
	classes: Vec<ClassEntry>,
	by_type: HashMap<TypeId, usize>,
	by_name: HashMap<&'static str, usize>,
}

impl Registry {
	/// Create an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Register `T` explicitly, returning its entry.
	pub fn register_class<T: Persist>(&mut self) -> &mut ClassEntry {
		let idx = self.ensure_class::<T>();
		&mut self.classes[idx]
	}

	/// Declare a serializable field on `T`, returning its declaration index.
	///
	/// Also registers `T` under [`Persist::TYPE_NAME`]. Declaring a field that is
	/// already known returns its existing index. Names must be non-empty, free of
	/// `/`, and distinct from the reserved keys `_` and `$`.
	pub fn register_field<T: Persist>(&mut self, name: &str) -> Result<u32> {
		let idx = self.ensure_class::<T>();
		let entry = &mut self.classes[idx];
		if let Some(reason) = field_name_problem(name) {
			return Err(CodecError::InvalidFieldName {
				type_name: entry.type_name,
				field: name.to_owned(),
				reason,
			});
		}
		if let Some(existing) = entry.field(name) {
			log::trace!("{}: field {name} already declared at {}", entry.type_name, existing.index);
			return Ok(existing.index);
		}

		let index = entry.next_index;
		entry.next_index += 1;
		entry.fields.push(FieldSpec { name: name.into(), index });
		log::trace!("{}: declared field {name} at {index}", entry.type_name);
		Ok(index)
	}

	/// Turn on one marshaling switch for `T`.
	pub fn register_flag<T: Persist>(&mut self, flag: MarshalFlag) {
		let idx = self.ensure_class::<T>();
		self.classes[idx].flags.set(flag);
	}

	/// Fluent registration hooks for `T`.
	pub fn class<T: Persist>(&mut self) -> ClassBuilder<'_, T> {
		self.ensure_class::<T>();
		ClassBuilder {
			registry: self,
			marker: PhantomData,
		}
	}

	/// Resolve a type tag to its class entry.
	pub fn lookup_class(&self, name: &str) -> Result<&ClassEntry> {
		self.by_name
			.get(name)
			.map(|idx| &self.classes[*idx])
			.ok_or_else(|| CodecError::UnknownTypeTag { tag: name.to_owned() })
	}

	/// Stable name registered for a Rust type.
	pub fn resolve_stable_name(&self, type_id: TypeId) -> Option<&'static str> {
		self.by_type.get(&type_id).map(|idx| self.classes[*idx].type_name)
	}

	/// Class entry for a live instance.
	pub fn entry_for(&self, instance: &dyn Instance, path: &str) -> Result<&ClassEntry> {
		let any: &dyn Any = instance;
		self.by_type
			.get(&Any::type_id(any))
			.map(|idx| &self.classes[*idx])
			.ok_or_else(|| CodecError::UnresolvableTypeName {
				rust_type: instance.rust_type_name(),
				path: path.to_owned(),
			})
	}

	/// Iterate registered classes in registration order.
	pub fn classes(&self) -> impl Iterator<Item = &ClassEntry> {
		self.classes.iter()
	}

	/// Number of registered classes.
	pub fn len(&self) -> usize {
		self.classes.len()
	}

	/// Whether no class has been registered.
	pub fn is_empty(&self) -> bool {
		self.classes.is_empty()
	}

	/// Install this registry as the process-wide default.
	pub fn install(self) -> Result<&'static Registry> {
		let mut slot = Some(self);
		let installed = GLOBAL.get_or_init(|| slot.take().unwrap_or_default());
		if slot.is_some() {
			return Err(CodecError::RegistryAlreadyInstalled);
		}
		log::debug!("installed global registry with {} classes", installed.len());
		Ok(installed)
	}

	/// The process-wide registry, once installed.
	pub fn global() -> Result<&'static Registry> {
		GLOBAL.get().ok_or(CodecError::RegistryNotInstalled)
	}

	fn ensure_class<T: Persist>(&mut self) -> usize {
		let type_id = TypeId::of::<T>();
		if let Some(idx) = self.by_type.get(&type_id) {
			return *idx;
		}

		let idx = self.classes.len();
		self.classes.push(ClassEntry {
			type_name: T::TYPE_NAME,
			type_id,
			rust_type: std::any::type_name::<T>(),
			fields: Vec::new(),
			flags: MarshalFlags::default(),
			construct: construct_erased::<T>,
			next_index: 0,
		});
		self.by_type.insert(type_id, idx);
		if let Some(previous) = self.by_name.insert(T::TYPE_NAME, idx) {
			log::warn!(
				"type tag {} re-registered: {} replaces {}",
				T::TYPE_NAME,
				std::any::type_name::<T>(),
				self.classes[previous].rust_type
			);
		}
		log::trace!("registered class {} as {}", std::any::type_name::<T>(), T::TYPE_NAME);
		idx
	}
}

fn field_name_problem(name: &str) -> Option<&'static str> {
	if name.is_empty() {
		Some("empty name")
	} else if name.contains('/') {
		Some("contains the path separator '/'")
	} else if name == TAG_KEY || name == REF_KEY {
		Some("reserved wire key")
	} else {
		None
	}
}

fn construct_erased<T: Persist>(args: &mut Args<'_>) -> Result<Arc<dyn Instance>> {
	let item = T::construct(args)?;
	Ok(Arc::new(item))
}

/// Fluent registration hooks bound to one class.
pub struct ClassBuilder<'r, T> {
	registry: &'r mut Registry,
	marker: PhantomData<fn() -> T>,
}

impl<T: Persist> ClassBuilder<'_, T> {
	/// Declare one serializable field.
	pub fn field(self, name: &str) -> Result<Self> {
		self.registry.register_field::<T>(name)?;
		Ok(self)
	}

	/// Declare several serializable fields in order, stopping at the first invalid name.
	pub fn fields(self, names: &[&str]) -> Result<Self> {
		for name in names {
			self.registry.register_field::<T>(name)?;
		}
		Ok(self)
	}

	/// Pass the caller context as the first constructor argument.
	pub fn context_first(self) -> Self {
		self.registry.register_flag::<T>(MarshalFlag::ContextFirst);
		self
	}

	/// Pass the caller context as the last constructor argument.
	pub fn context_last(self) -> Self {
		self.registry.register_flag::<T>(MarshalFlag::ContextLast);
		self
	}

	/// Pass the complete field map instead of positional field arguments.
	pub fn whole_object(self) -> Self {
		self.registry.register_flag::<T>(MarshalFlag::WholeObject);
		self
	}
}
