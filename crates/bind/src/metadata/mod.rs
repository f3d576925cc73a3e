//! Declarative metadata attached to GUI types and their members.
//!
//! A [`Metadata`] instance is one annotation: a [`MetadataKind`] plus a bag of
//! raw, camelCase-named properties. A [`Declaration`] is the ordered set of
//! instances on one class or member. Declaring a repeatable kind twice wraps the
//! instances into the kind's repetition container, the same shape a compiler
//! gives repeated annotations.

mod context;

use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

pub use self::context::MetadataContext;
use crate::value::AttrValue;

/// Raw property under which a repetition container stores its instances.
pub const CONTAINED: &str = "value";

/// Identity of a metadata kind.
///
/// Kinds compare by name only.
#[derive(Debug, Clone, Copy)]
pub struct MetadataKind {
	name: &'static str,
	container: Option<&'static str>,
}

impl MetadataKind {
	/// Declares a kind that may appear at most once per declaration.
	pub const fn new(name: &'static str) -> Self {
		Self {
			name,
			container: None,
		}
	}

	/// Declares a kind whose repeated instances are wrapped in `container`.
	pub const fn repeatable(name: &'static str, container: &'static str) -> Self {
		Self {
			name,
			container: Some(container),
		}
	}

	pub const fn name(self) -> &'static str {
		self.name
	}

	/// Returns the repetition container kind, if this kind is repeatable.
	pub const fn container(self) -> Option<MetadataKind> {
		match self.container {
			Some(name) => Some(MetadataKind::new(name)),
			None => None,
		}
	}

	pub const fn is_repeatable(self) -> bool {
		self.container.is_some()
	}
}

impl PartialEq for MetadataKind {
	fn eq(&self, other: &Self) -> bool {
		self.name == other.name
	}
}

impl Eq for MetadataKind {}

impl Hash for MetadataKind {
	fn hash<H: Hasher>(&self, state: &mut H) {
		self.name.hash(state);
	}
}

impl fmt::Display for MetadataKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

/// Built-in metadata kinds.
pub mod kinds {
	use super::MetadataKind;

	/// Marks a type as a bindable GUI root.
	pub const GUI: MetadataKind = MetadataKind::new("gui");
	/// Member (or class) built by a widget factory.
	pub const TOOLKIT: MetadataKind = MetadataKind::new("toolkit");
	/// Like [`TOOLKIT`], for top-level windows.
	pub const WINDOW: MetadataKind = MetadataKind::new("window");
	/// Member built from its own GUI declaration.
	pub const NESTED: MetadataKind = MetadataKind::new("nested");
	pub const OPTION: MetadataKind = MetadataKind::repeatable("option", "options");
	/// Repetition container of [`OPTION`].
	pub const OPTIONS: MetadataKind = MetadataKind::new("options");
	pub const POSITION: MetadataKind = MetadataKind::new("position");
	pub const BOUNDS: MetadataKind = MetadataKind::new("bounds");
	pub const LAYOUT: MetadataKind = MetadataKind::new("layout");
	pub const MARGIN: MetadataKind = MetadataKind::new("margin");
	pub const MODEL: MetadataKind = MetadataKind::new("model");
}

/// One metadata instance: a kind and its raw properties.
#[derive(Debug, Clone, PartialEq)]
pub struct Metadata {
	kind: MetadataKind,
	props: IndexMap<Box<str>, AttrValue>,
}

impl Metadata {
	pub fn new(kind: MetadataKind) -> Self {
		Self {
			kind,
			props: IndexMap::new(),
		}
	}

	pub fn gui() -> Self {
		Self::new(kinds::GUI)
	}

	pub fn toolkit() -> Self {
		Self::new(kinds::TOOLKIT)
	}

	pub fn window() -> Self {
		Self::new(kinds::WINDOW)
	}

	pub fn option() -> Self {
		Self::new(kinds::OPTION)
	}

	pub fn position() -> Self {
		Self::new(kinds::POSITION)
	}

	pub fn bounds() -> Self {
		Self::new(kinds::BOUNDS)
	}

	/// Layout metadata naming its composition strategy.
	pub fn layout(strategy: &str) -> Self {
		Self::new(kinds::LAYOUT).with(CONTAINED, AttrValue::ty(strategy))
	}

	/// Margin metadata naming its border kind.
	pub fn margin(border: &str) -> Self {
		Self::new(kinds::MARGIN).with(CONTAINED, AttrValue::ty(border))
	}

	/// Model metadata naming the data model type.
	pub fn model(model: &str) -> Self {
		Self::new(kinds::MODEL).with(CONTAINED, AttrValue::ty(model))
	}

	/// Wraps `instances` into the repetition container `container`.
	pub fn container(container: MetadataKind, instances: Vec<Metadata>) -> Self {
		Self::new(container).with(CONTAINED, AttrValue::Nested(instances))
	}

	/// Sets a raw property. Later calls overwrite earlier ones.
	pub fn with(mut self, prop: &str, value: impl Into<AttrValue>) -> Self {
		self.props.insert(prop.into(), value.into());
		self
	}

	pub fn kind(&self) -> MetadataKind {
		self.kind
	}

	pub fn property(&self, prop: &str) -> Option<&AttrValue> {
		self.props.get(prop)
	}

	pub fn properties(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
		self.props.iter().map(|(k, v)| (k.as_ref(), v))
	}
}

/// The metadata declared on one class or member, at most one entry per kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Declaration {
	entries: Vec<Metadata>,
}

impl Declaration {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(mut self, metadata: Metadata) -> Self {
		self.push(metadata);
		self
	}

	/// Adds an instance.
	///
	/// A second instance of a repeatable kind turns the pair into the kind's
	/// container; further instances are appended to it. A second instance of a
	/// non-repeatable kind is ignored.
	pub fn push(&mut self, metadata: Metadata) {
		let kind = metadata.kind();
		if let Some(container) = kind.container() {
			if let Some(holder) = self.entries.iter_mut().find(|e| e.kind() == container) {
				match holder.props.get_mut(CONTAINED) {
					Some(AttrValue::Nested(instances)) => instances.push(metadata),
					_ => tracing::debug!(kind = %kind, "malformed repetition container, instance dropped"),
				}
				return;
			}
			if let Some(pos) = self.entries.iter().position(|e| e.kind() == kind) {
				let first = self.entries.remove(pos);
				self.entries
					.insert(pos, Metadata::container(container, vec![first, metadata]));
				return;
			}
		} else if self.contains(kind) {
			tracing::debug!(kind = %kind, "duplicate metadata ignored");
			return;
		}
		self.entries.push(metadata);
	}

	/// Adds an instance verbatim, without container normalization.
	pub fn push_raw(&mut self, metadata: Metadata) {
		self.entries.push(metadata);
	}

	pub fn get(&self, kind: MetadataKind) -> Option<&Metadata> {
		self.entries.iter().find(|e| e.kind() == kind)
	}

	pub fn contains(&self, kind: MetadataKind) -> bool {
		self.get(kind).is_some()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Metadata> {
		self.entries.iter()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}
