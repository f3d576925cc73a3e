//! Attribute sets: canonical-key property bags bound to one metadata kind.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use crate::context::BindingContext;
use crate::deferred::DeferredValue;
use crate::diagnostics::{Diagnostic, DiagnosticOrigin};
use crate::error::{BindError, Result};
use crate::metadata::{Metadata, MetadataKind};
use crate::schema::SchemaTable;
use crate::strategy::CompositionStrategy;
use crate::value::{AttrValue, FromAttrValue};
use crate::widget::WidgetRef;

/// Toolkit behavior of an attribute set.
///
/// This is the only place toolkit-specific widget mutation happens.
/// Implementations must be idempotent: applying the same set twice leaves the
/// widget as applying it once does.
pub trait Attribute: Send + Sync + fmt::Debug + 'static {
	fn apply_to(&self, attrs: &AttributeSet, widget: &WidgetRef, env: &ApplyEnv<'_>);

	/// True for behaviors that apply nothing. A passive set takes the
	/// behavior of the first active set merged into it.
	fn is_passive(&self) -> bool {
		false
	}

	/// Returns the composition strategy view of a layout behavior.
	fn as_composition(&self) -> Option<&dyn CompositionStrategy> {
		None
	}
}

/// Behavior of default sets: applies nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passive;

impl Attribute for Passive {
	fn apply_to(&self, _: &AttributeSet, _: &WidgetRef, _: &ApplyEnv<'_>) {}

	fn is_passive(&self) -> bool {
		true
	}
}

/// What an [`Attribute`] may consult while applying.
pub struct ApplyEnv<'a> {
	pub member: &'a str,
	pub context: &'a BindingContext,
}

impl<'a> ApplyEnv<'a> {
	pub fn new(member: &'a str, context: &'a BindingContext) -> Self {
		Self { member, context }
	}

	/// Reports a best-effort failure about this member.
	pub fn report(&self, message: impl Into<String>) {
		self.context
			.report(Diagnostic::new(DiagnosticOrigin::Attribute, self.member, message));
	}

	/// Resolves `raw`, following a `@source#key` reference when it is one.
	///
	/// Unresolvable references are reported and yield `None`.
	pub fn resolve_text(&self, raw: &str, widget: &WidgetRef) -> Option<String> {
		let deferred = match DeferredValue::parse(raw) {
			Ok(None) => return Some(raw.to_string()),
			Ok(Some(deferred)) => deferred,
			Err(e) => {
				self.context.report(Diagnostic::new(
					DiagnosticOrigin::DeferredValue,
					self.member,
					e.to_string(),
				));
				return None;
			}
		};
		match deferred.resolve(self.context.value_sources(), widget) {
			Ok(value) => Some(value),
			Err(e) => {
				self.context.report(Diagnostic::new(
					DiagnosticOrigin::DeferredValue,
					self.member,
					e.to_string(),
				));
				None
			}
		}
	}
}

/// Canonical-key attribute table of one metadata kind, plus its behavior.
#[derive(Clone)]
pub struct AttributeSet {
	kind: MetadataKind,
	values: IndexMap<Box<str>, AttrValue>,
	behavior: Arc<dyn Attribute>,
}

impl AttributeSet {
	pub fn new(kind: MetadataKind, behavior: Arc<dyn Attribute>) -> Self {
		Self {
			kind,
			values: IndexMap::new(),
			behavior,
		}
	}

	/// A set whose behavior applies nothing.
	pub fn passive(kind: MetadataKind) -> Self {
		Self::new(kind, Arc::new(Passive))
	}

	pub fn kind(&self) -> MetadataKind {
		self.kind
	}

	pub fn behavior(&self) -> &Arc<dyn Attribute> {
		&self.behavior
	}

	pub fn is_passive(&self) -> bool {
		self.behavior.is_passive()
	}

	/// Reads every schema-mapped property of `metadata` into this set.
	///
	/// Keys that already hold a value keep it. Returns the number of keys stored.
	pub fn ingest(&mut self, metadata: &Metadata, schema: &SchemaTable) -> Result<usize> {
		let keys = schema.keys(self.kind.name()).ok_or_else(|| BindError::UndefinedKind {
			kind: self.kind.name().to_string(),
		})?;
		let mut stored = 0;
		for (canonical, property) in keys {
			if let Some(value) = metadata.property(property)
				&& self.put(canonical, value.clone())
			{
				stored += 1;
			}
		}
		Ok(stored)
	}

	/// Stores `value` under `key` unless the key already holds a value.
	pub fn put(&mut self, key: &str, value: AttrValue) -> bool {
		if self.values.contains_key(key) {
			return false;
		}
		self.values.insert(key.into(), value);
		true
	}

	/// Copies the keys of `other` that this set does not hold yet. A passive
	/// set also takes the behavior of `other`.
	pub fn merge_from(&mut self, other: &AttributeSet) -> usize {
		if self.is_passive() && !other.is_passive() {
			self.behavior = other.behavior.clone();
		}
		let mut merged = 0;
		for (key, value) in &other.values {
			if self.put(key, value.clone()) {
				merged += 1;
			}
		}
		merged
	}

	pub fn get(&self, key: &str) -> Option<&AttrValue> {
		self.values.get(key)
	}

	/// True if `key` holds a value that is not a blank sentinel.
	pub fn has(&self, key: &str) -> bool {
		self.values.get(key).is_some_and(|v| !v.is_blank())
	}

	/// Typed read. A type mismatch yields `None`.
	pub fn get_typed<T: FromAttrValue>(&self, key: &str) -> Option<T> {
		self.values.get(key).and_then(T::from_attr)
	}

	/// Non-blank string or type name under `key`.
	pub fn name(&self, key: &str) -> Option<&str> {
		self.values
			.get(key)
			.filter(|v| !v.is_blank())
			.and_then(AttrValue::as_name)
	}

	/// Non-blank integer under `key`.
	pub fn int(&self, key: &str) -> Option<i64> {
		self.values
			.get(key)
			.filter(|v| !v.is_blank())
			.and_then(AttrValue::as_int)
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.values.keys().map(AsRef::as_ref)
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}

	pub fn apply_to(&self, widget: &WidgetRef, env: &ApplyEnv<'_>) {
		self.behavior.apply_to(self, widget, env);
	}

	/// The composition strategy of a layout set.
	pub fn composition(&self) -> Option<&dyn CompositionStrategy> {
		self.behavior.as_composition()
	}
}

impl fmt::Debug for AttributeSet {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AttributeSet")
			.field("kind", &self.kind.name())
			.field("values", &self.values)
			.field("behavior", &self.behavior)
			.finish()
	}
}
