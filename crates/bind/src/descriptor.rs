//! Per-member record of attribute sets.

use crate::attribute::AttributeSet;
use crate::metadata::{MetadataKind, kinds};
use crate::widget::WidgetRef;

/// Name of the reserved member referring to the root itself.
pub const ROOT_MEMBER: &str = "$this";

/// Everything known about one member: its name, declared type, widget and at
/// most one [`AttributeSet`] per metadata kind.
#[derive(Debug, Clone)]
pub struct MemberDescriptor {
	name: String,
	declared_type: String,
	sets: Vec<AttributeSet>,
	widget: Option<WidgetRef>,
}

impl MemberDescriptor {
	pub fn new(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			declared_type: declared_type.into(),
			sets: Vec::new(),
			widget: None,
		}
	}

	/// A descriptor carrying passive `option` and `position` sets.
	pub fn with_defaults(name: impl Into<String>, declared_type: impl Into<String>) -> Self {
		let mut descriptor = Self::new(name, declared_type);
		descriptor.add_if_absent(AttributeSet::passive(kinds::OPTION));
		descriptor.add_if_absent(AttributeSet::passive(kinds::POSITION));
		descriptor
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn declared_type(&self) -> &str {
		&self.declared_type
	}

	pub fn is_root(&self) -> bool {
		self.name == ROOT_MEMBER
	}

	pub fn describes(&self, kind: MetadataKind) -> bool {
		self.set(kind).is_some()
	}

	/// Adds `set` unless a set of its kind exists.
	pub fn add_if_absent(&mut self, set: AttributeSet) -> bool {
		if self.describes(set.kind()) {
			return false;
		}
		self.sets.push(set);
		true
	}

	/// Adds `set`, or merges it into the existing set of its kind.
	///
	/// Returns the stored set after the operation.
	pub fn attach(&mut self, set: AttributeSet) -> &AttributeSet {
		match self.sets.iter().position(|s| s.kind() == set.kind()) {
			Some(pos) => {
				self.sets[pos].merge_from(&set);
				&self.sets[pos]
			}
			None => {
				self.sets.push(set);
				&self.sets[self.sets.len() - 1]
			}
		}
	}

	pub fn set(&self, kind: MetadataKind) -> Option<&AttributeSet> {
		self.sets.iter().find(|s| s.kind() == kind)
	}

	pub fn sets(&self) -> &[AttributeSet] {
		&self.sets
	}

	pub fn widget(&self) -> Option<&WidgetRef> {
		self.widget.as_ref()
	}

	pub(crate) fn set_widget(&mut self, widget: WidgetRef) {
		self.widget = Some(widget);
	}
}
