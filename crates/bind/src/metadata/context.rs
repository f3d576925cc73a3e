use super::{CONTAINED, Declaration, Metadata, MetadataKind};
use crate::error::{BindError, Result};
use crate::value::AttrValue;

/// Uniform "zero, one or many" view of one metadata kind on a declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataContext {
	kind: MetadataKind,
	values: Vec<Metadata>,
	repeated: bool,
}

impl MetadataContext {
	/// Resolves `kind` against `declaration`, unwrapping its repetition
	/// container when present.
	pub fn resolve(kind: MetadataKind, declaration: &Declaration) -> Result<Self> {
		if let Some(container) = kind.container()
			&& let Some(holder) = declaration.get(container)
		{
			return Ok(Self {
				kind,
				values: contained(kind, holder)?.to_vec(),
				repeated: true,
			});
		}
		Ok(Self {
			kind,
			values: declaration.get(kind).cloned().into_iter().collect(),
			repeated: false,
		})
	}

	/// One context per distinct kind on `declaration`, each holding exactly
	/// one instance. A container is its own kind here.
	pub fn collect_all(declaration: &Declaration) -> Vec<Self> {
		declaration
			.iter()
			.map(|m| Self {
				kind: m.kind(),
				values: vec![m.clone()],
				repeated: false,
			})
			.collect()
	}

	/// Turns a container context into a context over the `element` instances it
	/// holds. A context that is not `element`'s container is returned as is.
	pub fn expand(&self, element: MetadataKind) -> Result<Self> {
		if element.container() != Some(self.kind) {
			return Ok(self.clone());
		}
		let mut values = Vec::new();
		for holder in &self.values {
			values.extend_from_slice(contained(element, holder)?);
		}
		Ok(Self {
			kind: element,
			values,
			repeated: true,
		})
	}

	pub fn kind(&self) -> MetadataKind {
		self.kind
	}

	pub fn is_present(&self) -> bool {
		!self.values.is_empty()
	}

	pub fn is_repeated(&self) -> bool {
		self.repeated
	}

	/// The single instance. `None` when absent or repeated.
	pub fn value(&self) -> Option<&Metadata> {
		match (self.repeated, self.values.as_slice()) {
			(false, [single]) => Some(single),
			_ => None,
		}
	}

	pub fn values(&self) -> &[Metadata] {
		&self.values
	}

	/// Calls `f` with the single instance, if there is one.
	pub fn for_each_present(&self, f: impl FnOnce(&Metadata)) {
		if let Some(value) = self.value() {
			f(value);
		}
	}

	pub fn for_each(&self, f: impl FnMut(&Metadata)) {
		self.values.iter().for_each(f);
	}
}

fn contained(kind: MetadataKind, holder: &Metadata) -> Result<&[Metadata]> {
	match holder.property(CONTAINED) {
		Some(AttrValue::Nested(values)) => Ok(values),
		_ => Err(BindError::UnreadableContainer {
			kind: kind.name(),
			container: holder.kind().name(),
		}),
	}
}
