//! Attribute handlers: the per-kind hook the builder calls for each member.

use std::sync::Arc;

use crate::attribute::{ApplyEnv, Attribute, AttributeSet};
use crate::context::BindingContext;
use crate::descriptor::MemberDescriptor;
use crate::diagnostics::Diagnostic;
use crate::diagnostics::DiagnosticOrigin;
use crate::error::{BindError, Result};
use crate::field::FieldHandle;
use crate::metadata::{Metadata, MetadataContext, MetadataKind};

/// Reacts to one metadata kind on a member.
pub trait AttributeHandler: Send + Sync {
	fn kind(&self) -> MetadataKind;

	fn on_member(&self, field: &FieldHandle, metadata: &MetadataContext, context: &BindingContext) -> Result<()>;
}

type BehaviorFactory = dyn Fn(&Metadata, &MemberDescriptor) -> Option<Arc<dyn Attribute>> + Send + Sync;

/// Generic create -> ingest -> attach -> apply handler.
///
/// For each instance in the context it picks a behavior, ingests the instance
/// into a fresh set, attaches the set to the member (merging first-write-wins
/// into an existing set of the same kind) and applies the merged set to the
/// member's widget. A factory returning `None` is
/// [`BindError::UnresolvedDescriptor`].
pub struct SetHandler {
	kind: MetadataKind,
	factory: Box<BehaviorFactory>,
}

impl SetHandler {
	pub fn new(
		kind: MetadataKind,
		factory: impl Fn(&Metadata, &MemberDescriptor) -> Option<Arc<dyn Attribute>> + Send + Sync + 'static,
	) -> Self {
		Self {
			kind,
			factory: Box::new(factory),
		}
	}

	/// Handler whose behavior does not depend on the instance.
	pub fn fixed(kind: MetadataKind, behavior: Arc<dyn Attribute>) -> Self {
		Self::new(kind, move |_, _| Some(behavior.clone()))
	}
}

impl AttributeHandler for SetHandler {
	fn kind(&self) -> MetadataKind {
		self.kind
	}

	fn on_member(&self, field: &FieldHandle, metadata: &MetadataContext, context: &BindingContext) -> Result<()> {
		let schema = context.schema().table();
		for instance in metadata.values() {
			let descriptor = field.descriptor();
			let behavior = (self.factory)(instance, &descriptor).ok_or_else(|| BindError::UnresolvedDescriptor {
				kind: self.kind.name(),
				member: descriptor.name().to_string(),
			})?;

			let mut set = AttributeSet::new(self.kind, behavior);
			set.ingest(instance, &schema)?;
			let merged = field.attach(set);

			let Some(widget) = field.get() else {
				context.report(Diagnostic::new(
					DiagnosticOrigin::Attribute,
					descriptor.name(),
					format!("no widget to apply `{}` to", self.kind),
				));
				continue;
			};
			tracing::trace!(member = %descriptor.name(), kind = %self.kind, "applying attribute set");
			merged.apply_to(&widget, &ApplyEnv::new(descriptor.name(), context));
		}
		Ok(())
	}
}

/// Handles a repetition container by expanding it and delegating every
/// contained instance to `inner`.
pub struct RepeatedHandler {
	element: MetadataKind,
	container: MetadataKind,
	inner: Arc<dyn AttributeHandler>,
}

impl RepeatedHandler {
	/// Returns `None` if `element` is not repeatable.
	pub fn new(element: MetadataKind, inner: Arc<dyn AttributeHandler>) -> Option<Self> {
		Some(Self {
			element,
			container: element.container()?,
			inner,
		})
	}

	/// Handler for a kind whose container is known up front.
	pub fn with_container(element: MetadataKind, container: MetadataKind, inner: Arc<dyn AttributeHandler>) -> Self {
		debug_assert_eq!(element.container(), Some(container));
		Self {
			element,
			container,
			inner,
		}
	}
}

impl AttributeHandler for RepeatedHandler {
	fn kind(&self) -> MetadataKind {
		self.container
	}

	fn on_member(&self, field: &FieldHandle, metadata: &MetadataContext, context: &BindingContext) -> Result<()> {
		let expanded = metadata.expand(self.element)?;
		self.inner.on_member(field, &expanded, context)
	}
}
