//! Pass 2: run init hooks and attach each member to its declared target.

use std::sync::Arc;

use crate::context::BindingContext;
use crate::decl::Gui;
use crate::diagnostics::{Diagnostic, DiagnosticOrigin};
use crate::error::{BindError, Result};
use crate::field::FieldHandle;
use crate::metadata::kinds;
use crate::model::GuiModel;
use crate::schema::keys::option;
use crate::strategy::declared_edge;
use crate::widget::{Compose, ComposeError, Edge, SplitSide, WidgetRole};

pub struct Linker<'a> {
	context: &'a Arc<BindingContext>,
}

impl<'a> Linker<'a> {
	pub fn new(context: &'a Arc<BindingContext>) -> Self {
		Self { context }
	}

	/// Visits every handle in id order (ties keep declaration order).
	pub fn link<G: Gui>(&self, model: &GuiModel<G>) -> Result<()> {
		let mut handles: Vec<&FieldHandle> = model.fields().collect();
		handles.sort_by_key(|h| h.id());

		for handle in handles {
			let Some(options) = handle.attribute_set(kinds::OPTION) else {
				continue;
			};

			if let Some(hook) = options.name(option::INIT) {
				let decl = model.declaration();
				let run = decl.find_hook(hook).ok_or_else(|| BindError::HookNotFound {
					class: decl.name(),
					hook: hook.to_string(),
				})?;
				let gui = model.gui().ok_or(BindError::NotBuilt { class: decl.name() })?;
				tracing::trace!(hook, "running init hook");
				run(gui);
			}

			if let Some(target) = options.name(option::TARGET) {
				match model.field(target) {
					Some(target) => self.bind(handle, target)?,
					None => self.context.report(Diagnostic::new(
						DiagnosticOrigin::Link,
						handle.name(),
						format!("target `{target}` is not a member"),
					)),
				}
			}
		}
		Ok(())
	}

	/// Attaches `source`'s widget to `target`'s widget.
	pub fn bind(&self, source: &FieldHandle, target: &FieldHandle) -> Result<()> {
		let child_desc = source.descriptor();
		let parent_desc = target.descriptor();
		let compose_error = |error: ComposeError| BindError::Compose {
			child: child_desc.name().to_string(),
			parent: parent_desc.name().to_string(),
			error,
		};
		let (Some(child), Some(parent)) = (source.get(), target.get()) else {
			return Err(compose_error(ComposeError::Rejected("member has no widget".into())));
		};
		if source.ptr_eq(target) || std::ptr::addr_eq(Arc::as_ptr(&child), Arc::as_ptr(&parent)) {
			return Err(compose_error(ComposeError::Rejected("a widget cannot contain itself".into())));
		}
		tracing::trace!(child = child_desc.name(), parent = parent_desc.name(), "binding");

		if child.role() == WidgetRole::MenuBar {
			return match parent.role() {
				WidgetRole::Window => parent.compose(Compose::MenuBar(child)),
				_ => Err(ComposeError::Unsupported {
					target: parent.type_name().to_string(),
					operation: "menu bar",
				}),
			}
			.map_err(compose_error);
		}

		let special = match parent.role() {
			WidgetRole::MenuBar | WidgetRole::Menu => Some(Compose::Append {
				child: child.clone(),
				constraints: None,
			}),
			WidgetRole::TabHost => {
				let title = child_desc
					.set(kinds::OPTION)
					.and_then(|o| o.name(option::TITLE))
					.unwrap_or(child_desc.name())
					.to_string();
				Some(Compose::Tab {
					title,
					child: child.clone(),
				})
			}
			WidgetRole::ScrollHost => Some(Compose::Viewport(child.clone())),
			WidgetRole::SplitHost => match declared_edge(&child_desc) {
				Some(Edge::North | Edge::East) => Some(Compose::Split {
					side: SplitSide::Left,
					child: child.clone(),
				}),
				Some(Edge::South | Edge::West) => Some(Compose::Split {
					side: SplitSide::Right,
					child: child.clone(),
				}),
				_ => None,
			},
			_ => None,
		};
		if let Some(op) = special {
			return parent.compose(op).map_err(compose_error);
		}

		let layout = parent_desc
			.set(kinds::LAYOUT)
			.and_then(|layout| layout.composition().map(|strategy| (layout, strategy)));
		match layout {
			Some((layout, strategy)) => strategy
				.attach(layout, &child_desc, child, &parent)
				.map_err(compose_error),
			None => parent
				.compose(Compose::Append {
					child,
					constraints: None,
				})
				.map_err(compose_error),
		}
	}
}
