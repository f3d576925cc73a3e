//! The per-root model produced by building and linking a [`Gui`] type.

use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, OnceLock};

use indexmap::IndexMap;

use crate::builder::Builder;
use crate::context::BindingContext;
use crate::decl::{ClassDecl, Gui};
use crate::diagnostics::{Diagnostic, DiagnosticOrigin};
use crate::error::{BindError, Result};
use crate::field::FieldHandle;
use crate::linker::Linker;
use crate::listener::{Listener, ListenerSource};
use crate::registry::panic_message;
use crate::value::Arg;
use crate::widget::WidgetRef;

/// Type-erased view of a [`GuiModel`], used for nested models.
pub trait AnyGuiModel: Send + Sync + 'static {
	fn class_name(&self) -> &'static str;

	/// Widget of the root instance, if the root is a widget.
	fn root_widget(&self) -> Option<WidgetRef>;

	fn field(&self, name: &str) -> Option<&FieldHandle>;

	fn as_any(&self) -> &dyn Any;

	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

/// A built and linked GUI: the root instance, its members by name, and the
/// models of its nested members.
pub struct GuiModel<G: Gui> {
	decl: Arc<ClassDecl<G>>,
	context: Arc<BindingContext>,
	gui: OnceLock<Arc<G>>,
	fields: IndexMap<String, FieldHandle>,
	nested: IndexMap<String, Arc<dyn AnyGuiModel>>,
}

impl<G: Gui> GuiModel<G> {
	/// An unbuilt model. Fails unless `G` carries the gui marker.
	pub fn new_in(context: &Arc<BindingContext>) -> Result<Self> {
		let decl = G::declare();
		if !decl.is_gui() {
			return Err(BindError::NotAGui { class: decl.name() });
		}
		Ok(Self {
			decl: Arc::new(decl),
			context: context.clone(),
			gui: OnceLock::new(),
			fields: IndexMap::new(),
			nested: IndexMap::new(),
		})
	}

	/// Constructs, builds and links `G` in the global context.
	pub fn of(args: &[Arg]) -> Result<Self> {
		Self::of_in(&BindingContext::global(), args)
	}

	pub fn of_in(context: &Arc<BindingContext>, args: &[Arg]) -> Result<Self> {
		let mut model = Self::new_in(context)?;
		model.assemble(args)?;
		Ok(model)
	}

	/// Builds and links around an existing root instance.
	pub fn wrap(instance: G) -> Result<Self> {
		Self::wrap_in(&BindingContext::global(), instance)
	}

	pub fn wrap_in(context: &Arc<BindingContext>, instance: G) -> Result<Self> {
		let mut model = Self::new_in(context)?;
		model.set_gui(Arc::new(instance));
		model.assemble(&[])?;
		Ok(model)
	}

	fn assemble(&mut self, args: &[Arg]) -> Result<()> {
		tracing::debug!(class = self.decl.name(), "building model");
		let context = self.context.clone();
		Builder::scope(&context, |builder| builder.build(self, args))?;
		Linker::new(&context).link(self)?;
		tracing::debug!(class = self.decl.name(), fields = self.fields.len(), "model linked");
		Ok(())
	}

	pub fn declaration(&self) -> &ClassDecl<G> {
		&self.decl
	}

	pub(crate) fn declaration_arc(&self) -> Arc<ClassDecl<G>> {
		self.decl.clone()
	}

	pub fn context(&self) -> &Arc<BindingContext> {
		&self.context
	}

	pub fn gui(&self) -> Option<&Arc<G>> {
		self.gui.get()
	}

	/// Sets the root instance. Only the first assignment takes effect.
	pub fn set_gui(&self, gui: Arc<G>) -> bool {
		self.gui.set(gui).is_ok()
	}

	pub fn field(&self, name: &str) -> Option<&FieldHandle> {
		self.fields.get(name)
	}

	/// Handles in declaration order.
	pub fn fields(&self) -> impl Iterator<Item = &FieldHandle> {
		self.fields.values()
	}

	pub fn put_field(&mut self, handle: FieldHandle) -> Result<()> {
		let name = handle.name();
		if self.fields.contains_key(&name) {
			return Err(BindError::AlreadyBound { name });
		}
		self.fields.insert(name, handle);
		Ok(())
	}

	pub fn put_nested(&mut self, name: &str, model: Arc<dyn AnyGuiModel>) -> Result<()> {
		if self.nested.contains_key(name) {
			return Err(BindError::AlreadyBound { name: name.to_string() });
		}
		self.nested.insert(name.to_string(), model);
		Ok(())
	}

	pub fn nested_model<C: Gui>(&self, name: &str) -> Option<Arc<GuiModel<C>>> {
		self.nested.get(name)?.clone().into_any().downcast::<GuiModel<C>>().ok()
	}

	pub fn nested_models(&self) -> impl Iterator<Item = (&str, &Arc<dyn AnyGuiModel>)> {
		self.nested.iter().map(|(k, v)| (k.as_str(), v))
	}

	/// Runs the declared entry point on the root instance.
	///
	/// A panicking entry point is reported to diagnostics, not propagated.
	pub fn start(&self, args: &[Arg]) -> Result<()> {
		let entry = self
			.decl
			.entry_point_fn()
			.ok_or(BindError::EntryPointNotFound { class: self.decl.name() })?;
		let gui = self.gui().ok_or(BindError::NotBuilt { class: self.decl.name() })?;
		if let Err(payload) = catch_unwind(AssertUnwindSafe(|| entry(gui, args))) {
			self.context.report(Diagnostic::new(
				DiagnosticOrigin::EntryPoint,
				self.decl.name(),
				panic_message(&*payload),
			));
		}
		Ok(())
	}

	/// Attaches every listener declared by `source`. Returns how many
	/// attachments succeeded.
	pub fn link_listener<S: ListenerSource>(&self, source: Arc<S>) -> usize {
		let mut linked = 0;
		for binding in S::listeners().bind(&source) {
			for target in &binding.targets {
				if self.link_listener_to(target, binding.listener.clone()) {
					linked += 1;
				}
			}
		}
		linked
	}

	/// Attaches `listener` to `member`'s widget and records it on the handle.
	pub fn link_listener_to(&self, member: &str, listener: Listener) -> bool {
		let report = |message: String| {
			self.context
				.report(Diagnostic::new(DiagnosticOrigin::Listener, member, message));
		};
		let Some(handle) = self.fields.get(member) else {
			report(format!("no member named `{member}`"));
			return false;
		};
		let Some(widget) = handle.get() else {
			report("member has no widget".to_string());
			return false;
		};
		if !widget.listen(&listener) {
			report(format!("`{}` does not emit {} events", widget.type_name(), listener.kind()));
			return false;
		}
		handle.add_listener(listener);
		true
	}

	pub fn root_widget(&self) -> Option<WidgetRef> {
		let accessor = self.decl.root_widget_fn()?;
		accessor(self.gui()?)
	}
}

impl<G: Gui> AnyGuiModel for GuiModel<G> {
	fn class_name(&self) -> &'static str {
		self.decl.name()
	}

	fn root_widget(&self) -> Option<WidgetRef> {
		GuiModel::root_widget(self)
	}

	fn field(&self, name: &str) -> Option<&FieldHandle> {
		GuiModel::field(self, name)
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
		self
	}
}

impl<G: Gui> fmt::Debug for GuiModel<G> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GuiModel")
			.field("class", &self.decl.name())
			.field("built", &self.gui.get().is_some())
			.field("fields", &self.fields.keys().collect::<Vec<_>>())
			.field("nested", &self.nested.keys().collect::<Vec<_>>())
			.finish()
	}
}
