//! Declaration tables describing a GUI type to the engine.
//!
//! A root type implements [`Gui`] and returns a [`ClassDecl`] listing its
//! class metadata, constructors, members, named hooks and entry point.
//!
//! ```ignore
//! impl Gui for HelloWorld {
//!     fn declare() -> ClassDecl<Self> {
//!         ClassDecl::gui("HelloWorld")
//!             .constructor(&[], |_| HelloWorld::default())
//!             .member(
//!                 MemberDecl::new("frame", "Frame")
//!                     .meta(Metadata::window())
//!                     .meta(Metadata::layout("border")),
//!             )
//!             .member(
//!                 MemberDecl::new("button", "Button")
//!                     .meta(Metadata::toolkit())
//!                     .meta(Metadata::option().with("target", "frame").with("text", "Press Me!"))
//!                     .slot(|gui: &HelloWorld| &gui.button),
//!             )
//!     }
//! }
//! ```

use std::fmt;
use std::sync::Arc;

use crate::context::BindingContext;
use crate::error::Result;
use crate::metadata::{Declaration, Metadata, kinds};
use crate::model::{AnyGuiModel, GuiModel};
use crate::value::{Arg, ArgType};
use crate::widget::{WidgetRef, WidgetSlot};

/// A type that can be bound into a widget tree.
pub trait Gui: Send + Sync + Sized + 'static {
	fn declare() -> ClassDecl<Self>;
}

pub type RootWidgetFn<G> = fn(&G) -> Option<WidgetRef>;
pub type SlotFn<G> = fn(&G) -> &WidgetSlot;
pub type HookFn<G> = fn(&G);
pub type EntryPointFn<G> = fn(&G, &[Arg]);
pub(crate) type NestedBuildFn = fn(&Arc<BindingContext>) -> Result<Arc<dyn AnyGuiModel>>;

pub struct Constructor<G> {
	params: Vec<ArgType>,
	build: fn(&[Arg]) -> G,
}

impl<G> Constructor<G> {
	pub fn params(&self) -> &[ArgType] {
		&self.params
	}

	/// True if `args` match the parameter types exactly.
	pub fn accepts(&self, args: &[Arg]) -> bool {
		self.params.len() == args.len() && self.params.iter().zip(args).all(|(p, a)| *p == a.arg_type())
	}

	pub(crate) fn call(&self, args: &[Arg]) -> G {
		(self.build)(args)
	}
}

pub struct ClassDecl<G> {
	name: &'static str,
	declaration: Declaration,
	constructors: Vec<Constructor<G>>,
	root_widget: Option<RootWidgetFn<G>>,
	members: Vec<MemberDecl<G>>,
	hooks: Vec<(&'static str, HookFn<G>)>,
	entry_point: Option<EntryPointFn<G>>,
}

impl<G: Gui> ClassDecl<G> {
	/// An empty declaration without the gui marker.
	pub fn new(name: &'static str) -> Self {
		Self {
			name,
			declaration: Declaration::new(),
			constructors: Vec::new(),
			root_widget: None,
			members: Vec::new(),
			hooks: Vec::new(),
			entry_point: None,
		}
	}

	/// A declaration carrying the gui marker.
	pub fn gui(name: &'static str) -> Self {
		Self::new(name).meta(Metadata::gui())
	}

	pub fn meta(mut self, metadata: Metadata) -> Self {
		self.declaration.push(metadata);
		self
	}

	pub fn constructor(mut self, params: &[ArgType], build: fn(&[Arg]) -> G) -> Self {
		self.constructors.push(Constructor {
			params: params.to_vec(),
			build,
		});
		self
	}

	/// Accessor for the widget the root instance itself is.
	pub fn root_widget(mut self, accessor: RootWidgetFn<G>) -> Self {
		self.root_widget = Some(accessor);
		self
	}

	pub fn member(mut self, member: MemberDecl<G>) -> Self {
		self.members.push(member);
		self
	}

	/// Registers a method that `option.init` may name.
	pub fn hook(mut self, name: &'static str, hook: HookFn<G>) -> Self {
		self.hooks.push((name, hook));
		self
	}

	pub fn entry_point(mut self, entry: EntryPointFn<G>) -> Self {
		self.entry_point = Some(entry);
		self
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn declaration(&self) -> &Declaration {
		&self.declaration
	}

	pub fn is_gui(&self) -> bool {
		self.declaration.contains(kinds::GUI)
	}

	pub fn members(&self) -> &[MemberDecl<G>] {
		&self.members
	}

	pub fn find_constructor(&self, args: &[Arg]) -> Option<&Constructor<G>> {
		self.constructors.iter().find(|c| c.accepts(args))
	}

	pub fn root_widget_fn(&self) -> Option<RootWidgetFn<G>> {
		self.root_widget
	}

	pub fn find_hook(&self, name: &str) -> Option<HookFn<G>> {
		self.hooks.iter().find(|(n, _)| *n == name).map(|(_, h)| *h)
	}

	pub fn entry_point_fn(&self) -> Option<EntryPointFn<G>> {
		self.entry_point
	}
}

impl<G> fmt::Debug for ClassDecl<G> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ClassDecl")
			.field("name", &self.name)
			.field("declaration", &self.declaration)
			.field("constructors", &self.constructors.len())
			.field("members", &self.members.iter().map(|m| m.name).collect::<Vec<_>>())
			.field("hooks", &self.hooks.iter().map(|(n, _)| *n).collect::<Vec<_>>())
			.finish_non_exhaustive()
	}
}

pub struct MemberDecl<G> {
	name: &'static str,
	declared_type: String,
	declaration: Declaration,
	is_static: bool,
	fixed: bool,
	slot: Option<SlotFn<G>>,
	nested: Option<NestedBuildFn>,
}

impl<G: Gui> MemberDecl<G> {
	pub fn new(name: &'static str, declared_type: impl Into<String>) -> Self {
		Self {
			name,
			declared_type: declared_type.into(),
			declaration: Declaration::new(),
			is_static: false,
			fixed: false,
			slot: None,
			nested: None,
		}
	}

	/// A managed member built from `C`'s own declaration.
	pub fn nested<C: Gui>(name: &'static str) -> Self {
		let mut member = Self::new(name, std::any::type_name::<C>())
			.meta(Metadata::toolkit())
			.meta(Metadata::new(kinds::NESTED));
		member.nested = Some(build_nested::<C>);
		member
	}

	pub fn meta(mut self, metadata: Metadata) -> Self {
		self.declaration.push(metadata);
		self
	}

	/// Storage in the root instance that receives the member's widget.
	pub fn slot(mut self, accessor: SlotFn<G>) -> Self {
		self.slot = Some(accessor);
		self
	}

	/// The widget already sits in the slot; it is read rather than created.
	pub fn fixed(mut self) -> Self {
		self.fixed = true;
		self
	}

	/// Skipped by the builder.
	pub fn static_member(mut self) -> Self {
		self.is_static = true;
		self
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn declared_type(&self) -> &str {
		&self.declared_type
	}

	pub fn declaration(&self) -> &Declaration {
		&self.declaration
	}

	pub fn is_static(&self) -> bool {
		self.is_static
	}

	pub fn is_fixed(&self) -> bool {
		self.fixed
	}

	pub fn is_nested(&self) -> bool {
		self.declaration.contains(kinds::NESTED)
	}

	pub fn slot_fn(&self) -> Option<SlotFn<G>> {
		self.slot
	}

	pub(crate) fn nested_fn(&self) -> Option<NestedBuildFn> {
		self.nested
	}
}

fn build_nested<C: Gui>(context: &Arc<BindingContext>) -> Result<Arc<dyn AnyGuiModel>> {
	Ok(Arc::new(GuiModel::<C>::of_in(context, &[])?))
}
