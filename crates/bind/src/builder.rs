//! Pass 1: instantiate the root, create member widgets and run attribute
//! handlers.

use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use parking_lot::Mutex;
use rustc_hash::FxHashSet;

use crate::attribute::AttributeSet;
use crate::context::BindingContext;
use crate::decl::{ClassDecl, Gui, MemberDecl};
use crate::descriptor::{MemberDescriptor, ROOT_MEMBER};
use crate::error::{BindError, Result};
use crate::field::FieldHandle;
use crate::metadata::{Declaration, MetadataContext, kinds};
use crate::model::GuiModel;
use crate::schema::keys::toolkit;
use crate::value::{Arg, signature};
use crate::widget::WidgetFactory;

const READY: u8 = 0;
const BUILDING: u8 = 1;
const CLOSED: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuilderState {
	Ready,
	Building,
	Closed,
}

/// Single-use builder. Closed explicitly, by [`Builder::scope`], or on drop.
pub struct Builder {
	context: Arc<BindingContext>,
	state: AtomicU8,
	build_lock: Mutex<()>,
}

impl Builder {
	pub fn new(context: &Arc<BindingContext>) -> Self {
		Self {
			context: context.clone(),
			state: AtomicU8::new(READY),
			build_lock: Mutex::new(()),
		}
	}

	/// A builder already acquired for building.
	pub fn open(context: &Arc<BindingContext>) -> Self {
		let builder = Self::new(context);
		builder.state.store(BUILDING, Ordering::Release);
		builder
	}

	/// Runs `f` with an open builder and closes it on every exit path.
	pub fn scope<R>(context: &Arc<BindingContext>, f: impl FnOnce(&Builder) -> Result<R>) -> Result<R> {
		let builder = Self::open(context);
		let result = f(&builder);
		builder.close();
		result
	}

	pub fn state(&self) -> BuilderState {
		match self.state.load(Ordering::Acquire) {
			READY => BuilderState::Ready,
			BUILDING => BuilderState::Building,
			_ => BuilderState::Closed,
		}
	}

	pub fn close(&self) {
		self.state.store(CLOSED, Ordering::Release);
	}

	fn ensure_open(&self) -> Result<()> {
		if self.state.load(Ordering::Acquire) == CLOSED {
			return Err(BindError::BuilderClosed);
		}
		Ok(())
	}

	/// Populates `model`: root instance, root handle, then one handle per
	/// managed member, in declaration order.
	pub fn build<G: Gui>(&self, model: &mut GuiModel<G>, args: &[Arg]) -> Result<()> {
		self.ensure_open()?;
		let _guard = self.build_lock.lock();
		self.ensure_open()?;
		let _ = self
			.state
			.compare_exchange(READY, BUILDING, Ordering::AcqRel, Ordering::Acquire);

		let decl = model.declaration_arc();
		let root = match model.gui() {
			Some(gui) => gui.clone(),
			None => {
				let constructor = decl.find_constructor(args).ok_or_else(|| BindError::NoConstructor {
					class: decl.name(),
					signature: signature(args),
				})?;
				let gui = Arc::new(constructor.call(args));
				model.set_gui(gui.clone());
				gui
			}
		};

		if let Some(handle) = self.bind_root(&decl, &root)? {
			model.put_field(handle)?;
		}

		let mut ids = FieldIds::default();
		for member in decl.members() {
			if member.is_static() {
				continue;
			}
			if let Some(handle) = self.bind_member(model, &root, member, &mut ids)? {
				model.put_field(handle)?;
			}
		}
		Ok(())
	}

	fn bind_root<G: Gui>(&self, decl: &ClassDecl<G>, root: &G) -> Result<Option<FieldHandle>> {
		let Some(set) = self.managed_set(decl.declaration())? else {
			return Ok(None);
		};
		self.factory_for(&set)?;
		let widget = decl
			.root_widget_fn()
			.and_then(|accessor| accessor(root))
			.ok_or(BindError::RootNotWidget { class: decl.name() })?;

		let handle = FieldHandle::root(MemberDescriptor::with_defaults(ROOT_MEMBER, decl.name()), widget);
		self.dispatch(&handle, decl.declaration())?;
		Ok(Some(handle))
	}

	fn bind_member<G: Gui>(
		&self,
		model: &mut GuiModel<G>,
		root: &G,
		member: &MemberDecl<G>,
		ids: &mut FieldIds,
	) -> Result<Option<FieldHandle>> {
		let Some(set) = self.managed_set(member.declaration())? else {
			tracing::trace!(member = member.name(), "unmanaged member skipped");
			return Ok(None);
		};
		let id = ids.assign(member.name(), set.int(toolkit::ORDER));
		let factory = self.factory_for(&set)?;

		let widget = if member.is_nested() {
			match member.nested_fn() {
				Some(build) => {
					let child = build(&self.context)?;
					let widget = child.root_widget();
					model.put_nested(member.name(), child)?;
					widget
				}
				None => None,
			}
		} else if member.is_fixed() {
			member.slot_fn().and_then(|slot| slot(root).get())
		} else {
			factory.create(member.declared_type())
		};
		let widget = widget.ok_or_else(|| BindError::WidgetUnavailable {
			member: member.name().to_string(),
			declared_type: member.declared_type().to_string(),
		})?;

		let handle = FieldHandle::new(id, MemberDescriptor::with_defaults(member.name(), member.declared_type()));
		if let Some(slot) = member.slot_fn() {
			handle.bind_slot(slot(root).clone());
		}
		handle.set(widget);
		self.dispatch(&handle, member.declaration())?;
		tracing::trace!(member = member.name(), id, "member bound");
		Ok(Some(handle))
	}

	/// The `toolkit` (else `window`) set of a declaration, if it is managed.
	fn managed_set(&self, declaration: &Declaration) -> Result<Option<AttributeSet>> {
		let Some(metadata) = declaration
			.get(kinds::TOOLKIT)
			.or_else(|| declaration.get(kinds::WINDOW))
		else {
			return Ok(None);
		};
		let mut set = AttributeSet::passive(metadata.kind());
		set.ingest(metadata, &self.context.schema().table())?;
		Ok(Some(set))
	}

	fn factory_for(&self, set: &AttributeSet) -> Result<Arc<dyn WidgetFactory>> {
		let provider = set
			.name(toolkit::PROVIDER)
			.unwrap_or(&self.context.config().default_provider);
		Ok(self.context.factory(provider)?)
	}

	fn dispatch(&self, handle: &FieldHandle, declaration: &Declaration) -> Result<()> {
		for metadata in MetadataContext::collect_all(declaration) {
			let Some(handler) = self.context.handler_for(metadata.kind()) else {
				continue;
			};
			tracing::trace!(kind = %metadata.kind(), "dispatching handler");
			handler.on_member(handle, &metadata, &self.context)?;
		}
		Ok(())
	}
}

/// Member ids of one build. Id 0 belongs to the root; an explicit order that
/// is taken (or 0) falls back to the next id after the largest one.
#[derive(Debug, Default)]
struct FieldIds {
	last: u32,
	used: FxHashSet<u32>,
}

impl FieldIds {
	fn assign(&mut self, member: &str, order: Option<i64>) -> u32 {
		let explicit = order.map(|order| u32::try_from(order).unwrap_or(u32::MAX));
		let id = match explicit {
			Some(id) if id != 0 && !self.used.contains(&id) => id,
			Some(id) => {
				tracing::debug!(member, order = id, "order already taken, using next id");
				self.next()
			}
			None => self.next(),
		};
		self.used.insert(id);
		self.last = self.last.max(id);
		id
	}

	fn next(&self) -> u32 {
		self.last.saturating_add(1)
	}
}

impl Drop for Builder {
	fn drop(&mut self) {
		self.close();
	}
}

impl std::fmt::Debug for Builder {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Builder").field("state", &self.state()).finish()
	}
}
