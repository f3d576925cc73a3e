//! Shared, lock-guarded handle around one member descriptor.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::attribute::AttributeSet;
use crate::descriptor::MemberDescriptor;
use crate::listener::Listener;
use crate::metadata::MetadataKind;
use crate::widget::{Widget, WidgetRef, WidgetSlot, downcast_widget};

/// Handle to one member of a built model.
///
/// Clones share state. All reads and writes go through a single mutex; the id
/// is immutable and read without locking. The reserved root member resolves
/// [`get`](Self::get) to the root widget and ignores [`set`](Self::set).
#[derive(Clone)]
pub struct FieldHandle {
	inner: Arc<FieldInner>,
}

struct FieldInner {
	id: u32,
	state: Mutex<FieldState>,
}

struct FieldState {
	descriptor: MemberDescriptor,
	value: Option<WidgetRef>,
	parent: Option<WidgetRef>,
	slot: Option<WidgetSlot>,
	listeners: Vec<Listener>,
}

impl FieldHandle {
	pub fn new(id: u32, descriptor: MemberDescriptor) -> Self {
		Self {
			inner: Arc::new(FieldInner {
				id,
				state: Mutex::new(FieldState {
					descriptor,
					value: None,
					parent: None,
					slot: None,
					listeners: Vec::new(),
				}),
			}),
		}
	}

	/// Handle for the root member, resolving to `root`.
	pub fn root(descriptor: MemberDescriptor, root: WidgetRef) -> Self {
		let mut descriptor = descriptor;
		descriptor.set_widget(root.clone());
		let handle = Self::new(0, descriptor);
		handle.inner.state.lock().parent = Some(root);
		handle
	}

	pub fn id(&self) -> u32 {
		self.inner.id
	}

	pub fn name(&self) -> String {
		self.inner.state.lock().descriptor.name().to_string()
	}

	pub fn is_root(&self) -> bool {
		self.inner.state.lock().descriptor.is_root()
	}

	/// Mirrors every later [`set`](Self::set) into `slot`.
	pub fn bind_slot(&self, slot: WidgetSlot) {
		self.inner.state.lock().slot = Some(slot);
	}

	pub fn get(&self) -> Option<WidgetRef> {
		let state = self.inner.state.lock();
		if state.descriptor.is_root() {
			return state.parent.clone();
		}
		state.value.clone()
	}

	pub fn get_as<T: Widget>(&self) -> Option<Arc<T>> {
		self.get().as_ref().and_then(downcast_widget::<T>)
	}

	/// Records `widget` as this member's value. No-op on the root member.
	pub fn set(&self, widget: WidgetRef) {
		let mut state = self.inner.state.lock();
		if state.descriptor.is_root() {
			return;
		}
		state.descriptor.set_widget(widget.clone());
		if let Some(slot) = &state.slot {
			slot.set(widget.clone());
		}
		state.value = Some(widget);
	}

	/// Snapshot of the descriptor.
	pub fn descriptor(&self) -> MemberDescriptor {
		self.inner.state.lock().descriptor.clone()
	}

	pub fn declared_type(&self) -> String {
		self.inner.state.lock().descriptor.declared_type().to_string()
	}

	/// Adds or merges `set` into the descriptor, returning the stored set.
	pub fn attach(&self, set: AttributeSet) -> AttributeSet {
		self.inner.state.lock().descriptor.attach(set).clone()
	}

	pub fn attribute_set(&self, kind: MetadataKind) -> Option<AttributeSet> {
		self.inner.state.lock().descriptor.set(kind).cloned()
	}

	pub fn add_listener(&self, listener: Listener) {
		self.inner.state.lock().listeners.push(listener);
	}

	pub fn listeners(&self) -> Vec<Listener> {
		self.inner.state.lock().listeners.clone()
	}

	pub fn ptr_eq(&self, other: &FieldHandle) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}
}

impl fmt::Debug for FieldHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let state = self.inner.state.lock();
		f.debug_struct("FieldHandle")
			.field("id", &self.inner.id)
			.field("name", &state.descriptor.name())
			.field("value", &state.value.as_ref().map(|w| w.type_name().to_string()))
			.field("listeners", &state.listeners.len())
			.finish()
	}
}
