//! Event listeners and their declarative wiring onto members.

use std::fmt;
use std::sync::Arc;

use crate::widget::WidgetRef;

/// Family of events a listener receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerKind {
	Action,
	Change,
	Item,
	Key,
	Mouse,
	Focus,
	Window,
}

impl ListenerKind {
	pub fn name(self) -> &'static str {
		match self {
			ListenerKind::Action => "action",
			ListenerKind::Change => "change",
			ListenerKind::Item => "item",
			ListenerKind::Key => "key",
			ListenerKind::Mouse => "mouse",
			ListenerKind::Focus => "focus",
			ListenerKind::Window => "window",
		}
	}
}

impl fmt::Display for ListenerKind {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

/// An event delivered to listeners.
#[derive(Debug, Clone)]
pub struct UiEvent {
	pub kind: ListenerKind,
	/// Free-form command string, e.g. the text of a pressed button.
	pub command: String,
	pub source: Option<WidgetRef>,
}

impl UiEvent {
	pub fn new(kind: ListenerKind) -> Self {
		Self {
			kind,
			command: String::new(),
			source: None,
		}
	}

	pub fn with_command(mut self, command: impl Into<String>) -> Self {
		self.command = command.into();
		self
	}

	pub fn with_source(mut self, source: WidgetRef) -> Self {
		self.source = Some(source);
		self
	}
}

type Callback = Arc<dyn Fn(&UiEvent) + Send + Sync>;

/// A listener of one [`ListenerKind`].
#[derive(Clone)]
pub struct Listener {
	kind: ListenerKind,
	callback: Callback,
}

impl Listener {
	pub fn new(kind: ListenerKind, callback: impl Fn(&UiEvent) + Send + Sync + 'static) -> Self {
		Self {
			kind,
			callback: Arc::new(callback),
		}
	}

	pub fn action(callback: impl Fn(&UiEvent) + Send + Sync + 'static) -> Self {
		Self::new(ListenerKind::Action, callback)
	}

	/// Adapts a plain method of `source` into a listener.
	pub fn adapt<S: Send + Sync + 'static>(
		kind: ListenerKind,
		source: Arc<S>,
		method: fn(&S, &UiEvent),
	) -> Self {
		Self::new(kind, move |event| method(&source, event))
	}

	pub fn kind(&self) -> ListenerKind {
		self.kind
	}

	/// Invokes the callback if `event` is of this listener's kind.
	pub fn notify(&self, event: &UiEvent) -> bool {
		if event.kind != self.kind {
			return false;
		}
		(self.callback)(event);
		true
	}

	pub fn ptr_eq(&self, other: &Listener) -> bool {
		Arc::ptr_eq(&self.callback, &other.callback)
	}
}

impl fmt::Debug for Listener {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "Listener({})", self.kind)
	}
}

/// One listener to attach to a set of members.
#[derive(Debug, Clone)]
pub struct ListenerBinding {
	pub kind: ListenerKind,
	pub targets: Vec<String>,
	pub listener: Listener,
}

/// Declarative table of `(kind, members, method)` entries for a source type.
pub struct ListenerTable<S> {
	entries: Vec<(ListenerKind, Vec<&'static str>, fn(&S, &UiEvent))>,
}

impl<S: Send + Sync + 'static> ListenerTable<S> {
	pub fn new() -> Self {
		Self { entries: Vec::new() }
	}

	pub fn on(mut self, kind: ListenerKind, targets: &[&'static str], method: fn(&S, &UiEvent)) -> Self {
		self.entries.push((kind, targets.to_vec(), method));
		self
	}

	/// Adapts every entry against `source`.
	pub fn bind(&self, source: &Arc<S>) -> Vec<ListenerBinding> {
		self.entries
			.iter()
			.map(|(kind, targets, method)| ListenerBinding {
				kind: *kind,
				targets: targets.iter().map(|t| t.to_string()).collect(),
				listener: Listener::adapt(*kind, source.clone(), *method),
			})
			.collect()
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

impl<S: Send + Sync + 'static> Default for ListenerTable<S> {
	fn default() -> Self {
		Self::new()
	}
}

/// A type whose methods listen on members of a GUI model.
pub trait ListenerSource: Send + Sync + Sized + 'static {
	fn listeners() -> ListenerTable<Self>;
}
