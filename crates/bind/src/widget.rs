//! The toolkit-facing widget abstraction.
//!
//! The engine never inspects concrete widgets. It asks a widget for its
//! [`WidgetRole`] when linking and hands it [`Compose`] operations; everything
//! else goes through [`Attribute`](crate::attribute::Attribute) behaviors
//! supplied by the toolkit.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::listener::Listener;

pub type WidgetRef = Arc<dyn Widget>;

/// Opaque layout manager produced by a composition strategy.
pub type LayoutManager = Arc<dyn Any + Send + Sync>;

/// What a widget is, as far as composition is concerned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetRole {
	/// Top-level window. Accepts a menu bar and appended children.
	Window,
	MenuBar,
	Menu,
	/// Container whose children become titled tabs.
	TabHost,
	/// Container with a single scrolled viewport.
	ScrollHost,
	/// Container with a left and a right pane.
	SplitHost,
	/// Generic container.
	Container,
	/// Anything that holds no children.
	Leaf,
}

/// Compass edge used by border constraints and split placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Edge {
	North,
	South,
	East,
	West,
	Center,
}

impl Edge {
	/// Parses an edge name, case-insensitively.
	pub fn parse(name: &str) -> Option<Self> {
		match name.to_ascii_lowercase().as_str() {
			"north" => Some(Edge::North),
			"south" => Some(Edge::South),
			"east" => Some(Edge::East),
			"west" => Some(Edge::West),
			"center" => Some(Edge::Center),
			_ => None,
		}
	}

	pub fn as_str(self) -> &'static str {
		match self {
			Edge::North => "north",
			Edge::South => "south",
			Edge::East => "east",
			Edge::West => "west",
			Edge::Center => "center",
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SplitSide {
	Left,
	Right,
}

/// Placement information passed along with an appended child.
#[derive(Clone)]
pub enum Constraints {
	Edge(Edge),
	Named(String),
	/// Strategy-specific constraint object.
	Custom(Arc<dyn Any + Send + Sync>),
}

impl Constraints {
	pub fn as_edge(&self) -> Option<Edge> {
		match self {
			Constraints::Edge(e) => Some(*e),
			_ => None,
		}
	}

	pub fn downcast<T: Any + Send + Sync>(&self) -> Option<&T> {
		match self {
			Constraints::Custom(c) => c.downcast_ref(),
			_ => None,
		}
	}
}

impl fmt::Debug for Constraints {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Constraints::Edge(e) => write!(f, "Constraints::Edge({e:?})"),
			Constraints::Named(n) => write!(f, "Constraints::Named({n:?})"),
			Constraints::Custom(_) => f.write_str("Constraints::Custom(..)"),
		}
	}
}

/// A structural change requested of a parent widget.
#[derive(Debug, Clone)]
pub enum Compose {
	Append {
		child: WidgetRef,
		constraints: Option<Constraints>,
	},
	MenuBar(WidgetRef),
	Tab { title: String, child: WidgetRef },
	Viewport(WidgetRef),
	Split { side: SplitSide, child: WidgetRef },
}

impl Compose {
	pub fn name(&self) -> &'static str {
		match self {
			Compose::Append { .. } => "append",
			Compose::MenuBar(_) => "menu bar",
			Compose::Tab { .. } => "tab",
			Compose::Viewport(_) => "viewport",
			Compose::Split { .. } => "split",
		}
	}
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ComposeError {
	#[error("`{target}` does not accept {operation}")]
	Unsupported {
		target: String,
		operation: &'static str,
	},
	#[error("{0}")]
	Rejected(String),
}

/// A live widget owned by a toolkit.
pub trait Widget: Any + Send + Sync + fmt::Debug {
	fn type_name(&self) -> &str;

	fn role(&self) -> WidgetRole {
		WidgetRole::Leaf
	}

	fn compose(&self, op: Compose) -> Result<(), ComposeError> {
		Err(ComposeError::Unsupported {
			target: self.type_name().to_string(),
			operation: op.name(),
		})
	}

	/// Attaches `listener`. Returns false if this widget does not emit its kind.
	fn listen(&self, _listener: &Listener) -> bool {
		false
	}

	fn as_any(&self) -> &dyn Any;

	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl dyn Widget {
	pub fn downcast_ref<T: Widget>(&self) -> Option<&T> {
		self.as_any().downcast_ref()
	}
}

/// Downcasts a shared widget to its concrete type.
pub fn downcast_widget<T: Widget>(widget: &WidgetRef) -> Option<Arc<T>> {
	widget.clone().into_any().downcast::<T>().ok()
}

/// Storage for a member's widget inside a root instance.
///
/// Clones share the same cell, so the engine and the root instance see the
/// same value.
#[derive(Clone, Default)]
pub struct WidgetSlot(Arc<RwLock<Option<WidgetRef>>>);

impl WidgetSlot {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with(widget: WidgetRef) -> Self {
		Self(Arc::new(RwLock::new(Some(widget))))
	}

	pub fn get(&self) -> Option<WidgetRef> {
		self.0.read().clone()
	}

	pub fn get_as<T: Widget>(&self) -> Option<Arc<T>> {
		self.get().as_ref().and_then(downcast_widget::<T>)
	}

	pub fn set(&self, widget: WidgetRef) {
		*self.0.write() = Some(widget);
	}

	pub fn is_empty(&self) -> bool {
		self.0.read().is_none()
	}

	pub fn shares(&self, other: &WidgetSlot) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl fmt::Debug for WidgetSlot {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &*self.0.read() {
			Some(w) => write!(f, "WidgetSlot({})", w.type_name()),
			None => f.write_str("WidgetSlot(empty)"),
		}
	}
}

/// Creates widgets by declared type name.
pub trait WidgetFactory: Send + Sync {
	/// Name members use to select this factory as their provider.
	fn name(&self) -> &str;

	fn create(&self, declared_type: &str) -> Option<WidgetRef>;
}
