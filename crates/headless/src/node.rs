//! The in-memory widget tree.

use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;
use weft_bind::{Compose, ComposeError, Constraints, Listener, ListenerKind, SplitSide, UiEvent, Widget, WidgetRef, WidgetRole};

use crate::color::Color;
use crate::layout::LayoutState;
use crate::margin::Border;

/// Every widget kind the headless toolkit can create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
	Frame,
	Dialog,
	InternalFrame,
	DesktopPane,
	Panel,
	ToolBar,
	Button,
	ToggleButton,
	CheckBox,
	RadioButton,
	Label,
	TextField,
	PasswordField,
	TextArea,
	TextPane,
	ComboBox,
	List,
	Table,
	Tree,
	Spinner,
	ProgressBar,
	Separator,
	MenuBar,
	Menu,
	MenuItem,
	TabbedPane,
	ScrollPane,
	SplitPane,
}

const ALL: &[NodeKind] = &[
	NodeKind::Frame,
	NodeKind::Dialog,
	NodeKind::InternalFrame,
	NodeKind::DesktopPane,
	NodeKind::Panel,
	NodeKind::ToolBar,
	NodeKind::Button,
	NodeKind::ToggleButton,
	NodeKind::CheckBox,
	NodeKind::RadioButton,
	NodeKind::Label,
	NodeKind::TextField,
	NodeKind::PasswordField,
	NodeKind::TextArea,
	NodeKind::TextPane,
	NodeKind::ComboBox,
	NodeKind::List,
	NodeKind::Table,
	NodeKind::Tree,
	NodeKind::Spinner,
	NodeKind::ProgressBar,
	NodeKind::Separator,
	NodeKind::MenuBar,
	NodeKind::Menu,
	NodeKind::MenuItem,
	NodeKind::TabbedPane,
	NodeKind::ScrollPane,
	NodeKind::SplitPane,
];

impl NodeKind {
	pub fn all() -> &'static [NodeKind] {
		ALL
	}

	/// Looks a kind up by its type name.
	pub fn parse(name: &str) -> Option<Self> {
		ALL.iter().copied().find(|k| k.name() == name)
	}

	pub fn name(self) -> &'static str {
		match self {
			NodeKind::Frame => "Frame",
			NodeKind::Dialog => "Dialog",
			NodeKind::InternalFrame => "InternalFrame",
			NodeKind::DesktopPane => "DesktopPane",
			NodeKind::Panel => "Panel",
			NodeKind::ToolBar => "ToolBar",
			NodeKind::Button => "Button",
			NodeKind::ToggleButton => "ToggleButton",
			NodeKind::CheckBox => "CheckBox",
			NodeKind::RadioButton => "RadioButton",
			NodeKind::Label => "Label",
			NodeKind::TextField => "TextField",
			NodeKind::PasswordField => "PasswordField",
			NodeKind::TextArea => "TextArea",
			NodeKind::TextPane => "TextPane",
			NodeKind::ComboBox => "ComboBox",
			NodeKind::List => "List",
			NodeKind::Table => "Table",
			NodeKind::Tree => "Tree",
			NodeKind::Spinner => "Spinner",
			NodeKind::ProgressBar => "ProgressBar",
			NodeKind::Separator => "Separator",
			NodeKind::MenuBar => "MenuBar",
			NodeKind::Menu => "Menu",
			NodeKind::MenuItem => "MenuItem",
			NodeKind::TabbedPane => "TabbedPane",
			NodeKind::ScrollPane => "ScrollPane",
			NodeKind::SplitPane => "SplitPane",
		}
	}

	pub fn role(self) -> WidgetRole {
		match self {
			NodeKind::Frame | NodeKind::Dialog | NodeKind::InternalFrame => WidgetRole::Window,
			NodeKind::MenuBar => WidgetRole::MenuBar,
			NodeKind::Menu => WidgetRole::Menu,
			NodeKind::TabbedPane => WidgetRole::TabHost,
			NodeKind::ScrollPane => WidgetRole::ScrollHost,
			NodeKind::SplitPane => WidgetRole::SplitHost,
			NodeKind::DesktopPane | NodeKind::Panel | NodeKind::ToolBar => WidgetRole::Container,
			_ => WidgetRole::Leaf,
		}
	}

	pub fn is_window(self) -> bool {
		self.role() == WidgetRole::Window
	}

	/// Kinds whose text `option.text` sets.
	pub fn has_text(self) -> bool {
		matches!(
			self,
			NodeKind::Button
				| NodeKind::ToggleButton
				| NodeKind::CheckBox
				| NodeKind::RadioButton
				| NodeKind::Label
				| NodeKind::TextField
				| NodeKind::PasswordField
				| NodeKind::TextArea
				| NodeKind::TextPane
				| NodeKind::Menu
				| NodeKind::MenuItem
		)
	}

	/// Kinds that hold a named data model.
	pub fn has_model(self) -> bool {
		matches!(
			self,
			NodeKind::ComboBox | NodeKind::List | NodeKind::Table | NodeKind::Tree | NodeKind::Spinner
		)
	}

	pub fn emits(self, kind: ListenerKind) -> bool {
		match kind {
			ListenerKind::Key | ListenerKind::Mouse | ListenerKind::Focus => true,
			ListenerKind::Window => self.is_window(),
			ListenerKind::Action => matches!(
				self,
				NodeKind::Button
					| NodeKind::ToggleButton
					| NodeKind::CheckBox
					| NodeKind::RadioButton
					| NodeKind::TextField
					| NodeKind::PasswordField
					| NodeKind::ComboBox
					| NodeKind::Menu
					| NodeKind::MenuItem
			),
			ListenerKind::Item => matches!(
				self,
				NodeKind::ToggleButton | NodeKind::CheckBox | NodeKind::RadioButton | NodeKind::ComboBox | NodeKind::MenuItem
			),
			ListenerKind::Change => matches!(
				self,
				NodeKind::Button
					| NodeKind::ToggleButton
					| NodeKind::CheckBox
					| NodeKind::RadioButton
					| NodeKind::Spinner
					| NodeKind::ProgressBar
					| NodeKind::TabbedPane
			),
		}
	}
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Rect {
	pub x: i64,
	pub y: i64,
	pub width: i64,
	pub height: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
	pub width: i64,
	pub height: i64,
}

/// An appended child and the constraints it was added with.
#[derive(Debug, Clone)]
pub struct Child {
	pub widget: WidgetRef,
	pub constraints: Option<Constraints>,
}

/// Everything attributes and composition have done to a node.
#[derive(Debug, Clone)]
pub struct NodeState {
	pub text: Option<String>,
	pub title: Option<String>,
	pub background: Option<Color>,
	pub foreground: Option<Color>,
	pub enabled: bool,
	pub bounds: Rect,
	pub size: Option<Size>,
	pub min_size: Option<Size>,
	pub max_size: Option<Size>,
	pub preferred_size: Option<Size>,
	pub resizable: bool,
	pub always_on_top: bool,
	pub close_operation: i64,
	pub model: Option<String>,
	pub layout: Option<LayoutState>,
	pub border: Option<Border>,
	pub children: Vec<Child>,
	pub menu_bar: Option<WidgetRef>,
	pub tabs: Vec<(String, WidgetRef)>,
	pub viewport: Option<WidgetRef>,
	pub left: Option<WidgetRef>,
	pub right: Option<WidgetRef>,
	pub listeners: Vec<Listener>,
}

impl Default for NodeState {
	fn default() -> Self {
		Self {
			text: None,
			title: None,
			background: None,
			foreground: None,
			enabled: true,
			bounds: Rect::default(),
			size: None,
			min_size: None,
			max_size: None,
			preferred_size: None,
			resizable: true,
			always_on_top: false,
			close_operation: 0,
			model: None,
			layout: None,
			border: None,
			children: Vec::new(),
			menu_bar: None,
			tabs: Vec::new(),
			viewport: None,
			left: None,
			right: None,
			listeners: Vec::new(),
		}
	}
}

/// A headless widget.
#[derive(Debug)]
pub struct Node {
	kind: NodeKind,
	type_name: String,
	state: Mutex<NodeState>,
}

impl Node {
	pub fn new(kind: NodeKind) -> Arc<Self> {
		Self::named(kind, kind.name())
	}

	/// A node of `kind` reporting `type_name`, for custom constructors.
	pub fn named(kind: NodeKind, type_name: impl Into<String>) -> Arc<Self> {
		Arc::new(Self {
			kind,
			type_name: type_name.into(),
			state: Mutex::new(NodeState::default()),
		})
	}

	pub fn kind(&self) -> NodeKind {
		self.kind
	}

	pub fn snapshot(&self) -> NodeState {
		self.state.lock().clone()
	}

	/// Mutates the state under the node's lock.
	pub fn update<R>(&self, f: impl FnOnce(&mut NodeState) -> R) -> R {
		f(&mut self.state.lock())
	}

	pub fn text(&self) -> Option<String> {
		self.state.lock().text.clone()
	}

	/// Type names of the appended children, in order.
	pub fn child_types(&self) -> Vec<String> {
		self.state
			.lock()
			.children
			.iter()
			.map(|c| c.widget.type_name().to_string())
			.collect()
	}

	/// Delivers `event` to every listener of its kind. Returns how many ran.
	pub fn fire(&self, event: &UiEvent) -> usize {
		let listeners = self.state.lock().listeners.clone();
		listeners.iter().filter(|l| l.notify(event)).count()
	}

	/// Fires an action event carrying this node's text as its command.
	pub fn click(self: &Arc<Self>) -> usize {
		let source: WidgetRef = self.clone();
		let event = UiEvent::new(ListenerKind::Action)
			.with_command(self.text().unwrap_or_default())
			.with_source(source);
		self.fire(&event)
	}

	fn unsupported(&self, op: &Compose) -> ComposeError {
		ComposeError::Unsupported {
			target: self.type_name.clone(),
			operation: op.name(),
		}
	}
}

impl Widget for Node {
	fn type_name(&self) -> &str {
		&self.type_name
	}

	fn role(&self) -> WidgetRole {
		self.kind.role()
	}

	fn compose(&self, op: Compose) -> Result<(), ComposeError> {
		let role = self.kind.role();
		if role == WidgetRole::Leaf {
			return Err(self.unsupported(&op));
		}
		let mut state = self.state.lock();
		match op {
			Compose::Append { child, constraints } => state.children.push(Child { widget: child, constraints }),
			Compose::MenuBar(bar) if role == WidgetRole::Window => state.menu_bar = Some(bar),
			Compose::Tab { title, child } if role == WidgetRole::TabHost => state.tabs.push((title, child)),
			Compose::Viewport(child) if role == WidgetRole::ScrollHost => state.viewport = Some(child),
			Compose::Split { side, child } if role == WidgetRole::SplitHost => match side {
				SplitSide::Left => state.left = Some(child),
				SplitSide::Right => state.right = Some(child),
			},
			op => {
				drop(state);
				return Err(self.unsupported(&op));
			}
		}
		Ok(())
	}

	fn listen(&self, listener: &Listener) -> bool {
		if !self.kind.emits(listener.kind()) {
			return false;
		}
		self.state.lock().listeners.push(listener.clone());
		true
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
		self
	}
}
