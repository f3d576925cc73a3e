//! In-crate test toolkit: a recording widget, a factory for it and a minimal
//! set of handlers.

use std::any::Any;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::attribute::{ApplyEnv, Attribute, AttributeSet, Passive};
use crate::context::BindingContext;
use crate::deferred::ValueSource;
use crate::descriptor::MemberDescriptor;
use crate::diagnostics::CollectingSink;
use crate::handler::{AttributeHandler, RepeatedHandler, SetHandler};
use crate::listener::{Listener, ListenerKind, UiEvent};
use crate::metadata::kinds;
use crate::schema::keys::option;
use crate::strategy::{CompositionStrategy, declared_edge};
use crate::widget::{
	Compose, ComposeError, Constraints, LayoutManager, SplitSide, Widget, WidgetFactory, WidgetRef, WidgetRole,
};

/// Widget that records every structural change as a short string.
#[derive(Debug)]
pub struct TestWidget {
	type_name: String,
	role: WidgetRole,
	ops: Mutex<Vec<String>>,
	text: Mutex<Option<String>>,
	listeners: Mutex<Vec<Listener>>,
}

impl TestWidget {
	pub fn new(type_name: &str, role: WidgetRole) -> Arc<Self> {
		Arc::new(Self {
			type_name: type_name.to_string(),
			role,
			ops: Mutex::new(Vec::new()),
			text: Mutex::new(None),
			listeners: Mutex::new(Vec::new()),
		})
	}

	pub fn container(type_name: &str) -> WidgetRef {
		Self::new(type_name, WidgetRole::Container)
	}

	pub fn leaf(type_name: &str) -> WidgetRef {
		Self::new(type_name, WidgetRole::Leaf)
	}

	pub fn ops(&self) -> Vec<String> {
		self.ops.lock().clone()
	}

	pub fn text(&self) -> Option<String> {
		self.text.lock().clone()
	}

	pub fn set_text(&self, text: String) {
		*self.text.lock() = Some(text);
	}

	/// Delivers an event of `kind` to every attached listener.
	pub fn fire(&self, kind: ListenerKind) -> usize {
		let event = UiEvent::new(kind).with_command(self.text().unwrap_or_default());
		let listeners = self.listeners.lock().clone();
		listeners.iter().filter(|l| l.notify(&event)).count()
	}
}

impl Widget for TestWidget {
	fn type_name(&self) -> &str {
		&self.type_name
	}

	fn role(&self) -> WidgetRole {
		self.role
	}

	fn compose(&self, op: Compose) -> Result<(), ComposeError> {
		let unsupported = |op: &Compose| ComposeError::Unsupported {
			target: self.type_name.clone(),
			operation: op.name(),
		};
		if self.role == WidgetRole::Leaf {
			return Err(unsupported(&op));
		}
		let record = match &op {
			Compose::Append { child, constraints } => match constraints {
				Some(Constraints::Edge(edge)) => format!("append {} {}", child.type_name(), edge.as_str()),
				Some(Constraints::Named(name)) => format!("append {} {name}", child.type_name()),
				Some(Constraints::Custom(_)) => format!("append {} custom", child.type_name()),
				None => format!("append {}", child.type_name()),
			},
			Compose::MenuBar(bar) if self.role == WidgetRole::Window => format!("menu bar {}", bar.type_name()),
			Compose::MenuBar(_) => return Err(unsupported(&op)),
			Compose::Tab { title, child } => format!("tab {title} {}", child.type_name()),
			Compose::Viewport(child) => format!("viewport {}", child.type_name()),
			Compose::Split { side, child } => {
				let side = match side {
					SplitSide::Left => "left",
					SplitSide::Right => "right",
				};
				format!("split {side} {}", child.type_name())
			}
		};
		self.ops.lock().push(record);
		Ok(())
	}

	fn listen(&self, listener: &Listener) -> bool {
		if self.role != WidgetRole::Leaf {
			return false;
		}
		self.listeners.lock().push(listener.clone());
		true
	}

	fn as_any(&self) -> &dyn Any {
		self
	}

	fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
		self
	}
}

/// Creates [`TestWidget`]s. `Missing` creates nothing.
pub struct TestFactory;

impl WidgetFactory for TestFactory {
	fn name(&self) -> &str {
		"default"
	}

	fn create(&self, declared_type: &str) -> Option<WidgetRef> {
		let role = match declared_type {
			"Missing" => return None,
			"Frame" | "Window" => WidgetRole::Window,
			"MenuBar" => WidgetRole::MenuBar,
			"Menu" => WidgetRole::Menu,
			"Tabs" => WidgetRole::TabHost,
			"Scroll" => WidgetRole::ScrollHost,
			"Split" => WidgetRole::SplitHost,
			"Panel" => WidgetRole::Container,
			_ => WidgetRole::Leaf,
		};
		Some(TestWidget::new(declared_type, role))
	}
}

/// Writes `option.text` into a [`TestWidget`].
#[derive(Debug)]
pub struct TextBehavior;

impl Attribute for TextBehavior {
	fn apply_to(&self, attrs: &AttributeSet, widget: &WidgetRef, env: &ApplyEnv<'_>) {
		let Some(raw) = attrs.name(option::TEXT) else {
			return;
		};
		let Some(target) = widget.downcast_ref::<TestWidget>() else {
			env.report("not a test widget");
			return;
		};
		if let Some(text) = env.resolve_text(raw, widget) {
			target.set_text(text);
		}
	}
}

/// Layout that places children at their declared edge.
#[derive(Debug)]
pub struct EdgeLayout;

impl Attribute for EdgeLayout {
	fn apply_to(&self, _: &AttributeSet, _: &WidgetRef, _: &ApplyEnv<'_>) {}

	fn as_composition(&self) -> Option<&dyn CompositionStrategy> {
		Some(self)
	}
}

impl CompositionStrategy for EdgeLayout {
	fn create_manager(&self, _: &AttributeSet, _: &WidgetRef) -> Option<LayoutManager> {
		None
	}

	fn create_constraints(&self, _: &AttributeSet, child: &MemberDescriptor) -> Option<Constraints> {
		declared_edge(child).map(Constraints::Edge)
	}
}

/// Test context with the test factory, handlers for option, position and
/// layout, and a collecting sink.
pub fn context() -> (Arc<BindingContext>, Arc<CollectingSink>) {
	context_with(Vec::new())
}

pub fn context_with(sources: Vec<Arc<dyn ValueSource>>) -> (Arc<BindingContext>, Arc<CollectingSink>) {
	let sink = Arc::new(CollectingSink::new());
	let options: Arc<dyn AttributeHandler> = Arc::new(SetHandler::fixed(kinds::OPTION, Arc::new(TextBehavior)));
	let mut builder = BindingContext::builder()
		.sink(sink.clone())
		.factory(Arc::new(TestFactory))
		.handler(options.clone())
		.handler(Arc::new(RepeatedHandler::new(kinds::OPTION, options).expect("option is repeatable")))
		.handler(Arc::new(SetHandler::fixed(kinds::POSITION, Arc::new(Passive))))
		.handler(Arc::new(SetHandler::fixed(kinds::LAYOUT, Arc::new(EdgeLayout))));
	for source in sources {
		builder = builder.value_source(source);
	}
	(builder.build(), sink)
}
