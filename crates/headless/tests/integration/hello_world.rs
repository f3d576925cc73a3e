use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use weft_bind::{
	Arg, BindError, ClassDecl, DiagnosticOrigin, Gui, GuiModel, ListenerKind, ListenerSource, ListenerTable, MapSource,
	MemberDecl, Metadata, ROOT_MEMBER, UiEvent, ValueSource, WidgetRef, WidgetSlot,
};
use weft_headless::{Node, NodeKind};

use crate::common::{self, node, state};

#[derive(Default)]
struct HelloWorld {
	frame: WidgetSlot,
	button: WidgetSlot,
	greeted: Mutex<Vec<String>>,
}

impl HelloWorld {
	fn run(&self, args: &[Arg]) {
		let mut greeted = self.greeted.lock();
		greeted.extend(args.iter().filter_map(Arg::as_str).map(str::to_string));
	}
}

impl Gui for HelloWorld {
	fn declare() -> ClassDecl<Self> {
		ClassDecl::gui("HelloWorld")
			.constructor(&[], |_| HelloWorld::default())
			.entry_point(HelloWorld::run)
			.member(
				MemberDecl::new("frame", "Frame")
					.meta(Metadata::window())
					.meta(Metadata::option().with("title", "Hello"))
					.meta(Metadata::bounds().with("size", [200i64, 100]))
					.slot(|gui: &HelloWorld| &gui.frame),
			)
			.member(
				MemberDecl::new("button", "Button")
					.meta(Metadata::toolkit())
					.meta(Metadata::option().with("text", "Press Me!").with("target", "frame"))
					.slot(|gui: &HelloWorld| &gui.button),
			)
	}
}

#[test]
fn test_hello_world_in_global_context() {
	let _ = tracing_subscriber::fmt::try_init();
	let model = GuiModel::<HelloWorld>::of(&[]).unwrap();

	let button = node(&model, "button");
	assert_eq!(button.text().as_deref(), Some("Press Me!"));

	let frame = state(&model, "frame");
	assert_eq!(frame.title.as_deref(), Some("Hello"));
	assert_eq!(frame.size.map(|s| (s.width, s.height)), Some((200, 100)));
	assert_eq!(node(&model, "frame").child_types(), vec!["Button"]);

	let gui = model.gui().unwrap();
	let slotted = gui.button.get_as::<Node>().unwrap();
	assert!(Arc::ptr_eq(&slotted, &button));
}

#[test]
fn test_entry_point_receives_args() {
	let (ctx, _) = common::context();
	let model = GuiModel::<HelloWorld>::of_in(&ctx, &[]).unwrap();
	model.start(&[Arg::from("world")]).unwrap();
	assert_eq!(*model.gui().unwrap().greeted.lock(), vec!["world".to_string()]);
}

struct Twice;

impl Gui for Twice {
	fn declare() -> ClassDecl<Self> {
		ClassDecl::gui("Twice")
			.constructor(&[], |_| Twice)
			.member(MemberDecl::new("label", "Label").meta(Metadata::toolkit()))
			.member(MemberDecl::new("label", "Button").meta(Metadata::toolkit()))
	}
}

#[test]
fn test_duplicate_member_is_already_bound() {
	let (ctx, _) = common::context();
	let err = GuiModel::<Twice>::of_in(&ctx, &[]).unwrap_err();
	assert!(matches!(err, BindError::AlreadyBound { ref name } if name == "label"));
}

struct Unknown;

impl Gui for Unknown {
	fn declare() -> ClassDecl<Self> {
		ClassDecl::gui("Unknown")
			.constructor(&[], |_| Unknown)
			.member(MemberDecl::new("canvas", "Canvas").meta(Metadata::toolkit()))
	}
}

#[test]
fn test_unknown_widget_type_is_unavailable() {
	let (ctx, _) = common::context();
	let err = GuiModel::<Unknown>::of_in(&ctx, &[]).unwrap_err();
	assert!(matches!(err, BindError::WidgetUnavailable { ref declared_type, .. } if declared_type == "Canvas"));
}

#[derive(Default)]
struct Clicks {
	commands: Mutex<Vec<String>>,
	focus: AtomicUsize,
}

impl Clicks {
	fn pressed(&self, event: &UiEvent) {
		self.commands.lock().push(event.command.clone());
	}

	fn focused(&self, _: &UiEvent) {
		self.focus.fetch_add(1, Ordering::SeqCst);
	}
}

impl ListenerSource for Clicks {
	fn listeners() -> ListenerTable<Self> {
		ListenerTable::new()
			.on(ListenerKind::Action, &["button", "frame"], Clicks::pressed)
			.on(ListenerKind::Focus, &["button"], Clicks::focused)
	}
}

#[test]
fn test_click_reaches_linked_listener() {
	let (ctx, sink) = common::context();
	let model = GuiModel::<HelloWorld>::of_in(&ctx, &[]).unwrap();
	let clicks = Arc::new(Clicks::default());

	assert_eq!(model.link_listener(clicks.clone()), 2);
	assert_eq!(sink.count(DiagnosticOrigin::Listener), 1);

	assert_eq!(node(&model, "button").click(), 1);
	assert_eq!(*clicks.commands.lock(), vec!["Press Me!".to_string()]);
	assert_eq!(clicks.focus.load(Ordering::SeqCst), 0);
}

struct Deferred;

impl Gui for Deferred {
	fn declare() -> ClassDecl<Self> {
		ClassDecl::gui("Deferred")
			.constructor(&[], |_| Deferred)
			.member(
				MemberDecl::new("ok", "Button")
					.meta(Metadata::toolkit())
					.meta(Metadata::option().with("text", "@defaults#OptionPane.okButtonText")),
			)
			.member(
				MemberDecl::new("greeting", "Label")
					.meta(Metadata::toolkit())
					.meta(Metadata::option().with("text", "@strings#greeting")),
			)
			.member(
				MemberDecl::new("missing", "Label")
					.meta(Metadata::toolkit())
					.meta(Metadata::option().with("text", "@defaults#Nope.text")),
			)
	}
}

#[test]
fn test_deferred_text_from_value_sources() {
	let strings = Arc::new(MapSource::new("strings"));
	strings.put("greeting", "Hi there");
	let sink = Arc::new(weft_bind::CollectingSink::new());
	let strings: Arc<dyn ValueSource> = strings;
	let ctx = weft_headless::install(weft_bind::BindingContext::builder().sink(sink.clone()))
		.value_source(strings)
		.build();

	let model = GuiModel::<Deferred>::of_in(&ctx, &[]).unwrap();
	assert_eq!(node(&model, "ok").text().as_deref(), Some("OK"));
	assert_eq!(node(&model, "greeting").text().as_deref(), Some("Hi there"));
	assert_eq!(node(&model, "missing").text(), None);
	assert_eq!(sink.count(DiagnosticOrigin::DeferredValue), 1);
}

struct Card {
	root: WidgetRef,
}

impl Gui for Card {
	fn declare() -> ClassDecl<Self> {
		ClassDecl::gui("Card")
			.meta(Metadata::toolkit())
			.meta(Metadata::layout("border"))
			.constructor(&[], |_| Card {
				root: Node::new(NodeKind::Panel),
			})
			.root_widget(|card: &Card| Some(card.root.clone()))
			.member(
				MemberDecl::new("caption", "Label")
					.meta(Metadata::toolkit())
					.meta(Metadata::option().with("target", ROOT_MEMBER).with("text", "Card"))
					.meta(Metadata::position().with("constraints", "south")),
			)
	}
}

struct Board;

impl Gui for Board {
	fn declare() -> ClassDecl<Self> {
		ClassDecl::gui("Board")
			.constructor(&[], |_| Board)
			.member(MemberDecl::new("frame", "Frame").meta(Metadata::window()))
			.member(MemberDecl::nested::<Card>("card").meta(Metadata::option().with("target", "frame")))
	}
}

#[test]
fn test_nested_gui_is_linked_into_parent() {
	let (ctx, sink) = common::context();
	let model = GuiModel::<Board>::of_in(&ctx, &[]).unwrap();

	assert_eq!(node(&model, "frame").child_types(), vec!["Panel"]);

	let card = model.nested_model::<Card>("card").unwrap();
	let root = card.root_widget().unwrap();
	let root = root.downcast_ref::<Node>().unwrap().snapshot();
	assert_eq!(root.children.len(), 1);
	assert_eq!(
		root.children[0].constraints.as_ref().and_then(|c| c.as_edge()),
		Some(weft_bind::Edge::South)
	);
	assert!(sink.is_empty(), "{:?}", sink.snapshot());
}
