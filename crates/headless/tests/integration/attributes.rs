use pretty_assertions::assert_eq;
use weft_bind::{ApplyEnv, ClassDecl, DiagnosticOrigin, Gui, GuiModel, MemberDecl, Metadata, WidgetRef, kinds};
use weft_headless::{BorderManager, Color, Node, NodeKind, Rect, Size};

use crate::common::{self, state};

struct Styled;

impl Gui for Styled {
	fn declare() -> ClassDecl<Self> {
		ClassDecl::gui("Styled")
			.constructor(&[], |_| Styled)
			.member(
				MemberDecl::new("frame", "Frame")
					.meta(
						Metadata::window()
							.with("resizable", false)
							.with("alwaysOnTop", true)
							.with("closeOperation", 3),
					)
					.meta(Metadata::option().with("title", "Styled").with("background", "white")),
			)
			.member(
				MemberDecl::new("label", "Label")
					.meta(Metadata::toolkit())
					.meta(
						Metadata::option()
							.with("text", "Name")
							.with("background", "12, 34, 56")
							.with("foreground", "@defaults#Label.foreground")
							.with("enabled", false),
					)
					.meta(Metadata::bounds().with("bounds", [1i64, 2, 30, 40]).with("preferredSize", [80i64, 20])),
			)
			.member(
				MemberDecl::new("todos", "List")
					.meta(Metadata::toolkit())
					.meta(Metadata::model("TodoModel")),
			)
	}
}

#[test]
fn test_options_bounds_window_and_model() {
	let (ctx, sink) = common::context();
	let model = GuiModel::<Styled>::of_in(&ctx, &[]).unwrap();

	let frame = state(&model, "frame");
	assert_eq!(frame.title.as_deref(), Some("Styled"));
	assert_eq!(frame.background, Some(Color::rgb(255, 255, 255)));
	assert!(!frame.resizable);
	assert!(frame.always_on_top);
	assert_eq!(frame.close_operation, 3);

	let label = state(&model, "label");
	assert_eq!(label.text.as_deref(), Some("Name"));
	assert_eq!(label.background, Some(Color::rgb(12, 34, 56)));
	assert_eq!(label.foreground, Some(Color::rgb(0, 0, 0)));
	assert!(!label.enabled);
	assert_eq!(
		label.bounds,
		Rect {
			x: 1,
			y: 2,
			width: 30,
			height: 40,
		}
	);
	assert_eq!(
		label.preferred_size,
		Some(Size {
			width: 80,
			height: 20,
		})
	);

	assert_eq!(state(&model, "todos").model.as_deref(), Some("TodoModel"));
	assert!(sink.is_empty(), "{:?}", sink.snapshot());
}

struct Misfit;

impl Gui for Misfit {
	fn declare() -> ClassDecl<Self> {
		ClassDecl::gui("Misfit")
			.constructor(&[], |_| Misfit)
			.member(
				MemberDecl::new("panel", "Panel")
					.meta(Metadata::toolkit())
					.meta(Metadata::option().with("text", "no text here").with("foreground", "chartreuse")),
			)
			.member(
				MemberDecl::new("label", "Label")
					.meta(Metadata::window().with("resizable", false))
					.meta(Metadata::model("Nothing")),
			)
			.member(
				MemberDecl::new("sized", "Label")
					.meta(Metadata::toolkit())
					.meta(
						Metadata::bounds()
							.with("bounds", [0i64, 0, 10])
							.with("size", [10i64, 20])
							.with("minimumSize", [5i64, -1]),
					),
			)
	}
}

#[test]
fn test_values_that_do_not_fit_are_reported() {
	let (ctx, sink) = common::context();
	let model = GuiModel::<Misfit>::of_in(&ctx, &[]).unwrap();

	let panel = state(&model, "panel");
	assert_eq!(panel.text, None);
	assert_eq!(panel.foreground, None);

	let label = state(&model, "label");
	assert!(label.resizable);
	assert_eq!(label.model, None);

	let sized = state(&model, "sized");
	assert_eq!(sized.bounds, Rect::default());
	assert_eq!(
		sized.size,
		Some(Size {
			width: 10,
			height: 20,
		})
	);
	assert_eq!(sized.min_size, None);

	// text, color, window flags, model, bounds, minimum size
	assert_eq!(sink.count(DiagnosticOrigin::Attribute), 6);
}

struct Reapplied;

impl Gui for Reapplied {
	fn declare() -> ClassDecl<Self> {
		ClassDecl::gui("Reapplied")
			.constructor(&[], |_| Reapplied)
			.member(
				MemberDecl::new("panel", "Panel")
					.meta(Metadata::toolkit())
					.meta(Metadata::option().with("background", "red").with("enabled", false))
					.meta(Metadata::bounds().with("bounds", [1i64, 2, 3, 4]).with("size", [3i64, 4]))
					.meta(Metadata::layout("border").with("hgap", 3).with("vgap", 1))
					.meta(Metadata::margin("empty").with("emptyTop", 4)),
			)
			.member(
				MemberDecl::new("button", "Button")
					.meta(Metadata::toolkit())
					.meta(Metadata::option().with("text", "Press Me!")),
			)
	}
}

#[test]
fn test_applying_stored_sets_again_changes_nothing() {
	let (ctx, sink) = common::context();
	let model = GuiModel::<Reapplied>::of_in(&ctx, &[]).unwrap();

	for member in ["panel", "button"] {
		let field = model.field(member).unwrap();
		let widget = field.get().unwrap();
		let once = format!("{:?}", state(&model, member));
		let descriptor = field.descriptor();
		for set in descriptor.sets() {
			set.apply_to(&widget, &ApplyEnv::new(member, &ctx));
		}
		assert_eq!(format!("{:?}", state(&model, member)), once, "{member}");
	}

	let panel = state(&model, "panel");
	let layout = panel.layout.as_ref().unwrap();
	assert_eq!(layout.manager_as::<BorderManager>(), Some(&BorderManager { h_gap: 3, v_gap: 1 }));
	assert!(sink.is_empty(), "{:?}", sink.snapshot());
}

#[test]
fn test_stored_option_set_carries_its_behavior() {
	let (ctx, _) = common::context();
	let model = GuiModel::<Reapplied>::of_in(&ctx, &[]).unwrap();
	let stored = model.field("button").unwrap().attribute_set(kinds::OPTION).unwrap();
	assert!(!stored.is_passive());

	let fresh = Node::new(NodeKind::Button);
	let widget: WidgetRef = fresh.clone();
	stored.apply_to(&widget, &ApplyEnv::new("button", &ctx));
	assert_eq!(fresh.text().as_deref(), Some("Press Me!"));
}
