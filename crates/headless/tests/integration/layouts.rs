use pretty_assertions::assert_eq;
use weft_bind::{BindError, ClassDecl, Constraints, Edge, Gui, GuiModel, MemberDecl, Metadata};
use weft_headless::{
	BorderManager, BoxAxis, BoxManager, CardManager, FlowAlign, FlowManager, GridBagConstraints, GridManager, Layout,
	NodeState, SpringConstraint, SpringManager,
};

use crate::common::{self, node, state};

fn member(name: &'static str, ty: &str, target: &str) -> MemberDecl<Layouts> {
	MemberDecl::new(name, ty)
		.meta(Metadata::toolkit())
		.meta(Metadata::option().with("target", target))
}

struct Layouts;

impl Gui for Layouts {
	fn declare() -> ClassDecl<Self> {
		ClassDecl::gui("Layouts")
			.constructor(&[], |_| Layouts)
			.member(MemberDecl::new("frame", "Frame").meta(Metadata::window()))
			.member(member("border", "Panel", "frame").meta(Metadata::layout("border").with("hgap", 4).with("vgap", 2)))
			.member(member("north", "Label", "border").meta(Metadata::position().with("constraints", "north")))
			.member(member("center", "Label", "border"))
			.member(member("flow", "Panel", "frame").meta(Metadata::layout("FlowLayout").with("align", 2)))
			.member(member("flowed", "Button", "flow"))
			.member(member("grid", "Panel", "frame").meta(Metadata::layout("grid").with("rows", 2).with("columns", 3)))
			.member(member("boxed", "Panel", "frame").meta(Metadata::layout("box").with("axis", 1)))
			.member(member("cards", "Panel", "frame").meta(Metadata::layout("card")))
			.member(member("first", "Panel", "cards").meta(Metadata::option().with("title", "First")))
			.member(member("second", "Panel", "cards"))
			.member(member("bag", "Panel", "frame").meta(Metadata::layout("grid_bag")))
			.member(
				member("cell", "Label", "bag").meta(
					Metadata::position()
						.with("gridx", 1)
						.with("gridy", 2)
						.with("weightx", 0.5)
						.with("fill", 1)
						.with("insets", [1i64, 2, 3, 4]),
				),
			)
			.member(member("springs", "Panel", "frame").meta(Metadata::layout("spring")))
			.member(
				member("sprung", "Label", "springs").meta(
					Metadata::position()
						.with("edge", "North")
						.with("anchorEdge", "South")
						.with("pad", 8),
				),
			)
			.member(
				member("free", "Panel", "frame").meta(Metadata::layout("masonry").with("absoluteLayout", true)),
			)
			.member(member("placed", "Label", "free").meta(Metadata::position().with("x", 10).with("y", 20)))
	}
}

fn layout_of(state: &NodeState) -> Layout {
	state.layout.as_ref().map(|l| l.layout).expect("container has a layout")
}

#[test]
fn test_frame_children_follow_declaration_order() {
	let (ctx, sink) = common::context();
	let model = GuiModel::<Layouts>::of_in(&ctx, &[]).unwrap();
	assert_eq!(node(&model, "frame").child_types(), vec!["Panel"; 8]);
	assert!(sink.is_empty(), "{:?}", sink.snapshot());
}

#[test]
fn test_border_layout_places_by_edge() {
	let (ctx, _) = common::context();
	let model = GuiModel::<Layouts>::of_in(&ctx, &[]).unwrap();
	let border = state(&model, "border");
	let manager = border.layout.as_ref().and_then(|l| l.manager_as::<BorderManager>());
	assert_eq!(manager, Some(&BorderManager { h_gap: 4, v_gap: 2 }));
	let edges: Vec<_> = border
		.children
		.iter()
		.map(|c| c.constraints.as_ref().and_then(Constraints::as_edge))
		.collect();
	assert_eq!(edges, vec![Some(Edge::North), Some(Edge::Center)]);
}

#[test]
fn test_flow_grid_and_box_managers() {
	let (ctx, _) = common::context();
	let model = GuiModel::<Layouts>::of_in(&ctx, &[]).unwrap();

	let flow = state(&model, "flow");
	assert_eq!(
		flow.layout.as_ref().and_then(|l| l.manager_as::<FlowManager>()),
		Some(&FlowManager {
			align: FlowAlign::Right,
			h_gap: 5,
			v_gap: 5,
		})
	);
	assert!(flow.children[0].constraints.is_none());

	let grid = state(&model, "grid");
	assert_eq!(
		grid.layout.as_ref().and_then(|l| l.manager_as::<GridManager>()),
		Some(&GridManager {
			rows: 2,
			columns: 3,
			h_gap: 0,
			v_gap: 0,
		})
	);

	let boxed = state(&model, "boxed");
	assert_eq!(
		boxed.layout.as_ref().and_then(|l| l.manager_as::<BoxManager>()),
		Some(&BoxManager { axis: BoxAxis::Y })
	);
}

#[test]
fn test_card_titles_fall_back_to_member_name() {
	let (ctx, _) = common::context();
	let model = GuiModel::<Layouts>::of_in(&ctx, &[]).unwrap();
	let cards = state(&model, "cards");
	assert_eq!(layout_of(&cards), Layout::Card);
	assert!(cards.layout.as_ref().and_then(|l| l.manager_as::<CardManager>()).is_some());
	let titles: Vec<_> = cards
		.children
		.iter()
		.filter_map(|c| match &c.constraints {
			Some(Constraints::Named(title)) => Some(title.as_str()),
			_ => None,
		})
		.collect();
	assert_eq!(titles, vec!["First", "second"]);
}

#[test]
fn test_grid_bag_cell_constraints() {
	let (ctx, _) = common::context();
	let model = GuiModel::<Layouts>::of_in(&ctx, &[]).unwrap();
	let bag = state(&model, "bag");
	let cell = bag.children[0]
		.constraints
		.as_ref()
		.and_then(|c| c.downcast::<GridBagConstraints>())
		.copied()
		.unwrap();
	assert_eq!(
		cell,
		GridBagConstraints {
			grid_x: 1,
			grid_y: 2,
			weight_x: 0.5,
			fill: 1,
			insets: [1, 2, 3, 4],
			..GridBagConstraints::default()
		}
	);
}

#[test]
fn test_spring_constraints_go_to_the_manager() {
	let (ctx, _) = common::context();
	let model = GuiModel::<Layouts>::of_in(&ctx, &[]).unwrap();
	let springs = state(&model, "springs");
	assert!(springs.children[0].constraints.is_none());
	let manager = springs
		.layout
		.as_ref()
		.and_then(|l| l.manager_as::<SpringManager>())
		.unwrap();
	assert_eq!(
		manager.constraints(),
		vec![SpringConstraint {
			member: "sprung".into(),
			edge: "North".into(),
			anchor_edge: "South".into(),
			pad: 8,
		}]
	);
}

#[test]
fn test_absolute_layout_keeps_positions() {
	let (ctx, _) = common::context();
	let model = GuiModel::<Layouts>::of_in(&ctx, &[]).unwrap();
	let free = state(&model, "free");
	assert_eq!(layout_of(&free), Layout::Absolute);
	assert!(free.layout.as_ref().unwrap().manager.is_none());
	assert!(free.children[0].constraints.is_none());
	let placed = state(&model, "placed");
	assert_eq!((placed.bounds.x, placed.bounds.y), (10, 20));
}

struct Bogus;

impl Gui for Bogus {
	fn declare() -> ClassDecl<Self> {
		ClassDecl::gui("Bogus")
			.constructor(&[], |_| Bogus)
			.member(
				MemberDecl::new("panel", "Panel")
					.meta(Metadata::toolkit())
					.meta(Metadata::layout("masonry")),
			)
	}
}

#[test]
fn test_unknown_layout_is_unresolved() {
	let (ctx, _) = common::context();
	let err = GuiModel::<Bogus>::of_in(&ctx, &[]).unwrap_err();
	assert!(matches!(err, BindError::UnresolvedDescriptor { kind: "layout", ref member } if member == "panel"));
}
