use pretty_assertions::assert_eq;
use weft_bind::{ClassDecl, DiagnosticOrigin, Gui, GuiModel, MemberDecl, Metadata};
use weft_headless::{Border, Color, Shading};

use crate::common::{self, state};

fn panel(name: &'static str, margin: Metadata) -> MemberDecl<Margins> {
	MemberDecl::new(name, "Panel").meta(Metadata::toolkit()).meta(margin)
}

struct Margins;

impl Gui for Margins {
	fn declare() -> ClassDecl<Self> {
		ClassDecl::gui("Margins")
			.constructor(&[], |_| Margins)
			.member(panel("padded", Metadata::margin("empty").with("emptyTop", 4)))
			.member(panel(
				"lined",
				Metadata::margin("LineBorder").with("lineColor", "red").with("lineThickness", 2),
			))
			.member(panel("titled", Metadata::margin("titled").with("title", "Group")))
			.member(panel(
				"bevel",
				Metadata::margin("bevel").with("bevelType", 0).with("highlight", "white"),
			))
			.member(panel(
				"etched",
				Metadata::margin("etched")
					.with("highlight", "white")
					.with("shadow", "gray"),
			))
			.member(panel(
				"compound",
				Metadata::margin("compound")
					.with("compoundOutside", "empty")
					.with("compoundInside", "line")
					.with("emptyTop", 3)
					.with("lineColor", "0,0,255"),
			))
	}
}

#[test]
fn test_every_border_kind() {
	let (ctx, sink) = common::context();
	let model = GuiModel::<Margins>::of_in(&ctx, &[]).unwrap();

	assert_eq!(
		state(&model, "padded").border,
		Some(Border::Empty {
			top: 4,
			left: 1,
			bottom: 1,
			right: 1,
		})
	);
	assert_eq!(
		state(&model, "lined").border,
		Some(Border::Line {
			color: Color::rgb(255, 0, 0),
			thickness: 2,
			rounded: false,
		})
	);
	assert_eq!(
		state(&model, "titled").border,
		Some(Border::Titled {
			title: "Group".into(),
			line: None,
		})
	);
	assert_eq!(
		state(&model, "bevel").border,
		Some(Border::Bevel {
			raised: true,
			shading: None,
		})
	);
	assert_eq!(
		state(&model, "etched").border,
		Some(Border::Etched {
			etch_type: -1,
			shading: Some(Shading {
				highlight: Color::rgb(255, 255, 255),
				shadow: Color::rgb(128, 128, 128),
			}),
		})
	);
	assert_eq!(
		state(&model, "compound").border,
		Some(Border::Compound {
			outside: Box::new(Border::Empty {
				top: 3,
				left: 1,
				bottom: 1,
				right: 1,
			}),
			inside: Box::new(Border::Line {
				color: Color::rgb(0, 0, 255),
				thickness: 1,
				rounded: false,
			}),
		})
	);
	assert!(sink.is_empty(), "{:?}", sink.snapshot());
}

struct BadMargins;

impl Gui for BadMargins {
	fn declare() -> ClassDecl<Self> {
		ClassDecl::gui("BadMargins")
			.constructor(&[], |_| BadMargins)
			.member(
				MemberDecl::new("frame", "Frame")
					.meta(Metadata::window())
					.meta(Metadata::margin("empty")),
			)
			.member(
				MemberDecl::new("colorless", "Panel")
					.meta(Metadata::toolkit())
					.meta(Metadata::margin("line")),
			)
			.member(
				MemberDecl::new("loop", "Panel")
					.meta(Metadata::toolkit())
					.meta(Metadata::margin("compound").with("compoundOutside", "compound").with("compoundInside", "empty")),
			)
	}
}

#[test]
fn test_invalid_margins_leave_no_border() {
	let (ctx, sink) = common::context();
	let model = GuiModel::<BadMargins>::of_in(&ctx, &[]).unwrap();
	for member in ["frame", "colorless", "loop"] {
		assert_eq!(state(&model, member).border, None, "{member}");
	}
	assert_eq!(sink.count(DiagnosticOrigin::Attribute), 3);
}
