use std::fs;
use std::sync::Arc;

use pretty_assertions::assert_eq;
use weft_bind::{
	ApplyEnv, Attribute, AttributeSet, BindError, BindingConfig, BindingContext, ClassDecl, CollectingSink, Gui,
	GuiModel, MemberDecl, Metadata, MetadataKind, SetHandler, WidgetRef,
};
use weft_headless::Node;

use crate::common::{self, state};

const TOOLTIP: MetadataKind = MetadataKind::new("tooltip");

/// Stores the tooltip as the node's title.
#[derive(Debug)]
struct TooltipAttr;

impl Attribute for TooltipAttr {
	fn apply_to(&self, attrs: &AttributeSet, widget: &WidgetRef, env: &ApplyEnv<'_>) {
		let Some(node) = widget.downcast_ref::<Node>() else {
			return;
		};
		if let Some(text) = attrs.name("text").and_then(|raw| env.resolve_text(raw, widget)) {
			node.update(|state| state.title = Some(text));
		}
	}
}

struct Tipped;

impl Gui for Tipped {
	fn declare() -> ClassDecl<Self> {
		ClassDecl::gui("Tipped")
			.constructor(&[], |_| Tipped)
			.member(
				MemberDecl::new("save", "Button")
					.meta(Metadata::toolkit())
					.meta(Metadata::new(TOOLTIP).with("toolTipText", "Save the document")),
			)
	}
}

fn context_for(config: BindingConfig) -> (Arc<BindingContext>, Arc<CollectingSink>) {
	let sink = Arc::new(CollectingSink::new());
	let builder = BindingContext::builder()
		.config(config)
		.sink(sink.clone())
		.handler(Arc::new(SetHandler::fixed(TOOLTIP, Arc::new(TooltipAttr))));
	(weft_headless::install(builder).build(), sink)
}

#[test]
fn test_bundle_defines_a_new_kind() {
	let dir = tempfile::tempdir().unwrap();
	fs::write(dir.path().join("tooltip.toml"), "text = \"toolTipText\"\n").unwrap();

	let (ctx, sink) = context_for(BindingConfig {
		schema_dir: Some(dir.path().to_path_buf()),
		..BindingConfig::default()
	});
	let model = GuiModel::<Tipped>::of_in(&ctx, &[]).unwrap();
	assert_eq!(state(&model, "save").title.as_deref(), Some("Save the document"));
	assert!(sink.is_empty(), "{:?}", sink.snapshot());
}

#[test]
fn test_config_file_points_at_bundles() {
	let dir = tempfile::tempdir().unwrap();
	let bundles = dir.path().join("schema");
	fs::create_dir(&bundles).unwrap();
	fs::write(bundles.join("tooltip.toml"), "text = \"toolTipText\"\n").unwrap();
	let config_path = dir.path().join("weft.toml");
	fs::write(
		&config_path,
		format!("schema-dir = {:?}\ndiagnostics = \"silent\"\n", bundles.display().to_string()),
	)
	.unwrap();

	let config = BindingConfig::from_toml_str(&fs::read_to_string(&config_path).unwrap()).unwrap();
	assert_eq!(config.schema_dir.as_deref(), Some(bundles.as_path()));

	let (ctx, _) = context_for(config);
	let model = GuiModel::<Tipped>::of_in(&ctx, &[]).unwrap();
	assert_eq!(state(&model, "save").title.as_deref(), Some("Save the document"));
}

#[test]
fn test_kind_without_schema_entry_fails() {
	let (ctx, _) = context_for(BindingConfig::default());
	let err = GuiModel::<Tipped>::of_in(&ctx, &[]).unwrap_err();
	assert!(matches!(err, BindError::UndefinedKind { ref kind } if kind == "tooltip"));
}

#[test]
fn test_unhandled_kind_is_ignored() {
	let (ctx, sink) = common::context();
	let model = GuiModel::<Tipped>::of_in(&ctx, &[]).unwrap();
	assert_eq!(state(&model, "save").title, None);
	assert!(sink.is_empty());
}
