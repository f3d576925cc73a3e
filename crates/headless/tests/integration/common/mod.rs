//! Shared helpers for headless integration tests.

use std::sync::Arc;

use weft_bind::{BindingConfig, BindingContext, CollectingSink, FieldHandle, Gui, GuiModel};
use weft_headless::{Node, NodeState};

/// An isolated context with the headless toolkit installed and a collecting sink.
pub fn context() -> (Arc<BindingContext>, Arc<CollectingSink>) {
	context_with(BindingConfig::default())
}

pub fn context_with(config: BindingConfig) -> (Arc<BindingContext>, Arc<CollectingSink>) {
	let _ = tracing_subscriber::fmt::try_init();
	let sink = Arc::new(CollectingSink::new());
	let context = weft_headless::install(BindingContext::builder().config(config).sink(sink.clone())).build();
	(context, sink)
}

pub fn node<G: Gui>(model: &GuiModel<G>, member: &str) -> Arc<Node> {
	model
		.field(member)
		.and_then(FieldHandle::get_as::<Node>)
		.unwrap_or_else(|| panic!("member `{member}` has no headless widget"))
}

pub fn state<G: Gui>(model: &GuiModel<G>, member: &str) -> NodeState {
	node(model, member).snapshot()
}
