//! Registration of the headless toolkit with a binding context.
//!
//! Linking this crate is enough for [`BindingContext::global`] to see it: every
//! handler, the factory and the `defaults` value source are submitted through
//! `inventory`. Isolated contexts call [`install`] instead.
//!
//! [`BindingContext::global`]: weft_bind::BindingContext::global

use std::sync::{Arc, LazyLock};

use weft_bind::{
	AttributeHandler, BindingContextBuilder, FactoryReg, HandlerReg, MapSource, RepeatedHandler, SetHandler,
	ValueSource, ValueSourceReg, WidgetFactory, kinds,
};

use crate::attrs::{BoundsAttr, ModelAttr, OptionAttr, PositionAttr, WindowAttr};
use crate::factory::DefaultFactory;
use crate::layout::LayoutAttr;
use crate::margin::MarginAttr;

/// Name of the built-in value source.
pub const DEFAULTS_SOURCE: &str = "defaults";

const DEFAULT_VALUES: &[(&str, &str)] = &[
	("Panel.background", "238,238,238"),
	("Label.foreground", "black"),
	("Button.background", "light_gray"),
	("OptionPane.okButtonText", "OK"),
	("OptionPane.cancelButtonText", "Cancel"),
	("OptionPane.yesButtonText", "Yes"),
	("OptionPane.noButtonText", "No"),
	("FileChooser.openButtonText", "Open"),
	("FileChooser.saveButtonText", "Save"),
];

static DEFAULTS: LazyLock<Arc<MapSource>> = LazyLock::new(|| {
	let source = MapSource::new(DEFAULTS_SOURCE);
	for (key, value) in DEFAULT_VALUES {
		source.put(*key, *value);
	}
	Arc::new(source)
});

/// The shared `defaults` source. Values put here are visible to every
/// context the toolkit is installed in.
pub fn defaults() -> Arc<MapSource> {
	DEFAULTS.clone()
}

fn option_handler() -> Arc<dyn AttributeHandler> {
	Arc::new(SetHandler::fixed(kinds::OPTION, Arc::new(OptionAttr)))
}

fn options_handler() -> Arc<dyn AttributeHandler> {
	Arc::new(RepeatedHandler::with_container(kinds::OPTION, kinds::OPTIONS, option_handler()))
}

fn position_handler() -> Arc<dyn AttributeHandler> {
	Arc::new(SetHandler::fixed(kinds::POSITION, Arc::new(PositionAttr)))
}

fn bounds_handler() -> Arc<dyn AttributeHandler> {
	Arc::new(SetHandler::fixed(kinds::BOUNDS, Arc::new(BoundsAttr)))
}

fn window_handler() -> Arc<dyn AttributeHandler> {
	Arc::new(SetHandler::fixed(kinds::WINDOW, Arc::new(WindowAttr)))
}

fn model_handler() -> Arc<dyn AttributeHandler> {
	Arc::new(SetHandler::fixed(kinds::MODEL, Arc::new(ModelAttr)))
}

fn layout_handler() -> Arc<dyn AttributeHandler> {
	Arc::new(SetHandler::new(kinds::LAYOUT, |metadata, _| LayoutAttr::for_metadata(metadata)))
}

fn margin_handler() -> Arc<dyn AttributeHandler> {
	Arc::new(SetHandler::new(kinds::MARGIN, |metadata, _| MarginAttr::for_metadata(metadata)))
}

fn factory() -> Arc<dyn WidgetFactory> {
	Arc::new(DefaultFactory::new())
}

fn defaults_source() -> Arc<dyn ValueSource> {
	defaults()
}

/// Every attribute handler of the toolkit.
pub fn handlers() -> Vec<Arc<dyn AttributeHandler>> {
	vec![
		option_handler(),
		options_handler(),
		position_handler(),
		bounds_handler(),
		window_handler(),
		model_handler(),
		layout_handler(),
		margin_handler(),
	]
}

/// Adds the toolkit's handlers, the [`DefaultFactory`] and the `defaults`
/// source to `builder`.
pub fn install(builder: BindingContextBuilder) -> BindingContextBuilder {
	install_with(builder, factory())
}

/// Like [`install`], with a caller-supplied factory.
pub fn install_with(builder: BindingContextBuilder, factory: Arc<dyn WidgetFactory>) -> BindingContextBuilder {
	handlers()
		.into_iter()
		.fold(builder, BindingContextBuilder::handler)
		.factory(factory)
		.value_source(defaults_source())
}

inventory::submit!(HandlerReg(option_handler));
inventory::submit!(HandlerReg(options_handler));
inventory::submit!(HandlerReg(position_handler));
inventory::submit!(HandlerReg(bounds_handler));
inventory::submit!(HandlerReg(window_handler));
inventory::submit!(HandlerReg(model_handler));
inventory::submit!(HandlerReg(layout_handler));
inventory::submit!(HandlerReg(margin_handler));
inventory::submit!(FactoryReg(factory));
inventory::submit!(ValueSourceReg(defaults_source));
