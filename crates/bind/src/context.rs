//! The binding context: schema, plugin registries, diagnostics and config.
//!
//! [`BindingContext::global`] is the process-wide default; it discovers
//! handlers, widget factories and value sources registered with
//! `inventory::submit!`. Tests and embedders build isolated contexts with
//! [`BindingContext::builder`].

use std::sync::{Arc, LazyLock};

use crate::config::{BindingConfig, DiagnosticsMode};
use crate::deferred::ValueSource;
use crate::diagnostics::{Diagnostic, DiagnosticSink, NullSink, TracingSink};
use crate::error::LookupError;
use crate::handler::AttributeHandler;
use crate::metadata::MetadataKind;
use crate::registry::{Discovery, PluginRegistry};
use crate::schema::Schema;
use crate::widget::WidgetFactory;

/// Link-time registration of an attribute handler.
pub struct HandlerReg(pub fn() -> Arc<dyn AttributeHandler>);
inventory::collect!(HandlerReg);

/// Link-time registration of a widget factory.
pub struct FactoryReg(pub fn() -> Arc<dyn WidgetFactory>);
inventory::collect!(FactoryReg);

/// Link-time registration of a deferred value source.
pub struct ValueSourceReg(pub fn() -> Arc<dyn ValueSource>);
inventory::collect!(ValueSourceReg);

impl Discovery<dyn AttributeHandler> {
	pub fn inventory() -> Self {
		Self::from_fn(|| Ok(inventory::iter::<HandlerReg>.into_iter().map(|r| (r.0)()).collect()))
	}
}

impl Discovery<dyn WidgetFactory> {
	pub fn inventory() -> Self {
		Self::from_fn(|| Ok(inventory::iter::<FactoryReg>.into_iter().map(|r| (r.0)()).collect()))
	}
}

impl Discovery<dyn ValueSource> {
	pub fn inventory() -> Self {
		Self::from_fn(|| {
			Ok(inventory::iter::<ValueSourceReg>
				.into_iter()
				.map(|r| (r.0)())
				.collect())
		})
	}
}

static GLOBAL: LazyLock<Arc<BindingContext>> = LazyLock::new(|| {
	BindingContext::builder()
		.config(BindingConfig::from_env())
		.discover_inventory()
		.build()
});

pub struct BindingContext {
	config: BindingConfig,
	schema: Schema,
	handlers: PluginRegistry<dyn AttributeHandler>,
	factories: PluginRegistry<dyn WidgetFactory>,
	value_sources: PluginRegistry<dyn ValueSource>,
	sink: Arc<dyn DiagnosticSink>,
}

impl BindingContext {
	/// The process-wide context.
	pub fn global() -> Arc<BindingContext> {
		GLOBAL.clone()
	}

	pub fn builder() -> BindingContextBuilder {
		BindingContextBuilder::default()
	}

	pub fn config(&self) -> &BindingConfig {
		&self.config
	}

	pub fn schema(&self) -> &Schema {
		&self.schema
	}

	pub fn handlers(&self) -> &PluginRegistry<dyn AttributeHandler> {
		&self.handlers
	}

	pub fn factories(&self) -> &PluginRegistry<dyn WidgetFactory> {
		&self.factories
	}

	pub fn value_sources(&self) -> &PluginRegistry<dyn ValueSource> {
		&self.value_sources
	}

	pub fn sink(&self) -> &Arc<dyn DiagnosticSink> {
		&self.sink
	}

	pub fn report(&self, diagnostic: Diagnostic) {
		self.sink.report(diagnostic);
	}

	/// Handler bound to `kind`, if any.
	pub fn handler_for(&self, kind: MetadataKind) -> Option<Arc<dyn AttributeHandler>> {
		self.handlers.find(|h| h.kind() == kind).ok()
	}

	/// Widget factory named `provider`.
	pub fn factory(&self, provider: &str) -> Result<Arc<dyn WidgetFactory>, LookupError> {
		self.factories.find(|f| f.name() == provider)
	}
}

impl std::fmt::Debug for BindingContext {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("BindingContext")
			.field("config", &self.config)
			.field("handlers", &self.handlers)
			.field("factories", &self.factories)
			.field("value_sources", &self.value_sources)
			.finish_non_exhaustive()
	}
}

/// Assembles a [`BindingContext`]. Without [`discover_inventory`] only the
/// explicitly added plugins are visible.
///
/// [`discover_inventory`]: Self::discover_inventory
#[derive(Default)]
pub struct BindingContextBuilder {
	config: Option<BindingConfig>,
	sink: Option<Arc<dyn DiagnosticSink>>,
	discover: bool,
	handlers: Vec<Arc<dyn AttributeHandler>>,
	factories: Vec<Arc<dyn WidgetFactory>>,
	value_sources: Vec<Arc<dyn ValueSource>>,
}

impl BindingContextBuilder {
	pub fn config(mut self, config: BindingConfig) -> Self {
		self.config = Some(config);
		self
	}

	/// Overrides the sink chosen by the config's diagnostics mode.
	pub fn sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
		self.sink = Some(sink);
		self
	}

	/// Also discover plugins registered through `inventory`.
	pub fn discover_inventory(mut self) -> Self {
		self.discover = true;
		self
	}

	pub fn handler(mut self, handler: Arc<dyn AttributeHandler>) -> Self {
		self.handlers.push(handler);
		self
	}

	pub fn factory(mut self, factory: Arc<dyn WidgetFactory>) -> Self {
		self.factories.push(factory);
		self
	}

	pub fn value_source(mut self, source: Arc<dyn ValueSource>) -> Self {
		self.value_sources.push(source);
		self
	}

	pub fn build(self) -> Arc<BindingContext> {
		let config = self.config.unwrap_or_default();
		let sink: Arc<dyn DiagnosticSink> = match (self.sink, config.diagnostics) {
			(Some(sink), _) => sink,
			(None, DiagnosticsMode::Log) => Arc::new(TracingSink),
			(None, DiagnosticsMode::Silent) => Arc::new(NullSink),
		};

		let (handler_discovery, factory_discovery, value_discovery) = if self.discover {
			(
				Discovery::<dyn AttributeHandler>::inventory(),
				Discovery::<dyn WidgetFactory>::inventory(),
				Discovery::<dyn ValueSource>::inventory(),
			)
		} else {
			(Discovery::none(), Discovery::none(), Discovery::none())
		};

		let context = BindingContext {
			schema: Schema::new(config.schema_dir.clone(), sink.clone()),
			handlers: PluginRegistry::new("handlers", handler_discovery, sink.clone()),
			factories: PluginRegistry::new("factories", factory_discovery, sink.clone()),
			value_sources: PluginRegistry::new("value sources", value_discovery, sink.clone()),
			sink,
			config,
		};
		for handler in self.handlers {
			context.handlers.register(handler);
		}
		for factory in self.factories {
			context.factories.register(factory);
		}
		for source in self.value_sources {
			context.value_sources.register(source);
		}
		Arc::new(context)
	}
}
