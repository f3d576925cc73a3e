//! Declarative metadata to widget tree binding engine.
//!
//! A GUI type describes itself as data: class and member [`Metadata`], collected
//! in a [`ClassDecl`]. The engine turns that description into a live widget
//! tree in two passes:
//!
//! 1. [`Builder`]: instantiate the root, create each member's widget through a
//!    [`WidgetFactory`], and run the [`AttributeHandler`] registered for every
//!    metadata kind the member carries.
//! 2. [`Linker`]: run `init` hooks and attach each member to the member named
//!    by its `target`, using the target's [`CompositionStrategy`].
//!
//! The result is a [`GuiModel`] holding the root instance and one
//! [`FieldHandle`] per member.
//!
//! The engine knows nothing about concrete widgets. Toolkits plug in widget
//! factories, attribute handlers, composition strategies and deferred
//! [`ValueSource`]s, either explicitly through [`BindingContext::builder`] or at
//! link time through `inventory` ([`HandlerReg`], [`FactoryReg`],
//! [`ValueSourceReg`]), which the [`BindingContext::global`] context discovers.
//!
//! Best-effort failures (an attribute that does not fit a widget, a failing
//! discovery source, a bad schema bundle) never abort a build; they go to the
//! context's [`DiagnosticSink`].

pub mod attribute;
pub mod builder;
pub mod config;
pub mod context;
pub mod decl;
pub mod deferred;
pub mod descriptor;
pub mod diagnostics;
pub mod error;
pub mod field;
pub mod handler;
pub mod linker;
pub mod listener;
pub mod metadata;
pub mod model;
pub mod registry;
pub mod schema;
pub mod strategy;
pub mod value;
pub mod widget;

#[cfg(test)]
mod testing;

pub use attribute::{ApplyEnv, Attribute, AttributeSet, Passive};
pub use builder::{Builder, BuilderState};
pub use config::{BindingConfig, ConfigError, DiagnosticsMode};
pub use context::{BindingContext, BindingContextBuilder, FactoryReg, HandlerReg, ValueSourceReg};
pub use decl::{ClassDecl, Gui, MemberDecl};
pub use deferred::{DeferredValue, MapSource, ValueSource};
pub use descriptor::{MemberDescriptor, ROOT_MEMBER};
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticOrigin, DiagnosticSink, NullSink, TracingSink};
pub use error::{BindError, DiscoveryError, ErrorCategory, LookupError, Result};
pub use field::FieldHandle;
pub use handler::{AttributeHandler, RepeatedHandler, SetHandler};
pub use linker::Linker;
pub use listener::{Listener, ListenerBinding, ListenerKind, ListenerSource, ListenerTable, UiEvent};
pub use metadata::{Declaration, Metadata, MetadataContext, MetadataKind, kinds};
pub use model::{AnyGuiModel, GuiModel};
pub use registry::{Discovery, PluginRegistry};
pub use schema::{Schema, SchemaTable, keys};
pub use strategy::CompositionStrategy;
pub use value::{Arg, ArgType, AttrValue, FromAttrValue, TypeName};
pub use widget::{
	Compose, ComposeError, Constraints, Edge, LayoutManager, SplitSide, Widget, WidgetFactory, WidgetRef, WidgetRole,
	WidgetSlot, downcast_widget,
};
