//! Error types for binding, lookup and discovery.

use crate::config::ConfigError;
use crate::widget::ComposeError;

/// Result alias used throughout the binding engine.
pub type Result<T, E = BindError> = std::result::Result<T, E>;

/// Coarse classification of a [`BindError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
	/// Malformed metadata or configuration.
	Configuration,
	/// Widget tree could not be built or linked.
	Build,
	/// A requested member or entry point does not exist.
	NotFound,
	/// A name was registered twice.
	AlreadyBound,
	/// A plugin registry had no matching entry.
	Lookup,
	/// An operation was attempted on a closed resource.
	IllegalState,
}

/// Structural failures that abort a build or link.
///
/// Best-effort failures never surface here; they go to the context's
/// [`DiagnosticSink`](crate::diagnostics::DiagnosticSink).
#[derive(Debug, thiserror::Error)]
pub enum BindError {
	#[error("repetition container `{container}` does not expose its `{kind}` instances")]
	UnreadableContainer {
		kind: &'static str,
		container: &'static str,
	},

	#[error("metadata kind `{kind}` has no schema entry")]
	UndefinedKind { kind: String },

	#[error(transparent)]
	Config(#[from] ConfigError),

	#[error("no constructor of `{class}` accepts ({signature})")]
	NoConstructor {
		class: &'static str,
		signature: String,
	},

	#[error("no widget for member `{member}` of type `{declared_type}`")]
	WidgetUnavailable {
		member: String,
		declared_type: String,
	},

	#[error("`{class}` declares a toolkit but exposes no root widget")]
	RootNotWidget { class: &'static str },

	#[error("`{class}` does not carry the gui marker")]
	NotAGui { class: &'static str },

	#[error("hook `{hook}` is not declared on `{class}`")]
	HookNotFound { class: &'static str, hook: String },

	#[error("no `{kind}` behavior for member `{member}`")]
	UnresolvedDescriptor { kind: &'static str, member: String },

	#[error("model of `{class}` has no root instance")]
	NotBuilt { class: &'static str },

	#[error("cannot attach `{child}` to `{parent}`: {error}")]
	Compose {
		child: String,
		parent: String,
		#[source]
		error: ComposeError,
	},

	#[error("`{class}` declares no entry point")]
	EntryPointNotFound { class: &'static str },

	#[error("`{name}` is already bound")]
	AlreadyBound { name: String },

	#[error(transparent)]
	Lookup(#[from] LookupError),

	#[error("builder is closed")]
	BuilderClosed,
}

impl BindError {
	/// Returns the taxonomy bucket of this error.
	pub fn category(&self) -> ErrorCategory {
		match self {
			Self::UnreadableContainer { .. } | Self::UndefinedKind { .. } | Self::Config(_) => {
				ErrorCategory::Configuration
			}
			Self::NoConstructor { .. }
			| Self::WidgetUnavailable { .. }
			| Self::RootNotWidget { .. }
			| Self::NotAGui { .. }
			| Self::HookNotFound { .. }
			| Self::UnresolvedDescriptor { .. }
			| Self::NotBuilt { .. }
			| Self::Compose { .. } => ErrorCategory::Build,
			Self::EntryPointNotFound { .. } => ErrorCategory::NotFound,
			Self::AlreadyBound { .. } => ErrorCategory::AlreadyBound,
			Self::Lookup(_) => ErrorCategory::Lookup,
			Self::BuilderClosed => ErrorCategory::IllegalState,
		}
	}
}

/// A registry `find` matched nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("no plugin in `{registry}` matched the lookup")]
pub struct LookupError {
	pub registry: &'static str,
}

/// A discovery source failed to enumerate its plugins.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("plugin discovery failed: {0}")]
pub struct DiscoveryError(pub String);
