//! Sink for best-effort failures that must not abort a build.

use std::fmt;

use parking_lot::Mutex;

/// Where a diagnostic was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticOrigin {
	/// An attribute could not be applied to a widget.
	Attribute,
	/// A plugin discovery source failed or panicked.
	Discovery,
	/// A schema bundle could not be read.
	Schema,
	/// A listener could not be attached.
	Listener,
	/// The entry point panicked.
	EntryPoint,
	/// A deferred value could not be resolved.
	DeferredValue,
	/// A member target could not be resolved during linking.
	Link,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
	pub origin: DiagnosticOrigin,
	/// Member, file or plugin the diagnostic is about.
	pub subject: String,
	pub message: String,
}

impl Diagnostic {
	pub fn new(origin: DiagnosticOrigin, subject: impl Into<String>, message: impl Into<String>) -> Self {
		Self {
			origin,
			subject: subject.into(),
			message: message.into(),
		}
	}
}

impl fmt::Display for Diagnostic {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?} [{}]: {}", self.origin, self.subject, self.message)
	}
}

pub trait DiagnosticSink: Send + Sync {
	fn report(&self, diagnostic: Diagnostic);
}

/// Default sink, logs each diagnostic at `warn` level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
	fn report(&self, diagnostic: Diagnostic) {
		tracing::warn!(
			origin = ?diagnostic.origin,
			subject = %diagnostic.subject,
			"{}",
			diagnostic.message
		);
	}
}

/// Discards everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
	fn report(&self, _: Diagnostic) {}
}

/// Keeps diagnostics in memory for later inspection.
#[derive(Debug, Default)]
pub struct CollectingSink {
	entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn snapshot(&self) -> Vec<Diagnostic> {
		self.entries.lock().clone()
	}

	/// Drains the collected diagnostics.
	pub fn take(&self) -> Vec<Diagnostic> {
		std::mem::take(&mut *self.entries.lock())
	}

	pub fn count(&self, origin: DiagnosticOrigin) -> usize {
		self.entries.lock().iter().filter(|d| d.origin == origin).count()
	}

	pub fn len(&self) -> usize {
		self.entries.lock().len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.lock().is_empty()
	}
}

impl DiagnosticSink for CollectingSink {
	fn report(&self, diagnostic: Diagnostic) {
		self.entries.lock().push(diagnostic);
	}
}
