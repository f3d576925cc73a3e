//! Thread-safe plugin registry with lazy, exactly-once discovery.
//!
//! The live list is a copy-on-write [`ArcSwap`] snapshot: readers iterate a
//! stable `Arc<Vec<_>>` while writers publish a new vector. Discovery runs on
//! the first lookup, under a lock, behind an [`AtomicBool`] fast path.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::diagnostics::{Diagnostic, DiagnosticOrigin, DiagnosticSink};
use crate::error::{DiscoveryError, LookupError};

type Enumerate<S> = Box<dyn Fn() -> Result<Vec<Arc<S>>, DiscoveryError> + Send + Sync>;

/// Where a registry finds its plugins on first use.
pub struct Discovery<S: ?Sized> {
	enumerate: Option<Enumerate<S>>,
}

impl<S: ?Sized> Discovery<S> {
	/// Nothing is discovered; only explicit registrations count.
	pub fn none() -> Self {
		Self { enumerate: None }
	}

	pub fn from_fn(f: impl Fn() -> Result<Vec<Arc<S>>, DiscoveryError> + Send + Sync + 'static) -> Self {
		Self {
			enumerate: Some(Box::new(f)),
		}
	}

	fn enumerate(&self) -> Result<Vec<Arc<S>>, DiscoveryError> {
		match &self.enumerate {
			Some(f) => f(),
			None => Ok(Vec::new()),
		}
	}
}

impl<S: ?Sized> fmt::Debug for Discovery<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.enumerate {
			Some(_) => f.write_str("Discovery(..)"),
			None => f.write_str("Discovery(none)"),
		}
	}
}

pub struct PluginRegistry<S: ?Sized + Send + Sync + 'static> {
	label: &'static str,
	plugins: ArcSwap<Vec<Arc<S>>>,
	discovered: AtomicBool,
	discovery_lock: Mutex<()>,
	discovery: Discovery<S>,
	sink: Arc<dyn DiagnosticSink>,
}

impl<S: ?Sized + Send + Sync + 'static> PluginRegistry<S> {
	pub fn new(label: &'static str, discovery: Discovery<S>, sink: Arc<dyn DiagnosticSink>) -> Self {
		Self {
			label,
			plugins: ArcSwap::from_pointee(Vec::new()),
			discovered: AtomicBool::new(false),
			discovery_lock: Mutex::new(()),
			discovery,
			sink,
		}
	}

	pub fn label(&self) -> &'static str {
		self.label
	}

	/// Adds `plugin` unless the same instance is already registered.
	pub fn register(&self, plugin: Arc<S>) -> bool {
		let mut inserted = false;
		self.plugins.rcu(|current| {
			if current.iter().any(|p| Arc::ptr_eq(p, &plugin)) {
				inserted = false;
				return current.clone();
			}
			inserted = true;
			let mut next = Vec::with_capacity(current.len() + 1);
			next.extend(current.iter().cloned());
			next.push(plugin.clone());
			Arc::new(next)
		});
		inserted
	}

	/// Removes `plugin` if it is registered.
	pub fn deregister(&self, plugin: &Arc<S>) -> bool {
		let mut removed = false;
		self.plugins.rcu(|current| {
			removed = current.iter().any(|p| Arc::ptr_eq(p, plugin));
			if !removed {
				return current.clone();
			}
			Arc::new(current.iter().filter(|p| !Arc::ptr_eq(*p, plugin)).cloned().collect())
		});
		removed
	}

	/// First plugin matching `pred`.
	pub fn find(&self, pred: impl Fn(&S) -> bool) -> Result<Arc<S>, LookupError> {
		self.ensure_discovered();
		self.plugins
			.load()
			.iter()
			.find(|p| pred(p))
			.cloned()
			.ok_or(LookupError { registry: self.label })
	}

	/// First plugin matching `pred`, else `fallback`.
	pub fn find_or(&self, pred: impl Fn(&S) -> bool, fallback: Option<Arc<S>>) -> Option<Arc<S>> {
		self.find(pred).ok().or(fallback)
	}

	/// Snapshot of every registered plugin.
	pub fn all(&self) -> Arc<Vec<Arc<S>>> {
		self.ensure_discovered();
		self.plugins.load_full()
	}

	pub fn len(&self) -> usize {
		self.all().len()
	}

	pub fn is_empty(&self) -> bool {
		self.all().is_empty()
	}

	pub fn is_discovered(&self) -> bool {
		self.discovered.load(Ordering::Acquire)
	}

	fn ensure_discovered(&self) {
		if self.discovered.load(Ordering::Acquire) {
			return;
		}
		let _guard = self.discovery_lock.lock();
		if self.discovered.load(Ordering::Acquire) {
			return;
		}

		match catch_unwind(AssertUnwindSafe(|| self.discovery.enumerate())) {
			Ok(Ok(found)) => {
				let count = found.len();
				for plugin in found {
					self.register(plugin);
				}
				tracing::debug!(registry = self.label, count, "plugins discovered");
			}
			Ok(Err(e)) => self.report(e.to_string()),
			Err(payload) => self.report(format!("discovery panicked: {}", panic_message(&*payload))),
		}
		self.discovered.store(true, Ordering::Release);
	}

	fn report(&self, message: String) {
		self.sink
			.report(Diagnostic::new(DiagnosticOrigin::Discovery, self.label, message));
	}
}

impl<S: ?Sized + Send + Sync + 'static> fmt::Debug for PluginRegistry<S> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PluginRegistry")
			.field("label", &self.label)
			.field("plugins", &self.plugins.load().len())
			.field("discovered", &self.is_discovered())
			.finish()
	}
}

/// Best-effort text of a panic payload.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
	if let Some(s) = payload.downcast_ref::<&str>() {
		(*s).to_string()
	} else if let Some(s) = payload.downcast_ref::<String>() {
		s.clone()
	} else {
		"unknown panic".to_string()
	}
}
