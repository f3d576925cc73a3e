//! Deferred attribute values of the form `@source#key`.
//!
//! A string attribute starting with `@` is looked up at apply time in the
//! [`ValueSource`] registered under `source`.

use indexmap::IndexMap;
use parking_lot::RwLock;

use crate::registry::PluginRegistry;
use crate::widget::WidgetRef;

pub const QUERY_INDICATOR: char = '@';
pub const QUERY_SEPARATOR: char = '#';

/// Provides values for deferred references.
pub trait ValueSource: Send + Sync {
	fn name(&self) -> &str;

	fn lookup(&self, key: &str, widget: &WidgetRef) -> Option<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeferredError {
	#[error("deferred value `{0}` has no `#` separator")]
	MissingSeparator(String),
	#[error("no value source named `{0}`")]
	UnknownSource(String),
	#[error("value source `{source_name}` has no key `{key}`")]
	MissingKey { source_name: String, key: String },
}

/// A parsed `@source#key` reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredValue {
	source: String,
	key: String,
}

impl DeferredValue {
	pub fn is_deferred(text: &str) -> bool {
		text.starts_with(QUERY_INDICATOR)
	}

	/// Parses `text`. Plain text yields `Ok(None)`.
	pub fn parse(text: &str) -> Result<Option<Self>, DeferredError> {
		let Some(query) = text.strip_prefix(QUERY_INDICATOR) else {
			return Ok(None);
		};
		let (source, key) = query
			.split_once(QUERY_SEPARATOR)
			.ok_or_else(|| DeferredError::MissingSeparator(text.to_string()))?;
		Ok(Some(Self {
			source: source.to_string(),
			key: key.to_string(),
		}))
	}

	pub fn source(&self) -> &str {
		&self.source
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	pub fn resolve(
		&self,
		sources: &PluginRegistry<dyn ValueSource>,
		widget: &WidgetRef,
	) -> Result<String, DeferredError> {
		let source = sources
			.find(|s| s.name() == self.source)
			.map_err(|_| DeferredError::UnknownSource(self.source.clone()))?;
		source
			.lookup(&self.key, widget)
			.ok_or_else(|| DeferredError::MissingKey {
				source_name: self.source.clone(),
				key: self.key.clone(),
			})
	}
}

/// In-memory key/value source.
#[derive(Debug)]
pub struct MapSource {
	name: String,
	values: RwLock<IndexMap<String, String>>,
}

impl MapSource {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			values: RwLock::new(IndexMap::new()),
		}
	}

	/// Sets `key`, returning the previous value.
	pub fn put(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
		self.values.write().insert(key.into(), value.into())
	}

	pub fn get(&self, key: &str) -> Option<String> {
		self.values.read().get(key).cloned()
	}

	pub fn remove(&self, key: &str) -> Option<String> {
		self.values.write().shift_remove(key)
	}
}

impl ValueSource for MapSource {
	fn name(&self) -> &str {
		&self.name
	}

	fn lookup(&self, key: &str, _: &WidgetRef) -> Option<String> {
		self.get(key)
	}
}
