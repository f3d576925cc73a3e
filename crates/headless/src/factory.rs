use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use weft_bind::{WidgetFactory, WidgetRef};

use crate::node::{Node, NodeKind};

/// Name the factory is registered under.
pub const PROVIDER: &str = "default";

type Constructor = fn() -> WidgetRef;

/// Creates [`Node`]s from [`NodeKind`] names, plus any registered custom
/// constructors. Custom constructors take precedence.
#[derive(Default)]
pub struct DefaultFactory {
	custom: RwLock<FxHashMap<String, Constructor>>,
}

impl DefaultFactory {
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers `constructor` for `type_name`. The first registration wins.
	pub fn with_constructor(self, type_name: impl Into<String>, constructor: Constructor) -> Self {
		self.register(type_name, constructor);
		self
	}

	pub fn register(&self, type_name: impl Into<String>, constructor: Constructor) -> bool {
		let mut custom = self.custom.write();
		let type_name = type_name.into();
		if custom.contains_key(&type_name) {
			return false;
		}
		custom.insert(type_name, constructor);
		true
	}
}

impl std::fmt::Debug for DefaultFactory {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("DefaultFactory")
			.field("custom", &self.custom.read().keys().collect::<Vec<_>>())
			.finish()
	}
}

impl WidgetFactory for DefaultFactory {
	fn name(&self) -> &str {
		PROVIDER
	}

	fn create(&self, declared_type: &str) -> Option<WidgetRef> {
		if let Some(constructor) = self.custom.read().get(declared_type) {
			return Some(constructor());
		}
		let Some(kind) = NodeKind::parse(declared_type) else {
			tracing::debug!(declared_type, "no headless widget for type");
			return None;
		};
		let node: WidgetRef = Node::new(kind);
		Some(node)
	}
}
