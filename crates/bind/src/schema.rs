//! Key-alias schema: metadata kind -> canonical attribute key -> raw property.
//!
//! Attribute sets address their values by canonical snake_case keys; metadata
//! carries raw camelCase properties. The schema maps between the two. Built-in
//! kinds are registered first, then `<kind>.toml` bundles from an optional
//! directory add further kinds. A bundle never replaces a kind that is already
//! present.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use indexmap::IndexMap;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;

use crate::diagnostics::{Diagnostic, DiagnosticOrigin, DiagnosticSink};

/// Canonical key -> raw property name, in declaration order.
pub type KeyMap = IndexMap<Box<str>, Box<str>>;

/// Canonical attribute keys of the built-in kinds.
pub mod keys {
	pub mod gui {
		pub const NAME: &str = "name";
		pub const DESCRIPTION: &str = "description";
	}

	/// Shared by the `toolkit` and `window` kinds.
	pub mod toolkit {
		pub const ORDER: &str = "order";
		pub const PROVIDER: &str = "provider";
	}

	pub mod window {
		pub use super::toolkit::{ORDER, PROVIDER};
		pub const RESIZABLE: &str = "resizable";
		pub const ALWAYS_ON_TOP: &str = "always_on_top";
		pub const CLOSE_OPERATION: &str = "close_operation";
	}

	pub mod option {
		pub const TARGET: &str = "target";
		pub const TITLE: &str = "title";
		pub const TEXT: &str = "text";
		pub const INIT: &str = "init";
		pub const BACKGROUND: &str = "background";
		pub const FOREGROUND: &str = "foreground";
		pub const ENABLED: &str = "enabled";
	}

	pub mod position {
		pub const X: &str = "x";
		pub const Y: &str = "y";
		pub const WIDTH: &str = "width";
		pub const HEIGHT: &str = "height";
		pub const CONSTRAINTS: &str = "constraints";
		pub const GRID_X: &str = "grid_x";
		pub const GRID_Y: &str = "grid_y";
		pub const GRID_WIDTH: &str = "grid_width";
		pub const GRID_HEIGHT: &str = "grid_height";
		pub const WEIGHT_X: &str = "weight_x";
		pub const WEIGHT_Y: &str = "weight_y";
		pub const ANCHOR: &str = "anchor";
		pub const FILL: &str = "fill";
		pub const INSETS: &str = "insets";
		pub const IPAD_X: &str = "ipad_x";
		pub const IPAD_Y: &str = "ipad_y";
		pub const SPRING_EDGE: &str = "spring_edge";
		pub const SPRING_ANCHOR_EDGE: &str = "spring_anchor_edge";
		pub const SPRING_PAD: &str = "spring_pad";
	}

	pub mod bounds {
		pub const BOUNDS: &str = "bounds";
		pub const SIZE: &str = "size";
		pub const MIN: &str = "min";
		pub const MAX: &str = "max";
		pub const PREFERRED: &str = "preferred";
	}

	pub mod layout {
		pub const STRATEGY: &str = "strategy";
		pub const ABSOLUTE: &str = "absolute";
		pub const H_GAP: &str = "h_gap";
		pub const V_GAP: &str = "v_gap";
		pub const ROWS: &str = "rows";
		pub const COLUMNS: &str = "columns";
		pub const ALIGN: &str = "align";
		pub const AXIS: &str = "axis";
	}

	pub mod margin {
		pub const BORDER: &str = "border";
		pub const TOP: &str = "top";
		pub const LEFT: &str = "left";
		pub const BOTTOM: &str = "bottom";
		pub const RIGHT: &str = "right";
		pub const TITLE: &str = "title";
		pub const BEVEL_TYPE: &str = "bevel_type";
		pub const ETCHED_TYPE: &str = "etched_type";
		pub const HIGHLIGHT: &str = "highlight";
		pub const SHADOW: &str = "shadow";
		pub const LINE_COLOR: &str = "line_color";
		pub const LINE_THICKNESS: &str = "line_thickness";
		pub const LINE_ROUNDED: &str = "line_rounded";
		pub const COMPOUND_INSIDE: &str = "compound_inside";
		pub const COMPOUND_OUTSIDE: &str = "compound_outside";
	}

	pub mod model {
		pub const MODEL: &str = "model";
	}
}

const BUILTINS: &[(&str, &[(&str, &str)])] = &[
	("gui", &[("name", "name"), ("description", "description")]),
	("toolkit", &[("order", "value"), ("provider", "provider")]),
	(
		"window",
		&[
			("order", "value"),
			("provider", "provider"),
			("resizable", "resizable"),
			("always_on_top", "alwaysOnTop"),
			("close_operation", "closeOperation"),
		],
	),
	("nested", &[]),
	(
		"option",
		&[
			("target", "target"),
			("title", "title"),
			("text", "text"),
			("init", "init"),
			("background", "background"),
			("foreground", "foreground"),
			("enabled", "enabled"),
		],
	),
	(
		"position",
		&[
			("x", "x"),
			("y", "y"),
			("width", "width"),
			("height", "height"),
			("constraints", "constraints"),
			("grid_x", "gridx"),
			("grid_y", "gridy"),
			("grid_width", "gridwidth"),
			("grid_height", "gridheight"),
			("weight_x", "weightx"),
			("weight_y", "weighty"),
			("anchor", "anchor"),
			("fill", "fill"),
			("insets", "insets"),
			("ipad_x", "ipadx"),
			("ipad_y", "ipady"),
			("spring_edge", "edge"),
			("spring_anchor_edge", "anchorEdge"),
			("spring_pad", "pad"),
		],
	),
	(
		"bounds",
		&[
			("bounds", "bounds"),
			("size", "size"),
			("min", "minimumSize"),
			("max", "maximumSize"),
			("preferred", "preferredSize"),
		],
	),
	(
		"layout",
		&[
			("strategy", "value"),
			("absolute", "absoluteLayout"),
			("h_gap", "hgap"),
			("v_gap", "vgap"),
			("rows", "rows"),
			("columns", "columns"),
			("align", "align"),
			("axis", "axis"),
		],
	),
	(
		"margin",
		&[
			("border", "value"),
			("top", "emptyTop"),
			("left", "emptyLeft"),
			("bottom", "emptyBottom"),
			("right", "emptyRight"),
			("title", "title"),
			("bevel_type", "bevelType"),
			("etched_type", "etchedType"),
			("highlight", "highlight"),
			("shadow", "shadow"),
			("line_color", "lineColor"),
			("line_thickness", "lineThickness"),
			("line_rounded", "lineRounded"),
			("compound_inside", "compoundInside"),
			("compound_outside", "compoundOutside"),
		],
	),
	("model", &[("model", "value")]),
];

/// An immutable, fully loaded schema.
#[derive(Debug, Clone, Default)]
pub struct SchemaTable {
	kinds: FxHashMap<Box<str>, KeyMap>,
}

impl SchemaTable {
	/// A table holding only the built-in kinds.
	pub fn builtins() -> Self {
		let mut table = Self::default();
		for (kind, entries) in BUILTINS {
			let keys = entries.iter().map(|(c, r)| (Box::from(*c), Box::from(*r))).collect();
			table.register(kind, keys);
		}
		table
	}

	/// Adds `kind` unless it is already present. Returns whether it was added.
	pub fn register(&mut self, kind: &str, keys: KeyMap) -> bool {
		if self.kinds.contains_key(kind) {
			return false;
		}
		self.kinds.insert(kind.into(), keys);
		true
	}

	pub fn keys(&self, kind: &str) -> Option<&KeyMap> {
		self.kinds.get(kind)
	}

	/// Raw property mapped to `canonical` within `kind`.
	pub fn property(&self, kind: &str, canonical: &str) -> Option<&str> {
		self.kinds.get(kind)?.get(canonical).map(AsRef::as_ref)
	}

	pub fn contains(&self, kind: &str) -> bool {
		self.kinds.contains_key(kind)
	}

	pub fn len(&self) -> usize {
		self.kinds.len()
	}

	pub fn is_empty(&self) -> bool {
		self.kinds.is_empty()
	}
}

/// Outcome of loading a bundle directory.
#[derive(Debug, Default)]
pub struct BundleReport {
	/// Kinds added by bundles.
	pub loaded: Vec<String>,
	/// Kinds skipped because they were already present.
	pub skipped: Vec<String>,
	/// Files that could not be read or parsed.
	pub errors: Vec<(PathBuf, String)>,
}

/// Loads every `<kind>.toml` file in `dir` into `table`.
///
/// A missing directory is not an error. Each bundle is a flat table of
/// `canonical = "rawProperty"` string pairs.
pub fn load_bundles(dir: &Path, table: &mut SchemaTable) -> BundleReport {
	let mut report = BundleReport::default();
	let entries = match std::fs::read_dir(dir) {
		Ok(entries) => entries,
		Err(e) if e.kind() == std::io::ErrorKind::NotFound => return report,
		Err(e) => {
			report.errors.push((dir.to_path_buf(), e.to_string()));
			return report;
		}
	};

	let mut paths: Vec<PathBuf> = entries
		.filter_map(|e| e.ok().map(|e| e.path()))
		.filter(|p| p.extension().is_some_and(|ext| ext == "toml"))
		.collect();
	paths.sort();

	for path in paths {
		let Some(kind) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else {
			continue;
		};
		if table.contains(&kind) {
			report.skipped.push(kind);
			continue;
		}
		match parse_bundle(&path) {
			Ok(keys) => {
				table.register(&kind, keys);
				report.loaded.push(kind);
			}
			Err(message) => report.errors.push((path, message)),
		}
	}
	report
}

fn parse_bundle(path: &Path) -> Result<KeyMap, String> {
	let content = std::fs::read_to_string(path).map_err(|e| e.to_string())?;
	let parsed: toml::Table = toml::from_str(&content).map_err(|e| e.to_string())?;
	let mut keys = KeyMap::new();
	for (canonical, raw) in parsed {
		let raw = raw
			.as_str()
			.ok_or_else(|| format!("key `{canonical}` must map to a string"))?;
		keys.insert(canonical.into(), raw.into());
	}
	Ok(keys)
}

/// Lazily loaded schema shared by a binding context.
pub struct Schema {
	table: ArcSwapOption<SchemaTable>,
	load_lock: Mutex<()>,
	bundle_dir: Option<PathBuf>,
	sink: Arc<dyn DiagnosticSink>,
}

impl Schema {
	pub fn new(bundle_dir: Option<PathBuf>, sink: Arc<dyn DiagnosticSink>) -> Self {
		Self {
			table: ArcSwapOption::empty(),
			load_lock: Mutex::new(()),
			bundle_dir,
			sink,
		}
	}

	/// Returns the loaded table, loading it on first use.
	pub fn table(&self) -> Arc<SchemaTable> {
		if let Some(table) = self.table.load_full() {
			return table;
		}
		let _guard = self.load_lock.lock();
		if let Some(table) = self.table.load_full() {
			return table;
		}
		let table = Arc::new(self.load());
		self.table.store(Some(table.clone()));
		table
	}

	/// Forces the load now.
	pub fn init(&self) -> Arc<SchemaTable> {
		self.table()
	}

	/// Drops the loaded table; the next access reloads it.
	pub fn reset(&self) {
		let _guard = self.load_lock.lock();
		self.table.store(None);
	}

	pub fn is_loaded(&self) -> bool {
		self.table.load().is_some()
	}

	fn load(&self) -> SchemaTable {
		let mut table = SchemaTable::builtins();
		if let Some(dir) = &self.bundle_dir {
			let report = load_bundles(dir, &mut table);
			tracing::debug!(
				dir = %dir.display(),
				loaded = report.loaded.len(),
				skipped = report.skipped.len(),
				"schema bundles loaded"
			);
			for (path, message) in report.errors {
				self.sink.report(Diagnostic::new(
					DiagnosticOrigin::Schema,
					path.display().to_string(),
					message,
				));
			}
		}
		table
	}
}
