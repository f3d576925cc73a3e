//! Borders drawn around headless containers.

use std::sync::Arc;

use weft_bind::keys::margin;
use weft_bind::{ApplyEnv, Attribute, AttrValue, AttributeSet, Metadata, WidgetRef};

use crate::color::Color;
use crate::node::Node;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BorderKind {
	Empty,
	Line,
	Titled,
	Bevel,
	Etched,
	Compound,
}

impl BorderKind {
	/// Parses `line`, `LineBorder`, `titled`...
	pub fn parse(name: &str) -> Option<Self> {
		let name = name.trim();
		let name = name.strip_suffix("Border").unwrap_or(name);
		match name.to_ascii_lowercase().as_str() {
			"empty" => Some(BorderKind::Empty),
			"line" => Some(BorderKind::Line),
			"titled" => Some(BorderKind::Titled),
			"bevel" => Some(BorderKind::Bevel),
			"etched" => Some(BorderKind::Etched),
			"compound" => Some(BorderKind::Compound),
			_ => None,
		}
	}
}

/// A highlight and shadow color pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shading {
	pub highlight: Color,
	pub shadow: Color,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Border {
	Empty {
		top: i64,
		left: i64,
		bottom: i64,
		right: i64,
	},
	Line {
		color: Color,
		thickness: i64,
		rounded: bool,
	},
	Titled {
		title: String,
		line: Option<Color>,
	},
	Bevel {
		raised: bool,
		shading: Option<Shading>,
	},
	Etched {
		etch_type: i64,
		shading: Option<Shading>,
	},
	Compound {
		outside: Box<Border>,
		inside: Box<Border>,
	},
}

impl Border {
	pub fn kind(&self) -> BorderKind {
		match self {
			Border::Empty { .. } => BorderKind::Empty,
			Border::Line { .. } => BorderKind::Line,
			Border::Titled { .. } => BorderKind::Titled,
			Border::Bevel { .. } => BorderKind::Bevel,
			Border::Etched { .. } => BorderKind::Etched,
			Border::Compound { .. } => BorderKind::Compound,
		}
	}
}

/// Reads border properties out of a `margin` set.
struct BorderReader<'a> {
	attrs: &'a AttributeSet,
	widget: &'a WidgetRef,
	env: &'a ApplyEnv<'a>,
}

impl BorderReader<'_> {
	fn color(&self, key: &str) -> Result<Option<Color>, String> {
		let Some(raw) = self.attrs.name(key) else {
			return Ok(None);
		};
		let Some(text) = self.env.resolve_text(raw, self.widget) else {
			return Err(format!("`{key}` could not be resolved"));
		};
		Color::parse(&text)
			.map(Some)
			.ok_or_else(|| format!("`{text}` is not a color"))
	}

	fn shading(&self) -> Result<Option<Shading>, String> {
		match (self.color(margin::HIGHLIGHT)?, self.color(margin::SHADOW)?) {
			(Some(highlight), Some(shadow)) => Ok(Some(Shading { highlight, shadow })),
			_ => Ok(None),
		}
	}

	fn side(&self, key: &str) -> i64 {
		self.attrs.int(key).unwrap_or(1)
	}

	fn read(&self, kind: BorderKind) -> Result<Border, String> {
		match kind {
			BorderKind::Empty => Ok(Border::Empty {
				top: self.side(margin::TOP),
				left: self.side(margin::LEFT),
				bottom: self.side(margin::BOTTOM),
				right: self.side(margin::RIGHT),
			}),
			BorderKind::Line => Ok(Border::Line {
				color: self
					.color(margin::LINE_COLOR)?
					.ok_or("line border needs `line_color`")?,
				thickness: self.attrs.int(margin::LINE_THICKNESS).unwrap_or(1),
				rounded: self
					.attrs
					.get(margin::LINE_ROUNDED)
					.and_then(AttrValue::as_bool)
					.unwrap_or(false),
			}),
			BorderKind::Titled => {
				let raw = self.attrs.name(margin::TITLE).ok_or("titled border needs `title`")?;
				let title = self
					.env
					.resolve_text(raw, self.widget)
					.ok_or("`title` could not be resolved")?;
				Ok(Border::Titled {
					title,
					line: self.color(margin::LINE_COLOR)?,
				})
			}
			BorderKind::Bevel => Ok(Border::Bevel {
				raised: self.attrs.int(margin::BEVEL_TYPE) == Some(0),
				shading: self.shading()?,
			}),
			BorderKind::Etched => Ok(Border::Etched {
				etch_type: self.attrs.int(margin::ETCHED_TYPE).unwrap_or(-1),
				shading: self.shading()?,
			}),
			BorderKind::Compound => {
				let part = |key: &str| -> Result<Border, String> {
					let name = self
						.attrs
						.name(key)
						.ok_or_else(|| format!("compound border needs `{key}`"))?;
					match BorderKind::parse(name) {
						Some(BorderKind::Compound) => Err("compound borders do not nest".to_string()),
						Some(kind) => self.read(kind),
						None => Err(format!("unknown border `{name}`")),
					}
				};
				Ok(Border::Compound {
					outside: Box::new(part(margin::COMPOUND_OUTSIDE)?),
					inside: Box::new(part(margin::COMPOUND_INSIDE)?),
				})
			}
		}
	}
}

/// Behavior of a `margin` set.
#[derive(Debug, Clone, Copy)]
pub struct MarginAttr {
	kind: BorderKind,
}

impl MarginAttr {
	pub fn new(kind: BorderKind) -> Self {
		Self { kind }
	}

	/// Behavior for a raw `margin` declaration. `None` for an unknown border.
	pub fn for_metadata(metadata: &Metadata) -> Option<Arc<dyn Attribute>> {
		let kind = metadata
			.property(weft_bind::metadata::CONTAINED)
			.and_then(AttrValue::as_name)
			.and_then(BorderKind::parse)?;
		Some(Arc::new(Self::new(kind)))
	}
}

impl Attribute for MarginAttr {
	fn apply_to(&self, attrs: &AttributeSet, widget: &WidgetRef, env: &ApplyEnv<'_>) {
		let Some(node) = widget.downcast_ref::<Node>() else {
			env.report(format!("`{}` cannot carry a border", widget.type_name()));
			return;
		};
		if node.kind().is_window() {
			env.report("windows do not carry borders");
			return;
		}
		let reader = BorderReader { attrs, widget, env };
		match reader.read(self.kind) {
			Ok(border) => node.update(|state| state.border = Some(border)),
			Err(message) => env.report(message),
		}
	}
}
