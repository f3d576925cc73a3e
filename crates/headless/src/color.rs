use std::fmt;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
}

const NAMED: &[(&str, Color)] = &[
	("black", Color::rgb(0, 0, 0)),
	("white", Color::rgb(255, 255, 255)),
	("red", Color::rgb(255, 0, 0)),
	("green", Color::rgb(0, 255, 0)),
	("blue", Color::rgb(0, 0, 255)),
	("yellow", Color::rgb(255, 255, 0)),
	("cyan", Color::rgb(0, 255, 255)),
	("magenta", Color::rgb(255, 0, 255)),
	("orange", Color::rgb(255, 200, 0)),
	("pink", Color::rgb(255, 175, 175)),
	("gray", Color::rgb(128, 128, 128)),
	("grey", Color::rgb(128, 128, 128)),
	("dark_gray", Color::rgb(64, 64, 64)),
	("light_gray", Color::rgb(192, 192, 192)),
];

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b }
	}

	/// Parses `r,g,b` or a color name.
	///
	/// Deferred `@source#key` values are resolved by the caller before parsing.
	pub fn parse(text: &str) -> Option<Self> {
		let text = text.trim();
		if text.contains(',') {
			let parts = text
				.split(',')
				.map(|p| p.trim().parse::<u8>().ok())
				.collect::<Option<Vec<_>>>()?;
			return match parts.as_slice() {
				[r, g, b] => Some(Self::rgb(*r, *g, *b)),
				_ => None,
			};
		}
		let name = text.to_ascii_lowercase().replace([' ', '-'], "_");
		NAMED.iter().find(|(n, _)| *n == name).map(|(_, c)| *c)
	}
}

impl fmt::Display for Color {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{},{},{}", self.r, self.g, self.b)
	}
}
