//! Behaviors of the `option`, `position`, `bounds`, `window` and `model` sets.
//!
//! Every behavior writes into a [`Node`]'s state and reports, rather than
//! fails, when a value does not fit the widget it is applied to.

use weft_bind::keys::{bounds, model, option, position, window};
use weft_bind::{ApplyEnv, Attribute, AttrValue, AttributeSet, WidgetRef};

use crate::color::Color;
use crate::node::{Node, Size};

fn node<'w>(widget: &'w WidgetRef, env: &ApplyEnv<'_>, what: &str) -> Option<&'w Node> {
	let node = widget.downcast_ref::<Node>();
	if node.is_none() {
		env.report(format!("`{}` is not a headless widget, {what} skipped", widget.type_name()));
	}
	node
}

fn color(attrs: &AttributeSet, key: &str, widget: &WidgetRef, env: &ApplyEnv<'_>) -> Option<Color> {
	let raw = attrs.name(key)?;
	let text = env.resolve_text(raw, widget)?;
	let color = Color::parse(&text);
	if color.is_none() {
		env.report(format!("`{text}` is not a color"));
	}
	color
}

/// `option`: text, window title, colors and the enabled flag.
#[derive(Debug, Default, Clone, Copy)]
pub struct OptionAttr;

impl Attribute for OptionAttr {
	fn apply_to(&self, attrs: &AttributeSet, widget: &WidgetRef, env: &ApplyEnv<'_>) {
		let Some(node) = node(widget, env, "option") else {
			return;
		};
		let kind = node.kind();

		let text = attrs.name(option::TEXT).and_then(|raw| env.resolve_text(raw, widget));
		if text.is_some() && !kind.has_text() {
			env.report(format!("`{}` has no text", kind.name()));
		}
		let title = if kind.is_window() {
			attrs.name(option::TITLE).and_then(|raw| env.resolve_text(raw, widget))
		} else {
			None
		};
		let background = color(attrs, option::BACKGROUND, widget, env);
		let foreground = color(attrs, option::FOREGROUND, widget, env);
		let enabled = attrs.get(option::ENABLED).and_then(AttrValue::as_bool);

		node.update(|state| {
			if kind.has_text()
				&& let Some(text) = text
			{
				state.text = Some(text);
			}
			if let Some(title) = title {
				state.title = Some(title);
			}
			if let Some(c) = background {
				state.background = Some(c);
			}
			if let Some(c) = foreground {
				state.foreground = Some(c);
			}
			if let Some(enabled) = enabled {
				state.enabled = enabled;
			}
		});
	}
}

/// `position`: absolute location. Cell and edge constraints are read by the
/// parent's layout when linking.
#[derive(Debug, Default, Clone, Copy)]
pub struct PositionAttr;

impl Attribute for PositionAttr {
	fn apply_to(&self, attrs: &AttributeSet, widget: &WidgetRef, env: &ApplyEnv<'_>) {
		let placement = [position::X, position::Y, position::WIDTH, position::HEIGHT].map(|key| attrs.int(key));
		if placement.iter().all(Option::is_none) {
			return;
		}
		let Some(node) = node(widget, env, "position") else {
			return;
		};
		let [x, y, width, height] = placement;
		node.update(|state| {
			let bounds = &mut state.bounds;
			for (slot, value) in [
				(&mut bounds.x, x),
				(&mut bounds.y, y),
				(&mut bounds.width, width),
				(&mut bounds.height, height),
			] {
				if let Some(value) = value {
					*slot = value;
				}
			}
		});
	}
}

/// `bounds`: geometry given as integer lists. A list that is too short or
/// holds a negative entry is ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct BoundsAttr;

fn ints<'a>(attrs: &'a AttributeSet, key: &str, len: usize, env: &ApplyEnv<'_>) -> Option<&'a [i64]> {
	let values = attrs.get(key)?.as_ints()?;
	if values.len() < len || values[..len].iter().any(|v| *v < 0) {
		env.report(format!("`{key}` needs {len} non-negative values, got {values:?}"));
		return None;
	}
	Some(&values[..len])
}

fn size(attrs: &AttributeSet, key: &str, env: &ApplyEnv<'_>) -> Option<Size> {
	ints(attrs, key, 2, env).map(|v| Size {
		width: v[0],
		height: v[1],
	})
}

impl Attribute for BoundsAttr {
	fn apply_to(&self, attrs: &AttributeSet, widget: &WidgetRef, env: &ApplyEnv<'_>) {
		let Some(node) = node(widget, env, "bounds") else {
			return;
		};
		let rect = ints(attrs, bounds::BOUNDS, 4, env);
		let size_ = size(attrs, bounds::SIZE, env);
		let min = size(attrs, bounds::MIN, env);
		let max = size(attrs, bounds::MAX, env);
		let preferred = size(attrs, bounds::PREFERRED, env);

		node.update(|state| {
			if let Some(&[x, y, width, height]) = rect {
				state.bounds.x = x;
				state.bounds.y = y;
				state.bounds.width = width;
				state.bounds.height = height;
			}
			if size_.is_some() {
				state.size = size_;
			}
			if min.is_some() {
				state.min_size = min;
			}
			if max.is_some() {
				state.max_size = max;
			}
			if preferred.is_some() {
				state.preferred_size = preferred;
			}
		});
	}
}

/// `window`: window flags. Only frames and dialogs accept them.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowAttr;

impl Attribute for WindowAttr {
	fn apply_to(&self, attrs: &AttributeSet, widget: &WidgetRef, env: &ApplyEnv<'_>) {
		let Some(node) = node(widget, env, "window flags") else {
			return;
		};
		if !node.kind().is_window() {
			env.report(format!("`{}` is not a window", node.kind().name()));
			return;
		}
		let flag = |key| attrs.get(key).and_then(AttrValue::as_bool);
		let (resizable, always_on_top) = (flag(window::RESIZABLE), flag(window::ALWAYS_ON_TOP));
		let close_operation = attrs.int(window::CLOSE_OPERATION);
		node.update(|state| {
			if let Some(v) = resizable {
				state.resizable = v;
			}
			if let Some(v) = always_on_top {
				state.always_on_top = v;
			}
			if let Some(v) = close_operation {
				state.close_operation = v;
			}
		});
	}
}

/// `model`: names the data model of list-like widgets.
#[derive(Debug, Default, Clone, Copy)]
pub struct ModelAttr;

impl Attribute for ModelAttr {
	fn apply_to(&self, attrs: &AttributeSet, widget: &WidgetRef, env: &ApplyEnv<'_>) {
		let Some(name) = attrs.name(model::MODEL) else {
			return;
		};
		let Some(node) = node(widget, env, "model") else {
			return;
		};
		if !node.kind().has_model() {
			env.report(format!("`{}` holds no model", node.kind().name()));
			return;
		}
		node.update(|state| state.model = Some(name.to_string()));
	}
}
