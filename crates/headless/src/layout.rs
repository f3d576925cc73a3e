//! Composition strategies of the headless toolkit.
//!
//! A `layout` declaration names one of the [`Layout`] strategies. Applying the
//! set installs a [`LayoutState`] on the container; linking a child asks the
//! strategy for the child's constraints.

use std::sync::Arc;

use parking_lot::Mutex;
use weft_bind::keys::{layout, option, position};
use weft_bind::{
	ApplyEnv, Attribute, AttributeSet, AttrValue, ComposeError, CompositionStrategy, Compose, Constraints, Edge,
	LayoutManager, MemberDescriptor, Metadata, WidgetRef, WidgetRole, kinds,
};

use crate::node::Node;

/// Raw property naming the strategy.
const STRATEGY_PROPERTY: &str = "value";
/// Raw property forcing absolute placement when no strategy resolves.
const ABSOLUTE_PROPERTY: &str = "absoluteLayout";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layout {
	Absolute,
	Border,
	Flow,
	Grid,
	Box,
	Card,
	GridBag,
	Spring,
}

impl Layout {
	/// Parses a strategy name: `border`, `BorderLayout`, `grid_bag`, `GridBagLayout`...
	pub fn parse(name: &str) -> Option<Self> {
		let name = name.trim();
		let name = name.strip_suffix("Layout").unwrap_or(name);
		match name.to_ascii_lowercase().replace('_', "").as_str() {
			"absolute" | "null" => Some(Layout::Absolute),
			"border" => Some(Layout::Border),
			"flow" => Some(Layout::Flow),
			"grid" => Some(Layout::Grid),
			"box" => Some(Layout::Box),
			"card" => Some(Layout::Card),
			"gridbag" => Some(Layout::GridBag),
			"spring" => Some(Layout::Spring),
			_ => None,
		}
	}
}

/// The layout installed on a container.
#[derive(Debug, Clone)]
pub struct LayoutState {
	pub layout: Layout,
	pub manager: Option<LayoutManager>,
}

impl LayoutState {
	pub fn manager_as<T: Send + Sync + 'static>(&self) -> Option<&T> {
		self.manager.as_ref()?.downcast_ref()
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BorderManager {
	pub h_gap: i64,
	pub v_gap: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlowAlign {
	Left,
	Center,
	Right,
	#[default]
	Leading,
	Trailing,
}

impl FlowAlign {
	fn from_index(index: i64) -> Self {
		match index {
			0 => FlowAlign::Left,
			1 => FlowAlign::Center,
			2 => FlowAlign::Right,
			4 => FlowAlign::Trailing,
			_ => FlowAlign::Leading,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowManager {
	pub align: FlowAlign,
	pub h_gap: i64,
	pub v_gap: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridManager {
	pub rows: i64,
	pub columns: i64,
	pub h_gap: i64,
	pub v_gap: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoxAxis {
	#[default]
	X,
	Y,
	Line,
	Page,
}

impl BoxAxis {
	fn from_index(index: i64) -> Self {
		match index {
			1 => BoxAxis::Y,
			2 => BoxAxis::Line,
			3 => BoxAxis::Page,
			_ => BoxAxis::X,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxManager {
	pub axis: BoxAxis,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CardManager {
	pub h_gap: i64,
	pub v_gap: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GridBagManager;

/// Cell placement of a grid-bag child.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBagConstraints {
	pub grid_x: i64,
	pub grid_y: i64,
	pub grid_width: i64,
	pub grid_height: i64,
	pub weight_x: f64,
	pub weight_y: f64,
	pub anchor: i64,
	pub fill: i64,
	pub insets: [i64; 4],
	pub ipad_x: i64,
	pub ipad_y: i64,
}

impl Default for GridBagConstraints {
	fn default() -> Self {
		Self {
			grid_x: -1,
			grid_y: -1,
			grid_width: 1,
			grid_height: 1,
			weight_x: 0.0,
			weight_y: 0.0,
			anchor: 10,
			fill: 0,
			insets: [0; 4],
			ipad_x: 0,
			ipad_y: 0,
		}
	}
}

/// Edge-to-edge constraint recorded by a spring layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpringConstraint {
	pub member: String,
	pub edge: String,
	pub anchor_edge: String,
	pub pad: i64,
}

impl SpringConstraint {
	fn from_member(child: &MemberDescriptor) -> Self {
		let position = child.set(kinds::POSITION);
		let name = |key| position.and_then(|p| p.name(key)).unwrap_or("Baseline").to_string();
		Self {
			member: child.name().to_string(),
			edge: name(position::SPRING_EDGE),
			anchor_edge: name(position::SPRING_ANCHOR_EDGE),
			pad: position.and_then(|p| p.int(position::SPRING_PAD)).unwrap_or(5),
		}
	}
}

/// Spring manager; children are placed through the constraints it records.
#[derive(Debug, Default)]
pub struct SpringManager {
	constraints: Mutex<Vec<SpringConstraint>>,
}

impl SpringManager {
	pub fn put_constraint(&self, constraint: SpringConstraint) {
		self.constraints.lock().push(constraint);
	}

	pub fn constraints(&self) -> Vec<SpringConstraint> {
		self.constraints.lock().clone()
	}
}

/// Behavior of a `layout` set: installs the manager and places children.
#[derive(Debug, Clone, Copy)]
pub struct LayoutAttr {
	layout: Layout,
}

impl LayoutAttr {
	pub fn new(layout: Layout) -> Self {
		Self { layout }
	}

	pub fn layout(&self) -> Layout {
		self.layout
	}

	/// Behavior for a raw `layout` declaration. `None` if it names no known
	/// strategy and does not ask for absolute placement.
	pub fn for_metadata(metadata: &Metadata) -> Option<Arc<dyn Attribute>> {
		let named = metadata
			.property(STRATEGY_PROPERTY)
			.and_then(AttrValue::as_name)
			.and_then(Layout::parse);
		let absolute = metadata
			.property(ABSOLUTE_PROPERTY)
			.and_then(AttrValue::as_bool)
			.unwrap_or(false);
		let layout = match named {
			Some(layout) => layout,
			None if absolute => Layout::Absolute,
			None => return None,
		};
		Some(Arc::new(Self::new(layout)))
	}
}

impl Attribute for LayoutAttr {
	fn apply_to(&self, attrs: &AttributeSet, widget: &WidgetRef, env: &ApplyEnv<'_>) {
		let Some(node) = widget.downcast_ref::<Node>() else {
			env.report(format!("`{}` cannot hold a layout", widget.type_name()));
			return;
		};
		if node.kind().role() == WidgetRole::Leaf {
			env.report(format!("`{}` is not a container", widget.type_name()));
			return;
		}
		let manager = self.create_manager(attrs, widget);
		node.update(|state| {
			state.layout = Some(LayoutState {
				layout: self.layout,
				manager,
			})
		});
	}

	fn as_composition(&self) -> Option<&dyn CompositionStrategy> {
		Some(self)
	}
}

impl CompositionStrategy for LayoutAttr {
	fn create_manager(&self, attrs: &AttributeSet, _container: &WidgetRef) -> Option<LayoutManager> {
		let manager: LayoutManager = match self.layout {
			Layout::Absolute => return None,
			Layout::Border => Arc::new(BorderManager {
				h_gap: attrs.int(layout::H_GAP).unwrap_or(0),
				v_gap: attrs.int(layout::V_GAP).unwrap_or(0),
			}),
			Layout::Flow => {
				let (h_gap, v_gap) = match (attrs.int(layout::H_GAP), attrs.int(layout::V_GAP)) {
					(Some(h), Some(v)) => (h, v),
					_ => (5, 5),
				};
				Arc::new(FlowManager {
					align: attrs.int(layout::ALIGN).map(FlowAlign::from_index).unwrap_or_default(),
					h_gap,
					v_gap,
				})
			}
			Layout::Grid => Arc::new(GridManager {
				rows: attrs.int(layout::ROWS).unwrap_or(1),
				columns: attrs.int(layout::COLUMNS).unwrap_or(0),
				h_gap: attrs.int(layout::H_GAP).unwrap_or(0),
				v_gap: attrs.int(layout::V_GAP).unwrap_or(0),
			}),
			Layout::Box => Arc::new(BoxManager {
				axis: attrs.int(layout::AXIS).map(BoxAxis::from_index).unwrap_or_default(),
			}),
			Layout::Card => Arc::new(CardManager {
				h_gap: attrs.int(layout::H_GAP).unwrap_or(0),
				v_gap: attrs.int(layout::V_GAP).unwrap_or(0),
			}),
			Layout::GridBag => Arc::new(GridBagManager),
			Layout::Spring => Arc::new(SpringManager::default()),
		};
		Some(manager)
	}

	fn is_absolute(&self) -> bool {
		self.layout == Layout::Absolute
	}

	fn create_constraints(&self, _attrs: &AttributeSet, child: &MemberDescriptor) -> Option<Constraints> {
		match self.layout {
			Layout::Border => {
				let edge = child
					.set(kinds::POSITION)
					.and_then(|p| p.name(position::CONSTRAINTS))
					.and_then(Edge::parse)
					.unwrap_or(Edge::Center);
				Some(Constraints::Edge(edge))
			}
			Layout::Card => {
				let title = child
					.set(kinds::OPTION)
					.and_then(|o| o.name(option::TITLE))
					.unwrap_or(child.name());
				Some(Constraints::Named(title.to_string()))
			}
			Layout::GridBag => Some(Constraints::Custom(Arc::new(grid_bag_constraints(child)))),
			Layout::Spring => Some(Constraints::Custom(Arc::new(SpringConstraint::from_member(child)))),
			Layout::Absolute | Layout::Flow | Layout::Grid | Layout::Box => None,
		}
	}

	fn attach(
		&self,
		attrs: &AttributeSet,
		child: &MemberDescriptor,
		widget: WidgetRef,
		parent: &WidgetRef,
	) -> Result<(), ComposeError> {
		if self.layout != Layout::Spring {
			let constraints = if self.is_absolute() {
				None
			} else {
				self.create_constraints(attrs, child)
			};
			return parent.compose(Compose::Append {
				child: widget,
				constraints,
			});
		}

		let routed = parent.downcast_ref::<Node>().is_some_and(|node| {
			node.update(|state| {
				let Some(spring) = state.layout.as_ref().and_then(|l| l.manager_as::<SpringManager>()) else {
					return false;
				};
				spring.put_constraint(SpringConstraint::from_member(child));
				true
			})
		});
		let constraints = if routed {
			None
		} else {
			self.create_constraints(attrs, child)
		};
		parent.compose(Compose::Append {
			child: widget,
			constraints,
		})
	}
}

fn grid_bag_constraints(child: &MemberDescriptor) -> GridBagConstraints {
	let mut gbc = GridBagConstraints::default();
	let Some(p) = child.set(kinds::POSITION) else {
		return gbc;
	};
	let int = |key, slot: &mut i64| {
		if let Some(v) = p.get(key).and_then(AttrValue::as_int) {
			*slot = v;
		}
	};
	int(position::GRID_X, &mut gbc.grid_x);
	int(position::GRID_Y, &mut gbc.grid_y);
	int(position::GRID_WIDTH, &mut gbc.grid_width);
	int(position::GRID_HEIGHT, &mut gbc.grid_height);
	int(position::ANCHOR, &mut gbc.anchor);
	int(position::FILL, &mut gbc.fill);
	int(position::IPAD_X, &mut gbc.ipad_x);
	int(position::IPAD_Y, &mut gbc.ipad_y);
	if let Some(w) = p.get(position::WEIGHT_X).and_then(AttrValue::as_float) {
		gbc.weight_x = w;
	}
	if let Some(w) = p.get(position::WEIGHT_Y).and_then(AttrValue::as_float) {
		gbc.weight_y = w;
	}
	if let Some(&[top, left, bottom, right]) = p.get(position::INSETS).and_then(AttrValue::as_ints)
		&& [top, left, bottom, right].iter().all(|v| *v >= 0)
	{
		gbc.insets = [top, left, bottom, right];
	}
	gbc
}
