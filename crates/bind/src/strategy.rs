use crate::attribute::AttributeSet;
use crate::descriptor::MemberDescriptor;
use crate::metadata::kinds;
use crate::schema::keys::position;
use crate::widget::{Compose, ComposeError, Constraints, Edge, LayoutManager, WidgetRef};

/// Layout behavior of a container: how its children are placed.
pub trait CompositionStrategy: Send + Sync {
	/// Creates the layout manager installed on `container`. `None` for
	/// absolute placement.
	fn create_manager(&self, attrs: &AttributeSet, container: &WidgetRef) -> Option<LayoutManager>;

	fn is_absolute(&self) -> bool {
		false
	}

	/// Placement constraints of `child` under this strategy.
	fn create_constraints(&self, attrs: &AttributeSet, child: &MemberDescriptor) -> Option<Constraints>;

	/// Attaches `widget`, described by `child`, to `parent`.
	fn attach(
		&self,
		attrs: &AttributeSet,
		child: &MemberDescriptor,
		widget: WidgetRef,
		parent: &WidgetRef,
	) -> Result<(), ComposeError> {
		let constraints = if self.is_absolute() {
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

/// The edge named by a member's `position.constraints`, if any.
pub fn declared_edge(member: &MemberDescriptor) -> Option<Edge> {
	member
		.set(kinds::POSITION)?
		.name(position::CONSTRAINTS)
		.and_then(Edge::parse)
}
