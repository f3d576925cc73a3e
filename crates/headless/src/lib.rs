//! In-memory reference toolkit for `weft-bind`.
//!
//! Widgets are [`Node`]s: plain state records behind a lock that record every
//! attribute and composition applied to them. The toolkit supplies
//!
//! - a [`DefaultFactory`] creating nodes by [`NodeKind`] name,
//! - behaviors for the `option`, `position`, `bounds`, `window`, `model`,
//!   `layout` and `margin` metadata kinds,
//! - the composition strategies of [`Layout`],
//! - a `defaults` deferred value source.
//!
//! Linking the crate registers all of it with the global binding context; see
//! [`plugin`].

#[cfg(test)]
use {tempfile as _, tracing_subscriber as _};

pub mod attrs;
pub mod color;
pub mod factory;
pub mod layout;
pub mod margin;
pub mod node;
pub mod plugin;

pub use attrs::{BoundsAttr, ModelAttr, OptionAttr, PositionAttr, WindowAttr};
pub use color::Color;
pub use factory::DefaultFactory;
pub use layout::{
	BorderManager, BoxAxis, BoxManager, CardManager, FlowAlign, FlowManager, GridBagConstraints, GridBagManager,
	GridManager, Layout, LayoutAttr, LayoutState, SpringConstraint, SpringManager,
};
pub use margin::{Border, BorderKind, MarginAttr, Shading};
pub use node::{Child, Node, NodeKind, NodeState, Rect, Size};
pub use plugin::{defaults, handlers, install, install_with};
