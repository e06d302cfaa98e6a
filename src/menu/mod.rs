//! The TAP Help menu: model, static catalog, release merge, rendering and
//! click wiring.

pub mod catalog;
pub mod merge;
pub mod node;
pub mod render;
pub mod wire;

pub use catalog::static_menu;
pub use merge::merge_install_branch;
pub use node::{Leaf, LeafAction, LeafSpec, MenuError, MenuNode, Submenu};
pub use render::{render, render_leaf, render_menu, render_submenu, RenderError};
pub use wire::wire;
