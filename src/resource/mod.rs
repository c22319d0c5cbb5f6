//! Resource declaration and route composition.
//!
//! # Data Flow
//! ```text
//! Declaration (application assembly):
//!     Resources::resource(name) / root()
//!     → registry.rs (create or fetch by name)
//!     → handle.rs (actions, custom verb routes, loader, id override)
//!     → path.rs (compose ancestor chain + action shape)
//!     → table.rs (register; same method+path replaces)
//!
//! Nesting:
//!     parent.add(child) / map(child)
//!     → withdraw the child's subtree from the table
//!     → re-register it under /<parent>/:<parent_id>
//!
//! Compilation (before serving):
//!     table.rs entries → dispatch::wrapper (load plan per route)
//!     → axum Router, immutable at runtime
//! ```
//!
//! # Design Decisions
//! - Standard actions are a closed enum; custom routes are an ordered list
//! - Paths are a pure function of the ancestor chain, recomputed on change
//! - One nesting primitive backs both `add` and `map`

use std::fmt;

pub mod action;
pub mod handle;
pub mod inflect;
pub mod path;
pub mod registry;
pub mod table;

pub use action::{Action, Scope};
pub use handle::ResourceMut;
pub use registry::{Resources, RouteInfo};

/// Identifies a resource within its [`Resources`] registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(pub(crate) usize);

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
