//! The registered route set.
//!
//! # Responsibilities
//! - Hold one entry per `(method, matcher path)`; a later registration
//!   replaces the earlier one, including one whose parameters were named
//!   differently at the same positions
//! - Remember which resource owns each entry so a subtree can be
//!   withdrawn before it is re-registered under a new prefix
//!
//! # Design Decisions
//! - Entries reference handlers by owner and target, not by value; the
//!   handler is resolved when the router is compiled

use std::collections::{HashMap, HashSet};

use axum::http::Method;

use crate::resource::action::Action;
use crate::resource::path::{self, ParamSlot};
use crate::resource::ResourceId;

/// Identity of a registered route: method plus axum matcher path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pub method: Method,
    pub matcher: String,
}

impl RouteKey {
    /// Key for a `:param` style path.
    pub fn new(method: Method, path: &str) -> Self {
        Self {
            method,
            matcher: path::to_axum_path(path),
        }
    }
}

/// Which handler of the owning resource a route dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    Action(Action),
    /// Index into the owner's custom routes.
    Custom(usize),
}

#[derive(Debug, Clone)]
pub struct RouteEntry {
    /// Declared path, `:param` form.
    pub path: String,
    pub owner: ResourceId,
    pub target: Target,
    pub params: Vec<ParamSlot>,
}

#[derive(Debug, Default)]
pub struct RouteTable {
    entries: HashMap<RouteKey, RouteEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `entry` at `key`, returning the entry it replaced.
    pub fn insert(&mut self, key: RouteKey, entry: RouteEntry) -> Option<RouteEntry> {
        self.entries.insert(key, entry)
    }

    pub fn get(&self, method: &Method, path: &str) -> Option<&RouteEntry> {
        self.entries.get(&RouteKey::new(method.clone(), path))
    }

    /// Withdraw every entry owned by one of `owners`.
    pub fn remove_owned_by(&mut self, owners: &HashSet<ResourceId>) -> usize {
        let before = self.entries.len();
        self.entries.retain(|_, entry| !owners.contains(&entry.owner));
        before - self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&RouteKey, &RouteEntry)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
