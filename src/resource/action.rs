//! The conventional action vocabulary.
//!
//! # Responsibilities
//! - Name the seven standard actions as a closed enum
//! - Map each action to its HTTP verb and path shape
//!
//! # Design Decisions
//! - Pure data, independent of any resource instance
//! - `ALL` is ordered as the table below; registration follows this order
//!
//! | action  | verb   | scope      | shape         |
//! |---------|--------|------------|---------------|
//! | index   | GET    | collection | `/`           |
//! | new     | GET    | collection | `/new`        |
//! | create  | POST   | collection | `/`           |
//! | show    | GET    | member     | `/:id`        |
//! | edit    | GET    | member     | `/:id/edit`   |
//! | update  | PUT    | member     | `/:id`        |
//! | destroy | DELETE | member     | `/:id`        |

use std::fmt;

use axum::http::Method;
use serde::Serialize;

/// One of the seven standard actions of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Index,
    New,
    Create,
    Show,
    Edit,
    Update,
    Destroy,
}

/// Whether an action addresses the whole set or a single member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Collection,
    Member,
}

impl Action {
    /// All actions in table order.
    pub const ALL: [Action; 7] = [
        Action::Index,
        Action::New,
        Action::Create,
        Action::Show,
        Action::Edit,
        Action::Update,
        Action::Destroy,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Action::Index => "index",
            Action::New => "new",
            Action::Create => "create",
            Action::Show => "show",
            Action::Edit => "edit",
            Action::Update => "update",
            Action::Destroy => "destroy",
        }
    }

    pub fn method(self) -> Method {
        match self {
            Action::Index | Action::New | Action::Show | Action::Edit => Method::GET,
            Action::Create => Method::POST,
            Action::Update => Method::PUT,
            Action::Destroy => Method::DELETE,
        }
    }

    pub fn scope(self) -> Scope {
        match self {
            Action::Index | Action::New | Action::Create => Scope::Collection,
            Action::Show | Action::Edit | Action::Update | Action::Destroy => Scope::Member,
        }
    }

    /// Path shape relative to the resource base, with `id_param` substituted
    /// for the member segment.
    pub fn shape(self, id_param: &str) -> String {
        match self {
            Action::Index | Action::Create => "/".to_string(),
            Action::New => "/new".to_string(),
            Action::Show | Action::Update | Action::Destroy => format!("/:{}", id_param),
            Action::Edit => format!("/:{}/edit", id_param),
        }
    }

    /// Parse an action name as used in route listings.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.name() == name)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
