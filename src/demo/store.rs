//! In-memory message board store.
//!
//! Users own forums, forums hold threads. Records are cloned out of the
//! maps; handlers never hold a map guard across an await.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Forum {
    pub id: u64,
    pub user_id: u64,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Thread {
    pub id: u64,
    pub forum_id: u64,
    pub title: String,
    pub locked: bool,
}

/// Body of create / update requests.
#[derive(Debug, Clone, Deserialize)]
pub struct TitleForm {
    pub title: String,
}

/// Shared, cheaply cloneable store.
#[derive(Clone, Default)]
pub struct Board {
    users: Arc<DashMap<u64, User>>,
    forums: Arc<DashMap<u64, Forum>>,
    threads: Arc<DashMap<u64, Thread>>,
    next_id: Arc<AtomicU64>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// A board with one user, one forum and two threads.
    pub fn seeded() -> Self {
        let board = Self::new();
        let tj = board.add_user("tj");
        let ferrets = board.add_forum(tj.id, "Ferrets");
        board.add_thread(ferrets.id, "Tobi rules");
        board.add_thread(ferrets.id, "Loki is better");
        board
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn add_user(&self, name: &str) -> User {
        let user = User {
            id: self.next_id(),
            name: name.to_string(),
        };
        self.users.insert(user.id, user.clone());
        user
    }

    pub fn add_forum(&self, user_id: u64, title: &str) -> Forum {
        let forum = Forum {
            id: self.next_id(),
            user_id,
            title: title.to_string(),
        };
        self.forums.insert(forum.id, forum.clone());
        forum
    }

    pub fn add_thread(&self, forum_id: u64, title: &str) -> Thread {
        let thread = Thread {
            id: self.next_id(),
            forum_id,
            title: title.to_string(),
            locked: false,
        };
        self.threads.insert(thread.id, thread.clone());
        thread
    }

    pub fn user(&self, id: u64) -> Option<User> {
        self.users.get(&id).map(|u| u.value().clone())
    }

    pub fn users(&self) -> Vec<User> {
        sorted(self.users.iter().map(|u| u.value().clone()).collect(), |u| u.id)
    }

    /// The forum `id`, if owned by `user_id`.
    pub fn forum_of(&self, user_id: u64, id: u64) -> Option<Forum> {
        self.forums
            .get(&id)
            .filter(|f| f.user_id == user_id)
            .map(|f| f.value().clone())
    }

    pub fn forums_of(&self, user_id: u64) -> Vec<Forum> {
        let forums = self
            .forums
            .iter()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.value().clone())
            .collect();
        sorted(forums, |f| f.id)
    }

    pub fn rename_forum(&self, id: u64, title: &str) -> Option<Forum> {
        self.forums.get_mut(&id).map(|mut f| {
            f.title = title.to_string();
            f.value().clone()
        })
    }

    /// Remove a forum and its threads.
    pub fn remove_forum(&self, id: u64) -> bool {
        self.threads.retain(|_, t| t.forum_id != id);
        self.forums.remove(&id).is_some()
    }

    /// The thread `id`, if it belongs to `forum_id`.
    pub fn thread_of(&self, forum_id: u64, id: u64) -> Option<Thread> {
        self.threads
            .get(&id)
            .filter(|t| t.forum_id == forum_id)
            .map(|t| t.value().clone())
    }

    pub fn threads_of(&self, forum_id: u64) -> Vec<Thread> {
        let threads = self
            .threads
            .iter()
            .filter(|t| t.forum_id == forum_id)
            .map(|t| t.value().clone())
            .collect();
        sorted(threads, |t| t.id)
    }

    pub fn lock_thread(&self, id: u64) -> Option<Thread> {
        self.threads.get_mut(&id).map(|mut t| {
            t.locked = true;
            t.value().clone()
        })
    }

    pub fn remove_thread(&self, id: u64) -> bool {
        self.threads.remove(&id).is_some()
    }
}

fn sorted<T>(mut items: Vec<T>, key: impl Fn(&T) -> u64) -> Vec<T> {
    items.sort_by_key(|item| key(item));
    items
}
