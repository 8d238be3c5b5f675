//! Worker abstraction.
//!
//! # Responsibilities
//! - Represent a single backend worker identified by its base URL
//! - Hold the exact paths the worker serves in path-affinity mode
//! - Track liveness (Alive/Dead) in a lock-free flag

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use url::Url;

/// Liveness of a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Alive,
    Dead,
}

impl From<bool> for Liveness {
    fn from(alive: bool) -> Self {
        if alive {
            Liveness::Alive
        } else {
            Liveness::Dead
        }
    }
}

impl std::fmt::Display for Liveness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Liveness::Alive => write!(f, "alive"),
            Liveness::Dead => write!(f, "dead"),
        }
    }
}

/// Outcome of a liveness write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Liveness,
    pub to: Liveness,
}

impl Transition {
    /// True when the write changed the worker's state.
    pub fn changed(&self) -> bool {
        self.from != self.to
    }
}

/// A single backend worker.
#[derive(Debug)]
pub struct Worker {
    /// Base URL requests are forwarded to.
    url: Url,
    /// Exact paths assigned to this worker.
    paths: HashSet<String>,
    /// Optimistically true until the first failed probe or forward.
    alive: AtomicBool,
}

impl Worker {
    /// Create a new worker. Workers start alive.
    pub fn new(url: Url) -> Self {
        Self::with_paths(url, std::iter::empty::<String>())
    }

    /// Create a worker that serves the given exact paths.
    pub fn with_paths<I, S>(url: Url, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            url,
            paths: paths.into_iter().map(Into::into).collect(),
            alive: AtomicBool::new(true),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Whether `path` is one of this worker's exact affinity paths.
    pub fn serves_path(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn paths(&self) -> &HashSet<String> {
        &self.paths
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    pub fn liveness(&self) -> Liveness {
        Liveness::from(self.is_alive())
    }

    /// Store a new liveness value, returning the transition that happened.
    pub fn set_alive(&self, alive: bool) -> Transition {
        let previous = self.alive.swap(alive, Ordering::AcqRel);
        Transition {
            from: previous.into(),
            to: alive.into(),
        }
    }

    /// Move `Alive → Dead`. Never revives a worker.
    ///
    /// Returns true if this call performed the transition.
    pub fn mark_dead(&self) -> bool {
        self.alive
            .compare_exchange(true, false, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }
}

impl std::fmt::Display for Worker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.url)
    }
}
