//! Exact-path affinity with round-robin fallback.

use std::sync::Arc;

use crate::load_balancer::{round_robin::RoundRobin, worker::Worker, Selection, Selector};

/// Routes a path to the first live worker that lists it, otherwise rotates.
#[derive(Debug, Default)]
pub struct PathAffinity {
    fallback: RoundRobin,
    /// Also move the rotation cursor when affinity wins.
    advance_on_hit: bool,
}

impl PathAffinity {
    pub fn new(advance_on_hit: bool) -> Self {
        Self {
            fallback: RoundRobin::new(),
            advance_on_hit,
        }
    }

    pub fn fallback(&self) -> &RoundRobin {
        &self.fallback
    }

    fn find_assigned(path: &str, workers: &[Arc<Worker>]) -> Option<Arc<Worker>> {
        workers
            .iter()
            .find(|w| w.serves_path(path) && w.is_alive())
            .cloned()
    }
}

impl Selector for PathAffinity {
    fn select(&self, path: &str, workers: &[Arc<Worker>]) -> Selection {
        if let Some(worker) = Self::find_assigned(path, workers) {
            if self.advance_on_hit {
                self.fallback.cursor().advance(workers.len());
            }
            tracing::trace!(path = %path, worker = %worker, "Path affinity hit");
            return Selection::Selected(worker);
        }

        self.fallback.select(path, workers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    /// W1, W2 (serves /orders), W3.
    fn workers() -> Vec<Arc<Worker>> {
        vec![
            Arc::new(Worker::new(Url::parse("http://127.0.0.1:8081/").unwrap())),
            Arc::new(Worker::with_paths(
                Url::parse("http://127.0.0.1:8082/").unwrap(),
                ["/orders"],
            )),
            Arc::new(Worker::new(Url::parse("http://127.0.0.1:8083/").unwrap())),
        ]
    }

    fn port(selection: &Selection) -> u16 {
        selection.worker().expect("expected a worker").url().port().unwrap()
    }

    #[test]
    fn affinity_wins_regardless_of_cursor() {
        let lb = PathAffinity::new(false);
        let backends = workers();

        for i in 0..100 {
            assert_eq!(port(&lb.select("/orders", &backends)), 8082);
            // Interleaved traffic keeps rotating.
            let other = lb.select("/", &backends);
            assert_eq!(port(&other), [8081, 8082, 8083][i % 3]);
        }
    }

    #[test]
    fn affinity_hit_leaves_cursor_alone_by_default() {
        let lb = PathAffinity::new(false);
        let backends = workers();

        lb.select("/orders", &backends);
        lb.select("/orders", &backends);
        assert_eq!(lb.fallback().cursor().position(3), 0);
    }

    #[test]
    fn affinity_hit_can_advance_cursor() {
        let lb = PathAffinity::new(true);
        let backends = workers();

        lb.select("/orders", &backends);
        assert_eq!(lb.fallback().cursor().position(3), 1);
        assert_eq!(port(&lb.select("/", &backends)), 8082);
    }

    #[test]
    fn dead_owner_falls_back_to_rotation() {
        let lb = PathAffinity::new(false);
        let backends = workers();
        backends[1].set_alive(false);

        let picks: Vec<_> = (0..6)
            .filter_map(|_| lb.select("/orders", &backends).worker().map(|w| w.url().port().unwrap()))
            .collect();
        assert_eq!(picks, vec![8081, 8083, 8081, 8083]);
    }

    #[test]
    fn later_live_owner_is_used_when_first_is_dead() {
        let backends = vec![
            Arc::new(Worker::with_paths(Url::parse("http://127.0.0.1:8081/").unwrap(), ["/a"])),
            Arc::new(Worker::with_paths(Url::parse("http://127.0.0.1:8082/").unwrap(), ["/a"])),
        ];
        backends[0].set_alive(false);

        let lb = PathAffinity::new(false);
        assert_eq!(port(&lb.select("/a", &backends)), 8082);
    }

    #[test]
    fn unknown_path_rotates() {
        let lb = PathAffinity::new(false);
        let backends = workers();
        assert_eq!(port(&lb.select("/orders/1", &backends)), 8081);
        assert_eq!(port(&lb.select("/orders/1", &backends)), 8082);
    }
}
