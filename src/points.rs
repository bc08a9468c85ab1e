// Candidate-detection highlights with a two-generation decay.
// Visual: a point the decoder reports shows as a big dot for one frame, a small
// faded dot the next frame, then disappears.
//
// The decoder reports from its own thread, so new points go into a mutex-guarded
// pending set. The draw thread drains that set in one swap at rotation time; the
// lock is never held while drawing.

use crate::types::ResultPoint;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

type PointSet = HashSet<ResultPoint>;

/// Cheap, cloneable handle producers use to report candidate points.
#[derive(Clone, Default)]
pub struct PointSink {
    pending: Arc<Mutex<PointSet>>,
}

impl PointSink {
    pub fn add_point(&self, point: ResultPoint) {
        lock(&self.pending).insert(point);
    }

    /// Points reported since the last rotation.
    pub fn pending_len(&self) -> usize {
        lock(&self.pending).len()
    }

    fn drain(&self) -> PointSet {
        std::mem::take(&mut *lock(&self.pending))
    }
}

// A poisoned lock only means a producer panicked mid-insert; the set is still usable.
fn lock(set: &Mutex<PointSet>) -> MutexGuard<'_, PointSet> {
    set.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Owns the generations shown on screen; lives on the draw thread.
#[derive(Default)]
pub struct ResultPointTracker {
    sink: PointSink,
    /// Shown at full emphasis this frame.
    current: PointSet,
    /// Shown at reduced emphasis this frame.
    previous: PointSet,
}

impl ResultPointTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle for other threads to feed points in.
    pub fn sink(&self) -> PointSink {
        self.sink.clone()
    }

    pub fn add_point(&self, point: ResultPoint) {
        self.sink.add_point(point);
    }

    /// Advance one frame. Called once per drawn frame, before reading the sets.
    ///
    /// If nothing was reported since the last frame, both generations are
    /// dropped at once; otherwise the fresh points become `current` and the old
    /// `current` becomes `previous`.
    pub fn rotate(&mut self) {
        let fresh = self.sink.drain();
        if fresh.is_empty() {
            self.current.clear();
            self.previous.clear();
        } else {
            self.previous = std::mem::replace(&mut self.current, fresh);
        }
    }

    pub fn current(&self) -> impl Iterator<Item = &ResultPoint> {
        self.current.iter()
    }

    pub fn previous(&self) -> impl Iterator<Item = &ResultPoint> {
        self.previous.iter()
    }

    pub fn pending_len(&self) -> usize {
        self.sink.pending_len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn p(x: f32) -> ResultPoint {
        ResultPoint::new(x, x)
    }

    fn sorted(iter: impl Iterator<Item = ResultPoint>) -> Vec<f32> {
        let mut xs: Vec<f32> = iter.map(|pt| pt.x).collect();
        xs.sort_by(|a, b| a.total_cmp(b));
        xs
    }

    #[test]
    fn points_show_full_then_reduced_then_vanish() {
        let mut tracker = ResultPointTracker::new();
        tracker.add_point(p(1.0));
        tracker.rotate();
        assert_eq!(sorted(tracker.current().copied()), vec![1.0]);
        assert_eq!(tracker.previous().count(), 0);

        tracker.add_point(p(2.0));
        tracker.rotate();
        assert_eq!(sorted(tracker.current().copied()), vec![2.0]);
        assert_eq!(sorted(tracker.previous().copied()), vec![1.0]);

        tracker.add_point(p(3.0));
        tracker.rotate();
        assert_eq!(sorted(tracker.current().copied()), vec![3.0]);
        assert_eq!(sorted(tracker.previous().copied()), vec![2.0]);
    }

    #[test]
    fn empty_interval_drops_the_previous_generation() {
        let mut tracker = ResultPointTracker::new();
        tracker.add_point(p(1.0));
        tracker.add_point(p(2.0));
        tracker.rotate();
        assert_eq!(tracker.pending_len(), 0);
        assert_eq!(tracker.current().count(), 2);

        tracker.rotate();
        assert_eq!(tracker.current().count(), 0);
        assert_eq!(tracker.previous().count(), 0);
    }

    #[test]
    fn points_after_an_empty_frame_start_a_fresh_chain() {
        let mut tracker = ResultPointTracker::new();
        tracker.add_point(p(1.0));
        tracker.rotate();
        tracker.rotate();
        tracker.add_point(p(5.0));
        tracker.rotate();
        assert_eq!(sorted(tracker.current().copied()), vec![5.0]);
        assert_eq!(tracker.previous().count(), 0);
    }

    #[test]
    fn concurrent_reports_land_in_exactly_one_generation() {
        const PRODUCERS: usize = 4;
        const PER_PRODUCER: usize = 500;

        let mut tracker = ResultPointTracker::new();
        let handles: Vec<_> = (0..PRODUCERS)
            .map(|id| {
                let sink = tracker.sink();
                thread::spawn(move || {
                    for i in 0..PER_PRODUCER {
                        sink.add_point(p((id * PER_PRODUCER + i) as f32));
                        if i % 50 == 0 {
                            thread::yield_now();
                        }
                    }
                })
            })
            .collect();

        let mut seen_current = Vec::new();
        let mut last_current: Vec<ResultPoint> = Vec::new();
        let mut producers_done = false;
        loop {
            tracker.rotate();
            let current: Vec<ResultPoint> = tracker.current().copied().collect();
            let previous: Vec<ResultPoint> = tracker.previous().copied().collect();
            if !current.is_empty() {
                // The reduced generation is always exactly the last full one.
                assert_eq!(sorted(previous.into_iter()), sorted(last_current.iter().copied()));
            } else {
                assert!(previous.is_empty());
            }
            seen_current.extend(current.iter().copied());
            last_current = current;

            if producers_done && tracker.pending_len() == 0 {
                break;
            }
            producers_done = handles.iter().all(|h| h.is_finished());
        }
        for handle in handles {
            handle.join().unwrap();
        }
        tracker.rotate();
        seen_current.extend(tracker.current().copied());

        let expected: Vec<f32> = (0..PRODUCERS * PER_PRODUCER).map(|v| v as f32).collect();
        assert_eq!(sorted(seen_current.into_iter()), expected);
    }
}
