//! Fractional progress published on a watch channel.
//!
//! A tracker owns one slot per file; the published value is the mean of all
//! slots, so a batch reports a single overall fraction.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;

struct Tracker {
  slots: Mutex<Vec<f64>>,
  tx:    watch::Sender<f64>,
}

/// Reporting handle for one slot of a tracker. Cheap to clone.
#[derive(Clone)]
pub struct Progress {
  tracker: Arc<Tracker>,
  slot:    usize,
}

impl Progress {
  /// A tracker with `slots` slots, the per-slot handles and the receiver for
  /// the overall fraction.
  pub fn tracker(slots: usize) -> (Vec<Progress>, watch::Receiver<f64>) {
    let (tx, rx) = watch::channel(0.0);
    let tracker = Arc::new(Tracker { slots: Mutex::new(vec![0.0; slots]), tx });
    let handles = (0..slots)
      .map(|slot| Progress { tracker: tracker.clone(), slot })
      .collect();
    (handles, rx)
  }

  /// A handle nobody listens to.
  pub fn detached() -> Self {
    let (mut handles, _rx) = Self::tracker(1);
    handles.remove(0)
  }

  /// Record `fraction` (clamped to `[0, 1]`) for this slot.
  pub fn report(&self, fraction: f64) {
    let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
    let mut slots = self.tracker.slots.lock().unwrap_or_else(PoisonError::into_inner);
    slots[self.slot] = fraction;
    let mean = slots.iter().sum::<f64>() / slots.len() as f64;
    self.tracker.tx.send_replace(mean);
  }

  pub fn report_bytes(&self, done: usize, total: usize) {
    if total == 0 {
      self.report(1.0);
    } else {
      self.report(done as f64 / total as f64);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::Progress;

  #[test]
  fn mean_of_slots() {
    let (handles, rx) = Progress::tracker(2);
    handles[0].report(1.0);
    assert_eq!(*rx.borrow(), 0.5);
    handles[1].report_bytes(1, 4);
    assert_eq!(*rx.borrow(), 0.625);
  }

  #[test]
  fn clamps() {
    let (handles, rx) = Progress::tracker(1);
    handles[0].report(7.0);
    assert_eq!(*rx.borrow(), 1.0);
    handles[0].report(f64::NAN);
    assert_eq!(*rx.borrow(), 0.0);
  }

  #[test]
  fn empty_total_is_complete() {
    let (handles, rx) = Progress::tracker(1);
    handles[0].report_bytes(0, 0);
    assert_eq!(*rx.borrow(), 1.0);
  }
}
