//! Deferred one-shot events on the simulation clock
//!
//! Replaces free-running timers: every timed action is queued here and
//! drained by `tick`, so state only ever changes on a tick boundary.

use serde::{Deserialize, Serialize};

use super::powerup::TimedPowerup;

/// Something that happens at a fixed point on the sim clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledEvent {
    /// Undo a timed power-up
    Revert(TimedPowerup),
    /// Shift the brick grid down one row
    Descent,
    /// End the level-complete celebration and load the next level
    FinishLevelTransition,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Entry {
    due_ms: f64,
    event: ScheduledEvent,
}

/// Pending events, fired in due order (ties fire in scheduling order)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scheduler {
    entries: Vec<Entry>,
}

impl Scheduler {
    pub fn schedule(&mut self, due_ms: f64, event: ScheduledEvent) {
        self.entries.push(Entry { due_ms, event });
    }

    /// Drop every pending copy of `event`. Returns true if anything was removed.
    pub fn cancel(&mut self, event: ScheduledEvent) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.event != event);
        self.entries.len() != before
    }

    pub fn cancel_where(&mut self, mut predicate: impl FnMut(ScheduledEvent) -> bool) {
        self.entries.retain(|e| !predicate(e.event));
    }

    pub fn is_pending(&self, event: ScheduledEvent) -> bool {
        self.entries.iter().any(|e| e.event == event)
    }

    /// Earliest deadline for `event`, if pending
    pub fn due_at(&self, event: ScheduledEvent) -> Option<f64> {
        self.entries
            .iter()
            .filter(|e| e.event == event)
            .map(|e| e.due_ms)
            .min_by(f64::total_cmp)
    }

    /// Remove and return the earliest event due at or before `now_ms`
    pub fn pop_due(&mut self, now_ms: f64) -> Option<ScheduledEvent> {
        let mut best: Option<usize> = None;
        for (i, entry) in self.entries.iter().enumerate() {
            if entry.due_ms > now_ms {
                continue;
            }
            match best {
                Some(b) if self.entries[b].due_ms <= entry.due_ms => {}
                _ => best = Some(i),
            }
        }
        best.map(|i| self.entries.remove(i).event)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_due_in_order() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(300.0, ScheduledEvent::Descent);
        scheduler.schedule(100.0, ScheduledEvent::Revert(TimedPowerup::Magnetic));
        scheduler.schedule(100.0, ScheduledEvent::Revert(TimedPowerup::FireBall));

        assert_eq!(scheduler.pop_due(50.0), None);
        assert_eq!(
            scheduler.pop_due(200.0),
            Some(ScheduledEvent::Revert(TimedPowerup::Magnetic))
        );
        assert_eq!(
            scheduler.pop_due(200.0),
            Some(ScheduledEvent::Revert(TimedPowerup::FireBall))
        );
        assert_eq!(scheduler.pop_due(200.0), None);
        assert_eq!(scheduler.pop_due(300.0), Some(ScheduledEvent::Descent));
        assert!(scheduler.is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(10.0, ScheduledEvent::Descent);
        scheduler.schedule(20.0, ScheduledEvent::FinishLevelTransition);
        assert!(scheduler.cancel(ScheduledEvent::Descent));
        assert!(!scheduler.cancel(ScheduledEvent::Descent));
        assert!(!scheduler.is_pending(ScheduledEvent::Descent));
        assert_eq!(scheduler.due_at(ScheduledEvent::FinishLevelTransition), Some(20.0));
        assert_eq!(scheduler.len(), 1);
    }

    #[test]
    fn test_cancel_where() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(10.0, ScheduledEvent::Revert(TimedPowerup::MegaBall));
        scheduler.schedule(10.0, ScheduledEvent::Revert(TimedPowerup::LongPaddle));
        scheduler.schedule(10.0, ScheduledEvent::Descent);
        scheduler.cancel_where(|e| matches!(e, ScheduledEvent::Revert(_)));
        assert_eq!(scheduler.len(), 1);
        assert!(scheduler.is_pending(ScheduledEvent::Descent));
    }
}
