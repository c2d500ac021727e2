#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure photosynthesis trigger system.
//!
//! The trigger re-evaluates the firing precondition whenever an event that
//! could change its inputs arrives, and emits at most one
//! [`Command::ProduceGlucose`] per production cycle. The cycle's settle point
//! belongs to the caller: an adapter presents the firing, lets its animation
//! window elapse, and only then calls [`Trigger::settle`] to arm the next
//! evaluation.

use greenhouse_core::{Command, Event, SessionSnapshot};

/// Photosynthesis trigger that gates production cycles behind an active latch.
#[derive(Debug, Default)]
pub struct Trigger {
    active: bool,
}

impl Trigger {
    /// Creates a new trigger with no production cycle pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports whether a production cycle is pending settlement.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Consumes world events and the current snapshot to request production.
    ///
    /// Emits at most one `Command::ProduceGlucose` per call, and none while a
    /// previous firing awaits [`Trigger::settle`].
    pub fn handle(&mut self, events: &[Event], snapshot: &SessionSnapshot, out: &mut Vec<Command>) {
        let mut relevant = false;

        for event in events {
            match event {
                Event::MoleculeCollected { .. } | Event::DaylightChanged { .. } => {
                    relevant = true;
                }
                Event::SessionReset => {
                    self.active = false;
                    relevant = true;
                }
                _ => {}
            }
        }

        if !relevant || self.active {
            return;
        }

        let can_fire = snapshot.water_collected > 0
            && snapshot.co2_collected > 0
            && snapshot.daytime
            && snapshot.glucose_produced < snapshot.glucose_target;
        if !can_fire {
            return;
        }

        self.active = true;
        out.push(Command::ProduceGlucose);
    }

    /// Marks the pending production cycle as complete, arming re-evaluation.
    pub fn settle(&mut self) {
        self.active = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use greenhouse_core::{HourOfDay, MoleculeKind, SessionSnapshot};

    fn snapshot(water: u32, co2: u32, hour: u8, produced: u32) -> SessionSnapshot {
        let hour = HourOfDay::new(hour);
        SessionSnapshot {
            hour,
            daytime: hour.is_daytime(),
            water_collected: water,
            co2_collected: co2,
            water_capacity: 6,
            co2_capacity: 6,
            glucose_produced: produced,
            glucose_target: 3,
            complete: produced >= 3,
        }
    }

    const COLLECTED: Event = Event::MoleculeCollected {
        kind: MoleculeKind::Water,
    };

    #[test]
    fn irrelevant_events_never_evaluate() {
        let mut trigger = Trigger::new();
        let mut out = Vec::new();

        trigger.handle(
            &[Event::DropRejected {
                kind: MoleculeKind::Co2,
            }],
            &snapshot(3, 3, 12, 0),
            &mut out,
        );

        assert!(out.is_empty());
        assert!(!trigger.is_active());
    }

    #[test]
    fn night_collections_never_fire() {
        let mut trigger = Trigger::new();
        let mut out = Vec::new();

        trigger.handle(&[COLLECTED], &snapshot(3, 3, 22, 0), &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn firing_latches_until_settled() {
        let mut trigger = Trigger::new();
        let mut out = Vec::new();

        trigger.handle(&[COLLECTED], &snapshot(2, 2, 12, 0), &mut out);
        assert_eq!(out, vec![Command::ProduceGlucose]);
        assert!(trigger.is_active());

        trigger.handle(&[COLLECTED], &snapshot(3, 2, 12, 1), &mut out);
        assert_eq!(out.len(), 1, "latched trigger stays silent");

        trigger.settle();
        trigger.handle(&[COLLECTED], &snapshot(3, 2, 12, 1), &mut out);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn completed_sessions_never_fire() {
        let mut trigger = Trigger::new();
        let mut out = Vec::new();

        trigger.handle(&[COLLECTED], &snapshot(4, 4, 12, 3), &mut out);

        assert!(out.is_empty());
    }

    #[test]
    fn session_reset_clears_the_latch() {
        let mut trigger = Trigger::new();
        let mut out = Vec::new();

        trigger.handle(&[COLLECTED], &snapshot(1, 1, 12, 0), &mut out);
        assert!(trigger.is_active());

        trigger.handle(&[Event::SessionReset], &snapshot(0, 0, 22, 0), &mut out);
        assert!(!trigger.is_active());
        assert_eq!(out.len(), 1, "reset snapshot has nothing to fire");
    }
}
