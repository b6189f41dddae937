//! Effects collaborator interface
//!
//! The simulation never spawns visuals itself. It reports ignitions and burnouts
//! to a [`FireEffects`] sink and keeps only the opaque [`EffectHandle`] the sink
//! returned, so it can hand it back when the flame has to be torn down.

use crate::core_types::{ObjectId, Vec3};

/// Opaque handle to whatever the effects layer spawned for a burning cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EffectHandle(pub u64);

/// Receiver of ignite / extinguish events
pub trait FireEffects {
    /// A cell at `position` just caught fire
    fn on_ignite(&mut self, object: ObjectId, position: Vec3) -> EffectHandle;

    /// The cell that was given `handle` has burnt out
    fn on_extinguish(&mut self, object: ObjectId, position: Vec3, handle: EffectHandle);
}

/// No effects layer attached
impl FireEffects for () {
    fn on_ignite(&mut self, _object: ObjectId, _position: Vec3) -> EffectHandle {
        EffectHandle(0)
    }

    fn on_extinguish(&mut self, _object: ObjectId, _position: Vec3, _handle: EffectHandle) {}
}

/// Event reported to the effects layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FireEvent {
    Ignited {
        object: ObjectId,
        position: Vec3,
        handle: EffectHandle,
    },
    Extinguished {
        object: ObjectId,
        position: Vec3,
        handle: EffectHandle,
    },
}

impl FireEvent {
    pub fn position(&self) -> Vec3 {
        match self {
            FireEvent::Ignited { position, .. } | FireEvent::Extinguished { position, .. } => {
                *position
            }
        }
    }

    pub fn handle(&self) -> EffectHandle {
        match self {
            FireEvent::Ignited { handle, .. } | FireEvent::Extinguished { handle, .. } => *handle,
        }
    }
}

/// Effects sink that records every event and hands out sequential handles
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<FireEvent>,
    next_handle: u64,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[FireEvent] {
        &self.events
    }

    /// Take the recorded events, leaving the log empty
    pub fn drain(&mut self) -> Vec<FireEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn ignition_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, FireEvent::Ignited { .. }))
            .count()
    }

    pub fn extinguish_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, FireEvent::Extinguished { .. }))
            .count()
    }
}

impl FireEffects for EventLog {
    fn on_ignite(&mut self, object: ObjectId, position: Vec3) -> EffectHandle {
        self.next_handle += 1;
        let handle = EffectHandle(self.next_handle);
        self.events.push(FireEvent::Ignited {
            object,
            position,
            handle,
        });
        handle
    }

    fn on_extinguish(&mut self, object: ObjectId, position: Vec3, handle: EffectHandle) {
        self.events.push(FireEvent::Extinguished {
            object,
            position,
            handle,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_log_hands_out_distinct_handles() {
        let mut log = EventLog::new();
        let a = log.on_ignite(ObjectId(1), Vec3::zeros());
        let b = log.on_ignite(ObjectId(1), Vec3::new(1.0, 0.0, 0.0));
        assert_ne!(a, b);
        log.on_extinguish(ObjectId(1), Vec3::zeros(), a);

        assert_eq!(log.ignition_count(), 2);
        assert_eq!(log.extinguish_count(), 1);
        assert_eq!(log.events()[2].handle(), a);

        let drained = log.drain();
        assert_eq!(drained.len(), 3);
        assert!(log.events().is_empty());
    }
}
