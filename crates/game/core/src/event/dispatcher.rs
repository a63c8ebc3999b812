//! Priority-ordered listener registry keyed by event kind.

use std::collections::HashMap;

use super::{EventContext, GameEventKind};
use crate::ability::{AbilityFault, AbilityKind, AbilityRef, same_instance};
use crate::error::{ErrorSeverity, GameError};

#[derive(Clone, Debug)]
struct ListenerEntry {
    priority: i32,
    ability: AbilityRef,
}

/// Routes events to subscribed abilities.
///
/// Listeners for one kind run in ascending priority; ties keep subscription
/// order. A dispatch stops before the next listener once the context is
/// cancelled, and aborts on the first [`AbilityFault`].
#[derive(Clone, Debug, Default)]
pub struct EventDispatcher {
    listeners: HashMap<GameEventKind, Vec<ListenerEntry>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `ability` to the listeners of `kind`.
    pub fn subscribe(&mut self, kind: GameEventKind, ability: AbilityRef, priority: i32) {
        let entries = self.listeners.entry(kind).or_default();
        entries.push(ListenerEntry { priority, ability });
        // Stable: equal priorities keep subscription order
        entries.sort_by_key(|entry| entry.priority);
    }

    /// Subscribes `ability` to each of its triggers at its own priority.
    pub fn subscribe_ability(&mut self, ability: &AbilityRef) {
        for &kind in ability.triggers() {
            self.subscribe(kind, ability.clone(), ability.priority());
        }
    }

    /// Removes every entry of `kind` that is this exact instance.
    ///
    /// Returns `true` if anything was removed.
    pub fn unsubscribe(&mut self, kind: GameEventKind, ability: &AbilityRef) -> bool {
        let Some(entries) = self.listeners.get_mut(&kind) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|entry| !same_instance(&entry.ability, ability));
        let removed = entries.len() != before;
        if entries.is_empty() {
            self.listeners.remove(&kind);
        }
        removed
    }

    /// Removes this exact instance from every kind.
    pub fn unsubscribe_all(&mut self, ability: &AbilityRef) -> bool {
        let kinds: Vec<_> = self.listeners.keys().copied().collect();
        let mut removed = false;
        for kind in kinds {
            removed |= self.unsubscribe(kind, ability);
        }
        removed
    }

    pub fn listener_count(&self, kind: GameEventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }

    /// `(priority, kind)` of each listener of `kind`, in dispatch order.
    pub fn listeners(&self, kind: GameEventKind) -> impl Iterator<Item = (i32, &AbilityKind)> {
        self.listeners
            .get(&kind)
            .into_iter()
            .flatten()
            .map(|entry| (entry.priority, entry.ability.kind()))
    }

    /// Invokes the listeners of `kind` in order against `ctx`.
    ///
    /// A listener that cancels the context still completes; the ones after it
    /// are skipped. A fault skips the rest and is returned.
    pub fn dispatch(
        &self,
        kind: GameEventKind,
        ctx: &mut EventContext<'_>,
    ) -> Result<(), DispatchError> {
        debug_assert_eq!(kind, ctx.kind(), "context built for a different event");

        let Some(entries) = self.listeners.get(&kind) else {
            return Ok(());
        };

        for entry in entries {
            if ctx.is_cancelled() {
                tracing::trace!(event = %kind, "dispatch cancelled");
                break;
            }

            tracing::trace!(
                event = %kind,
                ability = %entry.ability.kind(),
                priority = entry.priority,
                "invoking listener"
            );

            entry
                .ability
                .on_trigger(ctx)
                .map_err(|fault| DispatchError {
                    event: kind,
                    ability: entry.ability.kind().clone(),
                    fault,
                })?;
        }

        Ok(())
    }
}

/// An ability handler failed during dispatch.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("ability {ability} failed during {event}: {fault}")]
pub struct DispatchError {
    pub event: GameEventKind,
    pub ability: AbilityKind,
    #[source]
    pub fault: AbilityFault,
}

impl GameError for DispatchError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        "DISPATCH_ABILITY_FAULT"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::ability::Ability;
    use crate::state::Board;

    /// Records its label into a shared log; optionally cancels or faults.
    #[derive(Debug)]
    struct Recorder {
        kind: AbilityKind,
        label: &'static str,
        log: Arc<Mutex<Vec<&'static str>>>,
        cancel: bool,
        fault: bool,
    }

    impl Recorder {
        fn new(label: &'static str, log: &Arc<Mutex<Vec<&'static str>>>) -> Self {
            Self {
                kind: AbilityKind::Custom(label.to_owned()),
                label,
                log: log.clone(),
                cancel: false,
                fault: false,
            }
        }
    }

    impl Ability for Recorder {
        fn kind(&self) -> &AbilityKind {
            &self.kind
        }

        fn triggers(&self) -> &[GameEventKind] {
            &[GameEventKind::MoveValidate]
        }

        fn on_trigger(&self, ctx: &mut EventContext<'_>) -> Result<(), AbilityFault> {
            self.log.lock().unwrap().push(self.label);
            if self.cancel {
                ctx.cancel();
            }
            if self.fault {
                return Err(AbilityFault::new("recorder fault"));
            }
            Ok(())
        }
    }

    fn log() -> Arc<Mutex<Vec<&'static str>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    fn run(dispatcher: &EventDispatcher) -> (Result<(), DispatchError>, bool) {
        let board = Board::new(8, 8);
        let mut ctx = EventContext::new(GameEventKind::MoveValidate, &board);
        let result = dispatcher.dispatch(GameEventKind::MoveValidate, &mut ctx);
        (result, ctx.is_cancelled())
    }

    #[test]
    fn ascending_priority_with_stable_ties() {
        let log = log();
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(GameEventKind::MoveValidate, Arc::new(Recorder::new("p10", &log)), 10);
        dispatcher.subscribe(GameEventKind::MoveValidate, Arc::new(Recorder::new("p5a", &log)), 5);
        dispatcher.subscribe(GameEventKind::MoveValidate, Arc::new(Recorder::new("p5b", &log)), 5);

        let (result, _) = run(&dispatcher);
        result.unwrap();
        assert_eq!(*log.lock().unwrap(), vec!["p5a", "p5b", "p10"]);

        let order: Vec<_> = dispatcher
            .listeners(GameEventKind::MoveValidate)
            .map(|(priority, _)| priority)
            .collect();
        assert_eq!(order, vec![5, 5, 10]);
    }

    #[test]
    fn cancellation_skips_later_listeners() {
        let log = log();
        let mut canceller = Recorder::new("second", &log);
        canceller.cancel = true;

        let mut dispatcher = EventDispatcher::new();
        let first = Arc::new(Recorder::new("first", &log));
        let third = Arc::new(Recorder::new("third", &log));
        dispatcher.subscribe(GameEventKind::MoveValidate, first, 1);
        dispatcher.subscribe(GameEventKind::MoveValidate, Arc::new(canceller), 2);
        dispatcher.subscribe(GameEventKind::MoveValidate, third, 3);

        let (result, cancelled) = run(&dispatcher);
        result.unwrap();
        assert!(cancelled);
        assert_eq!(*log.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn fault_aborts_dispatch() {
        let log = log();
        let mut faulty = Recorder::new("faulty", &log);
        faulty.fault = true;

        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(GameEventKind::MoveValidate, Arc::new(faulty), 0);
        let after = Arc::new(Recorder::new("after", &log));
        dispatcher.subscribe(GameEventKind::MoveValidate, after, 1);

        let (result, _) = run(&dispatcher);
        let err = result.unwrap_err();
        assert_eq!(err.ability, AbilityKind::Custom("faulty".into()));
        assert_eq!(err.event, GameEventKind::MoveValidate);
        assert_eq!(*log.lock().unwrap(), vec!["faulty"]);
    }

    #[test]
    fn unsubscribe_is_by_identity() {
        let log = log();
        let kept: AbilityRef = Arc::new(Recorder::new("same", &log));
        let dropped: AbilityRef = Arc::new(Recorder::new("same", &log));

        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe(GameEventKind::MoveValidate, kept.clone(), 0);
        dispatcher.subscribe(GameEventKind::MoveValidate, dropped.clone(), 0);
        dispatcher.subscribe(GameEventKind::Capture, dropped.clone(), 0);

        assert!(dispatcher.unsubscribe(GameEventKind::MoveValidate, &dropped));
        assert!(!dispatcher.unsubscribe(GameEventKind::MoveValidate, &dropped));
        assert_eq!(dispatcher.listener_count(GameEventKind::MoveValidate), 1);

        assert!(dispatcher.unsubscribe_all(&dropped));
        assert_eq!(dispatcher.listener_count(GameEventKind::Capture), 0);

        let (result, _) = run(&dispatcher);
        result.unwrap();
        assert_eq!(log.lock().unwrap().len(), 1);
    }

    #[test]
    fn subscribe_ability_uses_triggers_and_priority() {
        let jumping: AbilityRef = Arc::new(crate::ability::JumpingAbility::default());
        let mut dispatcher = EventDispatcher::new();
        dispatcher.subscribe_ability(&jumping);
        let listeners: Vec<_> = dispatcher.listeners(GameEventKind::MoveValidate).collect();
        assert_eq!(listeners, vec![(50, &AbilityKind::Jumping)]);
    }

    #[test]
    fn dispatch_without_listeners_is_a_no_op() {
        let (result, cancelled) = run(&EventDispatcher::new());
        assert!(result.is_ok());
        assert!(!cancelled);
    }
}
