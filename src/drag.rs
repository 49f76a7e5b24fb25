//! Per-container drag/resize state machine.
//!
//! Grid and flex containers drive the same three-phase lifecycle; only the
//! payload differs. Transitions go through [`DragPhase::next`] so that a move
//! or stop arriving without a start is rejected instead of dereferencing
//! state that was never captured.

use crate::error::{LayoutError, LayoutResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragPhase {
    #[default]
    Idle,
    Dragging,
    Settling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragSignal {
    Start,
    Move,
    Stop,
    Cancel,
    Settled,
}

impl DragPhase {
    pub fn next(self, signal: DragSignal) -> LayoutResult<DragPhase> {
        use DragPhase::*;
        use DragSignal::*;
        match (self, signal) {
            (Idle, Start) => Ok(Dragging),
            (Dragging, Move) => Ok(Dragging),
            (Dragging, Stop) | (Dragging, Cancel) => Ok(Settling),
            (Settling, Settled) => Ok(Idle),
            (from, signal) => Err(LayoutError::IllegalTransition { from, signal }),
        }
    }

    pub fn is_active(self) -> bool {
        self == DragPhase::Dragging
    }
}

/// A drag lifecycle together with the snapshot captured when it started.
///
/// `S` is whatever the container needs to restore or finalize the gesture:
/// the pre-drag layout and item for a grid, the baseline order and bounds for
/// a flex row.
#[derive(Debug, Clone)]
pub struct DragMachine<S> {
    phase: DragPhase,
    snapshot: Option<S>,
}

impl<S> Default for DragMachine<S> {
    fn default() -> Self {
        Self {
            phase: DragPhase::Idle,
            snapshot: None,
        }
    }
}

impl<S> DragMachine<S> {
    pub fn phase(&self) -> DragPhase {
        self.phase
    }

    pub fn is_idle(&self) -> bool {
        self.phase == DragPhase::Idle
    }

    pub fn is_dragging(&self) -> bool {
        self.phase.is_active()
    }

    pub fn start(&mut self, snapshot: S) -> LayoutResult<()> {
        self.phase = self.phase.next(DragSignal::Start)?;
        self.snapshot = Some(snapshot);
        Ok(())
    }

    /// Snapshot of the running gesture, if one is running.
    pub fn on_move(&mut self) -> LayoutResult<&mut S> {
        self.phase = self.phase.next(DragSignal::Move)?;
        self.snapshot.as_mut().ok_or(LayoutError::IllegalTransition {
            from: self.phase,
            signal: DragSignal::Move,
        })
    }

    pub fn snapshot(&self) -> Option<&S> {
        self.snapshot.as_ref()
    }

    /// Moves to settling and hands back the snapshot for commit.
    pub fn stop(&mut self) -> LayoutResult<S> {
        self.finish(DragSignal::Stop)
    }

    /// Moves to settling and hands back the snapshot for restore.
    pub fn cancel(&mut self) -> LayoutResult<S> {
        self.finish(DragSignal::Cancel)
    }

    pub fn settle(&mut self) -> LayoutResult<()> {
        self.phase = self.phase.next(DragSignal::Settled)?;
        Ok(())
    }

    /// Drops any running gesture without going through the transition table.
    pub fn reset(&mut self) {
        self.phase = DragPhase::Idle;
        self.snapshot = None;
    }

    fn finish(&mut self, signal: DragSignal) -> LayoutResult<S> {
        let next = self.phase.next(signal)?;
        let snapshot = self
            .snapshot
            .take()
            .ok_or(LayoutError::IllegalTransition {
                from: self.phase,
                signal,
            })?;
        self.phase = next;
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_cycle_returns_to_idle() {
        let mut machine = DragMachine::default();
        machine.start(7u32).unwrap();
        assert!(machine.is_dragging());
        *machine.on_move().unwrap() += 1;
        assert_eq!(machine.stop().unwrap(), 8);
        assert_eq!(machine.phase(), DragPhase::Settling);
        machine.settle().unwrap();
        assert!(machine.is_idle());
        assert!(machine.snapshot().is_none());
    }

    #[test]
    fn move_before_start_is_rejected() {
        let mut machine: DragMachine<()> = DragMachine::default();
        assert_eq!(
            machine.on_move().unwrap_err(),
            LayoutError::IllegalTransition {
                from: DragPhase::Idle,
                signal: DragSignal::Move
            }
        );
        assert!(machine.is_idle());
    }

    #[test]
    fn second_start_is_rejected_while_dragging() {
        let mut machine = DragMachine::default();
        machine.start(1).unwrap();
        assert!(machine.start(2).is_err());
        assert_eq!(machine.snapshot(), Some(&1));
    }

    #[test]
    fn settled_only_after_stop_or_cancel() {
        assert!(DragPhase::Idle.next(DragSignal::Settled).is_err());
        assert!(DragPhase::Dragging.next(DragSignal::Settled).is_err());
        assert_eq!(
            DragPhase::Dragging.next(DragSignal::Cancel),
            Ok(DragPhase::Settling)
        );
        assert!(DragPhase::Settling.next(DragSignal::Start).is_err());
    }
}
