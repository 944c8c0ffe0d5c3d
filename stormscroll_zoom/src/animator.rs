// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::fmt;
use std::time::Duration;

use stormscroll_geo::{GeoProjector, ZoomTransform};

use crate::easing::{EasingFn, ease_in_out_cubic};

/// Identifies one transition for event correlation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TransitionId(pub u64);

/// What happened to a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomEventKind {
    /// The transition began.
    Start,
    /// The transition was superseded or cancelled before completing.
    Interrupt,
    /// The transition reached its target.
    End,
}

/// A transition lifecycle event.
///
/// For every transition exactly one `Start` is followed by exactly one of
/// `Interrupt` or `End`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomEvent {
    /// The transition this event belongs to.
    pub id: TransitionId,
    /// Event kind.
    pub kind: ZoomEventKind,
    /// Transform in effect when the event was emitted.
    pub transform: ZoomTransform,
}

/// Errors from [`ZoomAnimator::start_transition`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ZoomError {
    /// Another transition is still running.
    Busy {
        /// The running transition.
        running: TransitionId,
    },
}

impl fmt::Display for ZoomError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy { running } => {
                write!(f, "zoom transition {} is still running", running.0)
            }
        }
    }
}

impl core::error::Error for ZoomError {}

/// Animator state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimatorPhase {
    /// No transition in flight.
    Idle,
    /// A transition is in flight.
    Transitioning,
}

#[derive(Clone, Copy, Debug)]
struct Transition {
    id: TransitionId,
    from: ZoomTransform,
    to: ZoomTransform,
    elapsed: Duration,
    duration: Duration,
}

impl Transition {
    fn raw_progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self, easing: EasingFn) -> ZoomTransform {
        self.from.lerp(&self.to, easing(self.raw_progress()))
    }
}

/// Drives timed, interruptible transitions of a map's zoom transform.
///
/// At most one transition is in flight. Time advances only through
/// [`ZoomAnimator::tick`], which the host calls once per animation frame with
/// the wall-clock time since the previous frame. Lifecycle events queue up and
/// are collected with [`ZoomAnimator::drain_events`].
///
/// ```rust
/// use std::time::Duration;
///
/// use kurbo::Size;
/// use stormscroll_geo::{GeoPoint, GeoProjector, ZoomTransform};
/// use stormscroll_zoom::{ZoomAnimator, ZoomEventKind};
///
/// let mut map = GeoProjector::new(Size::new(800.0, 500.0), GeoPoint::new(-82.0, 27.0), 1.3);
/// let mut zoom = ZoomAnimator::new();
///
/// let target = ZoomTransform::new(4.0, -1200.0, -750.0);
/// zoom.start_transition(map.transform(), target, Duration::from_millis(750)).unwrap();
/// while zoom.is_transitioning() {
///     zoom.tick(Duration::from_millis(16), &mut map);
/// }
///
/// assert_eq!(map.transform(), target);
/// let kinds: Vec<_> = zoom.drain_events().iter().map(|e| e.kind).collect();
/// assert_eq!(kinds, [ZoomEventKind::Start, ZoomEventKind::End]);
/// ```
#[derive(Clone, Debug)]
pub struct ZoomAnimator {
    easing: EasingFn,
    active: Option<Transition>,
    next_id: u64,
    events: Vec<ZoomEvent>,
}

impl Default for ZoomAnimator {
    fn default() -> Self {
        Self::new()
    }
}

impl ZoomAnimator {
    /// Creates an idle animator with cubic ease-in-out.
    #[must_use]
    pub fn new() -> Self {
        Self {
            easing: ease_in_out_cubic,
            active: None,
            next_id: 0,
            events: Vec::new(),
        }
    }

    /// Sets the easing curve used by later transitions.
    #[must_use]
    pub fn with_easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> AnimatorPhase {
        if self.active.is_some() {
            AnimatorPhase::Transitioning
        } else {
            AnimatorPhase::Idle
        }
    }

    /// Returns `true` while a transition is in flight.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.active.is_some()
    }

    /// The running transition, if any.
    #[must_use]
    pub fn active_id(&self) -> Option<TransitionId> {
        self.active.map(|t| t.id)
    }

    /// Target of the running transition, if any.
    #[must_use]
    pub fn target(&self) -> Option<ZoomTransform> {
        self.active.map(|t| t.to)
    }

    /// The in-flight transform of the running transition, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<ZoomTransform> {
        self.active.map(|t| t.value(self.easing))
    }

    /// Starts a transition from `from` to `to` lasting `duration`.
    ///
    /// Rejected with [`ZoomError::Busy`] while another transition is running;
    /// use [`ZoomAnimator::retarget`] or [`ZoomAnimator::cancel`] first to
    /// supersede it. Emits `Start` immediately.
    pub fn start_transition(
        &mut self,
        from: ZoomTransform,
        to: ZoomTransform,
        duration: Duration,
    ) -> Result<TransitionId, ZoomError> {
        if let Some(running) = self.active {
            return Err(ZoomError::Busy { running: running.id });
        }
        Ok(self.begin(from, to, duration))
    }

    /// Interrupts any running transition and starts a new one from wherever
    /// the map currently is.
    pub fn retarget(
        &mut self,
        projector: &mut GeoProjector,
        to: ZoomTransform,
        duration: Duration,
    ) -> TransitionId {
        self.cancel(projector);
        self.begin(projector.transform(), to, duration)
    }

    /// Cancels the running transition, leaving the map at its in-flight
    /// transform. Emits `Interrupt`. Returns `false` if nothing was running.
    pub fn cancel(&mut self, projector: &mut GeoProjector) -> bool {
        let Some(transition) = self.active.take() else {
            return false;
        };
        let snapshot = projector.apply_transform(transition.value(self.easing));
        tracing::debug!(id = transition.id.0, k = snapshot.k, "zoom transition interrupted");
        self.events.push(ZoomEvent {
            id: transition.id,
            kind: ZoomEventKind::Interrupt,
            transform: snapshot,
        });
        true
    }

    /// Advances the running transition by `dt` and applies the eased
    /// transform to `projector`.
    ///
    /// Returns `true` while the transition is still running afterwards.
    pub fn tick(&mut self, dt: Duration, projector: &mut GeoProjector) -> bool {
        let Some(transition) = self.active.as_mut() else {
            return false;
        };
        transition.elapsed = transition.elapsed.saturating_add(dt);
        if !transition.is_complete() {
            projector.apply_transform(transition.value(self.easing));
            return true;
        }
        let id = transition.id;
        let applied = projector.apply_transform(transition.to);
        self.active = None;
        tracing::debug!(id = id.0, k = applied.k, "zoom transition end");
        self.events.push(ZoomEvent {
            id,
            kind: ZoomEventKind::End,
            transform: applied,
        });
        false
    }

    /// Takes all queued events in emission order.
    pub fn drain_events(&mut self) -> Vec<ZoomEvent> {
        core::mem::take(&mut self.events)
    }

    /// Number of queued events.
    #[must_use]
    pub fn pending_event_count(&self) -> usize {
        self.events.len()
    }

    fn begin(&mut self, from: ZoomTransform, to: ZoomTransform, duration: Duration) -> TransitionId {
        let id = TransitionId(self.next_id);
        self.next_id += 1;
        self.active = Some(Transition {
            id,
            from,
            to,
            elapsed: Duration::ZERO,
            duration,
        });
        tracing::debug!(id = id.0, k = to.k, x = to.x, y = to.y, ?duration, "zoom transition start");
        self.events.push(ZoomEvent {
            id,
            kind: ZoomEventKind::Start,
            transform: from,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use kurbo::Size;
    use stormscroll_geo::{GeoPoint, GeoProjector, ZoomTransform};

    use super::{AnimatorPhase, TransitionId, ZoomAnimator, ZoomError, ZoomEventKind};
    use crate::easing::linear;

    const FRAME: Duration = Duration::from_millis(50);

    fn map() -> GeoProjector {
        GeoProjector::new(Size::new(800.0, 500.0), GeoPoint::new(-82.0, 27.0), 1.3)
    }

    fn kinds(zoom: &mut ZoomAnimator) -> Vec<(u64, ZoomEventKind)> {
        zoom.drain_events().iter().map(|e| (e.id.0, e.kind)).collect()
    }

    #[test]
    fn runs_to_completion_and_lands_exactly() {
        let mut proj = map();
        let mut zoom = ZoomAnimator::new();
        let to = ZoomTransform::new(4.0, -100.0, 50.0);
        zoom.start_transition(proj.transform(), to, Duration::from_millis(750)).unwrap();
        assert_eq!(zoom.phase(), AnimatorPhase::Transitioning);

        let mut frames = 0;
        while zoom.tick(FRAME, &mut proj) {
            frames += 1;
            let k = proj.transform().k;
            assert!((1.0..=4.0).contains(&k), "intermediate scale {k} out of range");
        }
        assert_eq!(frames, 14, "750ms in 50ms frames");
        assert_eq!(proj.transform(), to);
        assert_eq!(zoom.phase(), AnimatorPhase::Idle);
        assert_eq!(kinds(&mut zoom), [(0, ZoomEventKind::Start), (0, ZoomEventKind::End)]);
    }

    #[test]
    fn start_while_running_is_rejected() {
        let mut proj = map();
        let mut zoom = ZoomAnimator::new();
        let first = zoom
            .start_transition(proj.transform(), ZoomTransform::new(4.0, 0.0, 0.0), FRAME * 10)
            .unwrap();
        zoom.tick(FRAME, &mut proj);
        let before = proj.transform();
        let err = zoom
            .start_transition(proj.transform(), ZoomTransform::IDENTITY, FRAME)
            .unwrap_err();
        assert_eq!(err, ZoomError::Busy { running: first });
        assert_eq!(proj.transform(), before, "rejection leaves the map alone");
        assert_eq!(zoom.active_id(), Some(first));
        assert_eq!(kinds(&mut zoom), [(0, ZoomEventKind::Start)]);
    }

    #[test]
    fn cancel_keeps_in_flight_transform() {
        let mut proj = map();
        let mut zoom = ZoomAnimator::new().with_easing(linear);
        zoom.start_transition(proj.transform(), ZoomTransform::new(5.0, 400.0, 0.0), FRAME * 4)
            .unwrap();
        zoom.tick(FRAME * 2, &mut proj);
        assert!(zoom.cancel(&mut proj));
        assert_eq!(proj.transform(), ZoomTransform::new(3.0, 200.0, 0.0));
        assert!(!zoom.is_transitioning());
        assert!(!zoom.cancel(&mut proj), "second cancel is a no-op");
        let events = zoom.drain_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1].kind, ZoomEventKind::Interrupt);
        assert_eq!(events[1].transform, ZoomTransform::new(3.0, 200.0, 0.0));
        assert!(!zoom.tick(FRAME, &mut proj), "idle ticks do nothing");
        assert_eq!(zoom.pending_event_count(), 0);
    }

    #[test]
    fn retarget_interrupts_then_starts_from_snapshot() {
        let mut proj = map();
        let mut zoom = ZoomAnimator::new().with_easing(linear);
        zoom.start_transition(proj.transform(), ZoomTransform::new(5.0, 0.0, 0.0), FRAME * 4)
            .unwrap();
        zoom.tick(FRAME, &mut proj);
        let second = zoom.retarget(&mut proj, ZoomTransform::IDENTITY, FRAME * 2);
        assert_eq!(second, TransitionId(1));
        assert_eq!(proj.transform().k, 2.0, "no snap-back to the start");
        while zoom.tick(FRAME, &mut proj) {}
        assert_eq!(proj.transform(), ZoomTransform::IDENTITY);
        assert_eq!(
            kinds(&mut zoom),
            [
                (0, ZoomEventKind::Start),
                (0, ZoomEventKind::Interrupt),
                (1, ZoomEventKind::Start),
                (1, ZoomEventKind::End),
            ]
        );
    }

    #[test]
    fn retarget_when_idle_just_starts() {
        let mut proj = map();
        let mut zoom = ZoomAnimator::new();
        let id = zoom.retarget(&mut proj, ZoomTransform::new(2.0, 0.0, 0.0), FRAME);
        assert_eq!(id, TransitionId(0));
        assert_eq!(kinds(&mut zoom), [(0, ZoomEventKind::Start)]);
    }

    #[test]
    fn zero_duration_finishes_on_first_tick() {
        let mut proj = map();
        let mut zoom = ZoomAnimator::new();
        let to = ZoomTransform::new(2.0, 10.0, 10.0);
        zoom.start_transition(proj.transform(), to, Duration::ZERO).unwrap();
        assert!(!zoom.tick(Duration::ZERO, &mut proj));
        assert_eq!(proj.transform(), to);
    }

    #[test]
    fn targets_beyond_the_extent_are_clamped_on_apply() {
        let mut proj = map();
        let mut zoom = ZoomAnimator::new();
        zoom.start_transition(proj.transform(), ZoomTransform::new(20.0, 0.0, 0.0), FRAME)
            .unwrap();
        zoom.tick(FRAME, &mut proj);
        assert_eq!(proj.transform().k, 8.0);
        let end = zoom.drain_events().pop().unwrap();
        assert_eq!(end.kind, ZoomEventKind::End);
        assert_eq!(end.transform.k, 8.0);
    }
}
