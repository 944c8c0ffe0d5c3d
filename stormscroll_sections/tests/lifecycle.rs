// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the scroll coordinator driving a registry of recording sections.
//!
//! The sections append every hook call to a shared log in the context, so the
//! tests observe the exact order hooks ran in.

use proptest::prelude::*;
use stormscroll_sections::{
    IntersectionSignal, LifecycleCall, NavKey, ScrollCommand, ScrollCoordinator, ScrollDirection,
    Section, SectionRegistry,
};

use ScrollDirection::{Down, Up};

#[derive(Clone, Copy, Debug, PartialEq)]
enum Hook {
    Enter(usize),
    Exit(usize),
    Progress(usize, f64),
}

#[derive(Default)]
struct Log {
    hooks: Vec<Hook>,
}

struct Recorder(usize);

impl Section<Log> for Recorder {
    fn on_enter(&mut self, ctx: &mut Log, _: ScrollDirection) {
        ctx.hooks.push(Hook::Enter(self.0));
    }

    fn on_exit(&mut self, ctx: &mut Log, _: ScrollDirection) {
        ctx.hooks.push(Hook::Exit(self.0));
    }

    fn on_progress(&mut self, ctx: &mut Log, progress: f64) {
        ctx.hooks.push(Hook::Progress(self.0, progress));
    }
}

const IDS: [&str; 6] = ["hook", "map", "tracks", "damage", "trend", "outro"];

fn story() -> (SectionRegistry<Log>, ScrollCoordinator, Log) {
    let mut registry = SectionRegistry::new();
    for (i, id) in IDS.iter().enumerate() {
        registry
            .register(*id, format!("Title {i}"), Box::new(Recorder(i)))
            .unwrap();
    }
    (registry, ScrollCoordinator::default(), Log::default())
}

fn signal(index: usize, ratio: f64, direction: ScrollDirection) -> IntersectionSignal {
    IntersectionSignal::new(IDS[index], ratio, direction)
}

#[test]
fn skipped_section_still_gets_entered_and_exited() {
    let (mut reg, mut scroll, mut log) = story();
    scroll.handle_signal(&mut reg, &mut log, &signal(0, 0.8, Down));
    assert_eq!(log.hooks, [Hook::Enter(0)], "first entry is direct");

    log.hooks.clear();
    let calls = scroll.handle_signal(&mut reg, &mut log, &signal(2, 0.8, Down));
    assert_eq!(
        log.hooks,
        [Hook::Exit(0), Hook::Enter(1), Hook::Exit(1), Hook::Enter(2)]
    );
    assert_eq!(calls.len(), 4);
    assert_eq!(scroll.current(), Some(2));
}

#[test]
fn scrolling_back_walks_boundaries_upwards() {
    let (mut reg, mut scroll, mut log) = story();
    scroll.handle_signal(&mut reg, &mut log, &signal(3, 0.9, Down));
    log.hooks.clear();
    let calls = scroll.handle_signal(&mut reg, &mut log, &signal(1, 0.9, Up));
    assert_eq!(
        log.hooks,
        [Hook::Exit(3), Hook::Enter(2), Hook::Exit(2), Hook::Enter(1)]
    );
    assert!(calls.iter().all(|c| matches!(
        c,
        LifecycleCall::Exit { direction: Up, .. } | LifecycleCall::Enter { direction: Up, .. }
    )));
}

#[test]
fn repeated_signal_for_active_section_is_ignored() {
    let (mut reg, mut scroll, mut log) = story();
    scroll.handle_signal(&mut reg, &mut log, &signal(1, 0.7, Down));
    let calls = scroll.handle_signal(&mut reg, &mut log, &signal(1, 0.95, Down));
    assert!(calls.is_empty());
    assert_eq!(log.hooks, [Hook::Enter(1)]);
}

#[test]
fn below_threshold_signals_only_exit_at_the_ends() {
    let (mut reg, mut scroll, mut log) = story();
    scroll.handle_signal(&mut reg, &mut log, &signal(2, 0.7, Down));
    // A middle section fading out does nothing by itself.
    assert!(scroll.handle_signal(&mut reg, &mut log, &signal(2, 0.3, Down)).is_empty());
    assert_eq!(scroll.current(), Some(2));

    let (mut reg, mut scroll, mut log) = story();
    scroll.handle_signal(&mut reg, &mut log, &signal(0, 0.7, Down));
    scroll.handle_signal(&mut reg, &mut log, &signal(0, 0.1, Up));
    assert_eq!(log.hooks, [Hook::Enter(0), Hook::Exit(0)]);
    assert_eq!(scroll.current(), None);

    let (mut reg, mut scroll, mut log) = story();
    scroll.handle_signal(&mut reg, &mut log, &signal(5, 0.7, Down));
    scroll.handle_signal(&mut reg, &mut log, &signal(5, 0.1, Down));
    assert_eq!(log.hooks, [Hook::Enter(5), Hook::Exit(5)]);
    assert_eq!(scroll.current(), None);
}

#[test]
fn reentry_after_leaving_the_top_is_direct() {
    let (mut reg, mut scroll, mut log) = story();
    scroll.handle_signal(&mut reg, &mut log, &signal(0, 0.7, Down));
    scroll.handle_signal(&mut reg, &mut log, &signal(0, 0.2, Up));
    scroll.handle_signal(&mut reg, &mut log, &signal(0, 0.7, Down));
    assert_eq!(log.hooks, [Hook::Enter(0), Hook::Exit(0), Hook::Enter(0)]);
}

#[test]
fn progress_only_reaches_the_active_section() {
    let (mut reg, mut scroll, mut log) = story();
    assert_eq!(scroll.handle_progress(&mut reg, &mut log, 1, 0.5), None);
    scroll.handle_signal(&mut reg, &mut log, &signal(1, 0.7, Down));
    assert_eq!(scroll.handle_progress(&mut reg, &mut log, 2, 0.5), None);
    assert_eq!(
        scroll.handle_progress(&mut reg, &mut log, 1, 1.7),
        Some(LifecycleCall::Progress {
            index: 1,
            progress: 1.0
        })
    );
    assert_eq!(log.hooks, [Hook::Enter(1), Hook::Progress(1, 1.0)]);
}

#[test]
fn navigation_builds_commands_without_calling_hooks() {
    let (mut reg, mut scroll, mut log) = story();
    assert_eq!(
        scroll.navigate(&reg, NavKey::Next),
        Some(ScrollCommand {
            index: 1,
            element_id: "map".into()
        }),
        "no active section behaves like the first"
    );
    assert_eq!(scroll.navigate(&reg, NavKey::Previous), None);

    scroll.handle_signal(&mut reg, &mut log, &signal(5, 0.7, Down));
    log.hooks.clear();
    assert_eq!(scroll.navigate(&reg, NavKey::Next), None, "past the end");
    assert_eq!(scroll.navigate(&reg, NavKey::Home).unwrap().index, 0);
    assert_eq!(scroll.navigate(&reg, NavKey::End).unwrap().index, 5);
    assert_eq!(scroll.navigate(&reg, NavKey::Previous).unwrap().element_id, "trend");
    assert_eq!(scroll.scroll_to_section(&reg, 6), None);
    assert!(log.hooks.is_empty());
    assert_eq!(scroll.current(), Some(5));
}

#[test]
fn navigation_state_reports_position_and_buttons() {
    let (mut reg, mut scroll, mut log) = story();
    assert_eq!(scroll.navigation(&reg), None);
    scroll.handle_signal(&mut reg, &mut log, &signal(0, 0.7, Down));
    let nav = scroll.navigation(&reg).unwrap();
    assert_eq!(nav.label, "Section 1 of 6");
    assert_eq!(nav.title, "Title 0");
    assert!(!nav.can_go_previous);
    assert!(nav.can_go_next);

    scroll.handle_signal(&mut reg, &mut log, &signal(5, 0.7, Down));
    let nav = scroll.navigation(&reg).unwrap();
    assert_eq!(nav.label, "Section 6 of 6");
    assert!(nav.can_go_previous);
    assert!(!nav.can_go_next);
}

#[test]
fn leave_exits_the_active_section() {
    let (mut reg, mut scroll, mut log) = story();
    assert_eq!(scroll.leave(&mut reg, &mut log, Down), None);
    scroll.handle_signal(&mut reg, &mut log, &signal(3, 0.7, Down));
    assert_eq!(
        scroll.leave(&mut reg, &mut log, Down),
        Some(LifecycleCall::Exit {
            index: 3,
            direction: Down
        })
    );
    assert_eq!(log.hooks, [Hook::Enter(3), Hook::Exit(3)]);
    assert_eq!(scroll.current(), None);
}

fn signal_strategy() -> impl Strategy<Value = IntersectionSignal> {
    (0..IDS.len(), 0.0..=1.0_f64, any::<bool>())
        .prop_map(|(i, ratio, down)| signal(i, ratio, if down { Down } else { Up }))
}

proptest! {
    /// For any signal sequence, every enter is preceded by the exit of the
    /// previously active section and no section is entered twice without an
    /// exit in between.
    #[test]
    fn lifecycle_ordering_holds(signals in prop::collection::vec(signal_strategy(), 1..80)) {
        let (mut reg, mut scroll, mut log) = story();
        for s in &signals {
            let calls = scroll.handle_signal(&mut reg, &mut log, s);
            // Within one signal, each exit hands over to a neighbour.
            for pair in calls.windows(2) {
                if let [LifecycleCall::Exit { index: a, .. }, LifecycleCall::Enter { index: b, .. }] = *pair {
                    prop_assert!(a.abs_diff(b) == 1, "jumped from {} to {}", a, b);
                }
            }
        }

        let mut active: Option<usize> = None;
        let mut balance = [0_i32; IDS.len()];
        for hook in &log.hooks {
            match *hook {
                Hook::Enter(i) => {
                    prop_assert!(active.is_none(), "enter({}) while {:?} active", i, active);
                    balance[i] += 1;
                    active = Some(i);
                }
                Hook::Exit(i) => {
                    prop_assert_eq!(active, Some(i), "exit({}) of a section that is not active", i);
                    balance[i] -= 1;
                    active = None;
                }
                Hook::Progress(..) => {}
            }
            prop_assert!(balance.iter().all(|b| (0..=1).contains(b)), "unbalanced {:?}", balance);
        }
        prop_assert_eq!(active, scroll.current());
    }
}
