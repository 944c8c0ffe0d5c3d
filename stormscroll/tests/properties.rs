// Copyright 2025 the Stormscroll Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Invariants of the whole story under arbitrary input sequences.

use core::time::Duration;

use kurbo::{Point, Vec2};
use proptest::prelude::*;
use stormscroll::{RecordingHost, Story, StoryConfig, TextPanel};
use stormscroll_sections::{IntersectionSignal, ScrollDirection};
use stormscroll_tracks::StormId;

const IDS: [&str; 3] = ["hook", "map", "outro"];

#[derive(Clone, Debug)]
enum Input {
    Signal(usize, f64, bool),
    Progress(f64),
    Wheel(f64),
    Drag(f64, f64),
    Select(usize),
    Tick(u64),
}

fn input() -> impl Strategy<Value = Input> {
    prop_oneof![
        (0..IDS.len(), 0.0..=1.0_f64, any::<bool>()).prop_map(|(i, r, d)| Input::Signal(i, r, d)),
        (0.0..=1.0_f64).prop_map(Input::Progress),
        (-800.0..800.0_f64).prop_map(Input::Wheel),
        (-200.0..200.0_f64, -200.0..200.0_f64).prop_map(|(x, y)| Input::Drag(x, y)),
        (0..StormId::ALL.len()).prop_map(Input::Select),
        (0..900_u64).prop_map(Input::Tick),
    ]
}

fn story() -> Story<RecordingHost> {
    let mut story = Story::new(StoryConfig::default(), RecordingHost::new()).unwrap();
    story.add_chart("hook", "Hook", TextPanel::new(["Four storms"])).unwrap();
    story.add_map_section("map", "Storm map").unwrap();
    story.add_chart("outro", "Outro", TextPanel::new(["The end"])).unwrap();
    assert!(story.initialize().is_ok());
    story
}

fn apply(story: &mut Story<RecordingHost>, input: &Input) {
    match *input {
        Input::Signal(i, ratio, down) => {
            let direction = if down { ScrollDirection::Down } else { ScrollDirection::Up };
            story.handle_signal(&IntersectionSignal::new(IDS[i], ratio, direction));
        }
        Input::Progress(p) => {
            if let Some(index) = story.current_section() {
                story.handle_progress(index, p);
            }
        }
        Input::Wheel(dy) => story.wheel(Point::new(400.0, 250.0), dy),
        Input::Drag(dx, dy) => {
            let from = Point::new(300.0, 300.0);
            story.pointer_down(from);
            story.pointer_move(from + Vec2::new(dx, dy));
            story.pointer_up(from + Vec2::new(dx, dy));
        }
        Input::Select(i) => {
            story.select_storm(StormId::ALL[i]);
        }
        Input::Tick(ms) => {
            story.tick(Duration::from_millis(ms));
        }
    }
}

proptest! {
    /// The zoom stays inside the scale extent, at most one viewer is
    /// visible, and the map takes pointer input only while its section is
    /// active.
    #[test]
    fn story_invariants_hold(inputs in prop::collection::vec(input(), 1..60)) {
        let mut story = story();
        let extent = story.map().config().scale_extent();
        for input in &inputs {
            apply(&mut story, input);
            let k = story.map().projector().transform().k;
            prop_assert!(k >= extent.min() && k <= extent.max(), "k = {} after {:?}", k, input);
            let visible = story.context().panels().iter().filter(|v| v.is_visible()).count();
            prop_assert!(visible <= 1, "{} viewers visible after {:?}", visible, input);
            prop_assert_eq!(
                story.context().is_map_interactive(),
                story.current_section() == Some(1)
            );
        }
    }
}
