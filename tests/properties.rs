//! Property tests for the wheel engine

use proptest::prelude::*;

use prize_wheel::Customization;
use prize_wheel::WheelLaunch;
use prize_wheel::consts::FULL_TURN;
use prize_wheel::entries::{distinct_count, exclude, parse_entries};
use prize_wheel::renderer::{RecordingSurface, WheelLayout, fit_label};
use prize_wheel::settings::EngineSettings;
use prize_wheel::sim::{
    Command, Scheduler, SpinController, WheelEngine, WheelEvent, WheelGeometry, WinnerSequencer,
};

fn entry_list() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[A-Za-z][A-Za-z ]{0,11}[A-Za-z]", 1..40)
}

/// Entries that may repeat values
fn entry_list_with_duplicates() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(prop::sample::select(vec!["Ann", "Ben", "Cy", "Di", "Ed"]), 1..20)
        .prop_map(|v| v.into_iter().map(String::from).collect())
}

fn launch(entries: Vec<String>, winners: i64) -> WheelLaunch {
    let mut customization = Customization::default();
    customization.set_number_of_winners(winners);
    WheelLaunch::new(entries, customization).unwrap()
}

/// Run a whole draw to the end, dismissing each announcement at once
fn run_sequence(engine: &mut WheelEngine) -> (Vec<String>, Vec<Vec<String>>) {
    let mut winners = Vec::new();
    let mut offered = Vec::new();
    offered.push(engine.active_entries());
    let mut events = engine.handle(Command::RequestSpin);
    for _ in 0..1000 {
        let mut dismiss = false;
        for event in &events {
            if let WheelEvent::WinnerResolved { winner, .. } = event {
                winners.push(winner.clone());
                dismiss = !engine.is_complete();
            }
            if let WheelEvent::SpinStarted { .. } = event {
                if !winners.is_empty() {
                    offered.push(engine.active_entries());
                }
            }
        }
        if dismiss {
            events = engine.handle(Command::DismissWinner);
            continue;
        }
        match engine.next_due_in() {
            Some(dt) => events = engine.tick(dt),
            None => break,
        }
    }
    (winners, offered)
}

proptest! {
    #[test]
    fn forced_winner_always_wins(entries in entry_list(), pick in any::<prop::sample::Index>(), seed in any::<u64>()) {
        let target = entries[pick.index(entries.len())].clone();
        let mut controller = SpinController::new(&EngineSettings::default(), seed);
        let mut timers = Scheduler::new();
        controller.spin(&entries, Some(target.as_str()), &mut timers, ()).unwrap();
        let dt = timers.next_due_in().unwrap();
        prop_assert!(timers.pop_due(dt).is_some());
        let outcome = controller.complete_spin().unwrap();
        prop_assert_eq!(outcome.winner, target);
    }

    #[test]
    fn winner_angle_parks_segment_under_pointer(n in 1usize..500, pick in any::<prop::sample::Index>()) {
        let geometry = WheelGeometry::new(n).unwrap();
        let i = pick.index(n);
        let a = geometry.segment_angle();
        let total = geometry.winner_angle(i) + i as f64 * a + a / 2.0;
        let off = total.rem_euclid(FULL_TURN);
        prop_assert!(off < 1e-6 || FULL_TURN - off < 1e-6);
        prop_assert_eq!(geometry.segment_under_pointer(geometry.winner_angle(i)), i);
    }

    #[test]
    fn spin_from_rest_lands_on_target(entries in entry_list(), seed in any::<u64>()) {
        let mut controller = SpinController::new(&EngineSettings::default(), seed);
        let mut timers = Scheduler::new();
        let plan = controller.spin(&entries, None, &mut timers, ()).unwrap();
        let geometry = WheelGeometry::new(entries.len()).unwrap();
        prop_assert_eq!(geometry.segment_under_pointer(plan.to_rotation), plan.target_index);
        prop_assert!(plan.to_rotation >= plan.from_rotation + 3.0 * FULL_TURN);
    }

    #[test]
    fn reset_twice_leaves_zero(entries in entry_list(), seed in any::<u64>()) {
        let settings = EngineSettings::default();
        let mut engine = WheelEngine::new(launch(entries, 1), settings.clone(), seed);
        engine.handle(Command::RequestSpin);
        engine.tick(settings.spin_duration_ms);
        prop_assert!(engine.rotation() > 0.0);
        for _ in 0..2 {
            engine.handle(Command::RequestReset);
            prop_assert_eq!(engine.rotation(), 0.0);
            engine.tick(settings.reset_cooldown_ms);
            prop_assert!(!engine.is_resetting());
            prop_assert_eq!(engine.rotation(), 0.0);
        }
    }

    #[test]
    fn sequence_stops_when_entries_run_out(entries in entry_list_with_duplicates(), requested in 1i64..=10, seed in any::<u64>()) {
        let distinct = distinct_count(&entries);
        let mut engine = WheelEngine::new(launch(entries.clone(), requested), EngineSettings::default(), seed);
        let (winners, offered) = run_sequence(&mut engine);
        prop_assert_eq!(winners.len(), (requested as usize).min(distinct));
        prop_assert!(engine.is_complete());
        prop_assert!(engine.handle(Command::RequestSpin).is_empty());

        // No value wins twice, and past winners are never offered again
        for (k, winner) in winners.iter().enumerate() {
            prop_assert!(!winners[..k].contains(winner));
            prop_assert_eq!(&offered[k], &exclude(&entries, &winners[..k]));
            for later in &offered[k + 1..] {
                prop_assert!(!later.contains(winner));
            }
        }
    }

    #[test]
    fn sequencer_clamps_to_distinct_values(entries in entry_list_with_duplicates(), requested in 1usize..=10) {
        let sequencer = WinnerSequencer::new(entries.clone(), requested);
        prop_assert_eq!(sequencer.remaining(), requested.min(distinct_count(&entries)));
    }

    #[test]
    fn parsed_entries_are_trimmed_and_non_empty(raw in "[ a-z\\n\\r\\t]{0,200}") {
        for entry in parse_entries(&raw) {
            prop_assert!(!entry.is_empty());
            prop_assert_eq!(entry.trim(), entry.as_str());
        }
    }

    #[test]
    fn overlong_labels_get_ellipsis(text in "[a-zA-Z0-9 ]{1,80}") {
        let surface = RecordingSurface::new(380.0, 380.0);
        let layout = WheelLayout::for_surface(glam::Vec2::splat(380.0), 10.0);
        let max = layout.max_label_width();
        let label = fit_label(&surface, &text, max);
        if text.chars().count() as f32 * 8.0 > max {
            prop_assert!(label.ends_with("..."));
            prop_assert!(label.chars().count() < text.chars().count());
        } else {
            prop_assert_eq!(label, text);
        }
    }

    #[test]
    fn winner_count_always_in_range(requested in any::<i64>()) {
        let mut c = Customization::default();
        c.set_number_of_winners(requested);
        prop_assert!((1..=10).contains(&c.number_of_winners()));
    }
}
