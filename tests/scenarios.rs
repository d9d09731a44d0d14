//! End-to-end wheel scenarios

use futures::FutureExt;
use futures::executor::block_on;
use futures::future::{self, LocalBoxFuture};

use prize_wheel::assets::{ImageLoader, ImageRef};
use prize_wheel::renderer::{AssetStatus, RecordingSurface, RenderGeneration, SizedImage, render};
use prize_wheel::sim::{Command, WheelEngine, WheelEvent};
use prize_wheel::{
    AssetError, ConfigurationMissingError, Customization, EngineSettings, EntryImport,
    ValidationError, WheelLaunch, WinnerEffect,
};

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

fn engine(entries: &[&str], winners: i64, seed: u64) -> WheelEngine {
    let mut customization = Customization::default();
    customization.set_number_of_winners(winners);
    let launch = WheelLaunch::new(names(entries), customization).unwrap();
    WheelEngine::new(launch, EngineSettings::default(), seed)
}

fn winners_in(events: &[WheelEvent]) -> Vec<String> {
    events
        .iter()
        .filter_map(|e| match e {
            WheelEvent::WinnerResolved { winner, .. } => Some(winner.clone()),
            _ => None,
        })
        .collect()
}

#[test]
fn test_forced_first_winner_then_random() {
    for seed in 0..20 {
        let mut e = engine(&["Alice", "Bob", "Carol", "Dave"], 2, seed);
        e.handle(Command::ForceNextWinner("Carol".into()));
        e.handle(Command::RequestSpin);
        let events = e.tick(5000.0);
        assert_eq!(winners_in(&events), names(&["Carol"]));
        assert!(events.contains(&WheelEvent::EntriesChanged(names(&["Alice", "Bob", "Dave"]))));

        // Offered set for the second spin
        assert_eq!(e.active_entries(), names(&["Alice", "Bob", "Dave"]));

        // Announcement closes on its own, then the next spin starts
        let events = e.tick(5000.0);
        assert!(events.contains(&WheelEvent::AnnouncementDismissed));
        let events = e.tick(500.0);
        assert!(matches!(events.as_slice(), [WheelEvent::SpinStarted { .. }]));
        let events = e.tick(5000.0);
        let second = winners_in(&events);
        assert_eq!(second.len(), 1);
        assert!(["Alice", "Bob", "Dave"].contains(&second[0].as_str()));

        assert_eq!(e.winners().len(), 2);
        assert_eq!(e.winners()[0], "Carol");
        assert!(e.is_complete());
        assert_eq!(e.clipboard_text(), Some(e.winners().join("\n")));
    }
}

#[test]
fn test_five_winners_from_three_entries() {
    let mut e = engine(&["x", "y", "z"], 5, 99);
    let mut spins = 0;
    let mut events = e.handle(Command::RequestSpin);
    for _ in 0..100 {
        spins += events
            .iter()
            .filter(|ev| matches!(ev, WheelEvent::SpinStarted { .. }))
            .count();
        match e.next_due_in() {
            Some(dt) => events = e.tick(dt),
            None => break,
        }
    }
    assert_eq!(spins, 3);
    assert_eq!(e.winners().len(), 3);
    assert!(e.is_complete());
    assert!(e.active_entries().is_empty());
    assert!(e.announcement().is_some_and(|a| a.is_final));
}

#[test]
fn test_duplicate_values_excluded_together() {
    let mut e = engine(&["Bob", "Amy", "Bob"], 2, 5);
    e.handle(Command::ForceNextWinner("Bob".into()));
    e.handle(Command::RequestSpin);
    e.tick(5000.0);
    assert_eq!(e.active_entries(), names(&["Amy"]));
}

#[test]
fn test_manual_dismiss_continues_sequence() {
    let mut e = engine(&["a", "b", "c"], 2, 3);
    e.handle(Command::RequestSpin);
    e.tick(5000.0);
    let events = e.handle(Command::DismissWinner);
    assert_eq!(events, vec![WheelEvent::AnnouncementDismissed]);
    let events = e.tick(500.0);
    assert!(matches!(events.as_slice(), [WheelEvent::SpinStarted { .. }]));
}

#[test]
fn test_raw_text_import() {
    let import = EntryImport::from_text("  Tom \n\nJerry\n  \n").unwrap();
    assert_eq!(import.entries, names(&["Tom", "Jerry"]));
    assert!(import.warnings.is_empty());
    assert_eq!(EntryImport::from_text(" \n \n"), Err(ValidationError::NoValidEntries));
}

#[test]
fn test_winner_count_clamps() {
    let mut c = Customization::default();
    c.set_number_of_winners(15);
    assert_eq!(c.number_of_winners(), 10);
    c.set_number_of_winners(0);
    assert_eq!(c.number_of_winners(), 1);
    c.set_number_of_winners(-3);
    assert_eq!(c.number_of_winners(), 1);

    let launch = WheelLaunch::from_state_json(Some(
        r#"{"entries": ["a"], "customization": {"numberOfWinners": 42}}"#,
    ))
    .unwrap();
    assert_eq!(launch.customization.number_of_winners(), 10);
}

#[test]
fn test_missing_configuration() {
    assert_eq!(WheelLaunch::from_state_json(None), Err(ConfigurationMissingError::Absent));
}

#[test]
fn test_no_effect_no_celebration() {
    let mut customization = Customization::default();
    customization.winner_effect = WinnerEffect::None;
    let launch = WheelLaunch::new(names(&["a", "b"]), customization).unwrap();
    let mut e = WheelEngine::new(launch, EngineSettings::default(), 8);
    e.handle(Command::RequestSpin);
    let events = e.tick(5000.0);
    assert!(!events.iter().any(|ev| matches!(ev, WheelEvent::Celebrate(_))));
}

/// Serves every image as a 100x100 square
struct SquareImages;

impl ImageLoader for SquareImages {
    type Image = SizedImage;

    fn load(&self, src: &ImageRef) -> LocalBoxFuture<'static, Result<SizedImage, AssetError>> {
        future::ready(Ok(SizedImage {
            src: src.as_str().to_string(),
            width: 100.0,
            height: 100.0,
        }))
        .boxed_local()
    }
}

#[test]
fn test_render_after_winner_shows_remaining_entries() {
    let mut e = engine(&["Alice", "Bob", "A very long entry name indeed"], 2, 11);
    e.handle(Command::ForceNextWinner("Bob".into()));
    e.handle(Command::RequestSpin);
    let events = e.tick(5000.0);
    let entries = events
        .iter()
        .find_map(|ev| match ev {
            WheelEvent::EntriesChanged(list) => Some(list.clone()),
            _ => None,
        })
        .unwrap();

    let mut customization = e.customization().clone();
    customization.logo_url = Some(ImageRef::new("logo.png"));
    let surface = RecordingSurface::new(380.0, 380.0);
    let mut writer = surface.clone();
    let generation = RenderGeneration::new();
    let report = block_on(render(
        &mut writer,
        &SquareImages,
        &entries,
        &customization,
        10.0,
        &generation.begin(),
    ));

    assert_eq!(report.logo, AssetStatus::Drawn);
    let texts = surface.texts();
    assert_eq!(texts.len(), 2);
    assert_eq!(texts[0], "Alice");
    assert!(texts[1].ends_with("..."));
    assert!(texts[1].chars().count() < entries[1].chars().count());
}
