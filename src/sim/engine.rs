//! Wheel engine
//!
//! Ties the spin controller and the winner sequencer to one virtual clock.
//! The host sends [`Command`]s (spin, reset, dismiss) and advances time with
//! [`WheelEngine::tick`]; everything observable comes back as [`WheelEvent`]s.
//!
//! Requests that arrive in the wrong state (double clicks, spin while
//! resetting) are dropped with a debug log and no event.

use super::sequencer::WinnerSequencer;
use super::spin::{SpinController, SpinPhase};
use super::timer::{Scheduler, TimerHandle};
use crate::consts::MAX_FRAME_STEP_MS;
use crate::customization::{Customization, WinnerEffect};
use crate::error::StateError;
use crate::session::WheelLaunch;
use crate::settings::EngineSettings;

/// Host requests
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Spin now (spin button, recording controls)
    RequestSpin,
    /// Ease the wheel back to zero
    RequestReset,
    /// Close the winner announcement; continues a multi-winner draw
    DismissWinner,
    /// Make the next spin land on this entry if it is still on the wheel
    ForceNextWinner(String),
}

/// Things the host should show or react to
#[derive(Debug, Clone, PartialEq)]
pub enum WheelEvent {
    SpinStarted {
        target_index: usize,
        from_rotation: f64,
        to_rotation: f64,
        duration_ms: f64,
    },
    WinnerResolved {
        winner: String,
        /// 1-based position in the sequence
        number: usize,
        remaining: usize,
    },
    /// Fire the winner effect (once per winner)
    Celebrate(WinnerEffect),
    /// The wheel now shows these entries; redraw it
    EntriesChanged(Vec<String>),
    SequenceComplete {
        winners: Vec<String>,
    },
    AnnouncementDismissed,
    ResetStarted,
    ResetFinished,
}

/// The winner currently being announced
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    pub winner: String,
    pub remaining: usize,
    /// The last winner of the sequence; shows the full list and stays up
    pub is_final: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EngineTask {
    ResolveSpin,
    EndReset,
    DismissAnnouncement,
    AutoAdvance,
}

/// One wheel session: entries, look, spin state and winners so far
#[derive(Debug, Clone)]
pub struct WheelEngine {
    settings: EngineSettings,
    customization: Customization,
    controller: SpinController,
    sequencer: WinnerSequencer,
    timers: Scheduler<EngineTask>,
    announcement: Option<Announcement>,
    dismiss_timer: Option<TimerHandle>,
    advance_timer: Option<TimerHandle>,
    /// Auto spin that fell due during a reset; runs when the cooldown ends
    deferred_advance: bool,
    forced_next: Option<String>,
    events: Vec<WheelEvent>,
}

impl WheelEngine {
    pub fn new(launch: WheelLaunch, settings: EngineSettings, seed: u64) -> Self {
        let settings = settings.sanitized();
        let sequencer =
            WinnerSequencer::new(launch.entries, launch.customization.number_of_winners());
        log::info!(
            "Wheel session started: {} entries, {} winner(s)",
            sequencer.original().len(),
            sequencer.remaining()
        );
        Self {
            controller: SpinController::new(&settings, seed),
            settings,
            customization: launch.customization,
            sequencer,
            timers: Scheduler::new(),
            announcement: None,
            dismiss_timer: None,
            advance_timer: None,
            deferred_advance: false,
            forced_next: None,
            events: Vec::new(),
        }
    }

    // === Read side ===

    pub fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    pub fn customization(&self) -> &Customization {
        &self.customization
    }

    /// Entries currently on the wheel
    pub fn active_entries(&self) -> Vec<String> {
        self.sequencer.active_entries()
    }

    pub fn winners(&self) -> &[String] {
        self.sequencer.winners()
    }

    pub fn remaining(&self) -> usize {
        self.sequencer.remaining()
    }

    pub fn is_complete(&self) -> bool {
        self.sequencer.is_complete()
    }

    pub fn is_spinning(&self) -> bool {
        self.controller.is_spinning()
    }

    pub fn is_resetting(&self) -> bool {
        self.controller.is_resetting()
    }

    pub fn phase(&self) -> SpinPhase {
        self.controller.phase()
    }

    /// Target rotation in degrees (where the wheel ends up)
    pub fn rotation(&self) -> f64 {
        self.controller.rotation()
    }

    /// Rotation to draw right now
    pub fn display_rotation(&self) -> f64 {
        self.controller.display_rotation(self.timers.now())
    }

    /// Spin button enabled
    pub fn can_spin(&self) -> bool {
        self.controller.can_spin() && !self.sequencer.is_complete()
    }

    /// Reset button enabled
    pub fn can_reset(&self) -> bool {
        self.controller.can_reset()
    }

    pub fn announcement(&self) -> Option<&Announcement> {
        self.announcement.as_ref()
    }

    /// Winner text for the host to copy
    pub fn clipboard_text(&self) -> Option<String> {
        self.sequencer.clipboard_text()
    }

    /// Every winner so far, once there are at least two
    pub fn all_winners_text(&self) -> Option<String> {
        self.sequencer.all_winners_text()
    }

    /// Current virtual time
    pub fn now(&self) -> f64 {
        self.timers.now()
    }

    // === Write side ===

    /// Apply a host command
    pub fn handle(&mut self, command: Command) -> Vec<WheelEvent> {
        let result = match command {
            Command::RequestSpin => self.request_spin(),
            Command::RequestReset => self.request_reset(),
            Command::DismissWinner => {
                self.dismiss_announcement();
                Ok(())
            }
            Command::ForceNextWinner(name) => {
                self.forced_next = Some(name);
                Ok(())
            }
        };
        if let Err(e) = result {
            log::debug!("Ignored request: {}", e);
        }
        self.drain_events()
    }

    /// Advance the clock by `dt_ms` and run whatever falls due
    pub fn tick(&mut self, dt_ms: f64) -> Vec<WheelEvent> {
        let until = self.timers.now() + dt_ms.max(0.0);
        while let Some(task) = self.timers.pop_due(until) {
            self.run_task(task);
        }
        self.timers.set_now(until);
        self.drain_events()
    }

    /// Advance by one display frame, clamped to `MAX_FRAME_STEP_MS`
    pub fn advance_frame(&mut self, dt_ms: f64) -> Vec<WheelEvent> {
        if dt_ms > MAX_FRAME_STEP_MS {
            log::debug!("Frame gap of {:.0} ms clamped", dt_ms);
        }
        self.tick(dt_ms.min(MAX_FRAME_STEP_MS))
    }

    /// Time until something is scheduled to happen
    pub fn next_due_in(&self) -> Option<f64> {
        self.timers.next_due_in()
    }

    /// Cancel everything pending and start over with a new launch state
    pub fn start_session(&mut self, launch: WheelLaunch) -> Vec<WheelEvent> {
        self.end_session();
        self.sequencer =
            WinnerSequencer::new(launch.entries, launch.customization.number_of_winners());
        self.customization = launch.customization;
        log::info!("Wheel session restarted with {} entries", self.sequencer.original().len());
        self.events.push(WheelEvent::EntriesChanged(self.sequencer.active_entries()));
        self.drain_events()
    }

    /// Tear down: cancel pending spin resolution, reset cooldown, announcement
    /// and auto-advance timers. A cancelled spin produces no winner.
    pub fn end_session(&mut self) {
        self.controller.cancel(&mut self.timers);
        self.timers.clear();
        self.announcement = None;
        self.dismiss_timer = None;
        self.advance_timer = None;
        self.deferred_advance = false;
        self.forced_next = None;
        self.events.clear();
    }

    fn drain_events(&mut self) -> Vec<WheelEvent> {
        std::mem::take(&mut self.events)
    }

    fn request_spin(&mut self) -> Result<(), StateError> {
        if self.sequencer.is_complete() {
            return Err(StateError::SequenceComplete);
        }
        // A manual spin supersedes the pending automatic one
        if let Some(handle) = self.advance_timer.take() {
            self.timers.cancel(handle);
        }
        self.start_spin()?;
        self.deferred_advance = false;
        Ok(())
    }

    fn start_spin(&mut self) -> Result<(), StateError> {
        let active = self.sequencer.active_entries();
        let plan = self.controller.spin(
            &active,
            self.forced_next.as_deref(),
            &mut self.timers,
            EngineTask::ResolveSpin,
        )?;
        self.forced_next = None;

        // Starting a spin closes any announcement still on screen
        if self.announcement.take().is_some() {
            if let Some(handle) = self.dismiss_timer.take() {
                self.timers.cancel(handle);
            }
            self.events.push(WheelEvent::AnnouncementDismissed);
        }

        self.events.push(WheelEvent::SpinStarted {
            target_index: plan.target_index,
            from_rotation: plan.from_rotation,
            to_rotation: plan.to_rotation,
            duration_ms: plan.duration_ms,
        });
        Ok(())
    }

    fn request_reset(&mut self) -> Result<(), StateError> {
        self.controller.reset(&mut self.timers, EngineTask::EndReset)?;
        self.events.push(WheelEvent::ResetStarted);
        Ok(())
    }

    fn dismiss_announcement(&mut self) {
        if self.announcement.take().is_none() {
            return;
        }
        if let Some(handle) = self.dismiss_timer.take() {
            self.timers.cancel(handle);
        }
        self.events.push(WheelEvent::AnnouncementDismissed);

        if !self.sequencer.is_complete() && self.advance_timer.is_none() {
            let delay = self.settings.auto_advance_delay_ms;
            self.advance_timer = Some(self.timers.schedule(delay, EngineTask::AutoAdvance));
        }
    }

    fn run_task(&mut self, task: EngineTask) {
        match task {
            EngineTask::ResolveSpin => self.resolve_spin(),
            EngineTask::EndReset => {
                self.controller.finish_reset();
                self.events.push(WheelEvent::ResetFinished);
                if std::mem::take(&mut self.deferred_advance) {
                    self.auto_spin();
                }
            }
            EngineTask::DismissAnnouncement => {
                self.dismiss_timer = None;
                self.dismiss_announcement();
            }
            EngineTask::AutoAdvance => {
                self.advance_timer = None;
                self.auto_spin();
            }
        }
    }

    /// Next spin of a multi-winner draw. A reset in progress postpones it
    /// until the cooldown ends.
    fn auto_spin(&mut self) {
        if self.sequencer.is_complete() {
            return;
        }
        match self.start_spin() {
            Ok(()) => {}
            Err(StateError::Resetting) => {
                log::debug!("Automatic spin waits for the reset to finish");
                self.deferred_advance = true;
            }
            Err(e) => log::debug!("Automatic spin skipped: {}", e),
        }
    }

    fn resolve_spin(&mut self) {
        let Some(outcome) = self.controller.complete_spin() else {
            return;
        };
        if !self.sequencer.record(outcome.winner.clone()) {
            return;
        }

        let number = self.sequencer.winners().len();
        let remaining = self.sequencer.remaining();
        log::info!("Winner #{}: {} ({} remaining)", number, outcome.winner, remaining);

        self.events.push(WheelEvent::WinnerResolved {
            winner: outcome.winner.clone(),
            number,
            remaining,
        });
        if self.customization.winner_effect != WinnerEffect::None {
            self.events.push(WheelEvent::Celebrate(self.customization.winner_effect));
        }
        self.events.push(WheelEvent::EntriesChanged(self.sequencer.active_entries()));

        let is_final = self.sequencer.is_complete();
        self.announcement = Some(Announcement {
            winner: outcome.winner,
            remaining,
            is_final,
        });

        if is_final {
            log::info!("All {} winners drawn", number);
            self.events.push(WheelEvent::SequenceComplete {
                winners: self.sequencer.winners().to_vec(),
            });
        } else if let Some(delay) = self.settings.announcement_dismiss() {
            self.dismiss_timer = Some(self.timers.schedule(delay, EngineTask::DismissAnnouncement));
        }
    }
}
