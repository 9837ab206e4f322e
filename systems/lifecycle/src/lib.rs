#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Round lifecycle controller for Train Match.
//!
//! The controller turns world events into delayed commands: presentation
//! prompts shortly after a round starts, the round end after content runs
//! out, and the end-of-round summary sequence. Delayed work is never
//! cancelled. Every deferred task remembers the round it was scheduled for
//! and re-checks its guard against a fresh [`RoundView`] when it comes due;
//! a task whose guard no longer holds simply does nothing.

use std::time::Duration;

use tracing::debug;
use train_match_core::{Command, Event, RoundId, RoundPhase, RoundView, Timings};

/// Work that runs once its delay elapses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Task {
    ShowIntroPrompt,
    ShowChooseHint,
    HideBackAffordance,
    HideMoveHint,
    EndRound,
    RevealSummary,
    ReturnToMenu,
}

impl Task {
    /// Whether the task should still act given the round's current state.
    fn guard(self, view: &RoundView) -> bool {
        match self {
            Self::ShowIntroPrompt => view.labels && !view.started && !view.ended(),
            Self::ShowChooseHint => view.labels && !view.hint_suppressed && !view.ended(),
            Self::HideBackAffordance | Self::HideMoveHint => true,
            Self::EndRound => !view.ended(),
            Self::RevealSummary | Self::ReturnToMenu => view.phase == RoundPhase::Ending,
        }
    }

    fn command(self) -> Command {
        match self {
            Self::ShowIntroPrompt => Command::ShowIntroPrompt,
            Self::ShowChooseHint => Command::ShowChooseHint,
            Self::HideBackAffordance => Command::HideBackAffordance,
            Self::HideMoveHint => Command::HideMoveHint,
            Self::EndRound => Command::EndRound,
            Self::RevealSummary => Command::RevealSummary,
            Self::ReturnToMenu => Command::ReturnToMenu,
        }
    }
}

#[derive(Clone, Debug)]
struct Deferred {
    round: RoundId,
    remaining: Duration,
    task: Task,
}

/// Pure system that schedules the round's timed presentation sequence.
#[derive(Debug)]
pub struct Lifecycle {
    timings: Timings,
    pending: Vec<Deferred>,
    end_scheduled: Option<RoundId>,
}

impl Lifecycle {
    /// Creates a controller using the provided delays.
    #[must_use]
    pub fn new(timings: Timings) -> Self {
        Self {
            timings,
            pending: Vec::new(),
            end_scheduled: None,
        }
    }

    /// Number of deferred tasks still waiting, stale ones included.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Consumes world events and the current round view to emit commands.
    ///
    /// Time carried by this batch's [`Event::TimeAdvanced`] events first
    /// advances the tasks already waiting; tasks scheduled by this batch
    /// start counting from the next batch.
    pub fn handle(&mut self, events: &[Event], view: RoundView, out: &mut Vec<Command>) {
        let mut elapsed = Duration::ZERO;
        for event in events {
            if let Event::TimeAdvanced { dt } = event {
                elapsed = elapsed.saturating_add(*dt);
            }
        }
        if !elapsed.is_zero() {
            self.fire_due(elapsed, &view, out);
        }

        for event in events {
            match event {
                Event::RoundStarted { round, labels, .. } => {
                    self.schedule_presentation(*round, *labels);
                }
                Event::ContentExhausted => {
                    if let Some(round) = view.round {
                        let delay = self.timings.quit_delay();
                        self.schedule(round, delay, Task::EndRound);
                    }
                }
                _ => {}
            }
        }

        self.schedule_end_sequence(&view, out);
    }

    fn schedule_presentation(&mut self, round: RoundId, labels: bool) {
        if !labels {
            return;
        }
        let timings = self.timings.clone();
        self.schedule(round, timings.intro_prompt_delay(), Task::ShowIntroPrompt);
        self.schedule(round, timings.choose_hint_delay(), Task::ShowChooseHint);
        self.schedule(round, timings.back_hide_delay(), Task::HideBackAffordance);
        self.schedule(round, timings.move_hint_hide_delay(), Task::HideMoveHint);
    }

    /// Starts the end-of-round sequence the first time the round is seen ended.
    fn schedule_end_sequence(&mut self, view: &RoundView, out: &mut Vec<Command>) {
        let Some(round) = view.round else {
            return;
        };
        if !view.ended() || self.end_scheduled == Some(round) {
            return;
        }
        self.end_scheduled = Some(round);

        out.push(Command::RecordRoundScore);
        let reveal = self.timings.summary_reveal_delay();
        let leave = reveal.saturating_add(self.timings.summary_display());
        self.schedule(round, reveal, Task::RevealSummary);
        self.schedule(round, leave, Task::ReturnToMenu);
        debug!(round = round.get(), "end sequence scheduled");
    }

    fn schedule(&mut self, round: RoundId, delay: Duration, task: Task) {
        self.pending.push(Deferred {
            round,
            remaining: delay,
            task,
        });
    }

    fn fire_due(&mut self, elapsed: Duration, view: &RoundView, out: &mut Vec<Command>) {
        let mut waiting = Vec::with_capacity(self.pending.len());
        for mut deferred in self.pending.drain(..) {
            deferred.remaining = deferred.remaining.saturating_sub(elapsed);
            if !deferred.remaining.is_zero() {
                waiting.push(deferred);
                continue;
            }

            let current = view.is_current(deferred.round);
            if current && deferred.task.guard(view) {
                debug!(round = deferred.round.get(), task = ?deferred.task, "deferred task fired");
                out.push(deferred.task.command());
            } else {
                debug!(
                    round = deferred.round.get(),
                    task = ?deferred.task,
                    current,
                    "deferred task skipped"
                );
            }
        }
        self.pending = waiting;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use train_match_core::{GameMode, Palette};

    fn started(round: RoundId, labels: bool) -> Event {
        Event::RoundStarted {
            round,
            mode: GameMode::ExampleMath,
            palette: Palette::default(),
            labels,
            left_hand: false,
            score_visible: true,
            calm_background: false,
        }
    }

    fn playing(round: RoundId) -> RoundView {
        RoundView {
            round: Some(round),
            phase: RoundPhase::Playing,
            labels: true,
            ..RoundView::default()
        }
    }

    fn tick(dt: Duration) -> Vec<Event> {
        vec![Event::TimeAdvanced { dt }]
    }

    #[test]
    fn intro_prompt_fires_after_its_delay() {
        let round = RoundId::new(0);
        let mut lifecycle = Lifecycle::new(Timings::default());
        let mut out = Vec::new();
        lifecycle.handle(&[started(round, true)], playing(round), &mut out);
        assert!(out.is_empty());

        lifecycle.handle(&tick(Duration::from_millis(3_999)), playing(round), &mut out);
        assert!(out.is_empty());

        lifecycle.handle(&tick(Duration::from_millis(1)), playing(round), &mut out);
        assert_eq!(
            out,
            vec![
                Command::ShowIntroPrompt,
                Command::HideBackAffordance,
                Command::HideMoveHint
            ]
        );
    }

    #[test]
    fn intro_prompt_rechecks_the_started_flag() {
        let round = RoundId::new(0);
        let mut lifecycle = Lifecycle::new(Timings::default());
        let mut out = Vec::new();
        lifecycle.handle(&[started(round, true)], playing(round), &mut out);

        let view = RoundView {
            started: true,
            ..playing(round)
        };
        lifecycle.handle(&tick(Duration::from_secs(4)), view, &mut out);
        assert!(!out.contains(&Command::ShowIntroPrompt));
    }

    #[test]
    fn disabled_labels_schedule_nothing() {
        let round = RoundId::new(0);
        let mut lifecycle = Lifecycle::new(Timings::default());
        let mut out = Vec::new();
        lifecycle.handle(&[started(round, false)], playing(round), &mut out);
        assert_eq!(lifecycle.pending(), 0);
    }

    #[test]
    fn end_sequence_is_scheduled_once_per_round() {
        let round = RoundId::new(3);
        let mut lifecycle = Lifecycle::new(Timings::default());
        let ended = RoundView {
            phase: RoundPhase::Ending,
            ..playing(round)
        };
        let mut out = Vec::new();
        for _ in 0..3 {
            lifecycle.handle(&[], ended, &mut out);
        }
        assert_eq!(out, vec![Command::RecordRoundScore]);
        assert_eq!(lifecycle.pending(), 2);
    }

    #[test]
    fn tasks_from_an_earlier_round_do_nothing() {
        let old = RoundId::new(0);
        let new = RoundId::new(1);
        let mut lifecycle = Lifecycle::new(Timings::default());
        let mut out = Vec::new();
        lifecycle.handle(&[started(old, true)], playing(old), &mut out);

        lifecycle.handle(&tick(Duration::from_secs(10)), playing(new), &mut out);
        assert!(out.is_empty(), "stale tasks acted: {out:?}");
        assert_eq!(lifecycle.pending(), 0);
    }
}
