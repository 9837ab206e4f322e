use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Aggregated tuning knobs for a round.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Delays driving the round's deferred presentation tasks.
    pub timings: Timings,
    /// Vehicle motion and station spacing.
    pub physics: Physics,
}

/// Delays, in milliseconds, used by the round lifecycle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timings {
    /// Wait before the "press to start" prompt appears.
    pub intro_prompt_delay_ms: u64,
    /// Wait before the "choose a traveller" hint appears.
    pub choose_hint_delay_ms: u64,
    /// Wait before the initial back affordance disappears.
    pub back_hide_delay_ms: u64,
    /// Wait before the movement hint arrow disappears.
    pub move_hint_hide_delay_ms: u64,
    /// Wait between running out of stations and ending the round.
    pub quit_delay_ms: u64,
    /// Wait between the round ending and the summary appearing.
    pub summary_reveal_delay_ms: u64,
    /// How long the summary stays up before returning to the menu.
    pub summary_display_ms: u64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            intro_prompt_delay_ms: 4_000,
            choose_hint_delay_ms: 6_000,
            back_hide_delay_ms: 4_000,
            move_hint_hide_delay_ms: 4_000,
            quit_delay_ms: 2_000,
            summary_reveal_delay_ms: 1_000,
            summary_display_ms: 10_000,
        }
    }
}

impl Timings {
    /// Delay before the intro prompt.
    #[must_use]
    pub const fn intro_prompt_delay(&self) -> Duration {
        Duration::from_millis(self.intro_prompt_delay_ms)
    }

    /// Delay before the choose hint.
    #[must_use]
    pub const fn choose_hint_delay(&self) -> Duration {
        Duration::from_millis(self.choose_hint_delay_ms)
    }

    /// Delay before the back affordance hides.
    #[must_use]
    pub const fn back_hide_delay(&self) -> Duration {
        Duration::from_millis(self.back_hide_delay_ms)
    }

    /// Delay before the movement hint hides.
    #[must_use]
    pub const fn move_hint_hide_delay(&self) -> Duration {
        Duration::from_millis(self.move_hint_hide_delay_ms)
    }

    /// Delay between content exhaustion and the round ending.
    #[must_use]
    pub const fn quit_delay(&self) -> Duration {
        Duration::from_millis(self.quit_delay_ms)
    }

    /// Delay between the round ending and the summary reveal.
    #[must_use]
    pub const fn summary_reveal_delay(&self) -> Duration {
        Duration::from_millis(self.summary_reveal_delay_ms)
    }

    /// How long the summary remains visible.
    #[must_use]
    pub const fn summary_display(&self) -> Duration {
        Duration::from_millis(self.summary_display_ms)
    }
}

/// Vehicle motion parameters expressed in world units and seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Physics {
    /// Speed gained per second of held acceleration.
    pub acceleration: f32,
    /// Speed lost per second of held braking.
    pub brake: f32,
    /// Passive deceleration is `speed_limit / deceleration_divisor` per second.
    pub deceleration_divisor: f32,
    /// Distance the vehicle must travel past a station before the next one spawns.
    pub departure_distance: f32,
    /// Distance ahead of the vehicle at which a new station appears.
    pub station_spacing: f32,
    /// Maximum offset between vehicle and station that still counts as docked.
    pub docking_tolerance: f32,
}

impl Default for Physics {
    fn default() -> Self {
        Self {
            acceleration: 8.0,
            brake: 20.0,
            deceleration_divisor: 7.0,
            departure_distance: 30.0,
            station_spacing: 100.0,
            docking_tolerance: 5.0,
        }
    }
}
