// Local countdown clock. The server does not keep time: the clock exists only to end local
// interaction when a side runs out, and to show the remaining time.

use std::fmt;
use std::time::Duration;

use enum_map::{Enum, EnumMap, enum_map};
use instant::Instant;
use serde::{Deserialize, Serialize};
use strum::EnumIter;


pub const TICK: Duration = Duration::from_secs(1);

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TimeControl {
    // Whole seconds; sub-second part is ignored.
    #[serde(with = "humantime_serde")]
    pub starting_time: Duration,
}

impl Default for TimeControl {
    fn default() -> Self { TimeControl { starting_time: Duration::from_secs(10 * 60) } }
}

impl fmt::Display for TimeControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", secs_to_mss(self.starting_time.as_secs()))
    }
}

pub fn secs_to_mss(s: u64) -> String { format!("{}:{:02}", s / 60, s % 60) }

// Counters are kept from the local player's point of view rather than per color: the player may
// pick either color, and only the relation to the side to move matters.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Enum, EnumIter)]
pub enum ClockSide {
    Player,
    Opponent,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Clock {
    control: TimeControl,
    remaining_secs: EnumMap<ClockSide, u32>,
    // Deadline of the next tick. `None` when the clock is stopped.
    next_tick_at: Option<Instant>,
    // Set once the game is over. A frozen clock ignores `start` until `reset`.
    frozen: bool,
}

impl Clock {
    pub fn new(control: TimeControl) -> Self {
        let starting_secs = starting_secs(&control);
        Clock {
            control,
            remaining_secs: enum_map! { _ => starting_secs },
            next_tick_at: None,
            frozen: false,
        }
    }

    pub fn control(&self) -> &TimeControl { &self.control }
    pub fn remaining_secs(&self, side: ClockSide) -> u32 { self.remaining_secs[side] }
    pub fn is_running(&self) -> bool { self.next_tick_at.is_some() }
    pub fn is_frozen(&self) -> bool { self.frozen }
    pub fn next_tick_at(&self) -> Option<Instant> { self.next_tick_at }

    pub fn showing(&self, side: ClockSide) -> String {
        secs_to_mss(self.remaining_secs[side].into())
    }

    // Full allotment for both sides, stopped, unfrozen.
    pub fn reset(&mut self) {
        let starting_secs = starting_secs(&self.control);
        self.remaining_secs = enum_map! { _ => starting_secs };
        self.next_tick_at = None;
        self.frozen = false;
    }

    // Schedules the next tick one interval from `now`, replacing any pending tick.
    pub fn start(&mut self, now: Instant) {
        if self.frozen {
            return;
        }
        self.next_tick_at = Some(now + TICK);
    }

    pub fn stop(&mut self) { self.next_tick_at = None; }

    pub fn freeze(&mut self) {
        self.stop();
        self.frozen = true;
    }

    // Performs every tick whose deadline has passed, charging each one to `side`. Returns `true`
    // if this call made `side` run out of time; the clock is frozen in that case.
    pub fn advance(&mut self, now: Instant, side: ClockSide) -> bool {
        loop {
            let deadline = match self.next_tick_at {
                Some(t) if t <= now => t,
                _ => return false,
            };
            let remaining = &mut self.remaining_secs[side];
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                self.freeze();
                return true;
            }
            self.next_tick_at = Some(deadline + TICK);
        }
    }
}

fn starting_secs(control: &TimeControl) -> u32 {
    control.starting_time.as_secs().try_into().unwrap_or(u32::MAX)
}
