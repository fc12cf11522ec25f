// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The SM-2 recurrence.
//!
//! Given a card's current ease, interval and repetition streak, and a quality
//! rating, compute the card's next scheduling state. Everything here is pure:
//! the current time is an argument.

use crate::types::card::Schedule;
use crate::types::quality::Quality;
use crate::types::timestamp::Timestamp;

/// The ease factor never drops below this.
pub const MIN_EASE: f64 = 1.3;

/// Interval (days) assigned after a lapse. The card comes back tomorrow, so a
/// lapsed card is never re-queued within the same day.
pub const LAPSE_INTERVAL: u32 = 1;

/// Interval after the first successful review.
const FIRST_INTERVAL: u32 = 1;

/// Interval after the second consecutive successful review.
const SECOND_INTERVAL: u32 = 6;

/// The numeric part of a scheduling state.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Parameters {
    pub ease_factor: f64,
    pub interval: u32,
    pub repetitions: u32,
}

impl From<&Schedule> for Parameters {
    fn from(schedule: &Schedule) -> Self {
        Self {
            ease_factor: schedule.ease_factor,
            interval: schedule.interval,
            repetitions: schedule.repetitions,
        }
    }
}

pub fn next_parameters(current: Parameters, quality: Quality) -> Parameters {
    let Parameters {
        ease_factor,
        interval,
        repetitions,
    } = current;
    let (interval, repetitions) = if quality.is_lapse() {
        (LAPSE_INTERVAL, 0)
    } else {
        let interval = match repetitions {
            0 => FIRST_INTERVAL,
            1 => SECOND_INTERVAL,
            _ => (f64::from(interval) * ease_factor).round() as u32,
        };
        (interval, repetitions + 1)
    };
    Parameters {
        ease_factor: round_ease(next_ease(ease_factor, quality)),
        interval,
        repetitions,
    }
}

/// The ease update. Applied on lapses too, always from the raw rating.
pub fn next_ease(ease_factor: f64, quality: Quality) -> f64 {
    let q = f64::from(quality.value());
    let ease = ease_factor + (0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02));
    ease.max(MIN_EASE)
}

/// Ease is stored to two decimals, and the stored value is what the next
/// review starts from.
fn round_ease(ease: f64) -> f64 {
    (ease * 100.0).round() / 100.0
}

/// Compute the schedule that results from rating a card at `now`.
pub fn calculate_next_state(current: &Schedule, quality: Quality, now: Timestamp) -> Schedule {
    let next = next_parameters(Parameters::from(current), quality);
    Schedule {
        ease_factor: next.ease_factor,
        interval: next.interval,
        repetitions: next.repetitions,
        next_review_date: now.plus_days(next.interval),
        last_review_date: Some(now),
    }
}
