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

use std::fmt::Display;
use std::fmt::Formatter;

use serde::Serialize;

use crate::types::card::Card;
use crate::types::timestamp::Timestamp;

/// Repetitions at which a card stops being "learning".
const LEARNED_REPETITIONS: u32 = 3;

/// Interval (days) at which a reviewed card counts as graduated.
const GRADUATED_INTERVAL: u32 = 21;

/// A display label. The scheduler never branches on it.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CardStatus {
    New,
    Learning,
    Review,
    Graduated,
}

impl Display for CardStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CardStatus::New => write!(f, "new"),
            CardStatus::Learning => write!(f, "learning"),
            CardStatus::Review => write!(f, "review"),
            CardStatus::Graduated => write!(f, "graduated"),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub is_new: bool,
    pub is_due: bool,
    pub status: CardStatus,
}

/// A card is new if it has never been reviewed. A card that lapsed back to
/// zero repetitions still has a last review date, so it is not new.
pub fn is_new(card: &Card) -> bool {
    card.schedule.repetitions == 0 && card.schedule.last_review_date.is_none()
}

/// Independent of `is_new`: a freshly created card is both.
pub fn is_due(card: &Card, now: Timestamp) -> bool {
    card.schedule.next_review_date <= now
}

pub fn status(card: &Card) -> CardStatus {
    if is_new(card) {
        CardStatus::New
    } else if card.schedule.repetitions < LEARNED_REPETITIONS {
        CardStatus::Learning
    } else if card.schedule.interval >= GRADUATED_INTERVAL {
        CardStatus::Graduated
    } else {
        CardStatus::Review
    }
}

pub fn classify(card: &Card, now: Timestamp) -> Classification {
    Classification {
        is_new: is_new(card),
        is_due: is_due(card, now),
        status: status(card),
    }
}

/// The cards that take part in study. Every due/new count and every queue
/// starts from this.
pub fn active_cards(cards: &[Card]) -> impl Iterator<Item = &Card> {
    cards.iter().filter(|card| card.is_active)
}

/// Number of active cards due at `now`.
pub fn due_count(cards: &[Card], now: Timestamp) -> usize {
    active_cards(cards).filter(|card| is_due(card, now)).count()
}

/// Number of active cards never reviewed.
pub fn new_count(cards: &[Card]) -> usize {
    active_cards(cards).filter(|card| is_new(card)).count()
}

/// Whole days until the card is due, rounded up. Zero or negative means due.
pub fn days_until_review(card: &Card, now: Timestamp) -> i64 {
    let diff = card.schedule.next_review_date.into_inner() - now.into_inner();
    let millis = diff.num_milliseconds();
    let day = 24 * 60 * 60 * 1000;
    millis.div_euclid(day) + i64::from(millis.rem_euclid(day) != 0)
}

/// A short human-readable rendering of an interval in days.
pub fn format_interval(days: u32) -> String {
    fn plural(n: u32, unit: &str) -> String {
        if n == 1 {
            format!("1 {unit}")
        } else {
            format!("{n} {unit}s")
        }
    }
    let scaled = |unit: f64| (f64::from(days) / unit).round() as u32;
    match days {
        0 => "Now".to_string(),
        1..7 => plural(days, "day"),
        7..30 => plural(scaled(7.0), "week"),
        30..365 => plural(scaled(30.0), "month"),
        _ => plural(scaled(365.0), "year"),
    }
}
