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

//! Daily review queue construction.

use std::cmp::Ordering;

use crate::classify::active_cards;
use crate::classify::is_due;
use crate::classify::is_new;
use crate::config::Settings;
use crate::types::card::Card;
use crate::types::timestamp::Timestamp;
use crate::types::zone::Zone;

/// New cards per session when weekend learner mode is off.
pub const DEFAULT_MAX_NEW: usize = 10;

/// Reviews per session when weekend learner mode is off.
pub const DEFAULT_MAX_REVIEW: usize = 50;

/// How many cards of each kind a session may contain.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Quotas {
    pub max_new: usize,
    pub max_review: usize,
}

impl Quotas {
    /// The quotas in effect at `now`. The weekend is Saturday and Sunday as
    /// seen from `zone`.
    pub fn for_day(settings: &Settings, zone: Zone, now: Timestamp) -> Self {
        if !settings.weekend_learner_mode {
            return Quotas {
                max_new: DEFAULT_MAX_NEW,
                max_review: DEFAULT_MAX_REVIEW,
            };
        }
        if zone.is_weekend(now) {
            Quotas {
                max_new: settings.weekend_new_cards,
                max_review: settings.weekend_review_cards,
            }
        } else {
            Quotas {
                max_new: settings.weekday_new_cards,
                max_review: settings.weekday_review_cards,
            }
        }
    }
}

/// Starred cards first (if enabled), then earliest due first. Anything equal
/// under both keys keeps its input order.
pub fn sort_by_priority(cards: &mut [Card], prioritize_starred: bool) {
    cards.sort_by(|a, b| {
        let starred = if prioritize_starred {
            b.is_starred.cmp(&a.is_starred)
        } else {
            Ordering::Equal
        };
        starred.then_with(|| {
            a.schedule
                .next_review_date
                .cmp(&b.schedule.next_review_date)
        })
    });
}

/// Build the study queue for a session starting at `now`: due cards, then
/// new cards that are not yet due, each sorted by priority and cut to its
/// quota.
pub fn build_queue(cards: &[Card], settings: &Settings, zone: Zone, now: Timestamp) -> Vec<Card> {
    let mut due: Vec<Card> = Vec::new();
    let mut fresh: Vec<Card> = Vec::new();
    for card in active_cards(cards) {
        if is_due(card, now) {
            due.push(card.clone());
        } else if is_new(card) {
            fresh.push(card.clone());
        }
    }
    let quotas = Quotas::for_day(settings, zone, now);
    log::debug!(
        "{} due and {} new cards; quotas are {} reviews and {} new.",
        due.len(),
        fresh.len(),
        quotas.max_review,
        quotas.max_new
    );

    sort_by_priority(&mut due, settings.prioritize_starred);
    sort_by_priority(&mut fresh, settings.prioritize_starred);
    due.truncate(quotas.max_review);
    fresh.truncate(quotas.max_new);

    due.extend(fresh);
    due
}
