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

//! Persistence for cards and the review log.
//!
//! The scheduler never talks to storage. Callers load cards through a
//! [`Store`], hand them to the pure scheduling functions, and write the
//! results back with [`Store::record_review`].

pub mod memory;
pub mod sqlite;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::types::card::Card;
use crate::types::card::CardContent;
use crate::types::card::CardId;
use crate::types::card::NewCard;
use crate::types::card::Schedule;
use crate::types::review::ReviewLog;
use crate::types::timestamp::Timestamp;

pub trait Store {
    /// Insert a card in the new state and return it.
    fn add_card(&self, card: NewCard, now: Timestamp) -> Fallible<Card>;

    fn get_card(&self, id: CardId) -> Fallible<Option<Card>>;

    /// All cards, oldest first, optionally restricted to one deck. Inactive
    /// cards are included.
    fn cards(&self, deck_name: Option<&str>) -> Fallible<Vec<Card>>;

    /// Replace a card's text. The schedule is left untouched.
    fn update_content(&self, id: CardId, content: &CardContent) -> Fallible<()>;

    fn set_starred(&self, id: CardId, starred: bool) -> Fallible<()>;

    fn set_active(&self, id: CardId, active: bool) -> Fallible<()>;

    /// Remove a card and its review history.
    fn delete_card(&self, id: CardId) -> Fallible<()>;

    /// Replace the schedule of `log.card_id` with `next` and append `log`, as
    /// one unit. Fails without writing anything if the stored schedule is no
    /// longer `expected`.
    fn record_review(&self, expected: &Schedule, next: &Schedule, log: &ReviewLog)
    -> Fallible<()>;

    /// The review log in the order reviews happened, optionally for one card.
    fn reviews(&self, card_id: Option<CardId>) -> Fallible<Vec<ReviewLog>>;
}

pub fn not_found(id: CardId) -> ErrorReport {
    ErrorReport::new(&format!("card {id} not found."))
}

pub fn conflict(id: CardId) -> ErrorReport {
    ErrorReport::new(&format!(
        "card {id} was changed by another review; reload it and try again."
    ))
}
