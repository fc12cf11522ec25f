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

use rusqlite::ToSql;
use rusqlite::types::FromSql;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Serialize;

use crate::types::timestamp::Timestamp;

/// The ease factor every card starts with.
pub const INITIAL_EASE: f64 = 2.5;

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
pub struct CardId(i64);

impl CardId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    pub fn value(self) -> i64 {
        self.0
    }
}

impl Display for CardId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl ToSql for CardId {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for CardId {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let id: i64 = FromSql::column_result(value)?;
        Ok(CardId(id))
    }
}

/// The scheduling state of a card. Only a rating action may change it.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    /// Multiplier for interval growth. Never below 1.3.
    pub ease_factor: f64,
    /// Days until the next review.
    pub interval: u32,
    /// Consecutive successful reviews since the last lapse.
    pub repetitions: u32,
    pub next_review_date: Timestamp,
    /// Absent until the card is reviewed for the first time.
    pub last_review_date: Option<Timestamp>,
}

impl Schedule {
    /// The state of a card that has never been studied.
    pub fn new(now: Timestamp) -> Self {
        Self {
            ease_factor: INITIAL_EASE,
            interval: 0,
            repetitions: 0,
            next_review_date: now,
            last_review_date: None,
        }
    }
}

/// The user-editable text of a card.
#[derive(Clone, PartialEq, Debug, Default, Serialize)]
pub struct CardContent {
    pub front: String,
    pub back: String,
    pub sentence: String,
    pub association: String,
}

impl CardContent {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            front: front.into().trim().to_string(),
            back: back.into().trim().to_string(),
            sentence: String::new(),
            association: String::new(),
        }
    }
}

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    pub id: CardId,
    pub deck_name: String,
    pub content: CardContent,
    pub is_starred: bool,
    /// Inactive cards stay in storage but are left out of study.
    pub is_active: bool,
    pub schedule: Schedule,
    pub created_at: Timestamp,
}

/// What a caller supplies to create a card.
pub struct NewCard {
    pub deck_name: String,
    pub content: CardContent,
    pub is_starred: bool,
}

impl NewCard {
    pub fn new(deck_name: impl Into<String>, content: CardContent) -> Self {
        Self {
            deck_name: deck_name.into(),
            content,
            is_starred: false,
        }
    }

    pub fn into_card(self, id: CardId, now: Timestamp) -> Card {
        Card {
            id,
            deck_name: self.deck_name,
            content: self.content,
            is_starred: self.is_starred,
            is_active: true,
            schedule: Schedule::new(now),
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_schedule() {
        let now = Timestamp::now();
        let schedule = Schedule::new(now);
        assert_eq!(schedule.ease_factor, 2.5);
        assert_eq!(schedule.interval, 0);
        assert_eq!(schedule.repetitions, 0);
        assert_eq!(schedule.next_review_date, now);
        assert_eq!(schedule.last_review_date, None);
    }

    #[test]
    fn test_content_is_trimmed() {
        let content = CardContent::new("  barev  ", "\thello\n");
        assert_eq!(content.front, "barev");
        assert_eq!(content.back, "hello");
    }

    #[test]
    fn test_new_card_is_active() {
        let now = Timestamp::now();
        let card =
            NewCard::new("Armenian", CardContent::new("a", "b")).into_card(CardId::new(7), now);
        assert!(card.is_active);
        assert!(!card.is_starred);
        assert_eq!(card.schedule, Schedule::new(now));
    }
}
