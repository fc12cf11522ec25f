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

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;

use rusqlite::Connection;
use rusqlite::OptionalExtension;
use rusqlite::Row;
use rusqlite::Transaction;
use rusqlite::config::DbConfig;

use crate::error::Fallible;
use crate::store::Store;
use crate::store::conflict;
use crate::store::not_found;
use crate::types::card::Card;
use crate::types::card::CardContent;
use crate::types::card::CardId;
use crate::types::card::NewCard;
use crate::types::card::Schedule;
use crate::types::review::ReviewLog;
use crate::types::timestamp::Timestamp;

const CARD_COLUMNS: &str = "card_id, deck_name, front, back, sentence, association, is_starred, is_active, ease_factor, interval, repetitions, next_review_date, last_review_date, created_at";

#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    pub fn new(database_path: &str) -> Fallible<Self> {
        let conn = Connection::open(database_path)?;
        Self::from_connection(conn)
    }

    pub fn in_memory() -> Fallible<Self> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(mut conn: Connection) -> Fallible<Self> {
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_ENABLE_FKEY, true)?;
        {
            let tx = conn.transaction()?;
            if !probe_schema_exists(&tx)? {
                log::debug!("Creating database schema.");
                tx.execute_batch(include_str!("schema.sql"))?;
                tx.commit()?;
            }
        }
        let conn = Arc::new(Mutex::new(conn));
        Ok(Self { conn })
    }

    fn acquire(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    /// Run a statement that must touch exactly one card.
    fn update_one(&self, id: CardId, sql: &str, params: impl rusqlite::Params) -> Fallible<()> {
        let conn = self.acquire();
        let changed = conn.execute(sql, params)?;
        if changed == 0 {
            return Err(not_found(id));
        }
        Ok(())
    }
}

impl Store for SqliteStore {
    fn add_card(&self, card: NewCard, now: Timestamp) -> Fallible<Card> {
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        let schedule = Schedule::new(now);
        let sql = "insert into cards (deck_name, front, back, sentence, association, is_starred, is_active, ease_factor, interval, repetitions, next_review_date, last_review_date, created_at) values (?, ?, ?, ?, ?, ?, 1, ?, ?, ?, ?, ?, ?) returning card_id;";
        let id: CardId = tx.query_row(
            sql,
            rusqlite::params![
                card.deck_name,
                card.content.front,
                card.content.back,
                card.content.sentence,
                card.content.association,
                card.is_starred,
                schedule.ease_factor,
                schedule.interval,
                schedule.repetitions,
                schedule.next_review_date,
                schedule.last_review_date,
                now,
            ],
            |row| row.get(0),
        )?;
        tx.commit()?;
        log::debug!("Added card {id} to deck '{}'.", card.deck_name);
        Ok(card.into_card(id, now))
    }

    fn get_card(&self, id: CardId) -> Fallible<Option<Card>> {
        let conn = self.acquire();
        select_card(&conn, id)
    }

    fn cards(&self, deck_name: Option<&str>) -> Fallible<Vec<Card>> {
        let conn = self.acquire();
        let sql = format!(
            "select {CARD_COLUMNS} from cards where ?1 is null or deck_name = ?1 order by card_id;"
        );
        let mut stmt = conn.prepare(&sql)?;
        let mut rows = stmt.query([deck_name])?;
        let mut cards = Vec::new();
        while let Some(row) = rows.next()? {
            cards.push(card_from_row(row)?);
        }
        Ok(cards)
    }

    fn update_content(&self, id: CardId, content: &CardContent) -> Fallible<()> {
        self.update_one(
            id,
            "update cards set front = ?, back = ?, sentence = ?, association = ? where card_id = ?;",
            (
                &content.front,
                &content.back,
                &content.sentence,
                &content.association,
                id,
            ),
        )
    }

    fn set_starred(&self, id: CardId, starred: bool) -> Fallible<()> {
        self.update_one(
            id,
            "update cards set is_starred = ? where card_id = ?;",
            (starred, id),
        )
    }

    fn set_active(&self, id: CardId, active: bool) -> Fallible<()> {
        self.update_one(
            id,
            "update cards set is_active = ? where card_id = ?;",
            (active, id),
        )
    }

    fn delete_card(&self, id: CardId) -> Fallible<()> {
        // Reviews go with the card through the foreign key cascade.
        self.update_one(id, "delete from cards where card_id = ?;", [id])
    }

    fn record_review(
        &self,
        expected: &Schedule,
        next: &Schedule,
        log: &ReviewLog,
    ) -> Fallible<()> {
        let mut conn = self.acquire();
        let tx = conn.transaction()?;
        let current = match select_card(&tx, log.card_id)? {
            Some(card) => card.schedule,
            None => return Err(not_found(log.card_id)),
        };
        if current != *expected {
            // Dropping the transaction rolls it back.
            return Err(conflict(log.card_id));
        }
        update_schedule(&tx, log.card_id, next)?;
        insert_review(&tx, log)?;
        tx.commit()?;
        Ok(())
    }

    fn reviews(&self, card_id: Option<CardId>) -> Fallible<Vec<ReviewLog>> {
        let conn = self.acquire();
        let sql = "select card_id, quality, reviewed_at, previous_interval, new_interval from reviews where ?1 is null or card_id = ?1 order by reviewed_at, review_id;";
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query([card_id])?;
        let mut reviews = Vec::new();
        while let Some(row) = rows.next()? {
            reviews.push(ReviewLog {
                card_id: row.get(0)?,
                quality: row.get(1)?,
                reviewed_at: row.get(2)?,
                previous_interval: row.get(3)?,
                new_interval: row.get(4)?,
            });
        }
        Ok(reviews)
    }
}

fn select_card(conn: &Connection, id: CardId) -> Fallible<Option<Card>> {
    let sql = format!("select {CARD_COLUMNS} from cards where card_id = ?;");
    let card = conn
        .query_row(&sql, [id], |row| Ok(card_from_row(row)))
        .optional()?;
    card.transpose()
}

fn card_from_row(row: &Row) -> Fallible<Card> {
    Ok(Card {
        id: row.get(0)?,
        deck_name: row.get(1)?,
        content: CardContent {
            front: row.get(2)?,
            back: row.get(3)?,
            sentence: row.get(4)?,
            association: row.get(5)?,
        },
        is_starred: row.get(6)?,
        is_active: row.get(7)?,
        schedule: Schedule {
            ease_factor: row.get(8)?,
            interval: row.get(9)?,
            repetitions: row.get(10)?,
            next_review_date: row.get(11)?,
            last_review_date: row.get(12)?,
        },
        created_at: row.get(13)?,
    })
}

fn update_schedule(tx: &Transaction, id: CardId, schedule: &Schedule) -> Fallible<()> {
    let sql = "update cards set ease_factor = ?, interval = ?, repetitions = ?, next_review_date = ?, last_review_date = ? where card_id = ?;";
    tx.execute(
        sql,
        (
            schedule.ease_factor,
            schedule.interval,
            schedule.repetitions,
            &schedule.next_review_date,
            &schedule.last_review_date,
            id,
        ),
    )?;
    Ok(())
}

type ReviewId = i64;

fn insert_review(tx: &Transaction, review: &ReviewLog) -> Fallible<ReviewId> {
    let sql = "insert into reviews (card_id, quality, reviewed_at, previous_interval, new_interval) values (?, ?, ?, ?, ?) returning review_id;";
    let review_id: ReviewId = tx.query_row(
        sql,
        (
            review.card_id,
            review.quality,
            &review.reviewed_at,
            review.previous_interval,
            review.new_interval,
        ),
        |row| row.get(0),
    )?;
    Ok(review_id)
}

fn probe_schema_exists(tx: &Transaction) -> Fallible<bool> {
    let sql = "select count(*) from sqlite_master where type='table' AND name=?;";
    let count: i64 = tx.query_row(sql, ["cards"], |row| row.get(0))?;
    Ok(count > 0)
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;
    use crate::store::contract;
    use crate::types::quality::Quality;

    #[test]
    fn test_add_and_get() -> Fallible<()> {
        contract::add_and_get(&SqliteStore::in_memory()?)
    }

    #[test]
    fn test_cards_by_deck() -> Fallible<()> {
        contract::cards_by_deck(&SqliteStore::in_memory()?)
    }

    #[test]
    fn test_content_edit_keeps_schedule() -> Fallible<()> {
        contract::content_edit_keeps_schedule(&SqliteStore::in_memory()?)
    }

    #[test]
    fn test_flags() -> Fallible<()> {
        contract::flags(&SqliteStore::in_memory()?)
    }

    #[test]
    fn test_missing_card() -> Fallible<()> {
        contract::missing_card(&SqliteStore::in_memory()?)
    }

    #[test]
    fn test_record_review() -> Fallible<()> {
        contract::record_review(&SqliteStore::in_memory()?)
    }

    #[test]
    fn test_stale_review_rejected() -> Fallible<()> {
        contract::stale_review_rejected(&SqliteStore::in_memory()?)
    }

    #[test]
    fn test_review_of_missing_card() -> Fallible<()> {
        contract::review_of_missing_card(&SqliteStore::in_memory()?)
    }

    #[test]
    fn test_delete_card() -> Fallible<()> {
        contract::delete_card(&SqliteStore::in_memory()?)
    }

    #[test]
    fn test_far_future_review() -> Fallible<()> {
        contract::far_future_review(&SqliteStore::in_memory()?)
    }

    #[test]
    fn test_reviews_in_order() -> Fallible<()> {
        contract::reviews_in_order(&SqliteStore::in_memory()?)
    }

    #[test]
    fn test_reopen_preserves_state() -> Fallible<()> {
        let dir = tempdir()?;
        let path = dir.path().join("spacedeck.db");
        let path = path.to_str().unwrap();
        let now = Timestamp::parse("2025-03-01T08:00:00.123456789Z")?;

        let card = {
            let store = SqliteStore::new(path)?;
            let card = NewCard::new("Armenian", CardContent::new("gini", "wine"));
            let card = store.add_card(card, now)?;
            store.set_starred(card.id, true)?;
            card
        };

        let store = SqliteStore::new(path)?;
        let stored = store.get_card(card.id)?.unwrap();
        assert!(stored.is_starred);
        // Sub-second precision survives the text round trip, so optimistic
        // checks against a freshly loaded schedule succeed.
        assert_eq!(stored.schedule, card.schedule);
        assert_eq!(stored.created_at, now);
        Ok(())
    }

    #[test]
    fn test_quality_check_constraint() -> Fallible<()> {
        let store = SqliteStore::in_memory()?;
        let card = store.add_card(
            NewCard::new("Armenian", CardContent::new("hay", "Armenian")),
            Timestamp::now(),
        )?;
        let conn = store.acquire();
        let result = conn.execute(
            "insert into reviews (card_id, quality, reviewed_at, previous_interval, new_interval) values (?, 6, '2025-03-01T00:00:00Z', 0, 1);",
            [card.id],
        );
        assert!(result.is_err());
        drop(conn);
        assert!(store.reviews(None)?.iter().all(|r| r.quality <= Quality::EASY));
        Ok(())
    }
}
