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

//! The rating action and the walk through a study queue.

use crate::error::Fallible;
use crate::error::fail;
use crate::sm2::calculate_next_state;
use crate::store::Store;
use crate::store::not_found;
use crate::types::card::Card;
use crate::types::card::CardId;
use crate::types::quality::Quality;
use crate::types::review::ReviewLog;
use crate::types::timestamp::Timestamp;

/// The outcome of rating a card.
pub struct RatedCard {
    pub card: Card,
    pub log: ReviewLog,
}

/// Rate a card: read its current schedule, compute the next one, and write
/// the card and its review log entry back as one unit. If the card was
/// rated by someone else in between, the store rejects the write.
pub fn rate_card(
    store: &impl Store,
    card_id: CardId,
    quality: Quality,
    now: Timestamp,
) -> Fallible<RatedCard> {
    let mut card = store.get_card(card_id)?.ok_or_else(|| not_found(card_id))?;
    let next = calculate_next_state(&card.schedule, quality, now);
    let log = ReviewLog {
        card_id,
        quality,
        reviewed_at: now,
        previous_interval: card.schedule.interval,
        new_interval: next.interval,
    };
    store.record_review(&card.schedule, &next, &log)?;
    log::debug!(
        "Rated card {card_id} {quality}: interval {} -> {} days, ease {}.",
        log.previous_interval,
        log.new_interval,
        next.ease_factor
    );
    card.schedule = next;
    Ok(RatedCard { card, log })
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum SessionState {
    /// Nothing was due or new when the session began.
    Empty,
    /// A card is waiting to be rated.
    Studying,
    /// Every queued card has been rated.
    Completed,
}

/// A study session over a fixed queue, consumed front to back.
pub struct Session {
    queue: Vec<Card>,
    position: usize,
    correct: usize,
    total: usize,
}

impl Session {
    pub fn new(queue: Vec<Card>) -> Self {
        Self {
            queue,
            position: 0,
            correct: 0,
            total: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        if self.queue.is_empty() {
            SessionState::Empty
        } else if self.position < self.queue.len() {
            SessionState::Studying
        } else {
            SessionState::Completed
        }
    }

    pub fn current(&self) -> Option<&Card> {
        self.queue.get(self.position)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn completed(&self) -> usize {
        self.position
    }

    /// Rate the current card and advance.
    pub fn rate(
        &mut self,
        store: &impl Store,
        quality: Quality,
        now: Timestamp,
    ) -> Fallible<RatedCard> {
        let card_id = match self.current() {
            Some(card) => card.id,
            None => return fail("no card left to rate in this session."),
        };
        let rated = rate_card(store, card_id, quality, now)?;
        self.total += 1;
        if rated.log.is_correct() {
            self.correct += 1;
        }
        self.position += 1;
        Ok(rated)
    }

    /// Percentage of correct ratings, rounded. Zero before any rating.
    pub fn accuracy(&self) -> usize {
        if self.total == 0 {
            return 0;
        }
        ((self.correct as f64 / self.total as f64) * 100.0).round() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::queue::build_queue;
    use crate::store::memory::MemoryStore;
    use crate::types::card::CardContent;
    use crate::types::card::NewCard;
    use crate::types::zone::Zone;

    fn ts(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn store_with_cards(n: usize, now: Timestamp) -> Fallible<MemoryStore> {
        let store = MemoryStore::new();
        for i in 0..n {
            store.add_card(
                NewCard::new("Armenian", CardContent::new(format!("word {i}"), "meaning")),
                now,
            )?;
        }
        Ok(store)
    }

    #[test]
    fn test_rate_card_persists_schedule_and_log() -> Fallible<()> {
        let now = ts("2025-03-05T10:00:00Z");
        let store = store_with_cards(1, now)?;
        let id = store.cards(None)?[0].id;

        let rated = rate_card(&store, id, Quality::GOOD, now)?;
        assert_eq!(rated.card.schedule.interval, 1);
        assert_eq!(rated.card.schedule.repetitions, 1);
        assert_eq!(rated.card.schedule.last_review_date, Some(now));
        assert_eq!(store.get_card(id)?, Some(rated.card.clone()));
        assert_eq!(store.reviews(Some(id))?, vec![rated.log]);
        Ok(())
    }

    #[test]
    fn test_rate_missing_card() -> Fallible<()> {
        let store = MemoryStore::new();
        let result = rate_card(&store, CardId::new(3), Quality::GOOD, Timestamp::now());
        assert_eq!(result.err(), Some(not_found(CardId::new(3))));
        Ok(())
    }

    #[test]
    fn test_repeated_rating_reads_fresh_state() -> Fallible<()> {
        let now = ts("2025-03-05T10:00:00Z");
        let store = store_with_cards(1, now)?;
        let id = store.cards(None)?[0].id;
        rate_card(&store, id, Quality::GOOD, now)?;
        let second = rate_card(&store, id, Quality::GOOD, now.plus_days(1))?;
        assert_eq!(second.log.previous_interval, 1);
        assert_eq!(second.card.schedule.interval, 6);
        assert_eq!(store.reviews(Some(id))?.len(), 2);
        Ok(())
    }

    #[test]
    fn test_empty_session() {
        let session = Session::new(Vec::new());
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.current().is_none());
        assert_eq!(session.accuracy(), 0);
    }

    #[test]
    fn test_full_session() -> Fallible<()> {
        let now = ts("2025-03-05T10:00:00Z");
        let store = store_with_cards(3, now)?;
        let queue = build_queue(&store.cards(None)?, &Settings::default(), Zone::Utc, now);
        let mut session = Session::new(queue);
        assert_eq!(session.len(), 3);
        assert_eq!(session.state(), SessionState::Studying);

        session.rate(&store, Quality::GOOD, now)?;
        session.rate(&store, Quality::AGAIN, now)?;
        session.rate(&store, Quality::EASY, now)?;
        assert_eq!(session.state(), SessionState::Completed);
        assert_eq!(session.completed(), 3);
        assert_eq!(session.accuracy(), 67);
        assert!(session.rate(&store, Quality::GOOD, now).is_err());

        // Nothing is due again until tomorrow, and nothing is new any more.
        let queue = build_queue(&store.cards(None)?, &Settings::default(), Zone::Utc, now);
        assert!(queue.is_empty());
        let tomorrow = now.plus_days(1);
        let queue = build_queue(&store.cards(None)?, &Settings::default(), Zone::Utc, tomorrow);
        assert_eq!(queue.len(), 3);
        Ok(())
    }

    #[test]
    fn test_concurrent_sessions_do_not_lose_ratings() -> Fallible<()> {
        let now = ts("2025-03-05T10:00:00Z");
        let store = store_with_cards(1, now)?;
        let queue = build_queue(&store.cards(None)?, &Settings::default(), Zone::Utc, now);
        let mut a = Session::new(queue.clone());
        let mut b = Session::new(queue);
        a.rate(&store, Quality::GOOD, now)?;
        // The second session re-reads the stored card, so it rates the
        // updated schedule rather than clobbering it.
        let rated = b.rate(&store, Quality::GOOD, now)?;
        assert_eq!(rated.log.previous_interval, 1);
        assert_eq!(rated.card.schedule.repetitions, 2);
        Ok(())
    }
}
