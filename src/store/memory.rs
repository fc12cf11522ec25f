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

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::MutexGuard;

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

/// A process-local store. Nothing survives the process.
pub struct MemoryStore {
    inner: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    next_id: i64,
    cards: BTreeMap<CardId, Card>,
    reviews: Vec<ReviewLog>,
}

impl MemoryState {
    fn card_mut(&mut self, id: CardId) -> Fallible<&mut Card> {
        self.cards.get_mut(&id).ok_or_else(|| not_found(id))
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryState {
                next_id: 1,
                ..MemoryState::default()
            }),
        }
    }

    fn acquire(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Store for MemoryStore {
    fn add_card(&self, card: NewCard, now: Timestamp) -> Fallible<Card> {
        let mut state = self.acquire();
        let id = CardId::new(state.next_id);
        state.next_id += 1;
        let card = card.into_card(id, now);
        state.cards.insert(id, card.clone());
        Ok(card)
    }

    fn get_card(&self, id: CardId) -> Fallible<Option<Card>> {
        Ok(self.acquire().cards.get(&id).cloned())
    }

    fn cards(&self, deck_name: Option<&str>) -> Fallible<Vec<Card>> {
        let state = self.acquire();
        let cards = state
            .cards
            .values()
            .filter(|card| deck_name.is_none_or(|deck| card.deck_name == deck))
            .cloned()
            .collect();
        Ok(cards)
    }

    fn update_content(&self, id: CardId, content: &CardContent) -> Fallible<()> {
        self.acquire().card_mut(id)?.content = content.clone();
        Ok(())
    }

    fn set_starred(&self, id: CardId, starred: bool) -> Fallible<()> {
        self.acquire().card_mut(id)?.is_starred = starred;
        Ok(())
    }

    fn set_active(&self, id: CardId, active: bool) -> Fallible<()> {
        self.acquire().card_mut(id)?.is_active = active;
        Ok(())
    }

    fn delete_card(&self, id: CardId) -> Fallible<()> {
        let mut state = self.acquire();
        if state.cards.remove(&id).is_none() {
            return Err(not_found(id));
        }
        state.reviews.retain(|review| review.card_id != id);
        Ok(())
    }

    fn record_review(
        &self,
        expected: &Schedule,
        next: &Schedule,
        log: &ReviewLog,
    ) -> Fallible<()> {
        let mut state = self.acquire();
        let card = state.card_mut(log.card_id)?;
        if card.schedule != *expected {
            return Err(conflict(log.card_id));
        }
        card.schedule = next.clone();
        state.reviews.push(log.clone());
        Ok(())
    }

    fn reviews(&self, card_id: Option<CardId>) -> Fallible<Vec<ReviewLog>> {
        let state = self.acquire();
        let reviews = state
            .reviews
            .iter()
            .filter(|review| card_id.is_none_or(|id| review.card_id == id))
            .cloned()
            .collect();
        Ok(reviews)
    }
}
