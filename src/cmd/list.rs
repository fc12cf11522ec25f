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

use crate::classify::active_cards;
use crate::classify::classify;
use crate::classify::days_until_review;
use crate::classify::due_count;
use crate::classify::format_interval;
use crate::classify::new_count;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::queue::build_queue;
use crate::store::Store;
use crate::types::card::Card;
use crate::types::timestamp::Timestamp;

pub fn list_cards(coll: &Collection, deck: Option<&str>, now: Timestamp) -> Fallible<()> {
    let cards = coll.store.cards(deck)?;
    for card in &cards {
        println!("{}", card_line(card, now));
    }
    println!(
        "{} cards, {} due, {} new.",
        cards.len(),
        due_count(&cards, now),
        new_count(&cards)
    );
    Ok(())
}

pub fn print_queue(coll: &Collection, deck: Option<&str>, now: Timestamp) -> Fallible<()> {
    let cards = coll.store.cards(deck)?;
    let queue = build_queue(&cards, &coll.config.scheduler, coll.config.timezone, now);
    if queue.is_empty() {
        println!("No cards to review.");
        return Ok(());
    }
    for card in &queue {
        println!("{}", card_line(card, now));
    }
    Ok(())
}

/// Card counts for one deck.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct DeckSummary {
    pub name: String,
    pub card_count: usize,
    pub due_count: usize,
    pub new_count: usize,
    pub starred_count: usize,
}

impl DeckSummary {
    /// Whether a review session over this deck would have anything to show.
    pub fn has_work(&self) -> bool {
        self.due_count > 0 || self.new_count > 0
    }
}

/// One summary per deck, by name. Due, new and starred counts only include
/// active cards.
pub fn deck_summaries(cards: &[Card], now: Timestamp) -> Vec<DeckSummary> {
    let mut decks: BTreeMap<&str, Vec<Card>> = BTreeMap::new();
    for card in cards {
        decks.entry(card.deck_name.as_str()).or_default().push(card.clone());
    }
    decks
        .into_iter()
        .map(|(name, cards)| DeckSummary {
            name: name.to_string(),
            card_count: cards.len(),
            due_count: due_count(&cards, now),
            new_count: new_count(&cards),
            starred_count: active_cards(&cards).filter(|card| card.is_starred).count(),
        })
        .collect()
}

pub fn list_decks(coll: &Collection, now: Timestamp) -> Fallible<()> {
    let cards = coll.store.cards(None)?;
    let decks = deck_summaries(&cards, now);
    if decks.is_empty() {
        println!("No decks yet. Add a card to create one.");
        return Ok(());
    }
    for deck in &decks {
        println!("{}", deck_line(deck));
    }
    Ok(())
}

fn deck_line(deck: &DeckSummary) -> String {
    let mut line = format!("{}: {} cards", deck.name, deck.card_count);
    if deck.due_count > 0 {
        line.push_str(&format!(", {} due", deck.due_count));
    }
    if deck.new_count > 0 {
        line.push_str(&format!(", {} new", deck.new_count));
    }
    if deck.starred_count > 0 {
        line.push_str(&format!(", {} starred", deck.starred_count));
    }
    if !deck.has_work() {
        line.push_str(" (nothing to review)");
    }
    line
}

/// One line per card: id, star, status, deck, front, and when it is due.
fn card_line(card: &Card, now: Timestamp) -> String {
    let c = classify(card, now);
    let star = if card.is_starred { "*" } else { " " };
    let due = if !card.is_active {
        "inactive".to_string()
    } else if c.is_due {
        "due".to_string()
    } else {
        let days = days_until_review(card, now).max(0) as u32;
        format!("in {}", format_interval(days))
    };
    format!(
        "{:>5} {star} {:<9} [{}] {} ({due})",
        card.id.to_string(),
        c.status.to_string(),
        card.deck_name,
        card.content.front
    )
}
