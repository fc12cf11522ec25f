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

use clap::ValueEnum;
use serde::Serialize;

use crate::classify::CardStatus;
use crate::classify::active_cards;
use crate::classify::due_count;
use crate::classify::new_count;
use crate::classify::status;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::stats::DailyStats;
use crate::stats::WeeklyProgress;
use crate::stats::daily_stats;
use crate::stats::weekly_progress;
use crate::store::Store;
use crate::types::card::Card;
use crate::types::timestamp::Timestamp;

#[derive(ValueEnum, Clone)]
pub enum StatsFormat {
    /// Plain text output.
    Text,
    /// JSON output.
    Json,
}

impl Display for StatsFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StatsFormat::Text => write!(f, "text"),
            StatsFormat::Json => write!(f, "json"),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    card_count: usize,
    active_count: usize,
    due_count: usize,
    new_count: usize,
    learning_count: usize,
    review_count: usize,
    graduated_count: usize,
    daily: Vec<DailyStats>,
    weekly: WeeklyProgress,
}

pub fn print_stats(
    coll: &Collection,
    days: u32,
    format: StatsFormat,
    now: Timestamp,
) -> Fallible<()> {
    let cards = coll.store.cards(None)?;
    let reviews = coll.store.reviews(None)?;
    let zone = coll.config.timezone;
    let stats = Stats {
        daily: daily_stats(&reviews, days, zone, now),
        weekly: weekly_progress(&reviews, &coll.config.scheduler, zone, now)?,
        ..card_counts(&cards, now)
    };
    match format {
        StatsFormat::Text => print_text(&stats),
        StatsFormat::Json => {
            let stats_json = serde_json::to_string_pretty(&stats)?;
            println!("{}", stats_json);
        }
    }
    Ok(())
}

/// Card counts, with empty history.
fn card_counts(cards: &[Card], now: Timestamp) -> Stats {
    let count = |wanted: CardStatus| {
        active_cards(cards)
            .filter(|card| status(card) == wanted)
            .count()
    };
    Stats {
        card_count: cards.len(),
        active_count: active_cards(cards).count(),
        due_count: due_count(cards, now),
        new_count: new_count(cards),
        learning_count: count(CardStatus::Learning),
        review_count: count(CardStatus::Review),
        graduated_count: count(CardStatus::Graduated),
        daily: Vec::new(),
        weekly: WeeklyProgress {
            cards_learned: 0,
            target: 0,
            days_remaining: 0,
        },
    }
}

fn print_text(stats: &Stats) {
    println!(
        "Cards: {} ({} active, {} due, {} new)",
        stats.card_count, stats.active_count, stats.due_count, stats.new_count
    );
    println!(
        "Learning: {}, review: {}, graduated: {}",
        stats.learning_count, stats.review_count, stats.graduated_count
    );
    println!(
        "This week: {}/{} cards learned, {} days left",
        stats.weekly.cards_learned, stats.weekly.target, stats.weekly.days_remaining
    );
    for day in &stats.daily {
        println!(
            "{}  reviewed {:>3}  learned {:>3}  correct {:>3}/{}",
            day.date, day.cards_reviewed, day.cards_learned, day.correct_answers, day.total_answers
        );
    }
}
