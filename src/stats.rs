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

use chrono::Datelike;
use serde::Serialize;

use crate::config::Settings;
use crate::error::Fallible;
use crate::types::date::Date;
use crate::types::review::ReviewLog;
use crate::types::timestamp::Timestamp;
use crate::types::zone::Zone;

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub date: Date,
    pub cards_reviewed: usize,
    pub cards_learned: usize,
    pub correct_answers: usize,
    pub total_answers: usize,
}

impl DailyStats {
    fn empty(date: Date) -> Self {
        Self {
            date,
            cards_reviewed: 0,
            cards_learned: 0,
            correct_answers: 0,
            total_answers: 0,
        }
    }
}

#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyProgress {
    pub cards_learned: usize,
    pub target: usize,
    pub days_remaining: u32,
}

/// Per-day counts for the `days` days ending today, oldest first. Reviews
/// outside that window are ignored.
pub fn daily_stats(
    reviews: &[ReviewLog],
    days: u32,
    zone: Zone,
    now: Timestamp,
) -> Vec<DailyStats> {
    let today = zone.date(now);
    let mut stats: BTreeMap<Date, DailyStats> = (0..days)
        .map(|i| today.minus_days(i))
        .map(|date| (date, DailyStats::empty(date)))
        .collect();
    for review in reviews {
        if let Some(day) = stats.get_mut(&zone.date(review.reviewed_at)) {
            day.cards_reviewed += 1;
            day.total_answers += 1;
            if review.is_correct() {
                day.correct_answers += 1;
            }
            if review.is_learned() {
                day.cards_learned += 1;
            }
        }
    }
    stats.into_values().collect()
}

/// Cards learned since the start of the week. Weeks start on Sunday.
pub fn weekly_progress(
    reviews: &[ReviewLog],
    settings: &Settings,
    zone: Zone,
    now: Timestamp,
) -> Fallible<WeeklyProgress> {
    let today = zone.date(now);
    let days_since_sunday = today.into_inner().weekday().num_days_from_sunday();
    let week_start = zone.start_of_day(today.minus_days(days_since_sunday))?;
    let cards_learned = reviews
        .iter()
        .filter(|review| review.reviewed_at >= week_start && review.is_learned())
        .count();
    Ok(WeeklyProgress {
        cards_learned,
        target: settings.weekly_card_target,
        days_remaining: 7 - days_since_sunday,
    })
}
