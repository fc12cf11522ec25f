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

use std::fs::read_to_string;
use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::error::Fallible;
use crate::types::zone::Zone;

/// Queue policy. Read-only to the scheduler.
#[derive(Clone, PartialEq, Debug, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// When off, the fixed default quotas apply every day.
    pub weekend_learner_mode: bool,
    pub weekday_new_cards: usize,
    pub weekend_new_cards: usize,
    pub weekday_review_cards: usize,
    pub weekend_review_cards: usize,
    pub prioritize_starred: bool,
    /// Cards to learn per week, for progress reporting only.
    pub weekly_card_target: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            weekend_learner_mode: false,
            weekday_new_cards: 5,
            weekend_new_cards: 15,
            weekday_review_cards: 20,
            weekend_review_cards: 50,
            prioritize_starred: true,
            weekly_card_target: 50,
        }
    }
}

/// The contents of a collection's `spacedeck.toml`.
#[derive(Clone, PartialEq, Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Zone used for day boundaries: weekend detection and daily stats.
    pub timezone: Zone,
    pub scheduler: Settings,
}

impl Config {
    pub fn parse(text: &str) -> Fallible<Self> {
        let config: Config = toml::from_str(text)?;
        Ok(config)
    }

    /// Loads the configuration file, falling back to the defaults if it does
    /// not exist.
    pub fn load(path: &Path) -> Fallible<Self> {
        if !path.exists() {
            log::debug!("No configuration at {}, using defaults.", path.display());
            return Ok(Config::default());
        }
        let text = read_to_string(path)?;
        let config = Config::parse(&text)?;
        log::debug!("Loaded configuration from {}.", path.display());
        Ok(config)
    }
}
