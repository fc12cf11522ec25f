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

use serde::Serialize;

use crate::types::card::CardId;
use crate::types::quality::Quality;
use crate::types::timestamp::Timestamp;

/// One rating action. Written once, never updated.
#[derive(Clone, PartialEq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewLog {
    pub card_id: CardId,
    pub quality: Quality,
    pub reviewed_at: Timestamp,
    pub previous_interval: u32,
    pub new_interval: u32,
}

impl ReviewLog {
    /// Whether this review moved the card out of the unscheduled state.
    pub fn is_learned(&self) -> bool {
        self.previous_interval == 0 && self.new_interval > 0
    }

    pub fn is_correct(&self) -> bool {
        !self.quality.is_lapse()
    }
}
