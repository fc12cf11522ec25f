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
use rusqlite::types::FromSqlError;
use rusqlite::types::FromSqlResult;
use rusqlite::types::ToSqlOutput;
use rusqlite::types::ValueRef;
use serde::Serialize;

use crate::error::ErrorReport;
use crate::error::fail;

/// A self-reported recall rating. Only the values 0 through 5 can be
/// constructed, so the scheduler never sees an out-of-range rating.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct Quality(u8);

impl Quality {
    pub const AGAIN: Quality = Quality(1);
    pub const HARD: Quality = Quality(2);
    pub const GOOD: Quality = Quality(4);
    pub const EASY: Quality = Quality(5);

    /// The lowest rating that counts as a successful recall.
    pub const PASSING: u8 = 3;

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_lapse(self) -> bool {
        self.0 < Self::PASSING
    }

    pub fn label(self) -> &'static str {
        match self.0 {
            0 => "Complete blackout",
            1 => "Incorrect, but recognized",
            2 => "Incorrect, but easy to recall",
            3 => "Hard",
            4 => "Good",
            _ => "Easy",
        }
    }

    pub fn all() -> impl Iterator<Item = Quality> {
        (0..=5).map(Quality)
    }
}

impl TryFrom<i64> for Quality {
    type Error = ErrorReport;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0..=5 => Ok(Quality(value as u8)),
            _ => fail(format!("quality must be an integer 0-5, got {value}")),
        }
    }
}

impl TryFrom<&str> for Quality {
    type Error = ErrorReport;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().parse::<i64>() {
            Ok(n) => Quality::try_from(n),
            Err(_) => fail(format!("quality must be an integer 0-5, got '{value}'")),
        }
    }
}

impl Display for Quality {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Quality {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl ToSql for Quality {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.0))
    }
}

impl FromSql for Quality {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let n: i64 = FromSql::column_result(value)?;
        Quality::try_from(n).map_err(|e| FromSqlError::Other(Box::new(e)))
    }
}
