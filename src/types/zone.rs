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

use chrono::DateTime;
use chrono::Datelike;
use chrono::FixedOffset;
use chrono::Local;
use chrono::NaiveDateTime;
use chrono::NaiveTime;
use chrono::TimeZone;
use chrono::Utc;
use chrono::Weekday;
use chrono_tz::Tz;
use serde::Deserialize;

use crate::error::ErrorReport;
use crate::error::Fallible;
use crate::error::fail;
use crate::types::date::Date;
use crate::types::timestamp::Timestamp;

/// The timezone used to decide which calendar day (and so which weekday) an
/// instant falls on.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Zone {
    /// The server's local time.
    #[default]
    Local,
    Utc,
    Fixed(FixedOffset),
    /// An IANA zone such as `Asia/Yerevan`, following its daylight saving
    /// rules.
    Named(Tz),
}

impl Zone {
    pub fn parse(s: &str) -> Fallible<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Zone::Local),
            "utc" | "z" => Ok(Zone::Utc),
            other => {
                if let Ok(offset) = other.parse::<FixedOffset>() {
                    return Ok(Zone::Fixed(offset));
                }
                match s.trim().parse::<Tz>() {
                    Ok(tz) => Ok(Zone::Named(tz)),
                    Err(_) => fail(format!(
                        "invalid timezone '{s}': expected 'local', 'utc', an offset like \
                         '+04:00', or a name like 'Asia/Yerevan'"
                    )),
                }
            }
        }
    }

    pub fn date(self, ts: Timestamp) -> Date {
        let ts = ts.into_inner();
        let naive = match self {
            Zone::Local => ts.with_timezone(&Local).date_naive(),
            Zone::Utc => ts.date_naive(),
            Zone::Fixed(offset) => ts.with_timezone(&offset).date_naive(),
            Zone::Named(tz) => ts.with_timezone(&tz).date_naive(),
        };
        Date::new(naive)
    }

    pub fn weekday(self, ts: Timestamp) -> Weekday {
        self.date(ts).into_inner().weekday()
    }

    pub fn is_weekend(self, ts: Timestamp) -> bool {
        matches!(self.weekday(ts), Weekday::Sat | Weekday::Sun)
    }

    /// The first instant of the given day in this zone.
    pub fn start_of_day(self, date: Date) -> Fallible<Timestamp> {
        let naive = NaiveDateTime::new(date.into_inner(), NaiveTime::MIN);
        let ts: Option<DateTime<Utc>> = match self {
            Zone::Local => Local
                .from_local_datetime(&naive)
                .earliest()
                .map(|ts| ts.with_timezone(&Utc)),
            Zone::Utc => Some(naive.and_utc()),
            Zone::Fixed(offset) => offset
                .from_local_datetime(&naive)
                .single()
                .map(|ts| ts.with_timezone(&Utc)),
            Zone::Named(tz) => tz
                .from_local_datetime(&naive)
                .earliest()
                .map(|ts| ts.with_timezone(&Utc)),
        };
        match ts {
            Some(ts) => Ok(Timestamp::new(ts)),
            None => fail(format!("{date} has no midnight in timezone {self}")),
        }
    }
}

impl TryFrom<String> for Zone {
    type Error = ErrorReport;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Zone::parse(&value)
    }
}

impl Display for Zone {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Zone::Local => write!(f, "local"),
            Zone::Utc => write!(f, "utc"),
            Zone::Fixed(offset) => write!(f, "{offset}"),
            Zone::Named(tz) => write!(f, "{tz}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() -> Fallible<()> {
        assert_eq!(Zone::parse("local")?, Zone::Local);
        assert_eq!(Zone::parse("UTC")?, Zone::Utc);
        let plus_four = FixedOffset::east_opt(4 * 3600).unwrap();
        assert_eq!(Zone::parse("+04:00")?, Zone::Fixed(plus_four));
        assert_eq!(Zone::parse("Asia/Yerevan")?, Zone::Named(Tz::Asia__Yerevan));
        assert!(Zone::parse("Mars/Olympus").is_err());
        Ok(())
    }

    #[test]
    fn test_weekend_depends_on_zone() -> Fallible<()> {
        // Friday 22:00 UTC is already Saturday in UTC+4.
        let ts = Timestamp::parse("2025-03-07T22:00:00Z")?;
        assert!(!Zone::Utc.is_weekend(ts));
        assert!(Zone::parse("+04:00")?.is_weekend(ts));
        Ok(())
    }

    #[test]
    fn test_named_zone_follows_daylight_saving() -> Fallible<()> {
        let new_york = Zone::parse("America/New_York")?;
        let fixed = Zone::parse("-05:00")?;
        // 00:30 on a Saturday in July, daylight time.
        let summer = Timestamp::parse("2025-07-05T04:30:00Z")?;
        assert!(new_york.is_weekend(summer));
        assert!(!fixed.is_weekend(summer));
        // 23:30 on a Friday in January, standard time.
        let winter = Timestamp::parse("2025-01-04T04:30:00Z")?;
        assert!(!new_york.is_weekend(winter));
        assert_eq!(new_york.date(winter).to_string(), "2025-01-03");

        let saturday = new_york.date(summer);
        assert_eq!(
            new_york.start_of_day(saturday)?,
            Timestamp::parse("2025-07-05T04:00:00Z")?
        );
        assert_eq!(
            new_york.start_of_day(saturday.minus_days(182))?,
            Timestamp::parse("2025-01-04T05:00:00Z")?
        );
        assert_eq!(new_york.to_string(), "America/New_York");
        Ok(())
    }

    #[test]
    fn test_start_of_day() -> Fallible<()> {
        let zone = Zone::parse("-05:00")?;
        let ts = Timestamp::parse("2025-03-07T03:00:00Z")?;
        let date = zone.date(ts);
        assert_eq!(date.to_string(), "2025-03-06");
        assert_eq!(
            zone.start_of_day(date)?,
            Timestamp::parse("2025-03-06T05:00:00Z")?
        );
        Ok(())
    }
}
