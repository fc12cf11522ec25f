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

use std::io::BufRead;
use std::io::Write;

use crate::collection::Collection;
use crate::error::Fallible;
use crate::queue::build_queue;
use crate::session::Session;
use crate::session::SessionState;
use crate::store::Store;
use crate::types::card::Card;
use crate::types::quality::Quality;
use crate::types::timestamp::Timestamp;

/// Study the queue as of `now`. Each rating is stamped with the time it is
/// made.
pub fn review(
    coll: &Collection,
    deck: Option<&str>,
    now: Timestamp,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Fallible<()> {
    let cards = coll.store.cards(deck)?;
    let queue = build_queue(&cards, &coll.config.scheduler, coll.config.timezone, now);
    study(&coll.store, queue, input, output, Timestamp::now)?;
    Ok(())
}

pub(super) enum Input {
    Line(String),
    Quit,
}

pub(super) fn read_input(input: &mut impl BufRead) -> Fallible<Input> {
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(Input::Quit);
    }
    let line = line.trim();
    if line == "q" {
        Ok(Input::Quit)
    } else {
        Ok(Input::Line(line.to_string()))
    }
}

fn read_quality(input: &mut impl BufRead, output: &mut impl Write) -> Fallible<Option<Quality>> {
    loop {
        write_grades(output)?;
        output.flush()?;
        match read_input(input)? {
            Input::Quit => return Ok(None),
            Input::Line(line) => match Quality::try_from(line.as_str()) {
                Ok(quality) => return Ok(Some(quality)),
                Err(e) => writeln!(output, "{e}")?,
            },
        }
    }
}

fn write_grades(output: &mut impl Write) -> Fallible<()> {
    writeln!(output, "Grade (q to quit):")?;
    for quality in Quality::all() {
        writeln!(output, "  {quality}  {}", quality.label())?;
    }
    Ok(())
}

pub(super) fn show_back(card: &Card, output: &mut impl Write) -> Fallible<()> {
    writeln!(output, "A: {}", card.content.back)?;
    if !card.content.sentence.is_empty() {
        writeln!(output, "   {}", card.content.sentence)?;
    }
    if !card.content.association.is_empty() {
        writeln!(output, "   ({})", card.content.association)?;
    }
    Ok(())
}

/// Drive a session over `queue`, reading reveals and grades from `input`.
/// Returns the finished session.
pub fn study(
    store: &impl Store,
    queue: Vec<Card>,
    input: &mut impl BufRead,
    output: &mut impl Write,
    now: impl Fn() -> Timestamp,
) -> Fallible<Session> {
    let mut session = Session::new(queue);
    if session.state() == SessionState::Empty {
        writeln!(output, "No cards to review. All caught up!")?;
        return Ok(session);
    }
    while let Some(card) = session.current().cloned() {
        writeln!(
            output,
            "[{}/{}] Q: {}",
            session.completed() + 1,
            session.len(),
            card.content.front
        )?;
        writeln!(output, "[press enter to reveal]")?;
        output.flush()?;
        if let Input::Quit = read_input(input)? {
            break;
        }
        show_back(&card, output)?;
        let Some(quality) = read_quality(input, output)? else {
            break;
        };
        session.rate(store, quality, now())?;
    }
    let verb = match session.state() {
        SessionState::Completed => "completed",
        _ => "ended",
    };
    writeln!(
        output,
        "Session {verb}: {} of {} cards reviewed, {}% correct.",
        session.completed(),
        session.len(),
        session.accuracy()
    )?;
    log::info!("Reviewed {} cards.", session.completed());
    Ok(session)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use tempfile::tempdir;

    use super::*;
    use crate::session::rate_card;
    use crate::store::memory::MemoryStore;
    use crate::types::card::CardContent;
    use crate::types::card::NewCard;

    fn setup(n: usize, now: Timestamp) -> Fallible<(MemoryStore, Vec<Card>)> {
        let store = MemoryStore::new();
        for i in 0..n {
            let mut content = CardContent::new(format!("front {i}"), format!("back {i}"));
            content.sentence = format!("sentence {i}");
            store.add_card(NewCard::new("Deck", content), now)?;
        }
        let cards = store.cards(None)?;
        Ok((store, cards))
    }

    #[test]
    fn test_empty_queue() -> Fallible<()> {
        let now = Timestamp::parse("2025-03-05T10:00:00Z")?;
        let store = MemoryStore::new();
        let mut input = Cursor::new("");
        let mut output = Vec::new();
        let session = study(&store, Vec::new(), &mut input, &mut output, || now)?;
        assert_eq!(session.state(), SessionState::Empty);
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("No cards to review"));
        Ok(())
    }

    #[test]
    fn test_full_session() -> Fallible<()> {
        let now = Timestamp::parse("2025-03-05T10:00:00Z")?;
        let (store, cards) = setup(2, now)?;
        // Reveal, a bad grade, a good grade; reveal, a lapse.
        let mut input = Cursor::new("\n7\n4\n\n1\n");
        let mut output = Vec::new();
        let session = study(&store, cards.clone(), &mut input, &mut output, || now)?;
        assert_eq!(session.state(), SessionState::Completed);
        assert_eq!(session.accuracy(), 50);

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("[1/2] Q: front 0"));
        assert!(text.contains("A: back 0"));
        assert!(text.contains("   sentence 0"));
        assert!(text.contains("  0  Complete blackout\n"));
        assert!(text.contains("  3  Hard\n"));
        assert!(text.contains("  5  Easy\n"));
        assert!(text.contains("error: quality must be an integer 0-5, got 7"));
        assert!(text.contains("Session completed: 2 of 2 cards reviewed, 50% correct."));

        let reviews = store.reviews(None)?;
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].quality, Quality::GOOD);
        assert_eq!(reviews[1].quality, Quality::AGAIN);
        let second = store.get_card(cards[1].id)?.unwrap();
        assert_eq!(second.schedule.repetitions, 0);
        assert_eq!(second.schedule.last_review_date, Some(now));
        Ok(())
    }

    #[test]
    fn test_quit_midway() -> Fallible<()> {
        let now = Timestamp::parse("2025-03-05T10:00:00Z")?;
        let (store, cards) = setup(3, now)?;
        let mut input = Cursor::new("\n5\nq\n");
        let mut output = Vec::new();
        let session = study(&store, cards, &mut input, &mut output, || now)?;
        assert_eq!(session.state(), SessionState::Studying);
        assert_eq!(session.completed(), 1);
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Session ended: 1 of 3 cards reviewed, 100% correct."));
        assert_eq!(store.reviews(None)?.len(), 1);
        Ok(())
    }

    #[test]
    fn test_end_of_input_quits() -> Fallible<()> {
        let now = Timestamp::parse("2025-03-05T10:00:00Z")?;
        let (store, cards) = setup(1, now)?;
        let mut input = Cursor::new("\n");
        let mut output = Vec::new();
        let session = study(&store, cards, &mut input, &mut output, || now)?;
        assert_eq!(session.completed(), 0);
        assert!(store.reviews(None)?.is_empty());
        Ok(())
    }

    #[test]
    fn test_review_builds_queue_at_given_time() -> Fallible<()> {
        let dir = tempdir()?;
        let coll = Collection::new(Some(dir.path().display().to_string()))?;
        let now = Timestamp::parse("2025-03-05T10:00:00Z")?;
        let card = coll
            .store
            .add_card(NewCard::new("Deck", CardContent::new("jur", "water")), now)?;
        rate_card(&coll.store, card.id, Quality::GOOD, now)?;

        // Due tomorrow, so nothing is queued as of `now`, even though the
        // card is overdue by the wall clock.
        let mut output = Vec::new();
        review(&coll, None, now, &mut Cursor::new(""), &mut output)?;
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("No cards to review"));

        let mut output = Vec::new();
        review(&coll, None, now.plus_days(1), &mut Cursor::new(""), &mut output)?;
        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("[1/1] Q: jur"));
        assert_eq!(coll.store.reviews(None)?.len(), 1);
        Ok(())
    }
}
