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

use rand::Rng;
use rand::seq::SliceRandom;

use crate::classify::active_cards;
use crate::cmd::review::Input;
use crate::cmd::review::read_input;
use crate::cmd::review::show_back;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::store::Store;
use crate::types::card::Card;

/// Practice a deck's active cards in random order. Nothing is rated, so no
/// schedule or review history changes.
pub fn practice(
    coll: &Collection,
    deck: Option<&str>,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Fallible<()> {
    let cards = coll.store.cards(deck)?;
    let cards: Vec<Card> = active_cards(&cards).cloned().collect();
    let practiced = run_practice(cards, &mut rand::rng(), input, output)?;
    log::info!("Practiced {practiced} cards.");
    Ok(())
}

/// Cycle through the shuffled cards until the user quits, wrapping around at
/// the end. Returns how many answers were revealed.
fn run_practice(
    mut cards: Vec<Card>,
    rng: &mut impl Rng,
    input: &mut impl BufRead,
    output: &mut impl Write,
) -> Fallible<usize> {
    if cards.is_empty() {
        writeln!(output, "No cards to practice.")?;
        return Ok(0);
    }
    cards.shuffle(rng);
    let mut position = 0;
    let mut practiced = 0;
    loop {
        let card = &cards[position];
        writeln!(output, "[{}] Q: {}", practiced + 1, card.content.front)?;
        writeln!(output, "[press enter to reveal]")?;
        output.flush()?;
        if let Input::Quit = read_input(input)? {
            break;
        }
        show_back(card, output)?;
        practiced += 1;
        writeln!(output, "[enter for next, s to shuffle, q to quit]")?;
        output.flush()?;
        match read_input(input)? {
            Input::Quit => break,
            Input::Line(line) if line == "s" => {
                cards.shuffle(rng);
                position = 0;
            }
            Input::Line(_) => position = (position + 1) % cards.len(),
        }
    }
    writeln!(output, "Practiced {practiced} cards. No schedules were changed.")?;
    Ok(practiced)
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use tempfile::tempdir;

    use super::*;
    use crate::store::memory::MemoryStore;
    use crate::types::card::CardContent;
    use crate::types::card::NewCard;
    use crate::types::timestamp::Timestamp;

    fn fronts(text: &str) -> Vec<String> {
        text.lines()
            .filter_map(|line| line.split_once("] Q: ").map(|(_, front)| front.to_string()))
            .collect()
    }

    fn cards(n: usize) -> Vec<Card> {
        let store = MemoryStore::new();
        let now = Timestamp::now();
        for i in 0..n {
            let content = CardContent::new(format!("front {i}"), format!("back {i}"));
            store.add_card(NewCard::new("Deck", content), now).unwrap();
        }
        store.cards(None).unwrap()
    }

    #[test]
    fn test_no_cards() -> Fallible<()> {
        let mut rng = StdRng::seed_from_u64(7);
        let mut output = Vec::new();
        let practiced = run_practice(Vec::new(), &mut rng, &mut Cursor::new(""), &mut output)?;
        assert_eq!(practiced, 0);
        assert!(String::from_utf8(output).unwrap().contains("No cards to practice."));
        Ok(())
    }

    #[test]
    fn test_cycles_through_every_card() -> Fallible<()> {
        let mut rng = StdRng::seed_from_u64(7);
        // Three reveals and advances, then a fourth reveal and quit.
        let mut input = Cursor::new("\n\n\n\n\n\n\nq\n");
        let mut output = Vec::new();
        let practiced = run_practice(cards(3), &mut rng, &mut input, &mut output)?;
        assert_eq!(practiced, 4);

        let text = String::from_utf8(output).unwrap();
        let seen = fronts(&text);
        assert_eq!(seen.len(), 4);
        let mut first_round = seen[..3].to_vec();
        first_round.sort();
        assert_eq!(first_round, vec!["front 0", "front 1", "front 2"]);
        // Wrapping around starts the same order again.
        assert_eq!(seen[3], seen[0]);
        assert!(text.contains("Practiced 4 cards."));
        Ok(())
    }

    #[test]
    fn test_reshuffle_restarts() -> Fallible<()> {
        let mut rng = StdRng::seed_from_u64(11);
        let mut input = Cursor::new("\n\n\ns\n\n");
        let mut output = Vec::new();
        let practiced = run_practice(cards(4), &mut rng, &mut input, &mut output)?;
        // Reveal, next, reveal, reshuffle, reveal, then end of input.
        assert_eq!(practiced, 3);
        let text = String::from_utf8(output).unwrap();
        assert_eq!(fronts(&text).len(), 3);
        assert!(text.contains("[3] Q: "));
        Ok(())
    }

    #[test]
    fn test_practice_leaves_schedules_alone() -> Fallible<()> {
        let dir = tempdir()?;
        let coll = Collection::new(Some(dir.path().display().to_string()))?;
        let now = Timestamp::now();
        for front in ["mek", "yerku"] {
            let card = NewCard::new("Armenian", CardContent::new(front, "number"));
            coll.store.add_card(card, now)?;
        }
        let inactive = coll.store.add_card(
            NewCard::new("Armenian", CardContent::new("yerek", "three")),
            now,
        )?;
        coll.store.set_active(inactive.id, false)?;
        let before = coll.store.cards(None)?;

        let mut input = Cursor::new("\n\n\n\n\n\nq\n");
        let mut output = Vec::new();
        practice(&coll, Some("Armenian"), &mut input, &mut output)?;

        let text = String::from_utf8(output).unwrap();
        assert!(!fronts(&text).contains(&"yerek".to_string()));
        assert_eq!(coll.store.cards(None)?, before);
        assert!(coll.store.reviews(None)?.is_empty());
        Ok(())
    }
}
