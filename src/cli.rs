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

use std::io::stdin;
use std::io::stdout;

use clap::Parser;
use clap::Subcommand;

use crate::cmd::cards::add_card;
use crate::cmd::cards::delete_card;
use crate::cmd::cards::edit_card;
use crate::cmd::cards::set_active;
use crate::cmd::cards::set_starred;
use crate::cmd::list::list_cards;
use crate::cmd::list::list_decks;
use crate::cmd::list::print_queue;
use crate::cmd::practice::practice;
use crate::cmd::review::review;
use crate::cmd::stats::StatsFormat;
use crate::cmd::stats::print_stats;
use crate::collection::Collection;
use crate::error::Fallible;
use crate::types::card::CardContent;
use crate::types::card::CardId;
use crate::types::card::NewCard;
use crate::types::timestamp::Timestamp;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the collection directory. Defaults to the current directory.
    #[arg(short = 'C', long, global = true)]
    directory: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Add a new card.
    Add {
        /// The deck the card belongs to.
        #[arg(long)]
        deck: String,
        /// The prompt side of the card.
        front: String,
        /// The answer side of the card.
        back: String,
        /// An example sentence.
        #[arg(long)]
        sentence: Option<String>,
        /// A mnemonic.
        #[arg(long)]
        association: Option<String>,
        /// Mark the card as difficult.
        #[arg(long)]
        starred: bool,
    },
    /// Edit a card's text. Its schedule is not affected.
    Edit {
        id: i64,
        #[arg(long)]
        front: Option<String>,
        #[arg(long)]
        back: Option<String>,
        #[arg(long)]
        sentence: Option<String>,
        #[arg(long)]
        association: Option<String>,
    },
    /// Star a card, or unstar it with `--off`.
    Star {
        id: i64,
        #[arg(long)]
        off: bool,
    },
    /// Return a card to the study rotation.
    Activate { id: i64 },
    /// Take a card out of the study rotation without deleting it.
    Deactivate { id: i64 },
    /// Delete a card and its review history.
    Delete { id: i64 },
    /// Summarize each deck: cards, due, new and starred.
    Decks,
    /// List cards with their status.
    List {
        #[arg(long)]
        deck: Option<String>,
    },
    /// Print today's study queue.
    Queue {
        #[arg(long)]
        deck: Option<String>,
    },
    /// Study today's queue in the terminal.
    Review {
        #[arg(long)]
        deck: Option<String>,
    },
    /// Go through cards in random order without rating them.
    Practice {
        #[arg(long)]
        deck: Option<String>,
    },
    /// Print review statistics.
    Stats {
        /// Number of days of daily statistics.
        #[arg(long, default_value_t = 7)]
        days: u32,
        #[arg(long, default_value_t = StatsFormat::Text)]
        format: StatsFormat,
    },
}

pub fn entrypoint() -> Fallible<()> {
    let cli: Cli = Cli::parse();
    let coll = Collection::new(cli.directory)?;
    let now = Timestamp::now();
    match cli.command {
        Command::Add {
            deck,
            front,
            back,
            sentence,
            association,
            starred,
        } => {
            let mut content = CardContent::new(front, back);
            content.sentence = sentence.unwrap_or_default();
            content.association = association.unwrap_or_default();
            let card = NewCard {
                deck_name: deck,
                content,
                is_starred: starred,
            };
            add_card(&coll, card, now)
        }
        Command::Edit {
            id,
            front,
            back,
            sentence,
            association,
        } => edit_card(&coll, CardId::new(id), front, back, sentence, association),
        Command::Star { id, off } => set_starred(&coll, CardId::new(id), !off),
        Command::Activate { id } => set_active(&coll, CardId::new(id), true),
        Command::Deactivate { id } => set_active(&coll, CardId::new(id), false),
        Command::Delete { id } => delete_card(&coll, CardId::new(id)),
        Command::Decks => list_decks(&coll, now),
        Command::List { deck } => list_cards(&coll, deck.as_deref(), now),
        Command::Queue { deck } => print_queue(&coll, deck.as_deref(), now),
        Command::Review { deck } => {
            let mut input = stdin().lock();
            let mut output = stdout().lock();
            review(&coll, deck.as_deref(), now, &mut input, &mut output)
        }
        Command::Practice { deck } => {
            let mut input = stdin().lock();
            let mut output = stdout().lock();
            practice(&coll, deck.as_deref(), &mut input, &mut output)
        }
        Command::Stats { days, format } => print_stats(&coll, days, format, now),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_add() {
        let cli = Cli::try_parse_from([
            "spacedeck", "-C", "/tmp", "add", "--deck", "Armenian", "barev", "hello", "--starred",
        ])
        .unwrap();
        assert_eq!(cli.directory.as_deref(), Some("/tmp"));
        match cli.command {
            Command::Add {
                deck,
                front,
                back,
                starred,
                sentence,
                ..
            } => {
                assert_eq!(deck, "Armenian");
                assert_eq!(front, "barev");
                assert_eq!(back, "hello");
                assert!(starred);
                assert_eq!(sentence, None);
            }
            _ => panic!("Expected Add command"),
        }
    }

    #[test]
    fn test_parse_delete_and_practice() {
        let cli = Cli::try_parse_from(["spacedeck", "delete", "12"]).unwrap();
        assert!(matches!(cli.command, Command::Delete { id: 12 }));
        let cli = Cli::try_parse_from(["spacedeck", "practice", "--deck", "Armenian"]).unwrap();
        match cli.command {
            Command::Practice { deck } => assert_eq!(deck.as_deref(), Some("Armenian")),
            _ => panic!("Expected Practice command"),
        }
        assert!(Cli::try_parse_from(["spacedeck", "decks", "extra"]).is_err());
    }

    #[test]
    fn test_parse_stats_defaults() {
        let cli = Cli::try_parse_from(["spacedeck", "stats"]).unwrap();
        match cli.command {
            Command::Stats { days, format } => {
                assert_eq!(days, 7);
                assert!(matches!(format, StatsFormat::Text));
            }
            _ => panic!("Expected Stats command"),
        }
    }
}
