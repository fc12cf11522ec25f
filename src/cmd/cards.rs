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

use crate::collection::Collection;
use crate::error::Fallible;
use crate::error::fail;
use crate::store::Store;
use crate::store::not_found;
use crate::types::card::CardContent;
use crate::types::card::CardId;
use crate::types::card::NewCard;
use crate::types::timestamp::Timestamp;

pub fn add_card(coll: &Collection, mut card: NewCard, now: Timestamp) -> Fallible<()> {
    card.content.front = card.content.front.trim().to_string();
    card.content.back = card.content.back.trim().to_string();
    if card.content.front.is_empty() || card.content.back.is_empty() {
        return fail("a card needs both a front and a back.");
    }
    let card = coll.store.add_card(card, now)?;
    println!("Added card {} to deck '{}'.", card.id, card.deck_name);
    Ok(())
}

pub fn edit_card(
    coll: &Collection,
    id: CardId,
    front: Option<String>,
    back: Option<String>,
    sentence: Option<String>,
    association: Option<String>,
) -> Fallible<()> {
    let card = coll.store.get_card(id)?.ok_or_else(|| not_found(id))?;
    let content = apply_edit(card.content, front, back, sentence, association)?;
    coll.store.update_content(id, &content)?;
    println!("Updated card {id}.");
    Ok(())
}

fn apply_edit(
    mut content: CardContent,
    front: Option<String>,
    back: Option<String>,
    sentence: Option<String>,
    association: Option<String>,
) -> Fallible<CardContent> {
    if let Some(front) = front {
        content.front = front.trim().to_string();
    }
    if let Some(back) = back {
        content.back = back.trim().to_string();
    }
    if let Some(sentence) = sentence {
        content.sentence = sentence;
    }
    if let Some(association) = association {
        content.association = association;
    }
    if content.front.is_empty() || content.back.is_empty() {
        return fail("a card needs both a front and a back.");
    }
    Ok(content)
}

pub fn set_starred(coll: &Collection, id: CardId, starred: bool) -> Fallible<()> {
    coll.store.set_starred(id, starred)?;
    if starred {
        println!("Starred card {id}.");
    } else {
        println!("Unstarred card {id}.");
    }
    Ok(())
}

pub fn set_active(coll: &Collection, id: CardId, active: bool) -> Fallible<()> {
    coll.store.set_active(id, active)?;
    if active {
        println!("Card {id} is back in rotation.");
    } else {
        println!("Card {id} is out of rotation.");
    }
    Ok(())
}

pub fn delete_card(coll: &Collection, id: CardId) -> Fallible<()> {
    coll.store.delete_card(id)?;
    println!("Deleted card {id} and its review history.");
    Ok(())
}
