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

//! An SM-2 spaced repetition scheduler.
//!
//! The scheduling core is three sets of pure functions: [`sm2`] computes a
//! card's next state from a rating, [`classify`] decides whether a card is
//! new or due, and [`queue`] builds the day's study queue. [`session`] ties
//! them to a [`store::Store`].

pub mod classify;
pub mod cli;
pub mod cmd;
pub mod collection;
pub mod config;
pub mod error;
pub mod queue;
pub mod session;
pub mod sm2;
pub mod stats;
pub mod store;
pub mod types;
