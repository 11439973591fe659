// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Reference fields held by value, boxed and optional.

use tablemap::{Record, TypeCache};
use uuid::Uuid;

#[derive(Default, Record)]
pub struct Team {
    #[dbs("pk")]
    pub id: Uuid,

    pub name: String,
}

#[derive(Record)]
pub struct Player {
    #[dbs("auto;pk")]
    pub id: i64,

    #[dbs("ref")]
    pub team: Team,

    #[dbs("ref")]
    pub previous_team: Option<Box<Team>>,

    #[dbs("ref;null")]
    pub coach: Box<Player>,
}

fn main() {
    let meta = TypeCache::new().get::<Player>().unwrap();
    let names: Vec<_> = meta.all_fields().names().collect();
    assert_eq!(names, ["id", "team_id", "previous_team_id", "coach_id"]);
    assert!(meta.field("coach_id").unwrap().is_nullable);
}
