// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Embedded, inline and boxed nested records.

use chrono::{DateTime, Utc};
use tablemap::{Record, TypeCache};

#[derive(Default, Record)]
pub struct Timestamps {
    #[dbs("auto")]
    pub created_at: DateTime<Utc>,

    #[dbs("auto;null")]
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Default, Record)]
pub struct Address {
    pub city: String,
    pub street: String,
}

#[derive(Default, Record)]
pub struct Customer {
    #[dbs("auto;pk")]
    pub id: i64,

    #[dbs("inline")]
    pub billing: Box<Address>,

    #[dbs("inline;name:ship")]
    pub shipping: Address,

    #[embedded]
    pub stamps: Timestamps,
}

fn main() {
    let meta = TypeCache::new().get::<Customer>().unwrap();
    let names: Vec<_> = meta.all_fields().names().collect();
    assert_eq!(
        names,
        [
            "id",
            "billing_city",
            "billing_street",
            "ship_city",
            "ship_street",
            "created_at",
            "updated_at",
        ]
    );
}
