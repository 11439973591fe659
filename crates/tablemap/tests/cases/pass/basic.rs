// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Minimal record with an explicit table name.

use tablemap::{PgAdapter, Record};

#[derive(Debug, Default, Record)]
#[record(table = "users")]
pub struct User {
    #[dbs("auto;pk")]
    pub id: i64,

    pub email: String,

    password_hash: String,
}

fn main() {
    let pg = PgAdapter::default();
    let sql = pg.insert_one::<User>().unwrap();
    assert_eq!(&*sql, "INSERT INTO users (email) VALUES ($1) RETURNING id, email");

    let mut user = User::default();
    let args = pg.insert_one_args(&mut user).unwrap();
    assert_eq!(args.len(), 1);
    drop(args);
    assert!(user.password_hash.is_empty());
}
