// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use tablemap::Record;

#[derive(Record)]
pub struct Item {
    #[dbs(pk)]
    pub id: i64
}

fn main() {}
