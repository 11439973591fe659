// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use tablemap::Record;
use uuid::Uuid;

#[derive(Record)]
pub struct Item(Uuid, String);

fn main() {}
