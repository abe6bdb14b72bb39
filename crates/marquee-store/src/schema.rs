// SPDX-License-Identifier: Apache-2.0

pub const SCHEMA_VERSION: i64 = 1;

/// One row per movie; `document` holds the whole aggregate as JSON.
pub const MOVIES_SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS movies (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    created_at_ms INTEGER NOT NULL,
    document TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_movies_created ON movies(created_at_ms DESC, seq DESC);
";
