//! v004: user profile, a single row.

pub const MIGRATION_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS user_profile (
    id          INTEGER PRIMARY KEY CHECK (id = 1),
    payload     TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
"#;
