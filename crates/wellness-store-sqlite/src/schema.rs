//! SQL schema for the wellness SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS teams (
    team_id      TEXT PRIMARY KEY,
    name         TEXT NOT NULL UNIQUE,
    total_points INTEGER NOT NULL DEFAULT 0,  -- member points + bonuses
    creator_id   TEXT NOT NULL,
    banner_url   TEXT,
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS users (
    user_id        TEXT PRIMARY KEY,           -- issued by the auth provider
    email          TEXT NOT NULL,
    display_name   TEXT NOT NULL,
    total_points   INTEGER NOT NULL DEFAULT 0, -- denormalised sum of daily_logs
    current_streak INTEGER NOT NULL DEFAULT 0, -- denormalised
    team_id        TEXT REFERENCES teams(team_id) ON DELETE SET NULL,
    created_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS activities (
    activity_id TEXT PRIMARY KEY,
    name        TEXT NOT NULL UNIQUE,
    emoji       TEXT NOT NULL,
    points      INTEGER NOT NULL DEFAULT 5,
    description TEXT NOT NULL DEFAULT '',
    CHECK (points >= 0)
);

-- One row per user, activity and calendar day.
CREATE TABLE IF NOT EXISTS daily_logs (
    log_id       TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL REFERENCES users(user_id) ON DELETE CASCADE,
    activity_id  TEXT NOT NULL REFERENCES activities(activity_id),
    log_date     TEXT NOT NULL,   -- YYYY-MM-DD
    points       INTEGER NOT NULL,
    completed_at TEXT NOT NULL,   -- RFC 3339 UTC; server-assigned
    UNIQUE (user_id, activity_id, log_date)
);

CREATE TABLE IF NOT EXISTS team_achievements (
    achievement_id TEXT PRIMARY KEY,
    team_id        TEXT NOT NULL REFERENCES teams(team_id) ON DELETE CASCADE,
    kind           TEXT NOT NULL,   -- 'wellness_wednesday'
    points         INTEGER NOT NULL,
    achieved_on    TEXT NOT NULL,
    recorded_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS wellness_wednesday (
    award_id     TEXT PRIMARY KEY,
    team_id      TEXT NOT NULL REFERENCES teams(team_id) ON DELETE CASCADE,
    award_date   TEXT NOT NULL,
    bonus_points INTEGER NOT NULL,
    recorded_at  TEXT NOT NULL,
    UNIQUE (team_id, award_date)
);

CREATE TABLE IF NOT EXISTS admin_users (
    email    TEXT PRIMARY KEY,   -- lower-cased
    added_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS app_settings (
    key        TEXT PRIMARY KEY,
    value      TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS daily_logs_user_date_idx ON daily_logs(user_id, log_date);
CREATE INDEX IF NOT EXISTS users_team_idx           ON users(team_id);

PRAGMA user_version = 1;
";
