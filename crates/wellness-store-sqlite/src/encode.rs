//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings and calendar dates as
//! `YYYY-MM-DD`, so both sort correctly as text. UUIDs are stored as
//! hyphenated lowercase strings.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;
use wellness_core::{
  activity::Activity,
  admin::{AdminUser, AppSetting},
  log::DailyLog,
  team::{AchievementKind, Team, TeamAchievement, WellnessWednesdayAward},
  user::User,
};

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_achievement_kind(k: AchievementKind) -> &'static str {
  match k {
    AchievementKind::WellnessWednesday => "wellness_wednesday",
  }
}

pub fn decode_achievement_kind(s: &str) -> Result<AchievementKind> {
  match s {
    "wellness_wednesday" => Ok(AchievementKind::WellnessWednesday),
    other => Err(Error::Decode(format!("unknown achievement kind: {other:?}"))),
  }
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const USER_COLUMNS: &str =
  "user_id, email, display_name, total_points, current_streak, team_id, created_at";

/// Raw values read directly from a `users` row.
pub struct RawUser {
  pub user_id:        String,
  pub email:          String,
  pub display_name:   String,
  pub total_points:   i64,
  pub current_streak: u32,
  pub team_id:        Option<String>,
  pub created_at:     String,
}

impl RawUser {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      user_id:        row.get(0)?,
      email:          row.get(1)?,
      display_name:   row.get(2)?,
      total_points:   row.get(3)?,
      current_streak: row.get(4)?,
      team_id:        row.get(5)?,
      created_at:     row.get(6)?,
    })
  }

  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:        decode_uuid(&self.user_id)?,
      email:          self.email,
      display_name:   self.display_name,
      total_points:   self.total_points,
      current_streak: self.current_streak,
      team_id:        self.team_id.as_deref().map(decode_uuid).transpose()?,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

pub const ACTIVITY_COLUMNS: &str = "activity_id, name, emoji, points, description";

/// Raw values read directly from an `activities` row.
pub struct RawActivity {
  pub activity_id: String,
  pub name:        String,
  pub emoji:       String,
  pub points:      i32,
  pub description: String,
}

impl RawActivity {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      activity_id: row.get(0)?,
      name:        row.get(1)?,
      emoji:       row.get(2)?,
      points:      row.get(3)?,
      description: row.get(4)?,
    })
  }

  pub fn into_activity(self) -> Result<Activity> {
    Ok(Activity {
      activity_id: decode_uuid(&self.activity_id)?,
      name:        self.name,
      emoji:       self.emoji,
      points:      self.points,
      description: self.description,
    })
  }
}

pub const LOG_COLUMNS: &str =
  "log_id, user_id, activity_id, log_date, points, completed_at";

/// Raw values read directly from a `daily_logs` row.
pub struct RawLog {
  pub log_id:       String,
  pub user_id:      String,
  pub activity_id:  String,
  pub log_date:     String,
  pub points:       i32,
  pub completed_at: String,
}

impl RawLog {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      log_id:       row.get(0)?,
      user_id:      row.get(1)?,
      activity_id:  row.get(2)?,
      log_date:     row.get(3)?,
      points:       row.get(4)?,
      completed_at: row.get(5)?,
    })
  }

  pub fn into_log(self) -> Result<DailyLog> {
    Ok(DailyLog {
      log_id:       decode_uuid(&self.log_id)?,
      user_id:      decode_uuid(&self.user_id)?,
      activity_id:  decode_uuid(&self.activity_id)?,
      log_date:     decode_date(&self.log_date)?,
      points:       self.points,
      completed_at: decode_dt(&self.completed_at)?,
    })
  }
}

pub const TEAM_COLUMNS: &str =
  "team_id, name, total_points, creator_id, banner_url, created_at";

/// Raw values read directly from a `teams` row.
pub struct RawTeam {
  pub team_id:      String,
  pub name:         String,
  pub total_points: i64,
  pub creator_id:   String,
  pub banner_url:   Option<String>,
  pub created_at:   String,
}

impl RawTeam {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      team_id:      row.get(0)?,
      name:         row.get(1)?,
      total_points: row.get(2)?,
      creator_id:   row.get(3)?,
      banner_url:   row.get(4)?,
      created_at:   row.get(5)?,
    })
  }

  pub fn into_team(self) -> Result<Team> {
    Ok(Team {
      team_id:      decode_uuid(&self.team_id)?,
      name:         self.name,
      total_points: self.total_points,
      creator_id:   decode_uuid(&self.creator_id)?,
      banner_url:   self.banner_url,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

pub const ACHIEVEMENT_COLUMNS: &str =
  "achievement_id, team_id, kind, points, achieved_on, recorded_at";

/// Raw values read directly from a `team_achievements` row.
pub struct RawAchievement {
  pub achievement_id: String,
  pub team_id:        String,
  pub kind:           String,
  pub points:         i64,
  pub achieved_on:    String,
  pub recorded_at:    String,
}

impl RawAchievement {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      achievement_id: row.get(0)?,
      team_id:        row.get(1)?,
      kind:           row.get(2)?,
      points:         row.get(3)?,
      achieved_on:    row.get(4)?,
      recorded_at:    row.get(5)?,
    })
  }

  pub fn into_achievement(self) -> Result<TeamAchievement> {
    Ok(TeamAchievement {
      achievement_id: decode_uuid(&self.achievement_id)?,
      team_id:        decode_uuid(&self.team_id)?,
      kind:           decode_achievement_kind(&self.kind)?,
      points:         self.points,
      achieved_on:    decode_date(&self.achieved_on)?,
      recorded_at:    decode_dt(&self.recorded_at)?,
    })
  }
}

pub const AWARD_COLUMNS: &str =
  "award_id, team_id, award_date, bonus_points, recorded_at";

/// Raw values read directly from a `wellness_wednesday` row.
pub struct RawAward {
  pub award_id:     String,
  pub team_id:      String,
  pub award_date:   String,
  pub bonus_points: i64,
  pub recorded_at:  String,
}

impl RawAward {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      award_id:     row.get(0)?,
      team_id:      row.get(1)?,
      award_date:   row.get(2)?,
      bonus_points: row.get(3)?,
      recorded_at:  row.get(4)?,
    })
  }

  pub fn into_award(self) -> Result<WellnessWednesdayAward> {
    Ok(WellnessWednesdayAward {
      award_id:     decode_uuid(&self.award_id)?,
      team_id:      decode_uuid(&self.team_id)?,
      award_date:   decode_date(&self.award_date)?,
      bonus_points: self.bonus_points,
      recorded_at:  decode_dt(&self.recorded_at)?,
    })
  }
}

/// Raw values read directly from an `admin_users` row.
pub struct RawAdmin {
  pub email:    String,
  pub added_at: String,
}

impl RawAdmin {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { email: row.get(0)?, added_at: row.get(1)? })
  }

  pub fn into_admin(self) -> Result<AdminUser> {
    Ok(AdminUser { email: self.email, added_at: decode_dt(&self.added_at)? })
  }
}

/// Raw values read directly from an `app_settings` row.
pub struct RawSetting {
  pub key:        String,
  pub value:      String,
  pub updated_at: String,
}

impl RawSetting {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self { key: row.get(0)?, value: row.get(1)?, updated_at: row.get(2)? })
  }

  pub fn into_setting(self) -> Result<AppSetting> {
    Ok(AppSetting {
      key:        self.key,
      value:      self.value,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
