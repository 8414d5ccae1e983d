//! [`SqliteStore`], the SQLite implementation of [`WellnessStore`].

use std::path::Path;

use chrono::{NaiveDate, Utc};
use rusqlite::{OptionalExtension as _, TransactionBehavior};
use uuid::Uuid;

use wellness_core::{
  activity::{Activity, NewActivity},
  admin::{normalize_email, AdminUser, AppSetting},
  log::{DailyLog, NewDailyLog},
  store::WellnessStore,
  team::{
    AchievementKind, AwardOutcome, JoinOutcome, NewTeam, Team, TeamAchievement,
    WellnessWednesdayAward, MAX_TEAM_SIZE,
  },
  user::{Identity, User},
};

use crate::{
  encode::{
    decode_date, decode_uuid, encode_achievement_kind, encode_date, encode_dt,
    encode_uuid, RawAchievement, RawActivity, RawAdmin, RawAward, RawLog, RawSetting,
    RawTeam, RawUser, ACHIEVEMENT_COLUMNS, ACTIVITY_COLUMNS, AWARD_COLUMNS,
    LOG_COLUMNS, TEAM_COLUMNS, USER_COLUMNS,
  },
  schema::SCHEMA,
  Error, Result,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A wellness challenge store backed by a single SQLite file.
///
/// Clones share one connection thread.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    tracing::debug!("sqlite schema initialised");
    Ok(())
  }

  /// Run a single-row `users` query.
  async fn user_where(&self, clause: &'static str, arg: String) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE {clause}"),
            rusqlite::params![arg],
            RawUser::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }

  /// Run a multi-row `daily_logs` query keyed by user (and optionally date).
  async fn logs_where(&self, user_id: Uuid, date: Option<NaiveDate>) -> Result<Vec<DailyLog>> {
    let user_str = encode_uuid(user_id);
    let date_str = date.map(encode_date);

    let raws: Vec<RawLog> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {LOG_COLUMNS} FROM daily_logs
           WHERE user_id = ?1 AND (?2 IS NULL OR log_date = ?2)
           ORDER BY log_date DESC, completed_at DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![user_str, date_str], RawLog::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawLog::into_log).collect()
  }

  async fn team_by_id(&self, team_id: Uuid) -> Result<Option<Team>> {
    let id_str = encode_uuid(team_id);

    let raw: Option<RawTeam> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {TEAM_COLUMNS} FROM teams WHERE team_id = ?1"),
            rusqlite::params![id_str],
            RawTeam::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawTeam::into_team).transpose()
  }
}

// ─── Transaction outcomes ────────────────────────────────────────────────────
//
// `call` closures can only fail with `tokio_rusqlite::Error`, so domain
// refusals travel out of a transaction as values and are mapped afterwards.

enum CreateTeam {
  Created,
  NoUser,
  OnTeam(String),
}

enum Join {
  Joined,
  NoUser,
  NoTeam,
  Full,
  OnTeam(String),
}

enum Award {
  Awarded,
  Existing(RawAward),
}

// ─── WellnessStore impl ──────────────────────────────────────────────────────

impl WellnessStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn ensure_user(&self, identity: Identity) -> Result<User> {
    let fresh   = User::fresh(&identity, Utc::now());
    let id_str  = encode_uuid(fresh.user_id);
    let at_str  = encode_dt(fresh.created_at);
    let email   = fresh.email.clone();
    let name    = fresh.display_name.clone();

    let raw: RawUser = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO users (user_id, email, display_name, created_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (user_id) DO NOTHING",
          rusqlite::params![id_str, email, name, at_str],
        )?;
        Ok(conn.query_row(
          &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?1"),
          rusqlite::params![id_str],
          RawUser::from_row,
        )?)
      })
      .await?;

    raw.into_user()
  }

  async fn get_user(&self, user_id: Uuid) -> Result<Option<User>> {
    self.user_where("user_id = ?1", encode_uuid(user_id)).await
  }

  async fn list_users(&self) -> Result<Vec<User>> {
    let raws: Vec<RawUser> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users"))?;
        let rows = stmt
          .query_map([], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn set_total_points(&self, user_id: Uuid, total_points: i64) -> Result<()> {
    let id_str = encode_uuid(user_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users SET total_points = ?2 WHERE user_id = ?1",
          rusqlite::params![id_str, total_points],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::UserNotFound(user_id));
    }
    Ok(())
  }

  async fn set_current_streak(&self, user_id: Uuid, streak: u32) -> Result<()> {
    let id_str = encode_uuid(user_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE users SET current_streak = ?2 WHERE user_id = ?1",
          rusqlite::params![id_str, streak],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::UserNotFound(user_id));
    }
    Ok(())
  }

  async fn delete_user(&self, user_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(user_id);

    let changed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM daily_logs WHERE user_id = ?1", rusqlite::params![id_str])?;
        let changed =
          tx.execute("DELETE FROM users WHERE user_id = ?1", rusqlite::params![id_str])?;
        tx.commit()?;
        Ok(changed)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn reset_user(&self, user_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(user_id);

    let changed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM daily_logs WHERE user_id = ?1", rusqlite::params![id_str])?;
        let changed = tx.execute(
          "UPDATE users SET total_points = 0, current_streak = 0 WHERE user_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.commit()?;
        Ok(changed)
      })
      .await?;

    Ok(changed > 0)
  }

  // ── Activities ────────────────────────────────────────────────────────────

  async fn list_activities(&self) -> Result<Vec<Activity>> {
    let raws: Vec<RawActivity> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ACTIVITY_COLUMNS} FROM activities ORDER BY rowid"
        ))?;
        let rows = stmt
          .query_map([], RawActivity::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawActivity::into_activity).collect()
  }

  async fn get_activity(&self, activity_id: Uuid) -> Result<Option<Activity>> {
    let id_str = encode_uuid(activity_id);

    let raw: Option<RawActivity> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {ACTIVITY_COLUMNS} FROM activities WHERE activity_id = ?1"),
            rusqlite::params![id_str],
            RawActivity::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawActivity::into_activity).transpose()
  }

  async fn seed_activities(&self, entries: Vec<NewActivity>) -> Result<Vec<Activity>> {
    let inserted = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = 0;
        for entry in &entries {
          inserted += tx.execute(
            "INSERT INTO activities (activity_id, name, emoji, points, description)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT (name) DO NOTHING",
            rusqlite::params![
              encode_uuid(Uuid::new_v4()),
              entry.name,
              entry.emoji,
              entry.points,
              entry.description,
            ],
          )?;
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;

    if inserted > 0 {
      tracing::info!(inserted, "seeded activity catalog");
    }
    self.list_activities().await
  }

  async fn set_activity_points(
    &self,
    activity_id: Uuid,
    points:      i32,
  ) -> Result<Option<Activity>> {
    let id_str = encode_uuid(activity_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE activities SET points = ?2 WHERE activity_id = ?1",
          rusqlite::params![id_str, points],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(None);
    }
    self.get_activity(activity_id).await
  }

  // ── Daily logs ────────────────────────────────────────────────────────────

  async fn insert_log(&self, input: NewDailyLog) -> Result<DailyLog> {
    let log = DailyLog {
      log_id:       Uuid::new_v4(),
      user_id:      input.user_id,
      activity_id:  input.activity_id,
      log_date:     input.log_date,
      points:       input.points,
      completed_at: Utc::now(),
    };

    let log_id_str      = encode_uuid(log.log_id);
    let user_id_str     = encode_uuid(log.user_id);
    let activity_id_str = encode_uuid(log.activity_id);
    let date_str        = encode_date(log.log_date);
    let at_str          = encode_dt(log.completed_at);
    let points          = log.points;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO daily_logs (
             log_id, user_id, activity_id, log_date, points, completed_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            log_id_str,
            user_id_str,
            activity_id_str,
            date_str,
            points,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(log)
  }

  async fn find_log(
    &self,
    user_id:     Uuid,
    activity_id: Uuid,
    date:        NaiveDate,
  ) -> Result<Option<DailyLog>> {
    let user_str     = encode_uuid(user_id);
    let activity_str = encode_uuid(activity_id);
    let date_str     = encode_date(date);

    let raw: Option<RawLog> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {LOG_COLUMNS} FROM daily_logs
               WHERE user_id = ?1 AND activity_id = ?2 AND log_date = ?3"
            ),
            rusqlite::params![user_str, activity_str, date_str],
            RawLog::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawLog::into_log).transpose()
  }

  async fn delete_log(
    &self,
    user_id:     Uuid,
    activity_id: Uuid,
    date:        NaiveDate,
  ) -> Result<bool> {
    let user_str     = encode_uuid(user_id);
    let activity_str = encode_uuid(activity_id);
    let date_str     = encode_date(date);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM daily_logs
           WHERE user_id = ?1 AND activity_id = ?2 AND log_date = ?3",
          rusqlite::params![user_str, activity_str, date_str],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn logs_for_user(&self, user_id: Uuid) -> Result<Vec<DailyLog>> {
    self.logs_where(user_id, None).await
  }

  async fn logs_on(&self, user_id: Uuid, date: NaiveDate) -> Result<Vec<DailyLog>> {
    self.logs_where(user_id, Some(date)).await
  }

  async fn log_dates(&self, user_id: Uuid) -> Result<Vec<NaiveDate>> {
    let user_str = encode_uuid(user_id);

    let raws: Vec<String> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT DISTINCT log_date FROM daily_logs
           WHERE user_id = ?1
           ORDER BY log_date DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.iter().map(|s| decode_date(s)).collect()
  }

  // ── Teams ─────────────────────────────────────────────────────────────────

  async fn create_team(&self, input: NewTeam) -> Result<Team> {
    let team = Team {
      team_id:      Uuid::new_v4(),
      name:         input.name,
      total_points: 0,
      creator_id:   input.creator_id,
      banner_url:   input.banner_url,
      created_at:   Utc::now(),
    };

    let team_id_str    = encode_uuid(team.team_id);
    let creator_id_str = encode_uuid(team.creator_id);
    let at_str         = encode_dt(team.created_at);
    let name           = team.name.clone();
    let banner_url     = team.banner_url.clone();

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
          "INSERT INTO teams (team_id, name, total_points, creator_id, banner_url, created_at)
           VALUES (?1, ?2, 0, ?3, ?4, ?5)",
          rusqlite::params![team_id_str, name, creator_id_str, banner_url, at_str],
        )?;
        let joined = tx.execute(
          "UPDATE users SET team_id = ?1 WHERE user_id = ?2 AND team_id IS NULL",
          rusqlite::params![team_id_str, creator_id_str],
        )?;
        if joined == 0 {
          // Dropping `tx` rolls the team insert back.
          let current: Option<Option<String>> = tx
            .query_row(
              "SELECT team_id FROM users WHERE user_id = ?1",
              rusqlite::params![creator_id_str],
              |r| r.get(0),
            )
            .optional()?;
          return Ok(match current {
            None | Some(None) => CreateTeam::NoUser,
            Some(Some(existing)) => CreateTeam::OnTeam(existing),
          });
        }
        tx.commit()?;
        Ok(CreateTeam::Created)
      })
      .await?;

    match outcome {
      CreateTeam::Created => Ok(team),
      CreateTeam::NoUser => Err(Error::UserNotFound(team.creator_id)),
      CreateTeam::OnTeam(existing) => Err(Error::AlreadyOnTeam(decode_uuid(&existing)?)),
    }
  }

  async fn get_team(&self, team_id: Uuid) -> Result<Option<Team>> {
    self.team_by_id(team_id).await
  }

  async fn list_teams(&self) -> Result<Vec<Team>> {
    let raws: Vec<RawTeam> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {TEAM_COLUMNS} FROM teams ORDER BY name"
        ))?;
        let rows = stmt
          .query_map([], RawTeam::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawTeam::into_team).collect()
  }

  async fn team_members(&self, team_id: Uuid) -> Result<Vec<User>> {
    let id_str = encode_uuid(team_id);

    let raws: Vec<RawUser> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {USER_COLUMNS} FROM users WHERE team_id = ?1 ORDER BY display_name"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawUser::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawUser::into_user).collect()
  }

  async fn join_team(&self, user_id: Uuid, team_id: Uuid) -> Result<JoinOutcome> {
    let user_str = encode_uuid(user_id);
    let team_str = encode_uuid(team_id);

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let team_exists = tx
          .query_row(
            "SELECT 1 FROM teams WHERE team_id = ?1",
            rusqlite::params![team_str],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !team_exists {
          return Ok(Join::NoTeam);
        }

        let current: Option<Option<String>> = tx
          .query_row(
            "SELECT team_id FROM users WHERE user_id = ?1",
            rusqlite::params![user_str],
            |r| r.get(0),
          )
          .optional()?;
        match current {
          None => return Ok(Join::NoUser),
          Some(Some(existing)) => return Ok(Join::OnTeam(existing)),
          Some(None) => {}
        }

        let members: i64 = tx.query_row(
          "SELECT COUNT(*) FROM users WHERE team_id = ?1",
          rusqlite::params![team_str],
          |r| r.get(0),
        )?;
        if members >= MAX_TEAM_SIZE as i64 {
          return Ok(Join::Full);
        }

        tx.execute(
          "UPDATE users SET team_id = ?1 WHERE user_id = ?2",
          rusqlite::params![team_str, user_str],
        )?;
        tx.commit()?;
        Ok(Join::Joined)
      })
      .await?;

    match outcome {
      Join::Joined => Ok(JoinOutcome::Joined),
      Join::Full => Ok(JoinOutcome::TeamFull),
      Join::OnTeam(existing) => Ok(JoinOutcome::AlreadyOnTeam(decode_uuid(&existing)?)),
      Join::NoUser => Err(Error::UserNotFound(user_id)),
      Join::NoTeam => Err(Error::TeamNotFound(team_id)),
    }
  }

  async fn leave_team(&self, user_id: Uuid) -> Result<Option<Uuid>> {
    let user_str = encode_uuid(user_id);

    let former: Option<Option<String>> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let former: Option<Option<String>> = tx
          .query_row(
            "SELECT team_id FROM users WHERE user_id = ?1",
            rusqlite::params![user_str],
            |r| r.get(0),
          )
          .optional()?;
        tx.execute(
          "UPDATE users SET team_id = NULL WHERE user_id = ?1",
          rusqlite::params![user_str],
        )?;
        tx.commit()?;
        Ok(former)
      })
      .await?;

    match former {
      None => Err(Error::UserNotFound(user_id)),
      Some(team) => team.as_deref().map(decode_uuid).transpose(),
    }
  }

  async fn set_team_points(&self, team_id: Uuid, total_points: i64) -> Result<()> {
    let id_str = encode_uuid(team_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE teams SET total_points = ?2 WHERE team_id = ?1",
          rusqlite::params![id_str, total_points],
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::TeamNotFound(team_id));
    }
    Ok(())
  }

  async fn team_achievements(&self, team_id: Uuid) -> Result<Vec<TeamAchievement>> {
    let id_str = encode_uuid(team_id);

    let raws: Vec<RawAchievement> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ACHIEVEMENT_COLUMNS} FROM team_achievements
           WHERE team_id = ?1
           ORDER BY achieved_on DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], RawAchievement::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAchievement::into_achievement).collect()
  }

  async fn find_wednesday_award(
    &self,
    team_id: Uuid,
    date:    NaiveDate,
  ) -> Result<Option<WellnessWednesdayAward>> {
    let team_str = encode_uuid(team_id);
    let date_str = encode_date(date);

    let raw: Option<RawAward> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!(
              "SELECT {AWARD_COLUMNS} FROM wellness_wednesday
               WHERE team_id = ?1 AND award_date = ?2"
            ),
            rusqlite::params![team_str, date_str],
            RawAward::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawAward::into_award).transpose()
  }

  async fn award_wednesday_bonus(
    &self,
    team_id:      Uuid,
    date:         NaiveDate,
    bonus_points: i64,
  ) -> Result<AwardOutcome> {
    let award = WellnessWednesdayAward {
      award_id: Uuid::new_v4(),
      team_id,
      award_date: date,
      bonus_points,
      recorded_at: Utc::now(),
    };

    let award_id_str       = encode_uuid(award.award_id);
    let achievement_id_str = encode_uuid(Uuid::new_v4());
    let team_str           = encode_uuid(team_id);
    let date_str           = encode_date(date);
    let at_str             = encode_dt(award.recorded_at);
    let kind_str           = encode_achievement_kind(AchievementKind::WellnessWednesday);

    let outcome = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let inserted = tx.execute(
          "INSERT INTO wellness_wednesday (award_id, team_id, award_date, bonus_points, recorded_at)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT (team_id, award_date) DO NOTHING",
          rusqlite::params![award_id_str, team_str, date_str, bonus_points, at_str],
        )?;

        if inserted == 0 {
          let existing = tx.query_row(
            &format!(
              "SELECT {AWARD_COLUMNS} FROM wellness_wednesday
               WHERE team_id = ?1 AND award_date = ?2"
            ),
            rusqlite::params![team_str, date_str],
            RawAward::from_row,
          )?;
          return Ok(Award::Existing(existing));
        }

        tx.execute(
          "INSERT INTO team_achievements (achievement_id, team_id, kind, points, achieved_on, recorded_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![achievement_id_str, team_str, kind_str, bonus_points, date_str, at_str],
        )?;
        tx.execute(
          "UPDATE teams SET total_points = total_points + ?2 WHERE team_id = ?1",
          rusqlite::params![team_str, bonus_points],
        )?;
        tx.commit()?;
        Ok(Award::Awarded)
      })
      .await?;

    match outcome {
      Award::Awarded => Ok(AwardOutcome::Awarded(award)),
      Award::Existing(raw) => Ok(AwardOutcome::AlreadyAwarded(raw.into_award()?)),
    }
  }

  // ── Admins ────────────────────────────────────────────────────────────────

  async fn is_admin(&self, email: String) -> Result<bool> {
    let email = normalize_email(&email);

    let found = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT 1 FROM admin_users WHERE email = ?1",
            rusqlite::params![email],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false))
      })
      .await?;

    Ok(found)
  }

  async fn add_admin(&self, email: String) -> Result<AdminUser> {
    let email  = normalize_email(&email);
    let at_str = encode_dt(Utc::now());

    let raw: RawAdmin = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO admin_users (email, added_at) VALUES (?1, ?2)
           ON CONFLICT (email) DO NOTHING",
          rusqlite::params![email, at_str],
        )?;
        Ok(conn.query_row(
          "SELECT email, added_at FROM admin_users WHERE email = ?1",
          rusqlite::params![email],
          RawAdmin::from_row,
        )?)
      })
      .await?;

    raw.into_admin()
  }

  async fn remove_admin(&self, email: String) -> Result<bool> {
    let email = normalize_email(&email);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM admin_users WHERE email = ?1",
          rusqlite::params![email],
        )?)
      })
      .await?;

    Ok(changed > 0)
  }

  async fn list_admins(&self) -> Result<Vec<AdminUser>> {
    let raws: Vec<RawAdmin> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT email, added_at FROM admin_users ORDER BY email")?;
        let rows = stmt
          .query_map([], RawAdmin::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAdmin::into_admin).collect()
  }

  // ── Settings ──────────────────────────────────────────────────────────────

  async fn get_setting(&self, key: String) -> Result<Option<AppSetting>> {
    let raw: Option<RawSetting> = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            "SELECT key, value, updated_at FROM app_settings WHERE key = ?1",
            rusqlite::params![key],
            RawSetting::from_row,
          )
          .optional()?)
      })
      .await?;

    raw.map(RawSetting::into_setting).transpose()
  }

  async fn put_setting(&self, key: String, value: String) -> Result<AppSetting> {
    let at_str = encode_dt(Utc::now());

    let raw: RawSetting = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO app_settings (key, value, updated_at) VALUES (?1, ?2, ?3)
           ON CONFLICT (key) DO UPDATE SET value = excluded.value,
                                           updated_at = excluded.updated_at",
          rusqlite::params![key, value, at_str],
        )?;
        Ok(conn.query_row(
          "SELECT key, value, updated_at FROM app_settings WHERE key = ?1",
          rusqlite::params![key],
          RawSetting::from_row,
        )?)
      })
      .await?;

    raw.into_setting()
  }
}
