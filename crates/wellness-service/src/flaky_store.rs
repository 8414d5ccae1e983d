//! Tracker behaviour when the store misbehaves.
//!
//! [`FlakyStore`] wraps an in-memory [`SqliteStore`] and can be told to fail
//! or mislead on the calls the tracker's error handling depends on.

use std::{
  collections::VecDeque,
  sync::{
    atomic::{AtomicBool, AtomicU32, Ordering},
    Arc, Mutex,
  },
  time::Duration,
};

use chrono::NaiveDate;
use uuid::Uuid;
use wellness_core::{
  activity::{Activity, NewActivity},
  admin::{AdminUser, AppSetting},
  clock::FixedClock,
  log::{DailyLog, NewDailyLog},
  store::WellnessStore,
  team::{AwardOutcome, JoinOutcome, NewTeam, Team, TeamAchievement, WellnessWednesdayAward},
  tier::Tier,
  user::{Identity, User},
  StoreError, StoreErrorKind,
};
use wellness_store_sqlite::SqliteStore;

use crate::{tracker::LogOutcome, Backoff, Error, RetryPolicy, WellnessService};

#[derive(Debug, thiserror::Error)]
enum FlakyError {
  #[error(transparent)]
  Sqlite(#[from] wellness_store_sqlite::Error),

  #[error("injected {0:?} failure")]
  Injected(StoreErrorKind),
}

impl StoreError for FlakyError {
  fn kind(&self) -> StoreErrorKind {
    match self {
      Self::Sqlite(e) => e.kind(),
      Self::Injected(kind) => *kind,
    }
  }
}

#[derive(Default)]
struct Faults {
  /// Consumed one per `insert_log` call before the real insert runs.
  insert_log:  Mutex<VecDeque<StoreErrorKind>>,
  insert_calls: AtomicU32,
  /// `find_log` reports nothing, as if another request inserted in between.
  hide_logs:   AtomicBool,
  ensure_user: AtomicBool,
}

struct FlakyStore {
  inner:  SqliteStore,
  faults: Faults,
}

impl FlakyStore {
  fn fail_inserts(&self, kinds: &[StoreErrorKind]) {
    self.faults.insert_log.lock().unwrap().extend(kinds.iter().copied());
  }
}

impl WellnessStore for FlakyStore {
  type Error = FlakyError;

  async fn ensure_user(&self, identity: Identity) -> Result<User, FlakyError> {
    if self.faults.ensure_user.load(Ordering::SeqCst) {
      return Err(FlakyError::Injected(StoreErrorKind::Transient));
    }
    Ok(self.inner.ensure_user(identity).await?)
  }

  async fn get_user(&self, user_id: Uuid) -> Result<Option<User>, FlakyError> {
    Ok(self.inner.get_user(user_id).await?)
  }

  async fn list_users(&self) -> Result<Vec<User>, FlakyError> {
    Ok(self.inner.list_users().await?)
  }

  async fn set_total_points(&self, user_id: Uuid, total_points: i64) -> Result<(), FlakyError> {
    Ok(self.inner.set_total_points(user_id, total_points).await?)
  }

  async fn set_current_streak(&self, user_id: Uuid, streak: u32) -> Result<(), FlakyError> {
    Ok(self.inner.set_current_streak(user_id, streak).await?)
  }

  async fn delete_user(&self, user_id: Uuid) -> Result<bool, FlakyError> {
    Ok(self.inner.delete_user(user_id).await?)
  }

  async fn reset_user(&self, user_id: Uuid) -> Result<bool, FlakyError> {
    Ok(self.inner.reset_user(user_id).await?)
  }

  async fn list_activities(&self) -> Result<Vec<Activity>, FlakyError> {
    Ok(self.inner.list_activities().await?)
  }

  async fn get_activity(&self, activity_id: Uuid) -> Result<Option<Activity>, FlakyError> {
    Ok(self.inner.get_activity(activity_id).await?)
  }

  async fn seed_activities(&self, entries: Vec<NewActivity>) -> Result<Vec<Activity>, FlakyError> {
    Ok(self.inner.seed_activities(entries).await?)
  }

  async fn set_activity_points(
    &self,
    activity_id: Uuid,
    points: i32,
  ) -> Result<Option<Activity>, FlakyError> {
    Ok(self.inner.set_activity_points(activity_id, points).await?)
  }

  async fn insert_log(&self, input: NewDailyLog) -> Result<DailyLog, FlakyError> {
    self.faults.insert_calls.fetch_add(1, Ordering::SeqCst);
    let injected = self.faults.insert_log.lock().unwrap().pop_front();
    if let Some(kind) = injected {
      return Err(FlakyError::Injected(kind));
    }
    Ok(self.inner.insert_log(input).await?)
  }

  async fn find_log(
    &self,
    user_id: Uuid,
    activity_id: Uuid,
    date: NaiveDate,
  ) -> Result<Option<DailyLog>, FlakyError> {
    if self.faults.hide_logs.load(Ordering::SeqCst) {
      return Ok(None);
    }
    Ok(self.inner.find_log(user_id, activity_id, date).await?)
  }

  async fn delete_log(
    &self,
    user_id: Uuid,
    activity_id: Uuid,
    date: NaiveDate,
  ) -> Result<bool, FlakyError> {
    Ok(self.inner.delete_log(user_id, activity_id, date).await?)
  }

  async fn logs_for_user(&self, user_id: Uuid) -> Result<Vec<DailyLog>, FlakyError> {
    Ok(self.inner.logs_for_user(user_id).await?)
  }

  async fn logs_on(&self, user_id: Uuid, date: NaiveDate) -> Result<Vec<DailyLog>, FlakyError> {
    Ok(self.inner.logs_on(user_id, date).await?)
  }

  async fn log_dates(&self, user_id: Uuid) -> Result<Vec<NaiveDate>, FlakyError> {
    Ok(self.inner.log_dates(user_id).await?)
  }

  async fn create_team(&self, input: NewTeam) -> Result<Team, FlakyError> {
    Ok(self.inner.create_team(input).await?)
  }

  async fn get_team(&self, team_id: Uuid) -> Result<Option<Team>, FlakyError> {
    Ok(self.inner.get_team(team_id).await?)
  }

  async fn list_teams(&self) -> Result<Vec<Team>, FlakyError> {
    Ok(self.inner.list_teams().await?)
  }

  async fn team_members(&self, team_id: Uuid) -> Result<Vec<User>, FlakyError> {
    Ok(self.inner.team_members(team_id).await?)
  }

  async fn join_team(&self, user_id: Uuid, team_id: Uuid) -> Result<JoinOutcome, FlakyError> {
    Ok(self.inner.join_team(user_id, team_id).await?)
  }

  async fn leave_team(&self, user_id: Uuid) -> Result<Option<Uuid>, FlakyError> {
    Ok(self.inner.leave_team(user_id).await?)
  }

  async fn set_team_points(&self, team_id: Uuid, total_points: i64) -> Result<(), FlakyError> {
    Ok(self.inner.set_team_points(team_id, total_points).await?)
  }

  async fn team_achievements(&self, team_id: Uuid) -> Result<Vec<TeamAchievement>, FlakyError> {
    Ok(self.inner.team_achievements(team_id).await?)
  }

  async fn find_wednesday_award(
    &self,
    team_id: Uuid,
    date: NaiveDate,
  ) -> Result<Option<WellnessWednesdayAward>, FlakyError> {
    Ok(self.inner.find_wednesday_award(team_id, date).await?)
  }

  async fn award_wednesday_bonus(
    &self,
    team_id: Uuid,
    date: NaiveDate,
    bonus_points: i64,
  ) -> Result<AwardOutcome, FlakyError> {
    Ok(self.inner.award_wednesday_bonus(team_id, date, bonus_points).await?)
  }

  async fn is_admin(&self, email: String) -> Result<bool, FlakyError> {
    Ok(self.inner.is_admin(email).await?)
  }

  async fn add_admin(&self, email: String) -> Result<AdminUser, FlakyError> {
    Ok(self.inner.add_admin(email).await?)
  }

  async fn remove_admin(&self, email: String) -> Result<bool, FlakyError> {
    Ok(self.inner.remove_admin(email).await?)
  }

  async fn list_admins(&self) -> Result<Vec<AdminUser>, FlakyError> {
    Ok(self.inner.list_admins().await?)
  }

  async fn get_setting(&self, key: String) -> Result<Option<AppSetting>, FlakyError> {
    Ok(self.inner.get_setting(key).await?)
  }

  async fn put_setting(&self, key: String, value: String) -> Result<AppSetting, FlakyError> {
    Ok(self.inner.put_setting(key, value).await?)
  }
}

// ─── Setup ───────────────────────────────────────────────────────────────────

fn wednesday() -> NaiveDate { NaiveDate::from_ymd_opt(2026, 3, 18).unwrap() }

async fn flaky_service(attempts: u32) -> (WellnessService<FlakyStore>, Arc<FlakyStore>) {
  let store = Arc::new(FlakyStore {
    inner:  SqliteStore::open_in_memory().await.unwrap(),
    faults: Faults::default(),
  });
  let svc = WellnessService::new(store.clone())
    .with_clock(FixedClock(wednesday()))
    .with_retry_policy(RetryPolicy {
      max_attempts: attempts,
      backoff:      Backoff::Fixed(Duration::ZERO),
    });
  (svc, store)
}

fn robin() -> Identity {
  Identity {
    user_id:      Uuid::new_v4(),
    email:        "robin@example.com".into(),
    display_name: Some("Robin".into()),
  }
}

async fn first_activity(svc: &WellnessService<FlakyStore>) -> Uuid {
  svc.ensure_catalog().await.unwrap()[0].activity_id
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn duplicate_insert_after_precheck_is_already_logged() {
  let (svc, store) = flaky_service(1).await;
  let who = robin();
  let hydrate = first_activity(&svc).await;

  let first = svc.log_activity(&who, hydrate, wednesday()).await.unwrap();
  assert!(matches!(first, LogOutcome::Logged { .. }));

  // The pre-check misses the row, so the unique constraint has to catch it.
  store.faults.hide_logs.store(true, Ordering::SeqCst);
  let second = svc.log_activity(&who, hydrate, wednesday()).await.unwrap();
  assert_eq!(second, LogOutcome::AlreadyLogged);

  let logs = store.inner.logs_on(who.user_id, wednesday()).await.unwrap();
  assert_eq!(logs.len(), 1);
}

#[tokio::test]
async fn missing_reference_asks_for_a_refresh() {
  let (svc, store) = flaky_service(3).await;
  let hydrate = first_activity(&svc).await;
  store.fail_inserts(&[StoreErrorKind::MissingReference]);

  let err = svc.log_activity(&robin(), hydrate, wednesday()).await.unwrap_err();
  assert!(matches!(err, Error::ProfileSettingUp), "got {err:?}");
  assert_eq!(store.faults.insert_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn transient_insert_failures_are_retried() {
  let (svc, store) = flaky_service(3).await;
  let who = robin();
  let hydrate = first_activity(&svc).await;
  store.fail_inserts(&[StoreErrorKind::Transient, StoreErrorKind::Transient]);

  let outcome = svc.log_activity(&who, hydrate, wednesday()).await.unwrap();
  let LogOutcome::Logged { totals, .. } = outcome else {
    panic!("third attempt should succeed");
  };
  assert_eq!(totals.total_points, 5);
  assert_eq!(store.faults.insert_calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn persistent_transient_failure_exhausts_retries() {
  let (svc, store) = flaky_service(3).await;
  let who = robin();
  let hydrate = first_activity(&svc).await;
  store.fail_inserts(&[StoreErrorKind::Transient; 3]);

  let err = svc.log_activity(&who, hydrate, wednesday()).await.unwrap_err();
  match err {
    Error::RetriesExhausted { attempts, .. } => assert_eq!(attempts, 3),
    other => panic!("expected exhausted retries, got {other:?}"),
  }
  assert!(store.inner.logs_on(who.user_id, wednesday()).await.unwrap().is_empty());
}

#[tokio::test]
async fn profile_falls_back_to_zero_when_the_read_fails() {
  let (svc, store) = flaky_service(1).await;
  let who = robin();
  store.faults.ensure_user.store(true, Ordering::SeqCst);

  let summary = svc.profile(&who).await;
  assert_eq!(summary.user.user_id, who.user_id);
  assert_eq!(summary.user.total_points, 0);
  assert_eq!(summary.user.current_streak, 0);
  assert_eq!(summary.tier, Tier::Seedling);
  assert_eq!(summary.points_to_next_tier, Some(100));
}
