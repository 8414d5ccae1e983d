//! Admin authorization and admin-only operations.
//!
//! Every operation here checks the caller first and fails with
//! [`Error::Unauthorized`] before touching the store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wellness_core::{
  activity::Activity,
  admin::{normalize_email, AdminSource, AdminUser, AppSetting},
  store::WellnessStore,
  user::Identity,
};

use crate::{Error, Result, WellnessService};

/// Both halves of the admin list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminRoster {
  pub seed:      Vec<String>,
  pub persisted: Vec<AdminUser>,
}

impl<S: WellnessStore> WellnessService<S> {
  /// Where `email` gets admin rights from, if anywhere. The seed set is
  /// consulted before the store.
  pub async fn admin_source(&self, email: &str) -> Result<Option<AdminSource>> {
    if self.admins.contains(email) {
      return Ok(Some(AdminSource::Seed));
    }
    let persisted = self
      .store
      .is_admin(normalize_email(email))
      .await
      .map_err(Error::store)?;
    Ok(persisted.then_some(AdminSource::Persisted))
  }

  pub async fn require_admin(&self, identity: &Identity) -> Result<AdminSource> {
    match self.admin_source(&identity.email).await? {
      Some(source) => Ok(source),
      None => {
        tracing::warn!(user_id = %identity.user_id, "admin action refused");
        Err(Error::Unauthorized)
      }
    }
  }

  pub async fn list_admins(&self, identity: &Identity) -> Result<AdminRoster> {
    self.require_admin(identity).await?;
    let persisted = self.store.list_admins().await.map_err(Error::store)?;
    Ok(AdminRoster {
      seed: self.admins.emails().map(str::to_owned).collect(),
      persisted,
    })
  }

  pub async fn add_admin(&self, identity: &Identity, email: &str) -> Result<AdminUser> {
    self.require_admin(identity).await?;
    let email = normalize_email(email);
    if !is_plausible_email(&email) {
      return Err(Error::InvalidInput(format!("{email:?} is not an email address")));
    }

    let admin = self.store.add_admin(email).await.map_err(Error::store)?;
    tracing::info!(admin = %admin.email, by = %identity.email, "admin added");
    Ok(admin)
  }

  /// Remove a persisted admin. Seeded admins cannot be removed at runtime.
  pub async fn remove_admin(&self, identity: &Identity, email: &str) -> Result<()> {
    self.require_admin(identity).await?;
    if self.admins.contains(email) {
      return Err(Error::InvalidInput(format!(
        "{email:?} is configured at startup and cannot be removed"
      )));
    }

    let removed = self
      .store
      .remove_admin(email.to_owned())
      .await
      .map_err(Error::store)?;
    if !removed {
      return Err(Error::NotFound(format!("admin {email}")));
    }
    tracing::info!(admin = %normalize_email(email), by = %identity.email, "admin removed");
    Ok(())
  }

  /// Delete a user and their logs, then refresh their former team's total.
  pub async fn delete_user(&self, identity: &Identity, user_id: Uuid) -> Result<()> {
    self.require_admin(identity).await?;
    let user = self
      .store
      .get_user(user_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound(format!("user {user_id}")))?;

    self.store.delete_user(user_id).await.map_err(Error::store)?;
    self.cache.invalidate_user(user_id);
    tracing::info!(%user_id, by = %identity.email, "user deleted");

    if let Some(team_id) = user.team_id {
      self.recalculate_team_points(team_id).await?;
    }
    Ok(())
  }

  /// Delete a user's logs and zero their aggregates. Team membership stays.
  pub async fn reset_user(&self, identity: &Identity, user_id: Uuid) -> Result<()> {
    self.require_admin(identity).await?;
    let user = self
      .store
      .get_user(user_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound(format!("user {user_id}")))?;

    self.store.reset_user(user_id).await.map_err(Error::store)?;
    self.cache.invalidate_user(user_id);
    tracing::info!(%user_id, by = %identity.email, "user reset");

    if let Some(team_id) = user.team_id {
      self.recalculate_team_points(team_id).await?;
    }
    Ok(())
  }

  /// Correct an activity's point value. Existing logs are not rewritten.
  pub async fn correct_activity_points(
    &self,
    identity:    &Identity,
    activity_id: Uuid,
    points:      i32,
  ) -> Result<Activity> {
    self.require_admin(identity).await?;
    if points < 0 {
      return Err(Error::InvalidInput("activity points cannot be negative".into()));
    }

    let activity = self
      .store
      .set_activity_points(activity_id, points)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound(format!("activity {activity_id}")))?;
    tracing::info!(%activity_id, points, by = %identity.email, "activity points corrected");
    Ok(activity)
  }

  pub async fn get_setting(&self, identity: &Identity, key: &str) -> Result<AppSetting> {
    self.require_admin(identity).await?;
    self
      .store
      .get_setting(key.to_owned())
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound(format!("setting {key}")))
  }

  pub async fn put_setting(
    &self,
    identity: &Identity,
    key:      &str,
    value:    String,
  ) -> Result<AppSetting> {
    self.require_admin(identity).await?;
    if key.trim().is_empty() {
      return Err(Error::InvalidInput("setting keys cannot be empty".into()));
    }

    let setting = self
      .store
      .put_setting(key.to_owned(), value)
      .await
      .map_err(Error::store)?;
    tracing::info!(key, by = %identity.email, "setting updated");
    Ok(setting)
  }
}

fn is_plausible_email(email: &str) -> bool {
  match email.split_once('@') {
    Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
    None => false,
  }
}

#[cfg(test)]
mod tests {
  use super::is_plausible_email;

  #[test]
  fn email_shape_check() {
    assert!(is_plausible_email("lead@example.com"));
    assert!(is_plausible_email("wellness-admin@localhost"));
    assert!(!is_plausible_email("lead"));
    assert!(!is_plausible_email("@example.com"));
    assert!(!is_plausible_email("lead@"));
    assert!(!is_plausible_email("a@b@c"));
  }
}
