//! Team membership, daily scores, standings and the Wellness Wednesday bonus.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use wellness_core::{
  store::WellnessStore,
  team::{self, JoinOutcome, NewTeam, Team, WednesdayCheck},
  tier::Tier,
  user::{Identity, User},
  StoreError, StoreErrorKind,
};

use crate::{Error, Result, WellnessService};

const MAX_TEAM_NAME_LEN: usize = 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMember {
  pub user_id:      Uuid,
  pub display_name: String,
  pub total_points: i64,
  pub day_points:   i64,
  pub tier:         Tier,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamDetail {
  pub team:        Team,
  pub date:        NaiveDate,
  pub members:     Vec<TeamMember>,
  pub daily_score: f64,
}

/// One row of the team standings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStanding {
  pub rank:                  usize,
  pub team_id:               Uuid,
  pub name:                  String,
  pub banner_url:            Option<String>,
  pub member_count:          usize,
  pub member_points:         i64,
  pub average_member_points: f64,
  pub bonus_points:          i64,
  pub total_points:          i64,
}

impl<S: WellnessStore> WellnessService<S> {
  /// Mean of each member's points on `date`. `0.0` with no members.
  pub async fn calculate_team_daily_score(
    &self,
    team_id: Uuid,
    date:    NaiveDate,
  ) -> Result<f64> {
    let members = self
      .store
      .team_members(team_id)
      .await
      .map_err(Error::store)?;
    let points = self.member_day_points(&members, date).await?;
    Ok(team::daily_score(&points))
  }

  /// Check the team against the Wellness Wednesday rules and record the
  /// bonus if it qualifies and has not been awarded for `date` yet.
  pub async fn check_wellness_wednesday_bonus(
    &self,
    team_id: Uuid,
    date:    NaiveDate,
  ) -> Result<WednesdayCheck> {
    self.require_team(team_id).await?;
    let members = self
      .store
      .team_members(team_id)
      .await
      .map_err(Error::store)?;
    let points = self.stored_member_day_points(&members, date).await?;

    let bonus = match team::wednesday_bonus(date, &points) {
      Ok(bonus) => bonus,
      Err(reason) => return Ok(WednesdayCheck::Ineligible { reason }),
    };

    if let Some(award) = self
      .store
      .find_wednesday_award(team_id, date)
      .await
      .map_err(Error::store)?
    {
      return Ok(WednesdayCheck::AlreadyAwarded { bonus_points: award.bonus_points });
    }

    let outcome = self
      .retry
      .run("award_wednesday_bonus", || {
        self.store.award_wednesday_bonus(team_id, date, bonus)
      })
      .await?;
    let check = WednesdayCheck::from(outcome);
    if let WednesdayCheck::Awarded { bonus_points } = check {
      tracing::info!(%team_id, %date, bonus_points, "wellness wednesday bonus awarded");
    }
    Ok(check)
  }

  /// Create a team with the caller as its first member.
  pub async fn create_team(
    &self,
    identity:   &Identity,
    name:       &str,
    banner_url: Option<String>,
  ) -> Result<Team> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_TEAM_NAME_LEN {
      return Err(Error::InvalidInput(format!(
        "team names must be between 1 and {MAX_TEAM_NAME_LEN} characters"
      )));
    }

    let user = self.ensure_user(identity).await?;
    if let Some(team_id) = user.team_id {
      return Err(Error::AlreadyOnTeam(team_id));
    }

    let input = NewTeam {
      name: name.to_owned(),
      creator_id: user.user_id,
      banner_url: banner_url.filter(|url| !url.trim().is_empty()),
    };
    let team = match self.store.create_team(input).await {
      Ok(team) => team,
      Err(e) => return Err(self.create_team_failure(user.user_id, name, Error::store(e)).await),
    };
    self.cache.invalidate_user_record(user.user_id);
    tracing::info!(team_id = %team.team_id, name = %team.name, creator = %user.user_id, "team created");

    let total_points = self.recalculate_team_points(team.team_id).await?;
    Ok(Team { total_points, ..team })
  }

  async fn create_team_failure(&self, user_id: Uuid, name: &str, err: Error) -> Error {
    match err.store_kind() {
      Some(StoreErrorKind::Duplicate) => {
        Error::InvalidInput(format!("a team called {name:?} already exists"))
      }
      Some(StoreErrorKind::Conflict) => match self.store.get_user(user_id).await {
        Ok(Some(User { team_id: Some(team_id), .. })) => Error::AlreadyOnTeam(team_id),
        _ => err,
      },
      _ => err,
    }
  }

  pub async fn join_team(&self, user_id: Uuid, team_id: Uuid) -> Result<()> {
    let outcome = self
      .store
      .join_team(user_id, team_id)
      .await
      .map_err(|e| match e.kind() {
        StoreErrorKind::NotFound => Error::NotFound(format!("team {team_id}")),
        _ => Error::store(e),
      })?;

    match outcome {
      JoinOutcome::Joined => {}
      JoinOutcome::TeamFull => return Err(Error::TeamFull(team_id)),
      JoinOutcome::AlreadyOnTeam(current) => return Err(Error::AlreadyOnTeam(current)),
    }

    self.cache.invalidate_user_record(user_id);
    tracing::info!(%user_id, %team_id, "joined team");
    self.recalculate_team_points(team_id).await?;
    Ok(())
  }

  /// Leave the current team. Returns the team left, if any.
  pub async fn leave_team(&self, user_id: Uuid) -> Result<Option<Uuid>> {
    let former = self
      .store
      .leave_team(user_id)
      .await
      .map_err(|e| match e.kind() {
        StoreErrorKind::NotFound => Error::NotFound(format!("user {user_id}")),
        _ => Error::store(e),
      })?;

    if let Some(team_id) = former {
      self.cache.invalidate_user_record(user_id);
      tracing::info!(%user_id, %team_id, "left team");
      self.recalculate_team_points(team_id).await?;
    }
    Ok(former)
  }

  pub async fn team_detail(&self, team_id: Uuid, date: NaiveDate) -> Result<TeamDetail> {
    let team = self.require_team(team_id).await?;
    let users = self
      .store
      .team_members(team_id)
      .await
      .map_err(Error::store)?;
    let points = self.member_day_points(&users, date).await?;
    let daily_score = team::daily_score(&points);

    let members = users
      .into_iter()
      .zip(points)
      .map(|(user, day_points)| TeamMember {
        user_id: user.user_id,
        tier: user.tier(),
        display_name: user.display_name,
        total_points: user.total_points,
        day_points,
      })
      .collect();

    Ok(TeamDetail { team, date, members, daily_score })
  }

  /// Every team, highest total first.
  pub async fn team_standings(&self) -> Result<Vec<TeamStanding>> {
    let teams = self.store.list_teams().await.map_err(Error::store)?;
    let mut standings = Vec::with_capacity(teams.len());

    for team in teams {
      let members = self
        .store
        .team_members(team.team_id)
        .await
        .map_err(Error::store)?;
      let bonus_points = self.team_bonus_points(team.team_id).await?;
      let member_points: i64 = members.iter().map(|m| m.total_points).sum();
      let average_member_points = if members.is_empty() {
        0.0
      } else {
        member_points as f64 / members.len() as f64
      };

      standings.push(TeamStanding {
        rank: 0,
        team_id: team.team_id,
        name: team.name,
        banner_url: team.banner_url,
        member_count: members.len(),
        member_points,
        average_member_points,
        bonus_points,
        total_points: member_points + bonus_points,
      });
    }

    standings.sort_by(|a, b| {
      b.total_points
        .cmp(&a.total_points)
        .then_with(|| a.name.cmp(&b.name))
    });
    for (i, standing) in standings.iter_mut().enumerate() {
      standing.rank = i + 1;
    }
    Ok(standings)
  }

  /// Set the team's total to its members' points plus awarded bonuses.
  pub async fn recalculate_team_points(&self, team_id: Uuid) -> Result<i64> {
    let members = self
      .store
      .team_members(team_id)
      .await
      .map_err(Error::store)?;
    let member_points: i64 = members.iter().map(|m| m.total_points).sum();
    let total = member_points + self.team_bonus_points(team_id).await?;

    self
      .store
      .set_team_points(team_id, total)
      .await
      .map_err(Error::store)?;
    tracing::debug!(%team_id, total, "recalculated team points");
    Ok(total)
  }

  async fn team_bonus_points(&self, team_id: Uuid) -> Result<i64> {
    let achievements = self
      .store
      .team_achievements(team_id)
      .await
      .map_err(Error::store)?;
    Ok(achievements.iter().map(|a| a.points).sum())
  }

  async fn require_team(&self, team_id: Uuid) -> Result<Team> {
    self
      .store
      .get_team(team_id)
      .await
      .map_err(Error::store)?
      .ok_or_else(|| Error::NotFound(format!("team {team_id}")))
  }

  async fn member_day_points(&self, members: &[User], date: NaiveDate) -> Result<Vec<i64>> {
    let mut points = Vec::with_capacity(members.len());
    for member in members {
      points.push(self.today_points(member.user_id, date).await?);
    }
    Ok(points)
  }

  /// Uncached member points, for award decisions.
  async fn stored_member_day_points(
    &self,
    members: &[User],
    date: NaiveDate,
  ) -> Result<Vec<i64>> {
    let mut points = Vec::with_capacity(members.len());
    for member in members {
      points.push(self.stored_day_points(member.user_id, date).await?);
    }
    Ok(points)
  }
}
