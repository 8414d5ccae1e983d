//! Point-threshold bands. Purely presentational; never stored.

use serde::{Deserialize, Serialize};

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
  Seedling,
  Bloomer,
  Champion,
}

impl Tier {
  pub const ALL: [Tier; 3] = [Tier::Seedling, Tier::Bloomer, Tier::Champion];

  /// Minimum total points needed to hold this tier.
  pub fn threshold(self) -> i64 {
    match self {
      Self::Seedling => 0,
      Self::Bloomer => 100,
      Self::Champion => 250,
    }
  }

  pub fn for_points(points: i64) -> Self {
    Self::ALL
      .into_iter()
      .rev()
      .find(|tier| points >= tier.threshold())
      .unwrap_or(Self::Seedling)
  }

  pub fn next(self) -> Option<Self> {
    match self {
      Self::Seedling => Some(Self::Bloomer),
      Self::Bloomer => Some(Self::Champion),
      Self::Champion => None,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn bands_follow_thresholds() {
    assert_eq!(Tier::for_points(0), Tier::Seedling);
    assert_eq!(Tier::for_points(99), Tier::Seedling);
    assert_eq!(Tier::for_points(100), Tier::Bloomer);
    assert_eq!(Tier::for_points(249), Tier::Bloomer);
    assert_eq!(Tier::for_points(250), Tier::Champion);
    assert_eq!(Tier::for_points(10_000), Tier::Champion);
  }

  #[test]
  fn negative_points_stay_seedling() {
    assert_eq!(Tier::for_points(-5), Tier::Seedling);
  }
}
