//! The activity catalog: what a participant can log each day.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Points awarded for every catalog activity unless an admin corrects it.
pub const DEFAULT_ACTIVITY_POINTS: i32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
  pub activity_id: Uuid,
  pub name:        String,
  pub emoji:       String,
  pub points:      i32,
  pub description: String,
}

/// Input to [`crate::store::WellnessStore::seed_activities`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewActivity {
  pub name:        String,
  pub emoji:       String,
  pub points:      i32,
  pub description: String,
}

impl NewActivity {
  fn catalog_entry(name: &str, emoji: &str, description: &str) -> Self {
    Self {
      name:        name.to_owned(),
      emoji:       emoji.to_owned(),
      points:      DEFAULT_ACTIVITY_POINTS,
      description: description.to_owned(),
    }
  }
}

/// The built-in catalog seeded into an empty store.
pub fn default_catalog() -> Vec<NewActivity> {
  vec![
    NewActivity::catalog_entry(
      "Hydration",
      "💧",
      "Drink at least eight glasses of water.",
    ),
    NewActivity::catalog_entry(
      "Move",
      "🚶",
      "Thirty minutes of walking, running, cycling or any workout.",
    ),
    NewActivity::catalog_entry(
      "Stretch",
      "🧘",
      "Ten minutes of stretching or yoga.",
    ),
    NewActivity::catalog_entry(
      "Eat the Rainbow",
      "🥗",
      "Five servings of fruit and vegetables.",
    ),
    NewActivity::catalog_entry(
      "Rest",
      "😴",
      "Seven or more hours of sleep.",
    ),
    NewActivity::catalog_entry(
      "Mindfulness",
      "🧠",
      "Ten minutes of meditation or breathing exercises.",
    ),
    NewActivity::catalog_entry(
      "Unplug",
      "📵",
      "A screen-free break of at least thirty minutes.",
    ),
    NewActivity::catalog_entry(
      "Gratitude",
      "📝",
      "Write down three things you are grateful for.",
    ),
  ]
}

#[cfg(test)]
mod tests {
  use std::collections::HashSet;

  use super::*;

  #[test]
  fn catalog_names_are_unique_and_worth_five() {
    let catalog = default_catalog();
    let names: HashSet<_> = catalog.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names.len(), catalog.len());
    assert!(catalog.iter().all(|a| a.points == DEFAULT_ACTIVITY_POINTS));
  }
}
