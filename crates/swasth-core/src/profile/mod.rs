//! User profile and derived health metrics
//!
//! The profile feeds the agent as rendered text (the summary string and
//! the allergy list), never as raw fields. Metrics are recomputed on
//! demand from the stored measurements.

use serde::{Deserialize, Serialize};

pub mod store;

pub use store::ProfileStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 4] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary (office job)",
            ActivityLevel::LightlyActive => "Lightly Active (walking 1-3 days/wk)",
            ActivityLevel::ModeratelyActive => "Moderately Active (exercise 3-5 days/wk)",
            ActivityLevel::VeryActive => "Very Active (intense exercise 6-7 days/wk)",
        }
    }

    /// TDEE multiplier applied to the basal metabolic rate.
    pub fn multiplier(&self) -> f64 {
        match self {
            ActivityLevel::Sedentary => 1.2,
            ActivityLevel::LightlyActive => 1.375,
            ActivityLevel::ModeratelyActive => 1.55,
            ActivityLevel::VeryActive => 1.725,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Goal {
    LoseWeight,
    MaintainWeight,
    GainMuscle,
}

impl Goal {
    pub const ALL: [Goal; 3] = [Goal::LoseWeight, Goal::MaintainWeight, Goal::GainMuscle];

    pub fn label(&self) -> &'static str {
        match self {
            Goal::LoseWeight => "Lose Weight",
            Goal::MaintainWeight => "Maintain Weight",
            Goal::GainMuscle => "Gain Muscle",
        }
    }

    /// Daily calorie adjustment over maintenance.
    fn calorie_adjustment(&self) -> f64 {
        match self {
            Goal::LoseWeight => -500.0,
            Goal::MaintainWeight => 0.0,
            Goal::GainMuscle => 300.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DietPreference {
    Vegetarian,
    #[serde(rename = "Non-Vegetarian")]
    NonVegetarian,
    Any,
}

impl DietPreference {
    pub const ALL: [DietPreference; 3] = [
        DietPreference::Vegetarian,
        DietPreference::NonVegetarian,
        DietPreference::Any,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DietPreference::Vegetarian => "Vegetarian",
            DietPreference::NonVegetarian => "Non-Vegetarian",
            DietPreference::Any => "Any",
        }
    }
}

/// A user's profile. Fields stay `None` until setup collects them; the
/// profile only renders a full summary once [`UserProfile::is_complete`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserProfile {
    pub age: Option<u32>,
    pub gender: Option<Gender>,
    pub weight_kg: Option<f64>,
    pub height_cm: Option<f64>,
    pub activity_level: Option<ActivityLevel>,
    pub goal: Option<Goal>,
    /// Preferred regional cuisine, free text.
    pub region: Option<String>,
    pub diet_preference: Option<DietPreference>,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub allergies: Vec<String>,
}

fn default_language() -> String {
    "English".to_string()
}

impl UserProfile {
    pub fn new() -> Self {
        Self {
            language: default_language(),
            ..Default::default()
        }
    }

    /// All essential fields collected.
    pub fn is_complete(&self) -> bool {
        self.age.is_some()
            && self.gender.is_some()
            && self.weight_kg.is_some()
            && self.height_cm.is_some()
            && self.activity_level.is_some()
            && self.goal.is_some()
            && self.region.is_some()
            && self.diet_preference.is_some()
    }

    /// Body mass index, rounded to two decimals.
    pub fn bmi(&self) -> Option<f64> {
        let weight = self.weight_kg?;
        let height_m = self.height_cm? / 100.0;
        if height_m <= 0.0 {
            return None;
        }
        Some((weight / (height_m * height_m) * 100.0).round() / 100.0)
    }

    /// Basal metabolic rate via the Mifflin-St Jeor equation.
    pub fn bmr(&self) -> Option<f64> {
        let weight = self.weight_kg?;
        let height = self.height_cm?;
        let age = self.age? as f64;
        let base = 10.0 * weight + 6.25 * height - 5.0 * age;
        Some(match self.gender? {
            Gender::Male => base + 5.0,
            Gender::Female => base - 161.0,
        })
    }

    /// Daily calorie target: BMR scaled by activity, adjusted for the goal.
    pub fn daily_calories(&self) -> Option<i64> {
        let tdee = self.bmr()? * self.activity_level?.multiplier();
        Some((tdee + self.goal?.calorie_adjustment()).round() as i64)
    }

    fn bmi_category(bmi: f64) -> &'static str {
        if bmi < 18.5 {
            "Underweight"
        } else if bmi < 24.9 {
            "Normal"
        } else if bmi < 29.9 {
            "Overweight"
        } else {
            "Obesity"
        }
    }

    /// Comma-joined allergy list for tool parameters.
    pub fn allergies_csv(&self) -> String {
        self.allergies.join(", ")
    }

    pub fn diet_preference_label(&self) -> &'static str {
        self.diet_preference
            .map(|d| d.label())
            .unwrap_or(DietPreference::Any.label())
    }

    /// A formatted summary used both for display and as grounding context
    /// for the agent.
    pub fn summary(&self) -> String {
        if !self.is_complete() {
            return "Profile not set.".to_string();
        }

        // is_complete guarantees every component below.
        let bmi = self.bmi().unwrap_or_default();
        let calories = self.daily_calories().unwrap_or_default();
        let goal = self.goal.map(|g| g.label()).unwrap_or_default();
        let diet = self.diet_preference_label();
        let region = self.region.as_deref().unwrap_or_default();

        let mut summary = format!(
            "**Goal:** {goal}\n\
             **Dietary Preference:** {diet}\n\
             **Preferred Cuisine:** {region}\n\n\
             **Target:** ~{calories} kcal\n\
             **BMI:** {bmi} ({category})",
            category = Self::bmi_category(bmi),
        );

        if !self.allergies.is_empty() {
            summary.push_str(&format!(
                "\n\n**\u{26a0}\u{fe0f} Allergies:** {}",
                self.allergies.join(", ")
            ));
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_profile() -> UserProfile {
        UserProfile {
            age: Some(30),
            gender: Some(Gender::Male),
            weight_kg: Some(70.0),
            height_cm: Some(175.0),
            activity_level: Some(ActivityLevel::ModeratelyActive),
            goal: Some(Goal::MaintainWeight),
            region: Some("North Indian".to_string()),
            diet_preference: Some(DietPreference::Vegetarian),
            ..UserProfile::new()
        }
    }

    #[test]
    fn incomplete_profile_has_fixed_summary() {
        let profile = UserProfile::new();
        assert!(!profile.is_complete());
        assert_eq!(profile.summary(), "Profile not set.");
        assert_eq!(profile.language, "English");
    }

    #[test]
    fn bmi_is_rounded_to_two_decimals() {
        let profile = complete_profile();
        // 70 / 1.75^2 = 22.857...
        assert_eq!(profile.bmi(), Some(22.86));
    }

    #[test]
    fn bmr_follows_mifflin_st_jeor() {
        let profile = complete_profile();
        // 10*70 + 6.25*175 - 5*30 + 5 = 1648.75
        assert_eq!(profile.bmr(), Some(1648.75));

        let female = UserProfile {
            gender: Some(Gender::Female),
            ..complete_profile()
        };
        assert_eq!(female.bmr(), Some(1482.75));
    }

    #[test]
    fn daily_calories_reflect_activity_and_goal() {
        let profile = complete_profile();
        // 1648.75 * 1.55 = 2555.5625
        assert_eq!(profile.daily_calories(), Some(2556));

        let losing = UserProfile {
            goal: Some(Goal::LoseWeight),
            ..complete_profile()
        };
        assert_eq!(losing.daily_calories(), Some(2056));

        let gaining = UserProfile {
            goal: Some(Goal::GainMuscle),
            ..complete_profile()
        };
        assert_eq!(gaining.daily_calories(), Some(2856));
    }

    #[test]
    fn summary_includes_targets_and_allergy_warning() {
        let mut profile = complete_profile();
        let summary = profile.summary();
        assert!(summary.contains("**Goal:** Maintain Weight"));
        assert!(summary.contains("**Dietary Preference:** Vegetarian"));
        assert!(summary.contains("~2556 kcal"));
        assert!(summary.contains("(Normal)"));
        assert!(!summary.contains("Allergies"));

        profile.allergies = vec!["peanuts".to_string(), "shellfish".to_string()];
        let summary = profile.summary();
        assert!(summary.contains("Allergies:** peanuts, shellfish"));
        assert_eq!(profile.allergies_csv(), "peanuts, shellfish");
    }

    #[test]
    fn bmi_categories_cover_the_ranges() {
        assert_eq!(UserProfile::bmi_category(17.0), "Underweight");
        assert_eq!(UserProfile::bmi_category(22.0), "Normal");
        assert_eq!(UserProfile::bmi_category(27.0), "Overweight");
        assert_eq!(UserProfile::bmi_category(33.0), "Obesity");

        // The ranges are contiguous at the cut-offs.
        assert_eq!(UserProfile::bmi_category(24.95), "Overweight");
        assert_eq!(UserProfile::bmi_category(29.95), "Obesity");
    }

    #[test]
    fn diet_preference_serializes_with_hyphenated_name() {
        let json = serde_json::to_string(&DietPreference::NonVegetarian).unwrap();
        assert_eq!(json, "\"Non-Vegetarian\"");
        let parsed: DietPreference = serde_json::from_str("\"Non-Vegetarian\"").unwrap();
        assert_eq!(parsed, DietPreference::NonVegetarian);
    }
}
