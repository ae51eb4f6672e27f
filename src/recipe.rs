//! Baker's percentages and oven temperature display

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// One flour in a recipe
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flour {
    #[serde(rename = "type")]
    pub kind: String,
    pub grams: f64,
}

/// Ingredient weights in grams
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub flours: Vec<Flour>,
    pub water_g: f64,
    pub starter_g: f64,
    #[serde(default)]
    pub leaven_g: f64,
}

/// Ingredients as whole percentages of total flour weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BakersPercentages {
    pub total_flour_g: u64,
    pub hydration_pct: u32,
    pub starter_pct: u32,
    pub leaven_pct: u32,
}

impl Recipe {
    /// Negative weights count as zero
    pub fn total_flour(&self) -> f64 {
        self.flours.iter().map(|f| f.grams.max(0.0)).sum()
    }

    pub fn percentages(&self) -> BakersPercentages {
        let total = self.total_flour();
        BakersPercentages {
            total_flour_g: total.round() as u64,
            hydration_pct: percentage(self.water_g, total),
            starter_pct: percentage(self.starter_g, total),
            leaven_pct: percentage(self.leaven_g, total),
        }
    }
}

/// `grams` as a rounded percentage of `total_flour`, 0 without flour
pub fn percentage(grams: f64, total_flour: f64) -> u32 {
    if total_flour <= 0.0 || grams <= 0.0 {
        return 0;
    }
    (grams / total_flour * 100.0).round() as u32
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum TempUnit {
    #[serde(rename = "C")]
    C,
    #[serde(rename = "F")]
    F,
}

/// How temperatures are shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub temp_unit: TempUnit,
    pub oven_temp_c: i32,
}

impl DisplaySettings {
    pub fn oven_temp(&self) -> String {
        display_temp(self.oven_temp_c, self.temp_unit)
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            temp_unit: TempUnit::C,
            oven_temp_c: 250,
        }
    }
}

/// Render an oven temperature given in Celsius
pub fn display_temp(celsius: i32, unit: TempUnit) -> String {
    match unit {
        TempUnit::C => format!("{}°C", celsius),
        TempUnit::F => format!("{}°F", (celsius as f64 * 9.0 / 5.0 + 32.0).round() as i64),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(flours: &[f64], water: f64, starter: f64, leaven: f64) -> Recipe {
        Recipe {
            flours: flours
                .iter()
                .map(|g| Flour {
                    kind: "White bread flour".to_string(),
                    grams: *g,
                })
                .collect(),
            water_g: water,
            starter_g: starter,
            leaven_g: leaven,
        }
    }

    #[test]
    fn test_default_country_loaf() {
        let pct = recipe(&[500.0], 375.0, 100.0, 0.0).percentages();
        assert_eq!(pct.total_flour_g, 500);
        assert_eq!(pct.hydration_pct, 75);
        assert_eq!(pct.starter_pct, 20);
        assert_eq!(pct.leaven_pct, 0);
    }

    #[test]
    fn test_multiple_flours_and_rounding() {
        let pct = recipe(&[400.0, 100.0, 100.0], 430.0, 90.0, 25.0).percentages();
        assert_eq!(pct.total_flour_g, 600);
        assert_eq!(pct.hydration_pct, 72);
        assert_eq!(pct.starter_pct, 15);
        assert_eq!(pct.leaven_pct, 4);
    }

    #[test]
    fn test_no_flour_gives_zero() {
        let pct = recipe(&[], 375.0, 100.0, 10.0).percentages();
        assert_eq!(pct.hydration_pct, 0);
        assert_eq!(pct.starter_pct, 0);
        assert_eq!(percentage(100.0, 0.0), 0);
    }

    #[test]
    fn test_display_temp() {
        assert_eq!(display_temp(250, TempUnit::C), "250°C");
        assert_eq!(display_temp(250, TempUnit::F), "482°F");
        assert_eq!(display_temp(230, TempUnit::F), "446°F");
    }

    #[test]
    fn test_recipe_json_shape() {
        let json = r#"{"flours":[{"type":"Rye","grams":100}],"water_g":80,"starter_g":20}"#;
        let recipe: Recipe = serde_json::from_str(json).unwrap();
        assert_eq!(recipe.flours[0].kind, "Rye");
        assert_eq!(recipe.percentages().hydration_pct, 80);
    }
}
