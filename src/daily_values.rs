use crate::models::{DailyValue, DailyValueEntry, NutrientCategory};
use once_cell::sync::Lazy;
use regex::Regex;

const fn dv(amount: f64, unit: &'static str) -> DailyValue {
    DailyValue { amount, unit }
}

/// Recommended daily amounts, vitamins first, in display order.
pub const DAILY_VALUES: &[(&str, DailyValue)] = &[
    ("Vitamin A", dv(900.0, "mcg")),
    ("Vitamin C", dv(90.0, "mg")),
    ("Vitamin D", dv(20.0, "mcg")),
    ("Vitamin E", dv(15.0, "mg")),
    ("Vitamin K", dv(120.0, "mcg")),
    ("Thiamin (B1)", dv(1.2, "mg")),
    ("Riboflavin (B2)", dv(1.3, "mg")),
    ("Niacin (B3)", dv(16.0, "mg")),
    ("Vitamin B6", dv(1.7, "mg")),
    ("Folate (B9)", dv(400.0, "mcg")),
    ("Vitamin B12", dv(2.4, "mcg")),
    ("Biotin (B7)", dv(30.0, "mcg")),
    ("Pantothenic Acid (B5)", dv(5.0, "mg")),
    ("Calcium", dv(1300.0, "mg")),
    ("Chromium", dv(35.0, "mcg")),
    ("Chloride", dv(2300.0, "mg")),
    ("Copper", dv(0.9, "mg")),
    ("Iodine", dv(150.0, "mcg")),
    ("Iron", dv(18.0, "mg")),
    ("Magnesium", dv(420.0, "mg")),
    ("Manganese", dv(2.3, "mg")),
    ("Molybdenum", dv(45.0, "mcg")),
    ("Phosphorus", dv(1250.0, "mg")),
    ("Potassium", dv(4700.0, "mg")),
    ("Selenium", dv(55.0, "mcg")),
    ("Sodium", dv(2300.0, "mg")),
    ("Zinc", dv(11.0, "mg")),
];

pub const FACT_UNITS: &[&str] = &["mg", "g", "mcg", "IU", "capsules", "tablets"];

static VITAMIN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)vitamin|thiamin|riboflavin|niacin|folate|biotin|pantothenic")
        .expect("vitamin pattern is valid")
});

/// Exact-name lookup, as used by the aggregator keys.
pub fn get(name: &str) -> Option<DailyValue> {
    DAILY_VALUES
        .iter()
        .find(|(label, _)| *label == name)
        .map(|(_, value)| *value)
}

/// Case-insensitive lookup returning the canonical label.
pub fn canonical_name(name: &str) -> Option<&'static str> {
    let name = name.trim();
    DAILY_VALUES
        .iter()
        .find(|(label, _)| label.eq_ignore_ascii_case(name))
        .map(|(label, _)| *label)
}

pub fn category(name: &str) -> NutrientCategory {
    if VITAMIN_PATTERN.is_match(name) {
        NutrientCategory::Vitamin
    } else {
        NutrientCategory::Mineral
    }
}

pub fn entries() -> Vec<DailyValueEntry> {
    DAILY_VALUES
        .iter()
        .map(|(name, value)| DailyValueEntry {
            name: *name,
            amount: value.amount,
            unit: value.unit,
            category: category(name),
        })
        .collect()
}
