use crate::daily_values::{self, DAILY_VALUES};
use crate::models::{
    DailyValue, IntakeReport, NutrientCategory, NutrientGroups, NutrientStatus, NutrientTotal,
    Supplement, UntrackedNutrient,
};
use chrono::{Local, NaiveDate};
use std::collections::BTreeMap;

/// Sums nutrition facts by name. A later fact whose unit differs from the
/// first one seen for that name is dropped, not converted.
pub fn aggregate<'a, I>(supplements: I) -> BTreeMap<String, NutrientTotal>
where
    I: IntoIterator<Item = &'a Supplement>,
{
    let mut totals: BTreeMap<String, NutrientTotal> = BTreeMap::new();
    for fact in supplements
        .into_iter()
        .flat_map(|supplement| &supplement.nutrition_facts)
    {
        let Some(amount) = fact.amount.value() else {
            continue;
        };
        let name = fact.name.trim();
        if name.is_empty() {
            continue;
        }

        match totals.get_mut(name) {
            Some(total) if total.unit == fact.unit => total.amount += amount,
            Some(_) => {}
            None => {
                totals.insert(
                    name.to_string(),
                    NutrientTotal {
                        amount,
                        unit: fact.unit.clone(),
                    },
                );
            }
        }
    }
    totals
}

/// Whole-number percentage of the daily value, 0 when the reference is not positive.
pub fn percentage(intake: f64, daily_value: f64) -> u64 {
    if daily_value > 0.0 {
        (intake / daily_value * 100.0).round().max(0.0) as u64
    } else {
        0
    }
}

pub fn compare(name: &str, total: Option<&NutrientTotal>, reference: DailyValue) -> NutrientStatus {
    let intake = total.map_or(0.0, |total| total.amount);
    NutrientStatus {
        name: name.to_string(),
        intake,
        intake_unit: total.map(|total| total.unit.clone()),
        daily_value: reference.amount,
        daily_value_unit: reference.unit.to_string(),
        percentage: percentage(intake, reference.amount),
        meets_dv: intake >= reference.amount,
        category: daily_values::category(name),
    }
}

pub fn build_report<'a, I>(active: I) -> IntakeReport
where
    I: IntoIterator<Item = &'a Supplement>,
{
    build_report_at(Local::now().date_naive(), active)
}

pub fn build_report_at<'a, I>(today: NaiveDate, active: I) -> IntakeReport
where
    I: IntoIterator<Item = &'a Supplement>,
{
    let active: Vec<&Supplement> = active.into_iter().collect();
    let totals = aggregate(active.iter().copied());

    let mut sufficient = NutrientGroups::default();
    let mut insufficient = NutrientGroups::default();
    for (name, reference) in DAILY_VALUES {
        let status = compare(name, totals.get(*name), *reference);
        let groups = if status.meets_dv {
            &mut sufficient
        } else {
            &mut insufficient
        };
        match status.category {
            NutrientCategory::Vitamin => groups.vitamins.push(status),
            NutrientCategory::Mineral => groups.minerals.push(status),
        }
    }

    let untracked = totals
        .into_iter()
        .filter(|(name, _)| daily_values::get(name).is_none())
        .map(|(name, total)| UntrackedNutrient {
            name,
            amount: total.amount,
            unit: total.unit,
        })
        .collect();

    IntakeReport {
        date: today.to_string(),
        active_count: active.len(),
        sufficient,
        insufficient,
        untracked,
    }
}
