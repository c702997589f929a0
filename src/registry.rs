use crate::daily_values;
use crate::errors::AppError;
use crate::models::{
    Amount, FactPatch, NewFact, NewSupplement, NutritionFact, Supplement, SupplementPatch,
    SupplementView,
};
use std::collections::HashSet;
use tracing::info;
use uuid::Uuid;

const DEFAULT_FACT_UNIT: &str = "mg";

/// In-memory supplements plus the set of ids counted toward today's intake.
#[derive(Debug, Default)]
pub struct Registry {
    supplements: Vec<Supplement>,
    active: HashSet<String>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, new: NewSupplement) -> Result<Supplement, AppError> {
        let name = required_name(&new.name)?;
        if let Some(size) = new.serving_size {
            validate_serving_size(size)?;
        }

        let supplement = Supplement {
            id: new_id(),
            name,
            serving_size: new.serving_size,
            serving_unit: non_blank(new.serving_unit),
            images: new.images,
            nutrition_facts: Vec::new(),
        };
        info!(id = %supplement.id, name = %supplement.name, "supplement added");
        self.supplements.push(supplement.clone());
        Ok(supplement)
    }

    pub fn get(&self, id: &str) -> Result<&Supplement, AppError> {
        self.supplements
            .iter()
            .find(|supplement| supplement.id == id)
            .ok_or_else(|| AppError::SupplementNotFound(id.to_string()))
    }

    pub fn list(&self) -> &[Supplement] {
        &self.supplements
    }

    /// Matches the term against supplement names and nutrition fact names.
    pub fn search(&self, term: &str) -> Vec<&Supplement> {
        let term = term.trim().to_lowercase();
        self.supplements
            .iter()
            .filter(|supplement| {
                term.is_empty()
                    || supplement.name.to_lowercase().contains(&term)
                    || supplement
                        .nutrition_facts
                        .iter()
                        .any(|fact| fact.name.to_lowercase().contains(&term))
            })
            .collect()
    }

    pub fn update(&mut self, id: &str, patch: SupplementPatch) -> Result<Supplement, AppError> {
        let name = patch.name.as_deref().map(required_name).transpose()?;
        if let Some(Some(size)) = patch.serving_size {
            validate_serving_size(size)?;
        }

        let supplement = self.get_mut(id)?;
        if let Some(name) = name {
            supplement.name = name;
        }
        if let Some(size) = patch.serving_size {
            supplement.serving_size = size;
        }
        if let Some(unit) = patch.serving_unit {
            supplement.serving_unit = non_blank(Some(unit));
        }
        info!(id, name = %supplement.name, "supplement updated");
        Ok(supplement.clone())
    }

    pub fn delete(&mut self, id: &str) -> Result<Supplement, AppError> {
        let index = self
            .supplements
            .iter()
            .position(|supplement| supplement.id == id)
            .ok_or_else(|| AppError::SupplementNotFound(id.to_string()))?;
        let removed = self.supplements.remove(index);
        self.active.remove(id);
        info!(id, name = %removed.name, "supplement deleted");
        Ok(removed)
    }

    pub fn add_fact(&mut self, id: &str, new: NewFact) -> Result<NutritionFact, AppError> {
        validate_amount(new.amount)?;
        let fact = NutritionFact {
            id: new_id(),
            name: new.name.as_deref().map(fact_name).unwrap_or_default(),
            amount: new.amount,
            unit: non_blank(new.unit).unwrap_or_else(|| DEFAULT_FACT_UNIT.to_string()),
        };
        self.get_mut(id)?.nutrition_facts.push(fact.clone());
        info!(id, fact_id = %fact.id, name = %fact.name, "nutrition fact added");
        Ok(fact)
    }

    pub fn update_fact(
        &mut self,
        id: &str,
        fact_id: &str,
        patch: FactPatch,
    ) -> Result<NutritionFact, AppError> {
        if let Some(amount) = patch.amount {
            validate_amount(amount)?;
        }
        let fact = self
            .get_mut(id)?
            .nutrition_facts
            .iter_mut()
            .find(|fact| fact.id == fact_id)
            .ok_or_else(|| AppError::FactNotFound(fact_id.to_string()))?;

        if let Some(name) = patch.name {
            fact.name = fact_name(&name);
        }
        if let Some(amount) = patch.amount {
            fact.amount = amount;
        }
        if let Some(unit) = non_blank(patch.unit) {
            fact.unit = unit;
        }
        info!(id, fact_id, name = %fact.name, "nutrition fact updated");
        Ok(fact.clone())
    }

    pub fn delete_fact(&mut self, id: &str, fact_id: &str) -> Result<NutritionFact, AppError> {
        let facts = &mut self.get_mut(id)?.nutrition_facts;
        let index = facts
            .iter()
            .position(|fact| fact.id == fact_id)
            .ok_or_else(|| AppError::FactNotFound(fact_id.to_string()))?;
        let removed = facts.remove(index);
        info!(id, fact_id, name = %removed.name, "nutrition fact deleted");
        Ok(removed)
    }

    pub fn set_active(&mut self, id: &str, checked: bool) -> Result<bool, AppError> {
        self.get(id)?;
        if checked {
            self.active.insert(id.to_string());
        } else {
            self.active.remove(id);
        }
        info!(id, active = checked, "supplement toggled");
        Ok(checked)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.contains(id)
    }

    /// Active supplements in registry order.
    pub fn active_supplements(&self) -> Vec<&Supplement> {
        self.supplements
            .iter()
            .filter(|supplement| self.active.contains(&supplement.id))
            .collect()
    }

    pub fn view(&self, supplement: &Supplement) -> SupplementView {
        SupplementView {
            active: self.is_active(&supplement.id),
            supplement: supplement.clone(),
        }
    }

    fn get_mut(&mut self, id: &str) -> Result<&mut Supplement, AppError> {
        self.supplements
            .iter_mut()
            .find(|supplement| supplement.id == id)
            .ok_or_else(|| AppError::SupplementNotFound(id.to_string()))
    }
}

fn new_id() -> String {
    Uuid::new_v4().to_string()
}

fn required_name(name: &str) -> Result<String, AppError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::bad_request("Supplement name is required."));
    }
    Ok(name.to_string())
}

/// Snaps names onto the daily-value label when they match one ignoring case.
fn fact_name(name: &str) -> String {
    daily_values::canonical_name(name)
        .map(str::to_string)
        .unwrap_or_else(|| name.trim().to_string())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn validate_serving_size(size: f64) -> Result<(), AppError> {
    if !size.is_finite() || size <= 0.0 {
        return Err(AppError::bad_request("serving size must be a positive number"));
    }
    Ok(())
}

fn validate_amount(amount: Amount) -> Result<(), AppError> {
    match amount.value() {
        Some(value) if value < 0.0 => Err(AppError::bad_request("amount must not be negative")),
        _ => Ok(()),
    }
}
