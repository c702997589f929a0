use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};

/// Amount of a nutrition fact. Empty while the user has not entered a number
/// yet; serialized as `""` in that state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Amount(Option<f64>);

impl Amount {
    pub fn new(value: f64) -> Self {
        Self(Some(value))
    }

    pub fn pending() -> Self {
        Self(None)
    }

    pub fn value(self) -> Option<f64> {
        self.0
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0 {
            Some(value) => serializer.serialize_f64(value),
            None => serializer.serialize_str(""),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(f64),
    Text(String),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = match Option::<RawAmount>::deserialize(deserializer)? {
            None => return Ok(Self::pending()),
            Some(RawAmount::Number(value)) => value,
            Some(RawAmount::Text(text)) => {
                let text = text.trim();
                if text.is_empty() {
                    return Ok(Self::pending());
                }
                text.parse::<f64>()
                    .map_err(|_| D::Error::custom(format!("amount {text:?} is not a number")))?
            }
        };

        if !value.is_finite() {
            return Err(D::Error::custom("amount must be a finite number"));
        }
        Ok(Self::new(value))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NutritionFact {
    pub id: String,
    pub name: String,
    pub amount: Amount,
    pub unit: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Supplement {
    pub id: String,
    pub name: String,
    pub serving_size: Option<f64>,
    pub serving_unit: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub nutrition_facts: Vec<NutritionFact>,
}

/// Supplement as returned by the API, with its active-set membership.
#[derive(Debug, Clone, Serialize)]
pub struct SupplementView {
    #[serde(flatten)]
    pub supplement: Supplement,
    pub active: bool,
}

#[derive(Debug, Deserialize)]
pub struct NewSupplement {
    pub name: String,
    pub serving_size: Option<f64>,
    pub serving_unit: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Absent fields are left alone; `"serving_size": null` clears the size.
#[derive(Debug, Default, Deserialize)]
pub struct SupplementPatch {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub serving_size: Option<Option<f64>>,
    pub serving_unit: Option<String>,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Default, Deserialize)]
pub struct NewFact {
    pub name: Option<String>,
    #[serde(default)]
    pub amount: Amount,
    pub unit: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct FactPatch {
    pub name: Option<String>,
    pub amount: Option<Amount>,
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ActiveRequest {
    pub active: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct DailyValue {
    pub amount: f64,
    pub unit: &'static str,
}

#[derive(Debug, Serialize)]
pub struct DailyValueEntry {
    pub name: &'static str,
    pub amount: f64,
    pub unit: &'static str,
    pub category: NutrientCategory,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NutrientCategory {
    Vitamin,
    Mineral,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NutrientTotal {
    pub amount: f64,
    pub unit: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct NutrientStatus {
    pub name: String,
    pub intake: f64,
    pub intake_unit: Option<String>,
    pub daily_value: f64,
    pub daily_value_unit: String,
    pub percentage: u64,
    pub meets_dv: bool,
    pub category: NutrientCategory,
}

#[derive(Debug, Default, Serialize)]
pub struct NutrientGroups {
    pub vitamins: Vec<NutrientStatus>,
    pub minerals: Vec<NutrientStatus>,
}

#[derive(Debug, Serialize)]
pub struct UntrackedNutrient {
    pub name: String,
    pub amount: f64,
    pub unit: String,
}

#[derive(Debug, Serialize)]
pub struct IntakeReport {
    pub date: String,
    pub active_count: usize,
    pub sufficient: NutrientGroups,
    pub insufficient: NutrientGroups,
    pub untracked: Vec<UntrackedNutrient>,
}
