use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::coerce::{lenient_f64, lenient_string, lenient_u32};

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildingFinancials {
    #[serde(alias = "acquisition_cost", deserialize_with = "lenient_f64")]
    pub acquisition_cost: f64,
    #[serde(alias = "rental_income", deserialize_with = "lenient_f64")]
    pub rental_income: f64,
    #[serde(alias = "total_operating_cost", deserialize_with = "lenient_f64")]
    pub total_operating_cost: f64,
}

impl BuildingFinancials {
    pub fn new(acquisition_cost: f64, rental_income: f64, total_operating_cost: f64) -> Self {
        Self {
            acquisition_cost,
            rental_income,
            total_operating_cost,
        }
    }

    /// Reads a snapshot out of an arbitrary JSON value. Anything that is not an
    /// object, and any field that is not numeric, reads as zero.
    pub fn from_json(value: &Value) -> Self {
        BuildingFinancials::deserialize(value).unwrap_or_default()
    }

    pub fn profit_before_interest(&self) -> f64 {
        self.rental_income - self.total_operating_cost
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct OperatingCosts {
    #[serde(alias = "premises_costs", deserialize_with = "lenient_f64")]
    pub premises_costs: f64,
    #[serde(alias = "district_heating", deserialize_with = "lenient_f64")]
    pub district_heating: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub insurance: f64,
    #[serde(alias = "property_tax", deserialize_with = "lenient_f64")]
    pub property_tax: f64,
    #[serde(alias = "waste_collection", deserialize_with = "lenient_f64")]
    pub waste_collection: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub water: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub sundries: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub internet: f64,
    #[serde(alias = "owners_association", deserialize_with = "lenient_f64")]
    pub owners_association: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub administration: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub accounting: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub caretaker: f64,
    #[serde(alias = "exterior_maintenance", deserialize_with = "lenient_f64")]
    pub exterior_maintenance: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub other: f64,
}

impl OperatingCosts {
    pub fn total(&self) -> f64 {
        [
            self.premises_costs,
            self.district_heating,
            self.insurance,
            self.property_tax,
            self.waste_collection,
            self.water,
            self.sundries,
            self.internet,
            self.owners_association,
            self.administration,
            self.accounting,
            self.caretaker,
            self.exterior_maintenance,
            self.other,
        ]
        .iter()
        .sum()
    }
}

fn lenient_costs<'de, D>(deserializer: D) -> Result<OperatingCosts, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(OperatingCosts::deserialize(&value).unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BuildingRecord {
    #[serde(deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(deserialize_with = "lenient_string")]
    pub address: String,
    #[serde(alias = "total_area", deserialize_with = "lenient_f64")]
    pub total_area: f64,
    #[serde(alias = "lease_count", deserialize_with = "lenient_u32")]
    pub lease_count: u32,
    #[serde(alias = "acquisition_cost", deserialize_with = "lenient_f64")]
    pub acquisition_cost: f64,
    #[serde(alias = "rental_income", deserialize_with = "lenient_f64")]
    pub rental_income: f64,
    #[serde(alias = "total_operating_cost", deserialize_with = "lenient_f64")]
    pub total_operating_cost: f64,
    #[serde(alias = "operating_costs", deserialize_with = "lenient_costs")]
    pub operating_costs: OperatingCosts,
    #[serde(deserialize_with = "lenient_string")]
    pub comment: String,
}

impl BuildingRecord {
    pub fn from_json(value: &Value) -> Self {
        BuildingRecord::deserialize(value).unwrap_or_default()
    }

    /// Stated total operating cost, or the itemised sum when no total was given.
    pub fn operating_cost(&self) -> f64 {
        if self.total_operating_cost == 0.0 {
            self.operating_costs.total()
        } else {
            self.total_operating_cost
        }
    }

    pub fn financials(&self) -> BuildingFinancials {
        BuildingFinancials::new(
            self.acquisition_cost,
            self.rental_income,
            self.operating_cost(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioGrid {
    pub interest_rates: Vec<f64>,
    pub loan_to_value_ratios: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioMatrix {
    pub interest_rates: Vec<f64>,
    pub loan_to_value_ratios: Vec<f64>,
    pub profit_before_interest: f64,
    pub cash_flow: Vec<Vec<f64>>,
    pub cash_on_cash: Vec<Vec<Option<f64>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioCell {
    pub interest_rate: f64,
    pub loan_to_value: f64,
    pub loan_amount: f64,
    pub down_payment: f64,
    pub annual_interest: f64,
    pub profit_before_interest: f64,
    pub cash_flow: f64,
    pub cash_on_cash: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixLookup {
    pub row: usize,
    pub column: usize,
    pub used_interest_rate: f64,
    pub used_loan_to_value: f64,
    pub cash_flow: f64,
    pub cash_on_cash: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildingKeyFigures {
    pub profit_before_interest: f64,
    pub net_yield: Option<f64>,
    pub gross_yield: Option<f64>,
    pub cost_ratio: Option<f64>,
    pub rent_per_area: Option<f64>,
    pub cost_per_area: Option<f64>,
    pub rent_per_lease: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn financials_read_camel_and_snake_case() {
        let camel = BuildingFinancials::from_json(&json!({
            "acquisitionCost": 1_000_000.0,
            "rentalIncome": 120_000.0,
            "totalOperatingCost": 40_000.0
        }));
        let snake = BuildingFinancials::from_json(&json!({
            "acquisition_cost": 1_000_000.0,
            "rental_income": 120_000.0,
            "total_operating_cost": 40_000.0
        }));
        assert_eq!(camel, snake);
        assert_eq!(camel.profit_before_interest(), 80_000.0);
    }

    #[test]
    fn financials_default_missing_and_garbage_fields_to_zero() {
        let empty = BuildingFinancials::from_json(&json!({}));
        assert_eq!(empty, BuildingFinancials::default());

        let garbage = BuildingFinancials::from_json(&json!({
            "acquisitionCost": null,
            "rentalIncome": "not a number",
            "totalOperatingCost": "2500"
        }));
        assert_eq!(garbage, BuildingFinancials::new(0.0, 0.0, 2500.0));

        assert_eq!(
            BuildingFinancials::from_json(&json!("oops")),
            BuildingFinancials::default()
        );
    }

    #[test]
    fn record_uses_itemised_costs_when_total_is_missing() {
        let record = BuildingRecord::from_json(&json!({
            "name": "Harbour House",
            "acquisitionCost": 2_000_000,
            "rentalIncome": 150_000,
            "operatingCosts": {
                "insurance": 5_000,
                "propertyTax": "12000",
                "water": 3_000,
                "other": null
            }
        }));
        assert_eq!(record.name, "Harbour House");
        assert_eq!(record.operating_cost(), 20_000.0);
        assert_eq!(
            record.financials(),
            BuildingFinancials::new(2_000_000.0, 150_000.0, 20_000.0)
        );
    }

    #[test]
    fn record_prefers_stated_total() {
        let record = BuildingRecord::from_json(&json!({
            "totalOperatingCost": 40_000,
            "operatingCosts": { "insurance": 5_000 }
        }));
        assert_eq!(record.operating_cost(), 40_000.0);
    }

    #[test]
    fn record_tolerates_malformed_breakdown_and_counts() {
        let record = BuildingRecord::from_json(&json!({
            "operatingCosts": "none",
            "leaseCount": "12",
            "totalArea": -5,
            "comment": 7
        }));
        assert_eq!(record.operating_costs, OperatingCosts::default());
        assert_eq!(record.lease_count, 12);
        assert_eq!(record.total_area, -5.0);
        assert_eq!(record.comment, "7");
    }

    #[test]
    fn matrix_serializes_sentinel_as_null() {
        let matrix = ScenarioMatrix {
            interest_rates: vec![5.0],
            loan_to_value_ratios: vec![100.0],
            profit_before_interest: 0.0,
            cash_flow: vec![vec![0.0]],
            cash_on_cash: vec![vec![None]],
        };
        let json = serde_json::to_value(&matrix).expect("serializable");
        assert_eq!(json["cashOnCash"], json!([[null]]));
        assert_eq!(json["loanToValueRatios"], json!([100.0]));
    }
}
