use super::types::{BuildingKeyFigures, BuildingRecord};

pub fn key_figures(record: &BuildingRecord) -> BuildingKeyFigures {
    let financials = record.financials();
    let profit_before_interest = financials.profit_before_interest();
    let area = record.total_area;
    let leases = f64::from(record.lease_count);

    BuildingKeyFigures {
        profit_before_interest,
        net_yield: percent_of(profit_before_interest, financials.acquisition_cost),
        gross_yield: percent_of(financials.rental_income, financials.acquisition_cost),
        cost_ratio: percent_of(financials.total_operating_cost, financials.rental_income),
        rent_per_area: rounded_ratio(financials.rental_income, area),
        cost_per_area: rounded_ratio(financials.total_operating_cost, area),
        rent_per_lease: rounded_ratio(financials.rental_income, leases),
    }
}

fn percent_of(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator != 0.0).then(|| numerator / denominator * 100.0)
}

fn rounded_ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator != 0.0).then(|| (numerator / denominator).round())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const EPS: f64 = 1e-9;

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() <= EPS,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn figures_for_a_complete_record() {
        let record = BuildingRecord::from_json(&json!({
            "totalArea": 850,
            "leaseCount": 12,
            "acquisitionCost": 1_000_000,
            "rentalIncome": 120_000,
            "totalOperatingCost": 40_000
        }));
        let figures = key_figures(&record);

        assert_approx(figures.profit_before_interest, 80_000.0);
        assert_approx(figures.net_yield.expect("acquisition cost set"), 8.0);
        assert_approx(figures.gross_yield.expect("acquisition cost set"), 12.0);
        assert_approx(figures.cost_ratio.expect("rent set"), 100.0 / 3.0);
        assert_eq!(figures.rent_per_area, Some(141.0));
        assert_eq!(figures.cost_per_area, Some(47.0));
        assert_eq!(figures.rent_per_lease, Some(10_000.0));
    }

    #[test]
    fn zero_denominators_have_no_figure() {
        let figures = key_figures(&BuildingRecord::default());
        assert_eq!(figures.profit_before_interest, 0.0);
        assert_eq!(figures.net_yield, None);
        assert_eq!(figures.gross_yield, None);
        assert_eq!(figures.cost_ratio, None);
        assert_eq!(figures.rent_per_area, None);
        assert_eq!(figures.cost_per_area, None);
        assert_eq!(figures.rent_per_lease, None);
    }

    #[test]
    fn itemised_costs_feed_the_cost_ratio() {
        let record = BuildingRecord::from_json(&json!({
            "rentalIncome": 100_000,
            "operatingCosts": { "insurance": 10_000, "caretaker": 15_000 }
        }));
        let figures = key_figures(&record);
        assert_approx(figures.cost_ratio.expect("rent set"), 25.0);
        assert_approx(figures.profit_before_interest, 75_000.0);
    }
}
