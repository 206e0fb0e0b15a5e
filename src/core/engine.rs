use super::types::{BuildingFinancials, MatrixLookup, ScenarioCell, ScenarioMatrix};

/// Builds the `[rate][loan_to_value]` grids. Inputs are expected to be finite;
/// magnitudes whose products exceed `f64::MAX` (roughly cost x rate above
/// 1e306) overflow the cash flow, and such cells report no cash-on-cash.
pub fn compute_matrix(
    financials: &BuildingFinancials,
    interest_rates: &[f64],
    loan_to_value_ratios: &[f64],
) -> ScenarioMatrix {
    let profit_before_interest = financials.profit_before_interest();

    let mut cash_flow = Vec::with_capacity(interest_rates.len());
    let mut cash_on_cash = Vec::with_capacity(interest_rates.len());
    for &rate in interest_rates {
        let mut flow_row = Vec::with_capacity(loan_to_value_ratios.len());
        let mut coc_row = Vec::with_capacity(loan_to_value_ratios.len());
        for &ltv in loan_to_value_ratios {
            let cell = evaluate_cell(financials, profit_before_interest, rate, ltv);
            flow_row.push(cell.cash_flow);
            coc_row.push(cell.cash_on_cash);
        }
        cash_flow.push(flow_row);
        cash_on_cash.push(coc_row);
    }

    ScenarioMatrix {
        interest_rates: interest_rates.to_vec(),
        loan_to_value_ratios: loan_to_value_ratios.to_vec(),
        profit_before_interest,
        cash_flow,
        cash_on_cash,
    }
}

pub fn stress_point(
    financials: &BuildingFinancials,
    interest_rate: f64,
    loan_to_value: f64,
) -> ScenarioCell {
    evaluate_cell(
        financials,
        financials.profit_before_interest(),
        interest_rate,
        loan_to_value,
    )
}

fn evaluate_cell(
    financials: &BuildingFinancials,
    profit_before_interest: f64,
    interest_rate: f64,
    loan_to_value: f64,
) -> ScenarioCell {
    let r = interest_rate / 100.0;
    let b = loan_to_value / 100.0;

    let loan_amount = financials.acquisition_cost * b;
    let down_payment = financials.acquisition_cost - loan_amount;
    let annual_interest = loan_amount * r;
    let cash_flow = profit_before_interest - annual_interest;
    // Non-positive down payment (no equity, or LTV above 100%) has no defined return.
    let cash_on_cash = (down_payment > 0.0)
        .then(|| (cash_flow / down_payment) * 100.0)
        .filter(|v| v.is_finite());

    ScenarioCell {
        interest_rate,
        loan_to_value,
        loan_amount,
        down_payment,
        annual_interest,
        profit_before_interest,
        cash_flow,
        cash_on_cash,
    }
}

impl ScenarioMatrix {
    pub fn rows(&self) -> usize {
        self.interest_rates.len()
    }

    pub fn columns(&self) -> usize {
        self.loan_to_value_ratios.len()
    }

    pub fn nearest(&self, interest_rate: f64, loan_to_value: f64) -> Option<MatrixLookup> {
        let row = nearest_index(&self.interest_rates, interest_rate)?;
        let column = nearest_index(&self.loan_to_value_ratios, loan_to_value)?;
        Some(MatrixLookup {
            row,
            column,
            used_interest_rate: self.interest_rates[row],
            used_loan_to_value: self.loan_to_value_ratios[column],
            cash_flow: self.cash_flow[row][column],
            cash_on_cash: self.cash_on_cash[row][column],
        })
    }
}

fn nearest_index(axis: &[f64], target: f64) -> Option<usize> {
    let (first, rest) = axis.split_first()?;
    let mut best_index = 0;
    let mut best_distance = (first - target).abs();
    for (offset, value) in rest.iter().enumerate() {
        let distance = (value - target).abs();
        if distance < best_distance {
            best_distance = distance;
            best_index = offset + 1;
        }
    }
    Some(best_index)
}
