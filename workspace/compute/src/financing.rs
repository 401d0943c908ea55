//! Standard annuity loan math for the financed part of a purchase.

/// Totals over the full loan term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanTotals {
    pub total_paid: f64,
    pub interest_paid: f64,
}

/// Total and interest paid over the term of an annuity loan with
/// principal `price - downpayment`, nominal APR in percent, and the term
/// in years. A non-positive principal short-circuits to zero; a
/// non-positive rate degenerates to straight principal repayment.
pub fn amortized_totals(
    purchase_price: f64,
    downpayment_sek: f64,
    interest_rate_pct: f64,
    years: u32,
) -> LoanTotals {
    let principal = (purchase_price - downpayment_sek).max(0.0);
    let n = f64::from((years * 12).max(1));
    let annual_rate = interest_rate_pct.max(0.0) / 100.0;

    if principal <= 0.0 {
        return LoanTotals {
            total_paid: 0.0,
            interest_paid: 0.0,
        };
    }

    let total_paid = if annual_rate <= 0.0 {
        let monthly = principal / n;
        monthly * n
    } else {
        let r = annual_rate / 12.0;
        let monthly = principal * (r / (1.0 - (1.0 + r).powf(-n)));
        monthly * n
    };

    LoanTotals {
        total_paid,
        interest_paid: total_paid - principal,
    }
}
