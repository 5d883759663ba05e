use crate::types::*;
use rust_decimal::Decimal;

/// Largest accepted stock or piece dimension. Keeps every area, sum and
/// percentage the engine computes inside `Decimal` range.
pub const MAX_DIMENSION: Decimal = Decimal::from_parts(1_000_000_000, 0, 0, false, 0);

/// Largest number of pieces a job may expand to.
pub const MAX_PIECES: u64 = 100_000;

/// Collects every problem in a job before any packing happens.
///
/// An empty result means the job can be optimized. An empty demand list is
/// not a problem; it simply produces an empty plan.
pub fn validate(request: &CutRequest) -> Vec<ValidationIssue> {
    let mut issues = Vec::new();
    let stock = &request.stock;
    let params = &request.parameters;

    for (name, value) in [
        ("kerf", params.kerf),
        ("squaring_allowance", params.squaring_allowance),
        ("min_reusable_dimension", params.min_reusable_dimension),
    ] {
        if value < Decimal::ZERO {
            issues.push(ValidationIssue::NegativeParameter { name, value });
        }
    }

    for (dimension, value) in [("width", stock.width), ("length", stock.length)] {
        if value <= Decimal::ZERO {
            issues.push(ValidationIssue::NonPositiveStock { dimension, value });
        } else if value > MAX_DIMENSION {
            issues.push(ValidationIssue::StockTooLarge {
                dimension,
                value,
                limit: MAX_DIMENSION,
            });
        } else if stock_axis_trimmed(stock.kind, dimension)
            && value - params.squaring_allowance * Decimal::TWO <= Decimal::ZERO
        {
            issues.push(ValidationIssue::UnusableStock {
                dimension,
                allowance: params.squaring_allowance,
            });
        }
    }

    for demand in &request.pieces {
        check_demand(demand, stock.kind, params.kerf, &mut issues);
    }

    let count = request
        .pieces
        .iter()
        .filter(|d| d.quantity > 0)
        .fold(0u64, |total, d| total.saturating_add(d.quantity as u64));
    if count > MAX_PIECES {
        issues.push(ValidationIssue::TooManyPieces {
            count,
            limit: MAX_PIECES,
        });
    }

    issues
}

/// Bars are only squared at their ends; the profile width is never trimmed.
fn stock_axis_trimmed(kind: StockKind, dimension: &str) -> bool {
    kind == StockKind::Sheet || dimension == "length"
}

fn check_demand(
    demand: &Demand,
    kind: StockKind,
    kerf: Decimal,
    issues: &mut Vec<ValidationIssue>,
) {
    if demand.quantity < 1 {
        issues.push(ValidationIssue::NonPositiveQuantity {
            label: demand.label.clone(),
            quantity: demand.quantity,
        });
    }

    let mut dimensions = vec![("length", demand.length)];
    if kind == StockKind::Sheet {
        match demand.width {
            Some(width) => dimensions.insert(0, ("width", width)),
            None => issues.push(ValidationIssue::MissingWidth {
                label: demand.label.clone(),
            }),
        }
    }

    let mut valid = true;
    for &(dimension, value) in &dimensions {
        if value <= Decimal::ZERO {
            valid = false;
            issues.push(ValidationIssue::NonPositiveDimension {
                label: demand.label.clone(),
                dimension,
                value,
            });
        } else if value > MAX_DIMENSION {
            valid = false;
            issues.push(ValidationIssue::PieceTooLarge {
                label: demand.label.clone(),
                dimension,
                value,
                limit: MAX_DIMENSION,
            });
        }
    }

    if !valid {
        return;
    }

    if let Some(smallest) = dimensions.iter().map(|(_, value)| *value).min() {
        if kerf >= smallest {
            issues.push(ValidationIssue::KerfTooWide {
                label: demand.label.clone(),
                kerf,
                smallest,
            });
        }
    }
}
