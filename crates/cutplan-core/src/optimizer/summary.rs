use super::PackOutcome;
use crate::types::*;
use rust_decimal::Decimal;
use tracing::debug;

/// Turns a packer outcome into the final plan.
///
/// Areas are summed at full precision over all units and divided once, so
/// the ratio never accumulates per-unit rounding.
pub(super) fn assemble(kind: StockKind, outcome: PackOutcome) -> CutPlan {
    let summary = calculate_summary(&outcome);
    let utilization_pct = utilization(summary.used_area, summary.total_stock_area);
    let units_consumed = outcome.units.len() as u32;

    debug!(
        "Cut plan: {} units, {} unplaceable, {} remnants, {}% utilization",
        units_consumed,
        outcome.unplaceable.len(),
        outcome.scrap.len(),
        utilization_pct
    );

    CutPlan {
        kind,
        units: outcome.units,
        scrap: outcome.scrap,
        unplaceable: outcome.unplaceable,
        utilization_pct,
        units_consumed,
        summary,
    }
}

/// Computes consumed, used, remnant and waste areas.
pub(super) fn calculate_summary(outcome: &PackOutcome) -> Summary {
    let total_stock_area: Decimal = outcome.units.iter().map(UnitUsage::area).sum();
    let used_area: Decimal = outcome.units.iter().map(UnitUsage::used_area).sum();
    let reusable_remnant_area: Decimal = outcome.scrap.iter().map(ScrapRegion::area).sum();

    Summary {
        total_stock_area,
        used_area,
        reusable_remnant_area,
        waste_area: total_stock_area - used_area - reusable_remnant_area,
    }
}

/// `used / total × 100`, multiplied before dividing so the only rounding is
/// the final division. Zero when nothing was consumed.
pub(super) fn utilization(used_area: Decimal, total_area: Decimal) -> Decimal {
    if total_area <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    (used_area * Decimal::ONE_HUNDRED / total_area)
        .clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        .normalize()
}
