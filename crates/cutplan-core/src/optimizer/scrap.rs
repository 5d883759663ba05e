use super::sheet::Region;
use crate::types::*;
use rust_decimal::Decimal;
use tracing::trace;

/// Reusable offcuts of a closed sheet.
///
/// Two guillotine-compatible candidates are tested: the full-width band below
/// the last shelf, and the strip right of the widest shelf down to that band.
/// A candidate is kept only if both sides reach `min_reusable`; anything
/// smaller stays in the aggregate waste.
pub(super) fn sheet_remnants(
    source_unit: usize,
    usable: &Region,
    used_right: Decimal,
    used_bottom: Decimal,
    kerf: Decimal,
    min_reusable: Decimal,
) -> Vec<ScrapRegion> {
    let band_y = used_bottom + kerf;
    let strip_x = used_right + kerf;

    let candidates = [
        Region {
            x: usable.x,
            y: band_y,
            width: usable.width,
            length: usable.bottom() - band_y,
        },
        Region {
            x: strip_x,
            y: usable.y,
            width: usable.right() - strip_x,
            length: used_bottom - usable.y,
        },
    ];

    candidates
        .into_iter()
        .filter(|region| {
            let keep = is_reusable(region.width, min_reusable)
                && is_reusable(region.length, min_reusable);
            if !keep {
                trace!(
                    "Sheet #{}: {}x{} offcut below reuse threshold",
                    source_unit + 1,
                    region.width,
                    region.length
                );
            }
            keep
        })
        .map(|region| ScrapRegion {
            source_unit,
            x: region.x,
            y: region.y,
            width: region.width,
            length: region.length,
            status: RemnantStatus::Available,
        })
        .collect()
}

/// Reusable remainder of a closed bar, if any.
///
/// Only the length is tested; the remainder always spans the full profile.
pub(super) fn bar_remnant(
    source_unit: usize,
    position: Decimal,
    remainder: Decimal,
    profile_width: Decimal,
    min_reusable: Decimal,
) -> Option<ScrapRegion> {
    if !is_reusable(remainder, min_reusable) {
        trace!(
            "Bar #{}: {} remainder below reuse threshold",
            source_unit + 1,
            remainder
        );
        return None;
    }

    Some(ScrapRegion {
        source_unit,
        x: Decimal::ZERO,
        y: position,
        width: profile_width,
        length: remainder,
        status: RemnantStatus::Available,
    })
}

fn is_reusable(size: Decimal, min_reusable: Decimal) -> bool {
    size > Decimal::ZERO && size >= min_reusable
}
