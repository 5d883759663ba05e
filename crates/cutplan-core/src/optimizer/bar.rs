use super::{scrap, PackOutcome};
use crate::types::*;
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// The single bar currently being filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct OpenBar {
    pub placements: Vec<PlacedPiece>,
    /// Length consumed from the usable start, trailing kerf included
    pub used: Decimal,
}

impl OpenBar {
    fn new() -> Self {
        Self {
            placements: Vec::new(),
            used: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Default)]
pub(super) struct BarState {
    pub closed: PackOutcome,
    pub open: Option<OpenBar>,
}

/// First-fit-decreasing packer for linear pieces on identical bars.
///
/// Pieces run along the bar's length (the y axis of a unit) and span the
/// full profile width.
pub(super) struct BarPacker {
    stock: StockUnit,
    /// Position of the first usable millimetre after squaring
    start: Decimal,
    usable_length: Decimal,
    kerf: Decimal,
    min_reusable: Decimal,
}

impl BarPacker {
    pub fn new(stock: &StockUnit, parameters: &Parameters) -> Self {
        let trim = parameters.squaring_allowance;
        Self {
            stock: stock.clone(),
            start: trim,
            usable_length: stock.length - trim * Decimal::TWO,
            kerf: parameters.kerf,
            min_reusable: parameters.min_reusable_dimension,
        }
    }

    pub fn pack(&self, pieces: Vec<Piece>) -> PackOutcome {
        let state = pieces
            .into_iter()
            .fold(BarState::default(), |state, piece| self.place(state, piece));
        self.finish(state)
    }

    pub fn place(&self, mut state: BarState, piece: Piece) -> BarState {
        if piece.length > self.usable_length {
            warn!(
                "Piece '{}' ({}) is longer than the usable bar length {}",
                piece.id, piece.length, self.usable_length
            );
            state.closed.unplaceable.push(piece);
            return state;
        }

        let mut open = state.open.take().unwrap_or_else(OpenBar::new);
        if !self.fits(&open, piece.length) {
            state = self.close(state, open);
            open = OpenBar::new();
        }

        let consumed = (piece.length + self.kerf).min(self.usable_length - open.used);
        open.placements.push(PlacedPiece {
            x: Decimal::ZERO,
            y: self.start + open.used,
            width: self.stock.width,
            length: piece.length,
            rotated: false,
            piece,
        });
        open.used += consumed;
        state.open = Some(open);
        state
    }

    /// A piece fits while it and its trailing kerf stay within the bar. An
    /// empty bar takes any piece no longer than itself.
    pub fn fits(&self, open: &OpenBar, length: Decimal) -> bool {
        open.placements.is_empty() || open.used + length + self.kerf <= self.usable_length
    }

    fn close(&self, mut state: BarState, open: OpenBar) -> BarState {
        if open.placements.is_empty() {
            return state;
        }

        let index = state.closed.units.len();
        let remnant = scrap::bar_remnant(
            index,
            self.start + open.used,
            self.usable_length - open.used,
            self.stock.width,
            self.min_reusable,
        );

        debug!(
            "Closed bar #{} with {} pieces, {} used of {}",
            index + 1,
            open.placements.len(),
            open.used,
            self.usable_length
        );

        state.closed.scrap.extend(remnant);
        state.closed.units.push(UnitUsage {
            number: index as u32 + 1,
            width: self.stock.width,
            length: self.stock.length,
            placements: open.placements,
        });
        state
    }

    pub fn finish(&self, mut state: BarState) -> PackOutcome {
        if let Some(open) = state.open.take() {
            state = self.close(state, open);
        }
        state.closed
    }
}
