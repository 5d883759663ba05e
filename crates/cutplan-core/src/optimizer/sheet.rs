use super::{scrap, PackOutcome};
use crate::types::*;
use rust_decimal::Decimal;
use tracing::{debug, warn};

/// Rectangle on a sheet, used for the usable area left after squaring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Region {
    pub x: Decimal,
    pub y: Decimal,
    pub width: Decimal,
    pub length: Decimal,
}

impl Region {
    pub fn right(&self) -> Decimal {
        self.x + self.width
    }

    pub fn bottom(&self) -> Decimal {
        self.y + self.length
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Shelf {
    y: Decimal,
    /// Tallest piece placed on the shelf so far
    height: Decimal,
    /// Index of the shelf's first placement on the sheet
    first: usize,
}

/// The single sheet currently being filled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct OpenSheet {
    pub placements: Vec<PlacedPiece>,
    shelf: Shelf,
}

impl OpenSheet {
    pub fn new(usable: &Region) -> Self {
        Self {
            placements: Vec::new(),
            shelf: Shelf {
                y: usable.y,
                height: Decimal::ZERO,
                first: 0,
            },
        }
    }

    fn shelf_pieces(&self) -> &[PlacedPiece] {
        &self.placements[self.shelf.first..]
    }

    pub fn put(mut self, spot: Spot, placed: PlacedPiece) -> Self {
        if spot.opens_shelf {
            self.shelf = Shelf {
                y: spot.y,
                height: Decimal::ZERO,
                first: self.placements.len(),
            };
        }
        self.shelf.height = self.shelf.height.max(placed.length);
        self.placements.push(placed);
        self
    }

    /// Lowest edge reached by any shelf.
    fn used_bottom(&self) -> Decimal {
        self.shelf.y + self.shelf.height
    }

    /// Rightmost edge of the widest shelf.
    fn used_right(&self, usable: &Region) -> Decimal {
        self.placements
            .iter()
            .map(PlacedPiece::right)
            .max()
            .unwrap_or(usable.x)
    }
}

/// Where the next piece goes on the open sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) struct Spot {
    pub x: Decimal,
    pub y: Decimal,
    pub opens_shelf: bool,
}

/// Packer state threaded through every placement decision.
#[derive(Debug, Default)]
pub(super) struct SheetState {
    pub closed: PackOutcome,
    pub open: Option<OpenSheet>,
}

/// Shelf packer for rectangular pieces on identical sheets.
pub(super) struct SheetPacker {
    stock: StockUnit,
    pub usable: Region,
    kerf: Decimal,
    orientation: CutOrientation,
    min_reusable: Decimal,
}

impl SheetPacker {
    pub fn new(stock: &StockUnit, parameters: &Parameters) -> Self {
        let trim = parameters.squaring_allowance;
        Self {
            stock: stock.clone(),
            usable: Region {
                x: trim,
                y: trim,
                width: stock.width - trim * Decimal::TWO,
                length: stock.length - trim * Decimal::TWO,
            },
            kerf: parameters.kerf,
            orientation: parameters.orientation,
            min_reusable: parameters.min_reusable_dimension,
        }
    }

    /// Places every piece in order and closes the last sheet.
    pub fn pack(&self, pieces: Vec<Piece>) -> PackOutcome {
        let state = pieces
            .into_iter()
            .fold(SheetState::default(), |state, piece| self.place(state, piece));
        self.finish(state)
    }

    /// Footprint of a piece after the job-wide orientation is applied.
    pub fn footprint(&self, piece: &Piece) -> (Decimal, Decimal, bool) {
        match self.orientation {
            CutOrientation::Transversal => (piece.width, piece.length, false),
            CutOrientation::Longitudinal => (piece.length, piece.width, true),
        }
    }

    pub fn place(&self, mut state: SheetState, piece: Piece) -> SheetState {
        let (width, length, rotated) = self.footprint(&piece);

        if width > self.usable.width || length > self.usable.length {
            warn!(
                "Piece '{}' ({}x{}) does not fit a {}x{} sheet",
                piece.id, width, length, self.usable.width, self.usable.length
            );
            state.closed.unplaceable.push(piece);
            return state;
        }

        let mut open = state
            .open
            .take()
            .unwrap_or_else(|| OpenSheet::new(&self.usable));

        let spot = match self.find_spot(&open, width, length) {
            Some(spot) => spot,
            None => {
                state = self.close(state, open);
                open = OpenSheet::new(&self.usable);
                match self.find_spot(&open, width, length) {
                    Some(spot) => spot,
                    None => {
                        state.closed.unplaceable.push(piece);
                        state.open = Some(open);
                        return state;
                    }
                }
            }
        };

        let placed = PlacedPiece {
            piece,
            x: spot.x,
            y: spot.y,
            width,
            length,
            rotated,
        };
        state.open = Some(open.put(spot, placed));
        state
    }

    /// First x-offset on the current shelf, otherwise the start of a new shelf.
    pub fn find_spot(&self, open: &OpenSheet, width: Decimal, length: Decimal) -> Option<Spot> {
        let shelf = &open.shelf;
        let on_shelf = open.shelf_pieces();

        if shelf.y + length <= self.usable.bottom() {
            let candidates =
                std::iter::once(self.usable.x).chain(on_shelf.iter().map(|p| p.right() + self.kerf));

            for x in candidates {
                if x + width > self.usable.right() {
                    continue;
                }
                let collides = on_shelf
                    .iter()
                    .any(|p| x < p.right() + self.kerf && p.x < x + width + self.kerf);
                if !collides {
                    return Some(Spot {
                        x,
                        y: shelf.y,
                        opens_shelf: false,
                    });
                }
            }
        }

        if on_shelf.is_empty() {
            return None;
        }

        let y = shelf.y + shelf.height + self.kerf;
        if y + length > self.usable.bottom() {
            return None;
        }

        Some(Spot {
            x: self.usable.x,
            y,
            opens_shelf: true,
        })
    }

    fn close(&self, mut state: SheetState, open: OpenSheet) -> SheetState {
        if open.placements.is_empty() {
            return state;
        }

        let index = state.closed.units.len();
        let remnants = scrap::sheet_remnants(
            index,
            &self.usable,
            open.used_right(&self.usable),
            open.used_bottom(),
            self.kerf,
            self.min_reusable,
        );

        debug!(
            "Closed sheet #{} with {} pieces and {} remnants",
            index + 1,
            open.placements.len(),
            remnants.len()
        );

        state.closed.scrap.extend(remnants);
        state.closed.units.push(UnitUsage {
            number: index as u32 + 1,
            width: self.stock.width,
            length: self.stock.length,
            placements: open.placements,
        });
        state
    }

    pub fn finish(&self, mut state: SheetState) -> PackOutcome {
        if let Some(open) = state.open.take() {
            state = self.close(state, open);
        }
        state.closed
    }
}
