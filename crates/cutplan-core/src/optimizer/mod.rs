use crate::types::*;
use rust_decimal::Decimal;
use std::collections::BTreeSet;
use tracing::debug;

mod bar;
mod scrap;
mod sheet;
mod summary;
mod validation;

pub use validation::{validate, MAX_DIMENSION, MAX_PIECES};

/// Builds cut plans with a first-fit-decreasing heuristic: shelf packing for
/// sheets, linear packing for bars.
pub struct Optimizer {
    request: CutRequest,
}

/// What a packer hands to the assembler once every piece has been processed.
#[derive(Debug, Default)]
pub(crate) struct PackOutcome {
    pub units: Vec<UnitUsage>,
    pub scrap: Vec<ScrapRegion>,
    pub unplaceable: Vec<Piece>,
}

impl Optimizer {
    /// Validates the whole job and builds a new optimizer instance.
    ///
    /// Every problem in the request is reported at once; nothing is packed
    /// until the job is clean.
    pub fn new(request: CutRequest) -> Result<Self> {
        let issues = validate(&request);
        if !issues.is_empty() {
            return Err(OptimizerError::Validation(issues));
        }

        Ok(Self { request })
    }

    pub fn request(&self) -> &CutRequest {
        &self.request
    }

    /// Runs normalization, packing, scrap extraction and assembly.
    ///
    /// Pure: the same request always yields the same plan.
    pub fn optimize(&self) -> CutPlan {
        let pieces = self.expand_pieces();
        debug!(
            "Packing {} pieces on {:?} stock {}x{}",
            pieces.len(),
            self.request.stock.kind,
            self.request.stock.width,
            self.request.stock.length
        );

        let outcome = match self.request.stock.kind {
            StockKind::Sheet => {
                sheet::SheetPacker::new(&self.request.stock, &self.request.parameters).pack(pieces)
            }
            StockKind::Bar => {
                bar::BarPacker::new(&self.request.stock, &self.request.parameters).pack(pieces)
            }
        };

        summary::assemble(self.request.stock.kind, outcome)
    }

    /// Expands demand lines into single pieces, largest first.
    ///
    /// Sheets are ordered by area and bars by length. The sort is stable so
    /// equal keys keep their input order. Ids are unique across the job: a
    /// clash with an earlier id gets a `_2`, `_3`... suffix.
    pub(crate) fn expand_pieces(&self) -> Vec<Piece> {
        let stock = &self.request.stock;
        let mut expanded = Vec::new();
        let mut taken = BTreeSet::new();

        for demand in &self.request.pieces {
            let width = match stock.kind {
                StockKind::Sheet => demand.width.unwrap_or(Decimal::ZERO),
                StockKind::Bar => stock.width,
            };

            for i in 0..demand.quantity {
                let id = if demand.quantity > 1 {
                    format!("{}_{}", demand.label, i + 1)
                } else {
                    demand.label.clone()
                };
                expanded.push(Piece {
                    id: unique_id(id, &mut taken),
                    label: demand.label.clone(),
                    width,
                    length: demand.length,
                });
            }
        }

        match stock.kind {
            StockKind::Sheet => expanded.sort_by(|a, b| b.area().cmp(&a.area())),
            StockKind::Bar => expanded.sort_by(|a, b| b.length.cmp(&a.length)),
        }

        expanded
    }
}

fn unique_id(id: String, taken: &mut BTreeSet<String>) -> String {
    let mut unique = id.clone();
    let mut suffix = 2;
    while taken.contains(&unique) {
        unique = format!("{}_{}", id, suffix);
        suffix += 1;
    }
    taken.insert(unique.clone());
    unique
}
