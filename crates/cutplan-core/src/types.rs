use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of stock unit a job is cut from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockKind {
    /// 2D material packed with the shelf heuristic.
    #[serde(
        alias = "panel",
        alias = "plate",
        alias = "glazing",
        alias = "plastic",
        alias = "sheet_metal",
        alias = "other"
    )]
    Sheet,
    /// 1D material packed along its length.
    #[serde(alias = "coil")]
    Bar,
}

/// Job-wide cut direction. Fixed by machine setup, never chosen per piece.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CutOrientation {
    /// Pieces keep their declared width along the sheet width.
    #[default]
    Transversal,
    /// Width and length of every piece are swapped before placement.
    Longitudinal,
}

/// Standard stock unit consumed by a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockUnit {
    /// Sheet x extent, or profile width for bars
    pub width: Decimal,
    /// Sheet y extent, or bar length
    pub length: Decimal,
    pub kind: StockKind,
}

impl StockUnit {
    pub fn sheet(width: Decimal, length: Decimal) -> Self {
        Self {
            width,
            length,
            kind: StockKind::Sheet,
        }
    }

    pub fn bar(width: Decimal, length: Decimal) -> Self {
        Self {
            width,
            length,
            kind: StockKind::Bar,
        }
    }

    pub fn area(&self) -> Decimal {
        self.width * self.length
    }
}

/// Cut policy applied to a whole job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Parameters {
    /// Material removed by the blade between two adjacent pieces
    pub kerf: Decimal,
    /// Trim taken off every stock edge before cutting begins
    pub squaring_allowance: Decimal,
    /// Offcuts must reach this on every relevant axis to be kept as remnants
    pub min_reusable_dimension: Decimal,
    pub orientation: CutOrientation,
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            kerf: Decimal::from(3),
            squaring_allowance: Decimal::ZERO,
            min_reusable_dimension: Decimal::from(100),
            orientation: CutOrientation::Transversal,
        }
    }
}

/// One line of demand as supplied by the caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Demand {
    pub label: String,
    /// Ignored for bar jobs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Decimal>,
    pub length: Decimal,
    /// Values below 1 are reported by validation
    pub quantity: i64,
}

impl Demand {
    pub fn rect(label: impl Into<String>, width: Decimal, length: Decimal, quantity: i64) -> Self {
        Self {
            label: label.into(),
            width: Some(width),
            length,
            quantity,
        }
    }

    pub fn linear(label: impl Into<String>, length: Decimal, quantity: i64) -> Self {
        Self {
            label: label.into(),
            width: None,
            length,
            quantity,
        }
    }
}

/// Input: a complete cutting job
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutRequest {
    pub stock: StockUnit,
    #[serde(default)]
    pub parameters: Parameters,
    #[serde(default)]
    pub pieces: Vec<Demand>,
}

/// A single unit of demand after quantities have been expanded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    /// Unique within a job
    pub id: String,
    /// Label of the demand line this piece came from
    pub label: String,
    pub width: Decimal,
    pub length: Decimal,
}

impl Piece {
    pub fn area(&self) -> Decimal {
        self.width * self.length
    }
}

/// A piece located on a consumed unit. Coordinates are absolute within the unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedPiece {
    pub piece: Piece,
    pub x: Decimal,
    pub y: Decimal,
    /// Footprint along x after orientation
    pub width: Decimal,
    /// Footprint along y after orientation
    pub length: Decimal,
    pub rotated: bool,
}

impl PlacedPiece {
    pub fn right(&self) -> Decimal {
        self.x + self.width
    }

    pub fn bottom(&self) -> Decimal {
        self.y + self.length
    }

    pub fn area(&self) -> Decimal {
        self.width * self.length
    }

    /// True when the two footprints share interior area. Touching edges do not count.
    pub fn overlaps(&self, other: &PlacedPiece) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// One consumed sheet or bar and everything cut from it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitUsage {
    /// 1-based position in the cut plan
    pub number: u32,
    pub width: Decimal,
    pub length: Decimal,
    pub placements: Vec<PlacedPiece>,
}

impl UnitUsage {
    pub fn area(&self) -> Decimal {
        self.width * self.length
    }

    pub fn used_area(&self) -> Decimal {
        self.placements.iter().map(PlacedPiece::area).sum()
    }
}

/// Lifecycle of a remnant once it reaches the inventory.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemnantStatus {
    #[default]
    Available,
    Reserved,
    Used,
    Discarded,
}

/// Reusable offcut left on a closed unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapRegion {
    /// 0-based index into `CutPlan::units`
    pub source_unit: usize,
    pub x: Decimal,
    pub y: Decimal,
    pub width: Decimal,
    pub length: Decimal,
    pub status: RemnantStatus,
}

impl ScrapRegion {
    pub fn area(&self) -> Decimal {
        self.width * self.length
    }
}

/// Aggregate material accounting
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub total_stock_area: Decimal,
    pub used_area: Decimal,
    /// Area of every materialized scrap region
    pub reusable_remnant_area: Decimal,
    /// Kerf losses, squaring trim and remainders below the reuse threshold
    pub waste_area: Decimal,
}

/// Output: the complete cut plan for one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CutPlan {
    pub kind: StockKind,
    pub units: Vec<UnitUsage>,
    pub scrap: Vec<ScrapRegion>,
    pub unplaceable: Vec<Piece>,
    /// Full precision; round only for display
    pub utilization_pct: Decimal,
    pub units_consumed: u32,
    pub summary: Summary,
}

impl CutPlan {
    /// Utilization rounded half-away-from-zero to two decimals for display.
    pub fn utilization_rounded(&self) -> Decimal {
        self.utilization_pct
            .round_dp_with_strategy(2, rust_decimal::RoundingStrategy::MidpointAwayFromZero)
    }

    pub fn placed_count(&self) -> usize {
        self.units.iter().map(|u| u.placements.len()).sum()
    }
}

/// A single problem found while validating a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "problem", rename_all = "snake_case")]
pub enum ValidationIssue {
    #[error("Stock {dimension} must be positive, got {value}")]
    NonPositiveStock {
        dimension: &'static str,
        value: Decimal,
    },

    #[error("Stock {dimension} is unusable after a squaring allowance of {allowance}")]
    UnusableStock {
        dimension: &'static str,
        allowance: Decimal,
    },

    #[error("Parameter '{name}' must not be negative, got {value}")]
    NegativeParameter { name: &'static str, value: Decimal },

    #[error("Piece '{label}' quantity must be at least 1, got {quantity}")]
    NonPositiveQuantity { label: String, quantity: i64 },

    #[error("Piece '{label}' has no width")]
    MissingWidth { label: String },

    #[error("Piece '{label}' {dimension} must be positive, got {value}")]
    NonPositiveDimension {
        label: String,
        dimension: &'static str,
        value: Decimal,
    },

    #[error("Stock {dimension} {value} exceeds the largest supported dimension {limit}")]
    StockTooLarge {
        dimension: &'static str,
        value: Decimal,
        limit: Decimal,
    },

    #[error("Piece '{label}' {dimension} {value} exceeds the largest supported dimension {limit}")]
    PieceTooLarge {
        label: String,
        dimension: &'static str,
        value: Decimal,
        limit: Decimal,
    },

    #[error("Job expands to {count} pieces, more than the limit of {limit}")]
    TooManyPieces { count: u64, limit: u64 },

    #[error("Kerf {kerf} is not smaller than the smallest dimension {smallest} of piece '{label}'")]
    KerfTooWide {
        label: String,
        kerf: Decimal,
        smallest: Decimal,
    },
}

/// Error type for optimization
#[derive(Debug, thiserror::Error)]
pub enum OptimizerError {
    #[error("Invalid job: {}", join_issues(.0))]
    Validation(Vec<ValidationIssue>),
}

fn join_issues(issues: &[ValidationIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type Result<T> = std::result::Result<T, OptimizerError>;
