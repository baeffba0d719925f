//! Display-Settings Overlay
//!
//! - settings: the sparse overlay document
//! - resolver: base + overlay → effective grid
//! - quick_edit: co-editor mutations of the overlay

mod quick_edit;
mod resolver;
mod settings;

pub use quick_edit::{Axis, QuickEditor};
pub use resolver::{resolve_grid, EffectiveGrid, MISSING_ORDER_OFFSET, SYNTHETIC_CARD_ORDER_BASE};
pub use settings::{
    CardOverride, ColumnOverride, DisplaySettings, SyntheticCard, SyntheticColumn, SyntheticTier,
    TierOverride,
};
