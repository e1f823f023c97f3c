//! Default calendar view and filter state

use serde::{Deserialize, Serialize};

/// Default calendar view and filter state applied at startup.
///
/// These are only defaults for the CLI's explicit filter arguments; the
/// engine itself holds no selection state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    /// Default granularity: "day", "week", "month", or "year"
    pub default_view: String,

    /// Default market filter; `None` means all markets
    pub default_market: Option<String>,

    /// Default year to display; `None` means the latest year in the journal
    pub default_year: Option<i32>,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            default_view: "day".to_string(),
            default_market: None,
            default_year: None,
        }
    }
}
