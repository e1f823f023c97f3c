//! Journal export decoding configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Journal export decoding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Default journal export to load when none is given on the command line
    pub default_input: Option<PathBuf>,

    /// Field delimiter of the export file
    pub delimiter: char,

    /// Currency symbols stripped from monetary cells before parsing
    pub currency_symbols: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            default_input: None,
            delimiter: ',',
            currency_symbols: "£$€".to_string(),
        }
    }
}

impl DataConfig {
    /// Delimiter as the byte the CSV reader expects
    pub fn delimiter_byte(&self) -> u8 {
        let mut buf = [0u8; 4];
        self.delimiter.encode_utf8(&mut buf);
        buf[0]
    }
}
