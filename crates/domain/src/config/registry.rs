use crate::record_type::DEFAULT_SUPPORTED_CODES;
use serde::{Deserialize, Serialize};

/// Record type registry source
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryConfig {
    /// `records-type.json` replacing the built-in IANA table
    #[serde(default)]
    pub records_type_file: Option<String>,

    /// Numeric codes aggregated and served (default: A NS CNAME MX TXT AAAA SRV RRSIG)
    #[serde(default = "default_supported")]
    pub supported: Vec<u16>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            records_type_file: None,
            supported: default_supported(),
        }
    }
}

fn default_supported() -> Vec<u16> {
    DEFAULT_SUPPORTED_CODES.to_vec()
}
