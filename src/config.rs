//! Analysis configuration loaded from JSON
//!
//! ```json
//! {
//!   "n_yrs": 10000,
//!   "return_periods": [1000, 250, 100],
//!   "layers": [
//!     { "name": "cat xl 1", "limit": 5000000, "xs": 1000000, "n_loss": 2 },
//!     { "name": "franchise", "xs": 250000, "is_franchise": true }
//!   ]
//! }
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::layer::Layer;
use crate::summary::STANDARD_RETURN_PERIODS;

fn default_return_periods() -> Vec<f64> {
    STANDARD_RETURN_PERIODS.to_vec()
}

fn default_is_eef() -> bool {
    true
}

/// A named layer as written in the config file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerConfig {
    pub name: String,

    /// Per-event limit (default: unlimited)
    #[serde(default)]
    pub limit: Option<f64>,

    /// Attachment point (default: 0)
    #[serde(default)]
    pub xs: f64,

    /// Maximum number of losses per year (default: no cap)
    #[serde(default)]
    pub n_loss: Option<usize>,

    #[serde(default)]
    pub is_franchise: bool,
}

impl LayerConfig {
    /// Check the layer terms and build the [`Layer`]
    pub fn to_layer(&self) -> Result<Layer> {
        Layer::new(self.limit, self.xs, self.n_loss, self.is_franchise)
    }
}

/// Settings for a YELT analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Number of modeled years; a command line value takes precedence
    #[serde(default)]
    pub n_yrs: Option<u32>,

    /// Return periods to report (default: [`STANDARD_RETURN_PERIODS`])
    #[serde(default = "default_return_periods")]
    pub return_periods: Vec<f64>,

    /// Include the event loss exceedance column in summaries (default: true)
    #[serde(default = "default_is_eef")]
    pub is_eef: bool,

    /// Keep the event key on exported curves
    #[serde(default)]
    pub keep_index: bool,

    #[serde(default)]
    pub layers: Vec<LayerConfig>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            n_yrs: None,
            return_periods: default_return_periods(),
            is_eef: default_is_eef(),
            keep_index: false,
            layers: Vec::new(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Build every configured layer, failing on the first invalid one
    pub fn layers(&self) -> Result<Vec<(String, Layer)>> {
        self.layers
            .iter()
            .map(|lc| Ok((lc.name.clone(), lc.to_layer()?)))
            .collect()
    }
}
