//! Layer losses: attachment, limit, franchise and occurrence cap

use log::debug;
use serde::Serialize;

use crate::error::{Result, YeltError};
use crate::yelt::{LossRecord, YearEventLossTable};

/// A YELT whose losses have been passed through a [`Layer`]. Records that
/// did not penetrate the layer are absent.
pub type LayeredYelt = YearEventLossTable;

/// A single insurance or reinsurance layer
///
/// # Example
/// ```
/// use yelt_analytics::Layer;
///
/// // 50 xs 20, at most two losses a year
/// let layer = Layer::excess_of(20.0)?.with_limit(50.0)?.with_occurrence_cap(2);
/// assert_eq!(layer.layer_loss(100.0), 50.0);
/// assert_eq!(layer.layer_loss(10.0), 0.0);
/// # Ok::<(), yelt_analytics::YeltError>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Layer {
    limit: Option<f64>,
    xs: f64,
    n_loss: Option<usize>,
    is_franchise: bool,
}

impl Default for Layer {
    /// Unlimited layer attaching at zero
    fn default() -> Self {
        Self {
            limit: None,
            xs: 0.0,
            n_loss: None,
            is_franchise: false,
        }
    }
}

impl Layer {
    /// Create a layer.
    ///
    /// * `limit` - maximum loss to the layer per event, `None` for unlimited
    /// * `xs` - attachment point, must be >= 0
    /// * `n_loss` - maximum number of losses per year, `None` for no cap
    /// * `is_franchise` - pay the full loss once the attachment is breached
    pub fn new(
        limit: Option<f64>,
        xs: f64,
        n_loss: Option<usize>,
        is_franchise: bool,
    ) -> Result<Self> {
        if !(xs >= 0.0) {
            return Err(YeltError::NegativeAttachment(xs));
        }
        if let Some(limit) = limit {
            if !(limit >= 0.0) {
                return Err(YeltError::NegativeLimit(limit));
            }
        }

        Ok(Self {
            limit,
            xs,
            n_loss,
            is_franchise,
        })
    }

    /// Unlimited layer attaching at `xs`
    pub fn excess_of(xs: f64) -> Result<Self> {
        Self::new(None, xs, None, false)
    }

    pub fn with_limit(self, limit: f64) -> Result<Self> {
        Self::new(Some(limit), self.xs, self.n_loss, self.is_franchise)
    }

    pub fn with_occurrence_cap(mut self, n_loss: usize) -> Self {
        self.n_loss = Some(n_loss);
        self
    }

    pub fn franchise(mut self) -> Self {
        self.is_franchise = true;
        self
    }

    pub fn limit(&self) -> Option<f64> {
        self.limit
    }

    pub fn xs(&self) -> f64 {
        self.xs
    }

    pub fn n_loss(&self) -> Option<usize> {
        self.n_loss
    }

    pub fn is_franchise(&self) -> bool {
        self.is_franchise
    }

    /// Loss to the layer from a single event, before any occurrence cap.
    /// Zero means the event did not penetrate the layer.
    pub fn layer_loss(&self, loss: f64) -> f64 {
        let excess = (loss - self.xs).max(0.0);
        let layered = match self.limit {
            Some(limit) if excess > limit => limit,
            _ => excess,
        };

        if layered <= 0.0 || !self.is_franchise {
            return layered;
        }

        // Franchise pays from the ground up; unclipped losses come back whole
        if layered == excess {
            loss
        } else {
            layered + self.xs
        }
    }
}

impl YearEventLossTable {
    /// Loss to a layer for each event.
    ///
    /// Events that do not penetrate the layer are dropped. With an
    /// occurrence cap, only the first `n_loss` losses of each year in
    /// (year, day, event) order are kept, whatever their size.
    pub fn apply_layer(&self, layer: &Layer) -> LayeredYelt {
        let mut records: Vec<LossRecord> = self
            .records()
            .iter()
            .filter_map(|record| {
                let loss = layer.layer_loss(record.loss);
                (loss > 0.0).then_some(LossRecord { loss, ..*record })
            })
            .collect();

        if let Some(n_loss) = layer.n_loss() {
            records.sort_by_key(|r| (r.year, r.day_of_year, r.event_id));

            let mut current_year = None;
            let mut taken = 0;
            records.retain(|r| {
                if current_year != Some(r.year) {
                    current_year = Some(r.year);
                    taken = 0;
                }
                taken += 1;
                taken <= n_loss
            });
        }

        debug!(
            "Layer {:?} kept {} of {} event losses",
            layer,
            records.len(),
            self.len()
        );

        self.derive(records)
    }

    /// Average annual loss to a layer
    pub fn layer_aal(&self, layer: &Layer) -> f64 {
        self.apply_layer(layer).aal()
    }
}
