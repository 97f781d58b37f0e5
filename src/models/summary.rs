// Four-number summary of one sample window

use serde::{Deserialize, Serialize};

/// Distribution summary of one metric's samples for one target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub min: f64,
    pub med: f64,
    pub max: f64,
    pub avg: f64,
}

impl Summary {
    /// Field names and values in emission order.
    pub fn fields(&self) -> [(&'static str, f64); 4] {
        [
            ("min", self.min),
            ("med", self.med),
            ("max", self.max),
            ("avg", self.avg),
        ]
    }
}
