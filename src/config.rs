/*

    Settings of a bounding box computation.

    Can be given in JSON, e.g. { "precision": 3, "parallel": true },
    missing fields fall back to defaults.

    @date: Nov, 2025
    @author: bartu
*/

use crate::prelude::*;

#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default)]
pub struct BoundsConfig {
    /// Decimal digits kept on every output value, None leaves them unrounded.
    #[default(None)]
    pub precision: Option<u32>,

    /// Transform mesh occurrences on the rayon pool and merge their extrema.
    #[default = false]
    pub parallel: bool,
}

impl BoundsConfig {
    pub fn with_precision(precision: Option<u32>) -> Self {
        Self { precision, ..Self::default() }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_fields_missing() {
        let cfg: BoundsConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(cfg.precision, None);
        assert!(!cfg.parallel);
    }

    #[test]
    fn reads_all_fields() {
        let cfg: BoundsConfig = serde_json::from_str(r#"{ "precision": 3, "parallel": true }"#).unwrap();
        assert_eq!(cfg.precision, Some(3));
        assert!(cfg.parallel);
    }
}
