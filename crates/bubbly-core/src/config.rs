//! Chart configuration.
//!
//! Every field has a default so a host can deserialize a partial JSON
//! object (or none at all) and still get a usable chart.

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    /// Drawable width in pixels.
    pub width: f64,
    /// Drawable height in pixels.
    pub height: f64,
    /// Minimum extra gap between two bubble edges beyond radius contact.
    pub margin: f64,
    /// Radius assigned to the lowest-volume asset of a selection.
    pub min_radius: f64,
    /// Radius assigned to the highest-volume asset of a selection.
    pub max_radius: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 600.0,
            margin: 5.0,
            min_radius: 14.0,
            max_radius: 42.0,
        }
    }
}

impl ChartConfig {
    /// Repairs hostile values instead of rejecting them: dimensions get a
    /// 1px floor, the margin loses its sign, an inverted radius range is
    /// swapped. A bad config degrades the chart, it never aborts it.
    pub fn normalized(mut self) -> Self {
        let floor = |v: f64, min: f64| if v.is_finite() { v.max(min) } else { min };
        self.width = floor(self.width, 1.0);
        self.height = floor(self.height, 1.0);
        self.margin = floor(self.margin, 0.0);
        self.min_radius = floor(self.min_radius, 0.5);
        self.max_radius = floor(self.max_radius, 0.5);
        if self.min_radius > self.max_radius {
            std::mem::swap(&mut self.min_radius, &mut self.max_radius);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::ChartConfig;

    #[test]
    fn partial_json_fills_in_defaults() {
        let config: ChartConfig = serde_json::from_str(r#"{"width": 1200}"#).unwrap();
        assert_eq!(config.width, 1200.0);
        assert_eq!(config.height, ChartConfig::default().height);
        assert_eq!(config.margin, ChartConfig::default().margin);
    }

    #[test]
    fn camel_case_keys_are_accepted() {
        let config: ChartConfig =
            serde_json::from_str(r#"{"minRadius": 10, "maxRadius": 20}"#).unwrap();
        assert_eq!(config.min_radius, 10.0);
        assert_eq!(config.max_radius, 20.0);
    }

    #[test]
    fn normalized_repairs_hostile_values() {
        let config = ChartConfig {
            width: -100.0,
            height: f64::NAN,
            margin: -3.0,
            min_radius: 30.0,
            max_radius: 10.0,
        }
        .normalized();
        assert_eq!(config.width, 1.0);
        assert_eq!(config.height, 1.0);
        assert_eq!(config.margin, 0.0);
        assert_eq!(config.min_radius, 10.0);
        assert_eq!(config.max_radius, 30.0);
    }
}
