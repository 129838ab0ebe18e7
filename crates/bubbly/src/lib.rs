#![forbid(unsafe_code)]

//! `bubbly` is a headless risk bubble chart engine.
//!
//! It fetches nothing and draws nothing: hand it the JSON payload a risk
//! endpoint returned and it answers with non-overlapping circle positions,
//! vertical position encoding risk. Rendering and transport belong to the
//! host.
//!
//! # Features
//!
//! - `layout`: enable the layout pipeline (`bubbly::chart`, backed by the
//!   `flotsam` engine). On by default.

pub use bubbly_core::*;

#[cfg(feature = "layout")]
pub mod chart {
    //! The end-to-end pipeline: payload → sanitize → select → scale → layout.

    use serde::Serialize;

    use bubbly_core::{AssetRecord, BubbleSpec, ChartConfig, Selection};
    pub use flotsam::{
        Algorithm, ForceOptions, LayoutDriver, LayoutStats, RelaxationOptions, Viewport,
    };

    #[derive(Debug, thiserror::Error)]
    pub enum ChartError {
        #[error(transparent)]
        Data(#[from] bubbly_core::Error),
        #[error(transparent)]
        Layout(#[from] flotsam::Error),
    }

    pub type Result<T> = std::result::Result<T, ChartError>;

    /// One placed bubble of a settled chart, in volume-rank order.
    #[derive(Debug, Clone, Serialize)]
    pub struct PlacedBubble {
        pub id: String,
        pub label: String,
        pub risk: f64,
        pub radius: f64,
        pub x: f64,
        pub y: f64,
    }

    #[derive(Debug, Clone, Serialize)]
    pub struct ChartLayout {
        pub viewport: Viewport,
        pub bubbles: Vec<PlacedBubble>,
        pub stats: LayoutStats,
    }

    /// A configured chart: the composition point for config, selection and
    /// algorithm. Cheap to clone and reuse across payloads.
    #[derive(Debug, Clone)]
    pub struct Chart {
        config: ChartConfig,
        selection: Selection,
        algorithm: Algorithm,
    }

    impl Default for Chart {
        fn default() -> Self {
            Self::new(ChartConfig::default())
        }
    }

    impl Chart {
        pub fn new(config: ChartConfig) -> Self {
            let config = config.normalized();
            let algorithm = Algorithm::Relaxation(RelaxationOptions {
                margin: config.margin,
                ..RelaxationOptions::default()
            });
            Self {
                config,
                selection: Selection::All,
                algorithm,
            }
        }

        pub fn with_selection(mut self, selection: Selection) -> Self {
            self.selection = selection;
            self
        }

        pub fn with_algorithm(mut self, algorithm: Algorithm) -> Self {
            self.algorithm = algorithm;
            self
        }

        pub fn config(&self) -> &ChartConfig {
            &self.config
        }

        fn viewport(&self) -> Viewport {
            Viewport::new(self.config.width, self.config.height)
        }

        /// Lays out a raw endpoint payload.
        pub fn layout_payload(&self, payload: &str) -> Result<ChartLayout> {
            let records = bubbly_core::sanitize_records(bubbly_core::parse_assets(payload)?);
            self.layout_records(&records)
        }

        /// Lays out records that were already sanitized and volume-ordered.
        pub fn layout_records(&self, records: &[AssetRecord]) -> Result<ChartLayout> {
            let selected = self.selection.apply(records);
            let specs = bubbly_core::scale_radii(selected, &self.config);
            let bubbles: Vec<flotsam::Bubble> = specs
                .iter()
                .map(|s| flotsam::Bubble::new(s.id.clone(), s.risk, s.radius, s.volume_rank))
                .collect();

            let result = flotsam::layout(&bubbles, self.viewport(), &self.algorithm)?;
            let placed = specs
                .iter()
                .filter_map(|s| {
                    result.positions.get(&s.id).map(|p| PlacedBubble {
                        id: s.id.clone(),
                        label: s.label.clone(),
                        risk: s.risk,
                        radius: s.radius,
                        x: p.x,
                        y: p.y,
                    })
                })
                .collect();

            Ok(ChartLayout {
                viewport: self.viewport(),
                bubbles: placed,
                stats: result.stats,
            })
        }

        /// A tick-mode driver preloaded with this chart's viewport and
        /// algorithm, for hosts that animate. Feed it specs via
        /// [`Chart::specs`] + `driver.submit`.
        pub fn driver(&self) -> LayoutDriver {
            LayoutDriver::new(self.viewport(), self.algorithm.clone())
        }

        /// The selected, sized bubble specs for a record set, converted to
        /// engine input.
        pub fn specs(&self, records: &[AssetRecord]) -> Vec<flotsam::Bubble> {
            let selected = self.selection.apply(records);
            bubbly_core::scale_radii(selected, &self.config)
                .iter()
                .map(|s: &BubbleSpec| flotsam::Bubble::new(s.id.clone(), s.risk, s.radius, s.volume_rank))
                .collect()
        }
    }
}

#[cfg(feature = "layout")]
pub use chart::{Chart, ChartError, ChartLayout, PlacedBubble};
