//! Decoding and sanitization of the remote risk payload.
//!
//! The endpoint is sloppy: numbers arrive as JSON numbers or as numeric
//! strings, symbols can repeat, and risk occasionally strays outside
//! `[0, 100]`. Sanitization is record-local: a malformed entry is dropped
//! (or clamped) without failing the batch.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::config::ChartConfig;
use crate::error::{Error, Result};

/// One entry of the raw payload, before sanitization. All fields are
/// optional; missing or unusable ones are dealt with in
/// [`sanitize_records`], not at decode time.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawAsset {
    #[serde(default)]
    pub symbol: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub risk: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub volume: Option<f64>,
}

/// A sanitized record: usable symbol, finite risk in `[0, 100]`,
/// non-negative volume.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetRecord {
    pub id: String,
    pub label: String,
    pub risk: f64,
    pub volume: f64,
}

/// A selected record with its final radius and volume rank, ready for the
/// layout engine.
#[derive(Debug, Clone, PartialEq)]
pub struct BubbleSpec {
    pub id: String,
    pub label: String,
    pub risk: f64,
    pub radius: f64,
    pub volume_rank: usize,
}

fn json_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Accepts a number, a numeric string, or null; anything else reads as
/// absent rather than as a decode error.
fn lenient_f64<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(json_f64))
}

/// Decodes the payload: either a bare JSON array of assets or an object
/// carrying the array under `data`. Entries that are not objects are
/// dropped, not fatal.
pub fn parse_assets(payload: &str) -> Result<Vec<RawAsset>> {
    let value: Value = serde_json::from_str(payload)?;
    let items = match value {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(items)) => items,
            _ => {
                return Err(Error::Payload {
                    message: "expected an array of assets or an object with a `data` array"
                        .to_string(),
                });
            }
        },
        _ => {
            return Err(Error::Payload {
                message: "expected an array of assets or an object with a `data` array".to_string(),
            });
        }
    };

    let mut assets = Vec::with_capacity(items.len());
    for item in items {
        match serde_json::from_value::<RawAsset>(item) {
            Ok(asset) => assets.push(asset),
            Err(err) => tracing::warn!(%err, "dropping undecodable payload entry"),
        }
    }
    Ok(assets)
}

/// Drops unusable entries, clamps risk into `[0, 100]`, dedupes by symbol
/// (first occurrence wins) and returns records in volume-descending order,
/// symbol ascending on ties. The returned order *is* the volume ranking.
pub fn sanitize_records(raw: Vec<RawAsset>) -> Vec<AssetRecord> {
    let mut by_id: IndexMap<String, AssetRecord> = IndexMap::new();
    for asset in raw {
        let Some(symbol) = asset.symbol.as_deref().map(str::trim).filter(|s| !s.is_empty())
        else {
            tracing::warn!("dropping asset without a symbol");
            continue;
        };
        let Some(risk) = asset.risk.filter(|r| r.is_finite()) else {
            tracing::warn!(symbol, "dropping asset without a usable risk value");
            continue;
        };

        let record = AssetRecord {
            id: symbol.to_string(),
            label: asset
                .name
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(symbol)
                .to_string(),
            risk: risk.clamp(0.0, 100.0),
            volume: asset
                .volume
                .filter(|v| v.is_finite())
                .map(|v| v.max(0.0))
                .unwrap_or(0.0),
        };
        if by_id.contains_key(symbol) {
            tracing::warn!(symbol, "dropping duplicate asset entry");
            continue;
        }
        by_id.insert(symbol.to_string(), record);
    }

    let mut records: Vec<AssetRecord> = by_id.into_values().collect();
    records.sort_by(|a, b| {
        b.volume
            .partial_cmp(&a.volume)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.id.cmp(&b.id))
    });
    records
}

/// Maps volumes to radii by square-root (area-proportional) interpolation
/// into the configured radius range. A flat volume range yields the midpoint
/// radius for every bubble. `records` must already be the selected slice in
/// volume order; the index becomes the volume rank.
pub fn scale_radii(records: &[AssetRecord], config: &ChartConfig) -> Vec<BubbleSpec> {
    let lo = records.iter().map(|r| r.volume).fold(f64::INFINITY, f64::min);
    let hi = records.iter().map(|r| r.volume).fold(f64::NEG_INFINITY, f64::max);
    let span = hi - lo;

    records
        .iter()
        .enumerate()
        .map(|(volume_rank, record)| {
            let t = if span > f64::EPSILON {
                ((record.volume - lo) / span).sqrt()
            } else {
                0.5
            };
            BubbleSpec {
                id: record.id.clone(),
                label: record.label.clone(),
                risk: record.risk,
                radius: config.min_radius + t * (config.max_radius - config.min_radius),
                volume_rank,
            }
        })
        .collect()
}
