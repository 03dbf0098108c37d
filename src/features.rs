use std::collections::HashMap;

use tracing::{debug, warn};

use crate::catalog::Catalog;
use crate::error::{Result, VibeError};
use crate::models::{FEATURE_COLUMNS, Song};

/// Immutable song index: the processed catalog and its normalized feature
/// matrix, built once and then only read.
///
/// Row `i` of `features` belongs to `songs[i]`.
#[derive(Debug, Clone)]
pub struct VibeIndex {
    pub(crate) songs: Vec<Song>,
    pub(crate) features: Vec<Vec<f32>>,
    pub(crate) columns: Vec<&'static str>,
    pub(crate) rows_by_id: HashMap<String, usize>,
}

impl VibeIndex {
    #[must_use]
    pub fn len(&self) -> usize {
        self.songs.len()
    }

    /// Feature columns used, in matrix column order.
    #[must_use]
    pub fn columns(&self) -> &[&'static str] {
        &self.columns
    }

    #[must_use]
    pub fn get(&self, song_id: &str) -> Option<&Song> {
        self.rows_by_id.get(song_id).map(|&row| &self.songs[row])
    }

    /// All song ids in lexicographic order, as offered to the song picker.
    #[must_use]
    pub fn song_ids_sorted(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.songs.iter().map(|s| s.song_id.as_str()).collect();
        ids.sort_unstable();
        ids
    }
}

/// Median of finite values. Even counts average the two middle values.
fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some(sorted[mid - 1] / 2.0 + sorted[mid] / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Rescale a column to [0, 1] using its observed min and max.
/// A constant column becomes all zeros.
///
/// The arithmetic stays in f64 and falls back to halved operands when even
/// the f64 range overflows.
#[allow(clippy::cast_possible_truncation)]
fn min_max_scale(column: &[f64]) -> Vec<f32> {
    let (min, max) = column
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    let range = max - min;

    column
        .iter()
        .map(|&v| {
            if range > 0.0 && range.is_finite() {
                ((v - min) / range).clamp(0.0, 1.0) as f32
            } else if range > 0.0 {
                // range overflowed f64: halve everything first
                ((v / 2.0 - min / 2.0) / (max / 2.0 - min / 2.0)).clamp(0.0, 1.0) as f32
            } else {
                0.0
            }
        })
        .collect()
}

/// Impute, scale and index a loaded catalog.
///
/// Every declared feature column that has at least one value is used: missing
/// cells take the column median (computed once over the whole catalog), then
/// the column is min-max scaled to [0, 1].
///
/// # Errors
///
/// [`VibeError::MalformedData`] if the catalog has no songs,
/// [`VibeError::MissingFeatureColumns`] if no feature column is usable.
pub fn process(catalog: Catalog) -> Result<VibeIndex> {
    if catalog.is_empty() {
        return Err(VibeError::MalformedData(
            "no songs with both a title and an artist".to_string(),
        ));
    }

    let mut columns = Vec::new();
    let mut scaled_columns: Vec<Vec<f32>> = Vec::new();

    for (idx, &name) in FEATURE_COLUMNS.iter().enumerate() {
        if !catalog.feature_columns_present.get(idx).copied().unwrap_or(false) {
            warn!(column = name, "Feature column absent from dataset, skipping");
            continue;
        }

        let raw: Vec<Option<f64>> = catalog
            .records
            .iter()
            .map(|r| r.features.get(idx).copied().flatten())
            .collect();
        let present: Vec<f64> = raw.iter().flatten().copied().collect();

        let Some(fill) = median(&present) else {
            warn!(column = name, "Feature column has no values, skipping");
            continue;
        };
        let imputed = raw.len() - present.len();
        if imputed > 0 {
            debug!(column = name, imputed, median = fill, "Imputed missing values");
        }

        let column: Vec<f64> = raw.into_iter().map(|v| v.unwrap_or(fill)).collect();

        columns.push(name);
        scaled_columns.push(min_max_scale(&column));
    }

    if columns.is_empty() {
        return Err(VibeError::MissingFeatureColumns {
            expected: FEATURE_COLUMNS.to_vec(),
        });
    }

    let features: Vec<Vec<f32>> = (0..catalog.len())
        .map(|row| scaled_columns.iter().map(|col| col[row]).collect())
        .collect();

    let songs: Vec<Song> = catalog.records.into_iter().map(Song::from_record).collect();
    let rows_by_id: HashMap<String, usize> = songs
        .iter()
        .enumerate()
        .map(|(row, song)| (song.song_id.clone(), row))
        .collect();

    debug!(
        songs = songs.len(),
        features = columns.len(),
        "Built vibe index"
    );

    Ok(VibeIndex {
        songs,
        features,
        columns,
        rows_by_id,
    })
}
