use std::collections::BTreeSet;

use tracing::debug;

use crate::features::VibeIndex;
use crate::models::Recommendation;

/// Cosine similarity between two vectors. Zero-norm input scores 0.
pub fn cosine_sim(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Coordinate-wise mean of the given rows.
fn mean_vector<'a>(rows: impl ExactSizeIterator<Item = &'a [f32]>, dim: usize) -> Vec<f32> {
    #[allow(clippy::cast_precision_loss)]
    let n = rows.len() as f32;
    let mut mean = vec![0.0f32; dim];
    for row in rows {
        for (m, &v) in mean.iter_mut().zip(row) {
            *m += v;
        }
    }
    if n > 0.0 {
        for m in &mut mean {
            *m /= n;
        }
    }
    mean
}

impl VibeIndex {
    /// Row indices of the selected songs that exist in the index.
    /// Unknown ids are ignored.
    fn resolve<S: AsRef<str>>(&self, selected_ids: &[S]) -> BTreeSet<usize> {
        selected_ids
            .iter()
            .filter_map(|id| self.rows_by_id.get(id.as_ref()).copied())
            .collect()
    }

    /// Mean feature vector of the given rows.
    fn vibe_of(&self, rows: &BTreeSet<usize>) -> Vec<f32> {
        mean_vector(
            rows.iter().map(|&row| self.features[row].as_slice()),
            self.columns.len(),
        )
    }

    /// Recommend up to `n` songs whose features point the same way as the
    /// mean of the selected songs.
    ///
    /// Results are ordered by descending cosine similarity; equal scores keep
    /// catalog order. Selected songs are never returned. An empty selection,
    /// or one where no id is in the index, yields an empty list.
    #[must_use]
    pub fn recommend<S: AsRef<str>>(&self, selected_ids: &[S], n: usize) -> Vec<Recommendation> {
        if selected_ids.is_empty() || n == 0 {
            return Vec::new();
        }

        let selected = self.resolve(selected_ids);
        if selected.is_empty() {
            debug!(requested = selected_ids.len(), "No selected songs resolved");
            return Vec::new();
        }

        let vibe = self.vibe_of(&selected);
        debug!(?vibe, "Vibe vector");

        let mut scored: Vec<(usize, f32)> = self
            .features
            .iter()
            .enumerate()
            .map(|(row, features)| (row, cosine_sim(&vibe, features)))
            .collect();

        // sort_by is stable, so ties stay in catalog order
        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let results: Vec<Recommendation> = scored
            .into_iter()
            .filter(|(row, _)| !selected.contains(row))
            .take(n)
            .map(|(row, score)| Recommendation {
                score,
                song: self.songs[row].clone(),
            })
            .collect();

        debug!(
            selected = selected.len(),
            returned = results.len(),
            "Ranked catalog against vibe"
        );
        results
    }
}
