use std::collections::HashSet;
use std::io;
use std::path::Path;

use tracing::{debug, info};

use crate::error::{Result, VibeError};
use crate::models::{FEATURE_COLUMNS, SongRecord};

/// Header names accepted for the title column, in priority order.
const TITLE_COLUMNS: &[&str] = &["title", "name"];
const ARTIST_COLUMN: &str = "artist";
const ALBUM_COLUMN: &str = "album";

/// Cleaned song records in source order, with unique (title, artist) pairs.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub records: Vec<SongRecord>,
    /// Parallel to [`FEATURE_COLUMNS`]: whether the source had that column.
    pub feature_columns_present: Vec<bool>,
}

impl Catalog {
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Column positions resolved from a normalized header row.
struct Columns {
    title: usize,
    artist: usize,
    album: Option<usize>,
    features: Vec<Option<usize>>,
}

impl Columns {
    fn resolve(headers: &[String]) -> Result<Self> {
        let position = |name: &str| headers.iter().position(|h| h == name);

        let title = TITLE_COLUMNS
            .iter()
            .find_map(|&name| position(name))
            .ok_or_else(|| {
                VibeError::MalformedData(format!(
                    "missing title column (expected one of: {}; found: {})",
                    TITLE_COLUMNS.join(", "),
                    headers.join(", ")
                ))
            })?;
        let artist = position(ARTIST_COLUMN).ok_or_else(|| {
            VibeError::MalformedData(format!(
                "missing '{ARTIST_COLUMN}' column (found: {})",
                headers.join(", ")
            ))
        })?;

        Ok(Self {
            title,
            artist,
            album: position(ALBUM_COLUMN),
            features: FEATURE_COLUMNS.iter().map(|&name| position(name)).collect(),
        })
    }
}

/// Lowercase and trim a header cell.
fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase()
}

/// A non-blank cell, kept verbatim.
fn text_cell(record: &csv::StringRecord, idx: usize) -> Option<String> {
    record
        .get(idx)
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

/// A finite numeric cell. Blank, unparseable and non-finite cells are missing.
fn numeric_cell(record: &csv::StringRecord, idx: usize) -> Option<f64> {
    record
        .get(idx)
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
}

/// Load and clean the song dataset from a CSV file.
///
/// Records without a title or artist are dropped, then duplicates of the same
/// (title, artist) pair are removed keeping the first one seen.
///
/// # Errors
///
/// [`VibeError::DataSourceNotFound`] if `path` does not exist,
/// [`VibeError::MalformedData`] if the identity columns are missing or the
/// file is not readable CSV.
pub fn load(path: &Path) -> Result<Catalog> {
    if !path.is_file() {
        return Err(VibeError::DataSourceNotFound {
            path: path.to_path_buf(),
        });
    }

    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => VibeError::DataSourceNotFound {
            path: path.to_path_buf(),
        },
        _ => VibeError::MalformedData(format!("failed to open {}: {e}", path.display())),
    })?;

    let catalog = from_reader(file)?;
    info!(
        path = %path.display(),
        songs = catalog.len(),
        "Loaded song catalog"
    );
    Ok(catalog)
}

/// Load and clean song records from any CSV byte source.
///
/// # Errors
///
/// [`VibeError::MalformedData`] if the identity columns are missing or the
/// input is not readable CSV.
pub fn from_reader<R: io::Read>(reader: R) -> Result<Catalog> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| VibeError::MalformedData(format!("failed to read header row: {e}")))?
        .iter()
        .map(normalize_header)
        .collect();

    let columns = Columns::resolve(&headers)?;

    let mut records = Vec::new();
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut missing_identity = 0usize;
    let mut duplicates = 0usize;

    for (line, row) in reader.records().enumerate() {
        let row = row.map_err(|e| {
            VibeError::MalformedData(format!("failed to read row {}: {e}", line + 2))
        })?;

        let (Some(title), Some(artist)) = (
            text_cell(&row, columns.title),
            text_cell(&row, columns.artist),
        ) else {
            missing_identity += 1;
            continue;
        };

        if !seen.insert((title.clone(), artist.clone())) {
            duplicates += 1;
            continue;
        }

        records.push(SongRecord {
            title,
            artist,
            album: columns.album.and_then(|idx| text_cell(&row, idx)),
            features: columns
                .features
                .iter()
                .map(|col| col.and_then(|idx| numeric_cell(&row, idx)))
                .collect(),
        });
    }

    debug!(
        kept = records.len(),
        missing_identity,
        duplicates,
        "Cleaned song records"
    );

    Ok(Catalog {
        records,
        feature_columns_present: columns.features.iter().map(Option::is_some).collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write csv");
        file
    }

    #[test]
    fn missing_file_is_data_source_not_found() {
        let err = load(Path::new("/definitely/not/here/songs.csv")).unwrap_err();
        assert!(matches!(err, VibeError::DataSourceNotFound { .. }));
    }

    #[test]
    fn normalizes_header_names() {
        let file = csv_file(" Title ,ARTIST,  Energy\nSong,Band,0.5\n");
        let catalog = load(file.path()).expect("load");

        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.records[0].title, "Song");
        assert_eq!(catalog.records[0].artist, "Band");
        let energy = FEATURE_COLUMNS.iter().position(|c| *c == "energy").unwrap();
        assert_eq!(catalog.records[0].features[energy], Some(0.5));
        assert!(catalog.feature_columns_present[energy]);
        assert_eq!(catalog.feature_columns_present.iter().filter(|p| **p).count(), 1);
    }

    #[test]
    fn accepts_name_as_title_column() {
        let file = csv_file("name,artist,tempo\nChaiyya Chaiyya,Sukhwinder Singh,120\n");
        let catalog = load(file.path()).expect("load");
        assert_eq!(catalog.records[0].title, "Chaiyya Chaiyya");
    }

    #[test]
    fn missing_artist_column_is_malformed() {
        let file = csv_file("title,album,energy\nSong,Album,0.1\n");
        let err = load(file.path()).unwrap_err();
        assert!(matches!(err, VibeError::MalformedData(_)));
    }

    #[test]
    fn missing_title_column_is_malformed() {
        let err = from_reader("artist,energy\nBand,0.1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, VibeError::MalformedData(_)));
    }

    #[test]
    fn drops_rows_without_identity() {
        let data = "title,artist,energy\nA,X,0.1\n,Y,0.2\nB,,0.3\n   ,Z,0.4\nC,W,0.5\n";
        let catalog = from_reader(data.as_bytes()).expect("load");
        let titles: Vec<_> = catalog.records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "C"]);
    }

    #[test]
    fn dedup_keeps_first_seen() {
        let data = "title,artist,album,energy\n\
                    A,X,First,0.1\n\
                    A,Y,Other,0.2\n\
                    A,X,Second,0.3\n";
        let catalog = from_reader(data.as_bytes()).expect("load");

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.records[0].album.as_deref(), Some("First"));
        assert_eq!(catalog.records[1].artist, "Y");
    }

    #[test]
    fn unparseable_and_non_finite_cells_are_missing() {
        let data = "title,artist,energy,tempo\nA,X,loud,NaN\nB,Y,,inf\nC,Z,0.7,98.5\n";
        let catalog = from_reader(data.as_bytes()).expect("load");
        let energy = FEATURE_COLUMNS.iter().position(|c| *c == "energy").unwrap();
        let tempo = FEATURE_COLUMNS.iter().position(|c| *c == "tempo").unwrap();

        assert_eq!(catalog.records[0].features[energy], None);
        assert_eq!(catalog.records[0].features[tempo], None);
        assert_eq!(catalog.records[1].features[energy], None);
        assert_eq!(catalog.records[1].features[tempo], None);
        assert_eq!(catalog.records[2].features[tempo], Some(98.5));
    }

    #[test]
    fn keeps_values_beyond_single_precision() {
        let data = "title,artist,tempo\nA,X,1e39\nB,Y,1\nC,Z,2\n";
        let catalog = from_reader(data.as_bytes()).expect("load");
        let tempo = FEATURE_COLUMNS.iter().position(|c| *c == "tempo").unwrap();
        let values: Vec<_> = catalog.records.iter().map(|r| r.features[tempo]).collect();
        assert_eq!(values, vec![Some(1e39), Some(1.0), Some(2.0)]);
    }

    #[test]
    fn tolerates_short_rows() {
        let data = "title,artist,album,energy\nA,X\n";
        let catalog = from_reader(data.as_bytes()).expect("load");
        assert_eq!(catalog.records[0].album, None);
        assert!(catalog.records[0].features.iter().all(Option::is_none));
    }
}
