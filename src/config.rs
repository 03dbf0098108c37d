use std::path::{Path, PathBuf};

/// Dataset file name looked up when no path is given.
pub const DEFAULT_DATASET_FILE: &str = "bollywood_songs_curated.csv";

/// Directory holding the default dataset when it is not in the working
/// directory.
fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("vibe")
}

/// Resolve the dataset path: an explicit path wins, then the default file in
/// the working directory, then the default file in the user data directory.
#[must_use]
pub fn dataset_path(explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    let local = PathBuf::from(DEFAULT_DATASET_FILE);
    if local.is_file() {
        return local;
    }
    data_dir().join(DEFAULT_DATASET_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_path_wins() {
        let path = dataset_path(Some(Path::new("/tmp/songs.csv")));
        assert_eq!(path, PathBuf::from("/tmp/songs.csv"));
    }

    #[test]
    fn default_path_uses_dataset_file_name() {
        let path = dataset_path(None);
        assert_eq!(
            path.file_name().and_then(|n| n.to_str()),
            Some(DEFAULT_DATASET_FILE)
        );
    }
}
