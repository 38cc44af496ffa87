use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::config::JsonOptions;
use crate::error::PersistError;
use crate::grid::Grid;

/// Encode as `{"grid": [[...]]}`.
pub fn to_json_bytes<T: Serialize>(
    grid: &Grid<T>,
    options: &JsonOptions,
) -> Result<Vec<u8>, serde_json::Error> {
    if options.pretty {
        serde_json::to_vec_pretty(grid)
    } else {
        serde_json::to_vec(grid)
    }
}

/// Decode `{"grid": [[...]]}`. Ragged or empty row lists are decode errors.
pub fn from_json_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<Grid<T>, serde_json::Error> {
    serde_json::from_slice(bytes)
}

pub fn load<T: DeserializeOwned>(path: impl AsRef<Path>) -> Result<Grid<T>, PersistError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    let grid: Grid<T> = from_json_slice(&bytes)?;
    tracing::debug!(
        path = %path.display(),
        bytes = bytes.len(),
        rows = grid.rows(),
        cols = grid.cols(),
        "loaded grid"
    );
    Ok(grid)
}

pub fn save<T: Serialize>(grid: &Grid<T>, path: impl AsRef<Path>) -> Result<(), PersistError> {
    save_with(grid, path, &JsonOptions::default())
}

pub fn save_with<T: Serialize>(
    grid: &Grid<T>,
    path: impl AsRef<Path>,
    options: &JsonOptions,
) -> Result<(), PersistError> {
    let path = path.as_ref();
    let bytes = to_json_bytes(grid, options)?;
    if options.atomic {
        write_atomic(path, &bytes)?;
    } else {
        fs::write(path, &bytes)?;
    }
    tracing::debug!(
        path = %path.display(),
        bytes = bytes.len(),
        rows = grid.rows(),
        cols = grid.cols(),
        atomic = options.atomic,
        "saved grid"
    );
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Unique per call, so concurrent saves to one path never share a temp file.
fn temp_sibling(path: &Path) -> PathBuf {
    let name = file_name(path);
    let nonce: u64 = rand::random();
    path.with_file_name(format!(".{name}.{}.{nonce:016x}.tmp", std::process::id()))
}

/// Readers see either the old file or the complete new one.
fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let tmp = temp_sibling(path);
    let res = (|| {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        fs::rename(&tmp, path)
    })();
    if res.is_err() {
        let _ = fs::remove_file(&tmp);
    }
    res
}

impl<T: DeserializeOwned> Grid<T> {
    /// Read and decode a grid saved by [`Grid::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        load(path)
    }
}

impl<T: Serialize> Grid<T> {
    /// Pretty-printed JSON, written atomically.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        save(self, path)
    }

    pub fn save_with(
        &self,
        path: impl AsRef<Path>,
        options: &JsonOptions,
    ) -> Result<(), PersistError> {
        save_with(self, path, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("gridmatrix-{}-{name}", std::process::id()))
    }

    /// Temp files left next to `path` by an atomic save.
    fn leftover_temps(path: &Path) -> Vec<PathBuf> {
        let prefix = format!(".{}.", file_name(path));
        let Some(dir) = path.parent() else {
            return Vec::new();
        };
        let Ok(entries) = fs::read_dir(dir) else {
            return Vec::new();
        };
        entries
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| {
                let name = file_name(p);
                name.starts_with(&prefix) && name.ends_with(".tmp")
            })
            .collect()
    }

    #[test]
    fn temp_names_differ_per_save() {
        let path = scratch("names.json");
        assert_ne!(temp_sibling(&path), temp_sibling(&path));
        assert_eq!(temp_sibling(&path).parent(), path.parent());
    }

    #[test]
    fn pretty_output_is_indented() {
        let g = Grid::filled(1, 2, 5u8);
        let pretty = to_json_bytes(&g, &JsonOptions::default()).unwrap();
        let compact = to_json_bytes(&g, &JsonOptions::compact()).unwrap();
        assert_eq!(compact, br#"{"grid":[[5,5]]}"#);
        assert!(String::from_utf8(pretty).unwrap().contains("\n  \"grid\""));
    }

    #[test]
    fn save_then_load() {
        let path = scratch("roundtrip.json");
        let rows = vec![
            vec!["a".to_string(), "b".into()],
            vec!["c".into(), "d".into()],
        ];
        let g = Grid::from_rows(rows).unwrap();
        g.save(&path).unwrap();
        let back: Grid<String> = Grid::load(&path).unwrap();
        assert_eq!(back, g);
        assert!(leftover_temps(&path).is_empty());
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn non_atomic_save() {
        let path = scratch("plain.json");
        let g = Grid::filled(2, 2, 1.5f64);
        let options = JsonOptions {
            pretty: false,
            atomic: false,
        };
        g.save_with(&path, &options).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"{"grid":[[1.5,1.5],[1.5,1.5]]}"#
        );
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = Grid::<i32>::load(scratch("does-not-exist.json")).unwrap_err();
        match err {
            PersistError::Io(e) => assert_eq!(e.kind(), io::ErrorKind::NotFound),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bad_json_is_decode_error() {
        let path = scratch("bad.json");
        fs::write(&path, b"{\"grid\": [[1, 2], [3]]}").unwrap();
        let err = Grid::<i32>::load(&path).unwrap_err();
        assert!(matches!(err, PersistError::Json(_)));
        fs::write(&path, b"not json").unwrap();
        assert!(matches!(Grid::<i32>::load(&path), Err(PersistError::Json(_))));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn save_into_missing_dir_leaves_nothing_behind() {
        let path = scratch("no-such-dir").join("grid.json");
        let err = Grid::filled(1, 1, 0).save(&path).unwrap_err();
        assert!(matches!(err, PersistError::Io(_)));
        assert!(leftover_temps(&path).is_empty());
    }

    #[test]
    fn concurrent_saves_to_one_path_all_succeed() {
        let path = scratch("concurrent.json");
        std::thread::scope(|s| {
            for i in 0..8u8 {
                let path = &path;
                s.spawn(move || Grid::filled(3, 3, i).save(path).unwrap());
            }
        });
        let back: Grid<u8> = Grid::load(&path).unwrap();
        let first = *back.get(0, 0);
        assert!(first < 8);
        assert!(back.iter().all(|&v| v == first));
        assert!(leftover_temps(&path).is_empty());
        fs::remove_file(&path).unwrap();
    }
}
