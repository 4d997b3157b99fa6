// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Reading and writing the map document on disk.
//!
//! The on-disk format is the export document (`format::document`); this
//! module only adds IO and an atomic write (temp file + rename) so a
//! crashed save never truncates an existing map.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::format::{export_document, parse_document, DocumentExportError, DocumentParseError};
use crate::model::MindMap;

#[derive(Debug)]
pub enum MapFileError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Parse {
        path: PathBuf,
        source: DocumentParseError,
    },
    Export {
        path: PathBuf,
        source: DocumentExportError,
    },
}

impl fmt::Display for MapFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "io error at {}: {source}", path.display()),
            Self::Parse { path, source } => {
                write!(f, "cannot read map from {}: {source}", path.display())
            }
            Self::Export { path, source } => {
                write!(f, "cannot write map to {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for MapFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse { source, .. } => Some(source),
            Self::Export { source, .. } => Some(source),
        }
    }
}

/// Read and decode a map document. Any failure leaves the caller's state
/// untouched — there is no partial load.
pub fn load_map(path: &Path) -> Result<MindMap, MapFileError> {
    let raw = fs::read_to_string(path).map_err(|source| MapFileError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_document(&raw).map_err(|source| MapFileError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Encode and atomically write a map document: the content lands in a
/// sibling temp file first and is renamed over the destination.
pub fn save_map(path: &Path, map: &MindMap) -> Result<(), MapFileError> {
    let document = export_document(map).map_err(|source| MapFileError::Export {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp_path = temp_sibling(path);
    let io_err = |source| MapFileError::Io {
        path: path.to_path_buf(),
        source,
    };

    fs::write(&tmp_path, document.as_bytes()).map_err(io_err)?;
    match fs::rename(&tmp_path, path) {
        Ok(()) => Ok(()),
        Err(source) => {
            let _ = fs::remove_file(&tmp_path);
            Err(io_err(source))
        }
    }
}

fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::{load_map, save_map, MapFileError};
    use crate::model::fixtures::demo_map;

    struct TempDir(std::path::PathBuf);

    impl TempDir {
        fn new(tag: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "rhizome-map-file-{tag}-{}",
                std::process::id()
            ));
            std::fs::create_dir_all(&dir).expect("create temp dir");
            Self(dir)
        }

        fn path(&self, name: &str) -> std::path::PathBuf {
            self.0.join(name)
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = std::fs::remove_dir_all(&self.0);
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let tmp = TempDir::new("roundtrip");
        let path = tmp.path("map.md");
        let map = demo_map();

        save_map(&path, &map).expect("save");
        let restored = load_map(&path).expect("load");
        assert_eq!(restored, map);
    }

    #[test]
    fn load_of_a_missing_file_is_an_io_error() {
        let tmp = TempDir::new("missing");
        let err = load_map(&tmp.path("nope.md")).unwrap_err();
        assert!(matches!(err, MapFileError::Io { .. }));
    }

    #[test]
    fn load_of_a_non_map_file_is_a_parse_error() {
        let tmp = TempDir::new("not-a-map");
        let path = tmp.path("prose.md");
        std::fs::write(&path, "# Notes\n\nNothing here.\n").expect("write");

        let err = load_map(&path).unwrap_err();
        assert!(matches!(err, MapFileError::Parse { .. }));
    }

    #[test]
    fn save_leaves_no_temp_file_behind() {
        let tmp = TempDir::new("tempfile");
        let path = tmp.path("map.md");
        save_map(&path, &demo_map()).expect("save");
        assert!(path.is_file());
        assert!(!tmp.path("map.md.tmp").exists());
    }
}
