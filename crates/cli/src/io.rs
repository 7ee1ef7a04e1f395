//! JSON files in and out: documents are validated on load.

use anyhow::{Context, Result};
use geocon::doc::ConstructionDoc;
use geocon::tool::CustomTool;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing {}", path.display()))
}

pub fn read_doc(path: &Path) -> Result<ConstructionDoc> {
    let doc: ConstructionDoc = read_json(path)?;
    doc.validate()
        .with_context(|| format!("invalid document {}", path.display()))?;
    Ok(doc)
}

pub fn read_tool(path: &Path) -> Result<CustomTool> {
    read_json(path)
}

/// Pretty JSON; parent directories are created as needed.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating dir {}", parent.display()))?;
        }
    }
    fs::write(path, serde_json::to_vec_pretty(value)?)
        .with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use geocon::doc::GeometryMode;
    use nalgebra::vector;
    use tempfile::tempdir;

    #[test]
    fn doc_round_trips_through_nested_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a/b/doc.json");
        let mut doc = ConstructionDoc::new(GeometryMode::InversiveEuclidean);
        doc.add_free_point(vector![1.0, 2.0, 0.0]);
        write_json(&path, &doc).unwrap();
        assert_eq!(read_doc(&path).unwrap(), doc);
    }

    #[test]
    fn invalid_doc_names_the_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        let mut doc = ConstructionDoc::new(GeometryMode::Euclidean);
        let a = doc.add_free_point(vector![0.0, 0.0, 0.0]);
        let b = doc.add_free_point(vector![1.0, 0.0, 0.0]);
        doc.add_line(a, b).unwrap();
        doc.lines[0].p2 = 77;
        write_json(&path, &doc).unwrap();
        let err = read_doc(&path).unwrap_err();
        assert!(format!("{err:#}").contains("bad.json"));
        assert!(read_doc(&dir.path().join("missing.json")).is_err());
    }
}
