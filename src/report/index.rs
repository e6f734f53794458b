use crate::{
    error::PipelineError,
    job::{Group, list_files_with_extension, stem_base_name},
    layout::SessionLayout,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageEntry {
    pub base_name: String,
    pub group: Group,
    pub relative_path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePair {
    pub original: String,
    pub obfuscated: String,
}

/// collection id -> base name -> paired image paths (relative to the build directory).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComparisonIndex {
    collections: BTreeMap<String, BTreeMap<String, ImagePair>>,
}

impl ComparisonIndex {
    pub fn new(collection: &str) -> Self {
        let mut collections = BTreeMap::new();
        collections.insert(collection.to_string(), BTreeMap::new());
        Self { collections }
    }

    pub fn insert(&mut self, collection: &str, base_name: String, pair: ImagePair) {
        self.collections
            .entry(collection.to_string())
            .or_default()
            .insert(base_name, pair);
    }

    pub fn entries(&self, collection: &str) -> Option<&BTreeMap<String, ImagePair>> {
        self.collections.get(collection)
    }

    pub fn get(&self, collection: &str, base_name: &str) -> Option<&ImagePair> {
        self.entries(collection)?.get(base_name)
    }

    pub fn base_names(&self, collection: &str) -> Vec<&str> {
        self.entries(collection)
            .map(|m| m.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    pub fn len(&self, collection: &str) -> usize {
        self.entries(collection).map_or(0, BTreeMap::len)
    }
}

/// Images currently in one group's output directory, in file-name order.
pub fn scan_images(
    layout: &SessionLayout,
    group: Group,
) -> Result<Vec<ImageEntry>, PipelineError> {
    let files = list_files_with_extension(&layout.image_dir(group), layout.image_format())?;
    Ok(files
        .into_iter()
        .map(|path| {
            let file_name = path
                .file_name()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            ImageEntry {
                base_name: stem_base_name(&path),
                group,
                relative_path: layout.relative_image_path(group, file_name),
            }
        })
        .collect())
}

/// Pairs images by normalized base name. Only names present in both groups are kept;
/// when several files in one group normalize to the same name, the last in file-name
/// order wins.
pub fn build_index(
    layout: &SessionLayout,
    collection: &str,
) -> Result<ComparisonIndex, PipelineError> {
    let originals = by_base_name(scan_images(layout, Group::Original)?);
    let obfuscated = by_base_name(scan_images(layout, Group::Obfuscated)?);

    let mut index = ComparisonIndex::new(collection);
    for (base_name, original) in originals {
        match obfuscated.get(&base_name) {
            Some(obf) => index.insert(
                collection,
                base_name,
                ImagePair {
                    original,
                    obfuscated: obf.clone(),
                },
            ),
            None => debug!("{base_name}: no obfuscated counterpart, skipped"),
        }
    }
    Ok(index)
}

fn by_base_name(entries: Vec<ImageEntry>) -> BTreeMap<String, String> {
    entries
        .into_iter()
        .map(|e| (e.base_name, e.relative_path))
        .collect()
}
