//! Content-addressed asset registration and the optional on-disk store.

use crate::model::{Asset, FigureElement};
use log::warn;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;

/// Byte accessor for figure media, implemented by the upstream
/// extractor.
pub trait MediaSource {
    /// Retrieve the raw bytes behind a media reference.
    fn media_bytes(&self, source_ref: &str) -> io::Result<Vec<u8>>;
}

/// Map-backed media source, convenient for tests and in-process callers.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMedia {
    entries: HashMap<String, Vec<u8>>,
}

impl InMemoryMedia {
    /// Create an empty media source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a media entry.
    pub fn insert(&mut self, source_ref: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(source_ref.into(), bytes);
    }

    /// Builder-style insert.
    pub fn with(mut self, source_ref: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(source_ref, bytes);
        self
    }
}

impl MediaSource for InMemoryMedia {
    fn media_bytes(&self, source_ref: &str) -> io::Result<Vec<u8>> {
        self.entries.get(source_ref).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no media for reference '{}'", source_ref),
            )
        })
    }
}

/// Media source with no media at all; every figure gets a placeholder.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMedia;

impl MediaSource for NoMedia {
    fn media_bytes(&self, source_ref: &str) -> io::Result<Vec<u8>> {
        Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("media source disabled ('{}')", source_ref),
        ))
    }
}

/// Content-addresses image bytes into stable, deduplicated assets.
///
/// Identical bytes always resolve to one id and one asset entry.
/// Retrieval failures substitute a deterministic placeholder and a
/// warning; they never abort the conversion.
pub struct AssetRegistry<'a> {
    assets_dir: Option<&'a Path>,
    index: HashMap<String, usize>,
    assets: Vec<Asset>,
    warnings: Vec<String>,
}

impl<'a> AssetRegistry<'a> {
    /// Create a registry; `assets_dir` enables the on-disk store.
    pub fn new(assets_dir: Option<&'a Path>) -> Self {
        Self {
            assets_dir,
            index: HashMap::new(),
            assets: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Register one figure's bytes and return its asset id.
    ///
    /// `ordinal` is the figure's position among all figures and seeds
    /// the placeholder id when bytes cannot be retrieved.
    pub fn register<M: MediaSource>(
        &mut self,
        figure: &FigureElement,
        ordinal: usize,
        media: &M,
    ) -> String {
        let bytes = match &figure.source_ref {
            Some(source_ref) => match media.media_bytes(source_ref) {
                Ok(bytes) => bytes,
                Err(err) => {
                    return self.placeholder(figure, ordinal, &err.to_string());
                }
            },
            None => {
                return self.placeholder(figure, ordinal, "no media reference");
            }
        };

        let sha256 = hex_digest(&bytes);
        let asset_id = format!("img_{}", &sha256[..12]);

        if self.index.contains_key(&asset_id) {
            return asset_id;
        }

        let extension = Asset::detect_extension(&bytes);
        let basename = format!("{}.{}", asset_id, extension);
        let filename = match self.assets_dir {
            Some(dir) => {
                if let Err(err) = self.store(dir, &basename, &bytes) {
                    self.warnings.push(format!(
                        "failed to store asset {}: {}",
                        asset_id, err
                    ));
                    warn!("failed to store asset {}: {}", asset_id, err);
                }
                prefixed_filename(dir, &basename)
            }
            None => basename,
        };

        self.index.insert(asset_id.clone(), self.assets.len());
        self.assets.push(Asset::new(&asset_id, filename, sha256));
        asset_id
    }

    /// Write-once store: identical bytes landing on the same derived
    /// path are skipped, so reruns are idempotent.
    fn store(&self, dir: &Path, basename: &str, bytes: &[u8]) -> io::Result<()> {
        fs::create_dir_all(dir)?;
        let path = dir.join(basename);
        if !path.exists() {
            fs::write(path, bytes)?;
        }
        Ok(())
    }

    fn placeholder(&mut self, figure: &FigureElement, ordinal: usize, cause: &str) -> String {
        let asset_id = format!("img_missing_{:04}", ordinal);
        let message = format!(
            "figure at container {} run {} has no retrievable media ({}); using {}",
            figure.container, figure.run_index, cause, asset_id
        );
        warn!("{}", message);
        self.warnings.push(message);

        if !self.index.contains_key(&asset_id) {
            // A well-formed but synthetic digest keeps the asset list
            // shape uniform for downstream consumers.
            let sha256 = hex_digest(asset_id.as_bytes());
            let filename = format!("missing_{:04}.bin", ordinal);
            self.index.insert(asset_id.clone(), self.assets.len());
            self.assets.push(Asset::new(&asset_id, filename, sha256));
        }
        asset_id
    }

    /// Consume the registry, yielding warnings and the ordered asset list.
    pub fn into_parts(self) -> (Vec<String>, Vec<Asset>) {
        (self.warnings, self.assets)
    }
}

fn hex_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}

/// Record the store directory's basename in the filename, the way the
/// output JSON references assets relative to the output root.
fn prefixed_filename(dir: &Path, basename: &str) -> String {
    match dir.file_name().and_then(|n| n.to_str()) {
        Some(prefix) => format!("{}/{}", prefix, basename),
        None => basename.to_string(),
    }
}
