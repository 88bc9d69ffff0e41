//! Card payloads and where they come from.
//!
//! An [`Item`] is an image reference plus an optional caption, keyed by a
//! stable [`ItemId`].  Animation continuity follows the id, never the
//! position, so ids must be unique within a set.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

/// Stable identity of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub u32);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One card: what to show and what to say under it.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub image: PathBuf,
    pub caption: Option<String>,
}

impl Item {
    pub fn new(id: u32, image: impl Into<PathBuf>, caption: Option<&str>) -> Self {
        Self {
            id: ItemId(id),
            image: image.into(),
            caption: caption.map(str::to_owned),
        }
    }

    /// Caption if present, otherwise the image file stem.
    pub fn label(&self) -> String {
        match &self.caption {
            Some(c) => c.clone(),
            None => self
                .image
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.id.to_string()),
        }
    }
}

#[derive(Debug, Error)]
pub enum DeckError {
    #[error("no cards to show")]
    Empty,
    #[error("duplicate card id {0}")]
    DuplicateId(ItemId),
    #[error("cannot read image directory {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// A validated, ordered list of unique items.
#[derive(Debug, Clone)]
pub struct ItemSet {
    items: Vec<Item>,
}

/// Project names from the portfolio deck, used for the built-in demo set.
const DEMO_CARDS: &[(&str, &str)] = &[
    ("maisonproject", "Maison"),
    ("aboutproject", "About"),
    ("camilanproject", "Camilan"),
    ("cherrieproject", "Cherrie"),
    ("labproject", "Lab"),
    ("playgroundproject", "Playground"),
    ("camilanproject", "Camilan, again"),
];

/// Prefix marking images that the app paints procedurally instead of loading.
pub const DEMO_SCHEME: &str = "demo:";

impl ItemSet {
    pub fn new(items: Vec<Item>) -> Result<Self, DeckError> {
        if items.is_empty() {
            return Err(DeckError::Empty);
        }
        let mut seen = HashSet::new();
        for item in &items {
            if !seen.insert(item.id) {
                return Err(DeckError::DuplicateId(item.id));
            }
        }
        Ok(Self { items })
    }

    /// Seven placeholder cards whose images are generated, not read.
    pub fn demo() -> Self {
        let items = DEMO_CARDS
            .iter()
            .enumerate()
            .map(|(i, (stem, caption))| {
                Item::new(i as u32 + 1, format!("{DEMO_SCHEME}{stem}"), Some(caption))
            })
            .collect();
        Self { items }
    }

    /// Every image directly inside `dir`, sorted by file name, capped at
    /// `limit` entries.  Ids are assigned 1.. in that order.
    pub fn from_dir(dir: &Path, limit: usize) -> Result<Self, DeckError> {
        let mut images = Vec::new();
        for entry in WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|source| DeckError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
            if !entry.file_type().is_file() || is_blur_variant(entry.path()) {
                continue;
            }
            if !is_image(entry.path()) {
                tracing::debug!("skipping non-image {}", entry.path().display());
                continue;
            }
            images.push(entry.into_path());
            if images.len() >= limit {
                break;
            }
        }

        let items = images
            .into_iter()
            .enumerate()
            .map(|(i, path)| Item {
                id: ItemId(i as u32 + 1),
                image: path,
                caption: None,
            })
            .collect();
        Self::new(items)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// The first `n` items, for the bounded stack.
    pub fn take(&self, n: usize) -> Vec<Item> {
        self.items.iter().take(n).cloned().collect()
    }
}

fn is_image(path: &Path) -> bool {
    tree_magic_mini::from_filepath(path)
        .map(|mime| mime.starts_with("image/"))
        .unwrap_or(false)
}

/// Sibling path of the blurred backdrop for an image:
/// `a/b.webp` → `a/b_blur.webp`, `a/b` → `a/b_blur`.
pub fn blur_variant(path: &Path) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{stem}_blur.{}", ext.to_string_lossy()),
        None => format!("{stem}_blur"),
    };
    path.with_file_name(name)
}

fn is_blur_variant(path: &Path) -> bool {
    path.file_stem()
        .map(|s| s.to_string_lossy().ends_with("_blur"))
        .unwrap_or(false)
}
