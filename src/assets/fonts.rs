use std::{future::Future, path::Path, sync::Arc};

use anyhow::Context;

use crate::foundation::error::{PhototagError, PhototagResult};

/// Raw font file bytes plus the face index inside the file.
#[derive(Clone, PartialEq, Eq)]
pub struct FaceData {
    /// Font file bytes (TTF/OTF/TTC).
    pub bytes: Arc<Vec<u8>>,
    /// Face index for collections; 0 for single-face files.
    pub index: u32,
}

impl FaceData {
    /// Single-face font bytes.
    pub fn new(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::new(bytes),
            index: 0,
        }
    }

    /// Read a font file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> PhototagResult<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        Ok(Self::new(bytes))
    }
}

impl std::fmt::Debug for FaceData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FaceData")
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .finish()
    }
}

/// A font family that is ready to measure and draw.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontFaces {
    /// Requested family name.
    pub family: String,
    /// Regular weight face.
    pub regular: FaceData,
    /// Bold face. Brand names fall back to the regular face when absent.
    pub bold: Option<FaceData>,
}

/// Font-ready notifier: resolves once the requested family can be measured and drawn.
///
/// Awaited exactly once per render, before any text-dependent sizing.
pub trait FontSource {
    /// Wait for `family` and hand back its faces.
    fn font_ready(&self, family: &str) -> impl Future<Output = PhototagResult<FontFaces>>;
}

impl FontSource for FontFaces {
    async fn font_ready(&self, family: &str) -> PhototagResult<FontFaces> {
        if family != self.family {
            tracing::debug!(
                requested = family,
                provided = %self.family,
                "serving in-memory font for a different family name"
            );
        }
        Ok(self.clone())
    }
}

/// Sans families tried in order when the requested family is not installed.
const SANS_FALLBACKS: &[&str] = &[
    "Helvetica Neue",
    "Helvetica",
    "Arial",
    "Liberation Sans",
    "DejaVu Sans",
    "Noto Sans",
    "Nimbus Sans",
    "Roboto",
    "Open Sans",
    "Cantarell",
    "FreeSans",
];

/// Fonts installed on the system, looked up through a font database.
///
/// Unknown families fall back to the first installed family from a list of common sans faces,
/// then to any upright family with "Sans" in its name.
pub struct SystemFonts {
    db: usvg::fontdb::Database,
}

impl Default for SystemFonts {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemFonts {
    /// Load the system font database.
    pub fn new() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        Self { db }
    }

    /// Database without any fonts; add some with [`with_font_dir`](Self::with_font_dir).
    pub fn empty() -> Self {
        Self {
            db: usvg::fontdb::Database::new(),
        }
    }

    /// Also load every `.ttf`/`.otf`/`.ttc` file in `dir`.
    pub fn with_font_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.db.load_fonts_dir(dir);
        self
    }

    /// Number of faces known to the database.
    pub fn face_count(&self) -> usize {
        self.db.len()
    }

    /// Installed family used for `family`, after fallbacks.
    pub fn resolve_family(&self, family: &str) -> Option<String> {
        let installed: Vec<(&str, bool)> = self
            .db
            .faces()
            .flat_map(|face| {
                let upright =
                    face.style == usvg::fontdb::Style::Normal && !face.monospaced;
                face.families
                    .iter()
                    .map(move |(name, _)| (name.as_str(), upright))
            })
            .collect();
        pick_family(family, &installed)
    }

    /// Resolve `family` synchronously.
    ///
    /// Regular and bold come from the same resolved family. `bold` is `None` when that family has no
    /// face of semibold weight or heavier.
    pub fn lookup(&self, family: &str) -> PhototagResult<FontFaces> {
        let resolved = self
            .resolve_family(family)
            .ok_or_else(|| PhototagError::font(format!("no usable face for family '{family}'")))?;
        let (regular_id, _) = self
            .query(&resolved, usvg::fontdb::Weight::NORMAL)
            .ok_or_else(|| PhototagError::font(format!("no regular face in '{resolved}'")))?;
        let regular = self
            .face_data(regular_id)
            .ok_or_else(|| PhototagError::font(format!("font data for '{resolved}' unavailable")))?;
        let bold = self
            .query(&resolved, usvg::fontdb::Weight::BOLD)
            .filter(|(id, weight)| {
                *id != regular_id && weight.0 >= usvg::fontdb::Weight::SEMIBOLD.0
            })
            .and_then(|(id, _)| self.face_data(id));

        tracing::debug!(
            requested = family,
            resolved = %resolved,
            bold = bold.is_some(),
            "resolved system font"
        );
        Ok(FontFaces {
            family: family.to_string(),
            regular,
            bold,
        })
    }

    fn query(
        &self,
        family: &str,
        weight: usvg::fontdb::Weight,
    ) -> Option<(usvg::fontdb::ID, usvg::fontdb::Weight)> {
        let families = [usvg::fontdb::Family::Name(family)];
        let query = usvg::fontdb::Query {
            families: &families,
            weight,
            stretch: usvg::fontdb::Stretch::Normal,
            style: usvg::fontdb::Style::Normal,
        };
        let id = self.db.query(&query)?;
        let info = self.db.face(id)?;
        Some((id, info.weight))
    }

    fn face_data(&self, id: usvg::fontdb::ID) -> Option<FaceData> {
        self.db.with_face_data(id, |data, index| FaceData {
            bytes: Arc::new(data.to_vec()),
            index,
        })
    }
}

/// Pick the family to use for `requested` from `(name, upright)` pairs of installed faces.
fn pick_family(requested: &str, installed: &[(&str, bool)]) -> Option<String> {
    let upright = || installed.iter().filter(|(_, ok)| *ok).map(|(name, _)| *name);
    let find = |want: &str| upright().find(|name| name.eq_ignore_ascii_case(want));

    find(requested)
        .or_else(|| SANS_FALLBACKS.iter().find_map(|want| find(*want)))
        .or_else(|| {
            upright().find(|name| {
                let lower = name.to_ascii_lowercase();
                lower.contains("sans") && !lower.contains("mono")
            })
        })
        .map(str::to_string)
}

impl FontSource for SystemFonts {
    async fn font_ready(&self, family: &str) -> PhototagResult<FontFaces> {
        self.lookup(family)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/fonts.rs"]
mod tests;
