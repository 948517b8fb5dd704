//! JSON description of a showcase: the slides, the main display regions and
//! optional timing overrides.
//!
//! ```json
//! {
//!   "slides": [
//!     { "image": "covers/ember.jpg", "title": "Ember", "description": "..." }
//!   ],
//!   "display": {
//!     "image": { "x": 0.05, "y": 0.05, "width": 0.55, "height": 0.72 },
//!     "title": { "x": 0.63, "y": 0.10, "width": 0.34, "height": 0.10 },
//!     "description": { "x": 0.63, "y": 0.24, "width": 0.34, "height": 0.50 }
//!   },
//!   "timing": { "rotation_ms": 5000 }
//! }
//! ```

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::asset::image_extension;
use crate::error::{Result, ShowcaseError};
use crate::showcase::Timing;
use crate::slide::{DisplayLayout, Region, Slide};

#[derive(Debug, Deserialize)]
struct RawManifest {
    #[serde(default)]
    slides: Vec<RawSlide>,
    display: Option<RawDisplay>,
    #[serde(default)]
    timing: RawTiming,
}

#[derive(Debug, Deserialize)]
struct RawSlide {
    image: Option<String>,
    title: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDisplay {
    image: Option<Region>,
    title: Option<Region>,
    description: Option<Region>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTiming {
    rotation_ms: Option<u64>,
    fade_out_ms: Option<u64>,
    swap_delay_ms: Option<u64>,
    fade_in_ms: Option<u64>,
}

#[derive(Debug)]
pub struct Manifest {
    pub slides: Vec<Slide>,
    /// `None` when the manifest has no `display` block at all.
    pub display: Option<DisplayLayout>,
    pub timing: Timing,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| {
                ShowcaseError::config(format!("cannot read manifest {}: {e}", path.display()))
            })?;
        let base = path.parent().unwrap_or(Path::new(""));
        Self::parse(&text, base)
    }

    /// Builds a showcase from every image in `dir`, sorted by file name. The
    /// file stem becomes the title.
    pub fn from_directory(dir: &Path) -> Result<Self> {
        let paths = load_sorted_image_paths(dir)?;
        let slides = paths
            .iter()
            .enumerate()
            .map(|(id, path)| {
                let title = path
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                Slide::new(id, path.display().to_string(), title, String::new())
            })
            .collect();
        Ok(Self { slides, display: Some(DisplayLayout::default()), timing: Timing::default() })
    }

    /// Parses manifest JSON. Relative image paths are resolved against `base`.
    pub fn parse(text: &str, base: &Path) -> Result<Self> {
        let raw: RawManifest = serde_json::from_str(text)
            .map_err(|e| ShowcaseError::config(format!("invalid manifest: {e}")))?;

        let mut slides = Vec::with_capacity(raw.slides.len());
        for (id, slide) in raw.slides.into_iter().enumerate() {
            let missing =
                |field: &str| ShowcaseError::config(format!("slide {id} has no `{field}`"));
            let image = slide.image.ok_or_else(|| missing("image"))?;
            let title = slide.title.ok_or_else(|| missing("title"))?;
            let description = slide.description.ok_or_else(|| missing("description"))?;

            let image_url = if image.contains("://") || Path::new(&image).is_absolute() {
                image
            } else {
                base.join(&image).display().to_string()
            };
            slides.push(Slide::new(id, image_url, title, description));
        }

        let display = match raw.display {
            None => None,
            Some(d) => {
                let missing = |region: &str| {
                    ShowcaseError::config(format!("display has no `{region}` region"))
                };
                Some(DisplayLayout {
                    image: d.image.ok_or_else(|| missing("image"))?,
                    title: d.title.ok_or_else(|| missing("title"))?,
                    description: d.description.ok_or_else(|| missing("description"))?,
                })
            }
        };

        let defaults = Timing::default();
        let ms_or = |value: Option<u64>, default: Duration| {
            value.map(Duration::from_millis).unwrap_or(default)
        };
        let timing = Timing {
            rotation: ms_or(raw.timing.rotation_ms, defaults.rotation),
            fade_out: ms_or(raw.timing.fade_out_ms, defaults.fade_out),
            swap_delay: ms_or(raw.timing.swap_delay_ms, defaults.swap_delay),
            fade_in: ms_or(raw.timing.fade_in_ms, defaults.fade_in),
        };

        Ok(Self { slides, display, timing })
    }
}

pub fn load_sorted_image_paths(dir: &Path) -> Result<Vec<std::path::PathBuf>> {
    let read_error = |e: std::io::Error| {
        ShowcaseError::config(format!("failed to read directory {}: {e}", dir.display()))
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if path.is_file() && image_extension(&path).is_some() {
            paths.push(path);
        }
    }
    paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    if paths.is_empty() {
        Err(ShowcaseError::config(format!("no image files found in directory {}", dir.display())))
    } else {
        Ok(paths)
    }
}
