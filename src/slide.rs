use serde::Deserialize;

/// One showcased game: an image plus the text shown next to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    pub id: usize,
    pub image_url: String,
    pub title: String,
    pub description: String,
}

impl Slide {
    pub fn new(
        id: usize,
        image_url: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id,
            image_url: image_url.into(),
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Normalized rectangle (0..1 in both axes) of the window.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Region {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

/// Where the main display draws its image, title and description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayLayout {
    pub image: Region,
    pub title: Region,
    pub description: Region,
}

impl Default for DisplayLayout {
    fn default() -> Self {
        Self {
            image: Region::new(0.05, 0.05, 0.55, 0.72),
            title: Region::new(0.63, 0.10, 0.34, 0.10),
            description: Region::new(0.63, 0.24, 0.34, 0.50),
        }
    }
}

/// Cell of the thumbnail strip along the bottom of the window.
pub fn thumbnail_region(index: usize, count: usize, strip_height: f32) -> Region {
    let width = 1.0 / count.max(1) as f32;
    Region::new(index as f32 * width, 1.0 - strip_height, width, strip_height)
}

/// Thumbnail under a normalized pointer position, if any.
pub fn thumbnail_at(count: usize, strip_height: f32, x: f32, y: f32) -> Option<usize> {
    (0..count).find(|&i| thumbnail_region(i, count, strip_height).contains(x, y))
}

/// Per-slide progress bar state shown under each thumbnail.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Indicator {
    pub active: bool,
    pub progress: f32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thumbnails_split_the_strip() {
        let r = thumbnail_region(2, 4, 0.2);
        assert_eq!(r, Region::new(0.5, 0.8, 0.25, 0.2));
    }

    #[test]
    fn pointer_hits_thumbnail() {
        assert_eq!(thumbnail_at(4, 0.2, 0.6, 0.9), Some(2));
        assert_eq!(thumbnail_at(4, 0.2, 0.6, 0.5), None);
        assert_eq!(thumbnail_at(0, 0.2, 0.1, 0.9), None);
    }
}
