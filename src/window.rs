use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::task::Poll;
use std::time::Duration;

use raylib::prelude::*;

use crate::asset::{AssetLoader, exif_orientation, image_extension};
use crate::constants::*;
use crate::error::ShowcaseError;
use crate::showcase::Showcase;
use crate::slide::{Region, thumbnail_at, thumbnail_region};

/// Decodes slide images into CPU-side raylib images, EXIF rotation applied.
/// Textures are created by the window once the image is on screen.
#[derive(Debug, Default)]
pub struct ImageLoader;

impl AssetLoader for ImageLoader {
    type Asset = Image;

    fn poll_load(&mut self, url: &str) -> Poll<Result<Image, ShowcaseError>> {
        Poll::Ready(load_image_with_exif_rotation(Path::new(url)))
    }
}

pub fn load_image_with_exif_rotation(image_path: &Path) -> Result<Image, ShowcaseError> {
    let url = image_path.display().to_string();
    let extension = image_extension(image_path)
        .ok_or_else(|| ShowcaseError::asset(&url, "unsupported image format"))?;
    let file_bytes = fs::read(image_path).map_err(|e| ShowcaseError::asset(&url, e.to_string()))?;
    let orientation = exif_orientation(&extension, &file_bytes);

    let mut image = Image::load_image_from_mem(&format!(".{extension}"), &file_bytes)
        .map_err(|e| ShowcaseError::asset(&url, e.to_string()))?;

    // 1 = normal, 3 = 180 deg, 6 = 90 deg CW, 8 = 90 deg CCW; flips are ignored
    match orientation {
        3 => {
            image.rotate_cw();
            image.rotate_cw();
        }
        6 => image.rotate_cw(),
        8 => image.rotate_ccw(),
        _ => {}
    }
    Ok(image)
}

fn to_pixels(region: &Region, sw: f32, sh: f32) -> Rectangle {
    Rectangle::new(region.x * sw, region.y * sh, region.width * sw, region.height * sh)
}

fn faded(color: Color, opacity: f32) -> Color {
    Color::new(color.r, color.g, color.b, (color.a as f32 * opacity.clamp(0.0, 1.0)) as u8)
}

fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.chars().count() + 1 + word.chars().count() > max_chars {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Opens the showcase window and runs until it is closed.
pub fn run(mut showcase: Showcase<ImageLoader>) -> anyhow::Result<()> {
    let (mut rl, thread) = raylib::init()
        .size(RENDER_WIDTH, RENDER_HEIGHT)
        .title("Game Showcase")
        .vsync()
        .resizable()
        .build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    // Uploaded textures, per slide
    let mut textures: HashMap<usize, Texture2D> = HashMap::new();

    while !rl.window_should_close() {
        let dt = Duration::from_secs_f32(rl.get_frame_time());
        let sw = rl.get_screen_width() as f32;
        let sh = rl.get_screen_height() as f32;

        // --- Input ---
        if rl.is_mouse_button_pressed(MouseButton::MOUSE_BUTTON_LEFT) {
            let mouse = rl.get_mouse_position();
            let (x, y) = (mouse.x / sw, mouse.y / sh);
            let count = showcase.slide_count();
            if let Some(index) = thumbnail_at(count, THUMBNAIL_STRIP_HEIGHT, x, y) {
                if let Err(e) = showcase.select(index) {
                    tracing::warn!("click ignored: {e}");
                }
            }
        }

        // --- Update ---
        for event in showcase.update(dt) {
            tracing::debug!(?event, "showcase");
        }
        if let Some(content) = showcase.display().content() {
            if !textures.contains_key(&content.slide) {
                match rl.load_texture_from_image(&thread, &content.asset) {
                    Ok(texture) => {
                        textures.insert(content.slide, texture);
                    }
                    Err(e) => {
                        tracing::warn!(slide = content.slide, "failed to create texture: {e}")
                    }
                }
            }
        }

        // --- Draw ---
        let mut d = rl.begin_drawing(&thread);
        d.clear_background(Color::BLACK);
        draw_main_display(&mut d, &showcase, &textures, sw, sh);
        draw_thumbnails(&mut d, &showcase, sw, sh);
    }

    showcase.teardown();
    Ok(())
}

fn draw_main_display(
    d: &mut RaylibDrawHandle,
    showcase: &Showcase<ImageLoader>,
    textures: &HashMap<usize, Texture2D>,
    sw: f32,
    sh: f32,
) {
    let display = showcase.display();
    let Some(content) = display.content() else {
        return;
    };
    let opacity = display.opacity();
    let layout = showcase.layout();

    if let Some(texture) = textures.get(&content.slide) {
        // Fit inside the image region, keeping the aspect ratio
        let area = to_pixels(&layout.image, sw, sh);
        let tex_width = texture.width() as f32;
        let tex_height = texture.height() as f32;
        let scale = (area.width / tex_width).min(area.height / tex_height);
        let (w, h) = (tex_width * scale, tex_height * scale);
        d.draw_texture_pro(
            texture,
            Rectangle::new(0.0, 0.0, tex_width, tex_height),
            Rectangle::new(
                area.x + (area.width - w) * 0.5,
                area.y + (area.height - h) * 0.5,
                w,
                h,
            ),
            Vector2::new(0.0, 0.0),
            0.0,
            faded(Color::WHITE, opacity),
        );
    }

    let title = to_pixels(&layout.title, sw, sh);
    let title_size = (title.height * 0.6).max(12.0) as i32;
    let (tx, ty) = (title.x as i32, title.y as i32);
    d.draw_text(&content.title, tx, ty, title_size, faded(Color::WHITE, opacity));

    let description = to_pixels(&layout.description, sw, sh);
    let font_size = (sh * 0.03).max(10.0) as i32;
    let max_chars = (description.width / (font_size as f32 * 0.55)).max(8.0) as usize;
    let line_height = font_size + font_size / 3;
    for (i, line) in wrap_words(&content.description, max_chars).iter().enumerate() {
        let y = description.y as i32 + i as i32 * line_height;
        if y + line_height > (description.y + description.height) as i32 {
            break;
        }
        d.draw_text(line, description.x as i32, y, font_size, faded(Color::LIGHTGRAY, opacity));
    }
}

fn draw_thumbnails(d: &mut RaylibDrawHandle, showcase: &Showcase<ImageLoader>, sw: f32, sh: f32) {
    let count = showcase.slide_count();
    for (i, (slide, indicator)) in showcase.slides().iter().zip(showcase.indicators()).enumerate() {
        let cell = to_pixels(&thumbnail_region(i, count, THUMBNAIL_STRIP_HEIGHT), sw, sh);
        let inner = Rectangle::new(cell.x + 4.0, cell.y + 4.0, cell.width - 8.0, cell.height - 8.0);

        d.draw_rectangle_rec(inner, Color::new(55, 65, 81, 255));
        if indicator.active {
            d.draw_rectangle_lines_ex(inner, 2.0, Color::ORANGE);
        }
        let font_size = (inner.height * 0.22).max(10.0) as i32;
        d.draw_text(&slide.title, inner.x as i32 + 8, inner.y as i32 + 8, font_size, Color::WHITE);

        // Progress bar along the bottom edge
        let bar_width = inner.width * indicator.progress;
        let bar = Rectangle::new(inner.x, inner.y + inner.height - 4.0, bar_width, 4.0);
        d.draw_rectangle_rec(bar, Color::ORANGE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(wrap_words("un deux trois quatre", 9), vec!["un deux", "trois", "quatre"]);
        assert!(wrap_words("   ", 10).is_empty());
    }

    #[test]
    fn fading_scales_alpha() {
        assert_eq!(faded(Color::WHITE, 0.5).a, 127);
        assert_eq!(faded(Color::WHITE, 2.0).a, 255);
    }
}
