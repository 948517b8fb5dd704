use std::time::Duration;

pub const RENDER_WIDTH: i32 = 1280;           // Width of the showcase window
pub const RENDER_HEIGHT: i32 = 720;           // Height of the showcase window
pub const FPS: u32 = 60;                      // Frames per second
pub const FRAME_TIME: f32 = 1.0 / FPS as f32; // Time per frame (seconds)

pub const ROTATION_PERIOD: Duration = Duration::from_millis(5000); // Between automatic advances
pub const FADE_OUT_DURATION: Duration = Duration::from_millis(300); // Old content fading out
pub const SWAP_DELAY: Duration = Duration::from_millis(50);         // Hold at opacity 0 after swap
pub const FADE_IN_DURATION: Duration = Duration::from_millis(400);  // New content fading in

pub const THUMBNAIL_STRIP_HEIGHT: f32 = 0.18; // Window fraction for thumbnails
pub const DEFAULT_CLICK_CHANCE: f64 = 0.0;    // Headless: simulated click odds per frame
