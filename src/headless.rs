use std::time::Duration;

use rand::distr::Bernoulli;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::asset::AssetLoader;
use crate::constants::*;
use crate::showcase::{Showcase, ShowcaseEvent};

#[derive(Debug, Clone, Copy)]
pub struct HeadlessOptions {
    pub seconds: f32,
    /// Probability, per frame, that a simulated visitor clicks a thumbnail.
    pub click_chance: f64,
    pub seed: Option<u64>,
}

impl Default for HeadlessOptions {
    fn default() -> Self {
        Self { seconds: 30.0, click_chance: DEFAULT_CLICK_CHANCE, seed: None }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: u64,
    pub advances: u32,
    pub selections: u32,
    pub swaps: u32,
    pub failed_assets: u32,
    /// Slides shown on the main display, in order.
    pub shown: Vec<usize>,
}

/// Steps the showcase at a fixed frame time, logging what a viewer would see.
///
/// Events queued before the run (the first slide swapped in by
/// `initialize`) are reported on the first frame.
pub fn run<L: AssetLoader>(showcase: &mut Showcase<L>, options: HeadlessOptions) -> RunSummary {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    // NaN survives the clamp and is rejected here.
    let clicks = Bernoulli::new(options.click_chance.clamp(0.0, 1.0))
        .inspect_err(|e| {
            tracing::warn!(chance = options.click_chance, "simulated clicks disabled: {e}")
        })
        .ok();
    let dt = Duration::from_secs_f32(FRAME_TIME);
    let total_frames = (options.seconds.max(0.0) / FRAME_TIME).round() as u64;

    let mut summary = RunSummary::default();

    for frame in 0..total_frames {
        // --- Input ---
        let clicked = clicks.is_some_and(|clicks| rng.sample(clicks));
        if showcase.slide_count() > 0 && clicked {
            let index = rng.random_range(0..showcase.slide_count());
            if let Err(e) = showcase.select(index) {
                tracing::warn!("simulated click ignored: {e}");
            }
        }

        // --- Update ---
        for event in showcase.update(dt) {
            let at = frame as f32 * FRAME_TIME;
            match event {
                ShowcaseEvent::Advanced(i) => {
                    summary.advances += 1;
                    tracing::info!(at, slide = i, "auto advance");
                }
                ShowcaseEvent::Selected(i) => {
                    summary.selections += 1;
                    tracing::info!(at, slide = i, "thumbnail clicked");
                }
                ShowcaseEvent::ContentSwapped(i) => {
                    summary.swaps += 1;
                    summary.shown.push(i);
                    let title =
                        showcase.display().content().map(|c| c.title.as_str()).unwrap_or_default();
                    tracing::info!(at, slide = i, title, "main display swapped");
                }
                ShowcaseEvent::TransitionFinished(i) => {
                    tracing::debug!(at, slide = i, "crossfade done");
                }
                ShowcaseEvent::AssetFailed { slide, error } => {
                    summary.failed_assets += 1;
                    tracing::warn!(at, slide, %error, "slide skipped");
                }
            }
        }
        summary.frames += 1;
    }

    summary
}
