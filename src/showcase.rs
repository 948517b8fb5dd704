use std::mem;
use std::task::Poll;
use std::time::Duration;

use crate::asset::AssetLoader;
use crate::constants::*;
use crate::error::{Result, ShowcaseError};
use crate::slide::{DisplayLayout, Indicator, Slide};
use crate::timer::{TimerHandle, TimerQueue};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    pub rotation: Duration,
    pub fade_out: Duration,
    pub swap_delay: Duration,
    pub fade_in: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            rotation: ROTATION_PERIOD,
            fade_out: FADE_OUT_DURATION,
            swap_delay: SWAP_DELAY,
            fade_in: FADE_IN_DURATION,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShowcaseState {
    Idle,
    Displaying(usize),
    Stopped,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ShowcaseEvent {
    Advanced(usize),
    Selected(usize),
    ContentSwapped(usize),
    TransitionFinished(usize),
    AssetFailed { slide: usize, error: ShowcaseError },
}

/// Everything the main display shows for one slide. Always replaced whole.
#[derive(Debug, Clone, PartialEq)]
pub struct Content<A> {
    pub slide: usize,
    pub asset: A,
    pub title: String,
    pub description: String,
}

/// The image, title and description regions. They share one opacity.
#[derive(Debug)]
pub struct MainDisplay<A> {
    content: Option<Content<A>>,
    opacity: f32,
}

impl<A> MainDisplay<A> {
    fn new() -> Self {
        Self { content: None, opacity: 0.0 }
    }

    pub fn content(&self) -> Option<&Content<A>> {
        self.content.as_ref()
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub fn shown_slide(&self) -> Option<usize> {
        self.content.as_ref().map(|c| c.slide)
    }
}

enum RenderPhase<A> {
    Idle,
    Preloading { slide: usize, fade: bool },
    FadingOut { slide: usize, asset: A, from: f32, elapsed: Duration },
    Swapping { slide: usize, elapsed: Duration },
    FadingIn { slide: usize, elapsed: Duration },
}

impl<A> RenderPhase<A> {
    fn name(&self) -> &'static str {
        match self {
            RenderPhase::Idle => "idle",
            RenderPhase::Preloading { .. } => "preloading",
            RenderPhase::FadingOut { .. } => "fading-out",
            RenderPhase::Swapping { .. } => "swapping",
            RenderPhase::FadingIn { .. } => "fading-in",
        }
    }

    fn slide(&self) -> Option<usize> {
        match self {
            RenderPhase::Idle => None,
            RenderPhase::Preloading { slide, .. }
            | RenderPhase::FadingOut { slide, .. }
            | RenderPhase::Swapping { slide, .. }
            | RenderPhase::FadingIn { slide, .. } => Some(*slide),
        }
    }
}

/// Auto-rotating game showcase.
///
/// Frame driven: the frontend calls [`Showcase::update`] once per frame with
/// the frame delta and forwards thumbnail clicks to [`Showcase::select`]
/// between frames. Renders requested while a crossfade is in flight are
/// coalesced into a single pending slot (latest request wins) and start as
/// soon as the current transition completes or aborts.
pub struct Showcase<L: AssetLoader> {
    loader: L,
    timing: Timing,
    state: ShowcaseState,

    slides: Vec<Slide>,
    layout: DisplayLayout,
    indicators: Vec<Indicator>,
    active_index: usize,

    timers: TimerQueue,
    timer: Option<TimerHandle>,

    display: MainDisplay<L::Asset>,
    phase: RenderPhase<L::Asset>,
    pending: Option<usize>,

    events: Vec<ShowcaseEvent>,
}

impl<L: AssetLoader> Showcase<L> {
    pub fn new(loader: L, timing: Timing) -> Self {
        Self {
            loader,
            timing,
            state: ShowcaseState::Idle,
            slides: Vec::new(),
            layout: DisplayLayout::default(),
            indicators: Vec::new(),
            active_index: 0,
            timers: TimerQueue::new(),
            timer: None,
            display: MainDisplay::new(),
            phase: RenderPhase::Idle,
            pending: None,
            events: Vec::new(),
        }
    }

    /// Shows the first slide without a fade and starts auto-rotation.
    ///
    /// On error the showcase stays idle; nothing else on the page is affected.
    pub fn initialize(&mut self, slides: Vec<Slide>, layout: Option<DisplayLayout>) -> Result<()> {
        if self.state != ShowcaseState::Idle {
            return Err(ShowcaseError::config("showcase is already initialized"));
        }
        if slides.is_empty() {
            tracing::warn!("showcase not started: no slides");
            return Err(ShowcaseError::config("no slides to show"));
        }
        let Some(layout) = layout else {
            tracing::warn!("showcase not started: main display is missing");
            return Err(ShowcaseError::config("main display surface is missing"));
        };

        self.slides = slides
            .into_iter()
            .enumerate()
            .map(|(id, slide)| Slide { id, ..slide })
            .collect();
        self.layout = layout;
        self.indicators = vec![Indicator::default(); self.slides.len()];
        self.activate(0);
        self.state = ShowcaseState::Displaying(0);

        self.phase = RenderPhase::Preloading { slide: 0, fade: false };
        self.step_render(Duration::ZERO);
        self.arm_timer();

        tracing::info!(
            slides = self.slides.len(),
            period_ms = self.timing.rotation.as_millis() as u64,
            "showcase initialized"
        );
        Ok(())
    }

    /// Moves to the next slide, wrapping around. Normally driven by the timer.
    pub fn advance(&mut self) -> Option<usize> {
        if !self.is_running() {
            return None;
        }
        let next = (self.active_index + 1) % self.slides.len();
        tracing::debug!(from = self.active_index, to = next, "auto advance");
        self.activate(next);
        self.request_render(next);
        self.events.push(ShowcaseEvent::Advanced(next));
        Some(next)
    }

    /// Jumps to `index` and gives it a full rotation period.
    pub fn select(&mut self, index: usize) -> Result<()> {
        let count = self.slides.len();
        if !self.is_running() || index >= count {
            tracing::debug!(index, count, "selection rejected");
            return Err(ShowcaseError::InvalidSelection { index, count });
        }
        tracing::debug!(from = self.active_index, to = index, "manual selection");
        self.activate(index);
        self.request_render(index);
        self.arm_timer();
        self.events.push(ShowcaseEvent::Selected(index));
        Ok(())
    }

    /// Steps timers and the crossfade by `dt`, returning what happened since
    /// the previous call.
    pub fn update(&mut self, dt: Duration) -> Vec<ShowcaseEvent> {
        if self.is_running() {
            for handle in self.timers.advance(dt) {
                if self.timer == Some(handle) {
                    self.advance();
                }
            }
            self.step_render(dt);
            self.refresh_progress();
        }
        mem::take(&mut self.events)
    }

    /// Cancels auto-rotation. The showcase ignores every later call.
    pub fn teardown(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.timers.cancel(handle);
        }
        self.phase = RenderPhase::Idle;
        self.pending = None;
        self.state = ShowcaseState::Stopped;
        tracing::debug!("showcase torn down");
    }

    // --- Accessors ---

    pub fn state(&self) -> ShowcaseState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, ShowcaseState::Displaying(_))
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn layout(&self) -> &DisplayLayout {
        &self.layout
    }

    pub fn timing(&self) -> &Timing {
        &self.timing
    }

    pub fn indicators(&self) -> &[Indicator] {
        &self.indicators
    }

    pub fn display(&self) -> &MainDisplay<L::Asset> {
        &self.display
    }

    pub fn timers(&self) -> &TimerQueue {
        &self.timers
    }

    /// Time until the next automatic advance.
    pub fn time_to_advance(&self) -> Option<Duration> {
        self.timer.and_then(|h| self.timers.remaining(h))
    }

    /// Slide currently being preloaded or crossfaded in.
    pub fn rendering(&self) -> Option<usize> {
        self.phase.slide()
    }

    pub fn render_phase(&self) -> &'static str {
        self.phase.name()
    }

    pub fn pending_render(&self) -> Option<usize> {
        self.pending
    }

    pub fn loader_mut(&mut self) -> &mut L {
        &mut self.loader
    }

    // --- Internals ---

    fn activate(&mut self, index: usize) {
        for indicator in self.indicators.iter_mut() {
            indicator.active = false;
            indicator.progress = 0.0;
        }
        self.indicators[index].active = true;
        self.active_index = index;
        self.state = ShowcaseState::Displaying(index);
    }

    fn arm_timer(&mut self) {
        if let Some(handle) = self.timer.take() {
            self.timers.cancel(handle);
        }
        self.timer = Some(self.timers.schedule_repeating(self.timing.rotation));
    }

    fn refresh_progress(&mut self) {
        let Some(remaining) = self.time_to_advance() else {
            return;
        };
        let period = self.timing.rotation.as_secs_f32().max(f32::EPSILON);
        let progress = (1.0 - remaining.as_secs_f32() / period).clamp(0.0, 1.0);
        self.indicators[self.active_index].progress = progress;
    }

    fn request_render(&mut self, slide: usize) {
        if matches!(self.phase, RenderPhase::Idle) {
            self.phase = RenderPhase::Preloading { slide, fade: true };
        } else if let Some(dropped) = self.pending.replace(slide) {
            tracing::debug!(dropped, slide, "pending render replaced");
        }
    }

    fn swap_content(&mut self, slide: usize, asset: L::Asset) {
        let s = &self.slides[slide];
        self.display.content = Some(Content {
            slide,
            asset,
            title: s.title.clone(),
            description: s.description.clone(),
        });
        self.events.push(ShowcaseEvent::ContentSwapped(slide));
    }

    fn finish_transition(&mut self, slide: usize) {
        self.display.opacity = 1.0;
        self.events.push(ShowcaseEvent::TransitionFinished(slide));
    }

    /// Runs the render phase machine for `dt`. Time left over when a phase
    /// ends carries into the next one.
    fn step_render(&mut self, mut dt: Duration) {
        loop {
            match mem::replace(&mut self.phase, RenderPhase::Idle) {
                RenderPhase::Idle => {
                    match self.pending.take() {
                        Some(slide) => self.phase = RenderPhase::Preloading { slide, fade: true },
                        None => break,
                    }
                }
                RenderPhase::Preloading { slide, fade } => {
                    match self.loader.poll_load(&self.slides[slide].image_url) {
                        Poll::Pending => {
                            self.phase = RenderPhase::Preloading { slide, fade };
                            break;
                        }
                        Poll::Ready(Err(error)) => {
                            tracing::warn!(slide, %error, "asset failed, keeping current slide");
                            self.events.push(ShowcaseEvent::AssetFailed { slide, error });
                        }
                        Poll::Ready(Ok(asset)) => {
                            if fade {
                                let from = self.display.opacity;
                                let elapsed = Duration::ZERO;
                                self.phase = RenderPhase::FadingOut { slide, asset, from, elapsed };
                            } else {
                                self.swap_content(slide, asset);
                                self.finish_transition(slide);
                            }
                        }
                    }
                }
                RenderPhase::FadingOut { slide, asset, from, elapsed } => {
                    let total = self.timing.fade_out;
                    let t = elapsed + dt;
                    if t < total {
                        self.display.opacity = from * (1.0 - t.as_secs_f32() / total.as_secs_f32());
                        self.phase = RenderPhase::FadingOut { slide, asset, from, elapsed: t };
                        break;
                    }
                    dt = t - total;
                    self.display.opacity = 0.0;
                    self.swap_content(slide, asset);
                    self.phase = RenderPhase::Swapping { slide, elapsed: Duration::ZERO };
                }
                RenderPhase::Swapping { slide, elapsed } => {
                    let t = elapsed + dt;
                    if t < self.timing.swap_delay {
                        self.phase = RenderPhase::Swapping { slide, elapsed: t };
                        break;
                    }
                    dt = t - self.timing.swap_delay;
                    self.phase = RenderPhase::FadingIn { slide, elapsed: Duration::ZERO };
                }
                RenderPhase::FadingIn { slide, elapsed } => {
                    let total = self.timing.fade_in;
                    let t = elapsed + dt;
                    if t < total {
                        self.display.opacity = t.as_secs_f32() / total.as_secs_f32();
                        self.phase = RenderPhase::FadingIn { slide, elapsed: t };
                        break;
                    }
                    dt = t - total;
                    self.finish_transition(slide);
                }
            }
        }
    }
}
