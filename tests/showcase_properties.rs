use std::collections::HashSet;
use std::task::Poll;
use std::time::Duration;

use proptest::prelude::*;

use showcase::asset::AssetLoader;
use showcase::{DisplayLayout, Showcase, ShowcaseError, ShowcaseEvent, Slide, Timing};

/// Assets are the URL itself; URLs in `broken` never load.
#[derive(Default)]
struct UrlLoader {
    broken: HashSet<String>,
}

impl AssetLoader for UrlLoader {
    type Asset = String;

    fn poll_load(&mut self, url: &str) -> Poll<Result<String, ShowcaseError>> {
        if self.broken.contains(url) {
            Poll::Ready(Err(ShowcaseError::asset(url, "404")))
        } else {
            Poll::Ready(Ok(url.to_string()))
        }
    }
}

fn slides(n: usize) -> Vec<Slide> {
    (0..n)
        .map(|i| {
            Slide::new(i, format!("img/{i}.jpg"), format!("Title {i}"), format!("Description {i}"))
        })
        .collect()
}

fn started(n: usize, loader: UrlLoader) -> Showcase<UrlLoader> {
    let mut showcase = Showcase::new(loader, Timing::default());
    showcase.initialize(slides(n), Some(DisplayLayout::default())).unwrap();
    showcase
}

/// Every field of the visible content comes from the same slide.
fn assert_consistent(showcase: &Showcase<UrlLoader>) {
    if let Some(content) = showcase.display().content() {
        let i = content.slide;
        assert_eq!(content.asset, format!("img/{i}.jpg"));
        assert_eq!(content.title, format!("Title {i}"));
        assert_eq!(content.description, format!("Description {i}"));
    }
}

type Snapshot = (usize, Option<Duration>, Option<usize>, Option<usize>);

/// What an out-of-range select must leave untouched.
fn snapshot(showcase: &Showcase<UrlLoader>) -> Snapshot {
    (
        showcase.active_index(),
        showcase.time_to_advance(),
        showcase.rendering(),
        showcase.pending_render(),
    )
}

#[derive(Debug, Clone)]
enum Step {
    Frame(u64),
    Click(usize),
}

fn step() -> impl Strategy<Value = Step> {
    prop_oneof![
        4 => (1u64..800).prop_map(Step::Frame),
        1 => (0usize..8).prop_map(Step::Click),
    ]
}

#[test]
fn four_slides_five_advances_lands_on_one() {
    let mut showcase = started(4, UrlLoader::default());
    for _ in 0..5 {
        showcase.advance();
    }
    assert_eq!(showcase.active_index(), 1);
}

#[test]
fn failed_preload_keeps_whole_previous_slide() {
    let mut loader = UrlLoader::default();
    loader.broken.insert("img/1.jpg".into());
    let mut showcase = started(3, loader);

    showcase.select(1).unwrap();
    for _ in 0..60 {
        showcase.update(Duration::from_millis(16));
        assert_consistent(&showcase);
        assert_eq!(showcase.display().shown_slide(), Some(0));
        assert_eq!(showcase.display().opacity(), 1.0);
    }
}

#[test]
fn select_gives_a_full_period_after_partial_wait() {
    let mut showcase = started(3, UrlLoader::default());
    showcase.update(Duration::from_millis(4990));
    showcase.select(0).unwrap();

    let mut elapsed = Duration::ZERO;
    loop {
        let events = showcase.update(Duration::from_millis(10));
        elapsed += Duration::from_millis(10);
        if events.iter().any(|e| matches!(e, ShowcaseEvent::Advanced(_))) {
            break;
        }
    }
    assert_eq!(elapsed, Timing::default().rotation);
}

proptest! {
    #[test]
    fn initialize_activates_only_slide_zero(n in 1usize..12) {
        let showcase = started(n, UrlLoader::default());
        prop_assert_eq!(showcase.active_index(), 0);
        let active: Vec<usize> = showcase
            .indicators()
            .iter()
            .enumerate()
            .filter(|(_, ind)| ind.active)
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(active, vec![0]);
    }

    #[test]
    fn advance_wraps_modulo_slide_count(n in 1usize..10, steps in 0usize..40) {
        let mut showcase = started(n, UrlLoader::default());
        let mut expected = 0;
        for _ in 0..steps {
            expected = (expected + 1) % n;
            prop_assert_eq!(showcase.advance(), Some(expected));
        }
        prop_assert_eq!(showcase.active_index(), steps % n);
    }

    #[test]
    fn invalid_select_is_inert(n in 1usize..6, extra in 0usize..100, warmup in 0u64..4999) {
        let mut showcase = started(n, UrlLoader::default());
        showcase.update(Duration::from_millis(warmup));
        let before = snapshot(&showcase);

        let index = n + extra;
        let expected = Err(ShowcaseError::InvalidSelection { index, count: n });
        prop_assert_eq!(showcase.select(index), expected);
        prop_assert_eq!(before, snapshot(&showcase));
        let events = showcase.update(Duration::ZERO);
        prop_assert!(events.iter().all(|e| !matches!(e, ShowcaseEvent::Selected(_))));
    }

    #[test]
    fn rapid_selects_leave_exactly_one_timer(
        n in 1usize..8,
        picks in prop::collection::vec(0usize..8, 1..30),
    ) {
        let mut showcase = started(n, UrlLoader::default());
        for pick in picks {
            let _ = showcase.select(pick % n);
        }
        prop_assert_eq!(showcase.timers().live_count(), 1);
        prop_assert_eq!(showcase.time_to_advance(), Some(Timing::default().rotation));
    }

    #[test]
    fn display_is_never_mixed(n in 2usize..6, steps in prop::collection::vec(step(), 1..120)) {
        let mut showcase = started(n, UrlLoader::default());
        for step in steps {
            match step {
                Step::Frame(ms) => {
                    showcase.update(Duration::from_millis(ms));
                }
                Step::Click(i) => {
                    let _ = showcase.select(i);
                }
            }
            assert_consistent(&showcase);
            let opacity = showcase.display().opacity();
            prop_assert!((0.0..=1.0).contains(&opacity));
            prop_assert!(showcase.active_index() < n);
            prop_assert!(showcase.indicators().iter().filter(|i| i.active).count() == 1);
            prop_assert!(showcase.indicators().iter().filter(|i| i.progress > 0.0).count() <= 1);
        }
    }
}
