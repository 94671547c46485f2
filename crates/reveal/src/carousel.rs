//! Horizontal project carousel driven by vertical scroll.
//!
//! While the section is pinned, scroll progress slides the card track left.
//! Cards near the middle of the viewport are full size and opaque; cards
//! further out shrink and dim. Fast scrolling tilts every card around its
//! vertical axis.

use crate::trigger::{Anchor, End, ScrollTrigger, Threshold, TriggerPolicy};
use serde::Serialize;

/// Tilt per unit of velocity, degrees.
const TILT_PER_VELOCITY: f64 = 50.0;
/// Tilt bound, degrees.
const MAX_TILT: f64 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CardPose {
    pub scale: f64,
    pub opacity: f64,
    /// Degrees.
    pub rotate_y: f64,
}

impl CardPose {
    pub const REST: CardPose = CardPose {
        scale: 1.0,
        opacity: 1.0,
        rotate_y: 0.0,
    };
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CarouselFrame {
    /// Track translation, px; 0 at the start, `-scroll_width` at the end.
    pub track_x: f64,
    pub cards: Vec<CardPose>,
}

#[derive(Debug, Clone)]
pub struct Carousel {
    /// Card centers along the untranslated track, px.
    card_centers: Vec<f64>,
    viewport_width: f64,
    scroll_width: f64,
    last_progress: f64,
}

impl Carousel {
    /// `track_width` is the full scrollable width of the card row.
    pub fn new(card_centers: Vec<f64>, track_width: f64, viewport_width: f64) -> Self {
        Self {
            card_centers,
            viewport_width,
            scroll_width: (track_width - viewport_width).max(0.0),
            last_progress: 0.0,
        }
    }

    /// Distance the track travels over the whole section, px.
    pub fn scroll_width(&self) -> f64 {
        self.scroll_width
    }

    /// Trigger that pins the section from `"top top"` for `scroll_width`
    /// px of scrolling; feed its progress to [`Carousel::update`].
    pub fn scroll_trigger(&self, lag: f64) -> ScrollTrigger {
        ScrollTrigger::new(
            Threshold::new(Anchor::Top, Anchor::Top, 0.0),
            End::After(self.scroll_width),
            TriggerPolicy::Scrub(lag),
        )
    }

    /// Pose for scroll `progress` in [0, 1]. Velocity is measured against
    /// the previous call.
    pub fn update(&mut self, progress: f64) -> CarouselFrame {
        let progress = progress.clamp(0.0, 1.0);
        let velocity = (progress - self.last_progress) * 100.0;
        self.last_progress = progress;

        let track_x = -self.scroll_width * progress;
        let half = self.viewport_width / 2.0;
        let rotate_y = (velocity * TILT_PER_VELOCITY).clamp(-MAX_TILT, MAX_TILT);
        let cards = self
            .card_centers
            .iter()
            .map(|&center| {
                let distance = (center + track_x - half).abs();
                let nd = if half > 0.0 { (distance / half).min(1.0) } else { 1.0 };
                CardPose {
                    scale: 1.0 - 0.3 * nd,
                    opacity: 1.0 - 0.5 * nd,
                    rotate_y,
                }
            })
            .collect();
        CarouselFrame { track_x, cards }
    }

    /// Poses once the section is left: every card back at rest.
    pub fn settle(&self) -> Vec<CardPose> {
        vec![CardPose::REST; self.card_centers.len()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn carousel() -> Carousel {
        // three 600px cards with 64px gaps, 128px padding each side
        Carousel::new(vec![428.0, 1_092.0, 1_756.0], 2_184.0, 1_000.0)
    }

    #[test]
    fn track_slides_by_scroll_width() {
        let mut c = carousel();
        assert_eq!(c.scroll_width(), 1_184.0);
        assert_eq!(c.update(0.0).track_x, 0.0);
        assert_eq!(c.update(0.5).track_x, -592.0);
        assert_eq!(c.update(1.0).track_x, -1_184.0);
    }

    #[test]
    fn pinned_trigger_drives_the_track() {
        let mut c = carousel();
        let mut trigger =
            ScrollTrigger::parse("top top", "+=1184", TriggerPolicy::Scrub(1.0)).unwrap();
        let built = c.scroll_trigger(1.0);
        assert_eq!(built.start, trigger.start);
        assert_eq!(built.end, trigger.end);

        // section top at 3000 in an 800px viewport
        let mut track_at = |scroll_y: f64| {
            trigger.update(scroll_y, 800.0, 3_000.0, 800.0);
            c.update(trigger.progress()).track_x
        };
        assert_eq!(track_at(2_500.0), 0.0);
        assert_eq!(track_at(3_592.0), -592.0);
        assert_eq!(track_at(4_184.0), -1_184.0);
        assert_eq!(track_at(6_000.0), -1_184.0);
    }

    #[test]
    fn centered_card_is_full_size() {
        let mut c = Carousel::new(vec![500.0, 1_500.0], 2_000.0, 1_000.0);
        let frame = c.update(0.0);
        assert_eq!(frame.cards[0].scale, 1.0);
        assert_eq!(frame.cards[0].opacity, 1.0);
        // one half-viewport away or more is the floor
        assert!((frame.cards[1].scale - 0.7).abs() < 1e-12);
        assert!((frame.cards[1].opacity - 0.5).abs() < 1e-12);
    }

    #[test]
    fn fast_scroll_tilts_within_bounds() {
        let mut c = carousel();
        c.update(0.0);
        let slow = c.update(0.001);
        assert!((slow.cards[0].rotate_y - 5.0).abs() < 1e-9);
        let fast = c.update(0.5);
        assert!(fast.cards.iter().all(|p| p.rotate_y == 20.0));
        let back = c.update(0.2);
        assert_eq!(back.cards[2].rotate_y, -20.0);
        let still = c.update(0.2);
        assert_eq!(still.cards[1].rotate_y, 0.0);
    }

    #[test]
    fn narrow_track_does_not_scroll() {
        let mut c = Carousel::new(vec![200.0], 400.0, 1_000.0);
        assert_eq!(c.scroll_width(), 0.0);
        assert_eq!(c.update(0.7).track_x, 0.0);
        assert_eq!(c.settle(), vec![CardPose::REST]);
    }
}
