#![deny(unsafe_code)]
//! Scroll-gated reveal animations.
//!
//! A [`Reveal`] couples a [`ScrollTrigger`] with a [`Timeline`]: the host
//! feeds scroll positions and frame time, then asks for the current property
//! values through a [`PropertySink`]. The [`builders`] module has the page's
//! stock timelines; [`Carousel`] and [`ReadySignal`] cover the project strip
//! and layout readiness.

pub mod builders;
pub mod carousel;
pub mod ease;
pub mod error;
pub mod ready;
pub mod timeline;
pub mod trigger;

pub use builders::{grid_slide, leaf_blow, letter_stand_up, SlideFrom, LEAF_COUNT};
pub use carousel::{CardPose, Carousel, CarouselFrame};
pub use ease::Ease;
pub use error::RevealError;
pub use ready::ReadySignal;
pub use timeline::{Property, PropertySink, Timeline, Tween};
pub use trigger::{
    Action, Anchor, End, ScrollTrigger, Threshold, ToggleActions, TriggerPolicy, Zone,
};

#[derive(Debug, Clone)]
pub struct Reveal {
    trigger: ScrollTrigger,
    timeline: Timeline,
    /// Playhead position a scrubbed timeline is catching up to.
    scrub_target: f64,
}

impl Reveal {
    pub fn new(trigger: ScrollTrigger, timeline: Timeline) -> Self {
        Self {
            trigger,
            timeline,
            scrub_target: 0.0,
        }
    }

    pub fn trigger(&self) -> &ScrollTrigger {
        &self.trigger
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Feeds a scroll position; returns the action applied to the timeline,
    /// if any.
    pub fn on_scroll(
        &mut self,
        scroll_y: f64,
        viewport_height: f64,
        element_top: f64,
        element_height: f64,
    ) -> Option<Action> {
        let action = self
            .trigger
            .update(scroll_y, viewport_height, element_top, element_height);
        if let Some(action) = action {
            self.timeline.apply(action);
        }
        if let TriggerPolicy::Scrub(lag) = self.trigger.policy {
            self.scrub_target = self.trigger.progress() * self.timeline.duration();
            if lag <= 0.0 {
                self.timeline.seek(self.scrub_target);
            }
        }
        action
    }

    /// Moves the playhead by `dt` seconds. A scrubbed timeline instead eases
    /// toward the scroll position, covering the gap in about `lag` seconds.
    pub fn advance(&mut self, dt: f64) {
        match self.trigger.policy {
            TriggerPolicy::Scrub(lag) if lag > 0.0 => {
                let now = self.timeline.time();
                let k = (dt / lag).clamp(0.0, 1.0);
                self.timeline.seek(now + (self.scrub_target - now) * k);
            }
            TriggerPolicy::Scrub(_) => {}
            _ => self.timeline.advance(dt),
        }
    }

    pub fn apply(&self, sink: &mut dyn PropertySink) {
        self.timeline.render(sink);
    }
}
