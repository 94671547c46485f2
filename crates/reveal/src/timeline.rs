//! Tweens, timelines and the playhead that drives them.

use crate::ease::Ease;
use crate::trigger::Action;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Animatable property of a target element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Property {
    Opacity,
    /// Horizontal translation, px.
    X,
    /// Vertical translation, px.
    Y,
    /// Degrees.
    Rotation,
    /// Degrees around the horizontal axis.
    RotationX,
    /// Degrees around the vertical axis.
    RotationY,
    Scale,
}

/// Receives sampled property values.
pub trait PropertySink {
    fn set(&mut self, target: u64, property: Property, value: f64);
}

impl PropertySink for BTreeMap<(u64, Property), f64> {
    fn set(&mut self, target: u64, property: Property, value: f64) {
        self.insert((target, property), value);
    }
}

/// Interpolates one property of one target between `start` and
/// `start + duration` seconds on its timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    pub target: u64,
    pub property: Property,
    pub from: f64,
    pub to: f64,
    pub start: f64,
    pub duration: f64,
    pub ease: Ease,
}

impl Tween {
    pub fn new(target: u64, property: Property, from: f64, to: f64) -> Self {
        Self {
            target,
            property,
            from,
            to,
            start: 0.0,
            duration: 0.0,
            ease: Ease::Linear,
        }
    }

    /// An instant tween that pins `property` to `value` from `start` on.
    pub fn set(target: u64, property: Property, value: f64) -> Self {
        Self::new(target, property, value, value)
    }

    pub fn at(mut self, start: f64) -> Self {
        self.start = start;
        self
    }

    pub fn lasting(mut self, duration: f64) -> Self {
        self.duration = duration.max(0.0);
        self
    }

    pub fn eased(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn end(&self) -> f64 {
        self.start + self.duration
    }

    pub fn has_started(&self, time: f64) -> bool {
        time >= self.start
    }

    /// Value at `time`: `from` before the start, `to` after the end.
    pub fn value_at(&self, time: f64) -> f64 {
        let t = if self.duration <= 0.0 {
            if time >= self.start {
                1.0
            } else {
                0.0
            }
        } else {
            (time - self.start) / self.duration
        };
        let e = self.ease.apply(t);
        self.from + (self.to - self.from) * e
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Direction {
    #[default]
    Forward,
    Backward,
}

/// A set of tweens plus a playhead.
///
/// Sampling is a pure function of time, so playing backward retraces the
/// forward path exactly.
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    /// Kept sorted by start; ties stay in insertion order.
    tweens: Vec<Tween>,
    time: f64,
    direction: Direction,
    playing: bool,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, tween: Tween) -> &mut Self {
        let at = self.tweens.partition_point(|t| t.start <= tween.start);
        self.tweens.insert(at, tween);
        self
    }

    /// Adds `template` once per target, the i-th shifted by `i * each`.
    pub fn stagger(&mut self, targets: &[u64], template: Tween, each: f64) -> &mut Self {
        for (i, &target) in targets.iter().enumerate() {
            let tween = Tween {
                target,
                start: template.start + i as f64 * each,
                ..template
            };
            self.add(tween);
        }
        self
    }

    pub fn tweens(&self) -> &[Tween] {
        &self.tweens
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    /// End of the last tween, seconds.
    pub fn duration(&self) -> f64 {
        self.tweens.iter().map(Tween::end).fold(0.0, f64::max)
    }

    /// Writes every property that has a started tween at `time`. When
    /// several started tweens share a property, the latest one wins.
    pub fn sample(&self, time: f64, sink: &mut dyn PropertySink) {
        let mut values: BTreeMap<(u64, Property), f64> = BTreeMap::new();
        for tween in self.tweens.iter().take_while(|t| t.has_started(time)) {
            values.insert((tween.target, tween.property), tween.value_at(time));
        }
        for ((target, property), value) in values {
            sink.set(target, property, value);
        }
    }

    /// Samples at the playhead.
    pub fn render(&self, sink: &mut dyn PropertySink) {
        self.sample(self.time, sink);
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Playhead position in [0, 1]; an empty timeline reads as complete.
    pub fn progress(&self) -> f64 {
        let d = self.duration();
        if d <= 0.0 {
            1.0
        } else {
            self.time / d
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_reversed(&self) -> bool {
        self.direction == Direction::Backward
    }

    pub fn seek(&mut self, time: f64) {
        self.time = time.clamp(0.0, self.duration());
    }

    pub fn play(&mut self) {
        self.direction = Direction::Forward;
        self.playing = true;
    }

    pub fn reverse(&mut self) {
        self.direction = Direction::Backward;
        self.playing = true;
    }

    pub fn pause(&mut self) {
        self.playing = false;
    }

    /// Continues in whichever direction was last set.
    pub fn resume(&mut self) {
        self.playing = true;
    }

    /// Back to the start, paused.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.direction = Direction::Forward;
        self.playing = false;
    }

    pub fn restart(&mut self) {
        self.time = 0.0;
        self.play();
    }

    /// Jumps to the end, paused.
    pub fn complete(&mut self) {
        self.time = self.duration();
        self.direction = Direction::Forward;
        self.playing = false;
    }

    pub fn apply(&mut self, action: Action) {
        match action {
            Action::Play => self.play(),
            Action::Pause => self.pause(),
            Action::Resume => self.resume(),
            Action::Reverse => self.reverse(),
            Action::Restart => self.restart(),
            Action::Reset => self.reset(),
            Action::Complete => self.complete(),
            Action::None => {}
        }
    }

    /// Moves the playhead by `dt` seconds in the current direction. Stops at
    /// either end.
    pub fn advance(&mut self, dt: f64) {
        if !self.playing || !(dt > 0.0) {
            return;
        }
        let end = self.duration();
        match self.direction {
            Direction::Forward => {
                self.time = (self.time + dt).min(end);
                if self.time >= end {
                    self.playing = false;
                }
            }
            Direction::Backward => {
                self.time = (self.time - dt).max(0.0);
                if self.time <= 0.0 {
                    self.playing = false;
                }
            }
        }
    }
}
