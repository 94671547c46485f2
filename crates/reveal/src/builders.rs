//! Ready-made timelines for the page's reveal effects.
//!
//! Targets are opaque ids; the host maps them back to elements.

use crate::ease::Ease;
use crate::timeline::{Property, Timeline, Tween};
use sakura_fx_core::Xorshift64;
use serde::{Deserialize, Serialize};

/// Leaves in a leaf-blow reveal.
pub const LEAF_COUNT: usize = 80;
/// Gap between consecutive leaves, seconds.
const LEAF_STAGGER: f64 = 0.03;
/// Extra distance past the text the leaves travel, px.
const LEAF_OVERSHOOT_PX: f64 = 400.0;
/// Distance grid cells slide in from, px.
const GRID_SLIDE_PX: f64 = 300.0;

/// Letters flip up from lying flat (rotationX 90) to standing, one after
/// another.
pub fn letter_stand_up(letters: &[u64], stagger: f64) -> Timeline {
    let mut tl = Timeline::new();
    for &letter in letters {
        tl.add(Tween::set(letter, Property::RotationX, 90.0));
    }
    let template = Tween::new(0, Property::RotationX, 90.0, 0.0)
        .lasting(0.6)
        .eased(Ease::Power2Out);
    tl.stagger(letters, template, stagger);
    tl
}

/// Leaves blow across a line of text, uncovering its characters.
///
/// Each leaf starts hidden near the left edge with a random pose, fades in,
/// flies right by roughly `text_width + 400` px while drifting and spinning,
/// and fades out before it lands. Characters fade and slide in from the
/// left starting half a second in.
pub fn leaf_blow(leaves: &[u64], chars: &[u64], text_width: f64, rng: &mut Xorshift64) -> Timeline {
    let mut tl = Timeline::new();
    let travel = text_width.max(0.0) + LEAF_OVERSHOOT_PX;

    for (i, &leaf) in leaves.iter().enumerate() {
        let t0 = i as f64 * LEAF_STAGGER;
        let x0 = rng.next_range(-100.0, 100.0);
        let y0 = rng.next_range(-40.0, 40.0);
        let r0 = rng.next_range(0.0, 360.0);
        let dx = rng.next_range(travel * 0.8, travel * 1.2);
        let dy = rng.next_range(-150.0, 150.0);
        let spin = rng.next_range(360.0, 720.0);

        tl.add(Tween::set(leaf, Property::Opacity, 0.0));
        tl.add(Tween::set(leaf, Property::X, x0));
        tl.add(Tween::set(leaf, Property::Y, y0));
        tl.add(Tween::set(leaf, Property::Rotation, r0));

        tl.add(
            Tween::new(leaf, Property::Opacity, 0.0, 1.0)
                .at(t0)
                .lasting(0.3)
                .eased(Ease::Power2In),
        );
        let blow_at = t0 + 0.1;
        for (property, from, by) in [
            (Property::X, x0, dx),
            (Property::Y, y0, dy),
            (Property::Rotation, r0, spin),
        ] {
            tl.add(
                Tween::new(leaf, property, from, from + by)
                    .at(blow_at)
                    .lasting(2.0)
                    .eased(Ease::Power2Out),
            );
        }
        tl.add(
            Tween::new(leaf, Property::Opacity, 1.0, 0.0)
                .at(t0 + 1.5)
                .lasting(0.5)
                .eased(Ease::Power2Out),
        );
    }

    for &c in chars {
        tl.add(Tween::set(c, Property::Opacity, 0.0));
        tl.add(Tween::set(c, Property::X, -20.0));
    }
    let fade = Tween::new(0, Property::Opacity, 0.0, 1.0)
        .at(0.5)
        .lasting(0.5)
        .eased(Ease::Power2Out);
    tl.stagger(chars, fade, 0.05);
    tl.stagger(chars, Tween { property: Property::X, from: -20.0, to: 0.0, ..fade }, 0.05);
    tl
}

/// Side a grid cell slides in from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideFrom {
    Left,
    Right,
    Top,
    Bottom,
}

impl SlideFrom {
    fn start(self) -> (Property, f64) {
        match self {
            SlideFrom::Left => (Property::X, -GRID_SLIDE_PX),
            SlideFrom::Right => (Property::X, GRID_SLIDE_PX),
            SlideFrom::Top => (Property::Y, -GRID_SLIDE_PX),
            SlideFrom::Bottom => (Property::Y, GRID_SLIDE_PX),
        }
    }
}

/// Grid cells slide home from off to one side, 0.2 s apart.
pub fn grid_slide(cells: &[(u64, SlideFrom)]) -> Timeline {
    let mut tl = Timeline::new();
    for &(cell, from) in cells {
        let (property, offset) = from.start();
        tl.add(Tween::set(cell, property, offset));
    }
    for (i, &(cell, from)) in cells.iter().enumerate() {
        let (property, offset) = from.start();
        tl.add(
            Tween::new(cell, property, offset, 0.0)
                .at(i as f64 * 0.2)
                .lasting(1.0)
                .eased(Ease::Power2Out),
        );
    }
    tl
}
