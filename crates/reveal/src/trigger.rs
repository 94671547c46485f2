//! Scroll thresholds and the triggers that fire on crossing them.
//!
//! A [`Threshold`] pairs a point on the element with a line in the viewport,
//! written like `"top bottom-=150px"`: the trigger point is reached when the
//! element's top meets a line 150px above the viewport's bottom edge.
//! A trigger's [`End`] may instead be a distance past its start, written
//! `"+=1184px"`, as used by pinned sections.

use crate::error::RevealError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Top,
    Center,
    Bottom,
}

impl Anchor {
    /// Position along an extent of `size`.
    pub fn offset_in(self, size: f64) -> f64 {
        match self {
            Anchor::Top => 0.0,
            Anchor::Center => size / 2.0,
            Anchor::Bottom => size,
        }
    }
}

impl FromStr for Anchor {
    type Err = RevealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "top" => Ok(Anchor::Top),
            "center" => Ok(Anchor::Center),
            "bottom" => Ok(Anchor::Bottom),
            other => Err(RevealError::UnknownAnchor(other.to_owned())),
        }
    }
}

/// Where a trigger starts or ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Threshold {
    pub element: Anchor,
    pub viewport: Anchor,
    /// Shift of the viewport line, px; positive moves it down.
    pub offset_px: f64,
}

impl Threshold {
    pub fn new(element: Anchor, viewport: Anchor, offset_px: f64) -> Self {
        Self {
            element,
            viewport,
            offset_px,
        }
    }

    /// Scroll position at which this threshold is met.
    pub fn scroll_position(
        &self,
        viewport_height: f64,
        element_top: f64,
        element_height: f64,
    ) -> f64 {
        element_top + self.element.offset_in(element_height)
            - self.viewport.offset_in(viewport_height)
            - self.offset_px
    }
}

impl Default for Threshold {
    /// `"top bottom"`: the element's top enters the viewport.
    fn default() -> Self {
        Self::new(Anchor::Top, Anchor::Bottom, 0.0)
    }
}

/// Splits `"bottom+=200px"` into the anchor and a signed offset.
fn anchor_with_offset(token: &str) -> Result<(Anchor, f64), RevealError> {
    let Some(pos) = token.find(['+', '-']) else {
        return Ok((token.parse()?, 0.0));
    };
    let (name, rest) = token.split_at(pos);
    let (sign, amount) = if let Some(amount) = rest.strip_prefix("+=") {
        (1.0, amount)
    } else if let Some(amount) = rest.strip_prefix("-=") {
        (-1.0, amount)
    } else {
        return Err(RevealError::BadOffset(token.to_owned()));
    };
    let amount = amount.strip_suffix("px").unwrap_or(amount);
    let px: f64 = amount
        .parse()
        .map_err(|_| RevealError::BadOffset(token.to_owned()))?;
    if !px.is_finite() {
        return Err(RevealError::BadOffset(token.to_owned()));
    }
    Ok((name.parse()?, sign * px))
}

impl FromStr for Threshold {
    type Err = RevealError;

    /// Accepts offsets on either side: an element offset moves the
    /// trigger point down the element, a viewport offset moves the line.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split_whitespace().collect();
        let [element, viewport] = parts.as_slice() else {
            return Err(RevealError::MalformedThreshold(s.to_owned()));
        };
        let (element, element_px) = anchor_with_offset(element)?;
        let (viewport, viewport_px) = anchor_with_offset(viewport)?;
        Ok(Self::new(element, viewport, viewport_px - element_px))
    }
}

/// Where a trigger's range ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum End {
    At(Threshold),
    /// Fixed scroll distance past the start, px.
    After(f64),
}

impl End {
    /// Scroll position of the end, given the resolved `start`.
    pub fn scroll_position(
        &self,
        start: f64,
        viewport_height: f64,
        element_top: f64,
        element_height: f64,
    ) -> f64 {
        match self {
            End::At(threshold) => {
                threshold.scroll_position(viewport_height, element_top, element_height)
            }
            End::After(px) => start + px,
        }
    }
}

impl From<Threshold> for End {
    fn from(threshold: Threshold) -> Self {
        End::At(threshold)
    }
}

impl FromStr for End {
    type Err = RevealError;

    /// `"+=<px>"` (the `px` suffix is optional) or a [`Threshold`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let Some(amount) = s.strip_prefix("+=") else {
            return Ok(End::At(s.parse()?));
        };
        let amount = amount.strip_suffix("px").unwrap_or(amount);
        match amount.parse::<f64>() {
            Ok(px) if px.is_finite() && px >= 0.0 => Ok(End::After(px)),
            _ => Err(RevealError::BadOffset(s.to_owned())),
        }
    }
}

/// What a trigger asks its timeline to do.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Play,
    Pause,
    Resume,
    Reverse,
    Restart,
    Reset,
    Complete,
    #[default]
    None,
}

impl FromStr for Action {
    type Err = RevealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "play" => Action::Play,
            "pause" => Action::Pause,
            "resume" => Action::Resume,
            "reverse" => Action::Reverse,
            "restart" => Action::Restart,
            "reset" => Action::Reset,
            "complete" => Action::Complete,
            "none" => Action::None,
            other => return Err(RevealError::UnknownAction(other.to_owned())),
        })
    }
}

/// Actions for the four crossings, in the order they are written:
/// `"<enter> <leave> <enter_back> <leave_back>"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToggleActions {
    pub on_enter: Action,
    pub on_leave: Action,
    pub on_enter_back: Action,
    pub on_leave_back: Action,
}

impl FromStr for ToggleActions {
    type Err = RevealError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let actions = s
            .split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<Action>, _>>()?;
        let [on_enter, on_leave, on_enter_back, on_leave_back] = actions.as_slice() else {
            return Err(RevealError::ToggleArity(actions.len()));
        };
        Ok(Self {
            on_enter: *on_enter,
            on_leave: *on_leave,
            on_enter_back: *on_enter_back,
            on_leave_back: *on_leave_back,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TriggerPolicy {
    /// Plays once on the first entry, then never fires again.
    Once,
    Toggle(ToggleActions),
    /// Timeline follows scroll progress; the value is the catch-up time in
    /// seconds (0 = locked to the scrollbar).
    Scrub(f64),
}

/// Where the scroll position sits relative to the trigger range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Before,
    Active,
    After,
}

#[derive(Debug, Clone)]
pub struct ScrollTrigger {
    pub start: Threshold,
    pub end: End,
    pub policy: TriggerPolicy,
    zone: Option<Zone>,
    progress: f64,
    spent: bool,
}

impl ScrollTrigger {
    pub fn new(start: Threshold, end: impl Into<End>, policy: TriggerPolicy) -> Self {
        Self {
            start,
            end: end.into(),
            policy,
            zone: None,
            progress: 0.0,
            spent: false,
        }
    }

    /// Parses a `start` threshold and an `end` threshold or `"+=<px>"`.
    pub fn parse(start: &str, end: &str, policy: TriggerPolicy) -> Result<Self, RevealError> {
        Ok(Self::new(start.parse()?, end.parse::<End>()?, policy))
    }

    /// Linear progress through the range, in [0, 1].
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn zone(&self) -> Option<Zone> {
        self.zone
    }

    /// Feeds a new scroll position. Returns an action only when a crossing
    /// happened and the policy maps it to something other than
    /// [`Action::None`]. The first update counts as arriving from above the
    /// range, so a page loaded mid-way still plays its entry.
    pub fn update(
        &mut self,
        scroll_y: f64,
        viewport_height: f64,
        element_top: f64,
        element_height: f64,
    ) -> Option<Action> {
        let start = self.start.scroll_position(viewport_height, element_top, element_height);
        let end = self
            .end
            .scroll_position(start, viewport_height, element_top, element_height);
        let span = end - start;
        self.progress = if span > 0.0 {
            ((scroll_y - start) / span).clamp(0.0, 1.0)
        } else if scroll_y >= start {
            1.0
        } else {
            0.0
        };

        let zone = if scroll_y < start {
            Zone::Before
        } else if scroll_y < end {
            Zone::Active
        } else {
            Zone::After
        };
        let previous = self.zone.replace(zone).unwrap_or(Zone::Before);
        if previous == zone {
            return None;
        }

        match self.policy {
            TriggerPolicy::Scrub(_) => None,
            TriggerPolicy::Once => {
                if self.spent || zone == Zone::Before {
                    return None;
                }
                self.spent = true;
                Some(Action::Play)
            }
            TriggerPolicy::Toggle(actions) => {
                // on a jump over the whole range, the later crossing wins
                // unless it has nothing to do
                let (first, second) = match (previous, zone) {
                    (Zone::Before, Zone::Active) => (actions.on_enter, Action::None),
                    (Zone::Active, Zone::After) => (actions.on_leave, Action::None),
                    (Zone::After, Zone::Active) => (actions.on_enter_back, Action::None),
                    (Zone::Active, Zone::Before) => (actions.on_leave_back, Action::None),
                    (Zone::Before, Zone::After) => (actions.on_enter, actions.on_leave),
                    (Zone::After, Zone::Before) => (actions.on_enter_back, actions.on_leave_back),
                    _ => (Action::None, Action::None),
                };
                [second, first].into_iter().find(|a| *a != Action::None)
            }
        }
    }
}
