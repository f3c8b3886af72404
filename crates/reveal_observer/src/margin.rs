//! Root margin parsing
//!
//! Accepts the CSS margin shorthand with one to four components, each a
//! pixel or percentage length (`"0px 0px -50px 0px"`, `"10%"`, `"0 20px"`).
//! A unitless number is only allowed for zero. Positive margins grow the
//! root rect, negative margins shrink it.

use std::fmt;
use std::str::FromStr;

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case},
    character::complete::{multispace0, multispace1},
    combinator::{all_consuming, opt},
    error::VerboseError,
    multi::separated_list1,
    number::complete::float,
    sequence::{delimited, pair},
    Finish, IResult,
};
use reveal_core::Rect;

use crate::error::{ObserverError, Result};

type ParseResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// A single margin component
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum MarginLength {
    /// Device-independent pixels
    Px(f32),
    /// Percentage of the root's width (left/right) or height (top/bottom)
    Pct(f32),
}

impl MarginLength {
    pub const ZERO: MarginLength = MarginLength::Px(0.0);

    /// Resolve to pixels against the given basis dimension
    pub fn resolve(self, basis: f32) -> f32 {
        match self {
            MarginLength::Px(px) => px,
            MarginLength::Pct(pct) => basis * pct / 100.0,
        }
    }
}

impl Default for MarginLength {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for MarginLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarginLength::Px(px) => write!(f, "{}px", px),
            MarginLength::Pct(pct) => write!(f, "{}%", pct),
        }
    }
}

/// Margin applied to the root rect before intersection tests
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RootMargin {
    pub top: MarginLength,
    pub right: MarginLength,
    pub bottom: MarginLength,
    pub left: MarginLength,
}

impl RootMargin {
    pub const ZERO: RootMargin = RootMargin {
        top: MarginLength::ZERO,
        right: MarginLength::ZERO,
        bottom: MarginLength::ZERO,
        left: MarginLength::ZERO,
    };

    /// Margin with only the bottom edge set, in pixels
    pub fn bottom_px(px: f32) -> Self {
        Self {
            bottom: MarginLength::Px(px),
            ..Self::ZERO
        }
    }

    pub fn parse(text: &str) -> Result<Self> {
        let components = match all_consuming(margin_list)(text).finish() {
            Ok((_, components)) => components,
            Err(_) => {
                return Err(invalid(text, "expected 1-4 lengths in px or %"));
            }
        };

        let mut lengths = Vec::with_capacity(components.len());
        for (value, unit) in components {
            if !value.is_finite() {
                return Err(invalid(text, "lengths must be finite"));
            }
            let length = match unit {
                Some("%") => MarginLength::Pct(value),
                Some(_) => MarginLength::Px(value),
                None if value == 0.0 => MarginLength::ZERO,
                None => return Err(invalid(text, "non-zero lengths need a px or % unit")),
            };
            lengths.push(length);
        }

        let margin = match lengths.as_slice() {
            [all] => Self {
                top: *all,
                right: *all,
                bottom: *all,
                left: *all,
            },
            [vertical, horizontal] => Self {
                top: *vertical,
                right: *horizontal,
                bottom: *vertical,
                left: *horizontal,
            },
            [top, horizontal, bottom] => Self {
                top: *top,
                right: *horizontal,
                bottom: *bottom,
                left: *horizontal,
            },
            [top, right, bottom, left] => Self {
                top: *top,
                right: *right,
                bottom: *bottom,
                left: *left,
            },
            _ => return Err(invalid(text, "expected at most 4 lengths")),
        };

        Ok(margin)
    }

    /// Apply this margin to a root rect
    pub fn apply(&self, root: Rect) -> Rect {
        let top = self.top.resolve(root.height());
        let right = self.right.resolve(root.width());
        let bottom = self.bottom.resolve(root.height());
        let left = self.left.resolve(root.width());
        root.inset(-top, -right, -bottom, -left)
    }
}

impl FromStr for RootMargin {
    type Err = ObserverError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for RootMargin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} {}", self.top, self.right, self.bottom, self.left)
    }
}

fn invalid(text: &str, message: &str) -> ObserverError {
    ObserverError::InvalidRootMargin {
        margin: text.to_string(),
        message: message.to_string(),
    }
}

/// Parse a number with an optional px/% suffix
fn margin_length(input: &str) -> ParseResult<(f32, Option<&str>)> {
    pair(float, opt(alt((tag_no_case("px"), tag("%")))))(input)
}

fn margin_list(input: &str) -> ParseResult<Vec<(f32, Option<&str>)>> {
    delimited(
        multispace0,
        separated_list1(multispace1, margin_length),
        multispace0,
    )(input)
}
