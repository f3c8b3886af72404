//! Class selector parsing
//!
//! Only compound class selectors are supported (`.card`, `.animate-on-scroll.hero`).
//! An element matches when it carries every listed class.

use std::fmt;
use std::str::FromStr;

use nom::{
    bytes::complete::take_while1,
    character::complete::{char, multispace0},
    combinator::{all_consuming, cut},
    error::{context, VerboseError, VerboseErrorKind},
    multi::many1,
    sequence::{delimited, preceded},
    Finish, IResult,
};
use smallvec::SmallVec;

use crate::document::ClassList;
use crate::error::{CoreError, Result};

type ParseResult<'a, O> = IResult<&'a str, O, VerboseError<&'a str>>;

/// A parsed compound class selector
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Selector {
    classes: SmallVec<[String; 2]>,
}

impl Selector {
    /// Parse selector text such as `.animate-on-scroll`
    pub fn parse(text: &str) -> Result<Self> {
        match all_consuming(compound_selector)(text).finish() {
            Ok((_, classes)) => Ok(Self {
                classes: classes.into_iter().map(String::from).collect(),
            }),
            Err(err) => Err(selector_error(text, &err)),
        }
    }

    /// Selector matching a single class name
    pub fn class(name: impl Into<String>) -> Self {
        let mut classes = SmallVec::new();
        classes.push(name.into());
        Self { classes }
    }

    /// Class names this selector requires
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn matches(&self, class_list: &ClassList) -> bool {
        self.classes.iter().all(|class| class_list.contains(class))
    }
}

impl FromStr for Selector {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for class in &self.classes {
            write!(f, ".{}", class)?;
        }
        Ok(())
    }
}

/// Parse a class identifier (alphanumeric, hyphen, underscore)
fn identifier(input: &str) -> ParseResult<&str> {
    take_while1(|c: char| c.is_alphanumeric() || c == '-' || c == '_')(input)
}

/// Parse `.identifier`
fn class_selector(input: &str) -> ParseResult<&str> {
    context("class name", preceded(char('.'), cut(identifier)))(input)
}

fn compound_selector(input: &str) -> ParseResult<Vec<&str>> {
    delimited(multispace0, many1(class_selector), multispace0)(input)
}

fn selector_error(text: &str, err: &VerboseError<&str>) -> CoreError {
    let fragment = err.errors.first().map(|(frag, _)| *frag).unwrap_or(text);
    let column = text.len().saturating_sub(fragment.len()) + 1;

    let expected = err.errors.iter().rev().find_map(|(_, kind)| match kind {
        VerboseErrorKind::Context(ctx) => Some(*ctx),
        _ => None,
    });

    let message = match (fragment.chars().next(), expected) {
        (None, Some(ctx)) => format!("expected {} before end of input", ctx),
        (None, None) => "unexpected end of input".to_string(),
        (Some(c), Some(ctx)) => format!("unexpected {:?} while reading {}", c, ctx),
        (Some(c), None) => format!("unexpected {:?}", c),
    };

    CoreError::InvalidSelector {
        selector: text.to_string(),
        column,
        message,
    }
}
