//! Typed path expressions used by mapping rules.
//!
//! A path is a `/`-separated list of steps, parsed once into [`Step`]s:
//!
//! ```text
//! Facilities/Facility/FloorAreas/FloorArea[FloorAreaType="Gross"]/FloorAreaValue
//! └─Literal─┘ └Literal┘ └Literal─┘ └──────────Predicated──────────┘ └──Literal───┘
//! ```
//!
//! Prefixes (`auc:Facility`) are accepted and dropped; matching is by local
//! name. `.` steps are ignored so relative paths may be written `./Foo`.
//! `*` matches any child element but can never be materialized.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ParsingError;
use crate::xml::local_name;

/// One step of a [`Path`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    /// Child element with this local name.
    Literal(String),
    /// Child element with this local name whose `child` element has text `expected`.
    Predicated {
        tag: String,
        child: String,
        expected: String,
    },
    /// Any child element.
    Any,
}

impl Step {
    /// The tag this step matches, `None` for [`Step::Any`].
    pub fn tag(&self) -> Option<&str> {
        match self {
            Step::Literal(tag) | Step::Predicated { tag, .. } => Some(tag),
            Step::Any => None,
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Literal(tag) => write!(f, "{tag}"),
            Step::Predicated {
                tag,
                child,
                expected,
            } => write!(f, "{tag}[{child}=\"{expected}\"]"),
            Step::Any => write!(f, "*"),
        }
    }
}

/// A parsed path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Path {
    steps: Vec<Step>,
}

impl Path {
    /// Parse a path expression.
    pub fn parse(input: &str) -> Result<Self, ParsingError> {
        let mut steps = Vec::new();
        for raw in split_steps(input)? {
            let raw = raw.trim();
            if raw.is_empty() || raw == "." {
                continue;
            }
            steps.push(parse_step(input, raw)?);
        }
        Ok(Self { steps })
    }

    pub fn from_steps(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Concatenate `self` and `other`.
    pub fn join(&self, other: &Path) -> Path {
        let mut steps = self.steps.clone();
        steps.extend(other.steps.iter().cloned());
        Path { steps }
    }

    /// The steps from `index` onward.
    pub fn suffix(&self, index: usize) -> Path {
        Path {
            steps: self.steps.get(index..).map(<[Step]>::to_vec).unwrap_or_default(),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

impl TryFrom<String> for Path {
    type Error = ParsingError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Path::parse(&value)
    }
}

impl From<Path> for String {
    fn from(path: Path) -> Self {
        path.to_string()
    }
}

impl std::str::FromStr for Path {
    type Err = ParsingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Path::parse(s)
    }
}

/// Split on `/` outside of brackets and quotes.
fn split_steps(input: &str) -> Result<Vec<&str>, ParsingError> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in input.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') if depth > 0 => quote = Some(c),
            (None, '[') => depth += 1,
            (None, ']') => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| ParsingError::invalid_path(input, "unbalanced ']'"))?;
            }
            (None, '/') if depth == 0 => {
                parts.push(&input[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 || quote.is_some() {
        return Err(ParsingError::invalid_path(input, "unterminated predicate"));
    }
    parts.push(&input[start..]);
    Ok(parts)
}

fn parse_step(path: &str, raw: &str) -> Result<Step, ParsingError> {
    if raw == "*" {
        return Ok(Step::Any);
    }
    if raw.starts_with('@') {
        return Err(ParsingError::invalid_path(
            path,
            "attributes are selected with the rule's value mode, not the path",
        ));
    }

    let Some(open) = raw.find('[') else {
        return Ok(Step::Literal(checked_tag(path, raw)?));
    };
    let tag = checked_tag(path, &raw[..open])?;
    let predicate = raw[open + 1..]
        .strip_suffix(']')
        .ok_or_else(|| ParsingError::invalid_path(path, format!("malformed step '{raw}'")))?;
    let (child, expected) = predicate
        .split_once('=')
        .ok_or_else(|| ParsingError::invalid_path(path, format!("predicate without '=' in '{raw}'")))?;
    let expected = expected.trim();
    let unquoted = expected
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .or_else(|| expected.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')))
        .ok_or_else(|| ParsingError::invalid_path(path, format!("predicate value must be quoted in '{raw}'")))?;

    Ok(Step::Predicated {
        tag,
        child: checked_tag(path, child.trim())?,
        expected: unquoted.to_string(),
    })
}

fn checked_tag(path: &str, raw: &str) -> Result<String, ParsingError> {
    let tag = local_name(raw.trim());
    let valid = !tag.is_empty()
        && tag
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if !valid {
        return Err(ParsingError::invalid_path(path, format!("invalid tag '{raw}'")));
    }
    Ok(tag.to_string())
}
