//! Item selection from command-line terms.
//!
//! Each term is either `field:value` (case-insensitive substring match on
//! that field) or a bare word matched against artist, album artist, album
//! and title. All terms must match. Boolean fields (`comp`, `singleton`)
//! accept `true`/`false`, `yes`/`no` and `1`/`0`.

use super::{Item, LibraryItem};

const BARE_TERM_FIELDS: &[&str] = &["artist", "albumartist", "album", "title"];

#[derive(Debug, Clone, PartialEq, Eq)]
enum Term {
    Field { field: String, value: String },
    Flag { field: String, value: bool },
    Any(String),
}

/// A conjunction of match terms. The empty query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    terms: Vec<Term>,
}

impl Query {
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Self {
        let terms = args
            .iter()
            .map(|arg| arg.as_ref().trim())
            .filter(|arg| !arg.is_empty())
            .map(parse_term)
            .collect();
        Self { terms }
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, item: &Item) -> bool {
        self.terms.iter().all(|term| match term {
            Term::Field { field, value } => item
                .field(field)
                .is_some_and(|v| v.to_lowercase().contains(value)),
            Term::Flag { field, value } => {
                let actual = match field.as_str() {
                    "comp" => item.is_compilation(),
                    _ => item.is_singleton(),
                };
                actual == *value
            }
            Term::Any(value) => BARE_TERM_FIELDS.iter().any(|field| {
                item.field(field)
                    .is_some_and(|v| v.to_lowercase().contains(value))
            }),
        })
    }
}

fn parse_term(arg: &str) -> Term {
    let Some((field, value)) = arg.split_once(':') else {
        return Term::Any(arg.to_lowercase());
    };

    let field = field.trim().to_lowercase();
    let value = value.trim().to_lowercase();

    if (field == "comp" || field == "singleton")
        && let Some(flag) = parse_flag(&value)
    {
        return Term::Flag { field, value: flag };
    }

    if field.is_empty() {
        return Term::Any(value);
    }
    Term::Field { field, value }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}
