//! Node labels for a run.
//!
//! Turns the raw sequence of URLs an agent visited into the captions shown
//! on the hop tree. Repeat visits to a domain escalate through a fixed list
//! of actions.

use std::collections::HashMap;
use std::fmt;

pub const BLANK_PAGE_URL: &str = "about:blank";
pub const DATA_SCHEME: &str = "data:";
pub const ELLIPSIS: &str = "...";
pub const COMPLETE_LABEL: &str = "Complete";

const MAX_DOMAIN_CHARS: usize = 35;
const TRUNCATED_DOMAIN_CHARS: usize = 32;
const MAX_TASK_CHARS: usize = 25;
const MAX_CAPTION_CHARS: usize = 35;
const TRUNCATED_CAPTION_CHARS: usize = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActionLabel {
    Visited,
    Reading,
    Analyzing,
    FactChecking,
    Parsing,
    Finalizing,
}

impl ActionLabel {
    /// Label for the `index`-th visit (0-based) to a domain. Saturates at
    /// [`ActionLabel::Finalizing`].
    pub fn for_visit(index: usize) -> Self {
        match index {
            0 => Self::Visited,
            1 => Self::Reading,
            2 => Self::Analyzing,
            3 => Self::FactChecking,
            4 => Self::Parsing,
            _ => Self::Finalizing,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Visited => "Visited",
            Self::Reading => "Reading",
            Self::Analyzing => "Analyzing",
            Self::FactChecking => "Fact Checking",
            Self::Parsing => "Parsing",
            Self::Finalizing => "Finalizing",
        }
    }
}

impl fmt::Display for ActionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-domain visit counts for the current run.
#[derive(Clone, Debug, Default)]
pub struct VisitCounter {
    counts: HashMap<String, usize>,
}

impl VisitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a visit and return how many earlier visits the domain had.
    pub fn record(&mut self, domain: &str) -> usize {
        let count = self.counts.entry(domain.to_string()).or_insert(0);
        let previous = *count;
        *count += 1;
        previous
    }

    pub fn count(&self, domain: &str) -> usize {
        self.counts.get(domain).copied().unwrap_or(0)
    }

    pub fn domains(&self) -> usize {
        self.counts.len()
    }

    pub fn clear(&mut self) {
        self.counts.clear();
    }
}

/// Blank pages and inline data URLs never become nodes.
pub fn is_trackable(url: &str) -> bool {
    !url.is_empty() && url != BLANK_PAGE_URL && !url.starts_with(DATA_SCHEME)
}

/// Host part of `scheme://host/path`, or the whole string when it has fewer
/// than three `/`-separated segments.
pub fn domain_key(url: &str) -> &str {
    url.split('/').nth(2).unwrap_or(url)
}

pub fn display_domain(domain: &str) -> String {
    clip(domain, MAX_DOMAIN_CHARS, TRUNCATED_DOMAIN_CHARS)
}

/// Label of the first node of every run.
pub fn query_label(task: &str) -> String {
    format!("Query: {}", clip(task, MAX_TASK_CHARS, MAX_TASK_CHARS))
}

/// Caption painted under a node.
pub fn node_caption(label: &str) -> String {
    clip(label, MAX_CAPTION_CHARS, TRUNCATED_CAPTION_CHARS)
}

/// Label for a visit to `url`, counting it against its domain. `None` for
/// URLs that are not tracked; those leave the counter untouched.
pub fn visit_label(counter: &mut VisitCounter, url: &str) -> Option<String> {
    if !is_trackable(url) {
        return None;
    }
    let domain = domain_key(url);
    let action = ActionLabel::for_visit(counter.record(domain));
    Some(format!("{action}: {}", display_domain(domain)))
}

fn clip(text: &str, limit: usize, keep: usize) -> String {
    if text.chars().count() > limit {
        let mut clipped: String = text.chars().take(keep).collect();
        clipped.push_str(ELLIPSIS);
        clipped
    } else {
        text.to_string()
    }
}
