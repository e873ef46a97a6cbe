// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! Pull request reference extraction from commit messages
//!
//! Hosting services leave different traces in history depending on the merge
//! strategy. [`classify`] tries each known family in priority order and
//! returns the first one that fires:
//!
//! 1. `Merge pull request #12 from owner/branch` (merge commit)
//! 2. `Merge PR #12` (squash tooling)
//! 3. `Subject line (#12)` (squash-merge UIs append the number to the subject)
//! 4. `PR #12` / `pull request #12` anywhere in the text (cherry-picks, reverts)

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static MERGE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"Merge pull request #(\d+) from (\S+)").expect("valid merge marker regex")
});

static SQUASH_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Merge PR #(\d+)").expect("valid squash marker regex"));

static TRAILING_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(#(\d+)\)\s*$").expect("valid trailing ref regex"));

static INLINE_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:PR|pull request) #(\d+)").expect("valid inline ref regex"));

/// Result of classifying a commit message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PrReference {
    /// No known pattern matched
    NoMatch,
    /// `Merge pull request #<n> from <ref>`
    MergeMarker {
        /// Pull request number
        number: u64,
        /// Source branch named after `from`
        branch: String,
    },
    /// `Merge PR #<n>`
    SquashMarker {
        /// Pull request number
        number: u64,
    },
    /// `(#<n>)` at the end of the subject line
    TrailingRef {
        /// Pull request number
        number: u64,
    },
    /// One or more `PR #<n>` / `pull request #<n>` mentions
    InlineRefs(Vec<u64>),
}

impl PrReference {
    /// All PR numbers carried by this classification, in match order
    #[must_use]
    pub fn numbers(&self) -> Vec<u64> {
        match self {
            Self::NoMatch => Vec::new(),
            Self::MergeMarker { number, .. }
            | Self::SquashMarker { number }
            | Self::TrailingRef { number } => vec![*number],
            Self::InlineRefs(numbers) => numbers.clone(),
        }
    }

    /// Source branch name, only known for merge markers
    #[must_use]
    pub fn source_branch(&self) -> Option<&str> {
        match self {
            Self::MergeMarker { branch, .. } => Some(branch),
            _ => None,
        }
    }

    /// Whether any pattern matched
    #[must_use]
    pub fn is_match(&self) -> bool {
        !matches!(self, Self::NoMatch)
    }
}

/// Classify a commit message into a [`PrReference`]
///
/// Families are tried in fixed priority order and the first match wins, so a
/// generic mention inside a long message never masks a merge marker.
#[must_use]
pub fn classify(message: &str) -> PrReference {
    if let Some(caps) = MERGE_MARKER.captures(message)
        && let Some(number) = parse_number(&caps[1])
    {
        return PrReference::MergeMarker {
            number,
            branch: caps[2].to_string(),
        };
    }

    if let Some(number) = first_number(&SQUASH_MARKER, message) {
        return PrReference::SquashMarker { number };
    }

    let subject = message.lines().next().unwrap_or("");
    if let Some(number) = first_number(&TRAILING_REF, subject) {
        return PrReference::TrailingRef { number };
    }

    let mut numbers = Vec::new();
    for caps in INLINE_REF.captures_iter(message) {
        if let Some(number) = parse_number(&caps[1])
            && !numbers.contains(&number)
        {
            numbers.push(number);
        }
    }
    if numbers.is_empty() {
        PrReference::NoMatch
    } else {
        PrReference::InlineRefs(numbers)
    }
}

fn first_number(pattern: &Regex, text: &str) -> Option<u64> {
    pattern
        .captures(text)
        .and_then(|caps| parse_number(&caps[1]))
}

/// PR numbers are positive; zero and overflowing digits are ignored
fn parse_number(digits: &str) -> Option<u64> {
    digits.parse::<u64>().ok().filter(|n| *n > 0)
}
