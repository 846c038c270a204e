// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Name-based type matchers.

use regex::Regex;
use smelt_config::MatcherConfig;
use smelt_core::{SmeltError, TypeDescriptor};

/// A predicate over type descriptors, composed from name tests.
#[derive(Debug, Clone)]
pub enum ElementMatcher {
    Any,
    None,
    Named(String),
    NameStartsWith(String),
    NameEndsWith(String),
    NameContains(String),
    NameMatches(Regex),
    InPackage(String),
    And(Vec<ElementMatcher>),
    Or(Vec<ElementMatcher>),
    Not(Box<ElementMatcher>),
}

impl ElementMatcher {
    pub fn any() -> Self {
        ElementMatcher::Any
    }

    pub fn none() -> Self {
        ElementMatcher::None
    }

    pub fn named(name: impl Into<String>) -> Self {
        ElementMatcher::Named(name.into())
    }

    pub fn name_starts_with(prefix: impl Into<String>) -> Self {
        ElementMatcher::NameStartsWith(prefix.into())
    }

    pub fn name_ends_with(suffix: impl Into<String>) -> Self {
        ElementMatcher::NameEndsWith(suffix.into())
    }

    pub fn name_contains(infix: impl Into<String>) -> Self {
        ElementMatcher::NameContains(infix.into())
    }

    pub fn name_matches(pattern: &str) -> Result<Self, SmeltError> {
        Regex::new(pattern)
            .map(ElementMatcher::NameMatches)
            .map_err(|e| SmeltError::Config(format!("invalid name pattern `{pattern}`: {e}")))
    }

    /// Types declared directly in `package` (not in sub-packages).
    pub fn in_package(package: impl Into<String>) -> Self {
        ElementMatcher::InPackage(package.into())
    }

    pub fn and(self, other: ElementMatcher) -> Self {
        match self {
            ElementMatcher::And(mut members) => {
                members.push(other);
                ElementMatcher::And(members)
            }
            matcher => ElementMatcher::And(vec![matcher, other]),
        }
    }

    pub fn or(self, other: ElementMatcher) -> Self {
        match self {
            ElementMatcher::Or(mut members) => {
                members.push(other);
                ElementMatcher::Or(members)
            }
            matcher => ElementMatcher::Or(vec![matcher, other]),
        }
    }

    pub fn not(self) -> Self {
        ElementMatcher::Not(Box::new(self))
    }

    pub fn matches(&self, target: &TypeDescriptor) -> bool {
        let name = target.name();
        match self {
            ElementMatcher::Any => true,
            ElementMatcher::None => false,
            ElementMatcher::Named(expected) => name == expected,
            ElementMatcher::NameStartsWith(prefix) => name.starts_with(prefix.as_str()),
            ElementMatcher::NameEndsWith(suffix) => name.ends_with(suffix.as_str()),
            ElementMatcher::NameContains(infix) => name.contains(infix.as_str()),
            ElementMatcher::NameMatches(regex) => regex.is_match(name),
            ElementMatcher::InPackage(package) => target.package().unwrap_or("") == package,
            ElementMatcher::And(members) => members.iter().all(|m| m.matches(target)),
            ElementMatcher::Or(members) => members.iter().any(|m| m.matches(target)),
            ElementMatcher::Not(inner) => !inner.matches(target),
        }
    }

    /// Builds a matcher from its configuration form.
    pub fn from_config(config: &MatcherConfig) -> Result<Self, SmeltError> {
        let matcher = match config {
            MatcherConfig::Any => ElementMatcher::Any,
            MatcherConfig::None => ElementMatcher::None,
            MatcherConfig::Named(name) => ElementMatcher::named(name.as_str()),
            MatcherConfig::NameStartsWith(prefix) => ElementMatcher::name_starts_with(prefix.as_str()),
            MatcherConfig::NameEndsWith(suffix) => ElementMatcher::name_ends_with(suffix.as_str()),
            MatcherConfig::NameContains(infix) => ElementMatcher::name_contains(infix.as_str()),
            MatcherConfig::NameMatches(pattern) => ElementMatcher::name_matches(pattern)?,
            MatcherConfig::InPackage(package) => ElementMatcher::in_package(package.as_str()),
            MatcherConfig::And(members) => ElementMatcher::And(
                members
                    .iter()
                    .map(ElementMatcher::from_config)
                    .collect::<Result<_, _>>()?,
            ),
            MatcherConfig::Or(members) => ElementMatcher::Or(
                members
                    .iter()
                    .map(ElementMatcher::from_config)
                    .collect::<Result<_, _>>()?,
            ),
            MatcherConfig::Not(inner) => ElementMatcher::from_config(inner)?.not(),
        };
        Ok(matcher)
    }
}
