// SPDX-FileCopyrightText: 2026 Smelt Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Plugin composition: the non-operational plugin, flattened compounds,
//! and matcher-driven closures.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use smelt_core::{Builder, ClassFileLocator, Plugin, PluginError, TypeDescriptor};

use crate::matcher::ElementMatcher;

/// A plugin that never matches and cannot be applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOp;

impl<B: Builder> Plugin<B> for NoOp {
    fn name(&self) -> &str {
        "no-op"
    }

    fn matches(&self, _target: &TypeDescriptor) -> bool {
        false
    }

    fn apply(
        &self,
        _builder: B,
        _target: &TypeDescriptor,
        _locator: &dyn ClassFileLocator,
    ) -> Result<B, PluginError> {
        Err(PluginError::NonOperational)
    }

    fn is_no_op(&self) -> bool {
        true
    }
}

/// An ordered composition of plugins.
///
/// Nested compounds are expanded in place and no-op members are dropped, so
/// `members()` never contains either.
pub struct Compound<B: Builder> {
    plugins: Vec<Arc<dyn Plugin<B>>>,
}

impl<B: Builder> Compound<B> {
    pub fn new<I>(plugins: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn Plugin<B>>>,
    {
        let mut flat = Vec::new();
        for plugin in plugins {
            flatten_into(&mut flat, plugin);
        }
        Self { plugins: flat }
    }

    pub fn plugins(&self) -> &[Arc<dyn Plugin<B>>] {
        &self.plugins
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    pub fn into_plugins(self) -> Vec<Arc<dyn Plugin<B>>> {
        self.plugins
    }
}

fn flatten_into<B: Builder>(flat: &mut Vec<Arc<dyn Plugin<B>>>, plugin: Arc<dyn Plugin<B>>) {
    if plugin.is_no_op() {
        return;
    }
    match plugin.members() {
        Some(members) => {
            for member in members {
                flatten_into(flat, Arc::clone(member));
            }
        }
        None => flat.push(plugin),
    }
}

impl<B: Builder> Clone for Compound<B> {
    fn clone(&self) -> Self {
        Self {
            plugins: self.plugins.clone(),
        }
    }
}

impl<B: Builder> fmt::Debug for Compound<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.plugins.iter().map(|p| p.name()))
            .finish()
    }
}

impl<B: Builder> Plugin<B> for Compound<B> {
    fn name(&self) -> &str {
        "compound"
    }

    fn matches(&self, target: &TypeDescriptor) -> bool {
        self.plugins.iter().any(|p| p.matches(target))
    }

    fn apply(
        &self,
        builder: B,
        target: &TypeDescriptor,
        locator: &dyn ClassFileLocator,
    ) -> Result<B, PluginError> {
        self.plugins
            .iter()
            .filter(|p| p.matches(target))
            .try_fold(builder, |acc, p| p.apply(acc, target, locator))
    }

    fn members(&self) -> Option<&[Arc<dyn Plugin<B>>]> {
        Some(&self.plugins)
    }
}

/// A plugin built from a matcher and an apply closure.
pub struct ForElementMatcher<B, F> {
    name: String,
    matcher: ElementMatcher,
    transform: F,
    _builder: PhantomData<fn(B) -> B>,
}

impl<B, F> ForElementMatcher<B, F>
where
    B: Builder,
    F: Fn(B, &TypeDescriptor) -> Result<B, PluginError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, matcher: ElementMatcher, transform: F) -> Self {
        Self {
            name: name.into(),
            matcher,
            transform,
            _builder: PhantomData,
        }
    }

    pub fn matcher(&self) -> &ElementMatcher {
        &self.matcher
    }
}

impl<B, F> Plugin<B> for ForElementMatcher<B, F>
where
    B: Builder,
    F: Fn(B, &TypeDescriptor) -> Result<B, PluginError> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn matches(&self, target: &TypeDescriptor) -> bool {
        self.matcher.matches(target)
    }

    fn apply(
        &self,
        builder: B,
        target: &TypeDescriptor,
        _locator: &dyn ClassFileLocator,
    ) -> Result<B, PluginError> {
        (self.transform)(builder, target)
    }
}
