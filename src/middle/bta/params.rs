//! 静态参数列表
//!
//! 有序、无重复的参数名序列，既是生成器的形参表，也是插值点的来源。

use indexmap::IndexSet;
use std::fmt;

/// Ordered, duplicate-free list of static parameter names
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticParams {
    names: IndexSet<String>,
}

impl StaticParams {
    /// Create an empty list
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a name; returns `false` if it was already present
    pub fn push(
        &mut self,
        name: impl Into<String>,
    ) -> bool {
        self.names.insert(name.into())
    }

    pub fn contains(
        &self,
        name: &str,
    ) -> bool {
        self.names.contains(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Parameters of `params` that are not static, in declaration order
    pub fn remaining<'p>(
        &self,
        params: &'p [String],
    ) -> Vec<&'p str> {
        params
            .iter()
            .filter(|p| !self.contains(p))
            .map(String::as_str)
            .collect()
    }
}

impl<S: Into<String>> FromIterator<S> for StaticParams {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut params = StaticParams::new();
        for name in iter {
            params.push(name);
        }
        params
    }
}

impl fmt::Display for StaticParams {
    /// Comma-separated, as it appears in the generator's parameter list
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        f.write_str(&joined.join(", "))
    }
}
