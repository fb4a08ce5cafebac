//! Ordered list of tabs (drawing disciplines)

use crate::types::*;
use std::path::Path;

/// Tabs in interleaving order. The number of tabs is the page count of every
/// room's plan block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabList {
    tabs: Vec<String>,
}

impl TabList {
    /// Parse one tab per line, trimming and skipping blank lines
    pub fn parse(text: &str) -> Result<Self> {
        let tabs: Vec<String> = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        if tabs.is_empty() {
            return Err(PlanError::Config("Tab list is empty".to_string()));
        }

        Ok(Self { tabs })
    }

    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = tokio::fs::read_to_string(path).await?;
        Self::parse(&text)
    }

    /// Number of tabs
    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tabs.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.tabs
    }
}

impl<'a> IntoIterator for &'a TabList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.tabs.iter()
    }
}
