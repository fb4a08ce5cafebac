use crate::config::ConfigError;
use std::path::{Path, PathBuf};
use wiring_plans::TabList;
use wiring_plans::constants::TAB_PLACEHOLDER;

/// Glob for a tab's plan PDF. The tab name is escaped so brackets and
/// asterisks in it match literally.
pub fn plan_glob(dir: &Path, pattern: &str, tab: &str) -> String {
    let file_pattern = pattern.replace(TAB_PLACEHOLDER, &glob::Pattern::escape(tab));
    let dir = glob::Pattern::escape(&dir.to_string_lossy());
    format!("{}/{}", dir.trim_end_matches('/'), file_pattern)
}

pub fn find_plan_pdf(dir: &Path, pattern: &str, tab: &str) -> Result<PathBuf, ConfigError> {
    let full_pattern = plan_glob(dir, pattern, tab);
    let entries = glob::glob(&full_pattern).map_err(|e| ConfigError::BadPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut matches = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) => matches.push(path),
            Err(e) => log::warn!("Skipping unreadable path while searching for '{}': {}", tab, e),
        }
    }
    matches.sort();

    match matches.len() {
        0 => Err(ConfigError::NoPlanPdf {
            tab: tab.to_string(),
            pattern: pattern.replace(TAB_PLACEHOLDER, tab),
        }),
        1 => Ok(matches.remove(0)),
        _ => Err(ConfigError::AmbiguousPlanPdf {
            tab: tab.to_string(),
            matches,
        }),
    }
}

/// One plan PDF per tab, in tab order
pub fn discover_plan_pdfs(
    dir: &Path,
    pattern: &str,
    tabs: &TabList,
) -> Result<Vec<(String, PathBuf)>, ConfigError> {
    tabs.iter()
        .map(|tab| {
            let path = find_plan_pdf(dir, pattern, tab)?;
            log::info!(
                "Found PDF for '{}': {}",
                tab,
                path.file_name().unwrap_or_default().to_string_lossy()
            );
            Ok((tab.to_string(), path))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), b"").unwrap();
    }

    #[test]
    fn test_unique_match() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Job 12 - Lighting rev C.pdf");
        touch(dir.path(), "Job 12 - Power.pdf");

        let found = find_plan_pdf(dir.path(), "*{tab}*.pdf", "Lighting").unwrap();
        assert_eq!(found, dir.path().join("Job 12 - Lighting rev C.pdf"));
    }

    #[test]
    fn test_no_match() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Power.pdf");

        let err = find_plan_pdf(dir.path(), "*{tab}*.pdf", "Lighting").unwrap_err();
        assert!(matches!(err, ConfigError::NoPlanPdf { .. }));
        assert!(err.to_string().contains("*Lighting*.pdf"));
    }

    #[test]
    fn test_ambiguous_match_lists_files() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Lighting A.pdf");
        touch(dir.path(), "Lighting B.pdf");

        match find_plan_pdf(dir.path(), "{tab}*.pdf", "Lighting") {
            Err(ConfigError::AmbiguousPlanPdf { tab, matches }) => {
                assert_eq!(tab, "Lighting");
                assert_eq!(matches.len(), 2);
            }
            other => panic!("Expected AmbiguousPlanPdf, got {:?}", other),
        }
    }

    #[test]
    fn test_tab_name_is_matched_literally() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Plan [L].pdf");
        touch(dir.path(), "Plan L.pdf");

        let found = find_plan_pdf(dir.path(), "Plan {tab}.pdf", "[L]").unwrap();
        assert_eq!(found, dir.path().join("Plan [L].pdf"));
    }

    #[test]
    fn test_discover_in_tab_order() {
        let dir = TempDir::new().unwrap();
        touch(dir.path(), "Power.pdf");
        touch(dir.path(), "Data.pdf");
        let tabs = TabList::parse("Power\nData\n").unwrap();

        let found = discover_plan_pdfs(dir.path(), "{tab}.pdf", &tabs).unwrap();
        let names: Vec<&str> = found.iter().map(|(tab, _)| tab.as_str()).collect();
        assert_eq!(names, vec!["Power", "Data"]);
    }
}
