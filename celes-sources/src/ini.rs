//! Minimal INI reader for the emulator achievement dialects.
//!
//! The dialects only need sections, `key=value` pairs, `;`/`#` comments,
//! and optionally quoted values. Section and key lookups are
//! case-insensitive, matching how the emulators themselves read these
//! files back.

use celes_core::ScrapError;

#[derive(Debug, Clone, Default)]
pub struct IniDocument {
    sections: Vec<IniSection>,
}

#[derive(Debug, Clone)]
pub struct IniSection {
    pub name: String,
    pub entries: Vec<(String, String)>,
}

impl IniSection {
    /// Case-insensitive key lookup.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

impl IniDocument {
    pub fn parse(text: &str) -> Result<IniDocument, ScrapError> {
        let mut sections: Vec<IniSection> = Vec::new();
        let mut current: Option<IniSection> = None;

        for (line_no, raw_line) in text.lines().enumerate() {
            let line = raw_line.trim_start_matches('\u{feff}').trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }

            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                if let Some(section) = current.take() {
                    sections.push(section);
                }
                current = Some(IniSection {
                    name: name.trim().to_string(),
                    entries: Vec::new(),
                });
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(ScrapError::parse(format!(
                    "malformed INI line {}: '{}'",
                    line_no + 1,
                    line
                )));
            };
            let Some(section) = current.as_mut() else {
                return Err(ScrapError::parse(format!(
                    "INI entry before any section at line {}",
                    line_no + 1
                )));
            };
            section.entries.push((
                key.trim().to_string(),
                unquote(value.trim()).to_string(),
            ));
        }

        if let Some(section) = current.take() {
            sections.push(section);
        }
        Ok(IniDocument { sections })
    }

    pub fn sections(&self) -> &[IniSection] {
        &self.sections
    }

    /// Case-insensitive section lookup.
    pub fn section(&self, name: &str) -> Option<&IniSection> {
        self.sections
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(name))
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.section(name).is_some()
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sections_and_entries() {
        let doc = IniDocument::parse(
            "; unlock log\n[ACH_WIN_ONE_GAME]\nAchieved=1\nUnlockTime=1600000000\n\n[Steam]\nAppId=220\n",
        )
        .unwrap();
        assert_eq!(doc.sections().len(), 2);
        let section = doc.section("ach_win_one_game").unwrap();
        assert_eq!(section.get("achieved"), Some("1"));
        assert_eq!(section.get("UnlockTime"), Some("1600000000"));
        assert!(doc.has_section("STEAM"));
    }

    #[test]
    fn strips_quotes_and_whitespace() {
        let doc = IniDocument::parse("[A]\nName = \"quoted value\"\n").unwrap();
        assert_eq!(doc.section("A").unwrap().get("Name"), Some("quoted value"));
    }

    #[test]
    fn rejects_lines_without_separator() {
        let err = IniDocument::parse("[A]\nnot a pair\n").unwrap_err();
        assert!(err.to_string().contains("malformed INI line 2"));
    }

    #[test]
    fn rejects_entries_before_a_section() {
        assert!(IniDocument::parse("orphan=1\n").is_err());
    }
}
