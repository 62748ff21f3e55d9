//! Conventional commit message parsing.
//!
//! One raw message decomposes into a header block of change lines, an
//! optional title, and a footer block of `key: value` notes. Change lines
//! are annotated with severity and note group as they are parsed.

use std::collections::BTreeMap;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::classify::{group_of, severity_of, Group, Severity};
use crate::git::RawCommit;

/// Footer key that flags the whole commit as a breaking change
const BREAKING_KEY: &str = "BREAKING CHANGE";

/// Single-line messages excluded from all release content
const IGNORED_MESSAGES: [&str; 7] = ["minor", "fix", "fixes", "better", "ignore", "wip", "test"];

/// One `type[(scope)]: description` change parsed from a header block
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeLine {
    /// Type token, lowercased
    pub r#type: String,
    /// Scope, lowercased; `""` and `"*"` normalize to absent
    pub scope: Option<String>,
    pub description: String,
    /// Note group, absent when the line is suppressed from the notes
    pub group: Option<Group>,
    pub severity: Severity,
}

/// A commit with its message decomposed into change lines and footer notes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedCommit {
    pub id: String,
    pub author: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub date: String,
    /// Original message text
    pub raw: String,
    /// Change lines, in reverse of textual appearance
    pub headers: Vec<ChangeLine>,
    /// Footer notes; on duplicate keys the last occurrence wins
    pub notes: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Result of decomposing one message
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedMessage {
    pub headers: Vec<ChangeLine>,
    pub notes: BTreeMap<String, String>,
    pub title: Option<String>,
}

/// Splits raw commit messages into annotated change lines and footer notes
pub struct MessageParser {
    header_re: Regex,
}

impl MessageParser {
    pub fn new() -> Self {
        MessageParser {
            header_re: Regex::new(r"^(\w*!?)(?:\(([\w$.\-* ]*)\))?:\s?(.*)$")
                .expect("header regex is valid"),
        }
    }

    /// Parse a full raw commit record
    pub fn parse_commit(&self, raw: &RawCommit) -> ParsedCommit {
        let message = self.parse_message(&raw.message);

        ParsedCommit {
            id: raw.id.clone(),
            author: raw.author.clone(),
            email: raw.email.clone(),
            date: raw.date.clone(),
            raw: raw.message.clone(),
            headers: message.headers,
            notes: message.notes,
            title: message.title,
        }
    }

    /// Parse one raw multi-line message
    pub fn parse_message(&self, message: &str) -> ParsedMessage {
        let lines: Vec<&str> = message.trim().split('\n').collect();
        self.parse_lines(&lines)
    }

    fn parse_lines(&self, lines: &[&str]) -> ParsedMessage {
        // trivial commits carry no release content at all
        if lines.len() == 1 && IGNORED_MESSAGES.contains(&lines[0].to_lowercase().as_str()) {
            return ParsedMessage::default();
        }

        let header_end = lines.iter().position(|line| line.is_empty());
        let footer_start = header_end.and_then(|_| lines.iter().rposition(|line| line.is_empty()));

        let header_lines = match header_end {
            Some(end) => &lines[..end],
            None => lines,
        };
        let footer_lines: &[&str] = match footer_start {
            Some(start) => &lines[start + 1..],
            None => &[],
        };

        // A one-line header directly followed by a bulleted `type: ...`
        // list is a titled message: recurse on the list and keep the
        // first line as the title.
        if lines.len() > 2
            && header_end == Some(1)
            && (lines[2].starts_with('-') || lines[2].starts_with('*'))
            && lines[2].contains(':')
        {
            let mut inner = self.parse_lines(&lines[2..]);
            inner.title = Some(lines[0].to_string());
            return inner;
        }

        let mut notes = BTreeMap::new();
        let mut breaking = false;
        for line in footer_lines {
            let line = line.trim();
            let colon = match line.find(':') {
                Some(index) => index,
                None => continue,
            };
            let key = line[..colon].trim().to_string();
            let value = line[colon + 1..].trim().to_string();
            if key == BREAKING_KEY {
                breaking = true;
            }
            // duplicate keys: last occurrence wins, by policy
            notes.insert(key, value);
        }

        let mut headers: Vec<ChangeLine> = Vec::new();
        for raw_line in header_lines {
            let mut line = raw_line.trim();
            if line.starts_with('-') || line.starts_with('*') {
                line = line[1..].trim();
            }
            headers.push(self.parse_header_line(line, breaking));
        }
        // reversed before returning: the first textual line ends up last
        headers.reverse();

        if breaking {
            let commit_severity = headers
                .iter()
                .map(|header| header.severity)
                .max()
                .unwrap_or(Severity::None);
            if commit_severity != Severity::Major {
                if headers.is_empty() {
                    let description = header_lines
                        .first()
                        .map(|line| line.trim().to_string())
                        .unwrap_or_default();
                    headers.push(ChangeLine {
                        r#type: "feat".to_string(),
                        scope: None,
                        description,
                        group: group_of("feat"),
                        severity: Severity::Major,
                    });
                } else {
                    headers[0].severity = Severity::Major;
                }
            }
        }

        ParsedMessage {
            headers,
            notes,
            title: None,
        }
    }

    fn parse_header_line(&self, line: &str, commit_breaking: bool) -> ChangeLine {
        if let Some(caps) = self.header_re.captures(line) {
            let mut kind = caps.get(1).map_or("", |m| m.as_str()).to_lowercase();
            let mut severity = if kind.ends_with('!') {
                kind.pop();
                Severity::Major
            } else if commit_breaking {
                Severity::Major
            } else {
                severity_of(&kind)
            };
            let mut group = group_of(&kind);
            let scope = caps
                .get(2)
                .map(|m| m.as_str().to_lowercase())
                .filter(|scope| !scope.is_empty() && scope.as_str() != "*");
            let description = caps.get(3).map_or("", |m| m.as_str()).to_string();

            if line.contains("WIP") {
                kind = "wip".to_string();
                group = None;
                severity = Severity::None;
            }

            ChangeLine {
                r#type: kind,
                scope,
                description,
                group,
                severity,
            }
        } else {
            // anything unparsable still counts as a feature
            let mut kind = "feat".to_string();
            let mut severity = severity_of(&kind);
            let mut group = group_of(&kind);

            if line.contains("WIP") {
                kind = "wip".to_string();
                group = None;
                severity = Severity::None;
            }

            ChangeLine {
                r#type: kind,
                scope: None,
                description: line.to_string(),
                group,
                severity,
            }
        }
    }
}

impl Default for MessageParser {
    fn default() -> Self {
        Self::new()
    }
}
