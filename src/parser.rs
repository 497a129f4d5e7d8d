use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// The squad available for the match, kept sorted and free of duplicates
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct Roster {
    players: Vec<String>,
}

impl Roster {
    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.players
            .binary_search_by(|p| p.as_str().cmp(name))
            .is_ok()
    }

    /// Newline-joined names with a trailing newline, the form the roster text box holds
    pub fn to_text(&self) -> String {
        self.players.iter().map(|p| format!("{}\n", p)).collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for Roster {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let unique: BTreeSet<String> = iter
            .into_iter()
            .map(|name| name.as_ref().trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();
        Roster {
            players: unique.into_iter().collect(),
        }
    }
}

impl From<Vec<String>> for Roster {
    fn from(names: Vec<String>) -> Self {
        names.into_iter().collect()
    }
}

impl From<Roster> for Vec<String> {
    fn from(roster: Roster) -> Self {
        roster.players
    }
}

/// Parses free-text roster input: one name per line, blanks dropped
pub fn parse_players(text: &str) -> Roster {
    text.lines().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_players_trims_sorts_and_drops_blanks() {
        let roster = parse_players("  Zoe \n\nAlice\n   \nBob\n");
        assert_eq!(roster.players(), &["Alice", "Bob", "Zoe"]);
        assert_eq!(roster.len(), 3);
    }

    #[test]
    fn parse_players_dedupes() {
        let roster = parse_players("Bob\nAlice\nBob\n Alice");
        assert_eq!(roster.players(), &["Alice", "Bob"]);
    }

    #[test]
    fn parse_players_handles_windows_line_endings() {
        let roster = parse_players("Bob\r\nAlice\r\n");
        assert_eq!(roster.players(), &["Alice", "Bob"]);
    }

    #[test]
    fn empty_text_gives_empty_roster() {
        assert!(parse_players("\n  \n").is_empty());
    }

    #[test]
    fn contains_looks_up_exact_names() {
        let roster = parse_players("Alice\nBob");
        assert!(roster.contains("Bob"));
        assert!(!roster.contains("bob"));
        assert!(!roster.contains("Carl"));
    }

    #[test]
    fn to_text_round_trips() {
        let roster = parse_players("Bob\nAlice");
        assert_eq!(roster.to_text(), "Alice\nBob\n");
        assert_eq!(parse_players(&roster.to_text()), roster);
    }
}
