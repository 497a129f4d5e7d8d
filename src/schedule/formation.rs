/// A named, ordered list of on-field positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formation {
    pub id: &'static str,
    pub positions: &'static [&'static str],
}

pub const DEFAULT_FORMATION_ID: &str = "2-3-1";

/// Built-in formations, goalkeeper first, then back to front.
pub const FORMATIONS: &[Formation] = &[
    Formation {
        id: "2-3-1",
        positions: &["GK", "LD", "RD", "LM", "CM", "RM", "ST"],
    },
    Formation {
        id: "3-2-1",
        positions: &["GK", "LD", "CD", "RD", "LM", "RM", "ST"],
    },
    Formation {
        id: "3-3-1",
        positions: &["GK", "LD", "CD", "RD", "LM", "CM", "RM", "ST"],
    },
    Formation {
        id: "2-3-2",
        positions: &["GK", "LD", "RD", "LM", "CM", "RM", "LS", "RS"],
    },
    Formation {
        id: "4-4-2",
        positions: &[
            "GK", "LB", "LCB", "RCB", "RB", "LM", "LCM", "RCM", "RM", "LS", "RS",
        ],
    },
    Formation {
        id: "4-3-3",
        positions: &[
            "GK", "LB", "LCB", "RCB", "RB", "LCM", "CM", "RCM", "LW", "ST", "RW",
        ],
    },
];

pub fn find_formation(id: &str) -> Option<&'static Formation> {
    FORMATIONS.iter().find(|f| f.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn default_formation_is_registered() {
        let formation = find_formation(DEFAULT_FORMATION_ID).unwrap();
        assert_eq!(formation.positions.len(), 7);
        assert_eq!(formation.positions[0], "GK");
    }

    #[test]
    fn formations_have_unique_positions() {
        for formation in FORMATIONS {
            let unique: HashSet<_> = formation.positions.iter().collect();
            assert_eq!(unique.len(), formation.positions.len(), "{}", formation.id);
        }
    }

    #[test]
    fn unknown_formation_is_none() {
        assert!(find_formation("5-5-5").is_none());
    }
}
