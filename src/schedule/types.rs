use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize, Serializer};

/// One of the two independent scheduling periods of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Half {
    First = 1,
    Second = 2,
}

impl Half {
    pub const ALL: [Half; 2] = [Half::First, Half::Second];

    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn from_number(n: u8) -> Option<Half> {
        match n {
            1 => Some(Half::First),
            2 => Some(Half::Second),
            _ => None,
        }
    }

    /// Label used in timeline headings
    pub fn label(self) -> &'static str {
        match self {
            Half::First => "First",
            Half::Second => "Second",
        }
    }
}

impl TryFrom<u8> for Half {
    type Error = String;

    fn try_from(n: u8) -> Result<Self, Self::Error> {
        Half::from_number(n).ok_or_else(|| format!("invalid half: {}", n))
    }
}

impl From<Half> for u8 {
    fn from(half: Half) -> u8 {
        half.number()
    }
}

impl fmt::Display for Half {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Minutes offset of a slot within its half.
///
/// Slot times are always produced as `index * interval`, so two times that
/// denote the same slot compare bit-equal. Ordering and hashing go through
/// the bit pattern, which makes the type usable as a map key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlotTime(f64);

impl SlotTime {
    pub const ZERO: SlotTime = SlotTime(0.0);

    pub fn new(minutes: f64) -> Self {
        // fold -0.0 into 0.0 so both hash alike
        SlotTime(if minutes == 0.0 { 0.0 } else { minutes })
    }

    pub fn minutes(self) -> f64 {
        self.0
    }

    pub fn is_start(self) -> bool {
        self.0 == 0.0
    }
}

impl PartialEq for SlotTime {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for SlotTime {}

impl Hash for SlotTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl PartialOrd for SlotTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SlotTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl From<f64> for SlotTime {
    fn from(minutes: f64) -> Self {
        SlotTime::new(minutes)
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A (half, slot time) pair; renders as the `"{half}-{time}"` key of the saved state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub half: Half,
    pub time: SlotTime,
}

impl SlotKey {
    pub fn new(half: Half, time: impl Into<SlotTime>) -> Self {
        SlotKey {
            half,
            time: time.into(),
        }
    }
}

impl Serialize for SlotKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.half, self.time)
    }
}

/// Flags derived for one grid cell on every evaluation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CellFlags {
    /// Player differs from the one at the preceding slot of the same series
    pub is_change: bool,
    /// Cell is unassigned
    pub is_warning: bool,
    /// Player is also placed at another position at the same slot
    pub is_error: bool,
}

/// Minutes and positions for one roster player
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerAggregate {
    pub name: String,
    pub total_minutes: f64,
    /// Positions in formation order
    pub positions_played: Vec<String>,
    pub under_minimum: bool,
}
