use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Date key (`YYYY-MM-DD`) to the ordered entries logged that day.
pub type EntryMap = BTreeMap<String, Vec<Entry>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Normal,
    Accident,
    Failed,
}

impl EntryKind {
    /// Order in which a day's entries are laid out.
    pub const ALL: [EntryKind; 3] = [EntryKind::Normal, EntryKind::Accident, EntryKind::Failed];

    pub fn rating(self) -> u8 {
        match self {
            EntryKind::Normal => 5,
            EntryKind::Accident | EntryKind::Failed => 1,
        }
    }
}

/// Bristol Stool Scale classification, always within `1..=7`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct BristolType(u8);

impl BristolType {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 7;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidBristolType(pub u8);

impl fmt::Display for InvalidBristolType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bristol type must be between {} and {}, got {}",
            BristolType::MIN,
            BristolType::MAX,
            self.0
        )
    }
}

impl std::error::Error for InvalidBristolType {}

impl TryFrom<u8> for BristolType {
    type Error = InvalidBristolType;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(InvalidBristolType(value))
    }
}

impl From<BristolType> for u8 {
    fn from(value: BristolType) -> Self {
        value.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub id: i64,
    pub date: String,
    pub time: String,
    #[serde(alias = "type")]
    pub kind: EntryKind,
    #[serde(default)]
    pub bristol_type: Option<BristolType>,
    #[serde(default)]
    pub notes: String,
    pub rating: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DayCounts {
    pub successful: u32,
    pub accidents: u32,
    pub failed: u32,
}

impl DayCounts {
    pub fn new(successful: u32, accidents: u32, failed: u32) -> Self {
        Self {
            successful,
            accidents,
            failed,
        }
    }

    pub fn get(&self, kind: EntryKind) -> u32 {
        match kind {
            EntryKind::Normal => self.successful,
            EntryKind::Accident => self.accidents,
            EntryKind::Failed => self.failed,
        }
    }

    fn slot(&mut self, kind: EntryKind) -> &mut u32 {
        match kind {
            EntryKind::Normal => &mut self.successful,
            EntryKind::Accident => &mut self.accidents,
            EntryKind::Failed => &mut self.failed,
        }
    }

    pub fn increment(&mut self, kind: EntryKind) {
        let slot = self.slot(kind);
        *slot = slot.saturating_add(1);
    }

    /// Moves one count by `delta`. Stepping down stops at zero.
    pub fn step(&mut self, kind: EntryKind, delta: i64) {
        let slot = self.slot(kind);
        let next = i64::from(*slot).saturating_add(delta).clamp(0, i64::from(u32::MAX));
        *slot = next as u32;
    }

    pub fn total(&self) -> u64 {
        u64::from(self.successful) + u64::from(self.accidents) + u64::from(self.failed)
    }
}

#[derive(Debug, Deserialize)]
pub struct DayEditRequest {
    pub successful: u32,
    pub accidents: u32,
    pub failed: u32,
    #[serde(default)]
    pub bristol_type: Option<u8>,
}

#[derive(Debug, Serialize)]
pub struct DayResponse {
    pub date: String,
    pub successful: u32,
    pub accidents: u32,
    pub failed: u32,
    pub bristol_type: Option<BristolType>,
    pub entries: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    pub month: Option<String>,
    pub selected: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dot {
    pub key: String,
    pub color: &'static str,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarMark {
    pub selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected_color: Option<&'static str>,
    pub marked: bool,
    pub dots: Vec<Dot>,
}

#[derive(Debug, Serialize)]
pub struct CalendarResponse {
    pub month: String,
    pub selected: String,
    pub weeks: Vec<Vec<Option<String>>>,
    pub marks: BTreeMap<String, CalendarMark>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct Statistics {
    pub total_days: u64,
    pub successful_days: u64,
    pub accident_days: u64,
    pub failed_days: u64,
    pub total_successful: u64,
    pub total_accidents: u64,
    pub total_failed: u64,
    pub successful_percentage: u64,
    pub accident_percentage: u64,
    pub failed_percentage: u64,
    pub avg_successful_per_day: f64,
    pub avg_accidents_per_day: f64,
    pub avg_failed_per_day: f64,
}
