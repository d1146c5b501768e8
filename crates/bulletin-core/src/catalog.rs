//! Fixed catalogues: canonical ministry ordering and chip keyword packs.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::model::Item;

/// Sentinel value meaning "no restriction" for ministry and chip selectors.
pub const ALL: &str = "__all__";

/// Ministries in the order the dropdown presents them.
pub const CANONICAL_MINISTRIES: &[&str] = &[
    "Ministry of Defence",
    "Ministry of Home Affairs",
    "Ministry of External Affairs",
    "Ministry of Finance",
    "Ministry of Law and Justice",
    "Ministry of Environment, Forest and Climate Change",
    "Ministry of Health and Family Welfare",
    "Ministry of Education",
    "Ministry of Agriculture & Farmers Welfare",
    "Ministry of Railways",
    "Ministry of Road Transport and Highways",
    "Ministry of Power",
    "Ministry of Petroleum and Natural Gas",
    "Ministry of Commerce and Industry",
    "Ministry of Electronics & IT",
    "Ministry of Science & Technology",
    "Ministry of Labour & Employment",
    "Ministry of Rural Development",
    "Ministry of Housing and Urban Affairs",
    "Ministry of Women and Child Development",
    "Ministry of Social Justice and Empowerment",
    "Ministry of Tribal Affairs",
    "Ministry of Consumer Affairs, Food and Public Distribution",
    "Ministry of Parliamentary Affairs",
    "Ministry of Civil Aviation",
    "Ministry of Coal",
    "Ministry of Heavy Industries",
    "Ministry of Panchayati Raj",
    "Ministry of Jal Shakti",
    "Ministry of Information & Broadcasting",
    "NITI Aayog",
];

/// Dropdown options: the canonical list, then any other ministry present in
/// `items`, sorted and appended. Blank ministries are not offered.
pub fn ministry_options(items: &[Item]) -> Vec<String> {
    let extras: BTreeSet<&str> = items
        .iter()
        .map(|item| item.ministry.as_str())
        .filter(|m| !m.trim().is_empty() && !CANONICAL_MINISTRIES.iter().any(|c| c == m))
        .collect();

    CANONICAL_MINISTRIES
        .iter()
        .map(|m| m.to_string())
        .chain(extras.into_iter().map(str::to_string))
        .collect()
}

/// Topic chips. The set is closed; each chip owns a lowercase keyword pack
/// matched as substrings against title and snippet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChipId {
    Budget,
    Defence,
    Health,
    Infrastructure,
    Agriculture,
    Education,
    Technology,
    Environment,
    Railways,
    Energy,
}

impl ChipId {
    pub const ALL: [ChipId; 10] = [
        ChipId::Budget,
        ChipId::Defence,
        ChipId::Health,
        ChipId::Infrastructure,
        ChipId::Agriculture,
        ChipId::Education,
        ChipId::Technology,
        ChipId::Environment,
        ChipId::Railways,
        ChipId::Energy,
    ];

    pub fn id(self) -> &'static str {
        match self {
            ChipId::Budget => "budget",
            ChipId::Defence => "defence",
            ChipId::Health => "health",
            ChipId::Infrastructure => "infrastructure",
            ChipId::Agriculture => "agriculture",
            ChipId::Education => "education",
            ChipId::Technology => "technology",
            ChipId::Environment => "environment",
            ChipId::Railways => "railways",
            ChipId::Energy => "energy",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChipId::Budget => "Budget & Economy",
            ChipId::Defence => "Defence & Security",
            ChipId::Health => "Health",
            ChipId::Infrastructure => "Infrastructure",
            ChipId::Agriculture => "Agriculture",
            ChipId::Education => "Education",
            ChipId::Technology => "Technology",
            ChipId::Environment => "Environment",
            ChipId::Railways => "Railways",
            ChipId::Energy => "Energy",
        }
    }

    pub fn keywords(self) -> &'static [&'static str] {
        match self {
            ChipId::Budget => &[
                "budget", "gst", "tax", "fiscal", "economy", "economic", "inflation", "rbi",
                "revenue", "finance",
            ],
            ChipId::Defence => &[
                "defence", "army", "navy", "air force", "military", "drdo", "border", "security",
            ],
            ChipId::Health => &[
                "health", "hospital", "vaccine", "medical", "disease", "ayushman", "wellness",
            ],
            ChipId::Infrastructure => &[
                "infrastructure", "highway", "road", "bridge", "port", "airport", "metro",
                "housing", "smart city",
            ],
            ChipId::Agriculture => &[
                "agricultur", "farmer", "crop", "kisan", "msp", "fertiliser", "fertilizer",
                "irrigation",
            ],
            ChipId::Education => &[
                "education", "school", "university", "student", "skill", "scholarship",
            ],
            ChipId::Technology => &[
                "digital", "technology", "cyber", "semiconductor", "startup", "artificial intelligence",
                "space", "isro",
            ],
            ChipId::Environment => &[
                "environment", "climate", "forest", "wildlife", "pollution", "emission", "water",
            ],
            ChipId::Railways => &["railway", "train", "vande bharat", "station", "freight"],
            ChipId::Energy => &[
                "energy", "power", "solar", "coal", "petroleum", "gas", "electricity", "renewable",
            ],
        }
    }
}

impl fmt::Display for ChipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown chip: {0}")]
pub struct UnknownChip(pub String);

impl FromStr for ChipId {
    type Err = UnknownChip;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ChipId::ALL
            .into_iter()
            .find(|chip| chip.id() == wanted)
            .ok_or_else(|| UnknownChip(s.to_string()))
    }
}
