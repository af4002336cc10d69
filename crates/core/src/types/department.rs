//! Municipal departments and message-board channels.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Department responsible for an issue, report or officer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Department {
    PublicWorks,
    Sanitation,
    Electricity,
    WaterSupply,
    ParksAndRecreation,
    Transport,
}

/// Error returned when a department name is not recognized.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown department: {0}")]
pub struct DepartmentParseError(pub String);

impl Department {
    /// All departments in display order.
    pub const ALL: [Self; 6] = [
        Self::PublicWorks,
        Self::Sanitation,
        Self::Electricity,
        Self::WaterSupply,
        Self::ParksAndRecreation,
        Self::Transport,
    ];

    /// Storage and URL form, e.g. `public_works`.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::PublicWorks => "public_works",
            Self::Sanitation => "sanitation",
            Self::Electricity => "electricity",
            Self::WaterSupply => "water_supply",
            Self::ParksAndRecreation => "parks_and_recreation",
            Self::Transport => "transport",
        }
    }

    /// Human-readable name, e.g. `Public Works`.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PublicWorks => "Public Works",
            Self::Sanitation => "Sanitation",
            Self::Electricity => "Electricity",
            Self::WaterSupply => "Water Supply",
            Self::ParksAndRecreation => "Parks and Recreation",
            Self::Transport => "Transport",
        }
    }
}

impl fmt::Display for Department {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for Department {
    type Err = DepartmentParseError;

    /// Accepts the slug or the label, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        Self::ALL
            .into_iter()
            .find(|d| d.slug() == normalized)
            .ok_or_else(|| DepartmentParseError(s.to_owned()))
    }
}

/// Partition of the message board.
///
/// Officers talk in their department's channel; admins post to their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Department(Department),
    Admin,
}

impl Channel {
    /// Stored form: the department slug or `admin`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Department(d) => d.slug(),
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Channel {
    type Err = DepartmentParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("admin") {
            Ok(Self::Admin)
        } else {
            s.parse().map(Self::Department)
        }
    }
}

impl Serialize for Channel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
