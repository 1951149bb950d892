use serde::{Deserialize, Serialize};
use std::str::FromStr;
use strum::{Display, EnumIter, IntoStaticStr};

/// The field search results are ranked by, always descending.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Order {
    #[default]
    Downloads,
    Stars,
    Forks,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }

    /// Title shown in sort controls.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Downloads => "Downloads",
            Self::Stars => "Stars",
            Self::Forks => "Forks",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid order `{0}`, expected one of `downloads`, `stars` or `forks`")]
pub struct InvalidOrder(pub String);

impl FromStr for Order {
    type Err = InvalidOrder;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "downloads" => Ok(Self::Downloads),
            "stars" => Ok(Self::Stars),
            "forks" => Ok(Self::Forks),
            _ => Err(InvalidOrder(s.to_string())),
        }
    }
}
