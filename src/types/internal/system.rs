use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::InternalError;

/// Product system owning its own numeric company-id space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SystemType {
    Orgtrakker,
    Scorecardtrakker,
    Skiltrakker,
    Tickettrakker,
    Meetingtrakker,
}

impl SystemType {
    pub const ALL: [SystemType; 5] = [
        Self::Orgtrakker,
        Self::Scorecardtrakker,
        Self::Skiltrakker,
        Self::Tickettrakker,
        Self::Meetingtrakker,
    ];

    /// String representation used in database columns
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orgtrakker => "orgtrakker",
            Self::Scorecardtrakker => "scorecardtrakker",
            Self::Skiltrakker => "skiltrakker",
            Self::Tickettrakker => "tickettrakker",
            Self::Meetingtrakker => "meetingtrakker",
        }
    }
}

impl fmt::Display for SystemType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SystemType {
    type Err = InternalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|system| system.as_str() == wanted)
            .ok_or_else(|| InternalError::parse("SystemType", format!("unknown system '{}'", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("OrgTrakker".parse::<SystemType>().unwrap(), SystemType::Orgtrakker);
        assert_eq!(" scorecardtrakker ".parse::<SystemType>().unwrap(), SystemType::Scorecardtrakker);
    }

    #[test]
    fn test_parse_rejects_unknown_system() {
        let err = "payrolltrakker".parse::<SystemType>().unwrap_err();
        assert!(matches!(err, InternalError::Parse { .. }));
    }

    #[test]
    fn test_round_trips_through_as_str() {
        for system in SystemType::ALL {
            assert_eq!(system.as_str().parse::<SystemType>().unwrap(), system);
        }
    }
}
