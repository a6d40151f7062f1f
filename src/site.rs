use std::fmt;
use std::str::FromStr;

use crate::validation::ValidationError;

/// Websites whose voice the generated metadata should match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TargetSite {
    #[default]
    InsidePhilanthropy,
    BlueTent,
    PeoplesHouse,
}

impl TargetSite {
    pub const ALL: [TargetSite; 3] = [
        TargetSite::InsidePhilanthropy,
        TargetSite::BlueTent,
        TargetSite::PeoplesHouse,
    ];

    pub fn host(self) -> &'static str {
        match self {
            TargetSite::InsidePhilanthropy => "www.insidephilanthropy.com",
            TargetSite::BlueTent => "www.bluetent.us",
            TargetSite::PeoplesHouse => "www.peopleshouse.us",
        }
    }

    /// Resolves the optional `website` field of a chat request.
    pub fn from_request(website: Option<&str>) -> Result<Self, ValidationError> {
        match website.map(str::trim) {
            None | Some("") => Ok(TargetSite::default()),
            Some(name) => name.parse(),
        }
    }
}

impl FromStr for TargetSite {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        let wanted = wanted.strip_prefix("www.").unwrap_or(&wanted);
        TargetSite::ALL
            .into_iter()
            .find(|site| site.host().strip_prefix("www.") == Some(wanted))
            .ok_or_else(|| ValidationError::UnknownSite(s.to_string()))
    }
}

impl fmt::Display for TargetSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.host())
    }
}
