use serde::{Deserialize, Serialize};

/// Indian agricultural sowing season
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    /// Monsoon cropping cycle (June through October)
    Kharif,
    /// Winter cropping cycle (November through March)
    Rabi,
    /// Summer cropping cycle (April and May)
    Zaid,
}

impl Season {
    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Kharif => "kharif",
            Season::Rabi => "rabi",
            Season::Zaid => "zaid",
        }
    }
}

impl std::fmt::Display for Season {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Season {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kharif" => Ok(Season::Kharif),
            "rabi" => Ok(Season::Rabi),
            "zaid" => Ok(Season::Zaid),
            other => Err(format!("unknown season: {}", other)),
        }
    }
}

/// One crop profile from the static catalog.
///
/// Catalog entries are positional: the entry at row `i` describes the crop
/// whose embedding occupies row `i` of the similarity index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropRecord {
    pub name: String,
    pub season: Season,
    pub crop_type: String,

    /// Typical water source, when the catalog records one
    #[serde(default)]
    pub water_source: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_round_trip() {
        for season in [Season::Kharif, Season::Rabi, Season::Zaid] {
            assert_eq!(season.as_str().parse::<Season>().unwrap(), season);
        }
        assert!("monsoon".parse::<Season>().is_err());
    }

    #[test]
    fn test_season_serde_lowercase() {
        assert_eq!(serde_json::to_string(&Season::Kharif).unwrap(), "\"kharif\"");
        let season: Season = serde_json::from_str("\"rabi\"").unwrap();
        assert_eq!(season, Season::Rabi);
    }
}
