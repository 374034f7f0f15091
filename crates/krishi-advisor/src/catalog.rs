//! Static crop catalog.
//!
//! Row positions are load-bearing: entry `i` describes the crop behind row
//! `i` of the similarity index, and the two must always be rebuilt together.

use serde::{Deserialize, Serialize};

use krishi_core::models::{CropRecord, Season};

/// Read-only crop table aligned 1:1 with the similarity index rows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CropCatalog {
    crops: Vec<CropRecord>,
}

impl CropCatalog {
    pub fn new(crops: Vec<CropRecord>) -> Self {
        Self { crops }
    }

    pub fn len(&self) -> usize {
        self.crops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.crops.is_empty()
    }

    /// Entry at a given index row.
    ///
    /// An out-of-range row means the catalog and index have diverged, which
    /// the bundle loader is supposed to make impossible; failing loudly here
    /// beats silently corrupting recommendations.
    pub fn lookup(&self, row_index: usize) -> &CropRecord {
        assert!(
            row_index < self.crops.len(),
            "catalog row {} out of range ({} crops); catalog and index have diverged",
            row_index,
            self.crops.len()
        );
        &self.crops[row_index]
    }

    /// Crop names in row order, for the fuzzy matcher
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.crops.iter().map(|crop| crop.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &CropRecord> {
        self.crops.iter()
    }

    /// Row for a crop name, preferring the entry sown in the given season.
    ///
    /// A crop can appear once per season it is sown in; when no entry
    /// matches the season, the first row with that name wins.
    pub fn season_preferred_row(&self, name: &str, season: Season) -> Option<usize> {
        let mut first_match = None;
        for (row, crop) in self.crops.iter().enumerate() {
            if !crop.name.eq_ignore_ascii_case(name) {
                continue;
            }
            if crop.season == season {
                return Some(row);
            }
            if first_match.is_none() {
                first_match = Some(row);
            }
        }
        first_match
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crop(name: &str, season: Season) -> CropRecord {
        CropRecord {
            name: name.to_string(),
            season,
            crop_type: "cereal".to_string(),
            water_source: None,
        }
    }

    fn catalog() -> CropCatalog {
        CropCatalog::new(vec![
            crop("Maize", Season::Kharif),
            crop("Wheat", Season::Rabi),
            crop("Maize", Season::Rabi),
        ])
    }

    #[test]
    fn test_lookup() {
        assert_eq!(catalog().lookup(1).name, "Wheat");
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_lookup_out_of_range_panics() {
        catalog().lookup(3);
    }

    #[test]
    fn test_season_preferred_row() {
        let catalog = catalog();
        // In-season entry wins over the earlier row
        assert_eq!(catalog.season_preferred_row("maize", Season::Rabi), Some(2));
        // No in-season entry: first row with the name
        assert_eq!(catalog.season_preferred_row("Maize", Season::Zaid), Some(0));
        assert_eq!(catalog.season_preferred_row("Cotton", Season::Kharif), None);
    }

    #[test]
    fn test_names_in_row_order() {
        let catalog = catalog();
        let names: Vec<&str> = catalog.names().collect();
        assert_eq!(names, vec!["Maize", "Wheat", "Maize"]);
    }
}
