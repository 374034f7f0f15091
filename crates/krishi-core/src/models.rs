pub mod advisory;
pub mod crop;
pub mod farmer;
pub mod soil;

pub use advisory::{
    AdvisoryReply, ClassifiedIntent, DeficiencyFinding, EligibilityStatus, Intent, Nutrient,
    NutrientStatus, Recommendation, SchemeBlock, SchemeGuidance, WeatherSummary,
};
pub use crop::{CropRecord, Season};
pub use farmer::{Coordinates, FarmerId, FarmerProfile};
pub use soil::SoilRecord;
