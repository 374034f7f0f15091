//! Advisory pipeline: classify, route, and run the matching flow.
//!
//! The pipeline owns no mutable state; the artifact bundle and all ports are
//! shared read-only, so one instance serves concurrent requests. Every
//! per-request failure is converted into a structured [`AdvisoryReply`]
//! here, at the flow boundary; only infrastructure faults propagate as
//! errors.

use std::sync::Arc;

use krishi_core::deficiency;
use krishi_core::error::{KrishiError, Result};
use krishi_core::models::{
    AdvisoryReply, ClassifiedIntent, DeficiencyFinding, FarmerProfile, Intent, Recommendation,
    Season, SoilRecord, WeatherSummary,
};
use krishi_core::season::current_season;
use krishi_llm::ports::{IntentClassifier, SchemeGuide, TextRefiner};
use krishi_store::ports::ProfileStore;
use krishi_weather::ports::{Geocoder, WeatherProvider};

use crate::bundle::ArtifactBundle;
use crate::fuzzy;
use crate::models::{AdvisoryQuery, AdvisoryResponse, QueryContext};
use crate::transform::FeatureRecord;

/// Default number of crop recommendations per reply
pub const DEFAULT_TOP_K: usize = 5;

/// Default forecast window summarized into replies, in hours
pub const DEFAULT_FORECAST_WINDOW_HOURS: u32 = 24;

/// Advisory pipeline orchestrating classification, retrieval, and rules
pub struct AdvisoryPipeline {
    artifacts: Arc<ArtifactBundle>,
    profiles: Arc<dyn ProfileStore>,
    classifier: Arc<dyn IntentClassifier>,
    refiner: Arc<dyn TextRefiner>,
    scheme_guide: Arc<dyn SchemeGuide>,
    weather: Option<Arc<dyn WeatherProvider>>,
    geocoder: Option<Arc<dyn Geocoder>>,
    top_k: usize,
    forecast_window_hours: u32,
}

impl AdvisoryPipeline {
    /// Create a new pipeline without weather enrichment
    pub fn new(
        artifacts: Arc<ArtifactBundle>,
        profiles: Arc<dyn ProfileStore>,
        classifier: Arc<dyn IntentClassifier>,
        refiner: Arc<dyn TextRefiner>,
        scheme_guide: Arc<dyn SchemeGuide>,
    ) -> Self {
        Self {
            artifacts,
            profiles,
            classifier,
            refiner,
            scheme_guide,
            weather: None,
            geocoder: None,
            top_k: DEFAULT_TOP_K,
            forecast_window_hours: DEFAULT_FORECAST_WINDOW_HOURS,
        }
    }

    /// Attach a weather provider
    pub fn with_weather(mut self, weather: Arc<dyn WeatherProvider>) -> Self {
        self.weather = Some(weather);
        self
    }

    /// Attach a geocoder for profiles without stored coordinates
    pub fn with_geocoder(mut self, geocoder: Arc<dyn Geocoder>) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    /// Set the number of recommendations returned
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k.max(1);
        self
    }

    /// Set the forecast window summarized into replies
    pub fn with_forecast_window_hours(mut self, hours: u32) -> Self {
        self.forecast_window_hours = hours;
        self
    }

    /// Handle one advisory request end to end
    pub async fn handle(&self, query: &AdvisoryQuery) -> Result<AdvisoryResponse> {
        let classified = match self.classifier.classify(&query.text).await {
            Ok(classified) => classified,
            Err(e) => {
                tracing::warn!(error = %e, "Intent classification failed; treating as general");
                ClassifiedIntent { label: "general".to_string(), crop_name: None }
            }
        };

        // Unrecognized labels are coerced to General; downstream dispatch
        // has no handler for anything else.
        let intent = Intent::from_label(&classified.label).unwrap_or(Intent::General);
        if intent == Intent::General && Intent::from_label(&classified.label).is_none() {
            tracing::debug!(label = %classified.label, "Coerced unrecognized intent label");
        }

        tracing::info!(
            farmer_id = %query.farmer_id,
            intent = %intent,
            crop_name = ?classified.crop_name,
            "Dispatching advisory query"
        );

        let reply = match intent {
            Intent::PreSowing => self.recommend(query).await?,
            Intent::Sowing => self.sowing(query, classified.crop_name.as_deref()).await?,
            Intent::Scheme => self.scheme(query).await?,
            Intent::General => AdvisoryReply::NotHandled {
                intent,
                message: "I can help with crop choice, sowing guidance, and government schemes. \
                          Could you rephrase your question?"
                    .to_string(),
            },
        };

        Ok(AdvisoryResponse { intent, crop_name: classified.crop_name, reply })
    }

    /// Pre-sowing flow: encode the soil profile and retrieve crop
    /// recommendations from the similarity index
    async fn recommend(&self, query: &AdvisoryQuery) -> Result<AdvisoryReply> {
        let Some(profile) = self.profiles.get_profile(&query.farmer_id).await? else {
            return Ok(missing_profile_reply(query));
        };

        let soil = match self.select_soil_record(query).await? {
            SoilSelection::Selected(soil) => soil,
            SoilSelection::Reply(reply) => return Ok(reply),
        };

        let season = current_season();
        let weather = self.weather_summary(&profile).await;

        let context = QueryContext {
            season,
            crop_type_hint: None,
            water_source_hint: query.irrigation_hint.clone(),
        };
        let record = FeatureRecord::merge(&soil, &context);

        let vector = match self.artifacts.transform.encode(&record) {
            Ok(vector) => vector,
            Err(KrishiError::Encoding { reason }) => {
                tracing::warn!(
                    farmer_id = %query.farmer_id,
                    survey_no = %soil.survey_no,
                    reason = %reason,
                    "Soil profile could not be encoded"
                );
                return Ok(AdvisoryReply::InsufficientData {
                    message: "The soil record does not carry enough usable data for a \
                              recommendation. Please update the soil health card details."
                        .to_string(),
                });
            }
            Err(e) => return Err(e),
        };

        let recommendations: Vec<Recommendation> = self
            .artifacts
            .index
            .search(&vector, self.top_k)
            .into_iter()
            .map(|(row_index, distance)| Recommendation {
                crop: self.artifacts.catalog.lookup(row_index).clone(),
                row_index,
                distance,
            })
            .collect();

        let draft = render_recommendation_draft(
            &profile,
            season,
            &soil.survey_no,
            &recommendations,
            weather.as_ref(),
        );
        let (text, refined) = self.refined_text(&query.text, draft).await;

        Ok(AdvisoryReply::CropRecommendations {
            season,
            survey_no: soil.survey_no,
            recommendations,
            weather,
            text,
            refined,
        })
    }

    /// Sowing flow: resolve the crop by fuzzy match, evaluate soil
    /// deficiencies, and assemble guidance
    async fn sowing(
        &self,
        query: &AdvisoryQuery,
        crop_name: Option<&str>,
    ) -> Result<AdvisoryReply> {
        let Some(crop_name) = crop_name.map(str::trim).filter(|name| !name.is_empty()) else {
            return Ok(AdvisoryReply::AskCrop {
                message: "Please tell me which crop you plan to sow.".to_string(),
            });
        };

        let Some(profile) = self.profiles.get_profile(&query.farmer_id).await? else {
            return Ok(missing_profile_reply(query));
        };

        let soil = match self.select_soil_record(query).await? {
            SoilSelection::Selected(soil) => soil,
            SoilSelection::Reply(reply) => return Ok(reply),
        };

        let names: Vec<&str> = self.artifacts.catalog.names().collect();
        let Some(matched) = fuzzy::best_match(crop_name, names) else {
            return Ok(AdvisoryReply::CropNotRecognized {
                query: crop_name.to_string(),
                message: format!(
                    "I could not find a crop matching '{}' in the catalog.",
                    crop_name
                ),
            });
        };

        let season = current_season();
        let row = self
            .artifacts
            .catalog
            .season_preferred_row(&matched.name, season)
            .unwrap_or(matched.index);
        let crop = self.artifacts.catalog.lookup(row).clone();

        let weather = self.weather_summary(&profile).await;
        let rain_expected = weather.as_ref().map(|w| w.rain_expected).unwrap_or(false);
        let findings = deficiency::evaluate(&soil, rain_expected);

        let draft = render_sowing_draft(&profile, &crop, &findings, weather.as_ref());
        let (text, refined) = self.refined_text(&query.text, draft).await;

        Ok(AdvisoryReply::SowingAdvice {
            crop,
            season,
            survey_no: soil.survey_no,
            findings,
            weather,
            text,
            refined,
        })
    }

    /// Scheme flow: pass through to the external guidance service.
    /// The profile is optional context and its lookup failure is tolerated.
    async fn scheme(&self, query: &AdvisoryQuery) -> Result<AdvisoryReply> {
        let profile = match self.profiles.get_profile(&query.farmer_id).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(error = %e, "Profile lookup failed; scheme guidance proceeds without it");
                None
            }
        };

        match self.scheme_guide.guide(&query.text, profile.as_ref()).await {
            Ok(guidance) => Ok(AdvisoryReply::SchemeGuidance { guidance }),
            Err(e) => {
                tracing::warn!(error = %e, "Scheme guidance unavailable");
                Ok(AdvisoryReply::NotHandled {
                    intent: Intent::Scheme,
                    message: "Scheme guidance is temporarily unavailable. Please try again \
                              in a little while."
                        .to_string(),
                })
            }
        }
    }

    /// Resolve which soil record the request works with
    async fn select_soil_record(&self, query: &AdvisoryQuery) -> Result<SoilSelection> {
        if let Some(survey_no) = &query.survey_no {
            return match self.profiles.soil_record(&query.farmer_id, survey_no).await? {
                Some(soil) => Ok(SoilSelection::Selected(soil)),
                None => Ok(SoilSelection::Reply(AdvisoryReply::NoSoilData {
                    message: format!("No soil record found with survey number {}.", survey_no),
                })),
            };
        }

        let mut records = self.profiles.soil_records(&query.farmer_id).await?;
        match records.len() {
            0 => Ok(SoilSelection::Reply(AdvisoryReply::NoSoilData {
                message: "No soil health card is on file, so I cannot advise on soil and \
                          crop choice yet."
                    .to_string(),
            })),
            1 => Ok(SoilSelection::Selected(records.remove(0))),
            _ => {
                let survey_nos: Vec<String> =
                    records.iter().map(|r| r.survey_no.clone()).collect();
                Ok(SoilSelection::Reply(AdvisoryReply::ChooseSoilRecord {
                    message: format!(
                        "Multiple soil records found. Please choose one of: {}.",
                        survey_nos.join(", ")
                    ),
                    survey_nos,
                }))
            }
        }
    }

    /// Fetch and digest weather for a profile. Every failure path returns
    /// `None`: weather is enrichment, never a requirement.
    async fn weather_summary(&self, profile: &FarmerProfile) -> Option<WeatherSummary> {
        let provider = self.weather.as_ref()?;

        let coordinates = match profile.coordinates {
            Some(coordinates) => Some(coordinates),
            None => match &self.geocoder {
                Some(geocoder) => {
                    match geocoder
                        .geocode(profile.district.as_deref(), profile.state.as_deref())
                        .await
                    {
                        Ok(coordinates) => coordinates,
                        Err(e) => {
                            tracing::warn!(error = %e, "Geocoding failed");
                            None
                        }
                    }
                }
                None => None,
            },
        };

        let coordinates = coordinates?;

        match provider.fetch(coordinates).await {
            Ok(report) => Some(report.summarize(self.forecast_window_hours)),
            Err(e) => {
                tracing::warn!(error = %e, "Weather enrichment unavailable");
                None
            }
        }
    }

    /// Refine a draft into farmer-friendly prose, falling back to the draft
    /// when the refinement service fails
    async fn refined_text(&self, query_text: &str, draft: String) -> (String, bool) {
        match self.refiner.refine(query_text, &draft).await {
            Ok(text) if !text.trim().is_empty() => (text, true),
            Ok(_) => (draft, false),
            Err(e) => {
                tracing::warn!(error = %e, "Refinement unavailable; returning plain draft");
                (draft, false)
            }
        }
    }
}

enum SoilSelection {
    Selected(SoilRecord),
    Reply(AdvisoryReply),
}

fn missing_profile_reply(query: &AdvisoryQuery) -> AdvisoryReply {
    AdvisoryReply::MissingProfile {
        farmer_id: query.farmer_id.0.clone(),
        message: "I could not find your farmer profile, so I cannot look up soil records."
            .to_string(),
    }
}

fn greeting(profile: &FarmerProfile) -> &str {
    profile.name.as_deref().unwrap_or("Farmer")
}

fn weather_line(weather: Option<&WeatherSummary>) -> String {
    let Some(weather) = weather else {
        return String::new();
    };
    match (weather.avg_temp_c, weather.avg_humidity_pct) {
        (Some(temp), Some(humidity)) => format!(
            "\n\nWeather outlook: temperature ~{:.1} C, humidity ~{:.0}%.",
            temp, humidity
        ),
        (Some(temp), None) => format!("\n\nWeather outlook: temperature ~{:.1} C.", temp),
        _ => String::new(),
    }
}

fn render_recommendation_draft(
    profile: &FarmerProfile,
    season: Season,
    survey_no: &str,
    recommendations: &[Recommendation],
    weather: Option<&WeatherSummary>,
) -> String {
    let mut draft = format!(
        "Hi {}! Crop suggestions for soil record {} ({} season):\n",
        greeting(profile),
        survey_no,
        season
    );

    for (position, recommendation) in recommendations.iter().enumerate() {
        draft.push_str(&format!(
            "{}. {} ({}, sown in {})\n",
            position + 1,
            recommendation.crop.name,
            recommendation.crop.crop_type,
            recommendation.crop.season,
        ));
    }

    draft.push_str(&weather_line(weather));
    draft
}

fn render_sowing_draft(
    profile: &FarmerProfile,
    crop: &krishi_core::models::CropRecord,
    findings: &[DeficiencyFinding],
    weather: Option<&WeatherSummary>,
) -> String {
    let mut draft = format!(
        "Hi {}!\nSowing advice for {}:\n- Season: {}\n- Type: {}\n\nSoil and fertilizer guidance:\n",
        greeting(profile),
        crop.name,
        crop.season,
        crop.crop_type,
    );

    for finding in findings {
        draft.push_str(&format!("- {}\n", finding.message));
    }

    draft.push_str(&weather_line(weather));
    draft
}
