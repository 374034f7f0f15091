use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;

use krishi_advisor::bundle::ArtifactBundle;
use krishi_advisor::models::AdvisoryQuery;
use krishi_advisor::pipeline::AdvisoryPipeline;
use krishi_core::config::LayeredConfig;
use krishi_core::error::KrishiError;
use krishi_core::models::{
    AdvisoryReply, ClassifiedIntent, FarmerProfile, SchemeGuidance,
};
use krishi_llm::openai::OpenAiClient;
use krishi_llm::ports::{IntentClassifier, SchemeGuide, TextRefiner};
use krishi_store::memory::MemoryProfileStore;
use krishi_weather::geocode::NominatimClient;
use krishi_weather::openweather::OpenWeatherClient;

use crate::cli::QueryArgs;
use crate::output::OutputWriter;

/// Classifier standing in for the language model when --intent is given
struct FixedClassifier {
    label: String,
    crop_name: Option<String>,
}

#[async_trait]
impl IntentClassifier for FixedClassifier {
    async fn classify(&self, _query: &str) -> krishi_core::Result<ClassifiedIntent> {
        Ok(ClassifiedIntent {
            label: self.label.clone(),
            crop_name: self.crop_name.clone(),
        })
    }
}

/// Port implementation for offline runs: every call reports the service as
/// unavailable and the pipeline degrades to plain drafts
struct Offline;

#[async_trait]
impl TextRefiner for Offline {
    async fn refine(&self, _query: &str, _draft: &str) -> krishi_core::Result<String> {
        Err(offline_error())
    }
}

#[async_trait]
impl SchemeGuide for Offline {
    async fn guide(
        &self,
        _query: &str,
        _profile: Option<&FarmerProfile>,
    ) -> krishi_core::Result<SchemeGuidance> {
        Err(offline_error())
    }
}

fn offline_error() -> KrishiError {
    KrishiError::LlmUnavailable {
        reason: "no OPENAI_API_KEY configured".to_string(),
        remediation: "Set OPENAI_API_KEY to enable language-model flows".to_string(),
    }
}

pub async fn execute(args: QueryArgs, config: &LayeredConfig, output: &OutputWriter) -> Result<()> {
    let artifacts = Arc::new(
        ArtifactBundle::load(&config.artifact_dir.value).with_context(|| {
            format!(
                "Failed to load advisory artifacts from {}. Run 'krishi doctor' for details",
                config.artifact_dir.value.display()
            )
        })?,
    );

    let store = Arc::new(
        MemoryProfileStore::load_seed_file(&args.profiles)
            .with_context(|| format!("Failed to load profiles from {}", args.profiles.display()))?,
    );

    // Build the LLM side: a live client when a key is configured, otherwise
    // a fixed intent plus offline stubs
    let llm = OpenAiClient::from_env(
        config.llm_base_url.value.clone(),
        config.llm_model.value.clone(),
    )
    .ok()
    .map(Arc::new);

    let classifier: Arc<dyn IntentClassifier> = match (&args.intent, &llm) {
        (Some(label), _) => Arc::new(FixedClassifier {
            label: label.clone(),
            crop_name: args.crop.clone(),
        }),
        (None, Some(llm)) => llm.clone(),
        (None, None) => anyhow::bail!(
            "No OPENAI_API_KEY configured. Set one, or pass --intent to skip classification"
        ),
    };

    let refiner: Arc<dyn TextRefiner> = match &llm {
        Some(llm) => llm.clone(),
        None => Arc::new(Offline),
    };

    let scheme_guide: Arc<dyn SchemeGuide> = match &llm {
        Some(llm) => llm.clone(),
        None => Arc::new(Offline),
    };

    let mut pipeline = AdvisoryPipeline::new(artifacts, store, classifier, refiner, scheme_guide)
        .with_top_k(args.top_k)
        .with_forecast_window_hours(config.forecast_window_hours.value)
        .with_geocoder(Arc::new(NominatimClient::public()));

    if let Ok(api_key) = std::env::var("OPENWEATHER_API_KEY") {
        pipeline = pipeline.with_weather(Arc::new(OpenWeatherClient::production(api_key)));
    }

    let mut query = AdvisoryQuery::new(args.farmer_id.clone(), args.query.clone());
    if let Some(survey_no) = &args.survey_no {
        query = query.with_survey_no(survey_no.clone());
    }
    if let Some(hint) = &args.irrigation {
        query = query.with_irrigation_hint(hint.clone());
    }

    let response = pipeline.handle(&query).await.context("Advisory pipeline failed")?;

    if output.is_json() {
        return output.result(&response);
    }

    output.section("Advisory");
    output.kv("Intent", response.intent);
    if let Some(crop_name) = &response.crop_name {
        output.kv("Crop", crop_name);
    }

    match &response.reply {
        AdvisoryReply::CropRecommendations { recommendations, text, refined, weather, .. } => {
            output.section("Recommendations");
            for (position, recommendation) in recommendations.iter().enumerate() {
                output.info(format!(
                    "{}. {} ({}, {} season, distance {:.3})",
                    position + 1,
                    recommendation.crop.name,
                    recommendation.crop.crop_type,
                    recommendation.crop.season,
                    recommendation.distance,
                ));
            }
            print_weather(output, weather.as_ref());
            output.section("Message");
            output.info(text);
            if !refined {
                output.warning("Refinement unavailable; showing the plain draft");
            }
        }
        AdvisoryReply::SowingAdvice { crop, findings, text, refined, weather, .. } => {
            output.section(format!("Sowing advice: {}", crop.name));
            for finding in findings {
                output.info(&finding.message);
            }
            print_weather(output, weather.as_ref());
            output.section("Message");
            output.info(text);
            if !refined {
                output.warning("Refinement unavailable; showing the plain draft");
            }
        }
        AdvisoryReply::SchemeGuidance { guidance } => {
            output.section("Scheme guidance");
            for scheme in &guidance.schemes {
                output.info(format!("{} ({:?})", scheme.name, scheme.eligibility));
                output.kv("Documents", scheme.required_documents.join(", "));
                output.kv("Apply", &scheme.application_method);
                output.kv("Help", &scheme.further_help);
            }
            if !guidance.missing_fields.is_empty() {
                output.warning(format!(
                    "Missing profile fields: {}",
                    guidance.missing_fields.join(", ")
                ));
            }
        }
        AdvisoryReply::NotHandled { message, .. }
        | AdvisoryReply::MissingProfile { message, .. }
        | AdvisoryReply::NoSoilData { message }
        | AdvisoryReply::ChooseSoilRecord { message, .. }
        | AdvisoryReply::CropNotRecognized { message, .. }
        | AdvisoryReply::AskCrop { message }
        | AdvisoryReply::InsufficientData { message } => {
            output.warning(message);
        }
    }

    Ok(())
}

fn print_weather(output: &OutputWriter, weather: Option<&krishi_core::models::WeatherSummary>) {
    let Some(weather) = weather else { return };
    output.section("Weather");
    if let Some(temp) = weather.avg_temp_c {
        output.kv("Avg temperature", format!("{:.1} C", temp));
    }
    if let Some(humidity) = weather.avg_humidity_pct {
        output.kv("Avg humidity", format!("{:.0}%", humidity));
    }
    output.kv("Rain expected", weather.rain_expected);
}
