//! Nutrition lookup
//!
//! Resolves a free-text food description ("2 eggs and toast") to
//! macronutrients through the Nutritionix natural-language endpoint. A
//! failed lookup is an `ExternalService` error that callers treat as
//! "no nutrition data"; it never aborts the surrounding write.

use std::time::Duration;

use serde::Deserialize;

use crate::config::settings::NutritionSettings;
use crate::error::{AimsError, AimsResult};
use crate::models::Nutrition;

/// Anything that can turn a food description into macronutrients
pub trait NutritionLookup {
    fn lookup(&self, query: &str) -> AimsResult<Nutrition>;
}

#[derive(Debug, Deserialize)]
struct NutrientsResponse {
    #[serde(default)]
    foods: Vec<FoodItem>,
}

#[derive(Debug, Deserialize)]
struct FoodItem {
    #[serde(default)]
    nf_calories: Option<f64>,
    #[serde(default)]
    nf_protein: Option<f64>,
    #[serde(default)]
    nf_total_carbohydrate: Option<f64>,
    #[serde(default)]
    nf_total_fat: Option<f64>,
}

/// Read the first food's macronutrients from a response body
pub(crate) fn parse_nutrients(body: &str) -> AimsResult<Nutrition> {
    let response: NutrientsResponse = serde_json::from_str(body)
        .map_err(|e| AimsError::ExternalService(format!("Unexpected nutrition response: {}", e)))?;

    let food = response
        .foods
        .into_iter()
        .next()
        .ok_or_else(|| AimsError::ExternalService("No foods matched the description".into()))?;

    Ok(Nutrition {
        calories: food.nf_calories.unwrap_or(0.0),
        protein: food.nf_protein.unwrap_or(0.0),
        carbs: food.nf_total_carbohydrate.unwrap_or(0.0),
        fats: food.nf_total_fat.unwrap_or(0.0),
    })
}

/// Blocking Nutritionix client (single attempt, no retry)
pub struct NutritionixClient {
    http: reqwest::blocking::Client,
    endpoint: String,
    app_id: String,
    api_key: String,
}

impl NutritionixClient {
    pub fn new(
        endpoint: impl Into<String>,
        app_id: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> AimsResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AimsError::ExternalService(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: endpoint.into(),
            app_id: app_id.into(),
            api_key: api_key.into(),
        })
    }

    /// Build a client from settings and the credential env vars they name
    ///
    /// Returns `None` when lookups are disabled or credentials are missing,
    /// in which case entries are saved without nutrition.
    pub fn from_settings(settings: &NutritionSettings) -> AimsResult<Option<Self>> {
        if !settings.enabled {
            return Ok(None);
        }

        let app_id = std::env::var(&settings.app_id_env).ok().filter(|v| !v.trim().is_empty());
        let api_key = std::env::var(&settings.api_key_env).ok().filter(|v| !v.trim().is_empty());

        match (app_id, api_key) {
            (Some(app_id), Some(api_key)) => Ok(Some(Self::new(
                settings.endpoint.clone(),
                app_id,
                api_key,
                Duration::from_secs(settings.timeout_secs),
            )?)),
            _ => {
                log::debug!(
                    "Nutrition lookup disabled: {} or {} not set",
                    settings.app_id_env,
                    settings.api_key_env
                );
                Ok(None)
            }
        }
    }
}

impl NutritionLookup for NutritionixClient {
    fn lookup(&self, query: &str) -> AimsResult<Nutrition> {
        let response = self
            .http
            .post(&self.endpoint)
            .header("x-app-id", &self.app_id)
            .header("x-app-key", &self.api_key)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .map_err(|e| AimsError::ExternalService(format!("Nutrition request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AimsError::ExternalService(format!(
                "Nutrition service returned {}",
                status
            )));
        }

        let body = response
            .text()
            .map_err(|e| AimsError::ExternalService(format!("Failed to read nutrition response: {}", e)))?;

        parse_nutrients(&body)
    }
}
