//! Recommendation generation via an external text model
//!
//! The model gets a summary of the assessment and is asked for a JSON array
//! of recommendations. Responses often wrap the array in prose, so only the
//! text between the first `[` and the last `]` is parsed.

use crate::catalog::Catalog;
use crate::config::GenerationConfig;
use crate::error::GenerationError;
use crate::types::*;
use async_trait::async_trait;
use serde::Deserialize;

/// Anything that can turn a prompt into text
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    async fn generate(&self, prompt: &str, language: Language) -> Result<String, GenerationError>;
}

/// OpenAI-compatible chat completions endpoint
pub struct OpenAiProvider {
    client: reqwest::Client,
    config: GenerationConfig,
}

impl OpenAiProvider {
    pub fn new(config: GenerationConfig) -> Result<Self, GenerationError> {
        if !config.is_enabled() {
            return Err(GenerationError::MissingCredential);
        }
        let client = reqwest::Client::builder().timeout(config.timeout()).build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.config.api_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl GenerationProvider for OpenAiProvider {
    async fn generate(&self, prompt: &str, language: Language) -> Result<String, GenerationError> {
        let request_body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "system",
                    "content": system_message(language)
                },
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "temperature": self.config.temperature,
            "max_tokens": self.config.max_tokens
        });

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let json: serde_json::Value = response.json().await?;
        json["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or(GenerationError::EmptyContent)
    }
}

fn system_message(language: Language) -> &'static str {
    match language {
        Language::Tr => "Sen uzman bir e-ticaret danışmanısın. JSON formatında detaylı ve uygulanabilir öneriler üretiyorsun.",
        Language::En => "You are an expert e-commerce consultant. You generate detailed and actionable recommendations in JSON format.",
    }
}

/// Build the prompt summarizing an assessment
pub fn build_prompt(
    result: &AssessmentResult,
    profile: &CompanyProfile,
    catalog: &Catalog,
    language: Language,
) -> String {
    let category_analysis = result
        .category_scores
        .iter()
        .map(|score| {
            let name = catalog
                .category(&score.category_id)
                .map(|c| c.name.get(language))
                .unwrap_or(score.category_id.as_str());
            format!("{}: {:.1}%", name, score.percentage)
        })
        .collect::<Vec<_>>()
        .join(", ");

    let revenue = profile.annual_revenue.as_deref();

    match language {
        Language::Tr => format!(
            r#"E-ticaret olgunluk değerlendirmesi için öneriler üret.

Şirket Profili:
- Sektör: {industry}
- Büyüklük: {size}
- Yıllık Ciro: {revenue}

Değerlendirme Sonuçları:
- Genel Skor: {percentage:.1}%
- Olgunluk Seviyesi: {level}
- Kategori Skorları: {categories}
- Güçlü Yönler: {strengths}
- Zayıf Yönler: {weaknesses}
- Kritik Aksiyonlar: {critical}

Lütfen JSON dizisi olarak 5-8 adet spesifik, uygulanabilir öneri üret. Her öneri şu formatta olmalı:
{{
  "title": {{"tr": "Türkçe başlık", "en": "English title"}},
  "description": {{"tr": "Türkçe açıklama", "en": "English description"}},
  "category": "kategori_id",
  "priority": "high|medium|low",
  "impact": "high|medium|low",
  "effort": "low|medium|high",
  "timeframe": "immediate|short|medium|long",
  "estimatedROI": sayı
}}"#,
            industry = profile.industry,
            size = profile.size.name(),
            revenue = revenue.unwrap_or("Belirtilmemiş"),
            percentage = result.percentage,
            level = result.maturity_level,
            categories = category_analysis,
            strengths = result.strengths.join(", "),
            weaknesses = result.weaknesses.join(", "),
            critical = result.critical_actions.join(", "),
        ),
        Language::En => format!(
            r#"Generate recommendations for an e-commerce maturity assessment.

Company Profile:
- Industry: {industry}
- Size: {size}
- Annual Revenue: {revenue}

Assessment Results:
- Overall Score: {percentage:.1}%
- Maturity Level: {level}
- Category Scores: {categories}
- Strengths: {strengths}
- Weaknesses: {weaknesses}
- Critical Actions: {critical}

Please generate 5-8 specific, actionable recommendations as a JSON array. Each recommendation should have this format:
{{
  "title": {{"tr": "Turkish title", "en": "English title"}},
  "description": {{"tr": "Turkish description", "en": "English description"}},
  "category": "category_id",
  "priority": "high|medium|low",
  "impact": "high|medium|low",
  "effort": "low|medium|high",
  "timeframe": "immediate|short|medium|long",
  "estimatedROI": number
}}"#,
            industry = profile.industry,
            size = profile.size.name(),
            revenue = revenue.unwrap_or("Not specified"),
            percentage = result.percentage,
            level = result.maturity_level,
            categories = category_analysis,
            strengths = result.strengths.join(", "),
            weaknesses = result.weaknesses.join(", "),
            critical = result.critical_actions.join(", "),
        ),
    }
}

/// Models sometimes answer with a bare string instead of both languages
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GeneratedText {
    Localized(LocalizedText),
    Plain(String),
}

impl From<GeneratedText> for LocalizedText {
    fn from(text: GeneratedText) -> Self {
        match text {
            GeneratedText::Localized(t) => t,
            GeneratedText::Plain(s) => LocalizedText::new(s.clone(), s),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedRecommendation {
    title: GeneratedText,
    description: GeneratedText,
    category: String,
    priority: Level,
    impact: Level,
    effort: Effort,
    timeframe: Timeframe,
    #[serde(rename = "estimatedROI", default)]
    estimated_roi: Option<f64>,
}

/// Extract recommendations from free-form model output
pub fn parse_recommendations(text: &str) -> Result<Vec<Recommendation>, GenerationError> {
    let start = text.find('[').ok_or(GenerationError::NoJsonArray)?;
    let end = text.rfind(']').ok_or(GenerationError::NoJsonArray)?;
    if end < start {
        return Err(GenerationError::NoJsonArray);
    }

    let raw: Vec<GeneratedRecommendation> = serde_json::from_str(&text[start..=end])?;
    if raw.is_empty() {
        return Err(GenerationError::NoRecommendations);
    }

    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(index, rec)| Recommendation {
            id: format!("ai-recommendation-{}", index),
            title: rec.title.into(),
            description: rec.description.into(),
            category: rec.category,
            priority: rec.priority,
            impact: rec.impact,
            effort: rec.effort,
            timeframe: rec.timeframe,
            estimated_roi: rec.estimated_roi,
        })
        .collect())
}
