//! Recommendation Engine
//!
//! Two strategies:
//! 1. Rule-based: a fixed table of per-category advice for weak categories,
//!    plus general advice keyed off company size and overall score.
//!    Always available and deterministic.
//! 2. Generated: when a provider is configured, the assessment is summarized
//!    for an external model and its JSON answer is parsed.
//!
//! Any failure of (2) - transport, timeout, unparseable output - falls back
//! to (1). Callers always get a list.

use crate::catalog::Catalog;
use crate::config::{GenerationConfig, DEFAULT_TIMEOUT_SECS};
use crate::error::GenerationError;
use crate::generation::{self, GenerationProvider, OpenAiProvider};
use crate::types::*;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Categories below this percentage are candidates for rule-based advice
pub const WEAK_CATEGORY_MAX: f64 = 60.0;

/// Overall percentage below which a consultation is suggested
pub const CONSULTATION_MAX: f64 = 50.0;

/// Hand-authored advice for one category
#[derive(Debug, Clone)]
pub struct CategoryRule {
    pub category_id: String,
    /// Fires when the category percentage is strictly below this
    pub threshold: f64,
    pub recommendation: Recommendation,
}

#[allow(clippy::too_many_arguments)]
fn rec(
    id: &str,
    category: &str,
    title: (&str, &str),
    description: (&str, &str),
    priority: Level,
    impact: Level,
    effort: Effort,
    timeframe: Timeframe,
    roi: f64,
) -> Recommendation {
    Recommendation {
        id: id.to_string(),
        title: LocalizedText::new(title.0, title.1),
        description: LocalizedText::new(description.0, description.1),
        category: category.to_string(),
        priority,
        impact,
        effort,
        timeframe,
        estimated_roi: Some(roi),
    }
}

fn rule(category_id: &str, threshold: f64, recommendation: Recommendation) -> CategoryRule {
    CategoryRule {
        category_id: category_id.to_string(),
        threshold,
        recommendation,
    }
}

/// The built-in advice table for the e-commerce questionnaire
pub fn default_category_rules() -> Vec<CategoryRule> {
    vec![
        rule(
            "strategy",
            40.0,
            rec(
                "strategy-strategy-doc",
                "strategy",
                (
                    "E-ticaret stratejisi belgesi oluşturun",
                    "Create e-commerce strategy document",
                ),
                (
                    "Şirketinizin e-ticaret vizyonu, hedefleri ve yol haritasını içeren kapsamlı strateji belgesi hazırlayın.",
                    "Prepare a comprehensive strategy document covering your company's e-commerce vision, goals and roadmap.",
                ),
                Level::High,
                Level::High,
                Effort::Medium,
                Timeframe::Short,
                300.0,
            ),
        ),
        rule(
            "technology",
            50.0,
            rec(
                "technology-mobile-optimize",
                "technology",
                ("Mobil optimizasyonu acil olarak yapın", "Urgent mobile optimization"),
                (
                    "E-ticaret sitenizin mobil uyumluluğunu artırın ve sayfa yükleme hızını optimize edin.",
                    "Improve mobile compatibility of your e-commerce site and optimize page loading speed.",
                ),
                Level::High,
                Level::High,
                Effort::Medium,
                Timeframe::Immediate,
                250.0,
            ),
        ),
        rule(
            "marketing",
            60.0,
            rec(
                "marketing-seo-basics",
                "marketing",
                ("Temel SEO optimizasyonu yapın", "Implement basic SEO optimization"),
                (
                    "Site içi SEO, meta etiketleri ve anahtar kelime optimizasyonunu gerçekleştirin.",
                    "Implement on-site SEO, meta tags and keyword optimization.",
                ),
                Level::Medium,
                Level::High,
                Effort::Low,
                Timeframe::Short,
                200.0,
            ),
        ),
        rule(
            "operations",
            50.0,
            rec(
                "operations-inventory-system",
                "operations",
                ("Stok yönetim sistemi kurun", "Set up inventory management system"),
                (
                    "Otomatik stok takibi ve uyarı sistemi ile operasyonel verimliliği artırın.",
                    "Increase operational efficiency with automatic stock tracking and alerts.",
                ),
                Level::High,
                Level::Medium,
                Effort::Medium,
                Timeframe::Medium,
                180.0,
            ),
        ),
        rule(
            "analytics",
            40.0,
            rec(
                "analytics-analytics-setup",
                "analytics",
                (
                    "Google Analytics 4 kurulumu ve konfigürasyonu",
                    "Google Analytics 4 setup and configuration",
                ),
                (
                    "Detaylı e-ticaret takibi için GA4 kurulumu yapın ve temel raporları konfigüre edin.",
                    "Set up GA4 for detailed e-commerce tracking and configure basic reports.",
                ),
                Level::High,
                Level::High,
                Effort::Low,
                Timeframe::Immediate,
                150.0,
            ),
        ),
        rule(
            "customer",
            55.0,
            rec(
                "customer-ux-improvement",
                "customer",
                ("Kullanıcı deneyimi iyileştirmeleri", "User experience improvements"),
                (
                    "Site arama fonksiyonu, ürün filtreleme ve ödeme sürecini iyileştirin.",
                    "Improve site search, product filtering and the checkout process.",
                ),
                Level::Medium,
                Level::High,
                Effort::Medium,
                Timeframe::Medium,
                220.0,
            ),
        ),
        rule(
            "finance",
            50.0,
            rec(
                "finance-payment-options",
                "finance",
                ("Ödeme seçeneklerini çeşitlendirin", "Diversify payment options"),
                (
                    "Kredi kartı, dijital cüzdan ve taksit seçeneklerini ekleyerek dönüşümü artırın.",
                    "Increase conversion by adding credit card, digital wallet and installment options.",
                ),
                Level::Medium,
                Level::Medium,
                Effort::Low,
                Timeframe::Short,
                160.0,
            ),
        ),
    ]
}

/// Advice that does not belong to a single category
fn general_recommendations(result: &AssessmentResult, profile: &CompanyProfile) -> Vec<Recommendation> {
    let mut recommendations = Vec::new();

    if matches!(profile.size, CompanySize::Startup | CompanySize::Small) {
        recommendations.push(rec(
            "general-automation",
            "general",
            ("Temel süreçleri otomatikleştirin", "Automate basic processes"),
            (
                "Sipariş takibi, e-posta pazarlama ve müşteri hizmetleri için temel otomasyon kurun.",
                "Set up basic automation for order tracking, email marketing and customer service.",
            ),
            Level::Medium,
            Level::Medium,
            Effort::Low,
            Timeframe::Short,
            180.0,
        ));
    }

    if result.percentage < CONSULTATION_MAX {
        recommendations.push(rec(
            "general-consultation",
            "general",
            ("E-ticaret danışmanlığı alın", "Get e-commerce consultation"),
            (
                "Uzman bir e-ticaret danışmanından kapsamlı değerlendirme ve yol haritası alın.",
                "Get a comprehensive assessment and roadmap from an expert e-commerce consultant.",
            ),
            Level::High,
            Level::High,
            Effort::Low,
            Timeframe::Immediate,
            400.0,
        ));
    }

    recommendations
}

/// Produces recommendations for a scored assessment
pub struct RecommendationEngine {
    catalog: Arc<Catalog>,
    rules: Vec<CategoryRule>,
    rule_index: HashMap<String, usize>,
    provider: Option<Arc<dyn GenerationProvider>>,
    timeout: Duration,
}

impl RecommendationEngine {
    /// Rule-based only
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let mut engine = Self {
            catalog,
            rules: Vec::new(),
            rule_index: HashMap::new(),
            provider: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };
        engine.set_rules(default_category_rules());
        engine
    }

    /// Rule-based, plus the HTTP provider when an API key is configured
    pub fn from_config(catalog: Arc<Catalog>, config: &GenerationConfig) -> Self {
        let engine = Self::new(catalog);
        if !config.is_enabled() {
            return engine;
        }
        match OpenAiProvider::new(config.clone()) {
            Ok(provider) => engine.with_provider(Arc::new(provider), config.timeout()),
            Err(e) => {
                tracing::warn!("Generation provider unavailable, using rules only: {}", e);
                engine
            }
        }
    }

    pub fn with_provider(mut self, provider: Arc<dyn GenerationProvider>, timeout: Duration) -> Self {
        self.provider = Some(provider);
        self.timeout = timeout;
        self
    }

    /// Replace the advice table
    pub fn with_rules(mut self, rules: Vec<CategoryRule>) -> Self {
        self.set_rules(rules);
        self
    }

    fn set_rules(&mut self, rules: Vec<CategoryRule>) {
        self.rule_index = rules
            .iter()
            .enumerate()
            .map(|(i, r)| (r.category_id.clone(), i))
            .collect();
        self.rules = rules;
    }

    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Generated recommendations when possible, rule-based otherwise.
    /// Never fails.
    pub async fn generate_recommendations(
        &self,
        result: &AssessmentResult,
        profile: &CompanyProfile,
        language: Language,
    ) -> Vec<Recommendation> {
        if self.provider.is_none() {
            return self.rule_based_recommendations(result, profile);
        }

        match self.try_generate(result, profile, language).await {
            Ok(recommendations) => {
                tracing::debug!("Generated {} recommendations", recommendations.len());
                recommendations
            }
            Err(e) => {
                tracing::warn!("Generation failed, falling back to rule-based recommendations: {}", e);
                self.rule_based_recommendations(result, profile)
            }
        }
    }

    /// The generation path alone, with its error
    pub async fn try_generate(
        &self,
        result: &AssessmentResult,
        profile: &CompanyProfile,
        language: Language,
    ) -> Result<Vec<Recommendation>, GenerationError> {
        let provider = self.provider.as_ref().ok_or(GenerationError::MissingCredential)?;
        let prompt = generation::build_prompt(result, profile, &self.catalog, language);

        let text = tokio::time::timeout(self.timeout, provider.generate(&prompt, language))
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout))??;

        generation::parse_recommendations(&text)
    }

    /// Deterministic advice from the rule table
    pub fn rule_based_recommendations(
        &self,
        result: &AssessmentResult,
        profile: &CompanyProfile,
    ) -> Vec<Recommendation> {
        let mut recommendations = Vec::new();

        for score in result
            .category_scores
            .iter()
            .filter(|s| s.percentage < WEAK_CATEGORY_MAX)
        {
            if self.catalog.category(&score.category_id).is_none() {
                continue;
            }
            let Some(&i) = self.rule_index.get(&score.category_id) else {
                continue;
            };
            let rule = &self.rules[i];
            if score.percentage < rule.threshold {
                recommendations.push(rule.recommendation.clone());
            }
        }

        recommendations.extend(general_recommendations(result, profile));
        recommendations
    }
}
