//! maturity - E-commerce maturity assessment CLI
//!
//! Prints JSON on stdout; logs go to stderr (set `RUST_LOG=debug` for detail).
//!
//! Run with: cargo run -- assess --answers answers.json --profile company.json

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use maturity_engine::{
    ActionConstraints, Answer, AnswerValue, Catalog, CompanyProfile, EngineConfig, GenerationConfig,
    Language, MaturityEngine, Plan,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "maturity")]
#[command(version, about = "E-commerce maturity scoring and recommendations", long_about = None)]
#[command(after_help = "EXAMPLES:
    # Questions for the e-commerce plan
    maturity questions --plan ecommerce

    # Scores only
    maturity score --answers answers.json

    # Full report without calling the generation API
    maturity assess --answers answers.json --profile company.json --budget 500 --timeframe 6 --offline")]
struct Cli {
    /// Catalog JSON to use instead of the bundled questionnaire
    #[arg(long, global = true, env = "MATURITY_CATALOG")]
    catalog: Option<PathBuf>,

    /// Path to configuration file
    #[arg(long, global = true, env = "MATURITY_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the questions a plan asks
    Questions {
        /// free_trial, ecommerce, eexport or combined
        #[arg(short, long, default_value = "combined")]
        plan: Plan,
    },

    /// Score an answer file
    Score {
        /// JSON array of answers, or an object mapping question id to yes/no/unknown
        #[arg(short, long)]
        answers: PathBuf,
    },

    /// Score, recommend and prioritize
    Assess {
        #[arg(short, long)]
        answers: PathBuf,

        /// Company profile JSON
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Available budget
        #[arg(long)]
        budget: Option<f64>,

        /// Available time in months
        #[arg(long)]
        timeframe: Option<u32>,

        /// Output language: tr or en
        #[arg(short, long, default_value = "tr")]
        language: Language,

        /// Use the rule table only, never call the generation API
        #[arg(long)]
        offline: bool,
    },
}

/// Answer files come either as full answer records or as a flat id → value map
#[derive(Deserialize)]
#[serde(untagged)]
enum AnswersFile {
    List(Vec<Answer>),
    Map(BTreeMap<String, AnswerValue>),
}

impl From<AnswersFile> for Vec<Answer> {
    fn from(file: AnswersFile) -> Self {
        match file {
            AnswersFile::List(answers) => answers,
            AnswersFile::Map(map) => map
                .into_iter()
                .map(|(id, value)| Answer::new(id, value))
                .collect(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Questions { plan } => {
            let engine = build_engine(cli.catalog.as_deref(), cli.config.as_deref(), true)?;
            run_questions(&engine, plan)
        }
        Commands::Score { answers } => {
            let engine = build_engine(cli.catalog.as_deref(), cli.config.as_deref(), true)?;
            run_score(&engine, &answers)
        }
        Commands::Assess {
            answers,
            profile,
            budget,
            timeframe,
            language,
            offline,
        } => {
            let engine = build_engine(cli.catalog.as_deref(), cli.config.as_deref(), offline)?;
            let constraints = ActionConstraints {
                budget,
                timeframe,
                resources: Vec::new(),
            };
            run_assess(&engine, &answers, profile.as_deref(), &constraints, language).await
        }
    }
}

fn build_engine(catalog_path: Option<&Path>, config_path: Option<&Path>, offline: bool) -> Result<MaturityEngine> {
    let mut config = EngineConfig::load(config_path).context("Failed to load config")?;
    if offline {
        config.generation = GenerationConfig::disabled();
    }

    let catalog = match catalog_path {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read catalog {}", path.display()))?;
            Catalog::from_json(&json).with_context(|| format!("Invalid catalog {}", path.display()))?
        }
        None => Catalog::bundled().context("Bundled catalog is invalid")?,
    };

    Ok(MaturityEngine::new(catalog, config))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} file {}", what, path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid {} file {}", what, path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn run_questions(engine: &MaturityEngine, plan: Plan) -> Result<()> {
    let questions = engine.questions_for(plan);
    let (low, high) = plan.estimated_minutes();

    print_json(&serde_json::json!({
        "plan": plan,
        "expectedQuestionCount": plan.expected_question_count(),
        "estimatedMinutes": { "min": low, "max": high },
        "questionCount": questions.len(),
        "questions": questions,
    }))
}

fn run_score(engine: &MaturityEngine, answers_path: &Path) -> Result<()> {
    let answers: Vec<Answer> = read_json::<AnswersFile>(answers_path, "answers")?.into();
    let result = engine.score(&answers);
    print_json(&result)
}

async fn run_assess(
    engine: &MaturityEngine,
    answers_path: &Path,
    profile_path: Option<&Path>,
    constraints: &ActionConstraints,
    language: Language,
) -> Result<()> {
    let answers: Vec<Answer> = read_json::<AnswersFile>(answers_path, "answers")?.into();
    let profile: CompanyProfile = match profile_path {
        Some(path) => read_json(path, "profile")?,
        None => CompanyProfile::default(),
    };

    let report = engine.assess(&answers, &profile, constraints, language).await;
    print_json(&report)
}
