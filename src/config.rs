//! Runtime configuration utilities for topicena.

use std::{
    env,
    fmt,
    path::PathBuf,
    str::FromStr,
};

use anyhow::{anyhow, Context};
use serde::Deserialize;

/// Stop-word handling for the topic model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Drop common English function words before vectorising.
    English,
    /// Keep every token; reflections may mix languages.
    Multilingual,
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> anyhow::Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(Self::English),
            "multilingual" | "multi" => Ok(Self::Multilingual),
            other => Err(anyhow!("unsupported topic model language '{other}'")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::English => f.write_str("english"),
            Self::Multilingual => f.write_str("multilingual"),
        }
    }
}

/// Tunables for the density-based topic model.
#[derive(Debug, Clone, Deserialize)]
pub struct TopicModelParams {
    /// Smallest number of documents that may form a topic.
    pub min_topic_size: usize,
    /// Words kept in each topic's representation.
    pub top_n_words: usize,
    /// Neighbourhood radius between normalised document vectors.
    pub tolerance: f64,
    /// Stop-word handling.
    pub language: Language,
}

impl Default for TopicModelParams {
    fn default() -> Self {
        Self {
            min_topic_size: 3,
            top_n_words: 10,
            tolerance: 1.2,
            language: Language::Multilingual,
        }
    }
}

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Raw reflections table fed to the clustering stage.
    pub input_path: PathBuf,
    /// Network matrix written by stage 1 and read by stage 2.
    pub matrix_path: PathBuf,
    /// Root folder for downstream analysis outputs.
    pub outputs_dir: PathBuf,
    /// Program and leading arguments of the clustering stage. Empty means
    /// this binary's own `cluster` subcommand.
    pub cluster_command: Vec<String>,
    /// Interpreter for the downstream network analysis stage.
    pub analysis_program: String,
    /// Script handed to the analysis interpreter.
    pub analysis_script: PathBuf,
    pub topic_model: TopicModelParams,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from("data/raw/topicena_input_filtered.csv"),
            matrix_path: PathBuf::from("data/processed/topic_matrix.csv"),
            outputs_dir: PathBuf::from("outputs"),
            cluster_command: Vec::new(),
            analysis_program: "Rscript".to_string(),
            analysis_script: PathBuf::from("scripts/3DENA_script.R"),
            topic_model: TopicModelParams::default(),
        }
    }
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Self::default();

        let input_path = env::var("TOPICENA_INPUT")
            .map(PathBuf::from)
            .unwrap_or(defaults.input_path);
        let matrix_path = env::var("TOPICENA_MATRIX")
            .map(PathBuf::from)
            .unwrap_or(defaults.matrix_path);
        let outputs_dir = env::var("TOPICENA_OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.outputs_dir);
        let cluster_command = env::var("TOPICENA_CLUSTER_CMD")
            .map(|cmd| cmd.split_whitespace().map(str::to_string).collect())
            .unwrap_or(defaults.cluster_command);
        let analysis_program =
            env::var("TOPICENA_ANALYSIS_PROGRAM").unwrap_or(defaults.analysis_program);
        let analysis_script = env::var("TOPICENA_ANALYSIS_SCRIPT")
            .map(PathBuf::from)
            .unwrap_or(defaults.analysis_script);

        let model_defaults = defaults.topic_model;
        let min_topic_size = env::var("TOPICENA_MIN_TOPIC_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(model_defaults.min_topic_size);
        let top_n_words = env::var("TOPICENA_TOP_N_WORDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(model_defaults.top_n_words);
        let tolerance = env::var("TOPICENA_CLUSTER_TOLERANCE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(model_defaults.tolerance);
        let language = match env::var("TOPICENA_LANGUAGE") {
            Ok(raw) => raw.parse().context("parsing TOPICENA_LANGUAGE")?,
            Err(_) => model_defaults.language,
        };

        Ok(Self {
            input_path,
            matrix_path,
            outputs_dir,
            cluster_command,
            analysis_program,
            analysis_script,
            topic_model: TopicModelParams {
                min_topic_size,
                top_n_words,
                tolerance,
                language,
            },
        })
    }
}
