//! TopicENA: cluster free-text reflections into topics and reshape the
//! assignments into a one-hot unit × code matrix for epistemic network analysis.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod network;
pub mod nlp;
pub mod pipeline;
