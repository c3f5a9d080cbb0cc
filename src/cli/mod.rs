//! CLI module for the RAG chat gateway
//!
//! Provides subcommands for running the gateway in different modes:
//! - `serve`: API + UI combined (default)
//! - `api`: API server only
//! - `ui`: UI server with API proxy

pub mod api;
pub mod serve;
pub mod ui;

use clap::{Parser, Subcommand};

/// RAG chat gateway - knowledge base retrieval and model generation over AWS Bedrock
#[derive(Parser)]
#[command(name = "rag-gateway")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run API + UI server combined
    Serve,

    /// Run API server only
    Api,

    /// Run UI server with API proxy
    Ui(ui::UiArgs),
}
