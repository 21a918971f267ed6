//! CI Monitor - dashboard backend for code changes, CI jobs and projects
//!
//! This library provides the models, data sources and HTTP handlers for the
//! service. Records are either synthesized by a seeded generator or proxied
//! from an upstream CI API.

use std::sync::Arc;

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

pub use config::{Config, DataMode};
pub use error::AppError;

pub use models::{ChangeDocument, Job, ListResponse, Pagination, Project, ProjectStep, Stage};

pub use services::{
    CiDataSource, DataSourceError, MockDataGenerator, MockDataSource, UpstreamDataSource,
    build_data_source,
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub data_source: Arc<dyn CiDataSource>,
}

impl AppState {
    /// State with the data source selected by `config`
    pub fn from_config(config: Config) -> Result<Self, DataSourceError> {
        let data_source = build_data_source(&config)?;
        Ok(Self {
            config,
            data_source,
        })
    }
}
