//! Record sources behind the HTTP handlers
//!
//! The data mode is chosen once at startup. Handlers only see
//! `Arc<dyn CiDataSource>` and apply filtering and pagination themselves,
//! so both sources feed the same query pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, DurationRound, Utc};
use tracing::info;

use crate::config::{Config, DataMode, MockConfig};
use crate::models::{ChangeDocument, Job, Project, ProjectStep, Stage};
use crate::services::mock_data::MockDataGenerator;
use crate::services::upstream::{UpstreamClient, UpstreamError};

#[derive(Debug, thiserror::Error)]
pub enum DataSourceError {
    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// Source of CI records
///
/// List methods return the unfiltered record set; `query` is the raw request
/// query string, forwarded verbatim by sources that proxy another API.
/// Lookups return `Ok(None)` when the record does not exist.
#[async_trait]
pub trait CiDataSource: Send + Sync {
    fn mode(&self) -> DataMode;

    async fn change_documents(&self, query: &str) -> Result<Vec<ChangeDocument>, DataSourceError>;

    async fn change_document(&self, id: &str) -> Result<Option<ChangeDocument>, DataSourceError>;

    /// Projects built for a change
    async fn change_document_projects(
        &self,
        change_id: &str,
    ) -> Result<Option<Vec<Project>>, DataSourceError>;

    async fn jobs(&self, query: &str) -> Result<Vec<Job>, DataSourceError>;

    async fn job(&self, id: &str) -> Result<Option<Job>, DataSourceError>;

    /// Builds of the job named `job_name`, newest first
    async fn builds(&self, job_name: &str, query: &str) -> Result<Vec<Job>, DataSourceError>;

    async fn build(&self, job_name: &str, build_num: u32) -> Result<Option<Job>, DataSourceError>;

    async fn stage(
        &self,
        job_name: &str,
        build_num: u32,
        stage_name: &str,
    ) -> Result<Option<Stage>, DataSourceError>;

    async fn projects(&self, query: &str) -> Result<Vec<Project>, DataSourceError>;

    async fn project(&self, id: &str) -> Result<Option<Project>, DataSourceError>;

    async fn project_step(
        &self,
        project_id: &str,
        step_name: &str,
        change_id: Option<&str>,
    ) -> Result<Option<ProjectStep>, DataSourceError>;

    /// Job that executed a project step
    async fn project_step_job(
        &self,
        project_id: &str,
        step_name: &str,
    ) -> Result<Option<Job>, DataSourceError>;
}

/// Reference time for mock records: the start of the hour containing `now`
pub fn hour_anchor(now: DateTime<Utc>) -> DateTime<Utc> {
    now.duration_trunc(Duration::hours(1)).unwrap_or(now)
}

/// Serves records from the seeded generator
///
/// Unless built with a fixed generator, the reference time is the current
/// hour at the time of each request. Lists and lookups agree within an
/// hour, and timestamps move forward with the clock.
#[derive(Debug, Clone)]
pub struct MockDataSource {
    config: MockConfig,
    fixed: Option<MockDataGenerator>,
}

impl MockDataSource {
    pub fn new(config: MockConfig) -> Self {
        Self {
            config,
            fixed: None,
        }
    }

    /// Source pinned to `generator`'s seed and reference time
    pub fn with_generator(generator: MockDataGenerator, config: MockConfig) -> Self {
        Self {
            config,
            fixed: Some(generator),
        }
    }

    /// Generator for the current request
    pub fn generator(&self) -> MockDataGenerator {
        match self.fixed {
            Some(generator) => generator,
            None => MockDataGenerator::new(self.config.seed, hour_anchor(Utc::now())),
        }
    }
}

#[async_trait]
impl CiDataSource for MockDataSource {
    fn mode(&self) -> DataMode {
        DataMode::Mock
    }

    async fn change_documents(&self, _query: &str) -> Result<Vec<ChangeDocument>, DataSourceError> {
        Ok(self
            .generator()
            .change_documents(self.config.change_document_count))
    }

    async fn change_document(&self, id: &str) -> Result<Option<ChangeDocument>, DataSourceError> {
        Ok(self
            .generator()
            .change_document_by_id(id, self.config.change_document_count))
    }

    async fn change_document_projects(
        &self,
        change_id: &str,
    ) -> Result<Option<Vec<Project>>, DataSourceError> {
        Ok(Some(self.generator().projects_for_change(change_id)))
    }

    async fn jobs(&self, _query: &str) -> Result<Vec<Job>, DataSourceError> {
        Ok(self.generator().jobs(self.config.job_count))
    }

    async fn job(&self, id: &str) -> Result<Option<Job>, DataSourceError> {
        Ok(self.generator().job_by_id(id))
    }

    async fn builds(&self, job_name: &str, _query: &str) -> Result<Vec<Job>, DataSourceError> {
        Ok(self
            .generator()
            .builds_for_job(job_name, self.config.job_count))
    }

    async fn build(&self, job_name: &str, build_num: u32) -> Result<Option<Job>, DataSourceError> {
        Ok(Some(self.generator().find_build(
            job_name,
            build_num,
            self.config.job_count,
        )))
    }

    async fn stage(
        &self,
        job_name: &str,
        build_num: u32,
        stage_name: &str,
    ) -> Result<Option<Stage>, DataSourceError> {
        Ok(self
            .generator()
            .find_stage(job_name, build_num, stage_name, self.config.job_count))
    }

    async fn projects(&self, _query: &str) -> Result<Vec<Project>, DataSourceError> {
        Ok(self.generator().projects(self.config.project_count))
    }

    async fn project(&self, id: &str) -> Result<Option<Project>, DataSourceError> {
        Ok(self.generator().project_by_id(id))
    }

    async fn project_step(
        &self,
        project_id: &str,
        step_name: &str,
        change_id: Option<&str>,
    ) -> Result<Option<ProjectStep>, DataSourceError> {
        Ok(self.generator().project_step(project_id, step_name, change_id))
    }

    async fn project_step_job(
        &self,
        project_id: &str,
        step_name: &str,
    ) -> Result<Option<Job>, DataSourceError> {
        Ok(Some(
            self.generator().job_for_project_step(project_id, step_name),
        ))
    }
}

/// Proxies every request to the upstream CI API
#[derive(Debug, Clone)]
pub struct UpstreamDataSource {
    client: UpstreamClient,
}

impl UpstreamDataSource {
    pub fn new(client: UpstreamClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl CiDataSource for UpstreamDataSource {
    fn mode(&self) -> DataMode {
        DataMode::Upstream
    }

    async fn change_documents(&self, query: &str) -> Result<Vec<ChangeDocument>, DataSourceError> {
        Ok(self
            .client
            .fetch_list(&["api", "change-documents"], query)
            .await?)
    }

    async fn change_document(&self, id: &str) -> Result<Option<ChangeDocument>, DataSourceError> {
        Ok(self
            .client
            .fetch_entity(&["api", "change-documents", id])
            .await?)
    }

    async fn change_document_projects(
        &self,
        change_id: &str,
    ) -> Result<Option<Vec<Project>>, DataSourceError> {
        Ok(self
            .client
            .fetch_entity(&["api", "change-documents", change_id, "projects"])
            .await?)
    }

    async fn jobs(&self, query: &str) -> Result<Vec<Job>, DataSourceError> {
        Ok(self.client.fetch_list(&["api", "jobs"], query).await?)
    }

    async fn job(&self, id: &str) -> Result<Option<Job>, DataSourceError> {
        Ok(self.client.fetch_entity(&["api", "jobs", id]).await?)
    }

    async fn builds(&self, job_name: &str, query: &str) -> Result<Vec<Job>, DataSourceError> {
        Ok(self
            .client
            .fetch_list(&["api", "jobs", job_name, "builds"], query)
            .await?)
    }

    async fn build(&self, job_name: &str, build_num: u32) -> Result<Option<Job>, DataSourceError> {
        let build_num = build_num.to_string();
        Ok(self
            .client
            .fetch_entity(&["api", "jobs", job_name, "builds", &build_num])
            .await?)
    }

    async fn stage(
        &self,
        job_name: &str,
        build_num: u32,
        stage_name: &str,
    ) -> Result<Option<Stage>, DataSourceError> {
        let build_num = build_num.to_string();
        Ok(self
            .client
            .fetch_entity(&[
                "api", "jobs", job_name, "builds", &build_num, "stages", stage_name,
            ])
            .await?)
    }

    async fn projects(&self, query: &str) -> Result<Vec<Project>, DataSourceError> {
        Ok(self.client.fetch_list(&["api", "projects"], query).await?)
    }

    async fn project(&self, id: &str) -> Result<Option<Project>, DataSourceError> {
        Ok(self.client.fetch_entity(&["api", "projects", id]).await?)
    }

    async fn project_step(
        &self,
        project_id: &str,
        step_name: &str,
        change_id: Option<&str>,
    ) -> Result<Option<ProjectStep>, DataSourceError> {
        let segments = ["api", "projects", project_id, "steps", step_name];
        let params: Vec<(&str, &str)> = change_id.map(|id| ("changeId", id)).into_iter().collect();
        Ok(self
            .client
            .fetch_entity_with_params(&segments, &params)
            .await?)
    }

    async fn project_step_job(
        &self,
        project_id: &str,
        step_name: &str,
    ) -> Result<Option<Job>, DataSourceError> {
        Ok(self
            .client
            .fetch_entity(&["api", "projects", project_id, "steps", step_name, "job"])
            .await?)
    }
}

/// Build the data source selected by `config.data_mode`
pub fn build_data_source(config: &Config) -> Result<Arc<dyn CiDataSource>, DataSourceError> {
    match config.data_mode {
        DataMode::Mock => {
            let source = MockDataSource::new(config.mock);
            info!(
                seed = config.mock.seed,
                anchor = %source.generator().now(),
                "Serving mock CI data, anchored to the current hour"
            );
            Ok(Arc::new(source))
        }
        DataMode::Upstream => {
            let client = UpstreamClient::new(&config.upstream_base_url)?;
            info!(base_url = %client.base_url(), "Proxying CI data from upstream");
            Ok(Arc::new(UpstreamDataSource::new(client)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, HttpResponse, HttpServer, web};
    use chrono::TimeZone;
    use serde_json::{Value, json};

    use crate::models::{
        BuildResult, ChangeDocumentFilters, ChangeStatus, JobFilters, JobStatus, StepStatus,
    };
    use crate::services::query::filter;

    fn mock_source() -> MockDataSource {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        MockDataSource::with_generator(MockDataGenerator::new(0, now), MockConfig::default())
    }

    #[actix_web::test]
    async fn test_mock_lists_use_configured_counts() {
        let source = mock_source();

        assert_eq!(source.change_documents("").await.unwrap().len(), 50);
        assert_eq!(source.jobs("").await.unwrap().len(), 30);
        assert_eq!(source.projects("").await.unwrap().len(), 10);
    }

    #[actix_web::test]
    async fn test_mock_lookups() {
        let source = mock_source();

        assert!(source.change_document("doc-1042").await.unwrap().is_some());
        assert!(source.change_document("doc-9999").await.unwrap().is_none());
        assert!(source.job("job-10003").await.unwrap().is_some());
        assert!(source.job("latest").await.unwrap().is_none());
        assert_eq!(
            source.change_document_projects("anything").await.unwrap().map(|p| p.len()),
            Some(3)
        );

        let build = source.build("missing-job", 5).await.unwrap().unwrap();
        assert_eq!(build.job_name, "missing-job");
        assert_eq!(build.build_num, 5);
    }

    #[test]
    fn test_hour_anchor_truncates() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 41, 17).unwrap();
        assert_eq!(hour_anchor(now), Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap());

        let later = now + Duration::days(3);
        assert_eq!(hour_anchor(later), Utc.with_ymd_and_hms(2026, 3, 4, 9, 0, 0).unwrap());
    }

    #[actix_web::test]
    async fn test_mock_new_follows_clock() {
        let source = MockDataSource::new(MockConfig::default());

        let before = hour_anchor(Utc::now());
        let anchor = source.generator().now();
        let after = hour_anchor(Utc::now());

        assert_eq!(anchor.timestamp() % 3600, 0);
        assert!(anchor == before || anchor == after);
        assert_eq!(source.mode(), DataMode::Mock);
    }

    #[test]
    fn test_with_generator_keeps_fixed_clock() {
        let source = mock_source();
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();

        assert_eq!(source.generator().now(), now);
        assert_eq!(source.generator().job(3), source.generator().job(3));
    }

    #[test]
    fn test_build_data_source_follows_mode() {
        let mut config = Config::default();
        assert_eq!(build_data_source(&config).unwrap().mode(), DataMode::Mock);

        config.data_mode = DataMode::Upstream;
        config.upstream_base_url = "http://localhost:3000".to_string();
        assert_eq!(build_data_source(&config).unwrap().mode(), DataMode::Upstream);

        config.upstream_base_url = "::not a url::".to_string();
        assert!(matches!(
            build_data_source(&config),
            Err(DataSourceError::Upstream(UpstreamError::InvalidBaseUrl(_)))
        ));
    }

    /// Records carrying statuses the dashboard has no name for
    fn unfamiliar_records() -> (Value, Value, Value) {
        let generator = mock_source().generator();

        let mut doc = serde_json::to_value(generator.change_document(0)).unwrap();
        doc["status"] = json!("NEW");
        doc["current_state"]["ci_status"] = json!("UNSTABLE");
        doc["total_ci"][0]["build_ret"] = json!("FAILURE");
        doc["total_ci"][0]["job_type"] = json!("nightly_ci");
        doc["votes"][0]["type"] = json!("Library-Compliance");

        let mut job = serde_json::to_value(generator.job(2)).unwrap();
        job["status"] = json!("UNSTABLE");
        job["stages"][0]["status"] = json!("WARNING");
        job["vote_result"]["type"] = json!("SECURITY_REVIEW");

        let mut project = serde_json::to_value(generator.project(0)).unwrap();
        project["status"] = json!("skipped");
        project["steps"][0]["status"] = json!("cancelled");

        (doc, job, project)
    }

    /// Serve a canned upstream API on an ephemeral port
    fn spawn_upstream() -> String {
        let job = serde_json::to_value(mock_source().generator().job(1)).unwrap();
        let listed = json!({ "data": [job.clone(), job.clone()] });
        let wrapped = json!({ "data": job.clone() });
        let (odd_doc, odd_job, odd_project) = unfamiliar_records();
        let odd_docs = json!({ "data": [odd_doc] });
        let odd_job = json!({ "data": odd_job });
        let odd_projects = json!({ "data": [odd_project] });

        let server = HttpServer::new(move || {
            let listed = listed.clone();
            let wrapped = wrapped.clone();
            let bare = job.clone();
            let odd_docs = odd_docs.clone();
            let odd_job = odd_job.clone();
            let odd_projects = odd_projects.clone();
            App::new()
                .route(
                    "/api/change-documents",
                    web::get().to(move || {
                        let body = odd_docs.clone();
                        async move { HttpResponse::Ok().json(body) }
                    }),
                )
                .route(
                    "/api/jobs/job-10002",
                    web::get().to(move || {
                        let body = odd_job.clone();
                        async move { HttpResponse::Ok().json(body) }
                    }),
                )
                .route(
                    "/api/change-documents/{id}/projects",
                    web::get().to(move || {
                        let body = odd_projects.clone();
                        async move { HttpResponse::Ok().json(body) }
                    }),
                )
                .route(
                    "/api/jobs",
                    web::get().to(move || {
                        let body = listed.clone();
                        async move { HttpResponse::Ok().json(body) }
                    }),
                )
                .route(
                    "/api/jobs/job-10001",
                    web::get().to(move || {
                        let body = wrapped.clone();
                        async move { HttpResponse::Ok().json(body) }
                    }),
                )
                .route(
                    "/api/jobs/{name}/builds/{num}",
                    web::get().to(move || {
                        let body = bare.clone();
                        async move { HttpResponse::Ok().json(body) }
                    }),
                )
                .route(
                    "/api/projects/{id}",
                    web::get().to(|| async { HttpResponse::Ok().json(json!({ "data": null })) }),
                )
                .route(
                    "/api/projects",
                    web::get().to(|| async { HttpResponse::ServiceUnavailable().finish() }),
                )
        })
        .workers(1)
        .bind(("127.0.0.1", 0))
        .unwrap();

        let addr = server.addrs()[0];
        actix_web::rt::spawn(server.run());
        format!("http://{addr}")
    }

    #[actix_web::test]
    async fn test_upstream_unwraps_envelopes() {
        let base_url = spawn_upstream();
        let source = UpstreamDataSource::new(UpstreamClient::new(&base_url).unwrap());
        let expected = mock_source().generator().job(1);

        let jobs = source.jobs("page=1").await.unwrap();
        assert_eq!(jobs, vec![expected.clone(), expected.clone()]);

        let job = source.job("job-10001").await.unwrap();
        assert_eq!(job, Some(expected.clone()));

        let build = source.build("any-job", 7).await.unwrap();
        assert_eq!(build, Some(expected));

        assert_eq!(source.project("project-1000").await.unwrap(), None);
    }

    #[actix_web::test]
    async fn test_upstream_status_is_propagated() {
        let base_url = spawn_upstream();
        let source = UpstreamDataSource::new(UpstreamClient::new(&base_url).unwrap());

        let err = source.projects("").await.unwrap_err();
        assert!(matches!(
            err,
            DataSourceError::Upstream(UpstreamError::Status(503))
        ));

        let err = source.change_document("doc-1000").await.unwrap_err();
        assert!(matches!(
            err,
            DataSourceError::Upstream(UpstreamError::Status(404))
        ));
    }

    #[actix_web::test]
    async fn test_upstream_passes_unfamiliar_values_through() {
        let base_url = spawn_upstream();
        let source = UpstreamDataSource::new(UpstreamClient::new(&base_url).unwrap());
        let (raw_doc, raw_job, raw_project) = unfamiliar_records();

        let docs = source.change_documents("").await.unwrap();
        assert_eq!(docs.len(), 1);
        let doc = &docs[0];
        assert_eq!(doc.status, ChangeStatus::Other("NEW".to_string()));
        assert_eq!(doc.current_state.ci_status.as_str(), "UNSTABLE");
        assert_eq!(doc.total_ci[0].build_ret, BuildResult::Other("FAILURE".to_string()));
        assert_eq!(doc.total_ci[0].job_type.as_str(), "nightly_ci");
        assert_eq!(serde_json::to_value(doc).unwrap(), raw_doc);

        let by_status = ChangeDocumentFilters {
            status: Some("NEW".to_string()),
            ci_status: Some("UNSTABLE".to_string()),
            ..Default::default()
        };
        assert_eq!(filter(&docs, &by_status).len(), 1);

        let job = source.job("job-10002").await.unwrap().unwrap();
        assert_eq!(job.status, JobStatus::Other("UNSTABLE".to_string()));
        assert!(job.status.is_terminal());
        assert_eq!(job.stages[0].status.as_str(), "WARNING");
        assert_eq!(serde_json::to_value(&job).unwrap(), raw_job);

        let jobs = vec![job];
        let unstable = JobFilters {
            status: Some("UNSTABLE".to_string()),
            ..Default::default()
        };
        assert_eq!(filter(&jobs, &unstable).len(), 1);

        let projects = source
            .change_document_projects("doc-1000")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(projects[0].status.as_str(), "skipped");
        assert!(!projects[0].steps[0].status.is_in_progress());
        assert_eq!(projects[0].steps[0].status, StepStatus::Other("cancelled".to_string()));
        assert_eq!(serde_json::to_value(&projects[0]).unwrap(), raw_project);
    }
}
