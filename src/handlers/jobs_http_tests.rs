//! HTTP tests for job endpoints
//!
//! Most tests run against the mock source; the error mapping tests use a
//! source whose upstream calls always fail.

#[cfg(test)]
mod http_integration_tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::{App, test, web};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use serde_json::{Value, json};

    use crate::AppState;
    use crate::config::{Config, DataMode, MockConfig};
    use crate::handlers::configure_api_routes;
    use crate::models::{ChangeDocument, Job, Project, ProjectStep, Stage};
    use crate::services::{
        CiDataSource, DataSourceError, MockDataGenerator, MockDataSource, UpstreamError,
    };

    fn generator() -> MockDataGenerator {
        let now = Utc.with_ymd_and_hms(2026, 4, 15, 12, 0, 0).unwrap();
        MockDataGenerator::new(0, now)
    }

    fn create_test_app_state() -> web::Data<AppState> {
        let source = MockDataSource::with_generator(generator(), MockConfig::default());
        web::Data::new(AppState {
            config: Config::default(),
            data_source: Arc::new(source),
        })
    }

    /// Source standing in for an unreachable or misbehaving upstream
    struct FailingSource {
        status: Option<u16>,
    }

    impl FailingSource {
        fn fail<T>(&self) -> Result<T, DataSourceError> {
            let err = match self.status {
                Some(status) => UpstreamError::Status(status),
                None => UpstreamError::MissingData,
            };
            Err(err.into())
        }
    }

    #[async_trait]
    impl CiDataSource for FailingSource {
        fn mode(&self) -> DataMode {
            DataMode::Upstream
        }

        async fn change_documents(&self, _: &str) -> Result<Vec<ChangeDocument>, DataSourceError> {
            self.fail()
        }

        async fn change_document(&self, _: &str) -> Result<Option<ChangeDocument>, DataSourceError> {
            self.fail()
        }

        async fn change_document_projects(
            &self,
            _: &str,
        ) -> Result<Option<Vec<Project>>, DataSourceError> {
            self.fail()
        }

        async fn jobs(&self, _: &str) -> Result<Vec<Job>, DataSourceError> {
            self.fail()
        }

        async fn job(&self, _: &str) -> Result<Option<Job>, DataSourceError> {
            self.fail()
        }

        async fn builds(&self, _: &str, _: &str) -> Result<Vec<Job>, DataSourceError> {
            self.fail()
        }

        async fn build(&self, _: &str, _: u32) -> Result<Option<Job>, DataSourceError> {
            self.fail()
        }

        async fn stage(&self, _: &str, _: u32, _: &str) -> Result<Option<Stage>, DataSourceError> {
            self.fail()
        }

        async fn projects(&self, _: &str) -> Result<Vec<Project>, DataSourceError> {
            self.fail()
        }

        async fn project(&self, _: &str) -> Result<Option<Project>, DataSourceError> {
            self.fail()
        }

        async fn project_step(
            &self,
            _: &str,
            _: &str,
            _: Option<&str>,
        ) -> Result<Option<ProjectStep>, DataSourceError> {
            self.fail()
        }

        async fn project_step_job(&self, _: &str, _: &str) -> Result<Option<Job>, DataSourceError> {
            self.fail()
        }
    }

    fn failing_app_state(status: Option<u16>) -> web::Data<AppState> {
        web::Data::new(AppState {
            config: Config::default(),
            data_source: Arc::new(FailingSource { status }),
        })
    }

    #[actix_web::test]
    async fn test_list_jobs_filters_by_status() {
        let app = test::init_service(
            App::new()
                .app_data(create_test_app_state())
                .service(web::scope("/api").configure(configure_api_routes)),
        )
        .await;

        let expected = generator()
            .jobs(30)
            .iter()
            .filter(|j| j.status.as_str() == "FAILURE")
            .count();

        let req = test::TestRequest::get()
            .uri("/api/jobs?status=FAILURE&limit=30")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let body: Value = test::read_body_json(resp).await;
        let jobs = body["data"].as_array().unwrap();
        assert_eq!(jobs.len(), expected);
        assert!(jobs.iter().all(|j| j["status"] == "FAILURE"));
        assert_eq!(body["pagination"]["total"], expected);
        assert_eq!(body["filters"]["status"], "FAILURE");
        assert_eq!(body["filters"]["projectId"], Value::Null);
    }

    #[actix_web::test]
    async fn test_list_jobs_by_project_and_change() {
        let app = test::init_service(
            App::new()
                .app_data(create_test_app_state())
                .service(web::scope("/api").configure(configure_api_routes)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/jobs?projectId=system-core&changeNumber=1003")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let jobs = body["data"].as_array().unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0]["job_id"], "job-10009");
    }

    #[actix_web::test]
    async fn test_empty_paging_values_on_job_lists() {
        let app = test::init_service(
            App::new()
                .app_data(create_test_app_state())
                .service(web::scope("/api").configure(configure_api_routes)),
        )
        .await;

        let job_name = generator().job(5).job_name;
        for uri in [
            "/api/jobs?page=&limit=&status=".to_string(),
            format!("/api/jobs/by-name/{job_name}/builds?page=&limit="),
        ] {
            let req = test::TestRequest::get().uri(&uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "{uri}");

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body["pagination"]["page"], 1, "{uri}");
            assert_eq!(body["pagination"]["limit"], 10, "{uri}");
        }
    }

    #[actix_web::test]
    async fn test_get_job_by_id() {
        let app = test::init_service(
            App::new()
                .app_data(create_test_app_state())
                .service(web::scope("/api").configure(configure_api_routes)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/jobs/by-id/job-10005")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["job_id"], "job-10005");
        assert_eq!(body["build_num"], 1005);

        let req = test::TestRequest::get()
            .uri("/api/jobs/by-id/latest")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Job not found" }));
    }

    #[actix_web::test]
    async fn test_builds_of_job_newest_first() {
        let app = test::init_service(
            App::new()
                .app_data(create_test_app_state())
                .service(web::scope("/api").configure(configure_api_routes)),
        )
        .await;

        let job_name = generator().job(5).job_name;
        let req = test::TestRequest::get()
            .uri(&format!("/api/jobs/by-name/{job_name}/builds"))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        let builds = body["data"].as_array().unwrap();
        assert!(!builds.is_empty());
        assert!(builds.iter().all(|b| b["job_name"] == job_name.as_str()));
        let numbers: Vec<u64> = builds.iter().map(|b| b["build_num"].as_u64().unwrap()).collect();
        assert!(numbers.windows(2).all(|w| w[0] > w[1]));
        assert_eq!(body["filters"], json!({ "status": null }));
    }

    #[actix_web::test]
    async fn test_builds_status_filter_applies_before_paging() {
        let app = test::init_service(
            App::new()
                .app_data(create_test_app_state())
                .service(web::scope("/api").configure(configure_api_routes)),
        )
        .await;

        let job = generator().job(5);
        let other = if job.status.as_str() == "ABORTED" { "SUCCESS" } else { "ABORTED" };
        let uri = format!("/api/jobs/by-name/{}/builds?status={other}", job.job_name);

        let req = test::TestRequest::get().uri(&uri).to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(body["data"].as_array().unwrap().iter().all(|b| b["status"] == other));
        assert_eq!(body["filters"]["status"], other);
    }

    #[actix_web::test]
    async fn test_get_build_existing_and_synthesized() {
        let app = test::init_service(
            App::new()
                .app_data(create_test_app_state())
                .service(web::scope("/api").configure(configure_api_routes)),
        )
        .await;

        let job = generator().job(4);
        let req = test::TestRequest::get()
            .uri(&format!("/api/jobs/by-name/{}/builds/{}", job.job_name, job.build_num))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["job_id"], job.job_id.as_str());

        let req = test::TestRequest::get()
            .uri("/api/jobs/by-name/nightly-sweep/builds/77")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["job_name"], "nightly-sweep");
        assert_eq!(body["build_num"], 77);
    }

    #[actix_web::test]
    async fn test_malformed_build_number_is_rejected() {
        let app = test::init_service(
            App::new()
                .app_data(create_test_app_state())
                .service(web::scope("/api").configure(configure_api_routes)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/jobs/by-name/any-job/builds/latest")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("Invalid path parameter"));
    }

    #[actix_web::test]
    async fn test_get_stage() {
        let app = test::init_service(
            App::new()
                .app_data(create_test_app_state())
                .service(web::scope("/api").configure(configure_api_routes)),
        )
        .await;

        let job = generator().job(2);
        let stage = &job.stages[1];
        let req = test::TestRequest::get()
            .uri(&format!(
                "/api/jobs/by-name/{}/builds/{}/stages/{}",
                job.job_name,
                job.build_num,
                stage.name.replace(' ', "%20")
            ))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["name"], stage.name.as_str());
        assert_eq!(body["status"], stage.status.as_str());

        let req = test::TestRequest::get()
            .uri("/api/jobs/by-name/nightly-sweep/builds/1/stages/Smoke%20Test")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["name"], "Smoke Test");
    }

    #[actix_web::test]
    async fn test_upstream_status_is_mirrored() {
        let app = test::init_service(
            App::new()
                .app_data(failing_app_state(Some(502)))
                .service(web::scope("/api").configure(configure_api_routes)),
        )
        .await;

        for uri in [
            "/api/jobs",
            "/api/jobs/by-id/job-10001",
            "/api/jobs/by-name/any-job/builds",
            "/api/jobs/by-name/any-job/builds/3/stages/Compile",
        ] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_GATEWAY, "{uri}");

            let body: Value = test::read_body_json(resp).await;
            assert_eq!(body, json!({ "error": "Failed to fetch data" }));
        }
    }

    #[actix_web::test]
    async fn test_broken_upstream_payload_is_internal_error() {
        let app = test::init_service(
            App::new()
                .app_data(failing_app_state(None))
                .service(web::scope("/api").configure(configure_api_routes)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/jobs").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body, json!({ "error": "Internal server error" }));
    }
}
