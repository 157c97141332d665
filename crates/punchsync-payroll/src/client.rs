// SPDX-FileCopyrightText: 2026 Punchsync Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the payroll API.
//!
//! Provides [`PayrollClient`] which handles the anti-forgery + bearer token
//! handshake, multipart batch upload with a single transparent re-auth on
//! 401, import-job polling, and reconciled-pointing retrieval.

use std::path::Path;
use std::time::Duration;

use punchsync_core::PunchsyncError;
use tracing::{debug, info, warn};

use crate::types::{
    Employee, ImportJob, LoginRequest, LoginResponse, Pointing, UploadOutcome, UploadResponse,
};

/// Name of the anti-forgery cookie issued by the hello endpoint.
const XSRF_COOKIE: &str = "XSRF-TOKEN";

/// Header carrying the anti-forgery token back to the API.
const XSRF_HEADER: &str = "X-XSRF-TOKEN";

/// Authenticated client for the payroll API.
///
/// Starts unauthenticated; [`authenticate`](Self::authenticate) performs the
/// two-step handshake and stores the session tokens. A call that observes a
/// 401 re-authenticates once and retries; if that fails, the attempt is
/// surfaced as an error value. Nothing panics across this boundary.
#[derive(Debug)]
pub struct PayrollClient {
    http: reqwest::Client,
    base_url: String,
    company_id: String,
    username: String,
    password: String,
    xsrf_token: Option<String>,
    access_token: Option<String>,
}

impl PayrollClient {
    /// Creates a new client. No network traffic happens until
    /// [`authenticate`](Self::authenticate) is called.
    pub fn new(
        base_url: &str,
        company_id: &str,
        username: &str,
        password: &str,
        request_timeout: Duration,
    ) -> Result<Self, PunchsyncError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(request_timeout)
            .build()
            .map_err(|e| PunchsyncError::Api {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            company_id: company_id.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            xsrf_token: None,
            access_token: None,
        })
    }

    /// True once a bearer token is held.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some()
    }

    /// Performs the two-step handshake: fetch the anti-forgery cookie from
    /// the hello endpoint, then exchange credentials for a bearer token.
    ///
    /// The login response may rotate the anti-forgery cookie; the rotated
    /// value wins when present.
    pub async fn authenticate(&mut self) -> Result<(), PunchsyncError> {
        let hello_url = format!("{}/auth/hello", self.base_url);
        let response = self
            .http
            .get(&hello_url)
            .send()
            .await
            .map_err(request_err("hello request failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "hello endpoint rejected the request");
            return Err(PunchsyncError::Api {
                message: format!("hello returned {status}: {body}"),
                source: None,
            });
        }

        let xsrf = extract_xsrf_cookie(&response).ok_or_else(|| PunchsyncError::Api {
            message: format!("hello response did not set the {XSRF_COOKIE} cookie"),
            source: None,
        })?;
        debug!("anti-forgery token retrieved");

        let login_url = format!("{}/auth/login", self.base_url);
        let response = self
            .http
            .post(&login_url)
            .header(XSRF_HEADER, &xsrf)
            .json(&LoginRequest {
                username: &self.username,
                password: &self.password,
                company_id: &self.company_id,
            })
            .send()
            .await
            .map_err(request_err("login request failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "login rejected");
            return Err(PunchsyncError::Api {
                message: format!("login returned {status}: {body}"),
                source: None,
            });
        }

        let rotated = extract_xsrf_cookie(&response);
        let login: LoginResponse = response.json().await.map_err(|e| PunchsyncError::Api {
            message: format!("failed to parse login response: {e}"),
            source: Some(Box::new(e)),
        })?;

        self.xsrf_token = Some(rotated.unwrap_or(xsrf));
        self.access_token = Some(login.access_token);
        info!("authenticated against payroll api");
        Ok(())
    }

    /// Uploads a batch spreadsheet into the current month's pointing import.
    ///
    /// On a 401, re-authenticates once and resubmits the same file (the
    /// server assigns a fresh job execution id per call, so a retry after
    /// partial acceptance is safe). Any other non-success response is a
    /// failure outcome carrying the response body, not an error.
    pub async fn upload_attendance(&mut self, file: &Path) -> Result<UploadOutcome, PunchsyncError> {
        let month = chrono::Local::now().format("%Y-%m").to_string();
        let url = format!(
            "{}/pay/api/companies/{}/month-pointing/{}/import",
            self.base_url, self.company_id, month
        );

        let file_name = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attendance.xlsx".to_string());
        let bytes = tokio::fs::read(file).await.map_err(|e| PunchsyncError::Api {
            message: format!("failed to read export file {}: {e}", file.display()),
            source: Some(Box::new(e)),
        })?;

        for attempt in 0..=1u32 {
            let (access_token, xsrf_token) = self.session_tokens()?;
            let part = reqwest::multipart::Part::bytes(bytes.clone())
                .file_name(file_name.clone())
                .mime_str("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")
                .map_err(|e| PunchsyncError::Api {
                    message: format!("failed to build multipart body: {e}"),
                    source: Some(Box::new(e)),
                })?;
            let form = reqwest::multipart::Form::new().part("file", part);

            let response = self
                .http
                .post(&url)
                .bearer_auth(access_token)
                .header(XSRF_HEADER, xsrf_token)
                .multipart(form)
                .send()
                .await
                .map_err(request_err("upload request failed"))?;

            let status = response.status();
            debug!(status = %status, attempt, "upload response received");

            if status == reqwest::StatusCode::UNAUTHORIZED && attempt == 0 {
                warn!("upload rejected as unauthorized, re-authenticating once");
                self.authenticate().await?;
                continue;
            }

            if status.is_success() {
                let upload: UploadResponse =
                    response.json().await.map_err(|e| PunchsyncError::Api {
                        message: format!("failed to parse upload response: {e}"),
                        source: Some(Box::new(e)),
                    })?;
                return Ok(UploadOutcome {
                    success: true,
                    job_execution_id: Some(upload.job_execution_id),
                    message: None,
                });
            }

            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "upload rejected");
            return Ok(UploadOutcome {
                success: false,
                job_execution_id: None,
                message: Some(body),
            });
        }

        // The 401 branch re-enters the loop at most once.
        Err(PunchsyncError::Api {
            message: "upload failed after re-authentication".into(),
            source: None,
        })
    }

    /// Fetches the state of the most recent import job for the company.
    ///
    /// Non-success responses are errors: this path is only invoked inside
    /// the bounded reconciliation poll, which treats an error like any other
    /// cycle abort.
    pub async fn latest_pointing_import(&self) -> Result<ImportJob, PunchsyncError> {
        let url = format!(
            "{}/pay/api/companies/{}/pointing-imports",
            self.base_url, self.company_id
        );
        let (access_token, xsrf_token) = self.session_tokens()?;

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .header(XSRF_HEADER, xsrf_token)
            .send()
            .await
            .map_err(request_err("pointing-imports request failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PunchsyncError::Api {
                message: format!("pointing-imports returned {status}: {body}"),
                source: None,
            });
        }

        response.json().await.map_err(|e| PunchsyncError::Api {
            message: format!("failed to parse pointing-imports response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    /// Fetches the pointings reconciled by a completed import job, flattened
    /// into their constituent punch timestamps (a pointing with both an
    /// entrance and an exit contributes two entries).
    pub async fn pointings_for_job(
        &self,
        job_execution_id: i64,
    ) -> Result<Vec<String>, PunchsyncError> {
        let url = format!(
            "{}/pay/api/companies/{}/pointings",
            self.base_url, self.company_id
        );
        let (access_token, xsrf_token) = self.session_tokens()?;

        let response = self
            .http
            .get(&url)
            .query(&[("jobExecutionId", job_execution_id)])
            .bearer_auth(access_token)
            .header(XSRF_HEADER, xsrf_token)
            .send()
            .await
            .map_err(request_err("pointings request failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PunchsyncError::Api {
                message: format!("pointings returned {status}: {body}"),
                source: None,
            });
        }

        let pointings: Vec<Pointing> =
            response.json().await.map_err(|e| PunchsyncError::Api {
                message: format!("failed to parse pointings response: {e}"),
                source: Some(Box::new(e)),
            })?;

        let timestamps = pointings
            .iter()
            .flat_map(|p| p.entrance.iter().chain(p.exit.iter()))
            .cloned()
            .collect();
        Ok(timestamps)
    }

    /// Fetches the company's employee roster.
    pub async fn list_employees(&self) -> Result<Vec<Employee>, PunchsyncError> {
        let url = format!(
            "{}/pay/api/companies/{}/employees",
            self.base_url, self.company_id
        );
        let (access_token, xsrf_token) = self.session_tokens()?;

        let response = self
            .http
            .get(&url)
            .bearer_auth(access_token)
            .header(XSRF_HEADER, xsrf_token)
            .send()
            .await
            .map_err(request_err("employees request failed"))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PunchsyncError::Api {
                message: format!("employees returned {status}: {body}"),
                source: None,
            });
        }

        response.json().await.map_err(|e| PunchsyncError::Api {
            message: format!("failed to parse employees response: {e}"),
            source: Some(Box::new(e)),
        })
    }

    fn session_tokens(&self) -> Result<(String, String), PunchsyncError> {
        match (&self.access_token, &self.xsrf_token) {
            (Some(access), Some(xsrf)) => Ok((access.clone(), xsrf.clone())),
            _ => Err(PunchsyncError::Api {
                message: "client is not authenticated -- call authenticate() first".into(),
                source: None,
            }),
        }
    }
}

fn extract_xsrf_cookie(response: &reqwest::Response) -> Option<String> {
    response
        .cookies()
        .find(|c| c.name() == XSRF_COOKIE)
        .map(|c| c.value().to_string())
}

fn request_err(context: &'static str) -> impl FnOnce(reqwest::Error) -> PunchsyncError {
    move |e| {
        let message = format!("{context}: {e}");
        PunchsyncError::Api {
            message,
            source: Some(Box::new(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wiremock::matchers::{header, method, path, path_regex, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(base_url: &str) -> PayrollClient {
        PayrollClient::new(
            base_url,
            "42",
            "clock-bot",
            "hunter2",
            Duration::from_secs(5),
        )
        .unwrap()
    }

    async fn mount_handshake(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/auth/hello"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "XSRF-TOKEN=xsrf-1; Path=/"),
            )
            .mount(server)
            .await;

        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .and(header("X-XSRF-TOKEN", "xsrf-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"access_token": "jwt-1"})),
            )
            .mount(server)
            .await;
    }

    fn write_export_file(dir: &tempfile::TempDir) -> std::path::PathBuf {
        let path = dir.path().join("attendance_20260320080000_a1b2c3d4.xlsx");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"stub spreadsheet bytes").unwrap();
        path
    }

    #[tokio::test]
    async fn authenticate_stores_both_tokens() {
        let server = MockServer::start().await;
        mount_handshake(&server).await;

        let mut client = test_client(&server.uri());
        assert!(!client.is_authenticated());
        client.authenticate().await.unwrap();
        assert!(client.is_authenticated());
    }

    #[tokio::test]
    async fn authenticate_fails_when_cookie_is_missing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/hello"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let mut client = test_client(&server.uri());
        let err = client.authenticate().await.unwrap_err();
        assert!(err.to_string().contains("XSRF-TOKEN"), "got: {err}");
    }

    #[tokio::test]
    async fn authenticate_fails_on_rejected_login() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/hello"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "XSRF-TOKEN=xsrf-1; Path=/"),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad credentials"))
            .mount(&server)
            .await;

        let mut client = test_client(&server.uri());
        let err = client.authenticate().await.unwrap_err();
        assert!(err.to_string().contains("401"), "got: {err}");
        assert!(!client.is_authenticated());
    }

    #[tokio::test]
    async fn rotated_xsrf_cookie_from_login_wins() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/auth/hello"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "XSRF-TOKEN=xsrf-1; Path=/"),
            )
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/auth/login"))
            .respond_with(
                ResponseTemplate::new(200)
                    .insert_header("set-cookie", "XSRF-TOKEN=xsrf-2; Path=/")
                    .set_body_json(serde_json::json!({"access_token": "jwt-1"})),
            )
            .mount(&server)
            .await;
        // The rotated token must be echoed on subsequent calls.
        Mock::given(method("GET"))
            .and(path("/pay/api/companies/42/pointing-imports"))
            .and(header("X-XSRF-TOKEN", "xsrf-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": 1, "status": "STARTED", "jobExecutionId": 9
            })))
            .mount(&server)
            .await;

        let mut client = test_client(&server.uri());
        client.authenticate().await.unwrap();
        let job = client.latest_pointing_import().await.unwrap();
        assert_eq!(job.job_execution_id, 9);
    }

    #[tokio::test]
    async fn upload_succeeds_with_bearer_and_xsrf_headers() {
        let server = MockServer::start().await;
        mount_handshake(&server).await;

        Mock::given(method("POST"))
            .and(path_regex(
                r"^/pay/api/companies/42/month-pointing/\d{4}-\d{2}/import$",
            ))
            .and(header("Authorization", "Bearer jwt-1"))
            .and(header("X-XSRF-TOKEN", "xsrf-1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"jobExecutionId": 77})),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = write_export_file(&dir);

        let mut client = test_client(&server.uri());
        client.authenticate().await.unwrap();
        let outcome = client.upload_attendance(&file).await.unwrap();
        assert!(outcome.success);
        assert_eq!(outcome.job_execution_id, Some(77));
        assert!(outcome.message.is_none());
    }

    #[tokio::test]
    async fn upload_retries_transparently_after_401() {
        let server = MockServer::start().await;
        mount_handshake(&server).await;

        // First submission bounces with 401, the retry is accepted.
        Mock::given(method("POST"))
            .and(path_regex(
                r"^/pay/api/companies/42/month-pointing/\d{4}-\d{2}/import$",
            ))
            .respond_with(ResponseTemplate::new(401))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path_regex(
                r"^/pay/api/companies/42/month-pointing/\d{4}-\d{2}/import$",
            ))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"jobExecutionId": 78})),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = write_export_file(&dir);

        let mut client = test_client(&server.uri());
        client.authenticate().await.unwrap();
        let outcome = client.upload_attendance(&file).await.unwrap();
        assert!(outcome.success, "retry must yield the same result as a clean first attempt");
        assert_eq!(outcome.job_execution_id, Some(78));
    }

    #[tokio::test]
    async fn upload_rejection_is_a_failure_value_with_the_body() {
        let server = MockServer::start().await;
        mount_handshake(&server).await;

        Mock::given(method("POST"))
            .and(path_regex(
                r"^/pay/api/companies/42/month-pointing/\d{4}-\d{2}/import$",
            ))
            .respond_with(ResponseTemplate::new(422).set_body_string("unparseable sheet"))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let file = write_export_file(&dir);

        let mut client = test_client(&server.uri());
        client.authenticate().await.unwrap();
        let outcome = client.upload_attendance(&file).await.unwrap();
        assert!(!outcome.success);
        assert_eq!(outcome.message.as_deref(), Some("unparseable sheet"));
    }

    #[tokio::test]
    async fn latest_pointing_import_errors_on_non_success() {
        let server = MockServer::start().await;
        mount_handshake(&server).await;
        Mock::given(method("GET"))
            .and(path("/pay/api/companies/42/pointing-imports"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let mut client = test_client(&server.uri());
        client.authenticate().await.unwrap();
        let err = client.latest_pointing_import().await.unwrap_err();
        assert!(err.to_string().contains("500"), "got: {err}");
    }

    #[tokio::test]
    async fn pointings_flatten_entrance_and_exit_entries() {
        let server = MockServer::start().await;
        mount_handshake(&server).await;
        Mock::given(method("GET"))
            .and(path("/pay/api/companies/42/pointings"))
            .and(query_param("jobExecutionId", "77"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"entrance": "2026-03-20T08:00:00", "exit": "2026-03-20T17:00:00"},
                {"entrance": "2026-03-21T08:12:00", "exit": null}
            ])))
            .mount(&server)
            .await;

        let mut client = test_client(&server.uri());
        client.authenticate().await.unwrap();
        let events = client.pointings_for_job(77).await.unwrap();
        assert_eq!(
            events,
            vec![
                "2026-03-20T08:00:00".to_string(),
                "2026-03-20T17:00:00".to_string(),
                "2026-03-21T08:12:00".to_string(),
            ]
        );
    }

    #[tokio::test]
    async fn unauthenticated_calls_are_rejected_locally() {
        let server = MockServer::start().await;
        let client = test_client(&server.uri());
        let err = client.latest_pointing_import().await.unwrap_err();
        assert!(err.to_string().contains("not authenticated"), "got: {err}");
        assert_eq!(server.received_requests().await.unwrap().len(), 0);
    }

    #[tokio::test]
    async fn list_employees_parses_roster() {
        let server = MockServer::start().await;
        mount_handshake(&server).await;
        Mock::given(method("GET"))
            .and(path("/pay/api/companies/42/employees"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {"id": 1, "code": "E001"},
                {"id": 2, "code": null}
            ])))
            .mount(&server)
            .await;

        let mut client = test_client(&server.uri());
        client.authenticate().await.unwrap();
        let employees = client.list_employees().await.unwrap();
        assert_eq!(employees.len(), 2);
        assert_eq!(employees[0].code.as_deref(), Some("E001"));
        assert!(employees[1].code.is_none());
    }
}
