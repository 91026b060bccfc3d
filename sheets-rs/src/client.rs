use crate::auth::{fetch_access_token, DRIVE_READONLY_SCOPE, SPREADSHEETS_SCOPE};
use crate::credentials::ServiceAccountKey;
use crate::errors::SheetsError;
use crate::types::{Config, FileList, Spreadsheet};
use crate::utils::{send_request, spreadsheet_query, worksheet_range};
use reqwest::{Client, Url};
use serde_json::{json, Value};
use std::sync::Arc;

#[cfg(feature = "tracing")]
use tracing::{info, instrument};

/// An authenticated Sheets session for one service account.
#[derive(Clone)]
pub struct Sheets {
    http: Client,
    config: Arc<Config>,
    token: String,
}

impl Sheets {
    pub fn http_client(config: &Config) -> Result<Client, SheetsError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }

    pub async fn authenticate(
        key: &ServiceAccountKey,
        config: Option<Config>,
    ) -> Result<Self, SheetsError> {
        let config = Arc::new(config.unwrap_or_default());
        let http = Self::http_client(&config)?;
        let token = fetch_access_token(&http, key, &[SPREADSHEETS_SCOPE, DRIVE_READONLY_SCOPE])
            .await?;

        Ok(Self {
            http,
            config,
            token: token.access_token,
        })
    }

    /// Session for an access token obtained elsewhere.
    pub fn with_token(token: &str, config: Option<Config>) -> Result<Self, SheetsError> {
        let config = Arc::new(config.unwrap_or_default());
        Ok(Self {
            http: Self::http_client(&config)?,
            config,
            token: token.to_string(),
        })
    }

    /// Resolves a spreadsheet id from its exact name.
    #[cfg_attr(feature = "tracing", instrument(skip(self)))]
    pub async fn open(&self, name: &str) -> Result<String, SheetsError> {
        let request = self
            .http
            .get(self.config.drive_files_url())
            .bearer_auth(&self.token)
            .query(&[
                ("q", spreadsheet_query(name).as_str()),
                ("fields", "files(id,name)"),
                ("pageSize", "1"),
                ("supportsAllDrives", "true"),
                ("includeItemsFromAllDrives", "true"),
            ]);

        let list: FileList = serde_json::from_value(send_request(request).await?)
            .map_err(|e| SheetsError::Other(format!("Malformed file list: {}", e)))?;

        list.files
            .into_iter()
            .next()
            .map(|f| f.id)
            .ok_or_else(|| SheetsError::SpreadsheetNotFound(name.to_string()))
    }

    /// Title of the worksheet at index 0.
    #[cfg_attr(feature = "tracing", instrument(skip(self)))]
    pub async fn first_worksheet(&self, spreadsheet_id: &str) -> Result<String, SheetsError> {
        let url = self.spreadsheet_url(spreadsheet_id, None)?;
        let request = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .query(&[("fields", "sheets.properties(title,index)")]);

        let spreadsheet: Spreadsheet = serde_json::from_value(send_request(request).await?)
            .map_err(|e| SheetsError::Other(format!("Malformed spreadsheet: {}", e)))?;

        spreadsheet
            .sheets
            .into_iter()
            .map(|s| s.properties)
            .min_by_key(|p| p.index)
            .map(|p| p.title)
            .ok_or_else(|| SheetsError::WorksheetNotFound(spreadsheet_id.to_string()))
    }

    #[cfg_attr(feature = "tracing", instrument(skip(self, row)))]
    pub async fn append_row(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
        row: Vec<Value>,
    ) -> Result<Value, SheetsError> {
        let segment = format!("{}:append", worksheet_range(worksheet));
        let url = self.spreadsheet_url(spreadsheet_id, Some(&["values", segment.as_str()][..]))?;
        let request = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .query(&[
                ("valueInputOption", "RAW"),
                ("insertDataOption", "INSERT_ROWS"),
            ])
            .json(&json!({ "values": [row] }));

        let body = send_request(request).await?;
        #[cfg(feature = "tracing")]
        info!(
            updated_range = %body["updates"]["updatedRange"],
            "Appended row to worksheet"
        );
        Ok(body)
    }

    fn spreadsheet_url(
        &self,
        spreadsheet_id: &str,
        extra: Option<&[&str]>,
    ) -> Result<Url, SheetsError> {
        let mut url = Url::parse(&self.config.sheets_url())
            .map_err(|e| SheetsError::Other(format!("Invalid Sheets URL: {}", e)))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| SheetsError::Other("Sheets URL cannot be a base".into()))?;
            segments.push(spreadsheet_id);
            if let Some(extra) = extra {
                segments.extend(extra);
            }
        }
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Sheets {
        let config = Arc::new(Config::default());
        Sheets {
            http: Client::new(),
            config,
            token: "token".into(),
        }
    }

    #[test]
    fn append_url_encodes_worksheet_title() {
        let sheets = session();
        let segment = format!("{}:append", worksheet_range("Check Log"));
        let url = sheets
            .spreadsheet_url("abc123", Some(&["values", segment.as_str()][..]))
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123/values/'Check%20Log'!A1:append"
        );
    }

    #[test]
    fn spreadsheet_url_without_suffix() {
        let url = session().spreadsheet_url("abc123", None).unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/abc123"
        );
    }

    mod against_stub {
        use axum::http::{Method, StatusCode};
        use serde_json::json;

        use crate::credentials::ServiceAccountKey;
        use crate::testing::{StubGoogle, StubResponses, STUB_TOKEN};

        use super::*;

        async fn stub_session(responses: StubResponses) -> (StubGoogle, Sheets) {
            let stub = StubGoogle::start(responses).await.unwrap();
            let sheets = Sheets::with_token("token-1", Some(stub.config())).unwrap();
            (stub, sheets)
        }

        #[tokio::test]
        async fn authenticate_exchanges_signed_assertion() {
            let stub = StubGoogle::start(StubResponses::default()).await.unwrap();
            let key = ServiceAccountKey::from_json(&stub.service_account_json()).unwrap();

            let sheets = Sheets::authenticate(&key, Some(stub.config())).await.unwrap();
            assert_eq!(sheets.token, STUB_TOKEN);

            let requests = stub.requests_to("/token");
            assert_eq!(requests.len(), 1);
            let form = &requests[0].body;
            assert!(form.contains("grant_type=urn%3Aietf%3Aparams%3Aoauth%3Agrant-type%3Ajwt-bearer"));
            let assertion = form
                .split('&')
                .find_map(|pair| pair.strip_prefix("assertion="))
                .unwrap();
            assert_eq!(assertion.split('.').count(), 3);
        }

        #[tokio::test]
        async fn rejected_credentials_are_authentication_errors() {
            let stub = StubGoogle::start(StubResponses {
                token: (StatusCode::BAD_REQUEST, json!({"error": "invalid_grant"})),
                ..StubResponses::default()
            })
            .await
            .unwrap();
            let key = ServiceAccountKey::from_json(&stub.service_account_json()).unwrap();

            let err = Sheets::authenticate(&key, Some(stub.config()))
                .await
                .err()
                .unwrap();
            assert!(matches!(err, SheetsError::Authentication(_)));
        }

        #[tokio::test]
        async fn open_queries_drive_by_name() {
            let (stub, sheets) = stub_session(StubResponses::default()).await;

            let id = sheets.open("IP Check Log").await.unwrap();
            assert_eq!(id, "sheet-123");

            let requests = stub.requests_to("/drive/v3/files");
            assert_eq!(requests.len(), 1);
            let request = &requests[0];
            assert_eq!(request.method, Method::GET);
            assert_eq!(request.authorization.as_deref(), Some("Bearer token-1"));
            assert_eq!(
                request.query["q"],
                "name = 'IP Check Log' and mimeType = 'application/vnd.google-apps.spreadsheet' and trashed = false"
            );
            assert_eq!(request.query["fields"], "files(id,name)");
            assert_eq!(request.query["supportsAllDrives"], "true");
        }

        #[tokio::test]
        async fn open_reports_missing_spreadsheet() {
            let (_stub, sheets) = stub_session(StubResponses {
                files: (StatusCode::OK, json!({"files": []})),
                ..StubResponses::default()
            })
            .await;

            let err = sheets.open("IP Check Log").await.unwrap_err();
            assert!(matches!(err, SheetsError::SpreadsheetNotFound(name) if name == "IP Check Log"));
        }

        #[tokio::test]
        async fn first_worksheet_uses_lowest_index() {
            let (stub, sheets) = stub_session(StubResponses {
                spreadsheet: (
                    StatusCode::OK,
                    json!({"sheets": [
                        {"properties": {"title": "Archive", "index": 1}},
                        {"properties": {"title": "Responses", "index": 0}}
                    ]}),
                ),
                ..StubResponses::default()
            })
            .await;

            let title = sheets.first_worksheet("sheet-123").await.unwrap();
            assert_eq!(title, "Responses");

            let requests = stub.requests_to("/v4/spreadsheets/sheet-123");
            assert_eq!(requests[0].query["fields"], "sheets.properties(title,index)");
        }

        #[tokio::test]
        async fn first_worksheet_of_empty_spreadsheet() {
            let (_stub, sheets) = stub_session(StubResponses {
                spreadsheet: (StatusCode::OK, json!({"sheets": []})),
                ..StubResponses::default()
            })
            .await;

            let err = sheets.first_worksheet("sheet-123").await.unwrap_err();
            assert!(matches!(err, SheetsError::WorksheetNotFound(_)));
        }

        #[tokio::test]
        async fn append_row_posts_raw_values() {
            let (stub, sheets) = stub_session(StubResponses::default()).await;

            let body = sheets
                .append_row(
                    "sheet-123",
                    "Check Log",
                    vec![json!("p-1"), json!(null), json!("1.1.1.1")],
                )
                .await
                .unwrap();
            assert_eq!(body["updates"]["updatedRows"], 1);

            let requests = stub.append_requests();
            assert_eq!(requests.len(), 1);
            let request = &requests[0];
            assert_eq!(request.method, Method::POST);
            assert_eq!(
                request.path,
                "/v4/spreadsheets/sheet-123/values/'Check%20Log'!A1:append"
            );
            assert_eq!(request.query["valueInputOption"], "RAW");
            assert_eq!(request.query["insertDataOption"], "INSERT_ROWS");
            let sent: serde_json::Value = serde_json::from_str(&request.body).unwrap();
            assert_eq!(sent, json!({"values": [["p-1", null, "1.1.1.1"]]}));
        }

        #[tokio::test]
        async fn append_row_surfaces_api_errors() {
            let (_stub, sheets) = stub_session(StubResponses {
                append: (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({"error": {"message": "backend error"}}),
                ),
                ..StubResponses::default()
            })
            .await;

            let err = sheets
                .append_row("sheet-123", "Sheet1", vec![json!("x")])
                .await
                .unwrap_err();
            match err {
                SheetsError::ApiError { status, body } => {
                    assert_eq!(status, reqwest::StatusCode::INTERNAL_SERVER_ERROR);
                    assert!(body.contains("backend error"));
                }
                other => panic!("unexpected error: {other}"),
            }
        }
    }

    #[test]
    fn http_client_honours_timeout() {
        let config = Config {
            timeout: Some(std::time::Duration::from_secs(5)),
            ..Config::default()
        };
        assert!(Sheets::http_client(&config).is_ok());
    }
}
