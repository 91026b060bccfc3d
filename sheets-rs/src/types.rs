use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub protocol: String,
    pub sheets_host: String,
    pub drive_host: String,
    pub timeout: Option<Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            protocol: "https".to_string(),
            sheets_host: "sheets.googleapis.com".to_string(),
            drive_host: "www.googleapis.com".to_string(),
            timeout: None,
        }
    }
}

impl Config {
    pub fn sheets_url(&self) -> String {
        format!("{}://{}/v4/spreadsheets", self.protocol, self.sheets_host)
    }

    pub fn drive_files_url(&self) -> String {
        format!("{}://{}/drive/v3/files", self.protocol, self.drive_host)
    }
}

/// Bearer token returned by the OAuth2 token endpoint.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct AccessToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub token_type: Option<String>,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct FileList {
    #[serde(default)]
    pub files: Vec<DriveFile>,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct DriveFile {
    pub id: String,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct Spreadsheet {
    #[serde(default)]
    pub sheets: Vec<SheetEntry>,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct SheetEntry {
    pub properties: SheetProperties,
}

#[derive(Debug, serde::Deserialize)]
pub(crate) struct SheetProperties {
    pub title: String,
    #[serde(default)]
    pub index: i64,
}
