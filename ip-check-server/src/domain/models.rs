use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const UNKNOWN: &str = "Unknown";

/// Inbound payload of `/ip-check`. Every key is optional and absent or
/// null keys stay `None` all the way to the audit row and the response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckRequest {
    pub project_id: Option<Value>,
    pub respondent_id: Option<Value>,
    pub ip_address: Option<Value>,
}

impl CheckRequest {
    /// Reads the three known keys of a JSON object; other keys are ignored.
    pub fn from_object(object: &Map<String, Value>) -> Self {
        let field = |key: &str| object.get(key).filter(|v| !v.is_null()).cloned();
        Self {
            project_id: field("project_id"),
            respondent_id: field("respondent_id"),
            ip_address: field("ip_address"),
        }
    }

    /// The address as it is placed in the lookup URL: strings verbatim,
    /// other JSON values in their JSON form, nothing for null.
    pub fn ip_segment(&self) -> String {
        match &self.ip_address {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(ip)) => ip.clone(),
            Some(other) => other.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeoLocation {
    pub country: String,
    #[serde(rename = "countryCode")]
    pub country_code: String,
    pub region: String,
    #[serde(rename = "regionName")]
    pub region_name: String,
    pub city: String,
}

impl Default for GeoLocation {
    fn default() -> Self {
        Self {
            country: UNKNOWN.to_string(),
            country_code: UNKNOWN.to_string(),
            region: UNKNOWN.to_string(),
            region_name: UNKNOWN.to_string(),
            city: UNKNOWN.to_string(),
        }
    }
}

impl GeoLocation {
    /// Picks the five fields out of a lookup response, "Unknown" for any
    /// that are missing or not strings.
    pub fn from_lookup(body: &Value) -> Self {
        let field = |key: &str| {
            body.get(key)
                .and_then(Value::as_str)
                .unwrap_or(UNKNOWN)
                .to_string()
        };
        Self {
            country: field("country"),
            country_code: field("countryCode"),
            region: field("region"),
            region_name: field("regionName"),
            city: field("city"),
        }
    }
}

/// Response body of `/ip-check`; field order is the wire order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckResult {
    pub project_id: Option<Value>,
    pub respondent_id: Option<Value>,
    pub ip_address: Option<Value>,
    pub country: String,
    #[serde(rename = "countryCode")]
    pub country_code: String,
    pub region: String,
    #[serde(rename = "regionName")]
    pub region_name: String,
    pub city: String,
}

impl CheckResult {
    pub fn new(request: CheckRequest, geo: GeoLocation) -> Self {
        Self {
            project_id: request.project_id,
            respondent_id: request.respondent_id,
            ip_address: request.ip_address,
            country: geo.country,
            country_code: geo.country_code,
            region: geo.region,
            region_name: geo.region_name,
            city: geo.city,
        }
    }
}

/// One line of the audit log.
#[derive(Debug, Clone, PartialEq)]
pub struct AuditRecord {
    pub result: CheckResult,
    pub checked_at: DateTime<Utc>,
}

impl AuditRecord {
    pub fn new(result: CheckResult, checked_at: DateTime<Utc>) -> Self {
        Self { result, checked_at }
    }

    /// Cells in column order: ids, ip, five geo fields, UTC timestamp.
    pub fn to_row(&self) -> Vec<Value> {
        let r = &self.result;
        vec![
            r.project_id.clone().unwrap_or(Value::Null),
            r.respondent_id.clone().unwrap_or(Value::Null),
            r.ip_address.clone().unwrap_or(Value::Null),
            Value::from(r.country.as_str()),
            Value::from(r.country_code.as_str()),
            Value::from(r.region.as_str()),
            Value::from(r.region_name.as_str()),
            Value::from(r.city.as_str()),
            Value::from(
                self.checked_at
                    .to_rfc3339_opts(SecondsFormat::Micros, true),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn object_request(value: Value) -> CheckRequest {
        CheckRequest::from_object(value.as_object().unwrap())
    }

    #[test]
    fn reads_known_keys_and_drops_nulls() {
        let request = object_request(json!({
            "project_id": null,
            "respondent_id": 7,
            "ip_address": "10.0.0.1",
            "unrelated": true
        }));
        assert_eq!(
            request,
            CheckRequest {
                project_id: None,
                respondent_id: Some(json!(7)),
                ip_address: Some(json!("10.0.0.1")),
            }
        );
    }

    #[test]
    fn missing_geo_fields_default_to_unknown() {
        let geo = GeoLocation::from_lookup(&json!({"country": "France", "countryCode": "FR"}));
        assert_eq!(geo.country, "France");
        assert_eq!(geo.country_code, "FR");
        assert_eq!(geo.region, UNKNOWN);
        assert_eq!(geo.region_name, UNKNOWN);
        assert_eq!(geo.city, UNKNOWN);
    }

    #[test]
    fn failed_lookup_body_is_all_unknown() {
        let geo = GeoLocation::from_lookup(&json!({
            "status": "fail",
            "message": "invalid query",
            "query": "not-an-ip"
        }));
        assert_eq!(geo, GeoLocation::default());
    }

    #[test]
    fn ip_segment_passes_values_through() {
        let mut request = CheckRequest::default();
        assert_eq!(request.ip_segment(), "");

        request.ip_address = Some(Value::Null);
        assert_eq!(request.ip_segment(), "");

        request.ip_address = Some(json!("  8.8.8.8"));
        assert_eq!(request.ip_segment(), "  8.8.8.8");

        request.ip_address = Some(json!(1234));
        assert_eq!(request.ip_segment(), "1234");
    }

    #[test]
    fn result_serializes_in_fixed_key_order() {
        let request = object_request(json!({"respondent_id": "r-1", "ip_address": "1.1.1.1"}));
        let result = CheckResult::new(request, GeoLocation::default());
        let body = serde_json::to_string(&result).unwrap();
        assert_eq!(
            body,
            r#"{"project_id":null,"respondent_id":"r-1","ip_address":"1.1.1.1","country":"Unknown","countryCode":"Unknown","region":"Unknown","regionName":"Unknown","city":"Unknown"}"#
        );
    }

    #[test]
    fn audit_row_has_nine_ordered_cells() {
        let request = object_request(json!({
            "project_id": 42,
            "respondent_id": "r-7",
            "ip_address": "81.2.69.160"
        }));
        let geo = GeoLocation {
            country: "United Kingdom".into(),
            country_code: "GB".into(),
            region: "ENG".into(),
            region_name: "England".into(),
            city: "London".into(),
        };
        let checked_at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap();
        let row = AuditRecord::new(CheckResult::new(request, geo), checked_at).to_row();

        assert_eq!(
            row,
            vec![
                json!(42),
                json!("r-7"),
                json!("81.2.69.160"),
                json!("United Kingdom"),
                json!("GB"),
                json!("ENG"),
                json!("England"),
                json!("London"),
                json!("2024-05-01T12:30:00.000000Z"),
            ]
        );
    }
}
