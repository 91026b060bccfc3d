use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::{
    errors::{AppError, AuditLogError},
    models::{AuditRecord, GeoLocation},
    ports::{
        audit_log::{AuditLog, CredentialStatus},
        geolocation::GeoLocator,
    },
};

/// Answers every lookup with a canned upstream body.
pub struct FakeGeo {
    body: Option<Value>,
    pub lookups: Mutex<Vec<String>>,
}

impl FakeGeo {
    pub fn answering(body: Value) -> Arc<Self> {
        Arc::new(Self {
            body: Some(body),
            lookups: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            body: None,
            lookups: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<String> {
        self.lookups.lock().unwrap().clone()
    }
}

#[async_trait]
impl GeoLocator for FakeGeo {
    async fn locate(&self, ip: &str) -> Result<GeoLocation, AppError> {
        self.lookups.lock().unwrap().push(ip.to_string());
        match &self.body {
            Some(body) => Ok(GeoLocation::from_lookup(body)),
            None => Err(AppError::Geolocation("connection refused".into())),
        }
    }
}

/// Keeps appended records in memory, or fails every append.
#[derive(Default)]
pub struct MemoryAuditLog {
    pub records: Mutex<Vec<AuditRecord>>,
    pub attempts: AtomicUsize,
    pub fail_with_write_error: bool,
}

impl MemoryAuditLog {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn broken() -> Arc<Self> {
        Arc::new(Self {
            fail_with_write_error: true,
            ..Self::default()
        })
    }

    pub fn rows(&self) -> Vec<Vec<Value>> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(AuditRecord::to_row)
            .collect()
    }
}

#[async_trait]
impl AuditLog for MemoryAuditLog {
    async fn append(&self, record: &AuditRecord) -> Result<(), AuditLogError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        if self.fail_with_write_error {
            return Err(AuditLogError::Write("quota exceeded".into()));
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    fn credential_status(&self) -> CredentialStatus {
        CredentialStatus {
            found: true,
            length: 42,
        }
    }
}
