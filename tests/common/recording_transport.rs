//! In-memory transport that records every call
//!
//! Calls can be made to fail by path, either a fixed number of times with a
//! retryable status or for good with a client error.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Mutex;

use ensab::family_tree::{MemberTransport, RemoteCall, TransportError};
use ensab::shared::RawMember;
use uuid::Uuid;

#[derive(Default)]
pub struct RecordingTransport {
    pub dispatched: Mutex<Vec<RemoteCall>>,
    pub sent: Mutex<Vec<RemoteCall>>,
    failures: Mutex<HashMap<String, Failure>>,
    families: Mutex<HashMap<Uuid, RawMember>>,
}

#[derive(Clone, Copy)]
enum Failure {
    Transient(u32),
    Permanent,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `family` from `fetch`
    pub fn with_family(self, family: RawMember) -> Self {
        self.families.lock().unwrap().insert(family.id, family);
        self
    }

    /// Fail the next `times` sends to `path` with a 503
    pub fn fail_times(&self, path: impl Into<String>, times: u32) {
        self.failures
            .lock()
            .unwrap()
            .insert(path.into(), Failure::Transient(times));
    }

    /// Fail every send to `path` with a 400
    pub fn fail_always(&self, path: impl Into<String>) {
        self.failures
            .lock()
            .unwrap()
            .insert(path.into(), Failure::Permanent);
    }

    pub fn dispatched(&self) -> Vec<RemoteCall> {
        self.dispatched.lock().unwrap().clone()
    }

    pub fn sent(&self) -> Vec<RemoteCall> {
        self.sent.lock().unwrap().clone()
    }

    fn outcome(&self, path: &str) -> Result<(), TransportError> {
        let mut failures = self.failures.lock().unwrap();
        match failures.get(path).copied() {
            Some(Failure::Permanent) => Err(TransportError::Status {
                status: 400,
                body: "rejected".to_string(),
            }),
            Some(Failure::Transient(remaining)) if remaining > 0 => {
                failures.insert(path.to_string(), Failure::Transient(remaining - 1));
                Err(TransportError::Status {
                    status: 503,
                    body: "unavailable".to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

impl MemberTransport for RecordingTransport {
    fn dispatch(&self, call: RemoteCall) {
        self.dispatched.lock().unwrap().push(call);
    }

    fn send(&self, call: RemoteCall) -> impl Future<Output = Result<(), TransportError>> + Send {
        let outcome = self.outcome(&call.path());
        self.sent.lock().unwrap().push(call);
        async move { outcome }
    }

    fn fetch(&self, id: Uuid) -> impl Future<Output = Result<RawMember, TransportError>> + Send {
        let family = self.families.lock().unwrap().get(&id).cloned();
        async move {
            family.ok_or(TransportError::Status {
                status: 404,
                body: "not found".to_string(),
            })
        }
    }
}
