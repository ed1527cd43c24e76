//! Scripted transport and fixtures shared by the gateway and view-state tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use crate::net::api::ApiClient;
use crate::net::error::TransportError;
use crate::net::transport::{ApiRequest, ApiResponse, Transport};
use crate::state::notify::NotificationLog;
use crate::state::role::Role;
use crate::state::session::{Identity, SessionStore};

/// Replays queued responses in order and records every request it receives.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Result<ApiResponse, TransportError>>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl MockTransport {
    pub fn reply(&self, status: u16, body: impl Into<String>) -> &Self {
        self.push(Ok(ApiResponse::new(status, body)))
    }

    pub fn fail(&self, error: TransportError) -> &Self {
        self.push(Err(error))
    }

    fn push(&self, reply: Result<ApiResponse, TransportError>) -> &Self {
        self.replies.lock().unwrap_or_else(PoisonError::into_inner).push_back(reply);
        self
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn last_request(&self) -> ApiRequest {
        self.requests().pop().expect("no request was sent")
    }
}

#[async_trait::async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        self.requests.lock().unwrap_or_else(PoisonError::into_inner).push(request);
        self.replies
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Other("no scripted reply".to_owned())))
    }
}

pub struct Harness {
    pub client: ApiClient,
    pub transport: Arc<MockTransport>,
    pub notes: Arc<NotificationLog>,
    pub session: SessionStore,
}

pub fn harness() -> Harness {
    let transport = Arc::new(MockTransport::default());
    let notes = Arc::new(NotificationLog::new());
    let session = SessionStore::in_memory();
    let client = ApiClient::new(transport.clone(), session.clone(), notes.clone());
    Harness { client, transport, notes, session }
}

pub fn identity(roles: &[Role]) -> Identity {
    Identity::new("7", "alice", "alice@example.com", roles.iter().cloned()).unwrap()
}

impl Harness {
    pub fn sign_in_as(&self, roles: &[Role]) {
        self.session.set_auth("tok-1".to_owned(), Some("ref-1".to_owned()), identity(roles));
    }
}
