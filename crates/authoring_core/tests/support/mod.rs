//! Scripted remote side shared by integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use authoring_core::{RemoteChannel, RemoteReply, RemoteRequest, TransportError};
use std::sync::{Arc, Mutex};

type Script = dyn Fn(&RemoteRequest) -> Result<RemoteReply, TransportError> + Send + Sync;

/// Channel that answers every request with `script` and records it.
pub struct StubChannel {
    script: Box<Script>,
    requests: Mutex<Vec<RemoteRequest>>,
}

impl StubChannel {
    pub fn new<F>(script: F) -> Arc<Self>
    where
        F: Fn(&RemoteRequest) -> Result<RemoteReply, TransportError> + Send + Sync + 'static,
    {
        Arc::new(Self {
            script: Box::new(script),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Channel whose remote side is unreachable.
    pub fn unreachable() -> Arc<Self> {
        Self::new(|_| Err(TransportError::unreachable("remote document torn down")))
    }

    pub fn requests(&self) -> Vec<RemoteRequest> {
        self.requests.lock().expect("request log lock").clone()
    }

    pub fn operations(&self) -> Vec<String> {
        self.requests()
            .into_iter()
            .map(|request| request.operation)
            .collect()
    }
}

#[async_trait]
impl RemoteChannel for StubChannel {
    async fn send(&self, request: RemoteRequest) -> Result<RemoteReply, TransportError> {
        let reply = (self.script)(&request);
        self.requests.lock().expect("request log lock").push(request);
        reply
    }
}
