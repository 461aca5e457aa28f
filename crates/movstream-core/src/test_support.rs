//! Scripted collaborators shared by unit tests.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::fetch::{FetchError, FetchedBody, HeadResult, Transport};

#[derive(Debug, Clone)]
pub(crate) enum Reply {
    Ok(HeadResult, Vec<u8>),
    Status(u32),
    /// Never completes.
    Hang,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Call {
    pub method: &'static str,
    pub url: String,
    pub accept: Option<String>,
}

pub(crate) struct ScriptedTransport {
    head: Reply,
    get: Reply,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new(head: Reply, get: Reply) -> Self {
        Self {
            head,
            get,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, method: &str) -> usize {
        self.calls().iter().filter(|c| c.method == method).count()
    }

    fn record(&self, method: &'static str, url: &str, headers: &HashMap<String, String>) {
        self.calls.lock().unwrap().push(Call {
            method,
            url: url.to_string(),
            accept: headers.get("Accept").cloned(),
        });
    }
}

async fn answer(reply: &Reply) -> Result<(HeadResult, Vec<u8>), FetchError> {
    match reply {
        Reply::Ok(head, body) => Ok((head.clone(), body.clone())),
        Reply::Status(code) => Err(FetchError::Http(*code)),
        Reply::Hang => std::future::pending().await,
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn head(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<HeadResult, FetchError> {
        self.record("HEAD", url, headers);
        answer(&self.head).await.map(|(head, _)| head)
    }

    async fn get(
        &self,
        url: &str,
        headers: &HashMap<String, String>,
    ) -> Result<FetchedBody, FetchError> {
        self.record("GET", url, headers);
        answer(&self.get)
            .await
            .map(|(head, body)| FetchedBody { head, body })
    }
}

pub(crate) fn head_with(content_type: Option<&str>, disposition: Option<&str>) -> HeadResult {
    HeadResult {
        content_type: content_type.map(str::to_string),
        content_disposition: disposition.map(str::to_string),
        content_length: None,
    }
}
