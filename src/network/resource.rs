//! Generic REST resource: a URL template plus a table of named actions.
//!
//! A resource maps one logical name (`systemconfig/status/:action`) onto
//! plain HTTP calls.  There is no retry and no caching; every method issues
//! exactly one request.

use std::marker::PhantomData;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::config::ApiConfig;
use super::transport::{HttpRequest, HttpTransport, Method};
use super::ApiError;

/// A named extra operation on a resource, e.g. `stop` → `GET` with
/// `action=stop`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionBinding {
    pub name: &'static str,
    pub method: Method,
    pub params: Vec<(String, String)>,
}

pub struct Resource<T, H> {
    template: String,
    defaults: Vec<(String, String)>,
    actions: Vec<ActionBinding>,
    transport: Rc<H>,
    _doc: PhantomData<T>,
}

impl<T, H> Resource<T, H>
where
    T: Serialize + DeserializeOwned + Clone,
    H: HttpTransport,
{
    pub fn new(config: &ApiConfig, path: &str, transport: Rc<H>) -> Self {
        Self {
            template: config.url(path),
            defaults: Vec::new(),
            actions: Vec::new(),
            transport,
            _doc: PhantomData,
        }
    }

    /// Parameter used by `get`/`save` and by any action that does not
    /// override it.
    pub fn with_default_param(mut self, key: &str, value: &str) -> Self {
        self.defaults.push((key.to_string(), value.to_string()));
        self
    }

    pub fn with_action(mut self, name: &'static str, method: Method, params: &[(&str, &str)]) -> Self {
        self.actions.push(ActionBinding {
            name,
            method,
            params: params
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });
        self
    }

    /// Build the request URL for the given parameter overrides.
    ///
    /// `:name` placeholders take their value from the overrides, then the
    /// defaults.  A placeholder without a value is removed together with the
    /// `/` in front of it.  Parameters that do not appear in the template are
    /// appended as a query string.
    pub fn url(&self, overrides: &[(String, String)]) -> String {
        let lookup = |key: &str| -> Option<&str> {
            overrides
                .iter()
                .chain(self.defaults.iter())
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        let mut used: Vec<&str> = Vec::new();
        let mut segments: Vec<String> = Vec::new();
        for segment in self.template.split('/') {
            match segment.strip_prefix(':') {
                Some(name) => {
                    used.push(name);
                    if let Some(value) = lookup(name) {
                        segments.push(value.to_string());
                    }
                }
                None => segments.push(segment.to_string()),
            }
        }
        let mut url = segments.join("/");

        let mut query: Vec<String> = Vec::new();
        for (key, _) in overrides.iter().chain(self.defaults.iter()) {
            if used.contains(&key.as_str()) || query.iter().any(|q| q.starts_with(&format!("{}=", key))) {
                continue;
            }
            if let Some(value) = lookup(key) {
                query.push(format!("{}={}", key, value));
            }
        }
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }
        url
    }

    /// Fetch the document.
    pub async fn get(&self) -> Result<T, ApiError> {
        let body = self.send(Method::Get, &[], None).await?;
        decode(&body)
    }

    /// Store the document.  The backend answers with what it stored; an empty
    /// answer means the document was taken as sent.
    pub async fn save(&self, value: &T) -> Result<T, ApiError> {
        let payload = serde_json::to_string(value).map_err(|e| ApiError::Encode(e.to_string()))?;
        let body = self.send(Method::Post, &[], Some(payload)).await?;
        if is_empty_body(&body) {
            return Ok(value.clone());
        }
        decode(&body)
    }

    /// Run a named action.  Actions such as `stop` answer with no body,
    /// which comes back as `None`.
    pub async fn invoke<R: DeserializeOwned>(&self, action: &str) -> Result<Option<R>, ApiError> {
        let binding = self
            .actions
            .iter()
            .find(|a| a.name == action)
            .ok_or_else(|| ApiError::UnknownAction(action.to_string()))?;
        let params = binding.params.clone();
        let body = self.send(binding.method, &params, None).await?;
        if is_empty_body(&body) {
            return Ok(None);
        }
        decode(&body).map(Some)
    }

    async fn send(
        &self,
        method: Method,
        params: &[(String, String)],
        body: Option<String>,
    ) -> Result<String, ApiError> {
        let request = HttpRequest { method, url: self.url(params), body };
        self.transport.send(request).await
    }
}

fn is_empty_body(body: &str) -> bool {
    let trimmed = body.trim();
    trimmed.is_empty() || trimmed == "null"
}

fn decode<R: DeserializeOwned>(body: &str) -> Result<R, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MetadataConfig, Progress, StatusSnapshot};
    use crate::test_support::MockTransport;
    use futures::executor::block_on;

    fn status_resource(transport: Rc<MockTransport>) -> Resource<StatusSnapshot, MockTransport> {
        Resource::new(&ApiConfig::default(), "systemconfig/status/:action", transport)
            .with_default_param("action", "status")
            .with_action("stop", Method::Get, &[("action", "stop")])
            .with_action("progress", Method::Get, &[("action", "progress")])
    }

    #[test]
    fn default_action_fills_placeholder() {
        let res = status_resource(Rc::new(MockTransport::new()));
        assert_eq!(res.url(&[]), "systemconfig/status/status");
        assert_eq!(
            res.url(&[("action".into(), "stop".into())]),
            "systemconfig/status/stop"
        );
    }

    #[test]
    fn missing_placeholder_drops_segment_and_extra_params_go_to_query() {
        let res: Resource<StatusSnapshot, MockTransport> =
            Resource::new(&ApiConfig::default(), "systemconfig/status/:action", Rc::new(MockTransport::new()));
        assert_eq!(res.url(&[]), "systemconfig/status");
        assert_eq!(
            res.url(&[("verbose".into(), "1".into())]),
            "systemconfig/status?verbose=1"
        );
    }

    #[test]
    fn get_issues_one_request_and_decodes() {
        let transport = Rc::new(MockTransport::new());
        transport.respond("systemconfig/status/status", r#"{"status":"stopped"}"#);
        let res = status_resource(transport.clone());

        let status = block_on(res.get()).unwrap();
        assert_eq!(status.status, "stopped");
        assert_eq!(transport.requests().len(), 1);
        assert_eq!(transport.requests()[0].method, Method::Get);
    }

    #[test]
    fn save_posts_body_and_takes_stored_document() {
        let transport = Rc::new(MockTransport::new());
        transport.respond("systemconfig/metadata", r#"{"attributes":["a","b"]}"#);
        let res: Resource<MetadataConfig, _> =
            Resource::new(&ApiConfig::default(), "systemconfig/metadata", transport.clone());

        let sent = MetadataConfig { attributes: vec!["a".into()], ..Default::default() };
        let stored = block_on(res.save(&sent)).unwrap();

        assert_eq!(stored.attributes, vec!["a", "b"]);
        let req = &transport.requests()[0];
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.body.as_deref(), Some(r#"{"attributes":["a"]}"#));
    }

    #[test]
    fn save_with_empty_answer_keeps_sent_document() {
        let transport = Rc::new(MockTransport::new());
        transport.respond("systemconfig/metadata", "");
        let res: Resource<MetadataConfig, _> =
            Resource::new(&ApiConfig::default(), "systemconfig/metadata", transport);
        let sent = MetadataConfig { attributes: vec!["x".into()], ..Default::default() };
        assert_eq!(block_on(res.save(&sent)).unwrap(), sent);
    }

    #[test]
    fn actions_use_their_bound_params() {
        let transport = Rc::new(MockTransport::new());
        transport.respond("systemconfig/status/progress", r#"{"fileCount":4,"queueCount":2}"#);
        transport.respond("systemconfig/status/stop", "");
        let res = status_resource(transport.clone());

        let progress: Option<Progress> = block_on(res.invoke("progress")).unwrap();
        assert_eq!(progress, Some(Progress { file_count: 4, queue_count: 2 }));

        let stopped: Option<serde_json::Value> = block_on(res.invoke("stop")).unwrap();
        assert!(stopped.is_none());
        assert_eq!(transport.urls(), vec!["systemconfig/status/progress", "systemconfig/status/stop"]);
    }

    #[test]
    fn unknown_action_sends_nothing() {
        let transport = Rc::new(MockTransport::new());
        let res = status_resource(transport.clone());
        let err = block_on(res.invoke::<serde_json::Value>("restart")).unwrap_err();
        assert_eq!(err, ApiError::UnknownAction("restart".into()));
        assert!(transport.requests().is_empty());
    }

    #[test]
    fn transport_failure_is_returned_not_raised() {
        let transport = Rc::new(MockTransport::new());
        transport.fail("systemconfig/status/status", 500);
        let res = status_resource(transport);
        let err = block_on(res.get()).unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 500, .. }));
    }
}
