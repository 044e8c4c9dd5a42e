use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;
use url::Url;

use business::domain::health::services::DatabaseProbe;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("database.request_failed")]
    Request(#[from] reqwest::Error),
    #[error("database.rejected: {status} {message}")]
    Rejected { status: u16, message: String },
    #[error("database.decode_failed")]
    Decode(#[from] serde_json::Error),
}

/// Realtime Database handle speaking the REST protocol.
#[derive(Clone)]
pub struct Database {
    client: Client,
    base_url: Url,
}

/// A location in the database tree, addressed by a slash-separated path.
#[derive(Clone)]
pub struct Reference {
    client: Client,
    base_url: Url,
    path: String,
}

impl Database {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn root(&self) -> Reference {
        self.reference("")
    }

    pub fn reference(&self, path: &str) -> Reference {
        Reference {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            path: clean_path(path),
        }
    }
}

#[async_trait]
impl DatabaseProbe for Database {
    /// Shallow read of the root node. A permission error still proves the
    /// database answered.
    async fn ping(&self) -> Result<(), String> {
        let url = node_url(&self.base_url, "", None, &[("shallow", "true")]);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| format!("database.unreachable: {e}"))?;
        probe_outcome(response.status())
    }
}

impl Reference {
    pub fn child(&self, segment: &str) -> Reference {
        let segment = clean_path(segment);
        let path = match (self.path.is_empty(), segment.is_empty()) {
            (_, true) => self.path.clone(),
            (true, false) => segment,
            (false, false) => format!("{}/{}", self.path, segment),
        };
        Reference {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            path,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// REST endpoint of this node, authenticated with `id_token` when given.
    pub fn url(&self, id_token: Option<&str>) -> Url {
        node_url(&self.base_url, &self.path, id_token, &[])
    }

    /// Reads the node. Absent nodes come back as JSON `null`, so callers
    /// usually ask for an `Option<T>`.
    pub async fn get<T: DeserializeOwned>(&self, id_token: Option<&str>) -> Result<T, DatabaseError> {
        let body = self.send(Method::GET, id_token, None).await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Replaces the node with `value`.
    pub async fn set<T: Serialize + Sync>(
        &self,
        value: &T,
        id_token: Option<&str>,
    ) -> Result<(), DatabaseError> {
        let payload = serde_json::to_value(value)?;
        self.send(Method::PUT, id_token, Some(payload)).await?;
        Ok(())
    }

    /// Merges the given children into the node.
    pub async fn update<T: Serialize + Sync>(
        &self,
        value: &T,
        id_token: Option<&str>,
    ) -> Result<(), DatabaseError> {
        let payload = serde_json::to_value(value)?;
        self.send(Method::PATCH, id_token, Some(payload)).await?;
        Ok(())
    }

    /// Appends `value` under a generated key and returns that key.
    pub async fn push<T: Serialize + Sync>(
        &self,
        value: &T,
        id_token: Option<&str>,
    ) -> Result<String, DatabaseError> {
        let payload = serde_json::to_value(value)?;
        let body = self.send(Method::POST, id_token, Some(payload)).await?;
        pushed_key(&body)
    }

    pub async fn remove(&self, id_token: Option<&str>) -> Result<(), DatabaseError> {
        self.send(Method::DELETE, id_token, None).await?;
        Ok(())
    }

    async fn send(
        &self,
        method: Method,
        id_token: Option<&str>,
        payload: Option<Value>,
    ) -> Result<String, DatabaseError> {
        let mut request = self.client.request(method, self.url(id_token));
        if let Some(payload) = payload {
            request = request.json(&payload);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(DatabaseError::Rejected {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(body)
    }
}

fn clean_path(path: &str) -> String {
    path.split('/')
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

fn node_url(base_url: &Url, path: &str, id_token: Option<&str>, extra: &[(&str, &str)]) -> Url {
    let mut url = base_url.clone();
    let base_path = url.path().trim_end_matches('/').to_string();
    url.set_path(&format!("{}/{}.json", base_path, path));

    if id_token.is_some() || !extra.is_empty() {
        let mut pairs = url.query_pairs_mut();
        if let Some(token) = id_token {
            pairs.append_pair("auth", token);
        }
        for (key, value) in extra {
            pairs.append_pair(key, value);
        }
    }

    url
}

fn probe_outcome(status: StatusCode) -> Result<(), String> {
    if status.is_success() || status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN
    {
        Ok(())
    } else {
        Err(format!("database.unexpected_status: {}", status.as_u16()))
    }
}

/// Firebase reports failures as `{"error": "..."}`; fall back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}

fn pushed_key(body: &str) -> Result<String, DatabaseError> {
    let value: Value = serde_json::from_str(body)?;
    value
        .get("name")
        .and_then(|name| name.as_str())
        .map(str::to_string)
        .ok_or_else(|| DatabaseError::Rejected {
            status: 200,
            message: "database.push_without_key".to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn database(base: &str) -> Database {
        Database::new(Client::new(), Url::parse(base).unwrap())
    }

    #[test]
    fn should_address_root_node_as_dot_json() {
        let db = database("https://kwentas-default-rtdb.firebaseio.com");

        let url = db.root().url(None);

        assert_eq!(url.as_str(), "https://kwentas-default-rtdb.firebaseio.com/.json");
    }

    #[test]
    fn should_join_child_segments_without_duplicate_slashes() {
        let db = database("https://kwentas-default-rtdb.firebaseio.com/");

        let reference = db.reference("/accounts/").child("uid-42/").child("/ledger");

        assert_eq!(reference.path(), "accounts/uid-42/ledger");
        assert_eq!(
            reference.url(None).as_str(),
            "https://kwentas-default-rtdb.firebaseio.com/accounts/uid-42/ledger.json"
        );
    }

    #[test]
    fn should_ignore_empty_child_segment() {
        let db = database("https://kwentas-default-rtdb.firebaseio.com");

        let reference = db.reference("accounts").child("");

        assert_eq!(reference.path(), "accounts");
    }

    #[test]
    fn should_append_id_token_as_auth_parameter() {
        let db = database("https://kwentas-default-rtdb.firebaseio.com");

        let url = db.reference("accounts").url(Some("token-123"));

        assert_eq!(
            url.as_str(),
            "https://kwentas-default-rtdb.firebaseio.com/accounts.json?auth=token-123"
        );
    }

    #[test]
    fn should_keep_emulator_namespace_parameter() {
        let db = database("http://localhost:9000/?ns=kwentas");

        let url = db.reference("accounts").url(Some("owner"));

        assert_eq!(
            url.as_str(),
            "http://localhost:9000/accounts.json?ns=kwentas&auth=owner"
        );
    }

    #[test]
    fn should_build_shallow_ping_url() {
        let url = node_url(
            &Url::parse("https://kwentas-default-rtdb.firebaseio.com").unwrap(),
            "",
            None,
            &[("shallow", "true")],
        );

        assert_eq!(
            url.as_str(),
            "https://kwentas-default-rtdb.firebaseio.com/.json?shallow=true"
        );
    }

    #[test]
    fn should_count_permission_errors_as_reachable() {
        assert!(probe_outcome(StatusCode::OK).is_ok());
        assert!(probe_outcome(StatusCode::UNAUTHORIZED).is_ok());
        assert!(probe_outcome(StatusCode::FORBIDDEN).is_ok());
    }

    #[test]
    fn should_count_server_and_namespace_errors_as_unreachable() {
        assert!(probe_outcome(StatusCode::NOT_FOUND).is_err());
        assert!(probe_outcome(StatusCode::SERVICE_UNAVAILABLE).is_err());
    }

    #[test]
    fn should_extract_firebase_error_message() {
        assert_eq!(error_message(r#"{"error": "Permission denied"}"#), "Permission denied");
        assert_eq!(error_message(" Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn should_read_generated_key_from_push_response() {
        assert_eq!(pushed_key(r#"{"name":"-Nabc123"}"#).unwrap(), "-Nabc123");
        assert!(pushed_key(r#"{}"#).is_err());
    }

    /// Answers one HTTP request with `status` and `body`, then hands back the
    /// request line and body it received.
    async fn reply_once(
        status: &'static str,
        body: &'static str,
    ) -> (Database, tokio::task::JoinHandle<(String, String)>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut raw = Vec::new();
            let mut chunk = [0u8; 1024];

            let head_end = loop {
                let read = socket.read(&mut chunk).await.unwrap();
                raw.extend_from_slice(&chunk[..read]);
                if let Some(pos) = raw.windows(4).position(|w| w == b"\r\n\r\n") {
                    break pos + 4;
                }
            };

            let head = String::from_utf8_lossy(&raw[..head_end]).to_string();
            let content_length = head
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            while raw.len() < head_end + content_length {
                let read = socket.read(&mut chunk).await.unwrap();
                raw.extend_from_slice(&chunk[..read]);
            }

            let response = format!(
                "HTTP/1.1 {status}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();

            let request_line = head.lines().next().unwrap_or_default().to_string();
            let request_body = String::from_utf8_lossy(&raw[head_end..]).to_string();
            (request_line, request_body)
        });

        (database(&base), handle)
    }

    #[tokio::test]
    async fn should_read_node_with_get() {
        let (db, server) = reply_once("200 OK", r#"{"balance":120}"#).await;

        let value: Option<Value> = db.reference("accounts/uid-42").get(Some("tok")).await.unwrap();

        let (request_line, _) = server.await.unwrap();
        assert_eq!(request_line, "GET /accounts/uid-42.json?auth=tok HTTP/1.1");
        assert_eq!(value.unwrap()["balance"], 120);
    }

    #[tokio::test]
    async fn should_replace_node_with_put() {
        let (db, server) = reply_once("200 OK", r#"{"balance":50}"#).await;

        db.reference("accounts/uid-42")
            .set(&serde_json::json!({ "balance": 50 }), Some("tok"))
            .await
            .unwrap();

        let (request_line, body) = server.await.unwrap();
        assert_eq!(request_line, "PUT /accounts/uid-42.json?auth=tok HTTP/1.1");
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["balance"], 50);
    }

    #[tokio::test]
    async fn should_merge_children_with_patch() {
        let (db, server) = reply_once("200 OK", r#"{"name":"Ana"}"#).await;

        db.reference("accounts")
            .child("uid-42")
            .update(&serde_json::json!({ "name": "Ana" }), Some("tok"))
            .await
            .unwrap();

        let (request_line, body) = server.await.unwrap();
        assert_eq!(request_line, "PATCH /accounts/uid-42.json?auth=tok HTTP/1.1");
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["name"], "Ana");
    }

    #[tokio::test]
    async fn should_append_with_post_and_return_generated_key() {
        let (db, server) = reply_once("200 OK", r#"{"name":"-Nxyz789"}"#).await;

        let key = db
            .reference("ledger")
            .push(&serde_json::json!({ "amount": 15 }), Some("tok"))
            .await
            .unwrap();

        let (request_line, body) = server.await.unwrap();
        assert_eq!(key, "-Nxyz789");
        assert_eq!(request_line, "POST /ledger.json?auth=tok HTTP/1.1");
        assert_eq!(serde_json::from_str::<Value>(&body).unwrap()["amount"], 15);
    }

    #[tokio::test]
    async fn should_delete_node_with_delete() {
        let (db, server) = reply_once("200 OK", "null").await;

        db.reference("ledger/-Nxyz789").remove(Some("tok")).await.unwrap();

        let (request_line, _) = server.await.unwrap();
        assert_eq!(request_line, "DELETE /ledger/-Nxyz789.json?auth=tok HTTP/1.1");
    }

    #[tokio::test]
    async fn should_return_rejected_when_rules_deny_write() {
        let (db, server) = reply_once("401 Unauthorized", r#"{"error":"Permission denied"}"#).await;

        let result = db
            .reference("accounts/uid-42")
            .set(&serde_json::json!({ "balance": 0 }), Some("expired"))
            .await;

        server.await.unwrap();
        match result {
            Err(DatabaseError::Rejected { status, message }) => {
                assert_eq!(status, 401);
                assert_eq!(message, "Permission denied");
            }
            other => panic!("expected rejection, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn should_fail_ping_when_nothing_listens() {
        let db = database("http://127.0.0.1:9");

        let result = db.ping().await;

        assert!(result.unwrap_err().starts_with("database.unreachable"));
    }
}
