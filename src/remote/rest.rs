use std::time::Duration;

use serde_json::Value;
use ureq::http::Response;
use ureq::{Agent, Body, RequestBuilder};

use super::{Database, Query};
use crate::config::DatabaseSettings;
use crate::error::{BooksError, Result};

/// PostgREST client for the hosted database (`{url}/rest/v1/{table}`)
pub struct RestClient {
    agent: Agent,
    base_url: String,
    api_key: String,
    bearer: String,
}

impl RestClient {
    pub fn new(
        url: &str,
        api_key: &str,
        access_token: Option<&str>,
        timeout: Duration,
    ) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            bearer: access_token.unwrap_or(api_key).to_string(),
        }
    }

    pub fn from_settings(settings: &DatabaseSettings) -> Result<Self> {
        let url = settings
            .url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or(BooksError::MissingSetting("database.url"))?;
        let api_key = settings
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(BooksError::MissingSetting("database.api_key"))?;

        Ok(Self::new(
            url,
            api_key,
            settings.access_token.as_deref(),
            Duration::from_secs(settings.timeout_secs),
        ))
    }

    pub fn endpoint(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn authorize<B>(&self, request: RequestBuilder<B>) -> RequestBuilder<B> {
        request
            .header("apikey", &self.api_key)
            .header("Authorization", &format!("Bearer {}", self.bearer))
    }

    fn with_filters<B>(request: RequestBuilder<B>, query: &Query) -> RequestBuilder<B> {
        query
            .filters()
            .iter()
            .map(|f| f.param())
            .fold(request, |req, (k, v)| req.query(k, v))
    }

    fn with_params<B>(request: RequestBuilder<B>, query: &Query) -> RequestBuilder<B> {
        query
            .params()
            .into_iter()
            .fold(request, |req, (k, v)| req.query(k, v))
    }
}

impl Database for RestClient {
    fn select(&self, query: &Query) -> Result<Vec<Value>> {
        let url = self.endpoint(query.table_name());
        tracing::debug!(%url, params = ?query.params(), "select");

        let request = Self::with_params(self.authorize(self.agent.get(&url)), query);
        read_rows(request.call()?)
    }

    fn count(&self, query: &Query) -> Result<u64> {
        let url = self.endpoint(query.table_name());
        tracing::debug!(%url, "count");

        let request = Self::with_filters(self.authorize(self.agent.head(&url)), query)
            .header("Prefer", "count=exact");
        let response = request.call()?;
        let status = response.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(BooksError::Remote {
                status,
                message: "count request rejected".to_string(),
            });
        }

        response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_content_range)
            .ok_or_else(|| BooksError::Http("response carried no row count".to_string()))
    }

    fn insert(&self, table: &str, rows: &[Value]) -> Result<Vec<Value>> {
        let url = self.endpoint(table);
        tracing::debug!(%url, rows = rows.len(), "insert");

        let body = serde_json::to_string(rows)?;
        let response = self
            .authorize(self.agent.post(&url))
            .header("Content-Type", "application/json")
            .header("Prefer", "return=representation")
            .send(body)?;
        read_rows(response)
    }

    fn update(&self, query: &Query, patch: &Value) -> Result<Vec<Value>> {
        let url = self.endpoint(query.table_name());
        tracing::debug!(%url, "update");

        let body = serde_json::to_string(patch)?;
        let response = Self::with_filters(self.authorize(self.agent.patch(&url)), query)
            .header("Content-Type", "application/json")
            .header("Prefer", "return=representation")
            .send(body)?;
        read_rows(response)
    }

    fn delete(&self, query: &Query) -> Result<Vec<Value>> {
        let url = self.endpoint(query.table_name());
        tracing::debug!(%url, "delete");

        let response = Self::with_filters(self.authorize(self.agent.delete(&url)), query)
            .header("Prefer", "return=representation")
            .call()?;
        read_rows(response)
    }
}

fn read_rows(mut response: Response<Body>) -> Result<Vec<Value>> {
    let status = response.status().as_u16();
    let text = response.body_mut().read_to_string()?;

    if !(200..300).contains(&status) {
        return Err(BooksError::Remote {
            status,
            message: error_message(&text),
        });
    }

    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str(&text) {
        Ok(Value::Array(rows)) => Ok(rows),
        Ok(row @ Value::Object(_)) => Ok(vec![row]),
        Ok(other) => Err(BooksError::Http(format!("unexpected response body: {other}"))),
        Err(e) => Err(BooksError::Http(format!("invalid JSON response: {e}"))),
    }
}

/// PostgREST error bodies carry `message`, sometimes with `details` and `hint`
fn error_message(body: &str) -> String {
    let Ok(json) = serde_json::from_str::<Value>(body) else {
        return body.trim().to_string();
    };

    let message = json["message"]
        .as_str()
        .or_else(|| json["msg"].as_str())
        .or_else(|| json["error"].as_str())
        .unwrap_or(body.trim());

    match json["details"].as_str().filter(|d| !d.is_empty()) {
        Some(details) => format!("{message} ({details})"),
        None => message.to_string(),
    }
}

/// Total from a `Content-Range` header such as `0-24/573` or `*/0`
fn parse_content_range(header: &str) -> Option<u64> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EntryKind;
    use std::io::{BufRead, BufReader, Write};
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Answer one request with `response` and hand back the request head
    fn serve_once(response: String) -> (RestClient, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let url = format!("http://{}", listener.local_addr().unwrap());

        let handle = thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut head = String::new();
            loop {
                let mut line = String::new();
                let read = reader.read_line(&mut line).unwrap();
                if read == 0 || line == "\r\n" {
                    break;
                }
                head.push_str(&line);
            }
            stream.write_all(response.as_bytes()).unwrap();
            stream.flush().unwrap();
            head
        });

        let client = RestClient::new(&url, "anon", Some("jwt"), Duration::from_secs(5));
        (client, handle)
    }

    fn json_response(status: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    #[test]
    fn select_sends_postgrest_params_and_auth() {
        let (client, server) = serve_once(json_response(
            "200 OK",
            r#"[{"id":"t1","amount":10},{"id":"t2","amount":5}]"#,
        ));

        let rows = client
            .select(
                &Query::table("transactions")
                    .select("id,amount")
                    .eq("type", EntryKind::Income)
                    .order_desc("date")
                    .limit(2),
            )
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["id"], "t1");

        let head = server.join().unwrap();
        let request_line = head.lines().next().unwrap();
        assert!(request_line.starts_with("GET /rest/v1/transactions?"));
        assert!(request_line.contains("select=id%2Camount"));
        assert!(request_line.contains("type=eq.income"));
        assert!(request_line.contains("order=date.desc"));
        assert!(request_line.contains("limit=2"));

        let head = head.to_lowercase();
        assert!(head.contains("apikey: anon"));
        assert!(head.contains("authorization: bearer jwt"));
    }

    #[test]
    fn count_reads_total_from_content_range() {
        let (client, server) = serve_once(
            "HTTP/1.1 206 Partial Content\r\nContent-Range: 0-1/4\r\nContent-Length: 0\r\nConnection: close\r\n\r\n"
                .to_string(),
        );

        let total = client
            .count(&Query::table("customers").gte("created_at", "2024-02-17"))
            .unwrap();

        assert_eq!(total, 4);

        let head = server.join().unwrap();
        assert!(head.starts_with("HEAD /rest/v1/customers?created_at=gte.2024-02-17 "));
        assert!(head.to_lowercase().contains("prefer: count=exact"));
    }

    #[test]
    fn error_status_maps_to_remote_error() {
        let (client, server) = serve_once(json_response(
            "400 Bad Request",
            r#"{"code":"PGRST100","message":"failed to parse filter","details":"unexpected \"x\"","hint":null}"#,
        ));

        let err = client.select(&Query::table("invoices")).unwrap_err();
        server.join().unwrap();

        match err {
            BooksError::Remote { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "failed to parse filter (unexpected \"x\")");
            }
            other => panic!("expected a remote error, got {other:?}"),
        }
    }

    #[test]
    fn empty_body_reads_as_no_rows() {
        let (client, server) = serve_once(
            "HTTP/1.1 204 No Content\r\nConnection: close\r\n\r\n".to_string(),
        );

        let rows = client
            .delete(&Query::table("categories").eq("id", "cat-1"))
            .unwrap();

        assert!(rows.is_empty());
        let head = server.join().unwrap();
        assert!(head.starts_with("DELETE /rest/v1/categories?id=eq.cat-1 "));
    }

    #[test]
    fn parses_content_range_totals() {
        assert_eq!(parse_content_range("0-24/573"), Some(573));
        assert_eq!(parse_content_range("*/0"), Some(0));
        assert_eq!(parse_content_range("0-9/*"), None);
        assert_eq!(parse_content_range("garbage"), None);
    }

    #[test]
    fn extracts_postgrest_error_messages() {
        assert_eq!(
            error_message(r#"{"code":"42P01","message":"relation \"public.nope\" does not exist","details":null}"#),
            "relation \"public.nope\" does not exist"
        );
        assert_eq!(
            error_message(r#"{"message":"insert failed","details":"Key (id) already exists."}"#),
            "insert failed (Key (id) already exists.)"
        );
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn builds_table_endpoints() {
        let client = RestClient::new(
            "https://demo.supabase.co/",
            "anon",
            None,
            Duration::from_secs(1),
        );
        assert_eq!(
            client.endpoint("bank_accounts"),
            "https://demo.supabase.co/rest/v1/bank_accounts"
        );
        assert_eq!(client.bearer, "anon");
    }

    #[test]
    fn settings_must_name_url_and_key() {
        let settings = DatabaseSettings {
            url: Some("https://demo.supabase.co".to_string()),
            ..DatabaseSettings::default()
        };
        assert!(matches!(
            RestClient::from_settings(&settings),
            Err(BooksError::MissingSetting("database.api_key"))
        ));

        let settings = DatabaseSettings {
            api_key: Some("anon".to_string()),
            access_token: Some("jwt".to_string()),
            ..settings
        };
        let client = RestClient::from_settings(&settings).unwrap();
        assert_eq!(client.bearer, "jwt");
    }
}
