use chrono::Utc;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use super::auth::{master_key_token, request_date, API_VERSION};
use super::error::StoreError;
use super::model::{QueryPage, QueryRequest};
use super::ReadingSource;
use crate::config::StoreConfig;
use crate::readings::RawRecord;

const USER_AGENT: &str = concat!("climate_report/", env!("CARGO_PKG_VERSION"));
const CONTINUATION_HEADER: &str = "x-ms-continuation";
const QUERY_CONTENT_TYPE: &str = "application/query+json";

/// REST client for the readings container.
pub struct DocumentStoreClient {
    http: reqwest::Client,
    endpoint: String,
    master_key: String,
    database: String,
    container: String,
}

impl DocumentStoreClient {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|error| StoreError::unavailable("client_build", error))?;

        Ok(Self {
            http,
            endpoint: config.url.trim_end_matches('/').to_string(),
            master_key: config.key.clone(),
            database: config.database.clone(),
            container: config.container.clone(),
        })
    }

    fn resource_link(&self) -> String {
        format!("dbs/{}/colls/{}", self.database, self.container)
    }

    async fn query_page(
        &self,
        continuation: Option<&str>,
    ) -> Result<(Vec<RawRecord>, Option<String>), StoreError> {
        let resource_link = self.resource_link();
        let date = request_date(Utc::now());
        let token = master_key_token(&self.master_key, "POST", "docs", &resource_link, &date)?;
        let body = serde_json::to_vec(&QueryRequest::select_all())
            .map_err(|error| StoreError::unavailable("query_encode", error))?;

        let mut request = self
            .http
            .post(format!("{}/{}/docs", self.endpoint, resource_link))
            .header("authorization", token)
            .header("x-ms-date", date)
            .header("x-ms-version", API_VERSION)
            .header("x-ms-documentdb-isquery", "True")
            .header("x-ms-documentdb-query-enablecrosspartition", "True")
            .header(CONTENT_TYPE, QUERY_CONTENT_TYPE)
            .header(ACCEPT, "application/json")
            .body(body);
        if let Some(token) = continuation {
            request = request.header(CONTINUATION_HEADER, token);
        }

        let response = request
            .send()
            .await
            .map_err(|error| StoreError::unavailable("query", error))?
            .error_for_status()
            .map_err(|error| StoreError::unavailable("query_status", error))?;

        let next = response
            .headers()
            .get(CONTINUATION_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
            .map(str::to_string);

        let page = response
            .json::<QueryPage>()
            .await
            .map_err(|error| StoreError::unavailable("query_decode", error))?;

        Ok((page.into_records(), next))
    }
}

impl ReadingSource for DocumentStoreClient {
    async fn fetch_all_readings(&self) -> Result<Vec<RawRecord>, StoreError> {
        let mut records = Vec::new();
        let mut continuation: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let (page, next) = self.query_page(continuation.as_deref()).await?;
            pages += 1;
            log::debug!("store_query_page page={} records={}", pages, page.len());
            records.extend(page);

            match next {
                Some(token) => continuation = Some(token),
                None => break,
            }
        }

        log::info!(
            "store_query_complete database={} container={} pages={} records={}",
            self.database,
            self.container,
            pages,
            records.len()
        );
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::DocumentStoreClient;
    use crate::config::StoreConfig;
    use crate::store::ReadingSource;

    struct CannedResponse {
        status: &'static str,
        continuation: Option<&'static str>,
        body: &'static str,
    }

    async fn read_request(stream: &mut tokio::net::TcpStream) -> String {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 4096];
        loop {
            let read = stream.read(&mut chunk).await.expect("read request");
            if read == 0 {
                break;
            }
            buffer.extend_from_slice(&chunk[..read]);

            let text = String::from_utf8_lossy(&buffer).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buffer.len() >= header_end + 4 + content_length {
                    return text;
                }
            }
        }
        String::from_utf8_lossy(&buffer).to_string()
    }

    async fn serve(responses: Vec<CannedResponse>) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let address = listener.local_addr().expect("local addr");
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = requests.clone();

        tokio::spawn(async move {
            for response in responses {
                let (mut stream, _) = listener.accept().await.expect("accept");
                let request = read_request(&mut stream).await;
                seen.lock().expect("requests lock").push(request);

                let continuation = response
                    .continuation
                    .map(|token| format!("x-ms-continuation: {}\r\n", token))
                    .unwrap_or_default();
                let reply = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n{}Connection: close\r\n\r\n{}",
                    response.status,
                    response.body.len(),
                    continuation,
                    response.body
                );
                stream.write_all(reply.as_bytes()).await.expect("write reply");
                stream.shutdown().await.ok();
            }
        });

        (format!("http://{}", address), requests)
    }

    fn store_config(url: String) -> StoreConfig {
        StoreConfig {
            url,
            key: "c2VjcmV0LW1hc3Rlci1rZXktZm9yLXRlc3Rz".to_string(),
            database: "TemperaturaUmidadeDB".to_string(),
            container: "Leituras".to_string(),
        }
    }

    #[tokio::test]
    async fn follows_continuation_until_exhausted() {
        let (url, requests) = serve(vec![
            CannedResponse {
                status: "200 OK",
                continuation: Some("page-2-token"),
                body: r#"{"Documents":[{"id":"1","temperatura":20},{"id":"2","temperatura":21}],"_count":2}"#,
            },
            CannedResponse {
                status: "200 OK",
                continuation: None,
                body: r#"{"Documents":[{"id":"3","temperatura":22},"stray"],"_count":2}"#,
            },
        ])
        .await;

        let client = DocumentStoreClient::new(&store_config(url)).expect("client");
        let records = client.fetch_all_readings().await.expect("records");

        let ids: Vec<&str> = records
            .iter()
            .filter_map(|record| record.get("id").and_then(|id| id.as_str()))
            .collect();
        assert_eq!(ids, vec!["1", "2", "3"]);

        let requests = requests.lock().expect("requests lock");
        assert_eq!(requests.len(), 2);
        let first = requests[0].to_lowercase();
        assert!(first.starts_with("post /dbs/temperaturaumidadedb/colls/leituras/docs"));
        assert!(first.contains("x-ms-documentdb-isquery: true"));
        assert!(first.contains("x-ms-documentdb-query-enablecrosspartition: true"));
        assert!(first.contains("authorization: type%3dmaster%26ver%3d1.0%26sig%3d"));
        assert!(first.contains("select * from c"));
        assert!(!first.contains("x-ms-continuation"));
        assert!(requests[1].contains("page-2-token"));
    }

    #[tokio::test]
    async fn empty_collection_is_not_an_error() {
        let (url, _) = serve(vec![CannedResponse {
            status: "200 OK",
            continuation: None,
            body: r#"{"Documents":[],"_count":0}"#,
        }])
        .await;

        let client = DocumentStoreClient::new(&store_config(url)).expect("client");
        let records = client.fetch_all_readings().await.expect("empty is ok");
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn rejected_credentials_are_store_unavailable() {
        let (url, _) = serve(vec![CannedResponse {
            status: "401 Unauthorized",
            continuation: None,
            body: r#"{"code":"Unauthorized","message":"bad signature"}"#,
        }])
        .await;

        let client = DocumentStoreClient::new(&store_config(url)).expect("client");
        let error = client.fetch_all_readings().await.expect_err("must fail");
        assert_eq!(error.code(), "STORE_UNAVAILABLE");
        assert!(error.to_string().contains("query_status"));
    }

    #[tokio::test]
    async fn unreachable_store_is_store_unavailable() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let address = listener.local_addr().expect("local addr");
        drop(listener);

        let client =
            DocumentStoreClient::new(&store_config(format!("http://{}", address))).expect("client");
        let error = client.fetch_all_readings().await.expect_err("must fail");
        assert_eq!(error.code(), "STORE_UNAVAILABLE");
    }
}
