//! A fake NZBGet JSON-RPC server for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Router,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use nzbget_exporter::config::UpstreamConfig;

#[derive(Default)]
pub struct FakeUpstream {
    responses: HashMap<String, (StatusCode, String)>,
    /// Authorization header of every request, in arrival order.
    pub auth_headers: Mutex<Vec<Option<String>>>,
    /// Paths requested, in arrival order.
    pub paths: Mutex<Vec<String>>,
}

impl FakeUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method` with a `{version, result}` envelope around `result`.
    pub fn result(mut self, method: &str, result: Value) -> Self {
        let body = json!({ "version": "1.1", "result": result }).to_string();
        self.responses
            .insert(method.to_string(), (StatusCode::OK, body));
        self
    }

    /// Answer `method` with a raw status and body.
    pub fn raw(mut self, method: &str, status: StatusCode, body: &str) -> Self {
        self.responses
            .insert(method.to_string(), (status, body.to_string()));
        self
    }

    /// Serve on an ephemeral port, returning the base URL.
    pub async fn spawn(self) -> (String, Arc<FakeUpstream>) {
        let upstream = Arc::new(self);
        let app = Router::new()
            .route("/jsonrpc/{method}", get(answer))
            .with_state(upstream.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (format!("http://{addr}"), upstream)
    }
}

async fn answer(
    State(upstream): State<Arc<FakeUpstream>>,
    Path(method): Path<String>,
    headers: HeaderMap,
) -> impl IntoResponse {
    upstream.paths.lock().unwrap().push(format!("/jsonrpc/{method}"));
    upstream.auth_headers.lock().unwrap().push(
        headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
    );

    match upstream.responses.get(&method) {
        Some((status, body)) => (*status, body.clone()),
        None => (StatusCode::NOT_FOUND, String::new()),
    }
}

pub fn upstream_config(host: &str) -> UpstreamConfig {
    UpstreamConfig {
        host: host.to_string(),
        username: None,
        password: None,
        timeout: Duration::from_secs(5),
    }
}

/// Payloads of a two-server NZBGet 21 instance.
pub fn healthy_upstream() -> FakeUpstream {
    FakeUpstream::new()
        .result("version", json!("21.1"))
        .result(
            "config",
            json!([
                { "Name": "DiskSpace", "Value": "250" },
                { "Name": "Server1.Name", "Value": "news.example.com" },
                { "Name": "Server1.Active", "Value": "yes" },
                { "Name": "Server2.Name", "Value": "backup.example.com" },
                { "Name": "Server2.Active", "Value": "no" },
                { "Name": "Category1.Name", "Value": "tv" }
            ]),
        )
        .result(
            "status",
            json!({
                "FreeDiskSpaceLo": -1059258586,
                "FreeDiskSpaceHi": 3,
                "DownloadPaused": false,
                "PostPaused": false,
                "ScanPaused": true,
                "ThreadCount": 7,
                "UpTimeSec": 3600,
                "NewsServers": [
                    { "ID": 1, "Active": true },
                    { "ID": 2, "Active": false }
                ]
            }),
        )
        .result(
            "servervolumes",
            json!([
                { "ServerID": 0, "TotalSizeLo": 300, "TotalSizeHi": 0, "ArticlesPerDays": [] },
                {
                    "ServerID": 1,
                    "TotalSizeLo": 100,
                    "TotalSizeHi": 0,
                    "ArticlesPerDays": [{ "Failed": 1, "Success": 9 }, { "Failed": 0, "Success": 5 }]
                },
                { "ServerID": 2, "TotalSizeLo": 200, "TotalSizeHi": 0, "ArticlesPerDays": [] }
            ]),
        )
        .result(
            "history",
            json!([
                {
                    "NZBID": 1,
                    "Name": "Some.Show.S01E01",
                    "Kind": "NZB",
                    "Category": "tv",
                    "Status": "SUCCESS/HEALTH",
                    "ParStatus": "SUCCESS",
                    "UnpackStatus": "SUCCESS",
                    "FileSizeLo": 1000,
                    "FileSizeHi": 0,
                    "FileCount": 3,
                    "TotalArticles": 100,
                    "SuccessArticles": 100,
                    "ParTimeSec": 10,
                    "RepairTimeSec": 4
                },
                {
                    "NZBID": 2,
                    "Name": "Some.Show.S01E02",
                    "Kind": "NZB",
                    "Category": "tv",
                    "Status": "FAILURE/PAR",
                    "ParStatus": "FAILURE",
                    "UnpackStatus": "NONE",
                    "FileSizeLo": 500,
                    "FileSizeHi": 0,
                    "FileCount": 2,
                    "TotalArticles": 50,
                    "FailedArticles": 5,
                    "ParTimeSec": 20,
                    "RepairTimeSec": 0
                }
            ]),
        )
}
