#![allow(dead_code)]

use std::io::Read;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use alloy::primitives::Address;
use serde_json::{json, Value};
use tiny_http::{Response, Server};

use token_admin_adapters::AdapterConfig;
use token_admin_core::domain::{DisplayField, Notice};
use token_admin_core::UiPort;

pub const ALICE: &str = "0x1111111111111111111111111111111111111111";
pub const BOB: &str = "0x2222222222222222222222222222222222222222";
pub const CONTRACT: &str = "0x00000000000000000000000000000000000C0DE0";
pub const TX_HASH: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";

pub fn addr(raw: &str) -> Address {
    raw.parse().expect("valid test address")
}

pub type RecordedCalls = Arc<Mutex<Vec<(String, Value)>>>;

/// Answers one JSON-RPC method; `Err` becomes the response's `error` object.
pub type RpcHandler = dyn Fn(&str, &Value) -> Result<Value, Value> + Send + 'static;

/// Starts a JSON-RPC endpoint on an ephemeral port. The server stops after a quiet second.
pub fn spawn_rpc_server(
    handler: Box<RpcHandler>,
) -> (String, RecordedCalls, thread::JoinHandle<()>) {
    let server = Server::http("127.0.0.1:0").expect("start server");
    let base_url = format!("http://{}", server.server_addr());
    let calls: RecordedCalls = Arc::new(Mutex::new(Vec::new()));
    let recorded = Arc::clone(&calls);

    let join = thread::spawn(move || loop {
        let mut req = match server.recv_timeout(Duration::from_secs(1)) {
            Ok(Some(r)) => r,
            _ => break,
        };
        let mut body = String::new();
        let _ = req.as_reader().read_to_string(&mut body);
        let payload: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        let method = payload["method"].as_str().unwrap_or_default().to_owned();
        let params = payload["params"].clone();
        if let Ok(mut g) = recorded.lock() {
            g.push((method.clone(), params.clone()));
        }

        let reply = match handler(&method, &params) {
            Ok(result) => json!({ "jsonrpc": "2.0", "id": payload["id"], "result": result }),
            Err(error) => json!({ "jsonrpc": "2.0", "id": payload["id"], "error": error }),
        };
        let _ = req.respond(Response::from_string(reply.to_string()));
    });

    (base_url, calls, join)
}

pub fn proxy_config(base_url: &str) -> AdapterConfig {
    AdapterConfig {
        eip1193_proxy_url: Some(base_url.to_owned()),
        rpc_timeout_ms: 2_000,
        receipt_timeout_ms: 500,
        receipt_poll_interval_ms: 10,
        ..AdapterConfig::default()
    }
    .with_contract(137, addr(CONTRACT))
}

pub fn methods(calls: &RecordedCalls) -> Vec<String> {
    calls
        .lock()
        .expect("calls lock")
        .iter()
        .map(|(m, _)| m.clone())
        .collect()
}

pub fn params_of(calls: &RecordedCalls, method: &str) -> Vec<Value> {
    calls
        .lock()
        .expect("calls lock")
        .iter()
        .filter(|(m, _)| m == method)
        .map(|(_, p)| p.clone())
        .collect()
}

/// Lower-case `0x`-prefixed selector of an `eth_call` / `eth_sendTransaction` payload.
pub fn selector_of(params: &Value) -> String {
    params[0]["data"]
        .as_str()
        .map(|d| d.to_ascii_lowercase().chars().take(10).collect())
        .unwrap_or_default()
}

#[derive(Debug, Default)]
pub struct CapturingUi {
    pub notices: Mutex<Vec<Notice>>,
    pub fields: Mutex<Vec<(DisplayField, String)>>,
}

impl CapturingUi {
    pub fn field(&self, field: DisplayField) -> Option<String> {
        self.fields
            .lock()
            .expect("ui lock")
            .iter()
            .rev()
            .find(|(f, _)| *f == field)
            .map(|(_, text)| text.clone())
    }
}

impl UiPort for CapturingUi {
    fn notify(&self, notice: Notice) {
        self.notices.lock().expect("ui lock").push(notice);
    }

    fn set_result(&self, field: DisplayField, text: String) {
        self.fields.lock().expect("ui lock").push((field, text));
    }

    fn set_connected(&self, _connected: bool) {}

    fn set_owner_controls(&self, _enabled: bool) {}
}
