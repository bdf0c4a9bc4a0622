//! JSON-RPC plumbing for process-backed bridges
//!
//! Requests are line-delimited JSON written to the child's stdin; responses
//! come back on stdout in any order and are matched to callers by id. A
//! single I/O task owns both pipes, so many requests can be in flight at once
//! (e.g. waiting for a popup while the click that opens it is sent).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::ChildStdin;
use tokio::process::ChildStdout;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use super::{BridgeError, RPC_TIMEOUT_CODE};

/// JSON-RPC request
#[derive(Debug, Serialize)]
pub struct RpcRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: String,
    pub params: Value,
}

/// JSON-RPC response
#[derive(Debug, Deserialize)]
pub struct RpcResponse {
    #[allow(dead_code)]
    pub jsonrpc: String,
    pub id: u64,
    pub result: Option<Value>,
    pub error: Option<RpcError>,
}

/// JSON-RPC error
#[derive(Debug, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
}

impl RpcError {
    pub fn into_bridge_error(self) -> BridgeError {
        if self.code == RPC_TIMEOUT_CODE {
            BridgeError::Timeout(self.message)
        } else {
            BridgeError::ServerError(format!("[{}] {}", self.code, self.message))
        }
    }
}

type ResponseSender = oneshot::Sender<Result<Value, BridgeError>>;

/// Request sender type alias
pub type RequestSender = mpsc::Sender<(RpcRequest, ResponseSender)>;

/// Global request ID counter
static REQUEST_ID: AtomicU64 = AtomicU64::new(1);

/// Create a new RPC request with auto-incremented ID
pub fn new_request(method: &str, params: Value) -> RpcRequest {
    RpcRequest {
        jsonrpc: "2.0",
        id: REQUEST_ID.fetch_add(1, Ordering::SeqCst),
        method: method.to_string(),
        params,
    }
}

/// Send an RPC request and wait for response
pub async fn send_request(
    request_tx: &RequestSender,
    method: &str,
    params: Value,
) -> Result<Value, BridgeError> {
    let req = new_request(method, params);
    let (tx, rx) = oneshot::channel();

    request_tx
        .send((req, tx))
        .await
        .map_err(|_| BridgeError::Disconnected)?;

    rx.await.map_err(|_| BridgeError::Disconnected)?
}

fn into_result(response: RpcResponse) -> Result<Value, BridgeError> {
    match response.error {
        Some(err) => Err(err.into_bridge_error()),
        None => Ok(response.result.unwrap_or(Value::Null)),
    }
}

/// Spawn the background communication task for JSON-RPC over stdin/stdout
pub fn spawn_communication_task(
    mut request_rx: mpsc::Receiver<(RpcRequest, ResponseSender)>,
    stdin: ChildStdin,
    stdout: ChildStdout,
) {
    tokio::spawn(async move {
        let mut stdin = stdin;
        let mut reader = BufReader::new(stdout);
        let mut pending: HashMap<u64, ResponseSender> = HashMap::new();
        // Survives cancelled reads so a partially received line is kept
        let mut line: Vec<u8> = Vec::new();

        loop {
            tokio::select! {
                request = request_rx.recv() => {
                    match request {
                        Some((req, response_tx)) => {
                            let id = req.id;
                            let json = match serde_json::to_string(&req) {
                                Ok(json) => json + "\n",
                                Err(e) => {
                                    let _ = response_tx.send(Err(e.into()));
                                    continue;
                                }
                            };
                            if stdin.write_all(json.as_bytes()).await.is_err() {
                                let _ = response_tx.send(Err(BridgeError::Disconnected));
                                break;
                            }
                            debug!(id, method = %req.method, "rpc request sent");
                            pending.insert(id, response_tx);
                        }
                        None => break,
                    }
                }

                result = reader.read_until(b'\n', &mut line) => {
                    match result {
                        Ok(0) => break,
                        Ok(_) if line.last() != Some(&b'\n') => break,
                        Ok(_) => {
                            match serde_json::from_slice::<RpcResponse>(&line) {
                                Ok(response) => {
                                    if let Some(tx) = pending.remove(&response.id) {
                                        let _ = tx.send(into_result(response));
                                    }
                                }
                                Err(_) => warn!(
                                    line = %String::from_utf8_lossy(&line).trim_end(),
                                    "ignoring non-RPC output from sidecar"
                                ),
                            }
                            line.clear();
                        }
                        Err(_) => break,
                    }
                }
            }
        }

        for (_, tx) in pending.drain() {
            let _ = tx.send(Err(BridgeError::Disconnected));
        }
    });
}
