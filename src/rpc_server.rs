//! Gitpulse RPC Server: JSON-RPC over stdin/stdout for UI integration.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"repo_search.input", "params":{"query":"rust"}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}

use std::io::{self, BufRead, Write};

use gitpulse::app::App;
use gitpulse::rpc_handler::handle_method;

use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    // Prefer GITPULSE_DATA_DIR for the DB path, fall back to the exe directory.
    let db_path = if let Ok(dir) = std::env::var("GITPULSE_DATA_DIR") {
        std::path::PathBuf::from(dir).join("gitpulse.db")
    } else if let Ok(exe) = std::env::current_exe() {
        exe.parent()
            .unwrap_or(std::path::Path::new("."))
            .join("gitpulse.db")
    } else {
        std::path::PathBuf::from("gitpulse.db")
    };

    let mut app = App::new(db_path.to_str().unwrap_or("gitpulse.db"))
        .expect("Failed to initialize Gitpulse");
    app.startup();

    // Signal ready
    let ready = json!({"event":"ready","version":env!("CARGO_PKG_VERSION")});
    println!("{}", ready);
    io::stdout().flush().unwrap();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                let err = json!({"id":null,"error":format!("parse error: {}",e)});
                println!("{}", err);
                io::stdout().flush().unwrap();
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);
        let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
        let params = req.get("params").cloned().unwrap_or(json!({}));

        let result = handle_method(&mut app, method, &params).await;

        let response = match result {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        println!("{}", response);
        io::stdout().flush().unwrap();
    }
}
