// SPDX-FileCopyrightText: 2026 the Rhizome authors
// SPDX-License-Identifier: LicenseRef-Rhizome-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Rhizome and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

//! Rhizome CLI entrypoint.
//!
//! By default this serves MCP over streamable HTTP at
//! `http://127.0.0.1:<port>/mcp` against the given map file.
//!
//! Use `--mcp` to serve MCP over stdio instead (intended for tool
//! integrations).

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use rmcp::transport::{
    streamable_http_server::session::local::LocalSessionManager, StreamableHttpServerConfig,
    StreamableHttpService,
};

use rhizome::llm::{ChatModel, OpenRouterClient};
use rhizome::mcp::RhizomeMcp;
use rhizome::model::fixtures::demo_map;
use rhizome::store::{load_map, MapStore};

const DEFAULT_MCP_HTTP_PORT: u16 = 27561;

fn print_usage(program: &str) {
    eprintln!(
        "Usage:\n  {program} [<map-file.md>] [--mcp-http-port <port>]\n  {program} [<map-file.md>] --mcp\n  {program} --demo [--mcp-http-port <port>]\n\nDefault mode serves MCP over streamable HTTP at `http://127.0.0.1:<port>/mcp`.\n--mcp-http-port selects the port (0 = ephemeral; default {DEFAULT_MCP_HTTP_PORT}).\n--mcp serves MCP over stdio instead.\n\nIf <map-file.md> exists it is loaded at startup; otherwise the map starts\nempty and `map.save` creates the file. --demo uses a builtin demo map and\ncannot be combined with a map file.\n\nModel access is configured via OPENROUTER_API_KEY, OPENROUTER_MODEL, and\nOPENROUTER_API_URL."
    );
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
struct CliOptions {
    mcp: bool,
    demo: bool,
    map_file: Option<String>,
    mcp_http_port: Option<u16>,
}

fn parse_options(mut args: impl Iterator<Item = String>) -> Result<CliOptions, ()> {
    let mut options = CliOptions::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--mcp" => {
                if options.mcp {
                    return Err(());
                }
                options.mcp = true;
            }
            "--demo" => {
                if options.demo {
                    return Err(());
                }
                options.demo = true;
            }
            "--mcp-http-port" => {
                if options.mcp_http_port.is_some() {
                    return Err(());
                }
                let Some(raw) = args.next() else {
                    return Err(());
                };
                let port: u16 = raw.parse().map_err(|_| ())?;
                options.mcp_http_port = Some(port);
            }
            "--help" | "-h" => return Err(()),
            other => {
                if other.starts_with('-') || options.map_file.is_some() {
                    return Err(());
                }
                options.map_file = Some(other.to_owned());
            }
        }
    }

    if options.demo && options.map_file.is_some() {
        return Err(());
    }

    Ok(options)
}

fn build_server(options: &CliOptions) -> Result<RhizomeMcp, Box<dyn Error>> {
    let model: Arc<dyn ChatModel> = Arc::new(OpenRouterClient::from_env());

    if options.demo {
        return Ok(RhizomeMcp::new(MapStore::with_map(demo_map()), model));
    }

    let Some(map_file) = &options.map_file else {
        return Ok(RhizomeMcp::new(MapStore::new(), model));
    };

    let path = PathBuf::from(map_file);
    let store = if path.exists() {
        MapStore::with_map(load_map(&path)?)
    } else {
        MapStore::new()
    };
    Ok(RhizomeMcp::with_map_path(store, model, path))
}

fn main() {
    let result = (|| -> Result<(), Box<dyn Error>> {
        let mut args = std::env::args();
        let program = args.next().unwrap_or_else(|| "rhizome".to_owned());

        let Ok(options) = parse_options(args) else {
            print_usage(&program);
            std::process::exit(2);
        };

        let mcp = build_server(&options)?;
        let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;

        if options.mcp {
            runtime.block_on(mcp.serve_stdio())?;
            return Ok(());
        }

        let mcp_http_port = options.mcp_http_port.unwrap_or(DEFAULT_MCP_HTTP_PORT);
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::bind(("127.0.0.1", mcp_http_port)).await?;
            let local_addr = listener.local_addr()?;

            let config = StreamableHttpServerConfig {
                stateful_mode: true,
                ..StreamableHttpServerConfig::default()
            };
            let shutdown_token = config.cancellation_token.clone();
            let server_shutdown = shutdown_token.clone();

            let session_manager = Arc::new(LocalSessionManager::default());
            let mcp_service = {
                let mcp = mcp.clone();
                StreamableHttpService::new(move || Ok(mcp.clone()), session_manager, config)
            };

            let router = Router::new().nest_service("/mcp", mcp_service);
            eprintln!("rhizome: serving MCP at http://{local_addr}/mcp (ctrl-c to stop)");

            let server_handle = tokio::spawn(async move {
                let serve = axum::serve(listener, router).with_graceful_shutdown(async move {
                    server_shutdown.cancelled().await;
                });
                if let Err(err) = serve.await {
                    eprintln!("rhizome: MCP HTTP server error: {err}");
                }
            });

            tokio::signal::ctrl_c().await?;
            shutdown_token.cancel();
            let _ = server_handle.await;
            Ok::<(), Box<dyn Error>>(())
        })?;

        Ok(())
    })();

    if let Err(err) = result {
        eprintln!("rhizome: {err}");
        std::process::exit(1);
    }
}
