// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Result, anyhow};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use std::thread;
use tiny_http::{Header, Method, Request, Response, Server};
use url::form_urlencoded;

use crate::error::LedgerError;
use crate::protocol::Reply;
use crate::service::LedgerService;

/// A bound but not yet running endpoint.
pub struct LedgerServer {
    server: Server,
    service: Arc<LedgerService>,
}

impl LedgerServer {
    pub fn bind(addr: &str, service: Arc<LedgerService>) -> Result<Self> {
        let server = Server::http(addr).map_err(|e| anyhow!("Bind {}: {}", addr, e))?;
        Ok(LedgerServer { server, service })
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.server.server_addr().to_ip()
    }

    /// Serve until the listener closes. Each request gets its own thread, so
    /// writes only ever wait on the service's write gate.
    pub fn run(self) {
        if let Some(addr) = self.local_addr() {
            tracing::info!(%addr, "ledger endpoint listening");
        }
        for request in self.server.incoming_requests() {
            let service = Arc::clone(&self.service);
            thread::spawn(move || {
                if let Err(err) = handle_request(&service, request) {
                    tracing::warn!(error = %err, "failed to answer request");
                }
            });
        }
    }

    /// Run on a background thread; handy for tests and embedding.
    pub fn spawn(self) -> thread::JoinHandle<()> {
        thread::spawn(move || self.run())
    }
}

fn handle_request(service: &LedgerService, mut request: Request) -> Result<()> {
    let method = request.method().clone();
    let url = request.url().to_string();
    tracing::debug!(%method, %url, "request");
    match method {
        Method::Get => {
            let query = url.split_once('?').map(|(_, q)| q).unwrap_or("");
            let mut action = None;
            let mut year = None;
            for (k, v) in form_urlencoded::parse(query.as_bytes()) {
                match k.as_ref() {
                    "action" => action = Some(v.into_owned()),
                    "year" => year = Some(v.into_owned()),
                    _ => {}
                }
            }
            if action.as_deref() == Some("getYears") {
                return respond(request, 200, &service.years());
            }
            match service.read(year.as_deref()) {
                Ok(rows) => respond(request, 200, &rows),
                Err(err) => {
                    tracing::error!(error = %err, "read failed");
                    respond(request, 200, &Reply::error(&err))
                }
            }
        }
        Method::Post => {
            let mut body = String::new();
            if let Err(err) = request.as_reader().read_to_string(&mut body) {
                let err = LedgerError::from(err);
                return respond(request, 400, &Reply::error(&err));
            }
            let reply = service.handle_json(&body);
            respond(request, 200, &reply)
        }
        other => {
            let err = LedgerError::InvalidRequest(format!("Method {} not allowed", other));
            respond(request, 405, &Reply::error(&err))
        }
    }
}

fn respond<T: Serialize>(request: Request, status: u16, body: &T) -> Result<()> {
    let json = serde_json::to_string(body)?;
    let content_type = Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .map_err(|_| anyhow!("invalid content-type header"))?;
    let response = Response::from_string(json)
        .with_status_code(status)
        .with_header(content_type);
    request.respond(response)?;
    Ok(())
}
