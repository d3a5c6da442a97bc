// SPDX-FileCopyrightText: 2025 Semiotic AI, Inc.
//
// SPDX-License-Identifier: Apache-2.0

//! Tower tracing layer for the alloy JSON-RPC client.
//!
//! Every request is wrapped in an `rpc_call` span carrying the method name and
//! network, and its duration is recorded when the response arrives. The layer
//! also counts calls, which the health check and tests use to observe traffic.

use std::{
    future::Future,
    pin::Pin,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
    task::{Context, Poll},
    time::Instant,
};

use alloy_json_rpc::{RequestPacket, ResponsePacket};
use alloy_transport::TransportError;
use tower::Layer;
use tracing::{debug, trace, warn, Instrument};

use crate::types::network::Network;

/// A Tower layer that traces RPC requests.
///
/// # Example
///
/// ```rust,ignore
/// use crossscan::transport::RpcTraceLayer;
/// use crossscan::Network;
/// use alloy_rpc_client::ClientBuilder;
///
/// let client = ClientBuilder::default()
///     .layer(RpcTraceLayer::new(Network::Testnet))
///     .http(rpc_url);
/// ```
#[derive(Clone, Debug)]
pub struct RpcTraceLayer {
    network: Network,
    /// Whether to log request and response payloads (can be verbose)
    log_payloads: bool,
    calls: Arc<AtomicU64>,
}

impl RpcTraceLayer {
    /// Creates a layer that logs timing and errors only.
    pub fn new(network: Network) -> Self {
        Self {
            network,
            log_payloads: false,
            calls: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Also log request and response payloads at `trace` level.
    pub fn verbose(mut self) -> Self {
        self.log_payloads = true;
        self
    }

    /// Number of requests sent through every service built from this layer
    pub fn call_count(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }
}

impl<S> Layer<S> for RpcTraceLayer {
    type Service = RpcTraceService<S>;

    fn layer(&self, service: S) -> Self::Service {
        RpcTraceService {
            service,
            network: self.network,
            log_payloads: self.log_payloads,
            calls: self.calls.clone(),
        }
    }
}

/// A Tower service that traces RPC requests and responses.
#[derive(Clone, Debug)]
pub struct RpcTraceService<S> {
    service: S,
    network: Network,
    log_payloads: bool,
    calls: Arc<AtomicU64>,
}

impl<S> tower::Service<RequestPacket> for RpcTraceService<S>
where
    S: tower::Service<RequestPacket, Response = ResponsePacket, Error = TransportError>
        + Clone
        + Send
        + 'static,
    S::Future: Send,
{
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&mut self, request: RequestPacket) -> Self::Future {
        let log_payloads = self.log_payloads;
        let mut service = self.service.clone();
        let method = extract_method(&request);
        self.calls.fetch_add(1, Ordering::Relaxed);

        let span = tracing::debug_span!(
            "crossscan.rpc_call",
            method = %method,
            network = %self.network,
            duration_ms = tracing::field::Empty,
        );

        Box::pin(
            async move {
                let start = Instant::now();
                if log_payloads {
                    trace!(request = ?request, "RPC request");
                } else {
                    debug!("RPC request: {method}");
                }

                let result = service.call(request).await;
                let duration_ms = start.elapsed().as_millis() as u64;
                tracing::Span::current().record("duration_ms", duration_ms);

                match &result {
                    Ok(response) if log_payloads => {
                        trace!(response = ?response, duration_ms, "RPC response");
                    }
                    Ok(_) => debug!(duration_ms, "RPC response: {method}"),
                    Err(e) => warn!(error = %e, duration_ms, "RPC error: {method}"),
                }

                result
            }
            .instrument(span),
        )
    }
}

/// Extract the RPC method name from a request packet.
fn extract_method(request: &RequestPacket) -> String {
    match request {
        RequestPacket::Single(req) => req.method().to_string(),
        RequestPacket::Batch(reqs) => match reqs.as_slice() {
            [] => "batch(empty)".to_string(),
            [only] => only.method().to_string(),
            _ => format!("batch({} calls)", reqs.len()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trace_layer_default() {
        let layer = RpcTraceLayer::new(Network::Testnet);
        assert!(!layer.log_payloads);
        assert_eq!(layer.network, Network::Testnet);
        assert_eq!(layer.call_count(), 0);
    }

    #[test]
    fn test_trace_layer_verbose() {
        let layer = RpcTraceLayer::new(Network::Mainnet).verbose();
        assert!(layer.log_payloads);
    }

    #[test]
    fn test_services_share_counter() {
        let layer = RpcTraceLayer::new(Network::Mainnet);
        let service = layer.layer(());
        service.calls.fetch_add(2, Ordering::Relaxed);
        assert_eq!(layer.call_count(), 2);
    }
}
