//! TCP reachability probe.

use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::time;
use url::Url;

/// Why a worker could not be reached.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("url has no host")]
    NoHost,

    #[error("connect failed: {0}")]
    Connect(#[from] std::io::Error),

    #[error("connect timed out after {0:?}")]
    Timeout(Duration),
}

/// Open (and immediately close) a TCP connection to the worker's host.
pub async fn probe(url: &Url, timeout: Duration) -> Result<(), ProbeError> {
    let host = url.host_str().ok_or(ProbeError::NoHost)?;
    let port = url.port_or_known_default().unwrap_or(80);
    let target = format!("{}:{}", host, port);

    match time::timeout(timeout, TcpStream::connect(target)).await {
        Ok(Ok(stream)) => {
            drop(stream);
            Ok(())
        }
        Ok(Err(e)) => Err(ProbeError::Connect(e)),
        Err(_) => Err(ProbeError::Timeout(timeout)),
    }
}
