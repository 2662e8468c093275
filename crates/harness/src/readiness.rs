//! HTTP readiness polling
//!
//! Replaces fixed "sleep and hope" delays with bounded polling against
//! the services' own endpoints.

use std::time::{Duration, Instant};

use tokio::time::sleep;
use tracing::{info, warn};

use crate::error::{HarnessError, HarnessResult};

/// Poll `url` until it answers with a success status or `timeout` elapses.
pub async fn wait_for_http(url: &str, timeout: Duration, poll: Duration) -> HarnessResult<()> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()?;

    let start = Instant::now();
    let mut logged_waiting = false;

    while start.elapsed() < timeout {
        match client.get(url).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("{} is ready ({:.1}s)", url, start.elapsed().as_secs_f64());
                return Ok(());
            }
            Ok(resp) => {
                warn!("{} answered {}", url, resp.status());
            }
            Err(e) => {
                if !logged_waiting {
                    info!("Waiting for {} ...", url);
                    logged_waiting = true;
                }
                // Connection refused is expected while the service starts
                if !e.is_connect() && !e.is_timeout() {
                    warn!("Readiness probe error for {}: {}", url, e);
                }
            }
        }

        sleep(poll).await;
    }

    Err(HarnessError::ReadinessTimeout {
        url: url.to_string(),
        seconds: timeout.as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;

    fn serve_one_ok() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            if let Ok((mut stream, _)) = listener.accept() {
                let mut buf = [0u8; 1024];
                let _ = stream.read(&mut buf);
                let _ = stream.write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\n\r\n");
            }
        });

        format!("http://{}/health", addr)
    }

    #[tokio::test]
    async fn returns_once_endpoint_answers_ok() {
        let url = serve_one_ok();
        wait_for_http(&url, Duration::from_secs(5), Duration::from_millis(50))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn times_out_against_a_dead_endpoint() {
        // Bind-then-drop to get a port nobody is listening on
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let url = format!("http://127.0.0.1:{}/health", port);

        let err = wait_for_http(&url, Duration::from_millis(300), Duration::from_millis(50))
            .await
            .unwrap_err();
        assert!(matches!(err, HarnessError::ReadinessTimeout { .. }));
    }
}
