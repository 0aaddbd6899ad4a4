//! Keepalive pinger
//!
//! Some hosts stop idle processes. When configured, this task fetches a URL on
//! a fixed interval and ignores the result.

use log::{debug, error};
use std::time::Duration;
use tokio::task::JoinHandle;

pub fn spawn_keepalive(url: String, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let client = match reqwest::Client::builder().timeout(interval).build() {
            Ok(client) => client,
            Err(e) => {
                error!("Keepalive disabled, HTTP client setup failed: {}", e);
                return;
            }
        };

        loop {
            match client.get(&url).send().await {
                Ok(response) => debug!("Keepalive {} -> {}", url, response.status()),
                Err(e) => debug!("Keepalive {} failed: {}", url, e),
            }
            tokio::time::sleep(interval).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncReadExt;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn pings_configured_url() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = spawn_keepalive(format!("http://{}/ping", addr), Duration::from_secs(1));

        let (mut stream, _) = tokio::time::timeout(Duration::from_secs(5), listener.accept())
            .await
            .unwrap()
            .unwrap();
        let mut buf = vec![0u8; 512];
        let n = stream.read(&mut buf).await.unwrap();
        task.abort();

        assert!(String::from_utf8_lossy(&buf[..n]).starts_with("GET /ping HTTP/1.1"));
    }

    #[tokio::test]
    async fn unreachable_url_does_not_stop_task() {
        let task = spawn_keepalive("http://127.0.0.1:1/".to_string(), Duration::from_millis(50));
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(!task.is_finished());
        task.abort();
    }
}
