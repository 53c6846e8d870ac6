use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::{debug, instrument};

use crate::error::{Result, WhoisError};

pub const WHOIS_PORT: u16 = 43;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);
pub const MAX_RESPONSE_SIZE: usize = 1024 * 1024; // 1MB

/// One WHOIS exchange: send a request line, receive everything until the
/// server closes the connection.
#[async_trait]
pub trait WhoisTransport: Send + Sync + fmt::Debug {
    async fn query(&self, server: &str, request: &str) -> Result<String>;
}

/// RFC 3912 over TCP.
#[derive(Debug, Clone)]
pub struct TcpTransport {
    port: u16,
    timeout: Duration,
    max_response_size: usize,
}

impl Default for TcpTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl TcpTransport {
    pub fn new() -> Self {
        Self {
            port: WHOIS_PORT,
            timeout: DEFAULT_TIMEOUT,
            max_response_size: MAX_RESPONSE_SIZE,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_response_size(mut self, bytes: usize) -> Self {
        self.max_response_size = bytes;
        self
    }
}

#[async_trait]
impl WhoisTransport for TcpTransport {
    #[instrument(skip(self), fields(port = self.port))]
    async fn query(&self, server: &str, request: &str) -> Result<String> {
        let mut stream = timeout(self.timeout, TcpStream::connect((server, self.port)))
            .await
            .map_err(|_| WhoisError::connection(server, "connection timed out"))?
            .map_err(|e| WhoisError::connection(server, e))?;

        let request_bytes = format!("{}\r\n", request);
        timeout(self.timeout, stream.write_all(request_bytes.as_bytes()))
            .await
            .map_err(|_| WhoisError::connection(server, "write timed out"))?
            .map_err(|e| WhoisError::connection(server, e))?;

        let mut response = Vec::new();
        let mut buf = [0u8; 4096];

        loop {
            match timeout(self.timeout, stream.read(&mut buf)).await {
                Ok(Ok(0)) => break,
                Ok(Ok(n)) => {
                    response.extend_from_slice(&buf[..n]);
                    if response.len() > self.max_response_size {
                        return Err(WhoisError::connection(server, "response too large"));
                    }
                }
                Ok(Err(e)) => return Err(WhoisError::connection(server, e)),
                Err(_) => {
                    // Some servers never close; keep what arrived.
                    if !response.is_empty() {
                        break;
                    }
                    return Err(WhoisError::connection(server, "read timed out"));
                }
            }
        }

        debug!(bytes = response.len(), "Received WHOIS response");
        Ok(decode_payload(response))
    }
}

/// UTF-8 when valid, otherwise Latin-1.
fn decode_payload(bytes: Vec<u8>) -> String {
    String::from_utf8(bytes)
        .unwrap_or_else(|e| e.into_bytes().iter().map(|&b| b as char).collect())
}


#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::AsyncBufReadExt;
    use tokio::net::TcpListener;

    #[test]
    fn test_decode_payload_latin1_fallback() {
        assert_eq!(decode_payload(b"plain".to_vec()), "plain");
        assert_eq!(decode_payload(vec![b'M', 0xfc, b'n']), "M\u{fc}n");
    }

    #[tokio::test]
    async fn test_tcp_query_round_trip() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (socket, _) = listener.accept().await.unwrap();
            let mut reader = tokio::io::BufReader::new(socket);
            let mut request = String::new();
            reader.read_line(&mut request).await.unwrap();
            let mut socket = reader.into_inner();
            socket
                .write_all(b"Domain Name: EXAMPLE.COM\r\n")
                .await
                .unwrap();
            request
        });

        let transport = TcpTransport::new()
            .with_port(port)
            .with_timeout(Duration::from_secs(5));
        let payload = transport.query("127.0.0.1", "example.com").await.unwrap();

        assert_eq!(payload, "Domain Name: EXAMPLE.COM\r\n");
        assert_eq!(server.await.unwrap(), "example.com\r\n");
    }

    #[tokio::test]
    async fn test_tcp_connection_refused() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let transport = TcpTransport::new()
            .with_port(port)
            .with_timeout(Duration::from_secs(5));
        let err = transport.query("127.0.0.1", "example.com").await.unwrap_err();

        match err {
            WhoisError::Connection { server, .. } => assert_eq!(server, "127.0.0.1"),
            other => panic!("Expected Connection, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_tcp_response_size_cap() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 64];
            let _ = socket.read(&mut buf).await;
            let _ = socket.write_all(&[b'x'; 256]).await;
        });

        let transport = TcpTransport::new()
            .with_port(port)
            .with_timeout(Duration::from_secs(5))
            .with_max_response_size(100);
        let err = transport.query("127.0.0.1", "example.com").await.unwrap_err();
        assert!(matches!(err, WhoisError::Connection { .. }));
    }

    #[tokio::test]
    async fn test_stalled_server_keeps_partial_response() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 64];
            let _ = socket.read(&mut buf).await;
            socket.write_all(b"NetRange: 192.0.2.0 - 192.0.2.255\n").await.unwrap();
            socket.flush().await.unwrap();
            // Hold the connection open past the client's read timeout.
            tokio::time::sleep(Duration::from_secs(2)).await;
            drop(socket);
        });

        let transport = TcpTransport::new()
            .with_port(port)
            .with_timeout(Duration::from_millis(200));
        let payload = transport.query("127.0.0.1", "192.0.2.1").await.unwrap();

        assert_eq!(payload, "NetRange: 192.0.2.0 - 192.0.2.255\n");
        server.abort();
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 64];
            let _ = socket.read(&mut buf).await;
            tokio::time::sleep(Duration::from_secs(2)).await;
            drop(socket);
        });

        let transport = TcpTransport::new()
            .with_port(port)
            .with_timeout(Duration::from_millis(200));
        let err = transport.query("127.0.0.1", "192.0.2.1").await.unwrap_err();

        match err {
            WhoisError::Connection { server, message } => {
                assert_eq!(server, "127.0.0.1");
                assert_eq!(message, "read timed out");
            }
            other => panic!("Expected Connection, got {:?}", other),
        }
        server.abort();
    }
}
