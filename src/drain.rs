use std::{io, time::Duration};

use tokio::{net::TcpStream, time};
use tracing::{debug, info};

use crate::error::{Result, ServerError};

pub const BUFSIZE: usize = 1024;

/// Performs one bounded read, sleeping `delay` first. Would-block results are
/// retried; an empty result means the client closed without sending anything.
pub async fn read_once(stream: &TcpStream, delay: Duration) -> Result<Vec<u8>> {
    if !delay.is_zero() {
        time::sleep(delay).await;
    }
    let mut buf = vec![0; BUFSIZE];
    loop {
        stream.readable().await.map_err(ServerError::Socket)?;
        match stream.try_read(&mut buf) {
            Ok(len) => {
                buf.truncate(len);
                return Ok(buf);
            }
            // Readiness can be stale: tokio clears it only when a read would block.
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                debug!("read would block, retrying");
            }
            Err(e) => return Err(ServerError::Socket(e)),
        }
    }
}

/// Reads until the client shuts down its side of the connection.
pub async fn read_to_close(stream: &TcpStream, delay: Duration) -> Result<Vec<u8>> {
    let mut payload = Vec::new();
    loop {
        let chunk = read_once(stream, delay).await?;
        if chunk.is_empty() {
            return Ok(payload);
        }
        payload.extend_from_slice(&chunk);
    }
}

pub async fn read_tcp(stream: &TcpStream, delay: Duration, drain: bool) -> Result<Vec<u8>> {
    info!("read data from client");
    let data = if drain {
        read_to_close(stream, delay).await?
    } else {
        read_once(stream, delay).await?
    };
    info!(len = data.len(), "read complete");
    Ok(data)
}
