use std::net::{Ipv4Addr, SocketAddr};

use tokio::{
    io::{self, AsyncWriteExt},
    net::{TcpListener, TcpSocket, TcpStream},
    signal, time,
};
use tracing::{info, instrument, Instrument};

use crate::{
    config::ServerConfig,
    drain::read_tcp,
    dump::dump,
    error::{Result, ServerError},
};

const BACKLOG: u32 = 5;

/// Listening socket plus the options it serves connections with. Dropping it
/// closes the socket.
#[derive(Debug)]
pub struct Server {
    listener: TcpListener,
    config: ServerConfig,
}

impl Server {
    /// Binds `0.0.0.0:<port>` with address reuse and starts listening.
    /// Must be called from within a tokio runtime.
    pub fn bind(config: ServerConfig) -> Result<Self> {
        let port = config.port;
        let bind_err = |source| ServerError::Bind { port, source };

        let socket = TcpSocket::new_v4().map_err(bind_err)?;
        socket.set_reuseaddr(true).map_err(bind_err)?;
        socket
            .bind(SocketAddr::from((Ipv4Addr::UNSPECIFIED, port)))
            .map_err(bind_err)?;
        info!(port, "listening");
        let listener = socket.listen(BACKLOG).map_err(bind_err)?;
        info!("ready for connections");

        Ok(Self { listener, config })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.listener.local_addr().map_err(ServerError::Socket)
    }

    /// Handles connections one after another until single-shot mode is
    /// satisfied, Ctrl-C arrives, or an error occurs. Nothing is retried.
    #[instrument(skip_all)]
    pub async fn serve(self) -> Result<()> {
        let mut stdout = self.config.echo_stdout.then(io::stdout);
        // Pinned once so an interrupt during a connection is seen at the next accept.
        let shutdown = signal::ctrl_c();
        tokio::pin!(shutdown);
        loop {
            let (stream, addr) = tokio::select! {
                biased;
                interrupted = &mut shutdown => {
                    interrupted.map_err(ServerError::Signal)?;
                    info!("interrupted, shutting down");
                    return Ok(());
                }
                accepted = self.accept() => accepted?,
            };
            self.handle(stream, stdout.as_mut())
                .instrument(tracing::info_span!("handler", ?addr))
                .await?;
            if self.config.single {
                info!("single connection served, shutting down");
                return Ok(());
            }
        }
    }

    async fn accept(&self) -> Result<(TcpStream, SocketAddr)> {
        let accept = self.listener.accept();
        let accepted = match self.config.timeout {
            Some(timeout) => time::timeout(timeout, accept)
                .await
                .map_err(|_| ServerError::AcceptTimeout { timeout })?,
            None => accept.await,
        };
        let (stream, addr) = accepted.map_err(ServerError::Accept)?;
        info!(?addr, "client connected");
        Ok((stream, addr))
    }

    async fn handle(&self, mut stream: TcpStream, console: Option<&mut io::Stdout>) -> Result<()> {
        let data = read_tcp(&stream, self.config.delay, self.config.drain).await?;
        dump(&self.config.data_file, &data, console).await?;

        if self.config.echo_back {
            info!(len = data.len(), "echo to client");
            stream.write_all(&data).await.map_err(ServerError::Socket)?;
        }
        info!("closing connection");
        Ok(())
    }
}

/// Binds according to `config` and serves until done.
pub async fn run(config: ServerConfig) -> Result<()> {
    Server::bind(config)?.serve().await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_addr_reports_wildcard_and_assigned_port() {
        let dir = tempfile::tempdir().unwrap();
        let server = Server::bind(ServerConfig {
            port: 0,
            ..ServerConfig::new(dir.path().join("out.dat"))
        })
        .unwrap();

        let addr = server.local_addr().unwrap();
        assert!(addr.ip().is_unspecified());
        assert_ne!(addr.port(), 0);
    }
}
