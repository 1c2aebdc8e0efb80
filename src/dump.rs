use std::path::Path;

use tokio::{
    fs,
    io::{AsyncWrite, AsyncWriteExt},
};
use tracing::info;

use crate::error::{Result, ServerError};

/// Overwrites `path` with `data`, then copies it to `console` if one is given.
pub async fn dump<W>(path: &Path, data: &[u8], console: Option<&mut W>) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    info!(path = %path.display(), len = data.len(), "write");
    fs::write(path, data).await.map_err(|source| ServerError::File {
        path: path.to_owned(),
        source,
    })?;

    if let Some(console) = console {
        console.write_all(data).await.map_err(ServerError::Console)?;
        console.flush().await.map_err(ServerError::Console)?;
    }
    Ok(())
}
