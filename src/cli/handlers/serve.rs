use crate::remote::DocumentStore;
use anyhow::Result;
use std::sync::Arc;

use super::CommandContext;

pub async fn handle_serve(ctx: &CommandContext, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(ctx.config.server.port);
    let store_path = ctx.config.document_store_path(&ctx.root);
    std::fs::create_dir_all(&store_path)?;

    println!("Serving lists from {}", store_path.display());
    println!("Listening on http://localhost:{}", port);

    crate::server::serve(Arc::new(DocumentStore::new(&store_path)), port).await
}
