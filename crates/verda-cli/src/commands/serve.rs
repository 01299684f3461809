//! Serve command - run the managed llama-server.

use std::time::Duration;

use verda_chat::{local_llm_paths, LlamaServer, DEFAULT_LOCAL_PORT, DEFAULT_MODEL_FILENAME};

pub(crate) async fn run(port: Option<u16>) -> miette::Result<()> {
    let port = port.unwrap_or(DEFAULT_LOCAL_PORT);
    let mut server = LlamaServer::new(DEFAULT_MODEL_FILENAME).with_port(port);

    if !server.binary_exists() {
        return Err(miette::miette!(
            "llama-server binary not found at {}. Install llama.cpp and place the binary there.",
            local_llm_paths::llama_server_path().display()
        ));
    }

    if !server.model_exists() {
        return Err(miette::miette!(
            "Model '{}' is not installed. Run: verda model pull",
            DEFAULT_MODEL_FILENAME
        ));
    }

    server.start().map_err(|e| miette::miette!("{}", e))?;
    server
        .wait_ready(Duration::from_secs(120))
        .await
        .map_err(|e| miette::miette!("{}", e))?;

    println!("llama-server ready on port {}. Press Ctrl-C to stop.", port);

    tokio::signal::ctrl_c()
        .await
        .map_err(|e| miette::miette!("{}", e))?;

    println!("Stopping llama-server...");
    server.stop().map_err(|e| miette::miette!("{}", e))?;

    Ok(())
}
