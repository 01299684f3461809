//! Chat command - interactive session with the assistant.

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use verda_chat::{
    ActivityInput, BackendKind, ChatConfig, ChatRequest, ChatTurn, MetricsSink, Orchestrator,
    UsageMetrics,
};

use crate::metrics_server;

pub(crate) async fn run(
    activity: ActivityInput,
    local: bool,
    metrics_port: u16,
    no_metrics: bool,
) -> miette::Result<()> {
    // Load .env first so HF_TOKEN can live there during development.
    dotenvy::dotenv().ok();

    // Missing credential aborts here, before any backend or endpoint exists.
    let config = ChatConfig::from_env().map_err(|e| miette::miette!("{}", e))?;

    let metrics = Arc::new(UsageMetrics::new());

    if !no_metrics {
        let exporter = Arc::clone(&metrics);
        tokio::spawn(async move {
            if let Err(e) = metrics_server::serve(exporter, metrics_port).await {
                tracing::warn!("metrics endpoint failed: {}", e);
            }
        });
        println!("Metrics: http://127.0.0.1:{}/metrics", metrics_port);
    }

    let backend = if local {
        BackendKind::Local
    } else {
        BackendKind::Remote
    };

    let orchestrator =
        Orchestrator::new(&config, Arc::clone(&metrics) as Arc<dyn MetricsSink>)
            .map_err(|e| miette::miette!("{}", e))?;

    println!("Verda - sustainability chat");
    println!("===========================");
    println!("Backend: {}", backend_label(local, &config));
    println!("Type 'quit' or 'exit' to end the conversation.");
    println!("Type 'clear' to reset conversation history.");
    println!();

    let mut history: Vec<ChatTurn> = Vec::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("you> ");
        stdout.flush().ok();

        let mut input = String::new();
        let read = stdin
            .lock()
            .read_line(&mut input)
            .map_err(|e| miette::miette!("Failed to read input: {}", e))?;
        if read == 0 {
            break; // EOF
        }
        let input = input.trim();

        match input {
            "quit" | "exit" => break,
            "clear" => {
                history.clear();
                println!("Conversation cleared.");
                continue;
            }
            "" => continue,
            _ => {}
        }

        let request = ChatRequest {
            message: input.to_string(),
            history: history.clone(),
            activity,
            backend,
        };

        print!("verda> ");
        stdout.flush().ok();

        let mut reply = orchestrator.respond(request);
        let mut printed = 0usize;
        let mut full_reply: Option<String> = None;

        while let Some(item) = reply.recv().await {
            match item {
                Ok(snapshot) => {
                    // Snapshots are prefix-complete; print only the new tail.
                    print!("{}", &snapshot[printed..]);
                    stdout.flush().ok();
                    printed = snapshot.len();
                    full_reply = Some(snapshot);
                }
                Err(e) => {
                    println!();
                    eprintln!("error: {}", e);
                    full_reply = None;
                    break;
                }
            }
        }
        println!();

        // Keep the turn only if a reply completed; a failed turn leaves the
        // history as it was.
        if let Some(text) = full_reply {
            history.push(ChatTurn::user(input));
            history.push(ChatTurn::assistant(text));
        }
    }

    Ok(())
}

fn backend_label(local: bool, config: &ChatConfig) -> String {
    if local {
        format!("local ({})", config.local_url)
    } else {
        format!("remote ({})", config.remote_model)
    }
}
