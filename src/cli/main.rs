use clap::{Parser, Subcommand};
use std::error::Error;
use std::io::Read;
use std::sync::Arc;
use text_enrichment_worker::{
    enrichment::EventEnrichmentService,
    nlp::{NlpBackend, TextEnrichmentEngine},
    processing::EnrichmentProcessor,
};

/// Runs the enrichment pipeline in-process, without a broker or server,
/// for inspecting what a given payload would produce.
#[derive(Parser)]
#[command(name = "enrich-cli")]
#[command(about = "Text enrichment debug CLI", long_about = None)]
struct Cli {
    /// Pretty-print the JSON output
    #[arg(short, long)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process an event payload as the worker would
    Event {
        /// Path to a JSON file; reads stdin when omitted
        #[arg(short, long)]
        file: Option<String>,
    },

    /// Segment and tag a bare text string
    Text {
        #[arg(value_name = "TEXT")]
        text: String,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    let backend = NlpBackend::default();
    let engine = Arc::new(TextEnrichmentEngine::new(&backend));

    match cli.command {
        Commands::Event { file } => {
            let payload = match file {
                Some(path) => std::fs::read(path)?,
                None => {
                    let mut buffer = Vec::new();
                    std::io::stdin().read_to_end(&mut buffer)?;
                    buffer
                }
            };

            let service = Arc::new(EventEnrichmentService::new(engine));
            let processor = EnrichmentProcessor::new(service);
            let message = processor.process(&payload);

            let result: serde_json::Value = serde_json::from_slice(&message.payload)?;
            let output = serde_json::json!({ "tag": message.tag, "result": result });
            print_json(&output, cli.pretty)?;
        }
        Commands::Text { text } => {
            let segments = engine.enrich(&text);
            print_json(&serde_json::to_value(segments)?, cli.pretty)?;
        }
    }

    Ok(())
}

fn print_json(value: &serde_json::Value, pretty: bool) -> Result<(), Box<dyn Error>> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{}", rendered);
    Ok(())
}
