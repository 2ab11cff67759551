//! Print the OpenAPI document, as JSON by default or YAML with `--yaml`.

use std::io::Write;

use backend::doc::ApiDoc;
use clap::Parser;
use utoipa::OpenApi;

#[derive(Debug, Parser)]
#[command(name = "openapi-dump", about = "Export the ledger OpenAPI document")]
struct Args {
    /// Emit YAML instead of JSON.
    #[arg(long)]
    yaml: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let doc = ApiDoc::openapi();
    let rendered = if args.yaml {
        doc.to_yaml()?
    } else {
        doc.to_pretty_json()?
    };

    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    Ok(())
}
