// Export OpenAPI specification as JSON
//
// Usage: cargo run --bin export-openapi > docs/api/openapi.json
//
// Generates the OpenAPI document without starting the API server or touching storage.

use anyhow::Context;
use eventdesk_control_plane::openapi::ApiDoc;

fn main() -> anyhow::Result<()> {
    let json = ApiDoc::to_json().context("Failed to serialize OpenAPI spec")?;
    println!("{}", json);
    Ok(())
}
