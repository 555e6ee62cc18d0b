use std::io::Write as _;
use std::path::Path;

use bujo_core::export::ExportClient;

use crate::commands::common::api_client;
use crate::error::CliError;

pub async fn run_export(output_path: Option<&Path>, api_url: Option<&str>) -> Result<(), CliError> {
    let client = ExportClient::new(api_client(api_url)?);
    let report = client.fetch_report().await;
    let rendered = report.combined();

    if let Some(path) = output_path {
        std::fs::write(path, rendered)?;
        println!("{}", path.display());
    } else {
        std::io::stdout().write_all(rendered.as_bytes())?;
    }

    Ok(())
}
