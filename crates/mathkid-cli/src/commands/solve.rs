//! Solve command

use super::read_input;
use crate::app::{InputArgs, OutputFormat};
use crate::output::format_solution;
use crate::progress::StageReporter;
use anyhow::Result;
use mathkid_core::{Config, MathKidError, Pipeline};

pub async fn run(args: InputArgs, config: &Config, format: OutputFormat, verbose: bool) -> Result<()> {
    // Missing credentials stop us before any input is looked at
    let (pipeline, client) = Pipeline::from_config(config)?;

    let input = read_input(&args)?;
    if input.is_empty() {
        return Err(MathKidError::EmptyInput(
            "please type a math question or pass an image with --image".to_string(),
        )
        .into());
    }

    let reporter = StageReporter::new();
    let result = pipeline.run_with_observer(input, &reporter).await?;

    print!("{}", format_solution(&result, format));

    if verbose {
        let metrics = client.metrics();
        eprintln!();
        eprintln!("Requests:        {}", metrics.total_requests);
        eprintln!("Uploads:         {}", metrics.total_uploads);
        eprintln!("Errors:          {}", metrics.total_errors);
        eprintln!("Avg latency:     {:.0} ms", metrics.avg_latency_ms);
    }
    Ok(())
}
