use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use parking_capacity::{EstimatorKind, ParkingCapacityApi, ParkingCapacityConfig, TrainingSample};
use serde_json::json;
use tracing::info;

#[derive(Args)]
pub struct TrainArgs {
    /// JSON array of `{available_area, capacity, observed_gateways}` samples
    #[arg(short, long)]
    dataset: PathBuf,

    /// Where to write the model; defaults to the configured `model_path`
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl TrainArgs {
    pub async fn run(
        &self,
        api: &dyn ParkingCapacityApi,
        config: &ParkingCapacityConfig,
    ) -> anyhow::Result<()> {
        let samples = read_dataset(&self.dataset)?;
        let output = self.output.as_deref().unwrap_or(&config.model_path);
        info!(samples = samples.len(), output = %output.display(), "Training gateway model");

        api.train_model(samples.clone(), output).await?;

        let mut fitted = Vec::with_capacity(samples.len());
        for sample in &samples {
            let predicted = api
                .estimate_gateways(EstimatorKind::Learned, sample.available_area, sample.capacity)
                .await?;
            fitted.push(json!({
                "available_area": sample.available_area,
                "capacity": sample.capacity,
                "observed_gateways": sample.observed_gateways,
                "predicted_gateways": predicted,
            }));
        }
        let report = json!({ "model_path": output.display().to_string(), "samples": fitted });
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}

fn read_dataset(path: &Path) -> anyhow::Result<Vec<TrainingSample>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("malformed dataset {}", path.display()))
}
