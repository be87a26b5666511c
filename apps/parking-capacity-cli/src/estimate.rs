use clap::Args;
use parking_capacity::{EstimatorKind, ParkingCapacityApi};
use rust_decimal::Decimal;
use serde_json::json;

#[derive(Args)]
pub struct EstimateArgs {
    /// Available area in square metres
    #[arg(short, long)]
    area: Decimal,

    /// Vehicle capacity
    #[arg(short, long)]
    capacity: u32,

    /// `heuristic` or `learned`
    #[arg(short, long, default_value_t = EstimatorKind::Heuristic)]
    estimator: EstimatorKind,
}

impl EstimateArgs {
    pub async fn run(&self, api: &dyn ParkingCapacityApi) -> anyhow::Result<()> {
        let required = api
            .estimate_gateways(self.estimator, self.area, self.capacity)
            .await?;
        let report = json!({
            "estimator": self.estimator,
            "available_area": self.area,
            "capacity": self.capacity,
            "required_gateways": required,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        Ok(())
    }
}
