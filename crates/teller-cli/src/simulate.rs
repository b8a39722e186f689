//! Randomized branch simulation: one tokio task per teller.

use std::path::Path;
use std::time::Duration;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use teller_core::{
    BranchBuilder, BranchConfig, ConfigError, ConfiguredSelector, Customer, CustomerQueue,
    SharedBranch,
};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub branch: BranchConfig,

    /// Number of customers arriving during the run.
    pub customers: usize,

    /// Upper bound of the random gap between two arrivals.
    pub arrival_ms: u64,

    pub service_ms_min: u64,
    pub service_ms_max: u64,

    /// Fixed seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            branch: BranchConfig::default(),
            customers: 20,
            arrival_ms: 40,
            service_ms_min: 50,
            service_ms_max: 150,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.branch.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    fn service_range(&self) -> std::ops::RangeInclusive<u64> {
        let (min, max) = (self.service_ms_min, self.service_ms_max);
        min.min(max)..=max.max(min)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TellerReport {
    pub served: usize,
    pub total_wait_ms: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SimulationReport {
    pub tellers: Vec<TellerReport>,
    pub served: usize,
    pub average_wait_ms: f64,
}

impl SimulationReport {
    fn from_tellers(tellers: Vec<TellerReport>) -> Self {
        let served = tellers.iter().map(|t| t.served).sum::<usize>();
        let total_wait: i64 = tellers.iter().map(|t| t.total_wait_ms).sum();
        let average_wait_ms = if served == 0 {
            0.0
        } else {
            total_wait as f64 / served as f64
        };
        Self {
            tellers,
            served,
            average_wait_ms,
        }
    }
}

async fn teller_loop(
    branch: SharedBranch<Customer, ConfiguredSelector>,
    line: usize,
    service: std::ops::RangeInclusive<u64>,
    mut rng: StdRng,
) -> TellerReport {
    let mut report = TellerReport::default();
    while let Ok(Some(customer)) = branch.serve(line).await {
        let waited = customer.waited(Utc::now()).num_milliseconds();
        debug!(line, customer = %customer, waited_ms = waited, "serving customer");
        report.served += 1;
        report.total_wait_ms += waited;
        tokio::time::sleep(Duration::from_millis(rng.gen_range(service.clone()))).await;
    }
    report
}

/// Wait for every teller task. A teller that died reports zero served customers.
async fn join_tellers(tellers: Vec<JoinHandle<TellerReport>>) -> Vec<TellerReport> {
    let mut reports = Vec::with_capacity(tellers.len());
    for (line, teller) in tellers.into_iter().enumerate() {
        match teller.await {
            Ok(report) => reports.push(report),
            Err(e) => {
                warn!(line, error = %e, "teller task failed");
                reports.push(TellerReport::default());
            }
        }
    }
    reports
}

pub async fn run(config: SimulationConfig) -> Result<SimulationReport, ConfigError> {
    let branch = BranchBuilder::from_config(config.branch.clone()).build_shared::<Customer>()?;
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(tellers = branch.lines(), customers = config.customers, "simulation started");

    let tellers: Vec<_> = (0..branch.lines())
        .map(|line| {
            let rng = StdRng::seed_from_u64(rng.r#gen());
            tokio::spawn(teller_loop(branch.clone(), line, config.service_range(), rng))
        })
        .collect();

    for n in 0..config.customers {
        let line = branch.enqueue(Customer::new(format!("customer-{n}"))).await;
        debug!(customer = n, %line, "arrived");
        if config.arrival_ms > 0 {
            let gap = rng.gen_range(0..=config.arrival_ms);
            tokio::time::sleep(Duration::from_millis(gap)).await;
        }
    }

    branch.close().await;

    let report = SimulationReport::from_tellers(join_tellers(tellers).await);
    info!(
        served = report.served,
        average_wait_ms = report.average_wait_ms,
        "simulation finished"
    );
    Ok(report)
}
