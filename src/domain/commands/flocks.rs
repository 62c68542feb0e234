//! Command and result types for flock operations.
use crate::domain::models::flock::Flock;

#[derive(Debug, Clone)]
pub struct CreateFlockCommand {
    pub breed: String,
    /// Calendar date, `YYYY-MM-DD`
    pub arrival_date: String,
    pub initial_chicks: u32,
    pub extra_chicks: u32,
    pub price_per_chick: f64,
}

#[derive(Debug, Clone)]
pub struct CreateFlockResult {
    pub flock: Flock,
}

#[derive(Debug, Clone)]
pub struct UpdateFlockCommand {
    pub flock_id: String,
    pub breed: Option<String>,
    pub arrival_date: Option<String>,
    pub initial_chicks: Option<u32>,
    pub extra_chicks: Option<u32>,
    pub price_per_chick: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct UpdateFlockResult {
    pub flock: Flock,
}

#[derive(Debug, Clone)]
pub struct GetFlockCommand {
    pub flock_id: String,
}

#[derive(Debug, Clone)]
pub struct GetFlockResult {
    pub flock: Option<Flock>,
}

#[derive(Debug, Clone)]
pub struct ListFlocksResult {
    pub flocks: Vec<Flock>,
}

#[derive(Debug, Clone)]
pub struct DeleteFlockCommand {
    pub flock_id: String,
}

#[derive(Debug, Clone)]
pub struct DeleteFlockResult {
    pub success_message: String,
    pub deleted_daily_records: u32,
    pub deleted_financial_records: u32,
}
