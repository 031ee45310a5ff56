//! Driver work shifts and the derived performance summary.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::FleetError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ShiftStatus {
    #[default]
    Scheduled,
    Ongoing,
    Completed,
    Cancelled,
}

impl ShiftStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShiftStatus::Scheduled => "scheduled",
            ShiftStatus::Ongoing => "ongoing",
            ShiftStatus::Completed => "completed",
            ShiftStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for ShiftStatus {
    type Err = FleetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(ShiftStatus::Scheduled),
            "ongoing" => Ok(ShiftStatus::Ongoing),
            "completed" => Ok(ShiftStatus::Completed),
            "cancelled" => Ok(ShiftStatus::Cancelled),
            other => Err(FleetError::validation(format!(
                "unknown shift status: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub id: u64,
    pub company_id: u64,
    pub driver_id: u64,
    pub shift_date: NaiveDate,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: ShiftStatus,
    pub total_orders: u32,
    pub completed_orders: u32,
    pub cancelled_orders: u32,
    pub total_distance_km: f64,
    pub total_earnings: f64,
    /// Zero means the shift was not rated.
    pub rating: f64,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewShift {
    pub company_id: u64,
    pub driver_id: u64,
    pub shift_date: NaiveDate,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub status: ShiftStatus,
    pub total_orders: u32,
    pub completed_orders: u32,
    pub cancelled_orders: u32,
    pub total_distance_km: f64,
    pub total_earnings: f64,
    pub rating: f64,
    pub notes: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DriverPerformance {
    pub driver_id: u64,
    pub since: NaiveDate,
    pub total_shifts: u32,
    pub completed_shifts: u32,
    pub total_orders: u32,
    pub completed_orders: u32,
    pub cancelled_orders: u32,
    pub total_distance_km: f64,
    pub total_earnings: f64,
    pub average_rating: f64,
    /// Completed orders over total orders, 0.0 when there were none.
    pub completion_rate: f64,
}

impl DriverPerformance {
    /// Fold a window of shifts into a summary.
    pub fn from_shifts(driver_id: u64, since: NaiveDate, shifts: &[Shift]) -> Self {
        let mut perf = DriverPerformance {
            driver_id,
            since,
            ..Default::default()
        };
        let mut rated = 0u32;
        let mut rating_sum = 0.0;

        for shift in shifts {
            perf.total_shifts += 1;
            if shift.status == ShiftStatus::Completed {
                perf.completed_shifts += 1;
            }
            perf.total_orders += shift.total_orders;
            perf.completed_orders += shift.completed_orders;
            perf.cancelled_orders += shift.cancelled_orders;
            perf.total_distance_km += shift.total_distance_km;
            perf.total_earnings += shift.total_earnings;
            if shift.rating > 0.0 {
                rated += 1;
                rating_sum += shift.rating;
            }
        }

        if rated > 0 {
            perf.average_rating = rating_sum / f64::from(rated);
        }
        if perf.total_orders > 0 {
            perf.completion_rate = f64::from(perf.completed_orders) / f64::from(perf.total_orders);
        }
        perf
    }
}
