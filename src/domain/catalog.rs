use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::status::ParseStatusError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackageKind {
    Buffet,
    Box,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PackageCategory {
    Wedding,
    Blessing,
    Birthday,
    StudyTour,
    Meeting,
}

impl PackageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageKind::Buffet => "BUFFET",
            PackageKind::Box => "BOX",
        }
    }
}

impl PackageCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageCategory::Wedding => "WEDDING",
            PackageCategory::Blessing => "BLESSING",
            PackageCategory::Birthday => "BIRTHDAY",
            PackageCategory::StudyTour => "STUDY_TOUR",
            PackageCategory::Meeting => "MEETING",
        }
    }
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for PackageCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PackageKind {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "BUFFET" => Ok(PackageKind::Buffet),
            "BOX" => Ok(PackageKind::Box),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

impl FromStr for PackageCategory {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WEDDING" => Ok(PackageCategory::Wedding),
            "BLESSING" => Ok(PackageCategory::Blessing),
            "BIRTHDAY" => Ok(PackageCategory::Birthday),
            "STUDY_TOUR" => Ok(PackageCategory::StudyTour),
            "MEETING" => Ok(PackageCategory::Meeting),
            other => Err(ParseStatusError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PackageDraft {
    pub name: String,
    pub kind: PackageKind,
    pub category: PackageCategory,
    pub serving_capacity: i32,
    pub unit_price: i64,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct PackageView {
    pub id: Uuid,
    pub name: String,
    pub kind: PackageKind,
    pub category: PackageCategory,
    pub serving_capacity: i32,
    pub unit_price: i64,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PaymentMethodDetailView {
    pub id: Uuid,
    pub account_number: String,
    pub provider: String,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PaymentMethodView {
    pub id: Uuid,
    pub name: String,
    pub details: Vec<PaymentMethodDetailView>,
}

#[derive(Debug, Clone)]
pub struct CourierView {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}
