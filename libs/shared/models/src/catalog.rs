use serde::{Deserialize, Serialize};
use std::fmt;

/// Label shown when an appointment references a service id that is no
/// longer in the catalog. Old records must render, not fault.
pub const UNKNOWN_SERVICE_LABEL: &str = "Consultation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceCategory {
    General,
    Cosmetic,
    Orthodontics,
    Emergency,
}

impl fmt::Display for ServiceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceCategory::General => write!(f, "General Dentistry"),
            ServiceCategory::Cosmetic => write!(f, "Cosmetic Dentistry"),
            ServiceCategory::Orthodontics => write!(f, "Orthodontics"),
            ServiceCategory::Emergency => write!(f, "Emergency Care"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: String,
    pub name: String,
    pub category: ServiceCategory,
    pub description: String,
    pub duration_minutes: i32,
    pub price: f64,
}

/// Static reference data enumerating everything the clinic offers.
/// Loaded once at startup and never mutated.
#[derive(Debug, Clone)]
pub struct ServiceCatalog {
    services: Vec<Service>,
}

impl ServiceCatalog {
    pub fn new(services: Vec<Service>) -> Self {
        Self { services }
    }

    /// The clinic's standard offering.
    pub fn standard() -> Self {
        Self::new(vec![
            Service {
                id: "1".to_string(),
                name: "Routine Check-up".to_string(),
                category: ServiceCategory::General,
                description: "Comprehensive exam and professional cleaning.".to_string(),
                duration_minutes: 60,
                price: 1500.0,
            },
            Service {
                id: "2".to_string(),
                name: "Teeth Whitening".to_string(),
                category: ServiceCategory::Cosmetic,
                description: "Advanced laser whitening for a brighter smile.".to_string(),
                duration_minutes: 90,
                price: 5000.0,
            },
            Service {
                id: "3".to_string(),
                name: "Invisalign Consultation".to_string(),
                category: ServiceCategory::Orthodontics,
                description: "Discrete teeth straightening solutions.".to_string(),
                duration_minutes: 45,
                price: 2000.0,
            },
            Service {
                id: "4".to_string(),
                name: "Emergency Filling".to_string(),
                category: ServiceCategory::Emergency,
                description: "Immediate care for tooth pain or damage.".to_string(),
                duration_minutes: 60,
                price: 2500.0,
            },
        ])
    }

    /// Services in catalog order. Catalog order is the deterministic
    /// tie-break used by the dashboard's top-service calculation.
    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn get(&self, id: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Price lookup with graceful degradation for unmatched ids.
    pub fn price_of(&self, id: &str) -> f64 {
        self.get(id).map(|s| s.price).unwrap_or(0.0)
    }

    /// Name lookup with graceful degradation for unmatched ids.
    pub fn name_of(&self, id: &str) -> String {
        self.get(id)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| UNKNOWN_SERVICE_LABEL.to_string())
    }
}

impl Default for ServiceCatalog {
    fn default() -> Self {
        Self::standard()
    }
}
