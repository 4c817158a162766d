use std::collections::HashMap;

use chrono::NaiveDate;

use shared_models::appointment::{Appointment, PatientType};
use shared_models::catalog::ServiceCatalog;

use crate::models::{PatientRollup, ServiceShare, Stats};

/// Headline stats over a snapshot. Unknown service ids still count in
/// the distribution and contribute zero revenue; an empty snapshot
/// produces all zeros rather than a division fault.
pub fn compute_stats(
    appointments: &[Appointment],
    catalog: &ServiceCatalog,
    today: NaiveDate,
) -> Stats {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for appointment in appointments {
        *counts.entry(appointment.service_id.as_str()).or_default() += 1;
    }

    let total = appointments.len();
    let share_of_total = |count: usize| {
        if total == 0 {
            0.0
        } else {
            count as f64 * 100.0 / total as f64
        }
    };

    // Catalog order first, then any ids the catalog no longer knows.
    let mut distribution: Vec<ServiceShare> = catalog
        .services()
        .iter()
        .map(|service| {
            let count = counts.get(service.id.as_str()).copied().unwrap_or(0);
            ServiceShare {
                service_id: service.id.clone(),
                name: service.name.clone(),
                count,
                percentage: share_of_total(count),
            }
        })
        .collect();
    let mut strays: Vec<&str> = counts
        .keys()
        .filter(|id| !catalog.contains(id))
        .copied()
        .collect();
    strays.sort_unstable();
    for id in strays {
        distribution.push(ServiceShare {
            service_id: id.to_string(),
            name: catalog.name_of(id),
            count: counts[id],
            percentage: share_of_total(counts[id]),
        });
    }

    // Ties go to whichever service comes first in the distribution,
    // which is catalog order. A strictly-greater scan keeps the first
    // of the tied entries.
    let mut top: Option<&ServiceShare> = None;
    for share in &distribution {
        if share.count > 0 && top.map_or(true, |t| share.count > t.count) {
            top = Some(share);
        }
    }
    let top_service_name = top.map(|share| share.name.clone());

    Stats {
        total,
        today_count: appointments
            .iter()
            .filter(|a| a.appointment_date == today)
            .count(),
        new_patient_count: appointments
            .iter()
            .filter(|a| a.patient_type == PatientType::New)
            .count(),
        revenue: appointments
            .iter()
            .map(|a| catalog.price_of(&a.service_id))
            .sum(),
        top_service_name,
        service_distribution: distribution,
    }
}

/// One rollup per distinct phone number. `last_visit` compares typed
/// dates, so a 2024-01-01 visit beats a 2023-12-31 one regardless of
/// how either would sort as text. The result does not depend on the
/// order of the input records.
pub fn compute_rollups(appointments: &[Appointment], catalog: &ServiceCatalog) -> Vec<PatientRollup> {
    let mut by_phone: HashMap<&str, PatientRollup> = HashMap::new();

    for appointment in appointments {
        let price = catalog.price_of(&appointment.service_id);
        match by_phone.get_mut(appointment.phone.as_str()) {
            Some(rollup) => {
                rollup.visit_count += 1;
                rollup.total_spent += price;
                // The most recent booking wins the displayed name.
                if appointment.appointment_date > rollup.last_visit {
                    rollup.last_visit = appointment.appointment_date;
                    rollup.first_name = appointment.first_name.clone();
                    rollup.last_name = appointment.last_name.clone();
                }
            }
            None => {
                by_phone.insert(
                    appointment.phone.as_str(),
                    PatientRollup {
                        first_name: appointment.first_name.clone(),
                        last_name: appointment.last_name.clone(),
                        phone: appointment.phone.clone(),
                        last_visit: appointment.appointment_date,
                        visit_count: 1,
                        total_spent: price,
                    },
                );
            }
        }
    }

    let mut rollups: Vec<PatientRollup> = by_phone.into_values().collect();
    rollups.sort_by(|a, b| b.last_visit.cmp(&a.last_visit).then(a.phone.cmp(&b.phone)));
    rollups
}
