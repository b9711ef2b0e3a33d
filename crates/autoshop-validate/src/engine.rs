//! The intake validation gate.
//!
//! Checks run in a fixed order and `validate` stops at the first violation:
//!
//!  1. vehicle required fields      7. customer email format
//!  2. vehicle year                 8. service dates present
//!  3. vehicle mileage              9. last service date
//!  4. vehicle seating capacity    10. next service due
//!  5. customer required fields    11. service mileage
//!  6. customer contact format     12. service type
//!
//! `validate_all` walks the same list without stopping, for tooling that
//! wants to show every problem at once. Only `ValidatedIntake::new` (and
//! therefore the short-circuit form) gates a pipeline run.

use tracing::{debug, warn};

use autoshop_contracts::{
    records::Intake,
    violation::{Violation, ViolationKind},
};

use crate::rules::{is_blank, is_contact_number, is_email, is_positive_integer, is_year, parse_date};

type Check = fn(&Intake) -> Option<Violation>;

const CHECKS: [(&str, Check); 12] = [
    ("vehicle-required", vehicle_required),
    ("vehicle-year", vehicle_year),
    ("vehicle-mileage", vehicle_mileage),
    ("vehicle-seating-capacity", vehicle_seating_capacity),
    ("customer-required", customer_required),
    ("customer-contact", customer_contact),
    ("customer-email", customer_email),
    ("service-dates-present", service_dates_present),
    ("service-last-date", service_last_date),
    ("service-next-date", service_next_date),
    ("service-mileage", service_mileage),
    ("service-type", service_type),
];

/// Validate `intake`, returning the first violation found.
///
/// Pure: the same input always yields the same answer.
pub fn validate(intake: &Intake) -> Result<(), Violation> {
    for (check_id, check) in CHECKS {
        debug!(check_id, "evaluating intake rule");
        if let Some(violation) = check(intake) {
            warn!(
                check_id,
                field = %violation.field,
                message = %violation.message,
                "intake rejected"
            );
            return Err(violation);
        }
    }
    Ok(())
}

/// Validate `intake` and collect every violation, in check order.
pub fn validate_all(intake: &Intake) -> Vec<Violation> {
    CHECKS
        .iter()
        .filter_map(|(_, check)| check(intake))
        .collect()
}

/// An intake that has passed `validate`.
///
/// The only constructor runs the validator, so holding one is proof that
/// the records were accepted. The pipeline accepts nothing else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedIntake {
    intake: Intake,
}

impl ValidatedIntake {
    /// Validate `intake` and wrap it on success.
    pub fn new(intake: Intake) -> Result<Self, Violation> {
        validate(&intake)?;
        Ok(Self { intake })
    }

    pub fn intake(&self) -> &Intake {
        &self.intake
    }

    pub fn into_inner(self) -> Intake {
        self.intake
    }
}

impl TryFrom<Intake> for ValidatedIntake {
    type Error = Violation;

    fn try_from(intake: Intake) -> Result<Self, Self::Error> {
        Self::new(intake)
    }
}

// ── Checks ───────────────────────────────────────────────────────────────────

fn first_blank(fields: &[(&'static str, &str)]) -> Option<Violation> {
    fields.iter().find(|(_, value)| is_blank(value)).map(|(label, _)| {
        Violation::new(*label, ViolationKind::MissingField, format!("{label} is required"))
    })
}

fn positive_integer(label: &'static str, value: &str) -> Option<Violation> {
    if is_positive_integer(value) {
        None
    } else {
        Some(Violation::new(
            label,
            ViolationKind::NotPositiveInteger,
            format!("{label} must be a positive whole number"),
        ))
    }
}

/// Optional numeric fields are only checked when filled in.
fn optional_positive_integer(label: &'static str, value: &str) -> Option<Violation> {
    if value.is_empty() {
        None
    } else {
        positive_integer(label, value)
    }
}

fn date(label: &'static str, value: &str) -> Option<Violation> {
    match parse_date(value) {
        Some(_) => None,
        None => Some(Violation::new(
            label,
            ViolationKind::DateFormat,
            format!("{label} must be a valid date in YYYY-MM-DD format"),
        )),
    }
}

fn vehicle_required(intake: &Intake) -> Option<Violation> {
    let v = &intake.vehicle;
    first_blank(&[
        ("Make", v.make.as_str()),
        ("Model", v.model.as_str()),
        ("VIN", v.vin.as_str()),
        ("Color", v.color.as_str()),
    ])
}

fn vehicle_year(intake: &Intake) -> Option<Violation> {
    if is_year(&intake.vehicle.year) {
        None
    } else {
        Some(Violation::new(
            "Year",
            ViolationKind::YearFormat,
            "Year must be a 4-digit number",
        ))
    }
}

fn vehicle_mileage(intake: &Intake) -> Option<Violation> {
    optional_positive_integer("Mileage", &intake.vehicle.mileage)
}

fn vehicle_seating_capacity(intake: &Intake) -> Option<Violation> {
    optional_positive_integer("Seating Capacity", &intake.vehicle.seating_capacity)
}

fn customer_required(intake: &Intake) -> Option<Violation> {
    let c = &intake.customer;
    first_blank(&[
        ("Name", c.name.as_str()),
        ("Contact", c.contact.as_str()),
        ("Email", c.email.as_str()),
        ("Address", c.address.as_str()),
    ])
}

fn customer_contact(intake: &Intake) -> Option<Violation> {
    if is_contact_number(&intake.customer.contact) {
        None
    } else {
        Some(Violation::new(
            "Contact",
            ViolationKind::ContactFormat,
            "Contact must be exactly 10 digits",
        ))
    }
}

fn customer_email(intake: &Intake) -> Option<Violation> {
    if is_email(&intake.customer.email) {
        None
    } else {
        Some(Violation::new(
            "Email",
            ViolationKind::EmailFormat,
            "Email must look like name@domain.tld",
        ))
    }
}

fn service_dates_present(intake: &Intake) -> Option<Violation> {
    let s = &intake.service;
    [
        ("Last Service Date", s.last_service_date.as_str()),
        ("Next Service Due", s.next_service_due.as_str()),
    ]
    .into_iter()
    .find(|(_, value)| is_blank(value))
    .map(|(label, _)| {
        Violation::new(
            label,
            ViolationKind::DateMissing,
            format!("{label} is required (YYYY-MM-DD)"),
        )
    })
}

fn service_last_date(intake: &Intake) -> Option<Violation> {
    date("Last Service Date", &intake.service.last_service_date)
}

fn service_next_date(intake: &Intake) -> Option<Violation> {
    date("Next Service Due", &intake.service.next_service_due)
}

fn service_mileage(intake: &Intake) -> Option<Violation> {
    positive_integer("Service Mileage", &intake.service.service_mileage)
}

fn service_type(intake: &Intake) -> Option<Violation> {
    first_blank(&[("Service Type", intake.service.service_type.as_str())])
}
