//! Full intake-to-storage scenarios driven through the public API only.

use std::sync::{Arc, Mutex};

use autoshop_contracts::{
    error::{DelegateError, ShopError, ShopResult},
    execution::{RunEvent, RunOutcome, RunStatus},
    records::Intake,
    stage::StageId,
};
use autoshop_core::{CancellationToken, Delegate, Pipeline, RunObserver, StageDelegates};
use autoshop_validate::ValidatedIntake;

const HONDA_INTAKE: &str = r#"
[vehicle]
Make = "Honda"
Model = "CRV"
Year = "2022"
VIN = "1HG..."
Color = "Blue"
Mileage = "15000"
"Seating Capacity" = "5"

[customer]
Name = "Elias"
Contact = "8734840000"
Email = "e@x.com"
Address = "1 Rd"

[service]
"Last Service Date" = "2024-01-10"
"Next Service Due" = "2024-07-10"
"Service Mileage" = "14000"
"Service Type" = "Oil Change"
"#;

/// Answers like a shop assistant would, keyed off the prompt's opening words.
struct ShopFloor;

impl Delegate for ShopFloor {
    fn generate_reply(&self, prompt: &str) -> Result<String, DelegateError> {
        let reply = if prompt.starts_with("Please collect") {
            "Intake recorded for Elias, 2022 Honda CRV."
        } else if prompt.starts_with("Scan") {
            "No fault codes; brake pads at 30%."
        } else if prompt.starts_with("Review") {
            "Replace front brake pads."
        } else if prompt.starts_with("Inspect") {
            "Brakes replaced; all systems nominal."
        } else if prompt.starts_with("Store") {
            "Stored. Next check-up 2024-07-10 or 19000 miles."
        } else {
            return Err(DelegateError::Malformed {
                reason: format!("unexpected prompt: {prompt}"),
            });
        };
        Ok(reply.to_string())
    }
}

#[derive(Default)]
struct Collector {
    events: Mutex<Vec<RunEvent>>,
}

impl RunObserver for Collector {
    fn notify(&self, event: &RunEvent) -> ShopResult<()> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

#[test]
fn honda_intake_runs_all_five_stages() {
    let intake = Intake::from_toml_str(HONDA_INTAKE).unwrap();
    let accepted = ValidatedIntake::new(intake).unwrap();
    let pipeline = Pipeline::new(StageDelegates::uniform(Arc::new(ShopFloor)));
    let collector = Collector::default();

    let outcome = pipeline
        .run(&accepted, &CancellationToken::new(), &collector)
        .unwrap();

    let events = collector.events.lock().unwrap();
    assert_eq!(events.len(), 6);
    let stages: Vec<StageId> = events.iter().filter_map(RunEvent::stage).collect();
    assert_eq!(stages, StageId::ALL);
    assert!(events.iter().all(|e| e.run_id() == outcome.context().run_id()));
    assert!(matches!(
        events.last(),
        Some(RunEvent::RunFinished { status: RunStatus::Done, .. })
    ));

    match outcome {
        RunOutcome::Done { final_text, context } => {
            assert_eq!(final_text, "Stored. Next check-up 2024-07-10 or 19000 miles.");
            assert!(context.is_complete());
            let analysis = &context.entries()[StageId::Analysis.index()];
            assert!(analysis.prompt.ends_with("No fault codes; brake pads at 30%."));
        }
        other => panic!("expected Done, got {:?}", other),
    }
}

#[test]
fn invalid_contact_never_reaches_a_delegate() {
    let intake = Intake::from_toml_str(&HONDA_INTAKE.replace("8734840000", "12345")).unwrap();
    let pipeline = Pipeline::new(StageDelegates::uniform(Arc::new(ShopFloor)));
    let collector = Collector::default();

    let err = pipeline
        .submit(intake, &CancellationToken::new(), &collector)
        .unwrap_err();

    match err {
        ShopError::Validation(v) => {
            assert_eq!(v.field, "Contact");
            assert_eq!(v.message, "Contact must be exactly 10 digits");
        }
        other => panic!("expected Validation, got {:?}", other),
    }
    assert!(collector.events.lock().unwrap().is_empty());
}
