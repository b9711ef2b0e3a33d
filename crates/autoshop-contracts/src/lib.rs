//! # autoshop-contracts
//!
//! Shared types for the autoshop service-intake pipeline.
//!
//! Every crate in the workspace imports from here. No business logic lives in
//! this crate: only records, stage identifiers, the pipeline context, run
//! events and error types.

pub mod context;
pub mod error;
pub mod execution;
pub mod records;
pub mod stage;
pub mod violation;

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use context::{PipelineContext, RunId, StageRecord};
    use error::{DelegateError, ShopError};
    use execution::{RunOutcome, RunStatus, StageFailure};
    use records::{Intake, VehicleRecord};
    use stage::StageId;
    use violation::{Violation, ViolationKind};

    fn record(stage: StageId, result: &str) -> StageRecord {
        StageRecord {
            stage,
            prompt: format!("prompt for {stage}"),
            result: result.to_string(),
            attempts: 1,
            completed_at: Utc::now(),
        }
    }

    // ── StageId ──────────────────────────────────────────────────────────────

    #[test]
    fn stage_order_is_fixed() {
        let names: Vec<&str> = StageId::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            ["Intake", "Scanning", "Analysis", "QualityControl", "Storage"]
        );
        for (i, stage) in StageId::ALL.iter().enumerate() {
            assert_eq!(stage.index(), i);
        }
    }

    #[test]
    fn stage_next_walks_the_chain() {
        assert_eq!(StageId::Intake.next(), Some(StageId::Scanning));
        assert_eq!(StageId::QualityControl.next(), Some(StageId::Storage));
        assert_eq!(StageId::Storage.next(), None);
    }

    #[test]
    fn stage_from_name() {
        assert_eq!(StageId::from_name("QualityControl"), Some(StageId::QualityControl));
        assert_eq!(StageId::from_name("quality-control"), None);
    }

    // ── PipelineContext ──────────────────────────────────────────────────────

    #[test]
    fn context_appends_in_order() {
        let mut ctx = PipelineContext::new(RunId::new(), Intake::default());
        assert_eq!(ctx.next_stage(), Some(StageId::Intake));

        ctx.append(record(StageId::Intake, "intake done")).unwrap();
        ctx.append(record(StageId::Scanning, "scan done")).unwrap();

        assert_eq!(ctx.last_completed(), Some(StageId::Scanning));
        assert_eq!(ctx.result_of(StageId::Scanning), Some("scan done"));
        assert_eq!(ctx.result_of(StageId::Analysis), None);
        assert_eq!(ctx.next_stage(), Some(StageId::Analysis));
    }

    #[test]
    fn context_rejects_out_of_order_append() {
        let mut ctx = PipelineContext::new(RunId::new(), Intake::default());
        let err = ctx.append(record(StageId::Analysis, "too early")).unwrap_err();

        assert!(matches!(err, ShopError::StateMachine { .. }));
        assert!(err.to_string().contains("expected 'Intake'"));
        assert!(ctx.entries().is_empty(), "failed append must not change the context");
    }

    #[test]
    fn context_rejects_append_after_completion() {
        let mut ctx = PipelineContext::new(RunId::new(), Intake::default());
        for stage in StageId::ALL {
            ctx.append(record(stage, "ok")).unwrap();
        }
        assert!(ctx.is_complete());

        let err = ctx.append(record(StageId::Storage, "again")).unwrap_err();
        assert!(matches!(err, ShopError::StateMachine { .. }));
        assert_eq!(ctx.entries().len(), 5);
    }

    // ── Records ──────────────────────────────────────────────────────────────

    #[test]
    fn vehicle_from_fields_uses_form_labels() {
        let vehicle = VehicleRecord::from_fields([
            ("Make", "Honda"),
            ("Model", "CRV"),
            ("Seating Capacity", "5"),
        ])
        .unwrap();

        assert_eq!(vehicle.make, "Honda");
        assert_eq!(vehicle.seating_capacity, "5");
        assert_eq!(vehicle.vin, "", "missing labels default to empty");
    }

    #[test]
    fn vehicle_from_fields_rejects_misspelled_label() {
        let err = VehicleRecord::from_fields([("Seating capacity", "5")]).unwrap_err();
        match err {
            ShopError::Intake { reason } => {
                assert!(reason.contains("vehicle"), "reason: {reason}");
                assert!(reason.contains("Seating capacity"), "reason: {reason}");
            }
            other => panic!("expected Intake error, got {:?}", other),
        }
    }

    #[test]
    fn intake_parses_from_toml() {
        let intake = Intake::from_toml_str(
            r#"
            [vehicle]
            Make = "Honda"
            Year = "2022"

            [customer]
            Name = "Elias"

            [service]
            "Last Service Date" = "2024-01-10"
            "#,
        )
        .unwrap();

        assert_eq!(intake.vehicle.make, "Honda");
        assert_eq!(intake.customer.name, "Elias");
        assert_eq!(intake.service.last_service_date, "2024-01-10");
    }

    #[test]
    fn intake_toml_rejects_unknown_table() {
        let err = Intake::from_toml_str("[owner]\nName = \"x\"\n").unwrap_err();
        assert!(matches!(err, ShopError::Intake { .. }));
    }

    #[test]
    fn record_display_lists_labels() {
        let vehicle = VehicleRecord {
            make: "Honda".to_string(),
            model: "CRV".to_string(),
            ..Default::default()
        };
        let text = vehicle.to_string();
        assert!(text.starts_with("{Make: Honda, Model: CRV, Year: "));
        assert!(text.ends_with("Condition: }"));
    }

    // ── Errors ───────────────────────────────────────────────────────────────

    #[test]
    fn delegate_error_transience() {
        assert!(DelegateError::Timeout { seconds: 30 }.is_transient());
        assert!(DelegateError::Transport { reason: "refused".into() }.is_transient());
        assert!(DelegateError::Status { code: 429 }.is_transient());
        assert!(DelegateError::Status { code: 503 }.is_transient());
        assert!(DelegateError::EmptyReply.is_transient());
        assert!(!DelegateError::Status { code: 401 }.is_transient());
        assert!(!DelegateError::Malformed { reason: "no choices".into() }.is_transient());
    }

    #[test]
    fn error_stage_execution_display() {
        let err = ShopError::StageExecution {
            stage: StageId::Analysis,
            attempts: 2,
            cause: DelegateError::Status { code: 502 },
        };
        let msg = err.to_string();
        assert!(msg.contains("Analysis"));
        assert!(msg.contains("2 attempt(s)"));
        assert!(msg.contains("502"));
    }

    #[test]
    fn error_validation_display_is_the_violation_message() {
        let err = ShopError::Validation(Violation::new(
            "Year",
            ViolationKind::YearFormat,
            "Year must be exactly 4 digits",
        ));
        assert_eq!(err.to_string(), "validation failed: Year must be exactly 4 digits");
    }

    #[test]
    fn error_cancelled_display() {
        let err = ShopError::Cancelled { completed: 3 };
        assert!(err.to_string().contains("3 completed stage(s)"));
    }

    // ── RunOutcome ───────────────────────────────────────────────────────────

    #[test]
    fn outcome_into_result_distinguishes_terminal_states() {
        let ctx = || PipelineContext::new(RunId::new(), Intake::default());

        let done = RunOutcome::Done { final_text: "stored".into(), context: ctx() };
        assert_eq!(done.status(), RunStatus::Done);
        assert_eq!(done.into_result().unwrap(), "stored");

        let aborted = RunOutcome::Aborted {
            failure: StageFailure {
                stage: StageId::Scanning,
                attempts: 1,
                cause: DelegateError::EmptyReply,
            },
            context: ctx(),
        };
        assert!(matches!(aborted.status(), RunStatus::Aborted { stage: StageId::Scanning, .. }));
        assert!(matches!(
            aborted.into_result(),
            Err(ShopError::StageExecution { stage: StageId::Scanning, .. })
        ));

        let cancelled = RunOutcome::Cancelled { context: ctx() };
        assert_eq!(cancelled.status(), RunStatus::Cancelled { completed: 0 });
        assert!(matches!(cancelled.into_result(), Err(ShopError::Cancelled { completed: 0 })));
    }

    #[test]
    fn run_status_round_trips() {
        let original = RunStatus::Aborted {
            stage: StageId::Analysis,
            cause: "timed out".to_string(),
        };
        let json = serde_json::to_string(&original).unwrap();
        let decoded: RunStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(original, decoded);
    }

    #[test]
    fn run_ids_are_unique() {
        let ids: std::collections::HashSet<String> =
            (0..100).map(|_| RunId::new().to_string()).collect();
        assert_eq!(ids.len(), 100);
    }
}
