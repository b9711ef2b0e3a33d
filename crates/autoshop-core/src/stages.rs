//! The five stage descriptors and their prompt builders.
//!
//! Each builder is a pure function of the context. Stages after Scanning
//! quote the previous stage's result verbatim; a missing prior result means
//! the ordering invariant was broken and is reported as a state machine
//! error rather than papered over with an empty string.

use autoshop_contracts::{
    context::PipelineContext,
    error::{ShopError, ShopResult},
    stage::StageId,
};

/// Builds a stage's prompt from the current context.
pub type PromptBuilder = fn(&PipelineContext) -> ShopResult<String>;

/// A named stage and the way its prompt is built.
///
/// The delegate each stage calls is not part of the descriptor; it is
/// injected into the `Pipeline` at construction time.
#[derive(Clone, Copy)]
pub struct StageDescriptor {
    pub stage: StageId,
    pub build_prompt: PromptBuilder,
}

/// Process-wide stage list, in execution order.
pub static STAGES: [StageDescriptor; 5] = [
    StageDescriptor {
        stage: StageId::Intake,
        build_prompt: intake_prompt,
    },
    StageDescriptor {
        stage: StageId::Scanning,
        build_prompt: scanning_prompt,
    },
    StageDescriptor {
        stage: StageId::Analysis,
        build_prompt: analysis_prompt,
    },
    StageDescriptor {
        stage: StageId::QualityControl,
        build_prompt: quality_control_prompt,
    },
    StageDescriptor {
        stage: StageId::Storage,
        build_prompt: storage_prompt,
    },
];

/// The descriptor for `stage`.
pub fn descriptor(stage: StageId) -> &'static StageDescriptor {
    &STAGES[stage.index()]
}

fn prior_result(context: &PipelineContext, needed_by: StageId, prior: StageId) -> ShopResult<&str> {
    context.result_of(prior).ok_or_else(|| ShopError::StateMachine {
        reason: format!(
            "prompt for stage '{}' needs the '{}' result, which is not in the context",
            needed_by, prior
        ),
    })
}

fn intake_prompt(context: &PipelineContext) -> ShopResult<String> {
    let intake = context.intake();
    Ok(format!(
        "Please collect details about the vehicle and client, including the car's \
         specifications, service history, and customer's details. \
         Vehicle: {}, Customer: {}, Service History: {}",
        intake.vehicle, intake.customer, intake.service
    ))
}

fn scanning_prompt(context: &PipelineContext) -> ShopResult<String> {
    Ok(format!(
        "Scan the vehicle's system for issues and generate a detailed diagnostic report. \
         Vehicle: {}",
        context.intake().vehicle
    ))
}

fn analysis_prompt(context: &PipelineContext) -> ShopResult<String> {
    let report = prior_result(context, StageId::Analysis, StageId::Scanning)?;
    Ok(format!(
        "Review the diagnostic report and make decisions on necessary repairs or \
         replacements. Diagnostic Report: {}",
        report
    ))
}

fn quality_control_prompt(context: &PipelineContext) -> ShopResult<String> {
    let analysis = prior_result(context, StageId::QualityControl, StageId::Analysis)?;
    Ok(format!(
        "Inspect the vehicle after repairs and ensure all systems are functioning \
         properly. Report the final status after analysis: {}",
        analysis
    ))
}

fn storage_prompt(context: &PipelineContext) -> ShopResult<String> {
    let qc = prior_result(context, StageId::Storage, StageId::QualityControl)?;
    let intake = context.intake();
    Ok(format!(
        "Store the service history and calculate the next check-up date and mileage. \
         Vehicle: {}, Customer: {}, Service History: {}, Quality Control Report: {}",
        intake.vehicle, intake.customer, intake.service, qc
    ))
}
