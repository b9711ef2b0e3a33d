//! Default system messages, one per stage.
//!
//! A persona tells the chat service which shop role it is playing before the
//! stage prompt arrives. Any of them can be overridden in `[personas]`.

use autoshop_contracts::stage::StageId;

pub fn default_persona(stage: StageId) -> &'static str {
    match stage {
        StageId::Intake => {
            "You are an agent responsible for gathering detailed information from the \
             client about the vehicle, including the car's specifications and the \
             customer's details."
        }
        StageId::Scanning => {
            "You are responsible for scanning the vehicle using diagnostic devices, \
             collecting data, and generating a comprehensive report about the vehicle's \
             condition."
        }
        StageId::Analysis => {
            "You are an agent responsible for reviewing the diagnostic report, assessing \
             the vehicle's condition, and making decisions on necessary repairs or part \
             replacements."
        }
        StageId::QualityControl => {
            "You are responsible for inspecting the vehicle after repairs to ensure that \
             all systems are functioning correctly and verifying the repairs."
        }
        StageId::Storage => {
            "You are responsible for storing vehicle service history in a secure system \
             and ensuring that all data is backed up and accessible for future reference. \
             Additionally, you calculate the date and mileage for the next check-up."
        }
    }
}
