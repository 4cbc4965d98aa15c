//! Built-in column specs for the supported FHIR resource types

use super::column_spec::{ColumnSpec, DriftPolicy};

pub const PATIENT: &str = "Patient";
pub const ENCOUNTER: &str = "Encounter";
pub const OBSERVATION: &str = "Observation";
pub const MEDICATION_REQUEST: &str = "MedicationRequest";

/// Every built-in spec
pub fn all() -> Vec<ColumnSpec> {
    vec![patient(), encounter(), observation(), medication_request()]
}

/// Patient keeps every column; undeclared ones become string metas
pub fn patient() -> ColumnSpec {
    ColumnSpec::new(PATIENT)
        .with_numeric_columns(["Patient_multipleBirthInteger"])
        .with_categorical_columns([
            "Patient_gender",
            "Patient_maritalStatus_text",
            "Patient_communication_0_language_coding_0_code",
        ])
        .with_string_columns([
            "Patient_id",
            "Patient_birthDate",
            "Patient_name_0_family",
            "Patient_name_0_given_0",
            "Patient_gender_code",
            "Patient_full_display_name",
            "Patient_address_country",
        ])
        .with_rename("Patient_extension_3_valueCode", "Patient_gender_code")
        .with_rename("Patient_extension_3_valueString", "Patient_full_display_name")
        .with_rename(
            "Patient_extension_4_valueAddress_country",
            "Patient_address_country",
        )
        .with_drift(DriftPolicy::KeepAsString)
}

pub fn encounter() -> ColumnSpec {
    ColumnSpec::new(ENCOUNTER)
        .with_categorical_columns([
            "Encounter_status",
            "Encounter_class_code",
            "Encounter_type_0_coding_0_code",
            "Encounter_type_0_coding_0_display",
            "Encounter_participant_0_type_0_coding_0_code",
            "Encounter_participant_0_type_0_coding_0_display",
            "Encounter_reasonCode_0_coding_0_code",
            "Encounter_reasonCode_0_coding_0_display",
        ])
        .with_string_columns([
            "Encounter_full_id",
            "Encounter_id",
            "Encounter_participant_0_period_start",
            "Encounter_participant_0_period_end",
            "Encounter_identifier_use",
            "Encounter_class_system",
            "Encounter_subject_reference",
            "Encounter_subject_display",
            "Encounter_participant_0_individual_code",
            "Encounter_participant_0_individual_display",
            "Encounter_location_0_location_display",
            "Encounter_reasonCode_0_coding_0_system",
        ])
        .with_reference_column("Encounter_full_id")
}

pub fn observation() -> ColumnSpec {
    ColumnSpec::new(OBSERVATION)
        .with_numeric_columns(["Observation_valueQuantity_value"])
        .with_categorical_columns([
            "Observation_status",
            "Observation_category_0_coding_0_code",
            "Observation_category_0_coding_0_display",
            "Observation_code_coding_0_code",
            "Observation_code_coding_0_display",
        ])
        .with_string_columns([
            "Observation_full_id",
            "Observation_id",
            "Observation_subject_reference",
            "Observation_encounter_reference",
            "Observation_effectiveDateTime",
            "Observation_issued",
            "Observation_valueQuantity_unit",
        ])
        .with_reference_column("Observation_full_id")
}

pub fn medication_request() -> ColumnSpec {
    ColumnSpec::new(MEDICATION_REQUEST)
        .with_numeric_columns([
            "MedicationRequest_dosageInstruction_0_timing_repeat_frequency",
            "MedicationRequest_dosageInstruction_0_sequence",
            "MedicationRequest_dosageInstruction_0_timing_repeat_period",
            "MedicationRequest_dosageInstruction_0_doseAndRate_0_doseQuantity_value",
        ])
        .with_categorical_columns([
            "MedicationRequest_status",
            "MedicationRequest_intent",
            "MedicationRequest_medicationCodeableConcept_coding_0_code",
            "MedicationRequest_medicationCodeableConcept_coding_0_display",
            "MedicationRequest_requester_display",
            "MedicationRequest_dosageInstruction_0_timing_repeat_periodUnit",
            "MedicationRequest_dosageInstruction_0_asNeededBoolean",
            "MedicationRequest_dosageInstruction_0_doseAndRate_0_type_coding_0_code",
            "MedicationRequest_dosageInstruction_0_additionalInstruction_0_coding_0_display",
            "MedicationRequest_reason_0_concept_coding_0_display",
        ])
        .with_string_columns([
            "MedicationRequest_id",
            "MedicationRequest_medicationCodeableConcept_text",
            "MedicationRequest_subject_reference",
            "MedicationRequest_encounter_reference",
            "MedicationRequest_authoredOn",
            "MedicationRequest_reasonReference_0_reference",
        ])
}
