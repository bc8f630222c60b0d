//! Column and table names of the admissions input and the star-schema output.
//!
//! Every dimension is described by a [`DimensionSpec`]. The order of
//! [`DIMENSIONS`] is the canonical output order and the order in which the
//! fact table carries its foreign keys.

/// Input column: patient name.
pub const NAME: &str = "Name";
/// Input column: patient age.
pub const AGE: &str = "Age";
/// Input column: billed amount for the admission.
pub const BILLING_AMOUNT: &str = "Billing Amount";
/// Input column: blood type.
pub const BLOOD_TYPE: &str = "Blood Type";
/// Input column: medical condition.
pub const MEDICAL_CONDITION: &str = "Medical Condition";
/// Input column: admission date.
pub const DATE_OF_ADMISSION: &str = "Date of Admission";
/// Input column: attending doctor.
pub const DOCTOR: &str = "Doctor";
/// Input column: insurance provider.
pub const INSURANCE_PROVIDER: &str = "Insurance Provider";
/// Input column: gender.
pub const GENDER: &str = "Gender";

/// Columns the input table must carry, in the order they are checked.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    NAME,
    AGE,
    BILLING_AMOUNT,
    BLOOD_TYPE,
    MEDICAL_CONDITION,
    DATE_OF_ADMISSION,
    DOCTOR,
    INSURANCE_PROVIDER,
    GENDER,
];

pub const FACT_TABLE: &str = "fact_table";
pub const PATIENT_ID: &str = "patient_id";

/// Measure columns copied from the input into the fact table: (input, output).
pub const FACT_MEASURES: [(&str, &str); 3] = [
    (NAME, "name"),
    (AGE, "age"),
    (BILLING_AMOUNT, "billing_amount"),
];

pub const DATE_ADMISSION_DAY: &str = "date_admission_day";
pub const DATE_ADMISSION_MONTH: &str = "date_admission_month";
pub const DATE_ADMISSION_YEAR: &str = "date_admission_year";

/// How a dimension's values are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DimensionKind {
    /// Distinct text values of the source column.
    Categorical,
    /// Distinct calendar dates, decomposed into day, month and year.
    Date,
}

/// Describes one dimension table of the star schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DimensionSpec {
    /// Output table name, e.g. `blood_type_dim`.
    pub table: &'static str,
    /// Input column the dimension is drawn from.
    pub source_column: &'static str,
    /// Column holding the attribute value in the dimension table.
    pub value_column: &'static str,
    /// Surrogate key column, shared by the dimension and the fact table.
    pub id_column: &'static str,
    pub kind: DimensionKind,
}

impl DimensionSpec {
    /// Columns of the dimension table in output order.
    pub fn columns(&self) -> Vec<&'static str> {
        match self.kind {
            DimensionKind::Categorical => vec![self.id_column, self.value_column],
            DimensionKind::Date => vec![
                self.id_column,
                self.value_column,
                DATE_ADMISSION_DAY,
                DATE_ADMISSION_MONTH,
                DATE_ADMISSION_YEAR,
            ],
        }
    }
}

pub const BLOOD_TYPE_DIM: DimensionSpec = DimensionSpec {
    table: "blood_type_dim",
    source_column: BLOOD_TYPE,
    value_column: "blood_type",
    id_column: "blood_type_id",
    kind: DimensionKind::Categorical,
};

pub const MEDICAL_CONDITION_DIM: DimensionSpec = DimensionSpec {
    table: "medical_condition_dim",
    source_column: MEDICAL_CONDITION,
    value_column: "medical_condition",
    id_column: "medical_condition_id",
    kind: DimensionKind::Categorical,
};

pub const DATE_ADMISSION_DIM: DimensionSpec = DimensionSpec {
    table: "date_admission_dim",
    source_column: DATE_OF_ADMISSION,
    value_column: "date_admission",
    id_column: "date_admission_id",
    kind: DimensionKind::Date,
};

pub const DOCTOR_DIM: DimensionSpec = DimensionSpec {
    table: "doctor_dim",
    source_column: DOCTOR,
    value_column: "doctor_name",
    id_column: "doctor_id",
    kind: DimensionKind::Categorical,
};

pub const INSURANCE_PROVIDER_DIM: DimensionSpec = DimensionSpec {
    table: "insurance_provider_dim",
    source_column: INSURANCE_PROVIDER,
    value_column: "insurance_provider",
    id_column: "insurance_provider_id",
    kind: DimensionKind::Categorical,
};

pub const GENDER_DIM: DimensionSpec = DimensionSpec {
    table: "gender_dim",
    source_column: GENDER,
    value_column: "gender",
    id_column: "gender_id",
    kind: DimensionKind::Categorical,
};

/// All dimensions in canonical order.
pub const DIMENSIONS: [DimensionSpec; 6] = [
    BLOOD_TYPE_DIM,
    MEDICAL_CONDITION_DIM,
    DATE_ADMISSION_DIM,
    DOCTOR_DIM,
    INSURANCE_PROVIDER_DIM,
    GENDER_DIM,
];

/// Looks up a dimension by its output table name.
pub fn dimension_by_table(table: &str) -> Option<&'static DimensionSpec> {
    DIMENSIONS.iter().find(|spec| spec.table == table)
}

/// Columns of the fact table in output order.
pub fn fact_columns() -> Vec<&'static str> {
    let mut columns = vec![PATIENT_ID];
    columns.extend(FACT_MEASURES.iter().map(|(_, output)| *output));
    columns.extend(DIMENSIONS.iter().map(|spec| spec.id_column));
    columns
}
