//! The normalized output: six dimension tables and one fact table.

use std::collections::BTreeMap;

use polars::prelude::DataFrame;

use crate::columns::{
    BLOOD_TYPE_DIM, DATE_ADMISSION_DIM, DOCTOR_DIM, FACT_TABLE, GENDER_DIM,
    INSURANCE_PROVIDER_DIM, MEDICAL_CONDITION_DIM,
};

/// Output table names in canonical order.
pub const TABLE_NAMES: [&str; 7] = [
    BLOOD_TYPE_DIM.table,
    MEDICAL_CONDITION_DIM.table,
    DATE_ADMISSION_DIM.table,
    DOCTOR_DIM.table,
    INSURANCE_PROVIDER_DIM.table,
    GENDER_DIM.table,
    FACT_TABLE,
];

/// A star schema built from one admissions table.
#[derive(Debug, Clone)]
pub struct StarSchema {
    pub blood_type_dim: DataFrame,
    pub medical_condition_dim: DataFrame,
    pub date_admission_dim: DataFrame,
    pub doctor_dim: DataFrame,
    pub insurance_provider_dim: DataFrame,
    pub gender_dim: DataFrame,
    pub fact_table: DataFrame,
}

impl StarSchema {
    /// All seven tables with their output names, dimensions first.
    pub fn tables(&self) -> [(&'static str, &DataFrame); 7] {
        [
            (TABLE_NAMES[0], &self.blood_type_dim),
            (TABLE_NAMES[1], &self.medical_condition_dim),
            (TABLE_NAMES[2], &self.date_admission_dim),
            (TABLE_NAMES[3], &self.doctor_dim),
            (TABLE_NAMES[4], &self.insurance_provider_dim),
            (TABLE_NAMES[5], &self.gender_dim),
            (TABLE_NAMES[6], &self.fact_table),
        ]
    }

    /// Looks up a table by output name.
    pub fn get(&self, name: &str) -> Option<&DataFrame> {
        self.tables()
            .into_iter()
            .find(|(table, _)| *table == name)
            .map(|(_, frame)| frame)
    }

    /// Number of admissions after duplicate removal.
    pub fn fact_row_count(&self) -> usize {
        self.fact_table.height()
    }

    /// Converts the schema into a name → table mapping.
    pub fn into_map(self) -> BTreeMap<String, DataFrame> {
        let Self {
            blood_type_dim,
            medical_condition_dim,
            date_admission_dim,
            doctor_dim,
            insurance_provider_dim,
            gender_dim,
            fact_table,
        } = self;
        TABLE_NAMES
            .iter()
            .map(ToString::to_string)
            .zip([
                blood_type_dim,
                medical_condition_dim,
                date_admission_dim,
                doctor_dim,
                insurance_provider_dim,
                gender_dim,
                fact_table,
            ])
            .collect()
    }
}
