use thiserror::Error;

#[derive(Error, Debug)]
pub enum MappingError {
    #[error("Unknown company {company_id} in {system}")]
    UnknownCompany { company_id: i64, system: String },
}
