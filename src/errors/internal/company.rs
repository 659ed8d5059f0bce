use thiserror::Error;

#[derive(Error, Debug)]
pub enum CompanyError {
    #[error("Company {external_id} already exists in {system}")]
    DuplicateCompany { external_id: i64, system: String },
}
