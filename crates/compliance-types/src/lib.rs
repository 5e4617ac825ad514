pub mod types;
pub mod validation;

pub use types::{
    ComplianceFinding, ComplianceRequest, ComplianceResponse, DocumentRole, FieldError,
    FINDING_FIELDS,
};
pub use validation::validate_request;
