pub mod decimal;
pub mod extraction;
pub mod request;
pub mod timestamp;
pub mod validation;

pub use extraction::ExtractionResult;
pub use request::{
    NewProcurementRequest, OrderLine, ProcurementRequest, RequestStatus, StatusUpdate,
    UnknownStatus,
};
pub use validation::FieldErrors;
