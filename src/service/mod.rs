pub mod catalog;
pub mod dashboard;
pub mod intake;
pub mod order_lines;
pub mod request_view;

pub use dashboard::DashboardSummary;
pub use intake::{DocumentIntake, IntakeError, UploadOrigin};
pub use order_lines::{LineEdit, OrderLineEditor, OrderLineError, OrderLineSnapshot};
pub use request_view::{view, CategoryFilter, SortDirection, SortField, StatusFilter, ViewParams};
