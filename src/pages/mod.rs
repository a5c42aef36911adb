//! 页面状态: 每个页面持有自己拉取的数据和交互状态, 不共享全局状态.

pub mod new_request;
pub mod overview;

pub use new_request::{NewRequestPage, RequestFields, SubmitError};
pub use overview::ProcurementOverview;
