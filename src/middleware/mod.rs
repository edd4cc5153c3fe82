pub mod extract;
pub mod response;

pub use extract::{ApiJson, ApiPath, ApiQuery, OptionalJson};
pub use response::{ApiResponse, ApiResult};
