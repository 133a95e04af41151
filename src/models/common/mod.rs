mod enums;
pub mod import;
pub mod pagination;
pub mod response;

pub(crate) use enums::string_enum;
pub use import::*;
pub use pagination::*;
pub use response::*;
