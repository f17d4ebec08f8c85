pub mod content;
pub mod request;
pub mod response;

pub use content::*;
pub use request::*;
pub use response::*;
