pub mod boundary;
pub mod changelog;
pub mod commit;
pub mod pull_request;
pub mod repository;

pub use boundary::*;
pub use changelog::*;
pub use commit::*;
pub use pull_request::*;
pub use repository::*;
