pub mod collection;
pub mod error;
pub mod filter;
pub mod filter_order;
pub mod filter_where;
pub mod types;

pub use collection::{Collection, Column};
pub use error::FilterError;
pub use filter::Filter;
pub use types::*;
