pub mod error;
pub mod filter;
pub mod filter_where;
pub mod types;

pub use error::FilterError;
pub use filter::Filter;
pub use types::{FilterData, FilterOp, FilterWhereInfo, SqlResult, MAX_DOCUMENTS};
