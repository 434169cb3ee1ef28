pub mod bitcoin;
pub mod explorer;
pub mod traits;

pub use explorer::{fetch_histories, BlockExplorerClient};
pub use traits::TransactionHistorySource;
