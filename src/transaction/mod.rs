//! Transaction submission and recent-activity listing.
//!
//! The dashboard pipeline only reads from the transaction store; this
//! module is the write side used by the mobile client's transaction
//! form, plus the small "recent activity" feed on the home screen.

mod core;
mod create_endpoint;
mod recent_endpoint;

pub use self::core::{NewTransaction, Transaction, create_transaction};
pub use create_endpoint::create_transaction_endpoint;
pub use recent_endpoint::recent_transactions_endpoint;
