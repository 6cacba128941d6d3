//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept the injected `&dyn BackendClient` as the first argument. Shared
//! row plumbing lives in [`crud`].

pub mod booking_repo;
pub mod community_post_repo;
pub mod crud;
pub mod dashboard_repo;
pub mod invoice_repo;
pub mod task_repo;
pub mod transaction_repo;

pub use booking_repo::BookingRepo;
pub use community_post_repo::CommunityPostRepo;
pub use dashboard_repo::DashboardRepo;
pub use invoice_repo::InvoiceRepo;
pub use task_repo::TaskRepo;
pub use transaction_repo::TransactionRepo;
