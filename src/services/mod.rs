pub mod accounts;
pub mod profiles;

pub use accounts::AccountService;
pub use profiles::ProfileService;
