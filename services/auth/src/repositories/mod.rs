//! Store-backed repositories of the authentication service

pub mod credential;
pub mod login_log;

pub use credential::CredentialRepository;
pub use login_log::LoginLogRepository;
