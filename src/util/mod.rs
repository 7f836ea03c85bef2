pub mod brevo;
pub mod email;
pub mod error;
pub mod google_auth;
pub mod logger;
pub mod sheets;
