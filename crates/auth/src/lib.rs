//! huster-auth – Credential-Store fuer Huster
//!
//! Dieses Crate implementiert:
//! - Passwort-Hashing mit PBKDF2-HMAC-SHA256 (`pbkdf2_sha256$salt$schluessel`)
//! - Reset-Tokens (URL-sicheres Base64, Vergleich in konstanter Zeit)
//! - CredentialStore (Benutzer-Records mit E-Mail-Index)
//! - AuthService (Registrierung, Login, Logout, Passwort-Reset)

pub mod benachrichtigung;
pub mod error;
pub mod password;
pub mod reset_token;
pub mod service;
pub mod store;

// Bequeme Re-Exporte
pub use benachrichtigung::{ProtokollBenachrichtigung, ResetBenachrichtigung, SammelBenachrichtigung};
pub use error::{AuthError, AuthResult};
pub use password::{passwort_hashen, passwort_verifizieren};
pub use service::AuthService;
pub use store::{AuthKonfiguration, BenutzerInfo, BenutzerRecord, CredentialStore};
