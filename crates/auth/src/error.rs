//! Fehlertypen fuer den Auth-Service

use thiserror::Error;

/// Alle moeglichen Fehler im Credential-Store
#[derive(Debug, Error)]
pub enum AuthError {
    // --- Benutzerverwaltung ---
    #[error("E-Mail bereits registriert: {0}")]
    EmailVergeben(String),

    #[error("Benutzer nicht gefunden: {0}")]
    BenutzerNichtGefunden(String),

    // --- Passwort ---
    #[error("Passwort zu kurz (mindestens {0} Zeichen)")]
    PasswortZuKurz(usize),

    #[error("Passwort-Hashing fehlgeschlagen: {0}")]
    PasswortHashing(String),

    // --- Reset ---
    #[error("Reset-Versuch ungueltig")]
    ResetUngueltig,

    // --- Intern ---
    #[error("Interner Fehler: {0}")]
    Intern(String),
}

impl AuthError {
    pub fn intern(msg: impl Into<String>) -> Self {
        Self::Intern(msg.into())
    }
}

/// Result-Alias fuer den Auth-Service
pub type AuthResult<T> = Result<T, AuthError>;
