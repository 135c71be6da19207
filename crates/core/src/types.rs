//! Identitaeten fuer Huster
//!
//! Eine Identitaet ist ein undurchsichtiger, extern vergebener String
//! (z.B. ein kryptografischer Principal). Das Newtype-Pattern verhindert
//! Verwechslungen mit E-Mail-Adressen oder Benutzernamen zur Compilezeit.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Eindeutige, extern vergebene Benutzer-Identitaet
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identitaet(String);

impl Identitaet {
    /// Umhuellt einen vorhandenen Identitaets-String
    pub fn neu(wert: impl Into<String>) -> Self {
        Self(wert.into())
    }

    /// Gibt den inneren String zurueck
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Identitaet {
    fn from(wert: &str) -> Self {
        Self(wert.to_string())
    }
}

impl From<String> for Identitaet {
    fn from(wert: String) -> Self {
        Self(wert)
    }
}

impl std::fmt::Display for Identitaet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Quelle fuer frische Identitaeten
///
/// Die Eindeutigkeit wird von der Implementierung garantiert, nicht vom Store.
pub trait IdentitaetsGeber: Send + Sync {
    fn naechste(&self) -> Identitaet;
}

/// Standard-Quelle: zufaellige UUID v4
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdentitaeten;

impl IdentitaetsGeber for UuidIdentitaeten {
    fn naechste(&self) -> Identitaet {
        Identitaet(Uuid::new_v4().to_string())
    }
}
