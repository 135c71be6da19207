//! Fehlertypen der Aufrufschicht

use thiserror::Error;

/// Fehler beim Parsen und Zuordnen einer Befehlszeile
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Protokollfehler: {0}")]
    Protokoll(String),

    #[error("Unbekannter Befehl: {0}")]
    UnbekannterBefehl(String),

    #[error("Ungueltige Eingabe: {0}")]
    UngueltigeEingabe(String),
}

pub type DispatchResult<T> = Result<T, DispatchError>;

impl DispatchError {
    /// Fehler-Code fuer Antwortzeilen
    pub fn fehler_code(&self) -> u32 {
        match self {
            Self::Protokoll(_) => 1000,
            Self::UnbekannterBefehl(_) => 1001,
            Self::UngueltigeEingabe(_) => 1002,
        }
    }
}
