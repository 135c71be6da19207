//! Auth-Service fuer Huster
//!
//! Einstiegspunkt fuer die Aufrufschicht. Serialisiert alle Operationen ueber
//! einen Mutex auf dem [`CredentialStore`] und bildet Fehler auf die totale
//! Aufrufoberflaeche ab (`bool` bzw. `Option`). Der Fehlergrund landet im Log.

use std::sync::Arc;

use parking_lot::Mutex;

use huster_core::Identitaet;

use crate::{
    benachrichtigung::{ProtokollBenachrichtigung, ResetBenachrichtigung},
    error::AuthError,
    store::{BenutzerInfo, CredentialStore},
};

/// Auth-Service – zentraler Einstiegspunkt fuer alle Credential-Vorgaenge
pub struct AuthService {
    store: Mutex<CredentialStore>,
    benachrichtigung: Arc<dyn ResetBenachrichtigung>,
}

impl Default for AuthService {
    fn default() -> Self {
        Self::neu(CredentialStore::default(), Arc::new(ProtokollBenachrichtigung))
    }
}

impl AuthService {
    /// Erstellt einen neuen AuthService um einen vorhandenen Store
    pub fn neu(store: CredentialStore, benachrichtigung: Arc<dyn ResetBenachrichtigung>) -> Self {
        Self {
            store: Mutex::new(store),
            benachrichtigung,
        }
    }

    /// Registriert einen neuen Benutzer (Registrierung impliziert Login)
    pub fn registrieren(&self, username: &str, email: &str, passwort: &str) -> bool {
        self.registrieren_mit_identitaet(username, email, passwort)
            .is_some()
    }

    /// Wie [`Self::registrieren`], gibt aber die vergebene Identitaet zurueck
    pub fn registrieren_mit_identitaet(
        &self,
        username: &str,
        email: &str,
        passwort: &str,
    ) -> Option<Identitaet> {
        match self.store.lock().registrieren(username, email, passwort) {
            Ok(identitaet) => Some(identitaet),
            Err(e) => {
                protokolliere("registrieren", &e);
                None
            }
        }
    }

    /// Markiert die Session der Identitaet als aktiv
    ///
    /// Prueft kein Passwort: die Identitaet des Aufrufers wird von der
    /// Aufrufschicht authentifiziert.
    pub fn anmelden(&self, identitaet: &Identitaet) -> bool {
        ergebnis("anmelden", self.store.lock().anmelden(identitaet))
    }

    pub fn abmelden(&self, identitaet: &Identitaet) -> bool {
        ergebnis("abmelden", self.store.lock().abmelden(identitaet))
    }

    /// `false` sowohl fuer abgemeldete als auch fuer unbekannte Identitaeten
    pub fn ist_angemeldet(&self, identitaet: &Identitaet) -> bool {
        self.store.lock().ist_angemeldet(identitaet)
    }

    pub fn benutzer_info(&self, identitaet: &Identitaet) -> Option<BenutzerInfo> {
        let info = self.store.lock().benutzer_info(identitaet);
        if info.is_none() {
            tracing::debug!(identitaet = %identitaet, "Benutzer nicht gefunden");
        }
        info
    }

    /// Stellt einen Reset-Token aus und reicht ihn an die Benachrichtigung weiter
    pub fn passwort_reset_anfordern(&self, email: &str) -> bool {
        // Lock vor der Zustellung freigeben
        let token = self.store.lock().reset_anfordern(email);
        match token {
            Ok(token) => {
                self.benachrichtigung.reset_token_ausgestellt(email, &token);
                true
            }
            Err(e) => {
                protokolliere("passwort_reset_anfordern", &e);
                false
            }
        }
    }

    pub fn passwort_reset_bestaetigen(&self, email: &str, token: &str, neues_passwort: &str) -> bool {
        ergebnis(
            "passwort_reset_bestaetigen",
            self.store
                .lock()
                .reset_bestaetigen(email, token, neues_passwort),
        )
    }

    /// Prueft ein Passwort gegen den gespeicherten Credential-Hash
    pub fn passwort_pruefen(&self, email: &str, passwort: &str) -> bool {
        match self.store.lock().passwort_pruefen(email, passwort) {
            Ok(true) => true,
            Ok(false) => {
                tracing::warn!(email = %email, "Fehlgeschlagene Passwortpruefung");
                false
            }
            Err(e) => {
                protokolliere("passwort_pruefen", &e);
                false
            }
        }
    }

    pub fn anzahl_benutzer(&self) -> usize {
        self.store.lock().anzahl()
    }
}

fn ergebnis(operation: &str, ergebnis: Result<(), AuthError>) -> bool {
    match ergebnis {
        Ok(()) => true,
        Err(e) => {
            protokolliere(operation, &e);
            false
        }
    }
}

fn protokolliere(operation: &str, fehler: &AuthError) {
    match fehler {
        AuthError::PasswortHashing(_) | AuthError::Intern(_) => {
            tracing::error!(operation, fehler = %fehler, "Operation fehlgeschlagen");
        }
        _ => tracing::debug!(operation, fehler = %fehler, "Operation abgelehnt"),
    }
}
