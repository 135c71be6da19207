//! Credential-Store fuer Huster
//!
//! Haelt alle Benutzer-Records im Speicher: Identitaet -> Record, dazu ein
//! eindeutiger E-Mail-Index und die Einfuegereihenfolge fuer Auflistungen.
//! Der Store selbst ist nicht synchronisiert; gemeinsamer Zugriff laeuft
//! ueber [`crate::AuthService`].

use std::{collections::HashMap, sync::Arc};

use serde::Serialize;

use huster_core::{Identitaet, IdentitaetsGeber, UuidIdentitaeten};

use crate::{
    error::{AuthError, AuthResult},
    password::{attrappe_ableiten, passwort_hashen, passwort_verifizieren},
    reset_token::{reset_token_generieren, token_gleich, MIN_TOKEN_BYTES},
};

/// Laufzeit-Einstellungen des Stores
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthKonfiguration {
    /// Minimale Passwortlaenge in Zeichen (0 = keine Pruefung)
    pub passwort_mindestlaenge: usize,
    /// Zufallsbytes pro Reset-Token (mindestens 16)
    pub token_bytes: usize,
}

impl Default for AuthKonfiguration {
    fn default() -> Self {
        Self {
            passwort_mindestlaenge: 0,
            token_bytes: MIN_TOKEN_BYTES,
        }
    }
}

/// Ein gespeicherter Benutzer
#[derive(Clone)]
pub struct BenutzerRecord {
    pub identitaet: Identitaet,
    pub username: String,
    pub email: String,
    pub passwort_hash: String,
    pub session_aktiv: bool,
    /// Nur zwischen Reset-Anforderung und erfolgreicher Bestaetigung gesetzt
    pub reset_token: Option<String>,
}

impl BenutzerRecord {
    pub fn info(&self) -> BenutzerInfo {
        BenutzerInfo {
            username: self.username.clone(),
            email: self.email.clone(),
        }
    }
}

// Hash und Token bleiben aus Debug-Ausgaben heraus
impl std::fmt::Debug for BenutzerRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenutzerRecord")
            .field("identitaet", &self.identitaet)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("session_aktiv", &self.session_aktiv)
            .field("reset_ausstehend", &self.reset_token.is_some())
            .finish_non_exhaustive()
    }
}

/// Oeffentliche Profildaten eines Benutzers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenutzerInfo {
    pub username: String,
    pub email: String,
}

/// In-Memory Credential-Store
pub struct CredentialStore {
    benutzer: HashMap<Identitaet, BenutzerRecord>,
    /// email -> identitaet, erzwingt Eindeutigkeit der E-Mail
    email_index: HashMap<String, Identitaet>,
    reihenfolge: Vec<Identitaet>,
    identitaeten: Arc<dyn IdentitaetsGeber>,
    konfiguration: AuthKonfiguration,
}

impl Default for CredentialStore {
    fn default() -> Self {
        Self::neu(Arc::new(UuidIdentitaeten), AuthKonfiguration::default())
    }
}

impl CredentialStore {
    /// Erstellt einen leeren Store mit der gegebenen Identitaetsquelle
    pub fn neu(identitaeten: Arc<dyn IdentitaetsGeber>, konfiguration: AuthKonfiguration) -> Self {
        Self {
            benutzer: HashMap::new(),
            email_index: HashMap::new(),
            reihenfolge: Vec::new(),
            identitaeten,
            konfiguration,
        }
    }

    pub fn konfiguration(&self) -> AuthKonfiguration {
        self.konfiguration
    }

    /// Registriert einen neuen Benutzer
    ///
    /// Die Session ist danach aktiv. Bei vergebener E-Mail bleibt der Store
    /// unveraendert.
    pub fn registrieren(
        &mut self,
        username: &str,
        email: &str,
        passwort: &str,
    ) -> AuthResult<Identitaet> {
        if self.email_index.contains_key(email) {
            return Err(AuthError::EmailVergeben(email.to_string()));
        }
        self.passwort_pruefen_policy(passwort)?;

        let passwort_hash = passwort_hashen(passwort)?;
        let identitaet = self.identitaeten.naechste();
        if self.benutzer.contains_key(&identitaet) {
            return Err(AuthError::intern(format!(
                "Identitaet doppelt vergeben: {identitaet}"
            )));
        }

        let record = BenutzerRecord {
            identitaet: identitaet.clone(),
            username: username.to_string(),
            email: email.to_string(),
            passwort_hash,
            session_aktiv: true,
            reset_token: None,
        };

        self.email_index.insert(email.to_string(), identitaet.clone());
        self.reihenfolge.push(identitaet.clone());
        self.benutzer.insert(identitaet.clone(), record);

        tracing::info!(
            identitaet = %identitaet,
            username = %username,
            "Neuer Benutzer registriert"
        );

        Ok(identitaet)
    }

    /// Markiert die Session als aktiv
    ///
    /// Die Identitaet gilt als Nachweis: die Authentifizierung des Aufrufers
    /// liegt beim Hosting-Umfeld, nicht beim Store.
    pub fn anmelden(&mut self, identitaet: &Identitaet) -> AuthResult<()> {
        let record = self.record_mut(identitaet)?;
        record.session_aktiv = true;
        tracing::info!(identitaet = %identitaet, username = %record.username, "Benutzer angemeldet");
        Ok(())
    }

    /// Markiert die Session als inaktiv
    pub fn abmelden(&mut self, identitaet: &Identitaet) -> AuthResult<()> {
        let record = self.record_mut(identitaet)?;
        record.session_aktiv = false;
        tracing::info!(identitaet = %identitaet, username = %record.username, "Benutzer abgemeldet");
        Ok(())
    }

    /// `false` auch fuer unbekannte Identitaeten
    pub fn ist_angemeldet(&self, identitaet: &Identitaet) -> bool {
        self.benutzer
            .get(identitaet)
            .is_some_and(|r| r.session_aktiv)
    }

    pub fn benutzer_info(&self, identitaet: &Identitaet) -> Option<BenutzerInfo> {
        self.benutzer.get(identitaet).map(BenutzerRecord::info)
    }

    pub fn nach_email(&self, email: &str) -> Option<&BenutzerRecord> {
        self.email_index
            .get(email)
            .and_then(|id| self.benutzer.get(id))
    }

    /// Stellt einen neuen Reset-Token aus und gibt ihn zurueck
    ///
    /// Ein noch offener Token wird ersetzt. Die Session bleibt unberuehrt.
    pub fn reset_anfordern(&mut self, email: &str) -> AuthResult<String> {
        let identitaet = self
            .email_index
            .get(email)
            .cloned()
            .ok_or_else(|| AuthError::BenutzerNichtGefunden(email.to_string()))?;

        let token = reset_token_generieren(self.konfiguration.token_bytes)?;
        let record = self.record_mut(&identitaet)?;
        record.reset_token = Some(token.clone());

        tracing::info!(identitaet = %identitaet, "Passwort-Reset angefordert");
        Ok(token)
    }

    /// Setzt das Passwort zurueck, wenn E-Mail und Token passen
    ///
    /// Der Token wird dabei verbraucht. Jeder Fehlschlag laesst den Record
    /// unveraendert und liefert `ResetUngueltig`.
    pub fn reset_bestaetigen(
        &mut self,
        email: &str,
        token: &str,
        neues_passwort: &str,
    ) -> AuthResult<()> {
        let identitaet = self
            .email_index
            .get(email)
            .cloned()
            .ok_or(AuthError::ResetUngueltig)?;

        let passt = self
            .benutzer
            .get(&identitaet)
            .and_then(|r| r.reset_token.as_deref())
            .is_some_and(|gespeichert| token_gleich(gespeichert, token));
        if !passt {
            tracing::warn!(identitaet = %identitaet, "Ungueltiger Reset-Versuch");
            return Err(AuthError::ResetUngueltig);
        }

        self.passwort_pruefen_policy(neues_passwort)?;
        let neuer_hash = passwort_hashen(neues_passwort)?;

        let record = self.record_mut(&identitaet)?;
        record.passwort_hash = neuer_hash;
        record.reset_token = None;

        tracing::info!(identitaet = %identitaet, "Passwort zurueckgesetzt");
        Ok(())
    }

    /// Prueft ein Passwort gegen den gespeicherten Hash
    pub fn passwort_pruefen(&self, email: &str, passwort: &str) -> AuthResult<bool> {
        match self.nach_email(email) {
            Some(record) => passwort_verifizieren(passwort, &record.passwort_hash),
            None => {
                attrappe_ableiten(passwort);
                Err(AuthError::BenutzerNichtGefunden(email.to_string()))
            }
        }
    }

    /// Alle Records in Registrierungsreihenfolge
    pub fn benutzer_auflisten(&self) -> impl Iterator<Item = &BenutzerRecord> {
        self.reihenfolge
            .iter()
            .filter_map(|id| self.benutzer.get(id))
    }

    pub fn anzahl(&self) -> usize {
        self.benutzer.len()
    }

    pub fn ist_leer(&self) -> bool {
        self.benutzer.is_empty()
    }

    fn record_mut(&mut self, identitaet: &Identitaet) -> AuthResult<&mut BenutzerRecord> {
        self.benutzer
            .get_mut(identitaet)
            .ok_or_else(|| AuthError::BenutzerNichtGefunden(identitaet.to_string()))
    }

    fn passwort_pruefen_policy(&self, passwort: &str) -> AuthResult<()> {
        let minimum = self.konfiguration.passwort_mindestlaenge;
        if passwort.chars().count() < minimum {
            return Err(AuthError::PasswortZuKurz(minimum));
        }
        Ok(())
    }
}
