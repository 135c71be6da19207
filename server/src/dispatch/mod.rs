//! Aufrufschicht: Befehlszeile -> AuthService -> JSON-Antwort
//!
//! Befehle:
//! - `register username= email= password=`
//! - `login identity=` / `logout identity=` / `is_logged_in identity=`
//! - `get_user_info identity=`
//! - `request_password_reset email=`
//! - `confirm_password_reset email= token= new_password=`
//! - `verify_password email= password=`
//! - `quit`

pub mod parser;

use std::sync::Arc;

use serde::Serialize;

use huster_auth::{AuthService, BenutzerInfo};
use huster_core::Identitaet;

use crate::error::{DispatchError, DispatchResult};
use parser::{parse_line, ParsedCommand};

/// Ein typisierter Aufruf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Befehl {
    Registrieren {
        username: String,
        email: String,
        passwort: String,
    },
    Anmelden {
        identitaet: Identitaet,
    },
    Abmelden {
        identitaet: Identitaet,
    },
    IstAngemeldet {
        identitaet: Identitaet,
    },
    BenutzerInfo {
        identitaet: Identitaet,
    },
    ResetAnfordern {
        email: String,
    },
    ResetBestaetigen {
        email: String,
        token: String,
        neues_passwort: String,
    },
    PasswortPruefen {
        email: String,
        passwort: String,
    },
    Beenden,
}

impl TryFrom<&ParsedCommand> for Befehl {
    type Error = DispatchError;

    fn try_from(cmd: &ParsedCommand) -> DispatchResult<Self> {
        let text = |key: &str| cmd.required_param(key).map(String::from);
        let identitaet = || cmd.required_param("identity").map(Identitaet::from);

        match cmd.name.as_str() {
            "register" => Ok(Self::Registrieren {
                username: text("username")?,
                email: text("email")?,
                passwort: text("password")?,
            }),
            "login" => Ok(Self::Anmelden {
                identitaet: identitaet()?,
            }),
            "logout" => Ok(Self::Abmelden {
                identitaet: identitaet()?,
            }),
            "is_logged_in" => Ok(Self::IstAngemeldet {
                identitaet: identitaet()?,
            }),
            "get_user_info" => Ok(Self::BenutzerInfo {
                identitaet: identitaet()?,
            }),
            "request_password_reset" => Ok(Self::ResetAnfordern {
                email: text("email")?,
            }),
            "confirm_password_reset" => Ok(Self::ResetBestaetigen {
                email: text("email")?,
                token: text("token")?,
                neues_passwort: text("new_password")?,
            }),
            "verify_password" => Ok(Self::PasswortPruefen {
                email: text("email")?,
                passwort: text("password")?,
            }),
            "quit" => Ok(Self::Beenden),
            andere => Err(DispatchError::UnbekannterBefehl(andere.to_string())),
        }
    }
}

/// Antwort auf einen Aufruf, eine JSON-Zeile pro Befehl
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "antwort", rename_all = "snake_case")]
pub enum Antwort {
    Bool {
        ergebnis: bool,
    },
    Registriert {
        ergebnis: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        identitaet: Option<Identitaet>,
    },
    Benutzer {
        benutzer: Option<BenutzerInfo>,
    },
    Fehler {
        code: u32,
        nachricht: String,
    },
    Beendet,
}

impl Antwort {
    /// Serialisiert die Antwort als einzelne Zeile inklusive Zeilenumbruch
    pub fn als_zeile(&self) -> String {
        match serde_json::to_string(self) {
            Ok(json) => format!("{json}\n"),
            Err(e) => {
                tracing::error!(fehler = %e, "Antwort nicht serialisierbar");
                "{\"antwort\":\"fehler\",\"code\":5000,\"nachricht\":\"intern\"}\n".to_string()
            }
        }
    }
}

impl From<DispatchError> for Antwort {
    fn from(e: DispatchError) -> Self {
        Self::Fehler {
            code: e.fehler_code(),
            nachricht: e.to_string(),
        }
    }
}

/// Bildet Aufrufe auf den AuthService ab
#[derive(Clone)]
pub struct Dispatcher {
    service: Arc<AuthService>,
}

impl Dispatcher {
    pub fn neu(service: Arc<AuthService>) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &AuthService {
        &self.service
    }

    /// Parst, konvertiert und fuehrt eine Befehlszeile aus
    pub fn zeile_verarbeiten(&self, zeile: &str) -> Antwort {
        let befehl = parse_line(zeile).and_then(|cmd| Befehl::try_from(&cmd));
        match befehl {
            Ok(befehl) => self.ausfuehren(&befehl),
            Err(e) => {
                tracing::debug!(fehler = %e, "Befehlszeile abgelehnt");
                e.into()
            }
        }
    }

    pub fn ausfuehren(&self, befehl: &Befehl) -> Antwort {
        let service = &self.service;
        match befehl {
            Befehl::Registrieren {
                username,
                email,
                passwort,
            } => {
                let identitaet = service.registrieren_mit_identitaet(username, email, passwort);
                Antwort::Registriert {
                    ergebnis: identitaet.is_some(),
                    identitaet,
                }
            }
            Befehl::Anmelden { identitaet } => Antwort::Bool {
                ergebnis: service.anmelden(identitaet),
            },
            Befehl::Abmelden { identitaet } => Antwort::Bool {
                ergebnis: service.abmelden(identitaet),
            },
            Befehl::IstAngemeldet { identitaet } => Antwort::Bool {
                ergebnis: service.ist_angemeldet(identitaet),
            },
            Befehl::BenutzerInfo { identitaet } => Antwort::Benutzer {
                benutzer: service.benutzer_info(identitaet),
            },
            Befehl::ResetAnfordern { email } => Antwort::Bool {
                ergebnis: service.passwort_reset_anfordern(email),
            },
            Befehl::ResetBestaetigen {
                email,
                token,
                neues_passwort,
            } => Antwort::Bool {
                ergebnis: service.passwort_reset_bestaetigen(email, token, neues_passwort),
            },
            Befehl::PasswortPruefen { email, passwort } => Antwort::Bool {
                ergebnis: service.passwort_pruefen(email, passwort),
            },
            Befehl::Beenden => Antwort::Beendet,
        }
    }
}
