//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! sinnvolle Standardwerte, sodass der Server ohne Konfigurationsdatei
//! lauffaehig ist.

use serde::{Deserialize, Serialize};

use huster_auth::{reset_token::MAX_TOKEN_BYTES, AuthKonfiguration};
use huster_observability::{log_format_gueltig, log_level_gueltig};

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Allgemeine Server-Einstellungen
    pub server: ServerEinstellungen,
    /// Logging-Einstellungen
    pub logging: LoggingEinstellungen,
    /// Passwort-Richtlinie
    pub passwort: PasswortEinstellungen,
    /// Reset-Token-Einstellungen
    pub reset: ResetEinstellungen,
}

/// Allgemeine Server-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Anzeigename des Servers
    pub name: String,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            name: "Huster Server".into(),
        }
    }
}

/// Logging-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level oder Filter-Direktive, z.B. "info" oder "huster_auth=debug"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

/// Passwort-Richtlinie fuer Registrierung und Reset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswortEinstellungen {
    /// Minimale Laenge in Zeichen (0 = keine Pruefung)
    pub mindestlaenge: usize,
}

impl Default for PasswortEinstellungen {
    fn default() -> Self {
        Self {
            mindestlaenge: AuthKonfiguration::default().passwort_mindestlaenge,
        }
    }
}

/// Reset-Token-Einstellungen
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResetEinstellungen {
    /// Zufallsbytes pro Token, Werte unter 16 werden angehoben, hoechstens 1024
    pub token_bytes: usize,
}

impl Default for ResetEinstellungen {
    fn default() -> Self {
        Self {
            token_bytes: AuthKonfiguration::default().token_bytes,
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    ///
    /// Gibt `None` zurueck wenn die Datei nicht existiert; der Aufrufer
    /// faellt dann auf die Standardwerte zurueck. Laeuft vor dem Logging-Setup
    /// und loggt deshalb selbst nichts.
    pub fn laden(pfad: &str) -> anyhow::Result<Option<Self>> {
        let config = match std::fs::read_to_string(pfad) {
            Ok(inhalt) => toml::from_str::<Self>(&inhalt)
                .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(anyhow::anyhow!(
                    "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
                ))
            }
        };
        config.validieren()?;
        Ok(Some(config))
    }

    /// Prueft Werte, die serde allein nicht abfangen kann
    pub fn validieren(&self) -> anyhow::Result<()> {
        if !log_format_gueltig(&self.logging.format) {
            anyhow::bail!(
                "Unbekanntes Log-Format '{}' (erwartet: text oder json)",
                self.logging.format
            );
        }
        // Filter-Direktiven wie "huster_auth=debug" sind erlaubt
        if !self.logging.level.contains('=') && !log_level_gueltig(&self.logging.level) {
            anyhow::bail!("Unbekanntes Log-Level '{}'", self.logging.level);
        }
        if self.reset.token_bytes > MAX_TOKEN_BYTES {
            anyhow::bail!(
                "reset.token_bytes = {} ueberschreitet das Maximum von {MAX_TOKEN_BYTES}",
                self.reset.token_bytes
            );
        }
        Ok(())
    }

    /// Einstellungen fuer den Credential-Store
    pub fn auth_konfiguration(&self) -> AuthKonfiguration {
        AuthKonfiguration {
            passwort_mindestlaenge: self.passwort.mindestlaenge,
            token_bytes: self.reset.token_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_config_ist_valide() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.server.name, "Huster Server");
        assert_eq!(cfg.logging.level, "info");
        assert_eq!(cfg.passwort.mindestlaenge, 0);
        assert_eq!(cfg.reset.token_bytes, 16);
        assert!(cfg.validieren().is_ok());
    }

    #[test]
    fn config_aus_toml_string() {
        let toml = r#"
            [server]
            name = "Mein Server"

            [passwort]
            mindestlaenge = 12
        "#;
        let cfg: ServerConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.server.name, "Mein Server");
        assert_eq!(cfg.auth_konfiguration().passwort_mindestlaenge, 12);
        // Nicht angegebene Felder behalten Standardwerte
        assert_eq!(cfg.reset.token_bytes, 16);
        assert_eq!(cfg.logging.format, "text");
    }

    #[test]
    fn ungueltiges_format_wird_abgelehnt() {
        let mut cfg = ServerConfig::default();
        cfg.logging.format = "xml".into();
        assert!(cfg.validieren().is_err());
    }

    #[test]
    fn filter_direktive_ist_erlaubt() {
        let mut cfg = ServerConfig::default();
        cfg.logging.level = "huster_auth=debug".into();
        assert!(cfg.validieren().is_ok());
        cfg.logging.level = "laut".into();
        assert!(cfg.validieren().is_err());
    }

    #[test]
    fn fehlende_datei_liefert_none() {
        let cfg = ServerConfig::laden("/nicht/vorhanden/huster.toml").unwrap();
        assert!(cfg.is_none());
    }

    #[test]
    fn vorhandene_datei_wird_geladen() {
        let pfad = std::env::temp_dir().join(format!("huster-config-{}.toml", std::process::id()));
        std::fs::write(&pfad, "[server]\nname = \"Aus Datei\"\n").unwrap();

        let cfg = ServerConfig::laden(pfad.to_str().unwrap()).unwrap();
        std::fs::remove_file(&pfad).unwrap();

        assert_eq!(cfg.expect("Datei existiert").server.name, "Aus Datei");
    }

    #[test]
    fn riesige_token_laenge_wird_abgelehnt() {
        let mut cfg = ServerConfig::default();
        cfg.reset.token_bytes = MAX_TOKEN_BYTES;
        assert!(cfg.validieren().is_ok());
        cfg.reset.token_bytes = usize::MAX;
        assert!(cfg.validieren().is_err());
    }
}
