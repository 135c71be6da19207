//! huster-server – Bibliotheks-Root
//!
//! Deklariert alle Server-Module und stellt den oeffentlichen Einstiegspunkt
//! fuer Integrationstests bereit.

pub mod config;
pub mod dispatch;
pub mod error;

use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use huster_auth::{AuthService, CredentialStore, ProtokollBenachrichtigung};
use huster_core::UuidIdentitaeten;

use config::ServerConfig;
use dispatch::{Antwort, Dispatcher};

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
    dispatcher: Dispatcher,
}

impl Server {
    /// Erstellt einen neuen Server mit frischem, leerem Credential-Store
    pub fn neu(config: ServerConfig) -> Self {
        let store = CredentialStore::neu(Arc::new(UuidIdentitaeten), config.auth_konfiguration());
        let service = AuthService::neu(store, Arc::new(ProtokollBenachrichtigung));
        Self::mit_service(config, Arc::new(service))
    }

    /// Erstellt einen Server um einen vorhandenen AuthService
    pub fn mit_service(config: ServerConfig, service: Arc<AuthService>) -> Self {
        Self {
            config,
            dispatcher: Dispatcher::neu(service),
        }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Bedient stdin/stdout bis `quit`, Eingabeende oder Ctrl-C
    pub async fn starten(self) -> Result<()> {
        tracing::info!(
            server_name = %self.config.server.name,
            passwort_mindestlaenge = self.config.passwort.mindestlaenge,
            "Server startet"
        );

        let eingabe = BufReader::new(tokio::io::stdin());
        let ausgabe = tokio::io::stdout();

        tokio::select! {
            ergebnis = self.sitzung_bedienen(eingabe, ausgabe) => ergebnis?,
            signal = tokio::signal::ctrl_c() => {
                signal?;
                tracing::info!("Shutdown-Signal empfangen, Server wird beendet");
            }
        }

        tracing::info!(
            benutzer = self.dispatcher.service().anzahl_benutzer(),
            "Server beendet"
        );
        Ok(())
    }

    /// Liest Befehlszeilen und schreibt je eine Antwortzeile
    ///
    /// Leere Zeilen werden uebersprungen.
    pub async fn sitzung_bedienen<R, W>(&self, mut eingabe: R, mut ausgabe: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut zeile = String::new();
        loop {
            zeile.clear();
            if eingabe.read_line(&mut zeile).await? == 0 {
                tracing::debug!("Eingabe beendet");
                break;
            }
            if zeile.trim().is_empty() {
                continue;
            }

            let antwort = self.dispatcher.zeile_verarbeiten(&zeile);
            ausgabe.write_all(antwort.als_zeile().as_bytes()).await?;
            ausgabe.flush().await?;

            if antwort == Antwort::Beendet {
                break;
            }
        }
        Ok(())
    }
}
