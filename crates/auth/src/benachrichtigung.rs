//! Zustellung von Reset-Tokens
//!
//! Der Store stellt Tokens nur aus. Wer sie dem Benutzer zustellt (E-Mail,
//! SMS, ...), entscheidet der Aufrufer ueber [`ResetBenachrichtigung`].

use parking_lot::Mutex;

/// Empfaenger fuer frisch ausgestellte Reset-Tokens
pub trait ResetBenachrichtigung: Send + Sync {
    fn reset_token_ausgestellt(&self, email: &str, token: &str);
}

/// Protokolliert nur das Ereignis, ohne den Token-Wert
#[derive(Debug, Clone, Copy, Default)]
pub struct ProtokollBenachrichtigung;

impl ResetBenachrichtigung for ProtokollBenachrichtigung {
    fn reset_token_ausgestellt(&self, email: &str, _token: &str) {
        tracing::info!(
            email = %email,
            "Reset-Token ausgestellt, keine Zustellung konfiguriert"
        );
    }
}

/// Sammelt ausgestellte Tokens im Speicher (Postausgang fuer Tests und
/// eingebettete Aufrufer)
#[derive(Debug, Default)]
pub struct SammelBenachrichtigung {
    postausgang: Mutex<Vec<(String, String)>>,
}

impl SammelBenachrichtigung {
    pub fn neu() -> Self {
        Self::default()
    }

    /// Gibt den zuletzt fuer `email` ausgestellten Token zurueck
    pub fn letzter_token(&self, email: &str) -> Option<String> {
        self.postausgang
            .lock()
            .iter()
            .rev()
            .find(|(e, _)| e == email)
            .map(|(_, t)| t.clone())
    }

    /// Anzahl aller bisher ausgestellten Tokens
    pub fn anzahl(&self) -> usize {
        self.postausgang.lock().len()
    }
}

impl ResetBenachrichtigung for SammelBenachrichtigung {
    fn reset_token_ausgestellt(&self, email: &str, token: &str) {
        self.postausgang
            .lock()
            .push((email.to_string(), token.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sammler_liefert_letzten_token() {
        let sammler = SammelBenachrichtigung::neu();
        sammler.reset_token_ausgestellt("a@x.com", "t1");
        sammler.reset_token_ausgestellt("b@x.com", "t2");
        sammler.reset_token_ausgestellt("a@x.com", "t3");

        assert_eq!(sammler.letzter_token("a@x.com").as_deref(), Some("t3"));
        assert_eq!(sammler.letzter_token("b@x.com").as_deref(), Some("t2"));
        assert_eq!(sammler.letzter_token("c@x.com"), None);
        assert_eq!(sammler.anzahl(), 3);
    }
}
