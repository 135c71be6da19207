//! Reset-Tokens fuer den Passwort-Reset
//!
//! Ein Token autorisiert genau eine Passwortaenderung. Tokens sind
//! URL-sicheres Base64 ohne Padding ueber mindestens 16 Zufallsbytes.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use rand_core::{OsRng, RngCore};

use crate::{
    error::{AuthError, AuthResult},
    password::konstante_zeit_gleich,
};

/// Untergrenze der Token-Entropie in Bytes
pub const MIN_TOKEN_BYTES: usize = 16;

/// Obergrenze der Token-Entropie in Bytes
pub const MAX_TOKEN_BYTES: usize = 1024;

/// Generiert einen kryptografisch sicheren Reset-Token
///
/// Werte werden auf [`MIN_TOKEN_BYTES`]..=[`MAX_TOKEN_BYTES`] begrenzt.
pub fn reset_token_generieren(bytes: usize) -> AuthResult<String> {
    let mut puffer = vec![0u8; bytes.clamp(MIN_TOKEN_BYTES, MAX_TOKEN_BYTES)];
    OsRng
        .try_fill_bytes(&mut puffer)
        .map_err(|e| AuthError::intern(format!("Zufallsquelle nicht verfuegbar: {e}")))?;
    Ok(URL_SAFE_NO_PAD.encode(puffer))
}

/// Vergleicht einen gespeicherten mit einem vorgelegten Token in konstanter Zeit
pub fn token_gleich(gespeichert: &str, vorgelegt: &str) -> bool {
    konstante_zeit_gleich(gespeichert.as_bytes(), vorgelegt.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_ist_url_sicher_ohne_padding() {
        let token = reset_token_generieren(16).unwrap();
        // 16 Bytes -> 22 Zeichen ohne Padding
        assert_eq!(token.len(), 22);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn zu_wenig_entropie_wird_angehoben() {
        let token = reset_token_generieren(4).unwrap();
        let dekodiert = URL_SAFE_NO_PAD.decode(&token).unwrap();
        assert_eq!(dekodiert.len(), MIN_TOKEN_BYTES);
    }

    #[test]
    fn mehr_entropie_wird_respektiert() {
        let token = reset_token_generieren(32).unwrap();
        assert_eq!(URL_SAFE_NO_PAD.decode(&token).unwrap().len(), 32);
    }

    #[test]
    fn riesige_laenge_wird_gekappt() {
        let token = reset_token_generieren(usize::MAX).unwrap();
        assert_eq!(URL_SAFE_NO_PAD.decode(&token).unwrap().len(), MAX_TOKEN_BYTES);
    }

    #[test]
    fn tokens_sind_eindeutig() {
        let a = reset_token_generieren(16).unwrap();
        let b = reset_token_generieren(16).unwrap();
        assert_ne!(a, b, "Reset-Tokens muessen eindeutig sein");
    }

    #[test]
    fn token_vergleich() {
        assert!(token_gleich("abc_-123", "abc_-123"));
        assert!(!token_gleich("abc_-123", "abc_-124"));
        assert!(!token_gleich("abc", ""));
    }
}
