//! Passwort-Hashing mit PBKDF2-HMAC-SHA256
//!
//! Gespeichertes Format: `pbkdf2_sha256$<salt-hex>$<schluessel-hex>`.
//! Algorithmus und Salt reisen mit dem Hash, die Verifikation ist damit
//! selbstbeschreibend. Das Format ist stabil: bestehende Records muessen
//! auch nach spaeteren Aenderungen lesbar bleiben.

use rand_core::{OsRng, RngCore};
use sha2::Sha256;

use crate::error::{AuthError, AuthResult};

/// Algorithmus-Tag im gespeicherten Hash
pub const ALGORITHMUS_TAG: &str = "pbkdf2_sha256";

/// Iterationen fuer `pbkdf2_sha256`
///
/// Fest an den Tag gebunden. Ein anderer Arbeitsfaktor braucht einen neuen Tag.
pub const ITERATIONEN: u32 = 100_000;

/// Salt-Laenge in Bytes
pub const SALT_LAENGE: usize = 16;

/// Laenge des abgeleiteten Schluessels in Bytes (SHA-256 Ausgabe)
pub const SCHLUESSEL_LAENGE: usize = 32;

/// Zerlegter Credential-Hash
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash {
    pub salt: Vec<u8>,
    pub schluessel: Vec<u8>,
}

impl CredentialHash {
    /// Parst einen gespeicherten Hash-String
    pub fn parsen(hash: &str) -> AuthResult<Self> {
        let mut teile = hash.split('$');
        let (Some(tag), Some(salt_hex), Some(schluessel_hex), None) =
            (teile.next(), teile.next(), teile.next(), teile.next())
        else {
            return Err(AuthError::PasswortHashing(
                "Ungueltiges Hash-Format: erwartet tag$salt$schluessel".into(),
            ));
        };

        if tag != ALGORITHMUS_TAG {
            return Err(AuthError::PasswortHashing(format!(
                "Unbekannter Algorithmus: {tag}"
            )));
        }

        let salt = hex::decode(salt_hex)
            .map_err(|e| AuthError::PasswortHashing(format!("Salt nicht dekodierbar: {e}")))?;
        let schluessel = hex::decode(schluessel_hex)
            .map_err(|e| AuthError::PasswortHashing(format!("Schluessel nicht dekodierbar: {e}")))?;

        if salt.is_empty() || schluessel.is_empty() {
            return Err(AuthError::PasswortHashing("Salt oder Schluessel leer".into()));
        }

        Ok(Self { salt, schluessel })
    }

    /// Kodiert den Hash im gespeicherten Format (Hex in Kleinbuchstaben)
    pub fn kodieren(&self) -> String {
        format!(
            "{ALGORITHMUS_TAG}${}${}",
            hex::encode(&self.salt),
            hex::encode(&self.schluessel)
        )
    }
}

// Salt und Schluessel gehoeren nicht in Logs
impl std::fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialHash")
            .field("algorithmus", &ALGORITHMUS_TAG)
            .finish_non_exhaustive()
    }
}

fn schluessel_ableiten(passwort: &str, salt: &[u8], ausgabe: &mut [u8]) {
    pbkdf2::pbkdf2_hmac::<Sha256>(passwort.as_bytes(), salt, ITERATIONEN, ausgabe);
}

/// Hasht ein Passwort mit einem frischen zufaelligen Salt
///
/// Gibt den kodierten Hash-String zurueck.
pub fn passwort_hashen(passwort: &str) -> AuthResult<String> {
    let mut salt = [0u8; SALT_LAENGE];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| AuthError::PasswortHashing(format!("Zufallsquelle nicht verfuegbar: {e}")))?;

    let mut schluessel = [0u8; SCHLUESSEL_LAENGE];
    schluessel_ableiten(passwort, &salt, &mut schluessel);

    Ok(CredentialHash {
        salt: salt.to_vec(),
        schluessel: schluessel.to_vec(),
    }
    .kodieren())
}

/// Verifiziert ein Passwort gegen einen gespeicherten Hash
///
/// Gibt `true` zurueck wenn das Passwort korrekt ist. Ein nicht parsbarer
/// Hash ist ein Fehler, kein `false`.
pub fn passwort_verifizieren(passwort: &str, hash: &str) -> AuthResult<bool> {
    let gespeichert = CredentialHash::parsen(hash)?;

    let mut versuch = vec![0u8; gespeichert.schluessel.len()];
    schluessel_ableiten(passwort, &gespeichert.salt, &mut versuch);

    Ok(konstante_zeit_gleich(&versuch, &gespeichert.schluessel))
}

/// Leitet einen Wegwerf-Schluessel ab, damit unbekannte Konten nicht
/// schneller abgelehnt werden als falsche Passwoerter
pub(crate) fn attrappe_ableiten(passwort: &str) {
    let mut verworfen = [0u8; SCHLUESSEL_LAENGE];
    schluessel_ableiten(passwort, &[0u8; SALT_LAENGE], &mut verworfen);
}

/// Byte-Vergleich in konstanter Zeit
///
/// Die Laenge ist nicht geheim; nur der Inhalt wird ohne fruehen Abbruch
/// verglichen.
pub fn konstante_zeit_gleich(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        diff |= x ^ y;
    }
    diff == 0
}
