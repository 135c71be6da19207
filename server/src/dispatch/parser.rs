//! Befehlsparser fuer die Aufrufschicht
//!
//! Parst zeilenbasierte Befehle im Format:
//!   befehlsname key1=value1 key2="value with spaces" key3=wert3
//!
//! Sonderzeichen in Werten werden mit Backslash escaped:
//!   \s = Leerzeichen, \n = Newline, \\ = Backslash, \" = Anfuehrungszeichen

use std::collections::HashMap;

use crate::error::{DispatchError, DispatchResult};

/// Ein geparster Befehl
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedCommand {
    /// Befehlsname (z.B. "register", "login")
    pub name: String,
    /// Key-Value-Parameter
    pub params: HashMap<String, String>,
}

impl ParsedCommand {
    /// Gibt einen Parameter als String zurueck
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(|s| s.as_str())
    }

    /// Gibt einen Pflicht-Parameter zurueck oder einen Fehler
    pub fn required_param(&self, key: &str) -> DispatchResult<&str> {
        self.param(key).ok_or_else(|| {
            DispatchError::UngueltigeEingabe(format!("Pflicht-Parameter fehlt: {key}"))
        })
    }
}

/// Parst eine Befehlszeile
///
/// Format: `befehlsname [key=value ...]`
/// Werte koennen mit " " gequotet oder mit \s escaped sein. Ein leerer Wert
/// (`password=`) ist ein gueltiger, leerer String.
pub fn parse_line(line: &str) -> DispatchResult<ParsedCommand> {
    let line = line.trim();
    if line.is_empty() {
        return Err(DispatchError::Protokoll("Leere Befehlszeile".into()));
    }

    let tokens = tokenize(line);
    let Some((name, rest)) = tokens.split_first() else {
        return Err(DispatchError::Protokoll("Kein Befehlsname".into()));
    };

    let mut params = HashMap::new();
    for (position, token) in rest.iter().enumerate() {
        match token.split_once('=') {
            Some((key, value)) => {
                params.insert(key.to_lowercase(), value.to_string());
            }
            None => {
                // Token nicht ausgeben, er kann ein Passwort sein
                return Err(DispatchError::UngueltigeEingabe(format!(
                    "Parameter {} ohne '='",
                    position + 1
                )))
            }
        }
    }

    Ok(ParsedCommand {
        name: name.to_lowercase(),
        params,
    })
}

/// Zerlegt eine Zeile in Tokens, beachtet quoted Strings und Escapes
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars();

    while let Some(c) = chars.next() {
        match c {
            '"' => in_quotes = !in_quotes,
            ' ' | '\t' if !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            '\\' => match chars.next() {
                Some('s') => current.push(' '),
                Some('n') => current.push('\n'),
                Some('\\') => current.push('\\'),
                Some('"') => current.push('"'),
                Some(other) => {
                    current.push('\\');
                    current.push(other);
                }
                None => current.push('\\'),
            },
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_einfacher_befehl() {
        let cmd = parse_line("quit").unwrap();
        assert_eq!(cmd.name, "quit");
        assert!(cmd.params.is_empty());
    }

    #[test]
    fn parse_befehl_mit_params() {
        let cmd = parse_line("register username=alice email=a@x.com password=pw1").unwrap();
        assert_eq!(cmd.name, "register");
        assert_eq!(cmd.param("username"), Some("alice"));
        assert_eq!(cmd.param("email"), Some("a@x.com"));
        assert_eq!(cmd.param("password"), Some("pw1"));
    }

    #[test]
    fn parse_escaped_leerzeichen() {
        let cmd = parse_line(r"register username=Alice\sSmith").unwrap();
        assert_eq!(cmd.param("username"), Some("Alice Smith"));
    }

    #[test]
    fn parse_quoted_wert() {
        let cmd = parse_line(r#"register username="Alice Smith" password="a \"b\" c""#).unwrap();
        assert_eq!(cmd.param("username"), Some("Alice Smith"));
        assert_eq!(cmd.param("password"), Some(r#"a "b" c"#));
    }

    #[test]
    fn gleichheitszeichen_im_wert_bleibt_erhalten() {
        let cmd = parse_line("confirm_password_reset token=abc=def").unwrap();
        assert_eq!(cmd.param("token"), Some("abc=def"));
    }

    #[test]
    fn leerer_wert_ist_erlaubt() {
        let cmd = parse_line("register password=").unwrap();
        assert_eq!(cmd.param("password"), Some(""));
    }

    #[test]
    fn parse_case_insensitive_name() {
        let cmd = parse_line("IS_LOGGED_IN Identity=p-1").unwrap();
        assert_eq!(cmd.name, "is_logged_in");
        assert_eq!(cmd.param("identity"), Some("p-1"));
    }

    #[test]
    fn leere_zeile_gibt_fehler() {
        assert!(parse_line("").is_err());
        assert!(parse_line("   ").is_err());
    }

    #[test]
    fn parameter_ohne_wert_gibt_fehler() {
        assert!(matches!(
            parse_line("login p-1"),
            Err(DispatchError::UngueltigeEingabe(_))
        ));
    }

    #[test]
    fn fehlermeldung_enthaelt_keinen_rohwert() {
        let fehler = parse_line("register username=eve geheimes_pw").unwrap_err();
        let meldung = fehler.to_string();
        assert!(!meldung.contains("geheimes_pw"), "Meldung: {meldung}");
        assert!(meldung.contains("Parameter 2"));
    }

    #[test]
    fn required_param_fehlt() {
        let cmd = parse_line("login").unwrap();
        assert!(cmd.required_param("identity").is_err());
    }
}
