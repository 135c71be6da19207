//! Integration-Tests fuer die Aufrufschicht (Befehlszeilen -> JSON-Antworten)

use std::sync::Arc;

use serde_json::{json, Value};

use huster_auth::{AuthService, CredentialStore, SammelBenachrichtigung};
use huster_server::{config::ServerConfig, Server};

fn server() -> (Server, Arc<SammelBenachrichtigung>) {
    let sammler = Arc::new(SammelBenachrichtigung::neu());
    let service = AuthService::neu(CredentialStore::default(), sammler.clone());
    (Server::mit_service(ServerConfig::default(), Arc::new(service)), sammler)
}

async fn ausfuehren(server: &Server, eingabe: &str) -> Vec<Value> {
    let mut ausgabe = Vec::new();
    server
        .sitzung_bedienen(eingabe.as_bytes(), &mut ausgabe)
        .await
        .expect("Sitzung fehlgeschlagen");

    String::from_utf8(ausgabe)
        .expect("Ausgabe muss UTF-8 sein")
        .lines()
        .map(|zeile| serde_json::from_str(zeile).expect("Jede Zeile muss JSON sein"))
        .collect()
}

#[tokio::test]
async fn szenario_ueber_die_aufrufschicht() {
    let (server, sammler) = server();

    let antworten = ausfuehren(
        &server,
        "register username=alice email=a@x.com password=pw1\n\
         register username=bob email=a@x.com password=pw2\n",
    )
    .await;
    assert_eq!(antworten[0]["antwort"], "registriert");
    assert_eq!(antworten[0]["ergebnis"], true);
    assert_eq!(antworten[1], json!({"antwort": "registriert", "ergebnis": false}));

    let alice = antworten[0]["identitaet"]
        .as_str()
        .expect("Identitaet muss mitgeliefert werden")
        .to_string();

    let antworten = ausfuehren(
        &server,
        &format!(
            "login identity={alice}\n\
             is_logged_in identity={alice}\n\
             logout identity={alice}\n\
             is_logged_in identity={alice}\n\
             request_password_reset email=a@x.com\n"
        ),
    )
    .await;
    let ergebnisse: Vec<&Value> = antworten.iter().map(|a| &a["ergebnis"]).collect();
    assert_eq!(ergebnisse, [&json!(true), &json!(true), &json!(true), &json!(false), &json!(true)]);

    // Der Token erscheint nie in der Antwort
    let token = sammler.letzter_token("a@x.com").unwrap();
    assert!(!antworten.iter().any(|a| a.to_string().contains(&token)));

    let antworten = ausfuehren(
        &server,
        &format!(
            "confirm_password_reset email=a@x.com token={token} new_password=newpw\n\
             confirm_password_reset email=a@x.com token={token} new_password=again\n\
             verify_password email=a@x.com password=newpw\n\
             verify_password email=a@x.com password=pw1\n"
        ),
    )
    .await;
    let ergebnisse: Vec<bool> = antworten
        .iter()
        .map(|a| a["ergebnis"].as_bool().unwrap())
        .collect();
    assert_eq!(ergebnisse, [true, false, true, false]);
}

#[tokio::test]
async fn benutzerinfo_fuer_unbekannte_identitaet() {
    let (server, _) = server();
    let antworten = ausfuehren(&server, "get_user_info identity=niemand\n").await;
    assert_eq!(antworten, [json!({"antwort": "benutzer", "benutzer": null})]);
}

#[tokio::test]
async fn quit_beendet_die_sitzung() {
    let (server, _) = server();
    let antworten = ausfuehren(
        &server,
        "\n\
         is_logged_in identity=x\n\
         quit\n\
         register username=spaet email=s@x.com password=pw\n",
    )
    .await;

    assert_eq!(antworten.len(), 2, "Leere Zeilen und alles nach quit entfallen");
    assert_eq!(antworten[1], json!({"antwort": "beendet"}));
    assert_eq!(server.dispatcher().service().anzahl_benutzer(), 0);
}

#[tokio::test]
async fn fehlerhafte_zeilen_beenden_die_sitzung_nicht() {
    let (server, _) = server();
    let antworten = ausfuehren(
        &server,
        "frobnicate\n\
         login\n\
         register username=\"Alice Smith\" email=a@x.com password=pw\n",
    )
    .await;

    assert_eq!(antworten[0]["antwort"], "fehler");
    assert_eq!(antworten[0]["code"], 1001);
    assert_eq!(antworten[1]["code"], 1002);
    assert_eq!(antworten[2]["ergebnis"], true);
}

#[tokio::test]
async fn mindestlaenge_aus_der_konfiguration() {
    let mut config = ServerConfig::default();
    config.passwort.mindestlaenge = 8;
    let server = Server::neu(config);

    let antworten = ausfuehren(
        &server,
        "register username=a email=a@x.com password=kurz\n\
         register username=a email=a@x.com password=lang_genug\n",
    )
    .await;
    assert_eq!(antworten[0]["ergebnis"], false);
    assert_eq!(antworten[1]["ergebnis"], true);
}
