// End-to-end runs of the interactive session against a local mock server,
// with console input scripted through a channel.

use crossbeam::channel::{self, Receiver};
use mockito::Matcher;
use rewards_grab::api::ApiClient;
use rewards_grab::ui::Session;
use std::net::TcpListener;
use std::time::Duration;

const PATH: &str = "/user/reward/items";
const GIFT_CARD_LIST: &str =
    r#"{"code":200,"data":[{"id":1,"name":"Gift Card","points":100,"available_stock":5}]}"#;

fn scripted(lines: &[&str]) -> Receiver<String> {
    let (tx, rx) = channel::unbounded();
    for line in lines {
        tx.send(line.to_string()).unwrap();
    }
    rx
}

fn run_session(base_url: String, lines: &[&str]) -> (anyhow::Result<()>, String) {
    let api = ApiClient::new(base_url, Duration::from_secs(5)).unwrap();
    let mut session = Session::new(&api, "secret".into(), Duration::from_millis(10), scripted(lines), Vec::new());
    let result = session.run();
    (result, String::from_utf8(session.into_output()).unwrap())
}

#[test]
fn rate_limited_three_times_then_success() {
    let mut server = mockito::Server::new();
    let listing = server
        .mock("GET", PATH)
        .with_body(GIFT_CARD_LIST)
        .expect(2)
        .create();
    let limited = server
        .mock("POST", PATH)
        .match_body(Matcher::JsonString(r#"{"item_id":1}"#.to_string()))
        .with_body(r#"{"code":429,"message":"rate limited"}"#)
        .expect(3)
        .create();
    let ok = server
        .mock("POST", PATH)
        .match_body(Matcher::JsonString(r#"{"item_id":1}"#.to_string()))
        .with_body(r#"{"code":200,"message":"ok"}"#)
        .expect(1)
        .create();

    // Input ends after the selection, so the second listing exits cleanly.
    let (result, out) = run_session(format!("{}{}", server.url(), PATH), &["1"]);

    assert!(result.is_ok(), "{:?}", result);
    listing.assert();
    limited.assert();
    ok.assert();
    assert_eq!(out.matches("Purchase attempt: rate limited\n").count(), 3);
    assert_eq!(out.matches("Purchase succeeded!\n").count(), 1);
    let last_attempt = out.rfind("Purchase attempt").unwrap();
    assert!(out.find("Purchase succeeded!").unwrap() > last_attempt);
    assert_eq!(out.matches("Available items:").count(), 2);
}

#[test]
fn listing_shows_id_and_name_in_server_order() {
    let mut server = mockito::Server::new();
    server
        .mock("GET", PATH)
        .with_body(
            r#"{"code":200,"data":[
                {"id":9,"name":"Sticker","points":10,"available_stock":100},
                {"id":2,"name":"Mug","points":80,"available_stock":0}
            ]}"#,
        )
        .create();
    let purchase = server.mock("POST", PATH).expect(0).create();

    let (result, out) = run_session(format!("{}{}", server.url(), PATH), &["0"]);

    assert!(result.is_ok());
    purchase.assert();
    assert!(out.starts_with("Available items:\nID: 9, Name: Sticker\nID: 2, Name: Mug\n"));
}

#[test]
fn cancel_during_polling_keeps_program_running() {
    let mut server = mockito::Server::new();
    let listing = server.mock("GET", PATH).with_body(GIFT_CARD_LIST).expect(2).create();
    let purchase = server.mock("POST", PATH).expect(0).create();

    let (result, out) = run_session(format!("{}{}", server.url(), PATH), &["1", "0", "0"]);

    assert!(result.is_ok());
    listing.assert();
    purchase.assert();
    assert!(out.contains("Operation cancelled\n"));
}

#[test]
fn rejected_listing_exits_without_prompt() {
    let mut server = mockito::Server::new();
    server.mock("GET", PATH).with_body(r#"{"code":401}"#).create();

    let (result, out) = run_session(format!("{}{}", server.url(), PATH), &["1"]);

    assert!(result.is_err());
    assert!(!out.contains("Enter item ID"));
}

#[test]
fn unreachable_server_exits_without_prompt() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let (result, out) = run_session(format!("http://127.0.0.1:{}{}", port, PATH), &["1"]);

    let err = result.unwrap_err();
    assert!(format!("{:#}", err).starts_with("Failed to fetch item list"));
    assert!(out.is_empty());
}

#[test]
fn undecodable_purchase_reply_is_fatal() {
    let mut server = mockito::Server::new();
    server.mock("GET", PATH).with_body(GIFT_CARD_LIST).create();
    server.mock("POST", PATH).with_status(500).with_body("oops").create();

    let (result, _out) = run_session(format!("{}{}", server.url(), PATH), &["1"]);

    let err = result.unwrap_err();
    assert!(format!("{:#}", err).starts_with("Purchase failed"));
}
