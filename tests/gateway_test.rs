use gatebot::api::{Credentials, ExchangeGateway, GateClient, GatewayError, GatewaySettings, SpotGateway};
use gatebot::Direction;
use mockito::{Matcher, Server};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};

fn settings(base_url: String) -> GatewaySettings {
    GatewaySettings {
        base_url,
        settle: "usdt".to_string(),
        requests_per_second: 100,
        timeout_secs: 5,
        retry_backoff_ms: 1,
    }
}

fn signed_client(server: &Server) -> GateClient {
    GateClient::new(settings(server.url()), Some(Credentials::new("test-key", "test-secret"))).unwrap()
}

fn public_client(server: &Server) -> GateClient {
    GateClient::new(settings(server.url()), None).unwrap()
}

#[tokio::test]
async fn test_ticker_reads_last_price() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/futures/usdt/tickers")
        .match_query(Matcher::UrlEncoded("contract".into(), "BTC_USDT".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"contract":"BTC_USDT","last":"43250.5","mark_price":"43251"}]"#)
        .create_async()
        .await;

    let price = assert_ok!(public_client(&server).get_ticker("BTC_USDT").await);

    assert_eq!(price, 43250.5);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_empty_ticker_list_is_an_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/futures/usdt/tickers")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let result = public_client(&server).get_ticker("NOPE_USDT").await;
    assert!(matches!(result, Err(GatewayError::MissingTicker(c)) if c == "NOPE_USDT"));
}

#[tokio::test]
async fn test_ticker_for_other_contract_is_an_error() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/futures/usdt/tickers")
        .match_query(Matcher::UrlEncoded("contract".into(), "ASTER_USDT".into()))
        .with_status(200)
        .with_body(r#"[{"contract":"BTC_USDT","last":"43000"}]"#)
        .create_async()
        .await;

    let err = assert_err!(public_client(&server).get_ticker("ASTER_USDT").await);
    assert!(matches!(err, GatewayError::MissingTicker(c) if c == "ASTER_USDT"));
}

#[tokio::test]
async fn test_futures_candles_sorted_oldest_first() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/futures/usdt/candlesticks")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("contract".into(), "ETH_USDT".into()),
            Matcher::UrlEncoded("interval".into(), "1h".into()),
            Matcher::UrlEncoded("limit".into(), "2".into()),
        ]))
        .with_status(200)
        .with_body(
            r#"[
                {"t":1700003600,"v":20,"c":"2010","h":"2020","l":"1995","o":"2000"},
                {"t":1700000000,"v":10,"c":"2000","h":"2005","l":"1990","o":"1998"}
            ]"#,
        )
        .create_async()
        .await;

    let bars = assert_ok!(public_client(&server).get_candles("ETH_USDT", "1h", 2).await);

    assert_eq!(bars.len(), 2);
    assert_eq!(bars[0].timestamp.timestamp(), 1_700_000_000);
    assert_eq!(bars[0].close, 2000.0);
    assert_eq!(bars[1].high, 2020.0);
    assert_eq!(bars[1].volume, 20.0);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_spot_candles_parse_array_rows() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/spot/candlesticks")
        .match_query(Matcher::UrlEncoded("currency_pair".into(), "BTC_USDT".into()))
        .with_status(200)
        .with_body(r#"[["1700000000","86500","43250","43300","43100","43150","2","true"]]"#)
        .create_async()
        .await;

    let bars = public_client(&server).get_spot_candles("BTC_USDT", "5m", 1).await.unwrap();

    assert_eq!(bars.len(), 1);
    assert_eq!(bars[0].open, 43150.0);
    assert_eq!(bars[0].close, 43250.0);
    assert_eq!(bars[0].volume, 2.0);
}

#[tokio::test]
async fn test_position_lookup_is_signed_and_skips_flat_rows() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/futures/usdt/positions")
        .match_header("KEY", "test-key")
        .match_header("SIGN", Matcher::Regex("^[0-9a-f]{128}$".to_string()))
        .match_header("Timestamp", Matcher::Regex(r"^\d+$".to_string()))
        .with_status(200)
        .with_body(
            r#"[
                {"contract":"ASTER_USDT","size":0,"entry_price":"0","mark_price":"0.95","leverage":"10","unrealised_pnl":"0","mode":"dual_long"},
                {"contract":"ASTER_USDT","size":-30,"entry_price":"0.96","mark_price":"0.95","leverage":"10","unrealised_pnl":"0.3","mode":"dual_short"},
                {"contract":"BTC_USDT","size":1,"entry_price":"43000","mark_price":"43250","leverage":"5","unrealised_pnl":"2.5","mode":"single"}
            ]"#,
        )
        .create_async()
        .await;

    let position = signed_client(&server)
        .get_position("ASTER_USDT")
        .await
        .unwrap()
        .unwrap();

    assert_eq!(position.size, -30.0);
    assert_eq!(position.entry_price, 0.96);
    assert_eq!(position.mode, "dual_short");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_no_position_for_contract() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/futures/usdt/positions")
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let position = signed_client(&server).get_position("ASTER_USDT").await.unwrap();
    assert!(position.is_none());
}

#[tokio::test]
async fn test_close_order_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/futures/usdt/orders")
        .match_header("KEY", "test-key")
        .match_header("content-type", "application/json")
        .match_body(Matcher::PartialJson(json!({
            "contract": "ASTER_USDT",
            "size": 30,
            "price": "0",
            "tif": "ioc",
            "reduce_only": true
        })))
        .with_status(201)
        .with_body(
            r#"{"id":58828142194,"contract":"ASTER_USDT","size":30,"status":"finished","fill_price":"0.951","text":"t-abc"}"#,
        )
        .create_async()
        .await;

    let order = signed_client(&server)
        .submit_market_order("ASTER_USDT", 30.0, true)
        .await
        .unwrap();

    assert_eq!(order.id, "58828142194");
    assert_eq!(order.size, 30.0);
    assert_eq!(order.status, "finished");
    assert_eq!(order.fill_price, Some(0.951));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_api_error_is_not_retried() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/futures/usdt/orders")
        .with_status(400)
        .with_body(r#"{"label":"REDUCE_ONLY_FAIL","message":"reduce only order failed"}"#)
        .expect(1)
        .create_async()
        .await;

    let result = signed_client(&server)
        .submit_market_order("ASTER_USDT", -30.0, true)
        .await;

    match result {
        Err(GatewayError::Api { status, label, .. }) => {
            assert_eq!(status, 400);
            assert_eq!(label, "REDUCE_ONLY_FAIL");
        }
        other => panic!("unexpected result: {:?}", other),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_server_errors_retried_on_reads() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/futures/usdt/tickers")
        .match_query(Matcher::Any)
        .with_status(503)
        .with_body("Service Unavailable")
        .expect(3)
        .create_async()
        .await;

    let err = assert_err!(public_client(&server).get_ticker("BTC_USDT").await);

    assert!(matches!(err, GatewayError::Api { status: 503, .. }));
    assert!(err.is_transient());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_signed_call_without_credentials() {
    let server = Server::new_async().await;

    let result = public_client(&server).get_position("BTC_USDT").await;
    assert!(matches!(result, Err(GatewayError::MissingCredentials)));

    let result = public_client(&server)
        .submit_market_order("BTC_USDT", 1.0, true)
        .await;
    assert!(matches!(result, Err(GatewayError::MissingCredentials)));
}

#[tokio::test]
async fn test_fractional_size_rounding_to_zero_rejected() {
    let server = Server::new_async().await;

    let result = signed_client(&server)
        .submit_market_order("BTC_USDT", 0.4, true)
        .await;
    assert!(matches!(result, Err(GatewayError::InvalidOrder(_))));
}

#[tokio::test]
async fn test_spot_ticker_matches_pair() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/spot/tickers")
        .match_query(Matcher::UrlEncoded("currency_pair".into(), "BTC_USDT".into()))
        .with_status(200)
        .with_body(r#"[{"currency_pair":"BTC_USDT","last":"49850.1","lowest_ask":"49851"}]"#)
        .create_async()
        .await;

    let price = assert_ok!(public_client(&server).get_spot_ticker("BTC_USDT").await);
    assert_eq!(price, 49850.1);
    mock.assert_async().await;

    server
        .mock("GET", "/spot/tickers")
        .match_query(Matcher::UrlEncoded("currency_pair".into(), "ETH_USDT".into()))
        .with_status(200)
        .with_body(r#"[{"currency_pair":"BTC_USDT","last":"49850.1"}]"#)
        .create_async()
        .await;

    let result = public_client(&server).get_spot_ticker("ETH_USDT").await;
    assert!(matches!(result, Err(GatewayError::MissingTicker(p)) if p == "ETH_USDT"));
}

#[tokio::test]
async fn test_spot_balance_is_signed() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/spot/accounts")
        .match_query(Matcher::UrlEncoded("currency".into(), "USDT".into()))
        .match_header("KEY", "test-key")
        .match_header("SIGN", Matcher::Regex("^[0-9a-f]{128}$".to_string()))
        .with_status(200)
        .with_body(r#"[{"currency":"USDT","available":"120.5","locked":"30"}]"#)
        .create_async()
        .await;

    let balance = assert_ok!(signed_client(&server).get_spot_balance("USDT").await);

    assert_eq!(balance.available, 120.5);
    assert_eq!(balance.total(), 150.5);
    mock.assert_async().await;
}

#[tokio::test]
async fn test_spot_balance_for_unheld_currency_is_zero() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", "/spot/accounts")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let balance = assert_ok!(signed_client(&server).get_spot_balance("BTC").await);
    assert_eq!(balance.currency, "BTC");
    assert_eq!(balance.available, 0.0);
}

#[tokio::test]
async fn test_spot_limit_order_body() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/spot/orders")
        .match_header("KEY", "test-key")
        .match_body(Matcher::PartialJson(json!({
            "currency_pair": "BTC_USDT",
            "type": "limit",
            "account": "spot",
            "side": "buy",
            "amount": "0.001",
            "price": "49500",
            "time_in_force": "gtc"
        })))
        .with_status(201)
        .with_body(
            r#"{"id":"1852454420","text":"t-abc","currency_pair":"BTC_USDT","type":"limit","side":"buy","amount":"0.001","price":"49500","status":"open"}"#,
        )
        .create_async()
        .await;

    let order = assert_ok!(
        signed_client(&server)
            .place_spot_limit_order("BTC_USDT", Direction::Long, 0.001, 49500.0)
            .await
    );

    assert_eq!(order.id, "1852454420");
    assert_eq!(order.side, Direction::Long);
    assert_eq!(order.status, "open");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_spot_order_needs_positive_amount() {
    let server = Server::new_async().await;

    let result = signed_client(&server)
        .place_spot_limit_order("BTC_USDT", Direction::Short, 0.0, 61000.0)
        .await;
    assert!(matches!(result, Err(GatewayError::InvalidOrder(_))));
}

#[tokio::test]
async fn test_open_spot_orders_filtered_by_status() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/spot/orders")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("currency_pair".into(), "BTC_USDT".into()),
            Matcher::UrlEncoded("status".into(), "open".into()),
        ]))
        .match_header("KEY", "test-key")
        .with_status(200)
        .with_body(
            r#"[{"id":"1","currency_pair":"BTC_USDT","side":"sell","amount":"0.001","price":"61000","status":"open"}]"#,
        )
        .create_async()
        .await;

    let orders = assert_ok!(signed_client(&server).list_open_spot_orders("BTC_USDT").await);

    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].side, Direction::Short);
    assert_eq!(orders[0].price, 61000.0);
    mock.assert_async().await;

    let err = assert_err!(public_client(&server).list_open_spot_orders("BTC_USDT").await);
    assert!(matches!(err, GatewayError::MissingCredentials));
}
