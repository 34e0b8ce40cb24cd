#![allow(clippy::unwrap_used, clippy::expect_used)]
//! End-to-end webhook tests: a real gateway talking to in-process mock
//! Gemini and LINE APIs.

use std::{
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use {
    axum::{
        Json, Router,
        extract::{OriginalUri, State},
        routing::post,
    },
    secrecy::Secret,
    serde_json::{Value, json},
    tokio::net::TcpListener,
};

use {
    bilingo_auto_reply::{EventDispatcher, RETRACTION_NOTICE, RetractionTracker},
    bilingo_channels::ChannelOutbound,
    bilingo_gateway::{AppState, bind_addr, build_app},
    bilingo_line::{LineAccountConfig, LineOutbound},
    bilingo_providers::{CompletionProvider, GeminiProvider},
};

type Calls = Arc<Mutex<Vec<(String, Value)>>>;

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn record_call(
    State(calls): State<Calls>,
    OriginalUri(uri): OriginalUri,
    Json(body): Json<Value>,
) -> Json<Value> {
    calls.lock().unwrap().push((uri.path().to_string(), body));
    Json(json!({}))
}

async fn gemini_answer(State(calls): State<Calls>, Json(body): Json<Value>) -> Json<Value> {
    calls.lock().unwrap().push(("gemini".into(), body));
    Json(json!({
        "candidates": [{
            "content": { "parts": [{ "text": "English: Good morning.\nChinese: 早安。" }] }
        }]
    }))
}

struct Harness {
    gateway: SocketAddr,
    line_calls: Calls,
    gemini_calls: Calls,
}

struct Backends {
    state: AppState,
    line_calls: Calls,
    gemini_calls: Calls,
}

async fn backends() -> Backends {
    let line_calls = Calls::default();
    let line = serve(
        Router::new()
            .route("/v2/bot/message/{kind}", post(record_call))
            .with_state(Arc::clone(&line_calls)),
    )
    .await;

    let gemini_calls = Calls::default();
    let gemini = serve(
        Router::new()
            .route("/v1beta/models/{*rest}", post(gemini_answer))
            .with_state(Arc::clone(&gemini_calls)),
    )
    .await;

    let provider = GeminiProvider::new(
        Secret::new("gemini-key".into()),
        "gemini-pro",
        format!("http://{gemini}"),
        Duration::from_secs(5),
    )
    .unwrap();
    let outbound = LineOutbound::new(
        LineAccountConfig::new(Secret::new("line-token".into()))
            .with_api_base_url(format!("http://{line}")),
    )
    .unwrap();
    let dispatcher = EventDispatcher::new(
        Arc::new(provider) as Arc<dyn CompletionProvider>,
        Arc::new(outbound) as Arc<dyn ChannelOutbound>,
        Arc::new(RetractionTracker::new(86_400, 100)),
    );

    Backends {
        state: AppState::new(Arc::new(dispatcher)),
        line_calls,
        gemini_calls,
    }
}

async fn start_at(webhook_path: &str) -> Harness {
    let b = backends().await;
    Harness {
        gateway: serve(build_app(b.state, webhook_path)).await,
        line_calls: b.line_calls,
        gemini_calls: b.gemini_calls,
    }
}

async fn start() -> Harness {
    start_at("/webhook").await
}

async fn post_webhook(addr: SocketAddr, body: String) -> (u16, String) {
    let resp = reqwest::Client::new()
        .post(format!("http://{addr}/webhook"))
        .header("content-type", "application/json")
        .body(body)
        .send()
        .await
        .unwrap();
    (resp.status().as_u16(), resp.text().await.unwrap())
}

async fn tracked(addr: SocketAddr) -> u64 {
    let health: Value = reqwest::get(format!("http://{addr}/health"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(health["status"], "ok");
    health["tracked_messages"].as_u64().unwrap()
}

fn text_event(id: &str, text: &str) -> Value {
    json!({
        "type": "message",
        "replyToken": format!("rt-{id}"),
        "source": { "type": "user", "userId": "U1" },
        "message": { "type": "text", "id": id, "text": text }
    })
}

fn unsend_event(id: &str) -> Value {
    json!({
        "type": "unsend",
        "source": { "type": "user", "userId": "U1" },
        "unsend": { "messageId": id }
    })
}

#[tokio::test]
async fn message_is_answered_and_retraction_is_acknowledged() {
    let h = start().await;

    let (status, text) = post_webhook(
        h.gateway,
        json!({ "destination": "Ubot", "events": [text_event("m1", "good morning")] }).to_string(),
    )
    .await;
    assert_eq!((status, text.as_str()), (200, "OK"));
    assert_eq!(tracked(h.gateway).await, 1);

    {
        let calls = h.line_calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "/v2/bot/message/reply");
        assert_eq!(
            calls[0].1,
            json!({
                "replyToken": "rt-m1",
                "messages": [{ "type": "text", "text": "Good morning.\n\n早安。" }]
            })
        );
    }
    {
        let prompts = h.gemini_calls.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        let prompt = prompts[0].1["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap();
        assert!(prompt.contains("good morning"));
    }

    let (status, _) = post_webhook(
        h.gateway,
        json!({ "events": [unsend_event("m1"), unsend_event("m1")] }).to_string(),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(tracked(h.gateway).await, 0);

    let calls = h.line_calls.lock().unwrap();
    assert_eq!(calls.len(), 2, "second retraction must not push again");
    assert_eq!(calls[1].0, "/v2/bot/message/push");
    assert_eq!(
        calls[1].1,
        json!({ "to": "U1", "messages": [{ "type": "text", "text": RETRACTION_NOTICE }] })
    );
}

#[tokio::test]
async fn unparsable_body_still_gets_ok() {
    let h = start().await;

    let (status, text) = post_webhook(h.gateway, "not json".into()).await;
    assert_eq!((status, text.as_str()), (200, "OK"));
    assert!(h.line_calls.lock().unwrap().is_empty());
    assert!(h.gemini_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn ignored_events_produce_no_calls() {
    let h = start().await;

    let body = json!({
        "events": [
            {
                "type": "message",
                "replyToken": "rt-s",
                "source": { "type": "user", "userId": "U1" },
                "message": { "type": "sticker", "id": "s1", "packageId": "1", "stickerId": "2" }
            },
            { "type": "follow", "replyToken": "rt-f", "source": { "type": "user", "userId": "U1" } },
            text_event("m2", "😀 🎉"),
            unsend_event("never-seen")
        ]
    });
    let (status, _) = post_webhook(h.gateway, body.to_string()).await;
    assert_eq!(status, 200);
    assert!(h.line_calls.lock().unwrap().is_empty());
    assert!(h.gemini_calls.lock().unwrap().is_empty());
    assert_eq!(tracked(h.gateway).await, 0);
}

#[tokio::test]
async fn home_route_shows_banner() {
    let h = start().await;
    let text = reqwest::get(format!("http://{}/", h.gateway))
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert_eq!(text, bilingo_gateway::server::BANNER);
}

#[tokio::test]
async fn group_message_without_sender_is_answered_but_not_tracked() {
    let h = start().await;

    let body = json!({
        "events": [
            {
                "type": "message",
                "replyToken": "rt-g1",
                "source": { "type": "group", "groupId": "G1" },
                "message": { "type": "text", "id": "g1", "text": "good morning" }
            },
            unsend_event("g1")
        ]
    });
    let (status, _) = post_webhook(h.gateway, body.to_string()).await;
    assert_eq!(status, 200);
    assert_eq!(tracked(h.gateway).await, 0);

    let calls = h.line_calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "/v2/bot/message/reply");
    assert_eq!(calls[0].1["replyToken"], "rt-g1");
}

#[tokio::test]
async fn doubled_leading_slash_serves_single_slash_route() {
    let h = start_at("//webhook").await;
    let (status, text) = post_webhook(h.gateway, json!({ "events": [] }).to_string()).await;
    assert_eq!((status, text.as_str()), (200, "OK"));
}

#[tokio::test]
async fn gateway_serves_on_ipv6_loopback() {
    let b = backends().await;
    let listener = TcpListener::bind(bind_addr("::1", 0).unwrap()).await.unwrap();
    let addr = listener.local_addr().unwrap();
    assert!(addr.is_ipv6());
    tokio::spawn(async move {
        bilingo_gateway::serve(listener, "/webhook", b.state).await.unwrap();
    });

    let (status, text) = post_webhook(addr, json!({ "events": [] }).to_string()).await;
    assert_eq!((status, text.as_str()), (200, "OK"));
    assert_eq!(tracked(addr).await, 0);
}

#[cfg(feature = "prometheus")]
#[tokio::test]
async fn metrics_route_without_recorder_is_unavailable() {
    let h = start().await;
    let resp = reqwest::get(format!("http://{}/metrics", h.gateway))
        .await
        .unwrap();
    assert_eq!(resp.status().as_u16(), 503);
}
