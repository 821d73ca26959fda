//! 端到端通知管线测试
//!
//! 宿主事件 -> NotifyHooks -> NotificationDispatcher -> 渠道

use async_trait::async_trait;
use omp_gotify_notify::config::{NotifyConfig, SummarizerConfig};
use omp_gotify_notify::hooks::{
    AutoRetryEndEvent, EventBus, HostEventHandler, JsonLinesBus, NotifyHooks, StaticSession,
    ToolCallEvent, TurnEndEvent,
};
use omp_gotify_notify::notification::{
    GotifyChannel, GotifyConfig, LlmSummarizer, NotificationChannel, NotificationDispatcher,
    SendResult,
};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 记录推送内容的渠道
#[derive(Default)]
struct RecordingChannel {
    pushed: Mutex<Vec<String>>,
}

impl RecordingChannel {
    fn messages(&self) -> Vec<String> {
        self.pushed.lock().unwrap().clone()
    }
}

#[async_trait]
impl NotificationChannel for RecordingChannel {
    fn name(&self) -> &str {
        "recording"
    }

    async fn push(&self, _title: &str, message: &str) -> SendResult {
        self.pushed.lock().unwrap().push(message.to_string());
        SendResult::Sent
    }
}

/// 每次推送都 panic 的渠道
struct PanickingChannel;

#[async_trait]
impl NotificationChannel for PanickingChannel {
    fn name(&self) -> &str {
        "panicking"
    }

    async fn push(&self, _title: &str, _message: &str) -> SendResult {
        panic!("gateway client exploded")
    }
}

fn hooks_with(config: NotifyConfig) -> (NotifyHooks, Arc<RecordingChannel>) {
    let channel = Arc::new(RecordingChannel::default());
    let dispatcher = NotificationDispatcher::new(config, channel.clone());
    (NotifyHooks::new(Arc::new(dispatcher)), channel)
}

fn session(id: &str) -> StaticSession {
    StaticSession(Some(id.to_string()))
}

fn assistant_turn(text: &str) -> TurnEndEvent {
    TurnEndEvent {
        message: json!({
            "role": "assistant",
            "stopReason": "stop",
            "content": [{"type": "text", "text": text}]
        }),
    }
}

#[tokio::test]
async fn test_turn_complete_without_summarizer() {
    let (hooks, channel) = hooks_with(NotifyConfig::default());

    hooks
        .on_turn_end(assistant_turn("Task finished successfully"), &session("s1"))
        .await;

    assert_eq!(channel.messages(), vec!["✅ Task finished successfully".to_string()]);
}

#[tokio::test]
async fn test_ask_question_notification() {
    let (hooks, channel) = hooks_with(NotifyConfig::default());

    let event = ToolCallEvent {
        tool_name: "ask".to_string(),
        input: json!({"questions": [{"question": "Proceed?"}]}),
    };
    hooks.on_tool_call(event, &session("s1")).await;

    assert_eq!(channel.messages(), vec!["❓ Proceed?".to_string()]);
}

#[tokio::test]
async fn test_retry_failed_is_deduplicated() {
    let (hooks, channel) = hooks_with(NotifyConfig::default());
    let event = AutoRetryEndEvent {
        success: false,
        final_error: json!("rate limited"),
    };

    hooks.on_auto_retry_end(event.clone(), &session("s1")).await;
    hooks.on_auto_retry_end(event.clone(), &session("s1")).await;

    assert_eq!(channel.messages(), vec!["❌ Retry failed: rate limited".to_string()]);

    // 不同 session 不受影响
    hooks.on_auto_retry_end(event, &session("s2")).await;
    assert_eq!(channel.messages().len(), 2);
}

#[tokio::test]
async fn test_disabled_kinds_do_not_push() {
    let config = NotifyConfig {
        notify_complete: false,
        notify_error: false,
        notify_question: false,
        ..NotifyConfig::default()
    };
    let (hooks, channel) = hooks_with(config);

    hooks.on_turn_end(assistant_turn("done"), &session("s1")).await;
    hooks
        .on_tool_call(
            ToolCallEvent {
                tool_name: "ask".to_string(),
                input: json!({}),
            },
            &session("s1"),
        )
        .await;
    hooks
        .on_auto_retry_end(AutoRetryEndEvent::default(), &session("s1"))
        .await;

    assert!(channel.messages().is_empty());
}

#[tokio::test]
async fn test_message_truncated_to_max_chars() {
    let config = NotifyConfig {
        max_chars: 20,
        head: 50,
        tail: 50,
        ..NotifyConfig::default()
    };
    let (hooks, channel) = hooks_with(config);

    hooks
        .on_turn_end(assistant_turn("Implemented the whole feature end to end"), &session("s1"))
        .await;

    let messages = channel.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].chars().count(), 20);
    assert!(messages[0].ends_with("..."));
}

#[tokio::test]
async fn test_handler_panic_does_not_reach_host() {
    let dispatcher = NotificationDispatcher::new(NotifyConfig::default(), Arc::new(PanickingChannel));
    let hooks = NotifyHooks::new(Arc::new(dispatcher));

    // 不应 panic
    hooks.on_turn_end(assistant_turn("done"), &session("s1")).await;
    hooks.on_turn_end(assistant_turn("done again"), &session("s1")).await;
}

#[tokio::test]
async fn test_json_lines_bus_end_to_end() {
    let (hooks, channel) = hooks_with(NotifyConfig::default());
    let mut bus = JsonLinesBus::new();
    bus.subscribe(Arc::new(hooks));

    let input = concat!(
        r#"{"type":"turn_end","sessionId":"s1","event":{"message":{"role":"assistant","stopReason":"error"}}}"#,
        "\n",
        r#"{"type":"tool_call","sessionId":"s1","event":{"toolName":"bash","input":{"command":"ls"}}}"#,
        "\n",
        r#"{"type":"auto_retry_end","sessionId":"s1","event":{"success":true}}"#,
        "\n",
    );
    bus.run(input.as_bytes()).await.unwrap();

    assert_eq!(channel.messages(), vec!["❌ Agent turn failed".to_string()]);
}

#[tokio::test]
async fn test_gotify_and_summarizer_over_http() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(
            json!({"choices": [{"message": {"content": "Refactored config_loader."}}]}),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/message"))
        .and(header("x-gotify-key", "app-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 7})))
        .expect(1)
        .mount(&server)
        .await;

    let summarizer_config = SummarizerConfig {
        model: "mini".to_string(),
        endpoint: server.uri(),
        api_key: "sk-test".to_string(),
        timeout_secs: 5,
        max_input_chars: 5000,
    };
    let config = NotifyConfig {
        gotify_url: server.uri(),
        gotify_token: "app-token".to_string(),
        summarizer: Some(summarizer_config.clone()),
        ..NotifyConfig::default()
    };
    let channel = GotifyChannel::new(GotifyConfig {
        base_url: config.gotify_url.clone(),
        token: config.gotify_token.clone(),
    })
    .unwrap();
    let dispatcher = NotificationDispatcher::new(config, Arc::new(channel))
        .with_summarizer(Arc::new(LlmSummarizer::new(summarizer_config).unwrap()));
    let hooks = NotifyHooks::new(Arc::new(dispatcher));

    let long_text = "I went through the configuration loader, split it into smaller functions, \
                     added tests for every branch and updated the README accordingly.";
    hooks.on_turn_end(assistant_turn(long_text), &session("s1")).await;

    let requests = server.received_requests().await.unwrap();
    let paths: Vec<&str> = requests.iter().map(|r| r.url.path()).collect();
    assert_eq!(paths, vec!["/chat/completions", "/message"]);
    let push = requests[1].body_json::<Value>().unwrap();
    assert_eq!(push["message"], "✅ Refactored config\\_loader\\.");
    assert_eq!(push["title"], "OMP");
}
