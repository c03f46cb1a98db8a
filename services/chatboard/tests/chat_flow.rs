//! End-to-end runs of the terminal front end against in-memory storage.

use chatboard_core::{ManualClock, MemoryStorage};
use chatboard_lib::commands::{run, Command};
use chatboard_lib::error::AppError;
use chatboard_lib::state::AppState;
use chrono::{DateTime, Duration, TimeZone, Utc};
use std::sync::Arc;

struct Harness {
    state: AppState,
    clock: Arc<ManualClock>,
}

impl Harness {
    fn new() -> Self {
        let clock = Arc::new(ManualClock::new(
            Utc.with_ymd_and_hms(2023, 6, 15, 9, 0, 0).unwrap(),
        ));
        let state = AppState::new(Arc::new(MemoryStorage::new()), clock.clone());
        Self { state, clock }
    }

    fn now(&self) -> DateTime<Utc> {
        use chatboard_core::Clock;
        self.clock.now()
    }

    async fn run(&self, command: Command) -> chatboard_lib::commands::Outcome {
        run(&self.state, command, &self.now()).await.unwrap()
    }
}

fn register(name: &str, email: &str) -> Command {
    Command::Register {
        name: name.into(),
        email: email.into(),
        gender: Some("female".into()),
        date_of_birth: Some("1990-05-15".into()),
        password: "password123".into(),
    }
}

fn send(text: &str) -> Command {
    Command::Send {
        text: vec![text.to_string()],
    }
}

#[tokio::test]
async fn full_workflow() {
    let h = Harness::new();

    let out = h.run(register("Jane Doe", "jane@example.com")).await;
    assert!(out.ok);
    assert!(out.output.contains("Simple Chat Room"));

    for text in ["First", "Second", "Third"] {
        assert!(h.run(send(text)).await.ok);
        h.clock.advance(Duration::minutes(1));
    }

    let out = h.run(Command::Chat).await;
    let first = out.output.find("First").unwrap();
    let second = out.output.find("Second").unwrap();
    let third = out.output.find("Third").unwrap();
    assert!(first < second && second < third);
    assert!(out.output.contains("3 messages"));

    let out = h.run(Command::Profile).await;
    assert!(out.output.contains("Age"));
    assert!(out.output.contains("33 years"));
    assert!(out.output.contains("jane@example.com"));

    assert!(h.run(Command::Logout).await.ok);
    let out = h.run(Command::Chat).await;
    assert!(!out.ok);
    assert!(out.output.contains("Redirecting to /login"));
}

#[tokio::test]
async fn second_user_sees_first_users_messages() {
    let h = Harness::new();
    h.run(register("Jane Doe", "jane@example.com")).await;
    h.run(send("hello from Jane")).await;
    h.run(Command::Logout).await;

    h.run(register("Sam Roe", "sam@example.com")).await;
    let out = h.run(Command::Chat).await;
    assert!(out.output.contains("Jane Doe: hello from Jane"));
    assert!(out.output.contains("Active user: Sam Roe"));
}

#[tokio::test]
async fn rejections_are_rendered_inline() {
    let h = Harness::new();

    let out = h
        .run(Command::Register {
            name: String::new(),
            email: "not-an-email".into(),
            gender: None,
            date_of_birth: None,
            password: "123".into(),
        })
        .await;
    assert!(!out.ok);
    assert_eq!(
        out.output,
        "Name is required\nInvalid email format\nGender is required\n\
         Date of birth is required\nPassword must be at least 6 characters"
    );

    h.run(register("Jane Doe", "jane@example.com")).await;
    h.run(Command::Logout).await;

    let out = h.run(register("Jane Again", "jane@example.com")).await;
    assert!(!out.ok);
    assert_eq!(out.output, "User with this email already exists");

    let out = h
        .run(Command::Login {
            email: "jane@example.com".into(),
            password: "wrong-password".into(),
        })
        .await;
    assert!(!out.ok);
    assert_eq!(out.output, "Invalid email or password");

    let out = h
        .run(Command::Login {
            email: String::new(),
            password: String::new(),
        })
        .await;
    assert_eq!(out.output, "Please fill in all fields");
    assert!(!h.state.gate.is_authenticated().await.unwrap());
}

#[tokio::test]
async fn compose_rules() {
    let h = Harness::new();

    let out = h.run(send("hello")).await;
    assert!(!out.ok);
    assert_eq!(out.output, "Redirecting to /login");

    h.run(register("Jane Doe", "jane@example.com")).await;

    let out = h.run(send("   ")).await;
    assert!(!out.ok);
    assert_eq!(out.output, "Message cannot be empty");

    let out = h.run(send(&"x".repeat(501))).await;
    assert!(!out.ok);
    assert!(out.output.contains("501/500"));

    assert!(h.state.messages.load_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn routes_follow_the_session() {
    let h = Harness::new();

    let out = h.run(Command::Open { route: "/".into() }).await;
    assert!(out.output.starts_with("Redirecting to /about"));

    h.run(register("Jane Doe", "jane@example.com")).await;
    let out = h.run(Command::Open { route: "/login".into() }).await;
    assert!(out.ok);
    assert!(out.output.starts_with("Redirecting to /chat"));

    let out = h.run(register("Other", "other@example.com")).await;
    assert!(!out.ok);
    assert!(out.output.starts_with("Redirecting to /chat"));
    assert_eq!(h.state.users.users().await.unwrap().len(), 1);

    let out = h
        .run(Command::Login {
            email: "jane@example.com".into(),
            password: "password123".into(),
        })
        .await;
    assert!(!out.ok);
    assert!(out.output.starts_with("Redirecting to /chat"));

    let err = run(&h.state, Command::Open { route: "/admin".into() }, &h.now())
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Input(_)));
}
