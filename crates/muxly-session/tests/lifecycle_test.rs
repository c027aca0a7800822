//! End-to-end lifecycle flows against a recording multiplexer.

use std::path::PathBuf;

use muxly_core::{Config, DirEntry, SessionTemplate, Target, Window};
use muxly_session::testing::{Call, RecordingMultiplexer, ScriptedPicker};
use muxly_session::{Answer, KillOutcome, KillRequest, SessionManager};

fn config(always_kill: bool) -> Config {
    let mut config = Config {
        templates: vec![SessionTemplate {
            name: "Default".to_string(),
            path: Some("/".to_string()),
            default: true,
            windows: vec![
                Window::with_command("edit", "nvim"),
                Window::new("term"),
                Window::with_command("git", "lazygit"),
            ],
        }],
        ..Config::default()
    };
    config.settings.always_kill_on_last_session = always_kill;
    config
}

#[test]
fn test_selecting_live_session_never_creates() {
    let config = config(false);
    let mux = RecordingMultiplexer::with_sessions(["api", "web"]).attached_to("notes");
    let manager = SessionManager::new(mux, &config);

    let activation = manager
        .launch(
            "[TMUX] api",
            &Target::ExistingSession("api".to_string()),
            None,
        )
        .unwrap();

    assert_eq!(activation.session, "api");
    assert!(!activation.created);
    let calls = manager.multiplexer().calls();
    assert!(calls.iter().all(|c| !c.is_new_session()), "{calls:?}");
    assert_eq!(calls, vec![Call::SwitchClient("api:1".to_string())]);
}

#[test]
fn test_create_runs_windows_in_order() {
    let config = config(false);
    let manager = SessionManager::new(RecordingMultiplexer::new(), &config);

    let activation = manager
        .launch("app", &Target::Path(DirEntry::new("/srv/app")), None)
        .unwrap();

    assert!(activation.created);
    let dir = PathBuf::from("/srv/app");
    assert_eq!(
        manager.multiplexer().calls(),
        vec![
            Call::NewSession {
                name: "app".to_string(),
                window: Window::with_command("edit", "nvim"),
                dir: dir.clone(),
            },
            Call::NewWindow {
                session: "app".to_string(),
                window: Window::new("term"),
                dir: dir.clone(),
            },
            Call::NewWindow {
                session: "app".to_string(),
                window: Window::with_command("git", "lazygit"),
                dir,
            },
            Call::AttachSession("app:1".to_string()),
        ]
    );
}

#[test]
fn test_indexed_target_falls_back_to_bare_name() {
    let config = config(false);
    let mux = RecordingMultiplexer::with_sessions(["api"])
        .attached_to("notes")
        .rejecting_indexed_targets();
    let manager = SessionManager::new(mux, &config);

    manager.switch("api").unwrap();

    assert_eq!(
        manager.multiplexer().calls(),
        vec![
            Call::SwitchClient("api:1".to_string()),
            Call::SwitchClient("api".to_string()),
        ]
    );
    assert_eq!(manager.multiplexer().current(), Some("api".to_string()));
}

#[test]
fn test_kill_last_session_with_always_kill() {
    let config = config(true);
    let manager = SessionManager::new(RecordingMultiplexer::with_sessions(["api"]), &config);

    let outcome = manager
        .kill(
            KillRequest::session("api"),
            &ScriptedPicker::cancelling(),
            &Answer(true),
        )
        .unwrap();

    assert_eq!(outcome, KillOutcome::ServerKilled);
    let calls = manager.multiplexer().calls();
    assert_eq!(calls, vec![Call::KillServer]);
    assert!(calls.iter().all(|c| !c.is_new_session()));
}

#[test]
fn test_kill_current_last_session_with_always_kill() {
    let config = config(true);
    let manager = SessionManager::new(RecordingMultiplexer::new().attached_to("notes"), &config);

    let outcome = manager
        .kill(
            KillRequest::current(),
            &ScriptedPicker::cancelling(),
            &Answer(true),
        )
        .unwrap();

    assert_eq!(outcome, KillOutcome::ServerKilled);
    assert_eq!(manager.multiplexer().calls(), vec![Call::KillServer]);
}

#[test]
fn test_kill_last_session_without_always_kill() {
    let config = config(false);
    let manager = SessionManager::new(RecordingMultiplexer::with_sessions(["api"]), &config);

    let outcome = manager
        .kill(
            KillRequest::session("api"),
            &ScriptedPicker::cancelling(),
            &Answer(true),
        )
        .unwrap();

    assert_eq!(outcome, KillOutcome::Killed("api".to_string()));
    assert_eq!(
        manager.multiplexer().calls(),
        vec![Call::KillSession("api".to_string())]
    );
}

#[test]
fn test_fallback_reuses_running_primary_session() {
    let config = config(false);
    let mux = RecordingMultiplexer::new().attached_to("notes");
    let manager = SessionManager::new(mux, &config);

    // the first fallback creates the primary session; later ones reuse it
    let outcome = manager
        .kill(
            KillRequest::current(),
            &ScriptedPicker::cancelling(),
            &Answer(true),
        )
        .unwrap();
    assert!(matches!(outcome, KillOutcome::FellBack { .. }));
    assert_eq!(manager.multiplexer().sessions(), vec!["Default".to_string()]);

    let again = manager.open_fallback().unwrap();
    assert!(!again.created);
}
