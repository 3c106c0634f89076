use redex_tui::{key_to_action, Action, TuiConfig};
use std::{path::PathBuf, time::Duration};

#[test]
fn test_default_tui_config() {
    let config = TuiConfig::default();

    assert_eq!(config.rpc_url, "http://localhost:3030");
    assert_eq!(config.refresh_interval, Duration::from_millis(50));
    assert_eq!(config.data_fetch_interval, Duration::from_millis(100));
    assert!(config.parameters.is_empty());
    assert!(config.source_root.is_none());
}

#[test]
fn test_custom_tui_config() {
    let config = TuiConfig {
        rpc_url: "http://localhost:9545".to_string(),
        program: PathBuf::from("validator.uplc"),
        parameters: vec!["9".to_string()],
        source_root: Some(PathBuf::from("/proj")),
        refresh_interval: Duration::from_millis(500),
        data_fetch_interval: Duration::from_millis(250),
    };

    assert_eq!(config.rpc_url, "http://localhost:9545");
    assert_eq!(config.program, PathBuf::from("validator.uplc"));
    assert_eq!(config.refresh_interval, Duration::from_millis(500));
}

#[test]
fn test_core_keys_are_bound() {
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    let cases = [
        (KeyCode::Char('n'), Action::Next { stride: 1 }),
        (KeyCode::Char('p'), Action::Previous { stride: 1 }),
        (KeyCode::Char('q'), Action::Quit),
        (KeyCode::Char('t'), Action::NextTrace),
        (KeyCode::Char('v'), Action::ToggleSource),
    ];
    for (code, action) in cases {
        let key = KeyEvent::new(code, KeyModifiers::NONE);
        assert_eq!(key_to_action(&key), Some(action));
    }
}
