//! Input pipeline tests - terminal key events through the sampler into a session

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyEventState, KeyModifiers};

use blockfall::core::{Board, GameSession, Phase, ScriptedShapes};
use blockfall::input::{map_key, KeySampler, DEFAULT_KEY_RELEASE_TIMEOUT_MS};
use blockfall::types::{Cue, Key, ShapeKind};

fn key(code: KeyCode, kind: KeyEventKind) -> KeyEvent {
    KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind,
        state: KeyEventState::NONE,
    }
}

fn down(code: KeyCode) -> KeyEvent {
    key(code, KeyEventKind::Press)
}

fn o_session() -> GameSession<ScriptedShapes> {
    GameSession::from_board(ScriptedShapes::new([ShapeKind::O]), Board::new(), 0)
}

#[test]
fn test_ctrl_c_and_escape_quit() {
    let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
    assert_eq!(map_key(ctrl_c), Some(Key::Quit));
    assert_eq!(map_key(down(KeyCode::Esc)), Some(Key::Quit));
    assert_eq!(map_key(down(KeyCode::Char('c'))), None);
}

#[test]
fn test_every_logical_key_is_reachable() {
    let codes = [
        KeyCode::Left,
        KeyCode::Right,
        KeyCode::Down,
        KeyCode::Up,
        KeyCode::Char(' '),
        KeyCode::Char('p'),
        KeyCode::Char('r'),
        KeyCode::Char('q'),
    ];
    let mapped: Vec<Key> = codes.into_iter().filter_map(|c| map_key(down(c))).collect();
    assert_eq!(mapped, Key::ALL.to_vec());
}

#[test]
fn test_tap_moves_piece_once() {
    let mut sampler = KeySampler::new();
    let mut session = o_session();
    let x = session.current().x;

    sampler.handle_key(down(KeyCode::Left), 5);
    let _ = session.tick(16, &sampler.sample(16));
    assert_eq!(session.current().x, x - 1);

    // Still held, but inside the lateral repeat delay.
    for now in (32..=96).step_by(16) {
        let _ = session.tick(now, &sampler.sample(now));
    }
    assert_eq!(session.current().x, x - 1);
    assert_eq!(session.drain_cues().collect::<Vec<_>>(), vec![Cue::Move]);
}

#[test]
fn test_auto_repeat_presses_keep_key_held() {
    let mut sampler = KeySampler::new();
    let mut session = o_session();
    let x = session.current().x;

    // Terminal auto-repeat without releases: a fresh press every 120ms.
    let mut now = 0;
    while now <= 240 {
        if now % 120 == 0 {
            sampler.handle_key(down(KeyCode::Left), now);
        }
        let _ = session.tick(now, &sampler.sample(now));
        now += 8;
    }

    // One press at 0, then repeats at 104 and 208.
    assert_eq!(session.current().x, x - 3);
    assert_eq!(session.pending_cues(), &[Cue::Move]);
}

#[test]
fn test_release_timeout_is_configurable() {
    let mut sampler = KeySampler::new();
    assert_eq!(sampler.key_release_timeout_ms(), DEFAULT_KEY_RELEASE_TIMEOUT_MS);

    sampler.handle_key(down(KeyCode::Down), 0);
    assert!(sampler.sample(DEFAULT_KEY_RELEASE_TIMEOUT_MS).is_down(Key::Down));
    assert!(!sampler.sample(DEFAULT_KEY_RELEASE_TIMEOUT_MS + 1).is_down(Key::Down));

    let mut patient = KeySampler::new().with_key_release_timeout_ms(1_000);
    patient.handle_key(down(KeyCode::Down), 0);
    assert!(patient.sample(900).is_down(Key::Down));
}

#[test]
fn test_explicit_release_stops_soft_drop() {
    let mut sampler = KeySampler::new();
    let mut session = o_session();
    let y = session.current().y;

    sampler.handle_key(down(KeyCode::Down), 0);
    sampler.handle_key(key(KeyCode::Down, KeyEventKind::Repeat), 40);
    let _ = session.tick(0, &sampler.sample(0));
    let _ = session.tick(60, &sampler.sample(60));
    assert_eq!(session.current().y, y + 1);

    sampler.handle_key(key(KeyCode::Down, KeyEventKind::Release), 70);
    let _ = session.tick(200, &sampler.sample(200));
    assert_eq!(session.current().y, y + 1);
    assert_eq!(session.score(), 1);
}

#[test]
fn test_pause_and_quit_through_sampler() {
    let mut sampler = KeySampler::new();
    let mut session = o_session();

    sampler.handle_key(down(KeyCode::Char('P')), 1);
    assert!(session.tick(2, &sampler.sample(2)).is_continue());
    assert_eq!(session.phase(), Phase::Paused);

    sampler.handle_key(down(KeyCode::Char('q')), 3);
    assert!(session.tick(4, &sampler.sample(4)).is_break());
}

#[test]
fn test_focus_reset_drops_pending_press() {
    let mut sampler = KeySampler::new();
    let mut session = o_session();

    sampler.handle_key(down(KeyCode::Char(' ')), 1);
    sampler.reset();
    let _ = session.tick(2, &sampler.sample(2));
    assert!(session.board().locked().is_empty());
}
