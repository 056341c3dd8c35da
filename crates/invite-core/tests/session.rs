//! End-to-end sessions driven through the virtual-clock timeline.

use invite_core::headless::{RecordingAudio, RecordingView, SimulatedLibrary};
use invite_core::{
    Controller, Cue, InviteConfig, InviteEventKind, Key, Point, ScreenId, Timeline, Viewport,
    VirtualClock,
};
use proptest::prelude::*;

const PHONE: Viewport = Viewport {
    width: 390.0,
    height: 844.0,
};
const LAPTOP: Viewport = Viewport {
    width: 1440.0,
    height: 900.0,
};

fn session(viewport: Viewport) -> Timeline<RecordingView> {
    let clock = VirtualClock::new();
    let controller = Controller::new(InviteConfig::default(), RecordingView::new(13), clock.clone());
    let mut tl = Timeline::new(controller, clock);
    tl.start(viewport);
    tl
}

fn assert_one_active(tl: &Timeline<RecordingView>) {
    let active = tl.controller().view().active_screens();
    assert_eq!(active, vec![tl.controller().screen()]);
}

// ---------------------------------------------------------------------------
// door
// ---------------------------------------------------------------------------

#[test]
fn phone_reaches_invitation_after_door() {
    let mut tl = session(PHONE);
    tl.run_until_idle();
    assert_eq!(tl.controller().screen(), ScreenId::Invitation);
    assert_eq!(
        tl.controller().events().screen_changes(),
        vec![(4300, ScreenId::Invitation)]
    );
    assert_one_active(&tl);
}

#[test]
fn door_sound_plays_once_even_when_triggered_early() {
    let clock = VirtualClock::new();
    let controller = Controller::new(InviteConfig::default(), RecordingView::new(13), clock.clone())
        .with_audio(RecordingAudio::new());
    let mut tl = Timeline::new(controller, clock);
    tl.start(PHONE);

    // A manual trigger before the automatic one.
    tl.advance_to(500);
    tl.act(|c| c.open_door());
    tl.run_until_idle();

    let played = tl
        .controller()
        .events()
        .filter(|k| matches!(k, InviteEventKind::CuePlayed { cue: Cue::DoorOpen }))
        .count();
    assert_eq!(played, 1);
    assert_eq!(
        tl.controller().events().screen_changes(),
        vec![(2800, ScreenId::Invitation)]
    );
}

#[test]
fn laptop_never_animates() {
    let mut tl = session(LAPTOP);
    assert_eq!(tl.controller().screen(), ScreenId::Invitation);
    tl.run_until_idle();
    assert!(!tl.controller().state().door_opening);
    assert!(tl.controller().view().door_phases().is_empty());
}

// ---------------------------------------------------------------------------
// flipbook
// ---------------------------------------------------------------------------

#[test]
fn flipbook_round_trip_keeps_one_screen_active() {
    let mut tl = session(LAPTOP);
    assert_one_active(&tl);
    tl.act(|c| c.go_to_flipbook());
    assert_one_active(&tl);
    tl.act(|c| c.go_back_to_invitation());
    assert_one_active(&tl);
    tl.act(|c| c.go_to_flipbook());
    assert_one_active(&tl);
    assert_eq!(tl.controller().screen(), ScreenId::Flipbook);
}

#[test]
fn swipes_and_keys_share_navigation() {
    let mut tl = session(LAPTOP);
    tl.act(|c| c.go_to_flipbook());

    tl.act(|c| {
        c.touch_start(Point::new(300.0, 300.0));
        c.touch_end(Point::new(240.0, 305.0))
    });
    assert_eq!(tl.controller().current_page(), 2);

    tl.act(|c| c.key_down(Key::ArrowRight));
    assert_eq!(tl.controller().current_page(), 3);

    tl.act(|c| {
        c.touch_start(Point::new(300.0, 300.0));
        c.touch_end(Point::new(360.0, 305.0))
    });
    assert_eq!(tl.controller().current_page(), 2);
}

#[test]
fn library_session_marks_turned_page() {
    let clock = VirtualClock::new();
    let controller = Controller::new(InviteConfig::default(), RecordingView::new(13), clock.clone())
        .with_turner_factory(SimulatedLibrary);
    let mut tl = Timeline::new(controller, clock);
    tl.start(LAPTOP);
    tl.act(|c| c.go_to_flipbook());
    tl.act(|c| c.next_page());
    tl.act(|c| c.next_page());
    let view = tl.controller().view();
    assert_eq!(view.page_info(), "3 / 13");
    assert_eq!(view.markers(3), vec![invite_core::PageMarker::Turned]);
    assert!(view.markers(2).is_empty());
}

#[test]
fn event_log_snapshot() {
    let mut tl = session(PHONE);
    tl.run_until_idle();
    tl.act(|c| c.go_to_flipbook());
    tl.act(|c| c.next_page());

    let rendered = tl
        .controller()
        .events()
        .events()
        .iter()
        .map(|e| format!("{}ms {}", e.at_ms, e.description))
        .collect::<Vec<_>>()
        .join("\n");
    insta::assert_snapshot!(rendered, @r"
    2000ms door-open sound
    2000ms door zooming
    2800ms door opening
    4300ms door -> invitation
    4300ms invitation -> flipbook
    4300ms Manual viewer built
    4300ms page-flip sound
    4300ms page 2 / 13
    ");
}

proptest! {
    #[test]
    fn desktop_widths_skip_the_door(width in 1024.0f64..4000.0) {
        let mut tl = session(Viewport::new(width, 900.0));
        prop_assert_eq!(tl.controller().screen(), ScreenId::Invitation);
        tl.run_until_idle();
        prop_assert!(!tl.controller().state().door_opening);
    }

    #[test]
    fn mobile_widths_open_at_2300ms_after_trigger(width in 200.0f64..1023.9) {
        let mut tl = session(Viewport::new(width, 900.0));
        tl.run_until_idle();
        prop_assert_eq!(
            tl.controller().events().screen_changes(),
            vec![(4300, ScreenId::Invitation)]
        );
    }

    #[test]
    fn page_stays_in_bounds(moves in proptest::collection::vec(0u8..4, 0..60)) {
        let mut tl = session(LAPTOP);
        tl.act(|c| c.go_to_flipbook());
        for m in moves {
            tl.act(|c| match m {
                0 => c.next_page(),
                1 => c.previous_page(),
                2 => { c.key_down(Key::Space); }
                _ => { c.key_down(Key::ArrowLeft); }
            });
            let page = tl.controller().current_page();
            prop_assert!((1..=13).contains(&page));
            prop_assert_eq!(tl.controller().view().visible_pages(), vec![page]);
        }
    }
}
