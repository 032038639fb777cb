use std::time::Instant;

use exec_inspector::model::{Location, Record};
use exec_inspector::panel::{PanelConfig, PanelView};
use exec_inspector::relay::protocol::{Gesture, Inbound, Outbound, PanelMessage};
use exec_inspector::relay::{MessageRelay, PanelSession};

// Helper to build a contiguous record list starting at cursor 0.
fn make_records(locations_per_record: &[usize]) -> Vec<Record> {
    let mut begin_cursor = 0u64;
    locations_per_record
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            let rec = Record {
                index: i,
                name: format!("Frame#m{}", i),
                frame_depth: 1,
                begin_cursor,
                locations: (0..count)
                    .map(|j| Location::new(format!("app.rb:{}", begin_cursor + j as u64)))
                    .collect(),
                args: None,
            };
            begin_cursor += count as u64;
            rec
        })
        .collect()
}

fn update(records: Vec<Record>, log_index: u64) -> PanelMessage {
    PanelMessage::Host(Inbound::Update { records, log_index })
}

fn history_view(session: &mut PanelSession, msg: PanelMessage) -> exec_inspector::panel::HistoryView {
    let reaction = session.handle(msg, Instant::now()).expect("handled");
    match reaction.view.expect("view rebuilt") {
        PanelView::History(view) => view,
        other => panic!("expected history view, got {:?}", other),
    }
}

#[test]
fn update_snapshot_opens_on_the_live_page() {
    let mut session = PanelSession::new(PanelConfig::default());
    let records = make_records(&vec![1; 120]);
    let view = history_view(&mut session, update(records, 115));

    assert_eq!(view.page, 3);
    assert_eq!(view.max_page, 3);
    assert_eq!(view.frames.len(), 50);
    assert_eq!(view.frames[0].record_index, 70);
    assert!(view.controls.step_back_enabled);
    assert!(view.controls.step_forward_enabled);
}

#[test]
fn clicking_a_historical_location_sends_the_minimal_step_back() {
    // Two records covering cursors [0,3) and [3,5), stopped at the frontier.
    let mut session = PanelSession::new(PanelConfig::default());
    session
        .handle(update(make_records(&[3, 2]), 5), Instant::now())
        .expect("snapshot applied");

    let reaction = session
        .handle(
            PanelMessage::Ui(Gesture::LocationClicked { cursor: 4 }),
            Instant::now(),
        )
        .expect("handled");
    assert_eq!(reaction.outbound, vec![Outbound::GoBackTo { times: 1 }]);
}

#[test]
fn only_one_navigation_request_is_outstanding() {
    let mut session = PanelSession::new(PanelConfig::default());
    session
        .handle(update(make_records(&[3, 2]), 5), Instant::now())
        .expect("snapshot applied");

    let first = session
        .handle(
            PanelMessage::Ui(Gesture::LocationClicked { cursor: 1 }),
            Instant::now(),
        )
        .expect("handled");
    assert_eq!(first.outbound.len(), 1);

    let second = session
        .handle(
            PanelMessage::Ui(Gesture::LocationClicked { cursor: 2 }),
            Instant::now(),
        )
        .expect("handled");
    assert!(second.outbound.is_empty(), "guarded while in flight");

    // The next authoritative snapshot clears the guard.
    session
        .handle(update(make_records(&[3, 2]), 1), Instant::now())
        .expect("snapshot applied");
    let third = session
        .handle(
            PanelMessage::Ui(Gesture::LocationClicked { cursor: 4 }),
            Instant::now(),
        )
        .expect("handled");
    assert_eq!(third.outbound, vec![Outbound::GoTo { times: 3 }]);
}

#[test]
fn step_gestures_respect_history_boundaries() {
    let mut session = PanelSession::new(PanelConfig::default());
    session
        .handle(update(make_records(&[2, 2]), 0), Instant::now())
        .expect("snapshot applied");

    let back = session
        .handle(PanelMessage::Ui(Gesture::StepBack), Instant::now())
        .expect("handled");
    assert!(back.outbound.is_empty(), "cannot step back from index zero");

    let forward = session
        .handle(PanelMessage::Ui(Gesture::StepForward), Instant::now())
        .expect("handled");
    assert_eq!(forward.outbound, vec![Outbound::GoTo { times: 1 }]);
}

#[test]
fn client_page_turns_rerender_without_host_traffic() {
    let mut session = PanelSession::new(PanelConfig::default());
    session
        .handle(update(make_records(&vec![1; 120]), 115), Instant::now())
        .expect("snapshot applied");

    let reaction = session
        .handle(PanelMessage::Ui(Gesture::PrevPage), Instant::now())
        .expect("handled");
    assert!(reaction.outbound.is_empty());
    match reaction.view.expect("view rebuilt") {
        PanelView::History(view) => {
            assert_eq!(view.page, 2);
            assert_eq!(view.frames.len(), 50);
        }
        other => panic!("expected history view, got {:?}", other),
    }
}

#[test]
fn server_paged_logs_turn_pages_through_the_host() {
    let mut session = PanelSession::new(PanelConfig::default());
    let mut logs = make_records(&vec![1; 50]);
    for (i, log) in logs.iter_mut().enumerate() {
        log.index = 50 + i;
        log.begin_cursor = (50 + i) as u64;
    }
    session
        .handle(
            PanelMessage::Host(Inbound::ExecLogsUpdated {
                logs,
                current_log_index: 60,
                total_length: 120,
            }),
            Instant::now(),
        )
        .expect("page applied");

    let reaction = session
        .handle(PanelMessage::Ui(Gesture::NextPage), Instant::now())
        .expect("handled");
    assert_eq!(
        reaction.outbound,
        vec![Outbound::GetExecLogs {
            offset: 100,
            page_size: 50
        }]
    );
}

#[test]
fn filter_gesture_narrows_the_view_client_side() {
    let mut session = PanelSession::new(PanelConfig::default());
    session
        .handle(update(make_records(&[2, 2, 2]), 3), Instant::now())
        .expect("snapshot applied");

    let filtered = history_view(
        &mut session,
        PanelMessage::Ui(Gesture::FilterChanged {
            text: "m1".to_string(),
        }),
    );
    assert_eq!(filtered.frames.len(), 1);
    assert_eq!(filtered.frames[0].record_index, 1);

    let restored = history_view(
        &mut session,
        PanelMessage::Ui(Gesture::FilterChanged {
            text: String::new(),
        }),
    );
    assert_eq!(restored.frames.len(), 3, "empty filter restores the window");
}

#[test]
fn object_and_table_payloads_select_their_view_variant() {
    let mut session = PanelSession::new(PanelConfig::default());

    let reaction = session
        .handle(
            PanelMessage::Host(Inbound::ObjectInspected {
                content: serde_json::json!({"variablesReference": 7}),
            }),
            Instant::now(),
        )
        .expect("handled");
    assert!(matches!(reaction.view, Some(PanelView::Object { .. })));

    let reaction = session
        .handle(
            PanelMessage::Host(Inbound::TableUpdated {
                data: serde_json::json!([["a", 1]]),
            }),
            Instant::now(),
        )
        .expect("handled");
    assert!(matches!(reaction.view, Some(PanelView::Table { .. })));
}

#[test]
fn record_toggle_and_empty_evaluate_pass_through_rules() {
    let mut session = PanelSession::new(PanelConfig::default());

    let reaction = session
        .handle(PanelMessage::Ui(Gesture::StartRecord), Instant::now())
        .expect("handled");
    assert_eq!(reaction.outbound, vec![Outbound::StartRecord]);

    let reaction = session
        .handle(
            PanelMessage::Ui(Gesture::Evaluate {
                expression: String::new(),
                page_size: 30,
            }),
            Instant::now(),
        )
        .expect("handled");
    assert!(reaction.outbound.is_empty(), "empty expressions are dropped");

    let reaction = session
        .handle(
            PanelMessage::Ui(Gesture::Evaluate {
                expression: "user.name".to_string(),
                page_size: 30,
            }),
            Instant::now(),
        )
        .expect("handled");
    assert_eq!(
        reaction.outbound,
        vec![Outbound::Evaluate {
            expression: "user.name".to_string(),
            page_size: 30
        }]
    );
}

#[test]
fn rejected_snapshot_keeps_the_previous_state() {
    let mut session = PanelSession::new(PanelConfig::default());
    session
        .handle(update(make_records(&[2, 2]), 1), Instant::now())
        .expect("snapshot applied");

    let mut broken = make_records(&[2, 2]);
    broken[1].begin_cursor += 3;
    let err = session
        .handle(update(broken, 1), Instant::now())
        .unwrap_err();
    assert!(matches!(
        err,
        exec_inspector::InspectorError::Snapshot(_)
    ));
    assert_eq!(session.controller().log_index(), 1);
}

#[test]
fn framed_messages_drive_the_session_end_to_end() {
    // Feed framed JSON through the transport the relay binary uses.
    let snapshot = serde_json::json!({
        "command": "update",
        "records": [
            {"index": 0, "name": "Foo#bar", "frame_depth": 1, "begin_cursor": 0,
             "locations": [{"name": "a"}, {"name": "b"}, {"name": "c"}]},
            {"index": 1, "name": "Foo#baz", "frame_depth": 2, "begin_cursor": 3,
             "locations": [{"name": "d"}, {"name": "e"}]}
        ],
        "logIndex": 5
    });
    let click = serde_json::json!({"command": "locationClicked", "cursor": 4});

    let mut input = Vec::new();
    for msg in [&snapshot, &click] {
        let json = msg.to_string();
        input.extend(format!("Content-Length: {}\r\n\r\n{}", json.len(), json).into_bytes());
    }

    let mut relay = MessageRelay::new(std::io::Cursor::new(input), Vec::new());
    let mut session = PanelSession::new(PanelConfig::default());
    let mut sent = Vec::new();
    while let Some(msg) = relay.read_message().expect("read frame") {
        let reaction = session.handle(msg, Instant::now()).expect("handled");
        sent.extend(reaction.outbound);
    }

    assert_eq!(sent, vec![Outbound::GoBackTo { times: 1 }]);
}
