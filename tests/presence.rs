//! Membership tracker state-machine tests

use herald_bot::{Decision, MemberInfo, MembershipTracker, Seat, VoiceTransition};

const CHANNEL: u64 = 100;
const OTHER_CHANNEL: u64 = 200;

fn human(id: u64, name: &str) -> MemberInfo {
    MemberInfo {
        id,
        display_name: name.to_string(),
        is_bot: false,
    }
}

fn bot(id: u64) -> MemberInfo {
    MemberInfo {
        id,
        display_name: format!("bot-{id}"),
        is_bot: true,
    }
}

fn seat(channel: u64) -> Seat {
    Seat {
        channel,
        joinable: true,
        muted: false,
    }
}

fn transition(
    member: MemberInfo,
    old: Option<Seat>,
    new: Option<Seat>,
    remaining: Vec<MemberInfo>,
) -> VoiceTransition {
    VoiceTransition {
        member,
        old,
        new,
        remaining,
    }
}

#[test]
fn human_joining_empty_channel_connects_and_announces() {
    let tracker = MembershipTracker::new();
    let t = transition(human(1, "Alice"), None, Some(seat(CHANNEL)), vec![]);

    assert_eq!(
        tracker.on_transition(&t),
        Decision::Connect {
            channel: CHANNEL,
            announce: "Alice".to_string(),
        }
    );
}

#[test]
fn second_human_joining_same_channel_announces_without_rejoin() {
    let mut tracker = MembershipTracker::new();
    tracker.confirm_connected(CHANNEL);

    let t = transition(human(2, "Bob"), None, Some(seat(CHANNEL)), vec![]);

    assert_eq!(
        tracker.on_transition(&t),
        Decision::Announce {
            name: "Bob".to_string(),
        }
    );
}

#[test]
fn human_switching_channels_reconnects() {
    let mut tracker = MembershipTracker::new();
    tracker.confirm_connected(CHANNEL);

    let t = transition(
        human(1, "Alice"),
        Some(seat(CHANNEL)),
        Some(seat(OTHER_CHANNEL)),
        vec![bot(99)],
    );

    assert_eq!(
        tracker.on_transition(&t),
        Decision::Connect {
            channel: OTHER_CHANNEL,
            announce: "Alice".to_string(),
        }
    );
}

#[test]
fn unmuting_in_place_announces() {
    let mut tracker = MembershipTracker::new();
    tracker.confirm_connected(CHANNEL);

    let muted_seat = Seat {
        muted: true,
        ..seat(CHANNEL)
    };
    let t = transition(
        human(1, "Alice"),
        Some(muted_seat),
        Some(seat(CHANNEL)),
        vec![],
    );

    assert_eq!(
        tracker.on_transition(&t),
        Decision::Announce {
            name: "Alice".to_string(),
        }
    );
}

#[test]
fn bot_join_is_ignored() {
    let tracker = MembershipTracker::new();
    let t = transition(bot(99), None, Some(seat(CHANNEL)), vec![]);

    assert_eq!(tracker.on_transition(&t), Decision::Ignore);
}

#[test]
fn muted_join_is_ignored() {
    let tracker = MembershipTracker::new();
    let muted_seat = Seat {
        muted: true,
        ..seat(CHANNEL)
    };
    let t = transition(human(1, "Alice"), None, Some(muted_seat), vec![]);

    assert_eq!(tracker.on_transition(&t), Decision::Ignore);
}

#[test]
fn unjoinable_channel_is_ignored() {
    let tracker = MembershipTracker::new();
    let locked = Seat {
        joinable: false,
        ..seat(CHANNEL)
    };
    let t = transition(human(1, "Alice"), None, Some(locked), vec![]);

    assert_eq!(tracker.on_transition(&t), Decision::Ignore);
}

#[test]
fn rejoining_same_channel_unmuted_announces_again() {
    let mut tracker = MembershipTracker::new();
    tracker.confirm_connected(CHANNEL);

    // Same channel on both sides, not muted on either: not an arrival.
    let t = transition(
        human(1, "Alice"),
        Some(seat(CHANNEL)),
        Some(seat(CHANNEL)),
        vec![],
    );

    assert_eq!(tracker.on_transition(&t), Decision::Ignore);
}

#[test]
fn last_human_leaving_disconnects_when_only_bots_remain() {
    let mut tracker = MembershipTracker::new();
    tracker.confirm_connected(CHANNEL);

    let t = transition(
        human(1, "Alice"),
        Some(seat(CHANNEL)),
        None,
        vec![bot(99)],
    );

    assert_eq!(
        tracker.on_transition(&t),
        Decision::Disconnect { channel: CHANNEL }
    );
}

#[test]
fn human_leaving_with_humans_remaining_keeps_session() {
    let mut tracker = MembershipTracker::new();
    tracker.confirm_connected(CHANNEL);

    let t = transition(
        human(1, "Alice"),
        Some(seat(CHANNEL)),
        None,
        vec![human(2, "Bob"), bot(99)],
    );

    assert_eq!(tracker.on_transition(&t), Decision::Ignore);
}

#[test]
fn departing_member_still_listed_is_excluded_from_remaining() {
    let mut tracker = MembershipTracker::new();
    tracker.confirm_connected(CHANNEL);

    // Alice is still listed in the channel she is leaving.
    let t = transition(
        human(1, "Alice"),
        Some(seat(CHANNEL)),
        None,
        vec![human(1, "Alice"), bot(99)],
    );

    assert_eq!(
        tracker.on_transition(&t),
        Decision::Disconnect { channel: CHANNEL }
    );
}

#[test]
fn departing_bot_does_not_disconnect_while_humans_remain() {
    let mut tracker = MembershipTracker::new();
    tracker.confirm_connected(CHANNEL);

    let t = transition(
        bot(99),
        Some(seat(CHANNEL)),
        None,
        vec![human(1, "Alice")],
    );

    assert_eq!(tracker.on_transition(&t), Decision::Ignore);
}

#[test]
fn leave_in_unconnected_channel_is_ignored() {
    let mut tracker = MembershipTracker::new();
    tracker.confirm_connected(CHANNEL);

    let t = transition(
        human(1, "Alice"),
        Some(seat(OTHER_CHANNEL)),
        None,
        vec![],
    );

    assert_eq!(tracker.on_transition(&t), Decision::Ignore);
}

#[test]
fn channel_turning_unjoinable_counts_as_departure() {
    let mut tracker = MembershipTracker::new();
    tracker.confirm_connected(CHANNEL);

    let locked = Seat {
        joinable: false,
        ..seat(OTHER_CHANNEL)
    };
    let t = transition(
        human(1, "Alice"),
        Some(seat(CHANNEL)),
        Some(locked),
        vec![bot(99)],
    );

    assert_eq!(
        tracker.on_transition(&t),
        Decision::Disconnect { channel: CHANNEL }
    );
}

#[test]
fn full_session_lifecycle() {
    let mut tracker = MembershipTracker::new();

    // Human joins an empty channel: connect and announce.
    let join = transition(human(1, "Alice"), None, Some(seat(CHANNEL)), vec![]);
    let Decision::Connect { channel, announce } = tracker.on_transition(&join) else {
        panic!("expected connect");
    };
    assert_eq!(channel, CHANNEL);
    assert_eq!(announce, "Alice");
    tracker.confirm_connected(channel);
    assert_eq!(tracker.connected_channel(), Some(CHANNEL));

    // The human leaves; only the bot itself remains.
    let leave = transition(
        human(1, "Alice"),
        Some(seat(CHANNEL)),
        None,
        vec![bot(42)],
    );
    assert_eq!(
        tracker.on_transition(&leave),
        Decision::Disconnect { channel: CHANNEL }
    );
    tracker.clear();
    assert_eq!(tracker.connected_channel(), None);
}

#[test]
fn failed_join_leaves_session_unset() {
    let tracker = MembershipTracker::new();

    let t = transition(human(1, "Alice"), None, Some(seat(CHANNEL)), vec![]);
    assert!(matches!(
        tracker.on_transition(&t),
        Decision::Connect { .. }
    ));

    // The gateway never confirmed the join, so nothing is connected and the
    // next arrival decides to connect again.
    assert_eq!(tracker.connected_channel(), None);
    assert!(matches!(
        tracker.on_transition(&t),
        Decision::Connect { .. }
    ));
}
