//! Membership tracking: when to connect to or leave a voice channel
//!
//! The tracker is a pure state machine over voice-presence transitions. It
//! owns the notion of the single active session (as a channel id) and turns
//! each transition into a [`Decision`]; the gateway layer executes the
//! decision against Discord and reports back with [`MembershipTracker::confirm_connected`]
//! or [`MembershipTracker::clear`].

/// A member as seen in a voice-presence event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberInfo {
    /// Platform user id
    pub id: u64,
    /// Display name used for announcements
    pub display_name: String,
    /// Whether the member is a bot account
    pub is_bot: bool,
}

/// A member's position in a voice channel on one side of a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seat {
    /// Voice channel id
    pub channel: u64,
    /// Whether the bot could join this channel
    pub joinable: bool,
    /// Whether the member is muted
    pub muted: bool,
}

/// A voice-presence transition for one member
#[derive(Debug, Clone)]
pub struct VoiceTransition {
    /// The member the event concerns
    pub member: MemberInfo,
    /// Seat before the transition, if any
    pub old: Option<Seat>,
    /// Seat after the transition, if any
    pub new: Option<Seat>,
    /// Members still listed in the old channel after the transition
    pub remaining: Vec<MemberInfo>,
}

/// What the gateway should do in response to a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// Join the channel (replacing any prior session), then announce
    Connect {
        /// Channel to join
        channel: u64,
        /// Display name to announce after joining
        announce: String,
    },
    /// Already connected to the right channel; announce only
    Announce {
        /// Display name to announce
        name: String,
    },
    /// Leave the channel and clear the session
    Disconnect {
        /// Channel being left
        channel: u64,
    },
    /// No state change, no side effect
    Ignore,
}

/// Tracks the single active voice session and decides on transitions
#[derive(Debug, Default)]
pub struct MembershipTracker {
    connected: Option<u64>,
}

impl MembershipTracker {
    /// Create a tracker with no active session
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Channel the bot is currently connected to, if any
    #[must_use]
    pub const fn connected_channel(&self) -> Option<u64> {
        self.connected
    }

    /// Record a successful join
    pub fn confirm_connected(&mut self, channel: u64) {
        self.connected = Some(channel);
    }

    /// Clear the active session (after leaving, or after a failed join)
    pub fn clear(&mut self) {
        self.connected = None;
    }

    /// Decide what to do about a voice-presence transition
    ///
    /// Does not mutate the session; the caller confirms or clears it once
    /// the corresponding side effect has actually happened.
    #[must_use]
    pub fn on_transition(&self, t: &VoiceTransition) -> Decision {
        if let Some(new) = &t.new {
            if Self::is_arrival(t, new) {
                if self.connected == Some(new.channel) {
                    return Decision::Announce {
                        name: t.member.display_name.clone(),
                    };
                }
                return Decision::Connect {
                    channel: new.channel,
                    announce: t.member.display_name.clone(),
                };
            }
        }

        if let Some(old) = &t.old {
            if self.is_departure(t, old) {
                return Decision::Disconnect {
                    channel: old.channel,
                };
            }
        }

        Decision::Ignore
    }

    /// A non-bot member entering a joinable channel unmuted, where they were
    /// not previously in a channel, were previously muted, or are switching
    /// channels.
    fn is_arrival(t: &VoiceTransition, new: &Seat) -> bool {
        if t.member.is_bot || !new.joinable || new.muted {
            return false;
        }
        match &t.old {
            None => true,
            Some(old) => old.muted || old.channel != new.channel,
        }
    }

    /// A member leaving the channel we are connected to (or that channel
    /// becoming unjoinable), with no non-bot member left behind. The
    /// departing member is excluded from the "who remains" count even when
    /// still listed.
    fn is_departure(&self, t: &VoiceTransition, old: &Seat) -> bool {
        if self.connected != Some(old.channel) {
            return false;
        }
        let gone = t.new.is_none_or(|new| !new.joinable);
        if !gone {
            return false;
        }
        !t.remaining
            .iter()
            .any(|m| m.id != t.member.id && !m.is_bot)
    }
}
