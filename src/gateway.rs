//! Discord gateway glue
//!
//! Translates serenity events into the pure decision components: voice
//! presence transitions feed the membership tracker, and submission-channel
//! messages feed the upload handler. All Discord- and songbird-specific
//! types stay in this module.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{
    ChannelId, ChannelType, Context, EventHandler, Guild, GuildId, Message, Permissions, Ready,
    UserId, VoiceState,
};
use tokio::sync::Mutex;

use crate::announce::Dispatcher;
use crate::clips::ClipStore;
use crate::presence::{Decision, MemberInfo, MembershipTracker, Seat, VoiceTransition};
use crate::uploads::{ClipUpload, UploadHandler};
use crate::voice::SongbirdSession;

/// Serenity event handler wiring presence and message events
pub struct Gateway {
    dispatcher: Arc<Dispatcher>,
    tracker: Mutex<MembershipTracker>,
    uploads: UploadHandler,
    store: ClipStore,
    submission_channel: String,
}

impl Gateway {
    /// Create the gateway handler
    #[must_use]
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        uploads: UploadHandler,
        store: ClipStore,
        submission_channel: String,
    ) -> Self {
        Self {
            dispatcher,
            tracker: Mutex::new(MembershipTracker::new()),
            uploads,
            store,
            submission_channel,
        }
    }

    async fn execute(&self, ctx: &Context, guild_id: GuildId, decision: Decision) {
        let Some(manager) = songbird::get(ctx).await else {
            tracing::error!("songbird voice client missing");
            return;
        };

        match decision {
            Decision::Connect { channel, announce } => {
                match manager.join(guild_id, ChannelId::new(channel)).await {
                    Ok(call) => {
                        self.tracker.lock().await.confirm_connected(channel);
                        tracing::info!(channel, "joined voice channel");
                        let session = SongbirdSession::new(call);
                        self.dispatcher.announce(&announce, &session).await;
                    }
                    Err(e) => {
                        // Session stays unset; later joins will retry.
                        tracing::error!(channel, error = %e, "failed to join voice channel");
                    }
                }
            }
            Decision::Announce { name } => {
                let Some(call) = manager.get(guild_id) else {
                    tracing::debug!(%name, "no active session, skipping announcement");
                    return;
                };
                let live = call.lock().await.current_connection().is_some();
                if live {
                    let session = SongbirdSession::new(call);
                    self.dispatcher.announce(&name, &session).await;
                } else {
                    tracing::debug!(%name, "voice connection not live, skipping announcement");
                }
            }
            Decision::Disconnect { channel } => {
                if let Err(e) = manager.remove(guild_id).await {
                    tracing::warn!(channel, error = %e, "error leaving voice channel");
                }
                self.tracker.lock().await.clear();
                tracing::info!(channel, "left voice channel");
            }
            Decision::Ignore => {}
        }
    }

    /// Reply in the submissions channel, logging send failures
    async fn reply(ctx: &Context, msg: &Message, content: String) {
        if let Err(e) = msg.channel_id.say(&ctx.http, content).await {
            tracing::warn!(channel = %msg.channel_id, error = %e, "failed to send reply");
        }
    }
}

#[async_trait]
impl EventHandler for Gateway {
    async fn ready(&self, _ctx: Context, ready: Ready) {
        tracing::info!(user = %ready.user.name, "herald connected");
    }

    async fn voice_state_update(&self, ctx: Context, old: Option<VoiceState>, new: VoiceState) {
        let Some(guild_id) = new.guild_id else {
            return;
        };

        let bot_id = ctx.cache.current_user().id;
        let Some(transition) = snapshot_transition(&ctx, guild_id, old.as_ref(), &new) else {
            return;
        };

        // The bot being moved or kicked must not leave the tracker pointing
        // at a session that no longer exists.
        if transition.member.id == bot_id.get() && transition.new.is_none() {
            let mut tracker = self.tracker.lock().await;
            let left = transition.old.map(|seat| seat.channel);
            if tracker.connected_channel() == left {
                tracker.clear();
                tracing::info!("voice connection dropped externally, session cleared");
            }
            return;
        }

        let decision = self.tracker.lock().await.on_transition(&transition);
        self.execute(&ctx, guild_id, decision).await;
    }

    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let channel_name = ctx
            .cache
            .channel(msg.channel_id)
            .map(|channel| channel.name.clone());
        if channel_name.as_deref() != Some(self.submission_channel.as_str()) {
            return;
        }

        if let Some(rest) = msg.content.strip_prefix("!newfile") {
            if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
                return;
            }
            let upload = msg.attachments.first().map(|a| ClipUpload {
                url: a.url.clone(),
                filename: a.filename.clone(),
            });
            let reply = self.uploads.handle(rest, upload.as_ref()).await;
            Self::reply(&ctx, &msg, reply).await;
        } else if msg.content.trim() == "!list" {
            let names = self.store.names();
            let reply = if names.is_empty() {
                "No announcement clips registered yet".to_string()
            } else {
                format!("Registered announcements:\n{}", names.join("\n"))
            };
            Self::reply(&ctx, &msg, reply).await;
        }
    }
}

/// Build the tracker's transition snapshot from the serenity cache
///
/// Returns `None` when the guild or the member cannot be resolved; such
/// events carry nothing the tracker could act on.
fn snapshot_transition(
    ctx: &Context,
    guild_id: GuildId,
    old: Option<&VoiceState>,
    new: &VoiceState,
) -> Option<VoiceTransition> {
    let bot_id = ctx.cache.current_user().id;
    let guild = ctx.cache.guild(guild_id)?;

    let member = member_info_for(&guild, new)?;
    let old_seat = old.and_then(|state| seat(&guild, state, bot_id));
    let new_seat = seat(&guild, new, bot_id);
    let remaining = old_seat.map_or_else(Vec::new, |s| occupants(&guild, s.channel));

    Some(VoiceTransition {
        member,
        old: old_seat,
        new: new_seat,
        remaining,
    })
}

fn member_info_for(guild: &Guild, state: &VoiceState) -> Option<MemberInfo> {
    if let Some(member) = &state.member {
        return Some(MemberInfo {
            id: member.user.id.get(),
            display_name: member.display_name().to_string(),
            is_bot: member.user.bot,
        });
    }
    guild.members.get(&state.user_id).map(|member| MemberInfo {
        id: member.user.id.get(),
        display_name: member.display_name().to_string(),
        is_bot: member.user.bot,
    })
}

fn seat(guild: &Guild, state: &VoiceState, bot_id: UserId) -> Option<Seat> {
    let channel_id = state.channel_id?;
    Some(Seat {
        channel: channel_id.get(),
        joinable: channel_joinable(guild, channel_id, bot_id),
        muted: state.self_mute || state.mute,
    })
}

/// Whether the bot could join this channel: a voice channel it has CONNECT
/// permission in
fn channel_joinable(guild: &Guild, channel_id: ChannelId, bot_id: UserId) -> bool {
    let Some(channel) = guild.channels.get(&channel_id) else {
        return false;
    };
    if channel.kind != ChannelType::Voice {
        return false;
    }
    guild.members.get(&bot_id).is_none_or(|bot| {
        guild
            .user_permissions_in(channel, bot)
            .contains(Permissions::CONNECT)
    })
}

/// Members currently listed in a voice channel
///
/// A member missing from the cache counts as human, so an incompletely
/// cached channel is never mistaken for empty.
fn occupants(guild: &Guild, channel: u64) -> Vec<MemberInfo> {
    guild
        .voice_states
        .values()
        .filter(|state| state.channel_id.is_some_and(|c| c.get() == channel))
        .map(|state| {
            guild.members.get(&state.user_id).map_or_else(
                || MemberInfo {
                    id: state.user_id.get(),
                    display_name: String::new(),
                    is_bot: false,
                },
                |member| MemberInfo {
                    id: member.user.id.get(),
                    display_name: member.display_name().to_string(),
                    is_bot: member.user.bot,
                },
            )
        })
        .collect()
}
