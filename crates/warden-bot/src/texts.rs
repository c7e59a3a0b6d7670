//! User-facing message templates. All text is HTML.

use std::time::Duration;

use teloxide::types::UserId;
use teloxide::utils::html;
use warden_types::{BroadcastTally, Counters, SudoGrant, format_elapsed};

pub const HELP: &str = "📚 <b>Available Commands:</b>

<b>For All Users:</b>
/start - Start the bot
/help - Show this help message

<b>For Sudo Users:</b>
/stats - Get bot statistics
/broadcast - Broadcast the replied-to message to all users

<b>For Owner Only:</b>
/addsudo &lt;user_id&gt; - Add sudo user
/rmsudo &lt;user_id&gt; - Remove sudo user
/listsudo - List all sudo users

⚡ <b>Auto Features:</b>
• Accepts every join request
• Mutes new members until they verify
• Posts a verification button in the group
• Unmutes members once they open the link";

pub const NOT_AUTHORIZED: &str = "🚫 You are not allowed to use this command.";

pub const INVALID_LINK: &str = "❌ Invalid verification link!";
pub const WRONG_USER: &str = "❌ This verification link is not for you!";
pub const NOT_PENDING: &str = "⚠️ You are not in the muted list or already unmuted!";
pub const UNMUTE_ADMIN_REQUIRED: &str =
    "❌ Bot lacks admin permissions to unmute you! Please contact group admins.";
pub const UNMUTE_FAILED: &str = "❌ Failed to unmute. Please contact support!";

pub const BROADCAST_NEEDS_REPLY: &str = "❌ Please reply to a message to broadcast it!";
pub const BROADCAST_NO_USERS: &str = "❌ No users found in database!";
pub const BROADCAST_STARTED: &str = "🔄 Broadcasting your message...";

pub const INVALID_USER_ID: &str = "❌ Invalid user ID! Please provide a numeric ID.";
pub const OWNER_ALREADY_SUDO: &str = "❌ Owner is already a sudo user!";
pub const CANNOT_REMOVE_OWNER: &str = "❌ Cannot remove owner from sudo list!";
pub const NO_SUDO_USERS: &str = "📝 No sudo users found.";
pub const PROMOTED: &str = "🎉 <b>Congratulations!</b>

You have been promoted to <b>Sudo User</b> by the bot owner.

You now have access to admin commands like /stats and /broadcast.";
pub const DEMOTED: &str =
    "⚠️ <b>Notice</b>\n\nYour sudo user privileges have been revoked by the bot owner.";

/// Clickable mention of a user by id.
pub fn mention(user_id: UserId, name: &str) -> String {
    format!("<a href=\"tg://user?id={}\">{}</a>", user_id.0, html::escape(name))
}

pub fn start(mention: &str) -> String {
    format!(
        "👋 Hello {mention}!

I'm an <b>Auto Request Accept Bot</b> that works for all channels and groups.

🔹 Add me to your chat with admin rights
🔹 I'll automatically accept all join requests
🔹 New members are muted until they verify
🔹 Members tap the button in the group to unmute

💡 Use /help for more information."
    )
}

pub fn group_welcome(mention: &str) -> String {
    format!(
        "🎉 Welcome, {mention}!

Your join request has been approved! ✅

⚠️ You are currently <b>muted</b> for verification.

👇 Click the button below to unmute yourself:"
    )
}

pub fn unmuted(mention: &str, chat_title: &str) -> String {
    format!(
        "✅ <b>Verification Successful!</b>

🎊 Congratulations, {mention}!

You have been <b>unmuted</b> in <b>{}</b>.

💬 You can now send messages and participate in the group!",
        html::escape(chat_title)
    )
}

/// Short form used for callback alerts, which are capped at 200 characters.
pub fn unmuted_short(chat_title: &str) -> String {
    format!("✅ You have been unmuted in {chat_title}.")
}

pub fn stats(
    users: u64,
    counters: &Counters,
    pending: u64,
    sudo_count: u64,
    owner_id: UserId,
    generated: &str,
) -> String {
    format!(
        "📊 <b>Bot Statistics</b>

👥 Total Users: <code>{users}</code>
✅ Requests Accepted: <code>{}</code>
💌 Group Messages Sent: <code>{}</code>
🔓 Users Unmuted: <code>{}</code>
🔇 Pending Verification: <code>{pending}</code>
🛡️ Sudo Users: <code>{sudo_count}</code>
👑 Owner: <code>{}</code>

📅 Generated: {generated}",
        counters.requests_accepted, counters.messages_sent, counters.users_unmuted, owner_id.0
    )
}

pub fn broadcast_progress(tally: &BroadcastTally) -> String {
    format!(
        "🔄 <b>Broadcasting...</b>

Total: <code>{}</code>
✅ Success: <code>{}</code>
❌ Failed: <code>{}</code>
🗑️ Deleted: <code>{}</code>
🚫 Blocked: <code>{}</code>",
        tally.total, tally.delivered, tally.failed, tally.gone, tally.blocked
    )
}

pub fn broadcast_summary(tally: &BroadcastTally, elapsed: Duration) -> String {
    format!(
        "✅ <b>Broadcast Completed!</b>

⏱️ Time: <code>{}</code>
👥 Total Users: <code>{}</code>
✅ Success: <code>{}</code>
❌ Failed: <code>{}</code>
🗑️ Deleted: <code>{}</code>
🚫 Blocked: <code>{}</code>",
        format_elapsed(elapsed),
        tally.total,
        tally.delivered,
        tally.failed,
        tally.gone,
        tally.blocked
    )
}

pub fn usage(command: &str) -> String {
    format!("❌ Usage: <code>/{command} &lt;user_id&gt;</code>")
}

pub fn already_sudo(user_id: u64) -> String {
    format!("⚠️ User <code>{user_id}</code> is already a sudo user!")
}

pub fn not_sudo(user_id: u64) -> String {
    format!("⚠️ User <code>{user_id}</code> is not a sudo user!")
}

pub fn sudo_added(user_id: u64) -> String {
    format!("✅ User <code>{user_id}</code> added as sudo user successfully!")
}

pub fn sudo_add_failed(user_id: u64) -> String {
    format!("❌ Failed to add user <code>{user_id}</code> as sudo user!")
}

pub fn sudo_removed(user_id: u64) -> String {
    format!("✅ User <code>{user_id}</code> removed from sudo users successfully!")
}

pub fn sudo_remove_failed(user_id: u64) -> String {
    format!("❌ Failed to remove user <code>{user_id}</code> from sudo users!")
}

pub fn sudo_list(grants: &[SudoGrant], owner_id: UserId) -> String {
    let lines: Vec<String> = grants
        .iter()
        .map(|g| format!("• <code>{}</code>", g.user_id))
        .collect();
    format!(
        "🛡️ <b>Sudo Users List</b> ({}):\n\n{}\n\n👑 Owner: <code>{}</code>",
        grants.len(),
        lines.join("\n"),
        owner_id.0
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mention_escapes_names() {
        let m = mention(UserId(42), "<b>Eve</b>");
        assert_eq!(m, "<a href=\"tg://user?id=42\">&lt;b&gt;Eve&lt;/b&gt;</a>");
    }

    #[test]
    fn summary_reports_every_class() {
        let tally = BroadcastTally {
            total: 3,
            delivered: 2,
            failed: 1,
            blocked: 1,
            gone: 0,
        };
        let text = broadcast_summary(&tally, Duration::from_secs(61));
        assert!(text.contains("0:01:01"));
        assert!(text.contains("Success: <code>2</code>"));
        assert!(text.contains("Blocked: <code>1</code>"));
    }
}
