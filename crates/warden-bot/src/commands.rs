use teloxide::utils::command::BotCommands;
use warden_types::Role;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "start the bot")]
    Start(String),
    #[command(description = "show help")]
    Help,
    #[command(description = "bot statistics")]
    Stats,
    #[command(description = "broadcast the replied-to message to every user")]
    Broadcast,
    #[command(description = "grant sudo to a user id")]
    AddSudo(String),
    #[command(description = "revoke sudo from a user id")]
    RmSudo(String),
    #[command(description = "list sudo users")]
    ListSudo,
}

impl Command {
    pub fn required_role(&self) -> Role {
        match self {
            Self::Start(_) | Self::Help => Role::Anonymous,
            Self::Stats | Self::Broadcast => Role::Sudo,
            Self::AddSudo(_) | Self::RmSudo(_) | Self::ListSudo => Role::Owner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands_with_arguments() {
        assert_eq!(
            Command::parse("/start unmute_100_42", "warden_bot").unwrap(),
            Command::Start("unmute_100_42".into())
        );
        assert_eq!(
            Command::parse("/addsudo 77", "warden_bot").unwrap(),
            Command::AddSudo("77".into())
        );
        assert_eq!(
            Command::parse("/listsudo", "warden_bot").unwrap(),
            Command::ListSudo
        );
    }

    #[test]
    fn roles_per_command() {
        assert_eq!(Command::Help.required_role(), Role::Anonymous);
        assert_eq!(Command::Broadcast.required_role(), Role::Sudo);
        assert_eq!(Command::RmSudo(String::new()).required_role(), Role::Owner);
    }
}
