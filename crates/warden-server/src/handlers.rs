use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{ChatJoinRequest, User};
use warden_bot::{
    ButtonPress, Caller, Command, Invocation, JoinRequest, MessageRef, SharedWarden, TelegramApi,
};

type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;
type HandlerResult = Result<(), HandlerError>;
type App = SharedWarden<TelegramApi>;

/// Update routing: private commands, join requests and button presses.
pub fn schema() -> UpdateHandler<HandlerError> {
    dptree::entry()
        .branch(
            Update::filter_message()
                .filter(|msg: Message| msg.chat.is_private())
                .filter_command::<Command>()
                .endpoint(on_command),
        )
        .branch(Update::filter_chat_join_request().endpoint(on_join_request))
        .branch(Update::filter_callback_query().endpoint(on_button))
}

fn caller(user: &User) -> Caller {
    Caller {
        id: user.id,
        username: user.username.clone(),
        first_name: user.first_name.clone(),
    }
}

async fn on_command(app: App, msg: Message, cmd: Command) -> HandlerResult {
    let Some(user) = msg.from.as_ref() else {
        return Ok(());
    };

    let inv = Invocation {
        chat_id: msg.chat.id,
        caller: caller(user),
        reply_to: msg
            .reply_to_message()
            .map(|source| MessageRef::new(source.chat.id, source.id)),
    };
    app.handle_command(&inv, cmd).await;
    Ok(())
}

async fn on_join_request(app: App, req: ChatJoinRequest) -> HandlerResult {
    let request = JoinRequest {
        chat_id: req.chat.id,
        chat_title: req.chat.title().unwrap_or_default().to_string(),
        user_id: req.from.id,
        username: req.from.username.clone(),
        first_name: req.from.first_name.clone(),
    };
    app.handle_join_request(&request).await;
    Ok(())
}

async fn on_button(app: App, q: CallbackQuery) -> HandlerResult {
    let press = ButtonPress {
        callback_id: q.id.clone(),
        caller: caller(&q.from),
        message: q
            .message
            .as_ref()
            .map(|m| MessageRef::new(m.chat().id, m.id())),
        data: q.data.clone().unwrap_or_default(),
    };
    app.handle_button(&press).await;
    Ok(())
}
