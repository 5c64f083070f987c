//! Chat session handler.
//!
//! One reader task routes every received line through the room-command
//! grammar; one writer task drains the session's outbound channel onto the
//! socket. When either side stops, the session is torn down exactly once.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use parlor_shared::protocol::{ChatMessage, read_line, write_message};
use tokio::{
    io::{AsyncWriteExt, BufReader},
    net::tcp::{OwnedReadHalf, OwnedWriteHalf},
    sync::mpsc,
};

use crate::{
    domain::{PusherChannel, RoomCommand, UserName},
    ui::state::AppState,
    usecase::join_names,
};

/// Reply to `/publish` and `/download` typed into the chat
pub const TRANSFER_HINT: &str =
    "Files are transferred with the client's /send <path> and /download <file> commands";

/// A chat session that passed the name check
struct Session {
    user_name: UserName,
    sender: PusherChannel,
    terminated: AtomicBool,
}

impl Session {
    fn new(user_name: UserName, sender: PusherChannel) -> Self {
        Self {
            user_name,
            sender,
            terminated: AtomicBool::new(false),
        }
    }

    /// Server-authored reply to this session only
    fn reply(&self, text: impl Into<String>) {
        if self.sender.send(ChatMessage::from_server(text)).is_err() {
            tracing::debug!("Reply to '{}' dropped, session is closing", self.user_name);
        }
    }

    /// Leave the room and the directory. Runs at most once per session.
    async fn terminate(&self, state: &AppState) {
        if self.terminated.swap(true, Ordering::SeqCst) {
            return;
        }
        state
            .disconnect_user_usecase
            .execute(&self.user_name, &self.sender)
            .await;
        tracing::info!("'{}' disconnected", self.user_name);
    }
}

/// Run a chat session until the client or the socket goes away.
pub async fn run_session(
    reader: BufReader<OwnedReadHalf>,
    writer: OwnedWriteHalf,
    user_name: String,
    state: Arc<AppState>,
) {
    let user_name = match UserName::new(user_name) {
        Ok(user_name) => user_name,
        Err(e) => {
            tracing::warn!("Rejecting connection: {}", e);
            reject(writer, e.to_string()).await;
            return;
        }
    };

    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();
    if let Err(e) = state
        .connect_user_usecase
        .execute(user_name.clone(), tx.clone())
        .await
    {
        tracing::warn!("Rejecting '{}': {}", user_name, e);
        reject(writer, e.to_string()).await;
        return;
    }
    tracing::info!("'{}' connected", user_name);

    let session = Arc::new(Session::new(user_name, tx));

    let mut send_task = pusher_loop(rx, writer);
    let mut recv_task = tokio::spawn(receive_loop(reader, session.clone(), state.clone()));

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Teardown runs only here, after both tasks have stopped
    session.terminate(&state).await;
}

/// Tell the client why it was refused and close the connection
async fn reject(mut writer: OwnedWriteHalf, reason: String) {
    if let Err(e) = write_message(&mut writer, &ChatMessage::from_server(reason)).await {
        tracing::debug!("Failed to send rejection: {}", e);
    }
    if let Err(e) = writer.shutdown().await {
        tracing::debug!("Failed to close rejected connection: {}", e);
    }
}

/// Spawns a task that receives messages from the rx channel and writes them
/// to the socket.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<ChatMessage>,
    mut writer: OwnedWriteHalf,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if let Err(e) = write_message(&mut writer, &message).await {
                tracing::warn!("Failed to write to client: {}", e);
                break;
            }
        }
    })
}

async fn receive_loop(
    mut reader: BufReader<OwnedReadHalf>,
    session: Arc<Session>,
    state: Arc<AppState>,
) {
    loop {
        match read_line(&mut reader).await {
            Ok(Some(line)) if line.trim().is_empty() => continue,
            Ok(Some(line)) => handle_line(&session, &state, line).await,
            Ok(None) => {
                tracing::debug!("'{}' closed the connection", session.user_name);
                break;
            }
            Err(e) => {
                tracing::warn!("Failed to read from '{}': {}", session.user_name, e);
                break;
            }
        }
    }
}

async fn handle_line(session: &Session, state: &AppState, line: String) {
    let message = match ChatMessage::decode(&line) {
        Ok(message) => message,
        Err(e) => {
            tracing::debug!(
                "Line from '{}' is not a chat record ({}), treating it as text",
                session.user_name,
                e
            );
            ChatMessage::new(session.user_name.as_str(), line)
        }
    };
    tracing::debug!("Message received from '{}': {:?}", session.user_name, message);

    match RoomCommand::parse(&message.text) {
        RoomCommand::ListAllClients => {
            session.reply(join_names(&state.list_clients_usecase.all().await));
        }
        RoomCommand::ListClientsInRoom(room_name) => {
            session.reply(join_names(
                &state.list_clients_usecase.in_room(&room_name).await,
            ));
        }
        RoomCommand::CreateRoom(room_name) => {
            match state
                .create_room_usecase
                .execute(&session.user_name, room_name.clone())
                .await
            {
                Ok(()) => session.reply(format!("New room \"{}\" created", room_name)),
                Err(e) => session.reply(e.to_string()),
            }
        }
        RoomCommand::JoinRoom(room_name) => {
            match state
                .join_room_usecase
                .execute(&session.user_name, &room_name)
                .await
            {
                Ok(_) => session.reply(format!("You joined the room {}", room_name)),
                Err(e) => session.reply(e.to_string()),
            }
        }
        RoomCommand::QuitRoom => match state.quit_room_usecase.execute(&session.user_name).await {
            Ok(departure) => session.reply(format!(
                "You have successfully quit the room {}",
                departure.room
            )),
            Err(e) => session.reply(e.to_string()),
        },
        RoomCommand::PublishFile(_) | RoomCommand::DownloadFile(_) => session.reply(TRANSFER_HINT),
        RoomCommand::Unknown => {
            if let Err(e) = state
                .send_message_usecase
                .execute(&session.user_name, message)
                .await
            {
                tracing::debug!("Dropped message from '{}': {}", session.user_name, e);
            }
        }
    }
}
