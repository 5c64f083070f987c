//! Chat session management.

use std::{path::PathBuf, sync::Arc};

use parlor_shared::protocol::{ChatMessage, Intent, ProtocolError, read_message, write_message};
use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::{io::BufReader, sync::mpsc};

use crate::{
    command::{ClientCommand, parse_input},
    connection::{CHAT_CONNECT_DEADLINE, RETRY_INTERVAL, connect_with_retry},
    error::ClientError,
    formatter::MessageFormatter,
    transfer::{download_file, upload_file},
    ui::{prompt, redisplay_prompt},
};

/// Where a session connects and stores downloads
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub addr: String,
    pub user_name: String,
    pub download_dir: PathBuf,
}

/// Run the chat session until `/close`, end of input or the server closing
/// the connection.
pub async fn run_client_session(context: SessionContext) -> Result<(), ClientError> {
    println!("Waiting for connection...");
    let intent = Intent::Chat {
        user_name: context.user_name.clone(),
    };
    let stream =
        connect_with_retry(&context.addr, &intent, CHAT_CONNECT_DEADLINE, RETRY_INTERVAL).await?;
    println!("Connection established");

    let (read_half, mut write_half) = stream.into_split();
    let context = Arc::new(context);

    // Spawn a task to handle incoming messages
    let user_name_for_read = context.user_name.clone();
    let mut read_task = tokio::spawn(async move {
        let mut reader = BufReader::new(read_half);
        loop {
            match read_message(&mut reader).await {
                Ok(Some(message)) => {
                    println!("\n{}", MessageFormatter::format_message(&message));
                    redisplay_prompt(&user_name_for_read);
                }
                Ok(None) => {
                    tracing::info!("Server closed the connection");
                    break;
                }
                Err(ProtocolError::Malformed(e)) => {
                    tracing::warn!("Skipping malformed message: {}", e);
                }
                Err(e) => {
                    tracing::warn!("Read error: {}", e);
                    break;
                }
            }
        }
    });

    // Create channel for rustyline input
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    let prompt_text = prompt(&context.user_name);

    // Spawn a blocking thread for rustyline (synchronous readline)
    let _readline_handle = std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(&prompt_text) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            // Channel closed, exit thread
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    // Ctrl+C
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    // Ctrl+D
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    // Spawn a task to turn typed lines into protocol actions
    let mut write_task = tokio::spawn(async move {
        while let Some(line) = input_rx.recv().await {
            match parse_input(&line) {
                ClientCommand::CloseConnection => break,
                ClientCommand::SendFile(path) => spawn_upload(context.clone(), path),
                ClientCommand::DownloadFile(file_name) => {
                    spawn_download(context.clone(), file_name)
                }
                ClientCommand::Message(text) => {
                    let message = ChatMessage::new(context.user_name.as_str(), text);
                    if let Err(e) = write_message(&mut write_half, &message).await {
                        tracing::warn!("Failed to send message: {}", e);
                        break;
                    }
                }
            }
        }
    });

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut read_task => write_task.abort(),
        _ = &mut write_task => read_task.abort(),
    };

    println!("Socket closed");
    Ok(())
}

fn spawn_upload(context: Arc<SessionContext>, path: PathBuf) {
    tokio::spawn(async move {
        println!("Starting file uploading...");
        match upload_file(&context.addr, &context.user_name, &path).await {
            Ok(bytes) => println!("{}", MessageFormatter::format_uploaded(bytes)),
            Err(e) => println!(
                "{}",
                MessageFormatter::format_transfer_error(&path.display().to_string(), "uploading", &e)
            ),
        }
        redisplay_prompt(&context.user_name);
    });
}

fn spawn_download(context: Arc<SessionContext>, file_name: String) {
    tokio::spawn(async move {
        println!("Starting file downloading...");
        match download_file(
            &context.addr,
            &context.user_name,
            &file_name,
            &context.download_dir,
        )
        .await
        {
            Ok((_, bytes)) => println!("{}", MessageFormatter::format_downloaded(&file_name, bytes)),
            Err(e) => println!(
                "{}",
                MessageFormatter::format_transfer_error(&file_name, "downloading", &e)
            ),
        }
        redisplay_prompt(&context.user_name);
    });
}
