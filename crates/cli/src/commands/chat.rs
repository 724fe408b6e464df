//! Support chat commands.

use nebula_core::ChatSender;
use nebula_storefront::models::ChatMessage;
use nebula_storefront::{AppError, AppState};

#[allow(clippy::print_stdout)]
pub async fn send(state: &AppState, message: &str) -> Result<(), AppError> {
    let messages = state.chat().send(message).await?;
    if let Some(reply) = messages.iter().find(|m| m.sender == ChatSender::Bot) {
        println!("{}", reply.text);
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
pub async fn history(state: &AppState) -> Result<(), AppError> {
    let transcript = state.chat().history().await?;
    if transcript.is_empty() {
        println!("No messages yet");
    }
    for message in &transcript {
        print_message(message);
    }
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_message(message: &ChatMessage) {
    let who = match message.sender {
        ChatSender::User => "you",
        ChatSender::Bot => "bot",
    };
    println!("[{}] {who}: {}", message.timestamp.format("%Y-%m-%d %H:%M"), message.text);
}
