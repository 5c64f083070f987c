//! Message formatting utilities for client display.

use parlor_shared::protocol::ChatMessage;

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format an incoming chat record as `sender: text`
    pub fn format_message(message: &ChatMessage) -> String {
        format!("{}: {}", message.sender_name, message.text)
    }

    /// Format the result of a finished upload
    pub fn format_uploaded(bytes: u64) -> String {
        format!("File uploaded, bytes uploaded: {}!", bytes)
    }

    /// Format the result of a finished download
    pub fn format_downloaded(file_name: &str, bytes: u64) -> String {
        format!("File {} downloaded, bytes: {}", file_name, bytes)
    }

    /// Format a failed transfer
    pub fn format_transfer_error(file_name: &str, action: &str, error: &dyn std::fmt::Display) -> String {
        format!("Error while {} {}: {}", file_name, action, error)
    }
}
