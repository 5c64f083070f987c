//! UI utilities for the client.

use std::io::Write;

/// Prompt shown before the user's input
pub fn prompt(user_name: &str) -> String {
    format!("{}> ", user_name)
}

/// Redisplay the prompt after receiving a message
pub fn redisplay_prompt(user_name: &str) {
    print!("{}", prompt(user_name));
    std::io::stdout().flush().ok();
}
