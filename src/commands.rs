use teloxide::utils::command::BotCommands;

#[derive(Debug, Clone, BotCommands)]
#[command(rename_rule = "lowercase")]
pub enum Command {
    #[command(description = "start the funnel from the beginning")]
    Start,
}

/// True for `/start`, including the `/start@botname` form Telegram sends
/// in some clients. The start command pre-empts an in-progress quiz.
pub fn is_start(text: &str) -> bool {
    let text = text.trim();
    text == "/start" || text.starts_with("/start@")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_token_matching() {
        assert!(is_start("/start"));
        assert!(is_start("  /start "));
        assert!(is_start("/start@funnel_bot"));
        assert!(!is_start("/starting"));
        assert!(!is_start("start"));
        assert!(!is_start("Entrepreneur"));
    }
}
