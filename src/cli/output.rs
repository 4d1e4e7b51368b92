use colored::Colorize;

pub fn info(message: &str) {
    println!("{}", message.green());
}

pub fn warning(message: &str) {
    println!("{}", message.yellow());
}

/// Bot replies print unstyled so they read like chat messages.
pub fn reply(text: &str) {
    println!("{text}");
}
