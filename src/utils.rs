use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use ureq::{Agent, AgentBuilder};

use crate::config::Config;

pub fn agent(config: &Config) -> Agent {
    AgentBuilder::new()
        .timeout(config.timeout())
        .user_agent(&config.user_agent)
        .build()
}

pub fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner().with_style(
        ProgressStyle::with_template("{spinner} {msg} [{elapsed}]").expect("hardcoded"),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
