// Command modules for the tontine CLI

pub mod init_config;
pub mod list;
pub mod open;
pub mod payload;
pub mod show;
pub mod utils;
pub mod watch;
