pub mod deploy;
pub mod environment;
pub mod instance;
pub mod menu;
pub mod project;
pub mod user;
