pub mod command;
pub mod connection;
pub mod quick_commands;
pub mod terminal;

pub use command::render_command_bar;
pub use connection::render_connection_panel;
pub use quick_commands::render_quick_commands;
pub use terminal::render_terminal;
