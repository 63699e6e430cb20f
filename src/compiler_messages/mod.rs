pub mod compiler_dev_logging;
pub mod compiler_errors;
pub mod compiler_warnings;
pub mod display_messages;
