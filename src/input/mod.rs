mod reader;

pub use reader::{MAX_IMPORT_SIZE, read_chat_file};
