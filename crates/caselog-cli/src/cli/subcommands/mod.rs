mod case;
mod comment;

pub use case::CaseCommands;
pub use comment::CommentCommands;
