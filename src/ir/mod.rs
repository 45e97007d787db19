pub mod document;
pub mod node;
pub mod query;
pub mod serialize;
pub mod status;

pub use self::document::Document;
pub use self::node::Node;
pub use self::status::Status;
