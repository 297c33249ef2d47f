pub mod messages;
pub mod record;

pub use messages::Messages;
pub use record::{
    Record, AUTHOR_FIELD, AUTHOR_STATUS_FIELD, CREATED_DATE_FIELD, DEFAULT_STATUS_FIELD, ID_FIELD,
};
