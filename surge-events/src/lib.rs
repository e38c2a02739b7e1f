//! Event confirmation for surge
//!
//! The backend finishes connection, issuance and proof workflows
//! asynchronously. [`EventPoller`] turns that into a yes/no answer by
//! querying the event-status endpoint under a bounded backoff schedule;
//! [`StreamListener`] is the long-lived streaming alternative.

pub mod parse;
pub mod poller;
pub mod request;
pub mod source;
pub mod stream;

pub use parse::{parse_body, EventBody};
pub use poller::EventPoller;
pub use request::{EventError, PollRequest, Topic};
pub use source::EventSource;
pub use stream::{StreamListener, StreamSettings};
