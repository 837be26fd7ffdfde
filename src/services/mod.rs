pub mod client;
pub mod delivery;
pub mod job;
pub mod ranges;
pub mod session;
pub mod source;
pub mod validator;

pub use client::{HttpSplitService, SplitService};
pub use delivery::ResultDelivery;
pub use job::JobBuilder;
pub use ranges::RangeList;
pub use session::SplitSession;
pub use validator::{parse_page_number, RangeValidator};
