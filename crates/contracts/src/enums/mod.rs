pub mod order_status;
pub mod referrer_status;
pub mod source_class;

pub use order_status::OrderStatus;
pub use referrer_status::ReferrerStatus;
pub use source_class::SourceClass;
