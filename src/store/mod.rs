//! Typed persistence operations, one module per entity. Field validation
//! happens here at the store boundary, not in the request handlers.

pub mod clubs;
pub mod contact;
pub mod events;
pub mod feedback;
pub mod users;
