//! HTTP utilities module
//!
//! Response builders shared by the router and the book handlers.

pub mod response;
