//! Error conversions at the infrastructure boundary

mod conversions;

pub(crate) use conversions::parse_body;
