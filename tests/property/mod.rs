// Property-based tests
// Random event sets and ranges checked against alignment and range invariants

mod alignment_properties;
mod range_properties;
