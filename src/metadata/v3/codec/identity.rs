/// The identifier for the `identity` codec.
pub const IDENTIFIER: &str = "identity";
