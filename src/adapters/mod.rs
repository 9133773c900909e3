/// Adapters layer - Infrastructure implementations
///
/// Concrete implementations of the outbound ports: network clients,
/// filesystem access, console reporting, document formatters.
pub mod outbound;
