//! Named-component seam for registries that discover schedulers by name.

/// Anything the surrounding framework can list or look up by name.
///
/// The name carries no scheduling meaning.
pub trait Component {
    /// Human-readable, stable name.
    fn name(&self) -> &str;
}
