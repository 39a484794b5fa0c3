//! Trust context: environments and the live trust snapshot

mod environment;
mod registry;

pub use environment::{
    resolve_trust_anchor, HubEnvironment, RefreshDelays, ResolvedTrustAnchor, TrustAnchorOverride,
    TrustStores,
};
pub use registry::TrustRegistry;
