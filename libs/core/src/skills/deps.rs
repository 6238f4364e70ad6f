use std::sync::Arc;

use crate::collaborators::{AdServerAdapter, FormatRegistry, PrincipalStore, ProductCatalog};

/// Bundles every binding-collaborator trait object a skill handler might
/// need, the way the teacher bundles a `GatewayState`/`QueueConsumer`
/// construction. Handlers take `&Deps`, never the individual `Arc`s, so
/// adding a new collaborator doesn't ripple through every handler's
/// signature.
#[derive(Clone)]
pub struct Deps {
    pub adapter: Arc<dyn AdServerAdapter>,
    pub catalog: Arc<dyn ProductCatalog>,
    pub principals: Arc<dyn PrincipalStore>,
    pub formats: Arc<dyn FormatRegistry>,
    pub default_format_agent_url: String,
}

impl Deps {
    pub fn new(
        adapter: Arc<dyn AdServerAdapter>,
        catalog: Arc<dyn ProductCatalog>,
        principals: Arc<dyn PrincipalStore>,
        formats: Arc<dyn FormatRegistry>,
        default_format_agent_url: impl Into<String>,
    ) -> Self {
        Self {
            adapter,
            catalog,
            principals,
            formats,
            default_format_agent_url: default_format_agent_url.into(),
        }
    }
}
