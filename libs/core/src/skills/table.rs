//! The skill table is the single source of truth for which skill names the
//! dispatcher accepts on the explicit-skill path and which the agent-card
//! endpoint advertises — defined once here so the two can never drift, per
//! the component design's note that the agent card is "built from the same
//! skill table the dispatcher's explicit-skill path uses."

#[derive(Debug, Clone, Copy)]
pub struct SkillDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    /// `true` for names kept only for backward compatibility with the
    /// original skill set; these delegate to a canonical handler rather
    /// than carrying their own business logic.
    pub legacy_alias: bool,
    /// `true` for discovery-style skills that serve an anonymous catalog
    /// when no bearer token is presented. A token that *is* presented must
    /// still resolve to a valid principal; only its absence is tolerated.
    pub auth_optional: bool,
}

pub const SKILL_TABLE: &[SkillDescriptor] = &[
    SkillDescriptor {
        name: "get_products",
        description: "Discover products matching a brief and/or structured filters.",
        legacy_alias: false,
        auth_optional: true,
    },
    SkillDescriptor {
        name: "create_media_buy",
        description: "Create a media buy from one or more packages.",
        legacy_alias: false,
        auth_optional: false,
    },
    SkillDescriptor {
        name: "update_media_buy",
        description: "Update an existing media buy's packages, schedule, or budget.",
        legacy_alias: false,
        auth_optional: false,
    },
    SkillDescriptor {
        name: "get_media_buy_delivery",
        description: "Retrieve delivery/performance totals for one or more media buys.",
        legacy_alias: false,
        auth_optional: false,
    },
    SkillDescriptor {
        name: "sync_creatives",
        description: "Upload or update creatives and assign them to packages.",
        legacy_alias: false,
        auth_optional: false,
    },
    SkillDescriptor {
        name: "list_creatives",
        description: "List previously synced creatives.",
        legacy_alias: false,
        auth_optional: false,
    },
    SkillDescriptor {
        name: "list_creative_formats",
        description: "List creative formats this agent's inventory accepts.",
        legacy_alias: false,
        auth_optional: true,
    },
    SkillDescriptor {
        name: "list_authorized_properties",
        description: "List publisher properties this principal is authorized to sell against.",
        legacy_alias: false,
        auth_optional: true,
    },
    SkillDescriptor {
        name: "get_signals",
        description: "Discover available audience/contextual/geographic signals.",
        legacy_alias: false,
        auth_optional: false,
    },
    SkillDescriptor {
        name: "search_signals",
        description: "Alias of get_signals, retained from the original dual skill naming.",
        legacy_alias: true,
        auth_optional: false,
    },
    SkillDescriptor {
        name: "activate_signal",
        description: "Activate a signal for delivery on a platform.",
        legacy_alias: false,
        auth_optional: false,
    },
    SkillDescriptor {
        name: "update_performance_index",
        description: "Submit package-level performance data back to the agent.",
        legacy_alias: false,
        auth_optional: false,
    },
    SkillDescriptor {
        name: "approve_creative",
        description: "Legacy alias: approves a pending creative via sync_creatives.",
        legacy_alias: true,
        auth_optional: false,
    },
    SkillDescriptor {
        name: "get_media_buy_status",
        description: "Legacy alias of get_media_buy_delivery.",
        legacy_alias: true,
        auth_optional: false,
    },
    SkillDescriptor {
        name: "optimize_media_buy",
        description: "Legacy alias: re-expresses an optimization request as update_media_buy.",
        legacy_alias: true,
        auth_optional: false,
    },
    SkillDescriptor {
        name: "get_pricing",
        description: "Legacy alias: returns get_products filtered to pricing_options only.",
        legacy_alias: true,
        auth_optional: true,
    },
    SkillDescriptor {
        name: "get_targeting",
        description: "Legacy alias: returns get_products filtered to targeting-relevant fields only.",
        legacy_alias: true,
        auth_optional: true,
    },
];

pub fn find(name: &str) -> Option<&'static SkillDescriptor> {
    SKILL_TABLE.iter().find(|s| s.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_canonical_skill_is_findable() {
        assert!(find("get_products").is_some());
        assert!(find("create_media_buy").is_some());
        assert!(find("not_a_real_skill").is_none());
    }
}
