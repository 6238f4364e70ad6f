//! Local dev CLI: seeds the same in-memory fixture the transport binaries'
//! `seed_demo_deps` uses, lists the skill table, and invokes one skill
//! directly against it — useful for exercising a skill handler without
//! standing up either transport server, the role `messaging-tenants` plays
//! for seeding tenants against a real secrets backend.

use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;

use adcp_core::context::{Protocol, ToolContext};
use adcp_core::ids::{ContextId, PrincipalId, TenantId};
use adcp_core::schema::product::{Product, ProductProperties};
use adcp_core::skills::{dispatch_skill, table, Deps};
use adcp_core::tenant::{AdServerKind, Principal, Tenant};
use adcp_core::testkit::{InMemoryFormatRegistry, InMemoryPrincipalStore, InMemoryProductCatalog, MockAdServerAdapter};

#[derive(Parser)]
#[command(name = "adcp-tools", version, about = "AdCP sales agent dev fixtures and skill invocation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List every skill this agent advertises.
    ListSkills,
    /// Print the seeded demo tenant/principal/product fixture as JSON.
    SeedDemo,
    /// Invoke one skill against the seeded demo fixture and print its result.
    Invoke {
        /// Skill name, as advertised by `list-skills`.
        #[arg(long)]
        skill: String,
        /// JSON input for the skill. Defaults to reading stdin when omitted.
        #[arg(long)]
        input: Option<String>,
        /// File containing the JSON input, as an alternative to `--input`.
        #[arg(long, value_name = "FILE")]
        input_file: Option<PathBuf>,
        /// Tenant id to act as. Must exist in the seeded fixture.
        #[arg(long, default_value = "demo")]
        tenant: String,
        /// Principal id to act as. Must exist in the seeded fixture.
        #[arg(long, default_value = "demo_buyer")]
        principal: String,
    },
}

fn seed_demo_deps() -> Deps {
    let principals = Arc::new(InMemoryPrincipalStore::new());
    let catalog = Arc::new(InMemoryProductCatalog::new());
    let formats = Arc::new(InMemoryFormatRegistry::new());
    let adapter = Arc::new(MockAdServerAdapter::default());

    let demo_tenant_id: TenantId = "demo".into();
    principals.add_tenant(Tenant {
        tenant_id: demo_tenant_id.clone(),
        subdomain: "demo".to_string(),
        virtual_host: None,
        ad_server: AdServerKind::Mock,
        admin_token: "demo-admin-token".to_string(),
        auto_approve_formats: Vec::new(),
        human_review_required: false,
        max_daily_budget: None,
        webhook_url: None,
        is_active: true,
    });
    principals.add_principal(Principal {
        principal_id: "demo_buyer".into(),
        tenant_id: demo_tenant_id.clone(),
        name: "Demo Buyer".to_string(),
        access_token: "demo-buyer-token".to_string(),
        platform_mappings: Default::default(),
    });

    catalog.add_product(
        demo_tenant_id,
        Product {
            product_id: "demo_homepage".to_string(),
            name: "Demo Homepage Takeover".to_string(),
            description: "Illustrative product seeded for local development.".to_string(),
            properties: ProductProperties::Tags(vec!["homepage".to_string()]),
            pricing_options: Vec::new(),
            format_ids: Vec::new(),
            delivery_type: Some("guaranteed".to_string()),
            is_fixed_price: true,
            is_standard: true,
        },
    );

    Deps::new(adapter, catalog, principals, formats, "https://adcp-formats.example.com")
}

fn list_skills() {
    for skill in table::SKILL_TABLE {
        let marker = if skill.legacy_alias { " (legacy alias)" } else { "" };
        println!("{:<32} {}{}", skill.name, skill.description, marker);
    }
}

fn print_seed_summary() -> Result<()> {
    let summary = serde_json::json!({
        "tenant": {"tenant_id": "demo", "subdomain": "demo", "admin_token": "demo-admin-token"},
        "principal": {"principal_id": "demo_buyer", "access_token": "demo-buyer-token"},
        "products": [{"product_id": "demo_homepage", "name": "Demo Homepage Takeover"}],
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn read_input(input: Option<String>, input_file: Option<PathBuf>) -> Result<Value> {
    let raw = match (input, input_file) {
        (Some(s), _) => s,
        (None, Some(path)) => std::fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?,
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf).context("reading skill input from stdin")?;
            buf
        }
    };
    serde_json::from_str(&raw).context("parsing skill input as JSON")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Command::ListSkills => list_skills(),
        Command::SeedDemo => print_seed_summary()?,
        Command::Invoke { skill, input, input_file, tenant, principal } => {
            if table::find(&skill).is_none() {
                anyhow::bail!("unknown skill '{skill}' — see `adcp-tools list-skills`");
            }
            let input = read_input(input, input_file)?;
            let deps = seed_demo_deps();
            let ctx = ToolContext::new(
                ContextId::from(uuid::Uuid::new_v4().to_string()),
                TenantId::from(tenant),
                PrincipalId::from(principal),
                &skill,
                Protocol::A2aJsonRpc,
            );
            let (value, success) = dispatch_skill(&skill, input, &ctx, &deps).await;
            println!("{}", serde_json::to_string_pretty(&value)?);
            if !success {
                std::process::exit(1);
            }
        }
    }
    Ok(())
}
