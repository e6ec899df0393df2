//! lsw-admin - command-line admin shell

use std::sync::Arc;

use anyhow::{bail, Context};
use lsw_admin::{AdminResult, UserTableController};
use lsw_net::{BearerClient, ClientConfig, CsrfClient, MemorySessionStore, ReqwestTransport};
use lsw_render::{Document, FilterColumn, SecureDom, UserFilter};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: lsw-admin users [query] [column] | lsw-admin csrf";

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let config = ClientConfig::from_env();
    let transport = Arc::new(ReqwestTransport::new(&config).context("building HTTP client")?);

    match args.first().map(String::as_str) {
        Some("users") => {
            let query = args.get(1).map(String::as_str).unwrap_or_default();
            let column = match args.get(2) {
                Some(column) => column.parse::<FilterColumn>()?,
                None => FilterColumn::All,
            };
            let html = smol::block_on(users(transport, &config, UserFilter::new(query, column)))?;
            println!("{html}");
        }
        Some("csrf") => {
            let client = CsrfClient::new(transport, config);
            match smol::block_on(client.refresh_token()) {
                Some(_) => println!("CSRF token fetched"),
                None => println!("CSRF token unavailable"),
            }
        }
        _ => bail!(USAGE),
    }
    Ok(())
}

async fn users(
    transport: Arc<ReqwestTransport>,
    config: &ClientConfig,
    filter: UserFilter,
) -> AdminResult<String> {
    let session = match std::env::var("LSW_TOKEN") {
        Ok(token) => MemorySessionStore::with_token(&token),
        Err(_) => MemorySessionStore::new(),
    };
    let client = BearerClient::new(transport, session);

    let mut document = Document::new(&format!("{}/admin.html", config.base_url.trim_end_matches('/')));
    let body = document.body();
    let table = document.append_element_with_id(body, "table", "user-table")?;
    let tbody = document.append_element_with_id(table, "tbody", "user-table-body")?;
    let mut dom = SecureDom::new(document);

    let mut controller = UserTableController::new(tbody);
    controller.refresh_if_changed(&client, &mut dom).await?;
    controller.set_filter(filter, &mut dom)?;
    tracing::info!(users = controller.users().len(), "user table rendered");
    Ok(dom.outer_html(table))
}
