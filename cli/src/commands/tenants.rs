//! Tenants command

use super::Session;
use crate::{output::OutputFormat, Selection};
use plugin_binding::ResolverConfig;

pub async fn handle(
    selection: &Selection,
    config: ResolverConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let session = Session::open(selection, config)?;
    let selected = session.snapshot.referencing(&session.plugin);
    let relations = session
        .resolver
        .grouper()
        .group(
            &selected.consumers,
            &selected.consumer_groups,
            &selected.routes,
            &selected.services,
        )
        .await?;
    format.print_relations(&relations)
}
