//! Resolve command

use super::Session;
use crate::{output::OutputFormat, Selection};
use plugin_binding::ResolverConfig;

pub async fn handle(
    selection: &Selection,
    config: ResolverConfig,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let session = Session::open(selection, config)?;
    let bindings = session
        .resolver
        .resolve_snapshot(&session.snapshot, &session.plugin)
        .await?;

    tracing::info!(
        "Plugin {} resolves to {} bindings across {} control planes",
        session.plugin,
        bindings.values().map(Vec::len).sum::<usize>(),
        bindings.len(),
    );
    format.print_bindings(&bindings)
}
