//! Output formatting

use clap::ValueEnum;
use plugin_binding::{Binding, EntityRef, RelationSet, TenantBindings, TenantKey};
use serde::Serialize;
use std::collections::BTreeMap;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Render `data` as JSON/YAML, or the rows produced by `rows` as a table
    fn render<T, R, F>(&self, data: &T, rows: F) -> anyhow::Result<String>
    where
        T: Serialize,
        R: Tabled,
        F: FnOnce() -> Vec<R>,
    {
        let rendered = match self {
            OutputFormat::Table => Table::new(rows()).to_string(),
            OutputFormat::Json => serde_json::to_string_pretty(data)?,
            OutputFormat::Yaml => serde_yaml::to_string(data)?,
        };
        Ok(rendered.trim_end().to_string())
    }

    pub fn render_bindings(&self, bindings: &TenantBindings) -> anyhow::Result<String> {
        self.render(&keyed(bindings), || binding_rows(bindings))
    }

    pub fn render_relations(
        &self,
        relations: &BTreeMap<TenantKey, RelationSet>,
    ) -> anyhow::Result<String> {
        self.render(&keyed(relations), || relation_rows(relations))
    }

    pub fn print_bindings(&self, bindings: &TenantBindings) -> anyhow::Result<()> {
        println!("{}", self.render_bindings(bindings)?);
        Ok(())
    }

    pub fn print_relations(
        &self,
        relations: &BTreeMap<TenantKey, RelationSet>,
    ) -> anyhow::Result<()> {
        println!("{}", self.render_relations(relations)?);
        Ok(())
    }
}

/// Serialize map keys as `namespace/name`
fn keyed<V>(map: &BTreeMap<TenantKey, V>) -> BTreeMap<String, &V> {
    map.iter().map(|(k, v)| (k.to_string(), v)).collect()
}

#[derive(Tabled)]
pub struct BindingRow {
    #[tabled(rename = "CONTROL PLANE")]
    control_plane: String,
    #[tabled(rename = "CONSUMER")]
    consumer: String,
    #[tabled(rename = "CONSUMER GROUP")]
    consumer_group: String,
    #[tabled(rename = "ROUTE")]
    route: String,
    #[tabled(rename = "SERVICE")]
    service: String,
}

fn cell(entity: Option<&EntityRef>) -> String {
    entity.map(|e| e.name.clone()).unwrap_or_else(|| "-".to_string())
}

fn binding_row(tenant: &TenantKey, binding: &Binding) -> BindingRow {
    BindingRow {
        control_plane: tenant.to_string(),
        consumer: cell(binding.consumer()),
        consumer_group: cell(binding.consumer_group()),
        route: cell(binding.route()),
        service: cell(binding.service()),
    }
}

pub fn binding_rows(bindings: &TenantBindings) -> Vec<BindingRow> {
    bindings
        .iter()
        .flat_map(|(tenant, list)| list.iter().map(move |b| binding_row(tenant, b)))
        .collect()
}

#[derive(Tabled)]
pub struct RelationRow {
    #[tabled(rename = "CONTROL PLANE")]
    control_plane: String,
    #[tabled(rename = "KIND")]
    kind: String,
    #[tabled(rename = "NAMESPACE")]
    namespace: String,
    #[tabled(rename = "NAME")]
    name: String,
}

pub fn relation_rows(relations: &BTreeMap<TenantKey, RelationSet>) -> Vec<RelationRow> {
    relations
        .iter()
        .flat_map(|(tenant, set)| {
            set.consumers
                .iter()
                .chain(&set.consumer_groups)
                .chain(&set.routes)
                .chain(&set.services)
                .map(move |e| RelationRow {
                    control_plane: tenant.to_string(),
                    kind: e.kind.to_string(),
                    namespace: e.namespace.clone(),
                    name: e.name.clone(),
                })
        })
        .collect()
}
