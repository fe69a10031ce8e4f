//! Rendering a [`Report`] for the terminal
use crate::{
    cluster::Report,
    crd::Role,
    error::{Error, Result},
    mapping::PortMapping,
};

/// Output format for the report
#[derive(clap::ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputMode {
    /// One table per role
    #[default]
    Table,
    /// A single yaml document
    Yaml,
    /// A single json document
    Json,
}

impl OutputMode {
    /// Render the whole report in this format
    pub fn render(&self, report: &Report) -> Result<String> {
        match self {
            OutputMode::Table => Ok(Role::ALL
                .iter()
                .map(|role| table(*role, report.rows(*role)))
                .collect::<Vec<_>>()
                .join("\n")),
            OutputMode::Yaml => serde_yaml::to_string(report).map_err(Error::SerializeYaml),
            OutputMode::Json => serde_json::to_string_pretty(report)
                .map(|s| s + "\n")
                .map_err(Error::SerializeJson),
        }
    }
}

/// Columns left-aligned and padded to the widest cell, the way kubectl prints
pub fn table(role: Role, rows: &[PortMapping]) -> String {
    let header = [
        format!("Service Name {role}"),
        "Service Port".to_string(),
        "Solace Port".to_string(),
        "HAProxy Port".to_string(),
    ];
    let cells: Vec<[String; 4]> = rows
        .iter()
        .map(|r| {
            [
                r.service_name.clone(),
                r.service_port.to_string(),
                r.solace_port.to_string(),
                r.node_port.to_string(),
            ]
        })
        .collect();

    let mut widths = header.each_ref().map(|h| h.len());
    for line in &cells {
        for (w, cell) in widths.iter_mut().zip(line) {
            *w = (*w).max(cell.len());
        }
    }

    std::iter::once(&header)
        .chain(&cells)
        .map(|line| {
            format!(
                "{0:<w0$}   {1:<w1$}   {2:<w2$}   {3}\n",
                line[0],
                line[1],
                line[2],
                line[3],
                w0 = widths[0],
                w1 = widths[1],
                w2 = widths[2],
            )
        })
        .collect()
}
