//! Known Open vSwitch metric identifiers.
//!
//! The REST layer accepts either a short alias (`flow_bytes`) or the full
//! metric name (`ovs_flow_flow_bytes_total`). Aliases from configuration are
//! layered on top of the built-in set.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::config::MetricsConfig;

/// Counters exported by the OVS Prometheus exporter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OvsMetric {
    InterfaceReceiveBytes,
    InterfaceReceiveCrc,
    InterfaceReceiveDrop,
    InterfaceReceiveErrors,
    InterfaceReceivePackets,
    InterfaceTransmitBytes,
    InterfaceTransmitCollisions,
    InterfaceTransmitDrop,
    InterfaceTransmitErrors,
    InterfaceTransmitPackets,
    FlowBytes,
    FlowPackets,
}

impl OvsMetric {
    pub const ALL: [OvsMetric; 12] = [
        Self::InterfaceReceiveBytes,
        Self::InterfaceReceiveCrc,
        Self::InterfaceReceiveDrop,
        Self::InterfaceReceiveErrors,
        Self::InterfaceReceivePackets,
        Self::InterfaceTransmitBytes,
        Self::InterfaceTransmitCollisions,
        Self::InterfaceTransmitDrop,
        Self::InterfaceTransmitErrors,
        Self::InterfaceTransmitPackets,
        Self::FlowBytes,
        Self::FlowPackets,
    ];

    /// Metric name as stored in the backend
    pub fn metric_name(&self) -> &'static str {
        match self {
            Self::InterfaceReceiveBytes => "ovs_interface_receive_bytes_total",
            Self::InterfaceReceiveCrc => "ovs_interface_receive_crc_total",
            Self::InterfaceReceiveDrop => "ovs_interface_receive_drop_total",
            Self::InterfaceReceiveErrors => "ovs_interface_receive_errors_total",
            Self::InterfaceReceivePackets => "ovs_interface_receive_packets_total",
            Self::InterfaceTransmitBytes => "ovs_interface_transmit_bytes_total",
            Self::InterfaceTransmitCollisions => "ovs_interface_transmit_collisions_total",
            Self::InterfaceTransmitDrop => "ovs_interface_transmit_drop_total",
            Self::InterfaceTransmitErrors => "ovs_interface_transmit_errors_total",
            Self::InterfaceTransmitPackets => "ovs_interface_transmit_packets_total",
            Self::FlowBytes => "ovs_flow_flow_bytes_total",
            Self::FlowPackets => "ovs_flow_flow_packets_total",
        }
    }

    /// Short identifier usable in URLs
    pub fn alias(&self) -> &'static str {
        match self {
            Self::InterfaceReceiveBytes => "interface_receive_bytes",
            Self::InterfaceReceiveCrc => "interface_receive_crc",
            Self::InterfaceReceiveDrop => "interface_receive_drop",
            Self::InterfaceReceiveErrors => "interface_receive_errors",
            Self::InterfaceReceivePackets => "interface_receive_packets",
            Self::InterfaceTransmitBytes => "interface_transmit_bytes",
            Self::InterfaceTransmitCollisions => "interface_transmit_collisions",
            Self::InterfaceTransmitDrop => "interface_transmit_drop",
            Self::InterfaceTransmitErrors => "interface_transmit_errors",
            Self::InterfaceTransmitPackets => "interface_transmit_packets",
            Self::FlowBytes => "flow_bytes",
            Self::FlowPackets => "flow_packets",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("Unknown metric '{0}'")]
    UnknownMetric(String),
    #[error("'{0}' is not a valid metric name")]
    InvalidMetricName(String),
}

/// One alias -> metric mapping, as listed by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub alias: String,
    pub metric: String,
}

/// Lookup table from URL identifiers to backend metric names
#[derive(Debug, Clone)]
pub struct MetricCatalog {
    aliases: BTreeMap<String, String>,
    strict: bool,
}

impl Default for MetricCatalog {
    fn default() -> Self {
        Self::from_config(&MetricsConfig::default())
    }
}

impl MetricCatalog {
    /// Built-in OVS metrics plus any aliases from configuration.
    ///
    /// Configured aliases win over built-in ones with the same key.
    pub fn from_config(config: &MetricsConfig) -> Self {
        let mut aliases: BTreeMap<String, String> = OvsMetric::ALL
            .iter()
            .map(|m| (m.alias().to_string(), m.metric_name().to_string()))
            .collect();

        for (alias, metric) in &config.aliases {
            aliases.insert(alias.clone(), metric.clone());
        }

        Self {
            aliases,
            strict: config.strict,
        }
    }

    /// Resolve an alias or a metric name to the backend metric name
    pub fn resolve(&self, id: &str) -> Result<String, CatalogError> {
        if let Some(metric) = self.aliases.get(id) {
            return Ok(metric.clone());
        }

        if self.aliases.values().any(|metric| metric == id) {
            return Ok(id.to_string());
        }

        if self.strict {
            return Err(CatalogError::UnknownMetric(id.to_string()));
        }

        if !is_valid_metric_name(id) {
            return Err(CatalogError::InvalidMetricName(id.to_string()));
        }

        log::debug!("Metric '{id}' is not in the catalog, passing it through");
        Ok(id.to_string())
    }

    pub fn entries(&self) -> Vec<CatalogEntry> {
        self.aliases
            .iter()
            .map(|(alias, metric)| CatalogEntry {
                alias: alias.clone(),
                metric: metric.clone(),
            })
            .collect()
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }
}

/// Check a metric name against `[a-zA-Z_:][a-zA-Z0-9_:]*`
pub fn is_valid_metric_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == ':' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == ':')
}
