pub mod exporter_metrics;
