use shared::metrics_defs::{MetricDef, MetricType};

pub const REQUEST_DURATION: MetricDef = MetricDef {
    name: "request.duration",
    metric_type: MetricType::Histogram,
    description: "Request duration in seconds. Tagged with operation, status.",
};

pub const STORE_WRITES: MetricDef = MetricDef {
    name: "store.writes",
    metric_type: MetricType::Counter,
    description: "Artist list writes accepted by the content store. Tagged with outcome.",
};

pub const STORE_CONFLICTS: MetricDef = MetricDef {
    name: "store.conflicts",
    metric_type: MetricType::Counter,
    description: "Writes rejected because the file changed since it was read",
};

pub const ALL_METRICS: &[MetricDef] = &[REQUEST_DURATION, STORE_WRITES, STORE_CONFLICTS];
