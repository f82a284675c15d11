use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AgentConfig {
    /// Collector destination.
    #[serde(default = "default_collector_host")]
    pub collector_host: String,
    #[serde(default = "default_collector_port")]
    pub collector_port: u16,
    /// Seconds between samples; the derive loop runs at the same period.
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,
    /// Proc filesystem root, overridable for containers and tests.
    #[serde(default = "default_proc_path")]
    pub proc_path: String,
    /// Per-write socket deadline.
    #[serde(default = "default_socket_timeout_ms")]
    pub socket_timeout_ms: u64,
    /// Reports retained in memory while the collector is unreachable.
    #[serde(default = "default_backlog_capacity")]
    pub backlog_capacity: usize,
    /// Mirror every shipped payload to stdout.
    #[serde(default)]
    pub console_output: bool,
}

fn default_collector_host() -> String {
    "127.0.0.1".to_string()
}

fn default_collector_port() -> u16 {
    1514
}

fn default_interval_secs() -> u64 {
    1
}

fn default_proc_path() -> String {
    "/proc".to_string()
}

fn default_socket_timeout_ms() -> u64 {
    5000
}

fn default_backlog_capacity() -> usize {
    procpulse_shipper::backlog::DEFAULT_CAPACITY
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            collector_host: default_collector_host(),
            collector_port: default_collector_port(),
            interval_secs: default_interval_secs(),
            proc_path: default_proc_path(),
            socket_timeout_ms: default_socket_timeout_ms(),
            backlog_capacity: default_backlog_capacity(),
            console_output: false,
        }
    }
}

impl AgentConfig {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}
