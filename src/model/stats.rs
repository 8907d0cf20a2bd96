use std::fmt::Display;

#[derive(Debug, Clone, Copy)]
pub struct ProbeStats {
    pub checked: usize,
    pub active: usize,
}

impl Display for ProbeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format_args!("{{\"checked\": {}, \"active\": {}}}", self.checked, self.active))
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProcessStats {
    pub source_count: usize,
    pub error_count: usize,
    pub raw_count: usize,
    pub blocked_count: usize,
    pub kept_count: usize,
    pub probe: Option<ProbeStats>,
}

impl Display for ProcessStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let probe = self.probe.as_ref().map_or_else(|| String::from("null"), ProbeStats::to_string);
        let str = format!("{{\"sources\": {}, \"errors\": {}, \"raw\": {}, \"blocked\": {}, \"kept\": {}, \"probe\": {}}}",
                          self.source_count, self.error_count, self.raw_count,
                          self.blocked_count, self.kept_count, probe);
        write!(f, "{str}")
    }
}
