/// Per-command `--limit` wins over the global one, then the default.
pub fn effective_limit(local: Option<u32>, global: Option<u32>, default: u32) -> u32 {
    local.or(global).unwrap_or(default)
}
